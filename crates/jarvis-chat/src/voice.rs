//! Speech synthesis and speech capture collaborators.
//!
//! Both degrade silently: a synthesizer without output reports `false`
//! from `speak`, and a missing recognizer reports `Unsupported` from `start`.

use async_trait::async_trait;
use jarvis_core::config::VoiceConfig;

use crate::error::ChatError;

/// Speaks text aloud.
///
/// The controller calls `cancel` before every new utterance, so a new line
/// cuts off the previous one instead of queueing behind it.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Resolves `true` when playback completes, `false` if unsupported or on error.
    async fn speak(&self, text: &str) -> bool;

    /// Stop any in-flight utterance.
    fn cancel(&self);
}

/// Terminal signal from one listening session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A single finalized transcript.
    Transcript(String),
    Error(String),
    Ended,
}

/// Captures one spoken utterance per listening session.
///
/// Results are delivered to the controller as [`CaptureEvent`]s.
pub trait SpeechRecognizer: Send + Sync {
    fn start(&self) -> Result<(), ChatError>;
    fn stop(&self) -> Result<(), ChatError>;
}

/// An installed synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Pick the voice to speak with.
///
/// Preference order: configured names (substring, in order), then a male
/// voice in the configured language, then any voice in that language, then
/// the first voice available.
pub fn select_voice<'a>(voices: &'a [VoiceInfo], config: &VoiceConfig) -> Option<&'a VoiceInfo> {
    config
        .preferred_voices
        .iter()
        .find_map(|wanted| voices.iter().find(|v| v.name.contains(wanted.as_str())))
        .or_else(|| {
            voices.iter().find(|v| {
                v.lang.contains(config.lang.as_str()) && v.name.to_lowercase().contains("male")
            })
        })
        .or_else(|| voices.iter().find(|v| v.lang.contains(config.lang.as_str())))
        .or_else(|| voices.first())
}

/// Synthesizer for hosts without speech output. Always reports unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynthesizer;

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    async fn speak(&self, _text: &str) -> bool {
        false
    }

    fn cancel(&self) {}
}

/// Recognizer for hosts without a microphone pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn start(&self) -> Result<(), ChatError> {
        Err(ChatError::Unsupported("speech recognition".to_string()))
    }

    fn stop(&self) -> Result<(), ChatError> {
        Ok(())
    }
}
