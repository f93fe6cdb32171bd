//! Terminal stand-ins for the speech and audio collaborators.
//!
//! Spoken lines are echoed to stdout under the selected voice's name. Speech
//! capture is typed: while a listening session is open the next input line is
//! treated as the transcript. Cues are logged with their tone envelope and
//! the louder ones ring the terminal bell.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use jarvis_chat::{
    select_voice, AudioCue, ChatError, CuePlayer, SpeechRecognizer, SpeechSynthesizer, VoiceInfo,
};
use jarvis_core::config::VoiceConfig;

/// Voices the console can speak with: `(name, language tag)`.
pub const CONSOLE_VOICES: [(&str, &str); 5] = [
    ("Samantha", "en-US"),
    ("Karen", "en-AU"),
    ("Daniel", "en-GB"),
    ("Google UK English Male", "en-GB"),
    ("Amelie", "fr-CA"),
];

pub fn console_voices() -> Vec<VoiceInfo> {
    CONSOLE_VOICES
        .iter()
        .map(|(name, lang)| VoiceInfo::new(*name, *lang))
        .collect()
}

#[derive(Debug, Clone)]
pub struct ConsoleSynthesizer {
    voice: VoiceConfig,
    speaker: Option<String>,
}

impl ConsoleSynthesizer {
    /// Resolve the configured voice preferences against `voices`.
    pub fn new(voice: VoiceConfig, voices: &[VoiceInfo]) -> Self {
        let speaker = select_voice(voices, &voice).map(|v| v.name.clone());
        tracing::info!(
            speaker = speaker.as_deref().unwrap_or("none"),
            lang = %voice.lang,
            "Console voice selected"
        );
        tracing::debug!(
            pitch = voice.pitch,
            rate = voice.rate,
            volume = voice.volume,
            "Console voice configured"
        );
        Self { voice, speaker }
    }

    pub fn speaker(&self) -> Option<&str> {
        self.speaker.as_deref()
    }

    pub fn render(&self, text: &str) -> String {
        if self.voice.volume <= 0.0 {
            return String::new();
        }
        match &self.speaker {
            Some(name) => format!("  ~ [{name}] {text}"),
            None => format!("  ~ {text}"),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    async fn speak(&self, text: &str) -> bool {
        let line = self.render(text);
        if line.is_empty() {
            return false;
        }
        println!("{line}");
        true
    }

    fn cancel(&self) {}
}

/// Cue player that logs each tone envelope and rings the terminal bell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleCuePlayer;

impl ConsoleCuePlayer {
    /// One-line summary of the cue's tone, e.g. `deploy 880->1320 Hz over 0.40 s`.
    pub fn describe(cue: AudioCue) -> String {
        let tone = cue.profile();
        if tone.start_hz == tone.end_hz {
            format!("{cue} {:.0} Hz over {:.2} s", tone.start_hz, tone.stop_secs)
        } else {
            format!(
                "{cue} {:.0}->{:.0} Hz over {:.2} s",
                tone.start_hz, tone.end_hz, tone.stop_secs
            )
        }
    }

    /// Boot, deploy and error ring the bell; wake only logs.
    pub fn rings_bell(cue: AudioCue) -> bool {
        cue.profile().gain >= 0.1 || cue == AudioCue::Error
    }
}

impl CuePlayer for ConsoleCuePlayer {
    fn play(&self, cue: AudioCue) {
        let tone = cue.profile();
        tracing::debug!(
            cue = %cue,
            gain = tone.gain,
            decay_secs = tone.decay_secs,
            "{}",
            Self::describe(cue)
        );
        if Self::rings_bell(cue) {
            let mut stderr = std::io::stderr();
            if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
                tracing::trace!(error = %e, "Terminal bell unavailable");
            }
        }
    }
}

/// Speech capture backed by the next typed line.
#[derive(Debug, Default)]
pub struct TypedRecognizer {
    active: AtomicBool,
}

impl TypedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechRecognizer for TypedRecognizer {
    fn start(&self) -> Result<(), ChatError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ChatError::AlreadyListening);
        }
        println!("  (listening: type what you would say, empty line to cancel)");
        Ok(())
    }

    fn stop(&self) -> Result<(), ChatError> {
        if !self.active.swap(false, Ordering::SeqCst) {
            return Err(ChatError::NotListening);
        }
        Ok(())
    }
}
