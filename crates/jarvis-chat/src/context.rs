use std::fmt;
use std::sync::Arc;

use crate::cues::{CuePlayer, SilentCuePlayer};
use crate::navigator::{Navigator, SystemBrowser};
use crate::voice::{SilentSynthesizer, SpeechRecognizer, SpeechSynthesizer, UnsupportedRecognizer};

/// Platform collaborators, built once at startup and handed to the controller.
#[derive(Clone)]
pub struct AssistantContext {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub navigator: Arc<dyn Navigator>,
    pub cues: Arc<dyn CuePlayer>,
}

impl AssistantContext {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        recognizer: Arc<dyn SpeechRecognizer>,
        navigator: Arc<dyn Navigator>,
        cues: Arc<dyn CuePlayer>,
    ) -> Self {
        Self {
            synthesizer,
            recognizer,
            navigator,
            cues,
        }
    }

    /// No speech in or out, no audio, navigation through the system browser.
    pub fn headless() -> Self {
        Self::new(
            Arc::new(SilentSynthesizer),
            Arc::new(UnsupportedRecognizer),
            Arc::new(SystemBrowser),
            Arc::new(SilentCuePlayer),
        )
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_cues(mut self, cues: Arc<dyn CuePlayer>) -> Self {
        self.cues = cues;
        self
    }
}

impl Default for AssistantContext {
    fn default() -> Self {
        Self::headless()
    }
}

impl fmt::Debug for AssistantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantContext").finish_non_exhaustive()
    }
}
