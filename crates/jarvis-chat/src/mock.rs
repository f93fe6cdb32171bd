//! Recording collaborators for tests and headless runs.
//!
//! Each mock is cheaply cloneable; clones share their recordings, so a test
//! can hand one clone to the controller and inspect the other.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::cues::{AudioCue, CuePlayer};
use crate::error::ChatError;
use crate::navigator::{validate_url, Navigator};
use crate::voice::{SpeechRecognizer, SpeechSynthesizer};

fn snapshot<T: Clone>(items: &Mutex<Vec<T>>) -> Vec<T> {
    items.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn record<T>(items: &Mutex<Vec<T>>, item: T) {
    items
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(item);
}

// =============================================================================
// Speech synthesis
// =============================================================================

/// Synthesizer that records every line it is asked to speak.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
    cancels: Arc<AtomicUsize>,
    playback: Duration,
    supported: bool,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            cancels: Arc::new(AtomicUsize::new(0)),
            playback: Duration::ZERO,
            supported: true,
        }
    }

    /// Simulate playback taking `playback` per utterance.
    pub fn with_playback(playback: Duration) -> Self {
        Self {
            playback,
            ..Self::new()
        }
    }

    /// A synthesizer on a host without speech output.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        snapshot(&self.spoken)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn speak(&self, text: &str) -> bool {
        if !self.supported {
            return false;
        }
        record(&self.spoken, text.to_string());
        if !self.playback.is_zero() {
            tokio::time::sleep(self.playback).await;
        }
        true
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Speech capture
// =============================================================================

/// Recognizer tracking whether capture is active.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    active: Arc<AtomicBool>,
    starts: Arc<AtomicUsize>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn start(&self) -> Result<(), ChatError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(ChatError::AlreadyListening);
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Mock speech capture started");
        Ok(())
    }

    fn stop(&self) -> Result<(), ChatError> {
        if !self.active.swap(false, Ordering::SeqCst) {
            return Err(ChatError::NotListening);
        }
        tracing::info!("Mock speech capture stopped");
        Ok(())
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Navigator that records opened URLs instead of launching anything.
#[derive(Debug, Clone, Default)]
pub struct MockNavigator {
    opened: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A navigator whose every launch fails after validation.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        snapshot(&self.opened)
    }
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn open(&self, url: &str) -> Result<(), ChatError> {
        validate_url(url)?;
        if self.fail {
            return Err(ChatError::NavigationFailed("mock launch failure".to_string()));
        }
        record(&self.opened, url.to_string());
        Ok(())
    }
}

// =============================================================================
// Audio cues
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MockCuePlayer {
    played: Arc<Mutex<Vec<AudioCue>>>,
}

impl MockCuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<AudioCue> {
        snapshot(&self.played)
    }
}

impl CuePlayer for MockCuePlayer {
    fn play(&self, cue: AudioCue) {
        record(&self.played, cue);
    }
}
