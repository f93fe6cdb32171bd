//! Conversation controller for the assistant.
//!
//! Owns the message log, routes user input through the intent resolver,
//! holds at most one deploy URL awaiting confirmation, and drives the
//! platform collaborators (speech, navigation, audio cues) through an
//! explicit [`AssistantContext`].

pub mod context;
pub mod controller;
pub mod cues;
pub mod deploy;
pub mod error;
pub mod mock;
pub mod navigator;
pub mod protocols;
pub mod state;
pub mod telemetry;
pub mod voice;

pub use context::AssistantContext;
pub use controller::{ConversationController, RejectReason, SubmitOutcome, WELCOME_MESSAGE};
pub use cues::{AudioCue, CuePlayer, SilentCuePlayer, ToneProfile};
pub use deploy::{DeployGate, PendingDeploy};
pub use error::ChatError;
pub use navigator::{host_of, validate_url, Navigator, SystemBrowser};
pub use protocols::{QuickAction, QUICK_ACTIONS};
pub use state::{CyclePhase, UiState};
pub use telemetry::SystemStats;
pub use voice::{
    select_voice, CaptureEvent, SilentSynthesizer, SpeechRecognizer, SpeechSynthesizer,
    UnsupportedRecognizer, VoiceInfo,
};
