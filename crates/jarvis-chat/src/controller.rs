//! Conversation controller: the message log and the submit/deploy cycle.
//!
//! The busy flag is claimed synchronously before the resolver suspends, so
//! two resolutions never interleave. It only covers resolution: a submission
//! made while the previous reply is still being spoken is accepted and cuts
//! that playback off. `confirm_deploy` is not serialized against `submit`.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use jarvis_core::config::JarvisConfig;
use jarvis_core::types::{ChatMessage, MessageIdGenerator, MessageRole};
use jarvis_intent::{Intent, IntentResolver, ReplyCategory, ReplyPicker, ResolverResult};
use jarvis_workbench::{MeasuringWorkbench, Point};
use uuid::Uuid;

use crate::context::AssistantContext;
use crate::cues::AudioCue;
use crate::deploy::{DeployGate, PendingDeploy};
use crate::error::ChatError;
use crate::navigator::{host_of, validate_url};
use crate::protocols::QuickAction;
use crate::state::{CyclePhase, UiState};
use crate::telemetry::SystemStats;
use crate::voice::CaptureEvent;

pub const WELCOME_MESSAGE: &str =
    "Local Neural Core Active. Intelligence is strictly offline, Sir. Deployments available on command.";

/// Why a submission was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input was empty or whitespace.
    Empty,
    /// A resolution is already in flight.
    Busy,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "empty input"),
            RejectReason::Busy => write!(f, "busy"),
        }
    }
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(ResolverResult),
    Rejected(RejectReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    pub fn result(&self) -> Option<&ResolverResult> {
        match self {
            SubmitOutcome::Accepted(result) => Some(result),
            SubmitOutcome::Rejected(_) => None,
        }
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the conversation and drives the collaborators in [`AssistantContext`].
pub struct ConversationController {
    session_id: Uuid,
    resolver: IntentResolver,
    ctx: AssistantContext,
    voice_enabled: bool,
    pixels_to_cm: f64,
    ids: MessageIdGenerator,
    messages: Mutex<Vec<ChatMessage>>,
    deploy: DeployGate,
    loading: AtomicBool,
    speaking: AtomicBool,
    // Bumped per utterance so only the latest playback clears `speaking`.
    utterance: AtomicU64,
    listening: AtomicBool,
    booted: AtomicBool,
    ui: Mutex<UiState>,
    workbench: Mutex<Option<MeasuringWorkbench>>,
}

impl ConversationController {
    pub fn new(config: &JarvisConfig, ctx: AssistantContext) -> Self {
        let resolver = IntentResolver::new(
            &config.resolver,
            &config.general,
            ReplyPicker::from_os_rng(),
        );
        Self::with_resolver(config, resolver, ctx)
    }

    /// Build around a preconfigured resolver, e.g. one with a seeded reply picker.
    pub fn with_resolver(
        config: &JarvisConfig,
        resolver: IntentResolver,
        ctx: AssistantContext,
    ) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(session_id = %session_id, "Conversation controller created");
        Self {
            session_id,
            resolver,
            ctx,
            voice_enabled: config.voice.enabled,
            pixels_to_cm: config.workbench.pixels_to_cm,
            ids: MessageIdGenerator::new(),
            messages: Mutex::new(Vec::new()),
            deploy: DeployGate::new(),
            loading: AtomicBool::new(false),
            speaking: AtomicBool::new(false),
            utterance: AtomicU64::new(0),
            listening: AtomicBool::new(false),
            booted: AtomicBool::new(false),
            ui: Mutex::new(UiState::default()),
            workbench: Mutex::new(None),
        }
    }

    // =========================================================================
    // Conversation
    // =========================================================================

    /// Play the boot cue and greet. Only the first call does anything.
    pub async fn boot(&self) -> bool {
        if self.booted.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.ctx.cues.play(AudioCue::Boot);
        self.append(MessageRole::Assistant, WELCOME_MESSAGE);
        tracing::info!(session_id = %self.session_id, "Assistant online");
        self.speak(WELCOME_MESSAGE).await;
        true
    }

    /// Send user text through the resolver.
    ///
    /// Empty input and input arriving while a resolution is in flight are
    /// dropped without touching the log.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring empty submission");
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }

        let before = self.phase();
        if !before.accepts_input()
            || self
                .loading
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            tracing::debug!(text = %text, "Submission dropped, resolution in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }
        self.log_transition(before, CyclePhase::AwaitingResolution);

        locked(&self.ui).hide_protocols();
        self.append(MessageRole::User, text);
        self.ctx.cues.play(AudioCue::Wake);

        let result = self.resolver.respond(text).await;

        self.append(MessageRole::Assistant, result.text.clone());
        self.loading.store(false, Ordering::SeqCst);

        if let Some(url) = &result.url {
            if let Err(e) = self.propose_deploy(url) {
                tracing::warn!(url = %url, error = %e, "Resolver proposed an unusable URL");
            }
        }
        if result.intent == Intent::OpenTool {
            self.open_workbench();
        }
        tracing::info!(
            session_id = %self.session_id,
            intent = %result.intent,
            url = result.url.as_deref().unwrap_or(""),
            "Submission resolved"
        );

        self.speak(&result.text).await;
        SubmitOutcome::Accepted(result)
    }

    /// Navigate to the pending deploy, if any, and report it.
    ///
    /// Returns the URL that was deployed. Calling again without a new deploy
    /// is a no-op.
    pub async fn confirm_deploy(&self) -> Option<String> {
        let PendingDeploy { url, .. } = self.deploy.take()?;

        self.ctx.cues.play(AudioCue::Deploy);
        if let Err(e) = self.ctx.navigator.open(&url).await {
            tracing::warn!(url = %url, error = %e, "Deploy navigation failed");
            self.ctx.cues.play(AudioCue::Error);
        }

        let host = host_of(&url);
        self.append(
            MessageRole::Assistant,
            format!("Node {host} deployed. Intelligence returning to local enclave."),
        );
        tracing::info!(session_id = %self.session_id, url = %url, "Deploy confirmed");

        let line = self.resolver.reply(ReplyCategory::Completed);
        self.speak(line).await;
        Some(url)
    }

    /// Hold `url` for confirmation, replacing any pending deploy.
    ///
    /// Only `http://` and `https://` URLs are accepted.
    pub fn propose_deploy(&self, url: &str) -> Result<(), ChatError> {
        validate_url(url)?;
        self.deploy.propose(url);
        Ok(())
    }

    /// Drop the pending deploy without navigating.
    pub fn dismiss_deploy(&self) -> bool {
        let dismissed = self.deploy.dismiss();
        if dismissed {
            tracing::debug!("Pending deploy dismissed");
        }
        dismissed
    }

    /// Submit the command behind a quick-action label.
    pub async fn run_protocol(&self, label: &str) -> Option<SubmitOutcome> {
        let Some(action) = QuickAction::find(label) else {
            tracing::debug!(label = %label, "Unknown protocol");
            return None;
        };
        Some(self.submit(action.command).await)
    }

    // =========================================================================
    // Speech capture
    // =========================================================================

    /// Start or stop a listening session. Returns the new listening state.
    pub fn toggle_listening(&self) -> bool {
        if self.listening.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.ctx.recognizer.stop() {
                tracing::debug!(error = %e, "Speech capture stop ignored");
            }
            return false;
        }

        self.listening.store(true, Ordering::SeqCst);
        locked(&self.ui).hide_protocols();
        self.ctx.cues.play(AudioCue::Wake);
        match self.ctx.recognizer.start() {
            Ok(()) => {}
            Err(ChatError::AlreadyListening) => {
                tracing::error!("Speech recognition already started");
            }
            Err(e) => tracing::warn!(error = %e, "Speech capture unavailable"),
        }
        true
    }

    /// Handle the terminal signal of a listening session.
    ///
    /// Every signal ends listening; a transcript is also submitted.
    pub async fn handle_capture_event(&self, event: CaptureEvent) -> Option<SubmitOutcome> {
        self.listening.store(false, Ordering::SeqCst);
        if let Err(e) = self.ctx.recognizer.stop() {
            tracing::trace!(error = %e, "Capture already closed");
        }

        match event {
            CaptureEvent::Transcript(transcript) => Some(self.submit(&transcript).await),
            CaptureEvent::Error(reason) => {
                tracing::warn!(reason = %reason, "Speech capture failed");
                self.ctx.cues.play(AudioCue::Error);
                None
            }
            CaptureEvent::Ended => None,
        }
    }

    // =========================================================================
    // Workbench and panels
    // =========================================================================

    /// Open the measuring overlay with a fresh session.
    pub fn open_workbench(&self) {
        let mut workbench = locked(&self.workbench);
        if workbench.is_none() {
            *workbench = Some(MeasuringWorkbench::new(self.pixels_to_cm));
            tracing::info!("Workbench opened");
        }
        locked(&self.ui).workbench_open = true;
    }

    /// Close the overlay, discarding its measurement.
    pub fn close_workbench(&self) {
        locked(&self.workbench).take();
        locked(&self.ui).workbench_open = false;
    }

    /// Measure between two points. `None` while the overlay is closed.
    pub fn measure(&self, from: Point, to: Point) -> Option<f64> {
        locked(&self.workbench)
            .as_mut()
            .map(|wb| wb.measure(from, to))
    }

    /// Current overlay reading, e.g. `2.54 CM`.
    pub fn workbench_reading(&self) -> Option<String> {
        locked(&self.workbench).as_ref().map(|wb| wb.reading())
    }

    pub fn toggle_keyboard(&self) -> bool {
        locked(&self.ui).toggle_keyboard()
    }

    pub fn toggle_protocols(&self) -> bool {
        locked(&self.ui).toggle_protocols()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        locked(&self.messages).clone()
    }

    pub fn pending_deploy(&self) -> Option<PendingDeploy> {
        self.deploy.pending()
    }

    pub fn is_busy(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Any activity indicator lit: resolving, speaking or listening.
    pub fn is_active(&self) -> bool {
        self.is_busy() || self.is_speaking() || self.is_listening()
    }

    pub fn phase(&self) -> CyclePhase {
        CyclePhase::from_flags(self.is_busy(), self.is_speaking())
    }

    pub fn ui_state(&self) -> UiState {
        *locked(&self.ui)
    }

    pub fn voice_gauge(&self) -> f64 {
        SystemStats::voice_gauge(self.is_listening(), self.is_speaking())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn append(&self, role: MessageRole, text: impl Into<String>) {
        // Id and push under one lock so id order is log order.
        let mut messages = locked(&self.messages);
        let message = ChatMessage::new(self.ids.next_id(), role, text);
        tracing::debug!(id = %message.id, role = %message.role, "Message appended");
        messages.push(message);
    }

    async fn speak(&self, text: &str) {
        if !self.voice_enabled {
            return;
        }
        self.ctx.synthesizer.cancel();
        let utterance = self.utterance.fetch_add(1, Ordering::SeqCst) + 1;
        self.speaking.store(true, Ordering::SeqCst);

        let completed = self.ctx.synthesizer.speak(text).await;
        if !completed {
            tracing::debug!("Speech playback skipped or interrupted");
        }

        if self.utterance.load(Ordering::SeqCst) == utterance {
            self.speaking.store(false, Ordering::SeqCst);
        }
    }

    fn log_transition(&self, from: CyclePhase, to: CyclePhase) {
        if from.can_transition_to(&to) {
            tracing::debug!(from = %from, to = %to, "Cycle phase changed");
        } else {
            tracing::warn!(from = %from, to = %to, "Unexpected cycle phase change");
        }
    }
}

impl fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationController")
            .field("session_id", &self.session_id)
            .field("phase", &self.phase())
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::mock::{MockCuePlayer, MockNavigator, MockRecognizer, MockSynthesizer};
    use crate::voice::SpeechRecognizer;

    struct Harness {
        controller: ConversationController,
        synth: MockSynthesizer,
        nav: MockNavigator,
        cues: MockCuePlayer,
        recognizer: MockRecognizer,
    }

    fn harness() -> Harness {
        let synth = MockSynthesizer::new();
        let nav = MockNavigator::new();
        let cues = MockCuePlayer::new();
        let recognizer = MockRecognizer::new();
        let ctx = AssistantContext::new(
            Arc::new(synth.clone()),
            Arc::new(recognizer.clone()),
            Arc::new(nav.clone()),
            Arc::new(cues.clone()),
        );
        let resolver = IntentResolver::new(
            &Default::default(),
            &Default::default(),
            ReplyPicker::seeded(1),
        )
        .with_processing_delay(Duration::ZERO);
        Harness {
            controller: ConversationController::with_resolver(
                &JarvisConfig::default(),
                resolver,
                ctx,
            ),
            synth,
            nav,
            cues,
            recognizer,
        }
    }

    #[tokio::test]
    async fn test_boot_once() {
        let h = harness();
        assert!(h.controller.boot().await);
        assert!(!h.controller.boot().await);

        let messages = h.controller.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, WELCOME_MESSAGE);
        assert_eq!(messages[0].role, MessageRole::Assistant);
        assert_eq!(h.cues.played(), vec![AudioCue::Boot]);
        assert_eq!(h.synth.spoken(), vec![WELCOME_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_submit_empty_is_noop() {
        let h = harness();
        for input in ["", "   ", "\t\n"] {
            let outcome = h.controller.submit(input).await;
            assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::Empty));
        }
        assert!(h.controller.messages().is_empty());
        assert!(h.cues.played().is_empty());
        assert!(!h.controller.is_busy());
    }

    #[tokio::test]
    async fn test_submit_appends_user_then_assistant() {
        let h = harness();
        let outcome = h.controller.submit("  open github  ").await;
        let result = outcome.result().unwrap();
        assert_eq!(result.intent, Intent::Deploy);

        let messages = h.controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].text, "open github");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(messages[0].id < messages[1].id);

        assert_eq!(h.synth.spoken(), vec![result.text.clone()]);
        assert_eq!(h.cues.played(), vec![AudioCue::Wake]);
        assert_eq!(
            h.controller.pending_deploy().unwrap().url,
            "https://github.com"
        );
        assert!(!h.controller.is_busy());
        assert!(!h.controller.is_speaking());
        assert_eq!(h.controller.phase(), CyclePhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_hides_protocols() {
        let h = harness();
        assert!(h.controller.toggle_protocols());
        h.controller.submit("hello").await;
        assert!(!h.controller.ui_state().protocols_visible);
    }

    #[tokio::test]
    async fn test_open_tool_opens_workbench() {
        let h = harness();
        let outcome = h.controller.submit("OPEN TOOL").await;
        assert_eq!(outcome.result().unwrap().intent, Intent::OpenTool);
        assert!(h.controller.ui_state().workbench_open);
        assert!(h.controller.pending_deploy().is_none());

        let cm = h
            .controller
            .measure(Point::new(0.0, 0.0), Point::new(96.0, 0.0))
            .unwrap();
        assert!((cm - 2.54).abs() < 1e-6);
        assert_eq!(h.controller.workbench_reading().unwrap(), "2.54 CM");

        h.controller.close_workbench();
        assert!(!h.controller.ui_state().workbench_open);
        assert!(h
            .controller
            .measure(Point::new(0.0, 0.0), Point::new(1.0, 0.0))
            .is_none());
    }

    #[tokio::test]
    async fn test_confirm_deploy_navigates_once() {
        let h = harness();
        h.controller.submit("open youtube").await;

        let url = h.controller.confirm_deploy().await;
        assert_eq!(url.as_deref(), Some("https://www.youtube.com"));
        assert!(h.controller.confirm_deploy().await.is_none());
        assert_eq!(h.nav.opened(), vec!["https://www.youtube.com".to_string()]);

        let last = h.controller.messages().pop().unwrap();
        assert_eq!(
            last.text,
            "Node www.youtube.com deployed. Intelligence returning to local enclave."
        );
        let spoken = h.synth.spoken();
        assert!(ReplyCategory::Completed.contains(spoken.last().unwrap()));
        assert_eq!(h.cues.played(), vec![AudioCue::Wake, AudioCue::Deploy]);
    }

    #[tokio::test]
    async fn test_confirm_without_pending_is_noop() {
        let h = harness();
        assert!(h.controller.confirm_deploy().await.is_none());
        assert!(h.controller.messages().is_empty());
        assert!(h.nav.opened().is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_deploy() {
        let h = harness();
        h.controller.submit("github").await;
        assert!(h.controller.dismiss_deploy());
        assert!(!h.controller.dismiss_deploy());
        assert!(h.controller.confirm_deploy().await.is_none());
        assert!(h.nav.opened().is_empty());
    }

    #[test]
    fn test_propose_rejects_non_web_urls() {
        let h = harness();
        let err = h.controller.propose_deploy("file:///etc/passwd").unwrap_err();
        assert!(matches!(err, ChatError::InvalidUrl(_)));
        assert!(h.controller.pending_deploy().is_none());
    }

    #[tokio::test]
    async fn test_run_protocol() {
        let h = harness();
        let outcome = h.controller.run_protocol("hello").await.unwrap();
        let text = &outcome.result().unwrap().text;
        assert!(ReplyCategory::Greeting.contains(text));
        assert_eq!(h.controller.messages()[0].text, "HI JARVIS");

        assert!(h.controller.run_protocol("warp").await.is_none());
    }

    #[test]
    fn test_toggle_listening() {
        let h = harness();
        assert!(h.controller.toggle_protocols());
        assert!(h.controller.toggle_listening());
        assert!(h.controller.is_listening());
        assert!(h.recognizer.is_active());
        assert!(!h.controller.ui_state().protocols_visible);
        assert_eq!(h.controller.voice_gauge(), 95.0);

        assert!(!h.controller.toggle_listening());
        assert!(!h.recognizer.is_active());
        assert_eq!(h.controller.voice_gauge(), 5.0);
    }

    #[test]
    fn test_listen_while_capture_active_is_logged_not_surfaced() {
        let h = harness();
        h.recognizer.start().unwrap();
        assert!(h.controller.toggle_listening());
        assert!(h.controller.is_listening());
        assert_eq!(h.recognizer.start_count(), 1);
    }

    #[tokio::test]
    async fn test_capture_transcript_submits() {
        let h = harness();
        h.controller.toggle_listening();
        let outcome = h
            .controller
            .handle_capture_event(CaptureEvent::Transcript("what time is it".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome.result().unwrap().intent, Intent::Info);
        assert!(!h.controller.is_listening());
        assert!(!h.recognizer.is_active());
    }

    #[tokio::test]
    async fn test_capture_error_and_end_stop_listening() {
        let h = harness();
        for event in [CaptureEvent::Error("no-speech".to_string()), CaptureEvent::Ended] {
            h.controller.toggle_listening();
            assert!(h.controller.handle_capture_event(event).await.is_none());
            assert!(!h.controller.is_listening());
        }
        assert!(h.controller.messages().is_empty());
        assert_eq!(
            h.cues.played(),
            vec![AudioCue::Wake, AudioCue::Error, AudioCue::Wake]
        );
    }

    #[tokio::test]
    async fn test_failed_navigation_plays_error_cue() {
        let cues = MockCuePlayer::new();
        let ctx = AssistantContext::headless()
            .with_navigator(Arc::new(MockNavigator::failing()))
            .with_cues(Arc::new(cues.clone()));
        let mut config = JarvisConfig::default();
        config.resolver.processing_delay_ms = 0;
        let controller = ConversationController::new(&config, ctx);
        controller.submit("github").await;

        let url = controller.confirm_deploy().await;
        assert_eq!(url.as_deref(), Some("https://github.com"));
        assert_eq!(
            cues.played(),
            vec![AudioCue::Wake, AudioCue::Deploy, AudioCue::Error]
        );
    }

    #[tokio::test]
    async fn test_non_web_search_base_leaves_nothing_pending() {
        let synth = MockSynthesizer::new();
        let ctx = AssistantContext::headless().with_synthesizer(Arc::new(synth.clone()));
        let mut config = JarvisConfig::default();
        config.resolver.search_base_url = "ftp://mirror.example/find?q=".to_string();
        config.resolver.processing_delay_ms = 0;
        let controller = ConversationController::new(&config, ctx);

        // The reply still offers a deploy, but the URL is refused.
        let outcome = controller.submit("search rust lifetimes").await;
        let result = outcome.result().unwrap();
        assert_eq!(result.intent, Intent::Deploy);
        assert!(result.url.as_deref().unwrap().starts_with("ftp://"));
        assert!(controller.pending_deploy().is_none());
        assert!(controller.confirm_deploy().await.is_none());
    }

    #[test]
    fn test_submit_gate_follows_phase() {
        let h = harness();
        h.controller.loading.store(true, Ordering::SeqCst);
        assert!(!h.controller.phase().accepts_input());
        h.controller.loading.store(false, Ordering::SeqCst);
        assert!(h.controller.phase().accepts_input());
    }

    #[tokio::test]
    async fn test_voice_disabled_skips_playback() {
        let synth = MockSynthesizer::new();
        let ctx = AssistantContext::headless().with_synthesizer(Arc::new(synth.clone()));
        let mut config = JarvisConfig::default();
        config.voice.enabled = false;
        config.resolver.processing_delay_ms = 0;
        let controller = ConversationController::new(&config, ctx);

        assert!(controller.submit("hello").await.is_accepted());
        assert!(synth.spoken().is_empty());
        assert_eq!(controller.messages().len(), 2);
    }

    #[test]
    fn test_keyboard_hides_protocols() {
        let h = harness();
        h.controller.toggle_protocols();
        assert!(h.controller.toggle_keyboard());
        let ui = h.controller.ui_state();
        assert!(ui.keyboard_visible);
        assert!(!ui.protocols_visible);
    }

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::Busy.to_string(), "busy");
        assert_eq!(RejectReason::Empty.to_string(), "empty input");
    }
}
