//! JARVIS console binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the assistant context (console voice and cues, typed capture, browser)
//! 4. Start the telemetry ticker
//! 5. Run the interactive loop until `/quit` or end of input

mod cli;
mod command;
mod console;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use jarvis_chat::{
    AssistantContext, CaptureEvent, ConversationController, CuePlayer, SilentCuePlayer,
    SilentSynthesizer, SpeechSynthesizer, SubmitOutcome, SystemBrowser, SystemStats,
    QUICK_ACTIONS,
};
use jarvis_core::config::JarvisConfig;
use jarvis_core::types::MessageRole;
use jarvis_intent::{IntentResolver, ReplyPicker};

use cli::CliArgs;
use command::{ConsoleCommand, HELP};
use console::{console_voices, ConsoleCuePlayer, ConsoleSynthesizer, TypedRecognizer};

const TELEMETRY_INTERVAL: Duration = Duration::from_secs(2);

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_controller(args: &CliArgs, config: &JarvisConfig) -> ConversationController {
    let (synthesizer, cues): (Arc<dyn SpeechSynthesizer>, Arc<dyn CuePlayer>) = if args.mute {
        (Arc::new(SilentSynthesizer), Arc::new(SilentCuePlayer))
    } else {
        (
            Arc::new(ConsoleSynthesizer::new(config.voice.clone(), &console_voices())),
            Arc::new(ConsoleCuePlayer),
        )
    };
    let ctx = AssistantContext::new(
        synthesizer,
        Arc::new(TypedRecognizer::new()),
        Arc::new(SystemBrowser),
        cues,
    );

    let replies = match args.seed {
        Some(seed) => ReplyPicker::seeded(seed),
        None => ReplyPicker::from_os_rng(),
    };
    let resolver = IntentResolver::new(&config.resolver, &config.general, replies);
    ConversationController::with_resolver(config, resolver, ctx)
}

fn spawn_telemetry(stats: Arc<Mutex<SystemStats>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TELEMETRY_INTERVAL);
        loop {
            interval.tick().await;
            stats
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .tick(&mut rand::rng());
        }
    })
}

/// Print log entries appended since `printed`.
fn print_new_messages(controller: &ConversationController, printed: &mut usize) {
    let messages = controller.messages();
    for message in messages.iter().skip(*printed) {
        if message.role != MessageRole::User {
            println!("JARVIS> {}", message.text);
        }
    }
    *printed = messages.len();
}

fn print_status(controller: &ConversationController) {
    if let Some(pending) = controller.pending_deploy() {
        println!("  [deploy pending: {}] /deploy to confirm, /dismiss to cancel", pending.url);
    }
    let ui = controller.ui_state();
    if ui.protocols_visible {
        for action in QUICK_ACTIONS.iter() {
            println!("  [{}] {}", action.label, action.command);
        }
    }
    if ui.keyboard_visible {
        println!("  [keyboard open]");
    }
    if ui.workbench_open {
        let reading = controller
            .workbench_reading()
            .unwrap_or_else(|| "0.00 CM".to_string());
        println!("  [workbench {reading}] /measure x1 y1 x2 y2, /close");
    }
}

fn report_outcome(outcome: &SubmitOutcome) {
    if let SubmitOutcome::Rejected(reason) = outcome {
        tracing::debug!(reason = %reason, "Input dropped");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config, then tracing at the resolved level.
    let config_file = args.resolve_config_path();
    let loaded = JarvisConfig::load(&config_file);
    let level = args.resolve_log_level(
        loaded
            .as_ref()
            .ok()
            .map(|config| config.general.log_level.as_str()),
    );
    init_tracing(&level);
    tracing::info!("Starting JARVIS v{}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Err(e) => {
            tracing::warn!(
                path = %config_file.display(),
                error = %e,
                "Failed to load config, using defaults"
            );
            JarvisConfig::default()
        }
    };

    if args.write_config {
        config.save(&config_file)?;
        println!("wrote {}", config_file.display());
        return Ok(());
    }

    let controller = build_controller(&args, &config);
    let stats = Arc::new(Mutex::new(SystemStats::default()));
    let telemetry = spawn_telemetry(Arc::clone(&stats));

    let mut printed = 0;
    controller.boot().await;
    print_new_messages(&controller, &mut printed);
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = ConsoleCommand::parse(&line);

        // While a listening session is open, the typed line is the capture result.
        if controller.is_listening() {
            if let ConsoleCommand::Say(text) = &command {
                let event = if text.is_empty() {
                    CaptureEvent::Ended
                } else {
                    CaptureEvent::Transcript(text.clone())
                };
                if let Some(outcome) = controller.handle_capture_event(event).await {
                    report_outcome(&outcome);
                }
                print_new_messages(&controller, &mut printed);
                print_status(&controller);
                continue;
            }
        }

        match command {
            ConsoleCommand::Say(text) => {
                report_outcome(&controller.submit(&text).await);
            }
            ConsoleCommand::Deploy => {
                if controller.confirm_deploy().await.is_none() {
                    println!("  (nothing to deploy)");
                }
            }
            ConsoleCommand::Dismiss => {
                controller.dismiss_deploy();
            }
            ConsoleCommand::Protocols => {
                controller.toggle_protocols();
            }
            ConsoleCommand::Run(label) => match controller.run_protocol(&label).await {
                Some(outcome) => report_outcome(&outcome),
                None => println!("  (unknown protocol: {label})"),
            },
            ConsoleCommand::Listen => {
                controller.toggle_listening();
            }
            ConsoleCommand::Keyboard => {
                controller.toggle_keyboard();
            }
            ConsoleCommand::Measure(from, to) => match controller.measure(from, to) {
                Some(cm) => println!("  {cm:.2} CM"),
                None => println!("  (workbench closed; say \"open tool\")"),
            },
            ConsoleCommand::Close => controller.close_workbench(),
            ConsoleCommand::Stats => {
                let snapshot = *stats.lock().unwrap_or_else(PoisonError::into_inner);
                println!(
                    "  CPU {:.0}%  MEM {:.1}%  NET {:.2}  AI {:.0}%  VOICE {:.0}%",
                    snapshot.cpu,
                    snapshot.memory,
                    snapshot.network,
                    snapshot.ai_load,
                    controller.voice_gauge()
                );
            }
            ConsoleCommand::History => {
                println!("{}", serde_json::to_string_pretty(&controller.messages())?);
            }
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Invalid(hint) => println!("  {hint}"),
            ConsoleCommand::Quit => break,
        }

        print_new_messages(&controller, &mut printed);
        print_status(&controller);
    }

    telemetry.abort();
    tracing::info!(session_id = %controller.session_id(), "Session closed");
    Ok(())
}
