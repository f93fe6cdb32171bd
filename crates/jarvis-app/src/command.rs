//! Console input: slash commands and plain text.

use jarvis_workbench::Point;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Plain text to submit (or to hand over as a transcript while listening).
    Say(String),
    Deploy,
    Dismiss,
    Protocols,
    Run(String),
    Listen,
    Keyboard,
    Measure(Point, Point),
    Close,
    Stats,
    History,
    Help,
    Quit,
    /// A slash command that could not be understood, with a usage hint.
    Invalid(String),
}

pub const HELP: &str = "\
commands:
  <text>                   talk to the assistant
  /deploy                  confirm the pending deploy
  /dismiss                 dismiss the pending deploy
  /protocols               show or hide quick protocols
  /run <LABEL>             run a quick protocol
  /listen                  start or stop a listening session
  /keyboard                show or hide the keyboard panel
  /measure x1 y1 x2 y2     measure on the open workbench
  /close                   close the workbench
  /stats                   system gauges
  /history                 full message log (JSON)
  /quit                    exit";

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return ConsoleCommand::Say(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("").to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match (name.as_str(), args.as_slice()) {
            ("deploy", []) => ConsoleCommand::Deploy,
            ("dismiss", []) => ConsoleCommand::Dismiss,
            ("protocols", []) => ConsoleCommand::Protocols,
            ("run", [label]) => ConsoleCommand::Run(label.to_string()),
            ("run", _) => ConsoleCommand::Invalid("usage: /run <LABEL>".to_string()),
            ("listen", []) => ConsoleCommand::Listen,
            ("keyboard", []) => ConsoleCommand::Keyboard,
            ("measure", coords) => parse_measure(coords),
            ("close", []) => ConsoleCommand::Close,
            ("stats", []) => ConsoleCommand::Stats,
            ("history", []) => ConsoleCommand::History,
            ("help", _) => ConsoleCommand::Help,
            ("quit" | "exit", []) => ConsoleCommand::Quit,
            _ => ConsoleCommand::Invalid(format!("unknown command: /{name} (try /help)")),
        }
    }
}

fn parse_measure(coords: &[&str]) -> ConsoleCommand {
    let usage = || ConsoleCommand::Invalid("usage: /measure x1 y1 x2 y2".to_string());
    if coords.len() != 4 {
        return usage();
    }
    let parsed: Result<Vec<f64>, _> = coords.iter().map(|c| c.parse::<f64>()).collect();
    match parsed.as_deref() {
        Ok([x1, y1, x2, y2]) => {
            ConsoleCommand::Measure(Point::new(*x1, *y1), Point::new(*x2, *y2))
        }
        _ => usage(),
    }
}
