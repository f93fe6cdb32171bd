//! CLI argument definitions for the console assistant.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// JARVIS: an offline keyword assistant for the terminal.
#[derive(Parser, Debug)]
#[command(name = "jarvis", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Do not echo spoken lines or play audio cues.
    #[arg(long = "mute")]
    pub mute: bool,

    /// Seed for reply selection, for reproducible sessions.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long = "write-config")]
    pub write_config: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > JARVIS_CONFIG env var > ~/.jarvis/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("JARVIS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value > `info`.
    pub fn resolve_log_level(&self, config_level: Option<&str>) -> String {
        self.log_level
            .as_deref()
            .or(config_level)
            .filter(|level| !level.trim().is_empty())
            .unwrap_or("info")
            .to_string()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".jarvis").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".jarvis").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["jarvis", "--config", "/tmp/j.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/j.toml"));
    }

    #[test]
    fn test_default_path_ends_in_jarvis_dir() {
        let args = CliArgs::parse_from(["jarvis"]);
        if std::env::var("JARVIS_CONFIG").is_err() {
            let path = args.resolve_config_path();
            assert!(path.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_log_level_priority() {
        let args = CliArgs::parse_from(["jarvis", "-l", "debug"]);
        assert_eq!(args.resolve_log_level(Some("warn")), "debug");

        let args = CliArgs::parse_from(["jarvis"]);
        assert_eq!(args.resolve_log_level(Some("warn")), "warn");
        assert_eq!(args.resolve_log_level(None), "info");
        assert_eq!(args.resolve_log_level(Some("  ")), "info");
    }

    #[test]
    fn test_flags() {
        let args = CliArgs::parse_from(["jarvis", "--mute", "--seed", "42"]);
        assert!(args.mute);
        assert_eq!(args.seed, Some(42));
        assert!(!args.write_config);
    }
}
