use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{JarvisError, Result};

/// Top-level configuration for the assistant.
///
/// Loaded from `~/.jarvis/config.toml` by default. Every section falls back to
/// its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JarvisConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub workbench: WorkbenchConfig,
}

impl JarvisConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: JarvisConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Reject settings the assistant cannot act on.
    ///
    /// Search results become deploy URLs, so the search base must be a web URL.
    pub fn validate(&self) -> Result<()> {
        let base = self.resolver.search_base_url.to_ascii_lowercase();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(JarvisError::Config(format!(
                "resolver.search_base_url must be an http(s) URL, got: {}",
                self.resolver.search_base_url
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Name the assistant answers to. Lowercase.
    pub assistant_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            assistant_name: "jarvis".to_string(),
        }
    }
}

/// Intent resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Simulated processing delay before a reply is produced.
    pub processing_delay_ms: u64,
    /// Web search prefix; the percent-encoded term is appended.
    pub search_base_url: String,
    /// Term searched for when the utterance leaves nothing after keyword removal.
    pub default_search_term: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 600,
            search_base_url: "https://www.google.com/search?q=".to_string(),
            default_search_term: "Stark Industries".to_string(),
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// When false, playback always reports "unsupported".
    pub enabled: bool,
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
    /// Voice names tried in order (substring match).
    pub preferred_voices: Vec<String>,
    /// Language tag used when no preferred voice is installed.
    pub lang: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pitch: 0.85,
            rate: 1.05,
            volume: 1.0,
            preferred_voices: vec![
                "Daniel".to_string(),
                "Oliver".to_string(),
                "Google UK English Male".to_string(),
            ],
            lang: "en-GB".to_string(),
        }
    }
}

/// Measuring overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Centimeters per screen pixel. 96 DPI by default.
    pub pixels_to_cm: f64,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            pixels_to_cm: 0.0264583333,
        }
    }
}
