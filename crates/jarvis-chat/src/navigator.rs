//! External navigation: opening a confirmed deploy URL.

use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::error::ChatError;

/// Opens URLs outside the assistant.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), ChatError>;
}

/// Reject anything that is not a plain `http://` or `https://` URL.
pub fn validate_url(url: &str) -> Result<(), ChatError> {
    if url.is_empty() {
        return Err(ChatError::InvalidUrl("URL must not be empty".to_string()));
    }
    let lower = url.to_ascii_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return Err(ChatError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

fn authority_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // A bracketed IPv6 literal is kept whole, brackets included.
        Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://(?:[^@/?#]*@)?(\[[^\]/?#]*\]|[^:/?#\[]+)")
            .expect("Invalid URL authority regex")
    })
}

/// Hostname portion of a URL, lowercased. Falls back to the input when no
/// authority can be found.
pub fn host_of(url: &str) -> String {
    authority_regex()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| url.to_string())
}

/// Launches the platform's default URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        let mut command = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };
        command
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

#[async_trait]
impl Navigator for SystemBrowser {
    async fn open(&self, url: &str) -> Result<(), ChatError> {
        validate_url(url)?;

        let status = Self::command(url)
            .status()
            .await
            .map_err(|e| ChatError::NavigationFailed(e.to_string()))?;

        if !status.success() {
            return Err(ChatError::NavigationFailed(format!(
                "opener exited with {status}"
            )));
        }

        tracing::info!(url = %url, "Opened URL");
        Ok(())
    }
}
