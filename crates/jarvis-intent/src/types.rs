//! Resolver output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical action tag produced by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Navigate to an external URL once the user confirms.
    Deploy,
    /// Open the measuring overlay.
    OpenTool,
    /// Informational reply, nothing to act on.
    Info,
    /// No rule matched.
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Deploy => write!(f, "DEPLOY"),
            Intent::OpenTool => write!(f, "OPEN_TOOL"),
            Intent::Info => write!(f, "INFO"),
            Intent::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPLOY" => Ok(Intent::Deploy),
            "OPEN_TOOL" => Ok(Intent::OpenTool),
            "INFO" => Ok(Intent::Info),
            "UNKNOWN" => Ok(Intent::Unknown),
            _ => Err(format!("Unknown intent: {}", s)),
        }
    }
}

/// Result of resolving one utterance. Created fresh per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverResult {
    pub text: String,
    pub intent: Intent,
    /// Present only when `intent` is [`Intent::Deploy`].
    pub url: Option<String>,
}

impl ResolverResult {
    pub fn deploy(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: Intent::Deploy,
            url: Some(url.into()),
        }
    }

    pub fn reply(intent: Intent, text: impl Into<String>) -> Self {
        debug_assert!(intent != Intent::Deploy, "deploy results carry a url");
        Self {
            text: text.into(),
            intent,
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_display_matches_tags() {
        assert_eq!(Intent::Deploy.to_string(), "DEPLOY");
        assert_eq!(Intent::OpenTool.to_string(), "OPEN_TOOL");
        assert_eq!(Intent::Info.to_string(), "INFO");
        assert_eq!(Intent::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_intent_parse() {
        assert_eq!("OPEN_TOOL".parse::<Intent>().unwrap(), Intent::OpenTool);
        assert!("open_tool".parse::<Intent>().is_err());
    }

    #[test]
    fn test_intent_serde_uses_tags() {
        let json = serde_json::to_string(&Intent::OpenTool).unwrap();
        assert_eq!(json, "\"OPEN_TOOL\"");
    }

    #[test]
    fn test_constructors() {
        let r = ResolverResult::deploy("go", "https://github.com");
        assert_eq!(r.intent, Intent::Deploy);
        assert_eq!(r.url.as_deref(), Some("https://github.com"));

        let r = ResolverResult::reply(Intent::Info, "hi");
        assert!(r.url.is_none());
    }
}
