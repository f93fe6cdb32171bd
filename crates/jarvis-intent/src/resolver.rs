//! Ordered keyword rules mapping an utterance to a [`ResolverResult`].
//!
//! Rules are checked in a fixed order over the case-folded, trimmed input and
//! the first one that fires wins:
//!
//! 1. strip a leading `show me `
//! 2. `youtube` -> deploy to YouTube
//! 3. `google` / `search` / raw input starting with `show me` -> web search
//! 4. `github` -> deploy to GitHub
//! 5. `measure` / `tool` / `workbench` -> open the measuring overlay
//! 6. `time` -> current time of day
//! 7. `hello` / `hi` / assistant name -> greeting
//! 8. anything else -> unknown

use std::time::Duration;

use chrono::{DateTime, Local};
use jarvis_core::config::{GeneralConfig, ResolverConfig};
use jarvis_core::types::format_time_of_day;

use crate::replies::{ReplyCategory, ReplyPicker};
use crate::search::{build_search_url, extract_search_term};
use crate::types::{Intent, ResolverResult};

pub const YOUTUBE_URL: &str = "https://www.youtube.com";
pub const GITHUB_URL: &str = "https://github.com";

const SHOW_ME_PREFIX: &str = "show me ";
const SEARCH_KEYWORDS: [&str; 2] = ["google", "search"];
const TOOL_KEYWORDS: [&str; 3] = ["measure", "tool", "workbench"];
const GREETING_KEYWORDS: [&str; 2] = ["hello", "hi"];

const TOOL_REPLY: &str = "Initializing local workbench. All measurement data is kept private, Sir.";

/// Keyword-rule intent resolver.
#[derive(Debug)]
pub struct IntentResolver {
    search_base_url: String,
    default_search_term: String,
    assistant_name: String,
    processing_delay: Duration,
    replies: ReplyPicker,
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new(
            &ResolverConfig::default(),
            &GeneralConfig::default(),
            ReplyPicker::default(),
        )
    }
}

impl IntentResolver {
    pub fn new(config: &ResolverConfig, general: &GeneralConfig, replies: ReplyPicker) -> Self {
        Self {
            search_base_url: config.search_base_url.clone(),
            default_search_term: config.default_search_term.clone(),
            assistant_name: general.assistant_name.trim().to_lowercase(),
            processing_delay: Duration::from_millis(config.processing_delay_ms),
            replies,
        }
    }

    /// Override the simulated processing delay.
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    pub fn processing_delay(&self) -> Duration {
        self.processing_delay
    }

    /// Pick a reply from one of the canned pools.
    pub fn reply(&self, category: ReplyCategory) -> &'static str {
        self.replies.pick(category)
    }

    /// Resolve after the simulated processing delay.
    pub async fn respond(&self, utterance: &str) -> ResolverResult {
        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }
        self.resolve(utterance)
    }

    /// Resolve against the current wall-clock time.
    pub fn resolve(&self, utterance: &str) -> ResolverResult {
        self.resolve_at(utterance, Local::now())
    }

    /// Resolve with an explicit clock reading for the time rule.
    pub fn resolve_at(&self, utterance: &str, now: DateTime<Local>) -> ResolverResult {
        let folded = utterance.to_lowercase();
        let mut query = folded.trim();
        if let Some(rest) = query.strip_prefix(SHOW_ME_PREFIX) {
            query = rest.trim();
        }

        let result = if query.contains("youtube") {
            self.deploy(YOUTUBE_URL)
        } else if contains_any(query, &SEARCH_KEYWORDS) || folded.starts_with("show me") {
            self.search(query)
        } else if query.contains("github") {
            self.deploy(GITHUB_URL)
        } else if contains_any(query, &TOOL_KEYWORDS) {
            ResolverResult::reply(Intent::OpenTool, TOOL_REPLY)
        } else if query.contains("time") {
            ResolverResult::reply(
                Intent::Info,
                format!("My internal clock shows exactly {}.", format_time_of_day(&now)),
            )
        } else if contains_any(query, &GREETING_KEYWORDS) || self.names_assistant(query) {
            ResolverResult::reply(Intent::Info, self.reply(ReplyCategory::Greeting))
        } else {
            ResolverResult::reply(Intent::Unknown, self.reply(ReplyCategory::Unknown))
        };

        tracing::debug!(intent = %result.intent, url = ?result.url, "Utterance resolved");
        result
    }

    fn deploy(&self, url: &str) -> ResolverResult {
        ResolverResult::deploy(self.reply(ReplyCategory::Preparing), url)
    }

    fn search(&self, query: &str) -> ResolverResult {
        let term = extract_search_term(query);
        match term.as_str() {
            "youtube" => self.deploy(YOUTUBE_URL),
            "github" => self.deploy(GITHUB_URL),
            _ => {
                let url =
                    build_search_url(&self.search_base_url, &term, &self.default_search_term);
                self.deploy(&url)
            }
        }
    }

    fn names_assistant(&self, query: &str) -> bool {
        !self.assistant_name.is_empty() && query.contains(self.assistant_name.as_str())
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
