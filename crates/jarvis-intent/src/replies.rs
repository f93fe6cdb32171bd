//! Canned reply pools and the random source that picks from them.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const PREPARING: [&str; 3] = [
    "Local core intelligence analyzed the request. Standing by for online deployment, Sir.",
    "Protocol processed via local enclave. Awaiting your authorization to bridge to the web.",
    "Intelligence is local, but the data you seek is external. Ready to deploy the browser node.",
];

const COMPLETED: [&str; 3] = [
    "External node synchronized. Connection is stable.",
    "Deployment successful. Returning to local secure mode, Sir.",
    "Link established. I'm keeping our local core shielded.",
];

const GREETING: [&str; 3] = [
    "Local Neural Enclave is active and offline, Sir. How can I assist?",
    "Systems reporting nominal. Intelligence is strictly local. Ready for commands.",
    "Secure Link established. Your data is staying on-site today, Sir.",
];

const UNKNOWN: [&str; 3] = [
    "That specific command isn't in my local logic cache, Sir.",
    "I've scanned the local database. No matching protocol found for that request.",
    "Command analyzed. My offline brain seems to be missing that specific routine.",
];

/// Outcome category keying a reply pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyCategory {
    /// A deploy URL is ready and awaits confirmation.
    Preparing,
    /// Spoken after a confirmed deploy.
    Completed,
    Greeting,
    Unknown,
}

impl ReplyCategory {
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            ReplyCategory::Preparing => &PREPARING,
            ReplyCategory::Completed => &COMPLETED,
            ReplyCategory::Greeting => &GREETING,
            ReplyCategory::Unknown => &UNKNOWN,
        }
    }

    /// Whether `text` is one of this category's variants.
    pub fn contains(self, text: &str) -> bool {
        self.pool().contains(&text)
    }
}

/// Uniform reply selection over an injectable random source.
///
/// Seed it with [`ReplyPicker::seeded`] to pin selections in tests.
pub struct ReplyPicker {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Default for ReplyPicker {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl std::fmt::Debug for ReplyPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyPicker").finish_non_exhaustive()
    }
}

impl ReplyPicker {
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Pick one variant uniformly from the category's pool.
    pub fn pick(&self, category: ReplyCategory) -> &'static str {
        let pool = category.pool();
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        pool[rng.random_range(0..pool.len())]
    }
}
