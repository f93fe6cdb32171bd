//! Intent resolution for the assistant.
//!
//! Maps a free-text utterance to a reply, an intent tag and, for deploy
//! intents, the external URL awaiting confirmation. Matching is ordered and
//! substring-based: the first rule that fires wins.

pub mod replies;
pub mod resolver;
pub mod search;
pub mod types;

pub use replies::{ReplyCategory, ReplyPicker};
pub use resolver::IntentResolver;
pub use types::{Intent, ResolverResult};
