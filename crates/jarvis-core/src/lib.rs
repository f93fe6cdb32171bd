pub mod config;
pub mod error;
pub mod types;

pub use config::JarvisConfig;
pub use error::{JarvisError, Result};
pub use types::*;
