use crate::configs::{AgentOs, Browser};
use std::sync::Arc;

/// Errors returned while loading the catalog or generating a user-agent.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The catalog document could not be decoded at all.
    #[error("failed to decode the version catalog: {0}")]
    CatalogDecode(#[source] Arc<serde_yaml::Error>),
    /// The catalog has no entry for the browser and os pair.
    #[error("no catalog entry for {browser} on {os}")]
    NotFound {
        /// The requested browser.
        browser: Browser,
        /// The requested operating system.
        os: AgentOs,
    },
    /// The entry exists but no version is within the requested bounds.
    #[error("no {browser} version on {os} matches the requested bounds")]
    NoMatch {
        /// The requested browser.
        browser: Browser,
        /// The requested operating system.
        os: AgentOs,
    },
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::CatalogDecode(Arc::new(err))
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
