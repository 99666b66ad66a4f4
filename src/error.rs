//! Error handling for the DealerDash client

use std::fmt;
use thiserror::Error;

/// Unified error type for the DealerDash client
#[derive(Error, Debug)]
pub enum Error {
    /// Session store errors
    #[error("Session error: {0}")]
    Session(#[from] dealerdash_session::SessionError),

    /// Route registry configuration errors
    #[error("Routing error: {0}")]
    Routing(#[from] dealerdash_routing::RegistryError),

    /// Resource client errors
    #[error("Resource error: {0}")]
    Resource(#[from] dealerdash_resource::ResourceError),

    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
