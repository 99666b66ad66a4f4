//! DealerDash Rust Client Core
//!
//! The client core for a role-based dealership-management dashboard:
//! session store, role/route registry, authorization guard, navigation
//! shell and the generic CRUD resource client the dashboard pages are
//! built on. The presentation layer renders only what these components
//! decide.

pub mod config;
pub mod error;

use reqwest::Client;
use std::sync::Arc;
use url::Url;

use crate::config::ClientOptions;
use crate::error::Error;

pub use dealerdash_resource as resource;
pub use dealerdash_routing as routing;
pub use dealerdash_session as session;

use dealerdash_resource::ResourceClient;
use dealerdash_routing::{default_registry, visible_entries, AccessGuard, NavEntry, RouteRegistry};
use dealerdash_session::{FileStorage, MemoryStorage, SessionStorage, SessionStore};

/// The main entry point for the DealerDash client
///
/// Owns the shared HTTP client, the session store and the route
/// registry, and hands out the guard, the navigation view and the
/// resource client built on top of them. The session is never reachable
/// as ambient global state; everything receives it from here.
pub struct DealerDash {
    /// The base URL of the backend host
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    session: Arc<SessionStore>,
    registry: Arc<RouteRegistry>,
}

impl DealerDash {
    /// Create a new DealerDash client
    ///
    /// # Example
    ///
    /// ```
    /// use dealerdash_rust::DealerDash;
    ///
    /// let client = DealerDash::new("https://dms.example.com").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new DealerDash client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use dealerdash_rust::{config::ClientOptions, DealerDash};
    ///
    /// let options = ClientOptions::default().with_session_file("/tmp/dealerdash-session.json");
    /// let client = DealerDash::new_with_options("https://dms.example.com", options).unwrap();
    /// ```
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Result<Self, Error> {
        // Validate the base URL early; everything downstream assumes it
        let url = Url::parse(base_url)?;

        let storage: Box<dyn SessionStorage> = match &options.session_file {
            Some(path) => Box::new(FileStorage::new(path)),
            None => Box::new(MemoryStorage::new()),
        };

        Ok(Self {
            url: url.as_str().trim_end_matches('/').to_string(),
            http_client: Client::new(),
            options,
            session: Arc::new(SessionStore::new(storage)),
            registry: Arc::new(default_registry()),
        })
    }

    /// Restore the persisted session, if any
    ///
    /// Call once at startup. A failed or corrupt read degrades to
    /// "unauthenticated"; it never fails the shell.
    pub fn hydrate(&self) {
        self.session.hydrate();
    }

    /// The session store
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The route registry
    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    /// Create an authorization guard over the current session and registry
    pub fn guard(&self) -> AccessGuard {
        AccessGuard::new(Arc::clone(&self.registry), Arc::clone(&self.session))
    }

    /// The menu entries visible to the current session's role
    pub fn navigation(&self) -> Vec<NavEntry> {
        visible_entries(&self.registry, self.session.role())
    }

    /// Create a resource client for CRUD calls against the backend
    pub fn resources(&self) -> ResourceClient {
        let base = format!("{}/{}", self.url, self.options.api_prefix);
        ResourceClient::new(&base, Arc::clone(&self.session), self.http_client.clone())
            .with_timeout(self.options.request_timeout)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::DealerDash;
    pub use dealerdash_resource::{Resource, ResourceError, ViewScope};
    pub use dealerdash_routing::{RouteDecision, Role};
    pub use dealerdash_session::{Identity, SessionEvent};
}
