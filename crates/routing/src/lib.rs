//! DealerDash routing: role/route registry, authorization guard and
//! navigation shell
//!
//! The registry is a static, exhaustive declaration of which roles may
//! reach which pages. The guard turns (session, path) into exactly one of
//! loading / granted / redirect-to-login / redirect-to-unauthorized, in
//! that order of checks. The navigation shell derives the visible menu
//! from the same registry; it holds no state of its own.

mod guard;
mod nav;
mod registry;

pub use dealerdash_session::Role;

pub use guard::{AccessGuard, HistoryMode, Redirect, RouteDecision};
pub use nav::{home_path, visible_entries, NavEntry};
pub use registry::{
    default_registry, RegistryError, RouteAccess, RouteEntry, RouteRegistry, LOGIN_PATH,
    UNAUTHORIZED_PATH,
};
