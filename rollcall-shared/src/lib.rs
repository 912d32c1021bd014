//! # Rollcall Shared Library
//!
//! Domain types, access control and business logic for the Rollcall school
//! administration service. The HTTP server in `rollcall-api` is a thin layer
//! over [`services::SchoolService`].
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, session tokens, caller identity, access control
//! - `models`: database rows and their queries
//! - `db`: connection pool and migrations
//! - `store`: the persistence trait with PostgreSQL and in-memory backends
//! - `services`: provisioning, profile workflow, dashboards, login

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Rollcall shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
