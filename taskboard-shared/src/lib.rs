//! # Taskboard Shared Library
//!
//! Domain types and data access used by the Taskboard API server and its
//! tooling.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects and tasks with their SQL
//! - `auth`: Password hashing, bearer tokens and the authentication middleware
//! - `pagination`: Page/limit windows over ordered listings
//! - `db`: Connection pool, migrations and demo seed data

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
