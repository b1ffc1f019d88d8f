/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Liveness and database probe
/// - `auth`: Registration and login
/// - `projects`: Owner-scoped project CRUD
/// - `tasks`: Task CRUD nested under a project

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
