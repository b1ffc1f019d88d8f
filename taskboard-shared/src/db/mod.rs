/// Database layer
///
/// # Modules
///
/// - `pool`: Connection pool creation, health checks and shutdown
/// - `migrations`: Embedded schema migrations
/// - `seed`: Demo account with sample projects and tasks
///
/// Models live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
pub mod seed;
