/// Database models
///
/// Each model owns its SQL. Functions accept any `PgExecutor`, so they run
/// equally against the pool or inside a transaction.
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `project`: Projects, each owned by one user
/// - `task`: Tasks inside a project

pub mod project;
pub mod task;
pub mod user;
