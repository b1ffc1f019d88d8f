/// Middleware modules for the API server
///
/// Authentication lives in `taskboard_shared::auth::middleware`; this module
/// holds the HTTP-level layers.
///
/// - `security`: Security response headers

pub mod security;
