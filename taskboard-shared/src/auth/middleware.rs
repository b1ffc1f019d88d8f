/// Bearer-token authentication middleware for Axum
///
/// Reads `Authorization: Bearer <token>`, validates the token, loads the
/// user it names and stores an [`AuthContext`] in the request extensions.
/// Handlers behind the middleware take `AuthContext` as an extractor.
///
/// # Failure responses
///
/// | Condition                                 | Status | Message                    |
/// |-------------------------------------------|--------|----------------------------|
/// | Header missing or not a Bearer credential | 401    | `Not authorized, no token` |
/// | Bad signature, expired, foreign issuer    | 401    | `Invalid token`            |
/// | Token names a user that no longer exists  | 401    | `User not found`           |
/// | Database failure during lookup            | 500    | `Internal server error`    |
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use taskboard_shared::auth::jwt::JwtConfig;
/// use taskboard_shared::auth::middleware::{require_user, AuthContext, AuthState};
/// use sqlx::PgPool;
///
/// async fn me(auth: AuthContext) -> String {
///     auth.user.name
/// }
///
/// fn router(pool: PgPool, jwt: JwtConfig) -> Router {
///     Router::new()
///         .route("/me", get(me))
///         .layer(middleware::from_fn_with_state(AuthState { pool, jwt }, require_user))
/// }
/// ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::jwt::JwtConfig;
use crate::models::user::User;

/// State the middleware needs
#[derive(Clone)]
pub struct AuthState {
    pub pool: PgPool,
    pub jwt: JwtConfig,
}

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Current user as loaded from the database
    pub user: User,
}

/// Error type for authentication middleware
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable Bearer credential on the request
    #[error("Not authorized, no token")]
    MissingCredentials,

    /// Token failed validation
    #[error("Invalid token")]
    InvalidToken,

    /// Token was valid but its user is gone
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Internal server error")]
    DatabaseError(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::DatabaseError(ref details) = self {
            tracing::error!(error = %details, "Database error during authentication");
        }

        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });

        (self.status_code(), Json(body)).into_response()
    }
}

/// Extracts the token from a `Bearer` authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// Middleware that requires a valid token for an existing user
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_user(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = state.jwt.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AuthError::InvalidToken
    })?;

    let user = User::find_by_id(&state.pool, claims.user_id)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UserNotFound)?;

    req.extensions_mut().insert(AuthContext { user });

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}
