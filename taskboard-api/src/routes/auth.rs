/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Create an account and get a token
/// - `POST /api/v1/auth/login` - Exchange credentials for a token
///
/// Both respond with the same payload:
///
/// ```json
/// {
///   "status": "success",
///   "data": { "token": "eyJ...", "user": { "_id": "uuid", "name": "...", "email": "..." } },
///   "message": "User signed in successfully"
/// }
/// ```

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
    extract::{trimmed, ValidatedJson},
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::password,
    models::user::{normalize_email, CreateUser, User},
};
use tracing::{info, warn};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,

    /// Email address
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        email(message = "Please fill a valid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Plaintext password
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        email(message = "Please fill a valid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus the account it belongs to
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Runs an Argon2 operation on the blocking thread pool
async fn run_argon2<T, F>(op: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, password::PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::InternalError(format!("Password task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Register a new user
///
/// The password is hashed first. The duplicate check, insert and token
/// issue then share one transaction. If
/// two registrations for the same email race, the unique constraint turns
/// the loser into a 409 as well.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Envelope<AuthResponse>> {
    let email = normalize_email(&req.email);

    let plaintext = req.password;
    let password_hash = run_argon2(move || password::hash_password(&plaintext)).await?;

    let mut tx = state.db.begin().await?;

    if User::email_exists(&mut *tx, &email).await? {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: req.name,
            email,
            password_hash,
        },
    )
    .await?;

    let token = state.jwt().issue(user.id)?;

    tx.commit().await?;

    info!(user_id = %user.id, "User registered");

    Ok(Envelope::created(
        AuthResponse { token, user },
        "User created successfully",
    ))
}

/// Login endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No account with that email
/// - `401 Unauthorized`: Wrong password
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Envelope<AuthResponse>> {
    let email = normalize_email(&req.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let plaintext = req.password;
    let stored = user.password_hash.clone();
    if !run_argon2(move || password::verify_password(&plaintext, &stored)).await? {
        warn!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    let token = state.jwt().issue(user.id)?;

    info!(user_id = %user.id, "User signed in");

    Ok(Envelope::ok(
        AuthResponse { token, user },
        "User signed in successfully",
    ))
}
