//! Shared helpers for database-backed tests
//!
//! Tests that need PostgreSQL call [`test_pool`] and return early when
//! `DATABASE_URL` is not set.

#![allow(dead_code)]

use sqlx::PgPool;
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::db::migrations::{ensure_database_exists, run_migrations};
use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
use taskboard_shared::models::user::{CreateUser, User};
use uuid::Uuid;

pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}

/// Migrated pool, or `None` when no database is configured
pub async fn test_pool() -> Option<PgPool> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    ensure_database_exists(&url).await.expect("Failed to ensure database exists");

    let pool = create_pool(DatabaseConfig {
        max_connections: 5,
        ..DatabaseConfig::from_url(url)
    })
    .await
    .expect("Failed to create pool");

    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

/// Inserts a user with a unique email
pub async fn create_test_user(pool: &PgPool) -> User {
    User::create(
        pool,
        CreateUser {
            name: "Test User".to_string(),
            email: format!("user-{}@example.com", Uuid::new_v4()),
            password_hash: hash_password("password123").expect("Failed to hash password"),
        },
    )
    .await
    .expect("Failed to create user")
}
