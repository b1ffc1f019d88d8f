//! Demo data for local development
//!
//! Recreates a known account with two projects and a handful of tasks so a
//! fresh database can be explored straight away. Everything happens in one
//! transaction: a failure leaves the previous demo data untouched.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::auth::password::{hash_password, PasswordError};
use crate::models::{
    project::{Project, ProjectInput, ProjectStatus},
    task::{Task, TaskInput, TaskStatus},
    user::{CreateUser, User},
};

pub const DEMO_NAME: &str = "Test User";
pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "Test@123";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// What a seeding run removed and created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub replaced_existing_user: bool,
    pub projects_created: usize,
    pub tasks_created: usize,
}

/// Deletes the demo user with its projects and tasks, then recreates them
pub async fn seed_demo_data(pool: &PgPool) -> Result<SeedSummary, SeedError> {
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let mut tx = pool.begin().await?;

    let existing = User::find_by_email(&mut *tx, DEMO_EMAIL).await?;
    let replaced_existing_user = existing.is_some();

    if let Some(user) = existing {
        let project_ids = Project::ids_by_user(&mut *tx, user.id).await?;
        let tasks_removed = Task::delete_by_projects(&mut *tx, &project_ids).await?;
        User::delete(&mut *tx, user.id).await?;

        info!(
            projects_removed = project_ids.len(),
            tasks_removed,
            "Cleared existing demo user"
        );
    }

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: DEMO_NAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            password_hash,
        },
    )
    .await?;

    let projects = [
        ("Project Alpha", "Alpha Desc", ProjectStatus::Active),
        ("Project Beta", "Beta Desc", ProjectStatus::Completed),
    ];
    let statuses = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    let mut tasks_created = 0;
    for (title, description, status) in projects {
        let project = Project::create(
            &mut *tx,
            user.id,
            ProjectInput {
                title: title.to_string(),
                description: Some(description.to_string()),
                status,
            },
        )
        .await?;

        for (i, status) in statuses.iter().enumerate() {
            let n = i + 1;
            Task::create(
                &mut *tx,
                project.id,
                TaskInput {
                    title: format!("Task {n}"),
                    description: Some(format!("Task number {n}")),
                    status: *status,
                    due_date: Some(Utc::now() + Duration::days(n as i64 * 7)),
                },
            )
            .await?;
            tasks_created += 1;
        }
    }

    tx.commit().await?;

    let summary = SeedSummary {
        replaced_existing_user,
        projects_created: projects.len(),
        tasks_created,
    };
    info!(?summary, email = DEMO_EMAIL, "Demo data seeded");

    Ok(summary)
}
