/// Task model and project-scoped database operations
///
/// Tasks belong to a project. Callers verify project ownership first (see
/// [`Project::find_owned`](super::project::Project::find_owned)); every
/// query here is then filtered by that project id.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in-progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL,
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(500),
///     status task_status NOT NULL DEFAULT 'todo',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `project_id` has no foreign key: deleting a project leaves its tasks
/// behind.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, TaskFilter, TaskInput, TaskStatus};
/// use taskboard_shared::pagination::PageRequest;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// Task::create(&pool, project_id, TaskInput {
///     title: "Write release notes".to_string(),
///     status: TaskStatus::InProgress,
///     ..Default::default()
/// }).await?;
///
/// let page = Task::list_page(
///     &pool,
///     project_id,
///     TaskFilter { status: Some(TaskStatus::InProgress) },
///     PageRequest::new(1, 10)?,
/// ).await?;
/// println!("{} of {} tasks", page.results(), page.total);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::pagination::{Page, PageRequest};

/// Task status
///
/// Any status may be replaced by any other; no transitions are enforced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[sqlx(rename = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    Done,
}

/// Task inside a project
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Parent project
    #[serde(rename = "project")]
    pub project_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    pub status: TaskStatus,

    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Full set of client-writable task fields
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

/// Listing filter
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    /// Exact status match when set
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Inserts a task into `project_id`
    pub async fn create<'e, E>(
        executor: E,
        project_id: Uuid,
        data: TaskInput,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, status, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .fetch_one(executor)
        .await
    }

    /// Lists one page of a project's tasks, oldest first
    ///
    /// `total` counts every task matching the filter, not just this page.
    pub async fn list_page(
        pool: &PgPool,
        project_id: Uuid,
        filter: TaskFilter,
        request: PageRequest,
    ) -> Result<Page<Self>, sqlx::Error> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE project_id = $1
              AND ($2::task_status IS NULL OR status = $2)
            "#,
        )
        .bind(project_id)
        .bind(filter.status)
        .fetch_one(pool)
        .await?;

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE project_id = $1
              AND ($2::task_status IS NULL OR status = $2)
            ORDER BY created_at ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(project_id)
        .bind(filter.status)
        .bind(i64::from(request.limit()))
        .bind(request.offset())
        .fetch_all(pool)
        .await?;

        Ok(Page::new(tasks, total, request))
    }

    /// Finds a task only if it belongs to `project_id`
    pub async fn find_in_project<'e, E>(
        executor: E,
        id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(executor)
        .await
    }

    /// Replaces every writable field of a task in `project_id`
    ///
    /// Returns `None` when the task is not part of that project.
    pub async fn replace_in_project<'e, E>(
        executor: E,
        id: Uuid,
        project_id: Uuid,
        data: TaskInput,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3,
                description = $4,
                status = $5,
                due_date = $6,
                updated_at = NOW()
            WHERE id = $1 AND project_id = $2
            RETURNING id, project_id, title, description, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a task in `project_id`; false when nothing matched
    pub async fn delete_in_project<'e, E>(
        executor: E,
        id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts every task row carrying `project_id`, including orphans
    pub async fn count_by_project<'e, E>(executor: E, project_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(executor)
            .await
    }

    /// Deletes every task of the given projects
    pub async fn delete_by_projects<'e, E>(
        executor: E,
        project_ids: &[Uuid],
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = ANY($1)")
            .bind(project_ids)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
