/// Task endpoints, nested under a project
///
/// Each handler first checks that the caller owns the project in the path
/// and answers 404 "Project not found or unauthorized" otherwise. Task
/// queries are then restricted to that project.
///
/// # Endpoints
///
/// - `POST   /api/v1/projects/:project_id/tasks`
/// - `GET    /api/v1/projects/:project_id/tasks?status=&page=&limit=`
/// - `PUT    /api/v1/projects/:project_id/tasks/:task_id`
/// - `DELETE /api/v1/projects/:project_id/tasks/:task_id`

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
    extract::{blank_as_none, date_opt, trimmed, trimmed_opt, ApiPath, ApiQuery, ValidatedJson},
};
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        task::{Task, TaskFilter, TaskInput, TaskStatus},
    },
    pagination::{PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create/replace request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<TaskStatus>,

    /// `YYYY-MM-DD` or RFC 3339 timestamp
    #[serde(default, deserialize_with = "date_opt")]
    pub due_date: Option<DateTime<Utc>>,
}

impl From<TaskRequest> for TaskInput {
    fn from(req: TaskRequest) -> Self {
        TaskInput {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            due_date: req.due_date,
        }
    }
}

/// Listing query string
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Empty means no filter
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<TaskStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListTasksQuery {
    fn page_request(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        )?)
    }
}

async fn owned_project(state: &AppState, project_id: Uuid, auth: &AuthContext) -> ApiResult<Project> {
    Project::find_owned(&state.db, project_id, auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found or unauthorized".to_string()))
}

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(project_id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> ApiResult<Envelope<Task>> {
    let project = owned_project(&state, project_id, &auth).await?;

    let task = Task::create(&state.db, project.id, req.into()).await?;

    info!(project_id = %project.id, task_id = %task.id, "Task created");

    Ok(Envelope::created(task, "Task created successfully"))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ListTasksQuery>,
) -> ApiResult<Envelope<Vec<Task>>> {
    let request = query.page_request()?;
    let project = owned_project(&state, project_id, &auth).await?;

    let page = Task::list_page(
        &state.db,
        project.id,
        TaskFilter {
            status: query.status,
        },
        request,
    )
    .await?;

    Ok(Envelope::paged(page, "Tasks for this project fetched successfully"))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath((project_id, task_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> ApiResult<Envelope<Task>> {
    let project = owned_project(&state, project_id, &auth).await?;

    let task = Task::replace_in_project(&state.db, task_id, project.id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    info!(project_id = %project.id, task_id = %task.id, "Task updated");

    Ok(Envelope::ok(task, "Task updated successfully"))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath((project_id, task_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<Envelope<()>> {
    let project = owned_project(&state, project_id, &auth).await?;

    if !Task::delete_in_project(&state.db, task_id, project.id).await? {
        return Err(ApiError::NotFound(
            "Task not found or already deleted".to_string(),
        ));
    }

    info!(project_id = %project.id, %task_id, "Task deleted");

    Ok(Envelope::message("Task deleted successfully"))
}
