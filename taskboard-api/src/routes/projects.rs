/// Project endpoints
///
/// Every handler works on the caller's own projects only. A project owned by
/// someone else answers exactly like a missing one.
///
/// # Endpoints
///
/// - `POST   /api/v1/projects` - Create a project
/// - `GET    /api/v1/projects` - List own projects, newest first
/// - `PUT    /api/v1/projects/:project_id` - Replace a project
/// - `DELETE /api/v1/projects/:project_id` - Delete a project (tasks remain)

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
    extract::{trimmed, trimmed_opt, ApiPath, ValidatedJson},
};
use axum::extract::State;
use serde::Deserialize;
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::project::{Project, ProjectInput, ProjectStatus},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Create/replace request
///
/// PUT sends the whole document: omitted `description` and `status` fall
/// back to their defaults.
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

impl From<ProjectRequest> for ProjectInput {
    fn from(req: ProjectRequest) -> Self {
        ProjectInput {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
        }
    }
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<ProjectRequest>,
) -> ApiResult<Envelope<Project>> {
    let project = Project::create(&state.db, auth.user.id, req.into()).await?;

    info!(user_id = %auth.user.id, project_id = %project.id, "Project created");

    Ok(Envelope::created(project, "Project created successfully"))
}

pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Envelope<Vec<Project>>> {
    let projects = Project::list_by_user(&state.db, auth.user.id).await?;

    Ok(Envelope::ok(projects, "Project fetched successfully"))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(project_id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<ProjectRequest>,
) -> ApiResult<Envelope<Project>> {
    let project = Project::replace_owned(&state.db, project_id, auth.user.id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    info!(user_id = %auth.user.id, project_id = %project.id, "Project updated");

    Ok(Envelope::ok(project, "Project updated successfully"))
}

pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Envelope<()>> {
    if !Project::delete_owned(&state.db, project_id, auth.user.id).await? {
        return Err(ApiError::NotFound(
            "Project not found or already deleted".to_string(),
        ));
    }

    info!(user_id = %auth.user.id, %project_id, "Project deleted");

    Ok(Envelope::message("Project deleted"))
}
