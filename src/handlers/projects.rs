//! Project management handlers, scoped to a workspace.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{get_db_conn, ApiError, ApiResult},
    middleware::session::CurrentUser,
    models::{NewProject, Project, Workspace},
    schema::{projects, workspace_members, workspaces},
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    #[schema(example = "Marketing site")]
    #[serde(default)]
    pub name: String,
    #[schema(example = "acme.com")]
    #[serde(default)]
    pub domain: String,
}

/// Loads a workspace by slug, but only if the user is a member. Non-members
/// get the same `None` as a missing workspace so existence doesn't leak.
pub(crate) fn member_workspace(
    conn: &mut PgConnection,
    slug: &str,
    user_id: Uuid,
) -> QueryResult<Option<Workspace>> {
    workspaces::table
        .inner_join(workspace_members::table)
        .filter(workspaces::slug.eq(slug))
        .filter(workspace_members::user_id.eq(user_id))
        .select(Workspace::as_select())
        .first(conn)
        .optional()
}

#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_slug}/projects",
    tag = "Projects",
    params(("workspace_slug" = String, Path, description = "Workspace slug")),
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Workspace not found", body = ApiError),
        (status = 409, description = "Domain already used in this workspace", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    security(("session_cookie" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(workspace_slug): Path<String>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let workspace = member_workspace(&mut conn, &workspace_slug, user.id)
        .map_err(|_| ApiError::db_error())?
        .ok_or_else(|| ApiError::not_found("Workspace not found", "WORKSPACE_NOT_FOUND"))?;

    let name = payload.name.trim();
    let domain = payload.domain.trim();

    if name.is_empty() || domain.is_empty() {
        return Err(ApiError::bad_request(
            "Name and domain are required",
            "MISSING_FIELDS",
        ));
    }

    let project: Project = diesel::insert_into(projects::table)
        .values(&NewProject {
            workspace_id: workspace.id,
            name: name.to_string(),
            domain: domain.to_string(),
        })
        .get_result(&mut conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::conflict(
                    "A project with this domain already exists",
                    "DOMAIN_EXISTS",
                )
            }
            other => {
                error!(error = %other, "Failed to create project");
                ApiError::internal("Failed to create project", "CREATE_FAILED")
            }
        })?;

    info!(
        project_id = %project.id,
        workspace_id = %workspace.id,
        domain = %project.domain,
        "Created project"
    );

    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_slug}/projects",
    tag = "Projects",
    params(("workspace_slug" = String, Path, description = "Workspace slug")),
    responses(
        (status = 200, description = "Projects in the workspace, newest first", body = [Project]),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Workspace not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    security(("session_cookie" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(workspace_slug): Path<String>,
) -> ApiResult<Json<Vec<Project>>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let workspace = member_workspace(&mut conn, &workspace_slug, user.id)
        .map_err(|_| ApiError::db_error())?
        .ok_or_else(|| ApiError::not_found("Workspace not found", "WORKSPACE_NOT_FOUND"))?;

    let projects: Vec<Project> = projects::table
        .filter(projects::workspace_id.eq(workspace.id))
        .order(projects::created_at.desc())
        .select(Project::as_select())
        .load(&mut conn)
        .map_err(|_| ApiError::db_error())?;

    Ok(Json(projects))
}
