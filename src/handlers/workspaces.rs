//! Workspace management handlers.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDateTime;
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{get_db_conn, ApiError, ApiResult},
    middleware::session::CurrentUser,
    models::Workspace,
    provision::{self, ProvisionError},
    schema::{projects, workspace_members, workspaces},
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWorkspaceRequest {
    #[schema(example = "Acme Inc")]
    #[serde(default)]
    pub name: String,
    #[schema(example = "acme-inc")]
    #[serde(default)]
    pub slug: String,
}

/// A workspace as seen by one of its members.
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkspaceSummary {
    pub id: Uuid,
    #[schema(example = "Acme Inc")]
    pub name: String,
    #[schema(example = "acme-inc")]
    pub slug: String,
    pub created_at: NaiveDateTime,
    #[schema(example = "OWNER")]
    pub role: String,
    pub project_count: i64,
    pub member_count: i64,
}

#[utoipa::path(
    post,
    path = "/api/workspaces",
    tag = "Workspaces",
    request_body = CreateWorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = Workspace),
        (status = 400, description = "Missing fields", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Slug already taken", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    security(("session_cookie" = []))
)]
pub async fn create_workspace(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let name = payload.name.trim();
    let slug = payload.slug.trim();

    if name.is_empty() || slug.is_empty() {
        return Err(ApiError::bad_request(
            "Name and slug are required",
            "MISSING_FIELDS",
        ));
    }

    let mut conn = get_db_conn(&state.db_pool)?;

    let workspace =
        provision::create_workspace(&mut conn, user.id, name, slug).map_err(|e| match e {
            ProvisionError::SlugTaken => ApiError::conflict(
                "This workspace URL is already taken",
                "SLUG_TAKEN",
            ),
            ProvisionError::Database(e) => {
                error!(error = %e, "Failed to create workspace");
                ApiError::internal("Failed to create workspace", "CREATE_FAILED")
            }
        })?;

    info!(
        workspace_id = %workspace.id,
        slug = %workspace.slug,
        owner_id = %user.id,
        "Created workspace"
    );

    Ok((StatusCode::CREATED, Json(workspace)))
}

#[utoipa::path(
    get,
    path = "/api/workspaces",
    tag = "Workspaces",
    responses(
        (status = 200, description = "The caller's workspaces, newest first", body = [WorkspaceSummary]),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    security(("session_cookie" = []))
)]
pub async fn list_workspaces(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<WorkspaceSummary>>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let summaries = workspace_summaries(&mut conn, user.id).map_err(|e| {
        error!(error = %e, "Failed to fetch workspaces");
        ApiError::db_error()
    })?;

    Ok(Json(summaries))
}

/// Loads the workspaces a user is a member of, with their role and the
/// project/member counts, newest first. Also used by the dashboard loader.
pub(crate) fn workspace_summaries(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<Vec<WorkspaceSummary>> {
    let rows: Vec<(Workspace, String)> = workspaces::table
        .inner_join(workspace_members::table)
        .filter(workspace_members::user_id.eq(user_id))
        .order(workspaces::created_at.desc())
        .select((Workspace::as_select(), workspace_members::role))
        .load(conn)?;

    let ids: Vec<Uuid> = rows.iter().map(|(workspace, _)| workspace.id).collect();

    let project_counts: HashMap<Uuid, i64> = projects::table
        .filter(projects::workspace_id.eq_any(&ids))
        .group_by(projects::workspace_id)
        .select((projects::workspace_id, count_star()))
        .load::<(Uuid, i64)>(conn)?
        .into_iter()
        .collect();

    let member_counts: HashMap<Uuid, i64> = workspace_members::table
        .filter(workspace_members::workspace_id.eq_any(&ids))
        .group_by(workspace_members::workspace_id)
        .select((workspace_members::workspace_id, count_star()))
        .load::<(Uuid, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(rows
        .into_iter()
        .map(|(workspace, role)| WorkspaceSummary {
            project_count: project_counts.get(&workspace.id).copied().unwrap_or(0),
            member_count: member_counts.get(&workspace.id).copied().unwrap_or(0),
            id: workspace.id,
            name: workspace.name,
            slug: workspace.slug,
            created_at: workspace.created_at,
            role,
        })
        .collect())
}
