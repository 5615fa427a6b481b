//! Page data loaders for the app shell.
//!
//! The visual rendering lives in the client; these handlers carry the
//! per-page server logic: view-model data, membership checks, and the
//! dashboard's default-workspace provisioning and redirect rules.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::{
    error::{get_db_conn, ApiError, ApiResult},
    handlers::projects::member_workspace,
    handlers::waitlist::remaining_spots,
    handlers::workspaces::{workspace_summaries, WorkspaceSummary},
    middleware::session::CurrentUser,
    models::{Project, Workspace},
    provision,
    schema::{projects, workspace_members},
    slug::slugify,
    AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct LandingView {
    pub early_spots_remaining: i64,
}

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPageView {
    /// Where the auth provider should send the user after completion.
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardingView {
    #[schema(example = "Jane's workspace")]
    pub suggested_name: String,
    #[schema(example = "jane")]
    pub suggested_slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    pub email: String,
    pub workspaces: Vec<WorkspaceSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkspaceOverview {
    pub workspace: Workspace,
    #[schema(example = "OWNER")]
    pub role: String,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewProjectView {
    pub workspace: Workspace,
}

pub async fn landing(State(state): State<AppState>) -> ApiResult<Json<LandingView>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let early_spots_remaining =
        remaining_spots(&mut conn, state.waitlist.capacity).map_err(|_| ApiError::db_error())?;

    Ok(Json(LandingView {
        early_spots_remaining,
    }))
}

pub async fn login_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPageView> {
    Json(AuthPageView {
        redirect: query.redirect,
    })
}

pub async fn signup_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPageView> {
    Json(AuthPageView {
        redirect: query.redirect,
    })
}

pub async fn onboarding(Extension(user): Extension<CurrentUser>) -> Json<OnboardingView> {
    let base = provision::default_workspace_base(user.name.as_deref(), &user.email);

    Json(OnboardingView {
        suggested_name: format!("{}'s workspace", base),
        suggested_slug: slugify(&base),
    })
}

/// Dashboard entry point.
///
/// New users get a default workspace provisioned on first visit and land on
/// its new-project page; users with exactly one workspace go straight to it;
/// everyone else gets the workspace picker.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let summaries = workspace_summaries(&mut conn, user.id).map_err(|e| {
        error!(error = %e, "Failed to fetch workspaces");
        ApiError::db_error()
    })?;

    if summaries.is_empty() {
        let workspace = provision::ensure_default_workspace(
            &mut conn,
            user.id,
            user.name.as_deref(),
            &user.email,
        )
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "Failed to provision default workspace");
            ApiError::internal("Failed to create workspace", "PROVISION_FAILED")
        })?;

        info!(
            workspace_id = %workspace.id,
            slug = %workspace.slug,
            user_id = %user.id,
            "Provisioned default workspace"
        );

        return Ok(
            Redirect::temporary(&format!("/{}/projects/new", workspace.slug)).into_response(),
        );
    }

    if summaries.len() == 1 {
        return Ok(Redirect::temporary(&format!("/{}", summaries[0].slug)).into_response());
    }

    Ok(Json(DashboardView {
        email: user.email,
        workspaces: summaries,
    })
    .into_response())
}

pub async fn workspace_overview(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(workspace_slug): Path<String>,
) -> ApiResult<Json<WorkspaceOverview>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let workspace = member_workspace(&mut conn, &workspace_slug, user.id)
        .map_err(|_| ApiError::db_error())?
        .ok_or_else(|| ApiError::not_found("Workspace not found", "WORKSPACE_NOT_FOUND"))?;

    let role: String = workspace_members::table
        .filter(workspace_members::workspace_id.eq(workspace.id))
        .filter(workspace_members::user_id.eq(user.id))
        .select(workspace_members::role)
        .first(&mut conn)
        .map_err(|_| ApiError::db_error())?;

    let projects: Vec<Project> = projects::table
        .filter(projects::workspace_id.eq(workspace.id))
        .order(projects::created_at.desc())
        .select(Project::as_select())
        .load(&mut conn)
        .map_err(|_| ApiError::db_error())?;

    Ok(Json(WorkspaceOverview {
        workspace,
        role,
        projects,
    }))
}

pub async fn new_project_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(workspace_slug): Path<String>,
) -> ApiResult<Json<NewProjectView>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let workspace = member_workspace(&mut conn, &workspace_slug, user.id)
        .map_err(|_| ApiError::db_error())?
        .ok_or_else(|| ApiError::not_found("Workspace not found", "WORKSPACE_NOT_FOUND"))?;

    Ok(Json(NewProjectView { workspace }))
}
