//! OpenAPI documentation configuration.
//!
//! Generates the OpenAPI specification with `utoipa` and serves it via
//! Swagger UI.

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use crate::handlers::health::{
    ComponentStatus, HealthResponse, ReadinessChecks, ReadinessResponse,
};
use crate::handlers::projects::CreateProjectRequest;
use crate::handlers::waitlist::{JoinWaitlistRequest, JoinWaitlistResponse, WaitlistSpotsResponse};
use crate::handlers::workspaces::{CreateWorkspaceRequest, WorkspaceSummary};
use crate::models::{Project, Workspace};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Anteroom API",
        version = "1.0.0",
        description = "Backend for the Anteroom pre-launch landing page and workspace dashboard.\n\n\
        ## Authentication\n\
        Sessions are issued by the external auth provider and carried in the \
        session cookie; protected endpoints answer 401 without one. Page \
        routes are gated separately and redirect to `/login` instead.\n\n\
        ## Workspaces\n\
        A workspace is the tenant boundary: members with roles, and projects \
        identified by a domain that is unique within the workspace.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Waitlist", description = "Pre-launch waitlist signup"),
        (name = "Workspaces", description = "Workspace management"),
        (name = "Projects", description = "Projects within a workspace")
    ),
    paths(
        crate::handlers::health::health_check_simple,
        crate::handlers::health::health_check,
        crate::handlers::health::ready_check,
        crate::handlers::health::live_check,

        crate::handlers::waitlist::join_waitlist,
        crate::handlers::waitlist::early_spots,

        crate::handlers::workspaces::create_workspace,
        crate::handlers::workspaces::list_workspaces,

        crate::handlers::projects::create_project,
        crate::handlers::projects::list_projects,
    ),
    components(schemas(
        ApiError,
        HealthResponse,
        ReadinessResponse,
        ReadinessChecks,
        ComponentStatus,
        JoinWaitlistRequest,
        JoinWaitlistResponse,
        WaitlistSpotsResponse,
        CreateWorkspaceRequest,
        WorkspaceSummary,
        Workspace,
        CreateProjectRequest,
        Project,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_token"))),
            );
        }

        openapi.security = Some(vec![]);
    }
}

pub fn swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
