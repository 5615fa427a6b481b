//! Access gate middleware for page routes.
//!
//! Applies [`crate::gate::decide`] to every page request. Authentication
//! state here is just "session cookie present"; cookies that turn out to be
//! stale are handled by the session middleware behind the gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::gate::{self, GateDecision};
use crate::middleware::session::session_token;
use crate::AppState;

pub async fn gate_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // Static assets and other dotted paths are outside the gate.
    if path.contains('.') {
        return next.run(req).await;
    }

    let authenticated = session_token(req.headers(), &state.session_cookie).is_some();

    match gate::decide(authenticated, &path) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::RedirectToLogin { redirect } => {
            Redirect::temporary(&gate::login_location(&redirect)).into_response()
        }
        GateDecision::RedirectToDashboard => {
            Redirect::temporary(gate::DASHBOARD_PATH).into_response()
        }
    }
}
