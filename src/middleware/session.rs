//! Session middleware.
//!
//! Sessions are issued by the external auth provider and stored in the
//! `sessions` table; this middleware only resolves the session cookie to a
//! user. The API variant rejects with 401 JSON, the page variant redirects
//! to the login page the way the original page loaders do.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::gate::LOGIN_PATH;
use crate::schema::{sessions, users};
use crate::AppState;

/// The user a valid session cookie resolved to, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// Extracts the named cookie's value from the `Cookie` header.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

fn load_current_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = session_token(headers, &state.session_cookie)?;

    let mut conn = match state.db_pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "Database connection error while resolving session");
            return None;
        }
    };

    let row: Option<(Uuid, String, Option<String>)> = sessions::table
        .inner_join(users::table)
        .filter(sessions::token.eq(&token))
        .filter(sessions::expires_at.gt(Utc::now().naive_utc()))
        .select((users::id, users::email, users::name))
        .first(&mut conn)
        .optional()
        .unwrap_or_else(|e| {
            error!(error = %e, "Session lookup failed");
            None
        });

    row.map(|(id, email, name)| CurrentUser { id, email, name })
}

/// Resolves the session for `/api` routes; missing or invalid sessions get
/// a 401 JSON response.
pub async fn require_session_api(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let user = load_current_user(&state, req.headers()).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized", "code": "UNAUTHORIZED"})),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Resolves the session for page data loaders; failures redirect to the
/// login page. The gate has already bounced requests with no cookie at all,
/// so this catches cookies that don't resolve to a live session.
pub async fn require_session_page(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let user = load_current_user(&state, req.headers())
        .ok_or_else(|| Redirect::temporary(LOGIN_PATH).into_response())?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
