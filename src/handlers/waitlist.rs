//! Waitlist signup handlers.

use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{get_db_conn, ApiError, ApiResult},
    models::NewWaitlistEntry,
    schema::waitlist_entries,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinWaitlistRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    #[schema(example = "you@example.com")]
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinWaitlistResponse {
    #[schema(example = "you@example.com")]
    pub email: String,
    pub already_joined: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistSpotsResponse {
    #[schema(example = 37)]
    pub remaining: i64,
}

#[utoipa::path(
    post,
    path = "/api/waitlist",
    tag = "Waitlist",
    request_body = JoinWaitlistRequest,
    responses(
        (status = 201, description = "Joined the waitlist", body = JoinWaitlistResponse),
        (status = 200, description = "Email was already on the waitlist", body = JoinWaitlistResponse),
        (status = 400, description = "Invalid email address", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn join_waitlist(
    State(state): State<AppState>,
    Json(payload): Json<JoinWaitlistRequest>,
) -> ApiResult<(StatusCode, Json<JoinWaitlistResponse>)> {
    if payload.validate().is_err() {
        return Err(ApiError::bad_request(
            "Please enter a valid email address",
            "INVALID_EMAIL",
        ));
    }

    let email = payload.email.trim().to_lowercase();
    let mut conn = get_db_conn(&state.db_pool)?;

    // Joining twice is a no-op, same as re-adding a contact to the audience.
    let inserted = diesel::insert_into(waitlist_entries::table)
        .values(&NewWaitlistEntry {
            email: email.clone(),
        })
        .on_conflict(waitlist_entries::email)
        .do_nothing()
        .execute(&mut conn)
        .map_err(|e| {
            error!(error = %e, "Failed to add waitlist entry");
            ApiError::internal("Something went wrong. Please try again.", "WAITLIST_FAILED")
        })?;

    if inserted == 0 {
        return Ok((
            StatusCode::OK,
            Json(JoinWaitlistResponse {
                email,
                already_joined: true,
            }),
        ));
    }

    info!(email = %email, "Joined waitlist");

    // Welcome mail is best effort; the signup already stuck.
    if let Some(provider) = &state.email {
        if let Err(e) = provider
            .send_waitlist_welcome(
                &email,
                &state.waitlist.from_address,
                state.waitlist.from_name.as_deref(),
            )
            .await
        {
            warn!(error = %e, email = %email, "Failed to send waitlist welcome email");
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(JoinWaitlistResponse {
            email,
            already_joined: false,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/waitlist/spots",
    tag = "Waitlist",
    responses(
        (status = 200, description = "Early-access spots still open", body = WaitlistSpotsResponse),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
pub async fn early_spots(
    State(state): State<AppState>,
) -> ApiResult<Json<WaitlistSpotsResponse>> {
    let mut conn = get_db_conn(&state.db_pool)?;

    let remaining =
        remaining_spots(&mut conn, state.waitlist.capacity).map_err(|_| ApiError::db_error())?;

    Ok(Json(WaitlistSpotsResponse { remaining }))
}

pub(crate) fn remaining_spots(conn: &mut PgConnection, capacity: i64) -> QueryResult<i64> {
    let joined: i64 = waitlist_entries::table.count().get_result(conn)?;
    Ok(spots_left(capacity, joined))
}

fn spots_left(capacity: i64, joined: i64) -> i64 {
    (capacity - joined).max(0)
}
