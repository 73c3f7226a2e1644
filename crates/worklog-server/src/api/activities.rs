use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use worklog_core::models::activity::{ActivityFilter, ActivitySummary, Session};
use worklog_core::repository::{ActivityRepository, IdentityResolver, UserRepository};

use super::{ApiError, AppState};
use crate::params::parse_window_time;

pub(super) fn routes<A, U, I>() -> Router<AppState<A, U, I>>
where
    A: ActivityRepository + 'static,
    U: UserRepository + 'static,
    I: IdentityResolver + 'static,
{
    Router::new()
        .route(
            "/activities",
            post(start_activity::<A, U, I>).patch(finish_activity::<A, U, I>),
        )
        .route("/activities/{user_id}", get(summary::<A, U, I>))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRequest {
    user_id: Uuid,
}

#[derive(Serialize)]
struct ActivityResponse {
    message: &'static str,
    session: Session,
}

#[derive(Deserialize)]
struct WindowQuery {
    start_time: Option<String>,
    end_time: Option<String>,
}

async fn start_activity<A, U, I>(
    State(state): State<AppState<A, U, I>>,
    Json(body): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>, ApiError>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    // Sessions only ever belong to onboarded users.
    state.users.get_user(body.user_id).await?;
    let session = state.activity.start(body.user_id).await?;
    Ok(Json(ActivityResponse {
        message: "activity started",
        session,
    }))
}

async fn finish_activity<A, U, I>(
    State(state): State<AppState<A, U, I>>,
    Json(body): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>, ApiError>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    let session = state.activity.stop(body.user_id).await?;
    Ok(Json(ActivityResponse {
        message: "activity finished",
        session,
    }))
}

async fn summary<A, U, I>(
    State(state): State<AppState<A, U, I>>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<ActivitySummary>, ApiError>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    let mut filter = ActivityFilter::for_user(user_id);
    if let Some(raw) = q.start_time.filter(|s| !s.is_empty()) {
        filter = filter.starting_from(parse_window_time("start_time", &raw)?);
    }
    if let Some(raw) = q.end_time.filter(|s| !s.is_empty()) {
        filter = filter.ending_by(parse_window_time("end_time", &raw)?);
    }

    Ok(Json(state.activity.summary(&filter).await?))
}
