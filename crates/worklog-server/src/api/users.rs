use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use worklog_core::models::user::{User, UserFilter};
use worklog_core::repository::{
    ActivityRepository, DEFAULT_PAGE_LIMIT, IdentityResolver, Pagination, UserRepository,
};

use super::{ApiError, AppState};
use crate::params::parse_passport;

pub(super) fn routes<A, U, I>() -> Router<AppState<A, U, I>>
where
    A: ActivityRepository + 'static,
    U: UserRepository + 'static,
    I: IdentityResolver + 'static,
{
    Router::new()
        .route("/users", get(list_users::<A, U, I>).post(add_user::<A, U, I>))
        .route("/users/{id}", get(get_user::<A, U, I>))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddUserRequest {
    passport_number: String,
}

#[derive(Serialize)]
struct AddUserResponse {
    user: User,
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<u64>,
    page: Option<u64>,
    surname: Option<String>,
    name: Option<String>,
    patronymic: Option<String>,
    address: Option<String>,
}

#[derive(Serialize)]
struct ListResponse {
    users: Vec<User>,
    count: u64,
}

async fn add_user<A, U, I>(
    State(state): State<AppState<A, U, I>>,
    Json(body): Json<AddUserRequest>,
) -> Result<Json<AddUserResponse>, ApiError>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    let input = parse_passport(&body.passport_number)?;
    let user = state.users.add_user(input).await?;
    Ok(Json(AddUserResponse { user }))
}

async fn get_user<A, U, I>(
    State(state): State<AppState<A, U, I>>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    Ok(Json(state.users.get_user(id).await?))
}

async fn list_users<A, U, I>(
    State(state): State<AppState<A, U, I>>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    let limit = q.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_PAGE_LIMIT);
    let pagination = Pagination::from_page(q.page.unwrap_or(1), limit);
    let filter = UserFilter {
        surname: q.surname,
        name: q.name,
        patronymic: q.patronymic,
        address: q.address,
    };

    let page = state.users.list_users(&filter, pagination).await?;
    Ok(Json(ListResponse {
        users: page.items,
        count: page.total,
    }))
}
