use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{dto::RegisterRequest, repo_types::User, services},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list_newest_first().await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let Json(req) = payload.map_err(|e| AppError::Invalid(e.body_text()))?;
    let user = services::register(state.users.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = services::get_user(state.users.as_ref(), &id).await?;
    Ok(Json(user))
}
