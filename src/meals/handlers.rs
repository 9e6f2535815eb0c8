use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    meals::{
        dto::CreateMealRequest,
        origin::{Origin, ORIGINS},
        repo_types::Meal,
        services,
    },
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/:id/reserve", patch(reserve_meal))
        .route("/origins", get(list_origins))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> AppResult<Json<Vec<Meal>>> {
    let meals = services::list_meals(state.meals.as_ref()).await?;
    Ok(Json(meals))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    let Json(req) = payload.map_err(|e| AppError::Invalid(e.body_text()))?;
    let meal = services::create_meal(state.meals.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state))]
pub async fn reserve_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Meal>> {
    let id = services::parse_meal_id(&id)?;
    let meal = services::reserve(state.meals.as_ref(), id).await?;
    Ok(Json(meal))
}

pub async fn list_origins() -> Json<&'static [Origin]> {
    Json(ORIGINS)
}
