use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    meals::{dto::CreateMealRequest, repo::MealStore, repo_types::Meal},
};

/// Parses a path id; anything that is not a UUID cannot name a meal.
pub fn parse_meal_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound("Meal not found".into()))
}

pub async fn list_meals(store: &dyn MealStore) -> AppResult<Vec<Meal>> {
    Ok(store.list_newest_first().await?)
}

pub async fn create_meal(store: &dyn MealStore, req: CreateMealRequest) -> AppResult<Meal> {
    let new_meal = req.validate()?;
    if new_meal.origin_key.is_none() {
        debug!("meal posted without a known origin");
    }
    let meal = store.insert(new_meal).await?;
    info!(meal_id = %meal.id, servings = meal.servings, "meal created");
    Ok(meal)
}

/// Claims one serving of a meal.
///
/// The decrement is a single conditional store update, so at most one caller
/// wins each remaining serving. When nothing was updated, an existence probe
/// tells `NotFound` from `SoldOut`; meals are never deleted, so the probe
/// cannot misclassify.
pub async fn reserve(store: &dyn MealStore, id: Uuid) -> AppResult<Meal> {
    if let Some(meal) = store.take_serving(id).await? {
        info!(meal_id = %id, servings_left = meal.servings_left, "serving reserved");
        return Ok(meal);
    }
    if store.exists(id).await? {
        warn!(meal_id = %id, "reservation rejected: sold out");
        Err(AppError::SoldOut)
    } else {
        warn!(meal_id = %id, "reservation rejected: meal not found");
        Err(AppError::NotFound("Meal not found".into()))
    }
}
