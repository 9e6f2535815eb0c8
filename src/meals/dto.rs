use serde::Deserialize;

use crate::{error::AppError, meals::origin, meals::repo_types::NewMeal};

const DEFAULT_RATING: f64 = 5.0;
const MAX_RATING: f64 = 5.0;

/// Request body for `POST /api/meals`. Client-sent `lat`/`lng` are ignored;
/// coordinates only ever come from the origin table.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMealRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub chef: Option<String>,
    pub chef_bio: Option<String>,
    pub dorm: Option<String>,
    pub dish_matters: Option<String>,
    pub cultural_note: Option<String>, // legacy alias for dish_matters
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub price: Option<f64>,
    pub servings: Option<i32>,
    pub servings_left: Option<i32>,
    pub origin_key: Option<String>,
    pub rating: Option<f64>,
    pub orders: Option<i32>,
}

impl CreateMealRequest {
    pub fn validate(self) -> Result<NewMeal, AppError> {
        let title = non_blank(self.title)
            .ok_or_else(|| AppError::Invalid("title is required".into()))?;

        let price = self
            .price
            .ok_or_else(|| AppError::Invalid("price is required".into()))?;
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::Invalid("price must be a non-negative number".into()));
        }

        let servings = self
            .servings
            .ok_or_else(|| AppError::Invalid("servings is required".into()))?;
        if servings < 1 {
            return Err(AppError::Invalid("servings must be at least 1".into()));
        }

        let servings_left = self.servings_left.unwrap_or(servings);
        if !(0..=servings).contains(&servings_left) {
            return Err(AppError::Invalid(
                "servingsLeft must be between 0 and servings".into(),
            ));
        }

        let rating = self.rating.unwrap_or(DEFAULT_RATING);
        if !(0.0..=MAX_RATING).contains(&rating) {
            return Err(AppError::Invalid("rating must be between 0 and 5".into()));
        }
        let orders = self.orders.unwrap_or(0);
        if orders < 0 {
            return Err(AppError::Invalid("orders must not be negative".into()));
        }

        let dish_matters = non_blank(self.dish_matters)
            .or_else(|| non_blank(self.cultural_note))
            .unwrap_or_default();

        let origin = self.origin_key.as_deref().and_then(origin::resolve);

        Ok(NewMeal {
            title,
            description: self.description.unwrap_or_default(),
            chef: self.chef.unwrap_or_default(),
            chef_bio: self.chef_bio.unwrap_or_default(),
            dorm: self.dorm.unwrap_or_default(),
            dish_matters,
            image: non_blank(self.image),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect(),
            price,
            servings,
            servings_left,
            origin_key: origin.map(|o| o.key.to_string()),
            lat: origin.map(|o| o.lat),
            lng: origin.map(|o| o.lng),
            rating,
            orders,
        })
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
