use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A meal listing as stored and as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub chef: String,
    pub chef_bio: String,
    pub dorm: String,
    pub dish_matters: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub price: f64,
    pub servings: i32,
    pub servings_left: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub rating: f64,   // display-only
    pub orders: i32,   // display-only
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated meal ready to be persisted; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub title: String,
    pub description: String,
    pub chef: String,
    pub chef_bio: String,
    pub dorm: String,
    pub dish_matters: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub price: f64,
    pub servings: i32,
    pub servings_left: i32,
    pub origin_key: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: f64,
    pub orders: i32,
}

impl NewMeal {
    pub fn into_meal(self, id: Uuid, now: OffsetDateTime) -> Meal {
        Meal {
            id,
            title: self.title,
            description: self.description,
            chef: self.chef,
            chef_bio: self.chef_bio,
            dorm: self.dorm,
            dish_matters: self.dish_matters,
            image: self.image,
            tags: self.tags,
            price: self.price,
            servings: self.servings,
            servings_left: self.servings_left,
            origin_key: self.origin_key,
            lat: self.lat,
            lng: self.lng,
            rating: self.rating,
            orders: self.orders,
            created_at: now,
            updated_at: now,
        }
    }
}
