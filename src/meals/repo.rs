use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::StoreError,
    meals::repo_types::{Meal, NewMeal},
};

#[async_trait]
pub trait MealStore: Send + Sync {
    /// All meals, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<Meal>, StoreError>;

    async fn insert(&self, meal: NewMeal) -> Result<Meal, StoreError>;

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Takes one serving in a single conditional update.
    /// Returns `None` when the meal is missing or has no servings left.
    async fn take_serving(&self, id: Uuid) -> Result<Option<Meal>, StoreError>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn list_newest_first(&self) -> Result<Vec<Meal>, StoreError> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, title, description, chef, chef_bio, dorm, dish_matters, image, tags,
                   price, servings, servings_left, origin_key, lat, lng, rating, orders,
                   created_at, updated_at
            FROM meals
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, meal: NewMeal) -> Result<Meal, StoreError> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, title, description, chef, chef_bio, dorm, dish_matters, image,
                               tags, price, servings, servings_left, origin_key, lat, lng,
                               rating, orders)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id, title, description, chef, chef_bio, dorm, dish_matters, image, tags,
                      price, servings, servings_left, origin_key, lat, lng, rating, orders,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(meal.title)
        .bind(meal.description)
        .bind(meal.chef)
        .bind(meal.chef_bio)
        .bind(meal.dorm)
        .bind(meal.dish_matters)
        .bind(meal.image)
        .bind(meal.tags)
        .bind(meal.price)
        .bind(meal.servings)
        .bind(meal.servings_left)
        .bind(meal.origin_key)
        .bind(meal.lat)
        .bind(meal.lng)
        .bind(meal.rating)
        .bind(meal.orders)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let found: bool = sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM meals WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(found)
    }

    async fn take_serving(&self, id: Uuid) -> Result<Option<Meal>, StoreError> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
               SET servings_left = servings_left - 1,
                   updated_at = now()
             WHERE id = $1 AND servings_left > 0
            RETURNING id, title, description, chef, chef_bio, dorm, dish_matters, image, tags,
                      price, servings, servings_left, origin_key, lat, lng, rating, orders,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
