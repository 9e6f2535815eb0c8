//! In-memory store for meals and users.
//!
//! Backs `STORE=memory` and the test suite. Every operation holds the
//! collection's mutex for its whole read-check-write, which gives the same
//! guarantees as the conditional updates and unique constraint on the
//! Postgres side.

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    error::StoreError,
    meals::{
        repo::MealStore,
        repo_types::{Meal, NewMeal},
    },
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
};

/// Records are kept in creation order; listings walk them backwards.
#[derive(Default)]
pub struct MemoryStore {
    meals: Mutex<Vec<Meal>>,
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn list_newest_first(&self) -> Result<Vec<Meal>, StoreError> {
        Ok(self.meals.lock().iter().rev().cloned().collect())
    }

    async fn insert(&self, meal: NewMeal) -> Result<Meal, StoreError> {
        let meal = meal.into_meal(Uuid::new_v4(), OffsetDateTime::now_utc());
        self.meals.lock().push(meal.clone());
        Ok(meal)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.meals.lock().iter().any(|m| m.id == id))
    }

    async fn take_serving(&self, id: Uuid) -> Result<Option<Meal>, StoreError> {
        let mut meals = self.meals.lock();
        let Some(meal) = meals.iter_mut().find(|m| m.id == id && m.servings_left > 0) else {
            return Ok(None);
        };
        meal.servings_left -= 1;
        meal.updated_at = OffsetDateTime::now_utc();
        Ok(Some(meal.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_newest_first(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().iter().rev().cloned().collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        let user = user.into_user(Uuid::new_v4(), OffsetDateTime::now_utc());
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::Role;

    fn new_meal(servings_left: i32) -> NewMeal {
        NewMeal {
            title: "Tamales".into(),
            description: String::new(),
            chef: String::new(),
            chef_bio: String::new(),
            dorm: String::new(),
            dish_matters: String::new(),
            image: None,
            tags: vec![],
            price: 4.0,
            servings: 2,
            servings_left,
            origin_key: None,
            lat: None,
            lng: None,
            rating: 5.0,
            orders: 0,
        }
    }

    #[tokio::test]
    async fn take_serving_stops_at_zero() {
        let store = MemoryStore::default();
        let meal = MealStore::insert(&store, new_meal(1)).await.unwrap();

        let taken = store.take_serving(meal.id).await.unwrap().unwrap();
        assert_eq!(taken.servings_left, 0);
        assert!(taken.updated_at >= meal.updated_at);

        assert!(store.take_serving(meal.id).await.unwrap().is_none());
        assert!(store.exists(meal.id).await.unwrap());
        assert!(store.take_serving(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_insert() {
        let store = MemoryStore::default();
        let user = NewUser {
            name: "Ana".into(),
            email: "ana@campus.edu".into(),
            phone: None,
            dorm: "West".into(),
            bio: None,
            dietary: vec![],
            role: Role::Seller,
        };
        UserStore::insert(&store, user.clone()).await.unwrap();
        let err = UserStore::insert(&store, user).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }
}
