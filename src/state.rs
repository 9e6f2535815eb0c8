use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::meals::repo::{MealStore, PgMealStore};
use crate::memory_store::MemoryStore;
use crate::storage::{Storage, StorageClient};
use crate::users::repo::{PgUserStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub meals: Arc<dyn MealStore>,
    pub users: Arc<dyn UserStore>,
    pub storage: Arc<dyn StorageClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let (meals, users): (Arc<dyn MealStore>, Arc<dyn UserStore>) = match &config.store {
            StoreBackend::Postgres { database_url } => {
                let pool = db::connect(database_url, &config.db).await?;
                (
                    Arc::new(PgMealStore::new(pool.clone())) as Arc<dyn MealStore>,
                    Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>,
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                let store = Arc::new(MemoryStore::default());
                (
                    store.clone() as Arc<dyn MealStore>,
                    store as Arc<dyn UserStore>,
                )
            }
        };

        let storage = Arc::new(Storage::connect(&config.media).await) as Arc<dyn StorageClient>;

        Ok(Self::from_parts(meals, users, storage, Arc::new(config)))
    }

    pub fn from_parts(
        meals: Arc<dyn MealStore>,
        users: Arc<dyn UserStore>,
        storage: Arc<dyn StorageClient>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            meals,
            users,
            storage,
            config,
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::in_memory_with_storage(Arc::new(crate::test_support::FakeStorage::default()))
    }

    #[cfg(test)]
    pub fn in_memory_with_storage(storage: Arc<dyn StorageClient>) -> Self {
        let store = Arc::new(MemoryStore::default());
        Self::from_parts(
            store.clone(),
            store,
            storage,
            Arc::new(AppConfig::in_memory()),
        )
    }
}
