use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::StoreError,
    users::repo_types::{NewUser, User, UserRow},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_newest_first(&self) -> Result<Vec<User>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Find a user by (already normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::Duplicate("email")` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn convert(row: Option<UserRow>) -> Result<Option<User>, StoreError> {
    Ok(row.map(User::try_from).transpose()?)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_newest_first(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, phone, dorm, bio, dietary, role, ratings, created_at
            FROM users
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, phone, dorm, bio, dietary, role, ratings, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        convert(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, phone, dorm, bio, dietary, role, ratings, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        convert(row)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, phone, dorm, bio, dietary, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, phone, dorm, bio, dietary, role, ratings, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.dorm)
        .bind(user.bio)
        .bind(user.dietary)
        .bind(user.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::from_insert(e, "email"))?;
        Ok(User::try_from(row)?)
    }
}
