use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    users::{dto::RegisterRequest, repo::UserStore, repo_types::User},
};

pub async fn register(store: &dyn UserStore, req: RegisterRequest) -> AppResult<User> {
    let new_user = req.validate()?;

    // Ensure email is not taken; the unique constraint still catches racing inserts.
    if store.find_by_email(&new_user.email).await?.is_some() {
        warn!(email = %new_user.email, "email already registered");
        return Err(AppError::Conflict("User with this email already exists".into()));
    }

    let user = store.insert(new_user).await?;
    info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok(user)
}

pub async fn get_user(store: &dyn UserStore, raw_id: &str) -> AppResult<User> {
    let not_found = || AppError::NotFound("User not found".into());
    let id = Uuid::parse_str(raw_id.trim()).map_err(|_| not_found())?;
    store.find(id).await?.ok_or_else(not_found)
}
