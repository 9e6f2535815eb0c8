use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::{
    error::AppError,
    users::repo_types::{NewUser, Role},
};

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dorm: Option<String>,
    pub bio: Option<String>,
    pub dietary: Option<Vec<String>>,
    pub role: Option<String>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let (Some(name), Some(email), Some(dorm), Some(role)) = (
            non_blank(self.name),
            non_blank(self.email),
            non_blank(self.dorm),
            non_blank(self.role),
        ) else {
            return Err(AppError::Invalid(
                "Missing required fields: name, email, dorm, role".into(),
            ));
        };

        let email = email.to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::Invalid("Invalid email".into()));
        }

        let role: Role = role
            .parse()
            .map_err(|_| AppError::Invalid("role must be one of: buyer, seller".into()))?;

        Ok(NewUser {
            name,
            email,
            phone: non_blank(self.phone),
            dorm,
            bio: non_blank(self.bio),
            dietary: self
                .dietary
                .unwrap_or_default()
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            role,
        })
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
