use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            _ => Err(()),
        }
    }
}

/// Raw `users` row; `role` is TEXT constrained to `buyer`/`seller`.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dorm: String,
    pub bio: Option<String>,
    pub dietary: Vec<String>,
    pub role: String,
    pub ratings: f64,
    pub created_at: OffsetDateTime,
}

/// A registered user as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,           // trimmed + lowercased, unique
    pub phone: Option<String>,
    pub dorm: String,
    pub bio: Option<String>,
    pub dietary: Vec<String>,
    pub role: Role,
    pub ratings: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dorm: String,
    pub bio: Option<String>,
    pub dietary: Vec<String>,
    pub role: Role,
}

impl TryFrom<UserRow> for User {
    type Error = sqlx::Error;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let role = r
            .role
            .parse()
            .map_err(|_| sqlx::Error::Decode(format!("unknown role {:?}", r.role).into()))?;
        Ok(Self {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            dorm: r.dorm,
            bio: r.bio,
            dietary: r.dietary,
            role,
            ratings: r.ratings,
            created_at: r.created_at,
        })
    }
}

impl NewUser {
    pub fn into_user(self, id: Uuid, now: OffsetDateTime) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            dorm: self.dorm,
            bio: self.bio,
            dietary: self.dietary,
            role: self.role,
            ratings: 0.0,
            created_at: now,
        }
    }
}
