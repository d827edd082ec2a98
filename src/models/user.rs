use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "laki-laki")]
    Male,
    #[serde(rename = "perempuan")]
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub birthdate: Option<NaiveDate>,
    pub place_of_birth: Option<String>,
    pub image: Option<String>,
    pub gender: Option<Gender>,
    pub class_name: Option<String>,
    pub role: Role,
    pub nisn: Option<String>,
    pub nis: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public profile returned by the user listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserRef {
    pub fn from_user(user: Option<&User>) -> Self {
        Self {
            id: user.map(|user| user.id),
            name: user.map(|user| user.name.clone()),
            email: user.map(|user| user.email.clone()),
        }
    }
}
