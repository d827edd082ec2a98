use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capster {
    pub id: Uuid,
    pub username: String,
    pub phone: String,
    pub description: String,
    pub avatar: Option<String>,
    pub rating: f64,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
