use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::category::CategorySummary;
use crate::models::user::UserRef;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub description: String,
    pub target_date: NaiveDate,
    pub status: RequestStatus,
    pub category_id: Option<Uuid>,
    pub request_type: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Accepts a plain calendar date (`2024-05-10`) or an RFC 3339 timestamp,
/// which is reduced to its UTC date.
pub fn parse_target_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("invalid date {raw:?}: expected YYYY-MM-DD or RFC 3339"))
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestDetail {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub type_label: Option<String>,
    pub category: Option<CategorySummary>,
    pub body: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserRef,
}
