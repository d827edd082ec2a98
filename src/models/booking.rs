use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BookingStatus {
    #[default]
    Waiting,
    Confirmed,
    Cancelled,
    Rescheduled,
    InService,
    Completed,
    NoShow,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub date: NaiveDate,
    pub hour: u8,
    pub capster_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub rating: f64,
    pub image: Option<String>,
    pub haircut_type: Option<String>,
    pub service_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name-only reference to a related record.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub date: NaiveDate,
    pub hour: u8,
    pub capster: NamedRef,
    pub payment: Option<NamedRef>,
    pub rating: f64,
    pub image: Option<String>,
    pub haircut_type: Option<String>,
    pub service: NamedRef,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
