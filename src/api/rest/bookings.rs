use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::response::{self, Reply};
use crate::api::rest::validation;
use crate::error::AppError;
use crate::models::booking::{Booking, BookingStatus, BookingView, NamedRef};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking", post(create_booking).get(list_bookings))
        .route(
            "/booking/:id",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub date: NaiveDate,
    pub hour: u8,
    pub capster_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub haircut_type: Option<String>,
    pub service_id: Uuid,
    pub status: Option<BookingStatus>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub hour: Option<u8>,
    pub capster_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub haircut_type: Option<String>,
    pub service_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

fn validate_hour(hour: u8) -> Result<u8, AppError> {
    if hour > 23 {
        return Err(AppError::BadRequest(format!(
            "hour must be within 0..=23, got {hour}"
        )));
    }
    Ok(hour)
}

fn ensure_references(
    state: &AppState,
    capster_id: Option<Uuid>,
    service_id: Option<Uuid>,
    payment_id: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(id) = capster_id {
        if !state.capsters.contains_key(&id) {
            return Err(AppError::BadRequest(format!("invalid capster_id {id}")));
        }
    }
    if let Some(id) = service_id {
        if !state.services.contains_key(&id) {
            return Err(AppError::BadRequest(format!("invalid service_id {id}")));
        }
    }
    if let Some(id) = payment_id {
        if !state.payment_methods.contains_key(&id) {
            return Err(AppError::BadRequest(format!("invalid payment_id {id}")));
        }
    }
    Ok(())
}

/// Rejects a second booking of the same (email, date, hour, capster) slot.
/// `except` skips the booking being updated.
fn ensure_slot_free(
    state: &AppState,
    email: &Option<String>,
    date: NaiveDate,
    hour: u8,
    capster_id: Uuid,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    let taken = state.bookings.iter().any(|entry| {
        let existing = entry.value();
        Some(existing.id) != except
            && existing.email == *email
            && existing.date == date
            && existing.hour == hour
            && existing.capster_id == capster_id
    });

    if taken {
        return Err(AppError::Conflict(
            "booking already exists for this time and capster".to_string(),
        ));
    }
    Ok(())
}

/// Resolves related names the way a listing shows them; references to
/// deleted records keep their id with no name.
fn to_view(state: &AppState, booking: Booking) -> BookingView {
    let capster = NamedRef {
        id: booking.capster_id,
        name: state
            .capsters
            .get(&booking.capster_id)
            .map(|capster| capster.username.clone()),
    };
    let service = NamedRef {
        id: booking.service_id,
        name: state
            .services
            .get(&booking.service_id)
            .map(|service| service.name.clone()),
    };
    let payment = booking.payment_id.map(|id| NamedRef {
        id,
        name: state.payment_methods.get(&id).map(|method| method.name.clone()),
    });

    BookingView {
        id: booking.id,
        name: booking.name,
        email: booking.email,
        phone: booking.phone,
        date: booking.date,
        hour: booking.hour,
        capster,
        payment,
        rating: booking.rating,
        image: booking.image,
        haircut_type: booking.haircut_type,
        service,
        status: booking.status,
        created_at: booking.created_at,
        updated_at: booking.updated_at,
    }
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Reply<Booking>, AppError> {
    let name = validation::required("name", &payload.name, 255)?;
    let phone = validation::required("phone", &payload.phone, 15)?;
    let email = payload
        .email
        .map(|email| validation::email(&email))
        .transpose()?;
    let hour = validate_hour(payload.hour)?;
    let rating = payload.rating.map(validation::rating).transpose()?.unwrap_or(0.0);

    ensure_references(
        &state,
        Some(payload.capster_id),
        Some(payload.service_id),
        payload.payment_id,
    )?;

    ensure_slot_free(
        &state,
        &email,
        payload.date,
        hour,
        payload.capster_id,
        None,
    )?;

    let now = Utc::now();
    let booking = Booking {
        id: Uuid::new_v4(),
        name,
        email,
        phone,
        date: payload.date,
        hour,
        capster_id: payload.capster_id,
        payment_id: payload.payment_id,
        rating,
        image: payload.image,
        haircut_type: payload.haircut_type,
        service_id: payload.service_id,
        status: payload.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    state.bookings.insert(booking.id, booking.clone());
    info!(
        booking_id = %booking.id,
        capster_id = %booking.capster_id,
        date = %booking.date,
        hour = booking.hour,
        "booking created"
    );

    Ok(response::created(booking))
}

async fn list_bookings(State(state): State<Arc<AppState>>) -> Reply<Vec<BookingView>> {
    let mut bookings: Vec<Booking> = state
        .bookings
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    bookings.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    response::ok(
        bookings
            .into_iter()
            .map(|booking| to_view(&state, booking))
            .collect(),
    )
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<BookingView>, AppError> {
    let booking = state
        .bookings
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

    Ok(response::ok(to_view(&state, booking)))
}

async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<Reply<Booking>, AppError> {
    let name = validation::optional("name", payload.name, 255)?;
    let phone = validation::optional("phone", payload.phone, 15)?;
    let email = payload
        .email
        .map(|email| validation::email(&email))
        .transpose()?;
    let hour = payload.hour.map(validate_hour).transpose()?;
    let rating = payload.rating.map(validation::rating).transpose()?;

    ensure_references(
        &state,
        payload.capster_id,
        payload.service_id,
        payload.payment_id,
    )?;

    let current = state
        .bookings
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;
    ensure_slot_free(
        &state,
        &email.clone().or(current.email),
        payload.date.unwrap_or(current.date),
        hour.unwrap_or(current.hour),
        payload.capster_id.unwrap_or(current.capster_id),
        Some(id),
    )?;

    let mut booking = state
        .bookings
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

    if let Some(name) = name {
        booking.name = name;
    }
    if let Some(email) = email {
        booking.email = Some(email);
    }
    if let Some(phone) = phone {
        booking.phone = phone;
    }
    if let Some(date) = payload.date {
        booking.date = date;
    }
    if let Some(hour) = hour {
        booking.hour = hour;
    }
    if let Some(capster_id) = payload.capster_id {
        booking.capster_id = capster_id;
    }
    if let Some(payment_id) = payload.payment_id {
        booking.payment_id = Some(payment_id);
    }
    if let Some(rating) = rating {
        booking.rating = rating;
    }
    if let Some(image) = payload.image {
        booking.image = Some(image);
    }
    if let Some(haircut_type) = payload.haircut_type {
        booking.haircut_type = Some(haircut_type);
    }
    if let Some(service_id) = payload.service_id {
        booking.service_id = service_id;
    }
    if let Some(status) = payload.status {
        booking.status = status;
    }
    booking.updated_at = Utc::now();

    Ok(response::ok(booking.clone()))
}

async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .bookings
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

    Ok(response::message("booking deleted successfully"))
}
