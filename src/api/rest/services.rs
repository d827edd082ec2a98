use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::response::{self, Reply};
use crate::api::rest::validation;
use crate::error::AppError;
use crate::models::service::Service;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/service", post(create_service).get(list_services))
        .route(
            "/service/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

fn validate_price(price: f64) -> Result<f64, AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(format!("price must be >= 0, got {price}")));
    }
    Ok(price)
}

fn name_taken(state: &AppState, name: &str, except: Option<Uuid>) -> bool {
    state.services.iter().any(|entry| {
        let service = entry.value();
        Some(service.id) != except && service.name.eq_ignore_ascii_case(name)
    })
}

async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<Reply<Service>, AppError> {
    let name = validation::required("name", &payload.name, 255)?;
    let description = validation::required("description", &payload.description, 2000)?;
    let price = validate_price(payload.price)?;

    if name_taken(&state, &name, None) {
        return Err(AppError::Conflict(format!(
            "service with name {name} already exists"
        )));
    }

    let now = Utc::now();
    let service = Service {
        id: Uuid::new_v4(),
        name,
        description,
        price,
        created_at: now,
        updated_at: now,
    };

    state.services.insert(service.id, service.clone());
    Ok(response::created(service))
}

async fn list_services(State(state): State<Arc<AppState>>) -> Reply<Vec<Service>> {
    let mut services: Vec<Service> = state
        .services
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    services.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    response::ok(services)
}

async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<Service>, AppError> {
    let service = state
        .services
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("service {} not found", id)))?;

    Ok(response::ok(service.value().clone()))
}

async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Reply<Service>, AppError> {
    let name = validation::optional("name", payload.name, 255)?;
    let description = validation::optional("description", payload.description, 2000)?;
    let price = payload.price.map(validate_price).transpose()?;

    if let Some(name) = &name {
        if name_taken(&state, name, Some(id)) {
            return Err(AppError::Conflict(format!(
                "service with name {name} already exists"
            )));
        }
    }

    let mut service = state
        .services
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("service {} not found", id)))?;

    if let Some(name) = name {
        service.name = name;
    }
    if let Some(description) = description {
        service.description = description;
    }
    if let Some(price) = price {
        service.price = price;
    }
    service.updated_at = Utc::now();

    Ok(response::ok(service.clone()))
}

async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .services
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("service {} not found", id)))?;

    Ok(response::message("service deleted successfully"))
}
