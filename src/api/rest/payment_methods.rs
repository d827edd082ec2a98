use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::response::{self, Reply};
use crate::api::rest::validation;
use crate::auth::AdminUser;
use crate::error::AppError;
use crate::models::payment_method::PaymentMethod;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payment-method", post(create_payment_method))
        .route("/payment-method/list", get(list_payment_methods))
        .route(
            "/payment-method/:id",
            get(get_payment_method)
                .put(update_payment_method)
                .delete(delete_payment_method),
        )
}

#[derive(Deserialize)]
pub struct PaymentMethodRequest {
    pub name: String,
}

fn name_taken(state: &AppState, name: &str, except: Option<Uuid>) -> bool {
    state.payment_methods.iter().any(|entry| {
        let method = entry.value();
        Some(method.id) != except && method.name.eq_ignore_ascii_case(name)
    })
}

async fn create_payment_method(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PaymentMethodRequest>,
) -> Result<Reply<PaymentMethod>, AppError> {
    let name = validation::required("name", &payload.name, 255)?;

    if name_taken(&state, &name, None) {
        return Err(AppError::Conflict(format!(
            "payment method {name} already exists"
        )));
    }

    let now = Utc::now();
    let method = PaymentMethod {
        id: Uuid::new_v4(),
        name,
        created_at: now,
        updated_at: now,
    };

    state.payment_methods.insert(method.id, method.clone());
    Ok(response::created(method))
}

async fn list_payment_methods(State(state): State<Arc<AppState>>) -> Reply<Vec<PaymentMethod>> {
    let mut methods: Vec<PaymentMethod> = state
        .payment_methods
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    methods.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    response::ok(methods)
}

async fn get_payment_method(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<PaymentMethod>, AppError> {
    let method = state
        .payment_methods
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("payment method {} not found", id)))?;

    Ok(response::ok(method.value().clone()))
}

async fn update_payment_method(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentMethodRequest>,
) -> Result<Reply<PaymentMethod>, AppError> {
    let name = validation::required("name", &payload.name, 255)?;

    if name_taken(&state, &name, Some(id)) {
        return Err(AppError::Conflict(format!(
            "payment method {name} already exists"
        )));
    }

    let mut method = state
        .payment_methods
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("payment method {} not found", id)))?;

    method.name = name;
    method.updated_at = Utc::now();

    Ok(response::ok(method.clone()))
}

async fn delete_payment_method(
    AdminUser(admin): AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .payment_methods
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("payment method {} not found", id)))?;

    info!(payment_method_id = %id, deleted_by = %admin.id, "payment method deleted");
    Ok(response::message("payment method deleted successfully"))
}
