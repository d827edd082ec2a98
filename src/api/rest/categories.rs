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
use crate::models::category::Category;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/category", post(create_category))
        .route("/category/list", get(list_categories))
        .route(
            "/category/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub bobot: f64,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub bobot: Option<f64>,
}

fn name_taken(state: &AppState, name: &str, except: Option<Uuid>) -> bool {
    state.categories.iter().any(|entry| {
        let category = entry.value();
        Some(category.id) != except && category.name.eq_ignore_ascii_case(name)
    })
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Reply<Category>, AppError> {
    let name = validation::required("name", &payload.name, 255)?;
    let bobot = validation::weight("bobot", payload.bobot)?;

    if name_taken(&state, &name, None) {
        return Err(AppError::Conflict(format!(
            "category with name {name} already exists"
        )));
    }

    let now = Utc::now();
    let category = Category {
        id: Uuid::new_v4(),
        name,
        description: payload.description,
        bobot,
        created_at: now,
        updated_at: now,
    };

    state.categories.insert(category.id, category.clone());
    Ok(response::created(category))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Reply<Vec<Category>> {
    let mut categories: Vec<Category> = state
        .categories
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    categories.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    response::ok(categories)
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<Category>, AppError> {
    let category = state
        .categories
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;

    Ok(response::ok(category.value().clone()))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Reply<Category>, AppError> {
    let name = validation::optional("name", payload.name, 255)?;
    let bobot = payload
        .bobot
        .map(|bobot| validation::weight("bobot", bobot))
        .transpose()?;

    if let Some(name) = &name {
        if name_taken(&state, name, Some(id)) {
            return Err(AppError::Conflict(format!(
                "category with name {name} already exists"
            )));
        }
    }

    let mut category = state
        .categories
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;

    if let Some(name) = name {
        category.name = name;
    }
    if let Some(description) = payload.description {
        category.description = Some(description);
    }
    if let Some(bobot) = bobot {
        category.bobot = bobot;
    }
    category.updated_at = Utc::now();

    Ok(response::ok(category.clone()))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .categories
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;

    Ok(response::message("category deleted successfully"))
}
