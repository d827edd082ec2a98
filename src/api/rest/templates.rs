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
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::category::CategorySummary;
use crate::models::template::{Template, TemplateView};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/template", post(create_template))
        .route("/template/list", get(list_templates))
        .route(
            "/template/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
}

#[derive(Deserialize)]
pub struct TemplateRequest {
    pub name: String,
    pub body: String,
    pub category_id: Uuid,
}

fn to_view(state: &AppState, template: &Template) -> TemplateView {
    TemplateView {
        id: template.id,
        name: template.name.clone(),
        body: template.body.clone(),
        category: state
            .categories
            .get(&template.category_id)
            .map(|category| CategorySummary::from(category.value())),
        created_at: template.created_at,
        updated_at: template.updated_at,
    }
}

fn validated(
    state: &AppState,
    payload: TemplateRequest,
) -> Result<(String, String, Uuid), AppError> {
    let name = validation::required("name", &payload.name, 255)?;
    let body = validation::required("body", &payload.body, 100_000)?;

    if !state.categories.contains_key(&payload.category_id) {
        return Err(AppError::BadRequest(format!(
            "invalid category_id {}",
            payload.category_id
        )));
    }

    Ok((name, body, payload.category_id))
}

async fn create_template(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TemplateRequest>,
) -> Result<Reply<TemplateView>, AppError> {
    let (name, body, category_id) = validated(&state, payload)?;

    let now = Utc::now();
    let template = Template {
        id: Uuid::new_v4(),
        name,
        body,
        category_id,
        created_at: now,
        updated_at: now,
    };

    state.templates.insert(template.id, template.clone());
    Ok(response::created(to_view(&state, &template)))
}

async fn list_templates(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<TemplateView>> {
    let mut templates: Vec<Template> = state
        .templates
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    response::ok(
        templates
            .iter()
            .map(|template| to_view(&state, template))
            .collect(),
    )
}

async fn get_template(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<TemplateView>, AppError> {
    let template = state
        .templates
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("template {} not found", id)))?;

    Ok(response::ok(to_view(&state, &template)))
}

async fn update_template(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TemplateRequest>,
) -> Result<Reply<TemplateView>, AppError> {
    let (name, body, category_id) = validated(&state, payload)?;

    let updated = {
        let mut template = state
            .templates
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("template {} not found", id)))?;

        template.name = name;
        template.body = body;
        template.category_id = category_id;
        template.updated_at = Utc::now();
        template.clone()
    };

    Ok(response::ok(to_view(&state, &updated)))
}

async fn delete_template(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .templates
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("template {} not found", id)))?;

    Ok(response::message("template deleted successfully"))
}
