use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::rest::response::{self, Reply};
use crate::api::rest::validation;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::capster::Capster;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/capster", post(create_capster).get(list_all_capsters))
        .route("/capster/list", post(search_capsters))
        .route(
            "/capster/:id",
            get(get_capster).put(update_capster).delete(delete_capster),
        )
}

#[derive(Deserialize)]
pub struct CreateCapsterRequest {
    pub username: String,
    pub phone: String,
    pub description: String,
    pub avatar: Option<String>,
    pub email: String,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCapsterRequest {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
}

/// Each filter only applies when its `set_*` flag is on.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CapsterFilters {
    pub set_username: bool,
    pub username: Option<String>,
    pub set_phone: bool,
    pub phone: Option<String>,
    pub set_email: bool,
    pub email: Option<String>,
    pub set_address: bool,
    pub address: Option<String>,
    pub set_rating: bool,
    pub rating: Option<f64>,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct SearchCapstersRequest {
    pub page: usize,
    pub limit: usize,
    pub filters: CapsterFilters,
}

impl Default for SearchCapstersRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            filters: CapsterFilters::default(),
        }
    }
}

#[derive(Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_capsters: usize,
    pub total_pages: usize,
}

#[derive(Serialize)]
pub struct CapsterPage {
    pub capsters: Vec<Capster>,
    pub pagination: Pagination,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn text_filter(enabled: bool, needle: &Option<String>) -> Option<&str> {
    match needle {
        Some(needle) if enabled && !needle.is_empty() => Some(needle.as_str()),
        _ => None,
    }
}

impl CapsterFilters {
    fn matches(&self, capster: &Capster) -> bool {
        if let Some(needle) = text_filter(self.set_username, &self.username) {
            if !contains_ci(&capster.username, needle) {
                return false;
            }
        }
        if let Some(needle) = text_filter(self.set_phone, &self.phone) {
            if !contains_ci(&capster.phone, needle) {
                return false;
            }
        }
        if let Some(needle) = text_filter(self.set_email, &self.email) {
            if !contains_ci(&capster.email, needle) {
                return false;
            }
        }
        if let Some(needle) = text_filter(self.set_address, &self.address) {
            match &capster.address {
                Some(address) if contains_ci(address, needle) => {}
                _ => return false,
            }
        }
        if let (true, Some(rating)) = (self.set_rating, self.rating) {
            if capster.rating != rating {
                return false;
            }
        }
        true
    }
}

/// Returns the field that clashes with an existing capster, if any.
fn find_clash(
    state: &AppState,
    username: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
    except: Option<Uuid>,
) -> Option<&'static str> {
    state.capsters.iter().find_map(|entry| {
        let capster = entry.value();
        if Some(capster.id) == except {
            return None;
        }
        if username.is_some_and(|username| capster.username.eq_ignore_ascii_case(username)) {
            return Some("username");
        }
        if email.is_some_and(|email| capster.email.eq_ignore_ascii_case(email)) {
            return Some("email");
        }
        if phone.is_some_and(|phone| capster.phone == phone) {
            return Some("phone");
        }
        None
    })
}

async fn create_capster(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCapsterRequest>,
) -> Result<Reply<Capster>, AppError> {
    let username = validation::required("username", &payload.username, 255)?;
    let phone = validation::required("phone", &payload.phone, 15)?;
    let description = validation::required("description", &payload.description, 2000)?;
    let email = validation::email(&payload.email)?;

    if let Some(field) = find_clash(&state, Some(&username), Some(&email), Some(&phone), None) {
        return Err(AppError::Conflict(format!("{field} already in use")));
    }

    let now = Utc::now();
    let capster = Capster {
        id: Uuid::new_v4(),
        username,
        phone,
        description,
        avatar: payload.avatar,
        rating: 0.0,
        email,
        address: payload.address,
        created_at: now,
        updated_at: now,
    };

    state.capsters.insert(capster.id, capster.clone());
    info!(capster_id = %capster.id, "capster created");

    Ok(response::created(capster))
}

async fn search_capsters(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchCapstersRequest>,
) -> Result<Reply<CapsterPage>, AppError> {
    if payload.page == 0 {
        return Err(AppError::BadRequest("page must be >= 1".to_string()));
    }
    if payload.limit == 0 || payload.limit > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "limit must be within 1..={MAX_PAGE_SIZE}"
        )));
    }

    let mut matched: Vec<Capster> = state
        .capsters
        .iter()
        .filter(|entry| payload.filters.matches(entry.value()))
        .map(|entry| entry.value().clone())
        .collect();
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    let total_capsters = matched.len();
    let total_pages = total_capsters.div_ceil(payload.limit);
    // A page past usize range is simply past the end.
    let capsters = match (payload.page - 1).checked_mul(payload.limit) {
        Some(offset) => matched
            .into_iter()
            .skip(offset)
            .take(payload.limit)
            .collect(),
        None => Vec::new(),
    };

    Ok(response::ok(CapsterPage {
        capsters,
        pagination: Pagination {
            page: payload.page,
            limit: payload.limit,
            total_capsters,
            total_pages,
        },
    }))
}

async fn list_all_capsters(State(state): State<Arc<AppState>>) -> Reply<Vec<Capster>> {
    let mut capsters: Vec<Capster> = state
        .capsters
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    capsters.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    response::ok(capsters)
}

async fn get_capster(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<Capster>, AppError> {
    let capster = state
        .capsters
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("capster {} not found", id)))?;

    Ok(response::ok(capster.value().clone()))
}

async fn update_capster(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCapsterRequest>,
) -> Result<Reply<Capster>, AppError> {
    let username = validation::optional("username", payload.username, 255)?;
    let phone = validation::optional("phone", payload.phone, 15)?;
    let description = validation::optional("description", payload.description, 2000)?;
    let email = payload
        .email
        .map(|email| validation::email(&email))
        .transpose()?;
    let rating = payload.rating.map(validation::rating).transpose()?;

    if let Some(field) = find_clash(
        &state,
        username.as_deref(),
        email.as_deref(),
        phone.as_deref(),
        Some(id),
    ) {
        return Err(AppError::Conflict(format!("{field} already in use")));
    }

    let mut capster = state
        .capsters
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("capster {} not found", id)))?;

    if let Some(username) = username {
        capster.username = username;
    }
    if let Some(phone) = phone {
        capster.phone = phone;
    }
    if let Some(description) = description {
        capster.description = description;
    }
    if let Some(avatar) = payload.avatar {
        capster.avatar = Some(avatar);
    }
    if let Some(email) = email {
        capster.email = email;
    }
    if let Some(address) = payload.address {
        capster.address = Some(address);
    }
    if let Some(rating) = rating {
        capster.rating = rating;
    }
    capster.updated_at = Utc::now();

    Ok(response::ok(capster.clone()))
}

async fn delete_capster(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .capsters
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("capster {} not found", id)))?;

    Ok(response::message("capster deleted successfully"))
}
