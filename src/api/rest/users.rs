use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::rest::response::{self, Reply};
use crate::api::rest::validation;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::user::{Gender, Role, User, UserProfile};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/list", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/delete/:id", delete(delete_user))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub birthdate: Option<NaiveDate>,
    pub place_of_birth: Option<String>,
    pub image: Option<String>,
    pub gender: Option<Gender>,
    pub class_name: Option<String>,
    pub nisn: Option<String>,
    pub nis: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub user: User,
    pub token: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Reply<UserProfile>, AppError> {
    let name = validation::required("name", &payload.name, 255)?;
    let email = validation::email(&payload.email)?;
    let phone = validation::required("phone", &payload.phone, 15)?;
    validation::required("password", &payload.password, 255)?;

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.users.iter().any(|entry| entry.value().email == email) {
        return Err(AppError::Conflict("email has been used".to_string()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        address: payload.address,
        password_hash: state.passwords.hash(&payload.password)?,
        phone,
        birthdate: payload.birthdate,
        place_of_birth: payload.place_of_birth,
        image: payload.image,
        gender: payload.gender,
        class_name: payload.class_name,
        role: payload.role,
        nisn: payload.nisn,
        nis: payload.nis,
        created_at: now,
        updated_at: now,
    };

    state.users.insert(user.id, user.clone());
    info!(user_id = %user.id, role = ?user.role, "user registered");

    Ok(response::ok(UserProfile::from(&user)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Reply<LoginResponse>, AppError> {
    let email = validation::email(&payload.email)?;
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let invalid = || AppError::Unauthorized("invalid email or password".to_string());

    let user = state
        .users
        .iter()
        .find(|entry| entry.value().email == email)
        .map(|entry| entry.value().clone())
        .ok_or_else(invalid)?;

    if !state.passwords.verify(&payload.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = state.tokens.issue(user.id, user.role)?;
    info!(user_id = %user.id, "user logged in");

    Ok(response::ok(LoginResponse {
        id: user.id,
        user,
        token,
    }))
}

async fn list_users(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<UserProfile>> {
    let mut users: Vec<User> = state
        .users
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    response::ok(users.iter().map(UserProfile::from).collect())
}

async fn get_user(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<UserProfile>, AppError> {
    let user = state
        .users
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;

    Ok(response::ok(UserProfile::from(user.value())))
}

async fn delete_user(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .users
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;

    info!(user_id = %id, deleted_by = %caller.id, "user deleted");
    Ok(response::message("user deleted successfully"))
}
