use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::rest::response::{self, Reply};
use crate::api::rest::validation;
use crate::auth::AuthUser;
use crate::engine::ranking::{RankCandidate, ScoredRequest};
use crate::engine::scoring::ScoreBreakdown;
use crate::engine::weight::WeightPolicy;
use crate::error::AppError;
use crate::models::category::{Category, CategorySummary};
use crate::models::request::{parse_target_date, Request, RequestDetail, RequestStatus};
use crate::models::user::UserRef;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/request", post(create_request))
        .route("/request/list", get(list_ranked_requests))
        .route(
            "/request/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
}

#[derive(Deserialize)]
pub struct CreateRequestRequest {
    pub title: String,
    pub body: String,
    pub description: String,
    pub date: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRequestRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub status: Option<RequestStatus>,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct RankedListQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Serialize)]
pub struct RankedRequestView {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub type_label: Option<String>,
    pub category: Option<CategorySummary>,
    pub date: NaiveDate,
    pub body: String,
    pub description: String,
    pub status: RequestStatus,
    pub user: UserRef,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
}

impl From<ScoredRequest> for RankedRequestView {
    fn from(scored: ScoredRequest) -> Self {
        let type_label = scored.type_label().map(str::to_string);
        let ScoredRequest {
            candidate,
            breakdown,
            score,
        } = scored;

        Self {
            id: candidate.request.id,
            title: candidate.request.title,
            type_label,
            category: candidate.category.as_ref().map(CategorySummary::from),
            date: candidate.request.target_date,
            body: candidate.request.body,
            description: candidate.request.description,
            status: candidate.request.status,
            user: UserRef::from_user(candidate.requester.as_ref()),
            breakdown,
            score,
        }
    }
}

fn lookup_category(state: &AppState, id: Option<Uuid>) -> Option<Category> {
    id.and_then(|id| state.categories.get(&id).map(|entry| entry.value().clone()))
}

fn ensure_category(state: &AppState, id: Uuid) -> Result<(), AppError> {
    if state.categories.contains_key(&id) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("invalid category_id {id}")))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    parse_target_date(raw).map_err(AppError::BadRequest)
}

/// Snapshots the store in creation order and joins each request with its
/// category and requester.
fn load_candidates(state: &AppState, status: Option<RequestStatus>) -> Vec<RankCandidate> {
    let mut requests: Vec<Request> = state
        .requests
        .iter()
        .filter(|entry| status.is_none_or(|status| entry.value().status == status))
        .map(|entry| entry.value().clone())
        .collect();
    requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    requests
        .into_iter()
        .map(|request| RankCandidate {
            category: lookup_category(state, request.category_id),
            requester: state
                .users
                .get(&request.user_id)
                .map(|entry| entry.value().clone()),
            request,
        })
        .collect()
}

async fn list_ranked_requests(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RankedListQuery>,
) -> Result<Reply<Vec<RankedRequestView>>, AppError> {
    let candidates = load_candidates(&state, query.status);
    let policy = state.ranker.policy();
    let policy_label = policy.as_str();

    let start = Instant::now();
    let result = state.ranker.rank(candidates, Utc::now());
    let elapsed = start.elapsed();

    state
        .metrics
        .ranking_latency_seconds
        .with_label_values(&[policy_label])
        .observe(elapsed.as_secs_f64());

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            state
                .metrics
                .ranking_runs_total
                .with_label_values(&[policy_label, "error"])
                .inc();
            warn!(error = %err, policy = %policy, "ranking rejected corrupt input");
            return Err(err.into());
        }
    };

    state
        .metrics
        .ranking_runs_total
        .with_label_values(&[policy_label, "success"])
        .inc();
    state
        .metrics
        .ranked_requests_total
        .inc_by(outcome.ranked.len() as u64);
    state
        .metrics
        .unresolved_weights_total
        .with_label_values(&[policy_label])
        .inc_by(outcome.unresolved as u64);

    info!(
        caller = %caller.id,
        policy = %policy,
        ranked = outcome.ranked.len(),
        unresolved = outcome.unresolved,
        elapsed_us = elapsed.as_micros() as u64,
        "requests ranked"
    );

    Ok(response::ok(
        outcome
            .ranked
            .into_iter()
            .map(RankedRequestView::from)
            .collect(),
    ))
}

async fn create_request(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRequestRequest>,
) -> Result<Reply<Request>, AppError> {
    let title = validation::required("title", &payload.title, 255)?;
    let body = validation::required("body", &payload.body, 100_000)?;
    let description = validation::required("description", &payload.description, 2000)?;
    let request_type = validation::optional("type", payload.request_type, 100)?;
    let target_date = match payload.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => return Err(AppError::BadRequest("date is required".to_string())),
    };

    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id)?;
    }

    match state.ranker.policy() {
        WeightPolicy::Category if payload.category_id.is_none() => {
            return Err(AppError::BadRequest("category_id is required".to_string()));
        }
        WeightPolicy::TypeTable if request_type.is_none() => {
            return Err(AppError::BadRequest("type is required".to_string()));
        }
        _ => {}
    }

    let now = Utc::now();
    let request = Request {
        id: Uuid::new_v4(),
        title,
        body,
        description,
        target_date,
        status: RequestStatus::default(),
        category_id: payload.category_id,
        request_type,
        user_id: caller.id,
        created_at: now,
        updated_at: now,
    };

    state.requests.insert(request.id, request.clone());
    info!(
        request_id = %request.id,
        user_id = %caller.id,
        target_date = %request.target_date,
        "request created"
    );

    Ok(response::created(request))
}

async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<RequestDetail>, AppError> {
    let request = state
        .requests
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("request {} not found", id)))?;

    let category = lookup_category(&state, request.category_id);
    let requester = state
        .users
        .get(&request.user_id)
        .map(|entry| entry.value().clone());

    Ok(response::ok(RequestDetail {
        id: request.id,
        title: request.title,
        type_label: category
            .as_ref()
            .map(|category| category.name.clone())
            .or(request.request_type),
        category: category.as_ref().map(CategorySummary::from),
        body: request.body,
        description: request.description,
        date: request.target_date,
        status: request.status,
        created_at: request.created_at,
        updated_at: request.updated_at,
        user: UserRef::from_user(requester.as_ref()),
    }))
}

async fn update_request(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestRequest>,
) -> Result<Reply<Request>, AppError> {
    let title = validation::optional("title", payload.title, 255)?;
    let body = validation::optional("body", payload.body, 100_000)?;
    let description = validation::optional("description", payload.description, 2000)?;
    let request_type = validation::optional("type", payload.request_type, 100)?;
    let target_date = payload.date.as_deref().map(parse_date).transpose()?;

    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id)?;
    }

    let mut request = state
        .requests
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("request {} not found", id)))?;

    if let Some(title) = title {
        request.title = title;
    }
    if let Some(body) = body {
        request.body = body;
    }
    if let Some(description) = description {
        request.description = description;
    }
    if let Some(target_date) = target_date {
        request.target_date = target_date;
    }
    if let Some(status) = payload.status {
        request.status = status;
    }
    if let Some(category_id) = payload.category_id {
        request.category_id = Some(category_id);
    }
    if let Some(request_type) = request_type {
        request.request_type = Some(request_type);
    }
    request.updated_at = Utc::now();

    info!(request_id = %id, updated_by = %caller.id, status = ?request.status, "request updated");
    Ok(response::ok(request.clone()))
}

async fn delete_request(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    state
        .requests
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("request {} not found", id)))?;

    info!(request_id = %id, deleted_by = %caller.id, "request deleted");
    Ok(response::message("request deleted successfully"))
}
