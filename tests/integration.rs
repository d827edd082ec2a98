use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Days, Utc};
use serde_json::{json, Value};
use service_desk::api::rest::router;
use service_desk::config::Config;
use service_desk::engine::weight::WeightPolicy;
use service_desk::models::category::Category;
use service_desk::state::AppState;
use tower::ServiceExt;
use uuid::Uuid;

fn test_config() -> Config {
    Config {
        jwt_secret: "integration-secret".to_string(),
        password_hash_iterations: 1_000,
        ..Config::default()
    }
}

fn setup_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(&config).unwrap());
    (router(state.clone()), state)
}

fn setup() -> (axum::Router, Arc<AppState>) {
    setup_with(test_config())
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn register(app: &axum::Router, name: &str, email: &str, role: &str) -> Value {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/register",
            None,
            json!({
                "name": name,
                "email": email,
                "password": "rahasia123",
                "phone": "081234567890",
                "role": role
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["data"].clone()
}

async fn login(app: &axum::Router, email: &str) -> String {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({ "email": email, "password": "rahasia123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn user_token(app: &axum::Router) -> String {
    register(app, "Warga", "warga@example.com", "user").await;
    login(app, "warga@example.com").await
}

async fn create_category(app: &axum::Router, name: &str, bobot: f64) -> String {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/category",
            None,
            json!({ "name": name, "description": "test", "bobot": bobot }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn days_from_today(days: u64) -> String {
    Utc::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

async fn create_request(app: &axum::Router, token: &str, title: &str, body: Value) -> Value {
    let mut payload = json!({
        "title": title,
        "body": "isi surat",
        "description": "keterangan",
    });
    if let (Some(target), Some(extra)) = (payload.as_object_mut(), body.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }

    let res = app
        .clone()
        .oneshot(json_request("POST", "/request", Some(token), payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await["data"].clone()
}

async fn ranked(app: &axum::Router, token: &str, uri: &str) -> Vec<Value> {
    let res = app
        .clone()
        .oneshot(get_request(uri, Some(token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["data"].as_array().unwrap().clone()
}

fn titles(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["weight_policy"], "category");
    assert_eq!(body["requests"], 0);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/metrics", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("ranked_requests_total"));
}

#[tokio::test]
async fn register_and_login_issue_a_token_without_leaking_the_hash() {
    let (app, _state) = setup();

    let profile = register(&app, "Budi", "Budi@Example.com", "user").await;
    assert_eq!(profile["email"], "budi@example.com");
    assert_eq!(profile["role"], "user");

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({ "email": "budi@example.com", "password": "rahasia123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(res).await;
    assert_eq!(body["code"], 200);
    assert_eq!(body["status"], "success");
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (app, _state) = setup();
    register(&app, "Budi", "budi@example.com", "user").await;

    let res = app
        .oneshot(json_request(
            "POST",
            "/users/register",
            None,
            json!({
                "name": "Budi Lain",
                "email": "budi@example.com",
                "password": "rahasia123",
                "phone": "0811"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = body_json(res).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let (app, _state) = setup();
    register(&app, "Budi", "budi@example.com", "user").await;

    let res = app
        .oneshot(json_request(
            "POST",
            "/users/login",
            None,
            json!({ "email": "budi@example.com", "password": "salah-sandi" }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_listing_requires_a_valid_token() {
    let (app, _state) = setup();
    let token = user_token(&app).await;

    let res = app
        .clone()
        .oneshot(get_request("/users/list", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(get_request("/users/list", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(get_request("/users/list", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ranked_list_requires_auth() {
    let (app, _state) = setup();

    let res = app
        .oneshot(get_request("/request/list", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ranked_list_of_nothing_is_empty() {
    let (app, _state) = setup();
    let token = user_token(&app).await;

    let items = ranked(&app, &token, "/request/list").await;

    assert!(items.is_empty());
}

#[tokio::test]
async fn ranked_list_orders_by_saw_score() {
    let (app, _state) = setup();
    let token = user_token(&app).await;

    let complaint = create_category(&app, "Pengaduan", 1.0).await;
    let legalisation = create_category(&app, "Legalisir", 0.4).await;
    let general = create_category(&app, "Umum", 0.5).await;
    let doomed = create_category(&app, "Sementara", 0.9).await;

    create_request(
        &app,
        &token,
        "far-legalisation",
        json!({ "category_id": legalisation, "date": days_from_today(40) }),
    )
    .await;
    create_request(
        &app,
        &token,
        "mid-general",
        json!({ "category_id": general, "date": days_from_today(15) }),
    )
    .await;
    create_request(
        &app,
        &token,
        "orphaned-today",
        json!({ "category_id": doomed, "date": days_from_today(0) }),
    )
    .await;
    create_request(
        &app,
        &token,
        "urgent-complaint",
        json!({ "category_id": complaint, "date": days_from_today(0) }),
    )
    .await;

    let res = app
        .clone()
        .oneshot(delete_request(&format!("/category/{doomed}"), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let items = ranked(&app, &token, "/request/list").await;

    assert_eq!(
        titles(&items),
        vec!["urgent-complaint", "mid-general", "orphaned-today", "far-legalisation"]
    );

    let scores: Vec<f64> = items
        .iter()
        .map(|item| item["score"].as_f64().unwrap())
        .collect();
    assert!((scores[0] - 1.0).abs() < 1e-9);
    assert!((scores[1] - 0.5).abs() < 1e-9);
    assert!((scores[2] - 0.4).abs() < 1e-9);
    assert!((scores[3] - 0.24).abs() < 1e-9);

    let top = &items[0];
    assert_eq!(top["type"], "Pengaduan");
    assert_eq!(top["category"]["bobot"], 1.0);
    assert_eq!(top["user"]["name"], "Warga");
    assert_eq!(top["user"]["email"], "warga@example.com");
    assert_eq!(top["status"], "Pending");
    assert_eq!(top["breakdown"]["weight"], 1.0);
    assert_eq!(top["breakdown"]["urgency"], 1.0);

    let orphan = &items[2];
    assert!(orphan["category"].is_null());
    assert_eq!(orphan["breakdown"]["weight"], 0.0);

    let res = app
        .oneshot(get_request("/metrics", None))
        .await
        .unwrap();
    let metrics = body_string(res).await;
    assert!(metrics.contains("ranked_requests_total 4"));
    assert!(metrics.contains("unresolved_weights_total{policy=\"category\"} 1"));
}

#[tokio::test]
async fn equal_scores_keep_creation_order() {
    let (app, _state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.5).await;

    for title in ["first", "second", "third"] {
        create_request(
            &app,
            &token,
            title,
            json!({ "category_id": general, "date": days_from_today(10) }),
        )
        .await;
    }

    let items = ranked(&app, &token, "/request/list").await;

    assert_eq!(titles(&items), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn ranked_list_can_filter_by_status() {
    let (app, _state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.5).await;

    let due = days_from_today(3);
    let done = create_request(
        &app,
        &token,
        "done",
        json!({ "category_id": general, "date": due }),
    )
    .await;
    create_request(
        &app,
        &token,
        "open",
        json!({ "category_id": general, "date": due }),
    )
    .await;

    let done_id = done["id"].as_str().unwrap();
    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/request/{done_id}"),
            Some(&token),
            json!({ "status": "Completed" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["data"]["status"], "Completed");

    let pending = ranked(&app, &token, "/request/list?status=Pending").await;
    assert_eq!(titles(&pending), vec!["open"]);

    let everything = ranked(&app, &token, "/request/list").await;
    assert_eq!(everything.len(), 2);
}

#[tokio::test]
async fn corrupt_category_weight_surfaces_as_422() {
    let (app, state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.5).await;
    create_request(
        &app,
        &token,
        "ok",
        json!({ "category_id": general, "date": days_from_today(2) }),
    )
    .await;

    let corrupt = Category {
        id: Uuid::new_v4(),
        name: "Rusak".to_string(),
        description: None,
        bobot: 3.0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let corrupt_id = corrupt.id;
    state.categories.insert(corrupt.id, corrupt);
    create_request(
        &app,
        &token,
        "bad",
        json!({ "category_id": corrupt_id, "date": days_from_today(2) }),
    )
    .await;

    let res = app
        .oneshot(get_request("/request/list", Some(&token)))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("outside [0, 1]"));
}

#[tokio::test]
async fn type_table_policy_ranks_by_label() {
    let (app, _state) = setup_with(Config {
        weight_policy: WeightPolicy::TypeTable,
        ..test_config()
    });
    let token = user_token(&app).await;
    let due = days_from_today(5);

    for (title, kind) in [
        ("info", "information"),
        ("mystery", "something-else"),
        ("complaint", "COMPLAINT"),
        ("service", "Service"),
    ] {
        create_request(&app, &token, title, json!({ "type": kind, "date": due })).await;
    }

    let items = ranked(&app, &token, "/request/list").await;

    assert_eq!(titles(&items), vec!["complaint", "service", "info", "mystery"]);
    assert_eq!(items[0]["type"], "COMPLAINT");
    assert_eq!(items[3]["breakdown"]["weight"], 0.0);
}

#[tokio::test]
async fn type_table_policy_requires_a_type() {
    let (app, _state) = setup_with(Config {
        weight_policy: WeightPolicy::TypeTable,
        ..test_config()
    });
    let token = user_token(&app).await;

    let res = app
        .oneshot(json_request(
            "POST",
            "/request",
            Some(&token),
            json!({ "title": "t", "body": "b", "description": "d" }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_creation_validates_category_and_date() {
    let (app, _state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.5).await;

    let due = days_from_today(5);
    let cases = [
        json!({ "title": "t", "body": "b", "description": "d", "date": due }),
        json!({ "title": "t", "body": "b", "description": "d", "category_id": Uuid::new_v4(), "date": due }),
        json!({ "title": "t", "body": "b", "description": "d", "category_id": general, "date": "besok" }),
        json!({ "title": " ", "body": "b", "description": "d", "category_id": general, "date": due }),
    ];

    for payload in cases {
        let res = app
            .clone()
            .oneshot(json_request("POST", "/request", Some(&token), payload))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn request_without_a_date_is_rejected_not_defaulted() {
    let (app, state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.0).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/request",
            Some(&token),
            json!({ "title": "t", "body": "b", "description": "d", "category_id": general }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["message"].as_str().unwrap().contains("date"));
    assert!(state.requests.is_empty());

    let items = ranked(&app, &token, "/request/list").await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn request_detail_is_public_and_embeds_relations() {
    let (app, _state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.5).await;
    let created = create_request(
        &app,
        &token,
        "surat",
        json!({ "category_id": general, "date": "2030-01-02T10:00:00Z" }),
    )
    .await;
    assert_eq!(created["target_date"], "2030-01-02");

    let id = created["id"].as_str().unwrap();
    let res = app
        .clone()
        .oneshot(get_request(&format!("/request/{id}"), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let detail = body_json(res).await["data"].clone();
    assert_eq!(detail["type"], "Umum");
    assert_eq!(detail["category"]["name"], "Umum");
    assert_eq!(detail["user"]["name"], "Warga");
    assert_eq!(detail["date"], "2030-01-02");

    let res = app
        .clone()
        .oneshot(delete_request(&format!("/request/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(get_request(&format!("/request/{id}"), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_weight_must_be_in_unit_interval_and_names_unique() {
    let (app, _state) = setup();
    create_category(&app, "Umum", 0.5).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/category",
            None,
            json!({ "name": "Terlalu Berat", "bobot": 1.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(json_request(
            "POST",
            "/category",
            None,
            json!({ "name": "umum", "bobot": 0.2 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn capster_search_filters_and_paginates() {
    let (app, _state) = setup();

    for (username, phone, email) in [
        ("andi", "0811", "andi@barber.id"),
        ("andika", "0812", "andika@barber.id"),
        ("joko", "0813", "joko@barber.id"),
    ] {
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/capster",
                None,
                json!({
                    "username": username,
                    "phone": phone,
                    "description": "fade specialist",
                    "email": email
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/capster/list",
            None,
            json!({
                "page": 1,
                "limit": 1,
                "filters": { "set_username": true, "username": "ANDI" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let page = body_json(res).await["data"].clone();
    assert_eq!(page["capsters"].as_array().unwrap().len(), 1);
    assert_eq!(page["pagination"]["total_capsters"], 2);
    assert_eq!(page["pagination"]["total_pages"], 2);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/capster/list",
            None,
            json!({ "filters": { "set_username": false, "username": "andi" } }),
        ))
        .await
        .unwrap();
    let page = body_json(res).await["data"].clone();
    assert_eq!(page["pagination"]["total_capsters"], 3);
    assert_eq!(page["pagination"]["limit"], 10);

    let res = app
        .oneshot(json_request(
            "POST",
            "/capster",
            None,
            json!({
                "username": "baru",
                "phone": "0813",
                "description": "x",
                "email": "baru@barber.id"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn capster_search_past_the_last_page_is_empty() {
    let (app, _state) = setup();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/capster",
            None,
            json!({
                "username": "andi",
                "phone": "0811",
                "description": "fade specialist",
                "email": "andi@barber.id"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    for page in [json!(u64::MAX), json!(2)] {
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/capster/list",
                None,
                json!({ "page": page, "limit": 10 }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let data = body_json(res).await["data"].clone();
        assert!(data["capsters"].as_array().unwrap().is_empty());
        assert_eq!(data["pagination"]["total_capsters"], 1);
        assert_eq!(data["pagination"]["page"], page);
    }
}

#[tokio::test]
async fn booking_checks_references_and_duplicates() {
    let (app, _state) = setup();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/capster",
            None,
            json!({
                "username": "andi",
                "phone": "0811",
                "description": "fade specialist",
                "email": "andi@barber.id"
            }),
        ))
        .await
        .unwrap();
    let capster_id = body_json(res).await["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/service",
            None,
            json!({ "name": "Potong", "description": "potong rambut", "price": 35000 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let service_id = body_json(res).await["data"]["id"].as_str().unwrap().to_string();

    let booking = json!({
        "name": "Rudi",
        "email": "rudi@example.com",
        "phone": "0899",
        "date": "2030-03-01",
        "hour": 14,
        "capster_id": capster_id,
        "service_id": service_id
    });

    let res = app
        .clone()
        .oneshot(json_request("POST", "/booking", None, booking.clone()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_json(res).await["data"]["status"], "Waiting");

    let res = app
        .clone()
        .oneshot(json_request("POST", "/booking", None, booking.clone()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let mut unknown_capster = booking.clone();
    unknown_capster["capster_id"] = json!(Uuid::new_v4());
    unknown_capster["hour"] = json!(15);
    let res = app
        .clone()
        .oneshot(json_request("POST", "/booking", None, unknown_capster))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut later = booking.clone();
    later["hour"] = json!(16);
    let res = app
        .clone()
        .oneshot(json_request("POST", "/booking", None, later))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let later_id = body_json(res).await["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/booking/{later_id}"),
            None,
            json!({ "hour": 14 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/booking/{later_id}"),
            None,
            json!({ "hour": 16, "rating": 4.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["data"]["hour"], 16);

    let res = app.oneshot(get_request("/booking", None)).await.unwrap();
    let listed = body_json(res).await["data"].clone();
    assert_eq!(listed[0]["capster"]["name"], "andi");
    assert_eq!(listed[0]["service"]["name"], "Potong");
    assert!(listed[0]["payment"].is_null());
}

#[tokio::test]
async fn deleting_payment_methods_is_admin_only() {
    let (app, _state) = setup();
    let user = user_token(&app).await;
    register(&app, "Admin", "admin@example.com", "admin").await;
    let admin = login(&app, "admin@example.com").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/payment-method",
            None,
            json!({ "name": "QRIS" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = body_json(res).await["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/payment-method/{id}");

    let res = app
        .clone()
        .oneshot(delete_request(&uri, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(delete_request(&uri, Some(&user)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(delete_request(&uri, Some(&admin)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.oneshot(get_request(&uri, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn templates_require_a_known_category() {
    let (app, _state) = setup();
    let token = user_token(&app).await;
    let general = create_category(&app, "Umum", 0.5).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/template",
            Some(&token),
            json!({ "name": "Surat", "body": "Dengan hormat", "category_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/template",
            Some(&token),
            json!({ "name": "Surat", "body": "Dengan hormat", "category_id": general }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(get_request("/template/list", Some(&token)))
        .await
        .unwrap();
    let templates = body_json(res).await["data"].clone();
    assert_eq!(templates[0]["category"]["name"], "Umum");
    assert_eq!(templates[0]["category"]["bobot"], 0.5);
}
