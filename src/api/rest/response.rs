use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// `{ code, status, data }` body shared by every successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

pub fn ok<T: Serialize>(data: T) -> Reply<T> {
    with_status(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> Reply<T> {
    with_status(StatusCode::CREATED, data)
}

pub fn message(text: impl Into<String>) -> Reply<()> {
    (
        StatusCode::OK,
        Json(Envelope {
            code: StatusCode::OK.as_u16(),
            status: "success",
            message: Some(text.into()),
            data: None,
        }),
    )
}

fn with_status<T: Serialize>(status: StatusCode, data: T) -> Reply<T> {
    (
        status,
        Json(Envelope {
            code: status.as_u16(),
            status: "success",
            message: None,
            data: Some(data),
        }),
    )
}
