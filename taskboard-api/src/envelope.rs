//! Success envelope
//!
//! ```json
//! { "status": "success", "data": { ... }, "message": "Project created successfully" }
//! ```
//!
//! Paginated listings also carry `results`, `page` and `totalPages`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use taskboard_shared::pagination::Page;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip)]
    code: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with data and message
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            results: None,
            page: None,
            total_pages: None,
            data: Some(data),
            message: Some(message.into()),
            code: StatusCode::OK,
        }
    }

    /// 201 with data and message
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::CREATED,
            ..Self::ok(data, message)
        }
    }
}

impl Envelope<()> {
    /// 200 with a message and no data
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            results: None,
            page: None,
            total_pages: None,
            data: None,
            message: Some(message.into()),
            code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// 200 with one page of items plus its position
    pub fn paged(page: Page<T>, message: impl Into<String>) -> Self {
        Self {
            results: Some(page.results()),
            page: Some(page.page()),
            total_pages: Some(page.total_pages()),
            ..Self::ok(page.items, message)
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}
