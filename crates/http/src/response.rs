//! Success envelope shared by every handler

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{ "status": "success", "message"?: .., "data"?: .. }` with its HTTP status
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    code: StatusCode,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl ApiResponse<()> {
    /// Success without a data payload
    pub fn success() -> Self {
        Self {
            code: StatusCode::OK,
            status: "success",
            message: None,
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Success carrying a data payload
    pub fn with_data(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            status: "success",
            message: None,
            data: Some(data),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn status_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}
