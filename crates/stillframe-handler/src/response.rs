//! The success/failure response envelope.

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::HashMap;
use stillframe_core::ThumbnailError;

/// Response envelope returned by the handler. Internal outcomes are mapped
/// onto an HTTP-style status plus a JSON body; the handler never surfaces a
/// raw error past this shape.
#[derive(Debug, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Serialize)]
struct SuccessBody {
    message: String,
    #[serde(rename = "thumbnailPath")]
    thumbnail_path: String,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    message: String,
    error: String,
    stack: String,
}

fn cors_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Headers".to_string(), "*".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

impl HandlerResponse {
    pub fn success(thumbnail_path: &str) -> Self {
        let body = SuccessBody {
            message: "Thumbnail generated successfully".to_string(),
            thumbnail_path: thumbnail_path.to_string(),
        };
        Self {
            status_code: 200,
            headers: cors_headers(),
            // Serializing a struct of strings cannot fail.
            body: serde_json::to_string(&body).unwrap_or_default(),
        }
    }

    pub fn failure(error: &ThumbnailError) -> Self {
        let body = FailureBody {
            message: "Failed to generate thumbnail".to_string(),
            error: error.to_string(),
            stack: format!("{}: {:?}", error.kind(), error),
        };
        Self {
            status_code: 500,
            headers: cors_headers(),
            body: serde_json::to_string(&body).unwrap_or_default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Parsed JSON body, for callers and tests inspecting the outcome.
    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                name.parse::<HeaderName>(),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        response
    }
}
