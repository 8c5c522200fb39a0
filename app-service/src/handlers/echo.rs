use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

use super::timestamp;
use crate::dtos::{EchoForm, EchoResponse};

const MESSAGE_REQUIRED: &str = "Message is required";
const MESSAGE_NOT_STRING: &str = "Message must be a string";
const MALFORMED_JSON: &str = "Malformed JSON body";

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_lowercase())
        .unwrap_or_default();

    if content_type == "application/json" || content_type.ends_with("+json") {
        BodyKind::Json
    } else if content_type == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

/// Pull the `message` out of the request body. Bodies of any other content
/// type are ignored, which leaves `message` missing.
fn extract_message(headers: &HeaderMap, body: &[u8]) -> Result<String, AppError> {
    let message = match body_kind(headers) {
        BodyKind::Json if body.iter().all(u8::is_ascii_whitespace) => None,
        BodyKind::Json => {
            let value: Value = serde_json::from_slice(body).map_err(|e| {
                tracing::debug!(error = %e, "Rejected malformed JSON body");
                AppError::bad_request(MALFORMED_JSON)
            })?;
            match value.get("message") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => return Err(AppError::bad_request(MESSAGE_NOT_STRING)),
            }
        }
        BodyKind::Form => serde_urlencoded::from_bytes::<EchoForm>(body)
            .map_err(|_| AppError::bad_request(MESSAGE_REQUIRED))?
            .message,
        BodyKind::Other => None,
    };

    match message {
        Some(m) if !m.is_empty() => Ok(m),
        _ => Err(AppError::bad_request(MESSAGE_REQUIRED)),
    }
}

pub async fn echo(
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<EchoResponse>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::bad_request(rejection.body_text())
        }
    })?;

    let message = extract_message(&headers, &body)?;

    let response = EchoResponse {
        length: message.chars().count(),
        echo: message,
        timestamp: timestamp(),
    };

    tracing::info!(request = %response.echo, response = ?response, "Echo endpoint accessed");
    Ok(Json(response))
}
