// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::classifier::InferenceError;
use crate::vision::ImageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Malformed request (missing file field, broken multipart body)
    InvalidRequest(String),
    /// Upload is not a decodable image
    InvalidImage(String),
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
    /// Request body cut off by the server's body limit
    UploadTooLarge(String),
    /// Model invocation failed
    InferenceFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::InvalidImage(msg) => ("invalid_image", msg.clone(), None),
            ApiError::PayloadTooLarge { size, max } => {
                let mut details = HashMap::new();
                details.insert(
                    "max_bytes".to_string(),
                    serde_json::Value::Number((*max as u64).into()),
                );
                (
                    "payload_too_large",
                    format!("Upload of {} bytes exceeds limit of {} bytes", size, max),
                    Some(details),
                )
            }
            ApiError::UploadTooLarge(msg) => ("payload_too_large", msg.clone(), None),
            ApiError::InferenceFailed(msg) => ("inference_error", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } | ApiError::UploadTooLarge(_) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::InferenceFailed(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::InvalidImage(msg) => write!(f, "Invalid image: {}", msg),
            ApiError::PayloadTooLarge { size, max } => {
                write!(f, "Payload too large: {} bytes (max: {})", size, max)
            }
            ApiError::UploadTooLarge(msg) => write!(f, "Upload too large: {}", msg),
            ApiError::InferenceFailed(msg) => write!(f, "Inference failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::TooLarge(size, max) => ApiError::PayloadTooLarge { size, max },
            other => ApiError::InvalidImage(other.to_string()),
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        ApiError::InferenceFailed(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
