// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handler

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::response::PredictResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::classifier::{InferenceError, PredictionResult};
use crate::vision::normalize;

/// Multipart field the upload is expected in
pub const FILE_FIELD: &str = "file";

/// POST /predict - Classify an uploaded hand-sign image
///
/// # Request
/// `multipart/form-data` with the image in the `file` field. When no field
/// is named `file`, the first field carrying a filename or data is used.
///
/// # Response
/// - `prediction`: One of the 29 ASL labels
/// - `confidence`: Raw top score of the model
///
/// # Errors
/// - 400 Bad Request: No file field, empty upload, or not an image
/// - 413 Payload Too Large: Upload exceeds the configured limit
/// - 500 Internal Server Error: Model invocation failed
pub async fn predict_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let started = Instant::now();

    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("Predict request rejected: {}", e);
            return Err(e);
        }
    };

    debug!("Received upload of {} bytes", upload.len());

    let classifier = state.classifier.clone();
    let max_bytes = state.max_upload_bytes;

    // Decode, resize and the forward pass are CPU-bound
    let outcome = tokio::task::spawn_blocking(move || -> Result<PredictionResult, ApiError> {
        let tensor = normalize(&upload, classifier.input_size(), max_bytes)?;
        Ok(classifier.classify(&tensor)?)
    })
    .await
    .map_err(|e| ApiError::from(InferenceError::Join(e.to_string())))
    .and_then(|result| result);

    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_client_error() => {
            warn!("Predict request rejected: {}", e);
            return Err(e);
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            return Err(e);
        }
    };

    let response = PredictResponse::from_result(result)?;

    info!(
        "Prediction complete: '{}' ({:.4}) in {}ms",
        response.prediction,
        response.confidence,
        started.elapsed().as_millis()
    );

    Ok(Json(response))
}

/// Pull the image bytes out of the multipart body
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    let mut fallback: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let is_file_field = field.name() == Some(FILE_FIELD);
        if !is_file_field && fallback.is_some() {
            continue;
        }

        let has_filename = field.file_name().is_some();
        let data = field.bytes().await.map_err(multipart_error)?;

        if is_file_field {
            return Ok(data);
        }
        if has_filename || !data.is_empty() {
            fallback = Some(data);
        }
    }

    fallback.ok_or_else(|| {
        ApiError::InvalidRequest(format!(
            "multipart body has no '{}' file field",
            FILE_FIELD
        ))
    })
}

fn multipart_error(err: axum_extra::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::UploadTooLarge(err.body_text())
    } else {
        ApiError::InvalidRequest(format!("malformed multipart body: {}", err.body_text()))
    }
}
