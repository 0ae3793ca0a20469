// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction response types

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::classifier::PredictionResult;

/// Response from POST /predict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    /// Predicted label (e.g. "A", "del", "space")
    pub prediction: String,
    /// Raw top score of the model
    pub confidence: f32,
}

impl PredictResponse {
    /// Build the response from a classification, validating it first
    pub fn from_result(result: PredictionResult) -> Result<Self, ApiError> {
        if result.label.is_empty() {
            return Err(ApiError::InternalError(
                "classifier produced an empty label".to_string(),
            ));
        }

        if !result.confidence.is_finite() {
            return Err(ApiError::InferenceFailed(format!(
                "classifier produced non-finite confidence {}",
                result.confidence
            )));
        }

        if !(0.0..=1.0).contains(&result.confidence) {
            // Reported as-is; the model's top activation is not renormalized
            tracing::warn!(
                "Confidence {} for '{}' is outside [0, 1]",
                result.confidence,
                result.label
            );
        }

        Ok(Self {
            prediction: result.label,
            confidence: result.confidence,
        })
    }
}
