// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classifier adapter: binds a model to its label table and applies the
//! argmax decision rule

use std::sync::Arc;
use tracing::{debug, info};

use super::errors::{ClassifierError, InferenceError};
use super::labels::LabelTable;
use super::model::InferenceModel;
use crate::vision::NormalizedTensor;

/// Outcome of one classification
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predicted label, always a member of the adapter's label table
    pub label: String,
    /// Raw top score reported by the model (not renormalized)
    pub confidence: f32,
}

/// A model and the label table for its output layer, validated together
///
/// Created once at startup and shared read-only (`Arc<ClassifierAdapter>`)
/// by every request.
pub struct ClassifierAdapter {
    model: Arc<dyn InferenceModel>,
    labels: LabelTable,
    input_size: u32,
    model_name: String,
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("model_name", &self.model_name)
            .field("labels", &self.labels.len())
            .field("input_size", &self.input_size)
            .finish_non_exhaustive()
    }
}

impl ClassifierAdapter {
    /// Bind `model` to `labels`
    ///
    /// Runs one probe inference on an all-zero `[1, S, S, 3]` tensor and
    /// fails if the model's output length differs from the label count.
    pub fn new(
        model: Arc<dyn InferenceModel>,
        labels: LabelTable,
        input_size: u32,
    ) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::EmptyLabels);
        }
        if input_size == 0 {
            return Err(ClassifierError::ZeroInputSize);
        }

        let probe = NormalizedTensor::zeros(input_size);
        let scores = model.infer(&probe).map_err(ClassifierError::Probe)?;

        if scores.len() != labels.len() {
            return Err(ClassifierError::LabelMismatch {
                model_outputs: scores.len(),
                labels: labels.len(),
            });
        }

        let model_name = model.name();
        info!(
            "Classifier '{}' bound to {} labels ({}x{} input)",
            model_name,
            labels.len(),
            input_size,
            input_size
        );

        Ok(Self {
            model,
            labels,
            input_size,
            model_name,
        })
    }

    /// Classify one normalized image
    pub fn classify(&self, tensor: &NormalizedTensor) -> Result<PredictionResult, InferenceError> {
        if tensor.size() != self.input_size as usize {
            return Err(InferenceError::InvalidInput(format!(
                "tensor shape {:?} does not match model input [1, {}, {}, 3]",
                tensor.shape(),
                self.input_size,
                self.input_size
            )));
        }

        let scores = self.model.infer(tensor)?;

        if scores.len() != self.labels.len() {
            return Err(InferenceError::InvalidOutput(format!(
                "expected {} scores, got {}",
                self.labels.len(),
                scores.len()
            )));
        }

        if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
            return Err(InferenceError::InvalidOutput(format!(
                "non-finite score {} at index {}",
                scores[index], index
            )));
        }

        let (index, confidence) = argmax(&scores)
            .ok_or_else(|| InferenceError::InvalidOutput("empty score vector".to_string()))?;

        let label = self
            .labels
            .get(index)
            .ok_or_else(|| InferenceError::InvalidOutput(format!("index {} has no label", index)))?;

        debug!("argmax index {} -> '{}' ({:.4})", index, label, confidence);

        Ok(PredictionResult {
            label: label.to_string(),
            confidence,
        })
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Index and value of the maximum score; the first occurrence wins on ties
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best
}
