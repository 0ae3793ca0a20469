// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Failure inside a forward pass. Always a server fault.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model backend failed: {0}")]
    Backend(String),

    #[error("Invalid model input: {0}")]
    InvalidInput(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Inference task aborted: {0}")]
    Join(String),
}

impl InferenceError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Errors binding a model to its label table at startup
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Label table is empty")]
    EmptyLabels,

    #[error("Model outputs {model_outputs} scores but label table has {labels} entries")]
    LabelMismatch { model_outputs: usize, labels: usize },

    #[error("Model input side must be greater than 0")]
    ZeroInputSize,

    #[error("Probe inference failed: {0}")]
    Probe(#[source] InferenceError),
}
