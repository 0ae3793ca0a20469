// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hand-sign classification
//!
//! - `InferenceModel`: opaque tensor -> score vector mapping (ONNX in production)
//! - `LabelTable`: ordered labels matching the model's output layer
//! - `ClassifierAdapter`: binds the two at startup and applies argmax

pub mod adapter;
pub mod errors;
pub mod labels;
pub mod model;

pub use adapter::{argmax, ClassifierAdapter, PredictionResult};
pub use errors::{ClassifierError, InferenceError};
pub use labels::{LabelTable, ASL_LABELS};
pub use model::{InferenceModel, OnnxClassifierModel};
