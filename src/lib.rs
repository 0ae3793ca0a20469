// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod vision;

pub use api::{create_router, AppState, PredictResponse};
pub use classifier::{
    ClassifierAdapter, InferenceError, InferenceModel, LabelTable, OnnxClassifierModel,
    PredictionResult,
};
pub use config::ServerConfig;
pub use vision::{normalize, ImageError, NormalizedTensor};
