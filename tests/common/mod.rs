// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: stub models, in-memory images and multipart requests
#![allow(dead_code)]

use asl_predict_node::{
    api::{create_router, AppState},
    classifier::{ClassifierAdapter, InferenceError, InferenceModel, LabelTable},
    vision::NormalizedTensor,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub const SIDE: u32 = 64;
pub const MAX_UPLOAD: usize = 1024 * 1024;
pub const BOUNDARY: &str = "----asl-test-boundary";

/// Score vector of length 29 with `value` at `index` and zeros elsewhere
pub fn one_hot(index: usize, value: f32) -> Vec<f32> {
    let mut scores = vec![0.0; 29];
    scores[index] = value;
    scores
}

/// Always returns the same scores
pub struct FixedScoresModel(pub Vec<f32>);

impl InferenceModel for FixedScoresModel {
    fn infer(&self, _input: &NormalizedTensor) -> Result<Vec<f32>, InferenceError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> String {
        "fixed-scores".to_string()
    }
}

/// Answers the startup probe, then fails every request
pub struct FailAfterProbeModel {
    calls: AtomicUsize,
}

impl FailAfterProbeModel {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl InferenceModel for FailAfterProbeModel {
    fn infer(&self, _input: &NormalizedTensor) -> Result<Vec<f32>, InferenceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(vec![0.0; 29])
        } else {
            Err(InferenceError::Backend("corrupt weights".to_string()))
        }
    }

    fn name(&self) -> String {
        "fail-after-probe".to_string()
    }
}

/// Answers the startup probe, panics on the first request while holding its
/// lock, then answers `index` for every later request
pub struct PanicOnceModel {
    calls: Mutex<usize>,
    index: usize,
}

impl PanicOnceModel {
    pub fn new(index: usize) -> Self {
        Self {
            calls: Mutex::new(0),
            index,
        }
    }
}

impl InferenceModel for PanicOnceModel {
    fn infer(&self, _input: &NormalizedTensor) -> Result<Vec<f32>, InferenceError> {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        *calls += 1;
        if *calls == 2 {
            panic!("forward pass panicked");
        }
        Ok(one_hot(self.index, 1.0))
    }

    fn name(&self) -> String {
        "panic-once".to_string()
    }
}

/// Picks a class from the mean pixel intensity, so different images give
/// different (but deterministic) answers
pub struct MeanIntensityModel;

impl InferenceModel for MeanIntensityModel {
    fn infer(&self, input: &NormalizedTensor) -> Result<Vec<f32>, InferenceError> {
        let data = input.as_array();
        let mean = data.sum() / data.len() as f32;
        let top = ((mean * 28.0).round() as usize).min(28);

        Ok((0..29)
            .map(|i| 1.0 / (1.0 + (i as f32 - top as f32).abs()))
            .collect())
    }

    fn name(&self) -> String {
        "mean-intensity".to_string()
    }
}

pub fn adapter_with(model: impl InferenceModel + 'static) -> Arc<ClassifierAdapter> {
    Arc::new(
        ClassifierAdapter::new(Arc::new(model), LabelTable::asl(), SIDE)
            .expect("stub model should bind to the ASL table"),
    )
}

pub fn app_with(model: impl InferenceModel + 'static) -> Router {
    create_router(AppState::new(adapter_with(model), MAX_UPLOAD))
}

pub fn app_with_limit(model: impl InferenceModel + 'static, max_upload: usize) -> Router {
    create_router(AppState::new(adapter_with(model), max_upload))
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("PNG encoding should succeed");
    buf.into_inner()
}

/// Multipart body with a single field
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(filename) => {
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    field, filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
        }
        None => {
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", field).as_bytes(),
            );
        }
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn predict_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// POST /predict with `data` in the `file` field
pub fn upload_request(data: &[u8]) -> Request<Body> {
    predict_request(multipart_body("file", Some("hand.png"), data))
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
