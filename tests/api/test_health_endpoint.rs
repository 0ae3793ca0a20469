// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /health and GET /labels tests

use asl_predict_node::api::{HealthResponse, LabelsResponse};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use crate::common::*;

#[tokio::test]
async fn test_health_reports_bound_model() {
    let app = app_with(FixedScoresModel(one_hot(0, 1.0)));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.model, "fixed-scores");
    assert_eq!(health.labels, 29);
    assert_eq!(health.input_size, SIDE);
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_uses_camel_case() {
    let app = app_with(FixedScoresModel(one_hot(0, 1.0)));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["inputSize"], 64);
}

#[tokio::test]
async fn test_labels_in_output_order() {
    let app = app_with(FixedScoresModel(one_hot(0, 1.0)));

    let response = app
        .oneshot(Request::get("/labels").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let labels: LabelsResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(labels.labels.len(), 29);
    assert_eq!(labels.labels[0], "A");
    assert_eq!(labels.labels[25], "Z");
    assert_eq!(&labels.labels[26..], &["del", "nothing", "space"]);
}

#[tokio::test]
async fn test_predict_route_rejects_get() {
    let app = app_with(FixedScoresModel(one_hot(0, 1.0)));

    let response = app
        .oneshot(Request::get("/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
