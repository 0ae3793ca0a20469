// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use asl_predict_node::{
    api::{start_server, AppState},
    classifier::{ClassifierAdapter, LabelTable, OnnxClassifierModel},
    config::ServerConfig,
};
use clap::Parser;
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();
    config.validate().context("Invalid configuration")?;

    println!("🚀 Starting ASL Predict Node...\n");
    println!("📦 BUILD VERSION: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let labels = match &config.labels_path {
        Some(path) => {
            println!("🏷️  Loading labels from {}", path.display());
            LabelTable::from_file(path)?
        }
        None => LabelTable::asl(),
    };

    println!("🧠 Loading classifier model: {}", config.model_path.display());
    let model = OnnxClassifierModel::load(
        &config.model_path,
        config.image_size,
        config.intra_threads,
    )
        .context("Failed to load classifier model")?;

    // Fails fast when the model's output layer and the label table disagree
    let classifier = ClassifierAdapter::new(Arc::new(model), labels, config.image_size)
        .context("Classifier model does not match label table")?;
    println!(
        "✅ Classifier ready: {} labels, {}x{} input",
        classifier.labels().len(),
        config.image_size,
        config.image_size
    );

    let state = AppState::new(Arc::new(classifier), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    let port = config.listen_addr.port();
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 ASL Predict Node is running!");
    println!("{}", separator);
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", port);
    println!("  Labels:       http://localhost:{}/labels", port);
    println!("  Predict:      POST http://localhost:{}/predict", port);
    println!("\nTest with curl:");
    println!(
        "  curl -X POST http://localhost:{}/predict -F 'file=@hand.jpg'",
        port
    );
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    start_server(listener, state).await?;

    println!("👋 Goodbye!");
    Ok(())
}
