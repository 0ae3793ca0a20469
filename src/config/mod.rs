// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Every flag falls back to an environment variable, so the node can be
//! configured from a `.env` file as well as the command line.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::vision::{DEFAULT_INPUT_SIZE, DEFAULT_MAX_IMAGE_SIZE};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MODEL_PATH: &str = "./models/asl_detector_cnn.onnx";
pub const DEFAULT_INTRA_THREADS: usize = 4;

/// ASL Predict Node
#[derive(Parser, Debug, Clone)]
#[command(name = "asl-predict-node")]
#[command(version)]
#[command(about = "HTTP inference node classifying ASL hand-sign images", long_about = None)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Path to the ONNX classifier model
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Optional label file (one label per line, in model output order).
    /// The built-in 29-symbol ASL table is used when unset.
    #[arg(long, env = "LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Side length S of the square model input
    #[arg(long, env = "IMAGE_SIZE", default_value_t = DEFAULT_INPUT_SIZE)]
    pub image_size: u32,

    /// Largest accepted upload in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ONNX_INTRA_THREADS", default_value_t = DEFAULT_INTRA_THREADS)]
    pub intra_threads: usize,
}

impl Default for ServerConfig {
    /// Same values clap uses when no flag or variable is set
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: None,
            image_size: DEFAULT_INPUT_SIZE,
            max_upload_bytes: DEFAULT_MAX_IMAGE_SIZE,
            intra_threads: DEFAULT_INTRA_THREADS,
        }
    }
}

impl ServerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.image_size == 0 {
            return Err(anyhow!("Image size must be greater than 0"));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("Max upload size must be greater than 0"));
        }
        if self.intra_threads == 0 {
            return Err(anyhow!("ONNX intra thread count must be greater than 0"));
        }
        Ok(())
    }
}
