// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX classifier model wrapper
//!
//! Wraps ONNX Runtime around the ASL CNN exported from the trained
//! network. Input is NHWC `[1, S, S, 3]` f32 in [0, 1]; output is one score
//! per label, `[1, 29]` for the ASL alphabet.

use anyhow::{Context, Result};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::errors::InferenceError;
use crate::vision::{NormalizedTensor, CHANNELS};

/// A loaded model mapping one input tensor to a score vector
///
/// Implementations must be deterministic and safe to share across
/// request tasks.
#[cfg_attr(test, mockall::automock)]
pub trait InferenceModel: Send + Sync {
    /// Run the forward pass, returning one score per output class
    fn infer(&self, input: &NormalizedTensor) -> Result<Vec<f32>, InferenceError>;

    /// Human-readable model name used in logs and /health
    fn name(&self) -> String;
}

/// ONNX Runtime backed classifier
///
/// Runs on CPU. Cloning is cheap: the session is shared behind an `Arc`.
#[derive(Clone)]
pub struct OnnxClassifierModel {
    /// ONNX Runtime session; `run` needs exclusive access
    session: Arc<Mutex<Session>>,
    /// Model name (file stem of the artifact)
    name: String,
    /// Model input name
    input_name: String,
}

impl std::fmt::Debug for OnnxClassifierModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifierModel")
            .field("name", &self.name)
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifierModel {
    /// Load the classifier from an ONNX file
    ///
    /// # Arguments
    /// - `model_path`: Path to the ONNX model file
    /// - `side`: Expected input side length S
    /// - `intra_threads`: ONNX Runtime intra-op thread count
    ///
    /// # Errors
    /// Returns error if the file is missing, ONNX Runtime rejects it, or the
    /// declared input is not `[1, S, S, 3]` (dynamic dims accepted).
    /// Output/label agreement is checked later by `ClassifierAdapter::new`.
    pub fn load<P: AsRef<Path>>(model_path: P, side: u32, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Classifier model not found: {}", model_path.display());
        }

        info!("Loading classifier model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!(
                    "Failed to load classifier model from {}",
                    model_path.display()
                )
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .context("Classifier model declares no inputs")?;

        if session.outputs.is_empty() {
            anyhow::bail!("Classifier model declares no outputs");
        }

        if let Some(input) = session.inputs.first() {
            debug!("Classifier expected input: {:?}", input.input_type);
            if let Some(dims) = input.input_type.tensor_shape() {
                check_input_dims(dims, side)?;
            }
        }

        let name = model_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "classifier".to_string());

        info!("✅ Classifier model '{}' loaded (CPU, input '{}')", name, input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            name,
            input_name,
        })
    }
}

impl InferenceModel for OnnxClassifierModel {
    fn infer(&self, input: &NormalizedTensor) -> Result<Vec<f32>, InferenceError> {
        let input_value = Value::from_array(input.as_array().to_owned())
            .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;

        let mut session = lock_session(&self.session);

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(InferenceError::backend)?;

        let scores = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| InferenceError::InvalidOutput(e.to_string()))?;

        debug!("Classifier output shape: {:?}", scores.shape());

        Ok(scores.iter().copied().collect())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Check a declared NHWC input shape against side `side`; -1 marks a
/// dynamic dimension
fn check_input_dims(dims: &[i64], side: u32) -> Result<()> {
    let expected = [1, side as i64, side as i64, CHANNELS as i64];
    let matches = dims.len() == expected.len()
        && dims
            .iter()
            .zip(expected.iter())
            .all(|(&dim, &want)| dim < 0 || dim == want);

    if !matches {
        anyhow::bail!(
            "Classifier model expects input {:?}, node is configured for {:?}",
            dims,
            expected
        );
    }
    Ok(())
}

/// Take the session lock, recovering it if an earlier forward pass panicked.
/// A session keeps no per-request state between runs.
fn lock_session<T>(session: &Mutex<T>) -> MutexGuard<'_, T> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
