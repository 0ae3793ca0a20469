// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and tensor preparation for hand-sign classification
//!
//! Runs on CPU; the whole path is a pure function of the uploaded bytes.

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo, DEFAULT_MAX_IMAGE_SIZE};
pub use preprocessing::{
    normalize, preprocess_image, NormalizedTensor, TensorError, CHANNELS, DEFAULT_INPUT_SIZE,
};
