// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the ASL classifier
//!
//! Steps:
//! 1. Convert to 3-channel RGB (alpha dropped, grayscale replicated)
//! 2. Stretch to S x S (aspect ratio is not preserved)
//! 3. Scale pixels from [0, 255] to [0.0, 1.0]
//! 4. Lay out as NHWC tensor [1, S, S, 3]

use image::imageops::{self, FilterType};
use image::DynamicImage;
use ndarray::Array4;
use thiserror::Error;

use super::image_utils::{decode_image_bytes, ImageError};

/// Side length the ASL CNN was trained with
pub const DEFAULT_INPUT_SIZE: u32 = 64;

/// RGB
pub const CHANNELS: usize = 3;

/// Bicubic, the decoder default used when the model was trained
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

#[derive(Debug, Error, PartialEq)]
pub enum TensorError {
    #[error("Invalid tensor shape: {0:?}, expected [1, S, S, 3]")]
    InvalidShape(Vec<usize>),

    #[error("Tensor value {value} at flat index {index} is outside [0.0, 1.0]")]
    OutOfRange { index: usize, value: f32 },
}

/// Model input tensor of shape [1, S, S, 3] with every value in [0.0, 1.0]
///
/// Only constructed through [`preprocess_image`], [`NormalizedTensor::zeros`]
/// or the validating [`NormalizedTensor::from_array`], so holders can rely on
/// the shape and range without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array4<f32>,
}

impl NormalizedTensor {
    /// All-black input of side `size`
    pub fn zeros(size: u32) -> Self {
        let size = size as usize;
        Self {
            data: Array4::zeros((1, size, size, CHANNELS)),
        }
    }

    /// Wrap an existing array after validating shape and value range
    pub fn from_array(data: Array4<f32>) -> Result<Self, TensorError> {
        let shape = data.shape();
        if shape[0] != 1 || shape[1] == 0 || shape[1] != shape[2] || shape[3] != CHANNELS {
            return Err(TensorError::InvalidShape(shape.to_vec()));
        }

        if let Some((index, &value)) = data
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(TensorError::OutOfRange { index, value });
        }

        Ok(Self { data })
    }

    /// Side length S
    pub fn size(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array4<f32> {
        self.data
    }
}

/// Preprocess a decoded image into the classifier's input tensor
pub fn preprocess_image(image: &DynamicImage, size: u32) -> NormalizedTensor {
    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, size, size, RESIZE_FILTER);

    let side = size as usize;
    let data = Array4::from_shape_fn((1, side, side, CHANNELS), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    });

    NormalizedTensor { data }
}

/// Decode uploaded bytes and produce the classifier's input tensor
pub fn normalize(bytes: &[u8], size: u32, max_bytes: usize) -> Result<NormalizedTensor, ImageError> {
    let (image, info) = decode_image_bytes(bytes, max_bytes)?;

    tracing::debug!(
        "Decoded {:?} image: {}x{} {:?}, {} bytes",
        info.format,
        info.width,
        info.height,
        info.color,
        info.size_bytes
    );

    Ok(preprocess_image(&image, size))
}
