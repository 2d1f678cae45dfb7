//! Edge-aware depth smoothing
//!
//! The depth map is quantized to 8 bits, run through a bilateral filter and
//! scaled back to [0, 1]. The quantization is part of the effect's look.

mod bilateral;


pub use bilateral::{BILATERAL_DIAMETER, bilateral_filter_u8};

use std::borrow::Cow;

use tracing::{debug, instrument};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::DepthMap;

/// Smoothing control `[0, 100]` to filter radius.
pub fn smoothing_radius(smoothing: i32) -> f32 {
    smoothing.clamp(0, 100) as f32 / 10.0
}

/// Smooths `depth` for the given control value.
///
/// Returns the input untouched when the control is zero. Fails with
/// `InvalidDimensions` if `depth.data` does not cover `width * height`.
#[instrument(skip(depth), fields(width = depth.width, height = depth.height))]
pub fn smooth_depth(depth: &DepthMap, smoothing: i32) -> Result<Cow<'_, DepthMap>> {
    let radius = smoothing_radius(smoothing);
    if radius <= 0.0 {
        return Ok(Cow::Borrowed(depth));
    }
    depth.validate()?;

    let sigma = (radius * 10.0).max(1.0);
    debug!(sigma, "Bilateral smoothing");

    let levels = quantize_u8(&depth.data);
    let filtered = bilateral_filter_u8(&levels, depth.width, depth.height, sigma, sigma);

    Ok(Cow::Owned(DepthMap {
        width: depth.width,
        height: depth.height,
        data: filtered.iter().map(|&v| v as f32 / 255.0).collect(),
    }))
}

/// `v * 255` rounded half to even and saturated to `[0, 255]`.
pub fn quantize_u8(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .map(|&v| (v * 255.0).round_ties_even().clamp(0.0, 255.0) as u8)
        .collect()
}
