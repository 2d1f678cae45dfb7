use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::effect::params::{EffectCoefficients, EffectParameters};
use crate::image_pipeline::smoothing::smooth_depth;

/// Rec. 601 luma of an 8-bit RGB pixel, in 8-bit scale.
pub fn luminance([r, g, b]: [u8; 3]) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

fn check_dimensions(image: &RgbImageData, depth: &DepthMap) -> Result<()> {
    image.validate()?;
    if !depth.same_size_as(image) || depth.validate().is_err() {
        return Err(PipelineError::DimensionMismatch {
            image_width: image.width,
            image_height: image.height,
            depth_width: depth.width,
            depth_height: depth.height,
        });
    }
    Ok(())
}

/// Renders the red/blue image, smoothing `depth` first according to `params.smoothing`.
///
/// Inputs are never modified, so the same image and depth map can be
/// rendered repeatedly, from several threads, with different parameters.
#[instrument(skip_all, fields(width = image.width, height = image.height))]
pub fn render(
    image: &RgbImageData,
    depth: &DepthMap,
    params: &EffectParameters,
) -> Result<RgbImageData> {
    check_dimensions(image, depth)?;
    let smoothed = smooth_depth(depth, params.smoothing)?;
    render_smoothed(image, &smoothed, params)
}

/// Renders against a depth map that is already smoothed; `params.smoothing` is ignored.
pub fn render_smoothed(
    image: &RgbImageData,
    depth: &DepthMap,
    params: &EffectParameters,
) -> Result<RgbImageData> {
    check_dimensions(image, depth)?;
    let coeffs = EffectCoefficients::from(params);
    debug!(?coeffs, "Rendering chromostereo effect");

    let width = image.width;
    let mut data = vec![0u8; image.data.len()];
    data.par_chunks_mut(width * 3)
        .zip(image.data.par_chunks(width * 3))
        .zip(depth.data.par_chunks(width))
        .for_each(|((row_out, row_in), depth_row)| {
            for ((out, px), &d) in row_out
                .chunks_exact_mut(3)
                .zip(row_in.chunks_exact(3))
                .zip(depth_row)
            {
                let tone = coeffs.tone(luminance([px[0], px[1], px[2]]));
                out.copy_from_slice(&coeffs.shade(tone, d));
            }
        });

    Ok(RgbImageData {
        width,
        height: image.height,
        data,
    })
}
