//! Image and depth grid types shared by every pipeline stage

use crate::image_pipeline::common::error::{PipelineError, Result};

/// 8-bit RGB source or output image
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl RgbImageData {
    /// Wraps an interleaved RGB buffer, rejecting empty grids and short buffers.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let image = Self { width, height, data };
        image.validate()?;
        Ok(image)
    }

    /// Uniform image filled with one color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        let data = rgb.iter().copied().cycle().take(width * height * 3).collect();
        Self::new(width, height, data)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.data.len() != self.width * self.height * 3 {
            return Err(PipelineError::InvalidDimensions(self.width, self.height));
        }
        Ok(())
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Per-pixel scalar depth, row-major, aligned with its source image.
///
/// Values produced by the estimator are normalized to [0, 1] unless the
/// raw map was flat, in which case they are kept as the model returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl DepthMap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        let depth = Self { width, height, data };
        depth.validate()?;
        Ok(depth)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.data.len() != self.width * self.height {
            return Err(PipelineError::InvalidDimensions(self.width, self.height));
        }
        Ok(())
    }

    /// Builds a depth map from rows of equal length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        Self::new(width, height, rows.concat())
    }

    /// Reads an 8-bit grayscale depth image, each level mapped to `v / 255`.
    pub fn from_gray8(width: usize, height: usize, levels: &[u8]) -> Result<Self> {
        Self::new(width, height, levels.iter().map(|&v| v as f32 / 255.0).collect())
    }

    /// Grayscale preview: `trunc(v * 255)` clamped to the 8-bit range.
    pub fn to_gray8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| (v * 255.0).clamp(0.0, 255.0) as u8)
            .collect()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Global `(min, max)` over all values.
    pub fn range(&self) -> (f32, f32) {
        self.data.iter().fold((f32::MAX, -f32::MAX), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    }

    pub fn same_size_as(&self, image: &RgbImageData) -> bool {
        self.width == image.width && self.height == image.height
    }
}
