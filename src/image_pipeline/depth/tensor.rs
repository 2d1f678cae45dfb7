//! Model input/output tensors

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::RgbImageData;

/// Planar float tensor of shape `[1, 3, size, size]`, channels ordered R, G, B.
#[derive(Debug, Clone)]
pub struct InputTensor {
    pub size: usize,
    pub data: Vec<f32>,
}

impl InputTensor {
    pub fn shape(&self) -> [usize; 4] {
        [1, 3, self.size, self.size]
    }

    /// Resizes `image` to `size x size` and scales each channel by `1/255`.
    pub fn from_image(image: &RgbImageData, size: usize, filter: FilterType) -> Result<Self> {
        let view = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(
            image.width as u32,
            image.height as u32,
            image.data.as_slice(),
        )
        .ok_or(PipelineError::InvalidDimensions(image.width, image.height))?;

        let resized = imageops::resize(&view, size as u32, size as u32, filter);

        let plane = size * size;
        let mut data = vec![0.0f32; plane * 3];
        for (x, y, pixel) in resized.enumerate_pixels() {
            let i = y as usize * size + x as usize;
            for c in 0..3 {
                data[c * plane + i] = pixel[c] as f32 / 255.0;
            }
        }

        Ok(Self { size, data })
    }

    /// One channel plane, `0 = R`, `1 = G`, `2 = B`.
    pub fn channel(&self, c: usize) -> &[f32] {
        let plane = self.size * self.size;
        &self.data[c * plane..(c + 1) * plane]
    }
}

/// Raw, unnormalized `size x size` model output, row-major.
///
/// Only constructed through [`DepthTensor::new`], so `data` always holds
/// exactly `size * size` values.
#[derive(Debug, Clone)]
pub struct DepthTensor {
    size: usize,
    data: Vec<f32>,
}

impl DepthTensor {
    pub fn new(size: usize, data: Vec<f32>) -> Result<Self> {
        if size == 0 || data.len() != size * size {
            return Err(PipelineError::Inference(format!(
                "expected {size}x{size} depth output, got {} values",
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// One model row.
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.size..(y + 1) * self.size]
    }
}
