//! Reader backed by the `image` crate (PNG, JPEG, TIFF, WebP, ...).

use image::DynamicImage;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::decode::reader::SourceImageReader;

pub struct ImageCrateReader;

fn decode(data: &[u8]) -> Result<DynamicImage> {
    debug!("Decoding image, {} bytes", data.len());
    image::load_from_memory(data).map_err(|e| PipelineError::DecodeError(e.to_string()))
}

impl SourceImageReader for ImageCrateReader {
    /// Decodes any supported format and drops alpha, converting to 8-bit RGB.
    fn read_image(&self, data: &[u8]) -> Result<RgbImageData> {
        let rgb = decode(data)?.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        debug!("Decoded image: {}x{}", width, height);
        RgbImageData::new(width, height, rgb.into_raw())
    }

    /// Reads a grayscale depth image. 16-bit sources keep their precision
    /// (`v / 65535`), everything else is read as 8-bit (`v / 255`).
    fn read_depth(&self, data: &[u8]) -> Result<DepthMap> {
        let decoded = decode(data)?;
        let color = decoded.color();
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);

        if color.bytes_per_pixel() / color.channel_count() >= 2 {
            let luma = decoded.to_luma16();
            let values = luma.as_raw().iter().map(|&v| v as f32 / u16::MAX as f32).collect();
            return DepthMap::new(width, height, values);
        }
        DepthMap::from_gray8(width, height, decoded.to_luma8().as_raw())
    }
}
