use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::tiff::types::OutputConfig;

pub trait TiffWriter {
    fn write_rgb_tiff(&self, image: &RgbImageData, output: &mut dyn Write, config: &OutputConfig) -> Result<()>;
    fn write_depth_tiff(&self, depth: &DepthMap, output: &mut dyn Write, config: &OutputConfig) -> Result<()>;
}
