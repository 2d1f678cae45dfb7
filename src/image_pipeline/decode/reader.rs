use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};

pub trait SourceImageReader {
    fn read_image(&self, data: &[u8]) -> Result<RgbImageData>;
    fn read_depth(&self, data: &[u8]) -> Result<DepthMap>;
}
