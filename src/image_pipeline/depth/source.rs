use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::depth::engine::InferenceEngine;
use crate::image_pipeline::depth::estimator::DepthEstimator;

/// Anything that can produce a depth map aligned with a source image.
pub trait DepthSource {
    fn depth_for(&mut self, image: &RgbImageData) -> Result<DepthMap>;
}

impl<E: InferenceEngine> DepthSource for DepthEstimator<E> {
    fn depth_for(&mut self, image: &RgbImageData) -> Result<DepthMap> {
        self.estimate(image)
    }
}

/// Depth computed elsewhere, e.g. loaded from a grayscale depth image.
#[derive(Debug, Clone)]
pub struct PrecomputedDepth {
    depth: DepthMap,
}

impl PrecomputedDepth {
    pub fn new(depth: DepthMap) -> Self {
        Self { depth }
    }
}

impl DepthSource for PrecomputedDepth {
    fn depth_for(&mut self, image: &RgbImageData) -> Result<DepthMap> {
        if !self.depth.same_size_as(image) {
            return Err(PipelineError::DimensionMismatch {
                image_width: image.width,
                image_height: image.height,
                depth_width: self.depth.width,
                depth_height: self.depth.height,
            });
        }
        debug!("Using precomputed {}x{} depth map", self.depth.width, self.depth.height);
        Ok(self.depth.clone())
    }
}
