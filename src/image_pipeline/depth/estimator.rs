use image::imageops::FilterType;
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::depth::engine::InferenceEngine;
use crate::image_pipeline::depth::tensor::{DepthTensor, InputTensor};

/// Stateful depth estimation session owning the inference engine.
pub struct DepthEstimator<E: InferenceEngine> {
    engine: E,
    resize_filter: FilterType,
}

impl<E: InferenceEngine> DepthEstimator<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            resize_filter: FilterType::Triangle,
        }
    }

    /// Interpolation used when shrinking the source to the model input.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs the model on `image` and returns a depth map of the same size.
    ///
    /// No retry on failure; the error from the engine is returned as is.
    #[instrument(skip_all, fields(width = image.width, height = image.height))]
    pub fn estimate(&mut self, image: &RgbImageData) -> Result<DepthMap> {
        image.validate()?;
        let size = self.engine.input_size();

        let input = {
            let _span = tracing::info_span!("preprocess", size).entered();
            InputTensor::from_image(image, size, self.resize_filter)?
        };
        debug!("Input tensor shape: {:?}", input.shape());

        let output = {
            let _span = tracing::info_span!("infer").entered();
            self.engine.infer(&input)?
        };
        if output.size() != size {
            return Err(PipelineError::Inference(format!(
                "model returned {0}x{0} depth for {1}x{1} input",
                output.size(),
                size
            )));
        }

        let mut depth = resample_nearest(&output, image.width, image.height)?;
        let (min, max) = depth.range();
        debug!(min, max, "Raw depth range");
        normalize(&mut depth);
        Ok(depth)
    }
}

/// Maps every output pixel back onto the model grid by nearest neighbour:
/// `src = floor(dst * size / extent)` on each axis.
pub fn resample_nearest(raw: &DepthTensor, width: usize, height: usize) -> Result<DepthMap> {
    let size = raw.size();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = raw.row(y * size / height);
        data.extend((0..width).map(|x| row[x * size / width]));
    }
    DepthMap::new(width, height, data)
}

/// Rescales to `[0, 1]` using the global min and max. A flat map is left as is.
pub fn normalize(depth: &mut DepthMap) {
    let (min, max) = depth.range();
    let range = max - min;
    if range > 0.0 {
        for v in &mut depth.data {
            *v = (*v - min) / range;
        }
    }
}
