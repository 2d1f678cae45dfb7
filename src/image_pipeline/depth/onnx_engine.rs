//! ONNX Runtime inference engine

use std::path::Path;

use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;
use tracing::info;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::depth::engine::{InferenceEngine, MODEL_INPUT_SIZE};
use crate::image_pipeline::depth::estimator::DepthEstimator;
use crate::image_pipeline::depth::tensor::{DepthTensor, InputTensor};

const INTRA_THREADS: usize = 4;

fn inference_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Inference(e.to_string())
}

/// Depth model session backed by ONNX Runtime.
pub struct OnnxEngine {
    session: Session,
    input_size: usize,
}

impl OnnxEngine {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(model = %path.display(), "Loading depth model");
        let session = Session::builder()
            .map_err(inference_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(inference_error)?
            .with_intra_threads(INTRA_THREADS)
            .map_err(inference_error)?
            .commit_from_file(path)
            .map_err(inference_error)?;
        Ok(Self { session, input_size: MODEL_INPUT_SIZE })
    }

    pub fn from_memory(model: &[u8]) -> Result<Self> {
        info!(bytes = model.len(), "Loading depth model from memory");
        let session = Session::builder()
            .map_err(inference_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(inference_error)?
            .with_intra_threads(INTRA_THREADS)
            .map_err(inference_error)?
            .commit_from_memory(model)
            .map_err(inference_error)?;
        Ok(Self { session, input_size: MODEL_INPUT_SIZE })
    }

    /// Overrides the square resolution the model was exported with.
    pub fn with_input_size(mut self, size: usize) -> Self {
        self.input_size = size;
        self
    }
}

impl InferenceEngine for OnnxEngine {
    fn input_size(&self) -> usize {
        self.input_size
    }

    fn infer(&mut self, input: &InputTensor) -> Result<DepthTensor> {
        let tensor = Tensor::from_array((input.shape(), input.data.clone()))
            .map_err(inference_error)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(inference_error)?;

        // [1, S, S] or [1, 1, S, S] depending on the export
        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;
        DepthTensor::new(self.input_size, data.to_vec())
    }
}

/// Loads the model at `path` into a ready-to-use estimator.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<DepthEstimator<OnnxEngine>> {
    Ok(DepthEstimator::new(OnnxEngine::from_file(path)?))
}
