//! Monocular depth estimation
//!
//! Wraps an opaque inference engine: the source image is resized into a
//! square planar tensor, the engine returns a square depth tensor, and the
//! result is resampled back to the source resolution and normalized.

mod engine;
mod tensor;
mod estimator;
mod source;
#[cfg(feature = "onnx")]
mod onnx_engine;


pub use engine::{InferenceEngine, MODEL_INPUT_SIZE};
pub use tensor::{InputTensor, DepthTensor};
pub use estimator::{DepthEstimator, resample_nearest, normalize};
pub use source::{DepthSource, PrecomputedDepth};
#[cfg(feature = "onnx")]
pub use onnx_engine::{OnnxEngine, load_model};
