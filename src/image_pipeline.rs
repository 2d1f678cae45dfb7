//! Chromostereopsis image pipeline
//!
//! Photo -> depth estimation -> optional edge-aware smoothing -> red/blue
//! effect rendering, with decoding and TIFF encoding at the edges.

pub mod common;
pub mod depth;
pub mod smoothing;
pub mod effect;
pub mod session;
pub mod decode;
pub mod tiff;
pub mod conversions;

pub use common::{
    PipelineError,
    Result,
    RgbImageData,
    DepthMap,
    PipelineTimings,
};

pub use depth::{
    DepthEstimator,
    DepthSource,
    InferenceEngine,
    PrecomputedDepth,
    MODEL_INPUT_SIZE,
};

#[cfg(feature = "onnx")]
pub use depth::{OnnxEngine, load_model};

pub use smoothing::smooth_depth;

pub use effect::{
    EffectParameters,
    render,
};

pub use session::ChromoSession;

pub use decode::{
    SourceImageReader,
    ImageCrateReader,
};

pub use tiff::{
    TiffCompression,
    OutputConfig,
    OutputConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use conversions::{
    ChromoStereoPipeline,
    ConversionOutput,
};
