//! Common utilities module
//!
//! Shared data model, error type and step timings used across the pipeline.

pub mod error;
pub mod types;
pub mod timing;

pub use error::{PipelineError, Result};
pub use types::{RgbImageData, DepthMap};
pub use timing::{PipelineTimings, StepTiming, Timer};
