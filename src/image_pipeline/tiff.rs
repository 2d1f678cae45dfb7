//! TIFF writing module
//!
//! Writes rendered RGB images and grayscale depth previews with configurable compression.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, OutputConfig, OutputConfigBuilder};
