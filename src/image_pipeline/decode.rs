//! Source image decoding module
//!
//! Turns encoded image bytes into the RGB and depth grids used by the pipeline.

mod reader;
mod image_reader;

pub use reader::SourceImageReader;
pub use image_reader::ImageCrateReader;
