//! Pipeline conversions module
//!
//! Orchestrates a complete photo to chromostereo TIFF conversion.

mod chromo_stereo;

#[cfg(test)]
mod tests;

pub use chromo_stereo::{ChromoStereoPipeline, ConversionOutput};
