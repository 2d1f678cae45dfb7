//! Chromostereopsis effect renderer
//!
//! Fuses source luminance with the depth map into a red/blue image: near
//! and far regions get opposite hues, which the eye's chromatic aberration
//! turns into perceived depth.

mod params;
mod renderer;


pub use params::{EffectParameters, EffectParametersBuilder, EffectCoefficients};
pub use renderer::{render, render_smoothed, luminance};
