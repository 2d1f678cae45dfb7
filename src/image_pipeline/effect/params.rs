//! Effect controls and the coefficients derived from them

/// The nine user controls, each conventionally in `[0, 100]`.
///
/// Values are not trusted: every consumer goes through [`EffectParameters::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectParameters {
    /// Depth at which the hue crosses over, as a percentage of the depth range
    pub threshold: i32,
    /// Maximum sharpness of the crossover
    pub depth_scale: i32,
    /// Softens the crossover by dividing the sharpness
    pub feather: i32,
    /// Red gain, 50 = unity
    pub red_brightness: i32,
    /// Blue gain, 50 = unity
    pub blue_brightness: i32,
    /// Luminance gamma, mapped onto exponents `[0.1, 3.0]`
    pub gamma: i32,
    /// Input black point, percent of full scale
    pub black_level: i32,
    /// Input white point, percent of full scale
    pub white_level: i32,
    /// Depth smoothing, 0 disables the filter
    pub smoothing: i32,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            threshold: 50,
            depth_scale: 50,
            feather: 10,
            red_brightness: 50,
            blue_brightness: 50,
            gamma: 50,
            black_level: 0,
            white_level: 100,
            smoothing: 0,
        }
    }
}

impl EffectParameters {
    pub fn builder() -> EffectParametersBuilder {
        EffectParametersBuilder::default()
    }

    /// Copy with every control clamped into `[0, 100]`.
    pub fn clamped(&self) -> Self {
        let c = |v: i32| v.clamp(0, 100);
        Self {
            threshold: c(self.threshold),
            depth_scale: c(self.depth_scale),
            feather: c(self.feather),
            red_brightness: c(self.red_brightness),
            blue_brightness: c(self.blue_brightness),
            gamma: c(self.gamma),
            black_level: c(self.black_level),
            white_level: c(self.white_level),
            smoothing: c(self.smoothing),
        }
    }

    pub fn coefficients(&self) -> EffectCoefficients {
        EffectCoefficients::from(self)
    }
}

/// Builder for EffectParameters, unset fields keep their defaults
#[derive(Default)]
pub struct EffectParametersBuilder {
    threshold: Option<i32>,
    depth_scale: Option<i32>,
    feather: Option<i32>,
    red_brightness: Option<i32>,
    blue_brightness: Option<i32>,
    gamma: Option<i32>,
    black_level: Option<i32>,
    white_level: Option<i32>,
    smoothing: Option<i32>,
}

impl EffectParametersBuilder {
    pub fn threshold(mut self, value: i32) -> Self {
        self.threshold = Some(value);
        self
    }

    pub fn depth_scale(mut self, value: i32) -> Self {
        self.depth_scale = Some(value);
        self
    }

    pub fn feather(mut self, value: i32) -> Self {
        self.feather = Some(value);
        self
    }

    pub fn red_brightness(mut self, value: i32) -> Self {
        self.red_brightness = Some(value);
        self
    }

    pub fn blue_brightness(mut self, value: i32) -> Self {
        self.blue_brightness = Some(value);
        self
    }

    pub fn gamma(mut self, value: i32) -> Self {
        self.gamma = Some(value);
        self
    }

    pub fn black_level(mut self, value: i32) -> Self {
        self.black_level = Some(value);
        self
    }

    pub fn white_level(mut self, value: i32) -> Self {
        self.white_level = Some(value);
        self
    }

    pub fn smoothing(mut self, value: i32) -> Self {
        self.smoothing = Some(value);
        self
    }

    pub fn build(self) -> EffectParameters {
        let default = EffectParameters::default();
        EffectParameters {
            threshold: self.threshold.unwrap_or(default.threshold),
            depth_scale: self.depth_scale.unwrap_or(default.depth_scale),
            feather: self.feather.unwrap_or(default.feather),
            red_brightness: self.red_brightness.unwrap_or(default.red_brightness),
            blue_brightness: self.blue_brightness.unwrap_or(default.blue_brightness),
            gamma: self.gamma.unwrap_or(default.gamma),
            black_level: self.black_level.unwrap_or(default.black_level),
            white_level: self.white_level.unwrap_or(default.white_level),
            smoothing: self.smoothing.unwrap_or(default.smoothing),
        }
    }
}

/// Per-render constants of the transfer function, computed once from clamped controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectCoefficients {
    pub black: f32,
    pub white: f32,
    pub gamma_exponent: f32,
    pub threshold: f64,
    pub steepness: f64,
    pub red_factor: f32,
    pub blue_factor: f32,
}

impl From<&EffectParameters> for EffectCoefficients {
    fn from(params: &EffectParameters) -> Self {
        let p = params.clamped();
        let feather = p.feather as f64 / 100.0;
        Self {
            black: p.black_level as f32 * 2.55,
            white: p.white_level as f32 * 2.55,
            gamma_exponent: (0.1 + (p.gamma as f64 / 100.0) * 2.9) as f32,
            threshold: p.threshold as f64 / 100.0,
            steepness: (p.depth_scale as f64).max(1e-3) / (feather * 10.0 + 1.0),
            red_factor: p.red_brightness as f32 / 50.0,
            blue_factor: p.blue_brightness as f32 / 50.0,
        }
    }
}

impl EffectCoefficients {
    /// Level stretch then gamma, luminance in 8-bit scale to `[0, 1]`.
    pub fn tone(&self, luma: f32) -> f32 {
        let g = (luma - self.black) / (self.white - self.black).max(1e-6);
        let g = g.clamp(0.0, 1.0);
        (g as f64).powf(self.gamma_exponent as f64) as f32
    }

    /// Logistic weight of the red channel at `depth`; blue gets `1 - blend`.
    pub fn blend(&self, depth: f32) -> f64 {
        1.0 / (1.0 + (-self.steepness * (depth as f64 - self.threshold)).exp())
    }

    /// Output `[R, 0, B]` for a toned luminance and a depth value.
    pub fn shade(&self, tone: f32, depth: f32) -> [u8; 3] {
        let blend = self.blend(depth);
        let r = (self.red_factor * tone * blend as f32 * 255.0).clamp(0.0, 255.0);
        let b = (self.blue_factor * tone * (1.0 - blend) as f32 * 255.0).clamp(0.0, 255.0);
        [r as u8, 0, b as u8]
    }
}
