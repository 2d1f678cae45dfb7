use std::io::Write;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::{DepthMap, PipelineError, PipelineTimings, Result, RgbImageData},
    decode::{ImageCrateReader, SourceImageReader},
    depth::DepthSource,
    effect::{EffectParameters, render_smoothed},
    smoothing::smooth_depth,
    tiff::{OutputConfig, StandardTiffWriter, TiffWriter},
};

/// Result of one conversion: the depth map that drove it and per-stage timings.
#[derive(Debug)]
pub struct ConversionOutput {
    pub depth: DepthMap,
    pub timings: PipelineTimings,
}

pub struct ChromoStereoPipeline<R: SourceImageReader, W: TiffWriter> {
    reader: R,
    writer: W,
    config: OutputConfig,
}

impl ChromoStereoPipeline<ImageCrateReader, StandardTiffWriter> {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            reader: ImageCrateReader,
            writer: StandardTiffWriter,
            config,
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path)
        .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", path.display(), e)))
}

impl<R: SourceImageReader, W: TiffWriter> ChromoStereoPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: OutputConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Decodes `input_data`, obtains its depth, renders the effect and writes a TIFF.
    #[instrument(skip_all, fields(input_size = input_data.len()))]
    pub fn convert(
        &self,
        input_data: &[u8],
        depth_source: &mut dyn DepthSource,
        params: &EffectParameters,
        output: &mut dyn Write,
    ) -> Result<ConversionOutput> {
        let mut timings = PipelineTimings::new();
        info!("Starting chromostereo conversion");

        let image = timings.measure("decode_image", || self.reader.read_image(input_data))?;
        self.validate_dimensions(image.width, image.height)?;

        let depth = timings.measure("estimate_depth", || depth_source.depth_for(&image))?;

        let rendered = self.render_timed(&image, &depth, params, &mut timings)?;

        timings.measure("encode_tiff", || {
            self.writer.write_rgb_tiff(&rendered, output, &self.config)
        })?;

        info!(
            width = image.width,
            height = image.height,
            "Conversion complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(ConversionOutput { depth, timings })
    }

    fn render_timed(
        &self,
        image: &RgbImageData,
        depth: &DepthMap,
        params: &EffectParameters,
        timings: &mut PipelineTimings,
    ) -> Result<RgbImageData> {
        if !depth.same_size_as(image) {
            return Err(PipelineError::DimensionMismatch {
                image_width: image.width,
                image_height: image.height,
                depth_width: depth.width,
                depth_height: depth.height,
            });
        }
        let smoothed = timings.measure("smooth_depth", || smooth_depth(depth, params.smoothing))?;
        timings.measure("render", || render_smoothed(image, &smoothed, params))
    }

    #[instrument(skip_all)]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        depth_source: &mut dyn DepthSource,
        params: &EffectParameters,
    ) -> Result<ConversionOutput> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let mut timings = PipelineTimings::new();
        let input_data = timings.measure("read_input_file", || read_file(input_path))?;
        let mut output_file = timings.measure("create_output_file", || create_file(output_path))?;

        let mut result = self.convert(&input_data, depth_source, params, &mut output_file)?;
        for step in result.timings.steps() {
            timings.add_step(step.name.clone(), step.duration);
        }
        result.timings = timings;
        Ok(result)
    }

    pub fn read_image_file<P: AsRef<Path>>(&self, path: P) -> Result<RgbImageData> {
        let image = self.reader.read_image(&read_file(path.as_ref())?)?;
        self.validate_dimensions(image.width, image.height)?;
        Ok(image)
    }

    /// Loads a grayscale depth image, e.g. the output of an external depth service.
    pub fn read_depth_file<P: AsRef<Path>>(&self, path: P) -> Result<DepthMap> {
        self.reader.read_depth(&read_file(path.as_ref())?)
    }

    /// Writes `depth` as an 8-bit grayscale preview TIFF.
    pub fn write_depth_file<P: AsRef<Path>>(&self, depth: &DepthMap, path: P) -> Result<()> {
        let path = path.as_ref();
        info!(output = %path.display(), "Writing depth preview");
        let mut file = create_file(path)?;
        self.writer.write_depth_tiff(depth, &mut file, &self.config)
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OutputConfig) {
        self.config = config;
    }
}
