use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::conversions::ChromoStereoPipeline;
use crate::image_pipeline::decode::SourceImageReader;
use crate::image_pipeline::depth::PrecomputedDepth;
use crate::image_pipeline::effect::EffectParameters;
use crate::image_pipeline::tiff::{OutputConfig, TiffCompression, TiffWriter};

struct MockReader {
    should_fail: bool,
    mock_data: Option<RgbImageData>,
}

impl SourceImageReader for MockReader {
    fn read_image(&self, _data: &[u8]) -> Result<RgbImageData> {
        if self.should_fail {
            return Err(PipelineError::DecodeError("Mock decode error".to_string()));
        }
        Ok(self
            .mock_data
            .clone()
            .unwrap_or_else(|| RgbImageData::filled(10, 10, [128, 128, 128]).unwrap()))
    }

    fn read_depth(&self, _data: &[u8]) -> Result<DepthMap> {
        DepthMap::new(10, 10, vec![0.5; 100])
    }
}

struct MockWriter {
    should_fail: bool,
    written_data: Arc<Mutex<Vec<RgbImageData>>>,
}

impl TiffWriter for MockWriter {
    fn write_rgb_tiff(&self, image: &RgbImageData, _output: &mut dyn Write, _config: &OutputConfig) -> Result<()> {
        if self.should_fail {
            return Err(PipelineError::EncodeError("Mock encode error".to_string()));
        }
        self.written_data.lock().unwrap().push(image.clone());
        Ok(())
    }

    fn write_depth_tiff(&self, _depth: &DepthMap, _output: &mut dyn Write, _config: &OutputConfig) -> Result<()> {
        Ok(())
    }
}

fn half_split_depth(width: usize, height: usize) -> PrecomputedDepth {
    let data = (0..width * height)
        .map(|i| if i % width < width / 2 { 0.0 } else { 1.0 })
        .collect();
    PrecomputedDepth::new(DepthMap::new(width, height, data).unwrap())
}

fn pipeline(
    reader: MockReader,
    writer_fails: bool,
    config: OutputConfig,
) -> (ChromoStereoPipeline<MockReader, MockWriter>, Arc<Mutex<Vec<RgbImageData>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let writer = MockWriter { should_fail: writer_fails, written_data: written.clone() };
    (ChromoStereoPipeline::with_custom(reader, writer, config), written)
}

#[test]
fn test_config_builder() {
    let config = OutputConfig::builder()
        .compression(TiffCompression::Lzw)
        .predictor(Some(2))
        .validate_dimensions(false)
        .max_dimension(Some(10000))
        .build();

    assert_eq!(config.compression, TiffCompression::Lzw);
    assert_eq!(config.predictor, Some(2));
    assert!(!config.validate_dimensions);
    assert_eq!(config.max_dimension, Some(10000));
}

#[test]
fn test_successful_conversion() {
    let reader = MockReader { should_fail: false, mock_data: None };
    let (pipeline, written) = pipeline(reader, false, OutputConfig::default());

    let mut depth = half_split_depth(10, 10);
    let mut output = Cursor::new(Vec::new());
    let result = pipeline
        .convert(b"fake image", &mut depth, &EffectParameters::default(), &mut output)
        .unwrap();

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    let image = &written[0];
    assert_eq!((image.width, image.height), (10, 10));
    // depth 0 on the left renders blue, depth 1 on the right renders red
    assert!(image.pixel(0, 5)[2] > image.pixel(0, 5)[0]);
    assert!(image.pixel(9, 5)[0] > image.pixel(9, 5)[2]);
    assert_eq!(result.depth.width, 10);

    for step in ["decode_image", "estimate_depth", "smooth_depth", "render", "encode_tiff"] {
        assert!(result.timings.get_step(step).is_some(), "missing step {step}");
    }
}

#[test]
fn test_reader_failure() {
    let reader = MockReader { should_fail: true, mock_data: None };
    let (pipeline, _) = pipeline(reader, false, OutputConfig::default());

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(
        b"fake image",
        &mut half_split_depth(10, 10),
        &EffectParameters::default(),
        &mut output,
    );

    assert!(matches!(result.unwrap_err(), PipelineError::DecodeError(_)));
}

#[test]
fn test_writer_failure() {
    let reader = MockReader { should_fail: false, mock_data: None };
    let (pipeline, _) = pipeline(reader, true, OutputConfig::default());

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(
        b"fake image",
        &mut half_split_depth(10, 10),
        &EffectParameters::default(),
        &mut output,
    );

    assert!(matches!(result.unwrap_err(), PipelineError::EncodeError(_)));
}

#[test]
fn test_depth_mismatch_fails_before_render() {
    let reader = MockReader { should_fail: false, mock_data: None };
    let (pipeline, written) = pipeline(reader, false, OutputConfig::default());

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(
        b"fake image",
        &mut half_split_depth(12, 10),
        &EffectParameters::default(),
        &mut output,
    );

    assert!(matches!(result.unwrap_err(), PipelineError::DimensionMismatch { .. }));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_dimension_validation_failure() {
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(RgbImageData::filled(40, 20, [1, 2, 3]).unwrap()),
    };
    let config = OutputConfig::builder().max_dimension(Some(32)).build();
    let (pipeline, _) = pipeline(reader, false, config);

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(
        b"fake image",
        &mut half_split_depth(40, 20),
        &EffectParameters::default(),
        &mut output,
    );

    assert!(matches!(result.unwrap_err(), PipelineError::InvalidDimensions(40, 20)));
}

#[test]
fn test_dimension_validation_disabled() {
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(RgbImageData::filled(40, 20, [1, 2, 3]).unwrap()),
    };
    let config = OutputConfig::builder()
        .validate_dimensions(false)
        .max_dimension(Some(32))
        .build();
    let (pipeline, _) = pipeline(reader, false, config);

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(
        b"fake image",
        &mut half_split_depth(40, 20),
        &EffectParameters::default(),
        &mut output,
    );

    assert!(result.is_ok());
}

#[test]
fn test_file_round_trip_with_real_codecs() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("photo.png");
    let depth_path = dir.path().join("depth.png");
    let output_path = dir.path().join("chromo.tiff");
    let preview_path = dir.path().join("depth.tiff");

    image::RgbImage::from_pixel(8, 6, image::Rgb([200, 180, 160]))
        .save(&input_path)
        .unwrap();
    image::GrayImage::from_fn(8, 6, |x, _| image::Luma([if x < 4 { 0 } else { 255 }]))
        .save(&depth_path)
        .unwrap();

    let pipeline = ChromoStereoPipeline::new(
        OutputConfig::builder().compression(TiffCompression::Lzw).build(),
    );
    let depth = pipeline.read_depth_file(&depth_path).unwrap();
    assert_eq!(depth.get(0, 0), 0.0);
    assert_eq!(depth.get(7, 5), 1.0);

    let result = pipeline
        .convert_file(
            &input_path,
            &output_path,
            &mut PrecomputedDepth::new(depth),
            &EffectParameters::default(),
        )
        .unwrap();
    assert!(result.timings.get_step("read_input_file").is_some());
    pipeline.write_depth_file(&result.depth, &preview_path).unwrap();

    let mut decoder = ::tiff::decoder::Decoder::new(std::fs::File::open(&output_path).unwrap()).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (8, 6));
    let ::tiff::decoder::DecodingResult::U8(pixels) = decoder.read_image().unwrap() else {
        panic!("expected 8-bit output");
    };
    assert_eq!(pixels.len(), 8 * 6 * 3);
    assert!(pixels.chunks_exact(3).all(|px| px[1] == 0));
    assert!(pixels[2] > pixels[0]);
    assert!(pixels[7 * 3] > pixels[7 * 3 + 2]);

    let mut decoder = ::tiff::decoder::Decoder::new(std::fs::File::open(&preview_path).unwrap()).unwrap();
    let ::tiff::decoder::DecodingResult::U8(levels) = decoder.read_image().unwrap() else {
        panic!("expected 8-bit depth preview");
    };
    assert_eq!(&levels[..8], &[0, 0, 0, 0, 255, 255, 255, 255]);
}

#[test]
fn test_missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ChromoStereoPipeline::new(OutputConfig::default());

    let result = pipeline.convert_file(
        dir.path().join("missing.png"),
        dir.path().join("out.tiff"),
        &mut half_split_depth(2, 2),
        &EffectParameters::default(),
    );

    assert!(matches!(result.unwrap_err(), PipelineError::InputReadError(_)));
}
