use std::io::{Cursor, Write};

use ::tiff::encoder::colortype::{Gray8, RGB8};
use ::tiff::encoder::compression::DeflateLevel;
use ::tiff::encoder::{Compression, TiffEncoder};
use ::tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::tiff::types::{OutputConfig, TiffCompression};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

fn encode_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::EncodeError(e.to_string())
}

fn encoder<'a>(
    buffer: &'a mut Vec<u8>,
    config: &OutputConfig,
) -> Result<TiffEncoder<Cursor<&'a mut Vec<u8>>>> {
    let compression = match config.compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    };

    let mut encoder = TiffEncoder::new(Cursor::new(buffer))
        .map_err(encode_error)?
        .with_compression(compression);

    if let Some(predictor_val) = config.predictor {
        let predictor = match predictor_val {
            2 => Predictor::Horizontal,
            _ => Predictor::None,
        };
        encoder = encoder.with_predictor(predictor);
    }
    Ok(encoder)
}

impl TiffWriter for StandardTiffWriter {
    fn write_rgb_tiff(&self, image: &RgbImageData, output: &mut dyn Write, config: &OutputConfig) -> Result<()> {
        debug!("Encoding RGB TIFF: {}x{}", image.width, image.height);
        image.validate()?;

        let mut buffer = Vec::new();
        encoder(&mut buffer, config)?
            .write_image::<RGB8>(image.width as u32, image.height as u32, &image.data)
            .map_err(encode_error)?;

        output.write_all(&buffer)?;
        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }

    fn write_depth_tiff(&self, depth: &DepthMap, output: &mut dyn Write, config: &OutputConfig) -> Result<()> {
        debug!("Encoding depth TIFF: {}x{}", depth.width, depth.height);

        let levels = depth.to_gray8();
        let mut buffer = Vec::new();
        encoder(&mut buffer, config)?
            .write_image::<Gray8>(depth.width as u32, depth.height as u32, &levels)
            .map_err(encode_error)?;

        output.write_all(&buffer)?;
        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
