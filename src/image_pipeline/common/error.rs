use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Depth inference failed: {0}")]
    Inference(String),

    #[error(
        "Depth map is {depth_width}x{depth_height} but image is {image_width}x{image_height}"
    )]
    DimensionMismatch {
        image_width: usize,
        image_height: usize,
        depth_width: usize,
        depth_height: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
