use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::depth::tensor::{DepthTensor, InputTensor};

/// Square input resolution of the reference depth model.
pub const MODEL_INPUT_SIZE: usize = 384;

/// Boundary to the neural network runtime.
///
/// Takes a `[1, 3, S, S]` planar RGB tensor with values in [0, 1] and returns
/// one raw `S x S` depth tensor. Calls block until inference completes.
pub trait InferenceEngine {
    /// Side length `S` of the square input and output tensors.
    fn input_size(&self) -> usize;

    fn infer(&mut self, input: &InputTensor) -> Result<DepthTensor>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn input_size(&self) -> usize {
        (**self).input_size()
    }

    fn infer(&mut self, input: &InputTensor) -> Result<DepthTensor> {
        (**self).infer(input)
    }
}
