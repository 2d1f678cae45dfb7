//! Caller-held state for interactive re-rendering
//!
//! Depth estimation runs once per source image; rendering runs on every
//! parameter change. The session keeps both inputs immutable and remembers
//! the last smoothed depth map so slider moves that leave `smoothing`
//! unchanged skip the filter.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::types::{DepthMap, RgbImageData};
use crate::image_pipeline::depth::DepthSource;
use crate::image_pipeline::effect::{EffectParameters, render_smoothed};
use crate::image_pipeline::smoothing::smooth_depth;

pub struct ChromoSession {
    image: Arc<RgbImageData>,
    depth: Arc<DepthMap>,
    smoothed: Mutex<Option<(i32, Arc<DepthMap>)>>,
}

impl ChromoSession {
    /// Pairs an image with an existing depth map of the same size.
    pub fn new(image: RgbImageData, depth: DepthMap) -> Result<Self> {
        image.validate()?;
        if !depth.same_size_as(&image) {
            return Err(PipelineError::DimensionMismatch {
                image_width: image.width,
                image_height: image.height,
                depth_width: depth.width,
                depth_height: depth.height,
            });
        }
        Ok(Self {
            image: Arc::new(image),
            depth: Arc::new(depth),
            smoothed: Mutex::new(None),
        })
    }

    /// Computes the depth map for `image` once and keeps both.
    pub fn from_source(image: RgbImageData, source: &mut dyn DepthSource) -> Result<Self> {
        let depth = source.depth_for(&image)?;
        info!("Depth map ready: {}x{}", depth.width, depth.height);
        Self::new(image, depth)
    }

    pub fn image(&self) -> &RgbImageData {
        &self.image
    }

    pub fn depth(&self) -> &DepthMap {
        &self.depth
    }

    /// Depth map after smoothing with `smoothing`, cached for the last value used.
    ///
    /// The filter runs without holding the cache lock, so renders with
    /// different smoothing values proceed in parallel.
    pub fn smoothed_depth(&self, smoothing: i32) -> Result<Arc<DepthMap>> {
        let smoothing = smoothing.clamp(0, 100);
        if smoothing == 0 {
            return Ok(Arc::clone(&self.depth));
        }

        if let Some(map) = self.cached(smoothing) {
            debug!(smoothing, "Smoothed depth cache hit");
            return Ok(map);
        }

        let map = Arc::new(smooth_depth(&self.depth, smoothing)?.into_owned());
        *self.lock_cache() = Some((smoothing, Arc::clone(&map)));
        Ok(map)
    }

    fn cached(&self, smoothing: i32) -> Option<Arc<DepthMap>> {
        match self.lock_cache().as_ref() {
            Some((cached, map)) if *cached == smoothing => Some(Arc::clone(map)),
            _ => None,
        }
    }

    // A poisoned cache only means another render panicked; the data is still valid.
    fn lock_cache(&self) -> MutexGuard<'_, Option<(i32, Arc<DepthMap>)>> {
        self.smoothed.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn render(&self, params: &EffectParameters) -> Result<RgbImageData> {
        let depth = self.smoothed_depth(params.smoothing)?;
        render_smoothed(&self.image, &depth, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::depth::PrecomputedDepth;
    use crate::image_pipeline::effect::render;

    fn sample() -> (RgbImageData, DepthMap) {
        let image = RgbImageData::filled(10, 8, [90, 160, 220]).unwrap();
        let depth = DepthMap::new(10, 8, (0..80).map(|i| (i % 10) as f32 / 9.0).collect()).unwrap();
        (image, depth)
    }

    #[test]
    fn test_session_render_matches_direct_render() {
        let (image, depth) = sample();
        let session = ChromoSession::new(image.clone(), depth.clone()).unwrap();

        for smoothing in [0, 30, 30, 70] {
            let params = EffectParameters::builder().smoothing(smoothing).threshold(40).build();
            assert_eq!(session.render(&params).unwrap(), render(&image, &depth, &params).unwrap());
        }
    }

    #[test]
    fn test_smoothed_depth_is_cached_per_value() {
        let (image, depth) = sample();
        let session = ChromoSession::new(image, depth).unwrap();

        let a = session.smoothed_depth(20).unwrap();
        let b = session.smoothed_depth(20).unwrap();
        let c = session.smoothed_depth(40).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(*session.smoothed_depth(0).unwrap(), *session.depth());
    }

    #[test]
    fn test_session_rejects_mismatched_depth() {
        let (image, _) = sample();
        let depth = DepthMap::new(8, 10, vec![0.0; 80]).unwrap();

        let result = ChromoSession::new(image, depth);

        assert!(matches!(result, Err(PipelineError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_concurrent_renders_share_one_session() {
        let (image, depth) = sample();
        let mut source = PrecomputedDepth::new(depth);
        let session = ChromoSession::from_source(image, &mut source).unwrap();
        let expected: Vec<_> = (0..4)
            .map(|i| session.render(&EffectParameters::builder().gamma(i * 25).build()).unwrap())
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let session = &session;
                    scope.spawn(move || {
                        session.render(&EffectParameters::builder().gamma(i * 25).build())
                    })
                })
                .collect();
            for (handle, want) in handles.into_iter().zip(&expected) {
                assert_eq!(&handle.join().unwrap().unwrap(), want);
            }
        });
    }

    #[test]
    fn test_concurrent_smoothing_values_each_get_their_own_map() {
        let (image, depth) = sample();
        let session = ChromoSession::new(image, depth.clone()).unwrap();
        let levels = [10, 40, 70, 100];
        let expected: Vec<_> = levels
            .iter()
            .map(|&s| smooth_depth(&depth, s).unwrap().into_owned())
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = levels
                .into_iter()
                .map(|s| {
                    let session = &session;
                    scope.spawn(move || session.smoothed_depth(s))
                })
                .collect();
            for (handle, want) in handles.into_iter().zip(&expected) {
                assert_eq!(&*handle.join().unwrap().unwrap(), want);
            }
        });

        let (last, map) = session.lock_cache().clone().unwrap();
        let slot = levels.iter().position(|&s| s == last).unwrap();
        assert_eq!(*map, expected[slot]);
    }
}
