//! 8-bit single channel bilateral filter
//!
//! Follows the OpenCV `bilateralFilter` conventions: a circular window of
//! the given diameter, Gaussian space and color weights, reflect-101 borders
//! and half-to-even rounding of the weighted mean.

use rayon::prelude::*;

/// Window diameter in pixels, radius `BILATERAL_DIAMETER / 2`.
pub const BILATERAL_DIAMETER: usize = 5;

/// Border index mirrored without repeating the edge pixel (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let mut i = i;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - i - 2;
        } else {
            return i as usize;
        }
    }
}

struct Kernel {
    offsets: Vec<(isize, isize)>,
    space_weight: Vec<f32>,
    color_weight: [f32; 256],
}

impl Kernel {
    fn new(sigma_color: f32, sigma_space: f32) -> Self {
        let radius = (BILATERAL_DIAMETER / 2) as isize;
        let color_coeff = -0.5 / (sigma_color as f64 * sigma_color as f64);
        let space_coeff = -0.5 / (sigma_space as f64 * sigma_space as f64);

        let mut color_weight = [0.0f32; 256];
        for (i, w) in color_weight.iter_mut().enumerate() {
            *w = ((i * i) as f64 * color_coeff).exp() as f32;
        }

        let mut offsets = Vec::new();
        let mut space_weight = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let r = ((dy * dy + dx * dx) as f64).sqrt();
                if r > radius as f64 {
                    continue;
                }
                offsets.push((dx, dy));
                space_weight.push((r * r * space_coeff).exp() as f32);
            }
        }

        Self { offsets, space_weight, color_weight }
    }
}

/// Filters a row-major `width x height` 8-bit grid.
///
/// Rows are processed in parallel; every output pixel only reads the input.
pub fn bilateral_filter_u8(
    src: &[u8],
    width: usize,
    height: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> Vec<u8> {
    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let kernel = Kernel::new(sigma_color, sigma_space);

    let mut dst = vec![0u8; width * height];
    dst.par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row_out)| {
            for (x, out) in row_out.iter_mut().enumerate() {
                let center = src[y * width + x] as i32;
                let mut sum = 0.0f32;
                let mut wsum = 0.0f32;

                for (&(dx, dy), &sw) in kernel.offsets.iter().zip(&kernel.space_weight) {
                    let sx = reflect_101(x as isize + dx, width);
                    let sy = reflect_101(y as isize + dy, height);
                    let v = src[sy * width + sx] as i32;
                    let w = sw * kernel.color_weight[(v - center).unsigned_abs() as usize];
                    sum += v as f32 * w;
                    wsum += w;
                }

                *out = (sum / wsum).round_ties_even().clamp(0.0, 255.0) as u8;
            }
        });
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101_borders() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(-2, 2), 0);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn test_kernel_window_is_circular() {
        let kernel = Kernel::new(10.0, 10.0);
        // offsets within distance 2 of the center
        assert_eq!(kernel.offsets.len(), 13);
        assert!(!kernel.offsets.contains(&(1, 2)));
        assert!(kernel.offsets.contains(&(0, 2)));
        assert_eq!(kernel.color_weight[0], 1.0);
    }

    #[test]
    fn test_constant_grid_is_fixed_point() {
        let src = vec![77u8; 9 * 4];
        assert_eq!(bilateral_filter_u8(&src, 9, 4, 30.0, 30.0), src);
    }
}
