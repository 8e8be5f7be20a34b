use image::{GrayImage, Luma};

use crate::config::EdgeAlgorithm;

const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];
const LAPLACIAN: [i32; 9] = [0, -1, 0, -1, 4, -1, 0, -1, 0];

impl EdgeAlgorithm {
    /// Run the selected operator. `threshold` only matters for the Canny-like variant.
    pub fn apply(&self, image: &GrayImage, threshold: u8) -> GrayImage {
        let edges = match self {
            Self::Sobel => sobel(image, threshold),
            Self::Canny => canny(image, threshold),
            Self::Laplacian => laplacian(image, threshold),
        };
        tracing::debug!(algorithm = %self, nonzero = edges.pixels().filter(|p| p.0[0] > 0).count(), "edge detection");
        edges
    }
}

/// Correlate a 3x3 kernel over interior pixels, writing `map(sum)` and leaving
/// the one-pixel border frame at zero.
fn convolve_interior<const N: usize>(
    image: &GrayImage,
    kernels: [&[i32; 9]; N],
    map: impl Fn([i32; N]) -> u8,
) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);
    let src = image.as_raw();
    let stride = width as usize;

    for y in 1..height.saturating_sub(1) as usize {
        for x in 1..width.saturating_sub(1) as usize {
            let mut sums = [0i32; N];
            for j in 0..3 {
                let row = (y + j - 1) * stride;
                for i in 0..3 {
                    let pixel = i32::from(src[row + x + i - 1]);
                    for (sum, kernel) in sums.iter_mut().zip(kernels.iter()) {
                        *sum += pixel * kernel[j * 3 + i];
                    }
                }
            }
            out.put_pixel(x as u32, y as u32, Luma([map(sums)]));
        }
    }

    out
}

/// Gradient magnitude `min(255, sqrt(gx² + gy²))`.
pub fn sobel(image: &GrayImage, _threshold: u8) -> GrayImage {
    convolve_interior(image, [&SOBEL_X, &SOBEL_Y], |[gx, gy]| {
        let magnitude = ((gx * gx + gy * gy) as f32).sqrt();
        magnitude.min(255.0).round() as u8
    })
}

/// Sobel magnitude classified per pixel: above `1.5 * threshold` is a strong
/// edge (255), above `0.5 * threshold` a weak one (128), otherwise 0.
///
/// This is deliberately not full Canny: there is no non-maximum suppression
/// and no hysteresis linking between neighbouring pixels.
pub fn canny(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut edges = sobel(image, threshold);
    let high = 1.5 * f32::from(threshold);
    let low = 0.5 * f32::from(threshold);

    for value in edges.iter_mut() {
        let magnitude = f32::from(*value);
        *value = if magnitude > high {
            255
        } else if magnitude > low {
            128
        } else {
            0
        };
    }
    edges
}

/// Absolute response of the 4-neighbour Laplacian, saturated at 255.
pub fn laplacian(image: &GrayImage, _threshold: u8) -> GrayImage {
    convolve_interior(image, [&LAPLACIAN], |[sum]| sum.unsigned_abs().min(255) as u8)
}
