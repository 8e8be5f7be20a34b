use std::borrow::Cow;

use image::{GrayImage, Luma, RgbaImage};

/// ITU-R BT.601 luma weights for R, G, B.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Flatten an RGBA raster into luminance. Alpha is ignored.
pub fn to_grayscale(raster: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(raster.width(), raster.height(), |x, y| {
        let [r, g, b, _] = raster.get_pixel(x, y).0;
        let luma = LUMA_WEIGHTS[0] * r as f32 + LUMA_WEIGHTS[1] * g as f32 + LUMA_WEIGHTS[2] * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Square, unnormalized Gaussian kernel of side `2 * ceil(3 * sigma) + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    radius: i64,
    weights: Vec<f64>,
}

impl GaussianKernel {
    pub fn new(sigma: f32) -> Self {
        let sigma = f64::from(sigma);
        let radius = (3.0 * sigma).ceil().max(0.0) as i64;
        let side = (2 * radius + 1) as usize;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights = Vec::with_capacity(side * side);
        for j in -radius..=radius {
            for i in -radius..=radius {
                let d2 = (i * i + j * j) as f64;
                weights.push(if two_sigma_sq > 0.0 { (-d2 / two_sigma_sq).exp() } else { 1.0 });
            }
        }

        Self { radius, weights }
    }

    pub fn radius(&self) -> i64 {
        self.radius
    }

    pub fn side(&self) -> usize {
        (2 * self.radius + 1) as usize
    }

    /// Weight at offset `(i, j)` from the centre; both must lie within the radius.
    pub fn weight(&self, i: i64, j: i64) -> f64 {
        let side = self.side() as i64;
        self.weights[((j + self.radius) * side + (i + self.radius)) as usize]
    }
}

/// Gaussian smoothing with edge-clamped sampling.
///
/// Each output sample is divided by the sum of the weights it actually used,
/// so a constant image stays constant right up to the border. A non-positive
/// sigma returns the input borrowed and untouched, as does a non-finite one.
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> Cow<'_, GrayImage> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Cow::Borrowed(image);
    }

    let kernel = GaussianKernel::new(sigma);
    let radius = kernel.radius();
    let (width, height) = image.dimensions();
    tracing::debug!(sigma, side = kernel.side(), width, height, "gaussian blur");

    if width == 0 || height == 0 {
        return Cow::Owned(image.clone());
    }

    let max_x = i64::from(width) - 1;
    let max_y = i64::from(height) - 1;
    let src = image.as_raw();
    let stride = width as usize;

    let blurred = GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (i64::from(x), i64::from(y));
        let mut sum = 0.0f64;
        let mut weight_sum = 0.0f64;

        for j in -radius..=radius {
            let py = (y + j).clamp(0, max_y) as usize;
            for i in -radius..=radius {
                let px = (x + i).clamp(0, max_x) as usize;
                let weight = kernel.weight(i, j);
                sum += f64::from(src[py * stride + px]) * weight;
                weight_sum += weight;
            }
        }

        Luma([(sum / weight_sum).round().clamp(0.0, 255.0) as u8])
    });

    Cow::Owned(blurred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_uniform_gray_ignores_alpha() {
        let mut raster = RgbaImage::new(6, 5);
        for (x, _, pixel) in raster.enumerate_pixels_mut() {
            *pixel = Rgba([128, 128, 128, (x * 40) as u8]);
        }
        let gray = to_grayscale(&raster);
        assert_eq!(gray.dimensions(), (6, 5));
        assert!(gray.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_grayscale_weights() {
        let mut raster = RgbaImage::new(3, 1);
        raster.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        raster.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        raster.put_pixel(2, 0, Rgba([0, 0, 255, 255]));
        let gray = to_grayscale(&raster);
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
        assert_eq!(gray.get_pixel(1, 0).0[0], 150);
        assert_eq!(gray.get_pixel(2, 0).0[0], 29);
    }

    #[test]
    fn test_kernel_shape() {
        let kernel = GaussianKernel::new(1.0);
        assert_eq!(kernel.radius(), 3);
        assert_eq!(kernel.side(), 7);
        assert_eq!(kernel.weight(0, 0), 1.0);
        assert_eq!(kernel.weight(2, -1), kernel.weight(-1, 2));
        assert!(kernel.weight(3, 3) < kernel.weight(1, 0));

        assert_eq!(GaussianKernel::new(0.1).side(), 3);
        assert_eq!(GaussianKernel::new(2.5).side(), 17);
    }

    #[test]
    fn test_non_finite_sigma_is_identity() {
        let image = GrayImage::from_fn(4, 4, |x, y| Luma([(x * 50 + y) as u8]));
        for sigma in [f32::INFINITY, f32::NAN, f32::NEG_INFINITY] {
            assert!(matches!(gaussian_blur(&image, sigma), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let image = GrayImage::from_fn(9, 7, |x, y| Luma([(x * 13 + y * 31) as u8]));
        let out = gaussian_blur(&image, 0.0);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_raw(), image.as_raw());
    }

    #[test]
    fn test_constant_image_stays_constant() {
        for sigma in [0.3f32, 1.0, 2.2, 5.0] {
            let image = GrayImage::from_pixel(12, 9, Luma([173]));
            let out = gaussian_blur(&image, sigma);
            assert!(out.pixels().all(|p| p.0[0] == 173), "sigma {sigma}");
        }
    }

    #[test]
    fn test_blur_spreads_an_impulse() {
        let mut image = GrayImage::new(11, 11);
        image.put_pixel(5, 5, Luma([255]));
        let out = gaussian_blur(&image, 1.0);
        let centre = out.get_pixel(5, 5).0[0];
        assert!(centre < 255 && centre > 0);
        assert!(out.get_pixel(6, 5).0[0] > 0);
        assert_eq!(out.get_pixel(6, 5), out.get_pixel(5, 6));
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
    }
}
