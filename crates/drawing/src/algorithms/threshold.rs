use image::{GrayImage, Rgba, RgbaImage};

/// Binarize an edge-strength buffer: samples strictly above `threshold`
/// become opaque white, everything else opaque black.
pub fn binarize(edges: &GrayImage, threshold: u8) -> RgbaImage {
    let mask = RgbaImage::from_fn(edges.width(), edges.height(), |x, y| {
        let value = if edges.get_pixel(x, y).0[0] > threshold { 255 } else { 0 };
        Rgba([value, value, value, 255])
    });
    tracing::debug!(threshold, edge_pixels = edge_pixel_count(&mask), "binarized edge map");
    mask
}

/// Number of pixels whose first channel marks an edge.
pub fn edge_pixel_count(mask: &RgbaImage) -> usize {
    mask.pixels().filter(|p| p.0[0] == 255).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn ramp() -> GrayImage {
        GrayImage::from_fn(16, 16, |x, y| Luma([(x * 16 + y) as u8]))
    }

    #[test]
    fn test_binarize_is_strict_and_opaque() {
        let mut edges = GrayImage::new(3, 1);
        edges.put_pixel(0, 0, Luma([99]));
        edges.put_pixel(1, 0, Luma([100]));
        edges.put_pixel(2, 0, Luma([101]));

        let mask = binarize(&edges, 100);
        assert_eq!(mask.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(mask.get_pixel(1, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(mask.get_pixel(2, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(edge_pixel_count(&mask), 1);
    }

    #[test]
    fn test_raising_threshold_never_adds_edges() {
        let edges = ramp();
        let mut previous = binarize(&edges, 10);
        for threshold in (20..=250).step_by(10) {
            let current = binarize(&edges, threshold);
            for (before, after) in previous.pixels().zip(current.pixels()) {
                assert!(after.0[0] <= before.0[0]);
            }
            previous = current;
        }
    }

    #[test]
    fn test_pixels_above_both_thresholds_stay_edges() {
        let edges = ramp();
        let low = binarize(&edges, 60);
        let high = binarize(&edges, 180);
        for ((x, y, l), h) in low.enumerate_pixels().zip(high.pixels()) {
            let value = edges.get_pixel(x, y).0[0];
            if value > 180 {
                assert_eq!(l.0[0], 255);
                assert_eq!(h.0[0], 255);
            }
            if value <= 60 {
                assert_eq!(l.0[0], 0);
                assert_eq!(h.0[0], 0);
            }
        }
    }
}
