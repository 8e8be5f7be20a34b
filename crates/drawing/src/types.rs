use image::{GrayImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{DrawingError, Result};

/// Decoded RGBA input raster, 8 bits per channel, row-major.
pub type RasterImage = RgbaImage;

/// Single-channel 8-bit buffer produced by the grayscale, blur and edge stages.
pub type LuminanceBuffer = GrayImage;

/// Displayable binarized edge buffer: 0/255 replicated into RGB with opaque alpha.
pub type EdgeMask = RgbaImage;

/// Wrap a raw RGBA byte buffer, rejecting buffers whose length does not match the dimensions.
pub fn raster_from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<RasterImage> {
    let len = data.len();
    let expected = u64::from(width) * u64::from(height) * 4;
    if len as u64 != expected {
        return Err(DrawingError::MalformedInput { width, height, len });
    }
    RgbaImage::from_raw(width, height, data).ok_or(DrawingError::MalformedInput {
        width,
        height,
        len,
    })
}

/// Integer pixel coordinate in image space (origin top-left, Y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Ordered, implicitly closed boundary polyline in pixel space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive pixel bounds as `(min, max)`, or `None` for an empty contour.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        let bounds = self.points.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(bounds)
    }

    /// Length of the closed polyline in pixels, including the closing segment.
    pub fn perimeter(&self) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let closing = std::iter::once((self.points[self.points.len() - 1], self.points[0]));
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
            .map(|(a, b)| {
                let dx = b.x as f32 - a.x as f32;
                let dy = b.y as f32 - a.y as f32;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }
}

/// Contours traced from one edge mask, in tracer scan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TracedContours {
    pub contours: Vec<Contour>,
    /// Dimensions of the mask the contours were traced from
    pub image_width: u32,
    pub image_height: u32,
}

impl TracedContours {
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// The contour with the most points; ties go to the earliest traced.
    pub fn dominant(&self) -> Option<&Contour> {
        self.contours
            .iter()
            .reduce(|best, c| if c.len() > best.len() { c } else { best })
    }
}
