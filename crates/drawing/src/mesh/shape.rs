use geo::Winding;
use geo_types::{Coord, LineString, Polygon};

use crate::types::Contour;

/// Closed 2D outline in model space: origin at the image centre, Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub points: Vec<[f32; 2]>,
}

impl Shape {
    /// A polygon needs at least this many vertices.
    pub const MIN_POINTS: usize = 3;

    /// Map pixel coordinates to model space as `(x - W/2, -(y - H/2))`.
    pub fn from_contour(contour: &Contour, image_width: u32, image_height: u32) -> Self {
        let half_w = image_width as f32 / 2.0;
        let half_h = image_height as f32 / 2.0;
        let points = contour
            .points
            .iter()
            .map(|p| [p.x as f32 - half_w, -(p.y as f32 - half_h)])
            .collect();
        Self { points }
    }

    /// Polygon with a counter-clockwise exterior ring. The ring is closed by
    /// `geo`; no closing point is stored in `points`.
    pub fn to_polygon(&self) -> Polygon<f32> {
        let coords: Vec<Coord<f32>> = self
            .points
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect();
        let mut exterior = LineString::new(coords);
        exterior.close();
        exterior.make_ccw_winding();
        Polygon::new(exterior, vec![])
    }

    /// Signed shoelace area; positive for counter-clockwise outlines.
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let [x0, y0] = self.points[i];
                let [x1, y1] = self.points[(i + 1) % n];
                x0 * y1 - x1 * y0
            })
            .sum::<f32>()
            / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use geo::Area;

    fn clockwise_image_square() -> Contour {
        // top row left to right, then down, left, up: clockwise on screen
        Contour::new(vec![
            Point::new(2, 2),
            Point::new(6, 2),
            Point::new(6, 6),
            Point::new(2, 6),
        ])
    }

    #[test]
    fn test_model_space_is_centred_and_flipped() {
        let shape = Shape::from_contour(&clockwise_image_square(), 8, 8);
        assert_eq!(
            shape.points,
            vec![[-2.0, 2.0], [2.0, 2.0], [2.0, -2.0], [-2.0, -2.0]]
        );
        assert!((shape.signed_area() + 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_polygon_is_counter_clockwise() {
        let shape = Shape::from_contour(&clockwise_image_square(), 8, 8);
        let polygon = shape.to_polygon();
        assert!(polygon.exterior().is_ccw());
        assert!(polygon.signed_area() > 0.0);
        assert!((polygon.unsigned_area() - 16.0).abs() < 1e-5);
        // four corners plus the closing coordinate
        assert_eq!(polygon.exterior().0.len(), 5);
    }

    #[test]
    fn test_odd_dimensions_use_half_pixel_centre() {
        let contour = Contour::new(vec![Point::new(0, 0), Point::new(3, 0), Point::new(3, 5)]);
        let shape = Shape::from_contour(&contour, 3, 5);
        assert_eq!(shape.points[0], [-1.5, 2.5]);
        assert_eq!(shape.points[2], [1.5, -2.5]);
    }
}
