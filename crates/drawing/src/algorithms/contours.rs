use image::RgbaImage;

use crate::types::{Contour, Point, TracedContours};

/// Pixels whose first channel exceeds this level count as edge pixels.
pub const EDGE_LEVEL: u8 = 128;

/// Contours with fewer points than this are dropped as noise.
pub const MIN_CONTOUR_POINTS: usize = 11;

/// Moore neighbourhood offsets in clockwise order, starting with "right".
const NEIGHBOURS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Per-call arena recording which pixels already belong to a traced contour.
#[derive(Debug, Clone)]
pub struct VisitedMask {
    width: usize,
    visited: Vec<bool>,
}

impl VisitedMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as usize,
            visited: vec![false; width as usize * height as usize],
        }
    }

    pub fn mark(&mut self, p: Point) {
        self.visited[p.y as usize * self.width + p.x as usize] = true;
    }

    pub fn is_visited(&self, p: Point) -> bool {
        self.visited[p.y as usize * self.width + p.x as usize]
    }

    pub fn count(&self) -> usize {
        self.visited.iter().filter(|v| **v).count()
    }
}

fn is_edge(mask: &RgbaImage, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y).0[0] > EDGE_LEVEL
}

/// Boundary follower state: where we are and which way we last moved.
struct Walker<'a> {
    mask: &'a RgbaImage,
    position: Point,
    direction: usize,
}

impl Walker<'_> {
    /// Move to the first edge neighbour found clockwise from the current
    /// direction, remembering the direction taken. Returns false at a dead end.
    fn step(&mut self) -> bool {
        let (width, height) = (i64::from(self.mask.width()), i64::from(self.mask.height()));
        for turn in 0..NEIGHBOURS.len() {
            let direction = (self.direction + turn) % NEIGHBOURS.len();
            let (dx, dy) = NEIGHBOURS[direction];
            let nx = i64::from(self.position.x) + dx;
            let ny = i64::from(self.position.y) + dy;
            if nx < 0 || ny < 0 || nx >= width || ny >= height {
                continue;
            }
            if is_edge(self.mask, nx as u32, ny as u32) {
                self.position = Point::new(nx as u32, ny as u32);
                self.direction = direction;
                return true;
            }
        }
        false
    }
}

/// Follow the boundary that starts at `start`, marking every point visited.
///
/// Stops at a dead end, on returning to `start` after at least two steps, or
/// after `2 * width * height` steps.
pub fn trace_boundary(mask: &RgbaImage, start: Point, visited: &mut VisitedMask) -> Contour {
    let max_steps = 2 * mask.width() as usize * mask.height() as usize;
    let mut walker = Walker {
        mask,
        position: start,
        direction: 0,
    };
    let mut points = Vec::new();
    let mut steps = 0usize;

    loop {
        points.push(walker.position);
        visited.mark(walker.position);

        if !walker.step() {
            break;
        }
        steps += 1;

        let closed = walker.position == start && steps >= 2;
        if closed || steps >= max_steps {
            break;
        }
    }

    Contour::new(points)
}

/// Trace every boundary in a binarized edge mask, scanning seeds in row-major order.
pub fn find_contours(mask: &RgbaImage) -> TracedContours {
    let (width, height) = mask.dimensions();
    let mut visited = VisitedMask::new(width, height);
    let mut contours = Vec::new();
    let mut discarded = 0usize;

    for y in 0..height {
        for x in 0..width {
            let seed = Point::new(x, y);
            if visited.is_visited(seed) || !is_edge(mask, x, y) {
                continue;
            }
            let contour = trace_boundary(mask, seed, &mut visited);
            if contour.len() >= MIN_CONTOUR_POINTS {
                contours.push(contour);
            } else {
                discarded += 1;
            }
        }
    }

    tracing::debug!(
        contours = contours.len(),
        discarded,
        visited = visited.count(),
        "traced contours"
    );

    TracedContours {
        contours,
        image_width: width,
        image_height: height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
    use imageproc::rect::Rect;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn test_empty_mask_has_no_contours() {
        let traced = find_contours(&blank(20, 20));
        assert!(traced.is_empty());
        assert_eq!((traced.image_width, traced.image_height), (20, 20));
    }

    #[test]
    fn test_square_outline_is_one_contour() {
        let mut mask = blank(40, 30);
        draw_hollow_rect_mut(&mut mask, Rect::at(5, 4).of_size(20, 15), WHITE);

        let traced = find_contours(&mask);
        assert_eq!(traced.len(), 1);

        let contour = &traced.contours[0];
        assert_eq!(contour.len(), 2 * (20 - 1) + 2 * (15 - 1));
        assert_eq!(
            contour.bounding_box(),
            Some((Point::new(5, 4), Point::new(24, 18)))
        );
        assert_eq!(contour.points[0], Point::new(5, 4));
        // clockwise in image space: along the top row first
        assert_eq!(contour.points[1], Point::new(6, 4));
    }

    #[test]
    fn test_filled_square_bounds() {
        let mut mask = blank(32, 32);
        draw_filled_rect_mut(&mut mask, Rect::at(8, 6).of_size(12, 14), WHITE);

        let traced = find_contours(&mask);
        // neighbours are followed even when already visited, so a filled block
        // yields its boundary loop plus one capped walk per interior seed row
        assert_eq!(traced.len(), 13);
        let first = &traced.contours[0];
        assert_eq!(first.len(), 2 * 11 + 2 * 13);
        assert!(traced.contours[1..].iter().all(|c| c.len() == 2 * 32 * 32));
        assert_eq!(
            first.bounding_box(),
            Some((Point::new(8, 6), Point::new(19, 19)))
        );
        for contour in &traced.contours {
            for p in &contour.points {
                assert!(p.x < 32 && p.y < 32);
            }
        }
    }

    #[test]
    fn test_short_segments_are_discarded() {
        let mut mask = blank(30, 10);
        // a straight run of n pixels is walked out and back: 2 * (n - 1) points
        for x in 2..8 {
            mask.put_pixel(x, 3, WHITE);
        }
        for x in 2..9 {
            mask.put_pixel(x, 7, WHITE);
        }
        let traced = find_contours(&mask);
        assert_eq!(traced.len(), 1);
        assert_eq!(traced.contours[0].points[0], Point::new(2, 7));
        assert_eq!(traced.contours[0].len(), 12);
    }

    #[test]
    fn test_walk_is_bounded() {
        // a fully lit mask never returns to its seed; the step cap ends it
        let mask = RgbaImage::from_pixel(4, 3, WHITE);
        let mut visited = VisitedMask::new(4, 3);
        let contour = trace_boundary(&mask, Point::new(1, 1), &mut visited);
        assert!(contour.len() <= 2 * 4 * 3 + 1);
    }

    #[test]
    fn test_tracing_is_deterministic() {
        let mut mask = blank(48, 48);
        draw_hollow_rect_mut(&mut mask, Rect::at(3, 3).of_size(30, 20), WHITE);
        draw_filled_rect_mut(&mut mask, Rect::at(20, 30).of_size(10, 10), WHITE);
        assert_eq!(find_contours(&mask), find_contours(&mask));
    }

    #[test]
    fn test_visited_mask() {
        let mut visited = VisitedMask::new(3, 2);
        assert!(!visited.is_visited(Point::new(2, 1)));
        visited.mark(Point::new(2, 1));
        assert!(visited.is_visited(Point::new(2, 1)));
        assert_eq!(visited.count(), 1);
    }
}
