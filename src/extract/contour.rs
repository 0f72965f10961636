use glam::DVec2;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{contour_area, convex_hull};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Closed boundary of a foreground region, in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(mut points: Vec<Point<i32>>) -> Self {
        // Store as an open path; the closing edge is implicit.
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area of the boundary polygon.
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    /// Tight axis-aligned rectangle; width and height count pixels inclusively.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let width = (max_x - min_x + 1) as u32;
        let height = (max_y - min_y + 1) as u32;
        Some(Rect::at(min_x, min_y).of_size(width, height))
    }

    /// Area-weighted centroid from the polygon's first-order moments.
    ///
    /// `None` when the polygon has zero area.
    pub fn centroid(&self) -> Option<DVec2> {
        let n = self.points.len();
        if n < 3 {
            return None;
        }

        let (mut m00, mut m10, mut m01) = (0.0f64, 0.0f64, 0.0f64);
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (x0, y0, x1, y1) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            m00 += cross;
            m10 += cross * (x0 + x1);
            m01 += cross * (y0 + y1);
        }

        if m00 == 0.0 {
            return None;
        }

        // m00 carries a factor of 1/2 and m10/m01 a factor of 1/6.
        Some(DVec2::new(m10 / (3.0 * m00), m01 / (3.0 * m00)))
    }

    /// Corners of the minimum-area rotated rectangle around the contour, in cyclic order.
    ///
    /// Rotating calipers over the convex hull, kept in floating point.
    pub fn min_area_corners(&self) -> [DVec2; 4] {
        let hull: Vec<DVec2> = convex_hull(self.points.as_slice())
            .into_iter()
            .map(|p| DVec2::new(p.x as f64, p.y as f64))
            .collect();

        match hull.len() {
            0 => return [DVec2::ZERO; 4],
            1 => return [hull[0]; 4],
            2 => return [hull[0], hull[1], hull[1], hull[0]],
            _ => {}
        }

        let mut best_area = f64::MAX;
        let mut best = [hull[0]; 4];
        for i in 0..hull.len() {
            let edge = hull[(i + 1) % hull.len()] - hull[i];
            if edge.length_squared() == 0.0 {
                continue;
            }
            let u = edge.normalize();
            let v = u.perp();

            let (mut s_min, mut s_max, mut t_min, mut t_max) =
                (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
            for p in &hull {
                let s = p.dot(u);
                let t = p.dot(v);
                s_min = s_min.min(s);
                s_max = s_max.max(s);
                t_min = t_min.min(t);
                t_max = t_max.max(t);
            }

            let area = (s_max - s_min) * (t_max - t_min);
            if area < best_area {
                best_area = area;
                best = [
                    u * s_min + v * t_min,
                    u * s_max + v * t_min,
                    u * s_max + v * t_max,
                    u * s_min + v * t_max,
                ];
            }
        }
        best
    }
}

/// Outermost borders of the nonzero regions in a binary image, in discovery order.
pub fn find_external_contours(binary: &GrayImage) -> Vec<Contour> {
    let _span = tracing::debug_span!("find_contours").entered();

    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}
