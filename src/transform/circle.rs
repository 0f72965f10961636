use glam::DVec2;

/// Relative slack when testing whether a point lies inside a circle.
const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.distance(self.center) <= self.radius * (1.0 + EPS) + EPS
    }

    fn from_two(a: DVec2, b: DVec2) -> Self {
        let center = (a + b) * 0.5;
        Self::new(center, a.distance(center))
    }

    fn from_three(a: DVec2, b: DVec2, c: DVec2) -> Self {
        let ab = b - a;
        let ac = c - a;
        let d = 2.0 * ab.perp_dot(ac);
        if d.abs() < f64::EPSILON {
            // Collinear: the widest pair spans the others.
            let candidates = [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)];
            return candidates
                .into_iter()
                .max_by(|l, r| l.radius.total_cmp(&r.radius))
                .unwrap_or_else(|| Self::new(a, 0.0));
        }

        let ab2 = ab.length_squared();
        let ac2 = ac.length_squared();
        let offset = DVec2::new(ac.y * ab2 - ab.y * ac2, ab.x * ac2 - ac.x * ab2) / d;
        Self::new(a + offset, offset.length())
    }
}

/// Smallest circle containing every point.
///
/// Incremental construction: each point outside the running circle must lie
/// on the boundary of the enclosing circle of the points seen so far. Feed it
/// hull vertices to keep the input short.
pub fn min_enclosing_circle(points: &[DVec2]) -> Option<Circle> {
    let (&first, rest) = points.split_first()?;
    let mut circle = Circle::new(first, 0.0);

    for (i, &p) in rest.iter().enumerate() {
        if circle.contains(p) {
            continue;
        }
        let seen = &points[..=i];
        circle = Circle::new(p, 0.0);
        for (j, &q) in seen.iter().enumerate() {
            if circle.contains(q) {
                continue;
            }
            circle = Circle::from_two(p, q);
            for &r in &seen[..j] {
                if !circle.contains(r) {
                    circle = Circle::from_three(p, q, r);
                }
            }
        }
    }

    Some(circle)
}
