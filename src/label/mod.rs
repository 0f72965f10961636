//! Oriented bounding box labels for a placed object.
//!
//! The object's minimum-area rectangle is pushed through the placement
//! transform, its corners are rotated into a canonical cyclic order, and the
//! ordered corners are turned into `(x, y, w, h, theta)`:
//!
//! - corner 0 to corner 1 is the first edge whose direction lies within ±45°
//!   of the +x axis (inclusive), scanning edges in their given order;
//! - `theta` is that edge's direction in radians, in `[-π/4, π/4]`; it is
//!   not folded, so an edge at exactly -45° reports `-π/4`;
//! - `(x, y)` is corner 0 and `(w, h)` is corner 2 minus corner 0, both taken
//!   after rotating the corners by `-theta` about their mean.

use std::f64::consts::FRAC_PI_4;

use glam::{DAffine2, DVec2};

use crate::error::{Result, SynthError};

/// Four rectangle corners in cyclic order.
pub type OrientedRect = [DVec2; 4];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedBoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Radians, direction of the corner 0 to corner 1 edge.
    pub angle: f64,
}

/// Canonicalized corners and the box derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub corners: OrientedRect,
    pub bbox: RotatedBoundingBox,
}

fn edge_angle(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Rotate the corner list so edge 0 points within ±45° of +x.
///
/// The first qualifying edge in scan order wins, so a square at exactly 45°
/// keeps whichever of its two boundary edges comes first. No qualifying edge
/// yields [`SynthError::AmbiguousOrientation`].
pub fn canonicalize(corners: OrientedRect) -> Result<OrientedRect> {
    let start = (0..4)
        .find(|&i| edge_angle(corners[i], corners[(i + 1) % 4]).abs() <= FRAC_PI_4)
        .ok_or(SynthError::AmbiguousOrientation)?;

    let mut out = corners;
    out.rotate_left(start);
    Ok(out)
}

/// Ordered corners to `(x, y, w, h, theta)`.
pub fn corners_to_rotated_box(corners: &OrientedRect) -> RotatedBoundingBox {
    let centre = corners.iter().copied().sum::<DVec2>() / 4.0;
    let theta = edge_angle(corners[0], corners[1]);

    // Undo the rotation about the centre: rotate by -theta.
    let unrotate = DVec2::from_angle(-theta);
    let upright = corners.map(|c| unrotate.rotate(c - centre) + centre);

    let size = upright[2] - upright[0];
    RotatedBoundingBox {
        x: upright[0].x,
        y: upright[0].y,
        width: size.x,
        height: size.y,
        angle: theta,
    }
}

/// Map the rectangle through `affine`, canonicalize it, and derive the box.
pub fn label(rect_corners: &OrientedRect, affine: &DAffine2) -> Result<Label> {
    let _span = tracing::debug_span!("label").entered();

    let moved = rect_corners.map(|c| affine.transform_point2(c));
    let corners = canonicalize(moved).inspect_err(|_| {
        tracing::debug!(?moved, "no edge within 45 degrees of the x-axis");
    })?;
    let bbox = corners_to_rotated_box(&corners);

    Ok(Label { corners, bbox })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rotation_about;

    fn p(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn axis_aligned_rect_is_already_canonical() {
        let rect = [p(10.0, 20.0), p(50.0, 20.0), p(50.0, 40.0), p(10.0, 40.0)];
        assert_eq!(canonicalize(rect).unwrap(), rect);

        let bbox = corners_to_rotated_box(&rect);
        assert_eq!(
            bbox,
            RotatedBoundingBox { x: 10.0, y: 20.0, width: 40.0, height: 20.0, angle: 0.0 }
        );
    }

    #[test]
    fn vertical_first_edge_is_rotated_away() {
        let rect = [p(10.0, 40.0), p(10.0, 20.0), p(50.0, 20.0), p(50.0, 40.0)];
        let canonical = canonicalize(rect).unwrap();
        assert_eq!(canonical[0], p(10.0, 20.0));
        assert_eq!(canonical[1], p(50.0, 20.0));
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let m = rotation_about(p(30.0, 30.0), 117.0, 1.0);
        let rect = [p(10.0, 20.0), p(50.0, 20.0), p(50.0, 40.0), p(10.0, 40.0)].map(|c| m.transform_point2(c));
        let once = canonicalize(rect).unwrap();
        assert_eq!(canonicalize(once).unwrap(), once);
    }

    #[test]
    fn square_at_exactly_45_degrees_keeps_first_boundary_edge() {
        // Edges at +45, +135, -135, -45 degrees: +45 is found first.
        let diamond = [p(0.0, -1.0), p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0)];
        assert_eq!(canonicalize(diamond).unwrap(), diamond);

        // Starting one corner later, the edges are +135, -135, -45, +45 and -45 wins.
        let shifted = [p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0), p(0.0, -1.0)];
        let canonical = canonicalize(shifted).unwrap();
        assert_eq!(canonical[0], p(-1.0, 0.0));
        assert_eq!(canonical[1], p(0.0, -1.0));

        let bbox = corners_to_rotated_box(&canonical);
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert!(close(bbox.angle, -FRAC_PI_4));
        assert!(close(bbox.x, -half) && close(bbox.y, -half));
        assert!(close(bbox.width, 2.0 * half) && close(bbox.height, 2.0 * half));
    }

    #[test]
    fn quad_without_shallow_edge_is_ambiguous() {
        // Edge directions roughly 68, 166, -90 and 63 degrees.
        let quad = [p(0.0, 0.0), p(2.0, 5.0), p(-2.0, 6.0), p(-2.0, -4.0)];
        assert!(matches!(canonicalize(quad), Err(SynthError::AmbiguousOrientation)));
    }

    #[test]
    fn rotated_rect_recovers_size_and_angle() {
        let rect = [p(10.0, 20.0), p(50.0, 20.0), p(50.0, 40.0), p(10.0, 40.0)];
        let m = rotation_about(p(30.0, 30.0), -30.0, 1.0);
        let moved = rect.map(|c| m.transform_point2(c));

        let corners = canonicalize(moved).unwrap();
        let bbox = corners_to_rotated_box(&corners);
        // -30 degrees in this convention turns +x towards +y on screen.
        assert!(close(bbox.angle, 30f64.to_radians()));
        assert!(close(bbox.x, 10.0) && close(bbox.y, 20.0));
        assert!(close(bbox.width, 40.0) && close(bbox.height, 20.0));
    }

    #[test]
    fn label_applies_transform_before_ordering() {
        let rect = [p(0.0, 0.0), p(20.0, 0.0), p(20.0, 10.0), p(0.0, 10.0)];
        let affine = DAffine2::from_translation(p(100.0, 50.0)) * rotation_about(p(10.0, 5.0), 90.0, 2.0);
        let label = label(&rect, &affine).unwrap();

        // The long side now runs vertically, so the short side becomes edge 0.
        assert!(close(label.bbox.width, 20.0));
        assert!(close(label.bbox.height, 40.0));
        assert!(label.bbox.angle.abs() <= FRAC_PI_4 + 1e-12);
        let centre = label.corners.iter().copied().sum::<DVec2>() / 4.0;
        assert!((centre - p(110.0, 55.0)).length() < 1e-9);
    }
}
