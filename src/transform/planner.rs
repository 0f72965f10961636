use glam::{DAffine2, DVec2};
use imageproc::geometry::convex_hull;
use rand::Rng;

use super::circle::{min_enclosing_circle, Circle};
use crate::config::PlannerConfig;
use crate::error::{Result, SynthError};
use crate::extract::Contour;

/// One realization of the random placement of the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSample {
    /// Enclosing circle of the object before the transform.
    pub circle: Circle,
    pub scale: f64,
    /// Counter-clockwise on screen, in degrees.
    pub rotation_degrees: f64,
    pub translation_x: f64,
    pub translation_y: f64,
}

impl TransformSample {
    /// Rotate and scale about the circle center, then translate.
    pub fn affine(&self) -> DAffine2 {
        let rotation = rotation_about(self.circle.center, self.rotation_degrees, self.scale);
        DAffine2::from_translation(DVec2::new(self.translation_x, self.translation_y)) * rotation
    }

    pub fn transformed_radius(&self) -> f64 {
        self.scale * self.circle.radius
    }

    pub fn transformed_center(&self) -> DVec2 {
        self.circle.center + DVec2::new(self.translation_x, self.translation_y)
    }
}

/// Rotation by `degrees` and uniform `scale` about `center`, in image coordinates.
///
/// Same layout as the usual 2x3 rotation matrix:
/// `[a b (1-a)cx - b cy; -b a b cx + (1-a)cy]` with `a = s cos`, `b = s sin`.
pub fn rotation_about(center: DVec2, degrees: f64, scale: f64) -> DAffine2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let a = scale * cos;
    let b = scale * sin;

    DAffine2::from_cols(
        DVec2::new(a, -b),
        DVec2::new(b, a),
        DVec2::new(
            (1.0 - a) * center.x - b * center.y,
            b * center.x + (1.0 - a) * center.y,
        ),
    )
}

/// Samples a scale, rotation and translation keeping the object inside the frame.
pub struct TransformPlanner {
    config: PlannerConfig,
}

impl TransformPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn enclosing_circle(contour: &Contour) -> Option<Circle> {
        let hull: Vec<DVec2> = convex_hull(contour.points())
            .into_iter()
            .map(|p| DVec2::new(p.x as f64, p.y as f64))
            .collect();
        min_enclosing_circle(&hull)
    }

    pub fn plan<R: Rng + ?Sized>(
        &self,
        contour: &Contour,
        frame_size: (u32, u32),
        rng: &mut R,
    ) -> Result<TransformSample> {
        let circle = Self::enclosing_circle(contour).ok_or(SynthError::InvalidTransformBounds {
            quantity: "radius",
            low: 0.0,
            high: 0.0,
        })?;
        self.plan_for_circle(circle, frame_size, rng)
    }

    /// Sample a transform for an object bounded by `circle`.
    ///
    /// Empty or inverted sampling intervals are configuration faults and are
    /// reported as [`SynthError::InvalidTransformBounds`], never clamped.
    pub fn plan_for_circle<R: Rng + ?Sized>(
        &self,
        circle: Circle,
        frame_size: (u32, u32),
        rng: &mut R,
    ) -> Result<TransformSample> {
        let _span = tracing::debug_span!("plan_transform").entered();

        let (min_scale, max_scale) = self.scale_bounds(circle.radius, frame_size);
        let scale = sample("scale", min_scale, max_scale, rng)?;
        let rotation_degrees = rng.random_range(-180.0f64..180.0);

        let radius2 = scale * circle.radius;
        let margin = self.config.margin;
        let (width, height) = (frame_size.0 as f64, frame_size.1 as f64);

        let translation_x = sample(
            "translation_x",
            radius2 - circle.center.x + margin,
            width - radius2 - circle.center.x - margin,
            rng,
        )?;
        let translation_y = sample(
            "translation_y",
            radius2 - circle.center.y + margin,
            height - radius2 - circle.center.y - margin,
            rng,
        )?;

        let planned = TransformSample {
            circle,
            scale,
            rotation_degrees,
            translation_x,
            translation_y,
        };
        check_containment(&planned, frame_size)?;

        tracing::debug!(
            scale,
            rotation_degrees,
            translation_x,
            translation_y,
            "planned transform"
        );
        Ok(planned)
    }

    /// `[min, max]` scale so the transformed diameter spans the configured
    /// fractions of the shorter frame side.
    pub fn scale_bounds(&self, radius: f64, frame_size: (u32, u32)) -> (f64, f64) {
        let min_side = frame_size.0.min(frame_size.1) as f64;
        let diameter = 2.0 * radius;
        (
            self.config.min_size_ratio * min_side / diameter,
            self.config.max_size_ratio * min_side / diameter,
        )
    }
}

fn sample<R: Rng + ?Sized>(quantity: &'static str, low: f64, high: f64, rng: &mut R) -> Result<f64> {
    if !(low.is_finite() && high.is_finite()) || low > high {
        return Err(SynthError::InvalidTransformBounds {
            quantity,
            low,
            high,
        });
    }
    Ok(rng.random_range(low..=high))
}

/// `r2 <= cx + dx <= W - r2` and the same along y.
fn check_containment(planned: &TransformSample, frame_size: (u32, u32)) -> Result<()> {
    let r2 = planned.transformed_radius();
    let center = planned.transformed_center();

    let axes = [
        ("translation_x", center.x, frame_size.0 as f64),
        ("translation_y", center.y, frame_size.1 as f64),
    ];
    for (quantity, c, extent) in axes {
        if !(r2 <= c && c <= extent - r2) {
            return Err(SynthError::InvalidTransformBounds {
                quantity,
                low: r2,
                high: extent - r2,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn planner() -> TransformPlanner {
        TransformPlanner::new(PlannerConfig::default())
    }

    #[test]
    fn scale_bounds_for_reference_scene() {
        // 400x300 frame, radius 30: [0.2 * 300 / 60, 0.3 * 300 / 60].
        let (lo, hi) = planner().scale_bounds(30.0, (400, 300));
        assert!((lo - 1.0).abs() < 1e-12);
        assert!((hi - 1.5).abs() < 1e-12);
    }

    #[test]
    fn samples_respect_bounds_and_containment() {
        let circle = Circle::new(DVec2::new(200.0, 150.0), 30.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let t = planner().plan_for_circle(circle, (400, 300), &mut rng).unwrap();
            assert!(t.scale >= 1.0 - 1e-12 && t.scale <= 1.5 + 1e-12);
            assert!((-180.0..180.0).contains(&t.rotation_degrees));

            let r2 = t.transformed_radius();
            let c = t.transformed_center();
            assert!(r2 <= c.x && c.x <= 400.0 - r2);
            assert!(r2 <= c.y && c.y <= 300.0 - r2);
        }
    }

    #[test]
    fn inverted_size_ratios_fail_loudly() {
        let planner = TransformPlanner::new(PlannerConfig {
            min_size_ratio: 0.5,
            max_size_ratio: 0.3,
            margin: 1.0,
        });
        let circle = Circle::new(DVec2::new(200.0, 150.0), 30.0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = planner.plan_for_circle(circle, (400, 300), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SynthError::InvalidTransformBounds { quantity: "scale", .. }
        ));
    }

    #[test]
    fn oversized_target_leaves_no_room_to_translate() {
        // Diameter after scaling exceeds the frame, so the x interval inverts.
        let planner = TransformPlanner::new(PlannerConfig {
            min_size_ratio: 1.2,
            max_size_ratio: 1.2,
            margin: 1.0,
        });
        let circle = Circle::new(DVec2::new(50.0, 50.0), 10.0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = planner.plan_for_circle(circle, (100, 100), &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::InvalidTransformBounds { .. }));
    }

    #[test]
    fn zero_radius_is_a_configuration_fault() {
        let circle = Circle::new(DVec2::new(10.0, 10.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            planner().plan_for_circle(circle, (100, 100), &mut rng),
            Err(SynthError::InvalidTransformBounds { .. })
        ));
    }

    #[test]
    fn rotation_matrix_fixes_its_center_and_scales_distances() {
        let center = DVec2::new(40.0, 30.0);
        let m = rotation_about(center, 37.0, 2.0);
        assert!((m.transform_point2(center) - center).length() < 1e-9);

        let p = center + DVec2::new(5.0, 0.0);
        assert!((m.transform_point2(p).distance(center) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn positive_angle_turns_x_axis_upwards_on_screen() {
        let m = rotation_about(DVec2::ZERO, 90.0, 1.0);
        let p = m.transform_point2(DVec2::new(1.0, 0.0));
        assert!((p - DVec2::new(0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn affine_moves_circle_center_by_translation() {
        let t = TransformSample {
            circle: Circle::new(DVec2::new(100.0, 80.0), 20.0),
            scale: 1.3,
            rotation_degrees: -75.0,
            translation_x: 12.0,
            translation_y: -7.0,
        };
        let moved = t.affine().transform_point2(t.circle.center);
        assert!((moved - DVec2::new(112.0, 73.0)).length() < 1e-9);
        assert_eq!(t.transformed_center(), DVec2::new(112.0, 73.0));
    }
}
