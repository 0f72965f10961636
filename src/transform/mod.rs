mod circle;
mod planner;

pub use circle::{min_enclosing_circle, Circle};
pub use planner::{rotation_about, TransformPlanner, TransformSample};

use glam::DAffine2;
use imageproc::geometric_transformations::Projection;

/// Convert a 2-D affine map into an imageproc projection for warping.
///
/// `None` when the map is singular.
pub fn to_projection(affine: &DAffine2) -> Option<Projection> {
    let m = affine.matrix2;
    let t = affine.translation;
    Projection::from_matrix([
        m.x_axis.x as f32,
        m.y_axis.x as f32,
        t.x as f32,
        m.x_axis.y as f32,
        m.y_axis.y as f32,
        t.y as f32,
        0.0,
        0.0,
        1.0,
    ])
}
