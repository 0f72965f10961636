use image::{GrayImage, RgbImage};
use rand::Rng;

use crate::augment::ColorAugmenter;
use crate::composite::{BackgroundCycle, Compositor, WarpedLayers};
use crate::config::SynthConfig;
use crate::error::Result;
use crate::extract::{binarize, to_gray, Foreground, ForegroundExtractor};
use crate::label::{self, Label};
use crate::transform::{TransformPlanner, TransformSample};

/// Grayscale and binary views of a frame.
///
/// A rejected frame carries no views; callers that want to show why it was
/// rejected rebuild them with [`Thresholded::new`].
#[derive(Debug, Clone)]
pub struct Thresholded {
    pub gray: GrayImage,
    pub binary: GrayImage,
}

impl Thresholded {
    pub fn new(frame: &RgbImage, config: &SynthConfig) -> Self {
        let gray = to_gray(frame);
        let binary = binarize(&gray, config.augment.threshold, config.augment.polarity);
        Self { gray, binary }
    }
}

/// One synthetic training sample and the intermediates that produced it.
#[derive(Debug, Clone)]
pub struct Sample {
    pub thresholded: Thresholded,
    pub foreground: Foreground,
    pub augmented: RgbImage,
    pub transform: TransformSample,
    pub warped: WarpedLayers,
    pub composite: RgbImage,
    pub label: Label,
}

/// Run every stage on one frame, taking the next background from `backgrounds`.
///
/// The background cycle only advances once a foreground object has been found.
/// [`SynthError::NoForegroundFound`](crate::SynthError::NoForegroundFound) and
/// [`SynthError::AmbiguousOrientation`](crate::SynthError::AmbiguousOrientation)
/// reject the frame; other errors are faults.
pub fn synthesize<R: Rng + ?Sized>(
    frame: &RgbImage,
    backgrounds: &mut BackgroundCycle,
    config: &SynthConfig,
    rng: &mut R,
) -> Result<Sample> {
    let _span = tracing::debug_span!("synthesize").entered();

    let thresholded = Thresholded::new(frame, config);
    let foreground = ForegroundExtractor::new(config.extract).extract(&thresholded.binary)?;

    let augmented = ColorAugmenter::new(config.augment).augment(frame, rng);

    let transform =
        TransformPlanner::new(config.planner).plan(&foreground.contour, frame.dimensions(), rng)?;
    let affine = transform.affine();

    let compositor = Compositor::new(config.composite);
    let warped = compositor.warp_layers(&augmented, &foreground.mask, &foreground.edges, &affine)?;
    let background = backgrounds.next_background()?;
    let composite = compositor.composite(&warped, &background)?;

    let label = label::label(&foreground.rect_corners, &affine)?;

    Ok(Sample {
        thresholded,
        foreground,
        augmented,
        transform,
        warped,
        composite,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AugmentationConfig;
    use crate::SynthError;
    use image::Rgb;
    use imageproc::drawing::draw_filled_circle_mut;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BACKDROP: Rgb<u8> = Rgb([255, 255, 255]);
    const OBJECT: Rgb<u8> = Rgb([30, 90, 160]);
    const SCENERY: Rgb<u8> = Rgb([0, 120, 0]);

    fn frame_with_disk() -> RgbImage {
        let mut frame = RgbImage::from_pixel(400, 300, BACKDROP);
        draw_filled_circle_mut(&mut frame, (200, 150), 30, OBJECT);
        frame
    }

    fn identity_color() -> SynthConfig {
        SynthConfig {
            augment: AugmentationConfig {
                hue_shift_max: 0,
                saturation_shift_max: 0,
                value_shift_max: 0,
                threshold: 128,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn reference_scene_produces_a_consistent_sample() {
        let frame = frame_with_disk();
        let mut backgrounds =
            BackgroundCycle::from_images(vec![RgbImage::from_pixel(200, 100, SCENERY)]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let sample = synthesize(&frame, &mut backgrounds, &identity_color(), &mut rng).unwrap();

        // Zero shifts leave the frame untouched.
        assert_eq!(sample.augmented, frame);

        // Enclosing radius is about 30 on a 300-pixel short side.
        let t = sample.transform;
        assert!((t.circle.radius - 30.0).abs() < 1.0);
        let (lo, hi) = TransformPlanner::new(Default::default()).scale_bounds(t.circle.radius, (400, 300));
        assert!(t.scale >= lo && t.scale <= hi);

        assert_eq!(sample.composite.dimensions(), (400, 300));
        // Far corner is untouched scenery; the object centre carries the object color.
        assert_eq!(*sample.composite.get_pixel(0, 0), SCENERY);
        let c = t.transformed_center();
        assert_eq!(*sample.composite.get_pixel(c.x as u32, c.y as u32), OBJECT);

        // The label box is centred on the moved object.
        let centre = sample.label.corners.iter().copied().sum::<glam::DVec2>() / 4.0;
        assert!((centre - c).length() < 2.0);
        assert!(sample.label.bbox.angle.abs() <= std::f64::consts::FRAC_PI_4 + 1e-12);
    }

    #[test]
    fn blank_frame_is_rejected_without_consuming_a_background() {
        let frame = RgbImage::from_pixel(400, 300, BACKDROP);
        let mut backgrounds = BackgroundCycle::from_images(vec![
            RgbImage::from_pixel(4, 4, SCENERY),
            RgbImage::from_pixel(4, 4, BACKDROP),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let err = synthesize(&frame, &mut backgrounds, &identity_color(), &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::NoForegroundFound));
        assert!(err.is_recoverable());
        assert_eq!(backgrounds.position(), 0);
    }

    #[test]
    fn thresholded_views_mark_the_object() {
        let thresholded = Thresholded::new(&frame_with_disk(), &identity_color());
        assert_eq!(thresholded.binary.get_pixel(200, 150)[0], 255);
        assert_eq!(thresholded.binary.get_pixel(5, 5)[0], 0);
        assert_eq!(thresholded.gray.get_pixel(5, 5)[0], 255);
    }
}
