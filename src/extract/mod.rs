mod contour;
mod layers;
mod threshold;

pub use contour::{find_external_contours, Contour};
pub use layers::{edge_layer, fill_mask};
pub use threshold::{binarize, to_gray};

use glam::DVec2;
use image::GrayImage;

use crate::config::ExtractorConfig;
use crate::error::{Result, SynthError};

/// Distance assigned to contours whose centroid is undefined.
const NO_CENTROID_DISTANCE: f64 = 10_000.0;

/// The selected object and its raster layers, all aligned with the source frame.
#[derive(Debug, Clone)]
pub struct Foreground {
    pub contour: Contour,
    pub mask: GrayImage,
    pub edges: GrayImage,
    /// Minimum-area rotated rectangle around the contour.
    pub rect_corners: [DVec2; 4],
}

/// Picks the foreground object out of a binarized frame.
pub struct ForegroundExtractor {
    config: ExtractorConfig,
}

impl ForegroundExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Select the contour closest to the frame center and rasterize its layers.
    ///
    /// Returns [`SynthError::NoForegroundFound`] when every candidate is
    /// rejected as a speck or as touching/filling the frame.
    pub fn extract(&self, binary: &GrayImage) -> Result<Foreground> {
        let _span = tracing::debug_span!("extract_foreground").entered();

        let contour = self.select(binary)?;
        let (width, height) = binary.dimensions();

        let mask = fill_mask(&contour, width, height);
        let edges = edge_layer(&contour, width, height, self.config.edge_width);
        let rect_corners = contour.min_area_corners();

        Ok(Foreground {
            contour,
            mask,
            edges,
            rect_corners,
        })
    }

    /// Run both rejection filters, then pick the most central survivor.
    pub fn select(&self, binary: &GrayImage) -> Result<Contour> {
        let (width, height) = binary.dimensions();
        let candidates = find_external_contours(binary);
        let found = candidates.len();

        let sized: Vec<Contour> = candidates
            .into_iter()
            .filter(|c| self.passes_area(c, width, height))
            .collect();
        if sized.is_empty() {
            tracing::debug!("{} contours, none above the size threshold", found);
            return Err(SynthError::NoForegroundFound);
        }

        let placed: Vec<Contour> = sized
            .into_iter()
            .filter(|c| self.passes_border(c, width, height))
            .collect();
        if placed.is_empty() {
            tracing::debug!("{} contours, none clear of the frame border", found);
            return Err(SynthError::NoForegroundFound);
        }

        let center = DVec2::new(width as f64 / 2.0, height as f64 / 2.0);
        let distance = |c: &Contour| {
            c.centroid()
                .map(|p| p.distance(center))
                .unwrap_or(NO_CENTROID_DISTANCE)
        };

        // min_by keeps the first of equal elements, so discovery order breaks ties.
        placed
            .into_iter()
            .map(|c| (distance(&c), c))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, c)| c)
            .ok_or(SynthError::NoForegroundFound)
    }

    fn passes_area(&self, contour: &Contour, width: u32, height: u32) -> bool {
        let frame_area = width as f64 * height as f64;
        self.config.min_side_ratio < (contour.area() / frame_area).sqrt()
    }

    fn passes_border(&self, contour: &Contour, width: u32, height: u32) -> bool {
        let Some(rect) = contour.bounding_rect() else {
            return false;
        };

        let margin = self.config.border_margin as i64;
        let (x, y) = (rect.left() as i64, rect.top() as i64);
        let (w, h) = (rect.width() as i64, rect.height() as i64);
        let (frame_w, frame_h) = (width as i64, height as i64);

        if x < margin || y < margin || frame_w - margin < x + w || frame_h - margin < y + h {
            return false;
        }

        ((w + h) as f64 / (frame_w + frame_h) as f64) < self.config.max_extent_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
    use imageproc::rect::Rect;

    fn extractor() -> ForegroundExtractor {
        ForegroundExtractor::new(ExtractorConfig::default())
    }

    #[test]
    fn central_disk_is_selected() {
        let mut bin = GrayImage::new(400, 300);
        draw_filled_circle_mut(&mut bin, (200, 150), 30, Luma([255]));

        let fg = extractor().extract(&bin).unwrap();
        let c = fg.contour.centroid().unwrap();
        assert!((c.x - 200.0).abs() < 1.0);
        assert!((c.y - 150.0).abs() < 1.0);

        assert_eq!(fg.mask.dimensions(), (400, 300));
        assert_eq!(fg.edges.dimensions(), (400, 300));
        assert_eq!(fg.mask.get_pixel(200, 150)[0], 255);
        assert_eq!(fg.mask.get_pixel(10, 10)[0], 0);
        assert_eq!(fg.edges.get_pixel(200, 150)[0], 0);
    }

    #[test]
    fn specks_are_rejected() {
        // sqrt(area / frame_area) is well under 0.10 for a radius-5 dot.
        let mut bin = GrayImage::new(400, 300);
        draw_filled_circle_mut(&mut bin, (200, 150), 5, Luma([255]));

        assert!(matches!(
            extractor().extract(&bin),
            Err(SynthError::NoForegroundFound)
        ));
    }

    #[test]
    fn size_threshold_is_strict() {
        // 200x200 frame: a contour passes only with area above 0.10^2 * 40000 = 400.
        // A filled block of side s traces a boundary polygon of area (s - 1)^2.
        let passes = |side: u32| {
            let mut bin = GrayImage::new(200, 200);
            let origin = 100 - side as i32 / 2;
            draw_filled_rect_mut(&mut bin, Rect::at(origin, origin).of_size(side, side), Luma([255]));
            extractor().select(&bin).is_ok()
        };

        assert!(!passes(19));
        assert!(!passes(21));
        assert!(passes(22));
        assert!(passes(23));
    }

    #[test]
    fn empty_frame_has_no_foreground() {
        let bin = GrayImage::new(64, 48);
        assert!(matches!(
            extractor().extract(&bin),
            Err(SynthError::NoForegroundFound)
        ));
    }

    #[test]
    fn contour_near_left_edge_is_rejected_even_when_large() {
        let mut bin = GrayImage::new(400, 300);
        draw_filled_rect_mut(&mut bin, Rect::at(2, 100).of_size(120, 100), Luma([255]));

        assert!(matches!(
            extractor().extract(&bin),
            Err(SynthError::NoForegroundFound)
        ));
    }

    #[test]
    fn near_full_frame_contour_is_rejected() {
        let mut bin = GrayImage::new(100, 100);
        // (90 + 90) / (100 + 100) reaches the 0.9 extent limit.
        draw_filled_rect_mut(&mut bin, Rect::at(5, 5).of_size(90, 90), Luma([255]));

        assert!(matches!(
            extractor().extract(&bin),
            Err(SynthError::NoForegroundFound)
        ));
    }

    #[test]
    fn most_central_of_several_survivors_wins() {
        let mut bin = GrayImage::new(400, 300);
        draw_filled_circle_mut(&mut bin, (100, 150), 30, Luma([255]));
        draw_filled_circle_mut(&mut bin, (210, 160), 30, Luma([255]));

        let fg = extractor().extract(&bin).unwrap();
        let c = fg.contour.centroid().unwrap();
        assert!((c.x - 210.0).abs() < 1.0);
    }

    #[test]
    fn equidistant_contours_resolve_to_first_discovered() {
        // Mirror-image blocks at equal distance from the center; the tracer
        // scans rows top to bottom, so the upper block is found first.
        let mut bin = GrayImage::new(400, 300);
        draw_filled_rect_mut(&mut bin, Rect::at(170, 40).of_size(60, 60), Luma([255]));
        draw_filled_rect_mut(&mut bin, Rect::at(170, 201).of_size(60, 60), Luma([255]));

        let contour = extractor().select(&bin).unwrap();
        let rect = contour.bounding_rect().unwrap();
        assert_eq!(rect.top(), 40);
    }
}
