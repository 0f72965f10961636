use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::morphology::dilate;

use super::Contour;

const OPAQUE: Luma<u8> = Luma([255]);

/// Rasterize the contour interior (boundary included) as a 0/255 mask.
pub fn fill_mask(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    match contour.points() {
        [] => {}
        [p] => {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                mask.put_pixel(p.x as u32, p.y as u32, OPAQUE);
            }
        }
        points => draw_polygon_mut(&mut mask, points, OPAQUE),
    }
    mask
}

/// Draw the closed contour line at `line_width` pixels.
///
/// The line is traced at one pixel and then grown with a square kernel, so
/// even widths round down to the next odd width.
pub fn edge_layer(contour: &Contour, width: u32, height: u32, line_width: u32) -> GrayImage {
    let mut edges = GrayImage::new(width, height);
    let points = contour.points();
    if points.is_empty() || line_width == 0 {
        return edges;
    }

    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            &mut edges,
            (p.x as f32, p.y as f32),
            (q.x as f32, q.y as f32),
            OPAQUE,
        );
    }

    let radius = (line_width / 2).min(u8::MAX as u32) as u8;
    if radius == 0 {
        edges
    } else {
        dilate(&edges, Norm::LInf, radius)
    }
}
