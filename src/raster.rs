//! Rasterization and morphology on single-channel masks.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::morphology::{erode, grayscale_dilate, Mask};
use log::debug;

use crate::error::{check_dimensions, Result};
use crate::types::Point;

/// Value written for pixels inside a region.
pub const INSIDE: u8 = 255;
/// Value of pixels outside every region.
pub const OUTSIDE: u8 = 0;

/// A blank (all-outside) mask.
pub fn blank_mask(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

/// Fill the polygon traced by `points` with `value`.
///
/// The contour is closed implicitly. Repeated consecutive vertices and an
/// explicit closing vertex are dropped; anything with fewer than three
/// distinct vertices is left undrawn.
pub fn fill_polygon(mask: &mut GrayImage, points: &[Point], value: u8) {
    let mut contour: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if contour.last() != Some(&p) {
            contour.push(p);
        }
    }
    while contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    if contour.len() < 3 {
        debug!("skipping degenerate polygon with {} distinct vertices", contour.len());
        return;
    }

    let poly: Vec<imageproc::point::Point<i32>> = contour.into_iter().map(Into::into).collect();
    draw_polygon_mut(mask, &poly, Luma([value]));
}

/// Draw a straight stroke with round caps reaching `thickness / 2` pixels
/// either side of the segment. Thicknesses below 2 draw a one-pixel line.
pub fn stroke_segment(mask: &mut GrayImage, start: Point, end: Point, thickness: i32, value: u8) {
    let radius = thickness / 2;
    let color = Luma([value]);
    if radius < 1 {
        draw_line_segment_mut(
            mask,
            (start.x as f32, start.y as f32),
            (end.x as f32, end.y as f32),
            color,
        );
        return;
    }

    let d = end - start;
    let len = (d.dot(d) as f64).sqrt();
    if len > 0.0 {
        let n = d.perpendicular();
        let scale = radius as f64 / len;
        let offset = Point::new(
            (n.x as f64 * scale).round() as i32,
            (n.y as f64 * scale).round() as i32,
        );
        fill_polygon(mask, &[start + offset, end + offset, end - offset, start - offset], value);
    }
    for cap in [start, end] {
        draw_filled_circle_mut(mask, (cap.x, cap.y), radius, color);
    }
}

/// Erode with a `size` x `size` all-ones structuring element.
pub fn erode_square(mask: &GrayImage, size: u32) -> GrayImage {
    let k = u8::try_from(size / 2).unwrap_or(u8::MAX);
    erode(mask, Norm::LInf, k)
}

/// Dilate with a cross-shaped structuring element: a horizontal and a
/// vertical bar of `2 * radius + 1` pixels through the anchor. The radius is
/// capped at 255.
pub fn dilate_cross(mask: &GrayImage, radius: u32) -> GrayImage {
    let r = u8::try_from(radius).unwrap_or(u8::MAX);
    let side = 2 * u32::from(r) + 1;
    let cross = GrayImage::from_fn(side, side, |x, y| {
        if x == u32::from(r) || y == u32::from(r) {
            Luma([INSIDE])
        } else {
            Luma([OUTSIDE])
        }
    });
    grayscale_dilate(mask, &Mask::from_image(&cross, r, r))
}

/// Pixel-wise bitwise OR of two masks.
pub fn union(a: &GrayImage, b: &GrayImage) -> Result<GrayImage> {
    check_dimensions(a.dimensions(), b.dimensions())?;
    let mut out = a.clone();
    for (o, p) in out.iter_mut().zip(b.iter()) {
        *o |= *p;
    }
    Ok(out)
}

/// Pixel-wise bitwise NOT.
pub fn invert(mask: &GrayImage) -> GrayImage {
    let mut out = mask.clone();
    for p in out.iter_mut() {
        *p = !*p;
    }
    out
}

/// Number of pixels inside the mask.
pub fn count_inside(mask: &GrayImage) -> usize {
    mask.iter().filter(|&&p| p != OUTSIDE).count()
}
