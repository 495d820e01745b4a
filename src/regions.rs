//! Per-feature region masks built from landmark subsets.
//!
//! Every builder returns a fresh single-channel mask of the image's size with
//! [`INSIDE`] marking the feature region. Stroked features are described as
//! [`Stroke`] lists first and rasterized afterwards.

use image::GrayImage;
use log::debug;

use crate::config::{StrokeThicknesses, LINER_SEGMENTS, SHADOW_STROKES};
use crate::error::Result;
use crate::geometry::{line_intersection, taper};
use crate::landmarks::{regions, LandmarkSet};
use crate::raster::{blank_mask, dilate_cross, erode_square, fill_polygon, stroke_segment, union, INSIDE, OUTSIDE};
use crate::types::Point;

/// Side of the image a feature sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Horizontal direction pointing away from the face centre.
    fn outward(self) -> i32 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }
}

/// A straight round-capped stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub start: Point,
    pub end: Point,
    pub thickness: i32,
}

fn draw_strokes(mask: &mut GrayImage, strokes: &[Stroke]) {
    for s in strokes {
        stroke_segment(mask, s.start, s.end, s.thickness, INSIDE);
    }
}

/// Lip surface: the outer mouth contour minus the mouth opening.
pub fn lip_mask(width: u32, height: u32, landmarks: &LandmarkSet) -> Result<GrayImage> {
    let outer = landmarks.range(regions::OUTER_LIP)?;
    let inner = landmarks.range(regions::INNER_LIP)?;

    let mut mask = blank_mask(width, height);
    fill_polygon(&mut mask, outer, INSIDE);
    fill_polygon(&mut mask, inner, OUTSIDE);
    Ok(mask)
}

/// Liner segments along the upper lid, lifted by `height / liner_lift_divisor`.
///
/// The thickest segment sits at the outer canthus on both eyes.
pub fn liner_strokes(
    side: Side,
    landmarks: &LandmarkSet,
    height: u32,
    strokes: &StrokeThicknesses,
) -> Result<Vec<Stroke>> {
    let (lid, widths) = match side {
        Side::Left => (
            landmarks.range(regions::LEFT_UPPER_LID)?,
            taper(strokes.liner_left, -strokes.liner_step, LINER_SEGMENTS),
        ),
        Side::Right => (
            landmarks.range(regions::RIGHT_UPPER_LID)?,
            taper(strokes.liner_right, strokes.liner_step, LINER_SEGMENTS),
        ),
    };
    let lift = Point::new(0, (height / strokes.liner_lift_divisor.max(1)) as i32);

    Ok(lid
        .windows(2)
        .zip(widths)
        .map(|(pair, thickness)| Stroke {
            start: pair[0] - lift,
            end: pair[1] - lift,
            thickness,
        })
        .collect())
}

/// Eyeliner region of both eyes, eroded with a square element of side `erode`.
pub fn eyeliner_mask(
    width: u32,
    height: u32,
    landmarks: &LandmarkSet,
    strokes: &StrokeThicknesses,
    erode: u32,
) -> Result<GrayImage> {
    let mut merged = blank_mask(width, height);
    for side in Side::BOTH {
        let mut mask = blank_mask(width, height);
        draw_strokes(&mut mask, &liner_strokes(side, landmarks, height, strokes)?);
        merged = union(&merged, &erode_square(&mask, erode))?;
    }
    Ok(merged)
}

/// Move `from` toward `to` by `|to - from| / divisor` on each axis.
fn shift_toward(from: Point, to: Point, divisor: i32) -> Point {
    let d = to - from;
    Point::new(
        from.x + d.x.signum() * (d.x.abs() / divisor),
        from.y + d.y.signum() * (d.y.abs() / divisor),
    )
}

/// Eye-shadow strokes for one eye, ordered from the outer canthus inward.
///
/// Each lid interval is lifted a third of the way toward the brow; a final
/// stroke runs to a point halfway between the inner canthus and the inner end
/// of the brow. Thickness drops by `shadow_step` per stroke.
pub fn shadow_strokes(side: Side, landmarks: &LandmarkSet, strokes: &StrokeThicknesses) -> Result<Vec<Stroke>> {
    // (lid point, brow point) pairs from the outer canthus to the inner one,
    // followed by the inner end of the brow.
    let (anchors, inner_brow) = match side {
        Side::Left => {
            let lid = landmarks.range(regions::LEFT_UPPER_LID)?;
            let brow = landmarks.range(regions::LEFT_BROW)?;
            let anchors: Vec<(Point, Point)> = (0..4).map(|i| (lid[i], brow[i])).collect();
            (anchors, brow[4])
        }
        Side::Right => {
            let lid = landmarks.range(regions::RIGHT_UPPER_LID)?;
            let brow = landmarks.range(regions::RIGHT_BROW)?;
            // Mirror of the left eye: brow offset by one, closing on the inner canthus.
            let anchors: Vec<(Point, Point)> = (0..4).rev().map(|i| (lid[i], brow[i + 1])).collect();
            (anchors, brow[0])
        }
    };
    let mut widths = taper(strokes.shadow, -strokes.shadow_step, SHADOW_STROKES).into_iter();

    let lifted: Vec<Point> = anchors
        .iter()
        .map(|&(eye, brow)| shift_toward(eye, brow, 3))
        .collect();
    let mut out: Vec<Stroke> = lifted
        .windows(2)
        .zip(widths.by_ref())
        .map(|(pair, thickness)| Stroke {
            start: pair[0],
            end: pair[1],
            thickness,
        })
        .collect();

    let (inner_eye, _) = anchors[anchors.len() - 1];
    if let (Some(last), Some(thickness)) = (out.last().copied(), widths.next()) {
        out.push(Stroke {
            start: last.end,
            end: shift_toward(inner_eye, inner_brow, 2),
            thickness,
        });
    }
    Ok(out)
}

/// Unblurred eye-shadow region of both eyes.
pub fn eye_shadow_mask(
    width: u32,
    height: u32,
    landmarks: &LandmarkSet,
    strokes: &StrokeThicknesses,
) -> Result<GrayImage> {
    let mut mask = blank_mask(width, height);
    for side in Side::BOTH {
        let mut eye = blank_mask(width, height);
        draw_strokes(&mut eye, &shadow_strokes(side, landmarks, strokes)?);
        mask = union(&mask, &eye)?;
    }
    Ok(mask)
}

/// Corners of the blush quadrilateral on one cheek.
///
/// The nose-side edge lies on the line from the alar landmark to the inner eye
/// corner, cut by lines from the top and bottom cheek landmarks through the
/// nose ridge. The cheek corners are pulled inward by a quarter of the cheek
/// span and the nose corners by an eighth.
pub fn blush_polygon(landmarks: &LandmarkSet, side: Side) -> Result<[Point; 4]> {
    let (cheek, alar, eye) = match side {
        Side::Left => (
            landmarks.range(regions::LEFT_CHEEK)?,
            landmarks.point(regions::LEFT_ALAR)?,
            landmarks.point(regions::LEFT_EYE_INNER)?,
        ),
        Side::Right => (
            landmarks.range(regions::RIGHT_CHEEK)?,
            landmarks.point(regions::RIGHT_ALAR)?,
            landmarks.point(regions::RIGHT_EYE_INNER)?,
        ),
    };
    let nose = landmarks.point(regions::NOSE_RIDGE)?;

    // The jaw runs top-down on the image-left cheek and bottom-up on the right.
    let (top, bottom) = match side {
        Side::Left => (cheek[0], cheek[cheek.len() - 1]),
        Side::Right => (cheek[cheek.len() - 1], cheek[0]),
    };

    let upper = line_intersection(top, nose, alar, eye)?;
    let lower = line_intersection(bottom, nose, alar, eye)?;

    let off_y = (top.y - bottom.y).abs() / 4;
    let off_x = (top.x - upper.x).abs() / 4;
    let inward = -side.outward();

    Ok([
        Point::new(top.x + inward * off_x, top.y + off_y),
        Point::new(bottom.x + inward * off_x, bottom.y - off_y),
        Point::new(lower.x - inward * (off_x / 2), lower.y - off_y / 2),
        Point::new(upper.x - inward * (off_x / 2), upper.y + off_y / 2),
    ])
}

/// Filled blush patch on one cheek, rounded by a cross dilation.
pub fn blush_mask(
    width: u32,
    height: u32,
    landmarks: &LandmarkSet,
    side: Side,
    dilate_radius: u32,
) -> Result<GrayImage> {
    let corners = blush_polygon(landmarks, side)?;
    debug!("blush {:?} quadrilateral {:?}", side, corners);

    let mut mask = blank_mask(width, height);
    fill_polygon(&mut mask, &corners, INSIDE);
    Ok(dilate_cross(&mask, dilate_radius))
}
