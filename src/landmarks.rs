//! The 68-point facial landmark set and its anatomical index layout.
//!
//! Indices follow the iBUG 300-W convention used by dlib's 68-point shape
//! predictor. "Left" and "right" in this crate always mean the side of the
//! *image*, so the image-left eye is landmarks 36-41.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{BoundingBox, Point};

/// Number of points in a complete landmark set.
pub const NUM_LANDMARKS: usize = 68;

/// Named index ranges into a [`LandmarkSet`].
pub mod regions {
    use std::ops::Range;

    pub const JAW: Range<usize> = 0..17;
    pub const LEFT_BROW: Range<usize> = 17..22;
    pub const RIGHT_BROW: Range<usize> = 22..27;
    pub const NOSE_BRIDGE: Range<usize> = 27..31;
    pub const NOSE_BOTTOM: Range<usize> = 31..36;
    pub const LEFT_EYE: Range<usize> = 36..42;
    pub const RIGHT_EYE: Range<usize> = 42..48;
    /// Outer corner, two lid points, inner corner.
    pub const LEFT_UPPER_LID: Range<usize> = 36..40;
    /// Inner corner, two lid points, outer corner.
    pub const RIGHT_UPPER_LID: Range<usize> = 42..46;
    pub const OUTER_LIP: Range<usize> = 48..60;
    pub const INNER_LIP: Range<usize> = 60..68;

    pub const LEFT_CHEEK: Range<usize> = 0..5;
    pub const RIGHT_CHEEK: Range<usize> = 12..17;
    pub const NOSE_RIDGE: usize = 28;
    pub const LEFT_ALAR: usize = 31;
    pub const RIGHT_ALAR: usize = 35;
    pub const LEFT_EYE_INNER: usize = 39;
    pub const RIGHT_EYE_INNER: usize = 42;
}

/// For each index, the index of its horizontally mirrored counterpart.
const MIRROR_INDEX: [usize; NUM_LANDMARKS] = [
    // Jaw
    16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0,
    // Brows
    26, 25, 24, 23, 22, 21, 20, 19, 18, 17,
    // Nose bridge
    27, 28, 29, 30,
    // Nose bottom
    35, 34, 33, 32, 31,
    // Eyes
    45, 44, 43, 42, 47, 46, 39, 38, 37, 36, 41, 40,
    // Outer lip
    54, 53, 52, 51, 50, 49, 48, 59, 58, 57, 56, 55,
    // Inner lip
    64, 63, 62, 61, 60, 67, 66, 65,
];

/// Approximate mean positions of the 68 landmarks in normalized [0,1]
/// coordinates. The shape is exactly symmetric about x = 0.5.
const MEAN_FACE: [(f32, f32); NUM_LANDMARKS] = [
    // Jaw line (0-16)
    (0.10, 0.35),
    (0.11, 0.45),
    (0.12, 0.55),
    (0.14, 0.65),
    (0.18, 0.73),
    (0.24, 0.80),
    (0.32, 0.85),
    (0.41, 0.88),
    (0.50, 0.89),
    (0.59, 0.88),
    (0.68, 0.85),
    (0.76, 0.80),
    (0.82, 0.73),
    (0.86, 0.65),
    (0.88, 0.55),
    (0.89, 0.45),
    (0.90, 0.35),
    // Image-left brow (17-21)
    (0.20, 0.26),
    (0.25, 0.22),
    (0.32, 0.21),
    (0.38, 0.23),
    (0.43, 0.27),
    // Image-right brow (22-26)
    (0.57, 0.27),
    (0.62, 0.23),
    (0.68, 0.21),
    (0.75, 0.22),
    (0.80, 0.26),
    // Nose bridge (27-30)
    (0.50, 0.32),
    (0.50, 0.40),
    (0.50, 0.48),
    (0.50, 0.55),
    // Nose bottom (31-35)
    (0.40, 0.58),
    (0.45, 0.60),
    (0.50, 0.62),
    (0.55, 0.60),
    (0.60, 0.58),
    // Image-left eye (36-41)
    (0.24, 0.32),
    (0.28, 0.29),
    (0.34, 0.29),
    (0.38, 0.33),
    (0.34, 0.35),
    (0.28, 0.35),
    // Image-right eye (42-47)
    (0.62, 0.33),
    (0.66, 0.29),
    (0.72, 0.29),
    (0.76, 0.32),
    (0.72, 0.35),
    (0.66, 0.35),
    // Outer lip (48-59)
    (0.32, 0.72),
    (0.38, 0.68),
    (0.44, 0.66),
    (0.50, 0.67),
    (0.56, 0.66),
    (0.62, 0.68),
    (0.68, 0.72),
    (0.62, 0.78),
    (0.56, 0.80),
    (0.50, 0.81),
    (0.44, 0.80),
    (0.38, 0.78),
    // Inner lip (60-67)
    (0.36, 0.72),
    (0.44, 0.70),
    (0.50, 0.70),
    (0.56, 0.70),
    (0.64, 0.72),
    (0.56, 0.74),
    (0.50, 0.75),
    (0.44, 0.74),
];

/// An ordered set of facial landmarks in image coordinates.
///
/// Construction accepts any number of points so that detector output can be
/// carried as-is; every indexed access is checked and fails with
/// [`Error::IndexOutOfRange`] when the set is too short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The mean face placed into `bbox`, rounded to whole pixels.
    pub fn mean_face(bbox: &BoundingBox) -> Self {
        let points = MEAN_FACE
            .iter()
            .map(|&(nx, ny)| bbox.denormalize_point(nx, ny))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the set holds exactly the 68 canonical points.
    pub fn is_complete(&self) -> bool {
        self.points.len() == NUM_LANDMARKS
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Result<Point> {
        self.points
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
    }

    pub fn range(&self, range: Range<usize>) -> Result<&[Point]> {
        let len = self.points.len();
        if range.end > len {
            return Err(Error::IndexOutOfRange {
                index: range.end - 1,
                len,
            });
        }
        Ok(&self.points[range])
    }

    /// Mirror the set horizontally within an image of the given width.
    ///
    /// Point `i` of the result is the reflection of the anatomical
    /// counterpart of `i`, so the result follows the canonical ordering again
    /// (e.g. landmark 36 stays the outer corner of the image-left eye).
    pub fn mirrored(&self, width: u32) -> Result<Self> {
        if !self.is_complete() {
            return Err(Error::IndexOutOfRange {
                index: NUM_LANDMARKS - 1,
                len: self.points.len(),
            });
        }
        let max_x = width as i32 - 1;
        let points = MIRROR_INDEX
            .iter()
            .map(|&src| {
                let p = self.points[src];
                Point::new(max_x - p.x, p.y)
            })
            .collect();
        Ok(Self { points })
    }

    /// Load a landmark set from a JSON array of `{"x": .., "y": ..}` objects.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}
