//! # face-makeup
//!
//! Landmark-driven cosmetic effects for face photographs.
//!
//! Given an RGB image and the 68 facial landmarks of one face, this crate
//! composites five effects in a fixed order:
//!
//! 1. **Lips** - the outer mouth contour minus the mouth opening, tinted and
//!    softened with a Gaussian blur
//! 2. **Eye shadow** - tapered strokes lifted toward each brow
//! 3. **Eyeliner** - tapered strokes just above each upper lid, eroded to a
//!    crisp edge and painted through a gating mask
//! 4. **Left blush** / 5. **Right blush** - a cheek quadrilateral bounded
//!    against the nose by line intersections, dilated and heavily blurred
//!
//! Colored layers are merged with the unnormalized overlay
//! `dst * 1.0 + layer * 0.6`, saturated to the 8-bit range.
//!
//! Landmark detection itself is not part of this crate; landmarks come from
//! an external detector (for example a dlib-compatible 68-point predictor).
//!
//! ## Quick Start
//!
//! ```rust
//! use face_makeup::{apply_makeup, BoundingBox, LandmarkSet, MakeupConfig};
//! use image::{Rgb, RgbImage};
//!
//! let image = RgbImage::from_pixel(300, 300, Rgb([180, 150, 130]));
//!
//! // Normally produced by a face landmark detector
//! let landmarks = LandmarkSet::mean_face(&BoundingBox::new(30.0, 30.0, 240.0, 240.0));
//!
//! let result = apply_makeup(&image, &landmarks, &MakeupConfig::default()).unwrap();
//! assert_eq!(result.dimensions(), image.dimensions());
//! ```
//!
//! ## Individual Stages
//!
//! ```rust
//! use face_makeup::{BoundingBox, LandmarkSet, Makeup, MakeupConfig, Stage};
//! use image::{Rgb, RgbImage};
//!
//! let mut image = RgbImage::from_pixel(300, 300, Rgb([128, 128, 128]));
//! let landmarks = LandmarkSet::mean_face(&BoundingBox::new(30.0, 30.0, 240.0, 240.0));
//!
//! let makeup = Makeup::new(MakeupConfig::default()).unwrap();
//! makeup.apply_stage(Stage::Lips, &mut image, &landmarks).unwrap();
//! ```

pub mod blend;
pub mod config;
mod error;
pub mod geometry;
pub mod landmarks;
mod pipeline;
pub mod raster;
pub mod regions;
mod types;

pub use config::{BlendWeights, BlurKernels, GaussianKernel, MakeupConfig, Morphology, StrokeThicknesses};
pub use error::{Error, GeometryError, Result};
pub use geometry::{line_intersection, perpendicular};
pub use landmarks::{LandmarkSet, NUM_LANDMARKS};
pub use pipeline::{apply_makeup, Makeup, Stage};
pub use regions::{Side, Stroke};
pub use types::{Bgr, BoundingBox, Point};
