//! Tunable parameters for every makeup stage.
//!
//! All structures deserialize with defaults filled in, so a JSON file only
//! needs to name the values it overrides:
//!
//! ```json
//! { "lip_color": [40, 10, 160], "blur": { "lips": { "size": 15, "sigma": 8.0 } } }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Bgr;

/// Complete configuration of the makeup pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakeupConfig {
    pub lip_color: Bgr,
    pub liner_color: Bgr,
    pub shadow_color: Bgr,
    pub blush_color: Bgr,
    pub blur: BlurKernels,
    pub strokes: StrokeThicknesses,
    pub morphology: Morphology,
    pub blend: BlendWeights,
}

/// A square Gaussian kernel. `size` must be odd.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianKernel {
    pub size: u32,
    pub sigma: f64,
}

impl GaussianKernel {
    pub const fn new(size: u32, sigma: f64) -> Self {
        Self { size, sigma }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurKernels {
    pub lips: GaussianKernel,
    pub eye_shadow: GaussianKernel,
    pub blush: GaussianKernel,
    /// Side of the box filter applied to the colored blush layer.
    pub blush_box: u32,
}

/// Stroke widths and tapers for the stroked features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeThicknesses {
    /// First (outer-canthus) segment of the image-left eyeliner.
    pub liner_left: i32,
    /// First (inner-canthus) segment of the image-right eyeliner.
    pub liner_right: i32,
    /// Thickness change per liner segment.
    pub liner_step: i32,
    /// Liner strokes are lifted by `image height / liner_lift_divisor`.
    pub liner_lift_divisor: u32,
    /// Outermost eye-shadow stroke.
    pub shadow: i32,
    /// Thickness lost per eye-shadow stroke.
    pub shadow_step: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Morphology {
    /// Side of the square element used to sharpen the eyeliner mask.
    pub liner_erode: u32,
    /// Arm length of the cross element used to round the blush patch.
    pub blush_dilate_radius: u32,
}

/// Weights of the unnormalized overlay `dst * image + layer * layer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub image: f64,
    pub layer: f64,
}

impl Default for MakeupConfig {
    fn default() -> Self {
        Self {
            lip_color: Bgr::new(32, 0, 128),
            liner_color: Bgr::new(1, 1, 1),
            shadow_color: Bgr::new(255, 0, 0),
            blush_color: Bgr::new(128, 0, 128),
            blur: BlurKernels::default(),
            strokes: StrokeThicknesses::default(),
            morphology: Morphology::default(),
            blend: BlendWeights::default(),
        }
    }
}

impl Default for BlurKernels {
    fn default() -> Self {
        Self {
            lips: GaussianKernel::new(11, 10.0),
            eye_shadow: GaussianKernel::new(11, 3.0),
            blush: GaussianKernel::new(11, 5.0),
            blush_box: 81,
        }
    }
}

impl Default for StrokeThicknesses {
    fn default() -> Self {
        Self {
            liner_left: 10,
            liner_right: 8,
            liner_step: 1,
            liner_lift_divisor: 100,
            shadow: 15,
            shadow_step: 2,
        }
    }
}

impl Default for Morphology {
    fn default() -> Self {
        Self {
            liner_erode: 5,
            blush_dilate_radius: 15,
        }
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            image: 1.0,
            layer: 0.6,
        }
    }
}

/// Segments stroked per eye for the liner.
pub(crate) const LINER_SEGMENTS: usize = 3;
/// Strokes per eye for the shadow: three lid intervals plus the closing stroke.
pub(crate) const SHADOW_STROKES: usize = 4;

impl MakeupConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every parameter can be used by the stage that consumes it.
    pub fn validate(&self) -> Result<()> {
        let kernels = [
            ("blur.lips", self.blur.lips),
            ("blur.eye_shadow", self.blur.eye_shadow),
            ("blur.blush", self.blur.blush),
        ];
        for (name, kernel) in kernels {
            check_odd(name, kernel.size)?;
            if !kernel.sigma.is_finite() || kernel.sigma < 0.0 {
                return Err(invalid(format!("{name}.sigma must be a non-negative number, got {}", kernel.sigma)));
            }
        }
        check_odd("blur.blush_box", self.blur.blush_box)?;
        check_odd("morphology.liner_erode", self.morphology.liner_erode)?;
        if self.morphology.liner_erode > 511 {
            return Err(invalid(format!(
                "morphology.liner_erode must be at most 511, got {}",
                self.morphology.liner_erode
            )));
        }

        if self.morphology.blush_dilate_radius > 255 {
            return Err(invalid(format!(
                "morphology.blush_dilate_radius must be at most 255, got {}",
                self.morphology.blush_dilate_radius
            )));
        }

        let s = &self.strokes;
        if s.liner_lift_divisor == 0 {
            return Err(invalid("strokes.liner_lift_divisor must be positive".into()));
        }
        let last = (LINER_SEGMENTS - 1) as i32;
        for (name, start, step) in [
            ("strokes.liner_left", s.liner_left, -s.liner_step),
            ("strokes.liner_right", s.liner_right, s.liner_step),
        ] {
            check_taper(name, start, step, last)?;
        }
        check_taper("strokes.shadow", s.shadow, -s.shadow_step, (SHADOW_STROKES - 1) as i32)?;

        let b = &self.blend;
        if !b.image.is_finite() || !b.layer.is_finite() {
            return Err(invalid("blend weights must be finite".into()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidConfig(msg)
}

fn check_odd(name: &str, size: u32) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(invalid(format!("{name} must be a positive odd size, got {size}")));
    }
    Ok(())
}

fn check_taper(name: &str, start: i32, step: i32, last: i32) -> Result<()> {
    let end = start + step * last;
    if start < 1 || end < 1 {
        return Err(invalid(format!(
            "{name} taper runs from {start} to {end}; every stroke needs a thickness of at least 1"
        )));
    }
    Ok(())
}
