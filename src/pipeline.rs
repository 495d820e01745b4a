//! The makeup orchestrator: runs each feature stage over one image in a
//! fixed order, threading the composited buffer from stage to stage.

use std::fmt;

use image::{GrayImage, Pixel, RgbImage};
use imageproc::definitions::Image;
use imageproc::map::{ChannelMap, WithChannel};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::blend::{add_weighted, box_blur, colorize, gated_xor, gaussian_blur};
use crate::config::{GaussianKernel, MakeupConfig};
use crate::error::{check_dimensions, Result};
use crate::landmarks::LandmarkSet;
use crate::raster::{count_inside, invert};
use crate::regions::{blush_mask, eye_shadow_mask, eyeliner_mask, lip_mask, Side};
use crate::types::Bgr;

/// One feature effect of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Lips,
    EyeShadow,
    EyeLiner,
    LeftBlush,
    RightBlush,
}

impl Stage {
    /// Stages in compositing order. Later stages paint over earlier ones.
    pub const ALL: [Stage; 5] = [
        Stage::Lips,
        Stage::EyeShadow,
        Stage::EyeLiner,
        Stage::LeftBlush,
        Stage::RightBlush,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Lips => "lips",
            Stage::EyeShadow => "eye_shadow",
            Stage::EyeLiner => "eye_liner",
            Stage::LeftBlush => "left_blush",
            Stage::RightBlush => "right_blush",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated makeup pipeline.
///
/// # Usage
///
/// ```ignore
/// let makeup = Makeup::new(MakeupConfig::default())?;
/// let result = makeup.apply(&image, &landmarks)?;
/// ```
#[derive(Debug, Clone)]
pub struct Makeup {
    config: MakeupConfig,
}

impl Makeup {
    pub fn new(config: MakeupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MakeupConfig {
        &self.config
    }

    /// Run every stage in order and return the composited image.
    ///
    /// The input is left untouched; the first failing stage aborts the run.
    pub fn apply(&self, image: &RgbImage, landmarks: &LandmarkSet) -> Result<RgbImage> {
        let mut out = image.clone();
        for stage in Stage::ALL {
            self.apply_stage(stage, &mut out, landmarks)?;
        }
        Ok(out)
    }

    /// The binary region mask a stage composites through, before softening.
    pub fn region_mask(&self, stage: Stage, width: u32, height: u32, landmarks: &LandmarkSet) -> Result<GrayImage> {
        let c = &self.config;
        match stage {
            Stage::Lips => lip_mask(width, height, landmarks),
            Stage::EyeShadow => eye_shadow_mask(width, height, landmarks, &c.strokes),
            Stage::EyeLiner => eyeliner_mask(width, height, landmarks, &c.strokes, c.morphology.liner_erode),
            Stage::LeftBlush => blush_mask(width, height, landmarks, Side::Left, c.morphology.blush_dilate_radius),
            Stage::RightBlush => blush_mask(width, height, landmarks, Side::Right, c.morphology.blush_dilate_radius),
        }
    }

    /// Composite a single stage onto `image` in place.
    pub fn apply_stage(&self, stage: Stage, image: &mut RgbImage, landmarks: &LandmarkSet) -> Result<()> {
        let (width, height) = image.dimensions();
        let mask = self.region_mask(stage, width, height, landmarks)?;
        check_dimensions((width, height), mask.dimensions())?;
        debug!("{}: {} region pixels", stage, count_inside(&mask));

        let c = &self.config;
        match stage {
            Stage::Lips => {
                let layer = blur(&colorize(&mask, c.lip_color), c.blur.lips);
                self.overlay(image, &layer)
            }
            Stage::EyeShadow => {
                let soft = blur(&mask, c.blur.eye_shadow);
                self.overlay(image, &colorize(&soft, c.shadow_color))
            }
            Stage::EyeLiner => {
                // Pixels under the liner fall outside the gate and take the liner color.
                let gate = invert(&mask);
                gated_xor(image, &gate, Bgr::BLACK, c.liner_color)
            }
            Stage::LeftBlush | Stage::RightBlush => {
                let soft = blur(&mask, c.blur.blush);
                let layer = box_blur(&colorize(&soft, c.blush_color), c.blur.blush_box);
                self.overlay(image, &layer)
            }
        }
    }

    fn overlay(&self, image: &mut RgbImage, layer: &RgbImage) -> Result<()> {
        add_weighted(image, layer, self.config.blend.image, self.config.blend.layer)
    }
}

fn blur<P>(image: &Image<P>, kernel: GaussianKernel) -> Image<P>
where
    P: Pixel<Subpixel = u8> + WithChannel<f32>,
    ChannelMap<P, f32>: WithChannel<u8, Pixel = P>,
{
    gaussian_blur(image, kernel.size, kernel.sigma)
}

/// Apply the full makeup pipeline with the given configuration.
pub fn apply_makeup(image: &RgbImage, landmarks: &LandmarkSet, config: &MakeupConfig) -> Result<RgbImage> {
    Makeup::new(config.clone())?.apply(image, landmarks)
}
