//! CLI application for applying makeup to a face photograph.
//!
//! Usage:
//!   face-makeup <image> --landmarks face.json          # writes <image>_makeup.png
//!   face-makeup <image> --mean-face -o out.png         # no detector output at hand
//!   face-makeup <image> --landmarks face.json --config makeup.json --dump-masks masks/
//!   face-makeup --print-config > makeup.json

use clap::Parser;
use face_makeup::{BoundingBox, LandmarkSet, Makeup, MakeupConfig, Stage};
use log::{debug, info};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "face-makeup")]
#[command(author, version, about = "Apply lipstick, eye shadow, eyeliner and blush from facial landmarks", long_about = None)]
struct Args {
    /// Input image file
    #[arg(required_unless_present = "print_config")]
    image: Option<PathBuf>,

    /// JSON file with the 68 facial landmarks ([{"x": .., "y": ..}, ...])
    #[arg(short, long, required_unless_present_any = ["mean_face", "print_config"])]
    landmarks: Option<PathBuf>,

    /// Place the mean face shape over the whole image instead of loading landmarks
    #[arg(long, conflicts_with = "landmarks")]
    mean_face: bool,

    /// JSON configuration overriding colors, kernels and stroke widths
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (default: <image>_makeup.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory to write each stage's region mask into
    #[arg(long)]
    dump_masks: Option<PathBuf>,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.print_config {
        println!("{}", MakeupConfig::default().to_json()?);
        return Ok(());
    }

    let image_path = args.image.as_ref().ok_or("No input image given")?;

    let config = match &args.config {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            MakeupConfig::load(path)?
        }
        None => MakeupConfig::default(),
    };
    let makeup = Makeup::new(config)?;

    debug!("Loading image {:?}", image_path);
    let image = image::open(image_path)?.to_rgb8();
    let (width, height) = image.dimensions();

    let landmarks = if args.mean_face {
        LandmarkSet::mean_face(&BoundingBox::new(
            0.0,
            0.0,
            width.saturating_sub(1) as f32,
            height.saturating_sub(1) as f32,
        ))
    } else {
        let path = args.landmarks.as_ref().ok_or("No landmarks given")?;
        debug!("Loading landmarks from {:?}", path);
        LandmarkSet::load(path)?
    };
    if !landmarks.is_complete() {
        log::warn!(
            "Expected {} landmarks, got {}",
            face_makeup::NUM_LANDMARKS,
            landmarks.len()
        );
    }

    if let Some(dir) = &args.dump_masks {
        std::fs::create_dir_all(dir)?;
        for stage in Stage::ALL {
            let mask = makeup.region_mask(stage, width, height, &landmarks)?;
            let path = dir.join(format!("{}.png", stage));
            mask.save(&path)?;
            debug!("Mask for {} written to {:?}", stage, path);
        }
    }

    let result = makeup.apply(&image, &landmarks)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(image_path));
    result.save(&output)?;
    info!("Output written to {:?}", output);

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_makeup.png", stem))
}
