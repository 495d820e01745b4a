//! End-to-end tests of the makeup pipeline on a synthetic face.

use face_makeup::{
    apply_makeup, BoundingBox, Error, GeometryError, LandmarkSet, Makeup, MakeupConfig, Point, Stage,
};
use image::imageops::flip_horizontal;
use image::{Rgb, RgbImage};

const SIZE: u32 = 500;

/// Mean face centred in a 500x500 frame.
fn synthetic_face() -> LandmarkSet {
    LandmarkSet::mean_face(&BoundingBox::new(50.0, 50.0, 399.0, 399.0))
}

fn gray_image() -> RgbImage {
    RgbImage::from_pixel(SIZE, SIZE, Rgb([128, 128, 128]))
}

/// Per-channel mean over the inclusive box spanned by `points`.
fn mean_in_bounds(image: &RgbImage, points: &[Point]) -> [f64; 3] {
    let x0 = points.iter().map(|p| p.x).min().unwrap() as u32;
    let x1 = points.iter().map(|p| p.x).max().unwrap() as u32;
    let y0 = points.iter().map(|p| p.y).min().unwrap() as u32;
    let y1 = points.iter().map(|p| p.y).max().unwrap() as u32;

    let mut sum = [0.0f64; 3];
    let mut n = 0.0;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = image.get_pixel(x, y);
            for c in 0..3 {
                sum[c] += p[c] as f64;
            }
            n += 1.0;
        }
    }
    sum.map(|s| s / n)
}

#[test]
fn full_pipeline_tints_the_lips() {
    let landmarks = synthetic_face();
    let source = gray_image();

    let result = apply_makeup(&source, &landmarks, &MakeupConfig::default()).unwrap();
    assert_eq!(result.dimensions(), source.dimensions());

    let outer_lip = &landmarks.points()[48..60];
    let before = mean_in_bounds(&source, outer_lip);
    let after = mean_in_bounds(&result, outer_lip);

    // Lipstick is BGR (32, 0, 128): red rises most, green does not move.
    let red_shift = after[0] - before[0];
    let green_shift = after[1] - before[1];
    let blue_shift = after[2] - before[2];
    println!("lip box shift: r={:.1} g={:.1} b={:.1}", red_shift, green_shift, blue_shift);

    assert!(red_shift > 10.0, "red shift {:.1}", red_shift);
    assert!(red_shift > blue_shift);
    assert!(green_shift.abs() < 1.0, "green shift {:.1}", green_shift);
}

#[test]
fn pixels_away_from_the_face_are_unchanged() {
    let landmarks = synthetic_face();
    let source = gray_image();
    let result = apply_makeup(&source, &landmarks, &MakeupConfig::default()).unwrap();

    let mut changed_inside = 0usize;
    for (x, y, p) in result.enumerate_pixels() {
        let far = y < 100 || y >= 420 || x < 40 || x >= 460;
        if far {
            assert_eq!(*p, *source.get_pixel(x, y), "pixel ({}, {}) changed", x, y);
        } else if p != source.get_pixel(x, y) {
            changed_inside += 1;
        }
    }
    assert!(changed_inside > 0);
}

#[test]
fn eyeliner_is_painted_over_the_lids() {
    let landmarks = synthetic_face();
    let result = apply_makeup(&gray_image(), &landmarks, &MakeupConfig::default()).unwrap();

    // Middle of the upper lid, lifted by height / 100
    let lift = (SIZE / 100) as i32;
    for (a, b) in [(37, 38), (43, 44)] {
        let x = (landmarks[a].x + landmarks[b].x) / 2;
        let y = landmarks[a].y - lift;
        let p = result.get_pixel(x as u32, y as u32);
        assert!(p.0.iter().all(|&v| v < 20), "liner pixel at ({}, {}) is {:?}", x, y, p);
    }
}

#[test]
fn overlay_saturates_on_white() {
    let landmarks = synthetic_face();
    let white = RgbImage::from_pixel(SIZE, SIZE, Rgb([255, 255, 255]));
    let result = apply_makeup(&white, &landmarks, &MakeupConfig::default()).unwrap();

    // Every additive stage is clipped at 255; only the liner darkens.
    assert_eq!(*result.get_pixel(250, 323), Rgb([255, 255, 255]));
    let darkened = result.pixels().filter(|p| p.0 != [255, 255, 255]).count();
    let liner = Makeup::new(MakeupConfig::default())
        .unwrap()
        .region_mask(Stage::EyeLiner, SIZE, SIZE, &landmarks)
        .unwrap();
    let liner_pixels = liner.pixels().filter(|p| p[0] != 0).count();
    assert_eq!(darkened, liner_pixels);
}

#[test]
fn blush_is_mirror_symmetric() {
    let landmarks = synthetic_face();
    // Horizontal ramp so that mirroring actually moves pixel values
    let source = RgbImage::from_fn(SIZE, SIZE, |x, y| Rgb([(x / 4) as u8, (y / 4) as u8, 90]));
    let makeup = Makeup::new(MakeupConfig::default()).unwrap();

    let blush = |image: &RgbImage, landmarks: &LandmarkSet| {
        let mut out = image.clone();
        makeup.apply_stage(Stage::LeftBlush, &mut out, landmarks).unwrap();
        makeup.apply_stage(Stage::RightBlush, &mut out, landmarks).unwrap();
        out
    };

    let direct = blush(&source, &landmarks);
    let mirrored = blush(&flip_horizontal(&source), &landmarks.mirrored(SIZE).unwrap());
    let back = flip_horizontal(&mirrored);

    let mut max_diff = 0i32;
    let mut total_diff = 0i64;
    for (a, b) in direct.iter().zip(back.iter()) {
        let d = (*a as i32 - *b as i32).abs();
        max_diff = max_diff.max(d);
        total_diff += d as i64;
    }
    let mean_diff = total_diff as f64 / direct.len() as f64;
    println!("mirror difference: max {} mean {:.4}", max_diff, mean_diff);

    assert!(max_diff <= 4, "max difference {}", max_diff);
    assert!(mean_diff < 0.5, "mean difference {:.4}", mean_diff);
    // And the blush did something
    assert_ne!(direct, source);
}

#[test]
fn coincident_intersection_points_abort_the_run() {
    let mut points = synthetic_face().points().to_vec();
    // Alar landmark on top of the inner eye corner: the nose boundary line vanishes
    points[31] = points[39];
    let landmarks = LandmarkSet::new(points);

    let err = apply_makeup(&gray_image(), &landmarks, &MakeupConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Geometry(GeometryError::ParallelLines)), "{}", err);
}

#[test]
fn cheek_point_on_the_nose_ridge_aborts_the_run() {
    let mut points = synthetic_face().points().to_vec();
    points[16] = points[28];
    let landmarks = LandmarkSet::new(points);

    let err = apply_makeup(&gray_image(), &landmarks, &MakeupConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Geometry(GeometryError::ParallelLines)), "{}", err);
}

#[test]
fn too_few_landmarks_fail_with_index_out_of_range() {
    let landmarks = LandmarkSet::new(synthetic_face().points()[..67].to_vec());
    let err = apply_makeup(&gray_image(), &landmarks, &MakeupConfig::default()).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 67, len: 67 }), "{}", err);
}

#[test]
fn every_mask_matches_the_image_size() {
    let makeup = Makeup::new(MakeupConfig::default()).unwrap();
    for (w, h) in [(200, 200), (320, 240), (500, 500)] {
        let landmarks = LandmarkSet::mean_face(&BoundingBox::new(
            w as f32 * 0.1,
            h as f32 * 0.1,
            w as f32 * 0.8,
            h as f32 * 0.8,
        ));
        for stage in Stage::ALL {
            let mask = makeup.region_mask(stage, w, h, &landmarks).unwrap();
            assert_eq!(mask.dimensions(), (w, h), "{} mask", stage);
        }
    }
}

#[test]
fn config_file_changes_the_result() {
    let path = std::env::temp_dir().join(format!("face_makeup_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "lip_color": [200, 0, 0] }"#).unwrap();
    let config = MakeupConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let landmarks = synthetic_face();
    let result = apply_makeup(&gray_image(), &landmarks, &config).unwrap();

    // Blue lipstick: the lip gets bluer, not redder
    let lip = result.get_pixel(250, 323);
    assert!(lip[2] > 200, "{:?}", lip);
    assert_eq!(lip[0], 128);
}

#[test]
fn invalid_config_file_is_rejected() {
    let path = std::env::temp_dir().join(format!("face_makeup_bad_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "blur": { "blush_box": 0 } }"#).unwrap();
    let result = MakeupConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
