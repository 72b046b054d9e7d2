mod common;

use common::init_logging;
use common::synthetic_image::checkerboard;
use grid_capture::deskew::{crop_after_rotation, AngleSource};
use grid_capture::image::{rotate_bicubic, ImageRgb8};
use grid_capture::stages::{DeskewParams, Deskewer};
use grid_capture::GeometryError;

fn params() -> DeskewParams {
    let mut p = DeskewParams::default();
    p.hough.threshold = 100;
    p
}

#[test]
fn rotated_checkerboard_angle_is_recovered() {
    init_logging();
    let skew_deg = 1.5f32;
    let img = rotate_bicubic(&checkerboard(240, 240, 40), skew_deg.to_radians());

    let deskewer = Deskewer::new(params());
    let (angle, total, used) = deskewer.estimate_angle(&img).expect("lines near the axes");
    assert!(used > 0 && used <= total);
    assert!(
        (angle - skew_deg).abs() < 0.25,
        "estimated {angle:.3}° for a {skew_deg}° skew"
    );

    let out = deskewer.run(&img, None).expect("deskew succeeds");
    assert_eq!(out.source, AngleSource::Detected);
    assert_eq!(out.crop, crop_after_rotation(240, 240, out.angle_deg));
    assert_eq!((out.image.w, out.image.h), (out.crop.width(), out.crop.height()));
}

#[test]
fn negative_skew_has_negative_estimate() {
    let img = rotate_bicubic(&checkerboard(240, 240, 40), (-1.0f32).to_radians());
    let (angle, _, _) = Deskewer::new(params()).estimate_angle(&img).unwrap();
    assert!((angle + 1.0).abs() < 0.25, "estimated {angle:.3}°");
}

#[test]
fn explicit_angle_skips_detection() {
    // Nothing to detect, but the override never looks.
    let img = ImageRgb8::filled(100, 80, [128, 128, 128]);
    let deskewer = Deskewer::new(params());
    assert!(matches!(
        deskewer.run(&img, None),
        Err(GeometryError::NeedsManualAngle { .. })
    ));

    let out = deskewer.run(&img, Some(0.0)).expect("override applies");
    assert_eq!(out.source, AngleSource::Override);
    assert_eq!(out.lines_total, 0);
    assert_eq!(out.image, img);

    let out = deskewer.run(&img, Some(2.0)).expect("override applies");
    assert_eq!(out.angle_deg, 2.0);
    assert_eq!(out.crop, crop_after_rotation(100, 80, 2.0));
}
