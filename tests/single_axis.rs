mod common;

use common::init_logging;
use common::synthetic_image::{die_image, transpose};
use grid_capture::stages::AxisFit;
use grid_capture::{CaptureParams, CellLabel, GridCapture};

#[test]
fn column_lines_recover_rows_from_contrast() {
    init_logging();
    let img = transpose(&die_image());
    let mut params = CaptureParams {
        enable_deskew: false,
        ..CaptureParams::default()
    };
    params.grid.lines.hough.threshold = 140;
    params.calibration.bins = 10;

    let out = GridCapture::new(params)
        .process(&img)
        .expect("capture should succeed");
    let det = &out.detection;
    assert!(det.candidates.horizontal.is_empty());
    assert_eq!(det.candidates.vertical.len(), 3);
    match &det.cols_fit {
        AxisFit::Lines { lines, .. } => assert_eq!(*lines, 3),
        other => panic!("columns should come from lines, got {other:?}"),
    }
    assert!(matches!(det.rows_fit, AxisFit::Contrast { .. }));

    let grid = out.grid();
    assert!((grid.cols.b - 19.0).abs() < 1e-3, "col offset {}", grid.cols.b);
    assert!((grid.rows.b - 20.0).abs() <= 2.0, "row offset {}", grid.rows.b);
    assert_eq!(out.labels().dims(), (5, 5));

    // Same die with the axes swapped.
    let labels = out.labels();
    assert!((0..5).all(|r| *labels.get(0, r) == CellLabel::Metal));
    assert!((0..5).all(|r| *labels.get(1, r) == CellLabel::Metal));
    assert_eq!(*labels.get(4, 0), CellLabel::Unknown);
    assert_eq!(*labels.get(4, 1), CellLabel::Unknown);
    assert_eq!(*labels.get(4, 2), CellLabel::Void);
    assert_eq!(*labels.get(4, 3), CellLabel::Void);
    assert_eq!(*labels.get(2, 0), CellLabel::Metal);
    assert_eq!(*labels.get(2, 1), CellLabel::Void);
    assert_eq!(*labels.get(2, 2), CellLabel::Metal);
    assert_eq!(*labels.get(1, 3), CellLabel::Metal);
    assert_eq!(out.classification.unknown_cells(), vec![(4, 0), (4, 1)]);
}
