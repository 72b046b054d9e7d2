use grid_capture::config::{load_config, RuntimeConfig};
use grid_capture::image::io::{load_rgb_image, save_grayscale, save_rgb_image, write_json_file};
use grid_capture::render::{render_grid_overlay, render_label_overlay};
use grid_capture::{CaptureOutput, GridCapture};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "grid_capture".to_string());
    let config_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = load_config(&config_path)?;

    let img = load_rgb_image(&config.input_path)?;
    let capture = GridCapture::new(config.params.clone());
    let out = capture.process(&img).map_err(|e| {
        if e.is_recoverable() {
            format!("{e}; set params.explicit_skew_angle_deg and re-run")
        } else {
            e.to_string()
        }
    })?;

    save_rgb_image(&out.raster, &config.output.raster_path)?;
    print_summary(&out, &config);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &out.report)?;
        println!("JSON report written to {}", path.display());
    }
    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &out)?;
        println!("Debug artifacts written to {}", dir.display());
    }
    Ok(())
}

fn print_summary(out: &CaptureOutput, config: &RuntimeConfig) {
    let report = &out.report;
    println!("Capture summary");
    println!(
        "  deskew: {:.3}° ({:?}, {}/{} lines)",
        report.deskew.angle_deg,
        report.deskew.source,
        report.deskew.lines_used,
        report.deskew.lines_total
    );
    let g = out.grid();
    println!(
        "  columns: m={:.3} b={:.3} count={}",
        g.cols.m, g.cols.b, g.cols.count
    );
    println!(
        "  rows:    m={:.3} b={:.3} count={}",
        g.rows.m, g.rows.b, g.rows.count
    );
    let t = out.thresholds();
    println!("  thresholds: low={:.2} high={:.2}", t.low(), t.high());
    let counts = &report.classification.counts;
    println!(
        "  cells: metal={} void={} unknown={}",
        counts.metal, counts.void, counts.unknown
    );
    for (col, row) in &report.classification.unknown_cells {
        println!("    review ({col}, {row})");
    }
    println!(
        "  raster {}x{} written to {}",
        out.raster.w,
        out.raster.h,
        config.output.raster_path.display()
    );
    let stages: Vec<String> = report
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "  timings (ms): {} total={:.3}",
        stages.join(" "),
        report.timings.total_ms
    );
}

fn save_debug_artifacts(dir: &Path, out: &CaptureOutput) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;

    let deskewed = &out.deskewed.image;
    save_rgb_image(deskewed, &dir.join("deskewed.png"))?;
    save_grayscale(&out.detection.edges, &dir.join("edges.png"))?;
    save_rgb_image(
        &render_grid_overlay(deskewed, out.grid()),
        &dir.join("grid_overlay.png"),
    )?;
    for (summary, labels) in out
        .classification
        .passes
        .iter()
        .zip(&out.classification.history)
    {
        let name = format!("labels_{:?}.png", summary.pass).to_lowercase();
        save_rgb_image(
            &render_label_overlay(deskewed, out.grid(), labels),
            &dir.join(name),
        )?;
    }

    write_json_file(&dir.join("grid.json"), &out.report.grid)?;
    write_json_file(&dir.join("calibration.json"), &out.report.calibration)?;
    write_json_file(&dir.join("cells.json"), &out.report.classification.cells)?;
    Ok(())
}
