//! Global rotation estimate and correction.
//!
//! Without an explicit angle the deskewer runs Canny + Hough on the input,
//! keeps the lines whose normal lies within `tolerance_deg` of a multiple of
//! 90°, and averages their folded deviations. The image is then rotated by
//! the negated estimate and the black wedges introduced by the rotation are
//! cropped away.
use crate::angle::axis_deviation;
use crate::edges::{canny, CannyParams};
use crate::error::GeometryError;
use crate::image::{rotate_bicubic, ImageRgb8};
use crate::lines::{hough_lines, HoughParams};
use crate::types::Rect;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeskewParams {
    /// Maximum deviation from the axes for a line to count, in degrees.
    pub tolerance_deg: f32,
    pub canny: CannyParams,
    pub hough: HoughParams,
}

impl Default for DeskewParams {
    fn default() -> Self {
        Self {
            tolerance_deg: 3.0,
            canny: CannyParams::default(),
            hough: HoughParams::default(),
        }
    }
}

/// Where the applied angle came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AngleSource {
    Detected,
    Override,
    Disabled,
}

/// Deskewed image plus what was done to it.
#[derive(Clone, Debug)]
pub struct Deskewed {
    pub image: ImageRgb8,
    /// Estimated skew in degrees; the image was rotated by its negation.
    pub angle_deg: f32,
    pub source: AngleSource,
    /// Region of the rotated image that was kept.
    pub crop: Rect,
    /// Lines detected / lines within tolerance (0 when not detected).
    pub lines_total: usize,
    pub lines_used: usize,
}

pub struct Deskewer {
    params: DeskewParams,
}

impl Deskewer {
    pub fn new(params: DeskewParams) -> Self {
        Self { params }
    }

    /// Estimate the skew angle of `img` in degrees.
    ///
    /// Returns `(angle_deg, lines_total, lines_used)`.
    pub fn estimate_angle(&self, img: &ImageRgb8) -> Result<(f32, usize, usize), GeometryError> {
        let edges = canny(&img.to_gray(), &self.params.canny);
        let lines = hough_lines(&edges, &self.params.hough);
        let tolerance = self.params.tolerance_deg.to_radians();

        let deviations: Vec<f32> = lines
            .iter()
            .map(|l| axis_deviation(l.theta))
            .filter(|d| d.abs() < tolerance)
            .collect();
        log::debug!(
            "deskew: {} lines, {} within {:.1}°",
            lines.len(),
            deviations.len(),
            self.params.tolerance_deg
        );
        if deviations.is_empty() {
            return Err(GeometryError::NeedsManualAngle {
                candidates: lines.len(),
                tolerance_deg: self.params.tolerance_deg,
            });
        }
        let mean = deviations.iter().map(|&d| d as f64).sum::<f64>() / deviations.len() as f64;
        Ok((mean.to_degrees() as f32, lines.len(), deviations.len()))
    }

    /// Deskew `img`. `explicit_angle_deg` bypasses detection.
    pub fn run(
        &self,
        img: &ImageRgb8,
        explicit_angle_deg: Option<f32>,
    ) -> Result<Deskewed, GeometryError> {
        let (angle_deg, source, lines_total, lines_used) = match explicit_angle_deg {
            Some(a) => (a, AngleSource::Override, 0, 0),
            None => {
                let (a, total, used) = self.estimate_angle(img)?;
                (a, AngleSource::Detected, total, used)
            }
        };
        let (image, crop) = rotate_and_crop(img, angle_deg)?;
        log::info!(
            "deskew: angle {:.3}° ({:?}), kept {}x{} of {}x{}",
            angle_deg,
            source,
            crop.width(),
            crop.height(),
            img.w,
            img.h
        );
        Ok(Deskewed {
            image,
            angle_deg,
            source,
            crop,
            lines_total,
            lines_used,
        })
    }

    /// Pass-through used when deskewing is disabled.
    pub fn passthrough(img: &ImageRgb8) -> Deskewed {
        Deskewed {
            image: img.clone(),
            angle_deg: 0.0,
            source: AngleSource::Disabled,
            crop: img.bounds(),
            lines_total: 0,
            lines_used: 0,
        }
    }
}

/// Rectangle surviving a rotation by `angle_deg`: `⌊h·|sin α|⌋` columns and
/// `⌊w·|sin α|⌋` rows are dropped on each side.
pub fn crop_after_rotation(w: usize, h: usize, angle_deg: f32) -> Rect {
    let s = (angle_deg as f64).to_radians().sin().abs();
    let crop_x = (h as f64 * s).floor() as usize;
    let crop_y = (w as f64 * s).floor() as usize;
    Rect::new(
        crop_x,
        crop_y,
        w.saturating_sub(crop_x),
        h.saturating_sub(crop_y),
    )
}

fn rotate_and_crop(img: &ImageRgb8, angle_deg: f32) -> Result<(ImageRgb8, Rect), GeometryError> {
    if angle_deg == 0.0 {
        return Ok((img.clone(), img.bounds()));
    }
    let crop = crop_after_rotation(img.w, img.h, angle_deg);
    if crop.area() == 0 {
        return Err(GeometryError::DegenerateCrop {
            angle_deg,
            width: img.w,
            height: img.h,
        });
    }
    let rotated = rotate_bicubic(img, -angle_deg.to_radians());
    Ok((rotated.crop(crop), crop))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_grows_with_angle() {
        assert_eq!(crop_after_rotation(400, 300, 0.0), Rect::new(0, 0, 400, 300));
        let r = crop_after_rotation(400, 300, 2.0);
        // 300·sin 2° = 10.47, 400·sin 2° = 13.96
        assert_eq!(r, Rect::new(10, 13, 390, 287));
        assert_eq!(crop_after_rotation(400, 300, -2.0), r);
    }

    #[test]
    fn huge_angle_is_a_degenerate_crop() {
        let img = ImageRgb8::new(40, 40);
        let err = Deskewer::new(DeskewParams::default())
            .run(&img, Some(60.0))
            .unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateCrop { .. }));
    }

    #[test]
    fn blank_image_needs_manual_angle() {
        let img = ImageRgb8::filled(64, 64, [90, 90, 90]);
        let err = Deskewer::new(DeskewParams::default())
            .run(&img, None)
            .unwrap_err();
        assert!(matches!(err, GeometryError::NeedsManualAngle { candidates: 0, .. }));
    }

    #[test]
    fn override_skips_detection() {
        let img = ImageRgb8::filled(64, 64, [90, 90, 90]);
        let out = Deskewer::new(DeskewParams::default())
            .run(&img, Some(0.0))
            .unwrap();
        assert_eq!(out.source, AngleSource::Override);
        assert_eq!(out.image, img);
        assert_eq!(out.lines_used, 0);
    }
}
