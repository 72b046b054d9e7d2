//! Standard (rho, theta) Hough transform over a binary edge map.
//!
//! Lines are parameterized as `x·cosθ + y·sinθ = ρ` with `θ ∈ [0, π)`. The
//! accumulator is periodic in θ: bin `θ + π` is bin `θ` with `ρ` negated, and
//! peak detection honours that wrap.
//!
//! A bin is a peak when it beats the vote threshold, is strictly greater than
//! its lower neighbours and not smaller than its upper ones. When a peak sits
//! on a flat ridge along θ (common for perfectly axis-aligned edges) the
//! reported angle is the ridge centre.
use crate::edges::EdgeMap;
use serde::{Deserialize, Serialize};

/// Accumulator resolution and vote threshold.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Distance resolution in pixels.
    pub rho_res: f32,
    /// Angle resolution in degrees.
    pub theta_res_deg: f32,
    /// Minimum number of votes (exclusive) for a line.
    pub threshold: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho_res: 1.0,
            theta_res_deg: 0.1,
            threshold: 400,
        }
    }
}

/// One detected line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HoughLine {
    pub rho: f32,
    /// Normal angle in radians, `[0, π)`.
    pub theta: f32,
    pub votes: u32,
}

struct HoughAccumulator {
    data: Vec<u32>,
    rho_bins: usize,
    theta_bins: usize,
    /// Index of `ρ = 0`.
    rho_offset: usize,
    rho_res: f32,
    theta_step: f64,
    sin_table: Vec<f32>,
    cos_table: Vec<f32>,
}

impl HoughAccumulator {
    fn new(width: usize, height: usize, params: &HoughParams) -> Option<Self> {
        let rho_res = params.rho_res;
        let theta_step = (params.theta_res_deg as f64).to_radians();
        if !(rho_res > 0.0) || !(theta_step > 0.0) {
            return None;
        }
        let theta_bins = (std::f64::consts::PI / theta_step).round() as usize;
        if theta_bins == 0 {
            return None;
        }
        let diag = ((width * width + height * height) as f32).sqrt();
        let rho_offset = (diag / rho_res).ceil() as usize;
        let rho_bins = 2 * rho_offset + 1;

        let (sin_table, cos_table) = (0..theta_bins)
            .map(|t| {
                let (s, c) = (t as f64 * theta_step).sin_cos();
                (s as f32, c as f32)
            })
            .unzip();

        Some(Self {
            data: vec![0u32; rho_bins * theta_bins],
            rho_bins,
            theta_bins,
            rho_offset,
            rho_res,
            theta_step,
            sin_table,
            cos_table,
        })
    }

    #[inline]
    fn vote_point(&mut self, x: f32, y: f32) {
        for t in 0..self.theta_bins {
            let rho = x * self.cos_table[t] + y * self.sin_table[t];
            let r = (rho / self.rho_res).round() as isize + self.rho_offset as isize;
            if r >= 0 && (r as usize) < self.rho_bins {
                let idx = t * self.rho_bins + r as usize;
                self.data[idx] = self.data[idx].saturating_add(1);
            }
        }
    }

    /// Votes at `(t, r)` with `t` allowed one step outside `[0, theta_bins)`;
    /// wrapped angles mirror the rho index.
    #[inline]
    fn votes_wrapped(&self, t: isize, r: isize) -> u32 {
        let n = self.theta_bins as isize;
        let (t, r) = if t < 0 {
            (t + n, self.mirror(r))
        } else if t >= n {
            (t - n, self.mirror(r))
        } else {
            (t, r)
        };
        if r < 0 || r >= self.rho_bins as isize {
            return 0;
        }
        self.data[t as usize * self.rho_bins + r as usize]
    }

    #[inline]
    fn mirror(&self, r: isize) -> isize {
        self.rho_bins as isize - 1 - r
    }

    fn is_peak(&self, t: usize, r: usize, votes: u32) -> bool {
        let (t, r) = (t as isize, r as isize);
        votes > self.votes_wrapped(t, r - 1)
            && votes >= self.votes_wrapped(t, r + 1)
            && votes > self.votes_wrapped(t - 1, r)
            && votes >= self.votes_wrapped(t + 1, r)
    }

    /// Ridge centre along θ in half-step units, starting at peak `(t, r)`.
    fn ridge_centre(&self, t: usize, r: usize, votes: u32) -> usize {
        let mut len = 1usize;
        while len < self.theta_bins
            && self.votes_wrapped(t as isize + len as isize, r as isize) == votes
        {
            len += 1;
        }
        2 * t + (len - 1)
    }

    fn line_at(&self, t: usize, r: usize, votes: u32) -> HoughLine {
        let mut half = self.ridge_centre(t, r, votes);
        let mut rho = (r as f32 - self.rho_offset as f32) * self.rho_res;
        if half >= 2 * self.theta_bins {
            half -= 2 * self.theta_bins;
            rho = -rho;
        }
        HoughLine {
            rho,
            theta: (half as f64 * self.theta_step * 0.5) as f32,
            votes,
        }
    }
}

/// Detect lines in `edges`, sorted by votes (descending), then by θ and ρ.
pub fn hough_lines(edges: &EdgeMap, params: &HoughParams) -> Vec<HoughLine> {
    let Some(mut acc) = HoughAccumulator::new(edges.w, edges.h, params) else {
        log::warn!("hough: invalid resolution {params:?}");
        return Vec::new();
    };

    for y in 0..edges.h {
        for x in 0..edges.w {
            if edges.is_edge(x, y) {
                acc.vote_point(x as f32, y as f32);
            }
        }
    }

    let mut lines = Vec::new();
    for t in 0..acc.theta_bins {
        for r in 0..acc.rho_bins {
            let votes = acc.data[t * acc.rho_bins + r];
            if votes <= params.threshold {
                continue;
            }
            if acc.is_peak(t, r, votes) {
                lines.push(acc.line_at(t, r, votes));
            }
        }
    }

    lines.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then(a.theta.total_cmp(&b.theta))
            .then(a.rho.total_cmp(&b.rho))
    });
    log::debug!(
        "hough: {} edge px -> {} lines (threshold {})",
        edges.count(),
        lines.len(),
        params.threshold
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_map(w: usize, h: usize, on: impl Fn(usize, usize) -> bool) -> EdgeMap {
        let mut data = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                if on(x, y) {
                    data[y * w + x] = 255;
                }
            }
        }
        EdgeMap { w, h, data }
    }

    #[test]
    fn vertical_edge_is_found_at_its_column() {
        let edges = edge_map(120, 150, |x, _| x == 37);
        let params = HoughParams {
            threshold: 100,
            ..HoughParams::default()
        };
        let lines = hough_lines(&edges, &params);
        assert_eq!(lines.len(), 1, "{lines:?}");
        let l = lines[0];
        assert!((l.rho.abs() - 37.0).abs() < 0.5);
        assert!(l.theta.abs() < 1e-6, "theta {}", l.theta);
        assert_eq!(l.votes, 150);
    }

    #[test]
    fn horizontal_edge_has_normal_at_right_angle() {
        let edges = edge_map(200, 80, |_, y| y == 50);
        let params = HoughParams {
            threshold: 150,
            ..HoughParams::default()
        };
        let lines = hough_lines(&edges, &params);
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!((lines[0].rho - 50.0).abs() < 0.5);
        assert!((lines[0].theta - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn sparse_edges_stay_below_threshold() {
        let edges = edge_map(100, 100, |x, y| x == 10 && y % 10 == 0);
        assert!(hough_lines(&edges, &HoughParams::default()).is_empty());
    }
}
