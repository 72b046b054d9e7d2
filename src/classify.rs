//! Three-state cell classification with spatial refinement.
//!
//! Four whole-grid passes run in a fixed order:
//!
//! 1. initial assignment against `(low, high)`;
//! 2. an Unknown cell whose 4-neighbours are all Void becomes Void (off-grid
//!    counts as Void);
//! 3. an Unknown cell with no Unknown neighbour and at least one Metal
//!    neighbour becomes Metal;
//! 4. a cell that is non-Void under `low − margin`, not Metal, and touches a
//!    Metal cell becomes Metal.
//!
//! Passes 2 and 3 decide every cell from the map as it stood when the pass
//! started. Pass 4 walks the grid column by column, top to bottom, and
//! updates the map in place, so a promoted cell can carry Metal on to the
//! next cell of the walk.
use crate::cells::CellGrid;
use crate::types::{CellLabel, ThresholdPair};
use serde::Serialize;

/// Dense label map indexed by `(col, row)`.
pub type LabelMap = CellGrid<CellLabel>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassifierPass {
    Initial,
    LoneUnknown,
    ViaMerge,
    AggressiveBridge,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub metal: usize,
    pub void: usize,
    pub unknown: usize,
}

impl LabelCounts {
    pub fn of(labels: &LabelMap) -> Self {
        let mut counts = LabelCounts::default();
        for label in labels.values() {
            match label {
                CellLabel::Metal => counts.metal += 1,
                CellLabel::Void => counts.void += 1,
                CellLabel::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub pass: ClassifierPass,
    /// Cells whose label this pass changed.
    pub changed: usize,
    pub counts: LabelCounts,
}

#[derive(Clone, Debug)]
pub struct Classification {
    pub labels: LabelMap,
    pub passes: Vec<PassSummary>,
    /// Label map after each pass, in pass order.
    pub history: Vec<LabelMap>,
}

impl Classification {
    /// Cells left for manual review.
    pub fn unknown_cells(&self) -> Vec<(usize, usize)> {
        self.labels
            .iter()
            .filter(|(_, l)| **l == CellLabel::Unknown)
            .map(|(cell, _)| cell)
            .collect()
    }
}

pub fn initial_labels(brightness: &CellGrid<f32>, thresholds: &ThresholdPair) -> LabelMap {
    brightness.map(|&b| thresholds.label(b))
}

fn neighbours_or_void(labels: &LabelMap, col: usize, row: usize) -> [CellLabel; 4] {
    labels
        .neighbours4(col, row)
        .map(|n| n.copied().unwrap_or(CellLabel::Void))
}

/// Rewrite every cell for which `rule` returns a new label, reading the
/// pre-pass state. Returns the number of changed cells.
fn apply_pass(
    labels: &mut LabelMap,
    mut rule: impl FnMut(&LabelMap, usize, usize) -> Option<CellLabel>,
) -> usize {
    let snapshot = labels.clone();
    let (cols, rows) = snapshot.dims();
    let mut changed = 0;
    for c in 0..cols {
        for r in 0..rows {
            if let Some(next) = rule(&snapshot, c, r) {
                if next != *snapshot.get(c, r) {
                    labels.set(c, r, next);
                    changed += 1;
                }
            }
        }
    }
    changed
}

pub fn eliminate_lone_unknowns(labels: &mut LabelMap) -> usize {
    apply_pass(labels, |snap, c, r| {
        (*snap.get(c, r) == CellLabel::Unknown
            && neighbours_or_void(snap, c, r)
                .iter()
                .all(|&n| n == CellLabel::Void))
        .then_some(CellLabel::Void)
    })
}

pub fn merge_via_noise(labels: &mut LabelMap) -> usize {
    apply_pass(labels, |snap, c, r| {
        if *snap.get(c, r) != CellLabel::Unknown {
            return None;
        }
        let n = neighbours_or_void(snap, c, r);
        (!n.contains(&CellLabel::Unknown) && n.contains(&CellLabel::Metal))
            .then_some(CellLabel::Metal)
    })
}

/// Promote cells that only miss Metal by the aggressive margin.
///
/// Runs in column-major order against the live map.
pub fn bridge_aggressive(
    labels: &mut LabelMap,
    brightness: &CellGrid<f32>,
    thresholds: &ThresholdPair,
    margin: f32,
) -> usize {
    let aggressive = initial_labels(brightness, &thresholds.lowered(margin));
    let (cols, rows) = labels.dims();
    let mut changed = 0;
    for c in 0..cols {
        for r in 0..rows {
            if *aggressive.get(c, r) == CellLabel::Void
                || *labels.get(c, r) == CellLabel::Metal
            {
                continue;
            }
            if neighbours_or_void(labels, c, r).contains(&CellLabel::Metal) {
                labels.set(c, r, CellLabel::Metal);
                changed += 1;
            }
        }
    }
    changed
}

#[derive(Clone, Copy, Debug)]
pub struct CellClassifier {
    aggressive_margin: f32,
}

impl CellClassifier {
    pub fn new(aggressive_margin: f32) -> Self {
        Self { aggressive_margin }
    }

    pub fn classify(
        &self,
        brightness: &CellGrid<f32>,
        thresholds: &ThresholdPair,
    ) -> Classification {
        let mut labels = initial_labels(brightness, thresholds);
        let mut passes = Vec::with_capacity(4);
        let mut history = Vec::with_capacity(4);
        let mut record = |pass, changed, labels: &LabelMap| {
            let summary = PassSummary {
                pass,
                changed,
                counts: LabelCounts::of(labels),
            };
            log::debug!("classify: {summary:?}");
            passes.push(summary);
            history.push(labels.clone());
        };

        record(ClassifierPass::Initial, labels.len(), &labels);
        let changed = eliminate_lone_unknowns(&mut labels);
        record(ClassifierPass::LoneUnknown, changed, &labels);
        let changed = merge_via_noise(&mut labels);
        record(ClassifierPass::ViaMerge, changed, &labels);
        let changed =
            bridge_aggressive(&mut labels, brightness, thresholds, self.aggressive_margin);
        record(ClassifierPass::AggressiveBridge, changed, &labels);

        let counts = LabelCounts::of(&labels);
        log::info!(
            "classify: metal={} void={} unknown={}",
            counts.metal,
            counts.void,
            counts.unknown
        );
        Classification {
            labels,
            passes,
            history,
        }
    }
}
