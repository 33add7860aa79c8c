//! Sub-zone naming and uniform cell grids.
//!
//! Macro-zones are split into named sub-zones (`A.1`, `B.2`, `C.7`, …)
//! numbered row-major from the quay side (`min_z`) and the west side
//! (`min_x`). Sub-zones are further divided into row/column cell grids used
//! by the slot-based placers.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::plot::Zone;

/// Columns × rows used to split a macro-zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSplit {
    pub cols: usize,
    pub rows: usize,
}

impl ZoneSplit {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

/// Split `zone` into `cols × rows` equally sized sub-zones named
/// `{zone.id}.{n}` with `n` starting at 1.
pub fn subdivide(zone: &Zone, split: ZoneSplit) -> Vec<Zone> {
    let cols = split.cols.max(1);
    let rows = split.rows.max(1);
    let r = &zone.rect;
    let cw = r.width() / cols as f32;
    let ch = r.depth() / rows as f32;

    let mut out = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let min_x = r.min_x + col as f32 * cw;
            let min_z = r.min_z + row as f32 * ch;
            // Last row/column snap to the parent edge so float error never leaves a sliver.
            let max_x = if col + 1 == cols { r.max_x } else { min_x + cw };
            let max_z = if row + 1 == rows { r.max_z } else { min_z + ch };
            out.push(Zone::new(
                format!("{}.{}", zone.id, row * cols + col + 1),
                Rect::from_bounds(min_x, max_x, min_z, max_z),
            ));
        }
    }
    out
}

/// Look up a zone by id.
pub fn find_zone<'a>(zones: &'a [Zone], id: &str) -> Option<&'a Zone> {
    zones.iter().find(|z| z.id == id)
}

/// Round `value` to the nearest multiple of `step`.
pub fn snap_to_step(value: f32, step: f32) -> f32 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    (value / step).round() * step
}

/// Snap `value` to `step` unless that leaves `[lo, hi]`; then clamp the
/// unsnapped value instead.
pub fn snap_within(value: f32, step: f32, lo: f32, hi: f32) -> f32 {
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return value;
    }
    let snapped = snap_to_step(value, step);
    if (lo..=hi).contains(&snapped) {
        snapped
    } else {
        value.clamp(lo, hi)
    }
}

/// Shift `rect` so its min corner lands on the `step` grid, staying inside `bounds`.
pub fn snap_rect_within(rect: &Rect, step: f32, bounds: &Rect) -> Rect {
    let min_x = snap_within(rect.min_x, step, bounds.min_x, bounds.max_x - rect.width());
    let min_z = snap_within(rect.min_z, step, bounds.min_z, bounds.max_z - rect.depth());
    Rect::from_bounds(min_x, min_x + rect.width(), min_z, min_z + rect.depth())
}

/// How a grid's granularity is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridSpec {
    /// Exactly this many rows and columns.
    Fixed { rows: usize, cols: usize },
    /// About this many cells, kept as square as the zone allows.
    Count(usize),
    /// Cells at least this large; as many as fit.
    CellSize { width: f32, depth: f32 },
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub zone_id: String,
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
}

impl Cell {
    pub fn center(&self) -> (f32, f32) {
        (self.rect.center_x(), self.rect.center_z())
    }
}

/// A row-major cell grid over one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub zone_id: String,
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether a cell sits on the grid's outer ring.
    pub fn is_outer(&self, cell: &Cell) -> bool {
        cell.row == 0 || cell.col == 0 || cell.row + 1 == self.rows || cell.col + 1 == self.cols
    }

    /// Cells not on the outer ring, row-major.
    pub fn interior(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(move |c| !self.is_outer(c))
    }
}

/// Pick columns × rows for about `n` cells that keep cells near-square
/// inside a region of the given aspect (width / depth).
pub fn square_split(n: usize, aspect: f32) -> (usize, usize) {
    let n = n.max(1);
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let cols = ((n as f32 * aspect).sqrt().round() as usize).clamp(1, n);
    let rows = n.div_ceil(cols);
    (cols, rows)
}

/// Build a cell grid over `zone`.
///
/// A degenerate zone yields an empty grid and a warning.
pub fn build_grid(zone: &Zone, spec: GridSpec) -> Grid {
    let r = &zone.rect;
    if r.is_degenerate() {
        log::warn!("Zone {} is degenerate; no grid built", zone.id);
        return Grid {
            zone_id: zone.id.clone(),
            rows: 0,
            cols: 0,
            cells: Vec::new(),
        };
    }

    let (cols, rows) = match spec {
        GridSpec::Fixed { rows, cols } => (cols.max(1), rows.max(1)),
        GridSpec::Count(n) => square_split(n, r.aspect()),
        GridSpec::CellSize { width, depth } => {
            let w = if width.is_finite() && width > 0.0 {
                width
            } else {
                r.width()
            };
            let d = if depth.is_finite() && depth > 0.0 {
                depth
            } else {
                r.depth()
            };
            (
                ((r.width() / w).floor() as usize).max(1),
                ((r.depth() / d).floor() as usize).max(1),
            )
        }
    };

    let cw = r.width() / cols as f32;
    let ch = r.depth() / rows as f32;
    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let min_x = r.min_x + col as f32 * cw;
            let min_z = r.min_z + row as f32 * ch;
            cells.push(Cell {
                zone_id: zone.id.clone(),
                row,
                col,
                rect: Rect::from_bounds(min_x, min_x + cw, min_z, min_z + ch),
            });
        }
    }

    Grid {
        zone_id: zone.id.clone(),
        rows,
        cols,
        cells,
    }
}
