//! Dock placement on zone C quay edges.
//!
//! Zone C's sub-zones offer eight named edge slots. They are filled in a
//! fixed priority: the top (quay-facing) edges of the quay-row sub-zones from
//! the center outwards, then the west edge of each row's first sub-zone and
//! the east edge of each row's last sub-zone, quay row first.
//!
//! Every dock sits in the water past the perimeter road it faces, set back
//! from the plot boundary so no road band is covered. Along its edge a dock
//! is centered on the sub-zone, snapped to the plot grid step.
//!
//! Overflow policy: drop. Docks beyond the slot count are not placed.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::geometry::{sanitize, Footprint, Rect, Vec3, EPSILON};
use crate::grid::snap_within;
use crate::inventory::DockInfo;
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::{TerminalPlot, Zone};

/// Hard cap on docks (one per edge slot).
pub const MAX_DOCKS: usize = 8;

/// A dock never covers more than this share of its edge.
pub const DOCK_EDGE_FILL: f32 = 0.88;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockOptions {
    /// Length used when the inventory has none.
    pub default_length: f32,
    pub min_length: f32,
    pub depth: f32,
    pub height: f32,
    /// Water between the plot boundary and the dock's landward face.
    pub setback: f32,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            default_length: 160.0,
            min_length: 20.0,
            depth: 18.0,
            height: 3.0,
            setback: 3.0,
        }
    }
}

/// Which edge of a sub-zone a slot uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeSide {
    Top,
    West,
    East,
}

/// One named quay-edge slot.
#[derive(Debug, Clone, PartialEq)]
pub struct DockSlot {
    /// e.g. `"C.2:top"`.
    pub name: String,
    pub zone_id: String,
    pub side: EdgeSide,
    pub rect: Rect,
}

impl DockSlot {
    fn new(zone: &Zone, side: EdgeSide) -> Self {
        let tag = match side {
            EdgeSide::Top => "top",
            EdgeSide::West => "west",
            EdgeSide::East => "east",
        };
        Self {
            name: format!("{}:{}", zone.id, tag),
            zone_id: zone.id.clone(),
            side,
            rect: zone.rect,
        }
    }

    /// Length of the edge the dock runs along.
    pub fn edge_length(&self) -> f32 {
        match self.side {
            EdgeSide::Top => self.rect.width(),
            EdgeSide::West | EdgeSide::East => self.rect.depth(),
        }
    }
}

/// Group sub-zones into rows (by `min_z`, quay row first), each sorted west to east.
fn rows_of(subzones: &[Zone]) -> Vec<Vec<&Zone>> {
    let mut sorted: Vec<&Zone> = subzones.iter().collect();
    sorted.sort_by(|a, b| {
        a.rect
            .min_z
            .total_cmp(&b.rect.min_z)
            .then(a.rect.min_x.total_cmp(&b.rect.min_x))
    });

    let mut rows: Vec<Vec<&Zone>> = Vec::new();
    for z in sorted {
        match rows.last_mut() {
            Some(row) if (row[0].rect.min_z - z.rect.min_z).abs() <= EPSILON => row.push(z),
            _ => rows.push(vec![z]),
        }
    }
    rows
}

/// The quay-edge slots of zone C in priority order, at most [`MAX_DOCKS`].
pub fn dock_slots(zone_c_subzones: &[Zone]) -> Vec<DockSlot> {
    let rows = rows_of(zone_c_subzones);
    let Some(quay_row) = rows.first() else {
        return Vec::new();
    };

    let mut slots = Vec::new();

    // Center-out along the quay row; ties go west first.
    let mid = (quay_row.len() as f32 - 1.0) / 2.0;
    let mut order: Vec<usize> = (0..quay_row.len()).collect();
    order.sort_by(|&a, &b| {
        let da = (a as f32 - mid).abs();
        let db = (b as f32 - mid).abs();
        da.total_cmp(&db).then(a.cmp(&b))
    });
    for i in order {
        slots.push(DockSlot::new(quay_row[i], EdgeSide::Top));
    }

    for row in &rows {
        if let Some(first) = row.first() {
            slots.push(DockSlot::new(first, EdgeSide::West));
        }
        if let Some(last) = row.last() {
            slots.push(DockSlot::new(last, EdgeSide::East));
        }
    }

    slots.truncate(MAX_DOCKS);
    slots
}

/// Place up to [`MAX_DOCKS`] docks on zone C's edge slots.
pub fn place_docks(
    docks: &[DockInfo],
    zone_c_subzones: &[Zone],
    plot: &TerminalPlot,
    opts: &DockOptions,
) -> Vec<PlacementRecord> {
    let slots = dock_slots(zone_c_subzones);
    if slots.is_empty() {
        if !docks.is_empty() {
            log::warn!("Zone C has no sub-zones; {} docks not placed", docks.len());
        }
        return Vec::new();
    }
    if docks.len() > slots.len() {
        log::warn!(
            "{} docks requested but only {} quay slots; dropping {}",
            docks.len(),
            slots.len(),
            docks.len() - slots.len()
        );
    }

    let depth = sanitize(opts.depth, 1.0);
    let height = sanitize(opts.height, 0.1);
    let setback = sanitize(opts.setback, 0.0);
    let plot = plot.sanitized();
    let bounds = plot.rect();
    let step = plot.grid_step;
    // Centerline offset from the plot boundary into the water.
    let offset = setback + depth / 2.0;
    let min_length = sanitize(opts.min_length, 1.0);
    let default_length = sanitize(opts.default_length, min_length);

    let mut out = Vec::new();
    for (dock, slot) in docks.iter().zip(&slots) {
        let cap = slot.edge_length() * DOCK_EDGE_FILL;
        if cap <= EPSILON {
            log::warn!("Slot {} has no usable edge; dock {} skipped", slot.name, dock.id);
            continue;
        }
        let nominal = dock.length.unwrap_or(default_length);
        let length = sanitize(nominal, min_length).min(cap);

        let r = &slot.rect;
        let half = length / 2.0;
        let along_x = || snap_within(r.center_x(), step, r.min_x + half, r.max_x - half);
        let along_z = || snap_within(r.center_z(), step, r.min_z + half, r.max_z - half);
        let (x, z, rotation_y) = match slot.side {
            EdgeSide::Top => (along_x(), bounds.min_z - offset, 0.0),
            EdgeSide::West => (bounds.min_x - offset, along_z(), FRAC_PI_2),
            EdgeSide::East => (bounds.max_x + offset, along_z(), FRAC_PI_2),
        };

        out.push(
            PlacementRecord::new(
                dock.id.clone(),
                EntityKind::Dock,
                Vec3::new(x, height / 2.0, z),
                rotation_y,
                Footprint::new(length, depth, height),
            )
            .with_source(slot.zone_id.clone())
            .overhanging(),
        );
    }
    out
}
