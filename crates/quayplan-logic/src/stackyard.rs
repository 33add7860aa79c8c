//! Container stack yards behind the docks.
//!
//! A yard fills a share of its sub-zone, shifted along X by a bias so
//! neighbouring yards do not line up, with its corner on the plot grid. Stacks are laid row-major on a fixed
//! step and hold a random number of tiers.

use serde::{Deserialize, Serialize};

use crate::geometry::{sanitize, sanitize_range, Footprint, Rect, Vec3};
use crate::grid::snap_rect_within;
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::Zone;
use crate::rng::LayoutRng;

/// One yard: a sub-zone and its X bias in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YardTarget {
    pub zone: String,
    #[serde(default)]
    pub bias_x: f32,
}

impl YardTarget {
    pub fn new(zone: impl Into<String>, bias_x: f32) -> Self {
        Self {
            zone: zone.into(),
            bias_x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YardOptions {
    pub targets: Vec<YardTarget>,
    pub unit_model: String,
    pub fill_ratio_w: f32,
    pub fill_ratio_d: f32,
    /// Space between neighbouring stacks.
    pub gap: f32,
    /// Added to every step so stacks never touch.
    pub epsilon: f32,
    pub max_rows: usize,
    pub max_cols: usize,
    /// Tallest stack, in tiers.
    pub max_stack: u32,
    pub tier_gap: f32,
}

impl Default for YardOptions {
    fn default() -> Self {
        Self {
            targets: vec![
                YardTarget::new("C.1", -0.25),
                YardTarget::new("C.2", 0.0),
                YardTarget::new("C.3", 0.0),
                YardTarget::new("C.4", 0.25),
            ],
            unit_model: "container_20ft".into(),
            fill_ratio_w: 0.8,
            fill_ratio_d: 0.7,
            gap: 1.5,
            epsilon: 0.05,
            max_rows: 12,
            max_cols: 8,
            max_stack: 4,
            tier_gap: 0.05,
        }
    }
}

/// The area a yard covers inside `zone`.
pub fn yard_rect(zone: &Rect, bias_x: f32, opts: &YardOptions) -> Rect {
    let w = zone.width() * sanitize_range(opts.fill_ratio_w, 0.0, 1.0);
    let d = zone.depth() * sanitize_range(opts.fill_ratio_d, 0.0, 1.0);
    let bias = sanitize_range(bias_x, -1.0, 1.0);
    let free = zone.width() - w;
    Rect::from_center(zone.center_x() + bias * free / 2.0, zone.center_z(), w, d)
}

/// Stacks of `unit` containers filling one yard snapped to `grid_step`.
pub fn pack_yard(
    zone: &Zone,
    bias_x: f32,
    unit: Footprint,
    grid_step: f32,
    opts: &YardOptions,
    rng: &mut LayoutRng,
) -> Vec<PlacementRecord> {
    let area = snap_rect_within(&yard_rect(&zone.rect, bias_x, opts), grid_step, &zone.rect);
    if area.is_degenerate() {
        log::warn!("Yard in {} has no area", zone.id);
        return Vec::new();
    }

    let gap = sanitize(opts.gap, 0.0);
    let eps = sanitize(opts.epsilon, 0.0);
    let step_x = unit.width + gap + eps;
    let step_z = unit.depth + gap + eps;
    let cols = ((area.width() / step_x).floor() as usize).min(opts.max_cols);
    let rows = ((area.depth() / step_z).floor() as usize).min(opts.max_rows);
    if cols == 0 || rows == 0 {
        log::warn!("Yard in {} too small for a single stack", zone.id);
        return Vec::new();
    }

    let max_stack = opts.max_stack.max(1);
    let tier_gap = sanitize(opts.tier_gap, 0.0);
    let mut out = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let x = area.min_x + (col as f32 + 0.5) * step_x;
            let z = area.min_z + (row as f32 + 0.5) * step_z;
            let tiers = rng.between(1, max_stack);
            for tier in 0..tiers {
                let y = unit.height / 2.0 + tier as f32 * (unit.height + tier_gap);
                out.push(
                    PlacementRecord::new(
                        format!("{}-Y{}-{}-{}", zone.id, row + 1, col + 1, tier + 1),
                        EntityKind::YardContainer,
                        Vec3::new(x, y, z),
                        0.0,
                        unit,
                    )
                    .with_source(zone.id.clone())
                    .with_model(opts.unit_model.clone()),
                );
            }
        }
    }
    out
}
