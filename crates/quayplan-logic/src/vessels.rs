//! Vessel placement alongside placed docks.
//!
//! Vessel `i` berths at dock `i`. The hull sits on the dock's water side,
//! parallel to it, never longer than 98% of the dock.
//!
//! Overflow policy: drop. Vessels without a dock are not placed.

use serde::{Deserialize, Serialize};

use crate::docks::MAX_DOCKS;
use crate::geometry::{sanitize, tangent, Footprint, Vec3};
use crate::inventory::VesselInfo;
use crate::manifest::{EntityKind, PlacementRecord};
use crate::rng::LayoutRng;

/// A hull never exceeds this share of its dock's length.
pub const MAX_DOCK_FILL: f32 = 0.98;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselOptions {
    pub default_length: f32,
    pub default_beam: f32,
    pub default_height: f32,
    pub length_scale: f32,
    pub width_scale: f32,
    /// Added to the scaled beam.
    pub width_padding: f32,
    /// Water between the dock face and the hull.
    pub clearance: f32,
    /// Amplitude of the symmetric jitter along the dock.
    pub along_jitter: f32,
    /// Amplitude of the symmetric jitter away from the dock.
    pub lateral_jitter: f32,
}

impl Default for VesselOptions {
    fn default() -> Self {
        Self {
            default_length: 140.0,
            default_beam: 22.0,
            default_height: 14.0,
            length_scale: 1.0,
            width_scale: 1.0,
            width_padding: 1.0,
            clearance: 4.0,
            along_jitter: 0.0,
            lateral_jitter: 0.0,
        }
    }
}

/// Unit normal of a dock pointing away from the plot center, as (x, z).
pub fn outward_normal(dock: &PlacementRecord) -> (f32, f32) {
    let (tx, tz) = tangent(dock.rotation_y);
    // Perpendicular in the XZ plane.
    let (nx, nz) = (-tz, tx);
    if nx * dock.position.x + nz * dock.position.z < 0.0 {
        (-nx, -nz)
    } else {
        (nx, nz)
    }
}

/// Berth each vessel at the dock with the same index.
pub fn place_vessels(
    vessels: &[VesselInfo],
    docks: &[PlacementRecord],
    water_level: f32,
    opts: &VesselOptions,
    rng: &mut LayoutRng,
) -> Vec<PlacementRecord> {
    let limit = docks.len().min(MAX_DOCKS);
    if vessels.len() > limit {
        log::warn!(
            "{} vessels but {} docks; dropping {}",
            vessels.len(),
            limit,
            vessels.len() - limit
        );
    }

    let length_scale = sanitize(opts.length_scale, 0.01);
    let width_scale = sanitize(opts.width_scale, 0.01);
    let padding = sanitize(opts.width_padding, 0.0);
    let clearance = sanitize(opts.clearance, 0.0);
    let default_length = sanitize(opts.default_length, 1.0);
    let default_beam = sanitize(opts.default_beam, 1.0);
    let default_height = sanitize(opts.default_height, 1.0);

    let mut out = Vec::new();
    for (vessel, dock) in vessels.iter().zip(docks.iter()).take(limit) {
        let dock_length = dock.footprint.width;
        let length = (sanitize(vessel.length.unwrap_or(default_length), 1.0) * length_scale)
            .min(dock_length * MAX_DOCK_FILL);
        let width =
            sanitize(vessel.beam.unwrap_or(default_beam), 1.0) * width_scale + padding;
        let height = sanitize(vessel.height.unwrap_or(default_height), 1.0);

        let slack = ((dock_length - length) / 2.0).max(0.0);
        let along = rng.symmetric(opts.along_jitter).clamp(-slack, slack);
        let lateral = dock.footprint.depth / 2.0
            + width / 2.0
            + clearance
            + rng.symmetric(opts.lateral_jitter).max(-clearance);

        let (tx, tz) = tangent(dock.rotation_y);
        let (nx, nz) = outward_normal(dock);
        let x = dock.position.x + nx * lateral + tx * along;
        let z = dock.position.z + nz * lateral + tz * along;

        let mut record = PlacementRecord::new(
            vessel.id.clone(),
            EntityKind::Vessel,
            Vec3::new(x, water_level + height / 2.0, z),
            dock.rotation_y,
            Footprint::new(length, width, height),
        )
        .overhanging();
        record.source = dock.source.clone();
        out.push(record);
    }
    out
}
