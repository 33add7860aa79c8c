//! Angled parking lots.
//!
//! Each parking sub-zone gets one centered block. Stalls are laid out in
//! row-blocks: two facing rows of angled stalls around a shared aisle. Row
//! blocks repeat along Z, separated by a driveway, until the block is full.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::catalog::FootprintCatalog;
use crate::geometry::{sanitize, sanitize_range, Footprint, Rect, Vec3};
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::Zone;
use crate::rng::LayoutRng;

/// Painted stall markings are this thick.
const STALL_HEIGHT: f32 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingOptions {
    pub zones: Vec<String>,
    /// Share of the zone width used by the block.
    pub block_ratio_w: f32,
    /// Share of the zone depth used by the block.
    pub block_ratio_d: f32,
    /// Extra clearance subtracted on each side of the block.
    pub road_offset: f32,
    pub stall_width: f32,
    pub stall_length: f32,
    /// Stall angle from the row normal, in degrees.
    pub angle_deg: f32,
    pub aisle: f32,
    pub driveway_gap: f32,
    /// Chance that a stall holds a parked car.
    pub occupancy: f32,
    pub car_model: String,
}

impl Default for ParkingOptions {
    fn default() -> Self {
        Self {
            zones: vec!["C.6".into(), "C.7".into(), "A.4".into()],
            block_ratio_w: 0.8,
            block_ratio_d: 0.8,
            road_offset: 4.0,
            stall_width: 2.6,
            stall_length: 5.2,
            angle_deg: 30.0,
            aisle: 6.5,
            driveway_gap: 5.0,
            occupancy: 0.6,
            car_model: "car".into(),
        }
    }
}

/// The centered block a lot occupies inside `zone`, or `None` if it has no area.
pub fn parking_block(zone: &Zone, opts: &ParkingOptions) -> Option<Rect> {
    let (w, d) = zone.size();
    let offset = sanitize(opts.road_offset, 0.0);
    let bw = w * sanitize_range(opts.block_ratio_w, 0.0, 1.0) - 2.0 * offset;
    let bd = d * sanitize_range(opts.block_ratio_d, 0.0, 1.0) - 2.0 * offset;
    let (cx, cz) = zone.center();
    let block = Rect::from_center(cx, cz, bw.max(0.0), bd.max(0.0));
    if block.is_degenerate() {
        None
    } else {
        Some(block)
    }
}

/// Stall centers and rotations inside `block`, row-major.
pub fn stall_positions(block: &Rect, opts: &ParkingOptions) -> Vec<(f32, f32, f32)> {
    let w = sanitize(opts.stall_width, 0.5);
    let l = sanitize(opts.stall_length, 0.5);
    let theta = sanitize_range(opts.angle_deg, 0.0, 75.0).to_radians();
    let aisle = sanitize(opts.aisle, 0.0);
    let driveway = sanitize(opts.driveway_gap, 0.0);

    let (s, c) = theta.sin_cos();
    let hx = (w * c + l * s) / 2.0;
    let hz = (w * s + l * c) / 2.0;
    let pitch = w / c;
    let row_block = 4.0 * hz + aisle;

    let mut xs = Vec::new();
    let mut x = block.min_x + hx;
    while x + hx <= block.max_x + 1e-4 {
        xs.push(x);
        x += pitch;
    }

    let mut out = Vec::new();
    let mut z0 = block.min_z;
    while z0 + row_block <= block.max_z + 1e-4 {
        let near = z0 + hz;
        let far = z0 + 3.0 * hz + aisle;
        for &(z, rot) in &[(near, theta), (far, -theta)] {
            out.extend(xs.iter().map(|&x| (x, z, rot)));
        }
        z0 += row_block + driveway;
    }
    out
}

/// Stalls and parked cars for every parking zone.
pub fn add_parking(
    zones: &[&Zone],
    opts: &ParkingOptions,
    catalog: &FootprintCatalog,
    rng: &mut LayoutRng,
) -> Vec<PlacementRecord> {
    let stall = Footprint::new(
        sanitize(opts.stall_width, 0.5),
        sanitize(opts.stall_length, 0.5),
        STALL_HEIGHT,
    );
    let car = catalog.resolve(&opts.car_model);
    // Cars run along the stall's length; shrink oversized models to fit.
    let car_scale = (stall.depth / car.width).min(stall.width / car.depth).min(1.0);
    let car = car.scaled(car_scale);

    let mut out = Vec::new();
    for zone in zones {
        let Some(block) = parking_block(zone, opts) else {
            log::warn!("Parking zone {} too small for a block", zone.id);
            continue;
        };
        let stalls = stall_positions(&block, opts);
        if stalls.is_empty() {
            log::warn!("Parking block in {} fits no row of stalls", zone.id);
            continue;
        }

        let mut parked = 0usize;
        for (n, (x, z, rot)) in stalls.into_iter().enumerate() {
            let id = format!("{}-P{}", zone.id, n + 1);
            if rng.chance(opts.occupancy) {
                out.push(
                    PlacementRecord::new(
                        format!("{id}-car"),
                        EntityKind::ParkedCar,
                        Vec3::new(x, car.height / 2.0, z),
                        rot + FRAC_PI_2,
                        car,
                    )
                    .with_source(zone.id.clone())
                    .with_model(opts.car_model.clone()),
                );
                parked += 1;
            }
            out.push(
                PlacementRecord::new(
                    id,
                    EntityKind::ParkingStall,
                    Vec3::new(x, STALL_HEIGHT / 2.0, z),
                    rot,
                    stall,
                )
                .with_source(zone.id.clone()),
            );
        }
        log::debug!("Parking {}: {} cars parked", zone.id, parked);
    }
    out
}
