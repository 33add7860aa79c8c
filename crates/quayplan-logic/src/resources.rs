//! Physical resources: quay cranes on the docks, everything else in the
//! equipment pool.
//!
//! Cranes are dealt round-robin over the placed docks (dock 0, 1, …, 0, 1, …)
//! up to a per-dock cap and spread evenly along each dock on its water
//! face. Mobile equipment takes one cell each of a grid over the pool
//! sub-zone. Overflow policy: drop.

use serde::{Deserialize, Serialize};

use crate::catalog::FootprintCatalog;
use crate::geometry::{sanitize, tangent, Rect, Vec3};
use crate::grid::{build_grid, GridSpec};
use crate::inventory::{ResourceInfo, ResourceKind};
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::Zone;
use crate::vessels::outward_normal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOptions {
    /// Sub-zone holding mobile equipment.
    pub pool_zone: String,
    pub cranes_per_dock_max: usize,
    /// Most pool cells; resources past this are dropped.
    pub pool_capacity: usize,
    /// Clearance between the pool edge and its grid.
    pub pool_margin: f32,
    /// Share of a pool cell a resource may fill.
    pub cell_fill: f32,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            pool_zone: "A.3".into(),
            cranes_per_dock_max: 3,
            pool_capacity: 64,
            pool_margin: 6.0,
            cell_fill: 0.8,
        }
    }
}

/// Quay cranes on the docks.
pub fn place_cranes(
    cranes: &[&ResourceInfo],
    docks: &[PlacementRecord],
    catalog: &FootprintCatalog,
    opts: &ResourceOptions,
) -> Vec<PlacementRecord> {
    if cranes.is_empty() {
        return Vec::new();
    }
    if docks.is_empty() {
        log::warn!("No docks placed; {} quay cranes dropped", cranes.len());
        return Vec::new();
    }

    let cap = docks.len() * opts.cranes_per_dock_max;
    if cranes.len() > cap {
        log::warn!(
            "{} quay cranes but room for {}; dropping {}",
            cranes.len(),
            cap,
            cranes.len() - cap
        );
    }
    let placed = cranes.len().min(cap);
    let per_dock: Vec<usize> = (0..docks.len())
        .map(|d| placed / docks.len() + usize::from(d < placed % docks.len()))
        .collect();

    let model = ResourceKind::QuayCrane.model_key();
    let fp = catalog.resolve(model);
    cranes
        .iter()
        .take(placed)
        .enumerate()
        .map(|(i, crane)| {
            let dock = &docks[i % docks.len()];
            let slot = i / docks.len();
            let k = per_dock[i % docks.len()] as f32;
            let length = dock.footprint.width;
            let along = -length / 2.0 + (slot as f32 + 0.5) * length / k;
            let (tx, tz) = tangent(dock.rotation_y);
            let (nx, nz) = outward_normal(dock);
            let lateral = dock.footprint.depth / 2.0;
            let x = dock.position.x + tx * along + nx * lateral;
            let z = dock.position.z + tz * along + nz * lateral;
            let mut record = PlacementRecord::new(
                crane.id.clone(),
                EntityKind::Resource,
                Vec3::new(x, dock.footprint.height + fp.height / 2.0, z),
                dock.rotation_y,
                fp,
            )
            .with_model(model)
            .overhanging();
            record.source = dock.source.clone();
            record
        })
        .collect()
}

/// Mobile equipment in a grid over the pool sub-zone.
pub fn place_pool(
    equipment: &[&ResourceInfo],
    pool: &Zone,
    catalog: &FootprintCatalog,
    opts: &ResourceOptions,
) -> Vec<PlacementRecord> {
    if equipment.is_empty() {
        return Vec::new();
    }
    let n = equipment.len().min(opts.pool_capacity);
    if n < equipment.len() {
        log::warn!(
            "Equipment pool {} holds {}; dropping {}",
            pool.id,
            n,
            equipment.len() - n
        );
    }
    let inner = Zone::new(pool.id.clone(), pool.rect.inset(sanitize(opts.pool_margin, 0.0)));
    let grid = build_grid(&inner, GridSpec::Count(n));
    if grid.is_empty() {
        return Vec::new();
    }
    let fill = sanitize(opts.cell_fill, 0.01).min(1.0);

    equipment
        .iter()
        .zip(&grid.cells)
        .map(|(res, cell)| {
            let model = res.kind.model_key();
            let unit = catalog.resolve(model);
            let room = Rect::from_center(0.0, 0.0, cell.rect.width() * fill, cell.rect.depth() * fill);
            let scale = (room.width() / unit.width)
                .min(room.depth() / unit.depth)
                .min(1.0);
            let fp = unit.scaled(scale);
            let (x, z) = cell.center();
            PlacementRecord::new(
                res.id.clone(),
                EntityKind::Resource,
                Vec3::new(x, fp.height / 2.0, z),
                0.0,
                fp,
            )
            .with_source(pool.id.clone())
            .with_model(model)
        })
        .collect()
}

/// Place every resource: cranes on docks, the rest in the pool.
pub fn place_resources(
    resources: &[ResourceInfo],
    docks: &[PlacementRecord],
    pool: Option<&Zone>,
    catalog: &FootprintCatalog,
    opts: &ResourceOptions,
) -> Vec<PlacementRecord> {
    let (cranes, equipment): (Vec<&ResourceInfo>, Vec<&ResourceInfo>) = resources
        .iter()
        .partition(|r| r.kind == ResourceKind::QuayCrane);

    let mut out = place_cranes(&cranes, docks, catalog, opts);
    match pool {
        Some(zone) => out.extend(place_pool(&equipment, zone, catalog, opts)),
        None if !equipment.is_empty() => {
            log::warn!(
                "Equipment pool {} not found; {} resources dropped",
                opts.pool_zone,
                equipment.len()
            );
        }
        None => {}
    }
    out
}
