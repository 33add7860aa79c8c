//! Container slot allocation in the container yard (A.2 by default).
//!
//! Slots are a strided subset of the interior cells of a grid sized to one
//! container plus padding. Containers fill slots two at a time: container
//! `i` goes to slot `(i / 2) % slots` at tier `i % 2`.

use serde::{Deserialize, Serialize};

use crate::geometry::{sanitize, Footprint, Vec3};
use crate::grid::{build_grid, Grid, GridSpec};
use crate::inventory::ContainerInfo;
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::Zone;

/// Containers per slot.
pub const TIERS_PER_SLOT: usize = 2;

/// What happens when there are more containers than `2 × slots`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerOverflow {
    /// Keep cycling through the slots; extra containers share positions.
    #[default]
    Wrap,
    /// Stop once every slot holds two containers.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    pub zone: String,
    pub length: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical gap between tier 0 and tier 1.
    pub tier_gap: f32,
    /// Padding added to the container size to get the cell size.
    pub cell_padding: f32,
    /// Use every n-th interior row.
    pub row_stride: usize,
    /// Use every n-th interior column.
    pub col_stride: usize,
    /// Slot centers keep `factor × length` (X) and `factor × width` (Z)
    /// away from the zone edges.
    pub clearance_factor: f32,
    pub overflow: ContainerOverflow,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            zone: "A.2".into(),
            length: 12.19,
            width: 2.44,
            height: 2.59,
            tier_gap: 0.05,
            cell_padding: 1.5,
            row_stride: 2,
            col_stride: 2,
            clearance_factor: 1.0,
            overflow: ContainerOverflow::Wrap,
        }
    }
}

impl ContainerOptions {
    fn footprint(&self) -> Footprint {
        Footprint::new(
            sanitize(self.length, 0.1),
            sanitize(self.width, 0.1),
            sanitize(self.height, 0.1),
        )
    }
}

/// Grid over `zone` with one container (plus padding) per cell.
pub fn container_grid(zone: &Zone, opts: &ContainerOptions) -> Grid {
    let fp = opts.footprint();
    let pad = sanitize(opts.cell_padding, 0.0);
    build_grid(
        zone,
        GridSpec::CellSize {
            width: fp.width + pad,
            depth: fp.depth + pad,
        },
    )
}

/// Slot centers `(x, z)` in row-major order.
pub fn container_slots(grid: &Grid, zone: &Zone, opts: &ContainerOptions) -> Vec<(f32, f32)> {
    let fp = opts.footprint();
    let row_stride = opts.row_stride.max(1);
    let col_stride = opts.col_stride.max(1);
    let factor = sanitize(opts.clearance_factor, 0.0);
    let clear_x = fp.width * factor;
    let clear_z = fp.depth * factor;
    let r = &zone.rect;

    grid.interior()
        .filter(|c| (c.row - 1) % row_stride == 0 && (c.col - 1) % col_stride == 0)
        .map(|c| c.center())
        .filter(|&(x, z)| {
            x - r.min_x >= clear_x
                && r.max_x - x >= clear_x
                && z - r.min_z >= clear_z
                && r.max_z - z >= clear_z
        })
        .collect()
}

/// Place containers two per slot.
pub fn allocate_containers(
    containers: &[ContainerInfo],
    grid: &Grid,
    zone: &Zone,
    opts: &ContainerOptions,
) -> Vec<PlacementRecord> {
    if containers.is_empty() {
        return Vec::new();
    }
    let slots = container_slots(grid, zone, opts);
    if slots.is_empty() {
        log::warn!(
            "No container slots in {}; {} containers not placed",
            zone.id,
            containers.len()
        );
        return Vec::new();
    }

    let capacity = slots.len() * TIERS_PER_SLOT;
    let count = match opts.overflow {
        ContainerOverflow::Wrap => {
            if containers.len() > capacity {
                log::warn!(
                    "{} containers exceed {} slot positions in {}; wrapping",
                    containers.len(),
                    capacity,
                    zone.id
                );
            }
            containers.len()
        }
        ContainerOverflow::Drop => {
            if containers.len() > capacity {
                log::warn!(
                    "{} containers exceed {} slot positions in {}; dropping {}",
                    containers.len(),
                    capacity,
                    zone.id,
                    containers.len() - capacity
                );
            }
            containers.len().min(capacity)
        }
    };

    let fp = opts.footprint();
    let gap = sanitize(opts.tier_gap, 0.0);
    containers
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, c)| {
            let (x, z) = slots[(i / TIERS_PER_SLOT) % slots.len()];
            let tier = (i % TIERS_PER_SLOT) as f32;
            let y = fp.height / 2.0 + tier * (fp.height + gap);
            PlacementRecord::new(c.id.clone(), EntityKind::Container, Vec3::new(x, y, z), 0.0, fp)
                .with_source(zone.id.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn containers(n: usize) -> Vec<ContainerInfo> {
        (0..n)
            .map(|i| ContainerInfo {
                id: format!("MSKU{i:07}"),
            })
            .collect()
    }

    fn yard(w: f32, d: f32) -> Zone {
        Zone::new("A.2", Rect::from_bounds(0.0, w, 0.0, d))
    }

    #[test]
    fn pairs_share_a_slot() {
        let zone = yard(300.0, 300.0);
        let opts = ContainerOptions::default();
        let grid = container_grid(&zone, &opts);
        let placed = allocate_containers(&containers(6), &grid, &zone, &opts);
        assert_eq!(placed.len(), 6);
        assert_eq!(placed[0].position.x, placed[1].position.x);
        assert_eq!(placed[0].position.z, placed[1].position.z);
        assert!(placed[1].position.y > placed[0].position.y);
        assert_ne!(
            (placed[0].position.x, placed[0].position.z),
            (placed[2].position.x, placed[2].position.z)
        );
    }

    #[test]
    fn tiers_are_stacked_by_height_and_gap() {
        let zone = yard(300.0, 300.0);
        let opts = ContainerOptions::default();
        let grid = container_grid(&zone, &opts);
        let placed = allocate_containers(&containers(2), &grid, &zone, &opts);
        assert!((placed[0].position.y - 1.295).abs() < 1e-4);
        assert!((placed[1].position.y - (1.295 + 2.59 + 0.05)).abs() < 1e-4);
    }

    #[test]
    fn slots_keep_clear_of_edges() {
        let zone = yard(200.0, 120.0);
        let opts = ContainerOptions::default();
        let grid = container_grid(&zone, &opts);
        let slots = container_slots(&grid, &zone, &opts);
        assert!(!slots.is_empty());
        for (x, z) in slots {
            assert!(x >= 12.19 && x <= 200.0 - 12.19);
            assert!(z >= 2.44 && z <= 120.0 - 2.44);
        }
    }

    #[test]
    fn wrap_reuses_slots() {
        let zone = yard(60.0, 30.0);
        let opts = ContainerOptions::default();
        let grid = container_grid(&zone, &opts);
        let n_slots = container_slots(&grid, &zone, &opts).len();
        assert!(n_slots > 0);
        let n = n_slots * 2 + 3;
        let placed = allocate_containers(&containers(n), &grid, &zone, &opts);
        assert_eq!(placed.len(), n);
        let first = &placed[0];
        let wrapped = &placed[n_slots * 2];
        assert_eq!(
            (first.position.x, first.position.z, first.position.y),
            (wrapped.position.x, wrapped.position.z, wrapped.position.y)
        );
    }

    #[test]
    fn drop_stops_at_capacity() {
        let zone = yard(60.0, 30.0);
        let opts = ContainerOptions {
            overflow: ContainerOverflow::Drop,
            ..ContainerOptions::default()
        };
        let grid = container_grid(&zone, &opts);
        let n_slots = container_slots(&grid, &zone, &opts).len();
        let placed = allocate_containers(&containers(n_slots * 2 + 5), &grid, &zone, &opts);
        assert_eq!(placed.len(), n_slots * 2);
    }

    #[test]
    fn tiny_zone_places_nothing() {
        let zone = yard(10.0, 3.0);
        let opts = ContainerOptions::default();
        let grid = container_grid(&zone, &opts);
        assert!(allocate_containers(&containers(4), &grid, &zone, &opts).is_empty());
    }
}
