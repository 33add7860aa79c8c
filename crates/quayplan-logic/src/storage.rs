//! Storage-area packing into zone B sub-zones.
//!
//! Areas are taken in input order, at most [`STORAGE_PER_ZONE`] per
//! sub-zone, B.1 first. The last sub-zone absorbs whatever is left
//! (overflow policy: overflow-to-last). Inside a sub-zone the areas get equal
//! cells of a grid chosen to keep cells close to square.

use serde::{Deserialize, Serialize};

use crate::geometry::{sanitize, Footprint, Rect, Vec3};
use crate::grid::square_split;
use crate::inventory::StorageAreaInfo;
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::Zone;

/// Areas per sub-zone before spilling into the next one.
pub const STORAGE_PER_ZONE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Sub-zones to fill, in order.
    pub zones: Vec<String>,
    pub per_zone_cap: usize,
    /// Clearance from the sub-zone edges.
    pub margin: f32,
    /// Spacing between neighbouring areas.
    pub gap: f32,
    /// Height used when the inventory has none.
    pub default_height: f32,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            zones: vec!["B.1".into(), "B.2".into()],
            per_zone_cap: STORAGE_PER_ZONE,
            margin: 6.0,
            gap: 4.0,
            default_height: 3.0,
        }
    }
}

/// Rectangles of an `n`-item grid inside `rect`, row-major.
///
/// Cell size per axis is `(size − 2·margin − (k−1)·gap) / k`. Returns an
/// empty vector when the cells would have no area.
pub fn pack_cells(rect: &Rect, n: usize, margin: f32, gap: f32) -> Vec<Rect> {
    if n == 0 || rect.is_degenerate() {
        return Vec::new();
    }
    let margin = sanitize(margin, 0.0);
    let gap = sanitize(gap, 0.0);
    let (cols, rows) = square_split(n, rect.aspect());
    let cell_w = (rect.width() - 2.0 * margin - (cols as f32 - 1.0) * gap) / cols as f32;
    let cell_d = (rect.depth() - 2.0 * margin - (rows as f32 - 1.0) * gap) / rows as f32;
    if cell_w <= 0.0 || cell_d <= 0.0 {
        return Vec::new();
    }

    (0..n)
        .map(|i| {
            let col = i % cols;
            let row = i / cols;
            let min_x = rect.min_x + margin + col as f32 * (cell_w + gap);
            let min_z = rect.min_z + margin + row as f32 * (cell_d + gap);
            Rect::from_bounds(min_x, min_x + cell_w, min_z, min_z + cell_d)
        })
        .collect()
}

/// Pack storage areas into the given sub-zones.
pub fn pack_storage_areas(
    areas: &[StorageAreaInfo],
    subzones: &[&Zone],
    opts: &StorageOptions,
) -> Vec<PlacementRecord> {
    if areas.is_empty() {
        return Vec::new();
    }
    if subzones.is_empty() {
        log::warn!("No storage sub-zones; {} areas not placed", areas.len());
        return Vec::new();
    }

    let cap = opts.per_zone_cap.max(1);
    let default_height = sanitize(opts.default_height, 0.1);
    let mut out = Vec::with_capacity(areas.len());
    let mut rest = areas;

    for (k, zone) in subzones.iter().enumerate() {
        if rest.is_empty() {
            break;
        }
        let last = k + 1 == subzones.len();
        let take = if last { rest.len() } else { rest.len().min(cap) };
        let (batch, tail) = rest.split_at(take);
        rest = tail;

        let cells = pack_cells(&zone.rect, batch.len(), opts.margin, opts.gap);
        if cells.is_empty() {
            log::warn!(
                "Sub-zone {} too small for {} storage areas; skipped",
                zone.id,
                batch.len()
            );
            continue;
        }
        if last && take > cap {
            log::debug!("Sub-zone {} absorbs {} overflow areas", zone.id, take - cap);
        }

        for (area, cell) in batch.iter().zip(&cells) {
            let height = sanitize(area.height.unwrap_or(default_height), 0.1);
            out.push(
                PlacementRecord::new(
                    area.id.clone(),
                    EntityKind::StorageArea,
                    Vec3::new(cell.center_x(), height / 2.0, cell.center_z()),
                    0.0,
                    Footprint::new(cell.width(), cell.depth(), height),
                )
                .with_source(zone.id.clone()),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{subdivide, ZoneSplit};
    use crate::plot::{partition, TerminalPlot};

    fn b_subzones() -> Vec<Zone> {
        let layout = partition(&TerminalPlot::default());
        subdivide(&layout.zone_b, ZoneSplit::new(2, 1))
    }

    fn areas(n: usize) -> Vec<StorageAreaInfo> {
        (0..n)
            .map(|i| StorageAreaInfo {
                id: format!("S{i}"),
                ..StorageAreaInfo::default()
            })
            .collect()
    }

    #[test]
    fn twenty_five_areas_split_ten_and_fifteen() {
        let subs = b_subzones();
        let refs: Vec<&Zone> = subs.iter().collect();
        let placed = pack_storage_areas(&areas(25), &refs, &StorageOptions::default());
        assert_eq!(placed.len(), 25);
        let in_b1 = placed.iter().filter(|r| r.source.as_deref() == Some("B.1")).count();
        let in_b2 = placed.iter().filter(|r| r.source.as_deref() == Some("B.2")).count();
        assert_eq!((in_b1, in_b2), (10, 15));

        let used: f32 = placed.iter().map(|r| r.footprint.area()).sum();
        let available: f32 = subs.iter().map(|z| z.rect.area()).sum();
        assert!(used <= available);
    }

    #[test]
    fn areas_stay_inside_their_subzone() {
        let subs = b_subzones();
        let refs: Vec<&Zone> = subs.iter().collect();
        let placed = pack_storage_areas(&areas(17), &refs, &StorageOptions::default());
        for r in &placed {
            let zone = subs.iter().find(|z| Some(&z.id) == r.source.as_ref()).unwrap();
            assert!(zone.rect.inset(6.0).contains_rect(&r.world_rect()), "{} escapes", r.id);
        }
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                assert!(!placed[i].world_rect().overlaps(&placed[j].world_rect()));
            }
        }
    }

    #[test]
    fn height_defaults_and_lifts() {
        let subs = b_subzones();
        let refs: Vec<&Zone> = subs.iter().collect();
        let mut input = areas(2);
        input[1].height = Some(8.0);
        let placed = pack_storage_areas(&input, &refs, &StorageOptions::default());
        assert_eq!(placed[0].position.y, 1.5);
        assert_eq!(placed[1].position.y, 4.0);
    }

    #[test]
    fn pack_cells_counts_and_gaps() {
        let rect = Rect::from_bounds(0.0, 100.0, 0.0, 100.0);
        let cells = pack_cells(&rect, 4, 5.0, 10.0);
        assert_eq!(cells.len(), 4);
        assert!((cells[0].width() - 40.0).abs() < 1e-4);
        assert!((cells[1].min_x - cells[0].max_x - 10.0).abs() < 1e-4);
        assert!(pack_cells(&rect, 4, 60.0, 0.0).is_empty());
    }

    #[test]
    fn no_subzones_places_nothing() {
        let placed = pack_storage_areas(&areas(3), &[], &StorageOptions::default());
        assert!(placed.is_empty());
    }
}
