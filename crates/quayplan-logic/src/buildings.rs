//! Workshops, offices and decorative features fitted into sub-zone cells.
//!
//! A group of `N` buildings shares one sub-zone. The sub-zone (minus a
//! margin) is cut into the `cols × rows` grid whose cells are the most
//! square, and each building is scaled uniformly to fit its cell.

use serde::{Deserialize, Serialize};

use crate::catalog::FootprintCatalog;
use crate::geometry::{sanitize, sanitize_range, Footprint, Rect, Vec3};
use crate::grid::find_zone;
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingKind {
    Workshop,
    Office,
    Decorative,
}

impl BuildingKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            BuildingKind::Workshop => EntityKind::Workshop,
            BuildingKind::Office => EntityKind::Office,
            BuildingKind::Decorative => EntityKind::Decorative,
        }
    }

    /// Model used when a group lists none.
    pub fn default_model(self) -> &'static str {
        match self {
            BuildingKind::Workshop => "workshop",
            BuildingKind::Office => "office",
            BuildingKind::Decorative => "decor_fountain",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            BuildingKind::Workshop => "workshop",
            BuildingKind::Office => "office",
            BuildingKind::Decorative => "decor",
        }
    }
}

/// Buildings of one kind spread over a list of sub-zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingGroup {
    pub kind: BuildingKind,
    pub zones: Vec<String>,
    pub count_per_zone: usize,
    /// Models cycled through in order.
    #[serde(default)]
    pub models: Vec<String>,
}

impl BuildingGroup {
    /// Workshops in A.1, offices in C.5, decoratives in C.8.
    pub fn defaults() -> Vec<BuildingGroup> {
        vec![
            BuildingGroup {
                kind: BuildingKind::Workshop,
                zones: vec!["A.1".into()],
                count_per_zone: 4,
                models: vec!["workshop".into()],
            },
            BuildingGroup {
                kind: BuildingKind::Office,
                zones: vec!["C.5".into()],
                count_per_zone: 2,
                models: vec!["office".into()],
            },
            BuildingGroup {
                kind: BuildingKind::Decorative,
                zones: vec!["C.8".into()],
                count_per_zone: 6,
                models: vec![
                    "decor_fountain".into(),
                    "decor_kiosk".into(),
                    "decor_statue".into(),
                ],
            },
        ]
    }

    fn model(&self, i: usize) -> &str {
        if self.models.is_empty() {
            self.kind.default_model()
        } else {
            &self.models[i % self.models.len()]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Share of the cell the scaled building may fill. Kept below 1.
    pub fit_scale_factor: f32,
    /// Clearance between the sub-zone edge and the cell grid.
    pub margin: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            fit_scale_factor: 0.85,
            margin: 4.0,
        }
    }
}

/// `(cols, rows)` for `n` cells in a `w × h` area, maximizing the smaller
/// cell side. Ties keep the fewer columns.
pub fn choose_layout(n: usize, w: f32, h: f32) -> (usize, usize) {
    let n = n.max(1);
    let mut best = (1, n);
    let mut best_side = f32::MIN;
    for cols in 1..=n {
        let rows = n.div_ceil(cols);
        let side = (w / cols as f32).min(h / rows as f32);
        if side > best_side {
            best_side = side;
            best = (cols, rows);
        }
    }
    best
}

/// Fit `count` buildings into `rect`, one per cell.
///
/// `model_for(i)` names the catalog model of building `i`.
pub fn fit_buildings<'m>(
    rect: &Rect,
    count: usize,
    model_for: impl Fn(usize) -> &'m str,
    catalog: &FootprintCatalog,
    opts: &FitOptions,
) -> Vec<(String, Vec3, Footprint)> {
    if count == 0 {
        return Vec::new();
    }
    let inner = rect.inset(sanitize(opts.margin, 0.0));
    if inner.is_degenerate() {
        return Vec::new();
    }
    let factor = sanitize_range(opts.fit_scale_factor, 0.01, 0.99);
    let (cols, rows) = choose_layout(count, inner.width(), inner.depth());
    let cw = inner.width() / cols as f32;
    let ch = inner.depth() / rows as f32;

    (0..count)
        .map(|i| {
            let model = model_for(i);
            let unit = catalog.resolve(model);
            let scale = (cw / unit.width).min(ch / unit.depth) * factor;
            let fp = unit.scaled(scale);
            let cx = inner.min_x + ((i % cols) as f32 + 0.5) * cw;
            let cz = inner.min_z + ((i / cols) as f32 + 0.5) * ch;
            (model.to_string(), Vec3::new(cx, fp.height / 2.0, cz), fp)
        })
        .collect()
}

/// Place one building group over its sub-zones.
pub fn place_building_group(
    group: &BuildingGroup,
    subzones: &[Zone],
    catalog: &FootprintCatalog,
    opts: &FitOptions,
) -> Vec<PlacementRecord> {
    let kind = group.kind.entity_kind();
    let mut out = Vec::new();
    for zone_id in &group.zones {
        let Some(zone) = find_zone(subzones, zone_id) else {
            log::warn!("Building zone {} not found; skipped", zone_id);
            continue;
        };
        let fitted = fit_buildings(&zone.rect, group.count_per_zone, |i| group.model(i), catalog, opts);
        if fitted.is_empty() && group.count_per_zone > 0 {
            log::warn!("Sub-zone {} too small for {:?} buildings", zone.id, group.kind);
        }
        for (i, (model, position, fp)) in fitted.into_iter().enumerate() {
            out.push(
                PlacementRecord::new(
                    format!("{}-{}-{}", zone.id, group.kind.tag(), i + 1),
                    kind,
                    position,
                    0.0,
                    fp,
                )
                .with_source(zone.id.clone())
                .with_model(model),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_prefers_square_cells() {
        assert_eq!(choose_layout(4, 100.0, 100.0), (2, 2));
        assert_eq!(choose_layout(3, 300.0, 100.0), (3, 1));
        assert_eq!(choose_layout(3, 100.0, 300.0), (1, 3));
        assert_eq!(choose_layout(1, 10.0, 10.0), (1, 1));
        assert_eq!(choose_layout(0, 10.0, 10.0), (1, 1));
    }

    #[test]
    fn buildings_fit_their_cells() {
        let rect = Rect::from_bounds(0.0, 200.0, 0.0, 100.0);
        let catalog = FootprintCatalog::default();
        let fitted = fit_buildings(&rect, 5, |_| "workshop", &catalog, &FitOptions::default());
        assert_eq!(fitted.len(), 5);
        let inner = rect.inset(4.0);
        for (_, p, fp) in &fitted {
            let r = Rect::from_center(p.x, p.z, fp.width, fp.depth);
            assert!(inner.contains_rect(&r));
        }
        for i in 0..fitted.len() {
            for j in (i + 1)..fitted.len() {
                let a = Rect::from_center(fitted[i].1.x, fitted[i].1.z, fitted[i].2.width, fitted[i].2.depth);
                let b = Rect::from_center(fitted[j].1.x, fitted[j].1.z, fitted[j].2.width, fitted[j].2.depth);
                assert!(!a.overlaps(&b));
            }
        }
    }

    #[test]
    fn scale_is_uniform() {
        let rect = Rect::from_bounds(0.0, 60.0, 0.0, 60.0);
        let catalog = FootprintCatalog::default();
        let fitted = fit_buildings(&rect, 1, |_| "office", &catalog, &FitOptions::default());
        let unit = catalog.get("office").unwrap();
        let (_, _, fp) = &fitted[0];
        let sw = fp.width / unit.width;
        let sh = fp.height / unit.height;
        assert!((sw - sh).abs() < 1e-4);
        assert!(fp.width <= 52.0 * 0.85 + 1e-3);
    }

    #[test]
    fn group_cycles_models_and_names_records() {
        let zones = vec![Zone::new("C.8", Rect::from_bounds(0.0, 120.0, 0.0, 80.0))];
        let group = &BuildingGroup::defaults()[2];
        let placed = place_building_group(group, &zones, &FootprintCatalog::default(), &FitOptions::default());
        assert_eq!(placed.len(), 6);
        assert_eq!(placed[0].id, "C.8-decor-1");
        assert_eq!(placed[0].model.as_deref(), Some("decor_fountain"));
        assert_eq!(placed[4].model.as_deref(), Some("decor_kiosk"));
        assert!(placed.iter().all(|r| r.kind == EntityKind::Decorative));
    }

    #[test]
    fn missing_zone_is_skipped() {
        let group = &BuildingGroup::defaults()[0];
        let placed = place_building_group(group, &[], &FootprintCatalog::default(), &FitOptions::default());
        assert!(placed.is_empty());
    }
}
