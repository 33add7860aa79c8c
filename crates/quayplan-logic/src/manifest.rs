//! Placement records and the layout manifest handed to the renderer.
//!
//! A manifest is rebuilt from scratch on every inventory refresh. Records are
//! plain data: an id, a kind, a position, a rotation and a footprint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{rotated_bounds, Footprint, Rect, Vec3};
use crate::plot::{Layout, RoadSegment, TerminalPlot, Volume, Zone};

/// What a placement record stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Dock,
    Vessel,
    StorageArea,
    Container,
    Resource,
    ParkingStall,
    ParkedCar,
    Car,
    Truck,
    LightPole,
    Tree,
    Workshop,
    Office,
    Decorative,
    YardContainer,
}

/// Which rectangle a record of a given kind must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// The zone, sub-zone or road named by the record's `source`.
    Source,
    /// The plot as a whole.
    Plot,
}

impl EntityKind {
    pub fn containment(self) -> Containment {
        match self {
            EntityKind::LightPole | EntityKind::Tree => Containment::Plot,
            _ => Containment::Source,
        }
    }

    /// Kinds that live on or beside the road bands rather than in a zone.
    pub fn is_road_bound(self) -> bool {
        matches!(
            self,
            EntityKind::Car | EntityKind::Truck | EntityKind::LightPole | EntityKind::Tree
        )
    }

    /// Kinds stacked in tiers at a shared (x, z).
    pub fn is_stacked(self) -> bool {
        matches!(self, EntityKind::Container | EntityKind::YardContainer)
    }
}

/// The sole output unit of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub rotation_y: f32,
    pub footprint: Footprint,
    /// Intentionally projects past its zone (docks, vessels, quay cranes).
    #[serde(default)]
    pub overhang: bool,
    /// Zone, sub-zone or road the record was placed in.
    #[serde(default)]
    pub source: Option<String>,
    /// Catalog model the renderer should load, when the kind alone is ambiguous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PlacementRecord {
    pub fn new(
        id: impl Into<String>,
        kind: EntityKind,
        position: Vec3,
        rotation_y: f32,
        footprint: Footprint,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            rotation_y,
            footprint,
            overhang: false,
            source: None,
            model: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn overhanging(mut self) -> Self {
        self.overhang = true;
        self
    }

    /// Axis-aligned plan-view bounds of the rotated footprint.
    pub fn world_rect(&self) -> Rect {
        rotated_bounds(
            self.position.x,
            self.position.z,
            self.footprint.width,
            self.footprint.depth,
            self.rotation_y,
        )
    }
}

/// Everything one layout pass produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutManifest {
    pub seed: u64,
    pub plot: TerminalPlot,
    pub water: Volume,
    pub slab: Volume,
    /// Macro-zones A, B, C.
    pub zones: Vec<Zone>,
    pub subzones: Vec<Zone>,
    pub roads: Vec<RoadSegment>,
    pub records: BTreeMap<EntityKind, Vec<PlacementRecord>>,
}

impl LayoutManifest {
    /// An empty manifest carrying the geometry of `layout`.
    pub fn new(seed: u64, layout: &Layout, subzones: Vec<Zone>) -> Self {
        Self {
            seed,
            plot: layout.plot,
            water: layout.water,
            slab: layout.slab,
            zones: layout.zones().into_iter().cloned().collect(),
            subzones,
            roads: layout.roads.to_vec(),
            records: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, record: PlacementRecord) {
        self.records.entry(record.kind).or_default().push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = PlacementRecord>) {
        for r in records {
            self.push(r);
        }
    }

    /// Records of one kind, in placement order.
    pub fn of_kind(&self, kind: EntityKind) -> &[PlacementRecord] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.of_kind(kind).len()
    }

    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Flattened view for the renderer, grouped by kind.
    pub fn records(&self) -> impl Iterator<Item = &PlacementRecord> {
        self.records.values().flatten()
    }

    /// Rectangle of the zone, sub-zone or road with this id.
    pub fn region(&self, id: &str) -> Option<Rect> {
        self.zones
            .iter()
            .chain(self.subzones.iter())
            .find(|z| z.id == id)
            .map(|z| z.rect)
            .or_else(|| self.roads.iter().find(|r| r.name == id).map(|r| r.rect))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::partition;
    use std::f32::consts::FRAC_PI_2;

    fn record(id: &str, kind: EntityKind) -> PlacementRecord {
        PlacementRecord::new(
            id,
            kind,
            Vec3::new(1.0, 0.5, 2.0),
            0.0,
            Footprint::new(4.0, 2.0, 1.0),
        )
    }

    #[test]
    fn records_grouped_by_kind() {
        let layout = partition(&TerminalPlot::default());
        let mut m = LayoutManifest::new(1, &layout, Vec::new());
        m.push(record("t1", EntityKind::Tree));
        m.push(record("d1", EntityKind::Dock));
        m.push(record("t2", EntityKind::Tree));
        assert_eq!(m.count(EntityKind::Tree), 2);
        assert_eq!(m.count(EntityKind::Vessel), 0);
        assert_eq!(m.total(), 3);
        // Dock sorts before Tree.
        let ids: Vec<_> = m.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "t1", "t2"]);
    }

    #[test]
    fn world_rect_respects_rotation() {
        let mut r = record("x", EntityKind::Dock);
        assert!((r.world_rect().width() - 4.0).abs() < 1e-4);
        r.rotation_y = FRAC_PI_2;
        assert!((r.world_rect().width() - 2.0).abs() < 1e-4);
        assert!((r.world_rect().depth() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn region_lookup_covers_zones_and_roads() {
        let layout = partition(&TerminalPlot::default());
        let m = LayoutManifest::new(1, &layout, Vec::new());
        assert_eq!(m.region("C"), Some(layout.zone_c.rect));
        assert_eq!(m.region("cross_z"), Some(layout.roads.cross_z.rect));
        assert!(m.region("Z.9").is_none());
    }

    #[test]
    fn road_bound_kinds() {
        assert!(EntityKind::Truck.is_road_bound());
        assert!(EntityKind::Tree.is_road_bound());
        assert!(!EntityKind::ParkedCar.is_road_bound());
        assert!(!EntityKind::Dock.is_road_bound());
    }

    #[test]
    fn builder_flags() {
        let r = record("v", EntityKind::Vessel)
            .with_source("C.1")
            .with_model("quay_crane")
            .overhanging();
        assert!(r.overhang);
        assert_eq!(r.model.as_deref(), Some("quay_crane"));
        assert_eq!(r.source.as_deref(), Some("C.1"));
    }

    #[test]
    fn manifest_serializes() {
        let layout = partition(&TerminalPlot::default());
        let mut m = LayoutManifest::new(5, &layout, Vec::new());
        m.push(record("d1", EntityKind::Dock));
        let json = m.to_json().unwrap();
        assert!(json.contains("\"Dock\""));
        let back: LayoutManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
