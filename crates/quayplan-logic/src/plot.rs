//! Terminal plot partitioning.
//!
//! The plot is centered at the origin with the quay edge on its `min_z` side.
//! Partitioning produces the water body, the quay slab, three macro-zones and
//! six road bands:
//!
//! ```text
//!                water (quay edge, min_z)
//!     ┌──────────────── north ────────────────┐
//!     │w│                                    │e│
//!     │e│              zone C                │a│
//!     │s│                                    │s│
//!     │t│────────────── cross_x ─────────────│t│
//!     │ │     zone A     │c│     zone B      │ │
//!     │ │                │z│                 │ │
//!     └──────────────── south ────────────────┘
//! ```
//!
//! Zones and roads tile the plot exactly; no two pieces share interior area.
//!
//! ```
//! use quayplan_logic::plot::{partition, TerminalPlot};
//!
//! let layout = partition(&TerminalPlot::default());
//! assert!(layout.zone_c.rect.area() > layout.zone_a.rect.area());
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::{sanitize, sanitize_range, Rect};

/// Static terminal dimensions. Immutable for the duration of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalPlot {
    /// Extent along X in meters.
    pub width: f32,
    /// Extent along Z in meters.
    pub depth: f32,
    /// How far the water body reaches past the plot on every side.
    pub water_margin: f32,
    /// Width of every road band.
    pub road_width: f32,
    /// Snapping step for grid-aligned values.
    pub grid_step: f32,
    /// Thickness of the quay slab below ground level.
    pub slab_thickness: f32,
    /// Drop from ground level to the water surface.
    pub water_gap: f32,
    /// Depth of the water body below its surface.
    pub water_depth: f32,
}

impl Default for TerminalPlot {
    fn default() -> Self {
        Self {
            width: 1200.0,
            depth: 1200.0,
            water_margin: 100.0,
            road_width: 12.0,
            grid_step: 10.0,
            slab_thickness: 2.0,
            water_gap: 1.5,
            water_depth: 20.0,
        }
    }
}

impl TerminalPlot {
    /// Copy with every field clamped to a safe value.
    pub fn sanitized(&self) -> Self {
        let width = sanitize(self.width, 1.0);
        let depth = sanitize(self.depth, 1.0);
        Self {
            width,
            depth,
            water_margin: sanitize(self.water_margin, 0.0),
            road_width: sanitize_range(self.road_width, 0.0, width.min(depth) / 4.0),
            grid_step: sanitize(self.grid_step, 0.1),
            slab_thickness: sanitize(self.slab_thickness, 0.1),
            water_gap: sanitize(self.water_gap, 0.0),
            water_depth: sanitize(self.water_depth, 0.1),
        }
    }

    /// The plot footprint.
    pub fn rect(&self) -> Rect {
        Rect::from_center(0.0, 0.0, self.width, self.depth)
    }

    /// Y of the water surface.
    pub fn water_level(&self) -> f32 {
        -self.water_gap
    }
}

/// A named rectangular region. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub rect: Rect,
}

impl Zone {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.rect.center_x(), self.rect.center_z())
    }

    /// (width, depth)
    pub fn size(&self) -> (f32, f32) {
        (self.rect.width(), self.rect.depth())
    }
}

/// Axis a road runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    X,
    Z,
}

/// A road band. Placers keep their footprints out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub name: String,
    pub rect: Rect,
    pub orientation: Orientation,
}

impl RoadSegment {
    pub fn new(name: impl Into<String>, rect: Rect, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            rect,
            orientation,
        }
    }

    /// Extent along the road's own axis.
    pub fn length(&self) -> f32 {
        match self.orientation {
            Orientation::X => self.rect.width(),
            Orientation::Z => self.rect.depth(),
        }
    }

    /// Extent across the road.
    pub fn width(&self) -> f32 {
        match self.orientation {
            Orientation::X => self.rect.depth(),
            Orientation::Z => self.rect.width(),
        }
    }

    /// Start and end of the centerline as `((x, z), (x, z))`.
    pub fn centerline(&self) -> ((f32, f32), (f32, f32)) {
        let r = &self.rect;
        match self.orientation {
            Orientation::X => ((r.min_x, r.center_z()), (r.max_x, r.center_z())),
            Orientation::Z => ((r.center_x(), r.min_z), (r.center_x(), r.max_z)),
        }
    }

    /// Coordinate of the centerline on the cross axis (z for X roads, x for Z roads).
    pub fn cut_line(&self) -> f32 {
        match self.orientation {
            Orientation::X => self.rect.center_z(),
            Orientation::Z => self.rect.center_x(),
        }
    }
}

/// The six road bands of a partitioned plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roads {
    pub north: RoadSegment,
    pub south: RoadSegment,
    pub east: RoadSegment,
    pub west: RoadSegment,
    pub cross_x: RoadSegment,
    pub cross_z: RoadSegment,
}

impl Roads {
    /// All segments in a fixed order.
    pub fn all(&self) -> [&RoadSegment; 6] {
        [
            &self.north,
            &self.south,
            &self.east,
            &self.west,
            &self.cross_x,
            &self.cross_z,
        ]
    }

    pub fn to_vec(&self) -> Vec<RoadSegment> {
        self.all().into_iter().cloned().collect()
    }
}

/// A slab of space between two elevations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub rect: Rect,
    pub bottom: f32,
    pub top: f32,
}

/// The water-facing edge of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuayEdge {
    pub z: f32,
    pub min_x: f32,
    pub max_x: f32,
}

/// Output of [`partition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub plot: TerminalPlot,
    pub water: Volume,
    pub slab: Volume,
    pub zone_a: Zone,
    pub zone_b: Zone,
    pub zone_c: Zone,
    pub roads: Roads,
    pub quay_edge: QuayEdge,
}

impl Layout {
    pub fn zones(&self) -> [&Zone; 3] {
        [&self.zone_a, &self.zone_b, &self.zone_c]
    }
}

/// Partition a plot into water, slab, macro-zones and roads.
///
/// Inputs are sanitized first, so this never fails.
pub fn partition(plot: &TerminalPlot) -> Layout {
    let plot = plot.sanitized();
    let hw = plot.width / 2.0;
    let hd = plot.depth / 2.0;
    let r = plot.road_width;
    let half_r = r / 2.0;

    let roads = Roads {
        north: RoadSegment::new(
            "north",
            Rect::from_bounds(-hw, hw, -hd, -hd + r),
            Orientation::X,
        ),
        south: RoadSegment::new(
            "south",
            Rect::from_bounds(-hw, hw, hd - r, hd),
            Orientation::X,
        ),
        east: RoadSegment::new(
            "east",
            Rect::from_bounds(hw - r, hw, -hd + r, hd - r),
            Orientation::Z,
        ),
        west: RoadSegment::new(
            "west",
            Rect::from_bounds(-hw, -hw + r, -hd + r, hd - r),
            Orientation::Z,
        ),
        cross_x: RoadSegment::new(
            "cross_x",
            Rect::from_bounds(-hw + r, hw - r, -half_r, half_r),
            Orientation::X,
        ),
        cross_z: RoadSegment::new(
            "cross_z",
            Rect::from_bounds(-half_r, half_r, half_r, hd - r),
            Orientation::Z,
        ),
    };

    let zone_c = Zone::new("C", Rect::from_bounds(-hw + r, hw - r, -hd + r, -half_r));
    let zone_a = Zone::new("A", Rect::from_bounds(-hw + r, -half_r, half_r, hd - r));
    let zone_b = Zone::new("B", Rect::from_bounds(half_r, hw - r, half_r, hd - r));

    let water_top = plot.water_level();
    let water = Volume {
        rect: plot.rect().expand(plot.water_margin),
        bottom: water_top - plot.water_depth,
        top: water_top,
    };
    let slab = Volume {
        rect: plot.rect(),
        bottom: -plot.slab_thickness,
        top: 0.0,
    };

    log::debug!(
        "Partitioned {}×{} plot: zone C {:.0}×{:.0}, zones A/B {:.0}×{:.0}",
        plot.width,
        plot.depth,
        zone_c.rect.width(),
        zone_c.rect.depth(),
        zone_a.rect.width(),
        zone_a.rect.depth()
    );

    Layout {
        plot,
        water,
        slab,
        zone_a,
        zone_b,
        zone_c,
        roads,
        quay_edge: QuayEdge {
            z: -hd,
            min_x: -hw,
            max_x: hw,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(layout: &Layout) -> Vec<Rect> {
        let mut v: Vec<Rect> = layout.zones().iter().map(|z| z.rect).collect();
        v.extend(layout.roads.all().iter().map(|r| r.rect));
        v
    }

    #[test]
    fn default_plot_values() {
        let plot = TerminalPlot::default();
        assert_eq!(plot.width, 1200.0);
        assert_eq!(plot.road_width, 12.0);
        assert!((plot.water_level() + 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn zones_and_roads_tile_plot() {
        let layout = partition(&TerminalPlot::default());
        let all = pieces(&layout);
        let total: f32 = all.iter().map(|r| r.area()).sum();
        let plot_area = layout.plot.rect().area();
        assert!(
            (total - plot_area).abs() / plot_area < 1e-4,
            "pieces {total} vs plot {plot_area}"
        );
        for i in 0..all.len() {
            assert!(layout.plot.rect().contains_rect(&all[i]));
            for j in (i + 1)..all.len() {
                assert!(!all[i].overlaps(&all[j]), "pieces {i} and {j} overlap");
            }
        }
    }

    #[test]
    fn zone_c_is_quay_half() {
        let layout = partition(&TerminalPlot::default());
        let c = &layout.zone_c.rect;
        assert!(c.center_x().abs() < 1e-4, "zone C centered in X");
        assert!(c.max_z <= 0.0);
        assert!(c.min_z > layout.quay_edge.z);
        assert!(layout.zone_a.rect.max_x <= layout.zone_b.rect.min_x);
    }

    #[test]
    fn water_surrounds_plot() {
        let layout = partition(&TerminalPlot::default());
        assert!(layout.water.rect.contains_rect(&layout.plot.rect()));
        assert!((layout.water.rect.width() - 1400.0).abs() < 1e-3);
        assert!(layout.water.top < layout.slab.top);
        assert!(layout.water.bottom < layout.water.top);
    }

    #[test]
    fn degenerate_input_is_clamped() {
        let plot = TerminalPlot {
            width: f32::NAN,
            depth: -20.0,
            road_width: 500.0,
            ..TerminalPlot::default()
        };
        let layout = partition(&plot);
        assert_eq!(layout.plot.width, 1.0);
        assert_eq!(layout.plot.depth, 1.0);
        assert!(layout.plot.road_width <= 0.25);
        assert!(layout.zone_c.rect.width() >= 0.0);
    }

    #[test]
    fn road_lengths_follow_orientation() {
        let layout = partition(&TerminalPlot::default());
        assert!((layout.roads.north.length() - 1200.0).abs() < 1e-3);
        assert!((layout.roads.cross_x.length() - 1176.0).abs() < 1e-3);
        assert!((layout.roads.cross_z.length() - 582.0).abs() < 1e-3);
        assert!((layout.roads.west.width() - 12.0).abs() < 1e-3);
        let ((x0, z0), (x1, z1)) = layout.roads.cross_z.centerline();
        assert_eq!(x0, x1);
        assert!(z1 > z0);
    }
}
