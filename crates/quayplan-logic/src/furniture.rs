//! Light poles and trees along the roads.

use serde::{Deserialize, Serialize};

use crate::catalog::FootprintCatalog;
use crate::geometry::{sanitize, Rect, Vec3};
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::{Orientation, RoadSegment};

/// Light poles: one row on the side of each road facing the plot center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoleOptions {
    /// Distance between poles along a road.
    pub spacing: f32,
    /// Distance from the road edge to the pole.
    pub offset: f32,
    /// Extra distance kept from a crossing road.
    pub clear_margin: f32,
    pub model: String,
}

impl Default for PoleOptions {
    fn default() -> Self {
        Self {
            spacing: 40.0,
            offset: 1.5,
            clear_margin: 4.0,
            model: "light_pole".into(),
        }
    }
}

/// Trees: rows on both sides of each road unless `both_sides` is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    pub spacing: f32,
    pub offset: f32,
    pub clear_margin: f32,
    pub both_sides: bool,
    pub model: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            spacing: 25.0,
            offset: 4.0,
            clear_margin: 6.0,
            both_sides: true,
            model: "tree".into(),
        }
    }
}

struct Lining<'a> {
    spacing: f32,
    offset: f32,
    clear_margin: f32,
    both_sides: bool,
    model: &'a str,
    kind: EntityKind,
    tag: &'a str,
}

/// Roads that cross `road`: the other orientation, touching it once grown by `margin`.
fn crossing<'a>(
    road: &RoadSegment,
    roads: &'a [RoadSegment],
    margin: f32,
) -> impl Iterator<Item = &'a RoadSegment> {
    let reach = road.rect.expand(margin);
    let orientation = road.orientation;
    roads
        .iter()
        .filter(move |r| r.orientation != orientation && r.rect.expand(margin).overlaps(&reach))
}

/// Side of the road facing the plot center, as a sign on the cross axis.
fn inner_side(road: &RoadSegment) -> f32 {
    if road.cut_line() > 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn place_along_roads(
    roads: &[RoadSegment],
    plot: &Rect,
    lining: &Lining,
    catalog: &FootprintCatalog,
) -> Vec<PlacementRecord> {
    let spacing = sanitize(lining.spacing, 1.0);
    let offset = sanitize(lining.offset, 0.0);
    let margin = sanitize(lining.clear_margin, 0.0);
    let fp = catalog.resolve(lining.model);

    let mut out = Vec::new();
    for road in roads {
        if road.rect.is_degenerate() {
            continue;
        }
        let crossings: Vec<&RoadSegment> = crossing(road, roads, margin).collect();
        let sides: &[f32] = if lining.both_sides {
            &[-1.0, 1.0]
        } else if inner_side(road) < 0.0 {
            &[-1.0]
        } else {
            &[1.0]
        };
        let lateral = road.width() / 2.0 + offset;
        let cut = road.cut_line();
        let r = &road.rect;
        let (start, end) = match road.orientation {
            Orientation::X => (r.min_x, r.max_x),
            Orientation::Z => (r.min_z, r.max_z),
        };

        let mut n = 0usize;
        let mut along = start + spacing / 2.0;
        while along <= end {
            let blocked = crossings
                .iter()
                .any(|c| (along - c.cut_line()).abs() < c.width() / 2.0 + margin);
            if !blocked {
                for &side in sides {
                    let (x, z) = match road.orientation {
                        Orientation::X => (along, cut + side * lateral),
                        Orientation::Z => (cut + side * lateral, along),
                    };
                    if !plot.contains_rect(&Rect::from_center(x, z, fp.width, fp.depth)) {
                        continue;
                    }
                    n += 1;
                    out.push(
                        PlacementRecord::new(
                            format!("{}-{}{}", road.name, lining.tag, n),
                            lining.kind,
                            Vec3::new(x, fp.height / 2.0, z),
                            0.0,
                            fp,
                        )
                        .with_source(road.name.clone())
                        .with_model(lining.model),
                    );
                }
            }
            along += spacing;
        }
    }
    out
}

/// Light poles on the inner side of every road.
pub fn add_poles(
    roads: &[RoadSegment],
    plot: &Rect,
    opts: &PoleOptions,
    catalog: &FootprintCatalog,
) -> Vec<PlacementRecord> {
    let lining = Lining {
        spacing: opts.spacing,
        offset: opts.offset,
        clear_margin: opts.clear_margin,
        both_sides: false,
        model: &opts.model,
        kind: EntityKind::LightPole,
        tag: "L",
    };
    place_along_roads(roads, plot, &lining, catalog)
}

/// Trees lining the roads.
pub fn add_trees(
    roads: &[RoadSegment],
    plot: &Rect,
    opts: &TreeOptions,
    catalog: &FootprintCatalog,
) -> Vec<PlacementRecord> {
    let lining = Lining {
        spacing: opts.spacing,
        offset: opts.offset,
        clear_margin: opts.clear_margin,
        both_sides: opts.both_sides,
        model: &opts.model,
        kind: EntityKind::Tree,
        tag: "T",
    };
    place_along_roads(roads, plot, &lining, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{partition, TerminalPlot};

    fn setup() -> (Vec<RoadSegment>, Rect) {
        let layout = partition(&TerminalPlot::default());
        (layout.roads.to_vec(), layout.plot.rect())
    }

    #[test]
    fn poles_stay_on_plot() {
        let (roads, plot) = setup();
        let poles = add_poles(&roads, &plot, &PoleOptions::default(), &FootprintCatalog::default());
        assert!(!poles.is_empty());
        assert!(poles.iter().all(|p| plot.contains_rect(&p.world_rect())));
        assert!(poles.iter().all(|p| p.kind == EntityKind::LightPole));
    }

    #[test]
    fn poles_face_plot_center() {
        let (roads, plot) = setup();
        let poles = add_poles(&roads, &plot, &PoleOptions::default(), &FootprintCatalog::default());
        for p in poles.iter().filter(|p| p.source.as_deref() == Some("north")) {
            assert!(p.position.z > -594.0, "north pole on the water side");
        }
        for p in poles.iter().filter(|p| p.source.as_deref() == Some("east")) {
            assert!(p.position.x < 594.0);
        }
    }

    #[test]
    fn trees_line_both_sides_but_not_outside() {
        let (roads, plot) = setup();
        let trees = add_trees(&roads, &plot, &TreeOptions::default(), &FootprintCatalog::default());
        let cross: Vec<_> = trees
            .iter()
            .filter(|t| t.source.as_deref() == Some("cross_x"))
            .collect();
        assert!(cross.iter().any(|t| t.position.z > 0.0));
        assert!(cross.iter().any(|t| t.position.z < 0.0));
        // Perimeter roads lose their outer row.
        assert!(trees
            .iter()
            .filter(|t| t.source.as_deref() == Some("north"))
            .all(|t| t.position.z > -594.0));
    }

    #[test]
    fn crossings_are_kept_clear() {
        let (roads, plot) = setup();
        let trees = add_trees(&roads, &plot, &TreeOptions::default(), &FootprintCatalog::default());
        let cross_z = roads.iter().find(|r| r.name == "cross_z").unwrap();
        for t in trees.iter().filter(|t| t.source.as_deref() == Some("cross_x")) {
            assert!(
                (t.position.x - cross_z.cut_line()).abs() >= cross_z.width() / 2.0 + 6.0,
                "tree {} at x={} blocks the crossing",
                t.id,
                t.position.x
            );
        }
    }

    #[test]
    fn spacing_controls_density() {
        let (roads, plot) = setup();
        let catalog = FootprintCatalog::default();
        let dense = PoleOptions {
            spacing: 20.0,
            ..PoleOptions::default()
        };
        let sparse = PoleOptions {
            spacing: 80.0,
            ..PoleOptions::default()
        };
        assert!(
            add_poles(&roads, &plot, &dense, &catalog).len()
                > add_poles(&roads, &plot, &sparse, &catalog).len()
        );
    }
}
