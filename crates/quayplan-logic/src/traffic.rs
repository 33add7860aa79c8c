//! Vehicles on the road network.
//!
//! The requested total is split over road segments in proportion to their
//! length using largest-remainder apportionment, then every segment is
//! raised to a minimum. Inside a segment each vehicle gets a random lane
//! and a random position along the road; lanes in the first half drive one
//! way and the rest the other.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::catalog::FootprintCatalog;
use crate::geometry::{sanitize, sanitize_range, Vec3};
use crate::manifest::{EntityKind, PlacementRecord};
use crate::plot::{Orientation, RoadSegment};
use crate::rng::LayoutRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficOptions {
    /// Vehicles to spread over the whole network before minimums apply.
    pub approx_total: usize,
    pub min_per_road: usize,
    pub lane_width: f32,
    /// Unused strip at both road edges.
    pub edge_margin: f32,
    /// Vehicles keep this far from either end of a segment.
    pub end_margin: f32,
    /// Chance that a vehicle is a truck.
    pub truck_ratio: f32,
    pub car_model: String,
    pub truck_model: String,
}

impl Default for TrafficOptions {
    fn default() -> Self {
        Self {
            approx_total: 60,
            min_per_road: 1,
            lane_width: 3.5,
            edge_margin: 0.5,
            end_margin: 6.0,
            truck_ratio: 0.3,
            car_model: "car".into(),
            truck_model: "truck".into(),
        }
    }
}

/// Split `total` over `lengths` by largest remainder.
///
/// Each entry first gets `floor(total × len / sum)`; the leftover units go
/// to the largest fractional parts, ties to the lower index. The result
/// always sums to `total` unless every length is zero.
pub fn apportion(lengths: &[f32], total: usize) -> Vec<usize> {
    let lengths: Vec<f64> = lengths.iter().map(|&l| sanitize(l, 0.0) as f64).collect();
    let sum: f64 = lengths.iter().sum();
    if sum <= 0.0 || total == 0 {
        return vec![0; lengths.len()];
    }

    let quotas: Vec<f64> = lengths.iter().map(|l| total as f64 * l / sum).collect();
    let mut counts: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();

    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = quotas[a] - quotas[a].floor();
        let fb = quotas[b] - quotas[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    for &i in order.iter().take(total.saturating_sub(assigned)) {
        counts[i] += 1;
    }
    counts
}

/// Raise every count to at least `min`. The total grows by the shortfall.
pub fn apply_minimum(counts: &[usize], min: usize) -> Vec<usize> {
    counts.iter().map(|&c| c.max(min)).collect()
}

/// Per-segment vehicle counts for `roads`.
pub fn traffic_counts(roads: &[RoadSegment], opts: &TrafficOptions) -> Vec<usize> {
    let lengths: Vec<f32> = roads.iter().map(RoadSegment::length).collect();
    apply_minimum(&apportion(&lengths, opts.approx_total), opts.min_per_road)
}

/// Lanes that fit across `road`; never fewer than one.
pub fn lane_count(road: &RoadSegment, opts: &TrafficOptions) -> usize {
    let usable = road.width() - 2.0 * sanitize(opts.edge_margin, 0.0);
    let lane = sanitize(opts.lane_width, 0.5);
    ((usable / lane).floor().max(0.0) as usize).max(1)
}

/// Cars and trucks on every road segment.
pub fn add_traffic(
    roads: &[RoadSegment],
    opts: &TrafficOptions,
    catalog: &FootprintCatalog,
    rng: &mut LayoutRng,
) -> Vec<PlacementRecord> {
    let counts = traffic_counts(roads, opts);
    let car = catalog.resolve(&opts.car_model);
    let truck = catalog.resolve(&opts.truck_model);
    let truck_ratio = sanitize_range(opts.truck_ratio, 0.0, 1.0);
    let edge = sanitize(opts.edge_margin, 0.0);
    let end = sanitize(opts.end_margin, 0.0);

    let mut out = Vec::new();
    for (road, &count) in roads.iter().zip(&counts) {
        if road.rect.is_degenerate() {
            log::warn!("Road {} is degenerate; no traffic", road.name);
            continue;
        }
        let lanes = lane_count(road, opts);
        let pitch = (road.width() - 2.0 * edge).max(0.0) / lanes as f32;
        let r = &road.rect;
        let (along_min, along_max, cross_min) = match road.orientation {
            Orientation::X => (r.min_x, r.max_x, r.min_z),
            Orientation::Z => (r.min_z, r.max_z, r.min_x),
        };

        for n in 0..count {
            let lane = rng.index(lanes);
            let is_truck = rng.chance(truck_ratio);
            let (kind, fp, model) = if is_truck {
                (EntityKind::Truck, truck, &opts.truck_model)
            } else {
                (EntityKind::Car, car, &opts.car_model)
            };

            let half_len = fp.width / 2.0;
            let lo = along_min + end + half_len;
            let hi = along_max - end - half_len;
            let along = if hi > lo {
                rng.range(lo, hi)
            } else {
                (along_min + along_max) / 2.0
            };
            let across = cross_min + edge + (lane as f32 + 0.5) * pitch;
            let forward = lane * 2 < lanes;

            let (x, z, rotation_y) = match road.orientation {
                Orientation::X => (along, across, if forward { 0.0 } else { PI }),
                Orientation::Z => (across, along, if forward { FRAC_PI_2 } else { -FRAC_PI_2 }),
            };

            out.push(
                PlacementRecord::new(
                    format!("{}-v{}", road.name, n + 1),
                    kind,
                    Vec3::new(x, fp.height / 2.0, z),
                    rotation_y,
                    fp,
                )
                .with_source(road.name.clone())
                .with_model(model.clone()),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{partition, TerminalPlot};

    #[test]
    fn apportion_largest_remainder() {
        let counts = apportion(&[100.0, 100.0, 50.0, 50.0, 20.0, 20.0], 100);
        assert_eq!(counts, vec![29, 29, 15, 15, 6, 6]);
        let counts = apply_minimum(&counts, 1);
        assert!(counts.iter().all(|&c| c >= 1));
        assert_eq!(counts.iter().sum::<usize>(), 100);
    }

    #[test]
    fn apportion_ties_go_to_lower_index() {
        assert_eq!(apportion(&[1.0, 1.0, 1.0], 2), vec![1, 1, 0]);
        assert_eq!(apportion(&[0.0, 0.0], 5), vec![0, 0]);
        assert_eq!(apportion(&[f32::NAN, 10.0], 3), vec![0, 3]);
    }

    #[test]
    fn minimum_adds_shortfall() {
        let counts = apply_minimum(&apportion(&[1000.0, 1.0, 1.0], 10), 2);
        assert_eq!(counts, vec![10, 2, 2]);
    }

    #[test]
    fn lanes_from_width() {
        let layout = partition(&TerminalPlot::default());
        assert_eq!(lane_count(&layout.roads.north, &TrafficOptions::default()), 3);
        let narrow = RoadSegment::new(
            "n",
            crate::geometry::Rect::from_bounds(0.0, 100.0, 0.0, 2.0),
            Orientation::X,
        );
        assert_eq!(lane_count(&narrow, &TrafficOptions::default()), 1);
    }

    #[test]
    fn vehicles_stay_on_their_road() {
        let layout = partition(&TerminalPlot::default());
        let roads = layout.roads.to_vec();
        let mut rng = LayoutRng::from_seed_u64(11);
        let placed = add_traffic(
            &roads,
            &TrafficOptions::default(),
            &FootprintCatalog::default(),
            &mut rng,
        );
        assert_eq!(placed.len(), 60);
        for v in &placed {
            let road = roads.iter().find(|r| Some(&r.name) == v.source.as_ref()).unwrap();
            assert!(road.rect.contains_rect(&v.world_rect()), "{} leaves {}", v.id, road.name);
        }
    }

    #[test]
    fn truck_ratio_extremes() {
        let layout = partition(&TerminalPlot::default());
        let roads = layout.roads.to_vec();
        let catalog = FootprintCatalog::default();
        let all_trucks = TrafficOptions {
            truck_ratio: 1.0,
            ..TrafficOptions::default()
        };
        let placed = add_traffic(&roads, &all_trucks, &catalog, &mut LayoutRng::default());
        assert!(placed.iter().all(|v| v.kind == EntityKind::Truck));
        let no_trucks = TrafficOptions {
            truck_ratio: 0.0,
            ..TrafficOptions::default()
        };
        let placed = add_traffic(&roads, &no_trucks, &catalog, &mut LayoutRng::default());
        assert!(placed.iter().all(|v| v.kind == EntityKind::Car));
    }

    #[test]
    fn every_segment_gets_its_minimum() {
        let layout = partition(&TerminalPlot::default());
        let roads = layout.roads.to_vec();
        let opts = TrafficOptions {
            approx_total: 0,
            min_per_road: 2,
            ..TrafficOptions::default()
        };
        let placed = add_traffic(&roads, &opts, &FootprintCatalog::default(), &mut LayoutRng::default());
        for road in &roads {
            let n = placed
                .iter()
                .filter(|v| v.source.as_deref() == Some(road.name.as_str()))
                .count();
            assert_eq!(n, 2, "road {}", road.name);
        }
    }
}
