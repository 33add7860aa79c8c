//! Integration tests for the full layout pipeline.
//!
//! Exercises: Inventory JSON → LayoutConfig → compute_layout → validation
//! → ManifestStore.
//!
//! All tests are pure logic: no renderer and no I/O beyond the bundled demo data.

use quayplan_logic::config::LayoutConfig;
use quayplan_logic::docks::DOCK_EDGE_FILL;
use quayplan_logic::inventory::{DockInfo, Inventory, StorageAreaInfo};
use quayplan_logic::layout::compute_layout;
use quayplan_logic::manifest::{EntityKind, LayoutManifest};
use quayplan_logic::plot::TerminalPlot;
use quayplan_logic::store::ManifestStore;
use quayplan_logic::traffic::{apply_minimum, apportion};
use quayplan_logic::validation::{check_road_clearance, errors_only, validate_manifest};

// ── Helpers ────────────────────────────────────────────────────────────

const DEMO: &str = include_str!("../../../data/demo_inventory.json");

fn demo_inventory() -> Inventory {
    Inventory::from_json_str(DEMO).expect("demo inventory parses")
}

fn with_seed(seed: u64) -> LayoutConfig {
    LayoutConfig {
        seed,
        ..LayoutConfig::default()
    }
}

fn assert_valid(manifest: &LayoutManifest, config: &LayoutConfig) {
    let results = validate_manifest(manifest, config);
    let errors = errors_only(&results);
    assert!(
        errors.is_empty(),
        "seed {}: {} validation errors, first: {:?}",
        config.seed,
        errors.len(),
        errors.first()
    );
}

// ── Pipeline coherence ─────────────────────────────────────────────────

#[test]
fn demo_layout_validates() {
    let config = LayoutConfig::default();
    let manifest = compute_layout(&demo_inventory(), &config);
    assert_valid(&manifest, &config);
    assert_eq!(manifest.count(EntityKind::Dock), 8);
    assert_eq!(manifest.count(EntityKind::Vessel), 6);
    assert_eq!(manifest.count(EntityKind::StorageArea), 25);
    assert_eq!(manifest.count(EntityKind::Container), 60);
    assert_eq!(manifest.count(EntityKind::Resource), 14);
}

#[test]
fn default_layout_validates_across_seeds() {
    let inventory = demo_inventory();
    for seed in [0, 1, 7, 42, 1234, u64::MAX] {
        let config = with_seed(seed);
        let manifest = compute_layout(&inventory, &config);
        assert_valid(&manifest, &config);
    }
}

#[test]
fn same_seed_same_bytes() {
    let inventory = demo_inventory();
    let config = with_seed(99);
    let a = compute_layout(&inventory, &config).to_json().unwrap();
    let b = compute_layout(&inventory, &config).to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seeds_move_random_entities() {
    let inventory = demo_inventory();
    let a = compute_layout(&inventory, &with_seed(1));
    let b = compute_layout(&inventory, &with_seed(2));
    assert_ne!(a.of_kind(EntityKind::Car), b.of_kind(EntityKind::Car));
    // Deterministic placers ignore the seed.
    assert_eq!(a.of_kind(EntityKind::Dock), b.of_kind(EntityKind::Dock));
    assert_eq!(a.of_kind(EntityKind::StorageArea), b.of_kind(EntityKind::StorageArea));
}

#[test]
fn manifest_json_roundtrips() {
    let manifest = compute_layout(&demo_inventory(), &LayoutConfig::default());
    let json = manifest.to_json_pretty().unwrap();
    let back: LayoutManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.total(), manifest.total());
    assert_eq!(back.of_kind(EntityKind::Vessel), manifest.of_kind(EntityKind::Vessel));
}

// ── Concrete scenarios ─────────────────────────────────────────────────

#[test]
fn eight_docks_on_1200m_plot() {
    let inventory = Inventory {
        docks: (0..8)
            .map(|i| DockInfo {
                id: format!("D{}", i + 1),
                length: Some(400.0),
            })
            .collect(),
        ..Inventory::default()
    };
    let config = LayoutConfig::default();
    assert_eq!(config.plot.width, 1200.0);
    let manifest = compute_layout(&inventory, &config);
    let docks = manifest.of_kind(EntityKind::Dock);
    assert_eq!(docks.len(), 8);
    for d in docks {
        let edge = if d.rotation_y == 0.0 {
            manifest.region(d.source.as_deref().unwrap()).unwrap().width()
        } else {
            manifest.region(d.source.as_deref().unwrap()).unwrap().depth()
        };
        assert!(d.footprint.width <= DOCK_EDGE_FILL * edge + 1e-3, "dock {} too long", d.id);
        assert!(
            d.rotation_y == 0.0 || (d.rotation_y - std::f32::consts::FRAC_PI_2).abs() < 1e-6,
            "dock {} rotated {}",
            d.id,
            d.rotation_y
        );
    }
}

#[test]
fn twenty_five_storage_areas_fill_b1_then_b2() {
    let inventory = Inventory {
        storage_areas: (0..25)
            .map(|i| StorageAreaInfo {
                id: format!("S{}", i + 1),
                ..StorageAreaInfo::default()
            })
            .collect(),
        ..Inventory::default()
    };
    let manifest = compute_layout(&inventory, &LayoutConfig::default());
    let areas = manifest.of_kind(EntityKind::StorageArea);
    assert_eq!(areas.len(), 25);
    assert!(areas[..10].iter().all(|a| a.source.as_deref() == Some("B.1")));
    assert!(areas[10..].iter().all(|a| a.source.as_deref() == Some("B.2")));

    let used: f32 = areas.iter().map(|a| a.footprint.area()).sum();
    let available: f32 = ["B.1", "B.2"]
        .iter()
        .map(|id| manifest.region(id).unwrap().area())
        .sum();
    assert!(used <= available);
}

#[test]
fn traffic_apportionment_scenario() {
    let counts = apply_minimum(&apportion(&[100.0, 100.0, 50.0, 50.0, 20.0, 20.0], 100), 1);
    assert!(counts.iter().all(|&c| c >= 1));
    assert_eq!(counts.iter().sum::<usize>(), 100);
}

#[test]
fn traffic_total_matches_config() {
    let config = LayoutConfig::default();
    let manifest = compute_layout(&Inventory::default(), &config);
    let vehicles = manifest.count(EntityKind::Car) + manifest.count(EntityKind::Truck);
    assert_eq!(vehicles, config.traffic.approx_total);
}

#[test]
fn roads_stay_clear_of_placed_entities() {
    let config = LayoutConfig::default();
    for seed in [3, 42] {
        let manifest = compute_layout(&demo_inventory(), &with_seed(seed));
        assert!(check_road_clearance(&manifest, config.clearance).is_empty());

        let docks = manifest.of_kind(EntityKind::Dock);
        for road in &manifest.roads {
            let band = road.rect.expand(config.clearance);
            for d in docks {
                assert!(!d.world_rect().overlaps(&band), "dock {} on {}", d.id, road.name);
            }
        }
        let vehicles = manifest
            .of_kind(EntityKind::Car)
            .iter()
            .chain(manifest.of_kind(EntityKind::Truck));
        for v in vehicles {
            for d in docks {
                assert!(!v.world_rect().overlaps(&d.world_rect()), "{} drives over {}", v.id, d.id);
            }
        }
    }
}

#[test]
fn dock_and_yard_origins_follow_grid_step() {
    let inventory = demo_inventory();
    let config = LayoutConfig::default();
    let step = config.plot.grid_step;
    let manifest = compute_layout(&inventory, &config);
    for d in manifest.of_kind(EntityKind::Dock) {
        let along = if d.rotation_y == 0.0 { d.position.x } else { d.position.z };
        assert_eq!(along % step, 0.0, "dock {} at {}", d.id, along);
    }

    let mut fine = LayoutConfig::default();
    fine.plot.grid_step = 1.0;
    let moved = compute_layout(&inventory, &fine);
    assert_ne!(
        manifest.of_kind(EntityKind::Dock),
        moved.of_kind(EntityKind::Dock)
    );
    assert_valid(&moved, &fine);
}

// ── Edge cases ─────────────────────────────────────────────────────────

#[test]
fn empty_inventory_still_builds_the_site() {
    let config = LayoutConfig::default();
    let manifest = compute_layout(&Inventory::default(), &config);
    assert_eq!(manifest.count(EntityKind::Dock), 0);
    assert_eq!(manifest.count(EntityKind::Vessel), 0);
    assert!(manifest.count(EntityKind::LightPole) > 0);
    assert!(manifest.count(EntityKind::ParkingStall) > 0);
    assert_valid(&manifest, &config);
}

#[test]
fn degenerate_plot_does_not_panic() {
    let config = LayoutConfig {
        plot: TerminalPlot {
            width: f32::NAN,
            depth: -5.0,
            road_width: f32::INFINITY,
            ..TerminalPlot::default()
        },
        ..LayoutConfig::default()
    };
    let manifest = compute_layout(&demo_inventory(), &config);
    assert_eq!(manifest.plot.width, 1.0);
    assert!(manifest.count(EntityKind::Dock) <= 8);
}

#[test]
fn more_vessels_than_docks_are_dropped() {
    let mut inventory = demo_inventory();
    inventory.docks.truncate(2);
    let config = LayoutConfig::default();
    let manifest = compute_layout(&inventory, &config);
    assert_eq!(manifest.count(EntityKind::Vessel), 2);
    assert_valid(&manifest, &config);
}

#[test]
fn store_keeps_latest_refresh() {
    let store = ManifestStore::new();
    let inventory = demo_inventory();
    let slow = store.begin_refresh();
    let fast = store.begin_refresh();
    assert!(store.commit(fast, compute_layout(&inventory, &with_seed(2))));
    assert!(!store.commit(slow, compute_layout(&inventory, &with_seed(1))));
    assert_eq!(store.current().unwrap().seed, 2);
}
