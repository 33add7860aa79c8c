//! One full layout pass: inventory in, manifest out.
//!
//! Stages run in a fixed order: partition, subdivide, docks, vessels,
//! storage areas, containers, resources, buildings, stack yards, parking,
//! traffic, road furniture. Each randomized stage draws from its own
//! [`LayoutRng`] stream of the config seed. Identical inputs give identical
//! manifests.

use crate::buildings::place_building_group;
use crate::catalog::FootprintCatalog;
use crate::config::LayoutConfig;
use crate::containers::{allocate_containers, container_grid};
use crate::docks::{place_docks, DockOptions};
use crate::furniture::{add_poles, add_trees};
use crate::grid::{find_zone, subdivide};
use crate::inventory::Inventory;
use crate::manifest::{EntityKind, LayoutManifest};
use crate::parking::add_parking;
use crate::plot::{partition, Zone};
use crate::resources::place_resources;
use crate::rng::{LayoutRng, Stage};
use crate::stackyard::pack_yard;
use crate::storage::pack_storage_areas;
use crate::traffic::add_traffic;
use crate::vessels::place_vessels;

/// Look up sub-zones by id, warning about (and skipping) unknown ones.
fn resolve_zones<'a>(subzones: &'a [Zone], ids: &[String], stage: &str) -> Vec<&'a Zone> {
    ids.iter()
        .filter_map(|id| {
            let zone = find_zone(subzones, id);
            if zone.is_none() {
                log::warn!("{}: sub-zone {} does not exist; skipped", stage, id);
            }
            zone
        })
        .collect()
}

/// Compute the complete layout for `inventory`.
pub fn compute_layout(inventory: &Inventory, config: &LayoutConfig) -> LayoutManifest {
    let seed = config.seed;
    let layout = partition(&config.plot);
    let catalog = FootprintCatalog::with_overrides(&config.models);

    let zone_a = subdivide(&layout.zone_a, config.subdivision.a);
    let zone_b = subdivide(&layout.zone_b, config.subdivision.b);
    let zone_c = subdivide(&layout.zone_c, config.subdivision.c);
    let subzones: Vec<Zone> = zone_a
        .iter()
        .chain(&zone_b)
        .chain(&zone_c)
        .cloned()
        .collect();

    log::info!(
        "Layout pass: seed {}, {} inventory records, {} sub-zones",
        seed,
        inventory.len(),
        subzones.len()
    );

    let mut manifest = LayoutManifest::new(seed, &layout, subzones.clone());

    // ── Primary placers ──

    // Docks never sit closer to a perimeter road than the configured clearance.
    let dock_opts = DockOptions {
        setback: config.docks.setback.max(config.clearance),
        ..config.docks.clone()
    };
    let docks = place_docks(&inventory.docks, &zone_c, &layout.plot, &dock_opts);
    log::debug!("Docks: {} of {}", docks.len(), inventory.docks.len());

    let mut rng = LayoutRng::for_stage(seed, Stage::Vessels);
    let vessels = place_vessels(
        &inventory.vessels,
        &docks,
        layout.plot.water_level(),
        &config.vessels,
        &mut rng,
    );
    log::debug!("Vessels: {} of {}", vessels.len(), inventory.vessels.len());

    let storage_zones = resolve_zones(&subzones, &config.storage.zones, "storage");
    let storage = pack_storage_areas(&inventory.storage_areas, &storage_zones, &config.storage);
    log::debug!("Storage areas: {} of {}", storage.len(), inventory.storage_areas.len());

    match find_zone(&subzones, &config.containers.zone) {
        Some(zone) => {
            let grid = container_grid(zone, &config.containers);
            let containers =
                allocate_containers(&inventory.containers, &grid, zone, &config.containers);
            log::debug!("Containers: {} in {}", containers.len(), zone.id);
            manifest.extend(containers);
        }
        None if !inventory.containers.is_empty() => {
            log::warn!(
                "Container zone {} does not exist; {} containers not placed",
                config.containers.zone,
                inventory.containers.len()
            );
        }
        None => {}
    }

    let pool = find_zone(&subzones, &config.resources.pool_zone);
    let resources = place_resources(&inventory.resources, &docks, pool, &catalog, &config.resources);
    log::debug!("Resources: {} of {}", resources.len(), inventory.resources.len());

    manifest.extend(docks);
    manifest.extend(vessels);
    manifest.extend(storage);
    manifest.extend(resources);

    // ── Ancillary distributors ──

    for group in &config.buildings {
        manifest.extend(place_building_group(group, &subzones, &catalog, &config.fit));
    }

    let mut rng = LayoutRng::for_stage(seed, Stage::Yards);
    let unit = catalog.resolve(&config.yards.unit_model);
    for target in &config.yards.targets {
        match find_zone(&subzones, &target.zone) {
            Some(zone) => manifest.extend(pack_yard(
                zone,
                target.bias_x,
                unit,
                layout.plot.grid_step,
                &config.yards,
                &mut rng,
            )),
            None => log::warn!("yards: sub-zone {} does not exist; skipped", target.zone),
        }
    }

    let parking_zones = resolve_zones(&subzones, &config.parking.zones, "parking");
    let mut rng = LayoutRng::for_stage(seed, Stage::Parking);
    manifest.extend(add_parking(&parking_zones, &config.parking, &catalog, &mut rng));

    let roads = layout.roads.to_vec();
    let mut rng = LayoutRng::for_stage(seed, Stage::Traffic);
    manifest.extend(add_traffic(&roads, &config.traffic, &catalog, &mut rng));

    let plot_rect = layout.plot.rect();
    manifest.extend(add_poles(&roads, &plot_rect, &config.lights, &catalog));
    manifest.extend(add_trees(&roads, &plot_rect, &config.trees, &catalog));

    log::info!(
        "Layout complete: {} records ({} docks, {} vessels, {} storage areas, {} containers, {} vehicles)",
        manifest.total(),
        manifest.count(EntityKind::Dock),
        manifest.count(EntityKind::Vessel),
        manifest.count(EntityKind::StorageArea),
        manifest.count(EntityKind::Container),
        manifest.count(EntityKind::Car) + manifest.count(EntityKind::Truck)
    );
    manifest
}
