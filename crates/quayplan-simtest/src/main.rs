//! Quayplan Headless Layout Harness
//!
//! Runs full layout passes over a terminal inventory and checks the
//! results. Runs entirely in-process: no renderer, no database.
//!
//! Usage:
//!   cargo run -p quayplan-simtest
//!   cargo run -p quayplan-simtest -- --verbose
//!   cargo run -p quayplan-simtest -- --inventory site.json --config layout.json --seed 7
//!   cargo run -p quayplan-simtest -- --dump > manifest.json

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_2;

use clap::Parser;
use quayplan_logic::docks::{DOCK_EDGE_FILL, MAX_DOCKS};
use quayplan_logic::manifest::{EntityKind, LayoutManifest};
use quayplan_logic::storage::STORAGE_PER_ZONE;
use quayplan_logic::store::ManifestStore;
use quayplan_logic::traffic::{apply_minimum, apportion};
use quayplan_logic::validation::{check_road_clearance, errors_only, validate_manifest, Severity};
use quayplan_logic::{compute_layout, Inventory, LayoutConfig};
use serde::Serialize;

// ── Demo inventory (same JSON the integration tests use) ────────────────
const DEMO_INVENTORY: &str = include_str!("../../../data/demo_inventory.json");

// ── Command line ────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print per-check detail and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the manifest JSON to stdout and a run summary to stderr
    #[arg(long)]
    dump: bool,

    /// Inventory JSON file (defaults to the bundled demo terminal)
    #[arg(long)]
    inventory: Option<String>,

    /// Layout config JSON file
    #[arg(long)]
    config: Option<String>,

    /// Override the config's seed
    #[arg(long)]
    seed: Option<u64>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Machine-readable run summary printed by `--dump` after the manifest.
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    records: BTreeMap<EntityKind, usize>,
    errors: usize,
    warnings: usize,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let inventory = match &args.inventory {
        Some(path) => Inventory::load(path),
        None => Inventory::from_json_str(DEMO_INVENTORY),
    };
    let inventory = match inventory {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("error: inventory: {}", e);
            std::process::exit(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => match LayoutConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: config: {}", e);
                std::process::exit(2);
            }
        },
        None => LayoutConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    log::info!(
        "Inventory: {} records from {}; seed {}",
        inventory.len(),
        args.inventory.as_deref().unwrap_or("bundled demo"),
        config.seed
    );

    if args.dump {
        dump(&inventory, &config);
        return;
    }

    println!("=== Quayplan Layout Harness ===\n");
    let verbose = args.verbose;
    let mut results = Vec::new();

    // 1. Inventory sanity
    results.extend(validate_inventory(&inventory, verbose));

    // 2. Full pass + structural validation
    let manifest = compute_layout(&inventory, &config);
    results.extend(validate_layout(&manifest, &config, verbose));

    // 3. Primary placers
    results.extend(validate_primary(&inventory, &manifest, &config, verbose));

    // 4. Ancillary distributors
    results.extend(validate_ancillary(&manifest, &config, verbose));

    // 5. Determinism and seed sweep
    results.extend(validate_determinism(&inventory, &config, verbose));

    // 6. Refresh ordering
    results.extend(validate_store(&inventory, &config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn dump(inventory: &Inventory, config: &LayoutConfig) {
    let manifest = compute_layout(inventory, config);
    let results = validate_manifest(&manifest, config);
    let errors = errors_only(&results).len();
    let summary = RunSummary {
        seed: manifest.seed,
        records: manifest
            .records
            .iter()
            .map(|(kind, records)| (*kind, records.len()))
            .collect(),
        errors,
        warnings: results.len() - errors,
    };
    match (manifest.to_json_pretty(), serde_json::to_string(&summary)) {
        (Ok(m), Ok(s)) => {
            println!("{}", m);
            eprintln!("{}", s);
        }
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: serialize: {}", e);
            std::process::exit(1);
        }
    }
}

// ── 1. Inventory ────────────────────────────────────────────────────────

fn validate_inventory(inventory: &Inventory, verbose: bool) -> Vec<TestResult> {
    println!("--- Inventory ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "inventory_not_empty".into(),
        passed: !inventory.is_empty(),
        detail: format!("{} records loaded", inventory.len()),
    });

    let mut seen = BTreeMap::new();
    for id in inventory
        .docks
        .iter()
        .map(|d| &d.id)
        .chain(inventory.storage_areas.iter().map(|s| &s.id))
        .chain(inventory.vessels.iter().map(|v| &v.id))
        .chain(inventory.containers.iter().map(|c| &c.id))
        .chain(inventory.resources.iter().map(|r| &r.id))
    {
        *seen.entry(id.as_str()).or_insert(0usize) += 1;
    }
    let dupes: Vec<_> = seen.iter().filter(|(_, &n)| n > 1).map(|(id, _)| *id).collect();
    results.push(TestResult {
        name: "inventory_unique_ids".into(),
        passed: dupes.is_empty(),
        detail: if dupes.is_empty() {
            "all ids unique".into()
        } else {
            format!("duplicate ids: {:?}", dupes)
        },
    });

    if verbose {
        println!(
            "  docks {}, vessels {}, storage areas {}, containers {}, resources {}",
            inventory.docks.len(),
            inventory.vessels.len(),
            inventory.storage_areas.len(),
            inventory.containers.len(),
            inventory.resources.len()
        );
    }
    results
}

// ── 2. Layout validation ────────────────────────────────────────────────

fn validate_layout(
    manifest: &LayoutManifest,
    config: &LayoutConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Layout Validation ---");
    let all = validate_manifest(manifest, config);
    let errors = errors_only(&all);
    let warnings = all.iter().filter(|e| e.severity == Severity::Warning).count();

    if verbose {
        for e in &all {
            println!("  [{:?}] {}: {}", e.severity, e.category, e.message);
        }
    }

    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for e in &errors {
        *by_category.entry(e.category).or_insert(0) += 1;
    }
    let blocked = check_road_clearance(manifest, config.clearance);

    vec![
        TestResult {
            name: "layout_no_errors".into(),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                format!("{} records, {} warnings", manifest.total(), warnings)
            } else {
                format!("{} errors by category: {:?}", errors.len(), by_category)
            },
        },
        TestResult {
            name: "layout_roads_clear".into(),
            passed: blocked.is_empty(),
            detail: match blocked.first() {
                None => format!("no footprint within {:.1} m of a road", config.clearance),
                Some(e) => format!("{} blocked: {}", blocked.len(), e.message),
            },
        },
        TestResult {
            name: "layout_subzone_count".into(),
            passed: manifest.subzones.len()
                == [config.subdivision.a, config.subdivision.b, config.subdivision.c]
                    .iter()
                    .map(|s| s.cols.max(1) * s.rows.max(1))
                    .sum::<usize>(),
            detail: format!("{} sub-zones", manifest.subzones.len()),
        },
    ]
}

// ── 3. Primary placers ──────────────────────────────────────────────────

fn validate_primary(
    inventory: &Inventory,
    manifest: &LayoutManifest,
    config: &LayoutConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Primary Placers ---");
    let mut results = Vec::new();

    let docks = manifest.of_kind(EntityKind::Dock);
    let expected = inventory.docks.len().min(MAX_DOCKS);
    results.push(TestResult {
        name: "docks_placed".into(),
        passed: docks.len() == expected,
        detail: format!("{} of {} docks", docks.len(), inventory.docks.len()),
    });

    let long: Vec<_> = docks
        .iter()
        .filter(|d| {
            let Some(zone) = d.source.as_deref().and_then(|id| manifest.region(id)) else {
                return true;
            };
            let edge = if d.rotation_y == FRAC_PI_2 {
                zone.depth()
            } else {
                zone.width()
            };
            d.footprint.width > edge * DOCK_EDGE_FILL + 1e-3
        })
        .map(|d| d.id.as_str())
        .collect();
    results.push(TestResult {
        name: "docks_fit_edges".into(),
        passed: long.is_empty(),
        detail: if long.is_empty() {
            "every dock within its quay edge".into()
        } else {
            format!("too long: {:?}", long)
        },
    });

    let vessels = manifest.of_kind(EntityKind::Vessel);
    results.push(TestResult {
        name: "vessels_one_per_dock".into(),
        passed: vessels.len() == inventory.vessels.len().min(docks.len()),
        detail: format!("{} vessels at {} docks", vessels.len(), docks.len()),
    });

    let areas = manifest.of_kind(EntityKind::StorageArea);
    let mut per_zone: BTreeMap<&str, usize> = BTreeMap::new();
    for a in areas {
        *per_zone.entry(a.source.as_deref().unwrap_or("?")).or_insert(0) += 1;
    }
    let zones = &config.storage.zones;
    let ordered = match zones.split_last() {
        Some((_, leading)) => leading.iter().all(|z| {
            let n = per_zone.get(z.as_str()).copied().unwrap_or(0);
            n <= STORAGE_PER_ZONE
        }),
        None => areas.is_empty(),
    };
    results.push(TestResult {
        name: "storage_zone_caps".into(),
        passed: areas.len() == inventory.storage_areas.len() && ordered,
        detail: format!("{:?}", per_zone),
    });

    let containers = manifest.of_kind(EntityKind::Container);
    let max_y = containers
        .iter()
        .map(|c| c.position.y)
        .fold(0.0f32, f32::max);
    let tier_top = config.containers.height * 1.5 + config.containers.tier_gap + 1e-3;
    results.push(TestResult {
        name: "containers_two_tiers".into(),
        passed: containers.len() == inventory.containers.len() && max_y <= tier_top,
        detail: format!("{} containers, highest center {:.2} m", containers.len(), max_y),
    });

    let resources = manifest.of_kind(EntityKind::Resource);
    let cranes = resources.iter().filter(|r| r.overhang).count();
    if verbose {
        println!("  {} cranes on docks, {} in pool", cranes, resources.len() - cranes);
    }
    results.push(TestResult {
        name: "resources_placed".into(),
        passed: resources.len() <= inventory.resources.len(),
        detail: format!("{} of {} resources", resources.len(), inventory.resources.len()),
    });

    results
}

// ── 4. Ancillary distributors ───────────────────────────────────────────

fn validate_ancillary(
    manifest: &LayoutManifest,
    config: &LayoutConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Ancillary Distributors ---");
    let mut results = Vec::new();

    let lengths: Vec<f32> = manifest.roads.iter().map(|r| r.length()).collect();
    let counts = apply_minimum(
        &apportion(&lengths, config.traffic.approx_total),
        config.traffic.min_per_road,
    );
    let vehicles = manifest.count(EntityKind::Car) + manifest.count(EntityKind::Truck);
    results.push(TestResult {
        name: "traffic_matches_apportionment".into(),
        passed: vehicles == counts.iter().sum::<usize>(),
        detail: format!("{} vehicles over {} roads {:?}", vehicles, lengths.len(), counts),
    });

    let stalls = manifest.count(EntityKind::ParkingStall);
    let parked = manifest.count(EntityKind::ParkedCar);
    results.push(TestResult {
        name: "parking_occupancy".into(),
        passed: stalls > 0 && parked <= stalls,
        detail: format!("{} of {} stalls occupied", parked, stalls),
    });

    for (kind, label) in [
        (EntityKind::LightPole, "light poles"),
        (EntityKind::Tree, "trees"),
        (EntityKind::YardContainer, "yard containers"),
        (EntityKind::Workshop, "workshops"),
        (EntityKind::Office, "offices"),
        (EntityKind::Decorative, "decoratives"),
    ] {
        let n = manifest.count(kind);
        if verbose {
            println!("  {} {}", n, label);
        }
        results.push(TestResult {
            name: format!("ancillary_{:?}", kind).to_lowercase(),
            passed: n > 0,
            detail: format!("{} {}", n, label),
        });
    }

    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(
    inventory: &Inventory,
    config: &LayoutConfig,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let a = compute_layout(inventory, config).to_json();
    let b = compute_layout(inventory, config).to_json();
    let identical = matches!((&a, &b), (Ok(a), Ok(b)) if a == b);
    results.push(TestResult {
        name: "same_seed_same_manifest".into(),
        passed: identical,
        detail: format!("seed {}", config.seed),
    });

    let mut failing = Vec::new();
    for offset in 1..=8u64 {
        let sweep = LayoutConfig {
            seed: config.seed.wrapping_add(offset),
            ..config.clone()
        };
        let manifest = compute_layout(inventory, &sweep);
        let errors = errors_only(&validate_manifest(&manifest, &sweep)).len();
        if verbose {
            println!("  seed {}: {} records, {} errors", sweep.seed, manifest.total(), errors);
        }
        if errors > 0 {
            failing.push(sweep.seed);
        }
    }
    results.push(TestResult {
        name: "seed_sweep_valid".into(),
        passed: failing.is_empty(),
        detail: if failing.is_empty() {
            "8 seeds, no errors".into()
        } else {
            format!("errors at seeds {:?}", failing)
        },
    });

    results
}

// ── 6. Manifest store ───────────────────────────────────────────────────

fn validate_store(inventory: &Inventory, config: &LayoutConfig) -> Vec<TestResult> {
    println!("--- Manifest Store ---");
    let store = ManifestStore::new();
    let slow = store.begin_refresh();
    let fast = store.begin_refresh();
    let fast_ok = store.commit(fast, compute_layout(inventory, config));
    let slow_ok = store.commit(slow, compute_layout(inventory, config));

    vec![TestResult {
        name: "store_last_refresh_wins".into(),
        passed: fast_ok && !slow_ok && store.generation() == fast.generation,
        detail: format!(
            "installed generation {} of {} issued",
            store.generation(),
            fast.generation
        ),
    }]
}
