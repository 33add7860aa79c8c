//! Layout validation.
//!
//! Pure functions over a finished manifest that return every problem found.
//! Nothing here panics; an empty result means the layout is sound.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::LayoutConfig;
use crate::docks::MAX_DOCKS;
use crate::geometry::{tangent, Rect, EPSILON};
use crate::manifest::{Containment, EntityKind, LayoutManifest, PlacementRecord};
use crate::plot::{RoadSegment, TerminalPlot, Zone};

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// Height tolerance for tier checks.
const TIER_TOLERANCE: f32 = 1e-2;

// ── A. Zones and roads ──────────────────────────────────────────────────

/// Check that macro-zones and roads tile the plot and sub-zones tile their parents.
pub fn check_zone_tiling(
    plot: &TerminalPlot,
    zones: &[Zone],
    subzones: &[Zone],
    roads: &[RoadSegment],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let plot_rect = plot.rect();

    let pieces: Vec<(&str, Rect)> = zones
        .iter()
        .map(|z| (z.id.as_str(), z.rect))
        .chain(roads.iter().map(|r| (r.name.as_str(), r.rect)))
        .collect();

    for (name, rect) in &pieces {
        if !plot_rect.contains_rect(rect) {
            errors.push(ValidationError {
                category: "zones",
                severity: Severity::Error,
                message: format!("{} extends outside the plot", name),
            });
        }
    }
    for i in 0..pieces.len() {
        for j in (i + 1)..pieces.len() {
            if pieces[i].1.overlaps(&pieces[j].1) {
                errors.push(ValidationError {
                    category: "zones",
                    severity: Severity::Error,
                    message: format!("{} overlaps {}", pieces[i].0, pieces[j].0),
                });
            }
        }
    }

    let covered: f32 = pieces.iter().map(|(_, r)| r.area()).sum();
    let plot_area = plot_rect.area();
    if plot_area > 0.0 && ((covered - plot_area) / plot_area).abs() > 1e-3 {
        errors.push(ValidationError {
            category: "zones",
            severity: Severity::Error,
            message: format!(
                "Zones and roads cover {:.1} m² of a {:.1} m² plot",
                covered, plot_area
            ),
        });
    }

    for parent in zones {
        let prefix = format!("{}.", parent.id);
        let children: Vec<&Zone> = subzones.iter().filter(|z| z.id.starts_with(&prefix)).collect();
        if children.is_empty() {
            continue;
        }
        let area: f32 = children.iter().map(|z| z.rect.area()).sum();
        if (area - parent.rect.area()).abs() > parent.rect.area().max(1.0) * 1e-3 {
            errors.push(ValidationError {
                category: "zones",
                severity: Severity::Error,
                message: format!(
                    "Sub-zones of {} cover {:.1} m² of {:.1} m²",
                    parent.id,
                    area,
                    parent.rect.area()
                ),
            });
        }
        for child in children {
            if !parent.rect.contains_rect(&child.rect) {
                errors.push(ValidationError {
                    category: "zones",
                    severity: Severity::Error,
                    message: format!("Sub-zone {} extends outside {}", child.id, parent.id),
                });
            }
        }
    }
    errors
}

// ── B. Per-record ───────────────────────────────────────────────────────

/// Check that no record has a zero, negative or non-finite footprint.
pub fn check_footprints(manifest: &LayoutManifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in manifest.records() {
        let fp = r.footprint;
        let ok = [fp.width, fp.depth, fp.height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !ok || !(r.position.x.is_finite() && r.position.y.is_finite() && r.position.z.is_finite()) {
            errors.push(ValidationError {
                category: "records",
                severity: Severity::Error,
                message: format!(
                    "{:?} {} has invalid geometry: {}×{}×{} at ({}, {}, {})",
                    r.kind,
                    r.id,
                    fp.width,
                    fp.depth,
                    fp.height,
                    r.position.x,
                    r.position.y,
                    r.position.z
                ),
            });
        }
    }
    errors
}

/// Check that every non-overhanging record stays inside its region.
///
/// Zone-bound records must keep `margin` from their zone's edges; road-bound
/// records only have to stay on their road or inside the plot.
pub fn check_footprint_containment(manifest: &LayoutManifest, margin: f32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let plot = manifest.plot.rect();
    for r in manifest.records() {
        if r.overhang {
            continue; // docks, vessels and quay cranes reach over the water
        }
        let bounds = match r.kind.containment() {
            Containment::Plot => Some(plot),
            Containment::Source => r.source.as_deref().and_then(|s| manifest.region(s)),
        };
        let Some(bounds) = bounds else {
            errors.push(ValidationError {
                category: "containment",
                severity: Severity::Error,
                message: format!("{:?} {} has no known region ({:?})", r.kind, r.id, r.source),
            });
            continue;
        };
        let bounds = if r.kind.is_road_bound() {
            bounds
        } else {
            bounds.inset(margin)
        };
        let rect = r.world_rect();
        if !bounds.contains_rect(&rect) {
            errors.push(ValidationError {
                category: "containment",
                severity: Severity::Error,
                message: format!(
                    "{:?} {} escapes {}: ({:.2},{:.2})→({:.2},{:.2})",
                    r.kind,
                    r.id,
                    r.source.as_deref().unwrap_or("plot"),
                    rect.min_x,
                    rect.min_z,
                    rect.max_x,
                    rect.max_z
                ),
            });
        }
    }
    errors
}

/// Check that nothing but road-bound records comes within `margin` of a road band.
pub fn check_road_clearance(manifest: &LayoutManifest, margin: f32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let margin = margin.max(0.0);
    let bands: Vec<(&str, Rect)> = manifest
        .roads
        .iter()
        .map(|road| (road.name.as_str(), road.rect.expand(margin)))
        .collect();
    for r in manifest.records() {
        if r.kind.is_road_bound() {
            continue;
        }
        let rect = r.world_rect();
        for (name, band) in &bands {
            let covered = band.intersection_area(&rect);
            if covered > EPSILON {
                errors.push(ValidationError {
                    category: "roads",
                    severity: Severity::Error,
                    message: format!(
                        "{:?} {} covers {:.1} m² of road {} (margin {:.1})",
                        r.kind, r.id, covered, name, margin
                    ),
                });
            }
        }
    }
    errors
}

/// Check for repeated ids within a kind.
pub fn check_duplicate_ids(manifest: &LayoutManifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (kind, records) in &manifest.records {
        let mut seen = BTreeSet::new();
        for r in records {
            if !seen.insert(r.id.as_str()) {
                errors.push(ValidationError {
                    category: "records",
                    severity: Severity::Warning,
                    message: format!("Duplicate {:?} id {}", kind, r.id),
                });
            }
        }
    }
    errors
}

// ── C. Stacks ───────────────────────────────────────────────────────────

/// Check stacked records: tier `k` sits at `h/2 + k·(h + gap)`, no tier
/// floats above a missing one, and reused positions are reported.
pub fn check_stack_tiers(records: &[PlacementRecord], tier_gap: f32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut stacks: BTreeMap<(i64, i64), Vec<&PlacementRecord>> = BTreeMap::new();
    for r in records {
        let key = (
            (r.position.x * 1000.0).round() as i64,
            (r.position.z * 1000.0).round() as i64,
        );
        stacks.entry(key).or_default().push(r);
    }

    for stack in stacks.values() {
        let mut tiers: BTreeMap<i64, usize> = BTreeMap::new();
        for r in stack {
            let h = r.footprint.height;
            let pitch = h + tier_gap;
            let tier = ((r.position.y - h / 2.0) / pitch).round();
            let expected = h / 2.0 + tier * pitch;
            if tier < 0.0 || (r.position.y - expected).abs() > TIER_TOLERANCE {
                errors.push(ValidationError {
                    category: "stacks",
                    severity: Severity::Error,
                    message: format!(
                        "{:?} {} at y={:.3} is not on a tier (expected {:.3})",
                        r.kind, r.id, r.position.y, expected
                    ),
                });
                continue;
            }
            *tiers.entry(tier as i64).or_default() += 1;
        }
        for (i, (&tier, &count)) in tiers.iter().enumerate() {
            if tier != i as i64 {
                errors.push(ValidationError {
                    category: "stacks",
                    severity: Severity::Error,
                    message: format!(
                        "Stack at {} floats: tier {} has nothing below it",
                        stack[0].id, tier
                    ),
                });
                break;
            }
            if count > 1 {
                errors.push(ValidationError {
                    category: "stacks",
                    severity: Severity::Warning,
                    message: format!(
                        "Stack at {} reuses tier {} ({} records)",
                        stack[0].id, tier, count
                    ),
                });
            }
        }
    }
    errors
}

// ── D. Capacity ─────────────────────────────────────────────────────────

/// Check dock and vessel caps and that vessel `i` berths at dock `i`.
pub fn check_capacity_caps(manifest: &LayoutManifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let docks = manifest.of_kind(EntityKind::Dock);
    let vessels = manifest.of_kind(EntityKind::Vessel);

    for (kind, n) in [("docks", docks.len()), ("vessels", vessels.len())] {
        if n > MAX_DOCKS {
            errors.push(ValidationError {
                category: "capacity",
                severity: Severity::Error,
                message: format!("{} {} placed, at most {} allowed", n, kind, MAX_DOCKS),
            });
        }
    }
    if vessels.len() > docks.len() {
        errors.push(ValidationError {
            category: "capacity",
            severity: Severity::Error,
            message: format!("{} vessels for {} docks", vessels.len(), docks.len()),
        });
    }

    for (v, d) in vessels.iter().zip(docks) {
        if (v.rotation_y - d.rotation_y).abs() > 1e-4 {
            errors.push(ValidationError {
                category: "capacity",
                severity: Severity::Error,
                message: format!("Vessel {} is not parallel to dock {}", v.id, d.id),
            });
        }
        let (tx, tz) = tangent(d.rotation_y);
        let along = (v.position.x - d.position.x) * tx + (v.position.z - d.position.z) * tz;
        if along.abs() > d.footprint.width / 2.0 + 1e-3 {
            errors.push(ValidationError {
                category: "capacity",
                severity: Severity::Error,
                message: format!(
                    "Vessel {} sits {:.1} m along dock {} of length {:.1}",
                    v.id, along, d.id, d.footprint.width
                ),
            });
        }
        if v.footprint.width > d.footprint.width + 1e-3 {
            errors.push(ValidationError {
                category: "capacity",
                severity: Severity::Error,
                message: format!("Vessel {} is longer than dock {}", v.id, d.id),
            });
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all validations against a manifest produced with `config`.
pub fn validate_manifest(manifest: &LayoutManifest, config: &LayoutConfig) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_zone_tiling(
        &manifest.plot,
        &manifest.zones,
        &manifest.subzones,
        &manifest.roads,
    ));
    all.extend(check_footprints(manifest));
    all.extend(check_footprint_containment(manifest, config.clearance));
    all.extend(check_road_clearance(manifest, config.clearance));
    all.extend(check_duplicate_ids(manifest));
    all.extend(check_stack_tiers(
        manifest.of_kind(EntityKind::Container),
        config.containers.tier_gap,
    ));
    all.extend(check_stack_tiers(
        manifest.of_kind(EntityKind::YardContainer),
        config.yards.tier_gap,
    ));
    all.extend(check_capacity_caps(manifest));
    all
}

/// Only the errors (not warnings) of a validation run.
pub fn errors_only(results: &[ValidationError]) -> Vec<&ValidationError> {
    results
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .collect()
}
