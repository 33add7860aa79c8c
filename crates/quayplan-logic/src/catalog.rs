//! Measured unit footprints of the models the renderer will load.
//!
//! The orchestrator builds one catalog per pass and lends it to the placers
//! that size entities from a model (buildings, stack yards, resources,
//! vehicles). Keys are model names such as `"container_20ft"`.

use std::collections::BTreeMap;

use crate::geometry::Footprint;

/// Footprint used for a model the catalog does not know.
pub const FALLBACK_FOOTPRINT: Footprint = Footprint::new(4.0, 4.0, 4.0);

const DEFAULT_MODELS: &[(&str, Footprint)] = &[
    ("container_20ft", Footprint::new(6.06, 2.44, 2.59)),
    ("container_40ft", Footprint::new(12.19, 2.44, 2.59)),
    ("workshop", Footprint::new(40.0, 25.0, 10.0)),
    ("office", Footprint::new(30.0, 18.0, 14.0)),
    ("decor_fountain", Footprint::new(8.0, 8.0, 3.0)),
    ("decor_kiosk", Footprint::new(5.0, 4.0, 3.5)),
    ("decor_statue", Footprint::new(3.0, 3.0, 6.0)),
    ("quay_crane", Footprint::new(16.0, 14.0, 45.0)),
    ("straddle_carrier", Footprint::new(9.0, 5.0, 15.0)),
    ("reach_stacker", Footprint::new(11.0, 4.5, 5.0)),
    ("terminal_truck", Footprint::new(7.0, 2.6, 3.5)),
    ("forklift", Footprint::new(4.0, 1.8, 3.0)),
    ("car", Footprint::new(4.5, 1.9, 1.5)),
    ("truck", Footprint::new(12.0, 2.5, 3.8)),
    ("light_pole", Footprint::new(0.4, 0.4, 9.0)),
    ("tree", Footprint::new(3.0, 3.0, 6.0)),
];

/// Model key → unit footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintCatalog {
    entries: BTreeMap<String, Footprint>,
}

impl Default for FootprintCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_MODELS
                .iter()
                .map(|(k, f)| (k.to_string(), *f))
                .collect(),
        }
    }
}

impl FootprintCatalog {
    /// Defaults plus `overrides`. Non-positive override dimensions are clamped.
    pub fn with_overrides(overrides: &BTreeMap<String, Footprint>) -> Self {
        let mut catalog = Self::default();
        for (key, fp) in overrides {
            catalog.insert(key.clone(), *fp);
        }
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, footprint: Footprint) {
        self.entries.insert(key.into(), footprint.sanitized(0.01));
    }

    pub fn get(&self, key: &str) -> Option<Footprint> {
        self.entries.get(key).copied()
    }

    /// Footprint for `key`, or [`FALLBACK_FOOTPRINT`] when it is unknown.
    pub fn resolve(&self, key: &str) -> Footprint {
        match self.get(key) {
            Some(fp) => fp,
            None => {
                log::warn!("Unknown model '{}'; using fallback footprint", key);
                FALLBACK_FOOTPRINT
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
