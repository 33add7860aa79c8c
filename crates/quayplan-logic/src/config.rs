//! Layout configuration.
//!
//! Every placer's knobs in one serde document. All fields have defaults, so
//! `{}` is a valid config and a partial file only overrides what it names:
//!
//! ```
//! use quayplan_logic::config::LayoutConfig;
//!
//! let cfg = LayoutConfig::from_json_str(r#"{"seed": 7, "plot": {"width": 800}}"#).unwrap();
//! assert_eq!(cfg.seed, 7);
//! assert_eq!(cfg.plot.width, 800.0);
//! assert_eq!(cfg.plot.depth, 1200.0);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingGroup, FitOptions};
use crate::containers::ContainerOptions;
use crate::docks::DockOptions;
use crate::error::ConfigError;
use crate::furniture::{PoleOptions, TreeOptions};
use crate::geometry::Footprint;
use crate::grid::ZoneSplit;
use crate::parking::ParkingOptions;
use crate::plot::TerminalPlot;
use crate::resources::ResourceOptions;
use crate::rng::DEFAULT_SEED;
use crate::stackyard::YardOptions;
use crate::storage::StorageOptions;
use crate::traffic::TrafficOptions;
use crate::vessels::VesselOptions;

/// How each macro-zone is split into sub-zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subdivision {
    pub a: ZoneSplit,
    pub b: ZoneSplit,
    pub c: ZoneSplit,
}

impl Default for Subdivision {
    fn default() -> Self {
        Self {
            a: ZoneSplit::new(2, 2),
            b: ZoneSplit::new(2, 1),
            c: ZoneSplit::new(4, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub seed: u64,
    pub plot: TerminalPlot,
    /// Gap every zone-bound footprint keeps from its zone edge and from
    /// every road band.
    pub clearance: f32,
    pub subdivision: Subdivision,
    pub docks: DockOptions,
    pub vessels: VesselOptions,
    pub storage: StorageOptions,
    pub containers: ContainerOptions,
    pub parking: ParkingOptions,
    pub traffic: TrafficOptions,
    pub lights: PoleOptions,
    pub trees: TreeOptions,
    pub buildings: Vec<BuildingGroup>,
    pub fit: FitOptions,
    pub yards: YardOptions,
    pub resources: ResourceOptions,
    /// Footprint overrides merged over the built-in catalog.
    pub models: BTreeMap<String, Footprint>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            plot: TerminalPlot::default(),
            clearance: 2.0,
            subdivision: Subdivision::default(),
            docks: DockOptions::default(),
            vessels: VesselOptions::default(),
            storage: StorageOptions::default(),
            containers: ContainerOptions::default(),
            parking: ParkingOptions::default(),
            traffic: TrafficOptions::default(),
            lights: PoleOptions::default(),
            trees: TreeOptions::default(),
            buildings: BuildingGroup::defaults(),
            fit: FitOptions::default(),
            yards: YardOptions::default(),
            resources: ResourceOptions::default(),
            models: BTreeMap::new(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }
}

/// Read a whole file, tagging I/O failures with the path.
pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
