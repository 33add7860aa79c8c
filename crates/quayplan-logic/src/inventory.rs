//! Logical terminal inventory: the engine's input.
//!
//! Records carry ids and optional nominal dimensions, never geometry. They
//! arrive as JSON from the inventory service; missing fields fall back to
//! defaults and unknown fields are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::read_file;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockInfo {
    pub id: String,
    /// Nominal berth length in meters.
    pub length: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageAreaInfo {
    pub id: String,
    /// Only the height is taken; the packer sizes the plan footprint.
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselInfo {
    pub id: String,
    /// Length overall in meters.
    pub length: Option<f32>,
    pub beam: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerInfo {
    pub id: String,
}

/// Physical resource categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    QuayCrane,
    StraddleCarrier,
    ReachStacker,
    #[default]
    TerminalTruck,
    Forklift,
}

impl ResourceKind {
    /// Catalog key of the model measured for this kind.
    pub fn model_key(self) -> &'static str {
        match self {
            ResourceKind::QuayCrane => "quay_crane",
            ResourceKind::StraddleCarrier => "straddle_carrier",
            ResourceKind::ReachStacker => "reach_stacker",
            ResourceKind::TerminalTruck => "terminal_truck",
            ResourceKind::Forklift => "forklift",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceInfo {
    pub id: String,
    pub kind: ResourceKind,
}

/// Everything one refresh of the inventory service returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub docks: Vec<DockInfo>,
    pub storage_areas: Vec<StorageAreaInfo>,
    pub vessels: Vec<VesselInfo>,
    pub containers: Vec<ContainerInfo>,
    pub resources: Vec<ResourceInfo>,
}

impl Inventory {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an inventory snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }

    /// Total number of input records.
    pub fn len(&self) -> usize {
        self.docks.len()
            + self.storage_areas.len()
            + self.vessels.len()
            + self.containers.len()
            + self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
