//! Pure layout logic for quayplan.
//!
//! Turns a container terminal's logical inventory (docks, vessels, storage
//! areas, containers, equipment) into placement records (position,
//! rotation, footprint) inside a rectangular plot. No renderer, database
//! or network; every function takes plain data and returns plain data, and
//! the only randomness is a seeded generator passed in explicitly.
//!
//! ```
//! use quayplan_logic::{compute_layout, Inventory, LayoutConfig};
//! use quayplan_logic::manifest::EntityKind;
//!
//! let inventory = Inventory::from_json_str(r#"{"docks": [{"id": "D1"}]}"#).unwrap();
//! let manifest = compute_layout(&inventory, &LayoutConfig::default());
//! assert_eq!(manifest.count(EntityKind::Dock), 1);
//! ```
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`buildings`] | Workshops, offices and decoratives fitted into sub-zone cells |
//! | [`catalog`] | Model key → measured unit footprint |
//! | [`config`] | `LayoutConfig`: every placer's options, serde defaults |
//! | [`containers`] | Two-tier container slots in the container yard |
//! | [`docks`] | Dock placement on zone C's quay-edge slots |
//! | [`error`] | Config/inventory loading errors |
//! | [`furniture`] | Light poles and trees along roads |
//! | [`geometry`] | Rectangles, footprints, rotated bounds, input clamping |
//! | [`grid`] | Sub-zone naming and uniform cell grids |
//! | [`inventory`] | Logical input records |
//! | [`layout`] | The full pass: `compute_layout` |
//! | [`manifest`] | Placement records and the layout manifest |
//! | [`parking`] | Angled parking stalls and parked cars |
//! | [`plot`] | Plot partitioning into water, slab, zones and roads |
//! | [`resources`] | Quay cranes on docks, mobile equipment in the pool |
//! | [`rng`] | Seeded per-stage ChaCha streams |
//! | [`stackyard`] | Container stacks behind the docks |
//! | [`storage`] | Storage areas packed into zone B |
//! | [`store`] | Last-refresh-wins holder for the current manifest |
//! | [`traffic`] | Length-proportional vehicles on the road network |
//! | [`validation`] | Tiling, containment, stacking and capacity checks |
//! | [`vessels`] | Vessels berthed alongside docks |

pub mod buildings;
pub mod catalog;
pub mod config;
pub mod containers;
pub mod docks;
pub mod error;
pub mod furniture;
pub mod geometry;
pub mod grid;
pub mod inventory;
pub mod layout;
pub mod manifest;
pub mod parking;
pub mod plot;
pub mod resources;
pub mod rng;
pub mod stackyard;
pub mod storage;
pub mod store;
pub mod traffic;
pub mod validation;
pub mod vessels;

pub use config::LayoutConfig;
pub use error::ConfigError;
pub use inventory::Inventory;
pub use layout::compute_layout;
pub use manifest::{LayoutManifest, PlacementRecord};
