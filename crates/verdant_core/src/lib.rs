//! # Verdant Core
//!
//! The headless simulation engine for Verdant - a tick-based garden ecosystem.
//!
//! This crate contains the deterministic simulation logic, including:
//! - The rectangular cell grid and its Manhattan-distance spatial index
//! - Plant growth, harvesting and lateral colonization
//! - Insect feeding, survival, genetics and movement
//! - Periodic emitters diffusing water, fertilizer and pesticide
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! The engine follows an arena-based design:
//! - **World-owned stores**: cells, plants and insects live in flat arenas;
//!   cells hold entity ids, entities hold their cell id
//! - **Four-phase ticks**: plants, insects, emitters, soil - each phase
//!   completes across the whole grid before the next one starts
//! - **Deterministic simulation**: a single seeded RNG threaded through every
//!   stochastic operation for reproducible results
//!
//! ## Example
//!
//! ```
//! use verdant_core::{SimConfig, World};
//!
//! // A 4x3 garden of bare cells ticking 10 times.
//! let mut world = World::empty(4, 3, 10, 42, SimConfig::default()).unwrap();
//! while world.tick().unwrap() {}
//! assert!(world.is_finished());
//! ```

/// Configuration of the fixed simulation constants
pub mod config;
/// Periodic substance emitters and their programs
pub mod emitter;
/// Insect agents: life-cycle rules and genetics
pub mod insect;
/// Metrics collection and logging setup
pub mod metrics;
/// Plant growth, harvest and colonization state
pub mod plant;
/// Read-only snapshots for presentation layers
pub mod snapshot;
/// Manhattan-distance neighborhood search over the grid
pub mod spatial;
/// Grid cells: soil state and entity rosters
pub mod cell;
/// The world: grid, arenas, tick pipeline
pub mod world;

pub use cell::Cell;
pub use config::SimConfig;
pub use emitter::{ActiveSubstances, Emitter, Program};
pub use insect::Insect;
pub use metrics::{init_logging, Metrics};
pub use plant::Plant;
pub use snapshot::WorldSnapshot;
pub use world::World;

/// Index of a cell in the world grid (`y * width + x`).
pub type CellId = usize;
/// Index of a plant in the world's plant arena.
pub type PlantId = usize;
/// Index of an insect in the world's insect arena.
pub type InsectId = usize;
