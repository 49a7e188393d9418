//! Serializable snapshots of a world.
//!
//! A snapshot is a flat, owned copy of everything observable: soil state per
//! cell, plants and insects in roster order, emitter programs, the harvest
//! log and a per-species census. It serializes to JSON for inspection or
//! archival, and it is what the tests diff when checking determinism.

use crate::world::World;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use verdant_data::{Genome, HarvestRecord, Sex};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub name: Option<String>,
    pub tick: u64,
    pub budget: u64,
    pub width: u16,
    pub height: u16,
    pub cells: Vec<CellSnapshot>,
    pub harvest: Vec<HarvestRecord>,
    pub insect_census: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellSnapshot {
    pub x: u16,
    pub y: u16,
    pub moisture: f64,
    pub fertilizer_ticks: u32,
    pub pesticide_ticks: u32,
    pub plants: Vec<PlantSnapshot>,
    pub insects: Vec<InsectSnapshot>,
    pub emitter: Option<EmitterSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantSnapshot {
    pub id: Uuid,
    pub species: String,
    pub age: f64,
    pub growth: f64,
    pub harvests_done: u32,
    pub pesticide_ticks: u32,
    pub mature: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsectSnapshot {
    pub id: Uuid,
    pub species: String,
    pub sex: Sex,
    pub genome: Genome,
    pub health: u32,
    pub age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmitterSnapshot {
    pub radius: u32,
    pub age: u64,
}

impl WorldSnapshot {
    /// Captures the current state of a world. Cells appear in grid order;
    /// plants and insects in their cell's roster order.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let grid = world.grid();
        let mut cells = Vec::new();
        for id in 0..grid.len() {
            let Some(cell) = world.cell(id) else {
                continue;
            };
            let (x, y) = cell.position();
            let plants = cell
                .plants()
                .iter()
                .filter_map(|&pid| world.plant(pid))
                .map(|plant| PlantSnapshot {
                    id: plant.id(),
                    species: plant.species().to_string(),
                    age: plant.age(),
                    growth: plant.growth(),
                    harvests_done: plant.harvests_done(),
                    pesticide_ticks: plant.pesticide_ticks(),
                    mature: plant.is_mature(),
                })
                .collect();
            let insects = cell
                .insects()
                .iter()
                .filter_map(|&iid| world.insect(iid))
                .map(|insect| InsectSnapshot {
                    id: insect.id(),
                    species: insect.species().to_string(),
                    sex: insect.sex(),
                    genome: *insect.genome(),
                    health: insect.health(),
                    age: insect.age(),
                })
                .collect();
            cells.push(CellSnapshot {
                x,
                y,
                moisture: cell.moisture(),
                fertilizer_ticks: cell.fertilizer_ticks(),
                pesticide_ticks: cell.pesticide_ticks(),
                plants,
                insects,
                emitter: cell.emitter().map(|emitter| EmitterSnapshot {
                    radius: emitter.radius(),
                    age: emitter.age(),
                }),
            });
        }
        Self {
            name: world.name().map(str::to_string),
            tick: world.current_tick(),
            budget: world.budget(),
            width: grid.width(),
            height: grid.height(),
            cells,
            harvest: world.harvest_log().to_vec(),
            insect_census: world.insect_census(),
        }
    }

    /// Pretty-printed JSON rendition.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
