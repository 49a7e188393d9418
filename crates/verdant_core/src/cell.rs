//! Grid cells: soil state and entity rosters.
//!
//! A cell owns its soil state and an optional emitter, and lists the ids of
//! the plants and insects currently on it. The entities themselves live in
//! the world's arenas; relocating an insect is an id transfer between two
//! cells, not an object move.

use crate::emitter::Emitter;
use crate::{InsectId, PlantId};
use serde::{Deserialize, Serialize};

/// One parcel of the garden grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    x: u16,
    y: u16,
    plants: Vec<PlantId>,
    insects: Vec<InsectId>,
    emitter: Option<Emitter>,
    moisture: f64,
    fertilizer_ticks: u32,
    pesticide_ticks: u32,
    watered: bool,
}

impl Cell {
    pub fn new(x: u16, y: u16, moisture: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&moisture),
            "cell moisture must be within [0, 1]"
        );
        Ok(Self {
            x,
            y,
            plants: Vec::new(),
            insects: Vec::new(),
            emitter: None,
            moisture,
            fertilizer_ticks: 0,
            pesticide_ticks: 0,
            watered: false,
        })
    }

    #[must_use]
    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn moisture(&self) -> f64 {
        self.moisture
    }

    #[must_use]
    pub fn fertilizer_ticks(&self) -> u32 {
        self.fertilizer_ticks
    }

    #[must_use]
    pub fn pesticide_ticks(&self) -> u32 {
        self.pesticide_ticks
    }

    #[must_use]
    pub fn fertilizer_active(&self) -> bool {
        self.fertilizer_ticks > 0
    }

    #[must_use]
    pub fn pesticide_active(&self) -> bool {
        self.pesticide_ticks > 0
    }

    #[must_use]
    pub fn plants(&self) -> &[PlantId] {
        &self.plants
    }

    #[must_use]
    pub fn insects(&self) -> &[InsectId] {
        &self.insects
    }

    #[must_use]
    pub fn emitter(&self) -> Option<&Emitter> {
        self.emitter.as_ref()
    }

    pub(crate) fn emitter_mut(&mut self) -> Option<&mut Emitter> {
        self.emitter.as_mut()
    }

    pub(crate) fn set_emitter(&mut self, emitter: Emitter) {
        self.emitter = Some(emitter);
    }

    pub(crate) fn add_plant(&mut self, id: PlantId) {
        self.plants.push(id);
    }

    pub(crate) fn add_insect(&mut self, id: InsectId) {
        self.insects.push(id);
    }

    pub(crate) fn remove_insect(&mut self, id: InsectId) {
        self.insects.retain(|&other| other != id);
    }

    /// Waters the cell: moisture rises by `amount` (capped at 1) and the
    /// cell skips desiccation this tick. Returns the new moisture.
    pub fn water(&mut self, amount: f64) -> f64 {
        self.moisture = (self.moisture + amount).min(1.0);
        self.watered = true;
        self.moisture
    }

    /// Restarts the fertilizer effect countdown.
    pub fn apply_fertilizer(&mut self, duration: u32) {
        self.fertilizer_ticks = duration;
    }

    /// Restarts the pesticide effect countdown.
    pub fn apply_pesticide(&mut self, duration: u32) {
        self.pesticide_ticks = duration;
    }

    /// Soil-phase settlement: unwatered cells dry out by `desiccation`
    /// (floored at 0), substance countdowns tick down, and the watered flag
    /// resets for the next tick.
    pub fn settle_soil(&mut self, desiccation: f64) {
        if self.watered {
            self.watered = false;
        } else {
            self.moisture = (self.moisture - desiccation).max(0.0);
        }
        self.fertilizer_ticks = self.fertilizer_ticks.saturating_sub(1);
        self.pesticide_ticks = self.pesticide_ticks.saturating_sub(1);
    }
}
