//! Plants: growth, harvest and colonization state.
//!
//! A single `Plant` type covers both ordinary and suckering plants; the
//! latter carry a colonization probability and are dispatched by the phase
//! loop, there is no subtype. Plant age is a real-valued growth accumulator,
//! not a tick count: a plant in good conditions ages faster than wall time.

use crate::CellId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdant_data::{HarvestRecord, PlantSpec};

/// What a plant sees of its cell when growing.
#[derive(Debug, Clone, Copy)]
pub struct CellConditions {
    pub moisture: f64,
    pub fertilized: bool,
    pub insects_present: bool,
}

/// A stationary organism rooted on one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    id: Uuid,
    species: String,
    maturation_age: u32,
    max_harvests: u32,
    harvest_growth: u32,
    humidity: (f64, f64),
    footprint: f64,
    colonization: Option<f64>,
    // Mutable state
    age: f64,
    growth: f64,
    harvests_done: u32,
    pesticide_ticks: u32,
    cell: CellId,
}

impl Plant {
    pub fn from_spec(spec: &PlantSpec, id: Uuid, cell: CellId) -> anyhow::Result<Self> {
        spec.validate()?;
        Ok(Self {
            id,
            species: spec.species.clone(),
            maturation_age: spec.maturation_age,
            max_harvests: spec.max_harvests,
            harvest_growth: spec.harvest_growth,
            humidity: (spec.humidity_min, spec.humidity_max),
            footprint: spec.footprint,
            colonization: spec.colonization,
            age: 0.0,
            growth: 0.0,
            harvests_done: 0,
            pesticide_ticks: 0,
            cell,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    #[must_use]
    pub fn footprint(&self) -> f64 {
        self.footprint
    }

    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    #[must_use]
    pub fn age(&self) -> f64 {
        self.age
    }

    #[must_use]
    pub fn growth(&self) -> f64 {
        self.growth
    }

    #[must_use]
    pub fn harvests_done(&self) -> u32 {
        self.harvests_done
    }

    #[must_use]
    pub fn pesticide_ticks(&self) -> u32 {
        self.pesticide_ticks
    }

    /// Colonization probability; `None` for plants that never spread.
    #[must_use]
    pub fn colonization(&self) -> Option<f64> {
        self.colonization
    }

    /// Mature plants bear fruit and can colonize.
    #[must_use]
    pub fn is_mature(&self) -> bool {
        self.age >= f64::from(self.maturation_age)
    }

    /// A plant stops producing once it has yielded its maximum harvests.
    #[must_use]
    pub fn is_productive(&self) -> bool {
        self.is_mature() && self.harvests_done < self.max_harvests
    }

    /// One growth step. The delta depends on fertilizer, the humidity band
    /// and insect pressure:
    /// `max(0, (1 + fertilized) * (1 + humid_ok - occupied))`.
    ///
    /// The delta feeds the plant's age, and - once the plant is mature, with
    /// the age just updated - the growth accumulator toward the next harvest.
    pub fn grow(&mut self, conditions: CellConditions) -> f64 {
        let humid_ok =
            conditions.moisture >= self.humidity.0 && conditions.moisture <= self.humidity.1;
        let fertilized = i32::from(conditions.fertilized);
        let occupied = i32::from(conditions.insects_present);
        let delta = f64::from(((1 + fertilized) * (1 + i32::from(humid_ok) - occupied)).max(0));
        self.age += delta;
        if self.is_mature() {
            self.growth += delta;
        }
        delta
    }

    /// Picks a fruit if one is ripe: the plant must be productive and its
    /// growth accumulator must have reached the harvest threshold. Returns
    /// the record to append to the world's harvest log.
    pub fn try_harvest(&mut self) -> Option<HarvestRecord> {
        if self.is_productive() && self.growth >= f64::from(self.harvest_growth) {
            self.growth = 0.0;
            self.harvests_done += 1;
            Some(HarvestRecord {
                species: self.species.clone(),
                pesticide_ticks: self.pesticide_ticks,
            })
        } else {
            None
        }
    }

    /// Soil-phase bookkeeping: count a tick spent under active pesticide.
    /// Plants do not age by wall ticks; only [`Plant::grow`] moves their age.
    pub fn record_pesticide_exposure(&mut self) {
        self.pesticide_ticks += 1;
    }

    /// A fresh offshoot of this plant with identical parameters at age 0,
    /// rooted on `cell`.
    #[must_use]
    pub fn sprout(&self, id: Uuid, cell: CellId) -> Self {
        Self {
            id,
            species: self.species.clone(),
            maturation_age: self.maturation_age,
            max_harvests: self.max_harvests,
            harvest_growth: self.harvest_growth,
            humidity: self.humidity,
            footprint: self.footprint,
            colonization: self.colonization,
            age: 0.0,
            growth: 0.0,
            harvests_done: 0,
            pesticide_ticks: 0,
            cell,
        }
    }
}
