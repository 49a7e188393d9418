//! Shared data types for the Verdant garden simulation.
//!
//! This crate holds the plain, serializable vocabulary of the engine:
//! substances, sexes, insect genomes, harvest records, and the fully-parsed
//! scenario description an external loader hands to `verdant_core`. No
//! simulation behavior lives here beyond construction-time validation.

use serde::{Deserialize, Serialize};

/// A substance diffused by an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Substance {
    Water,
    Fertilizer,
    Pesticide,
}

/// Insect sex. Reproduction requires one insect of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

/// The six heritable traits of an insect.
///
/// Every trait participates in crossover and mutation; the valid domains are
/// enforced by [`Genome::validate`] at construction and re-clamped by the
/// genetics code after mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Health ceiling, strictly positive.
    pub max_health: u32,
    /// Maximum age in ticks, strictly positive.
    pub lifespan: u32,
    /// Base probability of moving each tick, in [0, 1].
    pub mobility: f64,
    /// Probability of surviving a pesticide exposure, in [0, 1].
    pub resistance: f64,
    /// Minimum ticks between two reproductions.
    pub reproduction_cooldown: u32,
    /// Largest litter this insect can father/mother as the chosen partner.
    pub max_litter: u32,
}

impl Genome {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.max_health >= 1, "max_health must be positive");
        anyhow::ensure!(self.lifespan >= 1, "lifespan must be positive");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mobility),
            "mobility must be within [0, 1]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.resistance),
            "resistance must be within [0, 1]"
        );
        Ok(())
    }
}

/// One harvested fruit: the species it came from and how many ticks the
/// plant had spent under active pesticide when it was picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub species: String,
    pub pesticide_ticks: u32,
}

/// One substance's activation schedule on an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSpec {
    pub substance: Substance,
    /// First tick (of the emitter's life) at which the program can fire.
    pub start: u64,
    /// Active ticks at the head of each period. Zero means never active.
    pub duration: u64,
    /// Schedule period; must be positive and at least `duration`.
    pub period: u64,
}

impl ProgramSpec {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.period >= 1, "program period must be positive");
        anyhow::ensure!(
            self.period >= self.duration,
            "program period must be at least its duration"
        );
        Ok(())
    }
}

/// A fixed-position periodic diffuser of water, fertilizer or pesticide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterSpec {
    /// Manhattan radius of effect, strictly positive.
    pub radius: u32,
    pub programs: Vec<ProgramSpec>,
}

impl EmitterSpec {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.radius >= 1, "emitter radius must be positive");
        for program in &self.programs {
            program.validate()?;
        }
        Ok(())
    }
}

/// Construction parameters for one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSpec {
    pub species: String,
    /// Minimum age before the plant bears fruit.
    pub maturation_age: u32,
    /// Total harvests the plant can yield over its life.
    pub max_harvests: u32,
    /// Accumulated growth required between two harvests.
    pub harvest_growth: u32,
    /// Inclusive humidity band [lo, hi] the plant tolerates.
    pub humidity_min: f64,
    pub humidity_max: f64,
    /// Fraction of the cell's ground the plant occupies, in [0.2, 1].
    pub footprint: f64,
    /// Colonization probability for suckering plants; `None` for plants
    /// that never spread.
    pub colonization: Option<f64>,
}

impl PlantSpec {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.humidity_min) && (0.0..=1.0).contains(&self.humidity_max),
            "humidity band must be within [0, 1]"
        );
        anyhow::ensure!(
            self.humidity_min <= self.humidity_max,
            "humidity_min must not exceed humidity_max"
        );
        anyhow::ensure!(
            (0.2..=1.0).contains(&self.footprint),
            "footprint must be within [0.2, 1]"
        );
        if let Some(p) = self.colonization {
            anyhow::ensure!(
                (0.0..=1.0).contains(&p),
                "colonization probability must be within [0, 1]"
            );
        }
        Ok(())
    }
}

/// Construction parameters for one insect, created as an adult.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsectSpec {
    pub species: String,
    pub sex: Sex,
    pub genome: Genome,
}

impl InsectSpec {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.genome.validate()
    }
}

/// One populated cell in the scenario. Grid positions absent from the
/// scenario stay void.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSpec {
    pub x: u16,
    pub y: u16,
    /// Initial soil moisture; the engine default applies when `None`.
    pub moisture: Option<f64>,
    #[serde(default)]
    pub plants: Vec<PlantSpec>,
    #[serde(default)]
    pub insects: Vec<InsectSpec>,
    pub emitter: Option<EmitterSpec>,
}

impl CellSpec {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(moisture) = self.moisture {
            anyhow::ensure!(
                (0.0..=1.0).contains(&moisture),
                "cell moisture must be within [0, 1]"
            );
        }
        let mut footprint = 0.0;
        for plant in &self.plants {
            plant.validate()?;
            footprint += plant.footprint;
        }
        anyhow::ensure!(
            footprint <= 1.0,
            "plants on cell ({}, {}) occupy more ground than the cell has",
            self.x,
            self.y
        );
        for insect in &self.insects {
            insect.validate()?;
        }
        if let Some(emitter) = &self.emitter {
            emitter.validate()?;
        }
        Ok(())
    }
}

/// The fully-parsed, already-validated scenario an external loader hands to
/// the engine. The engine never reads files itself; it only checks that the
/// parameters here are in domain before building a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Display name, carried through to snapshots.
    pub name: Option<String>,
    pub width: u16,
    pub height: u16,
    /// Tick budget of the simulation.
    pub ticks: u64,
    #[serde(default)]
    pub cells: Vec<CellSpec>,
}

impl ScenarioSpec {
    /// Validates the whole scenario. Any out-of-domain parameter, duplicate
    /// or out-of-bounds cell position fails the scenario as a whole.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.width >= 1, "grid width must be positive");
        anyhow::ensure!(self.height >= 1, "grid height must be positive");
        anyhow::ensure!(self.ticks >= 1, "tick budget must be positive");
        let mut seen = std::collections::HashSet::new();
        for cell in &self.cells {
            anyhow::ensure!(
                cell.x < self.width && cell.y < self.height,
                "cell ({}, {}) lies outside the {}x{} grid",
                cell.x,
                cell.y,
                self.width,
                self.height
            );
            anyhow::ensure!(
                seen.insert((cell.x, cell.y)),
                "duplicate cell at ({}, {})",
                cell.x,
                cell.y
            );
            cell.validate()?;
        }
        Ok(())
    }
}
