//! Insects: mobile agents with heritable traits.
//!
//! The pure life-cycle rules live here (feeding, survival judgment,
//! availability, movement probability) together with the genetics used when
//! two insects reproduce: masked trait crossover and rare single-trait
//! Gaussian mutation. Placement, partner search and relocation are driven by
//! the world, which owns the arenas and the RNG.

use crate::config::InsectConfig;
use crate::CellId;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdant_data::{Genome, InsectSpec, Sex};

/// Number of heritable traits in a [`Genome`].
pub const GENE_COUNT: usize = 6;

/// Consecutive meals after which feeding starts restoring health.
const HEAL_STREAK: u32 = 3;

/// Why an insect died, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Starvation,
    Pesticide,
    OldAge,
}

impl DeathCause {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Starvation => "starvation",
            DeathCause::Pesticide => "pesticide",
            DeathCause::OldAge => "old_age",
        }
    }
}

/// A mobile agent living on one cell at a time.
///
/// `since_reproduction` and `since_meal` use `u32::MAX` as "never": founders
/// have neither reproduced nor eaten, and saturating increments keep the
/// sentinel stable - exactly the semantics of an infinite counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insect {
    id: Uuid,
    species: String,
    sex: Sex,
    genome: Genome,
    // Mutable state
    health: u32,
    age: u32,
    maturity: u32,
    since_reproduction: u32,
    since_meal: u32,
    meal_streak: u32,
    cell: CellId,
}

impl Insect {
    /// An adult insect as described by a scenario: full health, immediately
    /// mature.
    pub fn adult(spec: &InsectSpec, id: Uuid, cell: CellId) -> anyhow::Result<Self> {
        spec.validate()?;
        Ok(Self {
            id,
            species: spec.species.clone(),
            sex: spec.sex,
            genome: spec.genome,
            health: spec.genome.max_health,
            age: 0,
            maturity: 0,
            since_reproduction: u32::MAX,
            since_meal: u32::MAX,
            meal_streak: 0,
            cell,
        })
    }

    /// A newborn from reproduction: reduced starting health and a maturity
    /// threshold of twice its own reproduction cooldown.
    #[must_use]
    pub fn newborn(
        species: String,
        sex: Sex,
        genome: Genome,
        id: Uuid,
        cell: CellId,
        child_health_fraction: f64,
    ) -> Self {
        let health = (f64::from(genome.max_health) * child_health_fraction)
            .round()
            .max(1.0) as u32;
        Self {
            id,
            species,
            sex,
            genome,
            health,
            age: 0,
            maturity: genome.reproduction_cooldown.saturating_mul(2),
            since_reproduction: u32::MAX,
            since_meal: u32::MAX,
            meal_streak: 0,
            cell,
        }
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
    pub fn sex(&self) -> Sex {
        self.sex
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub fn maturity(&self) -> u32 {
        self.maturity
    }

    #[must_use]
    pub fn since_meal(&self) -> u32 {
        self.since_meal
    }

    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub(crate) fn set_cell(&mut self, cell: CellId) {
        self.cell = cell;
    }

    /// Soil-phase bookkeeping: one tick of age.
    pub fn tick_age(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Bumps the reproduction counter; runs at the head of every
    /// reproduction step, available or not.
    pub fn tick_reproduction(&mut self) {
        self.since_reproduction = self.since_reproduction.saturating_add(1);
    }

    pub fn reset_reproduction(&mut self) {
        self.since_reproduction = 0;
    }

    /// Whether the insect can reproduce: cooldown elapsed, mature, and fed
    /// recently enough.
    #[must_use]
    pub fn is_available(&self, hunger_threshold: u32) -> bool {
        self.since_reproduction > self.genome.reproduction_cooldown
            && self.age >= self.maturity
            && self.since_meal < hunger_threshold
    }

    /// One feeding step. With a plant on the cell the insect eats, and a
    /// streak of three meals starts restoring one health per tick (capped).
    /// Without one it starves: the streak breaks and one health is lost
    /// (floored at zero).
    pub fn feed(&mut self, plants_present: bool) -> bool {
        if plants_present {
            self.since_meal = 0;
            self.meal_streak += 1;
            if self.meal_streak >= HEAL_STREAK {
                self.health = (self.health + 1).min(self.genome.max_health);
            }
            true
        } else {
            self.since_meal = self.since_meal.saturating_add(1);
            self.meal_streak = 0;
            self.health = self.health.saturating_sub(1);
            false
        }
    }

    /// Judges survival this tick. Death comes from exhausted health, from a
    /// failed resistance draw while pesticide is active on the cell, or from
    /// outliving the genome's lifespan.
    pub fn judge_survival<R: Rng>(
        &self,
        pesticide_active: bool,
        rng: &mut R,
    ) -> Option<DeathCause> {
        if self.health == 0 {
            return Some(DeathCause::Starvation);
        }
        if pesticide_active && rng.gen::<f64>() > self.genome.resistance {
            return Some(DeathCause::Pesticide);
        }
        if self.age > self.genome.lifespan {
            return Some(DeathCause::OldAge);
        }
        None
    }

    /// Effective movement probability: base mobility, doubled when starving,
    /// halved when health is low.
    #[must_use]
    pub fn movement_probability(&self, config: &InsectConfig) -> f64 {
        let mut probability = self.genome.mobility;
        if self.since_meal >= config.hunger_threshold {
            probability *= 2.0;
        }
        if f64::from(self.health) < f64::from(self.genome.max_health) * config.low_health_fraction
        {
            probability /= 2.0;
        }
        probability
    }
}

/// Trait values flattened for crossover, in a fixed order.
fn gene_values(genome: &Genome) -> [f64; GENE_COUNT] {
    [
        f64::from(genome.max_health),
        f64::from(genome.lifespan),
        genome.mobility,
        genome.resistance,
        f64::from(genome.reproduction_cooldown),
        f64::from(genome.max_litter),
    ]
}

/// Clamps flattened trait values back into their domains and rebuilds the
/// genome. Integer traits are rounded.
fn genome_from_values(genes: [f64; GENE_COUNT]) -> Genome {
    Genome {
        max_health: genes[0].round().max(1.0) as u32,
        lifespan: genes[1].round().max(1.0) as u32,
        mobility: genes[2].clamp(0.0, 1.0),
        resistance: genes[3].clamp(0.0, 1.0),
        reproduction_cooldown: genes[4].round().max(0.0) as u32,
        max_litter: genes[5].round().max(0.0) as u32,
    }
}

/// Builds one offspring genome from two parents.
///
/// Each trait is drawn from one parent according to a random assignment
/// vector that is rerolled until it takes at least one trait from each
/// parent. With probability `mutation_rate` exactly one trait is then
/// perturbed by a Gaussian centered on its value, and every trait is clamped
/// back into its domain.
pub fn crossover<R: Rng>(
    a: &Genome,
    b: &Genome,
    config: &InsectConfig,
    rng: &mut R,
) -> Genome {
    let genes_a = gene_values(a);
    let genes_b = gene_values(b);

    let mut mask = [false; GENE_COUNT];
    loop {
        for slot in &mut mask {
            *slot = rng.gen();
        }
        if mask.iter().any(|&m| m) && !mask.iter().all(|&m| m) {
            break;
        }
    }

    let mut genes = [0.0; GENE_COUNT];
    for i in 0..GENE_COUNT {
        genes[i] = if mask[i] { genes_b[i] } else { genes_a[i] };
    }

    if rng.gen::<f64>() < config.mutation_rate {
        let slot = rng.gen_range(0..GENE_COUNT);
        if let Ok(normal) = Normal::new(genes[slot], config.mutation_sigma) {
            genes[slot] = normal.sample(rng);
        }
    }

    genome_from_values(genes)
}
