//! Verdant - a deterministic, tick-based garden ecosystem simulation.
//!
//! This crate is the public face of the workspace. The data model (scenario
//! and entity parameter types) lives in `verdant_data`, the engine in
//! `verdant_core`; both are re-exported here so most users only need this
//! crate.

pub use verdant_core::{
    init_logging, ActiveSubstances, Cell, CellId, Emitter, Insect, InsectId, Metrics, Plant,
    PlantId, Program, SimConfig, World, WorldSnapshot,
};
pub use verdant_data::{
    CellSpec, EmitterSpec, Genome, HarvestRecord, InsectSpec, PlantSpec, ProgramSpec, ScenarioSpec,
    Sex, Substance,
};

/// A world bundled with its run loop. Thin convenience over [`World`] for
/// callers that just want to build a garden and let it play out.
pub struct Simulation {
    world: World,
}

impl Simulation {
    /// Builds a simulation from a parsed scenario.
    pub fn from_scenario(
        scenario: &ScenarioSpec,
        seed: u64,
        config: SimConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            world: World::from_scenario(scenario, seed, config)?,
        })
    }

    /// An empty garden of bare soil with default constants.
    pub fn new(width: u16, height: u16, ticks: u64, seed: u64) -> anyhow::Result<Self> {
        Ok(Self {
            world: World::empty(width, height, ticks, seed, SimConfig::default())?,
        })
    }

    /// Advances one tick; reports whether budget remains.
    pub fn tick(&mut self) -> anyhow::Result<bool> {
        self.world.tick()
    }

    /// Runs to the end of the tick budget.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.world.run()
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }
}
