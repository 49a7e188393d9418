//! The world: grid, arenas and the tick pipeline.
//!
//! The world owns everything: the grid of optional cells, flat arenas for
//! plants and insects (cells hold ids, entities hold their cell id), the
//! seeded RNG, the tick counter and the harvest log. One tick runs four
//! strict phases across the whole grid - plants, insects, emitters, soil -
//! each phase finishing everywhere before the next one starts.
//!
//! Phases that create or relocate entities iterate over a roster captured at
//! phase start, so offspring, fresh colonizers and movers are never
//! processed twice (or at all) within the tick that produced them.

use crate::cell::Cell;
use crate::config::SimConfig;
use crate::emitter::{ActiveSubstances, Emitter};
use crate::insect::{self, Insect};
use crate::metrics::Metrics;
use crate::plant::{CellConditions, Plant};
use crate::spatial::GridIndex;
use crate::{CellId, InsectId, PlantId};
use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::time::Instant;
use uuid::Uuid;
use verdant_data::{HarvestRecord, InsectSpec, PlantSpec, ScenarioSpec, Sex};

pub struct World {
    name: Option<String>,
    index: GridIndex,
    cells: Vec<Option<Cell>>,
    plants: Vec<Option<Plant>>,
    insects: Vec<Option<Insect>>,
    tick: u64,
    budget: u64,
    harvest: Vec<HarvestRecord>,
    config: SimConfig,
    rng: ChaCha8Rng,
    metrics: Metrics,
}

impl World {
    /// Builds a world from a fully-parsed scenario. Construction is atomic:
    /// any out-of-domain parameter anywhere in the scenario fails the whole
    /// build and no world is returned.
    ///
    /// The seed is supplied explicitly; two worlds built from the same
    /// scenario, seed and config evolve identically.
    pub fn from_scenario(
        scenario: &ScenarioSpec,
        seed: u64,
        config: SimConfig,
    ) -> anyhow::Result<Self> {
        scenario.validate()?;
        config.validate()?;
        let index = GridIndex::new(scenario.width, scenario.height);
        let mut world = Self {
            name: scenario.name.clone(),
            index,
            cells: (0..index.len()).map(|_| None).collect(),
            plants: Vec::new(),
            insects: Vec::new(),
            tick: 0,
            budget: scenario.ticks,
            harvest: Vec::new(),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            metrics: Metrics::new(),
        };
        for spec in &scenario.cells {
            let cell_id = index.id_at(spec.x, spec.y);
            let moisture = spec.moisture.unwrap_or(config.soil.initial_moisture);
            let mut cell = Cell::new(spec.x, spec.y, moisture)?;
            if let Some(emitter_spec) = &spec.emitter {
                cell.set_emitter(Emitter::from_spec(emitter_spec)?);
            }
            world.cells[cell_id] = Some(cell);
            for plant_spec in &spec.plants {
                world.spawn_plant(cell_id, plant_spec)?;
            }
            for insect_spec in &spec.insects {
                world.spawn_insect(cell_id, insect_spec)?;
            }
        }
        tracing::info!(
            name = world.name.as_deref().unwrap_or("unnamed"),
            width = scenario.width,
            height = scenario.height,
            budget = scenario.ticks,
            config = %config.fingerprint(),
            "world built"
        );
        Ok(world)
    }

    /// A full grid of bare cells at default moisture, with no entities.
    pub fn empty(
        width: u16,
        height: u16,
        ticks: u64,
        seed: u64,
        config: SimConfig,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(width >= 1, "grid width must be positive");
        anyhow::ensure!(height >= 1, "grid height must be positive");
        anyhow::ensure!(ticks >= 1, "tick budget must be positive");
        config.validate()?;
        let index = GridIndex::new(width, height);
        let mut cells = Vec::with_capacity(index.len());
        for id in 0..index.len() {
            let (x, y) = index.coords(id);
            cells.push(Some(Cell::new(x, y, config.soil.initial_moisture)?));
        }
        Ok(Self {
            name: None,
            index,
            cells,
            plants: Vec::new(),
            insects: Vec::new(),
            tick: 0,
            budget: ticks,
            harvest: Vec::new(),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            metrics: Metrics::new(),
        })
    }

    // ------------------------------------------------------------------
    // Construction helpers
    // ------------------------------------------------------------------

    /// Roots a new plant on an existing cell. Fails if the cell's ground
    /// would be over-occupied.
    pub fn spawn_plant(&mut self, cell_id: CellId, spec: &PlantSpec) -> anyhow::Result<PlantId> {
        spec.validate()?;
        let occupied = self.cell_footprint(cell_id)?;
        anyhow::ensure!(
            occupied + spec.footprint <= 1.0,
            "plants would occupy more ground than cell {cell_id} has"
        );
        let id = Uuid::from_u128(self.rng.gen());
        let plant_id = self.plants.len();
        self.plants.push(Some(Plant::from_spec(spec, id, cell_id)?));
        self.cell_mut(cell_id)?.add_plant(plant_id);
        tracing::debug!(species = %spec.species, cell = cell_id, "plant rooted");
        Ok(plant_id)
    }

    /// Settles a new adult insect on an existing cell.
    pub fn spawn_insect(&mut self, cell_id: CellId, spec: &InsectSpec) -> anyhow::Result<InsectId> {
        let id = Uuid::from_u128(self.rng.gen());
        let insect_id = self.insects.len();
        self.insects.push(Some(Insect::adult(spec, id, cell_id)?));
        self.cell_mut(cell_id)?.add_insect(insect_id);
        tracing::debug!(species = %spec.species, cell = cell_id, "insect settled");
        Ok(insect_id)
    }

    // ------------------------------------------------------------------
    // Tick pipeline
    // ------------------------------------------------------------------

    /// Advances the simulation by one tick and reports whether any budget
    /// remains. Once the budget is exhausted the world is finished but may
    /// still be stepped manually.
    pub fn tick(&mut self) -> anyhow::Result<bool> {
        let started = Instant::now();
        self.phase_plants()?;
        self.phase_insects()?;
        self.phase_emitters()?;
        self.phase_soil()?;
        self.tick += 1;
        let insects = self.insects.iter().flatten().count();
        let plants = self.plants.iter().flatten().count();
        self.metrics.record_tick(started.elapsed(), insects, plants);
        Ok(self.tick < self.budget)
    }

    /// Runs the simulation to the end of its tick budget.
    pub fn run(&mut self) -> anyhow::Result<()> {
        while self.tick()? {}
        Ok(())
    }

    fn phase_plants(&mut self) -> anyhow::Result<()> {
        let roster = self.plant_roster();
        for plant_ids in &roster {
            for &id in plant_ids {
                self.grow_plant(id)?;
            }
            for &id in plant_ids {
                self.harvest_plant(id)?;
            }
            for &id in plant_ids {
                self.colonize_plant(id)?;
            }
        }
        Ok(())
    }

    fn phase_insects(&mut self) -> anyhow::Result<()> {
        let roster = self.insect_roster();
        for insect_ids in &roster {
            for &id in insect_ids {
                self.insect_survive(id)?;
            }
            for &id in insect_ids {
                self.insect_feed(id)?;
            }
            for &id in insect_ids {
                self.insect_reproduce(id)?;
            }
            for &id in insect_ids {
                self.insect_move(id)?;
            }
        }
        Ok(())
    }

    fn phase_emitters(&mut self) -> anyhow::Result<()> {
        let firing: Vec<(CellId, u32, ActiveSubstances)> = self
            .cells
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| {
                let emitter = slot.as_ref()?.emitter()?;
                Some((id, emitter.radius(), emitter.active_substances()))
            })
            .collect();
        for (cell_id, radius, active) in firing {
            if active.is_empty() {
                continue;
            }
            tracing::trace!(
                cell = cell_id,
                radius,
                water = active.water,
                fertilizer = active.fertilizer,
                pesticide = active.pesticide,
                "emitter firing"
            );
            self.diffuse(cell_id, radius, active)?;
        }
        Ok(())
    }

    fn phase_soil(&mut self) -> anyhow::Result<()> {
        let desiccation = self.config.soil.desiccation;
        for cell_id in self.cell_ids() {
            let (plant_ids, insect_ids, pesticide) = {
                let cell = self
                    .cells
                    .get_mut(cell_id)
                    .and_then(Option::as_mut)
                    .with_context(|| format!("cell {cell_id} vanished mid-tick"))?;
                cell.settle_soil(desiccation);
                if let Some(emitter) = cell.emitter_mut() {
                    emitter.tick();
                }
                (
                    cell.plants().to_vec(),
                    cell.insects().to_vec(),
                    cell.pesticide_active(),
                )
            };
            if pesticide {
                for id in plant_ids {
                    if let Some(plant) = self.plants.get_mut(id).and_then(Option::as_mut) {
                        plant.record_pesticide_exposure();
                    }
                }
            }
            for id in insect_ids {
                if let Some(insect) = self.insects.get_mut(id).and_then(Option::as_mut) {
                    insect.tick_age();
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plant steps
    // ------------------------------------------------------------------

    fn grow_plant(&mut self, id: PlantId) -> anyhow::Result<()> {
        let cell_id = self.plant_ref(id)?.cell();
        let conditions = {
            let cell = self.cell_ref(cell_id)?;
            CellConditions {
                moisture: cell.moisture(),
                fertilized: cell.fertilizer_active(),
                insects_present: !cell.insects().is_empty(),
            }
        };
        let plant = self
            .plants
            .get_mut(id)
            .and_then(Option::as_mut)
            .with_context(|| format!("plant {id} vanished mid-phase"))?;
        let delta = plant.grow(conditions);
        tracing::trace!(species = plant.species(), cell = cell_id, delta, "growth");
        Ok(())
    }

    fn harvest_plant(&mut self, id: PlantId) -> anyhow::Result<()> {
        let record = self
            .plants
            .get_mut(id)
            .and_then(Option::as_mut)
            .with_context(|| format!("plant {id} vanished mid-phase"))?
            .try_harvest();
        if let Some(record) = record {
            tracing::debug!(
                species = %record.species,
                pesticide_ticks = record.pesticide_ticks,
                "harvest"
            );
            self.metrics.increment_counter("harvests");
            self.harvest.push(record);
        }
        Ok(())
    }

    fn colonize_plant(&mut self, id: PlantId) -> anyhow::Result<bool> {
        let (cell_id, probability, footprint) = {
            let plant = self.plant_ref(id)?;
            let Some(probability) = plant.colonization() else {
                return Ok(false);
            };
            if !plant.is_mature() {
                return Ok(false);
            }
            (plant.cell(), probability, plant.footprint())
        };
        if self.rng.gen::<f64>() > probability {
            return Ok(false);
        }
        let mut open = Vec::new();
        for neighbor in self.neighbors(cell_id, 1)? {
            if self.cell_footprint(neighbor)? + footprint <= 1.0 {
                open.push(neighbor);
            }
        }
        if open.is_empty() {
            return Ok(false);
        }
        let target = open[self.rng.gen_range(0..open.len())];
        let sprout_id = Uuid::from_u128(self.rng.gen());
        let sprout = self.plant_ref(id)?.sprout(sprout_id, target);
        let species = sprout.species().to_string();
        let plant_id = self.plants.len();
        self.plants.push(Some(sprout));
        self.cell_mut(target)?.add_plant(plant_id);
        self.metrics.increment_counter("colonizations");
        tracing::debug!(species = %species, from = cell_id, to = target, "colonization");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Insect steps
    // ------------------------------------------------------------------

    fn insect_survive(&mut self, id: InsectId) -> anyhow::Result<()> {
        let Some(insect) = self.insects.get(id).and_then(Option::as_ref) else {
            return Ok(());
        };
        let cell_id = insect.cell();
        let pesticide = self
            .cells
            .get(cell_id)
            .and_then(Option::as_ref)
            .with_context(|| format!("insect {id} sits on a missing cell"))?
            .pesticide_active();
        let cause = insect.judge_survival(pesticide, &mut self.rng);
        if let Some(cause) = cause {
            let species = insect.species().to_string();
            self.cell_mut(cell_id)?.remove_insect(id);
            self.insects[id] = None;
            self.metrics.increment_counter("deaths");
            tracing::debug!(
                species = %species,
                cell = cell_id,
                cause = cause.as_str(),
                "insect death"
            );
        }
        Ok(())
    }

    fn insect_feed(&mut self, id: InsectId) -> anyhow::Result<()> {
        let Some(insect) = self.insects.get(id).and_then(Option::as_ref) else {
            return Ok(());
        };
        let cell_id = insect.cell();
        let plants_present = !self
            .cells
            .get(cell_id)
            .and_then(Option::as_ref)
            .with_context(|| format!("insect {id} sits on a missing cell"))?
            .plants()
            .is_empty();
        if let Some(insect) = self.insects.get_mut(id).and_then(Option::as_mut) {
            insect.feed(plants_present);
        }
        Ok(())
    }

    fn insect_reproduce(&mut self, id: InsectId) -> anyhow::Result<()> {
        let hunger = self.config.insect.hunger_threshold;
        let (cell_id, species, sex, genome, available) = {
            let Some(insect) = self.insects.get_mut(id).and_then(Option::as_mut) else {
                return Ok(());
            };
            insect.tick_reproduction();
            (
                insect.cell(),
                insect.species().to_string(),
                insect.sex(),
                *insect.genome(),
                insect.is_available(hunger),
            )
        };
        if !available {
            return Ok(());
        }
        let candidates: Vec<InsectId> = self
            .cell_ref(cell_id)?
            .insects()
            .iter()
            .copied()
            .filter(|&other| other != id)
            .filter(|&other| {
                self.insects
                    .get(other)
                    .and_then(Option::as_ref)
                    .is_some_and(|partner| {
                        partner.species() == species
                            && partner.sex() == sex.opposite()
                            && partner.is_available(hunger)
                    })
            })
            .collect();
        if candidates.is_empty() {
            return Ok(());
        }
        let partner_id = candidates[self.rng.gen_range(0..candidates.len())];
        let partner_genome = {
            let partner = self
                .insects
                .get_mut(partner_id)
                .and_then(Option::as_mut)
                .with_context(|| format!("partner {partner_id} vanished mid-phase"))?;
            partner.reset_reproduction();
            *partner.genome()
        };
        if let Some(insect) = self.insects.get_mut(id).and_then(Option::as_mut) {
            insect.reset_reproduction();
        }
        // A partner whose litter trait drifted to zero pairs but bears no
        // offspring.
        if partner_genome.max_litter == 0 {
            return Ok(());
        }
        let litter = self.rng.gen_range(1..=partner_genome.max_litter);
        for _ in 0..litter {
            let child_genome =
                insect::crossover(&genome, &partner_genome, &self.config.insect, &mut self.rng);
            let child_sex = if self.rng.gen::<bool>() {
                Sex::Male
            } else {
                Sex::Female
            };
            let child_id = Uuid::from_u128(self.rng.gen());
            let newborn = Insect::newborn(
                species.clone(),
                child_sex,
                child_genome,
                child_id,
                cell_id,
                self.config.insect.child_health_fraction,
            );
            let insect_id = self.insects.len();
            self.insects.push(Some(newborn));
            self.cell_mut(cell_id)?.add_insect(insect_id);
            self.metrics.increment_counter("births");
        }
        tracing::debug!(species = %species, cell = cell_id, litter, "reproduction");
        Ok(())
    }

    fn insect_move(&mut self, id: InsectId) -> anyhow::Result<bool> {
        let (cell_id, probability) = {
            let Some(insect) = self.insects.get(id).and_then(Option::as_ref) else {
                return Ok(false);
            };
            (insect.cell(), insect.movement_probability(&self.config.insect))
        };
        if self.rng.gen::<f64>() >= probability {
            return Ok(false);
        }
        let Some(target) = self.random_neighbor(cell_id, 1)? else {
            return Ok(false);
        };
        self.cell_mut(cell_id)?.remove_insect(id);
        self.cell_mut(target)?.add_insect(id);
        if let Some(insect) = self.insects.get_mut(id).and_then(Option::as_mut) {
            insect.set_cell(target);
        }
        tracing::trace!(insect = id, from = cell_id, to = target, "relocation");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Spatial queries and diffusion
    // ------------------------------------------------------------------

    /// Every existing cell within Manhattan distance 1..=radius of `origin`.
    pub fn neighbors(&self, origin: CellId, radius: u32) -> anyhow::Result<Vec<CellId>> {
        self.index
            .neighbors(origin, radius, |id| self.cells[id].is_some())
    }

    /// A uniformly drawn existing neighbor, or `None` when the origin has
    /// no neighbors at all.
    pub fn random_neighbor(
        &mut self,
        origin: CellId,
        radius: u32,
    ) -> anyhow::Result<Option<CellId>> {
        let found = self.neighbors(origin, radius)?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found[self.rng.gen_range(0..found.len())]))
        }
    }

    /// Applies the given substances to every existing cell within `radius`
    /// of `origin`. The origin cell is not part of its own neighborhood and
    /// is left untouched.
    pub fn diffuse(
        &mut self,
        origin: CellId,
        radius: u32,
        substances: ActiveSubstances,
    ) -> anyhow::Result<()> {
        let soil = self.config.soil;
        for id in self.neighbors(origin, radius)? {
            let cell = self
                .cells
                .get_mut(id)
                .and_then(Option::as_mut)
                .with_context(|| format!("cell {id} vanished mid-diffusion"))?;
            if substances.water {
                cell.water(soil.irrigation_amount);
            }
            if substances.fertilizer {
                cell.apply_fertilizer(soil.fertilizer_duration);
            }
            if substances.pesticide {
                cell.apply_pesticide(soil.pesticide_duration);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Observability
    // ------------------------------------------------------------------

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// An owned snapshot of the whole world state.
    #[must_use]
    pub fn snapshot(&self) -> crate::snapshot::WorldSnapshot {
        crate::snapshot::WorldSnapshot::capture(self)
    }

    #[must_use]
    pub fn grid(&self) -> &GridIndex {
        &self.index
    }

    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Whether the tick budget is exhausted. A finished world may still be
    /// stepped manually.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tick >= self.budget
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The append-only log of every fruit harvested so far.
    #[must_use]
    pub fn harvest_log(&self) -> &[HarvestRecord] {
        &self.harvest
    }

    /// Harvest counts tallied per species.
    #[must_use]
    pub fn harvest_by_species(&self) -> BTreeMap<String, usize> {
        let mut tally = BTreeMap::new();
        for record in &self.harvest {
            *tally.entry(record.species.clone()).or_insert(0) += 1;
        }
        tally
    }

    /// Live insect counts per species across the whole world.
    #[must_use]
    pub fn insect_census(&self) -> BTreeMap<String, usize> {
        let mut census = BTreeMap::new();
        for insect in self.live_insects() {
            *census.entry(insect.species().to_string()).or_insert(0) += 1;
        }
        census
    }

    /// Live insect counts per species on one cell.
    pub fn cell_insect_census(&self, cell_id: CellId) -> anyhow::Result<BTreeMap<String, usize>> {
        let mut census = BTreeMap::new();
        for &id in self.cell_ref(cell_id)?.insects() {
            if let Some(insect) = self.insects.get(id).and_then(Option::as_ref) {
                *census.entry(insect.species().to_string()).or_insert(0) += 1;
            }
        }
        Ok(census)
    }

    /// The cell at grid position `(x, y)`, if one exists there.
    #[must_use]
    pub fn cell_at(&self, x: u16, y: u16) -> Option<&Cell> {
        if !self.index.contains(x, y) {
            return None;
        }
        self.cells[self.index.id_at(x, y)].as_ref()
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn plant(&self, id: PlantId) -> Option<&Plant> {
        self.plants.get(id).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn insect(&self, id: InsectId) -> Option<&Insect> {
        self.insects.get(id).and_then(Option::as_ref)
    }

    pub fn live_plants(&self) -> impl Iterator<Item = &Plant> {
        self.plants.iter().flatten()
    }

    pub fn live_insects(&self) -> impl Iterator<Item = &Insect> {
        self.insects.iter().flatten()
    }

    /// Total ground fraction occupied by the plants on one cell.
    pub fn cell_footprint(&self, cell_id: CellId) -> anyhow::Result<f64> {
        let mut total = 0.0;
        for &id in self.cell_ref(cell_id)?.plants() {
            total += self.plant_ref(id)?.footprint();
        }
        Ok(total)
    }

    // ------------------------------------------------------------------
    // Arena access
    // ------------------------------------------------------------------

    fn cell_ids(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|_| id))
            .collect()
    }

    /// Per-cell plant ids captured before the plant phase runs anywhere.
    fn plant_roster(&self) -> Vec<Vec<PlantId>> {
        self.cells
            .iter()
            .filter_map(|slot| slot.as_ref().map(|cell| cell.plants().to_vec()))
            .collect()
    }

    /// Per-cell insect ids captured before the insect phase runs anywhere.
    fn insect_roster(&self) -> Vec<Vec<InsectId>> {
        self.cells
            .iter()
            .filter_map(|slot| slot.as_ref().map(|cell| cell.insects().to_vec()))
            .collect()
    }

    fn cell_ref(&self, id: CellId) -> anyhow::Result<&Cell> {
        self.cells
            .get(id)
            .and_then(Option::as_ref)
            .with_context(|| format!("no cell with id {id}"))
    }

    fn cell_mut(&mut self, id: CellId) -> anyhow::Result<&mut Cell> {
        self.cells
            .get_mut(id)
            .and_then(Option::as_mut)
            .with_context(|| format!("no cell with id {id}"))
    }

    fn plant_ref(&self, id: PlantId) -> anyhow::Result<&Plant> {
        self.plants
            .get(id)
            .and_then(Option::as_ref)
            .with_context(|| format!("no plant with id {id}"))
    }
}
