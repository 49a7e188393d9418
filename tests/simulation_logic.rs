mod common;

use verdant::{Sex, SimConfig, Simulation, Substance, World};

#[test]
fn moisture_stays_in_the_unit_interval() {
    let mut scenario = common::full_grid(4, 4, 50);
    scenario.cells[5].emitter = Some(common::constant_emitter(2, Substance::Water));
    let mut world = World::from_scenario(&scenario, 13, SimConfig::default()).unwrap();

    for _ in 0..50 {
        world.tick().unwrap();
        for id in 0..16 {
            let moisture = world.cell(id).unwrap().moisture();
            assert!((0.0..=1.0).contains(&moisture), "moisture {moisture} escaped");
        }
    }
}

#[test]
fn watering_shields_cells_from_drying_that_tick() {
    let mut scenario = common::full_grid(1, 2, 30);
    scenario.cells[1].emitter = Some(common::constant_emitter(1, Substance::Water));
    let mut world = World::from_scenario(&scenario, 13, SimConfig::default()).unwrap();

    world.run().unwrap();

    // Watered every tick, never dried: capped at full saturation.
    assert_eq!(world.cell_at(0, 0).unwrap().moisture(), 1.0);
}

#[test]
fn emitters_age_once_per_tick() {
    let mut scenario = common::full_grid(2, 2, 7);
    scenario.cells[3].emitter = Some(common::constant_emitter(1, Substance::Water));
    let mut world = World::from_scenario(&scenario, 13, SimConfig::default()).unwrap();

    world.run().unwrap();

    let snapshot = world.snapshot();
    let emitter = snapshot.cells[3].emitter.as_ref().unwrap();
    assert_eq!(emitter.age, 7);
    assert_eq!(snapshot.tick, 7);
}

#[test]
fn census_agrees_with_the_cell_rosters() {
    let mut scenario = common::full_grid(3, 3, 30);
    let mut genome = common::aphid_genome();
    genome.mobility = 0.8;
    scenario.cells[4].plants.push(common::tomato());
    scenario.cells[4].plants.push(common::tomato());
    for sex in [Sex::Female, Sex::Male] {
        scenario.cells[4].insects.push(verdant::InsectSpec {
            genome,
            ..common::aphid(sex)
        });
    }
    let mut world = World::from_scenario(&scenario, 13, SimConfig::default()).unwrap();

    world.run().unwrap();

    let total: usize = world.insect_census().values().sum();
    assert_eq!(total, world.live_insects().count());
    let rostered: usize = (0..9)
        .filter_map(|id| world.cell(id))
        .map(|cell| cell.insects().len())
        .sum();
    assert_eq!(rostered, total);
    // Every insect's back-reference matches the roster holding it, and the
    // per-cell census agrees with the roster size.
    for id in 0..9 {
        let Some(cell) = world.cell(id) else { continue };
        for &iid in cell.insects() {
            assert_eq!(world.insect(iid).unwrap().cell(), id);
        }
        let per_cell: usize = world.cell_insect_census(id).unwrap().values().sum();
        assert_eq!(per_cell, cell.insects().len());
    }
}

#[test]
fn harvest_log_is_append_only() {
    let mut scenario = common::full_grid(2, 2, 30);
    scenario.cells[0].plants.push(common::tomato());
    scenario.cells[3].plants.push(common::tomato());
    let mut world = World::from_scenario(&scenario, 13, SimConfig::default()).unwrap();

    let mut seen = 0;
    for _ in 0..30 {
        world.tick().unwrap();
        let log = world.harvest_log();
        assert!(log.len() >= seen, "harvest log shrank");
        seen = log.len();
    }
    assert_eq!(seen, 6);
    assert_eq!(world.metrics().counter("harvests"), 6);
}

#[test]
fn simulation_facade_runs_to_completion() {
    let mut scenario = common::full_grid(2, 2, 15);
    scenario.cells[0].plants.push(common::tomato());
    let mut sim = Simulation::from_scenario(&scenario, 99, SimConfig::default()).unwrap();

    sim.run().unwrap();

    assert!(sim.world().is_finished());
    assert_eq!(sim.world().current_tick(), 15);
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.name.as_deref(), Some("test garden"));
    assert_eq!(snapshot.tick, 15);

    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(json["tick"], 15);
    assert_eq!(json["cells"][0]["plants"][0]["species"], "tomato");
}

#[test]
fn metrics_track_tick_and_population_counts() {
    let mut scenario = common::full_grid(2, 2, 10);
    scenario.cells[0].plants.push(common::tomato());
    scenario.cells[0].insects.push(common::aphid(Sex::Female));
    let mut world = World::from_scenario(&scenario, 13, SimConfig::default()).unwrap();

    world.run().unwrap();

    assert_eq!(world.metrics().tick_count(), 10);
    assert_eq!(world.metrics().insect_count(), world.live_insects().count() as u64);
}
