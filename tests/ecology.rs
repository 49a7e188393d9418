mod common;

use verdant::{ActiveSubstances, Sex, SimConfig, Substance, World};

#[test]
fn suckering_plants_spread_across_the_grid() {
    let mut scenario = common::full_grid(3, 3, 12);
    scenario.cells[4].plants.push(common::creeper());
    let mut world = World::from_scenario(&scenario, 5, SimConfig::default()).unwrap();

    world.run().unwrap();

    let count = world.live_plants().count();
    assert!(count > 1, "a certain colonizer should have spread, got {count}");
    assert_eq!(world.metrics().counter("colonizations") as usize, count - 1);
    // Ground occupancy never overshoots on any cell.
    for id in 0..9 {
        assert!(world.cell_footprint(id).unwrap() <= 1.0);
    }
}

#[test]
fn fertilizer_doubles_the_growth_delta() {
    let mut plain = common::full_grid(1, 2, 5);
    plain.cells[0].plants.push(common::tomato());
    let mut control = World::from_scenario(&plain, 9, SimConfig::default()).unwrap();
    let mut fertilized = World::from_scenario(&plain, 9, SimConfig::default()).unwrap();

    // Fertilize the plant's cell from its neighbor before the first tick.
    fertilized
        .diffuse(
            1,
            1,
            ActiveSubstances {
                water: false,
                fertilizer: true,
                pesticide: false,
            },
        )
        .unwrap();

    control.tick().unwrap();
    fertilized.tick().unwrap();

    let plain_age = control.live_plants().next().unwrap().age();
    let boosted_age = fertilized.live_plants().next().unwrap().age();
    assert_eq!(plain_age, 2.0);
    assert_eq!(boosted_age, 4.0);
}

#[test]
fn insect_pressure_slows_growth() {
    let mut grazed = common::full_grid(1, 1, 3);
    grazed.cells[0].plants.push(common::tomato());
    grazed.cells[0].insects.push(common::aphid(Sex::Female));
    let mut world = World::from_scenario(&grazed, 9, SimConfig::default()).unwrap();

    world.run().unwrap();

    // Occupied and humid: one growth point per tick instead of two.
    let plant = world.live_plants().next().unwrap();
    assert_eq!(plant.age(), 3.0);
}

#[test]
fn growth_stalls_outside_the_humidity_band() {
    let mut scenario = common::full_grid(1, 1, 3);
    let mut picky = common::tomato();
    picky.humidity_min = 0.4;
    scenario.cells[0].plants.push(picky);
    let mut world = World::from_scenario(&scenario, 9, SimConfig::default()).unwrap();

    // Tick 1 sees moisture 0.5 (in band, delta 2); the soil then dries to
    // 0.3 and 0.1, out of band, so ticks 2 and 3 yield delta 1.
    world.run().unwrap();
    assert_eq!(world.live_plants().next().unwrap().age(), 4.0);
}

#[test]
fn pesticide_taints_harvests() {
    let mut scenario = common::full_grid(1, 2, 20);
    scenario.cells[0].plants.push(common::tomato());
    scenario.cells[1].emitter = Some(common::constant_emitter(1, Substance::Pesticide));
    let mut world = World::from_scenario(&scenario, 9, SimConfig::default()).unwrap();

    world.run().unwrap();

    let log = world.harvest_log();
    assert!(!log.is_empty());
    for record in log {
        assert!(
            record.pesticide_ticks > 0,
            "fruit grown under a pesticide emitter should carry exposure"
        );
    }
}

#[test]
fn pesticide_culls_by_resistance() {
    let mut scenario = common::full_grid(1, 2, 15);
    scenario.cells[0].plants.push(common::tomato());
    // Same sex on purpose: no pairing muddies the count.
    let mut fragile = common::aphid(Sex::Female);
    fragile.genome.resistance = 0.0;
    let mut hardened = common::aphid(Sex::Female);
    hardened.genome.resistance = 1.0;
    scenario.cells[0].insects.push(fragile);
    scenario.cells[0].insects.push(hardened);
    scenario.cells[1].emitter = Some(common::constant_emitter(1, Substance::Pesticide));
    let mut world = World::from_scenario(&scenario, 9, SimConfig::default()).unwrap();

    world.run().unwrap();

    // The unresistant insect dies to the first spray; the fully resistant
    // one shrugs every draw off.
    let survivors: Vec<_> = world.live_insects().collect();
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].genome().resistance, 1.0);
}

#[test]
fn irrigation_sustains_a_dry_garden() {
    let mut scenario = common::full_grid(3, 1, 30);
    for cell in &mut scenario.cells {
        cell.moisture = Some(0.0);
    }
    scenario.cells[1].emitter = Some(common::constant_emitter(1, Substance::Water));
    let mut world = World::from_scenario(&scenario, 9, SimConfig::default()).unwrap();

    world.run().unwrap();

    // Watered cells hold moisture; the emitter's own cell stays parched.
    assert!(world.cell_at(0, 0).unwrap().moisture() > 0.0);
    assert!(world.cell_at(2, 0).unwrap().moisture() > 0.0);
    assert_eq!(world.cell_at(1, 0).unwrap().moisture(), 0.0);
}
