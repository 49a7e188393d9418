use criterion::{black_box, criterion_group, criterion_main, Criterion};
use verdant_core::spatial::GridIndex;
use verdant_core::{SimConfig, World};
use verdant_data::{Genome, InsectSpec, PlantSpec, Sex};

fn plant_spec() -> PlantSpec {
    PlantSpec {
        species: "tomato".into(),
        maturation_age: 5,
        max_harvests: 20,
        harvest_growth: 6,
        humidity_min: 0.1,
        humidity_max: 0.9,
        footprint: 0.3,
        colonization: Some(0.1),
    }
}

fn insect_spec(i: usize) -> InsectSpec {
    InsectSpec {
        species: "aphid".into(),
        sex: if i % 2 == 0 { Sex::Male } else { Sex::Female },
        genome: Genome {
            max_health: 20,
            lifespan: 200,
            mobility: 0.3,
            resistance: 0.5,
            reproduction_cooldown: 5,
            max_litter: 2,
        },
    }
}

fn populated_world() -> World {
    let mut world = World::empty(32, 32, u64::MAX, 42, SimConfig::default()).unwrap();
    let index = GridIndex::new(32, 32);
    for i in 0..256 {
        let cell = index.id_at((i % 16) as u16 * 2, (i / 16) as u16 * 2);
        world.spawn_plant(cell, &plant_spec()).unwrap();
        world.spawn_insect(cell, &insect_spec(i)).unwrap();
    }
    world
}

fn bench_tick_populated(c: &mut Criterion) {
    c.bench_function("tick_32x32_512_entities", |b| {
        let mut world = populated_world();
        b.iter(|| {
            world.tick().unwrap();
            black_box(world.current_tick())
        })
    });
}

fn bench_tick_empty(c: &mut Criterion) {
    c.bench_function("tick_32x32_bare_soil", |b| {
        let mut world = World::empty(32, 32, u64::MAX, 42, SimConfig::default()).unwrap();
        b.iter(|| {
            world.tick().unwrap();
            black_box(world.current_tick())
        })
    });
}

fn bench_neighbors_radius(c: &mut Criterion) {
    let world = World::empty(64, 64, 1, 42, SimConfig::default()).unwrap();
    let origin = GridIndex::new(64, 64).id_at(32, 32);

    c.bench_function("neighbors_radius_8", |b| {
        b.iter(|| black_box(world.neighbors(origin, 8).unwrap().len()))
    });
}

criterion_group!(
    benches,
    bench_tick_populated,
    bench_tick_empty,
    bench_neighbors_radius
);
criterion_main!(benches);
