#![allow(dead_code)]

use verdant::{
    CellSpec, EmitterSpec, Genome, InsectSpec, PlantSpec, ProgramSpec, ScenarioSpec, Sex, Substance,
};

pub fn bare_cell(x: u16, y: u16) -> CellSpec {
    CellSpec {
        x,
        y,
        moisture: None,
        plants: vec![],
        insects: vec![],
        emitter: None,
    }
}

/// A scenario where every grid position holds a bare cell.
pub fn full_grid(width: u16, height: u16, ticks: u64) -> ScenarioSpec {
    let mut cells = Vec::new();
    for y in 0..height {
        for x in 0..width {
            cells.push(bare_cell(x, y));
        }
    }
    ScenarioSpec {
        name: Some("test garden".into()),
        width,
        height,
        ticks,
        cells,
    }
}

/// A fruit plant tolerant of any humidity. Matures quickly, yields up to
/// three harvests.
pub fn tomato() -> PlantSpec {
    PlantSpec {
        species: "tomato".into(),
        maturation_age: 2,
        max_harvests: 3,
        harvest_growth: 4,
        humidity_min: 0.0,
        humidity_max: 1.0,
        footprint: 0.4,
        colonization: None,
    }
}

/// A suckering ground cover that always tries to spread.
pub fn creeper() -> PlantSpec {
    PlantSpec {
        species: "mint".into(),
        maturation_age: 1,
        max_harvests: 0,
        harvest_growth: 1,
        humidity_min: 0.0,
        humidity_max: 1.0,
        footprint: 0.2,
        colonization: Some(1.0),
    }
}

pub fn aphid_genome() -> Genome {
    Genome {
        max_health: 10,
        lifespan: 1000,
        mobility: 0.0,
        resistance: 1.0,
        reproduction_cooldown: 2,
        max_litter: 3,
    }
}

pub fn aphid(sex: Sex) -> InsectSpec {
    InsectSpec {
        species: "aphid".into(),
        sex,
        genome: aphid_genome(),
    }
}

/// An emitter whose program for `substance` is active every tick.
pub fn constant_emitter(radius: u32, substance: Substance) -> EmitterSpec {
    EmitterSpec {
        radius,
        programs: vec![ProgramSpec {
            substance,
            start: 0,
            duration: 1,
            period: 1,
        }],
    }
}
