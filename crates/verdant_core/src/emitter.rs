//! Periodic substance emitters.
//!
//! An emitter sits on one cell and carries a list of programs, one substance
//! each. Every tick the set of actively diffused substances is derived from
//! the programs' schedules and the emitter's age; the set is never stored.

use serde::{Deserialize, Serialize};
use verdant_data::{EmitterSpec, ProgramSpec, Substance};

/// One substance's activation schedule on an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    substance: Substance,
    start: u64,
    duration: u64,
    period: u64,
}

impl Program {
    pub fn new(substance: Substance, start: u64, duration: u64, period: u64) -> anyhow::Result<Self> {
        let spec = ProgramSpec {
            substance,
            start,
            duration,
            period,
        };
        Self::from_spec(&spec)
    }

    pub fn from_spec(spec: &ProgramSpec) -> anyhow::Result<Self> {
        spec.validate()?;
        Ok(Self {
            substance: spec.substance,
            start: spec.start,
            duration: spec.duration,
            period: spec.period,
        })
    }

    #[must_use]
    pub fn substance(&self) -> Substance {
        self.substance
    }

    /// Whether the program fires at the given emitter age: the program has
    /// started and the age falls in the active head of its period.
    #[must_use]
    pub fn is_active(&self, age: u64) -> bool {
        age >= self.start && (age - self.start) % self.period < self.duration
    }
}

/// The set of substances an emitter diffuses on a given tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSubstances {
    pub water: bool,
    pub fertilizer: bool,
    pub pesticide: bool,
}

impl ActiveSubstances {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.water || self.fertilizer || self.pesticide)
    }
}

/// A fixed-position diffuser with a Manhattan radius and a set of programs.
///
/// All programs share the emitter's single age counter, advanced once per
/// tick in the soil phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emitter {
    radius: u32,
    programs: Vec<Program>,
    age: u64,
}

impl Emitter {
    pub fn new(radius: u32, programs: Vec<Program>) -> anyhow::Result<Self> {
        anyhow::ensure!(radius >= 1, "emitter radius must be positive");
        Ok(Self {
            radius,
            programs,
            age: 0,
        })
    }

    pub fn from_spec(spec: &EmitterSpec) -> anyhow::Result<Self> {
        let programs = spec
            .programs
            .iter()
            .map(Program::from_spec)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Self::new(spec.radius, programs)
    }

    #[must_use]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    #[must_use]
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Substances diffused this tick: the union over all currently active
    /// programs. Recomputed on every call.
    #[must_use]
    pub fn active_substances(&self) -> ActiveSubstances {
        let mut active = ActiveSubstances::default();
        for program in &self.programs {
            if program.is_active(self.age) {
                match program.substance {
                    Substance::Water => active.water = true,
                    Substance::Fertilizer => active.fertilizer = true,
                    Substance::Pesticide => active.pesticide = true,
                }
            }
        }
        active
    }

    /// Advances the emitter's age by one tick.
    pub fn tick(&mut self) {
        self.age += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_pattern_three_on_two_off() {
        let program = Program::new(Substance::Water, 5, 3, 5).unwrap();
        let active: Vec<u64> = (0..13).filter(|&age| program.is_active(age)).collect();
        assert_eq!(active, vec![5, 6, 7, 10, 11, 12]);
    }

    #[test]
    fn zero_duration_never_fires() {
        let program = Program::new(Substance::Pesticide, 0, 0, 4).unwrap();
        assert!((0..50).all(|age| !program.is_active(age)));
    }

    #[test]
    fn period_one_runs_continuously() {
        let program = Program::new(Substance::Fertilizer, 2, 1, 1).unwrap();
        assert!(!program.is_active(1));
        assert!((2..50).all(|age| program.is_active(age)));
    }

    #[test]
    fn construction_validation() {
        assert!(Program::new(Substance::Water, 0, 3, 2).is_err());
        assert!(Program::new(Substance::Water, 0, 1, 0).is_err());
        assert!(Emitter::new(0, vec![]).is_err());
    }

    #[test]
    fn active_set_is_the_union_of_firing_programs() {
        let mut emitter = Emitter::new(
            2,
            vec![
                Program::new(Substance::Water, 0, 1, 2).unwrap(),
                Program::new(Substance::Pesticide, 1, 1, 2).unwrap(),
            ],
        )
        .unwrap();

        let now = emitter.active_substances();
        assert!(now.water && !now.pesticide && !now.fertilizer);

        emitter.tick();
        let now = emitter.active_substances();
        assert!(!now.water && now.pesticide);

        let idle = Emitter::new(1, vec![]).unwrap().active_substances();
        assert!(idle.is_empty());
    }
}
