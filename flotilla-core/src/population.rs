//! Generation bookkeeping: a seeded fleet of genomes, score accrual during
//! a generation, and survivor-based replacement at its boundary.

use crate::fitness::sort_by_points_descending;
use crate::genome::{inherit, mutate_non_uniform, mutate_uniform, seed_genome};
use crate::{validate_config, GenerationClock, SimError};
use flotilla_types::{BoatGenome, BoatId, GenerationMetrics, GenomeRecord, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// How offspring genomes are perturbed at a generation boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MutationStrategy {
    Uniform { factor: f32, chance_percent: f32 },
    NonUniform { shape: f32 },
}

/// One boat's evolution-side state. Points accumulate externally during a
/// generation; `None` means the boat has not been scored yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetMember {
    pub id: BoatId,
    pub genome: BoatGenome,
    pub points: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Population {
    config: WorldConfig,
    seed: u64,
    rng: ChaCha8Rng,
    next_boat_id: u64,
    members: Vec<FleetMember>,
}

impl Population {
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, SimError> {
        validate_config(&config)?;

        let mut population = Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_boat_id: 0,
            members: Vec::new(),
        };
        population.seed_initial_fleet();
        Ok(population)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn members(&self) -> &[FleetMember] {
        &self.members
    }

    /// Restores the population to its freshly seeded state, optionally
    /// under a new seed.
    pub fn reset(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or(self.seed);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.next_boat_id = 0;
        self.members.clear();
        self.seed_initial_fleet();
    }

    pub fn award_points(&mut self, id: BoatId, delta: f32) {
        if let Some(member) = self.members.iter_mut().find(|member| member.id == id) {
            *member.points.get_or_insert(0.0) += delta;
        }
    }

    /// Orders members best-first; unscored members sort ahead of scored
    /// ones, consistent with the direction-candidate ranking rule.
    pub fn rank(&mut self) {
        sort_by_points_descending(&mut self.members, |member| member.points);
    }

    /// Min/mid/max score triple for the current generation. Unscored boats
    /// count as zero here.
    pub fn metrics(&self, generation: u32) -> GenerationMetrics {
        let mut points: Vec<f32> = self
            .members
            .iter()
            .map(|member| member.points.unwrap_or(0.0))
            .collect();
        points.sort_by(f32::total_cmp);

        let min_points = points.first().copied().unwrap_or(0.0);
        let max_points = points.last().copied().unwrap_or(0.0);
        let mid_points = points.get(points.len() / 2).copied().unwrap_or(0.0);
        GenerationMetrics {
            generation,
            min_points,
            mid_points,
            max_points,
        }
    }

    pub fn genome_records(&self) -> Vec<GenomeRecord> {
        self.members
            .iter()
            .map(|member| GenomeRecord::from(member.genome))
            .collect()
    }

    /// Closes out a generation: rank, keep the configured survivors with
    /// their scores cleared, and refill the fleet with mutated offspring
    /// whose parents cycle through the survivor list.
    pub fn advance_generation(&mut self, strategy: MutationStrategy, clock: &dyn GenerationClock) {
        let target = self.members.len();
        self.rank();

        let survivor_count = (self.config.survivor_count as usize).clamp(1, target.max(1));
        self.members.truncate(survivor_count);
        for member in &mut self.members {
            member.points = None;
        }

        let parents: Vec<BoatGenome> = self.members.iter().map(|member| member.genome).collect();
        for slot in 0..target.saturating_sub(survivor_count) {
            let mut child = inherit(&parents[slot % parents.len()]);
            match strategy {
                MutationStrategy::Uniform {
                    factor,
                    chance_percent,
                } => mutate_uniform(
                    &mut child,
                    &self.config.limits,
                    factor,
                    chance_percent,
                    &mut self.rng,
                ),
                MutationStrategy::NonUniform { shape } => mutate_non_uniform(
                    &mut child,
                    &self.config.limits,
                    clock.current_generation(),
                    clock.max_generation(),
                    shape,
                    &mut self.rng,
                ),
            }
            let id = self.alloc_boat_id();
            self.members.push(FleetMember {
                id,
                genome: child,
                points: None,
            });
        }
    }

    fn seed_initial_fleet(&mut self) {
        for _ in 0..self.config.num_boats {
            let genome = seed_genome(&self.config.seed_genome, &self.config.limits, &mut self.rng);
            let id = self.alloc_boat_id();
            self.members.push(FleetMember {
                id,
                genome,
                points: None,
            });
        }
    }

    fn alloc_boat_id(&mut self) -> BoatId {
        let id = BoatId(self.next_boat_id);
        self.next_boat_id += 1;
        id
    }
}
