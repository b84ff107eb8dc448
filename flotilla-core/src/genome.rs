//! Gene-level evolution operators: uniform per-gene perturbation and
//! generation-annealed non-uniform mutation.

use flotilla_types::{BoatGenome, CategoryResponse, GeneLimits, GenomeRecord, SeedGenomeConfig};
use rand::Rng;

/// Exponent applied to the annealed mutation factor.
pub const DEFAULT_SHAPE_PARAMETER: f32 = 0.5;

/// The evolvable genes. `RandomDirectionRange` is one paired gene (both
/// bounds move under a single mutation gate); each category weight and
/// distance factor counts separately, for eleven genes total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gene {
    VisionSteps,
    RayRadius,
    Sight,
    MovingSpeed,
    RandomDirectionRange,
    BoxWeight,
    BoxDistanceFactor,
    BoatWeight,
    BoatDistanceFactor,
    EnemyWeight,
    EnemyDistanceFactor,
}

impl Gene {
    pub const ALL: [Gene; 11] = [
        Gene::VisionSteps,
        Gene::RayRadius,
        Gene::Sight,
        Gene::MovingSpeed,
        Gene::RandomDirectionRange,
        Gene::BoxWeight,
        Gene::BoxDistanceFactor,
        Gene::BoatWeight,
        Gene::BoatDistanceFactor,
        Gene::EnemyWeight,
        Gene::EnemyDistanceFactor,
    ];
}

/// Founding genome: scalar genes come from the seed config, category
/// responses are drawn uniformly within the weight limits, and the sweep
/// step is derived as `360 / ray_radius` — the only moment that derivation
/// happens.
pub fn seed_genome<R>(config: &SeedGenomeConfig, limits: &GeneLimits, rng: &mut R) -> BoatGenome
where
    R: Rng + ?Sized,
{
    let ray_radius = config
        .ray_radius
        .clamp(limits.min_ray_radius, limits.max_ray_radius);
    let vision_steps = (360 / ray_radius.max(1)).max(limits.min_vision_steps);

    BoatGenome {
        vision_steps,
        ray_radius,
        sight: config.sight.max(limits.min_sight),
        moving_speed: config.moving_speed.max(limits.min_moving_speed),
        random_direction_range: config.random_direction_range,
        box_response: random_response(limits, rng),
        boat_response: random_response(limits, rng),
        enemy_response: random_response(limits, rng),
    }
}

fn random_response<R>(limits: &GeneLimits, rng: &mut R) -> CategoryResponse
where
    R: Rng + ?Sized,
{
    CategoryResponse {
        weight: rng.random_range(limits.min_weight..=limits.max_weight),
        distance_factor: rng.random_range(limits.min_weight..=limits.max_weight),
    }
}

/// Exact field-wise copy of a parent genome.
pub fn inherit(parent: &BoatGenome) -> BoatGenome {
    *parent
}

/// Read-only flat export for handing parameters to offspring or loggers.
pub fn snapshot(genome: &BoatGenome) -> GenomeRecord {
    GenomeRecord::from(*genome)
}

/// Uniform mutation: each gene independently passes a `[0, 100)` percent
/// gate, then shifts by a uniform delta in `[-factor, +factor]`. Integer
/// genes truncate. Only the documented floors (and the 360° ray cap) are
/// enforced; weights and the random-direction range stay unclamped.
pub fn mutate_uniform<R>(
    genome: &mut BoatGenome,
    limits: &GeneLimits,
    mutation_factor: f32,
    mutation_chance_percent: f32,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    for gene in Gene::ALL {
        if rng.random_range(0.0..100.0) < mutation_chance_percent {
            perturb_uniform(genome, gene, limits, mutation_factor, rng);
        }
    }
}

fn perturb_uniform<R>(
    genome: &mut BoatGenome,
    gene: Gene,
    limits: &GeneLimits,
    factor: f32,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    match gene {
        Gene::VisionSteps => {
            let next = (genome.vision_steps as f32 + uniform_delta(factor, rng)) as i32;
            genome.vision_steps = next.max(limits.min_vision_steps);
        }
        Gene::RayRadius => {
            let next = (genome.ray_radius as f32 + uniform_delta(factor, rng)) as i32;
            genome.ray_radius = next.clamp(limits.min_ray_radius, limits.max_ray_radius);
        }
        Gene::Sight => {
            apply_sight_delta(genome, limits, uniform_delta(factor, rng));
        }
        Gene::MovingSpeed => {
            apply_speed_delta(genome, limits, uniform_delta(factor, rng));
        }
        Gene::RandomDirectionRange => {
            genome.random_direction_range.0 += uniform_delta(factor, rng);
            genome.random_direction_range.1 += uniform_delta(factor, rng);
        }
        // Uniform mode leaves the category responses unclamped.
        weight_gene => *weight_slot(genome, weight_gene) += uniform_delta(factor, rng),
    }
}

fn uniform_delta<R>(factor: f32, rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    if factor > 0.0 {
        rng.random_range(-factor..=factor)
    } else {
        0.0
    }
}

/// Non-uniform mutation: every gene moves toward one of its bounds by a
/// factor that anneals to zero as `generation` approaches
/// `max_generation`. Bounded genes are clamped into `[min, max]`;
/// sight/speed instead route their delta through the coupling rule.
pub fn mutate_non_uniform<R>(
    genome: &mut BoatGenome,
    limits: &GeneLimits,
    generation: u32,
    max_generation: u32,
    shape: f32,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    for gene in Gene::ALL {
        match gene {
            Gene::VisionSteps => {
                let next = non_uniform_step(
                    genome.vision_steps as f32,
                    limits.min_vision_steps as f32,
                    limits.max_vision_steps as f32,
                    generation,
                    max_generation,
                    shape,
                    rng,
                );
                genome.vision_steps =
                    (next as i32).clamp(limits.min_vision_steps, limits.max_vision_steps);
            }
            Gene::RayRadius => {
                let next = non_uniform_step(
                    genome.ray_radius as f32,
                    limits.min_ray_radius as f32,
                    limits.max_ray_radius as f32,
                    generation,
                    max_generation,
                    shape,
                    rng,
                );
                genome.ray_radius =
                    (next as i32).clamp(limits.min_ray_radius, limits.max_ray_radius);
            }
            Gene::Sight => {
                let current = genome.sight;
                let next = non_uniform_step(
                    current,
                    limits.min_sight,
                    limits.max_sight,
                    generation,
                    max_generation,
                    shape,
                    rng,
                );
                // Coupled from the freshly mutated value; see DESIGN.md on
                // the reference's stale-sight quirk.
                apply_sight_delta(genome, limits, next - current);
            }
            Gene::MovingSpeed => {
                let current = genome.moving_speed;
                let next = non_uniform_step(
                    current,
                    limits.min_moving_speed,
                    limits.max_moving_speed,
                    generation,
                    max_generation,
                    shape,
                    rng,
                );
                apply_speed_delta(genome, limits, next - current);
            }
            Gene::RandomDirectionRange => {
                let (low, high) = genome.random_direction_range;
                genome.random_direction_range = (
                    bounded_non_uniform_step(
                        low,
                        limits.min_random_direction,
                        limits.max_random_direction,
                        generation,
                        max_generation,
                        shape,
                        rng,
                    ),
                    bounded_non_uniform_step(
                        high,
                        limits.min_random_direction,
                        limits.max_random_direction,
                        generation,
                        max_generation,
                        shape,
                        rng,
                    ),
                );
            }
            weight_gene => {
                let slot = weight_slot(genome, weight_gene);
                *slot = bounded_non_uniform_step(
                    *slot,
                    limits.min_weight,
                    limits.max_weight,
                    generation,
                    max_generation,
                    shape,
                    rng,
                );
            }
        }
    }
}

fn weight_slot(genome: &mut BoatGenome, gene: Gene) -> &mut f32 {
    match gene {
        Gene::BoxWeight => &mut genome.box_response.weight,
        Gene::BoxDistanceFactor => &mut genome.box_response.distance_factor,
        Gene::BoatWeight => &mut genome.boat_response.weight,
        Gene::BoatDistanceFactor => &mut genome.boat_response.distance_factor,
        Gene::EnemyWeight => &mut genome.enemy_response.weight,
        Gene::EnemyDistanceFactor => &mut genome.enemy_response.distance_factor,
        _ => unreachable!("not a category weight gene"),
    }
}

/// One application of the non-uniform operator: push toward the upper bound
/// when `r1 < 0.5`, otherwise toward the lower bound with the
/// negative-minimum sign adjustment.
fn non_uniform_step<R>(
    value: f32,
    min: f32,
    max: f32,
    generation: u32,
    max_generation: u32,
    shape: f32,
    rng: &mut R,
) -> f32
where
    R: Rng + ?Sized,
{
    let r1: f32 = rng.random();
    let factor = anneal_factor(generation, max_generation, shape, rng);
    if r1 < 0.5 {
        value + (max - value) * factor
    } else if min >= 0.0 {
        value - (min + value) * factor
    } else {
        value + (min - value) * factor
    }
}

fn bounded_non_uniform_step<R>(
    value: f32,
    min: f32,
    max: f32,
    generation: u32,
    max_generation: u32,
    shape: f32,
    rng: &mut R,
) -> f32
where
    R: Rng + ?Sized,
{
    non_uniform_step(value, min, max, generation, max_generation, shape, rng).clamp(min, max)
}

/// `F = (r2 * (1 - generation/max_generation))^shape`. The base is clamped
/// to zero so a generation at or past the horizon (or a zero horizon)
/// yields `F = 0` rather than a NaN exponent.
fn anneal_factor<R>(generation: u32, max_generation: u32, shape: f32, rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    let progress = if max_generation == 0 {
        1.0
    } else {
        (generation as f32 / max_generation as f32).min(1.0)
    };
    let base = (rng.random::<f32>() * (1.0 - progress)).max(0.0);
    base.powf(shape)
}

/// Sight/speed trade-off: whatever one gene gains, the other pays, both
/// floored at their minimums. The coupled delta is the applied delta, i.e.
/// the difference between the old and the post-floor new value.
pub(crate) fn apply_sight_delta(genome: &mut BoatGenome, limits: &GeneLimits, delta: f32) {
    let old = genome.sight;
    genome.sight = (old + delta).max(limits.min_sight);
    let applied = genome.sight - old;
    genome.moving_speed = (genome.moving_speed - applied).max(limits.min_moving_speed);
}

pub(crate) fn apply_speed_delta(genome: &mut BoatGenome, limits: &GeneLimits, delta: f32) {
    let old = genome.moving_speed;
    genome.moving_speed = (old + delta).max(limits.min_moving_speed);
    let applied = genome.moving_speed - old;
    genome.sight = (genome.sight - applied).max(limits.min_sight);
}
