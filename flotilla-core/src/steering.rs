//! Utility-based local steering: fan out candidate directions around the
//! current heading, score each from a sensor ray, pick one.

use crate::{Pose, SensorField};
use flotilla_types::BoatGenome;
use glam::{Quat, Vec3};
use rand::Rng;

/// The frontal check looks this much further than the fan rays.
pub const FRONTAL_RANGE_FACTOR: f32 = 1.5;

const FULL_TURN_DEG: f32 = 360.0;

/// One scored direction. Transient: a batch is built, ranked, and discarded
/// within a single decision tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionCandidate {
    pub direction: Vec3,
    pub utility: f32,
}

/// Fixed-probability exploration knob for the final pick. Not annealed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringPolicy {
    pub max_utility_choice_chance: f32,
}

impl Default for SteeringPolicy {
    fn default() -> Self {
        Self {
            max_utility_choice_chance: 0.85,
        }
    }
}

/// Runs one full decision tick: scan the fan, rank, and select. The result
/// is a horizontal unit vector; the caller owns rotation smoothing and
/// velocity integration.
pub fn decide<F, R>(
    pose: &Pose,
    genome: &BoatGenome,
    policy: SteeringPolicy,
    field: &F,
    rng: &mut R,
) -> Vec3
where
    F: SensorField + ?Sized,
    R: Rng + ?Sized,
{
    let mut candidates = scan_candidates(pose, genome, field, rng);
    select_direction(&mut candidates, policy, rng)
}

/// Builds the candidate fan: `ray_radius + 1` rays of length `sight` swept
/// symmetrically around the heading by the stored `vision_steps` step, plus
/// one frontal ray of length `1.5 * sight`. Always returns at least two
/// candidates.
pub fn scan_candidates<F, R>(
    pose: &Pose,
    genome: &BoatGenome,
    field: &F,
    rng: &mut R,
) -> Vec<DirectionCandidate>
where
    F: SensorField + ?Sized,
    R: Rng + ?Sized,
{
    let reference = horizontal_reference(pose.forward);
    // The sweep step is the stored gene value in degrees; it is seeded as
    // 360 / ray_radius but evolves independently and is never re-derived.
    let step = genome.vision_steps as f32;
    let ray_count = genome.ray_radius.max(0);
    let start = -step * ray_count as f32 / 2.0;

    let mut candidates = Vec::with_capacity(ray_count as usize + 2);
    for i in 0..=ray_count {
        let angle = wrap_angle_deg(start + step * i as f32);
        let direction = rotate_about_y(reference, angle);
        let utility = ray_utility(pose.position, direction, genome.sight, genome, field, rng);
        candidates.push(DirectionCandidate { direction, utility });
    }

    // Long-range frontal check straight along the heading.
    let frontal_length = FRONTAL_RANGE_FACTOR * genome.sight;
    let frontal_utility = ray_utility(pose.position, reference, frontal_length, genome, field, rng);
    candidates.push(DirectionCandidate {
        direction: reference,
        utility: frontal_utility,
    });

    candidates
}

/// Ranks the candidates and commits: with `max_utility_choice_chance` take
/// the best, otherwise the runner-up.
pub fn select_direction<R>(
    candidates: &mut [DirectionCandidate],
    policy: SteeringPolicy,
    rng: &mut R,
) -> Vec3
where
    R: Rng + ?Sized,
{
    debug_assert!(!candidates.is_empty(), "selection requires candidates");
    sort_descending_by_utility(candidates);

    let pick_top =
        candidates.len() < 2 || rng.random::<f32>() < policy.max_utility_choice_chance;
    let chosen = if pick_top { candidates[0] } else { candidates[1] };
    chosen.direction.try_normalize().unwrap_or(Vec3::Z)
}

/// Stable descending sort, so equal utilities keep scan order and ties
/// resolve to the leftmost fan ray.
pub fn sort_descending_by_utility(candidates: &mut [DirectionCandidate]) {
    candidates.sort_by(|a, b| b.utility.total_cmp(&a.utility));
}

/// Utility of one ray. The fallback is always drawn first so a hit on an
/// unscored category degrades to the no-hit value.
fn ray_utility<F, R>(
    origin: Vec3,
    direction: Vec3,
    ray_length: f32,
    genome: &BoatGenome,
    field: &F,
    rng: &mut R,
) -> f32
where
    F: SensorField + ?Sized,
    R: Rng + ?Sized,
{
    let fallback = sample_default_utility(genome.random_direction_range, rng);
    if ray_length <= 0.0 {
        return fallback;
    }
    let Some(hit) = field.cast(origin, direction, ray_length) else {
        return fallback;
    };
    let Some(response) = genome.response(hit.category) else {
        return fallback;
    };
    let distance_index = 1.0 - hit.distance / ray_length;
    distance_index * response.distance_factor + response.weight
}

fn sample_default_utility<R>(range: (f32, f32), rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    let low = range.0.min(range.1);
    let high = range.0.max(range.1);
    if high > low {
        rng.random_range(low..=high)
    } else {
        low
    }
}

fn horizontal_reference(forward: Vec3) -> Vec3 {
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    flat.try_normalize().unwrap_or(Vec3::Z)
}

fn rotate_about_y(direction: Vec3, angle_deg: f32) -> Vec3 {
    Quat::from_rotation_y(angle_deg.to_radians()) * direction
}

fn wrap_angle_deg(angle: f32) -> f32 {
    angle.rem_euclid(FULL_TURN_DEG)
}
