//! Decision and evolution core for the flotilla simulation.
//!
//! The crate is deliberately engine-agnostic: ray casting, motion
//! integration, and generation bookkeeping are consumed through the
//! [`SensorField`] and [`GenerationClock`] traits, and every operator takes
//! its RNG explicitly so runs are reproducible from a seed.

use flotilla_types::{SensorHit, WorldConfig};
use glam::Vec3;
use thiserror::Error;

pub mod fitness;
pub mod genome;
pub mod population;
pub mod steering;

#[cfg(test)]
mod tests;

pub use genome::{
    inherit, mutate_non_uniform, mutate_uniform, seed_genome, snapshot, Gene,
    DEFAULT_SHAPE_PARAMETER,
};
pub use population::{FleetMember, MutationStrategy, Population};
pub use steering::{
    decide, scan_candidates, select_direction, DirectionCandidate, SteeringPolicy,
    FRONTAL_RANGE_FACTOR,
};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid world config: {0}")]
    InvalidConfig(String),
}

/// Horizontal-plane pose of one boat. `forward` need not be unit length or
/// horizontal; the steering policy projects and normalizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Ray-cast capability supplied by the hosting world. A miss is `None`;
/// hits report the distance along the ray and the contact's category.
pub trait SensorField {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SensorHit>;
}

/// Generation authority consumed by non-uniform mutation: the index of the
/// generation being bred and the configured horizon.
pub trait GenerationClock {
    fn current_generation(&self) -> u32;
    fn max_generation(&self) -> u32;
}

pub fn validate_config(config: &WorldConfig) -> Result<(), SimError> {
    if config.num_boats == 0 {
        return Err(SimError::InvalidConfig(
            "num_boats must be greater than zero".to_owned(),
        ));
    }
    if config.ticks_per_generation == 0 {
        return Err(SimError::InvalidConfig(
            "ticks_per_generation must be greater than zero".to_owned(),
        ));
    }
    if config.survivor_count == 0 || config.survivor_count > config.num_boats {
        return Err(SimError::InvalidConfig(
            "survivor_count must be in [1, num_boats]".to_owned(),
        ));
    }
    if !(0.0..=100.0).contains(&config.mutation_chance_percent) {
        return Err(SimError::InvalidConfig(
            "mutation_chance_percent must be within [0, 100]".to_owned(),
        ));
    }
    if !config.mutation_factor.is_finite() || config.mutation_factor < 0.0 {
        return Err(SimError::InvalidConfig(
            "mutation_factor must be finite and >= 0".to_owned(),
        ));
    }
    if !config.shape_parameter.is_finite() || config.shape_parameter <= 0.0 {
        return Err(SimError::InvalidConfig(
            "shape_parameter must be finite and greater than zero".to_owned(),
        ));
    }
    if !(0.0..=1.0).contains(&config.max_utility_choice_chance) {
        return Err(SimError::InvalidConfig(
            "max_utility_choice_chance must be within [0, 1]".to_owned(),
        ));
    }

    let limits = &config.limits;
    if limits.min_vision_steps < 1 || limits.min_vision_steps > limits.max_vision_steps {
        return Err(SimError::InvalidConfig(
            "vision step limits must satisfy 1 <= min <= max".to_owned(),
        ));
    }
    if limits.min_ray_radius < 1 || limits.max_ray_radius > 360 {
        return Err(SimError::InvalidConfig(
            "ray radius limits must stay within [1, 360]".to_owned(),
        ));
    }
    if limits.min_ray_radius > limits.max_ray_radius {
        return Err(SimError::InvalidConfig(
            "min_ray_radius must not exceed max_ray_radius".to_owned(),
        ));
    }
    if limits.min_sight <= 0.0 || limits.min_sight > limits.max_sight {
        return Err(SimError::InvalidConfig(
            "sight limits must satisfy 0 < min <= max".to_owned(),
        ));
    }
    if limits.min_moving_speed <= 0.0 || limits.min_moving_speed > limits.max_moving_speed {
        return Err(SimError::InvalidConfig(
            "moving speed limits must satisfy 0 < min <= max".to_owned(),
        ));
    }
    if limits.min_weight > limits.max_weight {
        return Err(SimError::InvalidConfig(
            "min_weight must not exceed max_weight".to_owned(),
        ));
    }
    if limits.min_random_direction > limits.max_random_direction {
        return Err(SimError::InvalidConfig(
            "min_random_direction must not exceed max_random_direction".to_owned(),
        ));
    }

    let seed = &config.seed_genome;
    if seed.ray_radius < limits.min_ray_radius || seed.ray_radius > limits.max_ray_radius {
        return Err(SimError::InvalidConfig(
            "seed ray_radius must lie within the configured limits".to_owned(),
        ));
    }
    if seed.sight < limits.min_sight {
        return Err(SimError::InvalidConfig(
            "seed sight must be >= min_sight".to_owned(),
        ));
    }
    if seed.moving_speed < limits.min_moving_speed {
        return Err(SimError::InvalidConfig(
            "seed moving_speed must be >= min_moving_speed".to_owned(),
        ));
    }

    let arena = &config.arena;
    if arena.half_extent <= 0.0 {
        return Err(SimError::InvalidConfig(
            "arena half_extent must be greater than zero".to_owned(),
        ));
    }
    if arena.contact_radius <= 0.0 || arena.pickup_radius <= 0.0 {
        return Err(SimError::InvalidConfig(
            "arena radii must be greater than zero".to_owned(),
        ));
    }

    Ok(())
}
