use crate::{GenerationClock, SensorField};
use flotilla_types::{
    BoatGenome, CategoryResponse, GeneLimits, SensorHit, WorldConfig,
};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub(super) fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub(super) fn test_genome() -> BoatGenome {
    BoatGenome {
        vision_steps: 12,
        ray_radius: 4,
        sight: 10.0,
        moving_speed: 2.0,
        random_direction_range: (0.0, 0.0),
        box_response: CategoryResponse {
            weight: 1.0,
            distance_factor: 2.0,
        },
        boat_response: CategoryResponse {
            weight: -0.5,
            distance_factor: 0.25,
        },
        enemy_response: CategoryResponse {
            weight: -2.0,
            distance_factor: -1.0,
        },
    }
}

pub(super) fn test_limits() -> GeneLimits {
    GeneLimits::default()
}

pub(super) fn small_world_config() -> WorldConfig {
    WorldConfig {
        num_boats: 6,
        ticks_per_generation: 10,
        max_generation: 8,
        survivor_count: 2,
        ..WorldConfig::default()
    }
}

/// Field with no contacts anywhere.
pub(super) struct NoContacts;

impl SensorField for NoContacts {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<SensorHit> {
        None
    }
}

/// Field that reports the same hit for every ray that can reach it.
pub(super) struct UniformField(pub(super) SensorHit);

impl SensorField for UniformField {
    fn cast(&self, _origin: Vec3, _direction: Vec3, max_distance: f32) -> Option<SensorHit> {
        (self.0.distance <= max_distance).then_some(self.0)
    }
}

/// Field that hits only rays closely aligned with a fixed bearing.
pub(super) struct DirectionalField {
    pub(super) bearing: Vec3,
    pub(super) min_alignment: f32,
    pub(super) hit: SensorHit,
}

impl SensorField for DirectionalField {
    fn cast(&self, _origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SensorHit> {
        let aligned = direction.dot(self.bearing) >= self.min_alignment;
        (aligned && self.hit.distance <= max_distance).then_some(self.hit)
    }
}

pub(super) struct FixedClock {
    pub(super) current: u32,
    pub(super) max: u32,
}

impl GenerationClock for FixedClock {
    fn current_generation(&self) -> u32 {
        self.current
    }

    fn max_generation(&self) -> u32 {
        self.max
    }
}
