use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoatId(pub u64);

/// Category attached to a successful sensor ray cast. `Other` covers
/// contacts the genome has no scoring response for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContactCategory {
    Box,
    Boat,
    Enemy,
    Other,
}

impl ContactCategory {
    /// The categories a genome carries a weight/distance-factor pair for.
    pub const SENSED: [ContactCategory; 3] = [
        ContactCategory::Box,
        ContactCategory::Boat,
        ContactCategory::Enemy,
    ];
}

/// Payload of a successful ray cast; a miss is represented as `None` at the
/// sensor interface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorHit {
    pub distance: f32,
    pub category: ContactCategory,
}

/// Scoring response for one sensed category: `utility = distance_index *
/// distance_factor + weight` when a ray of that category connects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CategoryResponse {
    pub weight: f32,
    pub distance_factor: f32,
}

/// The full evolvable parameter set of one boat: 11 genes counted as four
/// scalars, one paired range, and three category response pairs.
///
/// `vision_steps` stores the sweep step in degrees. It is derived as
/// `360 / ray_radius` when a genome is first seeded and evolves
/// independently afterwards; the steering policy never re-derives it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoatGenome {
    pub vision_steps: i32,
    pub ray_radius: i32,
    pub sight: f32,
    pub moving_speed: f32,
    pub random_direction_range: (f32, f32),
    pub box_response: CategoryResponse,
    pub boat_response: CategoryResponse,
    pub enemy_response: CategoryResponse,
}

impl BoatGenome {
    pub fn response(&self, category: ContactCategory) -> Option<CategoryResponse> {
        match category {
            ContactCategory::Box => Some(self.box_response),
            ContactCategory::Boat => Some(self.boat_response),
            ContactCategory::Enemy => Some(self.enemy_response),
            ContactCategory::Other => None,
        }
    }
}

/// Flat read-only export of a genome, suitable for logging or handing to an
/// offspring agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenomeRecord {
    pub vision_steps: i32,
    pub ray_radius: i32,
    pub sight: f32,
    pub moving_speed: f32,
    pub random_direction_min: f32,
    pub random_direction_max: f32,
    pub box_weight: f32,
    pub box_distance_factor: f32,
    pub boat_weight: f32,
    pub boat_distance_factor: f32,
    pub enemy_weight: f32,
    pub enemy_distance_factor: f32,
}

impl From<BoatGenome> for GenomeRecord {
    fn from(genome: BoatGenome) -> Self {
        Self {
            vision_steps: genome.vision_steps,
            ray_radius: genome.ray_radius,
            sight: genome.sight,
            moving_speed: genome.moving_speed,
            random_direction_min: genome.random_direction_range.0,
            random_direction_max: genome.random_direction_range.1,
            box_weight: genome.box_response.weight,
            box_distance_factor: genome.box_response.distance_factor,
            boat_weight: genome.boat_response.weight,
            boat_distance_factor: genome.boat_response.distance_factor,
            enemy_weight: genome.enemy_response.weight,
            enemy_distance_factor: genome.enemy_response.distance_factor,
        }
    }
}

impl From<GenomeRecord> for BoatGenome {
    fn from(record: GenomeRecord) -> Self {
        Self {
            vision_steps: record.vision_steps,
            ray_radius: record.ray_radius,
            sight: record.sight,
            moving_speed: record.moving_speed,
            random_direction_range: (record.random_direction_min, record.random_direction_max),
            box_response: CategoryResponse {
                weight: record.box_weight,
                distance_factor: record.box_distance_factor,
            },
            boat_response: CategoryResponse {
                weight: record.boat_weight,
                distance_factor: record.boat_distance_factor,
            },
            enemy_response: CategoryResponse {
                weight: record.enemy_weight,
                distance_factor: record.enemy_distance_factor,
            },
        }
    }
}

/// Floors and ceilings consulted by the mutation operators.
///
/// The sight/speed maxima are only push targets for non-uniform mutation;
/// neither operator clamps those genes from above.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeneLimits {
    pub min_vision_steps: i32,
    pub max_vision_steps: i32,
    pub min_ray_radius: i32,
    pub max_ray_radius: i32,
    pub min_sight: f32,
    pub max_sight: f32,
    pub min_moving_speed: f32,
    pub max_moving_speed: f32,
    pub min_weight: f32,
    pub max_weight: f32,
    pub min_random_direction: f32,
    pub max_random_direction: f32,
}

impl Default for GeneLimits {
    fn default() -> Self {
        Self {
            min_vision_steps: 1,
            max_vision_steps: 360,
            min_ray_radius: 1,
            max_ray_radius: 360,
            min_sight: 1.0,
            max_sight: 50.0,
            min_moving_speed: 0.5,
            max_moving_speed: 10.0,
            min_weight: -5.0,
            max_weight: 5.0,
            min_random_direction: -1.0,
            max_random_direction: 1.0,
        }
    }
}

/// Starting values for a founding genome. Category weights are not listed
/// here: they are drawn uniformly within the weight limits at seeding time
/// so the first generation has something to select over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeedGenomeConfig {
    pub ray_radius: i32,
    pub sight: f32,
    pub moving_speed: f32,
    pub random_direction_range: (f32, f32),
}

impl Default for SeedGenomeConfig {
    fn default() -> Self {
        Self {
            ray_radius: 30,
            sight: 10.0,
            moving_speed: 2.0,
            random_direction_range: (0.0, 0.3),
        }
    }
}

/// Layout of the bounded demo arena the CLI harness steers boats through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ArenaConfig {
    pub half_extent: f32,
    pub box_count: u32,
    pub buoy_count: u32,
    pub enemy_count: u32,
    pub contact_radius: f32,
    pub pickup_radius: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 60.0,
            box_count: 24,
            buoy_count: 6,
            enemy_count: 8,
            contact_radius: 1.5,
            pickup_radius: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    pub num_boats: u32,
    pub ticks_per_generation: u32,
    pub max_generation: u32,
    pub survivor_count: u32,
    pub mutation_factor: f32,
    pub mutation_chance_percent: f32,
    pub shape_parameter: f32,
    pub max_utility_choice_chance: f32,
    pub limits: GeneLimits,
    pub seed_genome: SeedGenomeConfig,
    pub arena: ArenaConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            num_boats: 20,
            ticks_per_generation: 200,
            max_generation: 50,
            survivor_count: 5,
            mutation_factor: 2.0,
            mutation_chance_percent: 20.0,
            shape_parameter: 0.5,
            max_utility_choice_chance: 0.85,
            limits: GeneLimits::default(),
            seed_genome: SeedGenomeConfig::default(),
            arena: ArenaConfig::default(),
        }
    }
}

/// Per-generation score triple: the minimum, median, and maximum points
/// observed across the fleet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationMetrics {
    pub generation: u32,
    pub min_points: f32,
    pub mid_points: f32,
    pub max_points: f32,
}
