//! Synthetic bounded arena the CLI harness steers boats through. Analytic
//! ray-circle casts only; no rigid bodies, no rendering.

use flotilla_core::SensorField;
use flotilla_types::{ArenaConfig, ContactCategory, SensorHit};
use glam::Vec3;
use rand::Rng;

pub struct Contact {
    pub position: Vec3,
    pub radius: f32,
    pub category: ContactCategory,
}

pub struct Arena {
    config: ArenaConfig,
    contacts: Vec<Contact>,
}

impl Arena {
    /// Scatters the configured boxes, buoys, and enemies across the square.
    /// Buoys carry the `Other` category, so genomes have nothing scored to
    /// say about them.
    pub fn generate<R>(config: ArenaConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let total = config.box_count + config.buoy_count + config.enemy_count;
        let mut contacts = Vec::with_capacity(total as usize);
        let mut scatter = |count: u32, category: ContactCategory, rng: &mut R| {
            for _ in 0..count {
                contacts.push(Contact {
                    position: random_point(config.half_extent, rng),
                    radius: config.contact_radius,
                    category,
                });
            }
        };
        scatter(config.box_count, ContactCategory::Box, rng);
        scatter(config.buoy_count, ContactCategory::Other, rng);
        scatter(config.enemy_count, ContactCategory::Enemy, rng);
        Self { config, contacts }
    }

    pub fn random_position<R>(&self, rng: &mut R) -> Vec3
    where
        R: Rng + ?Sized,
    {
        random_point(self.config.half_extent, rng)
    }

    /// Boats never leave the square and never leave the water plane.
    pub fn clamp_position(&self, position: Vec3) -> Vec3 {
        let extent = self.config.half_extent;
        Vec3::new(
            position.x.clamp(-extent, extent),
            0.0,
            position.z.clamp(-extent, extent),
        )
    }

    /// Picks up the first box within pickup range, if any. Collected boxes
    /// respawn at a fresh position so the supply stays constant.
    pub fn collect_box<R>(&mut self, position: Vec3, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let pickup_sq = self.config.pickup_radius * self.config.pickup_radius;
        let half_extent = self.config.half_extent;
        let Some(contact) = self.contacts.iter_mut().find(|contact| {
            contact.category == ContactCategory::Box
                && contact.position.distance_squared(position) <= pickup_sq
        }) else {
            return false;
        };
        contact.position = random_point(half_extent, rng);
        true
    }

    pub fn touches_enemy(&self, position: Vec3) -> bool {
        self.contacts.iter().any(|contact| {
            contact.category == ContactCategory::Enemy
                && contact.position.distance_squared(position) <= contact.radius * contact.radius
        })
    }
}

/// One boat's sensory window for a single decision: the static contacts
/// plus every other boat's start-of-tick position.
pub struct ArenaView<'a> {
    pub arena: &'a Arena,
    pub boat_positions: &'a [Vec3],
    pub self_index: usize,
}

impl SensorField for ArenaView<'_> {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SensorHit> {
        let mut nearest: Option<SensorHit> = None;
        let mut consider = |distance: f32, category: ContactCategory| {
            if nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(SensorHit { distance, category });
            }
        };

        for contact in &self.arena.contacts {
            if let Some(distance) =
                ray_circle(origin, direction, contact.position, contact.radius, max_distance)
            {
                consider(distance, contact.category);
            }
        }

        let boat_radius = self.arena.config.contact_radius;
        for (index, position) in self.boat_positions.iter().enumerate() {
            if index == self.self_index {
                continue;
            }
            if let Some(distance) = ray_circle(origin, direction, *position, boat_radius, max_distance)
            {
                consider(distance, ContactCategory::Boat);
            }
        }

        nearest
    }
}

/// Distance along a unit ray to a circle on the water plane, or `None` on a
/// miss. A ray starting inside the circle reports distance zero.
fn ray_circle(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
    max_distance: f32,
) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(direction);
    if along < 0.0 {
        return None;
    }
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let distance = (along - (radius_sq - closest_sq).sqrt()).max(0.0);
    (distance <= max_distance).then_some(distance)
}

fn random_point<R>(half_extent: f32, rng: &mut R) -> Vec3
where
    R: Rng + ?Sized,
{
    Vec3::new(
        rng.random_range(-half_extent..=half_extent),
        0.0,
        rng.random_range(-half_extent..=half_extent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn arena_with(contacts: Vec<Contact>) -> Arena {
        Arena {
            config: ArenaConfig::default(),
            contacts,
        }
    }

    fn contact(position: Vec3, category: ContactCategory) -> Contact {
        Contact {
            position,
            radius: 1.5,
            category,
        }
    }

    fn view<'a>(arena: &'a Arena, boat_positions: &'a [Vec3]) -> ArenaView<'a> {
        ArenaView {
            arena,
            boat_positions,
            self_index: 0,
        }
    }

    #[test]
    fn generate_populates_configured_contact_counts() {
        let config = ArenaConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let arena = Arena::generate(config, &mut rng);

        let count = |category: ContactCategory| {
            arena
                .contacts
                .iter()
                .filter(|c| c.category == category)
                .count() as u32
        };
        assert_eq!(count(ContactCategory::Box), config.box_count);
        assert_eq!(count(ContactCategory::Other), config.buoy_count);
        assert_eq!(count(ContactCategory::Enemy), config.enemy_count);
    }

    #[test]
    fn head_on_cast_reports_surface_distance() {
        let arena = arena_with(vec![contact(Vec3::new(0.0, 0.0, 10.0), ContactCategory::Box)]);
        let hit = view(&arena, &[])
            .cast(Vec3::ZERO, Vec3::Z, 20.0)
            .expect("head-on hit");
        assert_eq!(hit.category, ContactCategory::Box);
        assert!((hit.distance - 8.5).abs() < 1.0e-5);
    }

    #[test]
    fn cast_ignores_contacts_behind_the_ray() {
        let arena = arena_with(vec![contact(
            Vec3::new(0.0, 0.0, -10.0),
            ContactCategory::Box,
        )]);
        assert!(view(&arena, &[]).cast(Vec3::ZERO, Vec3::Z, 20.0).is_none());
    }

    #[test]
    fn cast_respects_ray_length() {
        let arena = arena_with(vec![contact(Vec3::new(0.0, 0.0, 10.0), ContactCategory::Box)]);
        assert!(view(&arena, &[]).cast(Vec3::ZERO, Vec3::Z, 8.0).is_none());
    }

    #[test]
    fn cast_prefers_the_nearest_contact() {
        let arena = arena_with(vec![
            contact(Vec3::new(0.0, 0.0, 10.0), ContactCategory::Box),
            contact(Vec3::new(0.0, 0.0, 6.0), ContactCategory::Enemy),
        ]);
        let hit = view(&arena, &[])
            .cast(Vec3::ZERO, Vec3::Z, 20.0)
            .expect("nearer hit");
        assert_eq!(hit.category, ContactCategory::Enemy);
        assert!((hit.distance - 4.5).abs() < 1.0e-5);
    }

    #[test]
    fn other_boats_are_sensed_as_boat_contacts() {
        let arena = arena_with(Vec::new());
        let positions = [Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)];
        let hit = view(&arena, &positions)
            .cast(Vec3::ZERO, Vec3::Z, 20.0)
            .expect("boat hit");
        assert_eq!(hit.category, ContactCategory::Boat);
        assert!((hit.distance - 3.5).abs() < 1.0e-5);
    }

    #[test]
    fn own_hull_is_not_sensed() {
        let arena = arena_with(Vec::new());
        let positions = [Vec3::ZERO];
        assert!(view(&arena, &positions)
            .cast(Vec3::ZERO, Vec3::Z, 20.0)
            .is_none());
    }

    #[test]
    fn ray_starting_inside_a_circle_hits_at_zero() {
        let arena = arena_with(vec![contact(Vec3::new(0.0, 0.0, 0.5), ContactCategory::Enemy)]);
        let hit = view(&arena, &[])
            .cast(Vec3::ZERO, Vec3::Z, 20.0)
            .expect("interior hit");
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn collect_box_relocates_the_box() {
        let mut arena = arena_with(vec![contact(Vec3::new(0.5, 0.0, 0.5), ContactCategory::Box)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let before = arena.contacts[0].position;
        assert!(arena.collect_box(Vec3::ZERO, &mut rng));
        assert_eq!(arena.contacts.len(), 1);
        assert_ne!(arena.contacts[0].position, before);
    }

    #[test]
    fn collect_box_ignores_non_box_contacts() {
        let mut arena = arena_with(vec![contact(Vec3::ZERO, ContactCategory::Other)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert!(!arena.collect_box(Vec3::ZERO, &mut rng));
    }

    #[test]
    fn touches_enemy_uses_the_contact_radius() {
        let arena = arena_with(vec![contact(Vec3::new(0.0, 0.0, 1.0), ContactCategory::Enemy)]);
        assert!(arena.touches_enemy(Vec3::ZERO));
        assert!(!arena.touches_enemy(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn clamp_keeps_positions_on_the_plane_and_in_bounds() {
        let arena = arena_with(Vec::new());
        let clamped = arena.clamp_position(Vec3::new(100.0, 5.0, -200.0));
        assert_eq!(clamped, Vec3::new(60.0, 0.0, -60.0));
    }
}
