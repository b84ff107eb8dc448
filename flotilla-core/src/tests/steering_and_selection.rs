use super::support::{rng, test_genome, DirectionalField, NoContacts, UniformField};
use crate::steering::{decide, scan_candidates, select_direction, DirectionCandidate};
use crate::{Pose, SteeringPolicy, FRONTAL_RANGE_FACTOR};
use flotilla_types::{ContactCategory, SensorHit};
use glam::Vec3;

fn pose() -> Pose {
    Pose {
        position: Vec3::ZERO,
        forward: Vec3::Z,
    }
}

fn always_top_policy() -> SteeringPolicy {
    SteeringPolicy {
        max_utility_choice_chance: 1.0,
    }
}

#[test]
fn decide_returns_horizontal_unit_direction() {
    let genome = test_genome();
    let tilted = Pose {
        position: Vec3::new(3.0, 1.0, -2.0),
        forward: Vec3::new(0.3, 2.0, 0.8),
    };
    let mut rng = rng(7);

    let direction = decide(
        &tilted,
        &genome,
        SteeringPolicy::default(),
        &NoContacts,
        &mut rng,
    );

    assert_eq!(direction.y, 0.0);
    assert!((direction.length() - 1.0).abs() < 1.0e-5);
}

#[test]
fn fan_evaluates_ray_radius_plus_two_candidates() {
    let mut genome = test_genome();
    let mut rng = rng(11);

    genome.ray_radius = 4;
    let candidates = scan_candidates(&pose(), &genome, &NoContacts, &mut rng);
    assert_eq!(candidates.len(), 6);

    genome.ray_radius = 0;
    let candidates = scan_candidates(&pose(), &genome, &NoContacts, &mut rng);
    assert_eq!(candidates.len(), 2);
}

#[test]
fn touching_hit_scores_full_distance_index() {
    let genome = test_genome();
    let field = UniformField(SensorHit {
        distance: 0.0,
        category: ContactCategory::Box,
    });
    let mut rng = rng(3);

    let candidates = scan_candidates(&pose(), &genome, &field, &mut rng);
    // distance_index = 1 everywhere: utility = distance_factor + weight.
    let expected = genome.box_response.distance_factor + genome.box_response.weight;
    for candidate in &candidates {
        assert!((candidate.utility - expected).abs() < 1.0e-6);
    }
}

#[test]
fn hit_at_ray_end_scores_zero_distance_index() {
    let genome = test_genome();
    let field = UniformField(SensorHit {
        distance: genome.sight,
        category: ContactCategory::Box,
    });
    let mut rng = rng(5);

    let candidates = scan_candidates(&pose(), &genome, &field, &mut rng);
    let fan_expected = genome.box_response.weight;
    for candidate in &candidates[..candidates.len() - 1] {
        assert!((candidate.utility - fan_expected).abs() < 1.0e-6);
    }

    // The frontal ray is 1.5x longer, so the same hit sits a third in.
    let frontal = candidates.last().expect("frontal candidate");
    let frontal_index = 1.0 - genome.sight / (FRONTAL_RANGE_FACTOR * genome.sight);
    let frontal_expected =
        frontal_index * genome.box_response.distance_factor + genome.box_response.weight;
    assert!((frontal.utility - frontal_expected).abs() < 1.0e-6);
}

#[test]
fn miss_utility_stays_within_random_direction_range() {
    let mut genome = test_genome();
    genome.random_direction_range = (0.2, 0.7);
    let mut rng = rng(13);

    let candidates = scan_candidates(&pose(), &genome, &NoContacts, &mut rng);
    for candidate in &candidates {
        assert!((0.2..=0.7).contains(&candidate.utility));
    }
}

#[test]
fn inverted_random_direction_range_is_reordered() {
    let mut genome = test_genome();
    genome.random_direction_range = (0.7, 0.2);
    let mut rng = rng(17);

    let candidates = scan_candidates(&pose(), &genome, &NoContacts, &mut rng);
    for candidate in &candidates {
        assert!((0.2..=0.7).contains(&candidate.utility));
    }
}

#[test]
fn unscored_category_falls_back_to_default_utility() {
    let genome = test_genome();
    let field = UniformField(SensorHit {
        distance: 1.0,
        category: ContactCategory::Other,
    });
    let mut rng = rng(19);

    // random_direction_range is (0, 0), so the fallback is exactly zero.
    let candidates = scan_candidates(&pose(), &genome, &field, &mut rng);
    for candidate in &candidates {
        assert_eq!(candidate.utility, 0.0);
    }
}

#[test]
fn all_tied_candidates_resolve_to_leftmost_fan_ray() {
    let genome = test_genome();

    let mut scan_rng = rng(23);
    let candidates = scan_candidates(&pose(), &genome, &NoContacts, &mut scan_rng);
    assert!(candidates.iter().all(|c| c.utility == 0.0));

    // Same seed replays the identical scan inside decide; with the choice
    // chance pinned to 1 the stable sort must hand back the first-scanned
    // (leftmost) ray.
    let mut decide_rng = rng(23);
    let chosen = decide(
        &pose(),
        &genome,
        always_top_policy(),
        &NoContacts,
        &mut decide_rng,
    );
    assert!(chosen.abs_diff_eq(candidates[0].direction, 1.0e-6));
}

#[test]
fn selection_frequency_tracks_choice_chance() {
    let top = Vec3::X;
    let runner_up = Vec3::Z;
    let policy = SteeringPolicy::default();
    let mut rng = rng(29);

    let mut top_picks = 0u32;
    let trials = 10_000;
    for _ in 0..trials {
        let mut candidates = vec![
            DirectionCandidate {
                direction: top,
                utility: 1.0,
            },
            DirectionCandidate {
                direction: runner_up,
                utility: 0.0,
            },
        ];
        let chosen = select_direction(&mut candidates, policy, &mut rng);
        if chosen.abs_diff_eq(top, 1.0e-6) {
            top_picks += 1;
        }
    }

    let frequency = f64::from(top_picks) / f64::from(trials);
    assert!(
        (0.83..=0.87).contains(&frequency),
        "top-candidate frequency {frequency} strayed from 0.85"
    );
}

#[test]
fn frontal_ray_sees_beyond_fan_range() {
    let genome = test_genome();
    // A contact dead ahead, past the fan rays but inside the frontal reach.
    let field = DirectionalField {
        bearing: Vec3::Z,
        min_alignment: 0.999,
        hit: SensorHit {
            distance: 1.2 * genome.sight,
            category: ContactCategory::Box,
        },
    };
    let mut scan_rng = rng(31);

    let candidates = scan_candidates(&pose(), &genome, &field, &mut scan_rng);
    let scored: Vec<_> = candidates.iter().filter(|c| c.utility != 0.0).collect();
    assert_eq!(scored.len(), 1);
    assert!(scored[0].direction.abs_diff_eq(Vec3::Z, 1.0e-6));

    let mut decide_rng = rng(31);
    let chosen = decide(&pose(), &genome, always_top_policy(), &field, &mut decide_rng);
    assert!(chosen.abs_diff_eq(Vec3::Z, 1.0e-6));
}

#[test]
fn degenerate_forward_falls_back_to_plus_z() {
    let genome = test_genome();
    let vertical = Pose {
        position: Vec3::ZERO,
        forward: Vec3::Y,
    };
    let mut rng = rng(37);

    let direction = decide(
        &vertical,
        &genome,
        always_top_policy(),
        &NoContacts,
        &mut rng,
    );
    assert_eq!(direction.y, 0.0);
    assert!((direction.length() - 1.0).abs() < 1.0e-5);
}
