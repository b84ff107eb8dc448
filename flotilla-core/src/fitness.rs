//! Fitness ordering for selection: highest points first, with unscored
//! entries treated as greater than any score.

use std::cmp::Ordering;

/// Descending comparator over optional scores. Missing scores sort first
/// and NaN is handled through `total_cmp`, so the order is total.
pub fn fitness_descending(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.total_cmp(&x),
    }
}

/// Stable descending sort by a score projection. Expressed as an explicit
/// "order by, descending" helper so call sites read their intent directly.
pub fn sort_by_points_descending<T, F>(items: &mut [T], points: F)
where
    F: Fn(&T) -> Option<f32>,
{
    items.sort_by(|a, b| fitness_descending(points(a), points(b)));
}
