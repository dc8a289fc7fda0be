use std::cmp::Ordering;

/// Stable descending sort by score.
/// - NaN scores are removed first
/// - equal scores keep their original relative order
///
/// Complexity: O(n log n), merge sort from `slice::sort_by`
#[inline]
pub fn sort_by_score_desc<T>(items: &mut Vec<T>, score: impl Fn(&T) -> f64) {
    items.retain(|item| !score(item).is_nan());
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

/// Ordering used for descending scores, exposed for callers sorting slices
#[inline]
pub fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
