//! Set difference between loss collections.
//!
//! Membership is by value over all four fields; multiplicity is ignored.
//! Output order always follows the *current* collection.

use std::collections::HashSet;

use crate::types::baseline::Baseline;
use crate::types::loss::{CountryLoss, Loss};

/// Records of `current` whose value does not appear anywhere in `previous`.
pub fn diff_losses(previous: &[Loss], current: &[Loss]) -> Vec<Loss> {
    let seen: HashSet<&Loss> = previous.iter().collect();
    current
        .iter()
        .filter(|loss| !seen.contains(loss))
        .cloned()
        .collect()
}

/// Per-country diff against a baseline, tagged and concatenated in the order
/// of `current`.
///
/// A country absent from the baseline diffs against an empty set.
pub fn diff_by_country<'a, I>(previous: &Baseline, current: I) -> Vec<CountryLoss>
where
    I: IntoIterator<Item = (&'a str, &'a [Loss])>,
{
    current
        .into_iter()
        .flat_map(|(country, losses)| {
            diff_losses(previous.get(country), losses)
                .into_iter()
                .map(move |loss| CountryLoss::new(country, loss))
        })
        .collect()
}

/// Group consecutive items with equal keys, preserving order.
///
/// Equal keys that are not adjacent form separate groups.
pub fn group_stable<T, K, F>(items: &[T], mut key: F) -> Vec<(K, &[T])>
where
    K: PartialEq,
    F: FnMut(&T) -> K,
{
    let mut groups = Vec::new();
    let mut start = 0;

    while start < items.len() {
        let current = key(&items[start]);
        let mut end = start + 1;
        while end < items.len() && key(&items[end]) == current {
            end += 1;
        }
        groups.push((current, &items[start..end]));
        start = end;
    }

    groups
}
