use std::time::Duration;

use crate::types::{Delta, FragmentResult, Ranking};

/// Summarise one fragment's samples. The median is the element at index
/// `n / 2` of the sorted samples, so even counts take the upper middle.
///
/// Returns `None` for an empty sample set.
pub fn reduce(mut durations: Vec<Duration>) -> Option<FragmentResult> {
    durations.sort_unstable();
    let min = *durations.first()?;
    let max = *durations.last()?;
    let median = durations[durations.len() / 2];

    Some(FragmentResult {
        iterations: durations.len(),
        min,
        max,
        median,
    })
}

/// Rank results by median. The first result holding the smallest median is
/// the fastest; every other one gets its rounded percentage over it.
pub fn rank(results: &[FragmentResult]) -> Option<Ranking> {
    let fastest = results
        .iter()
        .enumerate()
        .min_by_key(|(_, r)| r.median)
        .map(|(i, _)| i)?;
    let fastest_median = results[fastest].median;

    let deltas = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            if i == fastest {
                Delta::Fastest
            } else if fastest_median.is_zero() {
                Delta::Incomparable
            } else {
                Delta::Slower(percent_slower(r.median, fastest_median))
            }
        })
        .collect();

    Some(Ranking { fastest, deltas })
}

fn percent_slower(median: Duration, fastest: Duration) -> u64 {
    let diff = median.saturating_sub(fastest).as_nanos() as f64;
    (diff / fastest.as_nanos() as f64 * 100.0).round() as u64
}
