//! Pure filters over solution collections
//!
//! Neither function performs I/O; both can be applied to any `Solution`
//! list, not only the ones built by the solution factory.

use chrono::Duration;

use crate::models::Solution;

/// Keep solutions within both duration budgets, shortest trip first.
///
/// The sort is stable: solutions with equal total trip duration keep their
/// input order.
#[must_use]
pub fn filter_by_trip_duration(
    solutions: Vec<Solution>,
    max_walk: Duration,
    max_travel: Duration,
) -> Vec<Solution> {
    let mut kept: Vec<Solution> = solutions
        .into_iter()
        .filter(|s| s.walk_duration() <= max_walk && s.travel_duration() <= max_travel)
        .collect();
    kept.sort_by_key(Solution::total_trip_duration);
    kept
}

/// Keep solutions whose forecasts share at least one accepted condition code.
///
/// An empty `accepted_codes` accepts everything. Order is preserved.
#[must_use]
pub fn filter_by_weather(solutions: Vec<Solution>, accepted_codes: &[u16]) -> Vec<Solution> {
    if accepted_codes.is_empty() {
        return solutions;
    }
    solutions
        .into_iter()
        .filter(|s| has_acceptable_weather(s, accepted_codes))
        .collect()
}

fn has_acceptable_weather(solution: &Solution, accepted_codes: &[u16]) -> bool {
    solution
        .condition_codes()
        .iter()
        .any(|code| accepted_codes.contains(code))
}
