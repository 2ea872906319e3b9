//! Monotonic count invariant: the count advances by exactly one per
//! accepted submission.

use super::{Invariant, SubmissionLog};

/// Invariant: accepted submissions carry the counts 1, 2, 3, ... in order.
///
/// After N accepted submissions the current count is exactly N; the count
/// never regresses and never skips.
pub struct MonotonicCountInvariant;

impl Invariant<SubmissionLog> for MonotonicCountInvariant {
    fn holds(log: &SubmissionLog) -> bool {
        log.iter()
            .enumerate()
            .all(|(i, submission)| submission.count == i as u64 + 1)
    }

    fn description() -> &'static str {
        "The count advances by exactly one per accepted submission"
    }
}
