//! Undo tokens for the mutation primitives.

/// The inverse information of one primitive mutation.
///
/// Produced by [`Solution::insert`](super::Solution::insert),
/// [`Solution::remove`](super::Solution::remove) and
/// [`Solution::replace`](super::Solution::replace); consumed by
/// [`Solution::revert`](super::Solution::revert). Tokens must be reverted
/// in the reverse order of creation.
///
/// `prior` is the assignment entry of the affected job before the edit.
#[must_use = "an edit must be reverted or explicitly discarded"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// `job` was inserted at `position` of `machine`.
    Inserted {
        job: usize,
        machine: usize,
        position: usize,
        prior: Option<usize>,
    },

    /// `job` was removed from `position` of `machine`.
    Removed {
        job: usize,
        machine: usize,
        position: usize,
        prior: Option<usize>,
    },

    /// `job` overwrote `previous` at `position` of `machine`.
    Replaced {
        job: usize,
        previous: usize,
        machine: usize,
        position: usize,
        prior: Option<usize>,
    },
}
