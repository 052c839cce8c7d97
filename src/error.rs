//! Crate-wide error type.
//!
//! All variants are configuration or construction-time defects. A relaxed
//! state from which the goal is unreachable is *not* an error; heuristic
//! evaluation reports it as a dead-end (`None`) instead.

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The learned-weight configuration supplied parallel name/weight lists
    /// of different lengths.
    #[error("operator family list has {0} entries but weight list has {1}")]
    WeightListMismatch(usize, usize),
    /// A grounded operator's family has no entry in the learned-weight
    /// table. Silently defaulting to zero would corrupt the heuristic, so
    /// this is rejected when the heuristic is built, not during search.
    #[error("no learned weight supplied for operator family {0:?}")]
    MissingWeight(String),
    /// The causal-necessity test is unsound for tasks with conditional
    /// effects and refuses to run on them.
    #[error("causal landmark analysis requires a task without conditional effects")]
    ConditionalEffects,
}
