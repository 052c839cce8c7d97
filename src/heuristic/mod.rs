//! Additive and relaxed-plan (FF) heuristics.
//!
//! Both run the shared relaxed exploration from the evaluated state and
//! read the resulting labels. [`AdditiveHeuristic`] sums the goal facts'
//! labels; [`FfHeuristic`] additionally chains backwards through the
//! first-achiever links to extract a relaxed plan, flag preferred actions,
//! and — when a learned-weight table is configured — rescore the plan by
//! operator family.
//!
//! A relaxed state from which some goal fact is unreachable is a dead-end:
//! evaluation returns `None`, distinguishable from every finite estimate.

pub mod additive;
pub mod ff;

pub use additive::AdditiveHeuristic;
pub use ff::{Evaluation, FfHeuristic, LearnedWeights};
