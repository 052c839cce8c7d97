//! Delete-relaxation kernel for classical planning.
//!
//! Everything in this crate is built on a single primitive: a relaxed
//! exploration that propagates, through a priority-driven fixpoint, the
//! earliest cost at which every fact becomes derivable from a state while
//! ignoring delete effects. Two consumers share it:
//!
//! - the additive / relaxed-plan (FF) heuristics in [`heuristic`], which run
//!   the exploration once per search state and chain backwards through the
//!   first-achiever links it records;
//! - the landmark analyses in [`landmarks`], which re-run the exploration
//!   under varying exclusion sets to test causal necessity and to compute
//!   landmark achievers.
//!
//! The grounded task model in [`task`] is read-only input; the unary-rule
//! compilation in [`exploration`] is built once per task and shared by all
//! runs. The whole crate is sequential and synchronous: one exploration run
//! at a time, per-run state reset (not reallocated) between runs.

mod error;
pub use error::{Error, Result};
pub mod exploration;
pub mod heuristic;
pub mod landmarks;
pub mod task;
