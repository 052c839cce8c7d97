//! Relaxation-based landmark analysis.
//!
//! A landmark is a fact, or a disjunction of facts, that every solution
//! plan must achieve. Candidate landmarks and their ordering edges come
//! from an external [`LandmarkGenerator`] strategy; this module contributes
//! the relaxation-backed analyses built on re-running the shared
//! exploration under exclusion sets:
//!
//! - the causal-necessity test, which discards landmarks the relaxed task
//!   can be solved without ever being allowed to *use*;
//! - the solvability / achiever computation, which fills each landmark's
//!   possible and first achievers;
//! - graph postprocessing, which assigns stable ids and removes ordering
//!   edges until the graph is acyclic.

pub mod factory;
pub mod graph;
mod landmark;

pub use factory::{LandmarkGenerator, RelaxationFactory};
pub use graph::{LandmarkGraph, LandmarkNode, OrderingType};
pub use landmark::{Landmark, LandmarkFacts};
