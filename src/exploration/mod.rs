//! Relaxed exploration: the shared reachability primitive.
//!
//! [`unary`] compiles every (operator, effect) pair and every axiom into an
//! immutable unary rule — one head fact, a precondition fact set, a base
//! cost — indexed by dense fact ids. [`engine`] runs the priority-driven
//! fixpoint over those rules: starting from a seed state, it labels every
//! fact with the minimum cost at which it becomes derivable when delete
//! effects are ignored, optionally with chosen facts or operators excluded
//! from consideration.
//!
//! Compilation happens once per task; an [`Exploration`](engine::Exploration)
//! is restarted with different seeds and exclusions arbitrarily often,
//! resetting (never reallocating) its per-run state.

pub mod engine;
mod queue;
pub mod unary;

pub use engine::Exploration;
pub use unary::{CompiledTask, FactId, RuleId, RuleOwner, UnaryRule};
