//! Relaxation-backed landmark factory.
//!
//! Candidate discovery is pluggable: a [`LandmarkGenerator`] fills the
//! graph with landmarks and ordering edges, using the exploration however
//! it likes. The factory then runs the analyses that are the same for
//! every strategy: optionally discarding non-causal landmarks, assigning
//! ids, computing possible/first achievers, and forcing the ordering graph
//! acyclic.
//!
//! Two different exclusion semantics are used deliberately and must not be
//! unified:
//!
//! - the causal test forbids *using* a landmark: it excludes the landmark's
//!   facts and every operator with one of them among its preconditions;
//! - the solvability/achiever test forbids *establishing* it: it excludes
//!   the facts and every operator that achieves one unconditionally.
//!
//! The causal test is only defined for tasks without conditional effects
//! and refuses to run otherwise. Whether it remains sound in the presence
//! of axioms has not been verified; axiom-laden tasks get no such guard,
//! only this caveat.

use std::collections::HashSet;

use log::{debug, info};

use crate::{
    error::{Error, Result},
    exploration::Exploration,
    landmarks::{graph::LandmarkGraph, landmark::Landmark},
    task::Task,
};

/// A landmark-discovery strategy. Implementations add candidate landmarks
/// and ordering edges to the graph; the factory handles everything after
/// discovery.
pub trait LandmarkGenerator {
    fn generate(
        &mut self,
        task: &Task,
        exploration: &mut Exploration,
        graph: &mut LandmarkGraph,
    ) -> Result<()>;
}

impl<F> LandmarkGenerator for F
where
    F: FnMut(&Task, &mut Exploration, &mut LandmarkGraph) -> Result<()>,
{
    fn generate(
        &mut self,
        task: &Task,
        exploration: &mut Exploration,
        graph: &mut LandmarkGraph,
    ) -> Result<()> {
        self(task, exploration, graph)
    }
}

pub struct RelaxationFactory<G> {
    generator: G,
    only_causal_landmarks: bool,
}

impl<G: LandmarkGenerator> RelaxationFactory<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            only_causal_landmarks: false,
        }
    }

    /// When enabled, landmarks that fail the causal-necessity test are
    /// dropped from the graph before postprocessing.
    pub fn only_causal_landmarks(mut self, enabled: bool) -> Self {
        self.only_causal_landmarks = enabled;
        self
    }

    /// Runs discovery and the full analysis pipeline, returning the
    /// finished graph: ids assigned, achievers computed, orderings acyclic.
    pub fn generate(&mut self, task: &Task) -> Result<LandmarkGraph> {
        let mut exploration = Exploration::new(task);
        let mut graph = LandmarkGraph::new();
        self.generator
            .generate(task, &mut exploration, &mut graph)?;
        if self.only_causal_landmarks {
            discard_noncausal_landmarks(task, &mut exploration, &mut graph)?;
        }
        graph.assign_ids();
        calc_achievers(task, &mut exploration, &mut graph);
        graph.make_acyclic();
        Ok(graph)
    }
}

fn discard_noncausal_landmarks(
    task: &Task,
    exploration: &mut Exploration,
    graph: &mut LandmarkGraph,
) -> Result<()> {
    if task.has_conditional_effects() {
        return Err(Error::ConditionalEffects);
    }
    let removed =
        graph.remove_node_if(|node| !is_causal_landmark(task, exploration, &node.landmark));
    info!("Discarded {removed} non-causal landmarks");
    Ok(())
}

/// Tests whether the relaxed task becomes unsolvable when the landmark may
/// never be used: its facts are excluded and so is every operator with one
/// of them among its preconditions. Landmarks true in the goal are causal
/// by definition.
pub fn is_causal_landmark(
    task: &Task,
    exploration: &mut Exploration,
    landmark: &Landmark,
) -> bool {
    if landmark.is_true_in_goal {
        return true;
    }
    let excluded_ops: HashSet<usize> = task
        .operators
        .iter()
        .enumerate()
        .filter(|(_, op)| {
            op.preconditions
                .iter()
                .any(|&p| landmark.contains(p))
        })
        .map(|(id, _)| id)
        .collect();
    exploration.explore(&task.initial_state, landmark.facts.facts(), &excluded_ops);
    !exploration.goals_reachable()
}

/// Tests whether the relaxed task stays solvable when the landmark may
/// never be established: its facts are excluded along with every operator
/// that achieves one of them unconditionally. As a side effect the
/// exploration holds, for every fact, the earliest cost at which it can be
/// achieved under this exclusion — the levels achiever filtering reads.
pub fn relaxed_task_solvable(
    task: &Task,
    exploration: &mut Exploration,
    exclude: &Landmark,
) -> bool {
    let excluded_ops: HashSet<usize> = task
        .operators
        .iter()
        .enumerate()
        .filter(|(_, op)| {
            exclude
                .facts
                .facts()
                .iter()
                .any(|&f| op.unconditionally_achieves(f))
        })
        .map(|(id, _)| id)
        .collect();
    exploration.explore(&task.initial_state, exclude.facts.facts(), &excluded_ops);
    exploration.goals_reachable()
}

/// Fills every landmark's possible and first achievers, and the
/// `is_derived` flag. Runs once per task, after discovery and pruning.
fn calc_achievers(task: &Task, exploration: &mut Exploration, graph: &mut LandmarkGraph) {
    for index in 0..graph.num_landmarks() {
        let mut possible = HashSet::new();
        let mut is_derived = false;
        for &fact in graph.node(index).landmark.facts.facts() {
            let fact_id = exploration.compiled().facts.id(fact);
            possible.extend(exploration.compiled().achievers_of[fact_id].iter().copied());
            if task.variables[fact.var].is_derived {
                is_derived = true;
            }
        }

        let solvable = relaxed_task_solvable(task, exploration, &graph.node(index).landmark);
        debug!(
            "landmark {index}: {} possible achievers, relaxed task solvable without it: {solvable}",
            possible.len()
        );

        let first: HashSet<usize> = possible
            .iter()
            .copied()
            .filter(|&id| possibly_reaches(task, exploration, id, &graph.node(index).landmark))
            .collect();

        let landmark = &mut graph.node_mut(index).landmark;
        landmark.possible_achievers = possible;
        landmark.first_achievers = first;
        landmark.is_derived = is_derived;
    }
}

/// The potential-achiever test against the levels of the last exclusion
/// run: the operator (or axiom) must be applicable in the relaxed graph —
/// all preconditions reachable — and some effect establishing a landmark
/// fact must have all its conditions reachable. Since the landmark's own
/// facts are excluded in that run, their levels are infinite, so anything
/// gated behind the landmark fails here.
fn possibly_reaches(
    task: &Task,
    exploration: &Exploration,
    op_or_axiom_id: usize,
    landmark: &Landmark,
) -> bool {
    if task
        .preconditions_of(op_or_axiom_id)
        .iter()
        .any(|&p| !exploration.is_reachable(p))
    {
        return false;
    }
    if task.is_axiom_id(op_or_axiom_id) {
        let axiom = &task.axioms[op_or_axiom_id - task.num_operators()];
        landmark.contains(axiom.effect)
    } else {
        task.operators[op_or_axiom_id].effects.iter().any(|e| {
            landmark.contains(e.fact) && e.conditions.iter().all(|&c| exploration.is_reachable(c))
        })
    }
}
