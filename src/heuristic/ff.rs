//! The relaxed-plan (FF) heuristic with preferred actions and optional
//! learned-weight rescoring.
//!
//! After the additive exploration, the heuristic chains backwards from each
//! goal fact through the first-achiever links, collecting every real
//! operator encountered exactly once. Axiom-owned rules are followed for
//! reachability but never enter the plan. The backward chain is an explicit
//! stack with a per-run visited set keyed by fact id, so deep relaxed plans
//! cannot overflow the call stack and axiom interdependency cycles are cut
//! by construction.

use std::collections::HashMap;

use log::trace;

use crate::{
    error::{Error, Result},
    heuristic::additive::AdditiveHeuristic,
    task::{FactPair, State, Task},
};

/// Per-family weight table for the learned-weight mode. Built from two
/// parallel lists; a length mismatch is rejected here, at configuration
/// time.
#[derive(Debug, Clone)]
pub struct LearnedWeights {
    by_family: HashMap<String, f64>,
}

impl LearnedWeights {
    pub fn new(families: Vec<String>, weights: Vec<f64>) -> Result<Self> {
        if families.len() != weights.len() {
            return Err(Error::WeightListMismatch(families.len(), weights.len()));
        }
        Ok(Self {
            by_family: families.into_iter().zip(weights).collect(),
        })
    }

    fn get(&self, family: &str) -> Option<f64> {
        self.by_family.get(family).copied()
    }
}

/// Result of one heuristic evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Sum of the goal facts' additive labels.
    pub additive: i32,
    /// The reported estimate: structural relaxed-plan cost, or the weighted
    /// ceiling when learned weights are configured.
    pub estimate: i32,
    /// Operator ids of the relaxed plan, sorted ascending.
    pub relaxed_plan: Vec<usize>,
    /// Plan operators whose preconditions all hold at cost 0, i.e. in the
    /// evaluated state itself. Sorted ascending.
    pub preferred: Vec<usize>,
}

#[derive(Debug)]
pub struct FfHeuristic {
    additive: AdditiveHeuristic,
    op_costs: Vec<i32>,
    op_preconditions: Vec<Vec<FactPair>>,
    /// Per-operator weight resolved at construction; `None` means
    /// structural costs.
    weights: Option<Vec<f64>>,
    // Per-evaluation scratch, reset on every call.
    in_plan: Vec<bool>,
    preferred_flag: Vec<bool>,
    visited: Vec<bool>,
    stack: Vec<usize>,
}

impl FfHeuristic {
    pub fn new(task: &Task) -> Self {
        Self::build(task, None)
    }

    /// Learned-weight mode: the estimate becomes the ceiling of the summed
    /// per-family weights of the plan's operators, fully replacing the
    /// structural cost sum. Every operator family occurring in the grounded
    /// task must have an entry; a missing one fails here rather than
    /// silently scoring zero during search.
    pub fn with_weights(task: &Task, weights: &LearnedWeights) -> Result<Self> {
        let resolved = task
            .operators
            .iter()
            .map(|op| {
                weights
                    .get(op.family())
                    .ok_or_else(|| Error::MissingWeight(op.family().to_string()))
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self::build(task, Some(resolved)))
    }

    fn build(task: &Task, weights: Option<Vec<f64>>) -> Self {
        let additive = AdditiveHeuristic::new(task);
        let num_facts = additive.exploration().compiled().facts.len();
        let num_operators = task.num_operators();
        Self {
            additive,
            op_costs: task.operators.iter().map(|op| op.cost).collect(),
            op_preconditions: task
                .operators
                .iter()
                .map(|op| op.preconditions.clone())
                .collect(),
            weights,
            in_plan: vec![false; num_operators],
            preferred_flag: vec![false; num_operators],
            visited: vec![false; num_facts],
            stack: Vec::new(),
        }
    }

    /// Evaluates `state`. `None` is the dead-end marker: some goal fact is
    /// unreachable even in the relaxation.
    pub fn evaluate(&mut self, state: &State) -> Option<Evaluation> {
        let additive = self.additive.compute(state)?;

        self.visited.fill(false);
        self.in_plan.fill(false);
        self.preferred_flag.fill(false);
        debug_assert!(self.stack.is_empty());

        let mut plan = Vec::new();
        let mut preferred = Vec::new();

        let expl = self.additive.exploration();
        self.stack.extend(expl.compiled().goals.iter().copied());
        while let Some(fact) = self.stack.pop() {
            if self.visited[fact] {
                continue; // Each subgoal is considered once per evaluation.
            }
            self.visited[fact] = true;
            let Some(rule_id) = expl.reached_by(fact) else {
                continue; // Chained back to a seed-state fact.
            };
            let rule = &expl.compiled().rules[rule_id];
            let mut applicable_now = true;
            for &precondition in &rule.preconditions {
                self.stack.push(precondition);
                if expl.reached_by(precondition).is_some() {
                    applicable_now = false;
                }
            }
            let Some(op) = rule.owner.operator() else {
                continue; // Axioms never enter the plan.
            };
            if !self.in_plan[op] {
                self.in_plan[op] = true;
                plan.push(op);
            }
            if applicable_now && !self.preferred_flag[op] {
                self.preferred_flag[op] = true;
                debug_assert!(
                    self.op_preconditions[op].iter().all(|&p| state.contains(p)),
                    "preferred operator {op} not applicable in the evaluated state"
                );
                preferred.push(op);
            }
        }
        plan.sort_unstable();
        preferred.sort_unstable();

        let estimate = match &self.weights {
            Some(w) => plan.iter().map(|&op| w[op]).sum::<f64>().ceil() as i32,
            None => plan.iter().map(|&op| self.op_costs[op]).sum(),
        };
        trace!(
            "ff evaluation: additive {additive}, estimate {estimate}, {} plan ops, {} preferred",
            plan.len(),
            preferred.len()
        );

        Some(Evaluation {
            additive,
            estimate,
            relaxed_plan: plan,
            preferred,
        })
    }

    pub fn exploration(&self) -> &crate::exploration::Exploration {
        self.additive.exploration()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::task::{Axiom, Effect, Operator, Variable};

    /// pick-up (cost 2) enables put-down (cost 3); goal needs both steps.
    fn two_step_task() -> Task {
        Task::new(
            vec![Variable::new("holding", 2), Variable::new("stored", 2)],
            vec![0, 0],
            vec![FactPair::new(1, 1)],
            vec![
                Operator::new(
                    "pick-up ball",
                    vec![FactPair::new(0, 0)],
                    vec![Effect::unconditional(FactPair::new(0, 1))],
                    2,
                ),
                Operator::new(
                    "put-down ball",
                    vec![FactPair::new(0, 1)],
                    vec![Effect::unconditional(FactPair::new(1, 1))],
                    3,
                ),
            ],
            vec![],
        )
    }

    #[test]
    fn plan_collects_both_steps_and_prefers_the_applicable_one() {
        let _ = env_logger::builder().is_test(true).try_init();
        let task = two_step_task();
        let mut h = FfHeuristic::new(&task);
        let eval = h.evaluate(&task.initial_state).unwrap();
        assert_eq!(eval.relaxed_plan, vec![0, 1]);
        assert_eq!(eval.estimate, 5);
        assert_eq!(eval.additive, 5);
        // Only pick-up is applicable right now.
        assert_eq!(eval.preferred, vec![0]);
    }

    #[test]
    fn shared_operator_counted_once_keeps_ff_below_additive() {
        let op = Operator::new(
            "both",
            vec![],
            vec![
                Effect::unconditional(FactPair::new(0, 1)),
                Effect::unconditional(FactPair::new(1, 1)),
            ],
            3,
        );
        let task = Task::new(
            vec![Variable::new("x", 2), Variable::new("y", 2)],
            vec![0, 0],
            vec![FactPair::new(0, 1), FactPair::new(1, 1)],
            vec![op],
            vec![],
        );
        let mut h = FfHeuristic::new(&task);
        let eval = h.evaluate(&task.initial_state).unwrap();
        assert_eq!(eval.relaxed_plan, vec![0]);
        assert_eq!(eval.estimate, 3);
        assert_eq!(eval.additive, 6);
        assert!(eval.estimate <= eval.additive);
    }

    #[test]
    fn dead_end_reports_none() {
        let task = Task::new(
            vec![Variable::new("x", 2)],
            vec![0],
            vec![FactPair::new(0, 1)],
            vec![],
            vec![],
        );
        let mut h = FfHeuristic::new(&task);
        assert!(h.evaluate(&task.initial_state).is_none());
    }

    #[test]
    fn axioms_reach_but_never_enter_the_plan() {
        // op establishes x=1; an axiom derives d=1 from it; goal is d=1.
        let task = Task::new(
            vec![Variable::new("x", 2), Variable::derived("d", 2)],
            vec![0, 0],
            vec![FactPair::new(1, 1)],
            vec![Operator::new(
                "op",
                vec![],
                vec![Effect::unconditional(FactPair::new(0, 1))],
                4,
            )],
            vec![Axiom::new(vec![FactPair::new(0, 1)], FactPair::new(1, 1))],
        );
        let mut h = FfHeuristic::new(&task);
        let eval = h.evaluate(&task.initial_state).unwrap();
        assert_eq!(eval.relaxed_plan, vec![0]);
        assert_eq!(eval.estimate, 4);
    }

    #[test]
    fn plan_actions_never_forward_reference() {
        let task = two_step_task();
        let mut h = FfHeuristic::new(&task);
        h.evaluate(&task.initial_state).unwrap();
        let expl = h.exploration();
        let compiled = expl.compiled();
        for fact in 0..compiled.facts.len() {
            if let Some(rule_id) = expl.reached_by(fact) {
                let rule = &compiled.rules[rule_id];
                let head_cost = expl.cost_by_id(fact).unwrap();
                for &p in &rule.preconditions {
                    let p_cost = expl.cost_by_id(p).unwrap();
                    assert!(p_cost < head_cost, "precondition at or above firing cost");
                }
            }
        }
    }

    #[test]
    fn consecutive_evaluations_do_not_leak_state() {
        let task = two_step_task();
        let mut h = FfHeuristic::new(&task);
        let first = h.evaluate(&task.initial_state).unwrap();
        // Evaluate a different state in between.
        let mid = h.evaluate(&State::new(vec![1, 0])).unwrap();
        assert_eq!(mid.relaxed_plan, vec![1]);
        assert_eq!(mid.preferred, vec![1]);
        let second = h.evaluate(&task.initial_state).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn weighted_mode_reports_the_ceiling_of_the_family_sum() {
        let task = two_step_task();
        let weights = LearnedWeights::new(
            vec!["pick-up".to_string(), "put-down".to_string()],
            vec![1.5, 2.25],
        )
        .unwrap();
        let mut h = FfHeuristic::with_weights(&task, &weights).unwrap();
        let eval = h.evaluate(&task.initial_state).unwrap();
        // ceil(1.5 + 2.25) = 4, replacing the structural sum of 5.
        assert_eq!(eval.estimate, 4);
        assert_eq!(eval.additive, 5);
    }

    #[test]
    fn weight_list_length_mismatch_fails_at_construction() {
        let err = LearnedWeights::new(vec!["pick-up".to_string()], vec![]).unwrap_err();
        assert!(matches!(err, Error::WeightListMismatch(1, 0)));
    }

    #[test]
    fn missing_family_weight_fails_at_construction() {
        let task = two_step_task();
        let weights = LearnedWeights::new(vec!["pick-up".to_string()], vec![1.5]).unwrap();
        let err = FfHeuristic::with_weights(&task, &weights).unwrap_err();
        assert!(matches!(err, Error::MissingWeight(f) if f == "put-down"));
    }
}
