//! The additive heuristic: sum of the goal facts' relaxed cost labels.

use std::collections::HashSet;

use crate::{
    exploration::Exploration,
    task::{State, Task},
};

#[derive(Debug)]
pub struct AdditiveHeuristic {
    exploration: Exploration,
    no_excludes: HashSet<usize>,
}

impl AdditiveHeuristic {
    pub fn new(task: &Task) -> Self {
        Self {
            exploration: Exploration::new(task),
            no_excludes: HashSet::new(),
        }
    }

    /// Runs the exploration from `state` with no exclusions and sums the
    /// goal facts' labels. `None` marks a dead-end: some goal fact is
    /// unreachable even under delete relaxation, so the real state is
    /// unsolvable too.
    ///
    /// Each goal fact's label is its individually optimal relaxed cost;
    /// shared actions are counted once per goal they support, which is what
    /// makes the estimate additive (and inadmissible).
    pub fn compute(&mut self, state: &State) -> Option<i32> {
        self.exploration.explore(state, &[], &self.no_excludes);
        self.sum_goal_costs()
    }

    /// Reads the goal sum off the last exploration run without re-running.
    pub(crate) fn sum_goal_costs(&self) -> Option<i32> {
        let goals = &self.exploration.compiled().goals;
        goals
            .iter()
            .map(|&g| self.exploration.cost_by_id(g))
            .sum::<Option<i32>>()
    }

    pub fn exploration(&self) -> &Exploration {
        &self.exploration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Effect, FactPair, Operator, Variable};

    fn task_with_two_goals() -> Task {
        // Both goals are achieved by the same cost-3 operator; additive
        // counts it twice.
        let op = Operator::new(
            "both",
            vec![],
            vec![
                Effect::unconditional(FactPair::new(0, 1)),
                Effect::unconditional(FactPair::new(1, 1)),
            ],
            3,
        );
        Task::new(
            vec![Variable::new("x", 2), Variable::new("y", 2)],
            vec![0, 0],
            vec![FactPair::new(0, 1), FactPair::new(1, 1)],
            vec![op],
            vec![],
        )
    }

    #[test]
    fn additive_sums_per_goal_costs() {
        let task = task_with_two_goals();
        let mut h = AdditiveHeuristic::new(&task);
        assert_eq!(h.compute(&task.initial_state), Some(6));
    }

    #[test]
    fn satisfied_goals_cost_nothing() {
        let task = task_with_two_goals();
        let mut h = AdditiveHeuristic::new(&task);
        assert_eq!(h.compute(&State::new(vec![1, 1])), Some(0));
    }

    #[test]
    fn unreachable_goal_is_a_dead_end() {
        let task = Task::new(
            vec![Variable::new("x", 2)],
            vec![0],
            vec![FactPair::new(0, 1)],
            vec![], // no operator achieves the goal
            vec![],
        );
        let mut h = AdditiveHeuristic::new(&task);
        assert_eq!(h.compute(&task.initial_state), None);
    }
}
