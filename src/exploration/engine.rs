//! The relaxed exploration fixpoint.
//!
//! One [`Exploration`] owns the compiled rule table for a task plus all
//! per-run scratch state: fact labels, first-achiever links, rule counters
//! and the bucket queue. [`Exploration::explore`] resets that state and
//! runs the fixpoint to completion; it can be called tens of thousands of
//! times (once per heuristic evaluation, once per landmark test) without
//! reallocating anything.

use std::collections::HashSet;

use log::{debug, trace};

use crate::{
    exploration::{
        queue::BucketQueue,
        unary::{CompiledTask, FactId, RuleId},
    },
    task::{FactPair, State, Task},
};

const UNREACHED: i32 = -1;

#[derive(Debug)]
pub struct Exploration {
    compiled: CompiledTask,
    // Per-fact run state.
    costs: Vec<i32>,
    reached_by: Vec<Option<RuleId>>,
    excluded: Vec<bool>,
    // Per-rule run state.
    unsatisfied: Vec<usize>,
    accumulated: Vec<i32>,
    disabled: Vec<bool>,
    queue: BucketQueue,
}

impl Exploration {
    pub fn new(task: &Task) -> Self {
        let compiled = CompiledTask::compile(task);
        let num_facts = compiled.facts.len();
        let num_rules = compiled.rules.len();
        Self {
            compiled,
            costs: vec![UNREACHED; num_facts],
            reached_by: vec![None; num_facts],
            excluded: vec![false; num_facts],
            unsatisfied: vec![0; num_rules],
            accumulated: vec![0; num_rules],
            disabled: vec![false; num_rules],
            queue: BucketQueue::new(),
        }
    }

    pub fn compiled(&self) -> &CompiledTask {
        &self.compiled
    }

    /// Runs the relaxed fixpoint from `seed_state`.
    ///
    /// `excluded_facts` are treated as permanently false: they are never
    /// enqueued, not even when true in the seed state, and any rule needing
    /// one never fires. `excluded_ops` are combined operator-or-axiom ids
    /// whose rules are all silenced for this run.
    ///
    /// Labels are assigned in non-decreasing cost order with additive cost
    /// propagation: a rule fires at (sum of its preconditions' labels +
    /// base cost). A fact already labelled is re-labelled only on strictly
    /// lower cost; at equal cost the earlier firing keeps the fact, and
    /// rules fire in rule-id order, so repeated calls with identical inputs
    /// produce identical labels and first-achiever links.
    pub fn explore(
        &mut self,
        seed_state: &State,
        excluded_facts: &[FactPair],
        excluded_ops: &HashSet<usize>,
    ) {
        self.reset(excluded_facts, excluded_ops);
        trace!(
            "exploration run: {} excluded facts, {} excluded ops",
            excluded_facts.len(),
            excluded_ops.len()
        );

        for fact in seed_state.facts() {
            self.label(self.compiled.facts.id(fact), 0, None);
        }
        // Rules without preconditions never see a counter decrement, so
        // they fire straight from the reset.
        for rule_id in 0..self.compiled.rules.len() {
            if self.unsatisfied[rule_id] == 0 {
                self.fire(rule_id);
            }
        }

        let mut settled = 0usize;
        while let Some((cost, fact)) = self.queue.pop() {
            let cost = cost as i32;
            debug_assert!(self.costs[fact] != UNREACHED && self.costs[fact] <= cost);
            if self.costs[fact] < cost {
                continue; // Stale entry; the fact was re-labelled cheaper.
            }
            settled += 1;
            // Clone-free walk: precondition_of is part of `compiled`, which
            // no label mutation touches.
            let rules = std::mem::take(&mut self.compiled.precondition_of[fact]);
            for &rule_id in &rules {
                self.unsatisfied[rule_id] -= 1;
                self.accumulated[rule_id] += cost;
                if self.unsatisfied[rule_id] == 0 {
                    self.fire(rule_id);
                }
            }
            self.compiled.precondition_of[fact] = rules;
        }
        debug!("exploration fixpoint: {settled} facts settled");
    }

    fn reset(&mut self, excluded_facts: &[FactPair], excluded_ops: &HashSet<usize>) {
        self.costs.fill(UNREACHED);
        self.reached_by.fill(None);
        self.excluded.fill(false);
        for &fact in excluded_facts {
            self.excluded[self.compiled.facts.id(fact)] = true;
        }
        let num_operators = self.compiled.num_operators();
        for (rule_id, rule) in self.compiled.rules.iter().enumerate() {
            self.unsatisfied[rule_id] = rule.preconditions.len();
            self.accumulated[rule_id] = 0;
            self.disabled[rule_id] = !excluded_ops.is_empty()
                && excluded_ops.contains(&rule.owner.combined_id(num_operators));
        }
        self.queue.clear();
    }

    fn fire(&mut self, rule_id: RuleId) {
        if self.disabled[rule_id] {
            return;
        }
        let rule = &self.compiled.rules[rule_id];
        let total = self.accumulated[rule_id] + rule.base_cost;
        self.label(rule.head, total, Some(rule_id));
    }

    fn label(&mut self, fact: FactId, cost: i32, by: Option<RuleId>) {
        if self.excluded[fact] {
            return;
        }
        if self.costs[fact] == UNREACHED || cost < self.costs[fact] {
            self.costs[fact] = cost;
            self.reached_by[fact] = by;
            self.queue.push(cost as usize, fact);
        }
    }

    /// Cost label of a fact after the last run, or `None` if unreachable.
    pub fn cost(&self, fact: FactPair) -> Option<i32> {
        self.cost_by_id(self.compiled.facts.id(fact))
    }

    pub fn cost_by_id(&self, fact: FactId) -> Option<i32> {
        match self.costs[fact] {
            UNREACHED => None,
            c => Some(c),
        }
    }

    pub fn is_reachable(&self, fact: FactPair) -> bool {
        self.cost(fact).is_some()
    }

    /// The rule that first achieved a fact in the last run; `None` both for
    /// seed-state facts and for unreachable facts.
    pub fn reached_by(&self, fact: FactId) -> Option<RuleId> {
        self.reached_by[fact]
    }

    /// True iff every goal fact got a finite label in the last run.
    pub fn goals_reachable(&self) -> bool {
        self.compiled
            .goals
            .iter()
            .all(|&g| self.costs[g] != UNREACHED)
    }
}
