//! Compilation of a grounded task into unary rules over dense fact ids.
//!
//! Facts are numbered contiguously: variable `v`'s facts occupy the id
//! range starting at the prefix sum of the preceding domain sizes. Each
//! operator effect becomes one rule whose preconditions are the operator's
//! preconditions plus the effect's own conditions (sorted, deduplicated —
//! the engine's counters assume each precondition fact appears once).
//! Axioms compile to rules with base cost 0 owned by an axiom id.
//!
//! Rule ids follow compilation order — operators in declaration order, one
//! rule per effect in effect order, then axioms — and the per-fact
//! `precondition_of` lists preserve that order. Rules triggered by the
//! same fact settlement therefore fire in rule-id order, which together
//! with the engine's first-firing-wins policy makes every tie-break stable
//! across runs.

use itertools::Itertools;

use crate::task::{FactPair, Task};

pub type FactId = usize;
pub type RuleId = usize;

/// Where a rule came from. Axiom-owned rules take part in reachability but
/// never contribute to plans, estimates, or preferred actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOwner {
    Operator(usize),
    Axiom(usize),
}

impl RuleOwner {
    pub fn operator(&self) -> Option<usize> {
        match *self {
            RuleOwner::Operator(id) => Some(id),
            RuleOwner::Axiom(_) => None,
        }
    }

    /// Id in the task's combined operator-or-axiom space.
    pub fn combined_id(&self, num_operators: usize) -> usize {
        match *self {
            RuleOwner::Operator(id) => id,
            RuleOwner::Axiom(i) => num_operators + i,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnaryRule {
    pub head: FactId,
    pub preconditions: Vec<FactId>,
    pub base_cost: i32,
    pub owner: RuleOwner,
}

/// Dense fact numbering for one task.
#[derive(Debug, Clone)]
pub struct FactIndex {
    offsets: Vec<usize>,
    num_facts: usize,
}

impl FactIndex {
    fn new(task: &Task) -> Self {
        let mut offsets = Vec::with_capacity(task.variables.len());
        let mut total = 0;
        for var in &task.variables {
            offsets.push(total);
            total += var.domain_size;
        }
        Self {
            offsets,
            num_facts: total,
        }
    }

    pub fn id(&self, fact: FactPair) -> FactId {
        self.offsets[fact.var] + fact.value
    }

    pub fn len(&self) -> usize {
        self.num_facts
    }

    pub fn is_empty(&self) -> bool {
        self.num_facts == 0
    }
}

/// The immutable per-task compilation shared by every exploration run.
#[derive(Debug, Clone)]
pub struct CompiledTask {
    pub facts: FactIndex,
    pub rules: Vec<UnaryRule>,
    /// Per fact id: the rules listing the fact among their preconditions,
    /// in rule-id order.
    pub precondition_of: Vec<Vec<RuleId>>,
    /// Per fact id: combined operator-or-axiom ids whose effect list
    /// contains the fact, regardless of effect conditions.
    pub achievers_of: Vec<Vec<usize>>,
    /// Goal facts as dense ids.
    pub goals: Vec<FactId>,
    num_operators: usize,
}

impl CompiledTask {
    pub fn compile(task: &Task) -> Self {
        let facts = FactIndex::new(task);
        let mut rules = Vec::new();
        let mut achievers_of = vec![Vec::new(); facts.len()];

        for (op_id, op) in task.operators.iter().enumerate() {
            for effect in &op.effects {
                let preconditions = op
                    .preconditions
                    .iter()
                    .chain(&effect.conditions)
                    .map(|&f| facts.id(f))
                    .sorted_unstable()
                    .dedup()
                    .collect();
                rules.push(UnaryRule {
                    head: facts.id(effect.fact),
                    preconditions,
                    base_cost: op.cost,
                    owner: RuleOwner::Operator(op_id),
                });
                let achievers = &mut achievers_of[facts.id(effect.fact)];
                if achievers.last() != Some(&op_id) {
                    achievers.push(op_id);
                }
            }
        }
        for (ax_index, axiom) in task.axioms.iter().enumerate() {
            let preconditions = axiom
                .conditions
                .iter()
                .map(|&f| facts.id(f))
                .sorted_unstable()
                .dedup()
                .collect();
            rules.push(UnaryRule {
                head: facts.id(axiom.effect),
                preconditions,
                base_cost: 0,
                owner: RuleOwner::Axiom(ax_index),
            });
            achievers_of[facts.id(axiom.effect)].push(task.axiom_id(ax_index));
        }

        let mut precondition_of = vec![Vec::new(); facts.len()];
        for (rule_id, rule) in rules.iter().enumerate() {
            for &fact in &rule.preconditions {
                precondition_of[fact].push(rule_id);
            }
        }

        let goals = task.goals.iter().map(|&g| facts.id(g)).collect();

        Self {
            facts,
            rules,
            precondition_of,
            achievers_of,
            goals,
            num_operators: task.num_operators(),
        }
    }

    pub fn num_operators(&self) -> usize {
        self.num_operators
    }
}
