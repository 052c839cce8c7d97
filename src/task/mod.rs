//! Grounded planning-task model.
//!
//! A task is a set of finite-domain variables, an initial state (one value
//! per variable), a goal fact set, grounded operators with conditional
//! effects and non-negative integer costs, and axioms deriving values of
//! derived variables. The model is read-only input to the rest of the
//! crate: it is built once and never mutated by any analysis.
//!
//! Operators and axioms share a single id space: operators take
//! `0..num_operators()`, axioms follow. Achiever sets and exclusion sets
//! are expressed in these combined ids.

use std::fmt;

/// A fact is one (variable, value) pair. A state assigns one value to every
/// variable, so it makes exactly one fact per variable true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactPair {
    pub var: usize,
    pub value: usize,
}

impl FactPair {
    pub fn new(var: usize, value: usize) -> Self {
        Self { var, value }
    }
}

impl fmt::Display for FactPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var{}={}", self.var, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub domain_size: usize,
    /// Derived variables get their values from axioms, not operators.
    pub is_derived: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, domain_size: usize) -> Self {
        Self {
            name: name.into(),
            domain_size,
            is_derived: false,
        }
    }

    pub fn derived(name: impl Into<String>, domain_size: usize) -> Self {
        Self {
            name: name.into(),
            domain_size,
            is_derived: true,
        }
    }
}

/// A total assignment of one value per variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    values: Vec<usize>,
}

impl State {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: usize) -> usize {
        self.values[var]
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// The facts this state makes true, one per variable.
    pub fn facts(&self) -> impl Iterator<Item = FactPair> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(var, &value)| FactPair::new(var, value))
    }

    pub fn contains(&self, fact: FactPair) -> bool {
        self.values[fact.var] == fact.value
    }
}

impl From<Vec<usize>> for State {
    fn from(values: Vec<usize>) -> Self {
        Self::new(values)
    }
}

/// One conditional effect of an operator: `fact` becomes true whenever the
/// operator is applied in a state satisfying `conditions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    pub conditions: Vec<FactPair>,
    pub fact: FactPair,
}

impl Effect {
    pub fn unconditional(fact: FactPair) -> Self {
        Self {
            conditions: Vec::new(),
            fact,
        }
    }

    pub fn conditional(conditions: Vec<FactPair>, fact: FactPair) -> Self {
        Self { conditions, fact }
    }
}

#[derive(Debug, Clone)]
pub struct Operator {
    pub name: String,
    pub preconditions: Vec<FactPair>,
    pub effects: Vec<Effect>,
    /// Non-negative structural cost.
    pub cost: i32,
}

impl Operator {
    pub fn new(
        name: impl Into<String>,
        preconditions: Vec<FactPair>,
        effects: Vec<Effect>,
        cost: i32,
    ) -> Self {
        debug_assert!(cost >= 0);
        Self {
            name: name.into(),
            preconditions,
            effects,
            cost,
        }
    }

    /// The operator's family key: its name up to the first space. Grounded
    /// operator names are "<family> <arguments...>", so this recovers the
    /// schema the operator was instantiated from.
    pub fn family(&self) -> &str {
        match self.name.find(' ') {
            Some(pos) => &self.name[..pos],
            None => &self.name,
        }
    }

    /// True if some effect establishes `fact` with an empty condition set.
    pub fn unconditionally_achieves(&self, fact: FactPair) -> bool {
        self.effects
            .iter()
            .any(|e| e.fact == fact && e.conditions.is_empty())
    }
}

/// A derivation rule for a derived variable. Axioms behave like zero-cost
/// operators during reachability but never appear in plans or estimates.
#[derive(Debug, Clone)]
pub struct Axiom {
    pub conditions: Vec<FactPair>,
    pub effect: FactPair,
}

impl Axiom {
    pub fn new(conditions: Vec<FactPair>, effect: FactPair) -> Self {
        Self { conditions, effect }
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub variables: Vec<Variable>,
    pub initial_state: State,
    pub goals: Vec<FactPair>,
    pub operators: Vec<Operator>,
    pub axioms: Vec<Axiom>,
}

impl Task {
    pub fn new(
        variables: Vec<Variable>,
        initial_state: impl Into<State>,
        goals: Vec<FactPair>,
        operators: Vec<Operator>,
        axioms: Vec<Axiom>,
    ) -> Self {
        let initial_state = initial_state.into();
        debug_assert_eq!(variables.len(), initial_state.num_variables());
        Self {
            variables,
            initial_state,
            goals,
            operators,
            axioms,
        }
    }

    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    /// Size of the combined operator-or-axiom id space.
    pub fn num_operators_and_axioms(&self) -> usize {
        self.operators.len() + self.axioms.len()
    }

    pub fn is_axiom_id(&self, id: usize) -> bool {
        id >= self.operators.len()
    }

    /// Combined id of the axiom at `axiom_index`.
    pub fn axiom_id(&self, axiom_index: usize) -> usize {
        self.operators.len() + axiom_index
    }

    /// Preconditions of an operator, or body conditions of an axiom, by
    /// combined id.
    pub fn preconditions_of(&self, id: usize) -> &[FactPair] {
        if self.is_axiom_id(id) {
            &self.axioms[id - self.operators.len()].conditions
        } else {
            &self.operators[id].preconditions
        }
    }

    pub fn is_applicable(&self, op: &Operator, state: &State) -> bool {
        op.preconditions.iter().all(|&p| state.contains(p))
    }

    pub fn has_conditional_effects(&self) -> bool {
        self.operators
            .iter()
            .any(|op| op.effects.iter().any(|e| !e.conditions.is_empty()))
    }
}
