//! The landmark itself: its facts, flags, and achiever sets.

use std::{collections::HashSet, slice};

use crate::task::FactPair;

/// A landmark's facts. There is deliberately no conjunctive variant: the
/// causal-necessity machinery in this crate is only defined for simple and
/// disjunctive landmarks, so conjunctive ones are unrepresentable rather
/// than guarded against at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandmarkFacts {
    /// A single fact every plan must make true.
    Simple(FactPair),
    /// A disjunction: every plan must make at least one of these true.
    Disjunctive(Vec<FactPair>),
}

impl LandmarkFacts {
    pub fn facts(&self) -> &[FactPair] {
        match self {
            LandmarkFacts::Simple(fact) => slice::from_ref(fact),
            LandmarkFacts::Disjunctive(facts) => facts,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Landmark {
    pub facts: LandmarkFacts,
    pub is_true_in_goal: bool,
    /// Set during achiever computation when any landmark fact belongs to a
    /// derived variable.
    pub is_derived: bool,
    /// Combined operator-or-axiom ids whose effect list contains a landmark
    /// fact, regardless of effect conditions. Computed once per task.
    pub possible_achievers: HashSet<usize>,
    /// The subset of `possible_achievers` consistent with minimal-cost
    /// reachability when the landmark itself is excluded.
    pub first_achievers: HashSet<usize>,
}

impl Landmark {
    pub fn simple(fact: FactPair, is_true_in_goal: bool) -> Self {
        Self::new(LandmarkFacts::Simple(fact), is_true_in_goal)
    }

    pub fn disjunctive(facts: Vec<FactPair>, is_true_in_goal: bool) -> Self {
        debug_assert!(facts.len() > 1);
        Self::new(LandmarkFacts::Disjunctive(facts), is_true_in_goal)
    }

    fn new(facts: LandmarkFacts, is_true_in_goal: bool) -> Self {
        Self {
            facts,
            is_true_in_goal,
            is_derived: false,
            possible_achievers: HashSet::new(),
            first_achievers: HashSet::new(),
        }
    }

    pub fn is_disjunctive(&self) -> bool {
        matches!(self.facts, LandmarkFacts::Disjunctive(_))
    }

    pub fn contains(&self, fact: FactPair) -> bool {
        self.facts.facts().contains(&fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_landmark_exposes_its_single_fact() {
        let lm = Landmark::simple(FactPair::new(2, 1), true);
        assert_eq!(lm.facts.facts(), &[FactPair::new(2, 1)]);
        assert!(!lm.is_disjunctive());
        assert!(lm.contains(FactPair::new(2, 1)));
        assert!(!lm.contains(FactPair::new(2, 0)));
    }

    #[test]
    fn disjunctive_landmark_contains_any_disjunct() {
        let lm = Landmark::disjunctive(vec![FactPair::new(0, 1), FactPair::new(1, 1)], false);
        assert!(lm.is_disjunctive());
        assert!(lm.contains(FactPair::new(1, 1)));
        assert_eq!(lm.facts.facts().len(), 2);
    }
}
