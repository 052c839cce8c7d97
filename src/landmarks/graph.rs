//! The landmark graph: nodes, typed ordering edges, and the acyclicity
//! pass.
//!
//! Nodes are stored densely and addressed by index; `assign_ids` pins the
//! indices as the stable ids downstream heuristics use for array lookups.
//! Ordering edges carry an [`OrderingType`]; when cycles must be broken,
//! weaker types are sacrificed before stronger ones.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::landmarks::landmark::Landmark;

/// Ordering strength, weakest first. The derived `Ord` follows declaration
/// order, which is what the cycle-removal policy compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderingType {
    ObedientReasonable,
    Reasonable,
    Natural,
    GreedyNecessary,
    Necessary,
}

#[derive(Debug, Clone)]
pub struct LandmarkNode {
    pub id: usize,
    pub landmark: Landmark,
    /// Outgoing orderings: this landmark must occur before the keyed node.
    /// `BTreeMap` keeps edge iteration deterministic.
    pub children: BTreeMap<usize, OrderingType>,
    /// Incoming orderings, mirror of `children`.
    pub parents: BTreeMap<usize, OrderingType>,
}

#[derive(Debug, Default)]
pub struct LandmarkGraph {
    nodes: Vec<LandmarkNode>,
}

impl LandmarkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a landmark and returns its node index.
    pub fn add_landmark(&mut self, landmark: Landmark) -> usize {
        let id = self.nodes.len();
        self.nodes.push(LandmarkNode {
            id,
            landmark,
            children: BTreeMap::new(),
            parents: BTreeMap::new(),
        });
        id
    }

    /// Adds `from must occur before to`. A duplicate edge keeps the
    /// stronger of the two types.
    pub fn add_ordering(&mut self, from: usize, to: usize, ordering: OrderingType) {
        debug_assert!(from != to);
        self.nodes[from]
            .children
            .entry(to)
            .and_modify(|t| *t = (*t).max(ordering))
            .or_insert(ordering);
        self.nodes[to]
            .parents
            .entry(from)
            .and_modify(|t| *t = (*t).max(ordering))
            .or_insert(ordering);
    }

    pub fn remove_ordering(&mut self, from: usize, to: usize) {
        self.nodes[from].children.remove(&to);
        self.nodes[to].parents.remove(&from);
    }

    pub fn num_landmarks(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_orderings(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    pub fn nodes(&self) -> &[LandmarkNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &LandmarkNode {
        &self.nodes[index]
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut LandmarkNode {
        &mut self.nodes[index]
    }

    /// Removes every node matching `predicate`, along with all incident
    /// edges, compacting indices. Returns the number removed.
    pub fn remove_node_if(&mut self, mut predicate: impl FnMut(&LandmarkNode) -> bool) -> usize {
        let keep: Vec<bool> = self.nodes.iter().map(|n| !predicate(n)).collect();
        let removed = keep.iter().filter(|&&k| !k).count();
        if removed == 0 {
            return 0;
        }
        let mut remap = vec![usize::MAX; self.nodes.len()];
        let mut next = 0;
        for (old, &kept) in keep.iter().enumerate() {
            if kept {
                remap[old] = next;
                next += 1;
            }
        }
        let mut old_nodes = std::mem::take(&mut self.nodes);
        for (old, node) in old_nodes.drain(..).enumerate() {
            if !keep[old] {
                continue;
            }
            let remap_edges = |edges: BTreeMap<usize, OrderingType>| {
                edges
                    .into_iter()
                    .filter(|(other, _)| keep[*other])
                    .map(|(other, t)| (remap[other], t))
                    .collect()
            };
            self.nodes.push(LandmarkNode {
                id: remap[old],
                landmark: node.landmark,
                children: remap_edges(node.children),
                parents: remap_edges(node.parents),
            });
        }
        removed
    }

    /// Pins node indices as the stable landmark ids.
    pub fn assign_ids(&mut self) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.id = index;
        }
    }

    /// Removes ordering edges until no directed cycle remains. Each
    /// discovered cycle loses its weakest edge; among equals, the first
    /// encountered scanning the cycle from where the back edge closed it.
    /// Returns the number of edges removed.
    pub fn make_acyclic(&mut self) -> usize {
        let mut removed = 0;
        for start in 0..self.nodes.len() {
            while let Some(cycle) = self.find_cycle_from(start) {
                self.remove_weakest_cycle_edge(&cycle);
                removed += 1;
            }
        }
        if removed > 0 {
            info!("removed {removed} landmark orderings to achieve acyclicity");
        }
        removed
    }

    /// Iterative DFS from `start`; returns a cycle as a node sequence
    /// `[c0, ..., ck]` with edges `c0 -> c1 -> ... -> ck -> c0`, or `None`
    /// if no cycle is reachable.
    fn find_cycle_from(&self, start: usize) -> Option<Vec<usize>> {
        let n = self.nodes.len();
        let mut on_path = vec![false; n];
        let mut finished = vec![false; n];
        let mut path = Vec::new();
        // (node, snapshot of its children, next child index)
        let mut stack: Vec<(usize, Vec<usize>, usize)> = Vec::new();

        let push = |node: usize,
                    stack: &mut Vec<(usize, Vec<usize>, usize)>,
                    path: &mut Vec<usize>,
                    on_path: &mut Vec<bool>| {
            let children: Vec<usize> = self.nodes[node].children.keys().copied().collect();
            stack.push((node, children, 0));
            path.push(node);
            on_path[node] = true;
        };

        push(start, &mut stack, &mut path, &mut on_path);
        loop {
            let next_child = {
                let Some((_, children, next)) = stack.last_mut() else {
                    break;
                };
                if *next < children.len() {
                    let child = children[*next];
                    *next += 1;
                    Some(child)
                } else {
                    None
                }
            };
            match next_child {
                Some(child) if on_path[child] => {
                    let pos = path.iter().position(|&p| p == child).unwrap();
                    debug!(
                        "landmark ordering cycle of length {} found",
                        path.len() - pos
                    );
                    return Some(path[pos..].to_vec());
                }
                Some(child) => {
                    if !finished[child] {
                        push(child, &mut stack, &mut path, &mut on_path);
                    }
                }
                None => {
                    let (node, _, _) = stack.pop().unwrap();
                    finished[node] = true;
                    on_path[node] = false;
                    path.pop();
                }
            }
        }
        None
    }

    fn remove_weakest_cycle_edge(&mut self, cycle: &[usize]) {
        // Edge list starting at the back edge that closed the cycle.
        let mut edges = Vec::with_capacity(cycle.len());
        edges.push((cycle[cycle.len() - 1], cycle[0]));
        for pair in cycle.windows(2) {
            edges.push((pair[0], pair[1]));
        }
        let &(from, to) = edges
            .iter()
            .min_by_key(|&&(from, to)| self.nodes[from].children[&to])
            .unwrap();
        debug!("removing ordering {from} -> {to} to break a cycle");
        self.remove_ordering(from, to);
    }
}
