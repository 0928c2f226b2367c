//! Per-variable unique tables for BDD nodes.
//!
//! The manager keeps a plain arena of nodes (indexed by [`NodeId`]) and,
//! next to it, one subtable per variable:
//!
//! ```text
//! subtables[0] → Subtable for x1
//! subtables[1] → Subtable for x2
//! ...
//! ```
//!
//! Each subtable maps `(low, high)` children to the node ID holding them.
//! All nodes of a subtable share the same variable, so the variable does
//! not need to be part of the key. A lookup here before every node creation
//! is what makes structurally equal nodes unique (hash-consing).

use std::collections::HashMap;

use crate::reference::Ref;
use crate::types::{NodeId, Var};

/// A subtable storing BDD nodes for a single variable.
#[derive(Debug, Clone)]
pub struct Subtable {
    /// The variable for all nodes in this subtable.
    pub variable: Var,

    /// Map from (low, high) to node index in the arena.
    nodes: HashMap<(Ref, Ref), NodeId>,
}

impl Subtable {
    pub fn new(variable: Var) -> Self {
        Self {
            variable,
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its children.
    pub fn find(&self, low: Ref, high: Ref) -> Option<NodeId> {
        self.nodes.get(&(low, high)).copied()
    }

    /// Insert a node into the subtable.
    ///
    /// # Panics
    ///
    /// Panics if a node with the same children is already present, since
    /// two slots for one triple would break canonicity.
    pub fn insert(&mut self, low: Ref, high: Ref, id: NodeId) {
        let old = self.nodes.insert((low, high), id);
        assert!(
            old.is_none(),
            "Duplicate node ({}, {}, {}) in unique table",
            self.variable,
            low,
            high
        );
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keep only the nodes for which `keep` returns true.
    ///
    /// Returns the IDs of the removed nodes.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> Vec<NodeId> {
        let mut removed = Vec::new();
        self.nodes.retain(|_, &mut id| {
            let alive = keep(id);
            if !alive {
                removed.push(id);
            }
            alive
        });
        removed
    }
}
