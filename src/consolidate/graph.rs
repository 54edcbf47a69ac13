//! Key-level dependency graph.
//!
//! Once consolidation settles, the graph is read-only. It orders targets for
//! emission (dependencies before dependents).

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::consolidate::errors::ConsolidationError;
use crate::consolidate::key::Key;

/// Graph of consolidated targets; an edge `a -> b` means `a` depends on `b`.
#[derive(Debug, Clone, Default)]
pub struct KeyGraph {
    graph: DiGraph<Key, ()>,
    key_to_node: HashMap<Key, NodeIndex>,
}

impl KeyGraph {
    pub fn new() -> Self {
        KeyGraph::default()
    }

    /// Add a key. Adding a key twice is a no-op.
    pub fn add_key(&mut self, key: Key) {
        if self.key_to_node.contains_key(&key) {
            return;
        }
        let node = self.graph.add_node(key.clone());
        self.key_to_node.insert(key, node);
    }

    /// Add a dependency edge between keys.
    pub fn add_edge(&mut self, from: &Key, to: &Key) {
        if let (Some(&from_node), Some(&to_node)) =
            (self.key_to_node.get(from), self.key_to_node.get(to))
        {
            if !self.graph.contains_edge(from_node, to_node) {
                self.graph.add_edge(from_node, to_node, ());
            }
        }
    }

    /// Direct dependencies of a key.
    pub fn dependencies(&self, key: &Key) -> Vec<&Key> {
        match self.key_to_node.get(key) {
            Some(&node) => self.graph.neighbors(node).map(|n| &self.graph[n]).collect(),
            None => Vec::new(),
        }
    }

    /// Keys that depend on the given key.
    pub fn dependents(&self, key: &Key) -> Vec<&Key> {
        match self.key_to_node.get(key) {
            Some(&node) => self
                .graph
                .neighbors_directed(node, petgraph::Direction::Incoming)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Keys with dependencies before dependents.
    pub fn topological_order(&self) -> Result<Vec<Key>, ConsolidationError> {
        let sorted = toposort(&self.graph, None).map_err(|cycle| {
            ConsolidationError::DependencyCycle {
                key: self.graph[cycle.node_id()].to_string(),
            }
        })?;

        // Edges point from dependent to dependency
        Ok(sorted.into_iter().rev().map(|n| self.graph[n].clone()).collect())
    }
}
