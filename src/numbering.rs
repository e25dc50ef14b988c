//! Step numbering: the consecutive numbers shown next to each workflow step.
//!
//! Numbers are derived from the graph and never stored. Every node reachable
//! from the start node (except the start node itself) receives a number, and
//! the numbers always form the range `1..=k` whatever the shape of the graph.

use crate::workflow::{Edge, Node};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::collections::VecDeque;

/// The result of numbering a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepNumbers {
    /// Numbered node ids; the node at index `i` has step number `i + 1`.
    order: Vec<String>,
    numbers: AHashMap<String, u32>,
}

impl StepNumbers {
    pub fn get(&self, node_id: &str) -> Option<u32> {
        self.numbers.get(node_id).copied()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.numbers.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Numbered nodes in ascending step order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i as u32 + 1))
    }

    pub fn as_map(&self) -> &AHashMap<String, u32> {
        &self.numbers
    }
}

/// Computes step numbers by longest-path leveling from the start node.
pub struct StepNumberer;

impl StepNumberer {
    /// Numbers every node reachable from the start node.
    ///
    /// Returns an empty result when there is no start node or nothing hangs off it.
    pub fn number(nodes: &[Node], edges: &[Edge]) -> StepNumbers {
        let (levels, discovery) = Self::level(nodes, edges);

        let order: Vec<String> = discovery
            .into_iter()
            .filter(|id| levels.get(id).is_some_and(|level| *level > 0))
            .sorted_by_key(|id| levels[id])
            .map(str::to_string)
            .collect();

        let numbers = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as u32 + 1))
            .collect();

        tracing::trace!(numbered = order.len(), "computed step numbers");
        StepNumbers { order, numbers }
    }

    /// The provisional level of every reachable node, the start node at 0.
    ///
    /// A node reachable along paths of different lengths takes the length of the
    /// longest one, so a join is always leveled after every path feeding it.
    pub fn levels(nodes: &[Node], edges: &[Edge]) -> AHashMap<String, usize> {
        let (levels, _) = Self::level(nodes, edges);
        levels
            .into_iter()
            .map(|(id, level)| (id.to_string(), level))
            .collect()
    }

    /// Returns the levels and the ids in first-discovery order (start first).
    fn level<'a>(nodes: &'a [Node], edges: &'a [Edge]) -> (AHashMap<&'a str, usize>, Vec<&'a str>) {
        let mut levels: AHashMap<&str, usize> = AHashMap::new();
        let mut discovery: Vec<&str> = Vec::new();

        let Some(start) = nodes.iter().find(|n| n.kind.is_start()) else {
            return (levels, discovery);
        };

        let known: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut adjacency: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for edge in edges {
            if edge.target == start.id || !known.contains(edge.target.as_str()) {
                continue;
            }
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        // A longest path in a DAG is shorter than the node count; the cap keeps
        // a cyclic input from relaxing forever.
        let cap = nodes.len();

        levels.insert(start.id.as_str(), 0);
        discovery.push(start.id.as_str());
        let mut queue = VecDeque::from([start.id.as_str()]);

        while let Some(current) = queue.pop_front() {
            let next_level = levels[current] + 1;
            if next_level > cap {
                continue;
            }
            let Some(targets) = adjacency.get(current) else {
                continue;
            };
            for &target in targets {
                match levels.get_mut(target) {
                    None => {
                        levels.insert(target, next_level);
                        discovery.push(target);
                        queue.push_back(target);
                    }
                    Some(level) if *level < next_level => {
                        *level = next_level;
                        queue.push_back(target);
                    }
                    Some(_) => {}
                }
            }
        }

        (levels, discovery)
    }
}
