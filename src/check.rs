use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::graph::NodeKey;
use crate::toposort::Toposort;

/// Result of checking a leveled ordering against its graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult<N> {
    /// Graph nodes that appear in no level
    pub missing_nodes: Vec<N>,
    /// Nodes that appear in more than one level
    pub duplicate_nodes: Vec<N>,
    /// Nodes placed in a level that are not part of the graph
    pub unknown_nodes: Vec<N>,
    /// Indices of levels with no nodes
    pub empty_levels: Vec<usize>,
    /// Kept edges whose source is not in a strictly earlier level than the target
    pub order_violations: Vec<OrderViolation<N>>,
    /// Reported cyclic edges that are not edges of the graph
    pub unknown_cyclic_edges: Vec<(N, N)>,
    /// Sources of kept edges that still point into the start node
    pub start_node_dependencies: Vec<N>,
    pub ok: bool,
}

/// A kept edge that the levels do not respect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderViolation<N> {
    pub from: N,
    pub to: N,
    pub from_level: Option<usize>,
    pub to_level: Option<usize>,
}

/// Check a sort result for completeness, level order and start-node primacy.
///
/// `nodes` and `edges` describe the original graph; edge endpoints count as
/// nodes. Edges listed in `result.cyclic_edges` are exempt from the order
/// check.
pub fn check_ordering<N: NodeKey>(
    nodes: &BTreeSet<N>,
    edges: &BTreeSet<(N, N)>,
    result: &Toposort<N>,
    start_node: Option<&N>,
) -> CheckResult<N> {
    let mut graph_nodes: BTreeSet<&N> = nodes.iter().collect();
    for (from, to) in edges {
        graph_nodes.insert(from);
        graph_nodes.insert(to);
    }

    // First level each node was seen in, plus how often it was seen
    let mut placement: BTreeMap<&N, (usize, usize)> = BTreeMap::new();
    let mut empty_levels = Vec::new();
    for (i, level) in result.levels.iter().enumerate() {
        if level.is_empty() {
            empty_levels.push(i);
        }
        for node in level {
            placement.entry(node).or_insert((i, 0)).1 += 1;
        }
    }

    let missing_nodes: Vec<N> = graph_nodes
        .iter()
        .filter(|n| !placement.contains_key(*n))
        .map(|n| (*n).clone())
        .collect();
    let duplicate_nodes: Vec<N> = placement
        .iter()
        .filter(|(_, (_, count))| *count > 1)
        .map(|(n, _)| (*n).clone())
        .collect();
    let unknown_nodes: Vec<N> = placement
        .keys()
        .filter(|n| !graph_nodes.contains(*n))
        .map(|n| (*n).clone())
        .collect();

    let level_of = |node: &N| placement.get(node).map(|&(level, _)| level);

    let mut order_violations = Vec::new();
    let mut start_node_dependencies = Vec::new();
    for edge in edges {
        let (from, to) = edge;
        if result.cyclic_edges.contains(edge) {
            continue;
        }
        if start_node == Some(to) {
            start_node_dependencies.push(from.clone());
        }
        let from_level = level_of(from);
        let to_level = level_of(to);
        let respected = matches!((from_level, to_level), (Some(f), Some(t)) if f < t);
        if !respected {
            order_violations.push(OrderViolation {
                from: from.clone(),
                to: to.clone(),
                from_level,
                to_level,
            });
        }
    }

    let unknown_cyclic_edges: Vec<(N, N)> = result
        .cyclic_edges
        .iter()
        .filter(|edge| !edges.contains(*edge))
        .cloned()
        .collect();

    let ok = missing_nodes.is_empty()
        && duplicate_nodes.is_empty()
        && unknown_nodes.is_empty()
        && empty_levels.is_empty()
        && order_violations.is_empty()
        && unknown_cyclic_edges.is_empty()
        && start_node_dependencies.is_empty();

    CheckResult {
        missing_nodes,
        duplicate_nodes,
        unknown_nodes,
        empty_levels,
        order_violations,
        unknown_cyclic_edges,
        start_node_dependencies,
        ok,
    }
}
