//! Leveled topological sort of an acyclic graph.
//!
//! The sort repeatedly peels off the "dependencyless frontier" (every node
//! whose predecessors have all been placed) and emits it as the next level.
//! Levels therefore respect every edge: a producer always sits in a strictly
//! earlier level than its consumer. Nodes inside one level carry no order.

use std::collections::BTreeSet;

use crate::error::ToposortError;
use crate::graph::{IndexedGraph, NodeId, NodeKey};

/// Sorts an acyclic graph into topological levels, starting with the nodes
/// that have no dependencies.
///
/// Every edge endpoint is treated as a node, and isolated nodes form part of
/// the first level.
///
/// # Errors
/// Returns [`ToposortError::CyclicGraph`] if the graph still contains a
/// cycle (including a self-loop).
///
/// # Example
/// ```
/// use cyclic_toposort::acyclic_toposort;
/// use std::collections::BTreeSet;
///
/// let levels = acyclic_toposort(vec![1, 2, 3], vec![(1, 2), (2, 3)]).unwrap();
/// assert_eq!(
///     levels,
///     vec![BTreeSet::from([1]), BTreeSet::from([2]), BTreeSet::from([3])]
/// );
/// ```
pub fn acyclic_toposort<N, I, E>(nodes: I, edges: E) -> Result<Vec<BTreeSet<N>>, ToposortError>
where
    N: NodeKey,
    I: IntoIterator<Item = N>,
    E: IntoIterator<Item = (N, N)>,
{
    let graph = IndexedGraph::new(nodes, edges);
    let levels = topological_levels(graph.num_nodes(), graph.edges().iter().copied())?;

    log::debug!(
        "acyclic toposort: {} nodes, {} edges, {} levels",
        graph.num_nodes(),
        graph.num_edges(),
        levels.len()
    );

    Ok(levels
        .iter()
        .map(|level| graph.collect_nodes(level))
        .collect())
}

/// Index-level leveled sort over nodes `0..num_nodes`.
///
/// Works with in-degree counters instead of predecessor sets: a node joins
/// the next frontier at the moment its last unplaced predecessor is placed.
/// Runs in O(V + E).
///
/// # Errors
/// Returns [`ToposortError::CyclicGraph`] when nodes remain but no node is
/// free of dependencies.
pub fn topological_levels<I>(num_nodes: usize, edges: I) -> Result<Vec<Vec<NodeId>>, ToposortError>
where
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    let mut successors: Vec<Vec<NodeId>> = vec![Vec::new(); num_nodes];
    let mut in_degree = vec![0usize; num_nodes];
    for (from, to) in edges {
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut frontier: Vec<NodeId> = (0..num_nodes).filter(|&n| in_degree[n] == 0).collect();
    let mut levels: Vec<Vec<NodeId>> = Vec::new();
    let mut placed = 0usize;

    while !frontier.is_empty() {
        placed += frontier.len();
        let mut next = Vec::new();
        for &node in &frontier {
            for &succ in &successors[node] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    next.push(succ);
                }
            }
        }
        levels.push(std::mem::replace(&mut frontier, next));
    }

    if placed < num_nodes {
        return Err(ToposortError::CyclicGraph {
            placed,
            remaining: num_nodes - placed,
        });
    }

    Ok(levels)
}
