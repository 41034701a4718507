//! Leveled topological sort of graphs that may contain cycles.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::acyclic::topological_levels;
use crate::cycle::cyclic_edge_mask;
use crate::error::ToposortError;
use crate::graph::{IndexedGraph, NodeKey};

/// The result of [`cyclic_toposort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toposort<N: Ord> {
    /// Topological levels of the graph once all cyclic edges are removed,
    /// starting with the dependencyless nodes.
    pub levels: Vec<BTreeSet<N>>,
    /// Every edge that was removed: edges inside a cycle (self-loops
    /// included) and edges forced cyclic by the start node.
    pub cyclic_edges: BTreeSet<(N, N)>,
}

impl<N: NodeKey> Toposort<N> {
    /// Splits the result into `(levels, cyclic_edges)`.
    pub fn into_parts(self) -> (Vec<BTreeSet<N>>, BTreeSet<(N, N)>) {
        (self.levels, self.cyclic_edges)
    }

    /// Index of the level that holds `node`.
    pub fn level_of(&self, node: &N) -> Option<usize> {
        self.levels.iter().position(|level| level.contains(node))
    }

    /// A flat sequential order: levels in sequence, each level in ascending
    /// node order.
    pub fn order(&self) -> Vec<&N> {
        self.levels.iter().flatten().collect()
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_cyclic(&self, edge: &(N, N)) -> bool {
        self.cyclic_edges.contains(edge)
    }
}

/// Sorts a possibly cyclic graph into topological levels.
///
/// Every edge that participates in a cycle is identified via strongly
/// connected components and removed before sorting; self-loops always
/// count as cyclic. When `start_node` is given and part of the graph, every
/// edge into it is removed as well, so the start node ends up with no
/// dependency. A start node that is not in the graph is ignored.
///
/// Edges may reference nodes missing from `nodes`; those nodes are added.
///
/// # Errors
/// [`ToposortError::CyclicGraph`] can only surface if cycle removal left a
/// cycle behind, which indicates a bug rather than bad input.
///
/// # Example
/// ```
/// use cyclic_toposort::cyclic_toposort;
/// use std::collections::BTreeSet;
///
/// // 1 → 2 → 1 is a cycle feeding 3
/// let sorted = cyclic_toposort(vec![1, 2, 3], vec![(1, 2), (2, 1), (2, 3)], None).unwrap();
/// assert_eq!(sorted.cyclic_edges, BTreeSet::from([(1, 2), (2, 1)]));
/// assert_eq!(sorted.levels, vec![BTreeSet::from([1, 2]), BTreeSet::from([3])]);
/// ```
pub fn cyclic_toposort<N, I, E>(
    nodes: I,
    edges: E,
    start_node: Option<N>,
) -> Result<Toposort<N>, ToposortError>
where
    N: NodeKey,
    I: IntoIterator<Item = N>,
    E: IntoIterator<Item = (N, N)>,
{
    let graph = IndexedGraph::new(nodes, edges);
    let mut cyclic = cyclic_edge_mask(&graph);
    let natural_count = cyclic.iter().filter(|&&c| c).count();

    if let Some(start) = start_node {
        match graph.id_of(&start) {
            Some(start_id) => {
                for (flag, &(_, to)) in cyclic.iter_mut().zip(graph.edges()) {
                    if to == start_id {
                        *flag = true;
                    }
                }
            }
            None => log::warn!("start node {:?} is not part of the graph; ignoring it", start),
        }
    }

    let residual = graph
        .edges()
        .iter()
        .zip(&cyclic)
        .filter(|(_, c)| !**c)
        .map(|(&edge, _)| edge);
    let levels = topological_levels(graph.num_nodes(), residual)?;

    let cyclic_edges: BTreeSet<(N, N)> = graph
        .edges()
        .iter()
        .zip(&cyclic)
        .filter(|(_, c)| **c)
        .map(|(&edge, _)| graph.edge(edge))
        .collect();

    log::debug!(
        "cyclic toposort: {} nodes, {} edges, {} cyclic ({} forced by start node), {} levels",
        graph.num_nodes(),
        graph.num_edges(),
        cyclic_edges.len(),
        cyclic_edges.len() - natural_count,
        levels.len()
    );

    Ok(Toposort {
        levels: levels
            .iter()
            .map(|level| graph.collect_nodes(level))
            .collect(),
        cyclic_edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::find_cyclic_edges;

    fn set<const K: usize>(items: [i32; K]) -> BTreeSet<i32> {
        BTreeSet::from(items)
    }

    #[test]
    fn test_dag_has_no_cyclic_edges() {
        let sorted = cyclic_toposort(vec![1, 2, 3], vec![(1, 2), (2, 3)], None).unwrap();
        assert!(sorted.cyclic_edges.is_empty());
        assert_eq!(sorted.levels, vec![set([1]), set([2]), set([3])]);
    }

    #[test]
    fn test_simple_cycle_removes_every_cycle_edge() {
        let sorted = cyclic_toposort(vec![1, 2, 3], vec![(1, 2), (2, 3), (3, 1)], None).unwrap();
        assert_eq!(sorted.cyclic_edges, BTreeSet::from([(1, 2), (2, 3), (3, 1)]));
        assert_eq!(sorted.levels, vec![set([1, 2, 3])]);
    }

    #[test]
    fn test_start_node_forces_incoming_edges() {
        // 0 → 1 → 2: with start node 1 the edge 0 → 1 is dropped
        let sorted = cyclic_toposort(vec![0, 1, 2], vec![(0, 1), (1, 2)], Some(1)).unwrap();
        assert_eq!(sorted.cyclic_edges, BTreeSet::from([(0, 1)]));
        assert_eq!(sorted.levels, vec![set([0, 1]), set([2])]);
    }

    #[test]
    fn test_start_node_inside_cycle() {
        let sorted =
            cyclic_toposort(vec![1, 2, 3], vec![(1, 2), (2, 3), (3, 1)], Some(1)).unwrap();
        assert!(sorted.is_cyclic(&(3, 1)));
        assert_eq!(sorted.level_of(&1), Some(0));
    }

    #[test]
    fn test_missing_start_node_is_ignored() {
        let with = cyclic_toposort(vec![1, 2], vec![(1, 2)], Some(42)).unwrap();
        let without = cyclic_toposort(vec![1, 2], vec![(1, 2)], None).unwrap();
        assert_eq!(with, without);
        assert_eq!(with.level_of(&42), None);
    }

    #[test]
    fn test_self_loop_on_isolated_node() {
        let sorted = cyclic_toposort(vec![1, 2], vec![(2, 2)], None).unwrap();
        assert_eq!(sorted.cyclic_edges, BTreeSet::from([(2, 2)]));
        assert_eq!(sorted.levels, vec![set([1, 2])]);
    }

    #[test]
    fn test_undeclared_nodes_are_added() {
        let sorted = cyclic_toposort(Vec::new(), vec![(4, 5)], None).unwrap();
        assert_eq!(sorted.levels, vec![set([4]), set([5])]);
    }

    #[test]
    fn test_cycle_between_chains() {
        // 0 → 1 ⇄ 2 → 3
        let edges = vec![(0, 1), (1, 2), (2, 1), (2, 3)];
        let sorted = cyclic_toposort(Vec::new(), edges, None).unwrap();
        assert_eq!(sorted.cyclic_edges, BTreeSet::from([(1, 2), (2, 1)]));
        assert_eq!(sorted.levels, vec![set([0, 2]), set([1, 3])]);
    }

    #[test]
    fn test_residual_graph_is_acyclic() {
        let edges = vec![(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 4), (5, 6), (6, 6)];
        let sorted = cyclic_toposort(Vec::new(), edges.clone(), None).unwrap();
        let residual: Vec<(i32, i32)> = edges
            .into_iter()
            .filter(|e| !sorted.is_cyclic(e))
            .collect();
        assert!(find_cyclic_edges(Vec::new(), residual).is_empty());
    }

    #[test]
    fn test_into_parts_and_order() {
        let sorted = cyclic_toposort(vec![3, 1, 2], vec![(3, 1)], None).unwrap();
        assert_eq!(sorted.order(), vec![&2, &3, &1]);
        assert_eq!(sorted.num_levels(), 2);
        let (levels, cyclic) = sorted.into_parts();
        assert_eq!(levels, vec![set([2, 3]), set([1])]);
        assert!(cyclic.is_empty());
    }

    #[test]
    fn test_string_nodes() {
        let edges = vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "a".to_string()),
        ];
        let sorted = cyclic_toposort(Vec::new(), edges, Some("a".to_string())).unwrap();
        assert_eq!(sorted.cyclic_edges.len(), 2);
        assert_eq!(sorted.levels.len(), 1);
    }
}
