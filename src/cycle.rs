//! Cycle detection for directed graphs.
//!
//! Cycles are found with **Tarjan's SCC** algorithm in O(V+E) time. The
//! traversal is iterative: an explicit frame stack replaces recursion, so
//! arbitrarily deep graphs cannot overflow the call stack.
//! Reference: Tarjan, "Depth-First Search and Linear Graph Algorithms," SIAM 1972.
//!
//! An edge is *cyclic* when it is a self-loop, or when its endpoints lie in
//! the same strongly connected component. Every such intra-SCC edge is
//! reported, not a minimum feedback arc set: two cycles that share a node
//! merge into one SCC, and all of its internal edges count as cyclic.
//!
//! # Graph Representation
//!
//! The index-level functions ([`tarjan_scc`], [`find_cycles`]) operate on an
//! adjacency list `&[Vec<NodeId>]` where `adj[u]` holds the successors of
//! `u`. The generic functions intern arbitrary node identifiers through
//! [`IndexedGraph`] first.

use std::collections::BTreeSet;

use crate::graph::{IndexedGraph, NodeId, NodeKey};

/// A strongly connected component: a maximal set of nodes where every node
/// is reachable from every other node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scc {
    /// The node IDs in this SCC, in no particular order.
    pub members: Vec<NodeId>,
}

const UNVISITED: usize = usize::MAX;

/// One suspended "call" of the depth-first search.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    /// Position of the next successor to explore in `adj[node]`.
    next_neighbor: usize,
}

/// Traversal state for one run of Tarjan's algorithm.
struct Tarjan<'a> {
    adj: &'a [Vec<NodeId>],
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    /// Nodes on the current DFS path and not yet assigned to an SCC.
    stack: Vec<NodeId>,
    call_stack: Vec<Frame>,
    next_index: usize,
    sccs: Vec<Scc>,
}

impl<'a> Tarjan<'a> {
    fn new(num_nodes: usize, adj: &'a [Vec<NodeId>]) -> Self {
        Self {
            adj,
            index: vec![UNVISITED; num_nodes],
            lowlink: vec![0; num_nodes],
            on_stack: vec![false; num_nodes],
            stack: Vec::new(),
            call_stack: Vec::new(),
            next_index: 0,
            sccs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Scc> {
        for start in 0..self.index.len() {
            if self.index[start] == UNVISITED {
                self.search_from(start);
            }
        }
        self.sccs
    }

    /// Assigns `v` its discovery index and pushes a frame for it.
    fn enter(&mut self, v: NodeId) {
        self.index[v] = self.next_index;
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        self.call_stack.push(Frame {
            node: v,
            next_neighbor: 0,
        });
    }

    fn search_from(&mut self, start: NodeId) {
        self.enter(start);

        loop {
            let Some(frame) = self.call_stack.last_mut() else {
                break;
            };
            let v = frame.node;
            let next = self.adj[v].get(frame.next_neighbor).copied();
            frame.next_neighbor += 1;

            match next {
                // Tree edge: "recurse" into w
                Some(w) if self.index[w] == UNVISITED => self.enter(w),
                // Back edge into the current path
                Some(w) if self.on_stack[w] => {
                    self.lowlink[v] = self.lowlink[v].min(self.index[w]);
                }
                // Cross edge into an already finished SCC
                Some(_) => {}
                None => self.leave(v),
            }
        }
    }

    /// All successors of `v` are explored: close its SCC if `v` is a root,
    /// then "return" to the parent frame.
    fn leave(&mut self, v: NodeId) {
        self.call_stack.pop();

        if self.lowlink[v] == self.index[v] {
            let mut members = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                members.push(w);
                if w == v {
                    break;
                }
            }
            self.sccs.push(Scc { members });
        }

        if let Some(parent) = self.call_stack.last() {
            let p = parent.node;
            self.lowlink[p] = self.lowlink[p].min(self.lowlink[v]);
        }
    }
}

/// Finds all strongly connected components in a directed graph using
/// Tarjan's algorithm.
///
/// # Arguments
/// * `num_nodes`: total number of nodes (IDs are 0..num_nodes)
/// * `adj`: adjacency list: adj[u] = list of successors of u
///
/// # Returns
/// All SCCs in reverse topological order of the condensation DAG.
/// Every node belongs to exactly one SCC; single-node SCCs may or may not
/// have self-loops.
///
/// # Complexity
/// * Time: O(V + E)
/// * Space: O(V)
///
/// # Example
/// ```
/// use cyclic_toposort::cycle::tarjan_scc;
///
/// // Graph: 0 → 1 → 2 → 0 (a 3-node cycle)
/// let adj = vec![vec![1], vec![2], vec![0]];
/// let sccs = tarjan_scc(3, &adj);
/// assert_eq!(sccs.len(), 1);
/// assert_eq!(sccs[0].members.len(), 3);
/// ```
pub fn tarjan_scc(num_nodes: usize, adj: &[Vec<NodeId>]) -> Vec<Scc> {
    Tarjan::new(num_nodes, adj).run()
}

/// Returns only the SCCs that contain a cycle: those with more than one
/// member, plus single nodes with a self-loop when `include_self_loops` is
/// true.
pub fn find_cycles(num_nodes: usize, adj: &[Vec<NodeId>], include_self_loops: bool) -> Vec<Scc> {
    tarjan_scc(num_nodes, adj)
        .into_iter()
        .filter(|scc| match scc.members.as_slice() {
            [n] => include_self_loops && adj[*n].contains(n),
            _ => true,
        })
        .collect()
}

/// Flags each edge of `graph` (in [`IndexedGraph::edges`] order) as cyclic
/// or not.
pub(crate) fn cyclic_edge_mask<N: NodeKey>(graph: &IndexedGraph<N>) -> Vec<bool> {
    let sccs = tarjan_scc(graph.num_nodes(), graph.adjacency());

    let mut component = vec![0usize; graph.num_nodes()];
    for (i, scc) in sccs.iter().enumerate() {
        if scc.members.len() > 1 {
            log::trace!(
                "strongly connected component of {} nodes: {:?}",
                scc.members.len(),
                graph.collect_nodes(&scc.members)
            );
        }
        for &node in &scc.members {
            component[node] = i;
        }
    }

    // Distinct endpoints sharing a component imply a component of size >= 2.
    graph
        .edges()
        .iter()
        .map(|&(from, to)| from == to || component[from] == component[to])
        .collect()
}

/// Identifies every edge that participates in a cycle, self-loops included.
///
/// Edges between different SCCs are never reported. The result does not
/// depend on the order in which nodes or edges are supplied.
///
/// # Example
/// ```
/// use cyclic_toposort::find_cyclic_edges;
/// use std::collections::BTreeSet;
///
/// // 1 → 2 → 1 is a cycle, 2 → 3 leaves it, 3 → 3 is a self-loop
/// let cyclic = find_cyclic_edges(vec![1, 2, 3], vec![(1, 2), (2, 1), (2, 3), (3, 3)]);
/// assert_eq!(cyclic, BTreeSet::from([(1, 2), (2, 1), (3, 3)]));
/// ```
pub fn find_cyclic_edges<N, I, E>(nodes: I, edges: E) -> BTreeSet<(N, N)>
where
    N: NodeKey,
    I: IntoIterator<Item = N>,
    E: IntoIterator<Item = (N, N)>,
{
    let graph = IndexedGraph::new(nodes, edges);
    let mask = cyclic_edge_mask(&graph);
    graph
        .edges()
        .iter()
        .zip(mask)
        .filter(|(_, cyclic)| *cyclic)
        .map(|(&edge, _)| graph.edge(edge))
        .collect()
}

/// Returns every strongly connected component of the graph, each as an
/// ordered node set, in reverse topological order of the condensation.
pub fn strongly_connected_components<N, I, E>(nodes: I, edges: E) -> Vec<BTreeSet<N>>
where
    N: NodeKey,
    I: IntoIterator<Item = N>,
    E: IntoIterator<Item = (N, N)>,
{
    let graph = IndexedGraph::new(nodes, edges);
    tarjan_scc(graph.num_nodes(), graph.adjacency())
        .iter()
        .map(|scc| graph.collect_nodes(&scc.members))
        .collect()
}

/// Returns the components that contain a cycle: every SCC with more than
/// one node, and every single node with a self-loop. Components are sorted
/// by their smallest member.
pub fn cyclic_components<N, I, E>(nodes: I, edges: E) -> Vec<BTreeSet<N>>
where
    N: NodeKey,
    I: IntoIterator<Item = N>,
    E: IntoIterator<Item = (N, N)>,
{
    let graph = IndexedGraph::new(nodes, edges);
    let mut components: Vec<BTreeSet<N>> = find_cycles(graph.num_nodes(), graph.adjacency(), true)
        .iter()
        .map(|scc| graph.collect_nodes(&scc.members))
        .collect();
    components.sort_by(|a, b| a.first().cmp(&b.first()));
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_members(scc: &Scc) -> Vec<NodeId> {
        let mut members = scc.members.clone();
        members.sort_unstable();
        members
    }

    // ─────────────────────────────────────────────────────
    // Tarjan's SCC Tests
    // ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_graph() {
        let sccs = tarjan_scc(0, &[]);
        assert!(sccs.is_empty());
    }

    #[test]
    fn test_single_node_no_cycle() {
        let adj = vec![vec![]];
        let sccs = tarjan_scc(1, &adj);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].members.len(), 1);
        let cycles = find_cycles(1, &adj, true);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_single_node_self_loop() {
        let adj = vec![vec![0]];
        let cycles = find_cycles(1, &adj, true);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].members, vec![0]);
    }

    #[test]
    fn test_self_loop_excluded_when_requested() {
        let adj = vec![vec![0]];
        let cycles = find_cycles(1, &adj, false);
        assert!(cycles.is_empty());
    }

    #[test]
    fn test_two_node_cycle() {
        // 0 → 1 → 0
        let adj = vec![vec![1], vec![0]];
        let cycles = find_cycles(2, &adj, false);
        assert_eq!(cycles.len(), 1);
        assert_eq!(sorted_members(&cycles[0]), vec![0, 1]);
    }

    #[test]
    fn test_multiple_disjoint_cycles() {
        // 0 → 1 → 0, 2 → 3 → 4 → 2, 5 isolated
        let adj = vec![vec![1], vec![0], vec![3], vec![4], vec![2], vec![]];
        let mut cycles: Vec<Vec<NodeId>> =
            find_cycles(6, &adj, false).iter().map(sorted_members).collect();
        cycles.sort();
        assert_eq!(cycles, vec![vec![0, 1], vec![2, 3, 4]]);
    }

    #[test]
    fn test_nested_cycles_single_scc() {
        // 0 → 1 → 2 → 0 and 1 → 3 → 1: one SCC {0,1,2,3}
        let adj = vec![vec![1], vec![2, 3], vec![0], vec![1]];
        let cycles = find_cycles(4, &adj, false);
        assert_eq!(cycles.len(), 1);
        assert_eq!(sorted_members(&cycles[0]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reverse_topological_order() {
        // 0 → 1 → 2: the sink's SCC closes first
        let adj = vec![vec![1], vec![2], vec![]];
        let sccs = tarjan_scc(3, &adj);
        let order: Vec<NodeId> = sccs.iter().map(|s| s.members[0]).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn test_cross_edge_into_finished_scc() {
        // 0 → 1 → 0 finishes before 2 → 0 is explored
        let adj = vec![vec![1], vec![0], vec![0]];
        let sccs = tarjan_scc(3, &adj);
        assert_eq!(sccs.len(), 2);
        let cycles = find_cycles(3, &adj, false);
        assert_eq!(sorted_members(&cycles[0]), vec![0, 1]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        // 0 → 1 → ... → 199_999 → 0: one long cycle
        let n = 200_000;
        let adj: Vec<Vec<NodeId>> = (0..n).map(|i| vec![(i + 1) % n]).collect();
        let sccs = tarjan_scc(n, &adj);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].members.len(), n);
    }

    #[test]
    fn test_performance_1000_node_graph() {
        let n = 1000;
        let mut adj: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        for i in 0..10 {
            adj[i].push((i + 1) % 10);
        }
        for i in 100..120 {
            adj[i].push(if i == 119 { 100 } else { i + 1 });
        }
        for i in 10..100 {
            adj[i].push(i + 1);
        }

        let cycles = find_cycles(n, &adj, false);
        assert_eq!(cycles.len(), 2);
    }

    // ─────────────────────────────────────────────────────
    // Cyclic Edge Tests
    // ─────────────────────────────────────────────────────

    #[test]
    fn test_cyclic_edges_simple_cycle() {
        let cyclic = find_cyclic_edges(vec![1, 2, 3], vec![(1, 2), (2, 3), (3, 1)]);
        assert_eq!(cyclic, BTreeSet::from([(1, 2), (2, 3), (3, 1)]));
    }

    #[test]
    fn test_cyclic_edges_dag_is_empty() {
        let cyclic = find_cyclic_edges(vec![1, 2, 3, 4], vec![(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert!(cyclic.is_empty());
    }

    #[test]
    fn test_self_loop_in_singleton_scc() {
        let cyclic = find_cyclic_edges(vec![1, 2], vec![(1, 1), (1, 2)]);
        assert_eq!(cyclic, BTreeSet::from([(1, 1)]));
    }

    #[test]
    fn test_edges_leaving_scc_are_not_cyclic() {
        // 0 ⇄ 1, then 1 → 2 → 3 ⇄ 4
        let edges = vec![(0, 1), (1, 0), (1, 2), (2, 3), (3, 4), (4, 3)];
        let cyclic = find_cyclic_edges(Vec::new(), edges);
        assert_eq!(cyclic, BTreeSet::from([(0, 1), (1, 0), (3, 4), (4, 3)]));
    }

    #[test]
    fn test_overlapping_cycles_mark_every_internal_edge() {
        // Figure eight through node 1: 0 → 1 → 0 and 1 → 2 → 1, plus the chord 0 → 2
        let edges = vec![(0, 1), (1, 0), (1, 2), (2, 1), (0, 2)];
        let cyclic = find_cyclic_edges(Vec::new(), edges.clone());
        assert_eq!(cyclic, edges.into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_self_loop_inside_larger_scc() {
        let cyclic = find_cyclic_edges(Vec::new(), vec![(1, 2), (2, 1), (2, 2)]);
        assert_eq!(cyclic, BTreeSet::from([(1, 2), (2, 1), (2, 2)]));
    }

    #[test]
    fn test_result_independent_of_input_order() {
        let edges = vec![(5, 1), (1, 2), (2, 5), (2, 7), (7, 8), (8, 7), (9, 9)];
        let mut reversed = edges.clone();
        reversed.reverse();
        assert_eq!(
            find_cyclic_edges(vec![9, 8, 7], edges),
            find_cyclic_edges(vec![7, 8, 9], reversed)
        );
    }

    // ─────────────────────────────────────────────────────
    // Component Tests
    // ─────────────────────────────────────────────────────

    #[test]
    fn test_strongly_connected_components_cover_all_nodes() {
        let sccs = strongly_connected_components(vec!["a", "z"], vec![("a", "b"), ("b", "a"), ("b", "c")]);
        let mut all: Vec<&str> = sccs.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, vec!["a", "b", "c", "z"]);
        assert!(sccs.contains(&BTreeSet::from(["a", "b"])));
    }

    #[test]
    fn test_cyclic_components_sorted_and_include_self_loops() {
        let edges = vec![("x", "y"), ("y", "x"), ("b", "b"), ("a", "x")];
        let components = cyclic_components(Vec::new(), edges);
        assert_eq!(
            components,
            vec![BTreeSet::from(["b"]), BTreeSet::from(["x", "y"])]
        );
    }
}
