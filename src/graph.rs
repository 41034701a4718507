//! Interned graph representation shared by the sorting algorithms.
//!
//! Callers hand the crate arbitrary node identifiers. Internally every
//! algorithm runs on dense `usize` indices and an adjacency list, so the
//! caller's identifiers are interned once per call into an [`IndexedGraph`].
//! Nodes are indexed in ascending `Ord` order and edges are deduplicated,
//! which keeps every traversal deterministic for a given input.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// A dense node index into an [`IndexedGraph`].
pub type NodeId = usize;

/// Bounds required of a caller's node identifier.
///
/// Implemented for every type that is cloneable, hashable and totally
/// ordered, which covers integers, `String` and `&str`.
pub trait NodeKey: Clone + Eq + Hash + Ord + Debug {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Ord + Debug {}

/// A directed graph with caller-supplied node identifiers mapped onto
/// dense indices.
///
/// The node set is normalized on construction: every edge endpoint becomes
/// a node even if the caller did not declare it.
#[derive(Debug, Clone)]
pub struct IndexedGraph<N> {
    nodes: Vec<N>,
    index: HashMap<N, NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    adj: Vec<Vec<NodeId>>,
}

impl<N: NodeKey> IndexedGraph<N> {
    /// Builds an interned graph from a node collection and an edge collection.
    ///
    /// Duplicate nodes and duplicate edges collapse.
    pub fn new<I, E>(nodes: I, edges: E) -> Self
    where
        I: IntoIterator<Item = N>,
        E: IntoIterator<Item = (N, N)>,
    {
        let edge_set: BTreeSet<(N, N)> = edges.into_iter().collect();
        let mut node_set: BTreeSet<N> = nodes.into_iter().collect();
        for (from, to) in &edge_set {
            node_set.insert(from.clone());
            node_set.insert(to.clone());
        }

        let nodes: Vec<N> = node_set.into_iter().collect();
        let index: HashMap<N, NodeId> = nodes
            .iter()
            .cloned()
            .enumerate()
            .map(|(id, node)| (node, id))
            .collect();

        let mut adj: Vec<Vec<NodeId>> = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::with_capacity(edge_set.len());
        for (from, to) in edge_set {
            let from_id = index[&from];
            let to_id = index[&to];
            adj[from_id].push(to_id);
            edges.push((from_id, to_id));
        }

        Self {
            nodes,
            index,
            edges,
            adj,
        }
    }

    /// Returns the index of `node`, if it is part of the graph.
    pub fn id_of(&self, node: &N) -> Option<NodeId> {
        self.index.get(node).copied()
    }

    /// Returns the caller identifier for an index.
    pub fn node(&self, id: NodeId) -> &N {
        &self.nodes[id]
    }

    /// All nodes, in index order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// All distinct edges as index pairs, sorted by (source, target).
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Returns the caller identifiers for an indexed edge.
    pub fn edge(&self, (from, to): (NodeId, NodeId)) -> (N, N) {
        (self.nodes[from].clone(), self.nodes[to].clone())
    }

    /// Adjacency list: `adjacency()[u]` holds the successors of `u`.
    pub fn adjacency(&self) -> &[Vec<NodeId>] {
        &self.adj
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Maps a list of indices back to an ordered set of caller identifiers.
    pub fn collect_nodes<'a, I>(&self, ids: I) -> BTreeSet<N>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        ids.into_iter().map(|&id| self.nodes[id].clone()).collect()
    }
}
