use thiserror::Error;

/// Errors produced by the sorting core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToposortError {
    /// The acyclic sorter ran out of dependencyless nodes while nodes were
    /// still unplaced, so the input it was given still contains a cycle.
    #[error(
        "Cyclic graph detected in acyclic toposort: {remaining} node(s) left unplaced after placing {placed}"
    )]
    CyclicGraph {
        /// Nodes that were placed into levels before the sort stalled.
        placed: usize,
        /// Nodes that could not be placed.
        remaining: usize,
    },
}
