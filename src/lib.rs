//! Leveled topological sorting of directed graphs that may contain cycles.
//!
//! [`cyclic_toposort`] first strips every edge that takes part in a cycle
//! (found through strongly connected components), then sorts what is left
//! into topological levels with [`acyclic_toposort`]. Both are generic over
//! the node identifier type.

pub mod acyclic;
pub mod check;
pub mod cycle;
pub mod error;
pub mod fixture;
pub mod graph;
pub mod toposort;

pub use acyclic::acyclic_toposort;
pub use check::{CheckResult, OrderViolation, check_ordering};
pub use cycle::{Scc, cyclic_components, find_cyclic_edges, strongly_connected_components};
pub use error::ToposortError;
pub use fixture::{Fixture, FixtureError, FixtureReport, load_fixture_dir};
pub use graph::{IndexedGraph, NodeId, NodeKey};
pub use toposort::{Toposort, cyclic_toposort};
