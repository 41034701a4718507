//! Graph fixtures: the on-disk test-data format.
//!
//! A fixture is a record with a `graph` (node id → list of successor ids),
//! the `expected` cyclic edges as 2-element pairs, an optional `topology`
//! (expected levels) and an optional `start_node`. Fixtures are stored as
//! JSON or YAML:
//!
//! ```json
//! {
//!   "graph": { "a": ["b"], "b": ["a", "c"], "c": [] },
//!   "expected": [["a", "b"], ["b", "a"]],
//!   "topology": [["a", "b"], ["c"]]
//! }
//! ```
//!
//! Node ids are strings; integer ids are accepted and converted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::ToposortError;
use crate::toposort::{Toposort, cyclic_toposort};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A graph together with the sort result it is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFixture")]
pub struct Fixture {
    pub graph: BTreeMap<String, Vec<String>>,
    pub expected: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_node: Option<String>,
}

/// A node id as written in a fixture file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
enum NodeName {
    Text(String),
    Integer(i64),
}

impl From<NodeName> for String {
    fn from(name: NodeName) -> Self {
        match name {
            NodeName::Text(s) => s,
            NodeName::Integer(i) => i.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawFixture {
    graph: BTreeMap<NodeName, Vec<NodeName>>,
    expected: Vec<(NodeName, NodeName)>,
    #[serde(default)]
    topology: Option<Vec<Vec<NodeName>>>,
    #[serde(default)]
    start_node: Option<NodeName>,
}

impl From<RawFixture> for Fixture {
    fn from(raw: RawFixture) -> Self {
        let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (node, successors) in raw.graph {
            graph
                .entry(node.into())
                .or_default()
                .extend(successors.into_iter().map(String::from));
        }
        Fixture {
            graph,
            expected: raw
                .expected
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
            topology: raw.topology.map(|levels| {
                levels
                    .into_iter()
                    .map(|level| level.into_iter().map(String::from).collect())
                    .collect()
            }),
            start_node: raw.start_node.map(String::from),
        }
    }
}

/// Outcome of running a fixture through [`cyclic_toposort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureReport {
    pub levels: Vec<Vec<String>>,
    pub cyclic_edges: Vec<(String, String)>,
    /// Expected cyclic edges the sort did not report
    pub missing_cyclic_edges: Vec<(String, String)>,
    /// Reported cyclic edges the fixture did not expect
    pub unexpected_cyclic_edges: Vec<(String, String)>,
    /// Whether the levels match `topology`; `None` if the fixture has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology_matches: Option<bool>,
    pub ok: bool,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Fixture {
    /// Load a fixture from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Fixture, FixtureError> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Err(FixtureError::Validation(format!(
                "unsupported fixture extension for '{}' (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Fixture, FixtureError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Fixture, FixtureError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// All nodes: mapping keys plus every successor.
    pub fn nodes(&self) -> BTreeSet<String> {
        self.graph
            .iter()
            .flat_map(|(node, successors)| std::iter::once(node).chain(successors))
            .cloned()
            .collect()
    }

    /// All edges `(node, successor)`.
    pub fn edges(&self) -> BTreeSet<(String, String)> {
        self.graph
            .iter()
            .flat_map(|(node, successors)| {
                successors
                    .iter()
                    .map(move |succ| (node.clone(), succ.clone()))
            })
            .collect()
    }

    pub fn expected_cyclic_edges(&self) -> BTreeSet<(String, String)> {
        self.expected.iter().cloned().collect()
    }

    /// Sort the fixture's graph, honoring its start node.
    pub fn sort(&self) -> Result<Toposort<String>, ToposortError> {
        cyclic_toposort(self.nodes(), self.edges(), self.start_node.clone())
    }

    /// Sort the graph and compare the result with the expectations.
    ///
    /// Levels are compared order-insensitively, both within a level and
    /// across the list of levels.
    pub fn evaluate(&self) -> Result<FixtureReport, ToposortError> {
        let result = self.sort()?;
        let expected = self.expected_cyclic_edges();

        let missing_cyclic_edges: Vec<(String, String)> =
            expected.difference(&result.cyclic_edges).cloned().collect();
        let unexpected_cyclic_edges: Vec<(String, String)> =
            result.cyclic_edges.difference(&expected).cloned().collect();

        let levels: Vec<Vec<String>> = result
            .levels
            .iter()
            .map(|level| level.iter().cloned().collect())
            .collect();

        let topology_matches = self
            .topology
            .as_ref()
            .map(|topology| canonical_levels(topology) == canonical_levels(&levels));

        let ok = missing_cyclic_edges.is_empty()
            && unexpected_cyclic_edges.is_empty()
            && topology_matches != Some(false);

        Ok(FixtureReport {
            levels,
            cyclic_edges: result.cyclic_edges.into_iter().collect(),
            missing_cyclic_edges,
            unexpected_cyclic_edges,
            topology_matches,
            ok,
        })
    }
}

fn canonical_levels(levels: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut canonical: Vec<Vec<String>> = levels
        .iter()
        .map(|level| {
            let mut level = level.clone();
            level.sort();
            level
        })
        .collect();
    canonical.sort();
    canonical
}

/// Load every fixture (`.json`, `.yaml`, `.yml`) in `dir`, sorted by path.
///
/// Other files are skipped; a fixture that fails to parse is an error.
pub fn load_fixture_dir(dir: &Path) -> Result<Vec<(PathBuf, Fixture)>, FixtureError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_fixture = path.is_file()
            && matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("json" | "yaml" | "yml")
            );
        if is_fixture {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let fixture = Fixture::load(&path)?;
            Ok((path, fixture))
        })
        .collect()
}
