pub mod check;
pub mod cycles;
pub mod sort;

use anyhow::{Context, Result};
use cyclic_toposort::Fixture;
use std::path::Path;

/// Load a graph file, naming the file in any error.
pub fn load_fixture(path: &Path) -> Result<Fixture> {
    Fixture::load(path).with_context(|| format!("Failed to load graph from '{}'", path.display()))
}

pub fn format_edge((from, to): &(String, String)) -> String {
    format!("{} -> {}", from, to)
}

/// Print a titled edge list, one edge per line, or "none".
pub fn print_edges<'a, I>(title: &str, edges: I)
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    let edges: Vec<&(String, String)> = edges.into_iter().collect();
    if edges.is_empty() {
        println!("{}: none", title);
        return;
    }
    println!("{}: {}", title, edges.len());
    for edge in edges {
        println!("  {}", format_edge(edge));
    }
}
