use anyhow::{Context, Result};
use std::path::Path;

pub fn run(file: &Path, start: Option<String>, json: bool) -> Result<()> {
    let fixture = super::load_fixture(file)?;
    let start_node = start.or_else(|| fixture.start_node.clone());

    let result = cyclic_toposort::cyclic_toposort(fixture.nodes(), fixture.edges(), start_node.clone())
        .with_context(|| format!("Failed to sort graph from '{}'", file.display()))?;

    if json {
        let cyclic_edges: Vec<_> = result
            .cyclic_edges
            .iter()
            .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
            .collect();
        let output = serde_json::json!({
            "start_node": start_node,
            "level_count": result.levels.len(),
            "levels": result.levels,
            "cyclic_edges": cyclic_edges,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(start) = &start_node {
        println!("Start node: {}", start);
    }
    println!("Levels: {}", result.levels.len());
    for (i, level) in result.levels.iter().enumerate() {
        let members: Vec<&str> = level.iter().map(String::as_str).collect();
        println!("  {}: {}", i, members.join(", "));
    }
    super::print_edges("Cyclic edges", &result.cyclic_edges);

    Ok(())
}
