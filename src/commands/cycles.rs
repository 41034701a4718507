use anyhow::Result;
use std::path::Path;

use cyclic_toposort::{cyclic_components, find_cyclic_edges};

pub fn run(file: &Path, json: bool) -> Result<()> {
    let fixture = super::load_fixture(file)?;
    let components = cyclic_components(fixture.nodes(), fixture.edges());
    let cyclic_edges = find_cyclic_edges(fixture.nodes(), fixture.edges());

    if json {
        let cycles_output: Vec<_> = components
            .iter()
            .map(|members| {
                serde_json::json!({
                    "members": members,
                    "member_count": members.len(),
                })
            })
            .collect();
        let edges_output: Vec<_> = cyclic_edges
            .iter()
            .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
            .collect();
        let output = serde_json::json!({
            "cycle_count": components.len(),
            "cycles": cycles_output,
            "cyclic_edges": edges_output,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if components.is_empty() {
        println!("No cycles detected.");
        return Ok(());
    }

    println!("Cycles detected: {}\n", components.len());
    for (i, members) in components.iter().enumerate() {
        let members: Vec<&str> = members.iter().map(String::as_str).collect();
        let kind = if members.len() == 1 { " [self-loop]" } else { "" };
        println!("  {}. {}{}", i + 1, members.join(", "), kind);
    }
    println!();
    super::print_edges("Cyclic edges", &cyclic_edges);

    Ok(())
}
