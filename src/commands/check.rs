use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use cyclic_toposort::{Fixture, FixtureReport, load_fixture_dir};

#[derive(Serialize)]
struct FixtureOutput {
    name: String,
    #[serde(flatten)]
    report: FixtureReport,
}

#[derive(Serialize)]
struct CheckJsonOutput {
    ok: bool,
    passed: usize,
    failed: usize,
    fixtures: Vec<FixtureOutput>,
}

fn fixture_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let fixtures: Vec<(PathBuf, Fixture)> = if path.is_dir() {
        load_fixture_dir(path)
            .with_context(|| format!("Failed to load fixtures from '{}'", path.display()))?
    } else {
        vec![(path.to_path_buf(), super::load_fixture(path)?)]
    };

    if fixtures.is_empty() {
        anyhow::bail!("No fixtures found in '{}'", path.display());
    }

    let mut outputs = Vec::with_capacity(fixtures.len());
    for (fixture_path, fixture) in &fixtures {
        let report = fixture
            .evaluate()
            .with_context(|| format!("Failed to sort fixture '{}'", fixture_path.display()))?;
        outputs.push(FixtureOutput {
            name: fixture_name(fixture_path),
            report,
        });
    }

    let failed = outputs.iter().filter(|o| !o.report.ok).count();
    let passed = outputs.len() - failed;

    if json {
        let output = CheckJsonOutput {
            ok: failed == 0,
            passed,
            failed,
            fixtures: outputs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for output in &outputs {
            print_human(output);
        }
        println!("\n{} passed, {} failed", passed, failed);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} fixture(s) failed", failed, passed + failed);
    }
    Ok(())
}

fn print_human(output: &FixtureOutput) {
    let report = &output.report;
    if report.ok {
        println!("PASS {}", output.name);
        return;
    }

    println!("FAIL {}", output.name);
    if !report.missing_cyclic_edges.is_empty() {
        let edges: Vec<String> = report.missing_cyclic_edges.iter().map(super::format_edge).collect();
        println!("     missing cyclic edges: {}", edges.join(", "));
    }
    if !report.unexpected_cyclic_edges.is_empty() {
        let edges: Vec<String> = report
            .unexpected_cyclic_edges
            .iter()
            .map(super::format_edge)
            .collect();
        println!("     unexpected cyclic edges: {}", edges.join(", "));
    }
    if report.topology_matches == Some(false) {
        let levels: Vec<String> = report
            .levels
            .iter()
            .map(|level| format!("[{}]", level.join(", ")))
            .collect();
        println!("     topology mismatch, got: {}", levels.join(" "));
    }
}
