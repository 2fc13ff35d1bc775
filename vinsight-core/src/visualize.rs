//! Graphviz DOT visualization of the component dependency graph.

use crate::channels::ComponentInterface;
use crate::graph::{build_graph, find_orphans};
use crate::project::ComponentAnalysis;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::Path;
use tracing::error;

/// Generate a Graphviz DOT representation of the component graph.
///
/// - components with no parent are lightblue, the rest lightgreen
/// - each edge is labelled `used/total`: how many of the dependency's
///   channels the parent exercises, out of how many it declares
pub fn generate_dot(interfaces: &[ComponentInterface], analyses: &[ComponentAnalysis]) -> String {
    let edge_count: usize = analyses.iter().map(|a| a.dependencies.len()).sum();
    let estimated_capacity = (analyses.len() * 80) + (edge_count * 60) + 150;

    let mut dot = String::with_capacity(estimated_capacity);

    if let Err(e) = write_dot_content(&mut dot, interfaces, analyses) {
        error!(error = %e, "failed to generate DOT string");
        return "digraph vinsight {\n}\n".to_string();
    }

    dot
}

fn write_dot_content(
    dot: &mut String,
    interfaces: &[ComponentInterface],
    analyses: &[ComponentAnalysis],
) -> std::fmt::Result {
    let graph = build_graph(analyses);
    let orphans: HashSet<&Path> = find_orphans(&graph).into_iter().collect();
    let totals: HashMap<&Path, usize> = interfaces
        .iter()
        .map(|i| (i.full_path.as_path(), i.channel_count()))
        .collect();

    writeln!(dot, "digraph vinsight {{")?;
    writeln!(dot, "  rankdir=LR;")?;
    writeln!(
        dot,
        "  node [shape=box, style=filled, fontname=\"JetBrains Mono\"];"
    )?;
    writeln!(dot)?;

    for analysis in analyses {
        let color = if orphans.contains(analysis.full_path.as_path()) {
            "lightblue"
        } else {
            "lightgreen"
        };
        writeln!(
            dot,
            "  \"{}\" [label=\"{}\", fillcolor={}];",
            analysis.full_path.display(),
            analysis.name,
            color
        )?;
    }

    writeln!(dot)?;

    for analysis in analyses {
        for dep in &analysis.dependencies {
            let used = dep.used_props.len() + dep.used_events.len() + dep.used_slots.len();
            let total = totals.get(dep.full_path.as_path()).copied().unwrap_or(used);
            writeln!(
                dot,
                "  \"{}\" -> \"{}\" [label=\"{}/{}\"];",
                analysis.full_path.display(),
                dep.full_path.display(),
                used,
                total
            )?;
        }
    }

    writeln!(dot, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{Prop, Slot, UsageReport};
    use std::path::PathBuf;

    #[test]
    fn test_generate_dot_empty() {
        let dot = generate_dot(&[], &[]);
        assert!(dot.starts_with("digraph vinsight {"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_generate_dot_edges_and_colors() {
        let interfaces = vec![ComponentInterface {
            name: "Btn".to_string(),
            full_path: PathBuf::from("Btn.vue"),
            props: vec![Prop::new("label"), Prop::new("size")],
            events: vec![],
            slots: vec![Slot::new("default")],
        }];
        let analyses = vec![
            ComponentAnalysis {
                full_path: PathBuf::from("App.vue"),
                name: "App".to_string(),
                dependencies: vec![UsageReport {
                    full_path: PathBuf::from("Btn.vue"),
                    used_props: vec![0],
                    ..Default::default()
                }],
            },
            ComponentAnalysis {
                full_path: PathBuf::from("Btn.vue"),
                name: "Btn".to_string(),
                dependencies: vec![],
            },
        ];

        let dot = generate_dot(&interfaces, &analyses);
        assert!(dot.contains("\"App.vue\" [label=\"App\", fillcolor=lightblue];"));
        assert!(dot.contains("\"Btn.vue\" [label=\"Btn\", fillcolor=lightgreen];"));
        assert!(dot.contains("\"App.vue\" -> \"Btn.vue\" [label=\"1/3\"];"));
    }
}
