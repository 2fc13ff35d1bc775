//! Component dependency graph.
//!
//! Nodes are component paths, an edge `parent -> dependency` exists for
//! every resolved import. Built in O(|V| + |E|) from the project analysis.

use crate::project::ComponentAnalysis;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::path::Path;

/// Builds the dependency graph (DiGraphMap) from per-component analyses.
///
/// Uses `DiGraphMap<&Path, ()>`: borrowed paths avoid cloning, and the unit
/// edge weight keeps the map small.
pub fn build_graph(analyses: &[ComponentAnalysis]) -> DiGraphMap<&Path, ()> {
    let mut g = DiGraphMap::new();

    for analysis in analyses {
        g.add_node(analysis.full_path.as_path());
    }

    for analysis in analyses {
        for dep in &analysis.dependencies {
            g.add_edge(analysis.full_path.as_path(), dep.full_path.as_path(), ());
        }
    }

    g
}

/// Components no other component imports (pages, the app root, or files
/// nothing references anymore). Sorted for stable output.
pub fn find_orphans<'a>(g: &DiGraphMap<&'a Path, ()>) -> Vec<&'a Path> {
    let mut orphans: Vec<&Path> = g
        .nodes()
        .filter(|n| g.neighbors_directed(*n, Direction::Incoming).next().is_none())
        .collect();
    orphans.sort();
    orphans
}

/// Components importing `component`.
pub fn parents_of<'a>(g: &DiGraphMap<&'a Path, ()>, component: &Path) -> Vec<&'a Path> {
    let Some(node) = g.nodes().find(|n| *n == component) else {
        return Vec::new();
    };
    let mut parents: Vec<&Path> = g.neighbors_directed(node, Direction::Incoming).collect();
    parents.sort();
    parents
}
