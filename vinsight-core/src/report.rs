//! Output formatting - plaintext and JSON.

use std::collections::HashMap;
use std::path::Path;

use serde_json::json;

use crate::builder::AnalysisResult;
use crate::channels::ComponentInterface;
use crate::logging::log_warn;
use crate::project::UnusedChannel;

fn display_path<'a>(path: &'a Path, root: &Path) -> std::path::Display<'a> {
    path.strip_prefix(root).unwrap_or(path).display()
}

fn member_names<'a>(indices: &[usize], names: impl Fn(usize) -> Option<&'a str>) -> String {
    indices
        .iter()
        .filter_map(|&i| names(i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints per-component dependency usage in plain text format.
pub fn print_plain(result: &AnalysisResult) {
    let by_path: HashMap<&Path, &ComponentInterface> = result
        .interfaces
        .iter()
        .map(|i| (i.full_path.as_path(), i))
        .collect();

    let parents: Vec<_> = result
        .components
        .iter()
        .filter(|c| !c.dependencies.is_empty())
        .collect();

    if parents.is_empty() {
        println!("No component dependencies found ({} files).", result.total_files);
        return;
    }

    for component in parents {
        println!(
            "{} ({})",
            component.name,
            display_path(&component.full_path, &result.root)
        );
        for dep in &component.dependencies {
            let Some(iface) = by_path.get(dep.full_path.as_path()) else {
                continue;
            };
            println!("  -> {}", iface.name);
            println!(
                "     props:  {}",
                member_names(&dep.used_props, |i| iface.props.get(i).map(|p| p.name.as_str()))
            );
            println!(
                "     events: {}",
                member_names(&dep.used_events, |i| iface.events.get(i).map(|e| e.name.as_str()))
            );
            println!(
                "     slots:  {}",
                member_names(&dep.used_slots, |i| iface.slots.get(i).map(|s| s.name.as_str()))
            );
        }
    }
}

/// Prints the full analysis in JSON format.
///
/// Falls back to an error object if serialization fails.
pub fn print_json(result: &AnalysisResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log_warn(&format!("JSON serialization failed: {}", e));
            println!("{{\"error\": \"serialization failed\"}}");
        }
    }
}

/// Prints unused channels in plain text format, grouped by component.
pub fn print_unused_plain(unused: &[UnusedChannel], root: &Path) {
    if unused.is_empty() {
        println!("No unused props, events or slots found.");
        return;
    }

    println!("UNUSED CHANNELS ({}):", unused.len());
    let mut current: Option<&Path> = None;
    for item in unused {
        if current != Some(item.full_path.as_path()) {
            println!("{} ({})", item.component, display_path(&item.full_path, root));
            current = Some(item.full_path.as_path());
        }
        match item.line {
            Some(line) => println!("  - {} {} (line {})", item.kind, item.name, line + 1),
            None => println!("  - {} {}", item.kind, item.name),
        }
    }
}

/// Prints unused channels in JSON format.
pub fn print_unused_json(unused: &[UnusedChannel]) {
    match serde_json::to_string_pretty(&json!({ "unused": unused })) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log_warn(&format!("JSON serialization failed: {}", e));
            println!("{{\"unused\": []}}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_names() {
        let names = ["label", "size", "variant"];
        let joined = member_names(&[2, 0, 9], |i| names.get(i).copied());
        assert_eq!(joined, "variant, label");
    }

    #[test]
    fn test_display_path_relative_to_root() {
        let shown = display_path(Path::new("/app/src/Btn.vue"), Path::new("/app")).to_string();
        assert_eq!(shown, "src/Btn.vue");

        let outside = display_path(Path::new("/other/Btn.vue"), Path::new("/app")).to_string();
        assert_eq!(outside, "/other/Btn.vue");
    }
}
