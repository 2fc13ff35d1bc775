//! vinsight CLI - which props, events and slots of your Vue components are
//! actually used.
//!
//! Features:
//! - Project root detection (nearest `package.json`)
//! - Per-parent report of the dependency channels each template exercises
//! - Unused prop/event/slot detection across the whole project
//! - Incremental caching for faster re-analysis
//! - Graphviz DOT visualization

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use vinsight_core::{
    build_graph, find_project_root, init_structured_logging, load_config, log_info, log_warn,
    parents_of, parse_component_file, print_json, print_plain, print_unused_json,
    print_unused_plain, visualize, AnalysisResult, Insight,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find unused props, events and slots in Vue components")]
pub struct Cli {
    /// Path inside the Vue project (the nearest package.json marks the root)
    #[arg(default_value = ".")]
    path: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Component names or path fragments to ignore
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Re-extract every component instead of using .vinsight/cache.json
    #[arg(long)]
    no_cache: bool,

    /// List props, events and slots that no parent uses
    #[arg(long)]
    unused: bool,

    /// Restrict the report to one component (by display name)
    #[arg(long, value_name = "NAME")]
    component: Option<String>,

    /// Print the extracted interface of the given .vue files and exit
    #[arg(long, value_name = "FILE", num_args = 1..)]
    interface: Vec<String>,

    /// Generate Graphviz DOT output for component dependencies
    #[arg(long)]
    dot: bool,

    /// Write DOT output to a specified file instead of stdout
    #[arg(long)]
    dot_file: Option<String>,
}

/// Security: Validates output file paths to prevent path traversal attacks.
///
/// Rejects:
/// - Absolute paths (must be relative to current directory)
/// - Paths containing `..` (parent directory traversal)
/// - Paths with null bytes
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    if p
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(anyhow!(
            "Path traversal (..) not allowed in output paths: {}",
            path
        ));
    }

    Ok(p)
}

/// Narrow a result down to a single component: its own dependency report and
/// its own unused channels.
fn restrict_to_component(result: &mut AnalysisResult, name: &str) -> Result<()> {
    if result.interface_named(name).is_none() {
        return Err(anyhow!("No component named '{}' in {}", name, result.root.display()));
    }
    result.components.retain(|c| c.name == name);
    result.unused_channels.retain(|u| u.component == name);
    Ok(())
}

/// Display names of the components that import `name`.
fn parent_names(result: &AnalysisResult, name: &str) -> Vec<String> {
    let Some(interface) = result.interface_named(name) else {
        return Vec::new();
    };
    let graph = build_graph(&result.components);
    parents_of(&graph, &interface.full_path)
        .into_iter()
        .filter_map(|p| result.interfaces.iter().find(|i| i.full_path == p))
        .map(|i| i.name.clone())
        .collect()
}

fn print_interfaces(files: &[String], json: bool) -> Result<()> {
    let mut interfaces = Vec::with_capacity(files.len());
    for file in files {
        let interface = parse_component_file(Path::new(file))
            .with_context(|| format!("Failed to extract interface of {}", file))?;
        interfaces.push(interface);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&interfaces)?);
        return Ok(());
    }

    for interface in &interfaces {
        println!("=== {} ({}) ===", interface.name, interface.full_path.display());
        let join = |names: Vec<&str>| if names.is_empty() { "-".to_string() } else { names.join(", ") };
        println!("props:  {}", join(interface.props.iter().map(|p| p.name.as_str()).collect()));
        println!("events: {}", join(interface.events.iter().map(|e| e.name.as_str()).collect()));
        println!("slots:  {}", join(interface.slots.iter().map(|s| s.name.as_str()).collect()));
    }
    Ok(())
}

fn write_dot(result: &AnalysisResult, dot_file: Option<&str>) {
    let dot = visualize::generate_dot(&result.interfaces, &result.components);
    let Some(file) = dot_file else {
        println!("{}", dot);
        return;
    };

    match validate_output_path(file) {
        Ok(safe_path) => {
            if let Err(e) = fs::write(&safe_path, &dot) {
                log_warn(&format!("DOT write failed to {}: {}", safe_path.display(), e));
            }
        }
        Err(e) => {
            eprintln!("[ERROR] Invalid output path: {}", e);
            std::process::exit(2);
        }
    }
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] vinsight internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    // Structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    // 1. Interface inspection mode
    if !cli.interface.is_empty() {
        print_interfaces(&cli.interface, cli.json)?;
        return Ok(());
    }

    // 2. Locate the project
    let input_path = Path::new(&cli.path);
    if !input_path.exists() {
        return Err(anyhow!("Path does not exist: {}", cli.path));
    }
    let root = find_project_root(input_path).unwrap_or_else(|| input_path.to_path_buf());

    // 3. Configuration
    let config = load_config(&root)?.unwrap_or_default();
    let json = cli.json || config.wants_json();

    // 4. Analyze
    let mut result = Insight::new(&root)
        .with_cache(!cli.no_cache)
        .with_config(&config)
        .ignore_patterns(cli.ignore.iter().cloned())
        .analyze()
        .with_context(|| format!("Failed to analyze {}", root.display()))?;

    log_info(&format!(
        "analyzed {} files, {} unused channels ({:.1}%)",
        result.total_files,
        result.unused_channels.len(),
        result.unused_percentage()
    ));

    let mut used_by = None;
    if let Some(ref name) = cli.component {
        used_by = Some(parent_names(&result, name));
        restrict_to_component(&mut result, name)?;
    }

    // 5. Report
    if cli.unused {
        if json {
            print_unused_json(&result.unused_channels);
        } else {
            print_unused_plain(&result.unused_channels, &result.root);
        }
    } else if json {
        print_json(&result);
    } else {
        println!("=== Component Channel Usage ===\n");
        print_plain(&result);
        if let (Some(name), Some(parents)) = (&cli.component, &used_by) {
            if parents.is_empty() {
                println!("\n{} is not imported by any component", name);
            } else {
                println!("\n{} is used by: {}", name, parents.join(", "));
            }
        }
    }

    // 6. DOT/Graphviz output
    if cli.dot || cli.dot_file.is_some() {
        write_dot(&result, cli.dot_file.as_deref());
    }

    // 7. Exit code (CI-friendly): only --unused fails the run
    std::process::exit(if cli.unused && result.has_unused() { 1 } else { 0 });
}
