//! Builder pattern API for project analysis.
//!
//! ```rust,ignore
//! use vinsight_core::prelude::*;
//!
//! let result = Insight::new("/path/to/app")
//!     .with_cache(true)
//!     .with_aliases([("@", "src")])
//!     .analyze()?;
//!
//! for unused in &result.unused_channels {
//!     println!("{} {} {}", unused.component, unused.kind, unused.name);
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cache;
use crate::channels::ComponentInterface;
use crate::config::InsightConfig;
use crate::graph::{build_graph, find_orphans};
use crate::project::{analyze_project, find_unused_channels, ComponentAnalysis, UnusedChannel};
use crate::scan::gather_vue_files_with_excludes;

/// Builder for configuring a project analysis.
#[derive(Debug, Clone)]
pub struct Insight {
    /// Project root (import aliases resolve against it)
    root: PathBuf,

    /// Whether to use the incremental interface cache
    use_cache: bool,

    /// Extra directory names pruned during the scan
    excluded_dirs: Vec<String>,

    /// Component names or path fragments hidden from the results
    ignored_patterns: Vec<String>,

    /// Import specifier prefix -> directory relative to `root`
    aliases: BTreeMap<String, String>,
}

impl Insight {
    /// Create a new analysis builder for the given project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            use_cache: true,
            excluded_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Apply the settings of a `vinsight.toml`.
    pub fn with_config(self, config: &InsightConfig) -> Self {
        let ignore = config.ignore.clone().unwrap_or_default();
        let exclude = config.exclude_dirs.clone().unwrap_or_default();
        let aliases = config.aliases.clone().unwrap_or_default();

        self.ignore_patterns(ignore)
            .exclude_dirs(exclude)
            .with_aliases(aliases)
    }

    /// Enable or disable incremental caching.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Add directories to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add patterns for components to ignore.
    ///
    /// Ignored components still count as parents of other components; they
    /// are only left out of the reported results.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add import aliases, e.g. `("@", "src")`.
    pub fn with_aliases(
        mut self,
        aliases: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Run the analysis and return results.
    pub fn analyze(&self) -> Result<AnalysisResult> {
        // 1. Gather files
        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let files = gather_vue_files_with_excludes(&self.root, &excludes)
            .context("Failed to gather .vue files")?;

        // 2. Extract interfaces (incremental if the cache is enabled)
        let components = if self.use_cache {
            let cached = cache::load_cache(&self.root);
            cache::incremental_parse(&self.root, &files, cached)
        } else {
            cache::load_components(&files)
        };

        // 3. Measure channel usage per parent
        let analyses = analyze_project(&self.root, &components, &self.aliases);
        let interfaces: Vec<ComponentInterface> =
            components.into_iter().map(|c| c.interface).collect();

        // 4. Unused channels and orphans
        let unused_channels: Vec<UnusedChannel> = find_unused_channels(&interfaces, &analyses)
            .into_iter()
            .filter(|u| !self.is_ignored(&u.component, &u.full_path))
            .collect();

        let graph = build_graph(&analyses);
        let all_orphans = find_orphans(&graph);
        // Orphans are never judged, whether or not the report hides them.
        let judged_channels = interfaces
            .iter()
            .filter(|i| !all_orphans.contains(&i.full_path.as_path()))
            .filter(|i| !self.is_ignored(&i.name, &i.full_path))
            .map(ComponentInterface::channel_count)
            .sum();
        let orphans: Vec<PathBuf> = all_orphans
            .into_iter()
            .filter(|p| !self.is_ignored_path(p, &analyses))
            .map(Path::to_path_buf)
            .collect();

        let components: Vec<ComponentAnalysis> = analyses
            .into_iter()
            .filter(|a| !self.is_ignored(&a.name, &a.full_path))
            .collect();

        info!(
            files = files.len(),
            components = components.len(),
            unused = unused_channels.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            root: self.root.clone(),
            total_files: files.len(),
            interfaces,
            components,
            unused_channels,
            orphans,
            judged_channels,
        })
    }

    /// Check if a component matches any ignored pattern.
    ///
    /// `Name*` matches by prefix, `*Name` by suffix, anything else by exact
    /// name or as a fragment of the path.
    fn is_ignored(&self, name: &str, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignored_patterns.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern || path.contains(pattern.as_str())
            }
        })
    }

    fn is_ignored_path(&self, path: &Path, analyses: &[ComponentAnalysis]) -> bool {
        analyses
            .iter()
            .find(|a| a.full_path == path)
            .is_some_and(|a| self.is_ignored(&a.name, path))
    }
}

/// Result of running a project analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Root path that was analyzed
    pub root: PathBuf,

    /// Number of `.vue` files found
    pub total_files: usize,

    /// Every successfully extracted interface
    pub interfaces: Vec<ComponentInterface>,

    /// Per-parent usage of its dependencies
    pub components: Vec<ComponentAnalysis>,

    /// Declared members no parent uses
    pub unused_channels: Vec<UnusedChannel>,

    /// Components no other component imports
    pub orphans: Vec<PathBuf>,

    /// Declared members of non-orphan, non-ignored components
    pub judged_channels: usize,
}

impl AnalysisResult {
    /// Check if any unused channel was found.
    pub fn has_unused(&self) -> bool {
        !self.unused_channels.is_empty()
    }

    /// Interface of the component with the given display name.
    pub fn interface_named(&self, name: &str) -> Option<&ComponentInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Percentage of declared members that no parent uses, over components
    /// that have at least one parent.
    pub fn unused_percentage(&self) -> f64 {
        if self.judged_channels == 0 {
            0.0
        } else {
            (self.unused_channels.len() as f64 / self.judged_channels as f64) * 100.0
        }
    }
}
