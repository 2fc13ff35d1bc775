//! vinsight-core: interface usage analysis for Vue single-file components
//!
//! For every component a parent imports, find which of the child's props,
//! events and slots the parent's template actually exercises, and from that
//! which declared members no parent in the project uses.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vinsight_core::prelude::*;
//!
//! let result = Insight::new("/path/to/app")
//!     .with_cache(true)
//!     .analyze()?;
//!
//! for unused in &result.unused_channels {
//!     println!("{}: unused {} '{}'", unused.component, unused.kind, unused.name);
//! }
//! ```
//!
//! For a single dependency without touching the file system, see
//! [`channels::dependency_usage`].
//!
//! # Module Organization
//!
//! - [`casing`]: camelCase to kebab-case normalisation
//! - [`locate`]: find dependency instances in template markup
//! - [`channels`]: member-usage predicates and the usage report
//! - [`component`]: `.vue` splitting, interface extraction, imports
//! - [`scan`]: parallel file discovery
//! - [`cache`]: incremental interface cache with SHA-256 change detection
//! - [`project`]: project-wide usage and unused-member detection
//! - [`graph`]: component dependency graph
//! - [`builder`]: fluent builder API
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `dot` (default): Graphviz DOT output of the component graph

// Core modules (always available)
pub mod builder;
pub mod cache;
pub mod casing;
pub mod channels;
pub mod component;
pub mod config;
pub mod error;
pub mod graph;
pub mod locate;
pub mod logging;
pub mod prelude;
pub mod project;
pub mod report;
pub mod scan;

// Feature-gated modules
#[cfg(feature = "dot")]
pub mod visualize;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{InsightError, InsightResult, IoResultExt};

// Builder API
pub use builder::{AnalysisResult, Insight};

// Cache types
pub use cache::{
    file_hash, incremental_parse, load_cache, load_components, save_cache, CacheMetadata,
    CachedComponent, InsightCache,
};

// Configuration
pub use config::{load_config, InsightConfig, OutputConfig};

// Usage detection
pub use casing::kebabize;
pub use channels::{
    dependency_usage, Channel, ChannelKind, ComponentInterface, DependencyDescriptor, Event, Prop,
    Slot, UsageReport,
};
pub use locate::{find_dependency_instances, MarkupInstance};

// Component files
pub use component::{
    extract_imports, extract_interface, load_component, parse_component_file,
    parse_component_files, resolve_import, ComponentFile, ImportedComponent, SfcBlocks,
};

// Graph building
pub use graph::{build_graph, find_orphans, parents_of};

// Logging
pub use logging::{init_structured_logging, log_info, log_warn};

// Project analysis
pub use project::{
    analyze_component, analyze_project, find_unused_channels, ComponentAnalysis, UnusedChannel,
};

// Reporting
pub use report::{print_json, print_plain, print_unused_json, print_unused_plain};

// File scanning
pub use scan::{find_project_root, gather_vue_files, gather_vue_files_with_excludes};

#[cfg(feature = "dot")]
pub use visualize::generate_dot;
