//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use vinsight_core::prelude::*;
//! ```

// Core usage detection
pub use crate::channels::{
    dependency_usage, ChannelKind, ComponentInterface, DependencyDescriptor, Event, Prop, Slot,
    UsageReport,
};
pub use crate::error::{InsightError, InsightResult};

// Component files
pub use crate::component::{load_component, parse_component_file, ComponentFile};

// Project analysis
pub use crate::project::{analyze_project, find_unused_channels, ComponentAnalysis, UnusedChannel};

// File scanning
pub use crate::scan::{find_project_root, gather_vue_files, gather_vue_files_with_excludes};

// Caching
pub use crate::cache::{incremental_parse, load_cache, save_cache, InsightCache};

// Configuration
pub use crate::config::{load_config, InsightConfig};

// Builder API
pub use crate::builder::{AnalysisResult, Insight};
