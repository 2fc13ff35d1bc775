//! Reading `.vue` single-file components.
//!
//! - [`sfc`]: split a file into `<template>` and `<script>` blocks
//! - [`interface`]: the props, events and slots a component declares
//! - [`script`]: one oxc pass over each `<script>` block
//! - [`imports`]: which child components a file imports, and from where

pub mod imports;
pub mod interface;
pub mod script;
pub mod sfc;

use std::path::Path;

use crate::channels::ComponentInterface;
use crate::error::InsightResult;
use interface::{build_interface, scan_scripts};

pub use imports::{extract_imports, normalize_path, resolve_import, ImportedComponent};
pub use interface::{extract_interface, parse_component_file, parse_component_files, DEFAULT_SLOT};
pub use script::{scan_script, ScriptFacts, ScriptSyntaxError};
pub use sfc::{SfcBlock, SfcBlocks};

/// Everything project analysis needs from one component file.
#[derive(Debug, Clone)]
pub struct ComponentFile {
    pub interface: ComponentInterface,
    pub imports: Vec<ImportedComponent>,
    /// Raw content of the `<template>` block (empty when absent).
    pub template: String,
}

impl ComponentFile {
    pub fn path(&self) -> &Path {
        &self.interface.full_path
    }

    pub fn name(&self) -> &str {
        &self.interface.name
    }
}

/// Build a [`ComponentFile`] from already-read file content.
///
/// Each script block is parsed once; interface and imports share the result.
pub fn load_component(path: &Path, source: &str) -> InsightResult<ComponentFile> {
    let blocks = SfcBlocks::parse(source);
    let scripts = scan_scripts(path, source, &blocks)?;
    let interface = build_interface(path, source, &blocks, &scripts);
    let imports = scripts
        .into_iter()
        .flat_map(|s| s.facts.imports)
        .collect();
    Ok(ComponentFile {
        interface,
        imports,
        template: blocks.template_str().to_string(),
    })
}
