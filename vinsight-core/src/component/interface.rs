//! Interface extraction: the props, events and slots a component declares.
//!
//! Recognised declaration forms:
//!
//! | kind  | forms                                                                 |
//! |-------|-----------------------------------------------------------------------|
//! | props | `defineProps([...])`, `defineProps({...})`, `defineProps<{...}>()`,   |
//! |       | `defineProps<Props>()` with a local `interface`/`type`, `props:` option |
//! | events| `defineEmits([...])`, `defineEmits<{ (e: 'x'): void }>()`,            |
//! |       | `defineEmits<{ x: [] }>()`, `emits:` option, `emit('x')`/`$emit('x')` |
//! | slots | `<slot name="x">`, unnamed `<slot>` (`default`), `defineSlots<{...}>()` |
//!
//! Members keep their first-declaration order and are de-duplicated by name.
//! Dynamically named members (`<slot :name="n">`) are out of reach and skipped.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use crate::channels::{ComponentInterface, Event, Prop, Slot};
use crate::component::script::{scan_script, Located, ScriptFacts};
use crate::component::sfc::{SfcBlock, SfcBlocks};
use crate::error::{InsightError, InsightResult, IoResultExt};

/// Name assigned to an unnamed `<slot>`.
pub const DEFAULT_SLOT: &str = "default";

/// Template patterns, initialised once and shared across threads.
struct Patterns {
    emit_call: Regex,
    slot_tag: Regex,
    static_name: Regex,
    dynamic_name: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |p: &str| Regex::new(p).expect("Hardcoded regex pattern is valid");
        Patterns {
            emit_call: re(r#"(?:\$|\b)emit\s*\(\s*['"]([^'"]+)['"]"#),
            slot_tag: re(r"<slot(\s[^>]*)?/?>"),
            static_name: re(r#"(?:^|\s)name\s*=\s*['"]([^'"]+)['"]"#),
            dynamic_name: re(r"(?:^|\s)(?::|v-bind:)name\s*="),
        }
    })
}

/// Ordered, de-duplicated `(name, line)` collector.
#[derive(Default)]
struct MemberSet {
    seen: HashSet<String>,
    items: Vec<(String, usize)>,
}

impl MemberSet {
    fn push(&mut self, name: &str, line: usize) {
        if !name.is_empty() && self.seen.insert(name.to_string()) {
            self.items.push((name.to_string(), line));
        }
    }

    /// Push members found at absolute byte offsets, in source order.
    fn extend_at(&mut self, source: &str, mut found: Vec<Located>) {
        found.sort_by_key(|(_, offset)| *offset);
        for (name, offset) in found {
            self.push(&name, line_at(source, offset));
        }
    }

    fn into_members<T>(self, make: impl Fn(String, usize) -> T) -> Vec<T> {
        self.items.into_iter().map(|(n, l)| make(n, l)).collect()
    }
}

/// A script block's facts, with offsets made absolute in the file.
pub(crate) struct ScannedScript {
    pub facts: ScriptFacts,
    pub offset: usize,
}

impl ScannedScript {
    fn absolute(&self, found: &[Located]) -> Vec<Located> {
        found
            .iter()
            .map(|(name, at)| (name.clone(), self.offset + at))
            .collect()
    }
}

/// Parse every script block of `blocks`.
///
/// Fails when the file has no `<template>`/`<script>` block or a script
/// block does not parse.
pub(crate) fn scan_scripts(
    path: &Path,
    source: &str,
    blocks: &SfcBlocks<'_>,
) -> InsightResult<Vec<ScannedScript>> {
    if blocks.is_empty() {
        return Err(InsightError::not_a_component(path));
    }

    blocks
        .scripts
        .iter()
        .map(|script| {
            scan_script(script.content, script.lang)
                .map(|facts| ScannedScript {
                    facts,
                    offset: script.offset,
                })
                .map_err(|e| {
                    let at = script.offset + e.offset;
                    let line_start = source.get(..at).and_then(|s| s.rfind('\n')).map_or(0, |p| p + 1);
                    InsightError::script_syntax(path, e.message, line_at(source, at) + 1, at - line_start + 1)
                })
        })
        .collect()
}

/// Assemble the interface from parsed scripts and the template.
pub(crate) fn build_interface(
    path: &Path,
    source: &str,
    blocks: &SfcBlocks<'_>,
    scripts: &[ScannedScript],
) -> ComponentInterface {
    let name = scripts
        .iter()
        .find_map(|s| s.facts.component_name.clone())
        .unwrap_or_else(|| file_stem(path));

    let mut props = MemberSet::default();
    let mut events = MemberSet::default();
    let mut slots = MemberSet::default();

    props.extend_at(source, declared(scripts, |f| &f.props));
    events.extend_at(source, declared(scripts, |f| &f.events));
    slots.extend_at(source, declared(scripts, |f| &f.slots));

    // Declarations win over emit('x') calls for the line of an event.
    let mut emitted = declared(scripts, |f| &f.emitted);
    if let Some(template) = blocks.template {
        emitted.extend(template_emits(template));
    }
    events.extend_at(source, emitted);

    if let Some(template) = blocks.template {
        template_slots(source, template, &mut slots);
    }

    ComponentInterface {
        name,
        full_path: path.to_path_buf(),
        props: props.into_members(|n, l| Prop::new(n).at_line(l)),
        events: events.into_members(|n, l| Event::new(n).at_line(l)),
        slots: slots.into_members(|n, l| Slot::new(n).at_line(l)),
    }
}

fn declared(scripts: &[ScannedScript], pick: fn(&ScriptFacts) -> &Vec<Located>) -> Vec<Located> {
    scripts.iter().flat_map(|s| s.absolute(pick(&s.facts))).collect()
}

/// Extract the interface of the component in `source`, read from `path`.
///
/// Fails when the file has no `<template>`/`<script>` block or a script
/// block has a syntax error.
pub fn extract_interface(path: &Path, source: &str) -> InsightResult<ComponentInterface> {
    let blocks = SfcBlocks::parse(source);
    let scripts = scan_scripts(path, source, &blocks)?;
    let interface = build_interface(path, source, &blocks, &scripts);
    debug!(
        component = %interface.name,
        props = interface.props.len(),
        events = interface.events.len(),
        slots = interface.slots.len(),
        "extracted interface"
    );
    Ok(interface)
}

/// Read `path` and extract its interface.
pub fn parse_component_file(path: &Path) -> InsightResult<ComponentInterface> {
    let source = fs::read_to_string(path).with_path(path)?;
    extract_interface(path, &source)
}

/// Extract interfaces of many files in parallel.
///
/// A file that fails is logged and left out; the others are unaffected.
/// Output order follows `paths`.
pub fn parse_component_files(paths: &[PathBuf]) -> Vec<ComponentInterface> {
    paths
        .par_iter()
        .filter_map(|path| match parse_component_file(path) {
            Ok(interface) => Some(interface),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping component");
                None
            }
        })
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 0-based line of a byte offset.
fn line_at(source: &str, offset: usize) -> usize {
    let capped = offset.min(source.len());
    source.as_bytes()[..capped].iter().filter(|b| **b == b'\n').count()
}

/// `$emit('x')` / `emit('x')` in template expressions.
fn template_emits(template: SfcBlock<'_>) -> Vec<Located> {
    patterns()
        .emit_call
        .captures_iter(template.content)
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.as_str().to_string(), template.offset + m.start()))
        .collect()
}

fn template_slots(source: &str, template: SfcBlock<'_>, slots: &mut MemberSet) {
    let p = patterns();
    for caps in p.slot_tag.captures_iter(template.content) {
        let Some(tag) = caps.get(0) else { continue };
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let line = line_at(source, template.offset + tag.start());

        if let Some(name) = p.static_name.captures(attrs).and_then(|c| c.get(1)) {
            slots.push(name.as_str(), line);
        } else if !p.dynamic_name.is_match(attrs) {
            slots.push(DEFAULT_SLOT, line);
        }
    }
}
