//! Locating component instances inside template markup.
//!
//! The markup is parsed as an HTML fragment with `scraper` (html5ever).
//! Every element whose tag matches the component's registered name, or its
//! kebab-case spelling, becomes an owned [`MarkupInstance`] snapshot.

use std::collections::HashMap;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::casing::kebabize;

/// Tag name substituted for `template` before parsing.
///
/// An HTML parser moves `<template>` children into a detached content
/// fragment, which would hide slot markup and nested instances.
pub const TEMPLATE_PLACEHOLDER: &str = "temp-tag";

/// One element of the markup that instantiates a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupInstance {
    /// Tag name as normalised by the parser (lowercase).
    pub tag: String,
    /// Attribute name → value. Names are lowercase.
    pub attributes: HashMap<String, String>,
    /// Serialised children of the element.
    pub inner_markup: String,
}

impl MarkupInstance {
    /// Create an instance with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute. The name is lowercased like the HTML parser does.
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the serialised inner markup.
    pub fn with_inner_markup(mut self, markup: impl Into<String>) -> Self {
        self.inner_markup = markup.into();
        self
    }

    /// Attribute presence by name. HTML attribute names are ASCII
    /// case-insensitive, so the lookup is too.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_ascii_lowercase())
    }

    /// Substring test against the inner markup. The parser lowercases
    /// attribute names when serialising, so only `needle` is folded; text
    /// content keeps its case.
    pub fn inner_markup_contains(&self, needle: &str) -> bool {
        self.inner_markup.contains(&needle.to_ascii_lowercase())
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            tag: value.name().to_string(),
            attributes: value
                .attrs()
                .map(|(name, val)| (name.to_string(), val.to_string()))
                .collect(),
            inner_markup: element.inner_html(),
        }
    }
}

/// Replace every literal `template` with [`TEMPLATE_PLACEHOLDER`].
pub fn neutralize_template_tags(markup: &str) -> String {
    markup.replace("template", TEMPLATE_PLACEHOLDER)
}

/// Find every element in `markup` that instantiates the component `name`.
///
/// Runs one query for `name` and one for its kebab-case form and
/// concatenates the results in that order. When both spellings coincide
/// (`Btn` / `btn`) an element is returned twice; consumers only track
/// member indices, so duplicates are harmless.
///
/// Never fails: html5ever recovers from malformed markup.
pub fn find_dependency_instances(markup: &str, name: &str) -> Vec<MarkupInstance> {
    let fragment = Html::parse_fragment(&neutralize_template_tags(markup));
    if !fragment.errors.is_empty() {
        debug!(
            component = %name,
            errors = fragment.errors.len(),
            "markup parsed with recovered errors"
        );
    }

    let mut instances = elements_by_tag(&fragment, name);
    instances.extend(elements_by_tag(&fragment, &kebabize(name)));
    instances
}

/// Document-order elements whose tag equals `tag`, ignoring ASCII case.
fn elements_by_tag(fragment: &Html, tag: &str) -> Vec<MarkupInstance> {
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
        .map(MarkupInstance::from_element)
        .collect()
}
