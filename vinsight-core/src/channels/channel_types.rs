//! Interface members ("channels") of a Vue component.
//!
//! A component talks to its parent through three channel kinds: props
//! flow in, events flow out, slots receive markup. A member's identity in
//! reports is its index in the declaring component's list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Common view over the three channel kinds.
pub trait Channel {
    /// Member name as declared by the component.
    fn name(&self) -> &str;

    /// 0-based line of the declaration in the component file, if known.
    fn line(&self) -> Option<usize>;

    /// Human-readable kind, used in reports and diagnostics.
    fn kind() -> ChannelKind
    where
        Self: Sized;
}

/// The three kinds of interface member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Prop,
    Event,
    Slot,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prop => "prop",
            Self::Event => "event",
            Self::Slot => "slot",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configurable input accepted from the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prop {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// An event the component emits for its parent to listen to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// A named content insertion point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Prop {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), line: None }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), line: None }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl Slot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), line: None }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl Channel for Prop {
    fn name(&self) -> &str {
        &self.name
    }
    fn line(&self) -> Option<usize> {
        self.line
    }
    fn kind() -> ChannelKind {
        ChannelKind::Prop
    }
}

impl Channel for Event {
    fn name(&self) -> &str {
        &self.name
    }
    fn line(&self) -> Option<usize> {
        self.line
    }
    fn kind() -> ChannelKind {
        ChannelKind::Event
    }
}

impl Channel for Slot {
    fn name(&self) -> &str {
        &self.name
    }
    fn line(&self) -> Option<usize> {
        self.line
    }
    fn kind() -> ChannelKind {
        ChannelKind::Slot
    }
}

/// Interface description of one component file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInterface {
    /// Display name: the `name` option, or the file stem.
    pub name: String,
    pub full_path: PathBuf,
    pub props: Vec<Prop>,
    pub events: Vec<Event>,
    pub slots: Vec<Slot>,
}

impl ComponentInterface {
    /// Borrow this interface as a dependency instantiated under `tag`.
    pub fn as_dependency<'a>(&'a self, tag: &'a str) -> DependencyDescriptor<'a> {
        DependencyDescriptor {
            name: tag,
            full_path: &self.full_path,
            props: &self.props,
            events: &self.events,
            slots: &self.slots,
        }
    }

    /// Total number of declared members across all kinds.
    pub fn channel_count(&self) -> usize {
        self.props.len() + self.events.len() + self.slots.len()
    }
}

/// A resolved dependency as seen from one parent.
///
/// `name` is the tag the parent instantiates it with, which can differ from
/// the component's own display name when the parent renames the import.
#[derive(Debug, Clone, Copy)]
pub struct DependencyDescriptor<'a> {
    pub name: &'a str,
    pub full_path: &'a Path,
    pub props: &'a [Prop],
    pub events: &'a [Event],
    pub slots: &'a [Slot],
}
