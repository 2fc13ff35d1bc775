//! Channel usage analysis: which props, events and slots of a dependency a
//! parent template actually exercises.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │     locate.rs       │     │  channel_types.rs   │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  Find dependency    │     │  Prop / Event /     │
//! │  instances in markup│     │  Slot declarations  │
//! └──────────┬──────────┘     └──────────┬──────────┘
//!            │                           │
//!            └───────────┬───────────────┘
//!                        ▼
//!            ┌─────────────────────┐
//!            │  channel_usage.rs   │
//!            │  ─────────────────  │
//!            │  Predicates + any-  │
//!            │  instance aggregator│
//!            └──────────┬──────────┘
//!                       ▼
//!            ┌─────────────────────┐
//!            │  channel_report.rs  │
//!            │  ─────────────────  │
//!            │  UsageReport per    │
//!            │  (parent, dep) pair │
//!            └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use vinsight_core::channels::{dependency_usage, DependencyDescriptor, Event, Prop, Slot};
//!
//! let props = [Prop::new("label")];
//! let events = [Event::new("click")];
//! let slots = [Slot::new("icon")];
//! let btn = DependencyDescriptor {
//!     name: "Btn",
//!     full_path: Path::new("Btn.vue"),
//!     props: &props,
//!     events: &events,
//!     slots: &slots,
//! };
//!
//! let report = dependency_usage(r#"<Btn label="Go" />"#, &btn);
//! assert_eq!(report.used_props, vec![0]);
//! assert!(report.used_events.is_empty());
//! ```

pub mod channel_report;
pub mod channel_types;
pub mod channel_usage;

// Re-exports for convenience
pub use channel_report::{dependency_usage, UsageReport};
pub use channel_types::{
    Channel, ChannelKind, ComponentInterface, DependencyDescriptor, Event, Prop, Slot,
};
pub use channel_usage::{
    event_spellings, is_event_used, is_prop_used, is_slot_used, prop_spellings, slot_spellings,
    used_channels,
};
