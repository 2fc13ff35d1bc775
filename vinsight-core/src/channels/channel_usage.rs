//! Per-instance usage predicates and the channel aggregator.
//!
//! Each predicate checks a short fixed list of surface spellings:
//! - props: `name`, `:name`, `:kebab-name`, `kebab-name` (attribute)
//! - events: `@name`, `v-on:name` (attribute)
//! - slots: `#name`, `v-slot:name` (substring of the inner markup)
//!
//! Slots are matched on inner markup because a slot is filled by a nested
//! `<template #name>`, not by an attribute of the instance itself.

use crate::casing::kebabize;
use crate::channels::channel_types::{Event, Prop, Slot};
use crate::locate::MarkupInstance;

/// Prefix marking a bound (dynamic) attribute.
pub const BIND_SIGIL: &str = ":";
/// Short event-listener prefix.
pub const LISTENER_SIGIL: &str = "@";
/// Verbose event-listener directive.
pub const LISTENER_DIRECTIVE: &str = "v-on:";
/// Short slot prefix.
pub const SLOT_SIGIL: &str = "#";
/// Verbose slot directive.
pub const SLOT_DIRECTIVE: &str = "v-slot:";

/// Attribute spellings that pass `prop` to a component, in lookup order.
pub fn prop_spellings(prop: &Prop) -> [String; 4] {
    let kebab = kebabize(&prop.name);
    [
        prop.name.clone(),
        format!("{BIND_SIGIL}{}", prop.name),
        format!("{BIND_SIGIL}{kebab}"),
        kebab,
    ]
}

/// Attribute spellings that listen to `event`.
pub fn event_spellings(event: &Event) -> [String; 2] {
    [
        format!("{LISTENER_SIGIL}{}", event.name),
        format!("{LISTENER_DIRECTIVE}{}", event.name),
    ]
}

/// Markup fragments that fill `slot`.
pub fn slot_spellings(slot: &Slot) -> [String; 2] {
    [
        format!("{SLOT_SIGIL}{}", slot.name),
        format!("{SLOT_DIRECTIVE}{}", slot.name),
    ]
}

/// Whether `instance` passes `prop`.
pub fn is_prop_used(instance: &MarkupInstance, prop: &Prop) -> bool {
    prop_spellings(prop)
        .iter()
        .any(|attr| instance.has_attribute(attr))
}

/// Whether `instance` listens to `event`.
pub fn is_event_used(instance: &MarkupInstance, event: &Event) -> bool {
    event_spellings(event)
        .iter()
        .any(|attr| instance.has_attribute(attr))
}

/// Whether `instance` fills `slot`.
pub fn is_slot_used(instance: &MarkupInstance, slot: &Slot) -> bool {
    slot_spellings(slot)
        .iter()
        .any(|fragment| instance.inner_markup_contains(fragment))
}

/// Indices of `channels` used by at least one of `instances`.
///
/// Indices appear in order of first match and never repeat; the result is a
/// set in all but representation.
pub fn used_channels<C>(
    instances: &[MarkupInstance],
    channels: &[C],
    is_used: impl Fn(&MarkupInstance, &C) -> bool,
) -> Vec<usize> {
    channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| instances.iter().any(|instance| is_used(instance, *channel)))
        .map(|(index, _)| index)
        .collect()
}
