//! Usage report for one dependency inside one parent template.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::channels::channel_types::DependencyDescriptor;
use crate::channels::channel_usage::{is_event_used, is_prop_used, is_slot_used, used_channels};
use crate::locate::find_dependency_instances;

/// Which members of a dependency a parent template exercises.
///
/// Each list holds indices into the dependency's corresponding member list.
/// Lists are sets: no duplicates, order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub full_path: PathBuf,
    pub used_props: Vec<usize>,
    pub used_events: Vec<usize>,
    pub used_slots: Vec<usize>,
}

impl UsageReport {
    /// True when the parent uses no member of the dependency at all.
    pub fn is_empty(&self) -> bool {
        self.used_props.is_empty() && self.used_events.is_empty() && self.used_slots.is_empty()
    }
}

/// Analyse how `template` uses `dependency`.
///
/// A dependency that never appears in the template yields an empty report.
pub fn dependency_usage(template: &str, dependency: &DependencyDescriptor<'_>) -> UsageReport {
    let instances = find_dependency_instances(template, dependency.name);

    UsageReport {
        full_path: dependency.full_path.to_path_buf(),
        used_props: used_channels(&instances, dependency.props, is_prop_used),
        used_events: used_channels(&instances, dependency.events, is_event_used),
        used_slots: used_channels(&instances, dependency.slots, is_slot_used),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::channel_types::{Event, Prop, Slot};
    use std::path::Path;

    fn btn<'a>(props: &'a [Prop], events: &'a [Event], slots: &'a [Slot]) -> DependencyDescriptor<'a> {
        DependencyDescriptor {
            name: "Btn",
            full_path: Path::new("Btn.vue"),
            props,
            events,
            slots,
        }
    }

    #[test]
    fn test_full_usage() {
        let props = [Prop::new("label")];
        let events = [Event::new("click")];
        let slots = [Slot::new("icon")];
        let report = dependency_usage(
            r#"<Btn label="Go" @click="go"><template v-slot:icon>★</template></Btn>"#,
            &btn(&props, &events, &slots),
        );

        assert_eq!(
            report,
            UsageReport {
                full_path: PathBuf::from("Btn.vue"),
                used_props: vec![0],
                used_events: vec![0],
                used_slots: vec![0],
            }
        );
    }

    #[test]
    fn test_bare_instance() {
        let props = [Prop::new("label")];
        let events = [Event::new("click")];
        let slots = [Slot::new("icon")];
        let report = dependency_usage("<Btn />", &btn(&props, &events, &slots));

        assert_eq!(report.full_path, PathBuf::from("Btn.vue"));
        assert!(report.is_empty());
    }

    #[test]
    fn test_absent_dependency() {
        let props = [Prop::new("label")];
        let report = dependency_usage("<div>nothing here</div>", &btn(&props, &[], &[]));
        assert!(report.is_empty());
    }

    #[test]
    fn test_usage_spread_over_instances() {
        let props = [Prop::new("label"), Prop::new("disabled"), Prop::new("size")];
        let events = [Event::new("click"), Event::new("focus")];
        let template = r#"
<div>
  <Btn label="One" @click="a" />
  <btn :disabled="busy" v-on:focus="b"></btn>
</div>"#;
        let mut report = dependency_usage(template, &btn(&props, &events, &[]));
        report.used_props.sort_unstable();
        report.used_events.sort_unstable();

        assert_eq!(report.used_props, vec![0, 1]);
        assert_eq!(report.used_events, vec![0, 1]);
        assert!(report.used_slots.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report = UsageReport {
            full_path: PathBuf::from("Btn.vue"),
            used_props: vec![0],
            used_events: vec![],
            used_slots: vec![1],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fullPath"], "Btn.vue");
        assert_eq!(json["usedProps"], serde_json::json!([0]));
        assert_eq!(json["usedSlots"], serde_json::json!([1]));
    }
}
