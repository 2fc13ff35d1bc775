//! Project-wide channel usage analysis.
//!
//! Every component is analysed as a parent: its `.vue` imports are resolved
//! to known components, and each resolved dependency's usage is measured
//! against the parent's template. Parents are processed in parallel.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channels::{dependency_usage, Channel, ChannelKind, ComponentInterface, UsageReport};
use crate::component::{normalize_path, resolve_import, ComponentFile};

/// Dependencies of one parent component and the channels it uses on each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAnalysis {
    pub full_path: PathBuf,
    pub name: String,
    pub dependencies: Vec<UsageReport>,
}

/// A declared member that no parent in the project uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedChannel {
    pub component: String,
    pub full_path: PathBuf,
    pub kind: ChannelKind,
    pub name: String,
    /// Position in the component's list for this kind.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Known components keyed by their normalised path.
type ComponentIndex<'a> = HashMap<PathBuf, &'a ComponentInterface>;

fn index_components(components: &[ComponentFile]) -> ComponentIndex<'_> {
    components
        .iter()
        .map(|c| (normalize_path(c.path()), &c.interface))
        .collect()
}

fn analyze_with_index(
    parent: &ComponentFile,
    known: &ComponentIndex<'_>,
    root: &Path,
    aliases: &BTreeMap<String, String>,
) -> ComponentAnalysis {
    let own_path = normalize_path(parent.path());
    let mut dependencies = Vec::with_capacity(parent.imports.len());

    for import in &parent.imports {
        let Some(resolved) = resolve_import(parent.path(), &import.specifier, root, aliases) else {
            debug!(parent = %parent.path().display(), specifier = %import.specifier, "unresolved import");
            continue;
        };
        if resolved == own_path {
            continue;
        }
        let Some(interface) = known.get(&resolved) else {
            debug!(parent = %parent.path().display(), path = %resolved.display(), "import outside analysed files");
            continue;
        };

        let dependency = interface.as_dependency(&import.local_name);
        dependencies.push(dependency_usage(&parent.template, &dependency));
    }

    ComponentAnalysis {
        full_path: parent.path().to_path_buf(),
        name: parent.name().to_string(),
        dependencies,
    }
}

/// Analyse a single parent against the given set of components.
pub fn analyze_component(
    parent: &ComponentFile,
    components: &[ComponentFile],
    root: &Path,
    aliases: &BTreeMap<String, String>,
) -> ComponentAnalysis {
    analyze_with_index(parent, &index_components(components), root, aliases)
}

/// Analyse every component as a parent. Output order follows `components`.
pub fn analyze_project(
    root: &Path,
    components: &[ComponentFile],
    aliases: &BTreeMap<String, String>,
) -> Vec<ComponentAnalysis> {
    let known = index_components(components);

    components
        .par_iter()
        .map(|parent| analyze_with_index(parent, &known, root, aliases))
        .collect()
}

#[derive(Default)]
struct UsedSets {
    props: BTreeSet<usize>,
    events: BTreeSet<usize>,
    slots: BTreeSet<usize>,
}

fn push_unused<C: Channel>(
    interface: &ComponentInterface,
    members: &[C],
    used: &BTreeSet<usize>,
    out: &mut Vec<UnusedChannel>,
) {
    for (index, member) in members.iter().enumerate() {
        if used.contains(&index) {
            continue;
        }
        out.push(UnusedChannel {
            component: interface.name.clone(),
            full_path: interface.full_path.clone(),
            kind: C::kind(),
            name: member.name().to_string(),
            index,
            line: member.line(),
        });
    }
}

/// Members no parent uses, for every component that has at least one parent.
///
/// Usage is the union over all parents. Components nobody imports are left
/// out: with no call site there is nothing to judge them by.
pub fn find_unused_channels(
    interfaces: &[ComponentInterface],
    analyses: &[ComponentAnalysis],
) -> Vec<UnusedChannel> {
    let mut used: HashMap<&Path, UsedSets> = HashMap::new();
    for report in analyses.iter().flat_map(|a| &a.dependencies) {
        let sets = used.entry(report.full_path.as_path()).or_default();
        sets.props.extend(&report.used_props);
        sets.events.extend(&report.used_events);
        sets.slots.extend(&report.used_slots);
    }

    let mut unused = Vec::new();
    for interface in interfaces {
        let Some(sets) = used.get(interface.full_path.as_path()) else {
            continue;
        };
        push_unused(interface, &interface.props, &sets.props, &mut unused);
        push_unused(interface, &interface.events, &sets.events, &mut unused);
        push_unused(interface, &interface.slots, &sets.slots, &mut unused);
    }
    unused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::load_component;

    fn component(path: &str, source: &str) -> ComponentFile {
        load_component(Path::new(path), source).unwrap()
    }

    fn fixture() -> Vec<ComponentFile> {
        vec![
            component(
                "/app/src/App.vue",
                r#"<template>
  <BaseButton label="Go" @click="go">Go</BaseButton>
  <Card><template #footer>f</template></Card>
</template>
<script setup>
import BaseButton from './components/BaseButton.vue'
import Card from '@/components/Card.vue'
import Missing from './components/Missing.vue'
</script>"#,
            ),
            component(
                "/app/src/components/BaseButton.vue",
                r#"<template><button @click="$emit('click')"><slot /></button></template>
<script setup>
defineProps(['label', 'size'])
</script>"#,
            ),
            component(
                "/app/src/components/Card.vue",
                r#"<template><div><slot name="header" /><slot name="footer" /></div></template>
<script setup>
import Card from './Card.vue'
defineProps({ title: String })
</script>"#,
            ),
        ]
    }

    fn aliases() -> BTreeMap<String, String> {
        BTreeMap::from([("@".to_string(), "src".to_string())])
    }

    #[test]
    fn test_analyze_project() {
        let components = fixture();
        let analyses = analyze_project(Path::new("/app"), &components, &aliases());

        assert_eq!(analyses.len(), 3);
        let app = &analyses[0];
        assert_eq!(app.name, "App");
        // Missing.vue is not a known component.
        assert_eq!(app.dependencies.len(), 2);

        let button = &app.dependencies[0];
        assert_eq!(button.full_path, PathBuf::from("/app/src/components/BaseButton.vue"));
        assert_eq!(button.used_props, vec![0]);
        assert_eq!(button.used_events, vec![0]);
        assert!(button.used_slots.is_empty());

        let card = &app.dependencies[1];
        assert!(card.used_props.is_empty());
        assert_eq!(card.used_slots, vec![1]);
    }

    #[test]
    fn test_self_import_skipped() {
        let components = fixture();
        let card = analyze_component(&components[2], &components, Path::new("/app"), &aliases());
        assert!(card.dependencies.is_empty());
    }

    #[test]
    fn test_find_unused_channels() {
        let components = fixture();
        let analyses = analyze_project(Path::new("/app"), &components, &aliases());
        let interfaces: Vec<_> = components.iter().map(|c| c.interface.clone()).collect();

        let unused = find_unused_channels(&interfaces, &analyses);
        let described: Vec<_> = unused
            .iter()
            .map(|u| format!("{}.{}:{}", u.component, u.kind, u.name))
            .collect();

        assert_eq!(
            described,
            vec![
                "BaseButton.prop:size",
                "BaseButton.slot:default",
                "Card.prop:title",
                "Card.slot:header",
            ]
        );
        // App has no parent and is never judged.
        assert!(unused.iter().all(|u| u.component != "App"));
    }

    #[test]
    fn test_usage_unions_across_parents() {
        let mut components = fixture();
        components.push(component(
            "/app/src/Other.vue",
            r#"<template>
  <base-button size="sm"><template #default>Hi</template></base-button>
</template>
<script setup>
import BaseButton from './components/BaseButton.vue'
</script>"#,
        ));
        let analyses = analyze_project(Path::new("/app"), &components, &aliases());
        let interfaces: Vec<_> = components.iter().map(|c| c.interface.clone()).collect();

        let unused = find_unused_channels(&interfaces, &analyses);
        assert!(!unused.iter().any(|u| u.component == "BaseButton"));
    }
}
