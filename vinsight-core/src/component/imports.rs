//! Child component imports of a single-file component.
//!
//! A parent reaches a child through `import Child from './Child.vue'`; the
//! local binding is the tag the parent's template instantiates it with.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::script::scan_script;

/// A default import of a `.vue` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedComponent {
    /// Local binding, e.g. `BaseButton`.
    pub local_name: String,
    /// Module specifier as written, e.g. `@/components/BaseButton.vue`.
    pub specifier: String,
}

/// Default `.vue` imports in `script`, in source order.
///
/// A script that does not parse yields no imports.
pub fn extract_imports(script: &str) -> Vec<ImportedComponent> {
    match scan_script(script, Some("ts")) {
        Ok(facts) => facts.imports,
        Err(e) => {
            debug!(error = %e.message, "script does not parse, no imports");
            Vec::new()
        }
    }
}

/// Resolve an import specifier to a file path.
///
/// Relative specifiers resolve against the importing file's directory.
/// Aliased specifiers (`@/x.vue` with `"@" = "src"`) resolve against
/// `root`; the longest matching alias wins. Bare package specifiers return
/// `None`.
pub fn resolve_import(
    importer: &Path,
    specifier: &str,
    root: &Path,
    aliases: &BTreeMap<String, String>,
) -> Option<PathBuf> {
    if specifier.starts_with("./") || specifier.starts_with("../") {
        let base = importer.parent()?;
        return Some(normalize_path(&base.join(specifier)));
    }

    let (alias, target) = aliases
        .iter()
        .filter(|(alias, _)| {
            specifier
                .strip_prefix(alias.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|(alias, _)| alias.len())?;

    let rest = specifier[alias.len()..].trim_start_matches('/');
    Some(normalize_path(&root.join(target).join(rest)))
}

/// Lexically resolve `.` and `..` components.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("@".to_string(), "src".to_string()),
            ("@ui".to_string(), "packages/ui/src".to_string()),
        ])
    }

    #[test]
    fn test_extract_imports() {
        let script = r#"
import { ref } from 'vue'
import BaseButton from './BaseButton.vue'
import AppCard, { cardProps } from "@/components/AppCard.vue"
  import Icon from '../Icon.vue';
import helpers from './helpers'
import type Shape from './Shape.vue'
"#;
        let imports = extract_imports(script);
        let names: Vec<_> = imports.iter().map(|i| i.local_name.as_str()).collect();
        assert_eq!(names, vec!["BaseButton", "AppCard", "Icon"]);
        assert_eq!(imports[1].specifier, "@/components/AppCard.vue");
    }

    #[test]
    fn test_commented_out_import_is_not_a_dependency() {
        assert!(extract_imports("/*\nimport Old from './Old.vue'\n*/\n").is_empty());
        assert!(extract_imports("// import Old from './Old.vue'\n").is_empty());
        assert!(extract_imports("const s = `import Old from './Old.vue'`\n").is_empty());
    }

    #[test]
    fn test_resolve_relative() {
        let importer = Path::new("/app/src/views/Home.vue");
        assert_eq!(
            resolve_import(importer, "../components/Btn.vue", Path::new("/app"), &aliases()),
            Some(PathBuf::from("/app/src/components/Btn.vue"))
        );
        assert_eq!(
            resolve_import(importer, "./Hero.vue", Path::new("/app"), &aliases()),
            Some(PathBuf::from("/app/src/views/Hero.vue"))
        );
    }

    #[test]
    fn test_resolve_alias_longest_wins() {
        let importer = Path::new("/app/src/App.vue");
        assert_eq!(
            resolve_import(importer, "@/components/Btn.vue", Path::new("/app"), &aliases()),
            Some(PathBuf::from("/app/src/components/Btn.vue"))
        );
        assert_eq!(
            resolve_import(importer, "@ui/Modal.vue", Path::new("/app"), &aliases()),
            Some(PathBuf::from("/app/packages/ui/src/Modal.vue"))
        );
    }

    #[test]
    fn test_resolve_package_is_none() {
        let importer = Path::new("/app/src/App.vue");
        assert_eq!(
            resolve_import(importer, "some-lib/Widget.vue", Path::new("/app"), &aliases()),
            None
        );
        assert_eq!(
            resolve_import(importer, "@scope/pkg/Widget.vue", Path::new("/app"), &BTreeMap::new()),
            None
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c/./d.vue")), PathBuf::from("/a/c/d.vue"));
        assert_eq!(normalize_path(Path::new("../x.vue")), PathBuf::from("../x.vue"));
    }
}
