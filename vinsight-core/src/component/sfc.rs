//! Splitting a `.vue` single-file component into its blocks.

use std::sync::OnceLock;

use regex::Regex;

/// A block's inner content and its byte offset in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SfcBlock<'a> {
    pub content: &'a str,
    pub offset: usize,
    /// Value of the `lang` attribute (`ts`, `tsx`, ...), when present.
    pub lang: Option<&'a str>,
}

/// The blocks of a single-file component relevant to interface analysis.
#[derive(Debug, Clone, Default)]
pub struct SfcBlocks<'a> {
    /// Content of the outermost `<template>` block.
    pub template: Option<SfcBlock<'a>>,
    /// Every `<script>` block (`<script setup>` included), in file order.
    pub scripts: Vec<SfcBlock<'a>>,
}

fn template_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"<(/?)template\b[^>]*>").expect("Hardcoded regex pattern is valid"))
}

fn script_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)<script\b([^>]*)>(.*?)</script\s*>").expect("Hardcoded regex pattern is valid")
    })
}

fn lang_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"\blang\s*=\s*["']?([A-Za-z]+)"#).expect("Hardcoded regex pattern is valid")
    })
}

impl<'a> SfcBlocks<'a> {
    /// Split `source` into blocks. Missing blocks are simply absent.
    pub fn parse(source: &'a str) -> Self {
        let scripts = script_regex()
            .captures_iter(source)
            .filter_map(|caps| {
                let body = caps.get(2)?;
                let lang = caps
                    .get(1)
                    .and_then(|attrs| lang_regex().captures(attrs.as_str()))
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str());
                Some(SfcBlock {
                    content: body.as_str(),
                    offset: body.start(),
                    lang,
                })
            })
            .collect();

        Self {
            template: outer_template(source),
            scripts,
        }
    }

    /// Template content, or an empty string for script-only components.
    pub fn template_str(&self) -> &'a str {
        self.template.map_or("", |t| t.content)
    }

    /// True when the file has neither a template nor a script block.
    pub fn is_empty(&self) -> bool {
        self.template.is_none() && self.scripts.is_empty()
    }
}

/// Outermost `<template>` block; nested `<template>` tags are balanced by
/// depth. An unclosed block runs to the end of the file.
fn outer_template(source: &str) -> Option<SfcBlock<'_>> {
    let mut start = None;
    let mut depth = 0usize;

    for caps in template_tag_regex().captures_iter(source) {
        let Some(tag) = caps.get(0) else { continue };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

        if !closing {
            if tag.as_str().ends_with("/>") {
                continue;
            }
            if start.is_none() {
                start = Some(tag.end());
            }
            depth += 1;
        } else if let Some(content_start) = start {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(SfcBlock {
                    content: &source[content_start..tag.start()],
                    offset: content_start,
                    lang: None,
                });
            }
        }
    }

    start.map(|content_start| SfcBlock {
        content: &source[content_start..],
        offset: content_start,
        lang: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = r#"<template>
  <div class="card">
    <template v-if="title"><h2>{{ title }}</h2></template>
    <slot />
  </div>
</template>

<script setup lang="ts">
defineProps<{ title?: string }>()
</script>

<script>
export default { name: 'AppCard' }
</script>
"#;

    #[test]
    fn test_outer_template_with_nested_templates() {
        let blocks = SfcBlocks::parse(CARD);
        let template = blocks.template.unwrap();
        assert!(template.content.starts_with("\n  <div class=\"card\">"));
        assert!(template.content.contains("<template v-if=\"title\">"));
        assert!(template.content.trim_end().ends_with("</div>"));
        assert_eq!(&CARD[template.offset..template.offset + template.content.len()], template.content);
    }

    #[test]
    fn test_scripts_in_order() {
        let blocks = SfcBlocks::parse(CARD);
        assert_eq!(blocks.scripts.len(), 2);
        assert!(blocks.scripts[0].content.contains("defineProps"));
        assert!(blocks.scripts[1].content.contains("AppCard"));
        assert_eq!(blocks.scripts[0].lang, Some("ts"));
        assert_eq!(blocks.scripts[1].lang, None);
        let s = blocks.scripts[1];
        assert_eq!(&CARD[s.offset..s.offset + s.content.len()], s.content);
    }

    #[test]
    fn test_script_only_component() {
        let blocks = SfcBlocks::parse("<script>export default { render() {} }</script>");
        assert!(blocks.template.is_none());
        assert_eq!(blocks.template_str(), "");
        assert!(!blocks.is_empty());
    }

    #[test]
    fn test_not_a_component() {
        assert!(SfcBlocks::parse("export const x = 1;").is_empty());
    }

    #[test]
    fn test_unclosed_template_runs_to_end() {
        let blocks = SfcBlocks::parse("<template><Btn label=\"x\" />");
        assert_eq!(blocks.template_str(), "<Btn label=\"x\" />");
    }
}
