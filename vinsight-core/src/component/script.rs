//! `<script>` block analysis on the oxc AST.
//!
//! One parse and one visitor pass per block collect everything interface
//! extraction and import resolution need:
//! - default imports of `.vue` files
//! - `defineProps` / `defineEmits` / `defineSlots` type or runtime arguments
//!   (also when wrapped in `withDefaults`)
//! - `name` / `props` / `emits` of `export default {...}`,
//!   `defineComponent({...})` and `defineOptions({...})`
//! - string first arguments of `emit(...)` / `$emit(...)` calls
//!
//! Offsets are byte offsets into the block content.

use std::collections::HashMap;

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::channels::ChannelKind;
use crate::component::imports::ImportedComponent;

/// A member name and the offset it is declared at.
pub type Located = (String, usize);

/// What one script block declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptFacts {
    /// `name` option, when written as a string literal.
    pub component_name: Option<String>,
    pub imports: Vec<ImportedComponent>,
    pub props: Vec<Located>,
    pub events: Vec<Located>,
    pub slots: Vec<Located>,
    /// Event names passed to `emit('x')` / `$emit('x')`.
    pub emitted: Vec<Located>,
}

/// First syntax error the parser reported for a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSyntaxError {
    pub offset: usize,
    pub message: String,
}

/// Source type for a block's `lang` attribute.
///
/// Plain `<script>` is parsed as TypeScript: it accepts all module JS and
/// the `defineProps<...>()` forms people write without `lang="ts"`.
pub fn source_type_for(lang: Option<&str>) -> SourceType {
    match lang {
        Some("tsx") | Some("jsx") => SourceType::tsx(),
        _ => SourceType::ts(),
    }
}

/// Parse `content` and collect its declarations.
pub fn scan_script(content: &str, lang: Option<&str>) -> Result<ScriptFacts, ScriptSyntaxError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, content, source_type_for(lang)).parse();

    if let Some(err) = ret.errors.first() {
        let offset = err
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(content.len(), |label| label.offset());
        return Err(ScriptSyntaxError {
            offset: offset.min(content.len()),
            message: err.to_string(),
        });
    }

    let mut visitor = ScriptVisitor::default();
    visitor.visit_program(&ret.program);
    Ok(visitor.finish())
}

/// Keys and call-signature event names of a type literal or interface body.
#[derive(Debug, Clone, Default)]
struct TypeMembers {
    keys: Vec<Located>,
    /// `(e: 'change', v: string): void` contributes `change`.
    call_literals: Vec<Located>,
}

impl TypeMembers {
    fn of_signatures(signatures: &[TSSignature<'_>]) -> Self {
        let mut members = Self::default();
        for signature in signatures {
            match signature {
                TSSignature::TSPropertySignature(p) if !p.computed => {
                    if let Some(name) = key_name(&p.key) {
                        members.keys.push((name, p.key.span().start as usize));
                    }
                }
                TSSignature::TSMethodSignature(m) if !m.computed => {
                    if let Some(name) = key_name(&m.key) {
                        members.keys.push((name, m.key.span().start as usize));
                    }
                }
                TSSignature::TSCallSignatureDeclaration(call) => {
                    let annotation = call
                        .params
                        .items
                        .first()
                        .and_then(|param| param.type_annotation.as_ref());
                    if let Some(annotation) = annotation {
                        string_literal_types(&annotation.type_annotation, &mut members.call_literals);
                    }
                }
                _ => {}
            }
        }
        members
    }

    fn for_kind(&self, kind: ChannelKind) -> Vec<Located> {
        let mut found = self.keys.clone();
        if kind == ChannelKind::Event {
            found.extend(self.call_literals.iter().cloned());
            found.sort_by_key(|(_, offset)| *offset);
        }
        found
    }
}

#[derive(Default)]
struct ScriptVisitor {
    facts: ScriptFacts,
    /// `defineProps<Props>()` and friends, resolved once every local
    /// declaration has been seen.
    type_refs: Vec<(ChannelKind, String)>,
    type_decls: HashMap<String, TypeMembers>,
}

impl ScriptVisitor {
    fn members_mut(&mut self, kind: ChannelKind) -> &mut Vec<Located> {
        match kind {
            ChannelKind::Prop => &mut self.facts.props,
            ChannelKind::Event => &mut self.facts.events,
            ChannelKind::Slot => &mut self.facts.slots,
        }
    }

    /// A `defineX` macro call: type argument first, else the runtime argument.
    fn declare(&mut self, kind: ChannelKind, call: &CallExpression<'_>) {
        if let Some(ty) = call.type_arguments.as_ref().and_then(|t| t.params.first()) {
            match ty {
                TSType::TSTypeLiteral(literal) => {
                    let found = TypeMembers::of_signatures(&literal.members).for_kind(kind);
                    self.members_mut(kind).extend(found);
                }
                TSType::TSTypeReference(reference) => {
                    if let TSTypeName::IdentifierReference(id) = &reference.type_name {
                        self.type_refs.push((kind, id.name.to_string()));
                    }
                }
                _ => {}
            }
            return;
        }

        if let Some(argument) = call.arguments.first().and_then(|a| a.as_expression()) {
            let found = runtime_members(argument);
            self.members_mut(kind).extend(found);
        }
    }

    fn read_options(&mut self, options: &ObjectExpression<'_>) {
        for property in &options.properties {
            let ObjectPropertyKind::ObjectProperty(p) = property else {
                continue;
            };
            if p.computed {
                continue;
            }
            match key_name(&p.key).as_deref() {
                Some("name") => {
                    if let Expression::StringLiteral(s) = &p.value {
                        self.facts
                            .component_name
                            .get_or_insert_with(|| s.value.to_string());
                    }
                }
                Some("props") => {
                    let found = runtime_members(&p.value);
                    self.facts.props.extend(found);
                }
                Some("emits") => {
                    let found = runtime_members(&p.value);
                    self.facts.events.extend(found);
                }
                _ => {}
            }
        }
    }

    fn finish(mut self) -> ScriptFacts {
        for (kind, type_name) in std::mem::take(&mut self.type_refs) {
            let found = self.type_decls.get(&type_name).map(|m| m.for_kind(kind));
            if let Some(found) = found {
                self.members_mut(kind).extend(found);
            }
        }
        self.facts
    }
}

impl<'a> Visit<'a> for ScriptVisitor {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let specifier = decl.source.value.as_str();
        if !specifier.ends_with(".vue") || matches!(decl.import_kind, ImportOrExportKind::Type) {
            return;
        }

        let Some(specifiers) = &decl.specifiers else {
            return;
        };
        for spec in specifiers {
            let local = match spec {
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                ImportDeclarationSpecifier::ImportSpecifier(s) if is_default_export(&s.imported) => &s.local,
                _ => continue,
            };
            self.facts.imports.push(ImportedComponent {
                local_name: local.name.to_string(),
                specifier: specifier.to_string(),
            });
        }
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        if let ExportDefaultDeclarationKind::ObjectExpression(options) = &decl.declaration {
            self.read_options(options);
        }
        walk::walk_export_default_declaration(self, decl);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        match &call.callee {
            Expression::Identifier(ident) => match ident.name.as_str() {
                "defineProps" => self.declare(ChannelKind::Prop, call),
                "defineEmits" => self.declare(ChannelKind::Event, call),
                "defineSlots" => self.declare(ChannelKind::Slot, call),
                "defineComponent" | "defineOptions" => {
                    if let Some(Expression::ObjectExpression(options)) =
                        call.arguments.first().and_then(|a| a.as_expression())
                    {
                        self.read_options(options);
                    }
                }
                "emit" | "$emit" => self.record_emit(call),
                _ => {}
            },
            // this.$emit('x'), ctx.emit('x')
            Expression::StaticMemberExpression(member) => {
                if matches!(member.property.name.as_str(), "emit" | "$emit") {
                    self.record_emit(call);
                }
            }
            _ => {}
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_ts_interface_declaration(&mut self, decl: &TSInterfaceDeclaration<'a>) {
        self.type_decls
            .insert(decl.id.name.to_string(), TypeMembers::of_signatures(&decl.body.body));
    }

    fn visit_ts_type_alias_declaration(&mut self, decl: &TSTypeAliasDeclaration<'a>) {
        if let TSType::TSTypeLiteral(literal) = &decl.type_annotation {
            self.type_decls
                .insert(decl.id.name.to_string(), TypeMembers::of_signatures(&literal.members));
        }
    }
}

impl ScriptVisitor {
    fn record_emit(&mut self, call: &CallExpression<'_>) {
        let name = match call.arguments.first() {
            Some(Argument::StringLiteral(s)) => Some((s.value.to_string(), s.span.start as usize)),
            Some(Argument::TemplateLiteral(t)) if t.expressions.is_empty() => t
                .quasis
                .first()
                .map(|q| (q.value.raw.to_string(), t.span.start as usize)),
            _ => None,
        };
        if let Some(name) = name {
            self.facts.emitted.push(name);
        }
    }
}

fn is_default_export(name: &ModuleExportName<'_>) -> bool {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.as_str() == "default",
        ModuleExportName::StringLiteral(s) => s.value.as_str() == "default",
        ModuleExportName::IdentifierReference(_) => false,
    }
}

/// Static name of an object or type member key. Computed keys have none.
fn key_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::StringLiteral(s) => Some(s.value.to_string()),
        _ => None,
    }
}

/// Members of a runtime declaration: `['a', 'b']` or `{ a: String, b: {...} }`.
fn runtime_members(expr: &Expression<'_>) -> Vec<Located> {
    match expr {
        Expression::ArrayExpression(array) => array
            .elements
            .iter()
            .filter_map(|element| match element {
                ArrayExpressionElement::StringLiteral(s) => {
                    Some((s.value.to_string(), s.span.start as usize))
                }
                _ => None,
            })
            .collect(),
        Expression::ObjectExpression(object) => object
            .properties
            .iter()
            .filter_map(|property| match property {
                ObjectPropertyKind::ObjectProperty(p) if !p.computed => {
                    key_name(&p.key).map(|name| (name, p.key.span().start as usize))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn string_literal_types(ty: &TSType<'_>, out: &mut Vec<Located>) {
    match ty {
        TSType::TSLiteralType(literal) => {
            if let TSLiteral::StringLiteral(s) = &literal.literal {
                out.push((s.value.to_string(), s.span.start as usize));
            }
        }
        TSType::TSUnionType(union) => {
            for member in &union.types {
                string_literal_types(member, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str) -> ScriptFacts {
        scan_script(content, Some("ts")).unwrap()
    }

    fn names(found: &[Located]) -> Vec<&str> {
        found.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn test_regex_literal_with_quote_in_validator() {
        let facts = scan(
            r#"
defineProps({
  mask: { type: String, validator: (v) => /^['a-z]+$/.test(v) },
  label: String,
})
"#,
        );
        assert_eq!(names(&facts.props), vec!["mask", "label"]);
    }

    #[test]
    fn test_template_literal_with_interpolation() {
        let facts = scan(
            r#"
const greeting = `hello ${user.name} {`
const label = `(${count})`
defineEmits(['open', 'close'])
"#,
        );
        assert_eq!(names(&facts.events), vec!["open", "close"]);
    }

    #[test]
    fn test_commented_out_declarations_are_ignored() {
        let facts = scan(
            r#"
/*
import Old from './Old.vue'
defineProps(['legacy'])
*/
// import Gone from './Gone.vue'
import Fresh from './Fresh.vue'
"#,
        );
        assert_eq!(facts.imports.len(), 1);
        assert_eq!(facts.imports[0].local_name, "Fresh");
        assert!(facts.props.is_empty());
    }

    #[test]
    fn test_import_inside_string_is_ignored() {
        let facts = scan(
            r#"
const snippet = "import Fake from './Fake.vue'"
import { default as Real } from './Real.vue'
import type Typed from './Typed.vue'
"#,
        );
        assert_eq!(facts.imports.len(), 1);
        assert_eq!(facts.imports[0].local_name, "Real");
        assert_eq!(facts.imports[0].specifier, "./Real.vue");
    }

    #[test]
    fn test_named_type_declared_after_use() {
        let facts = scan(
            r#"
const props = defineProps<Props>()
type Props = { size: number; 'aria-label'?: string }
"#,
        );
        assert_eq!(names(&facts.props), vec!["size", "aria-label"]);
    }

    #[test]
    fn test_emit_calls_and_union_call_signature() {
        let facts = scan(
            r#"
const emit = defineEmits<{ (e: 'open' | 'close'): void }>()
function toggle() { emit('open'); ctx.emit(`toggled`); emit(name) }
"#,
        );
        assert_eq!(names(&facts.events), vec!["open", "close"]);
        assert_eq!(names(&facts.emitted), vec!["open", "toggled"]);
    }

    #[test]
    fn test_options_only_at_top_level() {
        let facts = scan(
            r#"
export default defineComponent({
  name: 'Stepper',
  props: { step: Number },
  data() { return { props: ['not-a-prop'], name: 'inner' } },
})
"#,
        );
        assert_eq!(facts.component_name.as_deref(), Some("Stepper"));
        assert_eq!(names(&facts.props), vec!["step"]);
    }

    #[test]
    fn test_syntax_error_reports_offset() {
        let err = scan_script("\ndefineProps({ a: String\n", None).unwrap_err();
        assert!(err.offset > 0);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_source_type_for_lang() {
        assert!(source_type_for(Some("tsx")).is_jsx());
        assert!(source_type_for(None).is_typescript());
        assert!(!source_type_for(Some("ts")).is_jsx());
    }
}
