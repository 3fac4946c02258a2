//! Element-tree data model for parsed source files.
//!
//! A source file parses into a [`ParsedTextFile`]. On success it holds the
//! file's top-level elements in source order: components whose render output
//! is a structural JSX tree, arbitrary code kept as text, import statements
//! and verbatim directive prologues. Every JSX element carries a [`Uid`]
//! unique within the file; the canvas addresses elements through those UIDs.

use crate::uid::Uid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Comments ────────────────────────────────────────────────────────────

/// A source comment, kept verbatim including its delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn line(body: &str) -> Self {
        Self::new(format!("//{body}"))
    }

    pub fn block(body: &str) -> Self {
        Self::new(format!("/*{body}*/"))
    }

    /// `//` comments run to the end of the line, so printing one must be
    /// followed by a newline.
    pub fn is_line(&self) -> bool {
        self.text.starts_with("//")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedComments {
    pub leading: Vec<Comment>,
    pub trailing: Vec<Comment>,
}

impl ParsedComments {
    pub fn new(leading: Vec<Comment>, trailing: Vec<Comment>) -> Self {
        Self { leading, trailing }
    }

    pub fn leading(leading: Vec<Comment>) -> Self {
        Self {
            leading,
            trailing: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────

/// A literal attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
}

/// Keys in elements-within maps; UIDs order the map, so printing and
/// comparison are deterministic.
pub type ElementsWithin = BTreeMap<Uid, JsxElement>;

/// An attribute value expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttribute {
    Value {
        value: Literal,
        comments: ParsedComments,
    },
    NestedArray {
        content: Vec<ArrayElement>,
        comments: ParsedComments,
    },
    NestedObject {
        content: Vec<ObjectProperty>,
        comments: ParsedComments,
    },
    FunctionCall {
        name: String,
        parameters: Vec<JsxAttribute>,
        comments: ParsedComments,
    },
    /// Any other expression, kept as code. Elements inside it are parsed
    /// structurally and stand in the code as placeholders.
    OtherJavaScript {
        javascript: String,
        elements_within: ElementsWithin,
        comments: ParsedComments,
    },
}

impl JsxAttribute {
    pub fn value(value: Literal) -> Self {
        Self::Value {
            value,
            comments: ParsedComments::default(),
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::value(Literal::String(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::value(Literal::Number(n))
    }

    pub fn nested_object(content: Vec<ObjectProperty>) -> Self {
        Self::NestedObject {
            content,
            comments: ParsedComments::default(),
        }
    }

    pub fn other_javascript(javascript: impl Into<String>) -> Self {
        Self::OtherJavaScript {
            javascript: javascript.into(),
            elements_within: ElementsWithin::new(),
            comments: ParsedComments::default(),
        }
    }

    pub fn comments(&self) -> &ParsedComments {
        match self {
            Self::Value { comments, .. }
            | Self::NestedArray { comments, .. }
            | Self::NestedObject { comments, .. }
            | Self::FunctionCall { comments, .. }
            | Self::OtherJavaScript { comments, .. } => comments,
        }
    }

    pub fn comments_mut(&mut self) -> &mut ParsedComments {
        match self {
            Self::Value { comments, .. }
            | Self::NestedArray { comments, .. }
            | Self::NestedObject { comments, .. }
            | Self::FunctionCall { comments, .. }
            | Self::OtherJavaScript { comments, .. } => comments,
        }
    }

    /// Look up a key of a nested object value.
    pub fn get_property(&self, key: &str) -> Option<&JsxAttribute> {
        match self {
            Self::NestedObject { content, .. } => content.iter().rev().find_map(|p| match p {
                ObjectProperty::Assignment { key: k, value, .. } if k == key => Some(value),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Set a key of a nested object value, replacing an existing assignment
    /// in place or appending a new one. Returns `false` when `self` is not
    /// an object.
    pub fn set_property(&mut self, key: &str, new_value: JsxAttribute) -> bool {
        let Self::NestedObject { content, .. } = self else {
            return false;
        };
        let existing = content.iter_mut().rev().find_map(|p| match p {
            ObjectProperty::Assignment { key: k, value, .. } if k == key => Some(value),
            _ => None,
        });
        match existing {
            Some(value) => *value = new_value,
            None => content.push(ObjectProperty::Assignment {
                key: key.to_string(),
                value: new_value,
                comments: ParsedComments::default(),
            }),
        }
        true
    }

    /// Plain-JSON view of a statically known value. Code values have none.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value;
        match self {
            Self::Value { value, .. } => Some(match value {
                Literal::Null | Literal::Undefined => Value::Null,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Number(n) => serde_json::Number::from_f64(*n).map(Value::Number)?,
                Literal::String(s) => Value::String(s.clone()),
            }),
            Self::NestedArray { content, .. } => {
                let mut out = Vec::with_capacity(content.len());
                for element in content {
                    match element {
                        ArrayElement::Value(v) => out.push(v.to_json()?),
                        ArrayElement::Spread(_) => return None,
                    }
                }
                Some(Value::Array(out))
            }
            Self::NestedObject { content, .. } => {
                let mut out = serde_json::Map::new();
                for property in content {
                    match property {
                        ObjectProperty::Assignment { key, value, .. } => {
                            out.insert(key.clone(), value.to_json()?);
                        }
                        ObjectProperty::Spread { .. } => return None,
                    }
                }
                Some(Value::Object(out))
            }
            Self::FunctionCall { .. } | Self::OtherJavaScript { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayElement {
    Value(JsxAttribute),
    Spread(JsxAttribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectProperty {
    Assignment {
        key: String,
        value: JsxAttribute,
        comments: ParsedComments,
    },
    Spread {
        value: JsxAttribute,
        comments: ParsedComments,
    },
}

/// One entry of an element's attribute list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeEntry {
    Entry { key: String, value: JsxAttribute },
    Spread { value: JsxAttribute },
}

// ─── Element tree ────────────────────────────────────────────────────────

/// `Foo.Bar.Baz` → base `Foo`, property path `[Bar, Baz]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JsxElementName {
    pub base: String,
    pub property_path: Vec<String>,
}

impl JsxElementName {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            property_path: Vec::new(),
        }
    }

    pub fn parse(s: &str) -> Self {
        let mut parts = s.split('.');
        let base = parts.next().unwrap_or_default().to_string();
        Self {
            base,
            property_path: parts.map(str::to_string).collect(),
        }
    }
}

impl std::fmt::Display for JsxElementName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)?;
        for part in &self.property_path {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxElement {
    pub name: JsxElementName,
    pub uid: Uid,
    /// Keys are unique; order is print order.
    pub attributes: Vec<JsxAttributeEntry>,
    pub children: Vec<JsxElementChild>,
    /// Comments written inside the opening tag.
    pub comments: ParsedComments,
}

impl JsxElement {
    pub fn new(name: &str, uid: Uid) -> Self {
        Self {
            name: JsxElementName::parse(name),
            uid,
            attributes: Vec::new(),
            children: Vec::new(),
            comments: ParsedComments::default(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: JsxAttribute) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_child(mut self, child: JsxElementChild) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&JsxAttribute> {
        self.attributes.iter().find_map(|a| match a {
            JsxAttributeEntry::Entry { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    pub fn attribute_mut(&mut self, key: &str) -> Option<&mut JsxAttribute> {
        self.attributes.iter_mut().find_map(|a| match a {
            JsxAttributeEntry::Entry { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    /// Set an attribute. An existing key keeps its position.
    pub fn set_attribute(&mut self, key: &str, value: JsxAttribute) {
        match self.attribute_mut(key) {
            Some(existing) => *existing = value,
            None => self.attributes.push(JsxAttributeEntry::Entry {
                key: key.to_string(),
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsxTextBlock {
    /// Decoded text after JSX whitespace rules; never contains a newline.
    pub text: String,
}

/// The code of a `{…}` child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxArbitraryBlock {
    /// Code with each element within replaced by [`element_placeholder`].
    pub javascript: String,
    pub defined_elsewhere: Vec<String>,
    pub elements_within: ElementsWithin,
    pub comments: ParsedComments,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxFragment {
    pub children: Vec<JsxElementChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxElementChild {
    Element(JsxElement),
    TextBlock(JsxTextBlock),
    ArbitraryBlock(JsxArbitraryBlock),
    Fragment(JsxFragment),
}

impl JsxElementChild {
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextBlock(JsxTextBlock { text: text.into() })
    }

    pub fn as_element(&self) -> Option<&JsxElement> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// The placeholder standing in for an element within a code string.
pub fn element_placeholder(uid: Uid) -> String {
    format!("$$element(\"{uid}\")")
}

pub const PLACEHOLDER_PREFIX: &str = "$$element(\"";

/// UIDs of the placeholders in a code string, in order of appearance.
pub fn placeholder_uids(javascript: &str) -> Vec<Uid> {
    let mut out = Vec::new();
    let mut rest = javascript;
    while let Some(i) = rest.find(PLACEHOLDER_PREFIX) {
        rest = &rest[i + PLACEHOLDER_PREFIX.len()..];
        if let Some(end) = rest.find("\")") {
            out.push(Uid::intern(&rest[..end]));
            rest = &rest[end + 2..];
        }
    }
    out
}

// ─── Top level ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionDeclarationSyntax {
    Function,
    Var,
    Let,
    Const,
}

impl FunctionDeclarationSyntax {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockOrExpression {
    Block,
    Expression,
}

/// Code kept as text, with the names it declares and the names it reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArbitraryJsBlock {
    pub javascript: String,
    pub defined_within: Vec<String>,
    pub defined_elsewhere: Vec<String>,
    pub elements_within: ElementsWithin,
    pub comments: ParsedComments,
}

/// A component whose render output is a single JSX tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxComponent {
    /// `None` for `export default function () {…}`.
    pub name: Option<String>,
    /// `false` for `const name = <jsx/>`.
    pub is_function: bool,
    pub declaration_syntax: FunctionDeclarationSyntax,
    pub block_or_expression: BlockOrExpression,
    /// Parameter source text, one entry per parameter.
    pub params: Vec<String>,
    pub root_element: JsxElementChild,
    /// Body code before the `return`.
    pub arbitrary_js_block: Option<ArbitraryJsBlock>,
    pub comments: ParsedComments,
    pub return_statement_comments: ParsedComments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAlias {
    pub name: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportDetails {
    pub import_default: Option<String>,
    pub import_star_as: Option<String>,
    pub imports_from_within: Vec<ImportAlias>,
}

impl ImportDetails {
    /// Fold another statement's bindings for the same module into this one.
    pub fn merge(&mut self, other: &ImportDetails) {
        if self.import_default.is_none() {
            self.import_default.clone_from(&other.import_default);
        }
        if self.import_star_as.is_none() {
            self.import_star_as.clone_from(&other.import_star_as);
        }
        for alias in &other.imports_from_within {
            if !self.imports_from_within.contains(alias) {
                self.imports_from_within.push(alias.clone());
            }
        }
    }
}

/// Module specifier → bindings imported from it.
pub type Imports = BTreeMap<String, ImportDetails>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Statement text as written, without leading comments.
    pub raw: String,
    pub module: String,
    pub details: ImportDetails,
    pub comments: ParsedComments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparsedCode {
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopLevelElement {
    Component(JsxComponent),
    ArbitraryJsBlock(ArbitraryJsBlock),
    ImportStatement(ImportStatement),
    UnparsedCode(UnparsedCode),
}

// ─── Exports ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportAlias {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportDetail {
    /// `export default function Name() {}` / `export default class Name {}`.
    DefaultFunctionOrClass { name: Option<String> },
    /// `export default <expression>`; an identifier expression names it.
    DefaultExpression { name: Option<String> },
    /// `export class Name {}`.
    Class { name: String },
    /// `export function Name() {}`.
    Function { name: String },
    /// `export const a = …, b = …`.
    Variables { names: Vec<String> },
    /// `export { a, b as c }`.
    Identifiers { names: Vec<ExportAlias> },
    /// `export * from 'm'` / `export * as ns from 'm'`.
    ReexportWildcard { module: String, alias: Option<String> },
    /// `export { a, b as c } from 'm'`.
    ReexportVariables { module: String, names: Vec<ExportAlias> },
}

impl ExportDetail {
    /// Does this detail export the declaration `name` inline (as a prefix
    /// on the declaration itself)?
    pub fn exports_declaration(&self, name: &str) -> Option<ExportPrefix> {
        match self {
            Self::DefaultFunctionOrClass { name: Some(n) } if n == name => {
                Some(ExportPrefix::ExportDefault)
            }
            Self::Class { name: n } | Self::Function { name: n } if n == name => {
                Some(ExportPrefix::Export)
            }
            Self::Variables { names } if names.iter().any(|n| n == name) => {
                Some(ExportPrefix::Export)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPrefix {
    Export,
    ExportDefault,
}

// ─── Parse results ───────────────────────────────────────────────────────

/// 1-based source span of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightBounds {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A positioned message, 1-based lines and columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub file_name: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub code_snippet: String,
    pub severity: Severity,
    pub message: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseSuccess {
    pub imports: Imports,
    pub top_level_elements: Vec<TopLevelElement>,
    /// Every top-level arbitrary block, joined in source order.
    pub combined_top_level_arbitrary_block: Option<ArbitraryJsBlock>,
    pub exports_detail: Vec<ExportDetail>,
    /// `None` means the default factory (`React.createElement`).
    pub jsx_factory_function: Option<String>,
    pub highlight_bounds: BTreeMap<Uid, HighlightBounds>,
}

impl ParseSuccess {
    pub fn components(&self) -> impl Iterator<Item = &JsxComponent> {
        self.top_level_elements.iter().filter_map(|e| match e {
            TopLevelElement::Component(c) => Some(c),
            _ => None,
        })
    }

    pub fn find_element(&self, uid: Uid) -> Option<&JsxElement> {
        self.top_level_elements
            .iter()
            .find_map(|e| find_in_top_level(e, uid))
    }

    pub fn find_element_mut(&mut self, uid: Uid) -> Option<&mut JsxElement> {
        self.top_level_elements
            .iter_mut()
            .find_map(|e| find_in_top_level_mut(e, uid))
    }

    /// Every element UID in the file, in source order.
    pub fn all_uids(&self) -> Vec<Uid> {
        let mut out = Vec::new();
        for element in &self.top_level_elements {
            walk_top_level(element, &mut |e| out.push(e.uid));
        }
        out
    }

    /// The same file with highlight bounds cleared, for structural comparison.
    pub fn without_highlight_bounds(&self) -> Self {
        Self {
            highlight_bounds: BTreeMap::new(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParsedTextFile {
    Success(ParseSuccess),
    Failure(Vec<ErrorMessage>),
    /// A file the parser does not handle (stylesheets, assets, …).
    Unparsed,
}

impl ParsedTextFile {
    pub fn success(&self) -> Option<&ParseSuccess> {
        match self {
            Self::Success(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<ParseSuccess> {
        match self {
            Self::Success(s) => Some(s),
            _ => None,
        }
    }
}

// ─── Walking ─────────────────────────────────────────────────────────────

/// Visit every element under `child` (including itself), depth first,
/// descending into elements within arbitrary blocks.
pub fn walk_elements<'a>(child: &'a JsxElementChild, f: &mut dyn FnMut(&'a JsxElement)) {
    match child {
        JsxElementChild::Element(e) => walk_element(e, f),
        JsxElementChild::TextBlock(_) => {}
        JsxElementChild::ArbitraryBlock(block) => {
            for e in block.elements_within.values() {
                walk_element(e, f);
            }
        }
        JsxElementChild::Fragment(fragment) => {
            for c in &fragment.children {
                walk_elements(c, f);
            }
        }
    }
}

fn walk_element<'a>(element: &'a JsxElement, f: &mut dyn FnMut(&'a JsxElement)) {
    f(element);
    for entry in &element.attributes {
        let (JsxAttributeEntry::Entry { value, .. } | JsxAttributeEntry::Spread { value }) = entry;
        walk_attribute(value, f);
    }
    for c in &element.children {
        walk_elements(c, f);
    }
}

fn walk_attribute<'a>(attribute: &'a JsxAttribute, f: &mut dyn FnMut(&'a JsxElement)) {
    match attribute {
        JsxAttribute::Value { .. } => {}
        JsxAttribute::NestedArray { content, .. } => {
            for element in content {
                let (ArrayElement::Value(v) | ArrayElement::Spread(v)) = element;
                walk_attribute(v, f);
            }
        }
        JsxAttribute::NestedObject { content, .. } => {
            for property in content {
                let (ObjectProperty::Assignment { value, .. } | ObjectProperty::Spread { value, .. }) =
                    property;
                walk_attribute(value, f);
            }
        }
        JsxAttribute::FunctionCall { parameters, .. } => {
            for p in parameters {
                walk_attribute(p, f);
            }
        }
        JsxAttribute::OtherJavaScript {
            elements_within, ..
        } => {
            for e in elements_within.values() {
                walk_element(e, f);
            }
        }
    }
}

pub fn walk_top_level<'a>(element: &'a TopLevelElement, f: &mut dyn FnMut(&'a JsxElement)) {
    match element {
        TopLevelElement::Component(c) => {
            if let Some(block) = &c.arbitrary_js_block {
                for e in block.elements_within.values() {
                    walk_element(e, f);
                }
            }
            walk_elements(&c.root_element, f);
        }
        TopLevelElement::ArbitraryJsBlock(block) => {
            for e in block.elements_within.values() {
                walk_element(e, f);
            }
        }
        TopLevelElement::ImportStatement(_) | TopLevelElement::UnparsedCode(_) => {}
    }
}

fn find_in_top_level(element: &TopLevelElement, uid: Uid) -> Option<&JsxElement> {
    let mut found = None;
    walk_top_level(element, &mut |e| {
        if found.is_none() && e.uid == uid {
            found = Some(e);
        }
    });
    found
}

fn find_in_top_level_mut(element: &mut TopLevelElement, uid: Uid) -> Option<&mut JsxElement> {
    match element {
        TopLevelElement::Component(c) => c
            .arbitrary_js_block
            .as_mut()
            .and_then(|b| find_in_map_mut(&mut b.elements_within, uid))
            .or_else(|| find_in_child_mut(&mut c.root_element, uid)),
        TopLevelElement::ArbitraryJsBlock(block) => find_in_map_mut(&mut block.elements_within, uid),
        TopLevelElement::ImportStatement(_) | TopLevelElement::UnparsedCode(_) => None,
    }
}

fn find_in_map_mut(map: &mut ElementsWithin, uid: Uid) -> Option<&mut JsxElement> {
    map.values_mut().find_map(|e| find_in_element_mut(e, uid))
}

/// Find an element by UID below `child`, mutably.
pub fn find_in_child_mut(child: &mut JsxElementChild, uid: Uid) -> Option<&mut JsxElement> {
    match child {
        JsxElementChild::Element(e) => find_in_element_mut(e, uid),
        JsxElementChild::TextBlock(_) => None,
        JsxElementChild::ArbitraryBlock(block) => find_in_map_mut(&mut block.elements_within, uid),
        JsxElementChild::Fragment(fragment) => fragment
            .children
            .iter_mut()
            .find_map(|c| find_in_child_mut(c, uid)),
    }
}

fn find_in_element_mut(element: &mut JsxElement, uid: Uid) -> Option<&mut JsxElement> {
    if element.uid == uid {
        return Some(element);
    }
    for entry in &mut element.attributes {
        let (JsxAttributeEntry::Entry { value, .. } | JsxAttributeEntry::Spread { value }) = entry;
        if let Some(found) = find_in_attribute_mut(value, uid) {
            return Some(found);
        }
    }
    element
        .children
        .iter_mut()
        .find_map(|c| find_in_child_mut(c, uid))
}

fn find_in_attribute_mut(attribute: &mut JsxAttribute, uid: Uid) -> Option<&mut JsxElement> {
    match attribute {
        JsxAttribute::Value { .. } => None,
        JsxAttribute::NestedArray { content, .. } => content.iter_mut().find_map(|element| {
            let (ArrayElement::Value(v) | ArrayElement::Spread(v)) = element;
            find_in_attribute_mut(v, uid)
        }),
        JsxAttribute::NestedObject { content, .. } => content.iter_mut().find_map(|property| {
            let (ObjectProperty::Assignment { value, .. } | ObjectProperty::Spread { value, .. }) =
                property;
            find_in_attribute_mut(value, uid)
        }),
        JsxAttribute::FunctionCall { parameters, .. } => parameters
            .iter_mut()
            .find_map(|p| find_in_attribute_mut(p, uid)),
        JsxAttribute::OtherJavaScript {
            elements_within, ..
        } => find_in_map_mut(elements_within, uid),
    }
}
