//! Printer: element tree → source text.
//!
//! Output parses back to the same tree, highlight bounds aside. Layout is
//! canonical: one blank line between top-level elements (none between
//! consecutive imports), components in a fixed shape with a parenthesised
//! root, JSX attributes on one line. Children are broken onto their own
//! lines only when an element does not fit and no text child has edge
//! whitespace that the line breaks would swallow.

use crate::model::*;
use crate::parser::factory_from_imports;
use crate::uid::{UID_ATTRIBUTE, Uid};
use log::debug;
use serde::{Deserialize, Serialize};

// ─── Config ──────────────────────────────────────────────────────────────

/// Quote character for JavaScript strings the printer writes itself.
/// Import statements and code are printed as they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    #[default]
    Double,
}

impl QuoteStyle {
    fn quote(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Leave `data-uid` attributes out. Default: **false**.
    pub strip_uids: bool,
    /// Break elements that do not fit onto several lines. Default: **true**.
    pub pretty: bool,
    /// Default: **80**.
    pub line_width: usize,
    pub quote_style: QuoteStyle,
    /// Spaces per level. Default: **2**.
    pub indent_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            strip_uids: false,
            pretty: true,
            line_width: 80,
            quote_style: QuoteStyle::Double,
            indent_width: 2,
        }
    }
}

/// What the printer needs from a parsed file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrintableFile {
    pub top_level_elements: Vec<TopLevelElement>,
    pub imports: Imports,
    pub exports_detail: Vec<ExportDetail>,
    pub jsx_factory_function: Option<String>,
}

impl From<&ParseSuccess> for PrintableFile {
    fn from(success: &ParseSuccess) -> Self {
        Self {
            top_level_elements: success.top_level_elements.clone(),
            imports: success.imports.clone(),
            exports_detail: success.exports_detail.clone(),
            jsx_factory_function: success.jsx_factory_function.clone(),
        }
    }
}

impl From<ParseSuccess> for PrintableFile {
    fn from(success: ParseSuccess) -> Self {
        Self {
            top_level_elements: success.top_level_elements,
            imports: success.imports,
            exports_detail: success.exports_detail,
            jsx_factory_function: success.jsx_factory_function,
        }
    }
}

// ─── File ────────────────────────────────────────────────────────────────

/// Print a whole file.
#[must_use]
pub fn print_code(file: &PrintableFile, options: &PrintOptions) -> String {
    let printer = Printer { options };
    let mut sections: Vec<(bool, String)> = Vec::new();

    if let Some(factory) = pragma_to_emit(file) {
        sections.push((false, format!("/** @jsx {factory} */")));
    }
    for (module, details) in &file.imports {
        let covered = file.top_level_elements.iter().any(|e| {
            matches!(e, TopLevelElement::ImportStatement(s) if &s.module == module)
        });
        if !covered {
            sections.push((true, printer.synthesized_import(module, details)));
        }
    }
    for element in &file.top_level_elements {
        let is_import = matches!(element, TopLevelElement::ImportStatement(_));
        sections.push((is_import, printer.top_level(element, &file.exports_detail)));
    }

    let mut out = String::with_capacity(1024);
    let mut previous_import = false;
    for (i, (is_import, text)) in sections.iter().enumerate() {
        if i > 0 {
            out.push_str(if previous_import && *is_import {
                "\n"
            } else {
                "\n\n"
            });
        }
        out.push_str(text);
        previous_import = *is_import;
    }
    if !out.is_empty() {
        out.push('\n');
    }
    debug!(
        "printed {} top-level elements into {} bytes",
        file.top_level_elements.len(),
        out.len()
    );
    out
}

/// Print one element tree on its own, as at the start of a line.
#[must_use]
pub fn print_jsx(child: &JsxElementChild, options: &PrintOptions) -> String {
    Printer { options }.child(child, 0)
}

/// The factory to announce with a pragma comment: one that is set, is not
/// implied by the imports, and is not already announced.
fn pragma_to_emit(file: &PrintableFile) -> Option<&str> {
    let factory = file.jsx_factory_function.as_deref()?;
    if factory_from_imports(&file.imports).as_deref() == Some(factory) {
        return None;
    }
    let announced = file.top_level_elements.iter().any(|e| {
        let leading = match e {
            TopLevelElement::Component(c) => &c.comments.leading,
            TopLevelElement::ArbitraryJsBlock(b) => &b.comments.leading,
            TopLevelElement::ImportStatement(s) => &s.comments.leading,
            TopLevelElement::UnparsedCode(u) => return u.raw.contains("@jsx"),
        };
        leading.iter().any(|c| c.text.contains("@jsx"))
    });
    (!announced).then_some(factory)
}

struct Printer<'o> {
    options: &'o PrintOptions,
}

impl Printer<'_> {
    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.options.indent_width)
    }

    fn js_string(&self, s: &str) -> String {
        js_string(s, self.options.quote_style.quote())
    }

    fn synthesized_import(&self, module: &str, details: &ImportDetails) -> String {
        let mut parts = Vec::new();
        if let Some(default) = &details.import_default {
            parts.push(default.clone());
        }
        if let Some(namespace) = &details.import_star_as {
            parts.push(format!("* as {namespace}"));
        }
        if !details.imports_from_within.is_empty() {
            let names: Vec<String> = details
                .imports_from_within
                .iter()
                .map(|a| {
                    if a.name == a.alias {
                        a.name.clone()
                    } else {
                        format!("{} as {}", a.name, a.alias)
                    }
                })
                .collect();
            parts.push(format!("{{ {} }}", names.join(", ")));
        }
        if parts.is_empty() {
            format!("import {}", self.js_string(module))
        } else {
            format!("import {} from {}", parts.join(", "), self.js_string(module))
        }
    }

    fn top_level(&self, element: &TopLevelElement, exports: &[ExportDetail]) -> String {
        match element {
            TopLevelElement::Component(c) => self.component(c, exports),
            TopLevelElement::ArbitraryJsBlock(block) => {
                let mut s = comment_lines(&block.comments.leading);
                s.push_str(&self.splice(&block.javascript, &block.elements_within));
                s.truncate(s.trim_end_matches('\n').len());
                s
            }
            TopLevelElement::ImportStatement(statement) => {
                let mut s = comment_lines(&statement.comments.leading);
                s.push_str(&statement.raw);
                push_trailing(&mut s, &statement.comments.trailing);
                s
            }
            TopLevelElement::UnparsedCode(code) => code.raw.clone(),
        }
    }

    // ─── Components ──────────────────────────────────────────────────────

    fn component(&self, c: &JsxComponent, exports: &[ExportDetail]) -> String {
        let mut s = comment_lines(&c.comments.leading);
        let prefix = match &c.name {
            Some(name) => exports.iter().find_map(|e| e.exports_declaration(name)),
            None => exports
                .iter()
                .any(|e| matches!(e, ExportDetail::DefaultFunctionOrClass { name: None }))
                .then_some(ExportPrefix::ExportDefault),
        };
        match prefix {
            Some(ExportPrefix::Export) => s.push_str("export "),
            Some(ExportPrefix::ExportDefault) => s.push_str("export default "),
            None => {}
        }

        let name = c.name.as_deref().unwrap_or_default();
        let params = c.params.join(", ");
        match c.declaration_syntax {
            FunctionDeclarationSyntax::Function => {
                if name.is_empty() {
                    s.push_str(&format!("function({params}) "));
                } else {
                    s.push_str(&format!("function {name}({params}) "));
                }
                self.block_body(&mut s, c);
            }
            syntax => {
                s.push_str(&format!("{} {name} = ", syntax.keyword()));
                if !c.is_function {
                    self.parenthesised_root(&mut s, c, 0);
                } else {
                    s.push_str(&format!("({params}) => "));
                    match c.block_or_expression {
                        BlockOrExpression::Block => self.block_body(&mut s, c),
                        BlockOrExpression::Expression => self.parenthesised_root(&mut s, c, 0),
                    }
                }
            }
        }
        push_trailing(&mut s, &c.comments.trailing);
        s
    }

    /// `{ <body code> return (<root>) }`
    fn block_body(&self, s: &mut String, c: &JsxComponent) {
        let inner = self.indent(1);
        s.push_str("{\n");
        if let Some(block) = &c.arbitrary_js_block {
            let code = self.splice(&block.javascript, &block.elements_within);
            for line in code.split('\n') {
                if !line.is_empty() {
                    s.push_str(&inner);
                    s.push_str(line);
                }
                s.push('\n');
            }
        }
        s.push_str(&inner);
        s.push_str("return ");
        self.parenthesised_root(s, c, 1);
        s.push_str("\n}");
    }

    fn parenthesised_root(&self, s: &mut String, c: &JsxComponent, depth: usize) {
        let inner = self.indent(depth + 1);
        s.push_str("(\n");
        for comment in &c.return_statement_comments.leading {
            s.push_str(&inner);
            s.push_str(&comment.text);
            s.push('\n');
        }
        s.push_str(&inner);
        s.push_str(&self.child(&c.root_element, depth + 1));
        s.push('\n');
        for comment in &c.return_statement_comments.trailing {
            s.push_str(&inner);
            s.push_str(&comment.text);
            s.push('\n');
        }
        s.push_str(&self.indent(depth));
        s.push(')');
    }

    // ─── JSX ─────────────────────────────────────────────────────────────

    /// A child as it appears at indentation `depth`.
    fn child(&self, child: &JsxElementChild, depth: usize) -> String {
        let flat = self.flat(child);
        let fits = !flat.contains('\n')
            && depth * self.options.indent_width + flat.chars().count() <= self.options.line_width;
        if !self.options.pretty || fits {
            return flat;
        }
        let (open, children, close) = match child {
            JsxElementChild::Element(e) if !e.children.is_empty() => {
                (self.tag(e, false), &e.children, format!("</{}>", e.name))
            }
            JsxElementChild::Fragment(f) if !f.children.is_empty() => {
                ("<>".to_string(), &f.children, "</>".to_string())
            }
            _ => return flat,
        };
        if !can_break(children) {
            return flat;
        }
        let mut s = open;
        for c in children {
            s.push('\n');
            s.push_str(&self.indent(depth + 1));
            s.push_str(&self.child(c, depth + 1));
        }
        s.push('\n');
        s.push_str(&self.indent(depth));
        s.push_str(&close);
        s
    }

    /// A child on one line (line comments aside).
    fn flat(&self, child: &JsxElementChild) -> String {
        match child {
            JsxElementChild::Element(e) => self.flat_element(e),
            JsxElementChild::TextBlock(t) => encode_text(&t.text),
            JsxElementChild::ArbitraryBlock(block) => {
                let mut s = String::from("{");
                push_leading_inline(&mut s, &block.comments.leading);
                s.push_str(&self.splice(&block.javascript, &block.elements_within));
                push_trailing_inline(&mut s, &block.comments.trailing);
                s.push('}');
                s
            }
            JsxElementChild::Fragment(f) => {
                let mut s = String::from("<>");
                for c in &f.children {
                    s.push_str(&self.flat(c));
                }
                s.push_str("</>");
                s
            }
        }
    }

    fn flat_element(&self, e: &JsxElement) -> String {
        if e.children.is_empty() {
            return self.tag(e, true);
        }
        let mut s = self.tag(e, false);
        for c in &e.children {
            s.push_str(&self.flat(c));
        }
        s.push_str(&format!("</{}>", e.name));
        s
    }

    fn tag(&self, e: &JsxElement, self_closing: bool) -> String {
        let mut s = format!("<{}", e.name);
        for comment in &e.comments.leading {
            s.push(' ');
            s.push_str(&comment.text);
            if comment.is_line() {
                s.push('\n');
            }
        }
        for entry in &e.attributes {
            match entry {
                JsxAttributeEntry::Entry { key, .. } if key == UID_ATTRIBUTE => {}
                JsxAttributeEntry::Entry { key, value } => {
                    s.push(' ');
                    s.push_str(&self.attribute(key, value));
                }
                JsxAttributeEntry::Spread { value } => {
                    s.push_str(" {...");
                    s.push_str(&self.value(value));
                    s.push('}');
                }
            }
        }
        if !self.options.strip_uids {
            s.push_str(&format!(" {UID_ATTRIBUTE}=\"{}\"", e.uid));
        }
        s.push_str(if self_closing { " />" } else { ">" });
        s
    }

    fn attribute(&self, key: &str, value: &JsxAttribute) -> String {
        match value {
            JsxAttribute::Value {
                value: Literal::Bool(true),
                comments,
            } if comments.is_empty() => key.to_string(),
            JsxAttribute::Value {
                value: Literal::String(text),
                comments,
            } if comments.is_empty() && !text.contains(['"', '&', '\n', '\r']) => {
                format!("{key}=\"{text}\"")
            }
            _ => format!("{key}={{{}}}", self.value(value)),
        }
    }

    /// An attribute value as a JavaScript expression.
    fn value(&self, value: &JsxAttribute) -> String {
        let mut s = String::new();
        push_leading_inline(&mut s, &value.comments().leading);
        match value {
            JsxAttribute::Value { value, .. } => s.push_str(&match value {
                Literal::Null => "null".to_string(),
                Literal::Undefined => "undefined".to_string(),
                Literal::Bool(b) => b.to_string(),
                Literal::Number(n) => format!("{n}"),
                Literal::String(text) => self.js_string(text),
            }),
            JsxAttribute::NestedArray { content, .. } => {
                let items: Vec<String> = content
                    .iter()
                    .map(|item| match item {
                        ArrayElement::Value(v) => self.value(v),
                        ArrayElement::Spread(v) => format!("...{}", self.value(v)),
                    })
                    .collect();
                s.push_str(&format!("[{}]", items.join(", ")));
            }
            JsxAttribute::NestedObject { content, .. } => {
                if content.is_empty() {
                    s.push_str("{}");
                } else {
                    let properties: Vec<String> = content
                        .iter()
                        .map(|property| {
                            let mut p = String::new();
                            match property {
                                ObjectProperty::Assignment {
                                    key,
                                    value,
                                    comments,
                                } => {
                                    push_leading_inline(&mut p, &comments.leading);
                                    if is_identifier(key) {
                                        p.push_str(key);
                                    } else {
                                        p.push_str(&self.js_string(key));
                                    }
                                    p.push_str(": ");
                                    p.push_str(&self.value(value));
                                }
                                ObjectProperty::Spread { value, comments } => {
                                    push_leading_inline(&mut p, &comments.leading);
                                    p.push_str("...");
                                    p.push_str(&self.value(value));
                                }
                            }
                            p
                        })
                        .collect();
                    s.push_str(&format!("{{ {} }}", properties.join(", ")));
                }
            }
            JsxAttribute::FunctionCall {
                name, parameters, ..
            } => {
                let args: Vec<String> = parameters.iter().map(|p| self.value(p)).collect();
                s.push_str(&format!("{name}({})", args.join(", ")));
            }
            JsxAttribute::OtherJavaScript {
                javascript,
                elements_within,
                ..
            } => s.push_str(&self.splice(javascript, elements_within)),
        }
        push_trailing_inline(&mut s, &value.comments().trailing);
        s
    }

    /// Replace element placeholders in code with the printed elements.
    fn splice(&self, javascript: &str, within: &ElementsWithin) -> String {
        if within.is_empty() {
            return javascript.to_string();
        }
        let mut out = String::with_capacity(javascript.len());
        let mut rest = javascript;
        while let Some(i) = rest.find(PLACEHOLDER_PREFIX) {
            out.push_str(&rest[..i]);
            let after = &rest[i + PLACEHOLDER_PREFIX.len()..];
            let Some(end) = after.find("\")") else {
                out.push_str(&rest[i..]);
                return out;
            };
            match Uid::get(&after[..end]).and_then(|uid| within.get(&uid)) {
                Some(element) => out.push_str(&self.flat_element(element)),
                None => out.push_str(&rest[i..i + PLACEHOLDER_PREFIX.len() + end + 2]),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Children can go on separate lines when no text child starts or ends
/// with whitespace and no two text children touch.
fn can_break(children: &[JsxElementChild]) -> bool {
    let mut previous_text = false;
    for child in children {
        let is_text = match child {
            JsxElementChild::TextBlock(t) => {
                if t.text.trim() != t.text || t.text.is_empty() {
                    return false;
                }
                true
            }
            _ => false,
        };
        if is_text && previous_text {
            return false;
        }
        previous_text = is_text;
    }
    true
}

fn comment_lines(comments: &[Comment]) -> String {
    let mut s = String::new();
    for c in comments {
        s.push_str(&c.text);
        s.push('\n');
    }
    s
}

fn push_trailing(s: &mut String, comments: &[Comment]) {
    for c in comments {
        s.push(' ');
        s.push_str(&c.text);
    }
}

fn push_leading_inline(s: &mut String, comments: &[Comment]) {
    for c in comments {
        s.push_str(&c.text);
        s.push(if c.is_line() { '\n' } else { ' ' });
    }
}

fn push_trailing_inline(s: &mut String, comments: &[Comment]) {
    for c in comments {
        s.push(' ');
        s.push_str(&c.text);
        if c.is_line() {
            s.push('\n');
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// A JavaScript string literal for `s`.
pub fn js_string(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Encode the characters JSX text cannot hold literally.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            c => out.push(c),
        }
    }
    out
}
