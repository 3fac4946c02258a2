//! Parser for JSX-flavoured source modules → [`ParsedTextFile`].
//!
//! Built on `winnow` 0.7 token parsers plus a hand-driven scanner for the
//! parts of JavaScript the element tree does not model. Handles: directive
//! prologues, imports, exports, components (function declarations, arrow
//! functions and plain JSX values), arbitrary code with embedded elements,
//! comments, and UID assignment for every JSX element.
//!
//! The parser never panics on bad input and never returns `Err`: syntax
//! problems come back as [`ParsedTextFile::Failure`] with positioned
//! messages.

mod code;
mod imports;
mod jsx;

use crate::diagnostics::{error_message, highlight_bounds};
use crate::model::*;
use crate::uid::{UID_ATTRIBUTE, Uid, generate_consistent_uid};
use code::{Stop, dedent};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use winnow::prelude::*;

/// Extensions the parser understands; anything else is passed through.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

/// Does `file_name` name a source module the parser handles?
pub fn is_parseable_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext))
}

/// Parse a source file.
///
/// `previous` is the last successful parse of the same file; elements at
/// the same structural position with the same name keep their UIDs when
/// the source does not spell one out. `existing_uids` are UIDs claimed by
/// other files, which freshly generated UIDs avoid.
#[must_use = "parsing result should be used"]
pub fn parse_code(
    file_name: &str,
    source: &str,
    previous: Option<&ParseSuccess>,
    existing_uids: &HashSet<Uid>,
) -> ParsedTextFile {
    if !is_parseable_file(file_name) {
        return ParsedTextFile::Unparsed;
    }
    let mut parser = FileParser::new(file_name, source, previous, existing_uids);
    match parser.parse_file() {
        Ok(success) => {
            debug!(
                "parsed {file_name}: {} top-level elements, {} imports",
                success.top_level_elements.len(),
                success.imports.len()
            );
            ParsedTextFile::Success(success)
        }
        Err(e) => {
            debug!("failed to parse {file_name}: {}", e.message);
            ParsedTextFile::Failure(vec![error_message(
                file_name, source, e.start, e.end, e.message,
            )])
        }
    }
}

/// [`parse_code`] without a previous parse or external UIDs.
pub fn parse_code_fresh(file_name: &str, source: &str) -> ParsedTextFile {
    parse_code(file_name, source, None, &HashSet::new())
}

// ─── Errors ──────────────────────────────────────────────────────────────

/// A syntax problem at the byte range `start..end` of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxError {
    start: usize,
    end: usize,
    message: String,
}

type PResult<T> = Result<T, SyntaxError>;

// ─── UID assignment ──────────────────────────────────────────────────────

/// Hands out element UIDs for one parse.
struct UidAssigner<'s> {
    /// Structural position → (element name, UID) from the previous parse.
    previous: HashMap<String, (String, Uid)>,
    external: &'s HashSet<Uid>,
    /// Every `data-uid` literal spelled anywhere in the file.
    explicit: HashSet<Uid>,
    used: HashSet<Uid>,
    /// Claim order, so a failed speculative parse can be rolled back.
    log: Vec<Uid>,
}

impl<'s> UidAssigner<'s> {
    fn new(source: &str, previous: Option<&ParseSuccess>, external: &'s HashSet<Uid>) -> Self {
        Self {
            previous: previous.map(previous_positions).unwrap_or_default(),
            external,
            explicit: scan_explicit_uids(source),
            used: HashSet::new(),
            log: Vec::new(),
        }
    }

    fn is_taken(&self, s: &str) -> bool {
        Uid::get(s).is_some_and(|u| self.is_uid_taken(u))
    }

    fn is_uid_taken(&self, uid: Uid) -> bool {
        self.used.contains(&uid) || self.explicit.contains(&uid) || self.external.contains(&uid)
    }

    fn claim(&mut self, uid: Uid) {
        self.used.insert(uid);
        self.log.push(uid);
    }

    /// Claim a UID written in the source. Fails on a second claim in the
    /// same file; a UID another file already owns is replaced.
    fn claim_explicit(&mut self, uid: Uid) -> Result<Uid, String> {
        if self.used.contains(&uid) {
            return Err(format!("duplicate UID `{uid}`"));
        }
        if self.external.contains(&uid) {
            let fresh = generate_consistent_uid(uid.as_str(), |s| self.is_taken(s));
            debug!("UID {uid} is taken by another file, using {fresh}");
            self.claim(fresh);
            return Ok(fresh);
        }
        self.claim(uid);
        Ok(uid)
    }

    /// Reuse the previous UID at `position` or generate a fresh one.
    fn assign(&mut self, position: &str, name: &str) -> Uid {
        if let Some((previous_name, uid)) = self.previous.get(position) {
            if previous_name == name && !self.used.contains(uid) && !self.explicit.contains(uid) {
                let uid = *uid;
                trace!("reusing UID {uid} at {position}");
                self.claim(uid);
                return uid;
            }
        }
        let uid = generate_consistent_uid(&format!("{position}|{name}"), |s| self.is_taken(s));
        self.claim(uid);
        uid
    }

    fn rollback(&mut self, len: usize) {
        for uid in self.log.drain(len..) {
            self.used.remove(&uid);
        }
    }
}

/// Collect every `data-uid="…"` literal in the text, wherever it appears.
fn scan_explicit_uids(source: &str) -> HashSet<Uid> {
    let mut found = HashSet::new();
    let mut rest = source;
    while let Some(i) = rest.find(UID_ATTRIBUTE) {
        rest = &rest[i + UID_ATTRIBUTE.len()..];
        let Some(after) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let after = after.trim_start();
        let Some(quote) = after.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            continue;
        };
        if let Some(end) = after[1..].find(quote) {
            let value = &after[1..1 + end];
            if Uid::is_valid(value) {
                found.insert(Uid::intern(value));
            }
        }
    }
    found
}

fn component_key(name: Option<&str>) -> String {
    format!("c:{}", name.unwrap_or("default"))
}

/// Index the elements of a previous parse by structural position.
///
/// Keys: `c:Name` for a component's root, `/i` for the i-th child, `@key`
/// for an attribute, `/wN` for the N-th element within a piece of code,
/// `:body` for code before a component's `return`, `bN` for the N-th
/// top-level code block.
fn previous_positions(previous: &ParseSuccess) -> HashMap<String, (String, Uid)> {
    let mut map = HashMap::new();
    let mut block_index = 0;
    for element in &previous.top_level_elements {
        match element {
            TopLevelElement::Component(c) => {
                let key = component_key(c.name.as_deref());
                if let Some(block) = &c.arbitrary_js_block {
                    record_within(
                        &mut map,
                        &format!("{key}:body"),
                        &mut 0,
                        &block.javascript,
                        &block.elements_within,
                    );
                }
                record_child(&mut map, &key, &c.root_element);
            }
            TopLevelElement::ArbitraryJsBlock(block) => {
                record_within(
                    &mut map,
                    &format!("b{block_index}"),
                    &mut 0,
                    &block.javascript,
                    &block.elements_within,
                );
                block_index += 1;
            }
            TopLevelElement::ImportStatement(_) | TopLevelElement::UnparsedCode(_) => {}
        }
    }
    map
}

fn record_child(map: &mut HashMap<String, (String, Uid)>, key: &str, child: &JsxElementChild) {
    match child {
        JsxElementChild::Element(e) => record_element(map, key, e),
        JsxElementChild::Fragment(f) => {
            for (i, c) in f.children.iter().enumerate() {
                record_child(map, &format!("{key}/{i}"), c);
            }
        }
        JsxElementChild::ArbitraryBlock(b) => {
            record_within(map, key, &mut 0, &b.javascript, &b.elements_within);
        }
        JsxElementChild::TextBlock(_) => {}
    }
}

fn record_element(map: &mut HashMap<String, (String, Uid)>, key: &str, element: &JsxElement) {
    map.entry(key.to_string())
        .or_insert_with(|| (element.name.to_string(), element.uid));
    let mut spreads = 0;
    for entry in &element.attributes {
        match entry {
            JsxAttributeEntry::Entry { key: k, value } => {
                record_attribute(map, &format!("{key}@{k}"), &mut 0, value);
            }
            JsxAttributeEntry::Spread { value } => {
                record_attribute(map, &format!("{key}@...{spreads}"), &mut 0, value);
                spreads += 1;
            }
        }
    }
    for (i, c) in element.children.iter().enumerate() {
        record_child(map, &format!("{key}/{i}"), c);
    }
}

fn record_attribute(
    map: &mut HashMap<String, (String, Uid)>,
    owner: &str,
    n: &mut usize,
    value: &JsxAttribute,
) {
    match value {
        JsxAttribute::Value { .. } => {}
        JsxAttribute::NestedArray { content, .. } => {
            for element in content {
                let (ArrayElement::Value(v) | ArrayElement::Spread(v)) = element;
                record_attribute(map, owner, n, v);
            }
        }
        JsxAttribute::NestedObject { content, .. } => {
            for property in content {
                let (ObjectProperty::Assignment { value, .. } | ObjectProperty::Spread { value, .. }) =
                    property;
                record_attribute(map, owner, n, value);
            }
        }
        JsxAttribute::FunctionCall { parameters, .. } => {
            for p in parameters {
                record_attribute(map, owner, n, p);
            }
        }
        JsxAttribute::OtherJavaScript {
            javascript,
            elements_within,
            ..
        } => record_within(map, owner, n, javascript, elements_within),
    }
}

fn record_within(
    map: &mut HashMap<String, (String, Uid)>,
    owner: &str,
    n: &mut usize,
    javascript: &str,
    within: &ElementsWithin,
) {
    for uid in placeholder_uids(javascript) {
        if let Some(e) = within.get(&uid) {
            record_element(map, &format!("{owner}/w{n}"), e);
        }
        *n += 1;
    }
}

// ─── Parser state ────────────────────────────────────────────────────────

struct FileParser<'s> {
    source: &'s str,
    /// `.ts` files have no JSX; `<` there is a type argument or comparison.
    jsx_enabled: bool,
    uids: UidAssigner<'s>,
    bounds: Vec<(Uid, HighlightBounds)>,
}

/// Rollback point for speculative parses.
#[derive(Clone, Copy)]
struct Checkpoint {
    uids: usize,
    bounds: usize,
}

/// Top-level elements collected so far.
#[derive(Default)]
struct FileBuilder {
    elements: Vec<TopLevelElement>,
    imports: Imports,
    exports: Vec<ExportDetail>,
    pragma: Option<String>,
    block_count: usize,
    /// Elements-within counter of the block the next statement may join.
    block_counter: usize,
    /// Names declared by the most recent arbitrary statement.
    last_statement_declared: Vec<String>,
}

impl<'s> FileParser<'s> {
    fn new(
        file_name: &'s str,
        source: &'s str,
        previous: Option<&ParseSuccess>,
        existing_uids: &'s HashSet<Uid>,
    ) -> Self {
        Self {
            source,
            jsx_enabled: !file_name.ends_with(".ts"),
            uids: UidAssigner::new(source, previous, existing_uids),
            bounds: Vec::new(),
        }
    }

    fn offset(&self, input: &str) -> usize {
        self.source.len() - input.len()
    }

    fn error(&self, input: &str, len: usize, message: impl Into<String>) -> SyntaxError {
        let start = self.offset(input);
        SyntaxError {
            start,
            end: (start + len).min(self.source.len()),
            message: message.into(),
        }
    }

    fn error_at(&self, start: usize, end: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            start,
            end,
            message: message.into(),
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            uids: self.uids.log.len(),
            bounds: self.bounds.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.uids.rollback(checkpoint.uids);
        self.bounds.truncate(checkpoint.bounds);
    }

    fn record_bounds(&mut self, uid: Uid, start: usize, end: usize) {
        self.bounds
            .push((uid, highlight_bounds(self.source, start, end)));
    }

    // ─── File ────────────────────────────────────────────────────────────

    fn parse_file(&mut self) -> PResult<ParseSuccess> {
        let mut input: &'s str = self.source;
        let mut file = FileBuilder::default();
        let mut in_prologue = true;

        loop {
            let leading = self.collect_comments(&mut input)?;
            if file.pragma.is_none() {
                file.pragma = leading.iter().find_map(|c| jsx_pragma(&c.text));
            }
            if input.is_empty() {
                if !leading.is_empty() {
                    file.push_block(leading, ArbitraryJsBlock::default());
                }
                break;
            }
            if let Some(c) = input.chars().next().filter(|c| matches!(c, '}' | ')' | ']')) {
                return Err(self.error(input, 1, format!("unexpected `{c}`")));
            }

            if in_prologue && (input.starts_with('\'') || input.starts_with('"')) {
                if let Some(raw) = self.directive(&mut input) {
                    let mut text = comments_text(&leading);
                    text.push_str(raw);
                    file.elements
                        .push(TopLevelElement::UnparsedCode(UnparsedCode { raw: text }));
                    continue;
                }
            }
            in_prologue = false;

            if starts_with_keyword(input, "import")
                && !matches!(input["import".len()..].trim_start().chars().next(), Some('(' | '.'))
            {
                self.import_statement(&mut input, leading, &mut file)?;
            } else if starts_with_keyword(input, "export") {
                self.export_statement(&mut input, leading, &mut file)?;
            } else if let Some(mut component) = self.try_component(&mut input, false)? {
                component.comments.leading = leading;
                component.comments.trailing = self.collect_trailing_comments(&mut input)?;
                file.elements.push(TopLevelElement::Component(component));
            } else {
                self.arbitrary_statement(&mut input, leading, &mut file)?;
            }
        }

        Ok(self.finish(file))
    }

    fn finish(&mut self, file: FileBuilder) -> ParseSuccess {
        let jsx_factory_function = file
            .pragma
            .or_else(|| factory_from_imports(&file.imports));
        let combined = combine_blocks(&file.elements);
        ParseSuccess {
            imports: file.imports,
            top_level_elements: file.elements,
            combined_top_level_arbitrary_block: combined,
            exports_detail: file.exports,
            jsx_factory_function,
            highlight_bounds: self.bounds.drain(..).collect(),
        }
    }

    /// `'use client';` style string statements at the top of the file. A
    /// comment on the same line stays with the directive.
    fn directive(&self, input: &mut &'s str) -> Option<&'s str> {
        let start = *input;
        let mut rest = start;
        code::string_literal_raw(&mut rest).ok()?;
        let after = rest.trim_start_matches([' ', '\t']);
        let after = after.strip_prefix(';').unwrap_or(after);
        let line_end = after.trim_start_matches([' ', '\t']);
        let after = if line_end.starts_with("//") {
            let comment = line_end.find('\n').map_or(line_end, |i| &line_end[..i]);
            &line_end[comment.trim_end_matches('\r').len()..]
        } else if line_end.is_empty() || line_end.starts_with('\n') || line_end.starts_with("\r\n") {
            after
        } else {
            return None;
        };
        *input = after;
        Some(&start[..start.len() - after.len()])
    }

    fn import_statement(
        &mut self,
        input: &mut &'s str,
        leading: Vec<Comment>,
        file: &mut FileBuilder,
    ) -> PResult<()> {
        let start = *input;
        let (module, details) = imports::import_declaration
            .parse_next(input)
            .map_err(|_| self.error(start, "import".len(), "malformed import statement"))?;
        let mut rest = *input;
        skip_inline_space(&mut rest);
        if let Some(after) = rest.strip_prefix(';') {
            *input = after;
        }
        let raw = start[..start.len() - input.len()].to_string();
        let trailing = self.collect_trailing_comments(input)?;
        file.imports.entry(module.clone()).or_default().merge(&details);
        file.elements
            .push(TopLevelElement::ImportStatement(ImportStatement {
                raw,
                module,
                details,
                comments: ParsedComments::new(leading, trailing),
            }));
        Ok(())
    }

    fn export_statement(
        &mut self,
        input: &mut &'s str,
        leading: Vec<Comment>,
        file: &mut FileBuilder,
    ) -> PResult<()> {
        let start = *input;
        let mut rest = &input["export".len()..];
        skip_ws(&mut rest);

        if starts_with_keyword(rest, "default") {
            let mut body = &rest["default".len()..];
            skip_ws(&mut body);
            if starts_with_keyword(body, "function") {
                *input = body;
                if let Some(mut component) = self.try_component(input, true)? {
                    file.exports.push(ExportDetail::DefaultFunctionOrClass {
                        name: component.name.clone(),
                    });
                    component.comments.leading = leading;
                    component.comments.trailing = self.collect_trailing_comments(input)?;
                    file.elements.push(TopLevelElement::Component(component));
                    return Ok(());
                }
                *input = start;
                let name = declared_name_after(body, "function");
                file.exports
                    .push(ExportDetail::DefaultFunctionOrClass { name });
            } else if starts_with_keyword(body, "class") {
                let name = declared_name_after(body, "class");
                file.exports
                    .push(ExportDetail::DefaultFunctionOrClass { name });
            } else {
                let mut probe = body;
                let name = code::identifier
                    .parse_next(&mut probe)
                    .ok()
                    .filter(|_| {
                        let after = probe.trim_start_matches([' ', '\t']);
                        after.is_empty() || after.starts_with([';', '\n', '\r'])
                    })
                    .map(str::to_string);
                file.exports.push(ExportDetail::DefaultExpression { name });
            }
            return self.arbitrary_statement(input, leading, file);
        }

        if starts_with_keyword(rest, "function")
            || ["const", "let", "var"]
                .iter()
                .any(|kw| starts_with_keyword(rest, kw))
        {
            *input = rest;
            if let Some(mut component) = self.try_component(input, false)? {
                let name = component.name.clone().unwrap_or_default();
                file.exports.push(if component.declaration_syntax
                    == FunctionDeclarationSyntax::Function
                {
                    ExportDetail::Function { name }
                } else {
                    ExportDetail::Variables { names: vec![name] }
                });
                component.comments.leading = leading;
                component.comments.trailing = self.collect_trailing_comments(input)?;
                file.elements.push(TopLevelElement::Component(component));
                return Ok(());
            }
            *input = start;
            if starts_with_keyword(rest, "function") {
                if let Some(name) = declared_name_after(rest, "function") {
                    file.exports.push(ExportDetail::Function { name });
                }
                return self.arbitrary_statement(input, leading, file);
            }
            self.arbitrary_statement(input, leading, file)?;
            let names = std::mem::take(&mut file.last_statement_declared);
            file.exports.push(ExportDetail::Variables { names });
            return Ok(());
        }

        if starts_with_keyword(rest, "class") {
            if let Some(name) = declared_name_after(rest, "class") {
                file.exports.push(ExportDetail::Class { name });
            }
            return self.arbitrary_statement(input, leading, file);
        }

        let mut clause = rest;
        if let Ok(detail) = imports::export_clause.parse_next(&mut clause) {
            file.exports.push(detail);
        }
        self.arbitrary_statement(input, leading, file)
    }

    /// A statement the element tree does not model, kept as code. Joins the
    /// previous top-level block when there is nothing between them.
    fn arbitrary_statement(
        &mut self,
        input: &mut &'s str,
        leading: Vec<Comment>,
        file: &mut FileBuilder,
    ) -> PResult<()> {
        let joining = matches!(
            file.elements.last(),
            Some(TopLevelElement::ArbitraryJsBlock(_))
        );
        let index = if joining {
            file.block_count.saturating_sub(1)
        } else {
            file.block_count
        };
        let mut counter = if joining { file.block_counter } else { 0 };
        let before = self.offset(input);
        let code = self.skim_code(input, Stop::Statement, &format!("b{index}"), &mut counter)?;
        if self.offset(input) == before {
            let c = input.chars().next().unwrap_or(' ');
            return Err(self.error(input, 1, format!("unexpected `{c}`")));
        }
        file.block_counter = counter;
        let column = code::column_of(self.source, code.start);
        file.last_statement_declared = code.declared.clone();
        let block = ArbitraryJsBlock {
            javascript: with_trailing_comments(dedent(&code.javascript, column), &code.comments),
            defined_within: code.declared.clone(),
            defined_elsewhere: code.defined_elsewhere(),
            elements_within: code.elements_within,
            comments: ParsedComments::default(),
        };
        file.push_block(leading, block);
        Ok(())
    }

    // ─── Components ──────────────────────────────────────────────────────

    /// Try to read a component declaration. On `None` the input and UID
    /// state are left untouched.
    fn try_component(
        &mut self,
        input: &mut &'s str,
        allow_anonymous: bool,
    ) -> PResult<Option<JsxComponent>> {
        let saved = *input;
        let checkpoint = self.checkpoint();
        let result = if starts_with_keyword(input, "function") {
            self.function_component(input, allow_anonymous)?
        } else if ["const", "let", "var"]
            .iter()
            .any(|kw| starts_with_keyword(input, kw))
        {
            self.variable_component(input)?
        } else {
            None
        };
        if result.is_none() {
            *input = saved;
            self.restore(checkpoint);
        }
        Ok(result)
    }

    fn function_component(
        &mut self,
        input: &mut &'s str,
        allow_anonymous: bool,
    ) -> PResult<Option<JsxComponent>> {
        *input = &input["function".len()..];
        skip_ws(input);
        let name = code::identifier
            .parse_next(input)
            .ok()
            .map(str::to_string);
        if name.is_none() && !allow_anonymous {
            return Ok(None);
        }
        skip_ws(input);
        if !input.starts_with('(') {
            return Ok(None);
        }
        let key = component_key(name.as_deref());
        let Some(params) = self.params(input)? else {
            return Ok(None);
        };
        skip_ws(input);
        if !input.starts_with('{') {
            return Ok(None);
        }
        let body_start = self.offset(input);
        *input = &input[1..];
        let Some(body) = self.component_body(input, &key, body_start)? else {
            return Ok(None);
        };
        trace!("component {key} parsed as function declaration");
        Ok(Some(JsxComponent {
            name,
            is_function: true,
            declaration_syntax: FunctionDeclarationSyntax::Function,
            block_or_expression: BlockOrExpression::Block,
            params,
            root_element: body.root,
            arbitrary_js_block: body.block,
            comments: ParsedComments::default(),
            return_statement_comments: body.return_comments,
        }))
    }

    fn variable_component(&mut self, input: &mut &'s str) -> PResult<Option<JsxComponent>> {
        let declaration_syntax = if starts_with_keyword(input, "const") {
            FunctionDeclarationSyntax::Const
        } else if starts_with_keyword(input, "let") {
            FunctionDeclarationSyntax::Let
        } else {
            FunctionDeclarationSyntax::Var
        };
        *input = &input[declaration_syntax.keyword().len()..];
        skip_ws(input);
        let Ok(name) = code::identifier.parse_next(input) else {
            return Ok(None);
        };
        let name = name.to_string();
        let key = component_key(Some(&name));
        skip_ws(input);
        if !input.starts_with('=') || input.starts_with("==") || input.starts_with("=>") {
            return Ok(None);
        }
        *input = &input[1..];
        if !self.collect_comments(input)?.is_empty() {
            return Ok(None);
        }

        let mut component = JsxComponent {
            name: Some(name),
            is_function: true,
            declaration_syntax,
            block_or_expression: BlockOrExpression::Expression,
            params: Vec::new(),
            root_element: JsxElementChild::Fragment(JsxFragment {
                children: Vec::new(),
            }),
            arbitrary_js_block: None,
            comments: ParsedComments::default(),
            return_statement_comments: ParsedComments::default(),
        };

        if self.jsx_enabled && input.starts_with('<') {
            component.is_function = false;
            component.root_element = self.parse_jsx(input, &key)?;
        } else if input.starts_with('(') && !self.arrow_follows(*input)? {
            component.is_function = false;
            let Some((root, comments)) = self.parenthesized_jsx(input, &key)? else {
                return Ok(None);
            };
            component.root_element = root;
            component.return_statement_comments = comments;
        } else {
            let params = if input.starts_with('(') {
                match self.params(input)? {
                    Some(p) => p,
                    None => return Ok(None),
                }
            } else {
                match code::identifier.parse_next(input) {
                    Ok(p) if !code::is_keyword(p) => vec![p.to_string()],
                    _ => return Ok(None),
                }
            };
            skip_ws(input);
            let Some(after_arrow) = input.strip_prefix("=>") else {
                return Ok(None);
            };
            *input = after_arrow;
            component.params = params;
            let leading = self.collect_comments(input)?;
            if input.starts_with('{') {
                if !leading.is_empty() {
                    return Ok(None);
                }
                let body_start = self.offset(input);
                *input = &input[1..];
                let Some(body) = self.component_body(input, &key, body_start)? else {
                    return Ok(None);
                };
                component.block_or_expression = BlockOrExpression::Block;
                component.root_element = body.root;
                component.arbitrary_js_block = body.block;
                component.return_statement_comments = body.return_comments;
            } else if input.starts_with('(') {
                let Some((root, mut comments)) = self.parenthesized_jsx(input, &key)? else {
                    return Ok(None);
                };
                let mut all = leading;
                all.append(&mut comments.leading);
                comments.leading = all;
                component.root_element = root;
                component.return_statement_comments = comments;
            } else if self.jsx_enabled && input.starts_with('<') {
                component.root_element = self.parse_jsx(input, &key)?;
                component.return_statement_comments = ParsedComments::leading(leading);
            } else {
                return Ok(None);
            }
        }

        // The declaration must end here: `;`, end of line or end of file.
        skip_inline_space(input);
        if input.starts_with(';') {
            *input = &input[1..];
        } else if !(input.is_empty()
            || input.starts_with('\n')
            || input.starts_with("\r\n")
            || input.starts_with("//")
            || input.starts_with("/*"))
        {
            return Ok(None);
        }
        trace!("component {key} parsed as variable declaration");
        Ok(Some(component))
    }

    /// Is the `(` at the start of `input` an arrow function's parameter list?
    fn arrow_follows(&mut self, input: &'s str) -> PResult<bool> {
        let checkpoint = self.checkpoint();
        let mut probe = input;
        let params = self.params(&mut probe)?;
        self.restore(checkpoint);
        skip_ws(&mut probe);
        Ok(params.is_some() && probe.starts_with("=>"))
    }

    /// `( <jsx> )` with comments on either side of the element.
    fn parenthesized_jsx(
        &mut self,
        input: &mut &'s str,
        key: &str,
    ) -> PResult<Option<(JsxElementChild, ParsedComments)>> {
        *input = &input[1..];
        let leading = self.collect_comments(input)?;
        if !(self.jsx_enabled && input.starts_with('<')) {
            return Ok(None);
        }
        let root = self.parse_jsx(input, key)?;
        let trailing = self.collect_comments(input)?;
        if !input.starts_with(')') {
            return Ok(None);
        }
        *input = &input[1..];
        Ok(Some((root, ParsedComments::new(leading, trailing))))
    }

    /// A parenthesised parameter list, split into one string per parameter.
    /// `None` when a parameter default holds JSX.
    fn params(&mut self, input: &mut &'s str) -> PResult<Option<Vec<String>>> {
        let open = self.offset(input);
        *input = &input[1..];
        let mut counter = 0;
        let code = self.skim_code(input, Stop::At(&[')']), "params", &mut counter)?;
        if !input.starts_with(')') {
            return Err(self.error_at(open, open + 1, "unclosed `(`"));
        }
        *input = &input[1..];
        if !code.elements_within.is_empty() || !code.comments.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            code::split_top_level(&code.javascript, ',')
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        ))
    }

    /// Statements of a function body up to a `return <jsx>`, which must be
    /// the last statement. The opening `{` is already consumed.
    fn component_body(
        &mut self,
        input: &mut &'s str,
        key: &str,
        body_start: usize,
    ) -> PResult<Option<ComponentBody>> {
        let owner = format!("{key}:body");
        let mut counter = 0;
        let mut parts: Vec<String> = Vec::new();
        let mut block = ArbitraryJsBlock::default();

        loop {
            let comments = self.collect_comments(input)?;
            if input.is_empty() {
                return Err(self.error_at(body_start, body_start + 1, "unclosed `{`"));
            }
            if input.starts_with('}') {
                return Ok(None);
            }
            if starts_with_keyword(input, "return") {
                *input = &input["return".len()..];
                let mut leading = comments;
                leading.extend(self.collect_comments(input)?);
                let parenthesised = input.starts_with('(');
                if parenthesised {
                    *input = &input[1..];
                    leading.extend(self.collect_comments(input)?);
                }
                if !(self.jsx_enabled && input.starts_with('<')) {
                    return Ok(None);
                }
                let root = self.parse_jsx(input, key)?;
                let mut trailing = Vec::new();
                if parenthesised {
                    trailing = self.collect_comments(input)?;
                    if !input.starts_with(')') {
                        return Ok(None);
                    }
                    *input = &input[1..];
                } else {
                    skip_inline_space(input);
                    if !(input.is_empty()
                        || input.starts_with([';', '\n', '\r', '}'])
                        || input.starts_with("//")
                        || input.starts_with("/*"))
                    {
                        return Ok(None);
                    }
                }
                skip_inline_space(input);
                if input.starts_with(';') {
                    *input = &input[1..];
                }
                trailing.extend(self.collect_comments(input)?);
                if !input.starts_with('}') {
                    let len = input.find('\n').unwrap_or(input.len()).max(1);
                    return Err(self.error(
                        input,
                        len,
                        "component body cannot be reduced to a single root element",
                    ));
                }
                *input = &input[1..];

                let block = if parts.is_empty() {
                    None
                } else {
                    block.javascript = parts.join("\n");
                    block.defined_elsewhere.retain(|n| !block.defined_within.contains(n));
                    Some(block)
                };
                return Ok(Some(ComponentBody {
                    root,
                    block,
                    return_comments: ParsedComments::new(leading, trailing),
                }));
            }

            let before = self.offset(input);
            let code = self.skim_code(input, Stop::Statement, &owner, &mut counter)?;
            if self.offset(input) == before {
                let c = input.chars().next().unwrap_or(' ');
                return Err(self.error(input, 1, format!("unexpected `{c}`")));
            }
            let column = code::column_of(self.source, code.start);
            let mut part = comments_text(&comments);
            part.push_str(&with_trailing_comments(
                dedent(&code.javascript, column),
                &code.comments,
            ));
            parts.push(part);
            extend_unique(&mut block.defined_within, code.declared.iter().cloned());
            extend_unique(&mut block.defined_elsewhere, code.defined_elsewhere());
            block.elements_within.extend(code.elements_within);
        }
    }

    // ─── Comments ────────────────────────────────────────────────────────

    /// Skip whitespace, returning the comments passed on the way.
    fn collect_comments(&self, input: &mut &'s str) -> PResult<Vec<Comment>> {
        let mut comments = Vec::new();
        loop {
            skip_ws(input);
            if input.starts_with("//") {
                let end = input.find('\n').unwrap_or(input.len());
                comments.push(Comment::new(input[..end].trim_end_matches('\r')));
                *input = &input[end..];
            } else if input.starts_with("/*") {
                let Some(end) = input[2..].find("*/") else {
                    return Err(self.error(input, 2, "unterminated comment"));
                };
                comments.push(Comment::new(&input[..end + 4]));
                *input = &input[end + 4..];
            } else {
                return Ok(comments);
            }
        }
    }

    /// Comments that start on the current line.
    fn collect_trailing_comments(&self, input: &mut &'s str) -> PResult<Vec<Comment>> {
        let mut comments = Vec::new();
        loop {
            skip_inline_space(input);
            if input.starts_with("//") {
                let end = input.find('\n').unwrap_or(input.len());
                comments.push(Comment::new(input[..end].trim_end_matches('\r')));
                *input = &input[end..];
                return Ok(comments);
            } else if input.starts_with("/*") {
                let Some(end) = input[2..].find("*/") else {
                    return Err(self.error(input, 2, "unterminated comment"));
                };
                comments.push(Comment::new(&input[..end + 4]));
                *input = &input[end + 4..];
            } else {
                return Ok(comments);
            }
        }
    }
}

struct ComponentBody {
    root: JsxElementChild,
    block: Option<ArbitraryJsBlock>,
    return_comments: ParsedComments,
}

impl FileBuilder {
    fn push_block(&mut self, leading: Vec<Comment>, block: ArbitraryJsBlock) {
        if let Some(TopLevelElement::ArbitraryJsBlock(previous)) = self.elements.last_mut() {
            let mut text = comments_text(&leading);
            text.push_str(&block.javascript);
            if !text.is_empty() {
                if !previous.javascript.is_empty() {
                    previous.javascript.push('\n');
                }
                previous.javascript.push_str(&text);
            }
            extend_unique(&mut previous.defined_within, block.defined_within);
            extend_unique(&mut previous.defined_elsewhere, block.defined_elsewhere);
            let within = previous.defined_within.clone();
            previous.defined_elsewhere.retain(|n| !within.contains(n));
            previous.elements_within.extend(block.elements_within);
            return;
        }
        self.block_count += 1;
        self.elements
            .push(TopLevelElement::ArbitraryJsBlock(ArbitraryJsBlock {
                comments: ParsedComments::leading(leading),
                ..block
            }));
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn skip_ws(input: &mut &str) {
    *input = input.trim_start();
}

fn skip_inline_space(input: &mut &str) {
    *input = input.trim_start_matches([' ', '\t']);
}

fn starts_with_keyword(input: &str, keyword: &str) -> bool {
    input.starts_with(keyword)
        && !input[keyword.len()..]
            .chars()
            .next()
            .is_some_and(code::is_ident_char)
}

/// `function Name` / `class Name` → `Name`.
fn declared_name_after(input: &str, keyword: &str) -> Option<String> {
    let mut rest = input.get(keyword.len()..)?.trim_start();
    code::identifier
        .parse_next(&mut rest)
        .ok()
        .filter(|n| *n != "extends")
        .map(str::to_string)
}

fn comments_text(comments: &[Comment]) -> String {
    let mut out = String::new();
    for c in comments {
        out.push_str(&c.text);
        out.push('\n');
    }
    out
}

fn with_trailing_comments(mut javascript: String, comments: &ParsedComments) -> String {
    for c in &comments.trailing {
        javascript.push(' ');
        javascript.push_str(&c.text);
    }
    javascript
}

fn extend_unique(target: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

/// `/** @jsx h */` → `h`.
fn jsx_pragma(comment: &str) -> Option<String> {
    let mut rest = comment;
    while let Some(i) = rest.find("@jsx") {
        let after = &rest[i + "@jsx".len()..];
        if after.starts_with([' ', '\t']) {
            let name: String = after
                .trim_start()
                .chars()
                .take_while(|c| code::is_ident_char(*c) || *c == '.')
                .collect();
            if !name.is_empty() {
                return Some(name);
            }
        }
        rest = after;
    }
    None
}

/// A React default or namespace import under another name implies that
/// name's `createElement` as the factory.
pub fn factory_from_imports(imports: &Imports) -> Option<String> {
    let react = imports.get("react")?;
    react
        .import_default
        .as_deref()
        .or(react.import_star_as.as_deref())
        .filter(|alias| *alias != "React")
        .map(|alias| format!("{alias}.createElement"))
}

fn combine_blocks(elements: &[TopLevelElement]) -> Option<ArbitraryJsBlock> {
    let mut combined: Option<ArbitraryJsBlock> = None;
    for element in elements {
        let TopLevelElement::ArbitraryJsBlock(block) = element else {
            continue;
        };
        match &mut combined {
            None => combined = Some(block.clone()),
            Some(all) => {
                all.javascript.push('\n');
                all.javascript.push_str(&block.javascript);
                extend_unique(&mut all.defined_within, block.defined_within.iter().cloned());
                extend_unique(
                    &mut all.defined_elsewhere,
                    block.defined_elsewhere.iter().cloned(),
                );
                all.elements_within
                    .extend(block.elements_within.iter().map(|(k, v)| (*k, v.clone())));
            }
        }
    }
    if let Some(all) = &mut combined {
        let within = all.defined_within.clone();
        all.defined_elsewhere.retain(|n| !within.contains(n));
        all.comments = ParsedComments::default();
    }
    combined
}
