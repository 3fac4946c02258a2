//! Scanner for the JavaScript the element tree keeps as text.
//!
//! It does not build an AST. It tracks just enough to find where a piece of
//! code ends, to reject unbalanced brackets and unterminated literals, to
//! lift embedded JSX elements out into placeholders, and to collect a
//! best-effort view of the names the code declares and reads.

use super::{FileParser, PResult};
use crate::diagnostics::offset_to_line_col;
use crate::model::{Comment, ElementsWithin, JsxElementChild, ParsedComments, element_placeholder};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

/// Where a scan stops, at bracket depth zero.
pub(super) enum Stop {
    /// Before any of these characters.
    At(&'static [char]),
    /// At the end of a statement: after `;`, before a `}` closing the
    /// enclosing block, or at a newline where the statement can end.
    Statement,
}

/// A scanned piece of code.
pub(super) struct Code {
    /// Code from the first to the last significant token, elements within
    /// replaced by placeholders.
    pub(super) javascript: String,
    /// Comments before the first and after the last significant token.
    pub(super) comments: ParsedComments,
    pub(super) elements_within: ElementsWithin,
    /// Names read, in order of first appearance.
    pub(super) referenced: Vec<String>,
    /// Names declared at the top level of the code.
    pub(super) declared: Vec<String>,
    /// Parameters and nested declarations.
    pub(super) locals: Vec<String>,
    /// Byte offset of the first significant token.
    pub(super) start: usize,
}

impl Code {
    /// Names read but not declared by this code.
    pub(super) fn defined_elsewhere(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in &self.referenced {
            if !self.declared.contains(name)
                && !self.locals.contains(name)
                && !is_global(name)
                && !out.contains(name)
            {
                out.push(name.clone());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    /// After an operator or at the start: `/` opens a regex, `<` opens JSX.
    Operator,
    Operand,
}

#[derive(Debug, Clone, Copy)]
enum LastToken {
    Other,
    /// `)` whose group started at this index of `referenced`.
    CloseParen(usize),
    /// An identifier recorded at this index of `referenced`.
    Ident(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Nothing,
    /// After `const`/`let`/`var`; `top` when at nesting depth zero.
    Variable { top: bool },
    /// After `function`/`class`.
    Name { top: bool },
}

struct Open {
    closer: char,
    offset: usize,
    refs_at_open: usize,
    params: bool,
}

struct Scan {
    out: String,
    sig_end: usize,
    seen: bool,
    start: usize,
    leading: Vec<Comment>,
    pending: Vec<Comment>,
    stack: Vec<Open>,
    prev: Prev,
    last: LastToken,
    after_dot: bool,
    expect: Expect,
    in_var_decl: bool,
    destructure: Option<(usize, bool)>,
    params_next: bool,
    referenced: Vec<String>,
    declared: Vec<String>,
    locals: Vec<String>,
    elements_within: ElementsWithin,
}

impl Scan {
    fn new(start: usize) -> Self {
        Self {
            out: String::new(),
            sig_end: 0,
            seen: false,
            start,
            leading: Vec::new(),
            pending: Vec::new(),
            stack: Vec::new(),
            prev: Prev::Operator,
            last: LastToken::Other,
            after_dot: false,
            expect: Expect::Nothing,
            in_var_decl: false,
            destructure: None,
            params_next: false,
            referenced: Vec::new(),
            declared: Vec::new(),
            locals: Vec::new(),
            elements_within: ElementsWithin::new(),
        }
    }

    fn space(&mut self, c: char) {
        if self.seen {
            self.out.push(c);
        }
    }

    fn comment(&mut self, text: &str) {
        if self.seen {
            self.out.push_str(text);
            self.pending.push(Comment::new(text));
        } else {
            self.leading.push(Comment::new(text));
        }
    }

    fn token(&mut self, text: &str, offset: usize) {
        if !self.seen {
            self.seen = true;
            self.start = offset;
        }
        self.out.push_str(text);
        self.sig_end = self.out.len();
        self.pending.clear();
        self.last = LastToken::Other;
        self.after_dot = false;
    }

    fn last_char(&self) -> Option<char> {
        self.out[..self.sig_end].chars().last()
    }

    fn declare(&mut self, name: &str, top: bool) {
        let target = if top {
            &mut self.declared
        } else {
            &mut self.locals
        };
        if !target.iter().any(|n| n == name) {
            target.push(name.to_string());
        }
    }

    fn finish(mut self) -> Code {
        self.out.truncate(self.sig_end);
        Code {
            javascript: self.out,
            comments: ParsedComments::new(self.leading, self.pending),
            elements_within: self.elements_within,
            referenced: self.referenced,
            declared: self.declared,
            locals: self.locals,
            start: self.start,
        }
    }
}

impl<'s> FileParser<'s> {
    /// Scan code up to `stop`. Embedded JSX elements are parsed and keyed
    /// under `owner`, numbered from `counter`.
    pub(super) fn skim_code(
        &mut self,
        input: &mut &'s str,
        stop: Stop,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<Code> {
        let mut scan = Scan::new(self.offset(input));
        self.scan_until(&mut scan, input, &stop, owner, counter)?;
        Ok(scan.finish())
    }

    fn scan_until(
        &mut self,
        scan: &mut Scan,
        input: &mut &'s str,
        stop: &Stop,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<()> {
        let base = scan.stack.len();
        loop {
            let Some(c) = input.chars().next() else {
                if scan.stack.len() > base {
                    let open = &scan.stack[scan.stack.len() - 1];
                    return Err(self.error_at(
                        open.offset,
                        open.offset + 1,
                        format!("unclosed `{}`", opener_of(open.closer)),
                    ));
                }
                return match stop {
                    Stop::At(_) => Err(self.error(input, 0, "unexpected end of input")),
                    Stop::Statement => Ok(()),
                };
            };
            let offset = self.offset(input);

            if scan.stack.len() == base {
                match stop {
                    Stop::At(chars) if chars.contains(&c) => return Ok(()),
                    Stop::Statement if c == '}' => return Ok(()),
                    Stop::Statement if c == ';' => {
                        scan.token(";", offset);
                        scan.in_var_decl = false;
                        *input = &input[1..];
                        return Ok(());
                    }
                    Stop::Statement
                        if c == '\n'
                            && scan.seen
                            && statement_ends(&scan.out[..scan.sig_end], &input[1..]) =>
                    {
                        return Ok(());
                    }
                    _ => {}
                }
            }

            if c.is_whitespace() {
                scan.space(c);
                *input = &input[c.len_utf8()..];
                continue;
            }
            if input.starts_with("//") {
                let end = input.find('\n').unwrap_or(input.len());
                let text = input[..end].trim_end_matches('\r');
                scan.comment(text);
                *input = &input[text.len()..];
                continue;
            }
            if input.starts_with("/*") {
                let Some(end) = input[2..].find("*/") else {
                    return Err(self.error(input, 2, "unterminated comment"));
                };
                scan.comment(&input[..end + 4]);
                *input = &input[end + 4..];
                continue;
            }

            match c {
                '\'' | '"' => {
                    let before = *input;
                    let raw = string_literal_raw
                        .parse_next(input)
                        .map_err(|_| self.error(before, 1, "unterminated string literal"))?;
                    scan.token(raw, offset);
                    scan.prev = Prev::Operand;
                }
                '`' => {
                    self.template(scan, input, owner, counter)?;
                    scan.prev = Prev::Operand;
                }
                '/' if scan.prev == Prev::Operator => {
                    let len = regex_len(input)
                        .ok_or_else(|| self.error(input, 1, "unterminated regular expression"))?;
                    scan.token(&input[..len], offset);
                    *input = &input[len..];
                    scan.prev = Prev::Operand;
                }
                '(' | '[' | '{' => {
                    let closer = match c {
                        '(' => ')',
                        '[' => ']',
                        _ => '}',
                    };
                    if let Expect::Variable { top } = scan.expect {
                        if c != '(' {
                            scan.destructure = Some((scan.stack.len() + 1, top));
                        }
                    }
                    scan.expect = Expect::Nothing;
                    let params = c == '(' && scan.params_next;
                    scan.params_next = false;
                    scan.token(&input[..1], offset);
                    scan.stack.push(Open {
                        closer,
                        offset,
                        refs_at_open: scan.referenced.len(),
                        params,
                    });
                    *input = &input[1..];
                    scan.prev = Prev::Operator;
                }
                ')' | ']' | '}' => {
                    let matches = scan.stack.len() > base
                        && scan.stack.last().is_some_and(|open| open.closer == c);
                    if !matches {
                        return Err(self.error(input, 1, format!("unexpected `{c}`")));
                    }
                    let Some(open) = scan.stack.pop() else {
                        return Err(self.error(input, 1, format!("unexpected `{c}`")));
                    };
                    if scan
                        .destructure
                        .is_some_and(|(depth, _)| scan.stack.len() < depth)
                    {
                        scan.destructure = None;
                    }
                    if open.params {
                        let start = open.refs_at_open.min(scan.referenced.len());
                        let params: Vec<String> = scan.referenced.drain(start..).collect();
                        scan.locals.extend(params);
                    }
                    scan.token(&input[..1], offset);
                    *input = &input[1..];
                    if c == ')' {
                        scan.last = LastToken::CloseParen(open.refs_at_open);
                    }
                    scan.prev = if c == '}' {
                        Prev::Operator
                    } else {
                        Prev::Operand
                    };
                }
                '<' if self.jsx_enabled
                    && scan.prev == Prev::Operator
                    && input[1..]
                        .chars()
                        .next()
                        .is_some_and(|n| is_ident_start(n) || n == '>') =>
                {
                    self.element_within(scan, input, owner, counter)?;
                    scan.prev = Prev::Operand;
                }
                c if is_ident_start(c) => {
                    let before_char = scan.last_char();
                    let after_dot = scan.after_dot;
                    let word = identifier
                        .parse_next(input)
                        .map_err(|_| self.error(input, c.len_utf8(), "expected identifier"))?;
                    scan.token(word, offset);
                    self.identifier(scan, word, before_char, after_dot, input);
                }
                c if c.is_ascii_digit()
                    || (c == '.' && input[1..].starts_with(|n: char| n.is_ascii_digit())) =>
                {
                    let len = number_len(input);
                    scan.token(&input[..len], offset);
                    *input = &input[len..];
                    scan.prev = Prev::Operand;
                }
                '.' if input.starts_with("...") => {
                    scan.token("...", offset);
                    *input = &input[3..];
                    scan.prev = Prev::Operator;
                }
                '.' => {
                    scan.token(".", offset);
                    scan.after_dot = true;
                    *input = &input[1..];
                    scan.prev = Prev::Operator;
                }
                '?' if input.starts_with("?.")
                    && !input[2..].starts_with(|n: char| n.is_ascii_digit()) =>
                {
                    scan.token("?.", offset);
                    scan.after_dot = true;
                    *input = &input[2..];
                    scan.prev = Prev::Operator;
                }
                '=' if input.starts_with("=>") => {
                    match scan.last {
                        LastToken::CloseParen(start) => {
                            let start = start.min(scan.referenced.len());
                            let params: Vec<String> = scan.referenced.drain(start..).collect();
                            scan.locals.extend(params);
                        }
                        LastToken::Ident(i) if i < scan.referenced.len() => {
                            let name = scan.referenced.remove(i);
                            scan.locals.push(name);
                        }
                        _ => {}
                    }
                    scan.token("=>", offset);
                    *input = &input[2..];
                    scan.prev = Prev::Operator;
                }
                ',' => {
                    if scan.in_var_decl && scan.stack.is_empty() {
                        scan.expect = Expect::Variable { top: true };
                    }
                    scan.token(",", offset);
                    *input = &input[1..];
                    scan.prev = Prev::Operator;
                }
                _ => {
                    let len = c.len_utf8();
                    scan.token(&input[..len], offset);
                    *input = &input[len..];
                    scan.expect = Expect::Nothing;
                    scan.prev = Prev::Operator;
                }
            }
        }
    }

    fn identifier(
        &mut self,
        scan: &mut Scan,
        word: &str,
        before_char: Option<char>,
        after_dot: bool,
        rest: &str,
    ) {
        if after_dot {
            scan.prev = Prev::Operand;
            return;
        }
        let top = scan.stack.is_empty();
        match word {
            "const" | "let" | "var" => {
                scan.expect = Expect::Variable { top };
                if top {
                    scan.in_var_decl = true;
                }
                scan.prev = Prev::Operator;
            }
            "function" | "class" => {
                scan.expect = Expect::Name { top };
                scan.params_next = word == "function";
                scan.prev = Prev::Operator;
            }
            "this" | "super" | "null" | "true" | "false" | "undefined" => {
                scan.prev = Prev::Operand;
            }
            w if is_keyword(w) => {
                scan.prev = Prev::Operator;
            }
            _ => {
                scan.prev = Prev::Operand;
                let next = rest.trim_start().chars().next();
                match scan.expect {
                    Expect::Variable { top } | Expect::Name { top } => {
                        scan.declare(word, top);
                        scan.expect = Expect::Nothing;
                        return;
                    }
                    Expect::Nothing => {}
                }
                if let Some((depth, top)) = scan.destructure {
                    if scan.stack.len() >= depth {
                        if next != Some(':') {
                            scan.declare(word, top);
                        }
                        return;
                    }
                }
                let object_key = next == Some(':')
                    && scan.stack.last().is_some_and(|o| o.closer == '}')
                    && matches!(before_char, Some('{' | ','));
                if !object_key {
                    scan.referenced.push(word.to_string());
                    scan.last = LastToken::Ident(scan.referenced.len() - 1);
                }
            }
        }
    }

    fn template(
        &mut self,
        scan: &mut Scan,
        input: &mut &'s str,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<()> {
        let open = self.offset(input);
        scan.token("`", open);
        *input = &input[1..];
        loop {
            let offset = self.offset(input);
            let Some(c) = input.chars().next() else {
                return Err(self.error_at(open, open + 1, "unterminated template literal"));
            };
            if c == '\\' {
                let len = 1 + input[1..].chars().next().map_or(0, char::len_utf8);
                scan.token(&input[..len], offset);
                *input = &input[len..];
            } else if c == '`' {
                scan.token("`", offset);
                *input = &input[1..];
                return Ok(());
            } else if input.starts_with("${") {
                scan.token("${", offset);
                *input = &input[2..];
                scan.prev = Prev::Operator;
                self.scan_until(scan, input, &Stop::At(&['}']), owner, counter)?;
                let offset = self.offset(input);
                scan.token("}", offset);
                *input = &input[1..];
            } else if c == '$' {
                scan.token("$", offset);
                *input = &input[1..];
            } else {
                let chunk = take_till::<_, _, ContextError>(1.., ['\\', '`', '$'])
                    .parse_next(input)
                    .map_err(|_| self.error_at(open, open + 1, "unterminated template literal"))?;
                scan.token(chunk, offset);
            }
        }
    }

    /// A JSX element inside code becomes a placeholder. Fragments have no
    /// UID to key them by, so they stay as text.
    fn element_within(
        &mut self,
        scan: &mut Scan,
        input: &mut &'s str,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<()> {
        let offset = self.offset(input);
        let n = *counter;
        let key = format!("{owner}/w{n}");
        let checkpoint = self.checkpoint();
        let before = *input;
        *counter += 1;
        match self.parse_jsx(input, &key)? {
            JsxElementChild::Element(element) => {
                if element.name.base.starts_with(char::is_uppercase) {
                    scan.referenced.push(element.name.base.clone());
                }
                scan.token(&element_placeholder(element.uid), offset);
                scan.elements_within.insert(element.uid, element);
            }
            _ => {
                self.restore(checkpoint);
                *counter = n;
                let raw = &before[..before.len() - input.len()];
                scan.token(raw, offset);
            }
        }
        Ok(())
    }
}

// ─── Token helpers ───────────────────────────────────────────────────────

/// A quoted string literal, escapes left as written.
pub(super) fn string_literal_raw<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let start = *input;
    let quote = one_of(['\'', '"']).parse_next(input)?;
    loop {
        let Some(c) = input.chars().next() else {
            return Err(ErrMode::Backtrack(ContextError::new()));
        };
        match c {
            '\\' => {
                let len = 1 + input[1..].chars().next().map_or(0, char::len_utf8);
                *input = &input[len..];
            }
            '\n' => return Err(ErrMode::Backtrack(ContextError::new())),
            c if c == quote => {
                *input = &input[1..];
                return Ok(&start[..start.len() - input.len()]);
            }
            c => *input = &input[c.len_utf8()..],
        }
    }
}

/// Decode a JavaScript string literal (quotes included) to its value.
pub(super) fn decode_js_string(raw: &str) -> String {
    let inner = &raw[1..raw.len().saturating_sub(1).max(1)];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Length of the regex literal at the start of `input`, flags included.
fn regex_len(input: &str) -> Option<usize> {
    let mut in_class = false;
    let mut escaped = false;
    for (i, c) in input.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\n' => return None,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let end = i + 1;
                let flags = input[end..]
                    .find(|ch: char| !is_ident_char(ch))
                    .unwrap_or(input.len() - end);
                return Some(end + flags);
            }
            _ => {}
        }
    }
    None
}

fn number_len(input: &str) -> usize {
    let hex = input.starts_with("0x") || input.starts_with("0X");
    let mut len = 0;
    for c in input.chars() {
        let sign_after_exponent =
            matches!(c, '+' | '-') && !hex && input[..len].ends_with(['e', 'E']);
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' || sign_after_exponent {
            len += 1;
        } else {
            break;
        }
    }
    len
}

/// Can the statement scanned so far end at this newline?
fn statement_ends(code: &str, rest: &str) -> bool {
    let code = code.trim_end();
    if !(code.ends_with("++") || code.ends_with("--"))
        && code.ends_with([
            '=', '+', '-', '*', '/', '%', '&', '|', '^', '!', '?', ':', ',', '.', '<', '>', '~',
            '(', '[', '{',
        ])
    {
        return false;
    }
    let last_word = code
        .rsplit(|c: char| !is_ident_char(c))
        .next()
        .unwrap_or_default();
    if matches!(
        last_word,
        "extends" | "in" | "instanceof" | "typeof" | "new" | "delete" | "void" | "await" | "else"
            | "do" | "case"
    ) {
        return false;
    }

    let mut next = rest;
    loop {
        next = next.trim_start();
        if next.starts_with("//") {
            next = next.find('\n').map_or("", |i| &next[i..]);
        } else if next.starts_with("/*") {
            match next[2..].find("*/") {
                Some(i) => next = &next[i + 4..],
                None => return true,
            }
        } else {
            break;
        }
    }
    if next.is_empty() {
        return true;
    }
    if next.starts_with([
        '.', '?', ':', '=', '+', '-', '*', '%', '&', '|', '^', ',', '>', ')', ']', '/', '(', '[',
        '`',
    ]) {
        return false;
    }
    !["else", "catch", "finally", "instanceof", "in", "of", "extends"]
        .iter()
        .any(|kw| {
            next.starts_with(kw) && !next[kw.len()..].starts_with(is_ident_char)
        })
}

fn opener_of(closer: char) -> char {
    match closer {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

/// Strip up to `column` leading spaces or tabs from every line but the
/// first, undoing the indentation the code had in its source position.
pub(super) fn dedent(text: &str, column: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i == 0 {
            out.push_str(line);
            continue;
        }
        out.push('\n');
        let strip = line
            .chars()
            .take(column)
            .take_while(|c| matches!(c, ' ' | '\t'))
            .count();
        out.push_str(&line[strip..]);
    }
    out
}

/// 0-based column of a byte offset.
pub(super) fn column_of(source: &str, offset: usize) -> usize {
    offset_to_line_col(source, offset).1 as usize
}

/// Split on `sep` outside brackets and string literals.
pub(super) fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// An identifier or keyword.
pub(super) fn identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (one_of(is_ident_start), take_while(0.., is_ident_char))
        .take()
        .parse_next(input)
}

pub(super) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(super) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

pub(super) fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "as" | "async"
            | "await"
            | "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "from"
            | "function"
            | "if"
            | "implements"
            | "import"
            | "in"
            | "instanceof"
            | "interface"
            | "let"
            | "new"
            | "null"
            | "of"
            | "return"
            | "static"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "type"
            | "typeof"
            | "undefined"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
    )
}

/// Names every module can read without declaring them.
fn is_global(name: &str) -> bool {
    matches!(
        name,
        "Array"
            | "Boolean"
            | "Date"
            | "Error"
            | "Infinity"
            | "JSON"
            | "Map"
            | "Math"
            | "NaN"
            | "Number"
            | "Object"
            | "Promise"
            | "RegExp"
            | "Set"
            | "String"
            | "Symbol"
            | "arguments"
            | "clearInterval"
            | "clearTimeout"
            | "console"
            | "document"
            | "fetch"
            | "globalThis"
            | "parseFloat"
            | "parseInt"
            | "require"
            | "setInterval"
            | "setTimeout"
            | "window"
    )
}
