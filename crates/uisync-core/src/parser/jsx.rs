//! JSX elements, fragments, attributes and children.

use super::code::{Stop, decode_js_string, identifier, is_ident_char, is_ident_start, string_literal_raw};
use super::{FileParser, PResult, skip_ws};
use crate::model::*;
use crate::uid::{UID_ATTRIBUTE, Uid};
use winnow::combinator::{alt, delimited, opt, repeat};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_till, take_while};

fn is_name_char(c: char) -> bool {
    is_ident_char(c) || matches!(c, '-' | ':' | '.')
}

/// Consume `tag` when the input starts with it.
fn eat(input: &mut &str, tag: &'static str) -> bool {
    literal::<_, _, ContextError>(tag).parse_next(input).is_ok()
}

/// `div`, `my-element`, `svg:path`, `Foo.Bar`.
fn element_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_name_char).parse_next(input)
}

fn attribute_key<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        one_of(is_ident_start),
        take_while(0.., |c: char| is_ident_char(c) || matches!(c, '-' | ':')),
    )
        .take()
        .parse_next(input)
}

/// A quoted JSX attribute string without its quotes. JSX strings have no
/// escapes.
fn jsx_string<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .parse_next(input)
}

/// `name` or `a.b.name`.
fn dotted_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (identifier, repeat::<_, _, (), _, _>(0.., ('.', identifier)))
        .take()
        .parse_next(input)
}

fn number_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        opt('-'),
        take_while(0.., |c: char| c.is_ascii_digit() || c == '.'),
        opt((
            one_of(['e', 'E']),
            opt(one_of(['+', '-'])),
            take_while(1.., |c: char| c.is_ascii_digit()),
        )),
    )
        .take()
        .parse_next(input)
}

impl<'s> FileParser<'s> {
    /// Parse the element or fragment at `<`. `position` is its structural
    /// key for UID reuse.
    pub(super) fn parse_jsx(
        &mut self,
        input: &mut &'s str,
        position: &str,
    ) -> PResult<JsxElementChild> {
        let start = self.offset(input);
        if !eat(input, "<") {
            return Err(self.error(input, 1, "expected `<`"));
        }
        skip_ws(input);
        if eat(input, ">") {
            let children = self.children(input, position, "", start)?;
            return Ok(JsxElementChild::Fragment(JsxFragment { children }));
        }

        let Ok(raw_name) = element_name.parse_next(input) else {
            let len = input.chars().next().map_or(1, char::len_utf8);
            return Err(self.error(input, len, "expected element name"));
        };

        let mut attributes: Vec<JsxAttributeEntry> = Vec::new();
        let mut tag_comments = Vec::new();
        let mut explicit_uid: Option<Uid> = None;
        let mut spreads = 0;
        let self_closing = loop {
            tag_comments.extend(self.collect_comments(input)?);
            if input.is_empty() {
                return Err(self.error_at(start, start + 1, "unclosed element"));
            }
            if eat(input, "/>") {
                break true;
            }
            if eat(input, ">") {
                break false;
            }
            if input.starts_with('{') {
                let open = *input;
                eat(input, "{");
                skip_ws(input);
                if !eat(input, "...") {
                    return Err(self.error(open, 1, "expected `...` in attribute spread"));
                }
                let mut counter = 0;
                let owner = format!("{position}@...{spreads}");
                let value = self
                    .parse_attribute_value(input, &['}'], &owner, &mut counter)?
                    .ok_or_else(|| self.error(input, 1, "empty attribute spread"))?;
                self.close(input, "}")?;
                spreads += 1;
                attributes.push(JsxAttributeEntry::Spread { value });
                continue;
            }

            let key_start = *input;
            let Ok(key) = attribute_key.parse_next(input) else {
                let c = input.chars().next().unwrap_or(' ');
                return Err(self.error(input, c.len_utf8(), format!("unexpected `{c}` in element")));
            };
            skip_ws(input);
            if !eat(input, "=") {
                set_entry(&mut attributes, key, JsxAttribute::value(Literal::Bool(true)));
                continue;
            }
            skip_ws(input);

            if key == UID_ATTRIBUTE {
                let uid = jsx_string
                    .parse_next(input)
                    .ok()
                    .map(decode_entities)
                    .filter(|s| Uid::is_valid(s));
                let begin = self.offset(key_start);
                let end = self.offset(input).max(begin + key.len());
                let Some(uid) = uid else {
                    return Err(self.error_at(begin, end, "malformed data-uid"));
                };
                let uid = self
                    .uids
                    .claim_explicit(Uid::intern(&uid))
                    .map_err(|message| self.error_at(begin, end, message))?;
                explicit_uid = Some(uid);
                continue;
            }

            let value = if input.starts_with(['"', '\'']) {
                let before = *input;
                let Ok(text) = jsx_string.parse_next(input) else {
                    return Err(self.error(before, 1, "unterminated string literal"));
                };
                JsxAttribute::string(decode_entities(text))
            } else if input.starts_with('{') {
                let open = *input;
                eat(input, "{");
                let mut counter = 0;
                let owner = format!("{position}@{key}");
                let value = self
                    .parse_attribute_value(input, &['}'], &owner, &mut counter)?
                    .ok_or_else(|| self.error(open, 2, "empty attribute value"))?;
                self.close(input, "}")?;
                value
            } else if input.starts_with('<') {
                self.element_attribute(input, &format!("{position}@{key}/w0"))?
            } else {
                let c = input.chars().next().unwrap_or(' ');
                return Err(self.error(input, c.len_utf8(), "expected attribute value"));
            };
            set_entry(&mut attributes, key, value);
        };

        let uid = match explicit_uid {
            Some(uid) => uid,
            None => self.uids.assign(position, raw_name),
        };
        let children = if self_closing {
            Vec::new()
        } else {
            self.children(input, position, raw_name, start)?
        };
        self.record_bounds(uid, start, self.offset(input));
        Ok(JsxElementChild::Element(JsxElement {
            name: JsxElementName::parse(raw_name),
            uid,
            attributes,
            children,
            comments: ParsedComments::leading(tag_comments),
        }))
    }

    /// `key=<el/>`: an element given directly as an attribute value.
    fn element_attribute(&mut self, input: &mut &'s str, key: &str) -> PResult<JsxAttribute> {
        let checkpoint = self.checkpoint();
        let before = *input;
        match self.parse_jsx(input, key)? {
            JsxElementChild::Element(element) => {
                let javascript = element_placeholder(element.uid);
                let mut elements_within = ElementsWithin::new();
                elements_within.insert(element.uid, element);
                Ok(JsxAttribute::OtherJavaScript {
                    javascript,
                    elements_within,
                    comments: ParsedComments::default(),
                })
            }
            _ => {
                self.restore(checkpoint);
                let raw = &before[..before.len() - input.len()];
                Ok(JsxAttribute::other_javascript(raw))
            }
        }
    }

    /// Consume the closer a value scan stopped at.
    fn close(&self, input: &mut &'s str, closer: &'static str) -> PResult<()> {
        if eat(input, closer) {
            Ok(())
        } else {
            Err(self.error(input, 1, format!("expected `{closer}`")))
        }
    }

    /// Children up to the closing tag `</closing>`; `closing` is empty for
    /// a fragment.
    fn children(
        &mut self,
        input: &mut &'s str,
        position: &str,
        closing: &str,
        open: usize,
    ) -> PResult<Vec<JsxElementChild>> {
        let mut children = Vec::new();
        loop {
            if input.is_empty() {
                return Err(self.error_at(open, open + 1, "unclosed element"));
            }
            if input.starts_with("</") {
                let close = *input;
                eat(input, "</");
                skip_ws(input);
                let name = opt(element_name).parse_next(input).ok().flatten().unwrap_or("");
                skip_ws(input);
                if name != closing || !eat(input, ">") {
                    let len = close.find('>').map_or(2, |i| i + 1);
                    return Err(self.error(close, len, format!("expected closing tag `</{closing}>`")));
                }
                return Ok(children);
            }
            if input.starts_with('<') {
                let key = format!("{position}/{}", children.len());
                children.push(self.parse_jsx(input, &key)?);
                continue;
            }
            if eat(input, "{") {
                let owner = format!("{position}/{}", children.len());
                let mut counter = 0;
                let code = self.skim_code(input, Stop::At(&['}']), &owner, &mut counter)?;
                self.close(input, "}")?;
                children.push(JsxElementChild::ArbitraryBlock(JsxArbitraryBlock {
                    defined_elsewhere: code.defined_elsewhere(),
                    javascript: code.javascript,
                    elements_within: code.elements_within,
                    comments: code.comments,
                }));
                continue;
            }
            let chunk = take_till::<_, _, ContextError>(0.., ['<', '{'])
                .parse_next(input)
                .unwrap_or_default();
            let text = normalize_text(chunk);
            if !text.is_empty() {
                children.push(JsxElementChild::text(decode_entities(&text)));
            }
        }
    }

    // ─── Attribute values ────────────────────────────────────────────────

    /// An attribute value ending before one of `terminators`. Literals,
    /// arrays, objects and calls are kept structurally when every part of
    /// them is; anything else is kept as code. `None` when the value is
    /// empty.
    pub(super) fn parse_attribute_value(
        &mut self,
        input: &mut &'s str,
        terminators: &'static [char],
        owner: &str,
        counter: &mut usize,
    ) -> PResult<Option<JsxAttribute>> {
        let saved = *input;
        let checkpoint = self.checkpoint();
        let saved_counter = *counter;

        let leading = self.collect_comments(input)?;
        if let Some(mut value) = self.structured_value(input, owner, counter)? {
            let trailing = self.collect_comments(input)?;
            if input.starts_with(terminators) {
                *value.comments_mut() = ParsedComments::new(leading, trailing);
                return Ok(Some(value));
            }
        }

        *input = saved;
        self.restore(checkpoint);
        *counter = saved_counter;
        let code = self.skim_code(input, Stop::At(terminators), owner, counter)?;
        if code.javascript.is_empty() {
            return Ok(None);
        }
        Ok(Some(JsxAttribute::OtherJavaScript {
            javascript: code.javascript,
            elements_within: code.elements_within,
            comments: code.comments,
        }))
    }

    fn structured_value(
        &mut self,
        input: &mut &'s str,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<Option<JsxAttribute>> {
        let Some(c) = input.chars().next() else {
            return Ok(None);
        };
        match c {
            '[' => self.array_value(input, owner, counter),
            '{' => self.object_value(input, owner, counter),
            '\'' | '"' => Ok(string_literal_raw
                .parse_next(input)
                .ok()
                .map(|raw| JsxAttribute::string(decode_js_string(raw)))),
            c if c.is_ascii_digit() || c == '-' || c == '.' => Ok(number(input).map(JsxAttribute::number)),
            c if is_ident_start(c) => {
                let mut word = *input;
                let literal = match identifier.parse_next(&mut word).ok() {
                    Some("null") => Some(Literal::Null),
                    Some("undefined") => Some(Literal::Undefined),
                    Some("true") => Some(Literal::Bool(true)),
                    Some("false") => Some(Literal::Bool(false)),
                    _ => None,
                };
                if let Some(literal) = literal {
                    *input = word;
                    return Ok(Some(JsxAttribute::value(literal)));
                }
                self.call_value(input, owner, counter)
            }
            _ => Ok(None),
        }
    }

    fn array_value(
        &mut self,
        input: &mut &'s str,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<Option<JsxAttribute>> {
        eat(input, "[");
        let mut content = Vec::new();
        loop {
            skip_ws(input);
            if eat(input, "]") {
                break;
            }
            let spread = eat(input, "...");
            let Some(value) = self.parse_attribute_value(input, &[',', ']'], owner, counter)? else {
                return Ok(None);
            };
            content.push(if spread {
                ArrayElement::Spread(value)
            } else {
                ArrayElement::Value(value)
            });
            eat(input, ",");
        }
        Ok(Some(JsxAttribute::NestedArray {
            content,
            comments: ParsedComments::default(),
        }))
    }

    fn object_value(
        &mut self,
        input: &mut &'s str,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<Option<JsxAttribute>> {
        eat(input, "{");
        let mut content = Vec::new();
        loop {
            skip_ws(input);
            if eat(input, "}") {
                break;
            }
            let comments = self.collect_comments(input)?;
            if eat(input, "...") {
                let Some(value) =
                    self.parse_attribute_value(input, &[',', '}'], owner, counter)?
                else {
                    return Ok(None);
                };
                content.push(ObjectProperty::Spread {
                    value,
                    comments: ParsedComments::leading(comments),
                });
            } else {
                let (key, shorthand_allowed) = if input.starts_with(['"', '\'']) {
                    let Ok(raw) = string_literal_raw.parse_next(input) else {
                        return Ok(None);
                    };
                    (decode_js_string(raw), false)
                } else if let Ok(key) = identifier.parse_next(input) {
                    (key.to_string(), true)
                } else {
                    return Ok(None);
                };
                skip_ws(input);
                let value = if eat(input, ":") {
                    let Some(value) =
                        self.parse_attribute_value(input, &[',', '}'], owner, counter)?
                    else {
                        return Ok(None);
                    };
                    value
                } else if shorthand_allowed && input.starts_with([',', '}']) {
                    JsxAttribute::other_javascript(key.clone())
                } else {
                    return Ok(None);
                };
                content.push(ObjectProperty::Assignment {
                    key,
                    value,
                    comments: ParsedComments::leading(comments),
                });
            }
            eat(input, ",");
        }
        Ok(Some(JsxAttribute::NestedObject {
            content,
            comments: ParsedComments::default(),
        }))
    }

    /// `name(args)` or `a.b.name(args)`.
    fn call_value(
        &mut self,
        input: &mut &'s str,
        owner: &str,
        counter: &mut usize,
    ) -> PResult<Option<JsxAttribute>> {
        let Ok(name) = dotted_name.parse_next(input) else {
            return Ok(None);
        };
        skip_ws(input);
        if !eat(input, "(") {
            return Ok(None);
        }
        let mut parameters = Vec::new();
        loop {
            skip_ws(input);
            if eat(input, ")") {
                break;
            }
            let Some(value) = self.parse_attribute_value(input, &[',', ')'], owner, counter)? else {
                return Ok(None);
            };
            parameters.push(value);
            eat(input, ",");
        }
        Ok(Some(JsxAttribute::FunctionCall {
            name: name.to_string(),
            parameters,
            comments: ParsedComments::default(),
        }))
    }
}

fn set_entry(attributes: &mut Vec<JsxAttributeEntry>, key: &str, value: JsxAttribute) {
    let existing = attributes.iter_mut().find_map(|a| match a {
        JsxAttributeEntry::Entry { key: k, value } if k == key => Some(value),
        _ => None,
    });
    match existing {
        Some(slot) => *slot = value,
        None => attributes.push(JsxAttributeEntry::Entry {
            key: key.to_string(),
            value,
        }),
    }
}

/// A decimal number literal, optionally negative. Hex, octal and bigint
/// literals are left to the code path.
fn number(input: &mut &str) -> Option<f64> {
    let mut rest = *input;
    let text = number_literal.parse_next(&mut rest).ok()?;
    if rest.starts_with(is_ident_char) {
        return None;
    }
    let value = text.parse::<f64>().ok()?;
    *input = rest;
    Some(value)
}

/// JSX text whitespace: lines are trimmed where they meet a line break,
/// blank lines dropped and the rest joined by single spaces.
fn normalize_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    let last_non_empty = lines
        .iter()
        .rposition(|l| l.chars().any(|c| !matches!(c, ' ' | '\t' | '\r')));
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.replace('\t', " ");
        let mut text = line.as_str();
        if i != 0 {
            text = text.trim_start_matches([' ', '\r']);
        }
        if i != last {
            text = text.trim_end_matches([' ', '\r']);
        }
        if text.is_empty() {
            continue;
        }
        out.push_str(text);
        if last_non_empty.is_some_and(|l| i < l) {
            out.push(' ');
        }
    }
    out
}

/// Decode HTML character references in JSX text and attribute strings.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let decoded = rest[1..]
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| entity(&rest[1..1 + end]).map(|c| (c, end + 2)));
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "lbrace" => '{',
        "rbrace" => '}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_whitespace() {
        assert_eq!(normalize_text("Hello world"), "Hello world");
        assert_eq!(normalize_text("\n    Hello\n    world\n  "), "Hello world");
        assert_eq!(normalize_text("\n  \n"), "");
        assert_eq!(normalize_text("a\t b "), "a  b ");
        assert_eq!(normalize_text(" lead\n"), " lead");
        assert_eq!(normalize_text(" "), " ");
        assert_eq!(normalize_text("\t"), " ");
    }

    #[test]
    fn tag_tokens() {
        let mut input = "svg:path-x/>";
        assert_eq!(element_name(&mut input).ok(), Some("svg:path-x"));
        assert_eq!(input, "/>");
        let mut input = "/>";
        assert!(element_name(&mut input).is_err());

        let mut input = "aria-label=";
        assert_eq!(attribute_key(&mut input).ok(), Some("aria-label"));
        assert_eq!(input, "=");
        let mut input = "-x";
        assert!(attribute_key(&mut input).is_err());

        let mut input = "'a \"b\"' c";
        assert_eq!(jsx_string(&mut input).ok(), Some("a \"b\""));
        assert_eq!(input, " c");
        let mut input = "\"open";
        assert!(jsx_string(&mut input).is_err());

        let mut input = "Icons.Cart(";
        assert_eq!(dotted_name(&mut input).ok(), Some("Icons.Cart"));
        assert_eq!(input, "(");
        let mut input = "a.(";
        assert_eq!(dotted_name(&mut input).ok(), Some("a"));
        assert_eq!(input, ".(");
    }

    #[test]
    fn eat_only_consumes_a_match() {
        let mut input = "/>rest";
        assert!(!eat(&mut input, ">"));
        assert!(eat(&mut input, "/>"));
        assert_eq!(input, "rest");
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("a &lt; b &amp;&amp; c"), "a < b && c");
        assert_eq!(decode_entities("&#123;x&#x7D;"), "{x}");
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn numbers() {
        let mut input = "-1.5}";
        assert_eq!(number(&mut input), Some(-1.5));
        assert_eq!(input, "}");
        let mut input = "2e3,";
        assert_eq!(number(&mut input), Some(2000.0));
        let mut input = "0x10}";
        assert_eq!(number(&mut input), None);
        assert_eq!(input, "0x10}");
        let mut input = "10n}";
        assert_eq!(number(&mut input), None);
    }
}
