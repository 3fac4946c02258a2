//! `import` declarations and `export { … }` clauses.

use super::code::{decode_js_string, identifier, string_literal_raw};
use crate::model::{ExportAlias, ExportDetail, ImportAlias, ImportDetails};
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn ws(input: &mut &str) {
    loop {
        *input = input.trim_start();
        if input.starts_with("//") {
            *input = input.find('\n').map_or("", |i| &input[i..]);
        } else if let Some(end) = input.strip_prefix("/*").and_then(|r| r.find("*/")) {
            *input = &input[end + 4..];
        } else {
            return;
        }
    }
}

fn keyword(input: &mut &str, word: &'static str) -> ModalResult<()> {
    let mut probe = *input;
    if identifier.parse_next(&mut probe)? == word {
        *input = probe;
        Ok(())
    } else {
        backtrack()
    }
}

fn module_specifier(input: &mut &str) -> ModalResult<String> {
    string_literal_raw.map(decode_js_string).parse_next(input)
}

/// `name` or a string-literal export name (`"a-b"`).
fn binding_name(input: &mut &str) -> ModalResult<String> {
    if input.starts_with(['\'', '"']) {
        return module_specifier(input);
    }
    identifier.map(str::to_string).parse_next(input)
}

/// `{ a, b as c, type D }` as `(name, alias)` pairs.
fn named_list(input: &mut &str) -> ModalResult<Vec<(String, Option<String>)>> {
    '{'.parse_next(input)?;
    let mut names = Vec::new();
    loop {
        ws(input);
        if input.starts_with('}') {
            *input = &input[1..];
            return Ok(names);
        }
        let mut name = binding_name(input)?;
        ws(input);
        // `type X` inside a value import list: drop the modifier.
        if name == "type" && !input.starts_with([',', '}']) && !input.starts_with("as ") {
            name = binding_name(input)?;
            ws(input);
        }
        let alias = if keyword(input, "as").is_ok() {
            ws(input);
            Some(binding_name(input)?)
        } else {
            None
        };
        names.push((name, alias));
        ws(input);
        if input.starts_with(',') {
            *input = &input[1..];
        } else if !input.starts_with('}') {
            return backtrack();
        }
    }
}

/// `import … from 'module'` or `import 'module'`, without the trailing
/// `;`. Type-only imports record no bindings.
pub(super) fn import_declaration(input: &mut &str) -> ModalResult<(String, ImportDetails)> {
    keyword(input, "import")?;
    ws(input);
    let mut details = ImportDetails::default();
    if input.starts_with(['\'', '"']) {
        let module = module_specifier(input)?;
        return Ok((module, details));
    }

    let type_only = {
        let mut probe = *input;
        keyword(&mut probe, "type").is_ok() && {
            ws(&mut probe);
            !probe.starts_with(',') && keyword(&mut probe, "from").is_err()
        }
    };
    if type_only {
        keyword(input, "type")?;
        ws(input);
    }

    if !input.starts_with(['{', '*']) {
        details.import_default = Some(identifier.parse_next(input)?.to_string());
        ws(input);
        if opt(',').parse_next(input)?.is_some() {
            ws(input);
        }
    }
    if input.starts_with('*') {
        *input = &input[1..];
        ws(input);
        keyword(input, "as")?;
        ws(input);
        details.import_star_as = Some(identifier.parse_next(input)?.to_string());
        ws(input);
    } else if input.starts_with('{') {
        for (name, alias) in named_list(input)? {
            let alias = alias.unwrap_or_else(|| name.clone());
            details.imports_from_within.push(ImportAlias { name, alias });
        }
        ws(input);
    }
    keyword(input, "from")?;
    ws(input);
    let module = module_specifier(input)?;
    if type_only {
        details = ImportDetails::default();
    }
    Ok((module, details))
}

/// The part of an export statement after `export`: `{ a, b as c }`,
/// `{ a } from 'm'`, `* from 'm'` or `* as ns from 'm'`.
pub(super) fn export_clause(input: &mut &str) -> ModalResult<ExportDetail> {
    if keyword(input, "type").is_ok() {
        ws(input);
    }
    if input.starts_with('*') {
        *input = &input[1..];
        ws(input);
        let alias = if keyword(input, "as").is_ok() {
            ws(input);
            let alias = binding_name(input)?;
            ws(input);
            Some(alias)
        } else {
            None
        };
        keyword(input, "from")?;
        ws(input);
        let module = module_specifier(input)?;
        return Ok(ExportDetail::ReexportWildcard { module, alias });
    }

    let names: Vec<ExportAlias> = named_list(input)?
        .into_iter()
        .map(|(name, alias)| ExportAlias { name, alias })
        .collect();
    let mut probe = *input;
    ws(&mut probe);
    if keyword(&mut probe, "from").is_ok() {
        ws(&mut probe);
        let module = module_specifier(&mut probe)?;
        *input = probe;
        return Ok(ExportDetail::ReexportVariables { module, names });
    }
    Ok(ExportDetail::Identifiers { names })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn import(src: &str) -> (String, ImportDetails) {
        let mut input = src;
        import_declaration(&mut input).expect("import should parse")
    }

    #[test]
    fn default_and_named() {
        let (module, details) = import("import React, { useState, Fragment as F } from 'react'");
        assert_eq!(module, "react");
        assert_eq!(details.import_default.as_deref(), Some("React"));
        assert_eq!(
            details.imports_from_within,
            vec![
                ImportAlias {
                    name: "useState".into(),
                    alias: "useState".into()
                },
                ImportAlias {
                    name: "Fragment".into(),
                    alias: "F".into()
                },
            ]
        );
    }

    #[test]
    fn namespace_import() {
        let (module, details) = import("import * as R from \"react\";");
        assert_eq!(module, "react");
        assert_eq!(details.import_star_as.as_deref(), Some("R"));
        assert!(details.import_default.is_none());
    }

    #[test]
    fn side_effect_import() {
        let (module, details) = import("import './styles.css'");
        assert_eq!(module, "./styles.css");
        assert_eq!(details, ImportDetails::default());
    }

    #[test]
    fn type_only_import_records_nothing() {
        let (module, details) = import("import type { Props } from './types'");
        assert_eq!(module, "./types");
        assert_eq!(details, ImportDetails::default());
    }

    #[test]
    fn default_import_named_type() {
        let (_, details) = import("import type from 'type-lib'");
        assert_eq!(details.import_default.as_deref(), Some("type"));
    }

    #[test]
    fn rejects_missing_from() {
        let mut input = "import { a } 'x'";
        assert!(import_declaration(&mut input).is_err());
    }

    #[test]
    fn export_clauses() {
        let mut input = "{ a, b as c }";
        assert_eq!(
            export_clause(&mut input).ok(),
            Some(ExportDetail::Identifiers {
                names: vec![
                    ExportAlias {
                        name: "a".into(),
                        alias: None
                    },
                    ExportAlias {
                        name: "b".into(),
                        alias: Some("c".into())
                    },
                ]
            })
        );

        let mut input = "* as utils from './utils'";
        assert_eq!(
            export_clause(&mut input).ok(),
            Some(ExportDetail::ReexportWildcard {
                module: "./utils".into(),
                alias: Some("utils".into())
            })
        );

        let mut input = "{ default as Button } from './button'";
        assert_eq!(
            export_clause(&mut input).ok(),
            Some(ExportDetail::ReexportVariables {
                module: "./button".into(),
                names: vec![ExportAlias {
                    name: "default".into(),
                    alias: Some("Button".into())
                }]
            })
        );
    }
}
