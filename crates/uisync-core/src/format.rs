//! Source formatting pipeline: parse → print.
//!
//! Reprints a module in canonical form. Files the parser does not handle are
//! returned unchanged.

use crate::model::{ErrorMessage, ParsedTextFile};
use crate::parser::parse_code_fresh;
use crate::printer::{PrintOptions, PrintableFile, print_code};

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for `format_code`.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Printer settings (width, quotes, indentation).
    pub print: PrintOptions,

    /// Write `data-uid` attributes into the output. Turning this off gives
    /// code fit for export, but UIDs will be regenerated on the next parse.
    /// Default: **true**.
    pub keep_uids: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            print: PrintOptions::default(),
            keep_uids: true,
        }
    }
}

// ─── Pipeline ─────────────────────────────────────────────────────────────

/// Parse a module and re-emit canonical text.
///
/// With UIDs kept the output is idempotent:
/// `format_code(f, format_code(f, s, c), c) == format_code(f, s, c)`.
///
/// # Errors
/// Returns the parser's positioned errors if the input does not parse.
pub fn format_code(
    file_name: &str,
    text: &str,
    config: &FormatConfig,
) -> Result<String, Vec<ErrorMessage>> {
    match parse_code_fresh(file_name, text) {
        ParsedTextFile::Success(success) => {
            let options = PrintOptions {
                strip_uids: !config.keep_uids || config.print.strip_uids,
                ..config.print.clone()
            };
            Ok(print_code(&PrintableFile::from(&success), &options))
        }
        ParsedTextFile::Failure(errors) => Err(errors),
        ParsedTextFile::Unparsed => Ok(text.to_string()),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INPUT: &str = r#"import React from "react";
export const App = (props) => <div data-uid="app" className='main'>
      <span data-uid="title">{props.title}</span></div>
"#;

    #[test]
    fn format_code_is_idempotent() {
        let config = FormatConfig::default();
        let once = format_code("app.jsx", INPUT, &config).expect("first format");
        let twice = format_code("app.jsx", &once, &config).expect("second format");
        assert_eq!(once, twice);
        assert!(once.contains("data-uid=\"app\""));
    }

    #[test]
    fn format_code_can_drop_uids() {
        let config = FormatConfig {
            keep_uids: false,
            ..FormatConfig::default()
        };
        let out = format_code("app.jsx", INPUT, &config).expect("format");
        assert!(!out.contains("data-uid"));
        assert!(out.contains("className=\"main\""));
    }

    #[test]
    fn format_code_passes_other_files_through() {
        let css = "div{color:red}";
        assert_eq!(
            format_code("app.css", css, &FormatConfig::default()),
            Ok(css.to_string())
        );
    }

    #[test]
    fn format_code_reports_syntax_errors() {
        let errors = format_code("app.jsx", "const a = (\n", &FormatConfig::default())
            .expect_err("unbalanced input");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file_name, "app.jsx");
    }
}
