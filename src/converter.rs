//! Converter trait and the built-in nested XML converter
//!
//! A converter turns a complete Markdown string into a complete output
//! string plus diagnostics. The [`ConverterRegistry`](crate::ConverterRegistry)
//! holds converters by id and picks which one runs.

use std::time::Instant;

use crate::error::Error;
use crate::parser;
use crate::xml::{self, RenderOptions};

/// Timing and messages reported alongside a conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub duration_ms: f64,
    pub messages: Vec<String>,
    /// Label of the converter that produced the result, set by the registry
    pub strategy: Option<String>,
}

/// Output of a single conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub output: String,
    pub diagnostics: Diagnostics,
}

/// A Markdown conversion strategy
pub trait Converter: Send + Sync {
    /// Unique identifier used for selection (e.g., "nested-xml")
    fn id(&self) -> &str;

    /// Human readable name
    fn label(&self) -> &str {
        self.id()
    }

    fn description(&self) -> &str {
        ""
    }

    fn convert(&self, markdown: &str) -> Result<Conversion, Error>;
}

/// Headings become nested tags; lists and code blocks are kept intact.
#[derive(Debug, Clone, Default)]
pub struct NestedXmlConverter {
    options: RenderOptions,
}

impl NestedXmlConverter {
    pub const ID: &'static str = "nested-xml";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Converter for NestedXmlConverter {
    fn id(&self) -> &str {
        Self::ID
    }

    fn label(&self) -> &str {
        "Nested XML"
    }

    fn description(&self) -> &str {
        "Headings become nested tags, lists become <item> elements and code blocks are kept verbatim in CDATA."
    }

    fn convert(&self, markdown: &str) -> Result<Conversion, Error> {
        let start = Instant::now();
        let blocks = parser::parse(markdown);
        let output = xml::blocks_to_xml_with_options(&blocks, &self.options);
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        log::debug!("Converted {} blocks in {elapsed:.3} ms", blocks.len());

        Ok(Conversion {
            output,
            diagnostics: Diagnostics {
                duration_ms: (elapsed * 1000.0).round() / 1000.0,
                messages: Vec::new(),
                strategy: None,
            },
        })
    }
}

/// Convert markdown with the built-in converter and default options.
pub fn convert(markdown: &str) -> Conversion {
    // The built-in converter is total over its input
    NestedXmlConverter::new()
        .convert(markdown)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input() {
        let result = convert("");
        assert_eq!(result.output, "");
        assert!(result.diagnostics.messages.is_empty());
        assert!(result.diagnostics.duration_ms >= 0.0);
    }

    #[test]
    fn converter_identity() {
        let converter = NestedXmlConverter::new();
        assert_eq!(converter.id(), "nested-xml");
        assert_eq!(converter.label(), "Nested XML");
        assert!(!converter.description().is_empty());
    }

    #[test]
    fn converter_matches_free_function() {
        let markdown = "# Title\n- a\n  - b\n```sh\necho <hi>\n```";
        let result = NestedXmlConverter::new().convert(markdown);
        assert_eq!(result.map(|c| c.output), Ok(convert(markdown).output));
    }

    #[test]
    fn converter_uses_render_options() {
        let converter = NestedXmlConverter::with_options(RenderOptions { indent_width: 1 });
        let result = converter.convert("# A\ntext");
        assert_eq!(result.map(|c| c.output), Ok("<a>\n text\n</a>".to_string()));
    }
}
