mod block;
mod config;
mod converter;
mod error;
mod parser;
mod pipeline;
mod registry;
mod text;
mod xml;

pub use block::{Block, List, ListItem, ListOrder};
pub use config::{Config, ConfigError, InputConfig, OutputConfig};
pub use converter::{Conversion, Converter, Diagnostics, NestedXmlConverter, convert};
pub use error::Error;
pub use pipeline::{Pipeline, strip_frontmatter};
pub use registry::ConverterRegistry;
pub use text::{escape_xml, normalize_line_endings};
pub use xml::{FALLBACK_TAG, RenderOptions, tag_name};

/// Example prompt document converted by `mdxml --sample`
pub const SAMPLE_MARKDOWN: &str = include_str!("sample.md");

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Render blocks to XML using default options.
pub fn render(blocks: &[Block]) -> String {
    xml::blocks_to_xml(blocks)
}

/// Render blocks to XML with custom options.
pub fn render_with_options(blocks: &[Block], options: &RenderOptions) -> String {
    xml::blocks_to_xml_with_options(blocks, options)
}

/// Convert markdown to XML using default options.
pub fn markdown_to_xml(markdown: &str) -> String {
    render(&parse(markdown))
}

/// Convert markdown to XML with custom config.
pub fn markdown_to_xml_with_config(markdown: &str, config: &Config) -> String {
    let markdown = Pipeline::from_config(config).run(markdown.to_string());
    render_with_options(&parse(&markdown), &config.output.render_options())
}
