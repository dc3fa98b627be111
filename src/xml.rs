use crate::block::{Block, List, ListItem, ListOrder};
use crate::text::escape_xml;

/// Tag used when a heading yields no usable characters
pub const FALLBACK_TAG: &str = "section";

/// Layout knobs for the XML renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

/// An open heading tag waiting for its closing tag
struct Frame {
    level: u8,
    tag: String,
    depth: usize,
}

struct XmlWriter<'a> {
    options: &'a RenderOptions,
    stack: Vec<Frame>,
    lines: Vec<String>,
}

/// Convert blocks to XML using default options
pub fn blocks_to_xml(blocks: &[Block]) -> String {
    blocks_to_xml_with_options(blocks, &RenderOptions::default())
}

/// Convert blocks to XML.
///
/// Headings open a tag that stays open until a heading of the same or a
/// shallower level appears, so everything between them nests inside it.
pub fn blocks_to_xml_with_options(blocks: &[Block], options: &RenderOptions) -> String {
    let mut writer = XmlWriter {
        options,
        stack: Vec::new(),
        lines: Vec::new(),
    };

    for block in blocks {
        writer.emit_block(block);
    }
    writer.close_until(0);

    writer.lines.join("\n")
}

impl XmlWriter<'_> {
    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.options.indent_width)
    }

    fn push_line(&mut self, depth: usize, line: &str) {
        let indent = self.indent(depth);
        self.lines.push(format!("{indent}{line}"));
    }

    /// Close open headings whose level is `level` or deeper. `0` closes all.
    fn close_until(&mut self, level: u8) {
        while self.stack.last().is_some_and(|frame| frame.level >= level) {
            if let Some(frame) = self.stack.pop() {
                self.push_line(frame.depth, &format!("</{}>", frame.tag));
            }
        }
    }

    fn emit_block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, text } => self.emit_heading(*level, text),
            Block::Paragraph { content } => {
                self.push_line(self.stack.len(), &escape_xml(content));
            }
            Block::List(list) => self.emit_list(list, self.stack.len()),
            Block::Code { language, content } => {
                self.emit_code(language.as_deref(), content);
            }
        }
    }

    fn emit_heading(&mut self, level: u8, text: &str) {
        self.close_until(level);

        let depth = self.stack.len();
        let tag = tag_name(text);
        log::debug!("Opening <{tag}> for level {level} heading at depth {depth}");

        self.push_line(depth, &format!("<{tag}>"));
        self.stack.push(Frame { level, tag, depth });
    }

    fn emit_list(&mut self, list: &List, depth: usize) {
        for (index, item) in list.items.iter().enumerate() {
            let open = match list.order {
                ListOrder::Ordered => format!("<item number=\"{}\">", index + 1),
                ListOrder::Unordered => "<item>".to_string(),
            };
            let text = escape_xml(item.text());

            match item {
                ListItem::Plain(_) => {
                    self.push_line(depth, &format!("{open}{text}</item>"));
                }
                ListItem::Nested { lists, .. } => {
                    self.push_line(depth, &format!("{open}{text}"));
                    for nested in lists {
                        self.emit_list(nested, depth + 1);
                    }
                    self.push_line(depth, "</item>");
                }
            }
        }
    }

    // Code content goes out verbatim: no escaping, no re-indenting.
    fn emit_code(&mut self, language: Option<&str>, content: &str) {
        let lang = language
            .map(|lang| format!(" lang=\"{}\"", escape_xml(lang)))
            .unwrap_or_default();

        self.push_line(self.stack.len(), &format!("<code{lang}><![CDATA["));
        self.lines.push(content.to_string());
        self.lines.push("]]></code>".to_string());
    }
}

/// Derive an XML tag name from heading text.
///
/// Lowercases, drops everything but ASCII letters, digits, whitespace and
/// `-`, then joins the remaining words with underscores.
pub fn tag_name(heading: &str) -> String {
    let filtered: String = heading
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let tag = filtered.split_whitespace().collect::<Vec<_>>().join("_");
    let tag = tag.trim_matches('_');

    if tag.is_empty() {
        FALLBACK_TAG.to_string()
    } else {
        tag.to_string()
    }
}
