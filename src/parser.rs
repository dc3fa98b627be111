use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, List, ListItem, ListOrder};
use crate::text::{indent_width, is_blank, normalize_line_endings};

static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid ATX heading regex"));

static ITALIC_STAR_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}\*([^*_].*?)\*\s*$").expect("valid italic regex"));

static ITALIC_UNDERSCORE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}_([^*_].*?)_\s*$").expect("valid italic regex"));

static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}__([^_].*?)__\s*$").expect("valid bold regex"));

// Matched against the trimmed line
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```([A-Za-z0-9_]+)?\s*$").expect("valid fence regex"));

static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}[-*+]\s+(.*)$").expect("valid list regex"));

static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s{0,3}[0-9]+[.)]\s+(.*)$").expect("valid list regex"));

// Items inside a list may sit at any indentation
static ANY_UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").expect("valid list regex"));

static ANY_ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+[.)]\s+(.*)$").expect("valid list regex"));

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let text = normalize_line_endings(markdown);
    Tokenizer::new(&text).tokenize()
}

struct Tokenizer<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            pos: 0,
        }
    }

    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn tokenize(mut self) -> Vec<Block> {
        let mut blocks = Vec::new();

        while let Some(line) = self.current() {
            if is_blank(line) {
                self.pos += 1;
                continue;
            }

            if let Some(heading) = heading(line) {
                log::debug!("Line {}: heading", self.pos + 1);
                blocks.push(heading);
                self.pos += 1;
                continue;
            }

            if let Some(captures) = FENCE_OPEN.captures(line.trim()) {
                log::debug!("Line {}: code fence", self.pos + 1);
                let language = captures.get(1).map(|m| m.as_str().to_string());
                blocks.push(self.code_fence(language));
                continue;
            }

            let order = if UNORDERED_ITEM.is_match(line) {
                Some(ListOrder::Unordered)
            } else if ORDERED_ITEM.is_match(line) {
                Some(ListOrder::Ordered)
            } else {
                None
            };
            if let Some(order) = order {
                log::debug!("Line {}: {:?} list", self.pos + 1, order);
                blocks.push(Block::List(self.list(order, None)));
                continue;
            }

            log::debug!("Line {}: paragraph", self.pos + 1);
            if let Some(paragraph) = self.paragraph() {
                blocks.push(paragraph);
            }
        }

        blocks
    }

    /// Consume the opening fence and every line up to and including the
    /// closing fence. An unclosed fence runs to the end of input.
    fn code_fence(&mut self, language: Option<String>) -> Block {
        self.pos += 1;
        let mut content = Vec::new();

        while let Some(line) = self.current() {
            self.pos += 1;
            if line.trim().starts_with("```") {
                break;
            }
            content.push(line);
        }

        Block::Code {
            language,
            content: content.join("\n"),
        }
    }

    /// Parse a list starting at the current line.
    ///
    /// `parent_indent` is the base indentation of the enclosing list when
    /// this list is nested; a line at or below it hands control back to the
    /// parent.
    fn list(&mut self, order: ListOrder, parent_indent: Option<usize>) -> List {
        let base = self.current().map(indent_width).unwrap_or(0);
        let mut items: Vec<ListItem> = Vec::new();

        while let Some(line) = self.current() {
            if is_blank(line) {
                if self.nested_list_follows(base) {
                    self.pos += 1;
                    continue;
                }
                self.pos += 1;
                break;
            }

            let indent = indent_width(line);
            if parent_indent.is_some_and(|parent| indent <= parent) {
                break;
            }

            if indent > base && !items.is_empty() {
                if let Some(nested_order) = any_list_marker(line) {
                    let nested = self.list(nested_order, Some(base));
                    if let Some(last) = items.pop() {
                        items.push(last.attach(nested));
                    }
                    continue;
                }
            }

            match item_text(line, order) {
                Some(text) => {
                    items.push(ListItem::Plain(text));
                    self.pos += 1;
                }
                None => break,
            }
        }

        List { order, items }
    }

    fn nested_list_follows(&self, base: usize) -> bool {
        self.lines
            .get(self.pos + 1)
            .is_some_and(|next| indent_width(next) > base && any_list_marker(next).is_some())
    }

    fn paragraph(&mut self) -> Option<Block> {
        let mut collected = Vec::new();
        if let Some(first) = self.current() {
            collected.push(first);
            self.pos += 1;
        }

        while let Some(line) = self.current() {
            if is_blank(line) {
                self.pos += 1;
                break;
            }
            if interrupts_paragraph(line) {
                break;
            }
            collected.push(line);
            self.pos += 1;
        }

        let content = collected.join(" ");
        if content.trim().is_empty() {
            None
        } else {
            Some(Block::Paragraph { content })
        }
    }
}

fn heading(line: &str) -> Option<Block> {
    if let Some(captures) = ATX_HEADING.captures(line) {
        return Some(Block::Heading {
            level: captures[1].len() as u8,
            text: captures[2].trim().to_string(),
        });
    }

    let emphasis = ITALIC_STAR_HEADING
        .captures(line)
        .or_else(|| ITALIC_UNDERSCORE_HEADING.captures(line))
        .or_else(|| BOLD_HEADING.captures(line))?;

    Some(Block::Heading {
        level: 1,
        text: emphasis[1].trim().to_string(),
    })
}

fn any_list_marker(line: &str) -> Option<ListOrder> {
    if ANY_UNORDERED_ITEM.is_match(line) {
        Some(ListOrder::Unordered)
    } else if ANY_ORDERED_ITEM.is_match(line) {
        Some(ListOrder::Ordered)
    } else {
        None
    }
}

/// Item text when `line` carries a marker of the given kind
fn item_text(line: &str, order: ListOrder) -> Option<String> {
    let pattern = match order {
        ListOrder::Unordered => &ANY_UNORDERED_ITEM,
        ListOrder::Ordered => &ANY_ORDERED_ITEM,
    };
    pattern
        .captures(line)
        .map(|captures| captures[1].trim().to_string())
}

fn interrupts_paragraph(line: &str) -> bool {
    ATX_HEADING.is_match(line)
        || UNORDERED_ITEM.is_match(line)
        || ORDERED_ITEM.is_match(line)
        || line.trim().starts_with("```")
}
