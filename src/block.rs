/// Whether a list numbers its items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Ordered,
    Unordered,
}

/// A single list item.
///
/// Items start out as plain text and become `Nested` the first time a
/// deeper list is attached to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Plain(String),
    Nested { text: String, lists: Vec<List> },
}

impl ListItem {
    pub fn text(&self) -> &str {
        match self {
            ListItem::Plain(text) | ListItem::Nested { text, .. } => text,
        }
    }

    /// Nested lists owned by this item (empty for plain items)
    pub fn lists(&self) -> &[List] {
        match self {
            ListItem::Plain(_) => &[],
            ListItem::Nested { lists, .. } => lists,
        }
    }

    /// Attach a nested list, converting a plain item into a nested one.
    pub fn attach(self, list: List) -> ListItem {
        match self {
            ListItem::Plain(text) => ListItem::Nested {
                text,
                lists: vec![list],
            },
            ListItem::Nested { text, mut lists } => {
                lists.push(list);
                ListItem::Nested { text, lists }
            }
        }
    }
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub order: ListOrder,
    pub items: Vec<ListItem>,
}

/// Block-level elements produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        content: String,
    },
    Code {
        language: Option<String>,
        content: String,
    },
    List(List),
}
