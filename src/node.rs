//! Document tree types.
//!
//! The serialized shape is the one expected by ADF rich-text fields:
//! every node is an object with a `type` key, containers carry a `content`
//! array, and text nodes carry `text` plus optional `marks`.

use serde::{Deserialize, Serialize};

/// ADF document version written on the root node.
pub const DOC_VERSION: u32 = 1;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Root node.
    Doc { version: u32, content: Vec<Node> },
    Heading {
        attrs: HeadingAttrs,
        content: Vec<Node>,
    },
    Paragraph { content: Vec<Node> },
    BulletList { content: Vec<Node> },
    OrderedList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<OrderedListAttrs>,
        content: Vec<Node>,
    },
    ListItem { content: Vec<Node> },
    Blockquote { content: Vec<Node> },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<CodeBlockAttrs>,
        content: Vec<Node>,
    },
    /// Thematic break.
    Rule,
    Table { content: Vec<Node> },
    TableRow { content: Vec<Node> },
    TableHeader { content: Vec<Node> },
    TableCell { content: Vec<Node> },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    /// Heading level (1-6).
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedListAttrs {
    /// Number of the first item.
    pub order: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

impl Node {
    /// Root node wrapping top-level blocks.
    pub fn doc(content: Vec<Node>) -> Self {
        Self::Doc {
            version: DOC_VERSION,
            content,
        }
    }

    /// Heading with the level clamped to 1-6.
    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::Heading {
            attrs: HeadingAttrs {
                level: level.clamp(1, 6),
            },
            content,
        }
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::Paragraph { content }
    }

    /// Ordered list; the `order` attribute is only kept when it differs from 1.
    pub fn ordered_list(start: u64, content: Vec<Node>) -> Self {
        let attrs = (start != 1).then_some(OrderedListAttrs { order: start });
        Self::OrderedList { attrs, content }
    }

    /// Code block holding `code` as a single text node.
    ///
    /// Empty code produces an empty `content` array rather than an empty
    /// text node.
    pub fn code_block(language: Option<&str>, code: &str) -> Self {
        let attrs = language
            .filter(|lang| !lang.is_empty())
            .map(|lang| CodeBlockAttrs {
                language: lang.to_owned(),
            });
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(code)]
        };
        Self::CodeBlock { attrs, content }
    }

    /// Unmarked text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Text node with marks.
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text {
            text: text.into(),
            marks,
        }
    }

    /// Serialized `type` name.
    pub fn node_type(&self) -> &'static str {
        match self {
            Self::Doc { .. } => "doc",
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::BulletList { .. } => "bulletList",
            Self::OrderedList { .. } => "orderedList",
            Self::ListItem { .. } => "listItem",
            Self::Blockquote { .. } => "blockquote",
            Self::CodeBlock { .. } => "codeBlock",
            Self::Rule => "rule",
            Self::Table { .. } => "table",
            Self::TableRow { .. } => "tableRow",
            Self::TableHeader { .. } => "tableHeader",
            Self::TableCell { .. } => "tableCell",
            Self::Text { .. } => "text",
            Self::HardBreak => "hardBreak",
        }
    }

    /// Child nodes of a structural node; `None` for leaves.
    pub fn content(&self) -> Option<&[Node]> {
        match self {
            Self::Doc { content, .. }
            | Self::Heading { content, .. }
            | Self::Paragraph { content }
            | Self::BulletList { content }
            | Self::OrderedList { content, .. }
            | Self::ListItem { content }
            | Self::Blockquote { content }
            | Self::CodeBlock { content, .. }
            | Self::Table { content }
            | Self::TableRow { content }
            | Self::TableHeader { content }
            | Self::TableCell { content } => Some(content),
            Self::Rule | Self::Text { .. } | Self::HardBreak => None,
        }
    }

    /// Text of a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Marks of a text node; empty for every other node.
    pub fn marks(&self) -> &[Mark] {
        match self {
            Self::Text { marks, .. } => marks,
            _ => &[],
        }
    }

    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to an indented JSON string.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to a JSON value, e.g. for embedding into a request body.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Annotation applied to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Strong,
    Em,
    Strike,
    Code,
    Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Discriminant of a [`Mark`], used to close marks by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkType {
    Strong,
    Em,
    Strike,
    Code,
    Link,
}

impl Mark {
    /// Link mark; an empty title is dropped.
    pub fn link(href: impl Into<String>, title: Option<&str>) -> Self {
        Self::Link {
            attrs: LinkAttrs {
                href: href.into(),
                title: title.filter(|t| !t.is_empty()).map(str::to_owned),
            },
        }
    }

    pub fn mark_type(&self) -> MarkType {
        match self {
            Self::Strong => MarkType::Strong,
            Self::Em => MarkType::Em,
            Self::Strike => MarkType::Strike,
            Self::Code => MarkType::Code,
            Self::Link { .. } => MarkType::Link,
        }
    }
}
