//! Flat token stream consumed by the tree builder.
//!
//! Block structure is expressed as open/close pairs, leaf blocks are single
//! tokens, and the inline content of one block is bundled into a single
//! [`TokenKind::Inline`] token whose children hold the inline run.

use std::fmt;

/// Token kinds understood by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    BlockquoteOpen,
    BlockquoteClose,
    TableOpen,
    TableClose,
    TheadOpen,
    TheadClose,
    TbodyOpen,
    TbodyClose,
    TrOpen,
    TrClose,
    ThOpen,
    ThClose,
    TdOpen,
    TdClose,

    /// Fenced code block; language in the `info` attribute.
    Fence,
    /// Indented code block.
    CodeBlock,
    /// Thematic break.
    Hr,
    /// Inline run of one block; see [`Token::children`].
    Inline,
    HtmlBlock,

    // Inline children.
    Text,
    CodeInline,
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
    /// Strikethrough start.
    SOpen,
    /// Strikethrough end.
    SClose,
    LinkOpen,
    LinkClose,
    /// Image; alt text in `content`, URL in the `src` attribute.
    Image,
    Softbreak,
    Hardbreak,
    HtmlInline,

    /// Anything the lexer produced that has no dedicated kind.
    Other(&'static str),
}

/// Which side of an open/close pair a token sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

impl TokenKind {
    /// Snake-case name, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeadingOpen => "heading_open",
            Self::HeadingClose => "heading_close",
            Self::ParagraphOpen => "paragraph_open",
            Self::ParagraphClose => "paragraph_close",
            Self::BulletListOpen => "bullet_list_open",
            Self::BulletListClose => "bullet_list_close",
            Self::OrderedListOpen => "ordered_list_open",
            Self::OrderedListClose => "ordered_list_close",
            Self::ListItemOpen => "list_item_open",
            Self::ListItemClose => "list_item_close",
            Self::BlockquoteOpen => "blockquote_open",
            Self::BlockquoteClose => "blockquote_close",
            Self::TableOpen => "table_open",
            Self::TableClose => "table_close",
            Self::TheadOpen => "thead_open",
            Self::TheadClose => "thead_close",
            Self::TbodyOpen => "tbody_open",
            Self::TbodyClose => "tbody_close",
            Self::TrOpen => "tr_open",
            Self::TrClose => "tr_close",
            Self::ThOpen => "th_open",
            Self::ThClose => "th_close",
            Self::TdOpen => "td_open",
            Self::TdClose => "td_close",
            Self::Fence => "fence",
            Self::CodeBlock => "code_block",
            Self::Hr => "hr",
            Self::Inline => "inline",
            Self::HtmlBlock => "html_block",
            Self::Text => "text",
            Self::CodeInline => "code_inline",
            Self::StrongOpen => "strong_open",
            Self::StrongClose => "strong_close",
            Self::EmOpen => "em_open",
            Self::EmClose => "em_close",
            Self::SOpen => "s_open",
            Self::SClose => "s_close",
            Self::LinkOpen => "link_open",
            Self::LinkClose => "link_close",
            Self::Image => "image",
            Self::Softbreak => "softbreak",
            Self::Hardbreak => "hardbreak",
            Self::HtmlInline => "html_inline",
            Self::Other(name) => *name,
        }
    }

    /// Block-level nesting of this kind.
    pub fn nesting(&self) -> Nesting {
        match self {
            Self::HeadingOpen
            | Self::ParagraphOpen
            | Self::BulletListOpen
            | Self::OrderedListOpen
            | Self::ListItemOpen
            | Self::BlockquoteOpen
            | Self::TableOpen
            | Self::TheadOpen
            | Self::TbodyOpen
            | Self::TrOpen
            | Self::ThOpen
            | Self::TdOpen => Nesting::Open,
            Self::HeadingClose
            | Self::ParagraphClose
            | Self::BulletListClose
            | Self::OrderedListClose
            | Self::ListItemClose
            | Self::BlockquoteClose
            | Self::TableClose
            | Self::TheadClose
            | Self::TbodyClose
            | Self::TrClose
            | Self::ThClose
            | Self::TdClose => Nesting::Close,
            _ => Nesting::Leaf,
        }
    }

    /// The close kind matching an open kind.
    pub fn closing(&self) -> Option<TokenKind> {
        let close = match self {
            Self::HeadingOpen => Self::HeadingClose,
            Self::ParagraphOpen => Self::ParagraphClose,
            Self::BulletListOpen => Self::BulletListClose,
            Self::OrderedListOpen => Self::OrderedListClose,
            Self::ListItemOpen => Self::ListItemClose,
            Self::BlockquoteOpen => Self::BlockquoteClose,
            Self::TableOpen => Self::TableClose,
            Self::TheadOpen => Self::TheadClose,
            Self::TbodyOpen => Self::TbodyClose,
            Self::TrOpen => Self::TrClose,
            Self::ThOpen => Self::ThClose,
            Self::TdOpen => Self::TdClose,
            _ => return None,
        };
        Some(close)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One token of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Markup tag, e.g. `h2` for a level-2 heading.
    pub tag: Option<&'static str>,
    /// Literal text for leaf tokens.
    pub content: String,
    /// Ordered `(name, value)` attributes.
    pub attrs: Vec<(&'static str, String)>,
    /// Inline run, only populated on [`TokenKind::Inline`].
    pub children: Vec<Token>,
}

impl Token {
    /// Create a token with no tag, content, attributes or children.
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            tag: None,
            content: String::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Leaf token carrying literal text.
    pub fn with_content(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::new(kind)
        }
    }

    /// An `inline` token bundling the given run.
    pub fn inline(children: Vec<Token>) -> Self {
        Self {
            children,
            ..Self::new(TokenKind::Inline)
        }
    }

    /// Builder-style tag setter.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Builder-style attribute setter.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Look up an attribute by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}
