//! Token stream from Markdown source.
//!
//! Adapts the `pulldown-cmark` event stream into the flat token sequence
//! the tree builder consumes:
//! - every container becomes an open/close pair
//! - the inline content of a paragraph, heading or table cell is bundled
//!   into one `inline` token
//! - inline content placed directly in a list item (tight lists) gets an
//!   implicit paragraph
//! - table header rows get an explicit `tr`, body rows a `tbody` wrapper
//!
//! The output is always balanced.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options as ParseOptions, Parser, Tag};
use tracing::{debug, trace};

use crate::Options;
use crate::token::{Token, TokenKind};

/// Tokenize with default options.
pub fn tokenize(input: &str) -> Vec<Token> {
    tokenize_with_options(input, &Options::default())
}

/// Tokenize with explicit options.
pub fn tokenize_with_options(input: &str, options: &Options) -> Vec<Token> {
    let mut lexer = Lexer::with_capacity((input.len() / 16).max(16));
    for event in Parser::new_ext(input, parse_options(options)) {
        lexer.event(event);
    }
    let tokens = lexer.finish();
    debug!(bytes = input.len(), tokens = tokens.len(), "tokenized input");
    tokens
}

fn parse_options(options: &Options) -> ParseOptions {
    let mut parse = ParseOptions::empty();
    if options.tables {
        parse.insert(ParseOptions::ENABLE_TABLES);
    }
    if options.strikethrough {
        parse.insert(ParseOptions::ENABLE_STRIKETHROUGH);
    }
    parse
}

/// What to emit when the matching end event arrives.
#[derive(Debug)]
enum Open {
    Paragraph,
    Heading(&'static str),
    /// Container closed by a single token.
    Block(TokenKind, &'static str),
    /// Code block; `None` info means indented.
    Code(Option<String>),
    HtmlBlock,
    Table,
    TableHead,
    Cell(TokenKind, &'static str),
    Inline(TokenKind),
    Image,
    Ignored,
}

/// Children of the `inline` token being assembled.
#[derive(Debug)]
struct InlineRun {
    children: Vec<Token>,
    /// Opened for loose inline content; closed by the next block event.
    implicit: bool,
}

/// An image whose alt text is being collected.
#[derive(Debug)]
struct ImageAlt {
    token: Token,
    depth: u32,
}

struct Lexer {
    tokens: Vec<Token>,
    open: Vec<Open>,
    run: Option<InlineRun>,
    /// Raw text of the current code or HTML block.
    literal: Option<String>,
    image: Option<ImageAlt>,
    in_table_head: bool,
    tbody_open: bool,
}

impl Lexer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            open: Vec::new(),
            run: None,
            literal: None,
            image: None,
            in_table_head: false,
            tbody_open: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(image) = &mut self.image {
                    image.token.content.push_str(&code);
                } else {
                    self.inline(Token::with_content(TokenKind::CodeInline, &*code));
                }
            }
            Event::Html(html) => {
                if let Some(literal) = &mut self.literal {
                    literal.push_str(&html);
                } else {
                    self.close_implicit();
                    self.tokens
                        .push(Token::with_content(TokenKind::HtmlBlock, &*html));
                }
            }
            Event::InlineHtml(html) => {
                if self.image.is_none() {
                    self.inline(Token::with_content(TokenKind::HtmlInline, &*html));
                }
            }
            Event::SoftBreak => self.break_token(TokenKind::Softbreak),
            Event::HardBreak => self.break_token(TokenKind::Hardbreak),
            Event::Rule => {
                self.close_implicit();
                self.tokens.push(Token::new(TokenKind::Hr).tag("hr"));
            }
            other => trace!(event = ?other, "unsupported event skipped"),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        if let Some(image) = &mut self.image {
            // Inside alt text only nested images are tracked.
            if matches!(tag, Tag::Image { .. }) {
                image.depth += 1;
                self.open.push(Open::Image);
            } else {
                self.open.push(Open::Ignored);
            }
            return;
        }

        let open = match tag {
            Tag::Paragraph => {
                self.close_implicit();
                self.tokens.push(Token::new(TokenKind::ParagraphOpen).tag("p"));
                self.begin_run(false);
                Open::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.close_implicit();
                let tag = heading_tag(level);
                self.tokens.push(Token::new(TokenKind::HeadingOpen).tag(tag));
                self.begin_run(false);
                Open::Heading(tag)
            }
            Tag::BlockQuote(_) => self.container(
                TokenKind::BlockquoteOpen,
                TokenKind::BlockquoteClose,
                "blockquote",
            ),
            Tag::CodeBlock(kind) => {
                self.close_implicit();
                self.literal = Some(String::new());
                match kind {
                    CodeBlockKind::Fenced(info) => Open::Code(Some(info.to_string())),
                    CodeBlockKind::Indented => Open::Code(None),
                }
            }
            Tag::HtmlBlock => {
                self.close_implicit();
                self.literal = Some(String::new());
                Open::HtmlBlock
            }
            Tag::List(Some(start)) => {
                self.close_implicit();
                self.tokens.push(
                    Token::new(TokenKind::OrderedListOpen)
                        .tag("ol")
                        .attr("start", start.to_string()),
                );
                Open::Block(TokenKind::OrderedListClose, "ol")
            }
            Tag::List(None) => {
                self.container(TokenKind::BulletListOpen, TokenKind::BulletListClose, "ul")
            }
            Tag::Item => self.container(TokenKind::ListItemOpen, TokenKind::ListItemClose, "li"),
            Tag::Table(_) => {
                self.close_implicit();
                self.tokens.push(Token::new(TokenKind::TableOpen).tag("table"));
                Open::Table
            }
            Tag::TableHead => {
                self.tokens.push(Token::new(TokenKind::TheadOpen).tag("thead"));
                self.tokens.push(Token::new(TokenKind::TrOpen).tag("tr"));
                self.in_table_head = true;
                Open::TableHead
            }
            Tag::TableRow => {
                if !self.tbody_open {
                    self.tokens.push(Token::new(TokenKind::TbodyOpen).tag("tbody"));
                    self.tbody_open = true;
                }
                self.tokens.push(Token::new(TokenKind::TrOpen).tag("tr"));
                Open::Block(TokenKind::TrClose, "tr")
            }
            Tag::TableCell => {
                let (open, close, tag) = if self.in_table_head {
                    (TokenKind::ThOpen, TokenKind::ThClose, "th")
                } else {
                    (TokenKind::TdOpen, TokenKind::TdClose, "td")
                };
                self.tokens.push(Token::new(open).tag(tag));
                self.begin_run(false);
                Open::Cell(close, tag)
            }
            Tag::Emphasis => self.inline_pair(TokenKind::EmOpen, TokenKind::EmClose),
            Tag::Strong => self.inline_pair(TokenKind::StrongOpen, TokenKind::StrongClose),
            Tag::Strikethrough => self.inline_pair(TokenKind::SOpen, TokenKind::SClose),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut token = Token::new(TokenKind::LinkOpen).attr("href", &*dest_url);
                if !title.is_empty() {
                    token = token.attr("title", &*title);
                }
                self.inline(token);
                Open::Inline(TokenKind::LinkClose)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut token = Token::new(TokenKind::Image).attr("src", &*dest_url);
                if !title.is_empty() {
                    token = token.attr("title", &*title);
                }
                self.image = Some(ImageAlt { token, depth: 1 });
                Open::Image
            }
            other => {
                trace!(tag = ?other, "unsupported tag skipped");
                Open::Ignored
            }
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        match open {
            Open::Paragraph => {
                self.end_run();
                self.tokens.push(Token::new(TokenKind::ParagraphClose).tag("p"));
            }
            Open::Heading(tag) => {
                self.end_run();
                self.tokens.push(Token::new(TokenKind::HeadingClose).tag(tag));
            }
            Open::Block(kind, tag) => {
                self.close_implicit();
                self.tokens.push(Token::new(kind).tag(tag));
            }
            Open::Code(info) => {
                let code = self.literal.take().unwrap_or_default();
                let token = match info {
                    Some(info) => Token::with_content(TokenKind::Fence, code)
                        .tag("code")
                        .attr("info", info),
                    None => Token::with_content(TokenKind::CodeBlock, code).tag("code"),
                };
                self.tokens.push(token);
            }
            Open::HtmlBlock => {
                let html = self.literal.take().unwrap_or_default();
                self.tokens.push(Token::with_content(TokenKind::HtmlBlock, html));
            }
            Open::Table => {
                if self.tbody_open {
                    self.tokens.push(Token::new(TokenKind::TbodyClose).tag("tbody"));
                    self.tbody_open = false;
                }
                self.tokens.push(Token::new(TokenKind::TableClose).tag("table"));
            }
            Open::TableHead => {
                self.tokens.push(Token::new(TokenKind::TrClose).tag("tr"));
                self.tokens.push(Token::new(TokenKind::TheadClose).tag("thead"));
                self.in_table_head = false;
            }
            Open::Cell(kind, tag) => {
                self.end_run();
                self.tokens.push(Token::new(kind).tag(tag));
            }
            Open::Inline(kind) => self.inline(Token::new(kind)),
            Open::Image => {
                let done = match &mut self.image {
                    Some(image) if image.depth > 1 => {
                        image.depth -= 1;
                        false
                    }
                    Some(_) => true,
                    None => false,
                };
                if done {
                    if let Some(image) = self.image.take() {
                        self.inline(image.token);
                    }
                }
            }
            Open::Ignored => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(literal) = &mut self.literal {
            literal.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.token.content.push_str(text);
        } else {
            self.inline(Token::with_content(TokenKind::Text, text));
        }
    }

    fn break_token(&mut self, kind: TokenKind) {
        if let Some(image) = &mut self.image {
            image.token.content.push(' ');
        } else {
            self.inline(Token::new(kind));
        }
    }

    fn container(&mut self, open: TokenKind, close: TokenKind, tag: &'static str) -> Open {
        self.close_implicit();
        self.tokens.push(Token::new(open).tag(tag));
        Open::Block(close, tag)
    }

    fn inline_pair(&mut self, open: TokenKind, close: TokenKind) -> Open {
        self.inline(Token::new(open));
        Open::Inline(close)
    }

    /// Append an inline child, opening an implicit paragraph if needed.
    fn inline(&mut self, token: Token) {
        if self.run.is_none() {
            self.tokens.push(Token::new(TokenKind::ParagraphOpen).tag("p"));
            self.begin_run(true);
        }
        if let Some(run) = &mut self.run {
            run.children.push(token);
        }
    }

    fn begin_run(&mut self, implicit: bool) {
        self.run = Some(InlineRun {
            children: Vec::new(),
            implicit,
        });
    }

    /// Emit the current run as one `inline` token.
    fn end_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.tokens.push(Token::inline(run.children));
        }
    }

    /// Close an implicit paragraph before the next block event.
    fn close_implicit(&mut self) {
        if self.run.as_ref().is_some_and(|run| run.implicit) {
            self.end_run();
            self.tokens.push(Token::new(TokenKind::ParagraphClose).tag("p"));
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.close_implicit();
        self.tokens
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.kind.name()).collect()
    }

    #[test]
    fn test_paragraph() {
        let tokens = tokenize("plain text");
        assert_eq!(kinds(&tokens), ["paragraph_open", "inline", "paragraph_close"]);
        assert_eq!(kinds(&tokens[1].children), ["text"]);
        assert_eq!(tokens[1].children[0].content, "plain text");
    }

    #[test]
    fn test_heading_tag() {
        let tokens = tokenize("### Three");
        assert_eq!(tokens[0].tag, Some("h3"));
        assert_eq!(tokens[2].tag, Some("h3"));
    }

    #[test]
    fn test_tight_list_gets_implicit_paragraph() {
        let tokens = tokenize("- a\n- b");
        assert_eq!(
            kinds(&tokens),
            [
                "bullet_list_open",
                "list_item_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "list_item_close",
                "list_item_open",
                "paragraph_open",
                "inline",
                "paragraph_close",
                "list_item_close",
                "bullet_list_close",
            ]
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let tokens = tokenize("3. c\n4. d");
        assert_eq!(tokens[0].kind, TokenKind::OrderedListOpen);
        assert_eq!(tokens[0].get_attr("start"), Some("3"));
    }

    #[test]
    fn test_fence_info_and_content() {
        let tokens = tokenize("```rust\nfn main() {}\n```");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Fence);
        assert_eq!(tokens[0].get_attr("info"), Some("rust"));
        assert_eq!(tokens[0].content, "fn main() {}\n");
    }

    #[test]
    fn test_table_sections() {
        let tokens = tokenize("| a | b |\n| - | - |\n| c | d |\n");
        assert_eq!(
            kinds(&tokens),
            [
                "table_open",
                "thead_open",
                "tr_open",
                "th_open",
                "inline",
                "th_close",
                "th_open",
                "inline",
                "th_close",
                "tr_close",
                "thead_close",
                "tbody_open",
                "tr_open",
                "td_open",
                "inline",
                "td_close",
                "td_open",
                "inline",
                "td_close",
                "tr_close",
                "tbody_close",
                "table_close",
            ]
        );
    }

    #[test]
    fn test_tables_disabled() {
        let options = Options {
            tables: false,
            ..Options::default()
        };
        let tokens = tokenize_with_options("| a |\n| - |\n", &options);
        assert_eq!(tokens[0].kind, TokenKind::ParagraphOpen);
    }

    #[test]
    fn test_inline_marks() {
        let tokens = tokenize("**b** *i* ~~s~~ [l](https://x.y \"T\")");
        let children = &tokens[1].children;
        assert_eq!(
            kinds(children),
            [
                "strong_open",
                "text",
                "strong_close",
                "text",
                "em_open",
                "text",
                "em_close",
                "text",
                "s_open",
                "text",
                "s_close",
                "text",
                "link_open",
                "text",
                "link_close",
            ]
        );
        let link = &children[12];
        assert_eq!(link.get_attr("href"), Some("https://x.y"));
        assert_eq!(link.get_attr("title"), Some("T"));
    }

    #[test]
    fn test_image_alt_collected() {
        let tokens = tokenize("![a *fancy* pic](p.png)");
        let children = &tokens[1].children;
        assert_eq!(kinds(children), ["image"]);
        assert_eq!(children[0].content, "a fancy pic");
        assert_eq!(children[0].get_attr("src"), Some("p.png"));
    }

    #[test]
    fn test_html_block() {
        let tokens = tokenize("<div>\nhi\n</div>\n");
        assert_eq!(kinds(&tokens), ["html_block"]);
        assert!(tokens[0].content.starts_with("<div>"));
    }

    #[test]
    fn test_balanced_output() {
        let tokens = tokenize("> - a\n>   1. b\n>\n> ```\n> x\n> ```\n\n---\n");
        let mut depth = 0i32;
        for token in &tokens {
            match token.kind.nesting() {
                crate::token::Nesting::Open => depth += 1,
                crate::token::Nesting::Close => depth -= 1,
                crate::token::Nesting::Leaf => {}
            }
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }
}
