//! Block tree builder.
//!
//! Walks a token range with a cursor and a stack of open container frames.
//! An `_open` token pushes a frame, its `_close` pops the frame and attaches
//! the finished node to the new top (or to the range's root list). List
//! items are resolved by recursing into their token sub-range; past
//! `limits::MAX_BLOCK_NESTING` levels of recursion they fall back to a
//! plain frame.

use std::ops::Range;

use tracing::trace;

use super::nesting::{self, TableSection};
use crate::Options;
use crate::error::StructuralError;
use crate::inline;
use crate::limits;
use crate::node::Node;
use crate::token::{Nesting, Token, TokenKind};

/// Builds document nodes from a borrowed token slice.
pub struct TreeBuilder<'a> {
    tokens: &'a [Token],
    options: &'a Options,
}

/// What an open container will become.
#[derive(Debug)]
enum FrameKind {
    Heading(u8),
    Paragraph,
    BulletList,
    OrderedList(u64),
    Blockquote,
    /// List item built on the frame stack once recursion is capped.
    ListItem,
    Table(TableSection),
    /// `thead` or `tbody`: contributes its rows to the table.
    Section,
    Row,
    Cell { header: bool },
    /// Contributes its children to the parent unchanged.
    Transparent,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    /// Kind of the token that opened this frame.
    opened_by: TokenKind,
    position: usize,
    children: Vec<Node>,
    /// Inline nodes of a table cell, wrapped on close.
    inline: Vec<Node>,
}

enum Finished {
    Node(Node),
    /// Children handed straight to the parent.
    Splice(Vec<Node>),
    Dropped,
}

impl Frame {
    fn finish(self) -> Finished {
        let content = self.children;
        match self.kind {
            FrameKind::Heading(level) => Finished::Node(Node::heading(level, content)),
            FrameKind::Paragraph if content.is_empty() => Finished::Dropped,
            FrameKind::Paragraph => Finished::Node(Node::paragraph(content)),
            FrameKind::BulletList => Finished::Node(Node::BulletList { content }),
            FrameKind::OrderedList(start) => Finished::Node(Node::ordered_list(start, content)),
            FrameKind::Blockquote => Finished::Node(Node::Blockquote { content }),
            FrameKind::ListItem => Finished::Node(Node::ListItem { content }),
            FrameKind::Table(_) => Finished::Node(Node::Table { content }),
            FrameKind::Section | FrameKind::Transparent => Finished::Splice(content),
            FrameKind::Row => Finished::Node(Node::TableRow { content }),
            FrameKind::Cell { header } => {
                Finished::Node(nesting::cell(header, content, self.inline))
            }
        }
    }
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tokens: &'a [Token], options: &'a Options) -> Self {
        Self { tokens, options }
    }

    /// Build the `doc` root from the whole token slice.
    pub fn build(&self) -> Result<Node, StructuralError> {
        let content = self.blocks(0..self.tokens.len(), 0)?;
        Ok(Node::doc(content))
    }

    /// Build the nodes of one balanced token range.
    ///
    /// `depth` counts the list items recursed into to reach this range.
    fn blocks(&self, range: Range<usize>, depth: usize) -> Result<Vec<Node>, StructuralError> {
        let mut root = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut cursor = range.start;

        while cursor < range.end {
            let token = &self.tokens[cursor];
            match token.kind.nesting() {
                Nesting::Open => {
                    if token.kind == TokenKind::ListItemOpen && depth < limits::MAX_BLOCK_NESTING {
                        let span = nesting::list_item_span(self.tokens, cursor, &range)?;
                        let next = span.end + 1;
                        let content = self.blocks(span, depth + 1)?;
                        attach(&mut stack, &mut root, Node::ListItem { content });
                        cursor = next;
                        continue;
                    }
                    let kind = self.frame_kind(token, &mut stack);
                    stack.push(Frame {
                        kind,
                        opened_by: token.kind.clone(),
                        position: cursor,
                        children: Vec::new(),
                        inline: Vec::new(),
                    });
                }
                Nesting::Close => {
                    let Some(frame) = stack.pop() else {
                        return Err(StructuralError::UnmatchedClose {
                            kind: token.kind.clone(),
                            position: cursor,
                        });
                    };
                    let expected = frame.opened_by.closing();
                    if expected.as_ref() != Some(&token.kind) {
                        return Err(StructuralError::MismatchedClose {
                            expected: expected.unwrap_or_else(|| frame.opened_by.clone()),
                            found: token.kind.clone(),
                            position: cursor,
                        });
                    }
                    if token.kind == TokenKind::TheadClose {
                        observe_section(&mut stack, &token.kind);
                    }
                    match frame.finish() {
                        Finished::Node(node) => attach(&mut stack, &mut root, node),
                        Finished::Splice(nodes) => {
                            for node in nodes {
                                attach(&mut stack, &mut root, node);
                            }
                        }
                        Finished::Dropped => trace!(position = cursor, "empty paragraph dropped"),
                    }
                }
                Nesting::Leaf => self.leaf(token, cursor, &mut stack, &mut root),
            }
            cursor += 1;
        }

        if let Some(frame) = stack.pop() {
            return Err(StructuralError::UnclosedAtEnd {
                kind: frame.opened_by,
                position: frame.position,
            });
        }
        Ok(root)
    }

    fn frame_kind(&self, token: &Token, stack: &mut [Frame]) -> FrameKind {
        match token.kind {
            TokenKind::HeadingOpen => FrameKind::Heading(heading_level(token)),
            TokenKind::ParagraphOpen => FrameKind::Paragraph,
            TokenKind::BulletListOpen => FrameKind::BulletList,
            TokenKind::OrderedListOpen => FrameKind::OrderedList(
                token
                    .get_attr("start")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
            ),
            TokenKind::BlockquoteOpen => FrameKind::Blockquote,
            TokenKind::TableOpen => FrameKind::Table(TableSection::default()),
            TokenKind::TheadOpen => {
                observe_section(stack, &token.kind);
                FrameKind::Section
            }
            TokenKind::TbodyOpen => FrameKind::Section,
            TokenKind::TrOpen => FrameKind::Row,
            TokenKind::ThOpen | TokenKind::TdOpen => FrameKind::Cell {
                header: in_header(stack),
            },
            TokenKind::ListItemOpen => FrameKind::ListItem,
            _ => {
                trace!(kind = %token.kind, "no frame for open kind, children spliced");
                FrameKind::Transparent
            }
        }
    }

    fn leaf(&self, token: &Token, position: usize, stack: &mut [Frame], root: &mut Vec<Node>) {
        match token.kind {
            TokenKind::Fence | TokenKind::CodeBlock => {
                attach(stack, root, code_block(token));
            }
            TokenKind::Hr => attach(stack, root, Node::Rule),
            TokenKind::Inline => {
                let nodes = inline::process(&token.children, self.options);
                match stack.last_mut() {
                    Some(Frame {
                        kind: FrameKind::Heading(_) | FrameKind::Paragraph,
                        children,
                        ..
                    }) => children.extend(nodes),
                    Some(Frame {
                        kind: FrameKind::Cell { .. },
                        inline,
                        ..
                    }) => inline.extend(nodes),
                    _ if nodes.is_empty() => {}
                    // Loose inline content directly inside a container.
                    _ => attach(stack, root, Node::paragraph(nodes)),
                }
            }
            _ => trace!(kind = %token.kind, position, "token skipped"),
        }
    }
}

fn attach(stack: &mut [Frame], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(frame) => frame.children.push(node),
        None => root.push(node),
    }
}

/// Forward a section boundary to the innermost table.
fn observe_section(stack: &mut [Frame], kind: &TokenKind) {
    let table = stack.iter_mut().rev().find_map(|frame| match &mut frame.kind {
        FrameKind::Table(section) => Some(section),
        _ => None,
    });
    if let Some(section) = table {
        section.observe(kind);
    }
}

fn in_header(stack: &[Frame]) -> bool {
    stack
        .iter()
        .rev()
        .find_map(|frame| match &frame.kind {
            FrameKind::Table(section) => Some(section.in_header()),
            _ => None,
        })
        .unwrap_or(false)
}

/// Heading level from an `hN` tag, clamped to 1-6.
///
/// Untagged or malformed headings are level 1.
fn heading_level(token: &Token) -> u8 {
    let Some(digits) = token.tag.and_then(|tag| tag.strip_prefix('h')) else {
        return 1;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    // Overflowing digit runs saturate.
    let level = digits.parse::<u32>().unwrap_or(u32::MAX);
    level.clamp(1, 6) as u8
}

fn code_block(token: &Token) -> Node {
    let code = token.content.as_str();
    let code = code
        .strip_suffix('\n')
        .map(|c| c.strip_suffix('\r').unwrap_or(c))
        .unwrap_or(code);
    Node::code_block(token.get_attr("info").map(language), code)
}

/// First word of a fence info string.
fn language(info: &str) -> &str {
    let info = info.trim_start();
    let end = memchr::memchr2(b' ', b'\t', info.as_bytes()).unwrap_or(info.len());
    &info[..end]
}
