//! List and table scoping.
//!
//! List items are located as token sub-ranges so the builder can recurse
//! into them; tables carry a header-section flag that decides the cell
//! node type.

use std::ops::Range;

use crate::error::StructuralError;
use crate::node::Node;
use crate::token::{Token, TokenKind};

/// Find the `list_item_close` matching the `list_item_open` at `open`.
///
/// Only list-item tokens are counted; everything between is left for the
/// recursive build to validate. The search never leaves `bounds`.
pub fn list_item_span(
    tokens: &[Token],
    open: usize,
    bounds: &Range<usize>,
) -> Result<Range<usize>, StructuralError> {
    debug_assert_eq!(tokens[open].kind, TokenKind::ListItemOpen);
    let mut depth = 0usize;
    for (idx, token) in tokens[open + 1..bounds.end].iter().enumerate() {
        match token.kind {
            TokenKind::ListItemOpen => depth += 1,
            TokenKind::ListItemClose if depth == 0 => {
                return Ok(open + 1..open + 1 + idx);
            }
            TokenKind::ListItemClose => depth -= 1,
            _ => {}
        }
    }
    Err(StructuralError::UnclosedAtEnd {
        kind: TokenKind::ListItemOpen,
        position: open,
    })
}

/// Header-section state of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSection {
    in_header: bool,
}

impl TableSection {
    /// Track section boundaries. Anything outside `thead` is body.
    pub fn observe(&mut self, kind: &TokenKind) {
        match kind {
            TokenKind::TheadOpen => self.in_header = true,
            TokenKind::TheadClose => self.in_header = false,
            _ => {}
        }
    }

    #[inline]
    pub fn in_header(&self) -> bool {
        self.in_header
    }
}

/// Finalize a table cell from its inline nodes.
///
/// A non-empty run is wrapped in an implicit paragraph; an empty cell keeps
/// an empty content list.
pub fn cell(header: bool, mut blocks: Vec<Node>, inline: Vec<Node>) -> Node {
    if !inline.is_empty() {
        blocks.push(Node::paragraph(inline));
    }
    if header {
        Node::TableHeader { content: blocks }
    } else {
        Node::TableCell { content: blocks }
    }
}
