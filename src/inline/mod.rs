//! Inline mark processor.
//!
//! Turns the children of one `inline` token into a flat sequence of `text`
//! and `hardBreak` nodes. A single left-to-right pass keeps:
//! - a pending buffer that coalesces adjacent unmarked text,
//! - a stack of open marks, in nesting order.
//!
//! Every text node carries a copy of the marks open when its text was seen.

pub mod marks;

use tracing::trace;

use crate::Options;
use crate::node::{Mark, MarkType, Node};
use crate::token::{Token, TokenKind};
use marks::MarkStack;

/// Convert an inline run into nodes.
///
/// A run with no visible content (empty, or only whitespace and soft
/// breaks) yields no nodes.
pub fn process(run: &[Token], options: &Options) -> Vec<Node> {
    let mut processor = InlineProcessor::new(options);
    for token in run {
        processor.token(token);
    }
    processor.finish()
}

/// State for one inline run.
struct InlineProcessor<'o> {
    options: &'o Options,
    /// Unmarked text not yet emitted.
    pending: String,
    marks: MarkStack,
    out: Vec<Node>,
    /// Whether the last emitted node may absorb more text with the same marks.
    run_open: bool,
    /// Set once something other than whitespace has been emitted.
    visible: bool,
}

impl<'o> InlineProcessor<'o> {
    fn new(options: &'o Options) -> Self {
        Self {
            options,
            pending: String::new(),
            marks: MarkStack::new(),
            out: Vec::new(),
            run_open: false,
            visible: false,
        }
    }

    fn token(&mut self, token: &Token) {
        match &token.kind {
            TokenKind::Text => self.text(&token.content),
            // Soft breaks stay in the text they separate.
            TokenKind::Softbreak => self.text("\n"),
            TokenKind::CodeInline => {
                if token.content.is_empty() {
                    return;
                }
                self.flush();
                self.emit(Node::marked_text(token.content.as_str(), vec![Mark::Code]));
                self.visible = true;
            }
            TokenKind::StrongOpen => self.open(Mark::Strong),
            TokenKind::EmOpen => self.open(Mark::Em),
            TokenKind::SOpen => self.open(Mark::Strike),
            TokenKind::StrongClose => self.close(MarkType::Strong),
            TokenKind::EmClose => self.close(MarkType::Em),
            TokenKind::SClose => self.close(MarkType::Strike),
            TokenKind::LinkOpen => match token.get_attr("href").filter(|h| !h.is_empty()) {
                Some(href) => self.open(Mark::link(href, token.get_attr("title"))),
                None => {
                    trace!("link without href, mark omitted");
                    self.marks.suppress(MarkType::Link);
                }
            },
            TokenKind::LinkClose => self.close(MarkType::Link),
            TokenKind::Image => self.image(token),
            TokenKind::Hardbreak => {
                self.flush();
                self.emit(Node::HardBreak);
                self.visible = true;
            }
            TokenKind::HtmlInline => trace!("inline html dropped"),
            TokenKind::Other(name) => {
                if token.content.is_empty() {
                    trace!(kind = name, "unknown inline token skipped");
                } else {
                    self.text(&token.content);
                }
            }
            kind => trace!(%kind, "block token inside inline run skipped"),
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.visible && text.bytes().any(|b| !b.is_ascii_whitespace()) {
            self.visible = true;
        }
        if self.marks.is_empty() {
            self.pending.push_str(text);
            return;
        }
        self.flush();
        // Extend the previous node when it was emitted under the same marks.
        if self.run_open {
            if let Some(Node::Text { text: last, marks }) = self.out.last_mut() {
                if self.marks.matches(marks) {
                    last.push_str(text);
                    return;
                }
            }
        }
        self.emit(Node::marked_text(text, self.marks.snapshot()));
        self.run_open = true;
    }

    fn open(&mut self, mark: Mark) {
        self.flush();
        self.run_open = false;
        if !self.marks.push(mark) {
            trace!("inline nesting limit reached, mark omitted");
        }
    }

    fn close(&mut self, mark_type: MarkType) {
        self.flush();
        self.run_open = false;
        self.marks.close(mark_type);
    }

    fn image(&mut self, token: &Token) {
        self.flush();
        if !self.options.image_placeholders {
            return;
        }
        let alt = token.content.trim();
        let placeholder = if !alt.is_empty() {
            format!("[Image: {alt}]")
        } else {
            match token.get_attr("src").map(str::trim).filter(|s| !s.is_empty()) {
                Some(src) => format!("[Image: {src}]"),
                None => "[Image]".to_owned(),
            }
        };
        self.emit(Node::text(placeholder));
        self.visible = true;
    }

    /// Emit the pending buffer as an unmarked node.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        self.emit(Node::text(text));
    }

    fn emit(&mut self, node: Node) {
        self.out.push(node);
        self.run_open = false;
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush();
        if !self.visible {
            return Vec::new();
        }
        self.out
    }
}
