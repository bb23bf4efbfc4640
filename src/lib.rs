//! adfmark: Markdown to Atlassian Document Format converter
//!
//! Converts Markdown into the nested JSON node graph accepted by ADF
//! rich-text fields (`{"type": "doc", "version": 1, "content": [...]}`).
//!
//! # Pipeline
//! 1. [`lexer`] turns source text into a flat, balanced [`Token`] stream.
//! 2. [`block`] resolves open/close pairs into nested nodes, delegating
//!    each inline run to [`inline`], which applies marks to text.
//!
//! Conversion is synchronous, allocation-only and keeps no state between
//! calls. A malformed token stream is reported as a [`StructuralError`];
//! everything else degrades to the closest plain-text rendering.

pub mod block;
pub mod error;
pub mod inline;
pub mod lexer;
pub mod limits;
pub mod node;
pub mod token;

// Re-export primary types
pub use block::TreeBuilder;
pub use error::{Error, StructuralError};
pub use lexer::{tokenize, tokenize_with_options};
pub use node::{Mark, MarkType, Node};
pub use token::{Token, TokenKind};

use tracing::{debug, warn};

/// Conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Recognize GFM pipe tables.
    pub tables: bool,
    /// Recognize `~~strikethrough~~`.
    pub strikethrough: bool,
    /// Render images as `[Image: alt]` text; when false images are dropped.
    pub image_placeholders: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            image_placeholders: true,
        }
    }
}

/// Convert Markdown to an ADF document tree.
///
/// # Example
/// ```
/// let doc = adfmark::to_adf("# Hello\n\nWorld").unwrap();
/// assert_eq!(doc.node_type(), "doc");
/// assert_eq!(doc.content().unwrap().len(), 2);
/// ```
pub fn to_adf(input: &str) -> Result<Node, StructuralError> {
    to_adf_with_options(input, &Options::default())
}

/// Convert Markdown to an ADF document tree with options.
pub fn to_adf_with_options(input: &str, options: &Options) -> Result<Node, StructuralError> {
    let tokens = tokenize_with_options(input, options);
    build_with_options(&tokens, options)
}

/// Convert Markdown straight to a compact JSON string.
pub fn to_adf_json(input: &str) -> Result<String, Error> {
    Ok(to_adf(input)?.to_json()?)
}

/// Convert Markdown straight to an indented JSON string.
pub fn to_adf_json_pretty(input: &str) -> Result<String, Error> {
    Ok(to_adf(input)?.to_json_pretty()?)
}

/// Build the `doc` root from a token stream.
///
/// Fails if the stream has unbalanced open/close pairs.
pub fn build(tokens: &[Token]) -> Result<Node, StructuralError> {
    build_with_options(tokens, &Options::default())
}

/// Build the `doc` root from a token stream with options.
pub fn build_with_options(tokens: &[Token], options: &Options) -> Result<Node, StructuralError> {
    debug!(tokens = tokens.len(), "building document tree");
    match TreeBuilder::new(tokens, options).build() {
        Ok(doc) => {
            debug!(
                blocks = doc.content().map_or(0, <[Node]>::len),
                "document tree built"
            );
            Ok(doc)
        }
        Err(err) => {
            warn!(%err, "malformed token stream");
            Err(err)
        }
    }
}
