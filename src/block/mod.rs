//! Block-level tree construction.
//!
//! The builder resolves open/close token pairs into nested nodes:
//! - headings and paragraphs take their inline run as content
//! - lists recurse into each item's token range
//! - tables split header cells from body cells
//! - blockquotes nest arbitrary blocks

mod builder;
mod nesting;

pub use builder::TreeBuilder;
pub use nesting::{TableSection, list_item_span};
