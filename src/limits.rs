//! Nesting limits.
//!
//! These bound recursion on pathological inputs. Exceeding one never fails
//! a conversion.

/// Maximum list-item recursion depth in the tree builder.
/// Deeper items are built on the builder's explicit frame stack.
pub const MAX_BLOCK_NESTING: usize = 128;

/// Maximum number of simultaneously open inline marks.
/// Marks opened beyond this depth are ignored; their text is kept.
pub const MAX_INLINE_NESTING: usize = 32;
