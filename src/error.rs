//! Error types.

use thiserror::Error;

use crate::token::TokenKind;

/// Malformed token stream.
///
/// Positions are indices into the token sequence handed to the builder.
/// Retrying with the same tokens always produces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("unexpected `{kind}` at token {position}: nothing is open")]
    UnmatchedClose { kind: TokenKind, position: usize },

    #[error("unexpected `{found}` at token {position}: expected `{expected}`")]
    MismatchedClose {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },

    #[error("unexpected end of stream: `{kind}` at token {position} is never closed")]
    UnclosedAtEnd { kind: TokenKind, position: usize },
}

impl StructuralError {
    /// Kind of the offending token.
    pub fn kind(&self) -> &TokenKind {
        match self {
            Self::UnmatchedClose { kind, .. } | Self::UnclosedAtEnd { kind, .. } => kind,
            Self::MismatchedClose { found, .. } => found,
        }
    }

    /// Stream position of the offending token.
    pub fn position(&self) -> usize {
        match self {
            Self::UnmatchedClose { position, .. }
            | Self::MismatchedClose { position, .. }
            | Self::UnclosedAtEnd { position, .. } => *position,
        }
    }
}

/// Errors from the JSON entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] StructuralError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_kind_and_position() {
        let err = StructuralError::UnmatchedClose {
            kind: TokenKind::ListItemClose,
            position: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("list_item_close"), "{msg}");
        assert!(msg.contains('7'), "{msg}");
        assert_eq!(err.position(), 7);
        assert_eq!(err.kind(), &TokenKind::ListItemClose);
    }

    #[test]
    fn test_mismatch_reports_found_kind() {
        let err = StructuralError::MismatchedClose {
            expected: TokenKind::ParagraphClose,
            found: TokenKind::HeadingClose,
            position: 2,
        };
        assert_eq!(err.kind(), &TokenKind::HeadingClose);
        assert!(err.to_string().contains("paragraph_close"));
    }
}
