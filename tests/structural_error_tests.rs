//! Malformed token stream tests.
//!
//! The lexer always produces balanced streams, so these build hand-written
//! token sequences and check the error kind and position.

use adfmark::{Node, StructuralError, Token, TokenKind, build, limits, to_adf};

fn t(kind: TokenKind) -> Token {
    Token::new(kind)
}

fn inline(text: &str) -> Token {
    Token::inline(vec![Token::with_content(TokenKind::Text, text)])
}

#[test]
fn stray_close_at_start() {
    let err = build(&[t(TokenKind::ListItemClose)]).unwrap_err();
    assert_eq!(
        err,
        StructuralError::UnmatchedClose {
            kind: TokenKind::ListItemClose,
            position: 0,
        }
    );
}

#[test]
fn stray_close_after_complete_block() {
    let tokens = [
        t(TokenKind::ParagraphOpen),
        inline("a"),
        t(TokenKind::ParagraphClose),
        t(TokenKind::BlockquoteClose),
    ];
    let err = build(&tokens).unwrap_err();
    assert!(matches!(err, StructuralError::UnmatchedClose { .. }));
    assert_eq!(err.position(), 3);
}

#[test]
fn close_of_wrong_kind() {
    let tokens = [
        t(TokenKind::ParagraphOpen),
        inline("a"),
        t(TokenKind::BlockquoteClose),
    ];
    assert_eq!(
        build(&tokens).unwrap_err(),
        StructuralError::MismatchedClose {
            expected: TokenKind::ParagraphClose,
            found: TokenKind::BlockquoteClose,
            position: 2,
        }
    );
}

#[test]
fn crossed_containers() {
    let tokens = [
        t(TokenKind::BlockquoteOpen),
        t(TokenKind::BulletListOpen),
        t(TokenKind::BlockquoteClose),
        t(TokenKind::BulletListClose),
    ];
    let err = build(&tokens).unwrap_err();
    assert_eq!(err.kind(), &TokenKind::BlockquoteClose);
    assert_eq!(err.position(), 2);
}

#[test]
fn unclosed_container_reports_its_open_token() {
    let tokens = [
        t(TokenKind::BlockquoteOpen),
        t(TokenKind::ParagraphOpen),
        inline("a"),
        t(TokenKind::ParagraphClose),
    ];
    assert_eq!(
        build(&tokens).unwrap_err(),
        StructuralError::UnclosedAtEnd {
            kind: TokenKind::BlockquoteOpen,
            position: 0,
        }
    );
}

#[test]
fn unclosed_list_item() {
    let tokens = [
        t(TokenKind::BulletListOpen),
        t(TokenKind::ListItemOpen),
        t(TokenKind::ParagraphOpen),
        inline("a"),
        t(TokenKind::ParagraphClose),
        t(TokenKind::BulletListClose),
    ];
    assert_eq!(
        build(&tokens).unwrap_err(),
        StructuralError::UnclosedAtEnd {
            kind: TokenKind::ListItemOpen,
            position: 1,
        }
    );
}

/// Positions inside a list item are reported against the whole stream.
#[test]
fn error_inside_list_item_uses_stream_position() {
    let tokens = [
        t(TokenKind::BulletListOpen),
        t(TokenKind::ListItemOpen),
        t(TokenKind::ParagraphOpen),
        inline("a"),
        t(TokenKind::HeadingClose),
        t(TokenKind::ListItemClose),
        t(TokenKind::BulletListClose),
    ];
    let err = build(&tokens).unwrap_err();
    assert!(matches!(err, StructuralError::MismatchedClose { .. }));
    assert_eq!(err.position(), 4);
}

/// Last node of the first-child chain below `node`, and its depth.
fn innermost(node: &Node) -> (&Node, usize) {
    let mut depth = 0;
    let mut current = node;
    while let Some(child) = current.content().and_then(<[Node]>::first) {
        depth += 1;
        current = child;
    }
    (current, depth)
}

/// Well-formed streams nested past the block limit still build.
#[test]
fn nesting_beyond_limit_builds() {
    let depth = limits::MAX_BLOCK_NESTING + 10;
    let mut tokens = vec![t(TokenKind::BlockquoteOpen); depth];
    tokens.push(t(TokenKind::ParagraphOpen));
    tokens.push(inline("deep"));
    tokens.push(t(TokenKind::ParagraphClose));
    tokens.extend(vec![t(TokenKind::BlockquoteClose); depth]);
    let doc = build(&tokens).unwrap();
    let (leaf, leaf_depth) = innermost(&doc);
    assert_eq!(leaf.as_text(), Some("deep"));
    assert_eq!(leaf_depth, depth + 2);
}

#[test]
fn deeply_nested_markdown_converts() {
    for marker in ["> ", "- "] {
        let input = marker.repeat(200) + "deep\n";
        let doc = to_adf(&input).unwrap();
        let (leaf, leaf_depth) = innermost(&doc);
        assert_eq!(leaf.as_text(), Some("deep"), "{marker:?}");
        assert!(leaf_depth > limits::MAX_BLOCK_NESTING, "{marker:?} reached depth {leaf_depth}");
    }
}

/// The same stream fails the same way every time.
#[test]
fn errors_are_deterministic() {
    let tokens = [t(TokenKind::TableOpen), t(TokenKind::TrOpen), t(TokenKind::TableClose)];
    assert_eq!(build(&tokens), build(&tokens));
}

#[test]
fn message_names_token_and_position() {
    let err = build(&[t(TokenKind::ParagraphOpen)]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("paragraph_open"), "{msg}");
    assert!(msg.contains("token 0"), "{msg}");
}

#[test]
fn json_entry_point_wraps_structure_errors() {
    let err: adfmark::Error = StructuralError::UnmatchedClose {
        kind: TokenKind::TdClose,
        position: 5,
    }
    .into();
    assert!(matches!(err, adfmark::Error::Structure(_)));
    assert!(err.to_string().contains("td_close"));
}
