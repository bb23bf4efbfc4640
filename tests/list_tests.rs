//! List conversion tests.
//!
//! Tight and loose lists, ordered start numbers, nesting across list kinds,
//! and empty items.

use adfmark::{Node, to_adf};
use pretty_assertions::assert_eq;

fn blocks(input: &str) -> Vec<Node> {
    match to_adf(input).unwrap() {
        Node::Doc { content, .. } => content,
        other => panic!("expected doc, got {other:?}"),
    }
}

fn item(text: &str) -> Node {
    Node::ListItem {
        content: vec![Node::paragraph(vec![Node::text(text)])],
    }
}

// === Bullet lists ===

#[test]
fn tight_bullet_list() {
    assert_eq!(
        blocks("- a\n- b\n- c"),
        vec![Node::BulletList {
            content: vec![item("a"), item("b"), item("c")],
        }]
    );
}

/// Loose and tight lists produce the same tree.
#[test]
fn loose_bullet_list() {
    assert_eq!(blocks("- a\n\n- b"), blocks("- a\n- b"));
}

#[test]
fn alternate_bullet_markers() {
    for input in ["* one", "+ one"] {
        assert_eq!(
            blocks(input),
            vec![Node::BulletList {
                content: vec![item("one")],
            }],
            "{input}"
        );
    }
}

/// An item holding only the marker has no content.
#[test]
fn empty_list_item() {
    assert_eq!(
        blocks("- foo\n-\n- bar"),
        vec![Node::BulletList {
            content: vec![item("foo"), Node::ListItem { content: vec![] }, item("bar")],
        }]
    );
}

// === Ordered lists ===

#[test]
fn ordered_list_starting_at_one_has_no_attrs() {
    assert_eq!(
        blocks("1. one\n2. two")[0],
        Node::OrderedList {
            attrs: None,
            content: vec![item("one"), item("two")],
        }
    );
}

#[test]
fn ordered_list_keeps_start_number() {
    assert_eq!(
        blocks("3. c\n4. d"),
        vec![Node::ordered_list(3, vec![item("c"), item("d")])]
    );
}

#[test]
fn ordered_list_with_paren_delimiter() {
    assert_eq!(
        blocks("1) first"),
        vec![Node::ordered_list(1, vec![item("first")])]
    );
}

// === Nesting ===

#[test]
fn ordered_list_inside_bullet_item() {
    assert_eq!(
        blocks("- outer\n  1. inner"),
        vec![Node::BulletList {
            content: vec![Node::ListItem {
                content: vec![
                    Node::paragraph(vec![Node::text("outer")]),
                    Node::ordered_list(1, vec![item("inner")]),
                ],
            }],
        }]
    );
}

#[test]
fn three_levels_of_bullets() {
    let doc = blocks("- a\n  - b\n    - c");
    let level1 = doc[0].content().unwrap();
    let level2 = level1[0].content().unwrap()[1].content().unwrap();
    let level3 = level2[0].content().unwrap()[1].content().unwrap();
    assert_eq!(level3, &[item("c")]);
}

/// Siblings after a nested list stay in the outer list.
#[test]
fn sibling_after_nested_list() {
    let doc = blocks("- a\n  - b\n- c");
    let outer = doc[0].content().unwrap();
    assert_eq!(outer.len(), 2);
    assert_eq!(outer[1], item("c"));
}

#[test]
fn list_item_with_several_paragraphs() {
    assert_eq!(
        blocks("- first\n\n  second"),
        vec![Node::BulletList {
            content: vec![Node::ListItem {
                content: vec![
                    Node::paragraph(vec![Node::text("first")]),
                    Node::paragraph(vec![Node::text("second")]),
                ],
            }],
        }]
    );
}

#[test]
fn code_block_inside_list_item() {
    let doc = blocks("- item\n\n  ```sh\n  ls\n  ```");
    let content = doc[0].content().unwrap()[0].content().unwrap();
    assert_eq!(content[1], Node::code_block(Some("sh"), "ls"));
}

#[test]
fn list_inside_blockquote() {
    assert_eq!(
        blocks("> - quoted"),
        vec![Node::Blockquote {
            content: vec![Node::BulletList {
                content: vec![item("quoted")],
            }],
        }]
    );
}

/// Without the task-list extension the checkbox stays literal text.
#[test]
fn task_marker_is_plain_text() {
    assert_eq!(
        blocks("- [ ] todo"),
        vec![Node::BulletList {
            content: vec![item("[ ] todo")],
        }]
    );
}

#[test]
fn marked_text_in_list_item() {
    let doc = blocks("- **bold** item");
    let para = &doc[0].content().unwrap()[0].content().unwrap()[0];
    assert_eq!(
        para.content().unwrap(),
        &[
            Node::marked_text("bold", vec![adfmark::Mark::Strong]),
            Node::text(" item"),
        ]
    );
}
