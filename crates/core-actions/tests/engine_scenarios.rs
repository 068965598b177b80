mod common;

use common::*;
use core_events::{KeyCode, KeyModifiers};
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn paste_with_newline_splits_rows() {
    let mut s = session("helloworld");
    type_keys(&mut s, "lllll");
    assert_eq!(s.cursor(), Position::new(0, 5));
    type_keys(&mut s, "i");
    assert_eq!(s.mode(), Mode::Edit);
    paste(&mut s, "a\nb");
    assert_eq!(s.lines(), vec!["helloa", "bworld"]);
    assert_eq!(s.document().text(), "helloa\nbworld");
    assert_eq!(s.cursor(), Position::new(1, 1));
}

#[test]
fn paste_expands_tabs() {
    let mut s = session("x");
    type_keys(&mut s, "i");
    paste(&mut s, "a\tb");
    assert_eq!(s.lines(), vec!["a    bx"]);
    assert_eq!(s.cursor(), Position::new(0, 6));
}

#[test]
fn paste_with_several_newlines() {
    let mut s = session_with("xy", 2, 10);
    type_keys(&mut s, "li");
    paste(&mut s, "1\n\n2\n3");
    assert_eq!(s.lines(), vec!["x1", "", "2", "3y"]);
    assert_eq!(s.cursor(), Position::new(3, 1));
}

#[test]
fn word_forward_lands_after_spaces() {
    let mut s = session("hello world foo");
    type_keys(&mut s, "w");
    assert_eq!(s.cursor().column, 6);
    type_keys(&mut s, "w");
    assert_eq!(s.cursor().column, 12);
    type_keys(&mut s, "w");
    assert_eq!(s.cursor().column, 15);
    type_keys(&mut s, "b");
    assert_eq!(s.cursor().column, 12);
}

#[test]
fn backspace_at_row_start_merges_rows() {
    let mut s = session("abc\ndef");
    type_keys(&mut s, "ji");
    assert_eq!(s.cursor(), Position::new(1, 0));
    press(&mut s, KeyCode::Backspace);
    assert_eq!(s.lines(), vec!["abcdef"]);
    assert_eq!(s.cursor(), Position::new(0, 3));
}

#[test]
fn backspace_at_document_start_is_noop() {
    let mut s = session("abc");
    type_keys(&mut s, "i");
    let r = press(&mut s, KeyCode::Backspace);
    assert!(!r.modified);
    assert_eq!(s.lines(), vec!["abc"]);
    assert!(!s.is_dirty());
}

#[test]
fn typing_in_edit_mode_and_escaping() {
    let mut s = session("");
    type_keys(&mut s, "i");
    type_keys(&mut s, "# Title");
    press(&mut s, KeyCode::Enter);
    type_keys(&mut s, "body jk");
    press(&mut s, KeyCode::Esc);
    assert_eq!(s.mode(), Mode::Navigation);
    assert_eq!(s.lines(), vec!["# Title", "body jk"]);
    assert!(s.is_dirty());
    let snap = s.snapshot();
    assert_eq!(snap.rows[0].heading, Some(1));
    assert_eq!(snap.rows[1].heading, None);
    // Navigation again: `k` moves up instead of inserting.
    type_keys(&mut s, "k");
    assert_eq!(s.cursor(), Position::new(0, 7));
}

#[test]
fn tab_inserts_four_spaces() {
    let mut s = session("x");
    type_keys(&mut s, "i");
    press(&mut s, KeyCode::Tab);
    assert_eq!(s.lines(), vec!["    x"]);
    assert_eq!(s.cursor(), Position::new(0, 4));
}

#[test]
fn shift_enter_inserts_newline() {
    let mut s = session("ab");
    type_keys(&mut s, "li");
    press_mod(&mut s, KeyCode::Enter, KeyModifiers::SHIFT);
    assert_eq!(s.lines(), vec!["a", "b"]);
}

#[test]
fn preferred_column_survives_short_rows() {
    let mut s = session("abcdefgh\nab\n\nabcdefghij");
    type_keys(&mut s, "llllll");
    assert_eq!(s.cursor(), Position::new(0, 6));
    type_keys(&mut s, "j");
    assert_eq!(s.cursor(), Position::new(1, 2));
    type_keys(&mut s, "j");
    assert_eq!(s.cursor(), Position::new(2, 0));
    type_keys(&mut s, "j");
    assert_eq!(s.cursor(), Position::new(3, 6));
    // A blocked horizontal move keeps the remembered column.
    type_keys(&mut s, "kk");
    assert_eq!(s.cursor(), Position::new(1, 2));
    type_keys(&mut s, "l");
    assert_eq!(s.cursor(), Position::new(1, 2));
    assert_eq!(s.preferred_column(), 6);
    type_keys(&mut s, "k");
    assert_eq!(s.cursor(), Position::new(0, 6));
}

#[test]
fn arrows_move_in_both_modes() {
    let mut s = session("ab\ncd");
    press(&mut s, KeyCode::Right);
    press(&mut s, KeyCode::Down);
    assert_eq!(s.cursor(), Position::new(1, 1));
    type_keys(&mut s, "i");
    press(&mut s, KeyCode::Left);
    press(&mut s, KeyCode::Up);
    assert_eq!(s.cursor(), Position::new(0, 0));
    assert_eq!(s.mode(), Mode::Edit);
}

#[test]
fn first_last_row_and_row_edges() {
    let mut s = session("one\ntwo\nthree");
    type_keys(&mut s, "G");
    assert_eq!(s.cursor().row, 2);
    type_keys(&mut s, "$");
    assert_eq!(s.cursor(), Position::new(2, 5));
    type_keys(&mut s, "gg");
    assert_eq!(s.cursor(), Position::new(0, 3));
    type_keys(&mut s, "0");
    assert_eq!(s.cursor(), Position::new(0, 0));
}

#[test]
fn x_deletes_under_cursor_but_not_at_row_end() {
    let mut s = session("ab\ncd");
    type_keys(&mut s, "x");
    assert_eq!(s.lines(), vec!["b", "cd"]);
    type_keys(&mut s, "$");
    assert_eq!(s.cursor(), Position::new(0, 1));
    let r = feed(&mut s, core_events::InputEvent::Keystroke('x'));
    assert!(!r.modified);
    assert_eq!(s.lines(), vec!["b", "cd"]);
}

#[test]
fn pending_sequences_and_discards() {
    let mut s = session("a\nb\nc");
    type_keys(&mut s, "G");
    type_keys(&mut s, "g");
    assert_eq!(s.pending(), "g");
    assert_eq!(s.snapshot().pending, "g");
    type_keys(&mut s, "x");
    assert_eq!(s.pending(), "");
    assert_eq!(s.lines(), vec!["a", "b", "c"], "discarded sequence executes nothing");
    type_keys(&mut s, "d");
    press(&mut s, KeyCode::Esc);
    assert_eq!(s.pending(), "");
    type_keys(&mut s, "zq");
    assert_eq!(s.cursor(), Position::new(2, 0));
}

#[test]
fn printable_keys_never_insert_in_navigation() {
    let mut s = session("abc");
    type_keys(&mut s, "ZQ@!");
    assert_eq!(s.lines(), vec!["abc"]);
    assert!(!s.is_dirty());
}

#[test]
fn scroll_commands_move_window_and_drag_cursor() {
    let text: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
    let mut s = session_with(&text.join("\n"), 100, 5);
    type_keys(&mut s, "]]");
    let snap = s.snapshot();
    assert_eq!(snap.scroll_offset, 2);
    assert_eq!(s.cursor().row, 2);
    assert_eq!(snap.rows.first().map(|r| r.index), Some(2));
    assert_eq!(snap.rows.len(), 5);
    type_keys(&mut s, "[[[");
    assert_eq!(s.snapshot().scroll_offset, 0);
    type_keys(&mut s, "G]");
    assert_eq!(s.snapshot().scroll_offset, 15, "clamped to row_count - height");
}

#[test]
fn quit_shortcut() {
    let mut s = session("");
    let r = press_mod(&mut s, KeyCode::Char('q'), KeyModifiers::CTRL);
    assert!(r.quit);
}

#[test]
fn resize_keeps_cursor_visible() {
    let text: Vec<String> = (0..20).map(|i| i.to_string()).collect();
    let mut s = session_with(&text.join("\n"), 100, 20);
    type_keys(&mut s, "G");
    s.resize(4);
    assert_invariants(&s);
    assert_eq!(s.snapshot().scroll_offset, 16);
}
