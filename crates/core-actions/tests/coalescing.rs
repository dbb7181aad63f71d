mod common;

use common::{Harness, caret_end};
use core_state::HISTORY_TIME_GAP;

#[test]
fn typing_a_word_quickly_is_one_entry() {
    let mut h = Harness::new(caret_end("let "));
    h.type_str("cat", 100);
    assert_eq!(h.depth(), 2);
    let current = &h.session.history().current().unwrap().state;
    assert!(current.value().ends_with("cat"));
    h.press("ctrl+z");
    assert_eq!(h.value(), "let ");
}

#[test]
fn pause_longer_than_gap_starts_new_entry() {
    let mut h = Harness::new(caret_end("let "));
    h.type_str("ca", 100);
    h.wait(HISTORY_TIME_GAP.as_millis() as u64 + 1);
    h.type_char('t');
    assert_eq!(h.depth(), 3);
    h.press("ctrl+z");
    assert_eq!(h.value(), "let ca");
}

#[test]
fn separator_breaks_the_word() {
    let mut h = Harness::new(caret_end("let "));
    h.type_str("cat dog", 100);
    // [let ] [let cat] [let cat ] [let cat dog]
    assert_eq!(h.depth(), 4);
    h.press("ctrl+z");
    assert_eq!(h.value(), "let cat ");
}

#[test]
fn word_at_line_start_is_not_coalesced() {
    let mut h = Harness::new(caret_end(""));
    h.type_str("ab", 10);
    assert_eq!(h.depth(), 3);
}

#[test]
fn only_the_caret_line_is_inspected() {
    let mut h = Harness::new(caret_end("x foo\n"));
    h.type_str(" fo", 10);
    // "foo" on the line above never matches; only "f" -> "fo" coalesces.
    assert_eq!(h.depth(), 3);
    assert_eq!(h.value(), "x foo\n fo");
}
