use core_model::TextEditorModel;
use core_text::{Location, LocationRange};
use pretty_assertions::assert_eq;

fn at(text: &str, x: usize, y: usize) -> TextEditorModel {
    let mut m = TextEditorModel::new(text);
    m.set_cursor_location(Location::new(x, y)).unwrap();
    m
}

#[test]
fn forward_delete_at_end_of_line_joins() {
    let mut m = at("abc\ndef", 3, 0);
    m.delete_after();
    assert_eq!(m.lines(), ["abcdef"]);
    assert_eq!(m.cursor_location(), Location::new(3, 0));
}

#[test]
fn backspace_at_start_of_line_joins() {
    let mut m = at("hello\nworld", 0, 1);
    m.delete_before();
    assert_eq!(m.lines(), ["helloworld"]);
    assert_eq!(m.cursor_location(), Location::new(5, 0));
}

#[test]
fn single_line_range_delete() {
    let mut m = TextEditorModel::new("abcdef");
    m.delete_range(LocationRange::new(Location::new(1, 0), Location::new(4, 0)))
        .unwrap();
    assert_eq!(m.lines(), ["aef"]);
    assert_eq!(m.cursor_location().x, 1);
}

#[test]
fn three_line_range_delete_keeps_prefix_and_suffix() {
    // prefix "a" of line 0 up to x=1, suffix "f" of line 2 from x=1
    let mut m = TextEditorModel::new("ab\ncd\nef");
    m.delete_range(LocationRange::new(Location::new(1, 0), Location::new(1, 2)))
        .unwrap();
    assert_eq!(m.lines(), ["af"]);
}

#[test]
fn left_at_origin_stays_put() {
    let mut m = TextEditorModel::new("abc");
    m.move_cursor_left();
    assert_eq!(m.cursor_location(), Location::origin());
}

#[test]
fn right_past_last_char_stays_put() {
    let mut m = at("ab\ncd", 2, 1);
    m.move_cursor_right();
    assert_eq!(m.cursor_location(), Location::new(2, 1));
}

#[test]
fn walking_right_visits_every_position_once() {
    let mut m = TextEditorModel::new("ab\n\nc");
    let mut seen = vec![m.cursor_location()];
    for _ in 0..6 {
        m.move_cursor_right();
        seen.push(m.cursor_location());
    }
    assert_eq!(
        seen,
        vec![
            Location::new(0, 0),
            Location::new(1, 0),
            Location::new(2, 0),
            Location::new(0, 1),
            Location::new(0, 2),
            Location::new(1, 2),
            Location::new(1, 2),
        ]
    );
}

#[test]
fn backspacing_everything_leaves_one_empty_line() {
    let mut m = TextEditorModel::new("ab\ncd");
    m.set_cursor_location(Location::new(2, 1)).unwrap();
    for _ in 0..10 {
        m.delete_before();
    }
    assert_eq!(m.lines(), [""]);
    assert_eq!(m.cursor_location(), Location::origin());
}

#[test]
fn insert_then_delete_range_restores_lines() {
    let mut m = at("first\nsecond line\nthird", 3, 1);
    let before = m.lines().to_vec();
    let start = m.cursor_location();
    m.insert_text("XY\nmiddle\nZ");
    let end = m.cursor_location();
    assert_eq!(m.lines(), ["first", "secXY", "middle", "Zond line", "third"]);
    m.delete_range(LocationRange::new(start, end)).unwrap();
    assert_eq!(m.lines(), before.as_slice());
}
