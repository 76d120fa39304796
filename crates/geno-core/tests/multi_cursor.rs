use geno_core::{Coordinate, Cursor, CursorInputMode, Document, EditorConfig, MultiCursorMode};
use pretty_assertions::assert_eq;

fn doc(text: &str) -> Document {
    Document::new(text, EditorConfig::default())
}

fn carets(doc: &mut Document, positions: &[(usize, usize)]) {
    doc.cursors_mut().set_all(
        positions
            .iter()
            .map(|&(x, y)| Cursor::at(Coordinate::new(x, y)))
            .collect(),
    );
}

fn positions(doc: &Document) -> Vec<Coordinate> {
    doc.cursors().cursors().iter().map(|c| c.position).collect()
}

#[test]
fn test_single_cursor_insert_does_not_move_cursor_on_other_line() {
    let mut d = doc("ab\ncd");
    carets(&mut d, &[(2, 0), (2, 1)]);

    d.insert_char_at(0, 'X');

    assert_eq!(d.line_text(0), "abX");
    assert_eq!(d.line_text(1), "cd");
    assert_eq!(d.cursors().get(1).unwrap().position, Coordinate::new(2, 1));
}

#[test]
fn test_selection_is_replaced_by_typed_character() {
    let mut d = doc("abc");
    d.set_selection(Coordinate::new(0, 0), Coordinate::new(2, 0));

    d.insert_char('Z');

    assert_eq!(d.text(), "Zc");
    assert_eq!(positions(&d), vec![Coordinate::new(1, 0)]);
    assert!(!d.cursors().primary().has_selection());
}

#[test]
fn test_enter_on_every_line() {
    let mut d = doc("    a\n    b");
    carets(&mut d, &[(5, 1), (5, 0)]);

    d.enter();

    assert_eq!(d.text(), "    a\n    \n    b\n    ");
    assert_eq!(positions(&d), vec![Coordinate::new(4, 3), Coordinate::new(4, 1)]);
}

#[test]
fn test_selection_swallowing_other_cursor_on_delete() {
    let mut d = doc("hello world");
    let mut wide = Cursor::at(Coordinate::new(0, 0));
    wide.select_from(Coordinate::new(0, 0), Coordinate::new(8, 0));
    d.cursors_mut()
        .set_all(vec![Cursor::at(Coordinate::new(3, 0)), wide]);

    d.backspace();

    assert_eq!(d.text(), "rld");
    assert_eq!(positions(&d), vec![Coordinate::new(0, 0)]);
}

#[test]
fn test_box_selection_typing_and_backspace_do_not_join_lines() {
    let mut d = doc("abc\nabc\nabc");
    d.begin_box_selection(Coordinate::new(0, 0));
    d.drag_box_selection(Coordinate::new(0, 2));
    assert_eq!(d.cursors().mode(), MultiCursorMode::Box);
    assert_eq!(d.cursors().len(), 3);

    d.backspace();
    assert_eq!(d.text(), "abc\nabc\nabc");

    d.insert_text("// ");
    assert_eq!(d.text(), "// abc\n// abc\n// abc");
    assert_eq!(d.cursors().mode(), MultiCursorMode::Normal);
}

#[test]
fn test_overwrite_mode_across_cursors() {
    let mut d = doc("aaaa\nbbbb");
    carets(&mut d, &[(0, 0), (0, 1)]);
    d.set_input_mode(CursorInputMode::Insert);

    d.insert_text("xy");

    assert_eq!(d.text(), "xyaa\nxybb");
}

#[test]
fn test_cut_paste_lines_between_cursors() {
    let mut d = doc("one\ntwo\nthree");
    carets(&mut d, &[(1, 0), (1, 2)]);

    let clipboard = d.cut();
    assert_eq!(clipboard, "one\nthree\n");
    assert_eq!(d.text(), "two");

    d.set_cursor(Coordinate::new(0, 0));
    d.paste(&clipboard);
    assert_eq!(d.text(), "one\nthree\ntwo");
}

#[test]
fn test_column_copy_then_paste_round_trips() {
    let mut d = doc("k1 = a\nk2 = b");
    d.begin_box_selection(Coordinate::new(0, 0));
    d.drag_box_selection(Coordinate::new(2, 1));
    let copied = d.copy();
    assert_eq!(copied, "k1\nk2");

    let mut other = doc("x\ny");
    carets(&mut other, &[(1, 0), (1, 1)]);
    other.paste(&copied);
    assert_eq!(other.text(), "xk1\nyk2");
}

#[test]
fn test_swap_lines_with_selection_spanning_lines() {
    let mut d = doc("a\nb\nc\nd");
    d.set_selection(Coordinate::new(0, 1), Coordinate::new(1, 2));

    assert!(d.swap_lines(false));
    assert_eq!(d.text(), "a\nd\nb\nc");
    let cursor = *d.cursors().primary();
    assert_eq!(cursor.selection_start, Coordinate::new(0, 2));
    assert_eq!(cursor.selection_end, Coordinate::new(1, 3));

    assert!(!d.swap_lines(false));
}
