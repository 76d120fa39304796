use geno_core::{Coordinate, EditorConfig, FileSession};

fn main() {
    let mut session = FileSession::from_text(
        "red = 1\ngreen = 2\nblue = 3\n// red again",
        EditorConfig::default(),
    );

    // Alt+drag over the first three lines, then type a prefix on each of them.
    session.edit(|doc| {
        doc.begin_box_selection(Coordinate::new(0, 0));
        doc.drag_box_selection(Coordinate::new(0, 2));
        doc.insert_text("let ");
    });
    session.join_lines();
    assert_eq!(
        session.text(),
        "let red = 1\nlet green = 2\nlet blue = 3\n// red again"
    );

    // Find every "red" and step through the matches.
    session.start_search("red", true, true).unwrap();
    session.wait_for_search();
    assert_eq!(session.search_results().len(), 2);

    let first = session.select_next_match().unwrap();
    let second = session.select_next_match().unwrap();
    assert_eq!(first.start, Coordinate::new(4, 0));
    assert_eq!(second.start, Coordinate::new(3, 3));
    println!("matches at {first:?} and {second:?}");
}
