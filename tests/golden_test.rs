use std::fs;
use std::path::PathBuf;

use tp_renumber::{Config, Document, Editor, EditorHost, Position, Session, scan};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).expect("fixture exists")
}

/// Run one forced pass with the cursor on the first body line
fn renumber_text(name: &str, content: &str) -> (Session, Editor) {
    let mut session = Session::new(Config::default());
    let document = Document::new(name, content);
    scan(&mut session, &document);
    let first_body_line = session.record(name).and_then(|r| r.body_start).unwrap() + 1;

    let mut editor = Editor::new(document, Position::new(first_body_line, 0));
    session.update_line_numbers(&mut editor).expect("pass runs");
    (session, editor)
}

fn assert_golden(input: &str, expected: &str) {
    let (mut session, mut editor) = renumber_text(input, &fixture(input));
    assert_eq!(editor.document().content(), fixture(expected));

    let second = session.update_line_numbers(&mut editor).expect("pass runs");
    assert!(second.edits.is_empty(), "second pass changed {:?}", second.edits);
}

#[test]
fn test_golden_main() {
    assert_golden("MAIN.ls", "MAIN.expected.ls");
}

#[test]
fn test_golden_continuations() {
    assert_golden("CONT.ls", "CONT.expected.ls");
}

#[test]
fn test_golden_main_crlf() {
    let input = fixture("MAIN.ls").replace('\n', "\r\n");
    let expected = fixture("MAIN.expected.ls").replace('\n', "\r\n");

    let (_, editor) = renumber_text("MAIN.ls", &input);

    assert_eq!(editor.document().content(), expected);
}

#[test]
fn test_header_and_position_data_untouched() {
    let (_, editor) = renumber_text("MAIN.ls", &fixture("MAIN.ls"));
    let lines = editor.document().lines();

    assert_eq!(lines[2], "OWNER       = MNEDITOR;");
    assert_eq!(lines[4], "/MN");
    let pos = lines.iter().position(|l| *l == "/POS").unwrap();
    assert_eq!(lines[pos + 2], "   GP1:");
}

#[test]
fn test_numbers_strictly_increase_outside_continuations() {
    let (_, editor) = renumber_text("MAIN.ls", &fixture("MAIN.ls"));
    let lines = editor.document().lines();
    let start = lines.iter().position(|l| *l == "/MN").unwrap() + 1;
    let end = lines.iter().position(|l| *l == "/POS").unwrap();

    let numbers: Vec<usize> = lines[start..end]
        .iter()
        .filter(|l| !l.trim_start().starts_with(':'))
        .map(|l| l[..4].trim().parse().unwrap())
        .collect();

    let expected: Vec<usize> = (1..=numbers.len()).collect();
    assert_eq!(numbers, expected);
}
