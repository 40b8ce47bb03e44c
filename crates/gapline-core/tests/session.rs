//! End-to-end sessions: codes in, frame out.

use gapline_core::{Config, Editor, Evaluation};

const CTRL_A: u32 = 0x01;
const CTRL_B: u32 = 0x02;
const CTRL_E: u32 = 0x05;
const CTRL_N: u32 = 0x0e;
const CTRL_P: u32 = 0x10;
const CTRL_Q: u32 = 0x11;
const CTRL_U: u32 = 0x15;
const DEL: u32 = 0x7f;

fn codes(s: &str) -> impl Iterator<Item = u32> + '_ {
    s.chars().map(|c| c as u32)
}

fn small_editor(increment: usize, show_internals: bool) -> Editor {
    let mut config = Config::default();
    config.buffer.growth_increment = increment;
    config.display.show_internals = show_internals;
    Editor::with_config(config)
}

#[test]
fn test_gap_relocation_scenario() {
    let mut editor = small_editor(8, true);
    editor.evaluate_all(codes("hello")).unwrap();
    editor
        .evaluate_all([CTRL_B, CTRL_B, CTRL_B, 'X' as u32])
        .unwrap();

    let frame = editor.render().unwrap();
    assert_eq!(frame.lines, vec!["heXllo"]);
    let internals = frame.internals.unwrap();
    assert_eq!(internals.storage, "heX##llo");
    assert_eq!(
        internals.summary,
        "Gap start = 3 Gap end = 5 Point = 5 Count = 6"
    );
}

#[test]
fn test_multiline_editing() {
    let mut editor = small_editor(4, false);
    editor.evaluate_all(codes("first\rsecond\rthird")).unwrap();
    assert_eq!(editor.buffer().text(), "first\nsecond\nthird");

    // Up one line, to the start of "second", delete the line break before it
    editor.evaluate_all([CTRL_P, CTRL_A]).unwrap();
    assert_eq!(editor.buffer().point(), 6);
    editor.evaluate(DEL).unwrap();
    assert_eq!(editor.buffer().text(), "firstsecond\nthird");

    editor.evaluate_all([CTRL_N, CTRL_E]).unwrap();
    assert_eq!(editor.buffer().point(), editor.buffer().len());

    let frame = editor.render().unwrap();
    assert_eq!(frame.lines, vec!["firstsecond", "third"]);
    assert_eq!(frame.cursor.to_string(), "2:6");
}

#[test]
fn test_prefix_delete_stops_at_start() {
    let mut editor = Editor::new();
    editor.evaluate_all(codes("abc")).unwrap();
    editor.evaluate_all([CTRL_U, CTRL_U]).unwrap();

    let eval = editor.evaluate(DEL).unwrap();
    assert_eq!(
        eval,
        Evaluation {
            exit: false,
            bell: true
        }
    );
    assert!(editor.buffer().is_empty());
}

#[test]
fn test_quit_ends_session() {
    let mut editor = Editor::new();
    let bells = editor
        .evaluate_all(codes("ok").chain([DEL, DEL, DEL, CTRL_Q]).chain(codes("late")))
        .unwrap();

    assert_eq!(bells, 1);
    assert!(editor.should_quit());
    assert!(editor.buffer().is_empty());
}
