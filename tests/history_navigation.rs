
use pretty_assertions::assert_eq;

use rawline::{Editor, EditorConfig};
use scripted::{editor, editor_with, submit, ScriptedTerminal, DOWN, UP};

fn keys(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

fn ups(steps: usize) -> Vec<u8> {
    UP.repeat(steps)
}

fn history_lines(editor: &Editor<ScriptedTerminal>) -> Vec<String> {
    editor
        .history()
        .iter()
        .map(|entry| String::from_utf8_lossy(entry).into_owned())
        .collect()
}

/// Editor whose history already holds `lines`, oldest first.
fn seeded(lines: &[&str], config: EditorConfig) -> Editor<ScriptedTerminal> {
    let (mut editor, _) = editor_with(config);
    for line in lines {
        submit(&mut editor, format!("{line}\n").as_bytes()).expect("seed");
    }
    editor
}

#[test]
fn recall_walks_from_newest_to_oldest_and_clamps() {
    let cases = [(1, "help"), (2, "list"), (3, "help"), (4, "help"), (10, "help")];
    for (steps, expected) in cases {
        let mut editor = seeded(&["help", "list", "help"], EditorConfig::default());
        let mut input = ups(steps);
        input.push(b'\n');
        assert_eq!(
            submit(&mut editor, &input).expect("read"),
            expected,
            "steps={steps}"
        );
    }
}

#[test]
fn recalled_line_is_saved_again() {
    let mut editor = seeded(&["help", "list"], EditorConfig::default());
    submit(&mut editor, &keys(&[UP, UP, b"\n"])).expect("read");
    assert_eq!(history_lines(&editor), vec!["help", "list", "help"]);
}

#[test]
fn up_then_down_the_same_number_of_steps_restores_empty_input() {
    for steps in 1..=3 {
        let mut editor = seeded(&["one", "two", "three"], EditorConfig::default());
        let mut input = ups(steps);
        input.extend_from_slice(&DOWN.repeat(steps));
        input.push(b'\n');
        assert_eq!(submit(&mut editor, &input).expect("read"), "", "steps={steps}");
    }
}

#[test]
fn down_past_newest_discards_typed_text() {
    let mut editor = seeded(&["saved"], EditorConfig::default());
    let input = keys(&[b"draft", UP, DOWN, b"\n"]);
    assert_eq!(submit(&mut editor, &input).expect("read"), "");
}

#[test]
fn down_without_browsing_keeps_live_input() {
    let mut editor = seeded(&["saved"], EditorConfig::default());
    let input = keys(&[b"draft", DOWN, b"\n"]);
    assert_eq!(submit(&mut editor, &input).expect("read"), "draft");
}

#[test]
fn up_with_empty_history_keeps_live_input() {
    let (mut editor, _) = editor();
    let input = keys(&[b"draft", UP, b"\n"]);
    assert_eq!(submit(&mut editor, &input).expect("read"), "draft");
}

#[test]
fn oldest_line_is_evicted_after_capacity_overflow() {
    let lines: Vec<String> = (0..101).map(|idx| format!("line {idx}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut editor = seeded(&refs, EditorConfig::default());
    assert_eq!(editor.history().len(), 100);
    assert!(!history_lines(&editor).iter().any(|line| line == "line 0"));

    let mut input = ups(150);
    input.push(b'\n');
    assert_eq!(submit(&mut editor, &input).expect("read"), "line 1");
}

#[test]
fn every_retained_entry_is_reachable_after_overflow() {
    let lines = ["cmd0", "cmd1", "cmd2", "cmd3", "cmd4", "cmd5", "cmd6", "cmd7"];
    let config = || EditorConfig::default().with_history_capacity(5);

    let editor = seeded(&lines, config());
    assert_eq!(
        history_lines(&editor),
        vec!["cmd3", "cmd4", "cmd5", "cmd6", "cmd7"]
    );

    for steps in 1..=5 {
        let mut editor = seeded(&lines, config());
        let mut input = ups(steps);
        input.push(b'\n');
        let expected = format!("cmd{}", 8 - steps);
        assert_eq!(submit(&mut editor, &input).expect("read"), expected);
    }
}

#[test]
fn blank_lines_never_reach_history() {
    let (mut editor, _) = editor();
    for _ in 0..3 {
        assert_eq!(submit(&mut editor, b"\n").expect("read"), "");
    }
    assert_eq!(submit(&mut editor, b"   \n").expect("read"), "   ");
    assert_eq!(submit(&mut editor, b" \t \n").expect("read"), " \t ");
    assert!(editor.history().is_empty());
}

#[test]
fn editing_a_recalled_line_restarts_browsing_from_newest() {
    let mut editor = seeded(&["one", "two"], EditorConfig::default());
    // Recall "one", edit it, then Up starts again from "two".
    let input = keys(&[UP, UP, b"x", UP, b"\n"]);
    assert_eq!(submit(&mut editor, &input).expect("read"), "two");
}

#[test]
fn backspace_also_leaves_browsing() {
    let mut editor = seeded(&["one", "two"], EditorConfig::default());
    let input = keys(&[UP, UP, b"\x7f", DOWN, b"\n"]);
    // Down is ignored once browsing has ended, so the edited recall remains.
    assert_eq!(submit(&mut editor, &input).expect("read"), "on");
}

#[test]
fn recalled_line_redraws_prompt_and_entry() {
    let (mut editor, probe) = editor();
    submit(&mut editor, "café\n".as_bytes()).expect("read");
    probe.clear_output();
    submit(&mut editor, &keys(&[UP, b"\n"])).expect("read");
    // Prompt (2) + "café" (4 characters, 5 bytes) puts the cursor in column 7.
    assert!(
        probe.output_lossy().contains("\x1b[2K\r> café\x1b[7G"),
        "{:?}",
        probe.output_lossy()
    );
}

#[test]
fn each_read_line_starts_without_a_selection() {
    let mut editor = seeded(&["a", "b", "c"], EditorConfig::default());
    assert_eq!(
        submit(&mut editor, &keys(&[UP, UP, UP, b"\n"])).expect("read"),
        "a"
    );
    // A carried-over selection would make Down recall "b".
    assert_eq!(submit(&mut editor, &keys(&[DOWN, b"\n"])).expect("read"), "");
}
