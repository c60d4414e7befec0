//! Echoes every entered line back. Enter a line starting with Ctrl-D to quit.
//!
//! `RAWLINE_LOG=/tmp/rawline.log` records editor diagnostics to a file.

use std::io::Write;

use rawline::{logging, Editor};

const END_OF_TRANSMISSION: char = '\u{4}';

fn main() -> std::io::Result<()> {
    if let Err(err) = logging::init_from_env() {
        eprintln!("echo-repl: {err}");
    }

    let mut editor = Editor::setup();
    let mut count = 0usize;
    loop {
        let line = editor.read_line();
        if line.starts_with(END_OF_TRANSMISSION) {
            break;
        }
        count += 1;

        // The submitted line has been cleared; print on that row and move on.
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{line}\r\n")?;
        stdout.flush()?;
        drop(stdout);

        editor.set_prompt(format!("[{count}]> "));
    }

    drop(editor);
    println!("bye");
    Ok(())
}
