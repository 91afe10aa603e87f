use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Copy text to the system clipboard with an OSC 52 escape sequence.
///
/// Works over SSH and inside tmux (with `set-clipboard on`) since the
/// terminal emulator does the copying.
pub fn copy_osc52(out: &mut impl Write, text: &str) -> io::Result<()> {
    let encoded = STANDARD.encode(text.as_bytes());
    write!(out, "\x1b]52;c;{}\x07", encoded)?;
    out.flush()
}
