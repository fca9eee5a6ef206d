use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter thumbprint (or EXIT to exit): ";
pub const EXIT_COMMAND: &str = "EXIT";

/// Prompt until a non-blank thumbprint is entered.
/// Returns `None` on `EXIT` or when input is exhausted.
pub fn read_thumbprint<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<String>> {
    let mut line = String::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let value = line.trim_end_matches(['\r', '\n']);
        if value == EXIT_COMMAND {
            return Ok(None);
        }
        if value.trim().is_empty() {
            continue;
        }
        return Ok(Some(value.to_string()));
    }
}
