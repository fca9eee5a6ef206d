use std::io::{self, Write};

pub const MIN_TITLE_WIDTH: usize = 46;

pub fn title_width(desc: &str) -> usize {
    (desc.chars().count() + 4).max(MIN_TITLE_WIDTH)
}

/// The centered line: `<left #> desc <right #>`.
/// The right side is one `#` longer exactly when `desc` has an odd length; for
/// long odd descriptions this makes the line one wider than `title_width(desc)`.
pub fn title_line(desc: &str) -> String {
    let len = desc.chars().count();
    let left = (title_width(desc) - len - 2) / 2;
    let right = if len % 2 == 0 { left } else { left + 1 };
    format!("{} {} {}", "#".repeat(left), desc, "#".repeat(right))
}

/// Print `desc` centered in a `#` banner, optionally framed by full-width `#` rules.
pub fn print_title<W: Write + ?Sized>(
    out: &mut W,
    desc: &str,
    with_prefix: bool,
    with_suffix: bool,
) -> io::Result<()> {
    let rule = "#".repeat(title_width(desc));
    if with_prefix {
        writeln!(out, "{}", rule)?;
    }
    writeln!(out, "{}", title_line(desc))?;
    if with_suffix {
        writeln!(out, "{}", rule)?;
    }
    Ok(())
}
