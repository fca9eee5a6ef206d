use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::{Chain, ChainElement, Oid, CRL_DISTRIBUTION_POINTS_OID};
use crate::title::print_title;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn print_validity<W: WriteColor + ?Sized>(out: &mut W, valid: bool) -> io::Result<()> {
    if valid {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "Certificate is valid.")?;
    } else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        write!(out, "Certificate is NOT valid.")?;
    }
    out.reset()?;
    writeln!(out)
}

pub fn print_error<W: WriteColor + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "Error:")?;
    out.reset()?;
    writeln!(out, " {}", message)
}

/// Print one block per chain element, in chain order.
///
/// `element_valid` re-verifies a single element's certificate.
pub fn print_chain<W, F>(out: &mut W, chain: &Chain, mut element_valid: F) -> io::Result<()>
where
    W: Write + ?Sized,
    F: FnMut(&ChainElement) -> bool,
{
    for element in &chain.elements {
        let valid = element_valid(element);
        print_element(out, element, valid, chain.status.len())?;
    }
    Ok(())
}

/// Element status details are printed when the chain as a whole carries more
/// than one status, whatever this element's own count is.
pub fn print_element<W: Write + ?Sized>(
    out: &mut W,
    element: &ChainElement,
    valid: bool,
    chain_status_len: usize,
) -> io::Result<()> {
    let cert = &element.certificate;
    print_title(out, &cert.friendly_name, false, false)?;
    writeln!(out, "Element issuer name: {}", cert.issuer)?;
    writeln!(out, "Element certificate valid until: {}", cert.not_after.format(DATE_FORMAT))?;
    writeln!(out, "Element certificate is valid: {}", valid)?;
    writeln!(out, "Element error status length: {}", element.status.len())?;
    writeln!(out, "Element information: {}", element.information)?;
    writeln!(out, "Number of element extensions: {}", cert.extensions.len())?;
    writeln!(out)?;

    if let Some(ext) = cert.extension(CRL_DISTRIBUTION_POINTS_OID) {
        let oid = Oid::new(ext.oid.as_str());
        writeln!(out, "Extension type: {}", oid.friendly_name().unwrap_or_default())?;
        writeln!(out, "Oid value: {}", oid.value())?;
        writeln!(out, "Extension critical: {}", ext.critical)?;
        writeln!(out, "Extension format: {}", ext.formatted)?;
        writeln!(out)?;
    }

    if chain_status_len <= 1 {
        return Ok(());
    }
    for status in &element.status {
        writeln!(out, "{}", status.flag)?;
        writeln!(out, "{}", status.message)?;
    }
    Ok(())
}
