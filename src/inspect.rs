use termcolor::WriteColor;
use tracing::debug;

use crate::error::{InspectError, Result};
use crate::platform::{CertificatePlatform, CertificateStore};
use crate::print::{print_chain, print_error, print_validity};
use crate::title::print_title;

/// Look up `thumbprint` in the personal store and report on every match.
///
/// The store handle lives only inside this function, so it is released on
/// every path before the caller reports the outcome.
pub fn inspect<P, W>(platform: &P, thumbprint: &str, out: &mut W) -> Result<()>
where
    P: CertificatePlatform,
    W: WriteColor + ?Sized,
{
    let store = platform.open_store()?;

    print_title(out, thumbprint, true, true)?;
    writeln!(
        out,
        "Looking for certificate with thumbprint '{}' in store '{}'...",
        thumbprint,
        store.name()
    )?;

    let found = store.find_by_thumbprint(thumbprint)?;
    if found.is_empty() {
        return Err(InspectError::NotFound { thumbprint: thumbprint.to_string() });
    }

    writeln!(out, "Found certificate(s)...")?;
    writeln!(out)?;

    for cert in &found {
        debug!(
            "inspecting {} ({}), valid {} to {}",
            cert.subject, cert.thumbprint, cert.not_before, cert.not_after
        );
        print_validity(out, platform.verify(cert))?;

        let chain = platform.build_chain(cert)?;
        print_chain(out, &chain, |element| platform.verify(&element.certificate))?;
    }
    Ok(())
}

/// Run one inspection and report its outcome on `out`. Never fails: every
/// error ends up as an `Error: ` line.
pub fn run<P, W>(platform: &P, thumbprint: &str, out: &mut W)
where
    P: CertificatePlatform,
    W: WriteColor + ?Sized,
{
    let outcome = inspect(platform, thumbprint, out);
    let reported = match outcome {
        Ok(()) => Ok(()),
        Err(e) => match &e {
            InspectError::NotFound { thumbprint } => {
                debug!("no certificate matches {}", thumbprint);
                writeln!(out, "{}", e)
            }
            _ => print_error(out, &e.to_string()),
        },
    };
    if let Err(e) = reported {
        tracing::error!("failed to write report: {}", e);
    }
}
