use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use openssl::hash::{hash, MessageDigest};
use x509_parser::extensions::{CRLDistributionPoints, DistributionPointName, GeneralName, ParsedExtension};
use x509_parser::prelude::*;

use crate::model::{Certificate, Extension};

const INDENT: &str = "     ";

/// Uppercase hex SHA-1 of `der`, without separators.
pub fn thumbprint_sha1(der: &[u8]) -> Result<String> {
    let d = hash(MessageDigest::sha1(), der)?;
    Ok(d.iter().map(|b| format!("{:02X}", b)).collect())
}

/// Parse a DER certificate into the report model.
pub fn certificate_from_der(der: &[u8], friendly_name: &str) -> Result<Certificate> {
    let (_, parsed) = X509Certificate::from_der(der)
        .map_err(|e| anyhow!("failed to parse DER certificate: {}", e))?;

    let validity = parsed.validity();
    let not_before = asn1_time_to_datetime(&validity.not_before)?;
    let not_after = asn1_time_to_datetime(&validity.not_after)?;

    let extensions = parsed
        .extensions()
        .iter()
        .map(|ext| Extension {
            oid: ext.oid.to_id_string(),
            critical: ext.critical,
            formatted: format_extension(ext),
        })
        .collect();

    Ok(Certificate {
        friendly_name: friendly_name.to_string(),
        subject: parsed.subject().to_string(),
        issuer: parsed.issuer().to_string(),
        not_before,
        not_after,
        thumbprint: thumbprint_sha1(der)?,
        extensions,
        der: der.to_vec(),
    })
}

fn asn1_time_to_datetime(time: &ASN1Time) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .context("invalid timestamp in certificate")
}

/// Render an extension value for display. CRL distribution points get a
/// structured multi-line layout; everything else is shown as hex bytes.
pub fn format_extension(ext: &X509Extension<'_>) -> String {
    match ext.parsed_extension() {
        ParsedExtension::CRLDistributionPoints(points) => format_crl_distribution_points(points),
        _ => hex_bytes(ext.value),
    }
}

pub fn format_crl_distribution_points(points: &CRLDistributionPoints<'_>) -> String {
    let mut out = String::new();
    for (i, point) in points.points.iter().enumerate() {
        out.push_str(&format!("[{}]CRL Distribution Point\n", i + 1));
        match &point.distribution_point {
            Some(DistributionPointName::FullName(names)) => {
                out.push_str(&format!("{INDENT}Distribution Point Name:\n"));
                out.push_str(&format!("{INDENT}{INDENT}Full Name:\n"));
                for name in names {
                    out.push_str(&format!("{INDENT}{INDENT}{INDENT}{}\n", format_general_name(name)));
                }
            }
            Some(DistributionPointName::NameRelativeToCRLIssuer(rdn)) => {
                let parts = rdn
                    .iter()
                    .map(|attr| {
                        format!(
                            "{}={}",
                            attr.attr_type().to_id_string(),
                            attr.as_str().unwrap_or("<binary>")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("{INDENT}Distribution Point Name:\n"));
                out.push_str(&format!("{INDENT}{INDENT}Name Relative To Issuer: {}\n", parts));
            }
            None => {}
        }
        if let Some(issuers) = &point.crl_issuer {
            out.push_str(&format!("{INDENT}CRL Issuer:\n"));
            for name in issuers {
                out.push_str(&format!("{INDENT}{INDENT}{}\n", format_general_name(name)));
            }
        }
    }
    out
}

pub fn format_general_name(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::URI(uri) => format!("URL={}", uri),
        GeneralName::DNSName(dns) => format!("DNS Name={}", dns),
        GeneralName::RFC822Name(mail) => format!("RFC822 Name={}", mail),
        GeneralName::DirectoryName(dn) => format!("Directory Address:{}", dn),
        GeneralName::IPAddress(ip) => format!("IP Address={}", format_ip(ip)),
        GeneralName::RegisteredID(oid) => format!("Registered ID={}", oid.to_id_string()),
        other => format!("{:?}", other),
    }
}

fn format_ip(bytes: &[u8]) -> String {
    match bytes.len() {
        4 => bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join("."),
        16 => bytes
            .chunks(2)
            .map(|c| format!("{:x}", u16::from_be_bytes([c[0], c[1]])))
            .collect::<Vec<_>>()
            .join(":"),
        _ => hex_bytes(bytes),
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}
