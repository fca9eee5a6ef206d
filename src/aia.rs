use anyhow::{bail, Context, Result};
use openssl::x509::{X509Ref, X509};
use reqwest::blocking::Client;
use std::collections::HashSet;
use tracing::{debug, warn};
use x509_parser::prelude::*;

use crate::store::load_x509;

/// 1.3.6.1.5.5.7.48.2 = id-ad-caIssuers
const CA_ISSUERS_OID: &str = "1.3.6.1.5.5.7.48.2";

pub fn http_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("check-certificate/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(std::time::Duration::from_secs(15))
        .build()?;
    Ok(client)
}

pub fn ca_issuers_urls(cert: &X509Ref) -> Vec<String> {
    let der = match cert.to_der() {
        Ok(d) => d,
        Err(_) => return vec![],
    };
    let mut urls = Vec::new();
    if let Ok((_, parsed)) = X509Certificate::from_der(&der) {
        for ext in parsed.extensions() {
            if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
                for ad in &aia.accessdescs {
                    if ad.access_method.to_id_string() == CA_ISSUERS_OID {
                        if let GeneralName::URI(uri) = &ad.access_location {
                            urls.push(uri.to_string());
                        }
                    }
                }
            }
        }
    }
    urls
}

fn fetch_issuer_from_url(client: &Client, url: &str) -> Result<Vec<X509>> {
    let resp = client.get(url).send().with_context(|| format!("GET {} failed", url))?;
    if !resp.status().is_success() {
        bail!("{}: HTTP {}", url, resp.status());
    }
    let bytes = resp.bytes()?.to_vec();
    load_x509(&bytes).with_context(|| format!("unrecognized certificate format from {}", url))
}

fn is_self_issued(cert: &X509Ref) -> bool {
    cert.subject_name().to_der().ok() == cert.issuer_name().to_der().ok()
}

/// Walk caIssuers links upward from `start`, returning the issuers found
/// (nearest first). Stops at a self-issued certificate, a gap, or a loop.
pub fn fetch_missing_issuers(client: &Client, start: &X509Ref) -> Vec<X509> {
    let mut fetched: Vec<X509> = Vec::new();
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    seen.insert(start.subject_name().to_der().unwrap_or_default());

    let mut current = start.to_owned();
    loop {
        if is_self_issued(&current) {
            break;
        }
        let wanted = current.issuer_name().to_der().unwrap_or_default();

        let mut next_issuer: Option<X509> = None;
        for url in ca_issuers_urls(&current) {
            debug!("fetching issuer from {}", url);
            match fetch_issuer_from_url(client, &url) {
                Ok(candidates) => {
                    next_issuer = candidates
                        .into_iter()
                        .find(|c| c.subject_name().to_der().unwrap_or_default() == wanted);
                }
                Err(e) => warn!("issuer download failed: {:#}", e),
            }
            if next_issuer.is_some() {
                break;
            }
        }

        match next_issuer {
            Some(issuer) => {
                let subj = issuer.subject_name().to_der().unwrap_or_default();
                if !seen.insert(subj) {
                    break;
                }
                fetched.push(issuer.clone());
                current = issuer;
            }
            None => break,
        }
    }
    fetched
}
