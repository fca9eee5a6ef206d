use anyhow::{Context, Result};
use openssl::asn1::Asn1Time;
use openssl::stack::Stack;
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::{X509StoreContext, X509VerifyResult, X509};
use reqwest::blocking::Client;
use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::aia::{fetch_missing_issuers, http_client};
use crate::error::InspectError;
use crate::model::{Certificate, Chain, ChainElement, ChainStatus, ChainStatusFlag};
use crate::platform::CertificatePlatform;
use crate::store::{load_dir_x509, load_x509, DirectoryStore};
use crate::util::certificate_from_der;

/// Where certificates come from and what the chain builder trusts.
#[derive(Debug, Clone, Default)]
pub struct PlatformConfig {
    pub store_dir: PathBuf,
    /// Load OpenSSL's default CA locations (system trust store).
    pub system_trust: bool,
    pub ca_file: Option<PathBuf>,
    pub ca_path: Option<PathBuf>,
    pub intermediates: Option<PathBuf>,
    pub fetch_issuers: bool,
}

/// Whether a verify code means an issuer could not be found locally.
pub fn issuer_missing(code: i32) -> bool {
    ChainStatusFlag::from_verify_code(code) == ChainStatusFlag::PartialChain
}

/// Directory store plus OpenSSL path validation.
pub struct OpensslPlatform {
    store_dir: PathBuf,
    trust: X509Store,
    intermediates: Vec<X509>,
    client: Option<Client>,
}

/// Raw outcome of one `X509_verify_cert` run.
struct Verification {
    chain: Vec<X509>,
    error: X509VerifyResult,
    depth: u32,
}

impl OpensslPlatform {
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let mut builder = X509StoreBuilder::new()?;
        if config.system_trust {
            builder.set_default_paths()?;
        }

        let mut anchors = Vec::new();
        if let Some(file) = &config.ca_file {
            let data = fs::read(file)
                .with_context(|| format!("failed to read CA file {}", file.display()))?;
            anchors.extend(load_x509(&data)?);
        }
        if let Some(dir) = &config.ca_path {
            anchors.extend(load_dir_x509(dir)?);
        }
        for cert in anchors {
            if let Err(e) = builder.add_cert(cert) {
                warn!("ignoring trust anchor: {}", e);
            }
        }

        let intermediates = match &config.intermediates {
            Some(dir) => load_dir_x509(dir)?,
            None => Vec::new(),
        };
        debug!("{} untrusted intermediate(s) available", intermediates.len());

        let client = if config.fetch_issuers { Some(http_client()?) } else { None };

        Ok(OpensslPlatform {
            store_dir: config.store_dir.clone(),
            trust: builder.build(),
            intermediates,
            client,
        })
    }

    fn verify_x509(&self, leaf: &X509, extra: &[X509]) -> Result<Verification> {
        let mut stack: Stack<X509> = Stack::new()?;
        for c in self.intermediates.iter().chain(extra) {
            stack.push(c.clone())?;
        }

        let mut ctx = X509StoreContext::new()?;
        let (chain, error, depth) = ctx.init(&self.trust, leaf, &stack, |c| {
            c.verify_cert()?;
            let chain = c
                .chain()
                .map(|s| s.iter().map(|x| x.to_owned()).collect::<Vec<X509>>())
                .unwrap_or_default();
            Ok((chain, c.error(), c.error_depth()))
        })?;
        Ok(Verification { chain, error, depth })
    }

    pub fn build_x509_chain(&self, leaf: &X509, leaf_name: &str) -> Result<Chain> {
        let mut verification = self.verify_x509(leaf, &[])?;

        if let Some(client) = &self.client {
            if issuer_missing(verification.error.as_raw()) {
                let last = verification.chain.last().unwrap_or(leaf);
                let fetched = fetch_missing_issuers(client, last);
                if !fetched.is_empty() {
                    info!("downloaded {} issuer certificate(s)", fetched.len());
                    verification = self.verify_x509(leaf, &fetched)?;
                }
            }
        }

        let Verification { chain, error, depth } = verification;
        let certs = if chain.is_empty() { vec![leaf.clone()] } else { chain };
        let error_index = (depth as usize).min(certs.len() - 1);
        let now = Asn1Time::days_from_now(0)?;

        let mut elements = Vec::with_capacity(certs.len());
        for (i, x) in certs.iter().enumerate() {
            let name = if i == 0 { leaf_name } else { "" };
            let certificate = certificate_from_der(&x.to_der()?, name)?;

            let mut status = Vec::new();
            if error != X509VerifyResult::OK && i == error_index {
                status.push(ChainStatus::new(
                    ChainStatusFlag::from_verify_code(error.as_raw()),
                    error.error_string(),
                ));
            }
            if !status.iter().any(|s| s.flag == ChainStatusFlag::NotTimeValid) {
                if x.not_after().compare(&now)? == Ordering::Less {
                    status.push(ChainStatus::new(ChainStatusFlag::NotTimeValid, "certificate has expired"));
                } else if x.not_before().compare(&now)? == Ordering::Greater {
                    status.push(ChainStatus::new(ChainStatusFlag::NotTimeValid, "certificate is not yet valid"));
                }
            }

            elements.push(ChainElement {
                certificate,
                status,
                information: String::new(),
            });
        }

        Ok(Chain::from_elements(elements))
    }
}

impl CertificatePlatform for OpensslPlatform {
    type Store = DirectoryStore;

    fn open_store(&self) -> crate::error::Result<DirectoryStore> {
        DirectoryStore::open(&self.store_dir)
    }

    fn build_chain(&self, cert: &Certificate) -> crate::error::Result<Chain> {
        let x509 = X509::from_der(&cert.der).context("failed to decode certificate")?;
        self.build_x509_chain(&x509, &cert.friendly_name)
            .map_err(InspectError::from)
    }

    fn verify(&self, cert: &Certificate) -> bool {
        match self.build_chain(cert) {
            Ok(chain) => chain.is_valid(),
            Err(e) => {
                warn!("verification of {} failed: {}", cert.thumbprint, e);
                false
            }
        }
    }
}
