use anyhow::Context;
use openssl::x509::X509;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{InspectError, Result};
use crate::model::Certificate;
use crate::platform::CertificateStore;
use crate::util::certificate_from_der;

const CERT_EXTENSIONS: &[&str] = &["pem", "crt", "cer", "der"];

/// A personal store backed by a directory of certificate files, opened read-only.
#[derive(Debug)]
pub struct DirectoryStore {
    name: String,
    path: PathBuf,
    entries: Vec<Certificate>,
}

impl DirectoryStore {
    pub fn open(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        let access_err = |e: std::io::Error| InspectError::StoreAccess {
            store: name.clone(),
            message: e.to_string(),
        };

        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(access_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_cert_extension(p))
            .collect();
        files.sort();

        // A certificate found in several files is one store entry; the first
        // file in name order supplies its friendly name.
        let mut entries: Vec<Certificate> = Vec::new();
        for file in &files {
            match load_file(file) {
                Ok(certs) => {
                    for cert in certs {
                        if entries.iter().any(|e| e.thumbprint == cert.thumbprint) {
                            debug!("{} already in store, skipping copy in {}", cert.thumbprint, file.display());
                            continue;
                        }
                        entries.push(cert);
                    }
                }
                Err(e) => warn!("skipping {}: {:#}", file.display(), e),
            }
        }
        debug!("opened store {} with {} certificate(s)", name, entries.len());

        Ok(DirectoryStore { name, path: path.to_path_buf(), entries })
    }
}

impl CertificateStore for DirectoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_by_thumbprint(&self, thumbprint: &str) -> Result<Vec<Certificate>> {
        Ok(self
            .entries
            .iter()
            .filter(|c| c.matches_thumbprint(thumbprint))
            .cloned()
            .collect())
    }
}

impl Drop for DirectoryStore {
    fn drop(&mut self) {
        debug!("closed store {}", self.path.display());
    }
}

fn has_cert_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CERT_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Load every certificate in a PEM bundle or a single DER file.
/// The file stem becomes the friendly name.
pub fn load_file(path: &Path) -> anyhow::Result<Vec<Certificate>> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let friendly_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let certs = load_x509(&data).with_context(|| format!("no certificate in {}", path.display()))?;
    certs
        .iter()
        .map(|c| certificate_from_der(&c.to_der()?, &friendly_name))
        .collect()
}

/// PEM first (may contain several), then DER.
pub fn load_x509(data: &[u8]) -> anyhow::Result<Vec<X509>> {
    if let Ok(stack) = X509::stack_from_pem(data) {
        if !stack.is_empty() {
            return Ok(stack);
        }
    }
    let cert = X509::from_der(data).context("input is neither PEM nor DER certificate")?;
    Ok(vec![cert])
}

/// Load every certificate found in the files of `dir`; unreadable files are skipped.
pub fn load_dir_x509(dir: &Path) -> anyhow::Result<Vec<X509>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_cert_extension(p))
        .collect();
    files.sort();

    let mut out = Vec::new();
    for file in files {
        let loaded = fs::read(&file)
            .map_err(anyhow::Error::from)
            .and_then(|data| load_x509(&data));
        match loaded {
            Ok(mut certs) => out.append(&mut certs),
            Err(e) => warn!("skipping {}: {:#}", file.display(), e),
        }
    }
    Ok(out)
}
