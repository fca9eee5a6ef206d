use clap::Parser;
use std::path::PathBuf;

use crate::validate::PlatformConfig;

pub const DEFAULT_STORE_DIR: &str = "/etc/ssl/certs";

/// Inspect a certificate from the local store by thumbprint. The thumbprint is
/// read interactively; every flag is optional.
#[derive(Parser, Debug)]
#[command(name = "check-certificate", version, about = "Certificate store and chain inspector")]
pub struct Cli {
    /// Directory holding the personal certificate store
    #[arg(long = "store", default_value = DEFAULT_STORE_DIR)]
    pub store: PathBuf,

    /// Additional trusted CA certificates (PEM bundle or DER)
    #[arg(long = "ca-file")]
    pub ca_file: Option<PathBuf>,

    /// Directory of additional trusted CA certificates
    #[arg(long = "ca-path")]
    pub ca_path: Option<PathBuf>,

    /// Do not load the system default trust store
    #[arg(long = "no-system-trust")]
    pub no_system_trust: bool,

    /// Directory of untrusted intermediates offered to the chain builder
    #[arg(long = "intermediates")]
    pub intermediates: Option<PathBuf>,

    /// Download missing issuers from Authority Information Access URLs
    #[arg(long = "fetch-issuers")]
    pub fetch_issuers: bool,

    /// Exit right after the report instead of waiting for a key
    #[arg(long = "no-wait")]
    pub no_wait: bool,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            store_dir: self.store.clone(),
            system_trust: !self.no_system_trust,
            ca_file: self.ca_file.clone(),
            ca_path: self.ca_path.clone(),
            intermediates: self.intermediates.clone(),
            fetch_issuers: self.fetch_issuers,
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
