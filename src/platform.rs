use crate::error::Result;
use crate::model::{Certificate, Chain};

/// Read-only handle on an opened certificate store. Dropping it closes the store.
pub trait CertificateStore {
    fn name(&self) -> &str;

    /// Every entry whose thumbprint equals `thumbprint`, ignoring ASCII case,
    /// in store enumeration order.
    fn find_by_thumbprint(&self, thumbprint: &str) -> Result<Vec<Certificate>>;
}

/// The certificate services the inspection relies on.
pub trait CertificatePlatform {
    type Store: CertificateStore;

    /// Open the machine's personal store read-only.
    fn open_store(&self) -> Result<Self::Store>;

    /// Build the certification path for `cert`, leaf first.
    fn build_chain(&self, cert: &Certificate) -> Result<Chain>;

    /// Whether `cert` builds into a chain without any status.
    fn verify(&self, cert: &Certificate) -> bool;
}
