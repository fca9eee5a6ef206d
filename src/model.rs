use chrono::{DateTime, Utc};
use openssl::asn1::Asn1Object;
use openssl::nid::Nid;
use std::fmt;

/// OID of the CRL distribution points extension, the only one the report looks into.
pub const CRL_DISTRIBUTION_POINTS_OID: &str = "2.5.29.31";

/// A certificate as read from a store or produced by the chain builder.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub friendly_name: String,
    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Uppercase hex SHA-1 of the DER encoding.
    pub thumbprint: String,
    pub extensions: Vec<Extension>,
    pub der: Vec<u8>,
}

impl Certificate {
    pub fn matches_thumbprint(&self, thumbprint: &str) -> bool {
        self.thumbprint.eq_ignore_ascii_case(thumbprint)
    }

    pub fn extension(&self, oid: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.oid == oid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub oid: String,
    pub critical: bool,
    /// Multi-line human rendering of the extension value.
    pub formatted: String,
}

/// Dotted OID value with a friendly name resolved through OpenSSL's object table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oid {
    value: String,
}

impl Oid {
    pub fn new(value: impl Into<String>) -> Self {
        Oid { value: value.into() }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// OpenSSL long name, e.g. "X509v3 CRL Distribution Points"; None when unknown.
    pub fn friendly_name(&self) -> Option<&'static str> {
        let obj = Asn1Object::from_str(&self.value).ok()?;
        let nid = obj.nid();
        if nid == Nid::UNDEF {
            return None;
        }
        nid.long_name().ok()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Why a chain element failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainStatusFlag {
    NotTimeValid,
    Revoked,
    NotSignatureValid,
    NotValidForUsage,
    UntrustedRoot,
    RevocationStatusUnknown,
    InvalidBasicConstraints,
    PartialChain,
    ExplicitDistrust,
    HasNotSupportedCriticalExtension,
    Other(i32),
}

impl ChainStatusFlag {
    /// Map an OpenSSL `X509_V_ERR_*` code to a status flag.
    pub fn from_verify_code(code: i32) -> Self {
        match code {
            2 | 20 | 21 => ChainStatusFlag::PartialChain,
            3 | 5 | 8 | 11 | 12 | 15 | 16 => ChainStatusFlag::RevocationStatusUnknown,
            4 | 6 | 7 => ChainStatusFlag::NotSignatureValid,
            9 | 10 | 13 | 14 => ChainStatusFlag::NotTimeValid,
            18 | 19 | 27 => ChainStatusFlag::UntrustedRoot,
            22 | 25 | 24 | 41 => ChainStatusFlag::InvalidBasicConstraints,
            23 => ChainStatusFlag::Revoked,
            26 | 32 => ChainStatusFlag::NotValidForUsage,
            28 => ChainStatusFlag::ExplicitDistrust,
            34 => ChainStatusFlag::HasNotSupportedCriticalExtension,
            other => ChainStatusFlag::Other(other),
        }
    }
}

impl fmt::Display for ChainStatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainStatusFlag::NotTimeValid => write!(f, "NotTimeValid"),
            ChainStatusFlag::Revoked => write!(f, "Revoked"),
            ChainStatusFlag::NotSignatureValid => write!(f, "NotSignatureValid"),
            ChainStatusFlag::NotValidForUsage => write!(f, "NotValidForUsage"),
            ChainStatusFlag::UntrustedRoot => write!(f, "UntrustedRoot"),
            ChainStatusFlag::RevocationStatusUnknown => write!(f, "RevocationStatusUnknown"),
            ChainStatusFlag::InvalidBasicConstraints => write!(f, "InvalidBasicConstraints"),
            ChainStatusFlag::PartialChain => write!(f, "PartialChain"),
            ChainStatusFlag::ExplicitDistrust => write!(f, "ExplicitDistrust"),
            ChainStatusFlag::HasNotSupportedCriticalExtension => {
                write!(f, "HasNotSupportedCriticalExtension")
            }
            ChainStatusFlag::Other(code) => write!(f, "Other({})", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStatus {
    pub flag: ChainStatusFlag,
    pub message: String,
}

impl ChainStatus {
    pub fn new(flag: ChainStatusFlag, message: impl Into<String>) -> Self {
        ChainStatus { flag, message: message.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChainElement {
    pub certificate: Certificate,
    pub status: Vec<ChainStatus>,
    pub information: String,
}

/// Result of building a chain, leaf first.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    pub elements: Vec<ChainElement>,
    /// Distinct statuses across all elements.
    pub status: Vec<ChainStatus>,
}

impl Chain {
    /// Collect each distinct flag once, in the order elements report them.
    pub fn from_elements(elements: Vec<ChainElement>) -> Self {
        let mut status: Vec<ChainStatus> = Vec::new();
        for s in elements.iter().flat_map(|e| e.status.iter()) {
            if !status.iter().any(|seen| seen.flag == s.flag) {
                status.push(s.clone());
            }
        }
        Chain { elements, status }
    }

    pub fn is_valid(&self) -> bool {
        !self.elements.is_empty() && self.status.is_empty()
    }
}
