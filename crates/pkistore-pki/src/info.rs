//! Parsed metadata records carried by domain objects.
//!
//! These are the values the out-of-scope ASN.1 layer extracts from the
//! encoded object; the core only ever reads them.

use serde::{Deserialize, Serialize};

/// Descriptive certificate fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub subject_name: String,
    #[serde(default)]
    pub subject_friendly_name: String,
    pub issuer_name: String,
    #[serde(default)]
    pub issuer_friendly_name: String,
    pub serial_number: String,
    #[serde(default)]
    pub organization: String,
    pub signature_algorithm: String,
    pub not_before: String,
    pub not_after: String,
}

/// Descriptive CRL fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlInfo {
    pub issuer_name: String,
    #[serde(default)]
    pub issuer_friendly_name: String,
    pub this_update: String,
    pub next_update: String,
}

/// Descriptive private-key fields.
///
/// `bound_certificate` is the uppercase thumbprint hex of the certificate
/// this key belongs to, when the producing layer knows it. Providers use it
/// for the `has_private_key` presence check; the catalog itself never stores
/// it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub algorithm: String,
    #[serde(default)]
    pub bound_certificate: Option<String>,
}

/// Descriptive certificate-request fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertRequestInfo {
    pub subject_name: String,
    pub signature_algorithm: String,
}
