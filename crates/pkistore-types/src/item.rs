use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hex::hex_eq;

/// The kind of PKI object a catalog row describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PkiItemKind {
    /// X.509 certificate.
    Certificate,
    /// Certificate revocation list.
    Crl,
    /// Private key.
    Key,
    /// Certificate signing request.
    CertificateRequest,
}

impl fmt::Display for PkiItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Certificate => write!(f, "CERTIFICATE"),
            Self::Crl => write!(f, "CRL"),
            Self::Key => write!(f, "KEY"),
            Self::CertificateRequest => write!(f, "CERTIFICATE_REQUEST"),
        }
    }
}

impl FromStr for PkiItemKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CERTIFICATE" => Ok(Self::Certificate),
            "CRL" => Ok(Self::Crl),
            "KEY" => Ok(Self::Key),
            "CERTIFICATE_REQUEST" => Ok(Self::CertificateRequest),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}

/// Encoding hint for an object's stored bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingFormat {
    /// Binary DER encoding.
    Der,
    /// Base64 PEM armor.
    Pem,
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Der => write!(f, "DER"),
            Self::Pem => write!(f, "PEM"),
        }
    }
}

impl FromStr for EncodingFormat {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DER" => Ok(Self::Der),
            "PEM" => Ok(Self::Pem),
            other => Err(TypeError::UnknownFormat(other.to_string())),
        }
    }
}

/// Certificate-specific catalog metadata.
///
/// `has_private_key` is derived by a provider-specific presence check; the
/// key bytes themselves never enter the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateFields {
    pub subject_name: String,
    pub subject_friendly_name: String,
    pub issuer_name: String,
    pub issuer_friendly_name: String,
    pub serial_number: String,
    pub organization: String,
    pub signature_algorithm: String,
    pub not_before: String,
    pub not_after: String,
    pub has_private_key: bool,
}

/// CRL-specific catalog metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlFields {
    pub issuer_name: String,
    pub issuer_friendly_name: String,
    pub this_update: String,
    pub next_update: String,
}

/// One catalog row: the immutable, normalized metadata view of a PKI object.
///
/// The row identity is `(hash, provider, category)`. The same logical object
/// may legitimately appear under multiple categories or providers as
/// distinct rows. `hash` is the uppercase hex thumbprint of the object's
/// canonical encoding, computed once at normalization and stable for the
/// lifetime of the row; it is the only key used to match the row back to its
/// backend object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkiItem {
    /// Content address: uppercase hex thumbprint (40 chars for SHA-1).
    pub hash: String,
    /// Object kind.
    pub kind: PkiItemKind,
    /// Encoding the backend holds the object in.
    pub format: EncodingFormat,
    /// Identity string of the owning provider.
    pub provider: String,
    /// Backend-specific partition the object was found in (e.g. "MY").
    pub category: String,
    /// Present when `kind == Certificate`.
    pub certificate: Option<CertificateFields>,
    /// Present when `kind == Crl`.
    pub crl: Option<CrlFields>,
}

impl PkiItem {
    /// Case-insensitive comparison of this row's content address.
    pub fn matches_hash(&self, hash: &str) -> bool {
        hex_eq(&self.hash, hash)
    }

    /// Whether another row denotes the same `(hash, provider, category)`.
    pub fn same_row(&self, other: &PkiItem) -> bool {
        self.matches_hash(&other.hash)
            && self.provider == other.provider
            && self.category == other.category
    }

    /// `true` for certificate rows whose provider reported bound key
    /// material.
    pub fn has_private_key(&self) -> bool {
        self.certificate
            .as_ref()
            .is_some_and(|c| c.has_private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(hash: &str, provider: &str, category: &str) -> PkiItem {
        PkiItem {
            hash: hash.to_string(),
            kind: PkiItemKind::Certificate,
            format: EncodingFormat::Der,
            provider: provider.to_string(),
            category: category.to_string(),
            certificate: Some(CertificateFields::default()),
            crl: None,
        }
    }

    #[test]
    fn kind_display_roundtrip() {
        for kind in [
            PkiItemKind::Certificate,
            PkiItemKind::Crl,
            PkiItemKind::Key,
            PkiItemKind::CertificateRequest,
        ] {
            assert_eq!(kind.to_string().parse::<PkiItemKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_rejects_unknown() {
        assert_eq!(
            "PKCS12".parse::<PkiItemKind>(),
            Err(TypeError::UnknownKind("PKCS12".to_string()))
        );
    }

    #[test]
    fn format_display_roundtrip() {
        for format in [EncodingFormat::Der, EncodingFormat::Pem] {
            assert_eq!(
                format.to_string().parse::<EncodingFormat>().unwrap(),
                format
            );
        }
    }

    #[test]
    fn hash_match_ignores_case() {
        let row = item("AABB01", "SYSTEM", "MY");
        assert!(row.matches_hash("aabb01"));
        assert!(!row.matches_hash("aabb02"));
    }

    #[test]
    fn same_row_requires_all_three_identity_fields() {
        let a = item("AABB01", "SYSTEM", "MY");
        assert!(a.same_row(&item("aabb01", "SYSTEM", "MY")));
        assert!(!a.same_row(&item("AABB01", "FILE", "MY")));
        assert!(!a.same_row(&item("AABB01", "SYSTEM", "ROOT")));
    }

    #[test]
    fn has_private_key_defaults_false() {
        let mut row = item("AABB01", "SYSTEM", "MY");
        assert!(!row.has_private_key());
        row.certificate.as_mut().unwrap().has_private_key = true;
        assert!(row.has_private_key());
    }

    #[test]
    fn serde_roundtrip() {
        let row = item("AABB01", "SYSTEM", "MY");
        let json = serde_json::to_string(&row).unwrap();
        let parsed: PkiItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, row);
    }
}
