//! Exact-match predicate over catalog item attributes.
//!
//! A filter is a map from attribute name to expected value. Absent keys are
//! wildcards; populated keys require exact equality with the item's
//! corresponding field (hash comparison is case-insensitive). The empty
//! filter matches every item.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hex::hex_eq;
use crate::item::PkiItem;

/// Attribute names a [`Filter`] may constrain.
///
/// These are the `PkiItem` field names; anything else is rejected with
/// [`TypeError::InvalidFilterKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    Hash,
    Kind,
    Format,
    Provider,
    Category,
    SubjectName,
    SubjectFriendlyName,
    IssuerName,
    IssuerFriendlyName,
    SerialNumber,
    Organization,
    SignatureAlgorithm,
    HasPrivateKey,
}

impl FilterKey {
    /// The catalog field name this key refers to.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Kind => "type",
            Self::Format => "format",
            Self::Provider => "provider",
            Self::Category => "category",
            Self::SubjectName => "subject_name",
            Self::SubjectFriendlyName => "subject_friendly_name",
            Self::IssuerName => "issuer_name",
            Self::IssuerFriendlyName => "issuer_friendly_name",
            Self::SerialNumber => "serial",
            Self::Organization => "organization",
            Self::SignatureAlgorithm => "signature_algorithm",
            Self::HasPrivateKey => "has_private_key",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FilterKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(Self::Hash),
            "type" => Ok(Self::Kind),
            "format" => Ok(Self::Format),
            "provider" => Ok(Self::Provider),
            "category" => Ok(Self::Category),
            "subject_name" => Ok(Self::SubjectName),
            "subject_friendly_name" => Ok(Self::SubjectFriendlyName),
            "issuer_name" => Ok(Self::IssuerName),
            "issuer_friendly_name" => Ok(Self::IssuerFriendlyName),
            "serial" => Ok(Self::SerialNumber),
            "organization" => Ok(Self::Organization),
            "signature_algorithm" => Ok(Self::SignatureAlgorithm),
            "has_private_key" => Ok(Self::HasPrivateKey),
            other => Err(TypeError::InvalidFilterKey(other.to_string())),
        }
    }
}

/// Predicate matcher over [`PkiItem`] attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    criteria: BTreeMap<FilterKey, String>,
}

impl Filter {
    /// An empty filter; matches every item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style constraint on a typed key.
    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.criteria.insert(key, value.into());
        self
    }

    /// Constrain an attribute by name, rejecting unknown names.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), TypeError> {
        self.criteria.insert(key.parse()?, value.into());
        Ok(())
    }

    /// Build a filter from a name→value map (configuration-style input).
    pub fn from_map<I, K, V>(entries: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::new();
        for (key, value) in entries {
            filter.set(key.as_ref(), value)?;
        }
        Ok(filter)
    }

    /// `true` if no attribute is constrained.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Number of constrained attributes.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Whether every populated constraint equals the item's field.
    ///
    /// A constraint on a field the item does not carry (e.g. `subject_name`
    /// on a CRL row) never matches.
    pub fn matches(&self, item: &PkiItem) -> bool {
        self.criteria.iter().all(|(key, expected)| {
            match key {
                FilterKey::Hash => item.matches_hash(expected),
                FilterKey::Kind => item.kind.to_string() == *expected,
                FilterKey::Format => item.format.to_string() == *expected,
                FilterKey::Provider => item.provider == *expected,
                FilterKey::Category => item.category == *expected,
                FilterKey::HasPrivateKey => {
                    item.certificate.as_ref().is_some_and(|c| {
                        c.has_private_key.to_string() == *expected
                    })
                }
                FilterKey::SubjectName => {
                    cert_field(item, expected, |c| &c.subject_name)
                }
                FilterKey::SubjectFriendlyName => {
                    cert_field(item, expected, |c| &c.subject_friendly_name)
                }
                FilterKey::SerialNumber => {
                    cert_field(item, expected, |c| &c.serial_number)
                }
                FilterKey::Organization => {
                    cert_field(item, expected, |c| &c.organization)
                }
                FilterKey::SignatureAlgorithm => {
                    cert_field(item, expected, |c| &c.signature_algorithm)
                }
                // Issuer fields exist on both certificate and CRL rows.
                FilterKey::IssuerName => {
                    cert_field(item, expected, |c| &c.issuer_name)
                        || crl_field(item, expected, |c| &c.issuer_name)
                }
                FilterKey::IssuerFriendlyName => {
                    cert_field(item, expected, |c| &c.issuer_friendly_name)
                        || crl_field(item, expected, |c| &c.issuer_friendly_name)
                }
            }
        })
    }
}

fn cert_field(
    item: &PkiItem,
    expected: &str,
    get: impl Fn(&crate::item::CertificateFields) -> &String,
) -> bool {
    item.certificate.as_ref().is_some_and(|c| get(c) == expected)
}

fn crl_field(
    item: &PkiItem,
    expected: &str,
    get: impl Fn(&crate::item::CrlFields) -> &String,
) -> bool {
    item.crl.as_ref().is_some_and(|c| get(c) == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CertificateFields, CrlFields, EncodingFormat, PkiItemKind};

    fn cert_item() -> PkiItem {
        PkiItem {
            hash: "AABB01".to_string(),
            kind: PkiItemKind::Certificate,
            format: EncodingFormat::Der,
            provider: "SYSTEM".to_string(),
            category: "MY".to_string(),
            certificate: Some(CertificateFields {
                subject_name: "CN=alice".to_string(),
                issuer_name: "CN=test-ca".to_string(),
                serial_number: "01".to_string(),
                has_private_key: true,
                ..CertificateFields::default()
            }),
            crl: None,
        }
    }

    fn crl_item() -> PkiItem {
        PkiItem {
            hash: "CCDD02".to_string(),
            kind: PkiItemKind::Crl,
            format: EncodingFormat::Der,
            provider: "SYSTEM".to_string(),
            category: "CA".to_string(),
            certificate: None,
            crl: Some(CrlFields {
                issuer_name: "CN=test-ca".to_string(),
                ..CrlFields::default()
            }),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.matches(&cert_item()));
        assert!(filter.matches(&crl_item()));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut filter = Filter::new();
        assert_eq!(
            filter.set("thumbprint", "AABB01"),
            Err(TypeError::InvalidFilterKey("thumbprint".to_string()))
        );
    }

    #[test]
    fn from_map_rejects_unknown_key() {
        let err = Filter::from_map([("hash", "AA"), ("color", "red")]).unwrap_err();
        assert_eq!(err, TypeError::InvalidFilterKey("color".to_string()));
    }

    #[test]
    fn hash_constraint_is_case_insensitive() {
        let filter = Filter::new().with(FilterKey::Hash, "aabb01");
        assert!(filter.matches(&cert_item()));
    }

    #[test]
    fn exact_match_not_substring() {
        let filter = Filter::new().with(FilterKey::SubjectName, "CN=ali");
        assert!(!filter.matches(&cert_item()));
    }

    #[test]
    fn all_populated_fields_must_match() {
        let filter = Filter::new()
            .with(FilterKey::Provider, "SYSTEM")
            .with(FilterKey::Category, "ROOT");
        assert!(!filter.matches(&cert_item()));
    }

    #[test]
    fn kind_constraint_uses_display_names() {
        let filter = Filter::from_map([("type", "CRL")]).unwrap();
        assert!(filter.matches(&crl_item()));
        assert!(!filter.matches(&cert_item()));
    }

    #[test]
    fn issuer_name_matches_both_cert_and_crl_rows() {
        let filter = Filter::new().with(FilterKey::IssuerName, "CN=test-ca");
        assert!(filter.matches(&cert_item()));
        assert!(filter.matches(&crl_item()));
    }

    #[test]
    fn cert_only_field_never_matches_crl_row() {
        let filter = Filter::new().with(FilterKey::SerialNumber, "01");
        assert!(!filter.matches(&crl_item()));
    }

    #[test]
    fn has_private_key_constraint() {
        let filter = Filter::from_map([("has_private_key", "true")]).unwrap();
        assert!(filter.matches(&cert_item()));
        let filter = Filter::from_map([("has_private_key", "false")]).unwrap();
        assert!(!filter.matches(&cert_item()));
    }
}
