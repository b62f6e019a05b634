//! Normalization of domain objects into catalog rows.
//!
//! Identical contract for every provider: reject empty objects, derive the
//! content address from the thumbprint, stamp the backend's static identity,
//! and pull descriptive metadata through the object's read-only accessors.

use pkistore_pki::{ObjectError, PkiObject};
use pkistore_types::{CertificateFields, CrlFields, EncodingFormat, PkiItem};

use crate::error::ProviderResult;

/// Build the [`PkiItem`] catalog row for `object`.
///
/// `has_private_key` is the result of the owning provider's presence check
/// and is only meaningful for certificates; pass `false` for other kinds.
/// The row's `hash` is the uppercase hex of the object's thumbprint and
/// never changes for the lifetime of the row.
pub fn object_to_pki_item(
    object: &PkiObject,
    provider: &str,
    category: &str,
    format: EncodingFormat,
    has_private_key: bool,
) -> ProviderResult<PkiItem> {
    if object.is_empty() {
        return Err(ObjectError::EmptyObject.into());
    }

    let mut item = PkiItem {
        hash: object.thumbprint_hex(),
        kind: object.kind(),
        format,
        provider: provider.to_string(),
        category: category.to_string(),
        certificate: None,
        crl: None,
    };

    match object {
        PkiObject::Certificate(cert) => {
            let info = cert.info();
            item.certificate = Some(CertificateFields {
                subject_name: info.subject_name.clone(),
                subject_friendly_name: info.subject_friendly_name.clone(),
                issuer_name: info.issuer_name.clone(),
                issuer_friendly_name: info.issuer_friendly_name.clone(),
                serial_number: info.serial_number.clone(),
                organization: info.organization.clone(),
                signature_algorithm: info.signature_algorithm.clone(),
                not_before: info.not_before.clone(),
                not_after: info.not_after.clone(),
                has_private_key,
            });
        }
        PkiObject::Crl(crl) => {
            let info = crl.info();
            item.crl = Some(CrlFields {
                issuer_name: info.issuer_name.clone(),
                issuer_friendly_name: info.issuer_friendly_name.clone(),
                this_update: info.this_update.clone(),
                next_update: info.next_update.clone(),
            });
        }
        // Key and request rows carry identity fields only; key material in
        // particular never enters the catalog.
        PkiObject::Key(_) | PkiObject::Request(_) => {}
    }

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkistore_pki::{
        Certificate, CertificateInfo, CrlInfo, EnvelopeCodec, KeyInfo,
    };
    use pkistore_types::PkiItemKind;

    fn cert() -> Certificate {
        EnvelopeCodec::certificate(CertificateInfo {
            subject_name: "CN=alice".to_string(),
            issuer_name: "CN=test-ca".to_string(),
            serial_number: "01".to_string(),
            organization: "Test Org".to_string(),
            signature_algorithm: "sha256WithRSA".to_string(),
            not_before: "2026-01-01T00:00:00Z".to_string(),
            not_after: "2027-01-01T00:00:00Z".to_string(),
            ..CertificateInfo::default()
        })
        .unwrap()
    }

    #[test]
    fn certificate_row_carries_all_metadata() {
        let cert = cert();
        let object = PkiObject::from(cert.clone());
        let item = object_to_pki_item(&object, "SYSTEM", "MY", EncodingFormat::Der, true)
            .unwrap();

        assert_eq!(item.hash, cert.thumbprint_hex());
        assert_eq!(item.hash.len(), 40);
        assert_eq!(item.kind, PkiItemKind::Certificate);
        assert_eq!(item.provider, "SYSTEM");
        assert_eq!(item.category, "MY");
        let fields = item.certificate.unwrap();
        assert_eq!(fields.subject_name, "CN=alice");
        assert_eq!(fields.organization, "Test Org");
        assert!(fields.has_private_key);
        assert!(item.crl.is_none());
    }

    #[test]
    fn crl_row_carries_crl_metadata_only() {
        let crl = EnvelopeCodec::crl(CrlInfo {
            issuer_name: "CN=test-ca".to_string(),
            this_update: "2026-06-01T00:00:00Z".to_string(),
            next_update: "2026-12-01T00:00:00Z".to_string(),
            ..CrlInfo::default()
        })
        .unwrap();
        let item = object_to_pki_item(
            &crl.into(),
            "SYSTEM",
            "CA",
            EncodingFormat::Der,
            false,
        )
        .unwrap();
        assert_eq!(item.kind, PkiItemKind::Crl);
        assert!(item.certificate.is_none());
        assert_eq!(item.crl.unwrap().issuer_name, "CN=test-ca");
    }

    #[test]
    fn key_row_has_identity_fields_only() {
        let key = EnvelopeCodec::key(KeyInfo {
            algorithm: "RSA".to_string(),
            bound_certificate: Some("AABB01".to_string()),
        })
        .unwrap();
        let item = object_to_pki_item(
            &key.into(),
            "FILE",
            "MY",
            EncodingFormat::Der,
            false,
        )
        .unwrap();
        assert_eq!(item.kind, PkiItemKind::Key);
        assert!(item.certificate.is_none());
        assert!(item.crl.is_none());
    }

    #[test]
    fn empty_object_is_rejected() {
        let empty: PkiObject =
            Certificate::from_parts(Vec::new(), CertificateInfo::default()).into();
        let err = object_to_pki_item(&empty, "SYSTEM", "MY", EncodingFormat::Der, false)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::ProviderError::Object(ObjectError::EmptyObject)
        ));
    }
}
