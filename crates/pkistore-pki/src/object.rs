use pkistore_types::{bytes_to_hex, EncodingFormat, PkiItemKind};
use sha1::{Digest, Sha1};

use crate::error::{ObjectError, ObjectResult};
use crate::info::{CertRequestInfo, CertificateInfo, CrlInfo, KeyInfo};
use crate::pem;

/// Length of a thumbprint digest in bytes (SHA-1).
pub const THUMBPRINT_LEN: usize = 20;

fn thumbprint_of(bytes: &[u8]) -> [u8; THUMBPRINT_LEN] {
    let digest = Sha1::digest(bytes);
    let mut out = [0u8; THUMBPRINT_LEN];
    out.copy_from_slice(&digest);
    out
}

macro_rules! pki_object_kind {
    ($name:ident, $info:ty, $label:expr, $doc:expr) => {
        #[doc = $doc]
        ///
        /// Holds the canonical encoded bytes alongside the metadata the
        /// ASN.1 layer extracted from them. Both are immutable after
        /// construction; all accessors are read-only and side-effect-free.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            encoded: Vec<u8>,
            info: $info,
        }

        impl $name {
            /// Assemble from canonical bytes and their parsed metadata.
            pub fn from_parts(encoded: Vec<u8>, info: $info) -> Self {
                Self { encoded, info }
            }

            /// The canonical encoded bytes.
            pub fn encoded(&self) -> &[u8] {
                &self.encoded
            }

            /// `true` when the object carries no content.
            pub fn is_empty(&self) -> bool {
                self.encoded.is_empty()
            }

            /// The parsed metadata record.
            pub fn info(&self) -> &$info {
                &self.info
            }

            /// SHA-1 digest of the canonical encoding: the content address.
            pub fn thumbprint(&self) -> [u8; THUMBPRINT_LEN] {
                thumbprint_of(&self.encoded)
            }

            /// Uppercase hex form of the thumbprint (40 characters).
            pub fn thumbprint_hex(&self) -> String {
                bytes_to_hex(&self.thumbprint())
            }

            /// Serialize to the requested encoding.
            ///
            /// `DER` returns the canonical bytes; `PEM` wraps them in armor
            /// under this object kind's label.
            pub fn encode(&self, format: EncodingFormat) -> ObjectResult<Vec<u8>> {
                if self.is_empty() {
                    return Err(ObjectError::EmptyObject);
                }
                match format {
                    EncodingFormat::Der => Ok(self.encoded.clone()),
                    EncodingFormat::Pem => {
                        Ok(pem::armor($label, &self.encoded).into_bytes())
                    }
                }
            }
        }
    };
}

pki_object_kind!(Certificate, CertificateInfo, "CERTIFICATE", "X.509 certificate.");
pki_object_kind!(Crl, CrlInfo, "X509 CRL", "Certificate revocation list.");
pki_object_kind!(PrivateKey, KeyInfo, "PRIVATE KEY", "Private key.");
pki_object_kind!(
    CertRequest,
    CertRequestInfo,
    "CERTIFICATE REQUEST",
    "Certificate signing request."
);

impl Certificate {
    pub fn subject_name(&self) -> &str {
        &self.info().subject_name
    }

    pub fn subject_friendly_name(&self) -> &str {
        &self.info().subject_friendly_name
    }

    pub fn issuer_name(&self) -> &str {
        &self.info().issuer_name
    }

    pub fn issuer_friendly_name(&self) -> &str {
        &self.info().issuer_friendly_name
    }

    pub fn serial_number(&self) -> &str {
        &self.info().serial_number
    }

    pub fn organization(&self) -> &str {
        &self.info().organization
    }

    pub fn signature_algorithm(&self) -> &str {
        &self.info().signature_algorithm
    }

    pub fn not_before(&self) -> &str {
        &self.info().not_before
    }

    pub fn not_after(&self) -> &str {
        &self.info().not_after
    }
}

impl Crl {
    pub fn issuer_name(&self) -> &str {
        &self.info().issuer_name
    }

    pub fn issuer_friendly_name(&self) -> &str {
        &self.info().issuer_friendly_name
    }

    pub fn this_update(&self) -> &str {
        &self.info().this_update
    }

    pub fn next_update(&self) -> &str {
        &self.info().next_update
    }
}

impl CertRequest {
    pub fn subject_name(&self) -> &str {
        &self.info().subject_name
    }

    pub fn signature_algorithm(&self) -> &str {
        &self.info().signature_algorithm
    }
}

impl PrivateKey {
    /// Thumbprint hex of the certificate this key is bound to, if known.
    pub fn bound_certificate(&self) -> Option<&str> {
        self.info().bound_certificate.as_deref()
    }
}

/// Tagged union over the four domain-object kinds.
///
/// This is what providers hand back from `fetch_by_hash` and what
/// `add_pki_object` accepts; the catalog dispatches on the tag without ever
/// looking inside the encoded bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PkiObject {
    Certificate(Certificate),
    Crl(Crl),
    Key(PrivateKey),
    Request(CertRequest),
}

impl PkiObject {
    /// The catalog kind tag for this object.
    pub fn kind(&self) -> PkiItemKind {
        match self {
            Self::Certificate(_) => PkiItemKind::Certificate,
            Self::Crl(_) => PkiItemKind::Crl,
            Self::Key(_) => PkiItemKind::Key,
            Self::Request(_) => PkiItemKind::CertificateRequest,
        }
    }

    /// The canonical encoded bytes.
    pub fn encoded(&self) -> &[u8] {
        match self {
            Self::Certificate(o) => o.encoded(),
            Self::Crl(o) => o.encoded(),
            Self::Key(o) => o.encoded(),
            Self::Request(o) => o.encoded(),
        }
    }

    /// `true` when the object carries no content.
    pub fn is_empty(&self) -> bool {
        self.encoded().is_empty()
    }

    /// SHA-1 digest of the canonical encoding.
    pub fn thumbprint(&self) -> [u8; THUMBPRINT_LEN] {
        thumbprint_of(self.encoded())
    }

    /// Uppercase hex form of the thumbprint.
    pub fn thumbprint_hex(&self) -> String {
        bytes_to_hex(&self.thumbprint())
    }

    /// Serialize to the requested encoding.
    pub fn encode(&self, format: EncodingFormat) -> ObjectResult<Vec<u8>> {
        match self {
            Self::Certificate(o) => o.encode(format),
            Self::Crl(o) => o.encode(format),
            Self::Key(o) => o.encode(format),
            Self::Request(o) => o.encode(format),
        }
    }

    /// Borrow the certificate, or fail with the actual kind.
    pub fn as_certificate(&self) -> ObjectResult<&Certificate> {
        match self {
            Self::Certificate(o) => Ok(o),
            other => Err(ObjectError::UnexpectedKind {
                expected: PkiItemKind::Certificate,
                actual: other.kind(),
            }),
        }
    }

    /// Borrow the CRL, or fail with the actual kind.
    pub fn as_crl(&self) -> ObjectResult<&Crl> {
        match self {
            Self::Crl(o) => Ok(o),
            other => Err(ObjectError::UnexpectedKind {
                expected: PkiItemKind::Crl,
                actual: other.kind(),
            }),
        }
    }

    /// Borrow the private key, or fail with the actual kind.
    pub fn as_key(&self) -> ObjectResult<&PrivateKey> {
        match self {
            Self::Key(o) => Ok(o),
            other => Err(ObjectError::UnexpectedKind {
                expected: PkiItemKind::Key,
                actual: other.kind(),
            }),
        }
    }

    /// Borrow the request, or fail with the actual kind.
    pub fn as_request(&self) -> ObjectResult<&CertRequest> {
        match self {
            Self::Request(o) => Ok(o),
            other => Err(ObjectError::UnexpectedKind {
                expected: PkiItemKind::CertificateRequest,
                actual: other.kind(),
            }),
        }
    }
}

impl From<Certificate> for PkiObject {
    fn from(cert: Certificate) -> Self {
        Self::Certificate(cert)
    }
}

impl From<Crl> for PkiObject {
    fn from(crl: Crl) -> Self {
        Self::Crl(crl)
    }
}

impl From<PrivateKey> for PkiObject {
    fn from(key: PrivateKey) -> Self {
        Self::Key(key)
    }
}

impl From<CertRequest> for PkiObject {
    fn from(req: CertRequest) -> Self {
        Self::Request(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert() -> Certificate {
        Certificate::from_parts(
            b"canonical-cert-bytes".to_vec(),
            CertificateInfo {
                subject_name: "CN=alice".to_string(),
                issuer_name: "CN=test-ca".to_string(),
                serial_number: "01".to_string(),
                signature_algorithm: "sha256WithRSA".to_string(),
                not_before: "2026-01-01T00:00:00Z".to_string(),
                not_after: "2027-01-01T00:00:00Z".to_string(),
                ..CertificateInfo::default()
            },
        )
    }

    #[test]
    fn thumbprint_is_20_bytes_stable() {
        let c = cert();
        let t1 = c.thumbprint();
        let t2 = c.thumbprint();
        assert_eq!(t1.len(), THUMBPRINT_LEN);
        assert_eq!(t1, t2);
        assert_eq!(c.thumbprint_hex().len(), 40);
    }

    #[test]
    fn thumbprint_hex_is_uppercase() {
        let hex = cert().thumbprint_hex();
        assert_eq!(hex, hex.to_ascii_uppercase());
    }

    #[test]
    fn encode_der_returns_canonical_bytes() {
        let c = cert();
        assert_eq!(c.encode(EncodingFormat::Der).unwrap(), c.encoded());
    }

    #[test]
    fn encode_pem_dearmors_to_canonical_bytes() {
        let c = cert();
        let pem_bytes = c.encode(EncodingFormat::Pem).unwrap();
        let (label, der) =
            pem::dearmor(std::str::from_utf8(&pem_bytes).unwrap()).unwrap();
        assert_eq!(label, "CERTIFICATE");
        assert_eq!(der, c.encoded());
    }

    #[test]
    fn encode_empty_object_fails() {
        let empty = Certificate::from_parts(Vec::new(), CertificateInfo::default());
        assert_eq!(
            empty.encode(EncodingFormat::Der),
            Err(ObjectError::EmptyObject)
        );
    }

    #[test]
    fn union_kind_tags() {
        assert_eq!(PkiObject::from(cert()).kind(), PkiItemKind::Certificate);
        let key = PrivateKey::from_parts(b"k".to_vec(), KeyInfo::default());
        assert_eq!(PkiObject::from(key).kind(), PkiItemKind::Key);
    }

    #[test]
    fn as_certificate_rejects_other_kinds() {
        let key: PkiObject =
            PrivateKey::from_parts(b"k".to_vec(), KeyInfo::default()).into();
        let err = key.as_certificate().unwrap_err();
        assert_eq!(
            err,
            ObjectError::UnexpectedKind {
                expected: PkiItemKind::Certificate,
                actual: PkiItemKind::Key,
            }
        );
    }

    #[test]
    fn pem_and_der_share_a_thumbprint() {
        // The content address is always over the canonical bytes, never the
        // armored form.
        let c = cert();
        let obj = PkiObject::from(c.clone());
        assert_eq!(obj.thumbprint_hex(), c.thumbprint_hex());
        let armored = c.encode(EncodingFormat::Pem).unwrap();
        assert_ne!(armored, c.encoded());
        assert_eq!(obj.thumbprint(), thumbprint_of(c.encoded()));
    }
}
