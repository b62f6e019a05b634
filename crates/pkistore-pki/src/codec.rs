//! The decode seam between backend bytes and domain objects.
//!
//! Providers hold opaque encoded bytes; turning them into a [`PkiObject`]
//! is the job of a [`PkiCodec`] implementation. A production deployment
//! plugs an actual ASN.1 layer in here. [`EnvelopeCodec`] is the built-in
//! implementation for tests and embedding: its "canonical encoding" is a
//! deterministic JSON envelope carrying the object's metadata record.

use pkistore_types::{EncodingFormat, PkiItemKind};
use serde::{Deserialize, Serialize};

use crate::error::{ObjectError, ObjectResult};
use crate::info::{CertRequestInfo, CertificateInfo, CrlInfo, KeyInfo};
use crate::object::{CertRequest, Certificate, Crl, PkiObject, PrivateKey};
use crate::pem;

/// Decoder for backend object bytes.
///
/// Implementations must be stateless with respect to the input: decoding
/// never mutates backend state, and the same bytes always produce an object
/// with the same thumbprint.
pub trait PkiCodec: Send + Sync {
    /// Decode `bytes` as an object of `kind`.
    ///
    /// `PEM` input is de-armored first; the thumbprint of the resulting
    /// object is always computed over the canonical (de-armored) bytes.
    /// Fails with [`ObjectError::DecodeFailed`] on malformed input and
    /// [`ObjectError::UnexpectedKind`] when the bytes decode to a different
    /// kind than requested.
    fn decode(
        &self,
        kind: PkiItemKind,
        bytes: &[u8],
        format: EncodingFormat,
    ) -> ObjectResult<PkiObject>;
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "info")]
enum Envelope {
    Certificate(CertificateInfo),
    Crl(CrlInfo),
    Key(KeyInfo),
    Request(CertRequestInfo),
}

impl Envelope {
    fn kind(&self) -> PkiItemKind {
        match self {
            Self::Certificate(_) => PkiItemKind::Certificate,
            Self::Crl(_) => PkiItemKind::Crl,
            Self::Key(_) => PkiItemKind::Key,
            Self::Request(_) => PkiItemKind::CertificateRequest,
        }
    }
}

/// JSON-envelope codec for tests and embedding.
///
/// The canonical encoding of an object is the JSON serialization of its
/// metadata envelope; serialization is deterministic (struct field order),
/// so identical metadata always yields identical bytes and therefore an
/// identical thumbprint.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }

    fn envelope_bytes(envelope: &Envelope) -> ObjectResult<Vec<u8>> {
        serde_json::to_vec(envelope)
            .map_err(|e| ObjectError::EncodeFailed(e.to_string()))
    }

    /// Mint a certificate whose canonical bytes encode `info`.
    pub fn certificate(info: CertificateInfo) -> ObjectResult<Certificate> {
        let bytes = Self::envelope_bytes(&Envelope::Certificate(info.clone()))?;
        Ok(Certificate::from_parts(bytes, info))
    }

    /// Mint a CRL whose canonical bytes encode `info`.
    pub fn crl(info: CrlInfo) -> ObjectResult<Crl> {
        let bytes = Self::envelope_bytes(&Envelope::Crl(info.clone()))?;
        Ok(Crl::from_parts(bytes, info))
    }

    /// Mint a private key whose canonical bytes encode `info`.
    pub fn key(info: KeyInfo) -> ObjectResult<PrivateKey> {
        let bytes = Self::envelope_bytes(&Envelope::Key(info.clone()))?;
        Ok(PrivateKey::from_parts(bytes, info))
    }

    /// Mint a certificate request whose canonical bytes encode `info`.
    pub fn request(info: CertRequestInfo) -> ObjectResult<CertRequest> {
        let bytes = Self::envelope_bytes(&Envelope::Request(info.clone()))?;
        Ok(CertRequest::from_parts(bytes, info))
    }
}

impl PkiCodec for EnvelopeCodec {
    fn decode(
        &self,
        kind: PkiItemKind,
        bytes: &[u8],
        format: EncodingFormat,
    ) -> ObjectResult<PkiObject> {
        if bytes.is_empty() {
            return Err(ObjectError::EmptyObject);
        }
        let canonical = match format {
            EncodingFormat::Der => bytes.to_vec(),
            EncodingFormat::Pem => {
                let text = std::str::from_utf8(bytes).map_err(|_| {
                    ObjectError::DecodeFailed("PEM input is not UTF-8".into())
                })?;
                pem::dearmor(text)?.1
            }
        };
        let envelope: Envelope = serde_json::from_slice(&canonical)
            .map_err(|e| ObjectError::DecodeFailed(e.to_string()))?;
        if envelope.kind() != kind {
            return Err(ObjectError::UnexpectedKind {
                expected: kind,
                actual: envelope.kind(),
            });
        }
        Ok(match envelope {
            Envelope::Certificate(info) => {
                Certificate::from_parts(canonical, info).into()
            }
            Envelope::Crl(info) => Crl::from_parts(canonical, info).into(),
            Envelope::Key(info) => PrivateKey::from_parts(canonical, info).into(),
            Envelope::Request(info) => CertRequest::from_parts(canonical, info).into(),
        })
    }
}
