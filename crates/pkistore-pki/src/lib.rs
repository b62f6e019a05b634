//! Opaque PKI domain objects and the decode seam.
//!
//! The store core never parses ASN.1. It consumes PKI material through the
//! narrow, read-only interface this crate defines:
//!
//! - [`Certificate`], [`Crl`], [`PrivateKey`], [`CertRequest`] -- domain
//!   objects holding their canonical encoded bytes plus a parsed metadata
//!   record, exposing `encode(format)`, `thumbprint()` (SHA-1 of the
//!   canonical bytes, 20 bytes) and side-effect-free accessors
//! - [`PkiObject`] -- the tagged union over the four kinds
//! - [`PkiCodec`] -- the trait an actual ASN.1 layer implements to decode
//!   backend bytes into domain objects
//! - [`EnvelopeCodec`] -- a JSON-envelope codec for tests and embedding
//!
//! Objects never change after construction; a thumbprint computed at
//! normalization time is valid for the object's lifetime.

pub mod codec;
pub mod error;
pub mod info;
pub mod object;
pub mod pem;

pub use codec::{EnvelopeCodec, PkiCodec};
pub use error::{ObjectError, ObjectResult};
pub use info::{CertRequestInfo, CertificateInfo, CrlInfo, KeyInfo};
pub use object::{CertRequest, Certificate, Crl, PkiObject, PrivateKey};
