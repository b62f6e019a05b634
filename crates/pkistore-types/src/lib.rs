//! Foundation types for the PKI store catalog.
//!
//! This crate defines the normalized view of PKI material that every backend
//! provider produces, regardless of where the material physically lives:
//!
//! - [`PkiItem`] -- one catalog row: content hash, kind, format, owning
//!   provider, backend category, and the descriptive metadata of the object
//! - [`PkiItemCollection`] -- ordered, append-only container of rows
//! - [`Filter`] -- exact-match predicate over item attributes
//! - [`hex`](crate::hex) -- the hex identity encoding used for content
//!   addresses (thumbprint bytes ↔ hex strings)
//!
//! A `PkiItem` never owns the underlying object or any native handle; it
//! carries just enough identity (`hash`, `provider`, `category`) to resolve
//! the live object later through the owning provider.

pub mod collection;
pub mod error;
pub mod filter;
pub mod hex;
pub mod item;

// Re-export primary types at crate root for ergonomic imports.
pub use collection::PkiItemCollection;
pub use error::TypeError;
pub use filter::{Filter, FilterKey};
pub use hex::{bytes_to_hex, hex_digit_value, hex_eq, hex_to_bytes};
pub use item::{CertificateFields, CrlFields, EncodingFormat, PkiItem, PkiItemKind};
