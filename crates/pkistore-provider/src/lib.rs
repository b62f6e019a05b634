//! Backend providers for the PKI store catalog.
//!
//! A provider adapts one physical backend into the normalized catalog model:
//! it enumerates the backend's objects into [`PkiItem`](pkistore_types::PkiItem)
//! rows, materializes a live domain object on demand by content hash, and
//! applies store/delete mutations. All providers implement the [`Provider`]
//! capability trait so the catalog can treat them uniformly:
//!
//! - [`SystemStoreProvider`] -- enumerates the platform certificate store
//!   ([`SystemStore`]), category by category, through scoped
//!   [`StoreHandle`] guards
//! - [`FileStoreProvider`] -- enumerates a JSON descriptor listing object
//!   files on disk
//!
//! # Resource rules
//!
//! 1. Platform handles are scoped guards: acquired immediately before use,
//!    released on every exit path, including mid-enumeration failures.
//! 2. Enumeration is fail-fast: one undecodable object aborts the whole
//!    `init` and leaves the shard untouched.
//! 3. `store` is a content-addressed upsert; storing identical bytes twice
//!    into the same category yields one backend object and one shard row.
//! 4. A provider's shard stays consistent with its backend across `store`
//!    and `delete` without re-enumeration.

pub mod error;
pub mod file;
pub mod normalize;
pub mod platform;
pub mod system;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use file::{FileStoreProvider, FILE_PROVIDER_TYPE};
pub use normalize::object_to_pki_item;
pub use platform::{StoreHandle, SystemStore};
pub use system::{SystemStoreProvider, DEFAULT_CATEGORIES, SYSTEM_PROVIDER_TYPE};
pub use traits::{Provider, DEFAULT_KEY_CATEGORY};
