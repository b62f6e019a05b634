//! Aggregate PKI catalog over heterogeneous backend providers.
//!
//! [`PkiStore`] is the aggregate root: a set of attached [`Provider`]s and
//! the merged, normalized catalog of their shards. Callers query the catalog
//! with [`Filter`](pkistore_types::Filter)s and resolve a matched row back
//! to a live domain object through the owning provider, on demand.
//!
//! # Lifecycle
//!
//! A store is built from a [`StoreConfig`] plus a [`ProviderRuntime`]
//! supplying the decode seam and the platform store handle. Each configured
//! provider enumerates synchronously during construction; any failure aborts
//! construction. The store is process/request-scoped state: explicit init,
//! no implicit global, no background refresh.
//!
//! [`Provider`]: pkistore_provider::Provider

pub mod config;
pub mod error;
pub mod store;

pub use config::{ProviderConfig, StoreConfig};
pub use error::{CatalogError, CatalogResult};
pub use store::{PkiStore, ProviderRuntime};
