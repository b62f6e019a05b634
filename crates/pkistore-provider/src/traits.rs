use pkistore_pki::{Certificate, PkiObject, PrivateKey};
use pkistore_types::{PkiItemCollection, PkiItemKind};

use crate::error::ProviderResult;

/// Backend category private keys are filed under when no category applies.
pub const DEFAULT_KEY_CATEGORY: &str = "MY";

/// Capability contract every backend provider implements.
///
/// Implementations must satisfy these invariants:
/// - `provider_type` is an immutable identity string; every shard row the
///   provider produces carries it.
/// - `init` enumerates the backend into the shard atomically: on failure the
///   shard keeps its previous contents and every acquired backend handle is
///   released.
/// - `store` is a content-addressed upsert keyed by the object's thumbprint;
///   the shard is updated in place, no re-enumeration required.
/// - Lookup misses (`fetch_by_hash`, `delete`) are recoverable
///   [`NotFound`](crate::ProviderError::NotFound) results, never panics.
pub trait Provider: Send + Sync {
    /// Immutable identity string of this backend (e.g. `"SYSTEM"`).
    fn provider_type(&self) -> &str;

    /// Enumerate the backend and (re)build this provider's shard.
    fn init(&self) -> ProviderResult<()>;

    /// Snapshot of this provider's contribution to the catalog.
    fn items(&self) -> PkiItemCollection;

    /// Materialize the object whose recomputed thumbprint hex equals `hash`
    /// (case-insensitive) within `category`.
    ///
    /// Scans the backend, decoding objects of `kind` until one matches.
    fn fetch_by_hash(
        &self,
        hash: &str,
        category: &str,
        kind: PkiItemKind,
    ) -> ProviderResult<PkiObject>;

    /// Write the object's canonical encoding into `category` and return its
    /// thumbprint hex. Storing the same bytes twice is not an error.
    ///
    /// `flags` is a backend-specific hint; the built-in backends accept and
    /// ignore it.
    fn store(&self, object: &PkiObject, category: &str, flags: u32)
        -> ProviderResult<String>;

    /// Store a private key.
    ///
    /// `password` is forwarded to backends that protect key material at
    /// rest; the built-in backends store the canonical encoding verbatim.
    fn store_key(&self, key: &PrivateKey, password: &str) -> ProviderResult<String> {
        let _ = password;
        self.store(&PkiObject::Key(key.clone()), DEFAULT_KEY_CATEGORY, 0)
    }

    /// Remove the object with this content hash from `category`.
    fn delete(&self, hash: &str, category: &str) -> ProviderResult<()>;

    /// Whether the backend reports private-key material bound to this
    /// certificate. Must not import the certificate permanently; any staging
    /// state created for the lookup is released before returning.
    fn has_private_key(&self, cert: &Certificate) -> ProviderResult<bool>;
}
