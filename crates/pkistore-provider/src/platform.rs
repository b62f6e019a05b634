//! Emulated platform certificate store.
//!
//! Stands in for the operating system's certificate store: named categories
//! ("MY", "ROOT", ...) holding encoded objects, plus a registry of
//! certificate identities the platform holds private-key material for.
//! State lives in memory behind `RwLock`s, suitable for tests and embedding;
//! a deployment against a real platform store implements the same surface.
//!
//! Access goes through scoped [`StoreHandle`] guards. The store counts open
//! handles so leak-freedom is observable: after any operation completes --
//! normally or by error -- [`SystemStore::open_handles`] must be back to its
//! prior value. The guard's `Drop` impl guarantees this on every exit path.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use pkistore_types::{bytes_to_hex, hex_eq, PkiItemKind};
use sha1::{Digest, Sha1};

use crate::error::{ProviderError, ProviderResult};

fn content_hash(bytes: &[u8]) -> String {
    bytes_to_hex(&Sha1::digest(bytes))
}

#[derive(Clone, Debug)]
struct StoredEntry {
    kind: PkiItemKind,
    bytes: Vec<u8>,
    hash: String,
}

/// In-memory platform certificate store.
#[derive(Debug, Default)]
pub struct SystemStore {
    categories: RwLock<HashMap<String, Vec<StoredEntry>>>,
    key_bindings: RwLock<HashSet<String>>,
    open_handles: AtomicUsize,
}

impl SystemStore {
    /// Create an empty platform store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scoped handle onto `category`, creating the category if the
    /// platform has not seen it yet (platform stores materialize on open).
    pub fn open(&self, category: &str) -> ProviderResult<StoreHandle<'_>> {
        if category.is_empty() {
            return Err(ProviderError::StoreOpenFailed {
                category: category.to_string(),
                reason: "empty category name".to_string(),
            });
        }
        self.categories
            .write()
            .expect("lock poisoned")
            .entry(category.to_string())
            .or_default();
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(StoreHandle {
            store: self,
            category: category.to_string(),
        })
    }

    /// Number of handles currently open. Zero between operations.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Register that private-key material exists for the certificate with
    /// this thumbprint hex.
    pub fn bind_key(&self, cert_hash: &str) {
        self.key_bindings
            .write()
            .expect("lock poisoned")
            .insert(cert_hash.to_ascii_uppercase());
    }

    /// Drop the key binding for this certificate thumbprint, if present.
    pub fn unbind_key(&self, cert_hash: &str) {
        self.key_bindings
            .write()
            .expect("lock poisoned")
            .remove(&cert_hash.to_ascii_uppercase());
    }

    /// Whether the platform holds key material for this certificate
    /// thumbprint. Pure lookup; nothing is imported or retained.
    pub fn has_key(&self, cert_hash: &str) -> bool {
        self.key_bindings
            .read()
            .expect("lock poisoned")
            .contains(&cert_hash.to_ascii_uppercase())
    }
}

/// Scoped view onto one category of a [`SystemStore`].
///
/// Dropping the handle releases it; the open-handle count decrements on
/// every exit path, including unwinding out of a failed enumeration.
#[derive(Debug)]
pub struct StoreHandle<'a> {
    store: &'a SystemStore,
    category: String,
}

impl StoreHandle<'_> {
    /// The category this handle is scoped to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Encoded bytes of every object of `kind`, in storage order.
    pub fn entries(&self, kind: PkiItemKind) -> Vec<Vec<u8>> {
        let categories = self.store.categories.read().expect("lock poisoned");
        categories
            .get(&self.category)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.kind == kind)
                    .map(|e| e.bytes.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Upsert encoded bytes under this category, keyed by content hash.
    ///
    /// Returns the content hash. Storing identical bytes twice leaves a
    /// single entry.
    pub fn add(&self, kind: PkiItemKind, bytes: Vec<u8>) -> String {
        let hash = content_hash(&bytes);
        let mut categories = self.store.categories.write().expect("lock poisoned");
        let entries = categories.entry(self.category.clone()).or_default();
        if !entries.iter().any(|e| hex_eq(&e.hash, &hash)) {
            entries.push(StoredEntry { kind, bytes, hash: hash.clone() });
        }
        hash
    }

    /// Remove the entry whose content hash matches (case-insensitive).
    ///
    /// Returns the removed entry's kind and bytes, or `None` on a miss.
    pub fn remove(&self, hash: &str) -> Option<(PkiItemKind, Vec<u8>)> {
        let mut categories = self.store.categories.write().expect("lock poisoned");
        let entries = categories.get_mut(&self.category)?;
        let index = entries.iter().position(|e| hex_eq(&e.hash, hash))?;
        let entry = entries.remove(index);
        Some((entry.kind, entry.bytes))
    }
}

impl Drop for StoreHandle<'_> {
    fn drop(&mut self) {
        self.store.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
