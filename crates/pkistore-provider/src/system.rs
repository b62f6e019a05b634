//! Provider backed by the platform certificate store.

use std::sync::{Arc, RwLock};

use pkistore_pki::{Certificate, PkiCodec, PkiObject, PrivateKey};
use pkistore_types::{hex_eq, EncodingFormat, PkiItemCollection, PkiItemKind};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::object_to_pki_item;
use crate::platform::SystemStore;
use crate::traits::{Provider, DEFAULT_KEY_CATEGORY};

/// Identity string of the platform-store provider.
pub const SYSTEM_PROVIDER_TYPE: &str = "SYSTEM";

/// Categories enumerated when the configuration names none.
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["MY", "AddressBook", "ROOT", "TRUST", "CA", "Request"];

/// All object kinds a platform category can hold, in enumeration order.
const ENUM_KINDS: [PkiItemKind; 4] = [
    PkiItemKind::Certificate,
    PkiItemKind::Crl,
    PkiItemKind::Key,
    PkiItemKind::CertificateRequest,
];

/// Provider that enumerates the platform certificate store.
///
/// Holds a shared handle to the platform ([`SystemStore`]) and the decode
/// seam; each operation opens a scoped category handle, works, and releases
/// it before returning, on success and failure alike.
pub struct SystemStoreProvider {
    platform: Arc<SystemStore>,
    codec: Arc<dyn PkiCodec>,
    categories: Vec<String>,
    shard: RwLock<PkiItemCollection>,
}

impl SystemStoreProvider {
    /// Create a provider over the given categories; an empty list selects
    /// [`DEFAULT_CATEGORIES`]. Enumeration happens in `init`, not here.
    pub fn new(
        platform: Arc<SystemStore>,
        codec: Arc<dyn PkiCodec>,
        categories: Vec<String>,
    ) -> Self {
        let categories = if categories.is_empty() {
            DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
        } else {
            categories
        };
        Self {
            platform,
            codec,
            categories,
            shard: RwLock::new(PkiItemCollection::new()),
        }
    }

    /// The platform store this provider enumerates.
    pub fn platform(&self) -> &Arc<SystemStore> {
        &self.platform
    }

    fn decode(
        &self,
        kind: PkiItemKind,
        bytes: &[u8],
    ) -> ProviderResult<PkiObject> {
        // The platform holds canonical (DER) bytes.
        Ok(self.codec.decode(kind, bytes, EncodingFormat::Der)?)
    }

    fn normalize(
        &self,
        object: &PkiObject,
        category: &str,
    ) -> ProviderResult<pkistore_types::PkiItem> {
        let has_key = match object {
            PkiObject::Certificate(cert) => self.check_private_key(cert),
            _ => false,
        };
        object_to_pki_item(
            object,
            SYSTEM_PROVIDER_TYPE,
            category,
            EncodingFormat::Der,
            has_key,
        )
    }

    fn check_private_key(&self, cert: &Certificate) -> bool {
        self.platform.has_key(&cert.thumbprint_hex())
    }
}

impl Provider for SystemStoreProvider {
    fn provider_type(&self) -> &str {
        SYSTEM_PROVIDER_TYPE
    }

    fn init(&self) -> ProviderResult<()> {
        // Enumerate into a local collection and only commit on full
        // success: one undecodable object aborts the whole init and the
        // previous shard contents stay in place.
        let mut collection = PkiItemCollection::new();
        for category in &self.categories {
            let handle = self.platform.open(category)?;
            let mut count = 0usize;
            for kind in ENUM_KINDS {
                for bytes in handle.entries(kind) {
                    let object = self.decode(kind, &bytes)?;
                    collection.push(self.normalize(&object, category)?);
                    count += 1;
                }
            }
            debug!(category = %category, objects = count, "enumerated platform category");
            // Handle drops here, releasing the category on success; the `?`
            // paths above release it the same way.
        }
        info!(
            provider = SYSTEM_PROVIDER_TYPE,
            items = collection.len(),
            "provider initialized"
        );
        *self.shard.write().expect("lock poisoned") = collection;
        Ok(())
    }

    fn items(&self) -> PkiItemCollection {
        self.shard.read().expect("lock poisoned").clone()
    }

    fn fetch_by_hash(
        &self,
        hash: &str,
        category: &str,
        kind: PkiItemKind,
    ) -> ProviderResult<PkiObject> {
        let handle = self.platform.open(category)?;
        for bytes in handle.entries(kind) {
            let object = self.decode(kind, &bytes)?;
            if hex_eq(&object.thumbprint_hex(), hash) {
                return Ok(object);
            }
        }
        Err(ProviderError::NotFound {
            hash: hash.to_string(),
            category: category.to_string(),
        })
    }

    fn store(
        &self,
        object: &PkiObject,
        category: &str,
        _flags: u32,
    ) -> ProviderResult<String> {
        if object.is_empty() {
            return Err(pkistore_pki::ObjectError::EmptyObject.into());
        }
        let bytes = object.encode(EncodingFormat::Der)?;
        let hash = {
            let handle = self.platform.open(category)?;
            handle.add(object.kind(), bytes)
        };
        if let PkiObject::Key(key) = object {
            if let Some(cert_hash) = key.bound_certificate() {
                self.platform.bind_key(cert_hash);
            }
        }
        let item = self.normalize(object, category)?;
        self.shard.write().expect("lock poisoned").upsert(item);
        debug!(hash = %hash, category = %category, "stored object in platform store");
        Ok(hash)
    }

    fn store_key(&self, key: &PrivateKey, password: &str) -> ProviderResult<String> {
        // The platform protects key material itself; the password is the
        // caller's contract with the platform keyset, not with this catalog.
        let _ = password;
        self.store(&PkiObject::Key(key.clone()), DEFAULT_KEY_CATEGORY, 0)
    }

    fn delete(&self, hash: &str, category: &str) -> ProviderResult<()> {
        let removed = {
            let handle = self.platform.open(category)?;
            handle.remove(hash)
        };
        let Some((kind, bytes)) = removed else {
            return Err(ProviderError::NotFound {
                hash: hash.to_string(),
                category: category.to_string(),
            });
        };
        if kind == PkiItemKind::Key {
            if let Ok(object) = self.decode(kind, &bytes) {
                if let PkiObject::Key(key) = &object {
                    if let Some(cert_hash) = key.bound_certificate() {
                        self.platform.unbind_key(cert_hash);
                    }
                }
            }
        }
        self.shard
            .write()
            .expect("lock poisoned")
            .remove_row(hash, category);
        debug!(hash = %hash, category = %category, "deleted object from platform store");
        Ok(())
    }

    fn has_private_key(&self, cert: &Certificate) -> ProviderResult<bool> {
        if cert.is_empty() {
            return Err(pkistore_pki::ObjectError::EmptyObject.into());
        }
        Ok(self.check_private_key(cert))
    }
}
