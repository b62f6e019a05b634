//! Provider backed by a JSON descriptor of object files on disk.
//!
//! The backend is a directory containing a `catalog.json` descriptor whose
//! entries name the kind, encoding, category and relative path of each
//! stored object. Enumeration reads and decodes every described object;
//! mutations rewrite the descriptor so the directory remains
//! self-describing.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use pkistore_pki::{Certificate, PkiCodec, PkiObject};
use pkistore_types::{hex_eq, EncodingFormat, PkiItemCollection, PkiItemKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::object_to_pki_item;
use crate::traits::Provider;

/// Identity string of the file-store provider.
pub const FILE_PROVIDER_TYPE: &str = "FILE";

/// Name of the descriptor file at the store root.
pub const DESCRIPTOR_FILE: &str = "catalog.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DescriptorEntry {
    kind: PkiItemKind,
    format: EncodingFormat,
    category: String,
    path: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Descriptor {
    items: Vec<DescriptorEntry>,
}

fn file_extension(kind: PkiItemKind) -> &'static str {
    match kind {
        PkiItemKind::Certificate => "cer",
        PkiItemKind::Crl => "crl",
        PkiItemKind::Key => "key",
        PkiItemKind::CertificateRequest => "csr",
    }
}

/// Provider that enumerates a descriptor-driven file store.
pub struct FileStoreProvider {
    root: PathBuf,
    codec: Arc<dyn PkiCodec>,
    shard: RwLock<PkiItemCollection>,
    descriptor: RwLock<Descriptor>,
    // Uppercase thumbprints of certificates a stored key is bound to.
    key_bindings: RwLock<HashSet<String>>,
}

impl FileStoreProvider {
    /// Create a provider over the store rooted at `root`. Enumeration
    /// happens in `init`, not here.
    pub fn new(root: impl Into<PathBuf>, codec: Arc<dyn PkiCodec>) -> Self {
        Self {
            root: root.into(),
            codec,
            shard: RwLock::new(PkiItemCollection::new()),
            descriptor: RwLock::new(Descriptor::default()),
            key_bindings: RwLock::new(HashSet::new()),
        }
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_descriptor(&self) -> ProviderResult<Descriptor> {
        let path = self.root.join(DESCRIPTOR_FILE);
        if !path.exists() {
            // A fresh store: no descriptor yet, nothing to enumerate.
            return Ok(Descriptor::default());
        }
        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Descriptor(e.to_string()))
    }

    fn write_descriptor(&self, descriptor: &Descriptor) -> ProviderResult<()> {
        let bytes = serde_json::to_vec_pretty(descriptor)
            .map_err(|e| ProviderError::Descriptor(e.to_string()))?;
        fs::write(self.root.join(DESCRIPTOR_FILE), bytes)?;
        Ok(())
    }

    fn load_entry(&self, entry: &DescriptorEntry) -> ProviderResult<PkiObject> {
        let bytes = fs::read(self.root.join(&entry.path))?;
        Ok(self.codec.decode(entry.kind, &bytes, entry.format)?)
    }

    fn normalize(
        &self,
        object: &PkiObject,
        category: &str,
        format: EncodingFormat,
        bindings: &HashSet<String>,
    ) -> ProviderResult<pkistore_types::PkiItem> {
        let has_key = match object {
            PkiObject::Certificate(cert) => {
                bindings.contains(&cert.thumbprint_hex())
            }
            _ => false,
        };
        object_to_pki_item(object, FILE_PROVIDER_TYPE, category, format, has_key)
    }
}

impl Provider for FileStoreProvider {
    fn provider_type(&self) -> &str {
        FILE_PROVIDER_TYPE
    }

    fn init(&self) -> ProviderResult<()> {
        if !self.root.is_dir() {
            return Err(ProviderError::StoreOpenFailed {
                category: self.root.display().to_string(),
                reason: "store root is not a directory".to_string(),
            });
        }
        let descriptor = self.read_descriptor()?;

        // Two passes: keys must be decoded first so certificate rows can
        // report private-key presence regardless of descriptor order.
        let mut loaded = Vec::with_capacity(descriptor.items.len());
        let mut bindings = HashSet::new();
        for entry in &descriptor.items {
            let object = self.load_entry(entry)?;
            if let PkiObject::Key(key) = &object {
                if let Some(cert_hash) = key.bound_certificate() {
                    bindings.insert(cert_hash.to_ascii_uppercase());
                }
            }
            loaded.push((entry.clone(), object));
        }

        let mut collection = PkiItemCollection::new();
        for (entry, object) in &loaded {
            collection.push(self.normalize(
                object,
                &entry.category,
                entry.format,
                &bindings,
            )?);
        }

        info!(
            provider = FILE_PROVIDER_TYPE,
            root = %self.root.display(),
            items = collection.len(),
            "provider initialized"
        );
        *self.shard.write().expect("lock poisoned") = collection;
        *self.descriptor.write().expect("lock poisoned") = descriptor;
        *self.key_bindings.write().expect("lock poisoned") = bindings;
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
        let descriptor = self.descriptor.read().expect("lock poisoned").clone();
        for entry in descriptor
            .items
            .iter()
            .filter(|e| e.kind == kind && e.category == category)
        {
            let object = self.load_entry(entry)?;
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
        let hash = object.thumbprint_hex();
        let relative = format!(
            "{category}/{hash}.{ext}",
            ext = file_extension(object.kind())
        );
        fs::create_dir_all(self.root.join(category))?;
        fs::write(self.root.join(&relative), object.encode(EncodingFormat::Der)?)?;

        {
            let mut descriptor = self.descriptor.write().expect("lock poisoned");
            let exists = descriptor
                .items
                .iter()
                .any(|e| e.category == category && e.path == relative);
            if !exists {
                descriptor.items.push(DescriptorEntry {
                    kind: object.kind(),
                    format: EncodingFormat::Der,
                    category: category.to_string(),
                    path: relative,
                });
            }
            self.write_descriptor(&descriptor)?;
        }

        if let PkiObject::Key(key) = object {
            if let Some(cert_hash) = key.bound_certificate() {
                self.key_bindings
                    .write()
                    .expect("lock poisoned")
                    .insert(cert_hash.to_ascii_uppercase());
            }
        }

        let bindings = self.key_bindings.read().expect("lock poisoned").clone();
        let item = self.normalize(object, category, EncodingFormat::Der, &bindings)?;
        self.shard.write().expect("lock poisoned").upsert(item);
        debug!(hash = %hash, category = %category, "stored object in file store");
        Ok(hash)
    }

    fn delete(&self, hash: &str, category: &str) -> ProviderResult<()> {
        let descriptor = self.descriptor.read().expect("lock poisoned").clone();
        let mut matched = None;
        for (index, entry) in descriptor
            .items
            .iter()
            .enumerate()
            .filter(|(_, e)| e.category == category)
        {
            let object = self.load_entry(entry)?;
            if hex_eq(&object.thumbprint_hex(), hash) {
                matched = Some((index, object));
                break;
            }
        }
        let Some((index, object)) = matched else {
            return Err(ProviderError::NotFound {
                hash: hash.to_string(),
                category: category.to_string(),
            });
        };

        {
            let mut descriptor = self.descriptor.write().expect("lock poisoned");
            let entry = descriptor.items.remove(index);
            fs::remove_file(self.root.join(&entry.path))?;
            self.write_descriptor(&descriptor)?;
        }

        if let PkiObject::Key(key) = &object {
            if let Some(cert_hash) = key.bound_certificate() {
                self.key_bindings
                    .write()
                    .expect("lock poisoned")
                    .remove(&cert_hash.to_ascii_uppercase());
            }
        }

        self.shard
            .write()
            .expect("lock poisoned")
            .remove_row(hash, category);
        debug!(hash = %hash, category = %category, "deleted object from file store");
        Ok(())
    }

    fn has_private_key(&self, cert: &Certificate) -> ProviderResult<bool> {
        if cert.is_empty() {
            return Err(pkistore_pki::ObjectError::EmptyObject.into());
        }
        Ok(self
            .key_bindings
            .read()
            .expect("lock poisoned")
            .contains(&cert.thumbprint_hex()))
    }
}
