use std::sync::Arc;

use pkistore_pki::{
    CertRequest, Certificate, Crl, ObjectError, PkiCodec, PkiObject, PrivateKey,
};
use pkistore_provider::{
    object_to_pki_item, FileStoreProvider, Provider, SystemStore,
    SystemStoreProvider, DEFAULT_KEY_CATEGORY,
};
use pkistore_types::{EncodingFormat, Filter, PkiItem, PkiItemCollection, PkiItemKind};
use tracing::info;

use crate::config::{ProviderConfig, StoreConfig};
use crate::error::{CatalogError, CatalogResult};

/// Collaborators needed to construct providers from configuration: the
/// decode seam and the platform certificate store handle.
#[derive(Clone)]
pub struct ProviderRuntime {
    pub codec: Arc<dyn PkiCodec>,
    pub platform: Arc<SystemStore>,
}

impl ProviderRuntime {
    pub fn new(codec: Arc<dyn PkiCodec>, platform: Arc<SystemStore>) -> Self {
        Self { codec, platform }
    }
}

/// The aggregate root: attached providers plus the merged catalog.
///
/// Single-threaded by design: every operation blocks the calling thread and
/// mutators take `&mut self`. Callers wanting concurrency run independent
/// stores, or serialize access externally.
pub struct PkiStore {
    providers: Vec<Box<dyn Provider>>,
    items: PkiItemCollection,
}

impl PkiStore {
    /// An empty store with no providers attached.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            items: PkiItemCollection::new(),
        }
    }

    /// Construct from configuration, attaching each configured provider in
    /// order. Every provider enumerates synchronously; any construction or
    /// enumeration failure aborts the whole build.
    pub fn from_config(
        config: &StoreConfig,
        runtime: &ProviderRuntime,
    ) -> CatalogResult<Self> {
        let mut store = Self::new();
        for entry in &config.providers {
            let provider: Box<dyn Provider> = match entry {
                ProviderConfig::System { categories } => {
                    Box::new(SystemStoreProvider::new(
                        Arc::clone(&runtime.platform),
                        Arc::clone(&runtime.codec),
                        categories.clone(),
                    ))
                }
                ProviderConfig::File { path } => Box::new(FileStoreProvider::new(
                    path.clone(),
                    Arc::clone(&runtime.codec),
                )),
            };
            store.add_provider(provider)?;
        }
        Ok(store)
    }

    /// Parse a JSON configuration payload and construct from it.
    pub fn from_json(json: &str, runtime: &ProviderRuntime) -> CatalogResult<Self> {
        Self::from_config(&StoreConfig::from_json(json)?, runtime)
    }

    /// Type strings of the currently attached providers, in attach order.
    pub fn provider_types(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_type()).collect()
    }

    fn provider(&self, provider_type: &str) -> CatalogResult<&dyn Provider> {
        self.providers
            .iter()
            .find(|p| p.provider_type() == provider_type)
            .map(|p| p.as_ref())
            .ok_or_else(|| CatalogError::ProviderNotFound(provider_type.to_string()))
    }

    /// Attach a provider: run its enumeration and merge its shard into the
    /// catalog. A provider type may be attached at most once.
    pub fn add_provider(&mut self, provider: Box<dyn Provider>) -> CatalogResult<()> {
        let provider_type = provider.provider_type().to_string();
        if self.provider(&provider_type).is_ok() {
            return Err(CatalogError::DuplicateProviderType(provider_type));
        }
        provider.init()?;
        let shard = provider.items();
        info!(provider = %provider_type, items = shard.len(), "provider attached");
        self.items.merge(&shard);
        self.providers.push(provider);
        Ok(())
    }

    /// Detach the provider with this type string and remove its shard from
    /// the catalog.
    pub fn delete_provider(&mut self, provider_type: &str) -> CatalogResult<()> {
        let index = self
            .providers
            .iter()
            .position(|p| p.provider_type() == provider_type)
            .ok_or_else(|| CatalogError::ProviderNotFound(provider_type.to_string()))?;
        self.providers.remove(index);
        let removed = self.items.remove_provider(provider_type);
        info!(provider = %provider_type, rows = removed, "provider detached");
        Ok(())
    }

    /// Snapshot of every catalog row, in insertion order.
    pub fn get_items(&self) -> PkiItemCollection {
        self.items.clone()
    }

    /// Snapshot of the certificate rows only.
    pub fn get_certs(&self) -> PkiItemCollection {
        self.items
            .iter()
            .filter(|item| item.kind == PkiItemKind::Certificate)
            .cloned()
            .collect()
    }

    /// Every row matching `filter`, in insertion order.
    pub fn find(&self, filter: &Filter) -> PkiItemCollection {
        self.items.find(filter)
    }

    /// First key-material row matching `filter`: a `KEY` row or a
    /// certificate row with a bound private key.
    pub fn find_key(&self, filter: &Filter) -> CatalogResult<PkiItem> {
        self.items
            .find_key(filter)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    fn resolve(&self, item: &PkiItem, kind: PkiItemKind) -> CatalogResult<PkiObject> {
        if item.kind != kind {
            return Err(ObjectError::UnexpectedKind {
                expected: kind,
                actual: item.kind,
            }
            .into());
        }
        let provider = self.provider(&item.provider)?;
        Ok(provider.fetch_by_hash(&item.hash, &item.category, kind)?)
    }

    /// Materialize the certificate a catalog row describes.
    pub fn get_item_cert(&self, item: &PkiItem) -> CatalogResult<Certificate> {
        Ok(self
            .resolve(item, PkiItemKind::Certificate)?
            .as_certificate()?
            .clone())
    }

    /// Materialize the CRL a catalog row describes.
    pub fn get_item_crl(&self, item: &PkiItem) -> CatalogResult<Crl> {
        Ok(self.resolve(item, PkiItemKind::Crl)?.as_crl()?.clone())
    }

    /// Materialize the private key a catalog row describes.
    pub fn get_item_key(&self, item: &PkiItem) -> CatalogResult<PrivateKey> {
        Ok(self.resolve(item, PkiItemKind::Key)?.as_key()?.clone())
    }

    /// Materialize the certificate request a catalog row describes.
    pub fn get_item_req(&self, item: &PkiItem) -> CatalogResult<CertRequest> {
        Ok(self
            .resolve(item, PkiItemKind::CertificateRequest)?
            .as_request()?
            .clone())
    }

    fn add_object(
        &mut self,
        provider_type: &str,
        category: &str,
        object: PkiObject,
        flags: u32,
    ) -> CatalogResult<String> {
        let provider = self.provider(provider_type)?;
        let hash = provider.store(&object, category, flags)?;
        let has_key = match &object {
            PkiObject::Certificate(cert) => provider.has_private_key(cert)?,
            _ => false,
        };
        let item = object_to_pki_item(
            &object,
            provider_type,
            category,
            EncodingFormat::Der,
            has_key,
        )?;
        self.items.upsert(item);
        Ok(hash)
    }

    /// Store a certificate through the named provider and reflect it into
    /// the catalog. Returns the content hash.
    pub fn add_certificate(
        &mut self,
        provider_type: &str,
        category: &str,
        cert: &Certificate,
        flags: u32,
    ) -> CatalogResult<String> {
        self.add_object(provider_type, category, cert.clone().into(), flags)
    }

    /// Store a CRL through the named provider and reflect it into the
    /// catalog. Returns the content hash.
    pub fn add_crl(
        &mut self,
        provider_type: &str,
        category: &str,
        crl: &Crl,
        flags: u32,
    ) -> CatalogResult<String> {
        self.add_object(provider_type, category, crl.clone().into(), flags)
    }

    /// Store a certificate request through the named provider and reflect it
    /// into the catalog. Returns the content hash.
    pub fn add_request(
        &mut self,
        provider_type: &str,
        category: &str,
        request: &CertRequest,
        flags: u32,
    ) -> CatalogResult<String> {
        self.add_object(provider_type, category, request.clone().into(), flags)
    }

    /// Store a private key through the named provider and reflect it into
    /// the catalog. `password` is forwarded to backends that protect key
    /// material at rest. Returns the content hash.
    pub fn add_key(
        &mut self,
        provider_type: &str,
        key: &PrivateKey,
        password: &str,
    ) -> CatalogResult<String> {
        let provider = self.provider(provider_type)?;
        let hash = provider.store_key(key, password)?;
        let item = object_to_pki_item(
            &PkiObject::Key(key.clone()),
            provider_type,
            DEFAULT_KEY_CATEGORY,
            EncodingFormat::Der,
            false,
        )?;
        self.items.upsert(item);
        Ok(hash)
    }
}

impl Default for PkiStore {
    fn default() -> Self {
        Self::new()
    }
}
