use serde::{Deserialize, Serialize};

use crate::filter::Filter;
use crate::item::{PkiItem, PkiItemKind};

/// Ordered container of catalog rows.
///
/// Preserves insertion order and is append-only during enumeration; rows
/// only leave the collection when a provider shard is detached
/// ([`PkiItemCollection::remove_provider`]). Uniqueness is a catalog-level
/// policy enforced by callers through [`PkiItemCollection::upsert`], not by
/// `push` itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkiItemCollection {
    items: Vec<PkiItem>,
}

impl PkiItemCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. No uniqueness is enforced at this layer.
    pub fn push(&mut self, item: PkiItem) {
        self.items.push(item);
    }

    /// Insert a row, replacing an existing row with the same
    /// `(hash, provider, category)` identity in place.
    pub fn upsert(&mut self, item: PkiItem) {
        match self.items.iter_mut().find(|existing| existing.same_row(&item)) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` if the collection holds no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Row at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<&PkiItem> {
        self.items.get(index)
    }

    /// Restartable iteration in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, PkiItem> {
        self.items.iter()
    }

    /// Whether a row with the same `(hash, provider, category)` exists.
    pub fn contains_row(&self, item: &PkiItem) -> bool {
        self.items.iter().any(|existing| existing.same_row(item))
    }

    /// Append every row of `other`, skipping rows already present under the
    /// same identity. Used when merging a provider shard into the catalog.
    pub fn merge(&mut self, other: &PkiItemCollection) {
        for item in other.iter() {
            if !self.contains_row(item) {
                self.items.push(item.clone());
            }
        }
    }

    /// Remove the row with this `(hash, category)` identity, if present.
    /// Hash comparison is case-insensitive. Used by providers to keep their
    /// shard consistent after a backend delete.
    pub fn remove_row(&mut self, hash: &str, category: &str) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| !(item.matches_hash(hash) && item.category == category));
        before != self.items.len()
    }

    /// Remove every row owned by `provider`; returns how many were removed.
    pub fn remove_provider(&mut self, provider: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.provider != provider);
        before - self.items.len()
    }

    /// Every row whose populated filter fields all match, in insertion
    /// order. An empty filter returns the whole collection.
    pub fn find(&self, filter: &Filter) -> PkiItemCollection {
        self.items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    /// First row matching `filter` that is key material: either a `KEY` row
    /// or a certificate row whose provider reported a bound private key.
    ///
    /// Ties are resolved by insertion order; `None` when nothing matches.
    pub fn find_key(&self, filter: &Filter) -> Option<&PkiItem> {
        self.items.iter().find(|item| {
            filter.matches(item)
                && (item.kind == PkiItemKind::Key
                    || (item.kind == PkiItemKind::Certificate && item.has_private_key()))
        })
    }
}

impl From<Vec<PkiItem>> for PkiItemCollection {
    fn from(items: Vec<PkiItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<PkiItem> for PkiItemCollection {
    fn from_iter<I: IntoIterator<Item = PkiItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PkiItemCollection {
    type Item = PkiItem;
    type IntoIter = std::vec::IntoIter<PkiItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a PkiItemCollection {
    type Item = &'a PkiItem;
    type IntoIter = std::slice::Iter<'a, PkiItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterKey;
    use crate::item::{CertificateFields, EncodingFormat};

    fn item(hash: &str, kind: PkiItemKind, provider: &str, category: &str) -> PkiItem {
        PkiItem {
            hash: hash.to_string(),
            kind,
            format: EncodingFormat::Der,
            provider: provider.to_string(),
            category: category.to_string(),
            certificate: (kind == PkiItemKind::Certificate)
                .then(CertificateFields::default),
            crl: None,
        }
    }

    fn sample() -> PkiItemCollection {
        let mut collection = PkiItemCollection::new();
        collection.push(item("AA01", PkiItemKind::Certificate, "SYSTEM", "MY"));
        collection.push(item("BB02", PkiItemKind::Crl, "SYSTEM", "CA"));
        collection.push(item("CC03", PkiItemKind::Key, "FILE", "MY"));
        collection
    }

    // -----------------------------------------------------------------------
    // Ordering and iteration
    // -----------------------------------------------------------------------

    #[test]
    fn iteration_preserves_insertion_order() {
        let collection = sample();
        let hashes: Vec<&str> =
            collection.iter().map(|i| i.hash.as_str()).collect();
        assert_eq!(hashes, ["AA01", "BB02", "CC03"]);
    }

    #[test]
    fn iteration_is_restartable() {
        let collection = sample();
        assert_eq!(collection.iter().count(), 3);
        assert_eq!(collection.iter().count(), 3);
    }

    // -----------------------------------------------------------------------
    // find / find_key
    // -----------------------------------------------------------------------

    #[test]
    fn empty_filter_returns_all_in_order() {
        let collection = sample();
        let found = collection.find(&Filter::new());
        assert_eq!(found, collection);
    }

    #[test]
    fn hash_filter_returns_single_row() {
        let collection = sample();
        let found = collection.find(&Filter::new().with(FilterKey::Hash, "bb02"));
        assert_eq!(found.len(), 1);
        assert_eq!(found.get(0).unwrap().hash, "BB02");
    }

    #[test]
    fn find_key_returns_key_row() {
        let collection = sample();
        let key = collection.find_key(&Filter::new()).unwrap();
        assert_eq!(key.hash, "CC03");
    }

    #[test]
    fn find_key_prefers_insertion_order() {
        let mut collection = sample();
        let mut cert = item("DD04", PkiItemKind::Certificate, "SYSTEM", "MY");
        cert.certificate.as_mut().unwrap().has_private_key = true;
        collection.push(cert);
        // The KEY row at CC03 precedes the keyed certificate at DD04.
        assert_eq!(collection.find_key(&Filter::new()).unwrap().hash, "CC03");
    }

    #[test]
    fn find_key_matches_certificate_with_private_key() {
        let mut collection = PkiItemCollection::new();
        let mut cert = item("DD04", PkiItemKind::Certificate, "SYSTEM", "MY");
        cert.certificate.as_mut().unwrap().has_private_key = true;
        collection.push(cert);
        assert_eq!(collection.find_key(&Filter::new()).unwrap().hash, "DD04");
    }

    #[test]
    fn find_key_none_on_keyless_catalog() {
        let mut collection = PkiItemCollection::new();
        collection.push(item("AA01", PkiItemKind::Certificate, "SYSTEM", "MY"));
        assert!(collection.find_key(&Filter::new()).is_none());
    }

    // -----------------------------------------------------------------------
    // Upsert / merge / shard removal
    // -----------------------------------------------------------------------

    #[test]
    fn upsert_replaces_same_row_in_place() {
        let mut collection = sample();
        let mut replacement = item("aa01", PkiItemKind::Certificate, "SYSTEM", "MY");
        replacement.certificate.as_mut().unwrap().has_private_key = true;
        collection.upsert(replacement);
        assert_eq!(collection.len(), 3);
        assert!(collection.get(0).unwrap().has_private_key());
    }

    #[test]
    fn upsert_appends_new_row() {
        let mut collection = sample();
        collection.upsert(item("EE05", PkiItemKind::Certificate, "SYSTEM", "ROOT"));
        assert_eq!(collection.len(), 4);
    }

    #[test]
    fn merge_skips_duplicate_rows() {
        let mut collection = sample();
        let shard = sample();
        collection.merge(&shard);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn remove_provider_drops_only_that_shard() {
        let mut collection = sample();
        assert_eq!(collection.remove_provider("SYSTEM"), 2);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).unwrap().provider, "FILE");
        assert_eq!(collection.remove_provider("SYSTEM"), 0);
    }
}
