//! # Reference Cache State
//!
//! In-memory cache of the reference rows the editor pages select from
//! (customers, suppliers, variants, units).
//!
//! ## Cache Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reference Cache Operations                           │
//! │                                                                         │
//! │  Frontend Action         Tauri Command             Cache Change         │
//! │  ───────────────         ─────────────             ────────────         │
//! │                                                                         │
//! │  Open Sale Page ────────► load_sale_references ──► bulk rows merged    │
//! │                                                                         │
//! │  Type "col" ────────────► search_sale_variants ──► results merged      │
//! │                            (len < 2: cached slice,    (union by id,     │
//! │                             no request)               never replace)    │
//! │                                                                         │
//! │  Pick a row ────────────► editors read it by id                        │
//! │                                                                         │
//! │  Sign Out ──────────────► caches cleared                               │
//! │                                                                         │
//! │  NOTE: Search responses never REPLACE the cache. A row loaded once     │
//! │        stays selectable even when a later narrow search omits it.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use atlas_api::{CustomerRow, SupplierRow, UnitRow, VariantRow};

/// Rows that can live in a reference cache (anything with a backend id).
pub trait RefRow: Clone {
    /// The backend primary key of this row.
    fn ref_id(&self) -> i64;
}

impl RefRow for CustomerRow {
    fn ref_id(&self) -> i64 {
        self.id
    }
}

impl RefRow for SupplierRow {
    fn ref_id(&self) -> i64 {
        self.id
    }
}

impl RefRow for UnitRow {
    fn ref_id(&self) -> i64 {
        self.id
    }
}

impl RefRow for VariantRow {
    fn ref_id(&self) -> i64 {
        self.id
    }
}

/// One reference collection, keyed by backend id.
///
/// ## Invariants
/// - Rows are unique by id; merging a row that is already cached
///   replaces the stored copy with the fresher one.
/// - Merging never removes rows. Only `clear` does.
#[derive(Debug, Clone)]
pub struct RefCache<T: RefRow> {
    rows: BTreeMap<i64, T>,
}

impl<T: RefRow> RefCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        RefCache {
            rows: BTreeMap::new(),
        }
    }

    /// Merges rows into the cache, fresher rows superseding cached ones.
    pub fn merge(&mut self, rows: Vec<T>) {
        for row in rows {
            self.rows.insert(row.ref_id(), row);
        }
    }

    /// Returns every cached row, ordered by id.
    pub fn snapshot(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    /// Returns the cached row with the given id, if any.
    pub fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    /// Returns the number of cached rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Checks whether the cache holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops every cached row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl<T: RefRow> Default for RefCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every reference collection the editor pages select from.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCaches {
    /// Customers for the order editor.
    pub customers: RefCache<CustomerRow>,

    /// Suppliers for the purchase editor.
    pub suppliers: RefCache<SupplierRow>,

    /// Variants for both editors.
    pub variants: RefCache<VariantRow>,

    /// Units for the per-line unit dropdowns.
    pub units: RefCache<UnitRow>,
}

impl ReferenceCaches {
    /// Drops every cached collection (sign-out).
    pub fn clear(&mut self) {
        self.customers.clear();
        self.suppliers.clear();
        self.variants.clear();
        self.units.clear();
    }
}

/// Tauri-managed reference cache state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<ReferenceCaches>>` because loader commands merge
/// into the caches while editor commands read from them concurrently.
#[derive(Debug)]
pub struct ReferenceState {
    caches: Arc<Mutex<ReferenceCaches>>,
}

impl ReferenceState {
    /// Creates a new empty reference state.
    pub fn new() -> Self {
        ReferenceState {
            caches: Arc::new(Mutex::new(ReferenceCaches::default())),
        }
    }

    /// Executes a function with read access to the caches.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let customers = refs.with_caches(|c| c.customers.snapshot());
    /// ```
    pub fn with_caches<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ReferenceCaches) -> R,
    {
        let caches = self.caches.lock().expect("Reference cache mutex poisoned");
        f(&caches)
    }

    /// Executes a function with write access to the caches.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// refs.with_caches_mut(|c| c.variants.merge(rows));
    /// ```
    pub fn with_caches_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ReferenceCaches) -> R,
    {
        let mut caches = self.caches.lock().expect("Reference cache mutex poisoned");
        f(&mut caches)
    }
}

impl Default for ReferenceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_variant(id: i64, name: &str) -> VariantRow {
        VariantRow {
            id,
            sku: None,
            variant_name: Some(name.to_string()),
            variant_price: 10_000,
            variant_cost_price: 7_000,
            product_name: None,
            image: None,
        }
    }

    #[test]
    fn test_merge_dedupes_by_id() {
        let mut cache = RefCache::new();
        cache.merge(vec![test_variant(1, "Cola"), test_variant(2, "Pepsi")]);
        cache.merge(vec![test_variant(2, "Pepsi 330ml")]);

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get(2).and_then(|v| v.variant_name),
            Some("Pepsi 330ml".to_string())
        );
    }

    #[test]
    fn test_search_results_augment_the_bulk_load() {
        let mut cache = RefCache::new();

        // Bulk load
        cache.merge(vec![
            test_variant(1, "Cola"),
            test_variant(2, "Pepsi"),
            test_variant(3, "Fanta"),
        ]);

        // Narrow search returns a subset plus one unseen row
        cache.merge(vec![test_variant(2, "Pepsi"), test_variant(9, "Sprite")]);

        // Union, not replacement
        assert_eq!(cache.len(), 4);
        assert!(cache.get(1).is_some());
        assert!(cache.get(9).is_some());
    }

    #[test]
    fn test_snapshot_is_ordered_by_id() {
        let mut cache = RefCache::new();
        cache.merge(vec![test_variant(5, "E"), test_variant(1, "A")]);

        let ids: Vec<i64> = cache.snapshot().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_clear_empties_every_collection() {
        let state = ReferenceState::new();
        state.with_caches_mut(|c| c.variants.merge(vec![test_variant(1, "Cola")]));
        assert!(state.with_caches(|c| !c.variants.is_empty()));

        state.with_caches_mut(|c| c.clear());
        assert!(state.with_caches(|c| c.variants.is_empty()));
    }
}
