//! Ordered in-memory list of records with identity-aware mutations.

use crate::core::IdentityComparator;

/// Owned, ordered sequence of records.
///
/// Every mutation that needs to find "the same record" goes through the
/// comparator supplied at construction, so no two entries share an identity as
/// long as callers only insert records that are not already present.
#[derive(Debug, Clone)]
pub struct LocalListCache<T> {
    items: Vec<T>,
    identity: IdentityComparator<T>,
}

impl<T: Clone> LocalListCache<T> {
    pub fn new(identity: IdentityComparator<T>) -> Self {
        Self {
            items: Vec::new(),
            identity,
        }
    }

    pub fn identity(&self) -> &IdentityComparator<T> {
        &self.identity
    }

    /// Returns a detached copy of the current sequence.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }

    /// Borrowed view of the records, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Discards the current contents and adopts `items` in their order.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Inserts at the head when `from_top` is set, at the tail otherwise.
    pub fn insert_at_edge(&mut self, item: T, from_top: bool) {
        if from_top {
            self.items.insert(0, item);
        } else {
            self.items.push(item);
        }
    }

    /// Position of the first record sharing `item`'s identity.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|existing| self.identity.equal(existing, item))
    }

    pub fn find(&self, item: &T) -> Option<&T> {
        self.position(item).map(|index| &self.items[index])
    }

    /// Removes the first record matching `item`. Returns false when nothing matched.
    pub fn remove_by_identity(&mut self, item: &T) -> bool {
        match self.position(item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Overwrites the matching record in place. Returns false when nothing matched.
    pub fn replace_by_identity(&mut self, item: T) -> bool {
        match self.position(&item) {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    /// Merges `incoming` by identity: matches are replaced in place, the rest are
    /// appended in `incoming` order. Returns the number of appended records.
    ///
    /// Applying the same batch twice leaves the sequence unchanged the second time.
    pub fn union_by_identity(&mut self, incoming: Vec<T>) -> usize {
        let mut appended = 0;
        for item in incoming {
            if !self.replace_by_identity_ref(&item) {
                self.items.push(item);
                appended += 1;
            }
        }
        appended
    }

    fn replace_by_identity_ref(&mut self, item: &T) -> bool {
        match self.position(item) {
            Some(index) => {
                self.items[index] = item.clone();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn cache() -> LocalListCache<Value> {
        LocalListCache::new(IdentityComparator::by_field("id"))
    }

    fn ids(cache: &LocalListCache<Value>) -> Vec<i64> {
        cache.iter().map(|v| v["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut cache = cache();
        cache.replace_all(vec![json!({"id": 1})]);
        let mut copy = cache.snapshot();
        copy.push(json!({"id": 2}));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_at_edge() {
        let mut cache = cache();
        cache.replace_all(vec![json!({"id": 1})]);
        cache.insert_at_edge(json!({"id": 2}), true);
        cache.insert_at_edge(json!({"id": 3}), false);
        assert_eq!(ids(&cache), vec![2, 1, 3]);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut cache = cache();
        cache.replace_all(vec![json!({"id": 1}), json!({"id": 2})]);
        assert!(cache.remove_by_identity(&json!({"id": "1"})));
        assert_eq!(ids(&cache), vec![2]);
        assert!(!cache.remove_by_identity(&json!({"id": 9})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replace_by_identity_keeps_position() {
        let mut cache = cache();
        cache.replace_all(vec![
            json!({"id": 1, "v": "a"}),
            json!({"id": 2, "v": "b"}),
            json!({"id": 3, "v": "c"}),
        ]);
        assert!(cache.replace_by_identity(json!({"id": 2, "v": "B"})));
        assert_eq!(ids(&cache), vec![1, 2, 3]);
        assert_eq!(cache.find(&json!({"id": 2})).unwrap()["v"], "B");
        assert!(!cache.replace_by_identity(json!({"id": 4})));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_union_replaces_matches_and_appends_rest() {
        let mut cache = cache();
        cache.replace_all(vec![json!({"id": 1, "v": 0}), json!({"id": 2, "v": 0})]);
        let appended = cache.union_by_identity(vec![
            json!({"id": 3, "v": 1}),
            json!({"id": 1, "v": 1}),
            json!({"id": 4, "v": 1}),
        ]);
        assert_eq!(appended, 2);
        assert_eq!(ids(&cache), vec![1, 2, 3, 4]);
        assert_eq!(cache.find(&json!({"id": 1})).unwrap()["v"], 1);
    }

    #[test]
    fn test_union_is_idempotent() {
        let page = vec![json!({"id": 5}), json!({"id": 6})];
        let mut cache = cache();
        cache.replace_all(vec![json!({"id": 1})]);
        cache.union_by_identity(page.clone());
        let once = cache.snapshot();
        assert_eq!(cache.union_by_identity(page), 0);
        assert_eq!(cache.snapshot(), once);
    }
}
