//! Registries that own signatures and guarantee identity uniqueness.
//!
//! Collections are mutated only outside the tick: callers must not add or
//! remove signatures while an update pass is iterating. That is a documented
//! precondition of the single-threaded, tick-driven model rather than a
//! runtime-checked invariant.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::Instant;

use itertools::Itertools;

use crate::errors::DuplicateSignatureId;
use crate::signature::InputSignature;

/// A name-keyed, insertion-ordered signature registry.
///
/// Lookup by id is O(1); plain iteration follows insertion order. A
/// secondary precedence-sorted view exists but is only recomputed by an
/// explicit [`sort`](SignatureCollection::sort) call, never automatically,
/// so callers that care about precedence order must re-sort after mutating
/// the collection.
#[derive(Default)]
pub struct SignatureCollection {
    entries: Vec<Box<dyn InputSignature>>,
    index: HashMap<String, usize>,
    sorted: Vec<String>,
}

impl SignatureCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of registered signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the collection empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Is a signature with this id registered?
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registers a signature under its own id.
    ///
    /// Fails when the id is already taken. The collision check consults the
    /// lookup table and then scans the ordered list as well, so a stale
    /// index can never mask a duplicate.
    pub fn add(&mut self, signature: Box<dyn InputSignature>) -> Result<(), DuplicateSignatureId> {
        let id = signature.id();
        if self.index.contains_key(id) || self.entries.iter().any(|sig| sig.id() == id) {
            return Err(DuplicateSignatureId { id: id.to_owned() });
        }
        self.index.insert(id.to_owned(), self.entries.len());
        self.entries.push(signature);
        Ok(())
    }

    /// Removes the signature with this id, returning it.
    ///
    /// The lookup table and the ordered list are updated together; there is
    /// no state in which one knows the id and the other does not.
    pub fn remove(&mut self, id: &str) -> Option<Box<dyn InputSignature>> {
        let position = self.index.remove(id)?;
        let signature = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(signature)
    }

    /// The signature with this id, if registered.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn InputSignature> {
        let position = *self.index.get(id)?;
        Some(self.entries[position].as_ref())
    }

    /// A mutable reference to the signature with this id, if registered.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn InputSignature + 'static)> {
        let position = *self.index.get(id)?;
        Some(self.entries[position].as_mut())
    }

    /// Iterates signatures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn InputSignature> {
        self.entries.iter().map(|sig| sig.as_ref())
    }

    /// Recomputes the precedence-sorted view: descending precedence, ties
    /// broken by id so the order is deterministic.
    pub fn sort(&mut self) {
        self.sorted = self
            .entries
            .iter()
            .sorted_by(|a, b| {
                b.precedence()
                    .total_cmp(&a.precedence())
                    .then_with(|| a.id().cmp(b.id()))
            })
            .map(|sig| sig.id().to_owned())
            .collect();
    }

    /// Iterates signatures in the order computed by the last
    /// [`sort`](SignatureCollection::sort) call. Signatures registered since
    /// then do not appear until the next sort; removed ids are skipped.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &dyn InputSignature> {
        self.sorted.iter().filter_map(move |id| self.get(id))
    }

    /// Advances every signature's ordinary per-frame state, in insertion
    /// order. Precedence order is deliberately not consulted here: sorting
    /// per tick would tax every frame for a property most callers never read.
    pub fn update_all(&mut self, now: Instant) {
        for signature in &mut self.entries {
            signature.update(now);
        }
    }

    /// Advances every signature's fixed-rate state, in insertion order.
    pub fn fixed_update_all(&mut self, now: Instant) {
        for signature in &mut self.entries {
            signature.fixed_update(now);
        }
    }
}

impl fmt::Debug for SignatureCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureCollection")
            .field("ids", &self.entries.iter().map(|s| s.id()).collect::<Vec<_>>())
            .finish()
    }
}

/// A signature registry keyed by an arbitrary small key type (typically an
/// enum of logical inputs) instead of the signature's string id.
///
/// Shares the behavior of [`SignatureCollection`]: insertion-ordered, O(1)
/// lookup, explicit sorting only.
pub struct MappedSignatureCollection<K> {
    entries: Vec<(K, Box<dyn InputSignature>)>,
    index: HashMap<K, usize>,
    sorted: Vec<K>,
}

impl<K> Default for MappedSignatureCollection<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            sorted: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug> MappedSignatureCollection<K> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of registered signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the collection empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Is a signature registered under this key?
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    /// Registers a signature under the given key, failing on collision.
    pub fn add(
        &mut self,
        key: K,
        signature: Box<dyn InputSignature>,
    ) -> Result<(), DuplicateSignatureId> {
        if self.index.contains_key(&key) || self.entries.iter().any(|(k, _)| *k == key) {
            return Err(DuplicateSignatureId {
                id: format!("{key:?}"),
            });
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((key, signature));
        Ok(())
    }

    /// Removes the signature registered under this key, returning it.
    pub fn remove(&mut self, key: K) -> Option<Box<dyn InputSignature>> {
        let position = self.index.remove(&key)?;
        let (_, signature) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(signature)
    }

    /// The signature registered under this key, if any.
    #[must_use]
    pub fn get(&self, key: K) -> Option<&dyn InputSignature> {
        let position = *self.index.get(&key)?;
        Some(self.entries[position].1.as_ref())
    }

    /// A mutable reference to the signature registered under this key.
    pub fn get_mut(&mut self, key: K) -> Option<&mut (dyn InputSignature + 'static)> {
        let position = *self.index.get(&key)?;
        Some(self.entries[position].1.as_mut())
    }

    /// Iterates keys and signatures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &dyn InputSignature)> {
        self.entries.iter().map(|(key, sig)| (*key, sig.as_ref()))
    }

    /// Recomputes the precedence-sorted view.
    pub fn sort(&mut self) {
        self.sorted = self
            .entries
            .iter()
            .sorted_by(|(_, a), (_, b)| {
                b.precedence()
                    .total_cmp(&a.precedence())
                    .then_with(|| a.id().cmp(b.id()))
            })
            .map(|(key, _)| *key)
            .collect();
    }

    /// Iterates signatures in the order computed by the last sort.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &dyn InputSignature> {
        self.sorted.iter().filter_map(move |key| self.get(*key))
    }

    /// Advances every signature's ordinary per-frame state.
    pub fn update_all(&mut self, now: Instant) {
        for (_, signature) in &mut self.entries {
            signature.update(now);
        }
    }

    /// Advances every signature's fixed-rate state.
    pub fn fixed_update_all(&mut self, now: Instant) {
        for (_, signature) in &mut self.entries {
            signature.fixed_update(now);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for MappedSignatureCollection<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedSignatureCollection")
            .field(
                "keys",
                &self.entries.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::DelegatedButtonSignature;

    fn button(id: &str, precedence: f32) -> Box<dyn InputSignature> {
        Box::new(DelegatedButtonSignature::new(id, None).with_precedence(precedence))
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut collection = SignatureCollection::new();
        collection.add(button("Jump", 0.0)).unwrap();

        let err = collection.add(button("Jump", 1.0)).unwrap_err();
        assert_eq!(err.id, "Jump");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn remove_updates_both_views_atomically() {
        let mut collection = SignatureCollection::new();
        collection.add(button("Jump", 0.0)).unwrap();
        collection.add(button("Fire", 0.0)).unwrap();
        collection.add(button("Crouch", 0.0)).unwrap();

        assert!(collection.remove("Fire").is_some());
        assert!(!collection.contains("Fire"));
        assert_eq!(collection.get("Crouch").unwrap().id(), "Crouch");
        assert_eq!(
            collection.iter().map(|s| s.id()).collect::<Vec<_>>(),
            ["Jump", "Crouch"]
        );

        // A removed id can be registered again.
        collection.add(button("Fire", 0.0)).unwrap();
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn sorting_is_explicit_and_deterministic() {
        let mut collection = SignatureCollection::new();
        collection.add(button("Low", 1.0)).unwrap();
        collection.add(button("High", 10.0)).unwrap();
        collection.add(button("AlsoHigh", 10.0)).unwrap();

        // Never sorted implicitly: the view is empty until sort() runs.
        assert_eq!(collection.iter_sorted().count(), 0);

        collection.sort();
        assert_eq!(
            collection.iter_sorted().map(|s| s.id()).collect::<Vec<_>>(),
            ["AlsoHigh", "High", "Low"]
        );

        // New registrations do not appear until the next sort.
        collection.add(button("Highest", 99.0)).unwrap();
        assert_eq!(collection.iter_sorted().count(), 3);
        collection.sort();
        assert_eq!(collection.iter_sorted().next().unwrap().id(), "Highest");
    }

    #[test]
    fn mapped_collection_rejects_duplicate_keys() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        enum Action {
            Jump,
        }

        let mut collection = MappedSignatureCollection::new();
        collection.add(Action::Jump, button("JumpPad", 0.0)).unwrap();
        let err = collection
            .add(Action::Jump, button("JumpKey", 0.0))
            .unwrap_err();
        assert_eq!(err.id, "Jump");
    }
}
