// Identity-Keyed Store
//
// One generic in-memory store per entity kind, keyed by the identity each
// entity derives from its own fields. Backing storage is an insertion-ordered
// Vec behind a RwLock: reads run concurrently, mutations are mutually
// exclusive, and the uniqueness check plus insert happen under one write
// lock so `add` is linearizable.

use std::sync::RwLock;

/// Identity extraction for store entries.
///
/// The returned key is what `find_by_identity` and `remove_by_identity`
/// match against, and what `add` checks for collisions.
pub trait Identified {
    fn identity(&self) -> String;
}

/// Outcome of an atomic replace-if-present (see [`Store::replace`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome<T> {
    /// The entity was replaced; carries the new value.
    Replaced(T),
    /// No entity with the given identity exists.
    NotFound,
    /// The replacement's identity collides with a *different* existing entity.
    Conflict,
}

/// Insertion-ordered, identity-unique collection for one entity kind.
///
/// Stores for different entity kinds are fully independent; no operation
/// here ever takes more than this store's own lock.
pub struct Store<T> {
    entries: RwLock<Vec<T>>,
}

impl<T> Store<T>
where
    T: Identified + Clone + PartialEq,
{
    pub fn new() -> Self {
        Store {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// All entities in insertion order, as a defensive copy.
    pub fn get_all(&self) -> Vec<T> {
        let entries = self.entries.read().unwrap();
        entries.clone()
    }

    pub fn find_by_identity(&self, id: &str) -> Option<T> {
        let entries = self.entries.read().unwrap();
        entries.iter().find(|e| e.identity() == id).cloned()
    }

    /// Inserts iff no existing entity shares `entity`'s identity.
    ///
    /// Returns false on collision and leaves the store unchanged; a
    /// collision is a normal outcome (the caller maps it to a conflict),
    /// not an error. Check and insert run under one write lock, so two
    /// concurrent adds with the same identity cannot both succeed.
    pub fn add(&self, entity: T) -> bool {
        let mut entries = self.entries.write().unwrap();
        let id = entity.identity();
        if entries.iter().any(|e| e.identity() == id) {
            return false;
        }
        entries.push(entity);
        true
    }

    /// Removes the entity equal to the given value, if present.
    pub fn remove(&self, entity: &T) -> bool {
        let mut entries = self.entries.write().unwrap();
        match entries.iter().position(|e| e == entity) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_by_identity(&self, id: &str) -> bool {
        let mut entries = self.entries.write().unwrap();
        match entries.iter().position(|e| e.identity() == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Atomic replace-if-present: builds the replacement from the current
    /// value and swaps it in place under one write lock, so no concurrent
    /// reader ever observes the entity as absent mid-update.
    ///
    /// The replacement may carry a new identity; if that identity already
    /// belongs to a different entity the store is left unchanged and
    /// `Conflict` is returned.
    pub fn replace<F>(&self, id: &str, build: F) -> ReplaceOutcome<T>
    where
        F: FnOnce(&T) -> T,
    {
        let mut entries = self.entries.write().unwrap();
        let index = match entries.iter().position(|e| e.identity() == id) {
            Some(index) => index,
            None => return ReplaceOutcome::NotFound,
        };

        let updated = build(&entries[index]);
        let new_id = updated.identity();
        if new_id != id && entries.iter().any(|e| e.identity() == new_id) {
            return ReplaceOutcome::Conflict;
        }

        entries[index] = updated.clone();
        ReplaceOutcome::Replaced(updated)
    }

    pub fn size(&self) -> usize {
        let entries = self.entries.read().unwrap();
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<T> Default for Store<T>
where
    T: Identified + Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}
