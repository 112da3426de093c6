use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::errors::ServiceError;

/// A record type that can live in a [`MemoryStore`].
///
/// The store assigns ids; a resource only describes how to validate a create
/// payload (`Draft`), build itself from it and apply a partial update (`Patch`).
pub trait Resource: Clone + Send + 'static {
    type Draft;
    type Patch;

    /// Display name used in `NotFound` errors, e.g. `"Book"`.
    const NAME: &'static str;

    fn id(&self) -> u64;

    /// Reject a create payload before any id is allocated.
    fn validate(draft: &Self::Draft) -> Result<(), ServiceError>;

    fn from_draft(id: u64, draft: Self::Draft) -> Self;

    /// Overwrite the fields present in `patch`; no validation happens here.
    fn apply(&mut self, patch: Self::Patch);
}

struct State<R> {
    items: Vec<R>,
    next_id: u64,
}

/// Generic in-memory, insertion-ordered store with auto-incrementing ids.
///
/// Ids start at 1, are handed out once per successful create and are never
/// reused, even after a delete. A single mutex guards both the records and the
/// id counter so allocation + append and search + remove are indivisible.
/// Cloning is cheap and every clone shares the same state.
pub struct MemoryStore<R> {
    inner: Arc<Mutex<State<R>>>,
}

impl<R> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(State { items: Vec::new(), next_id: 1 })),
        }
    }

    // No operation panics between mutating steps, so a poisoned lock still
    // guards consistent state.
    fn lock(&self) -> MutexGuard<'_, State<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every record in insertion order.
    pub fn list(&self) -> Vec<R> {
        self.lock().items.clone()
    }

    pub fn get(&self, id: u64) -> Result<R, ServiceError> {
        self.lock()
            .items
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(R::NAME))
    }

    pub fn create(&self, draft: R::Draft) -> Result<R, ServiceError> {
        R::validate(&draft)?;
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let record = R::from_draft(id, draft);
        state.items.push(record.clone());
        debug!(resource = R::NAME, id, "record created");
        Ok(record)
    }

    pub fn update(&self, id: u64, patch: R::Patch) -> Result<R, ServiceError> {
        let mut state = self.lock();
        let existed = state
            .items
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| ServiceError::not_found(R::NAME))?;
        existed.apply(patch);
        debug!(resource = R::NAME, id, "record updated");
        Ok(existed.clone())
    }

    pub fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let mut state = self.lock();
        let index = state
            .items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| ServiceError::not_found(R::NAME))?;
        // Vec::remove shifts the tail, keeping relative order.
        state.items.remove(index);
        debug!(resource = R::NAME, id, "record deleted");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tag {
        id: u64,
        label: String,
    }

    impl Resource for Tag {
        type Draft = String;
        type Patch = Option<String>;
        const NAME: &'static str = "Tag";

        fn id(&self) -> u64 { self.id }

        fn validate(draft: &String) -> Result<(), ServiceError> {
            if draft.is_empty() { Err(ServiceError::required("Label")) } else { Ok(()) }
        }

        fn from_draft(id: u64, label: String) -> Self { Tag { id, label } }

        fn apply(&mut self, patch: Option<String>) {
            if let Some(label) = patch { self.label = label; }
        }
    }

    #[test]
    fn works_for_any_resource() {
        let store = MemoryStore::<Tag>::new();
        assert!(store.is_empty());
        let a = store.create("rust".into()).expect("create");
        let b = store.create("web".into()).expect("create");
        assert_eq!((a.id, b.id), (1, 2));

        store.update(a.id, Some("systems".into())).expect("update");
        store.delete(b.id).expect("delete");
        assert_eq!(store.list(), vec![Tag { id: 1, label: "systems".into() }]);

        assert_eq!(store.get(b.id), Err(ServiceError::NotFound("Tag not found".into())));
        assert_eq!(store.create(String::new()), Err(ServiceError::Validation("Label is required".into())));
        assert_eq!(store.create("next".into()).expect("create").id, 3);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::<Tag>::new();
        let other = store.clone();
        store.create("shared".into()).expect("create");
        assert_eq!(other.len(), 1);
    }
}
