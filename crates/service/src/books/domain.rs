use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::storage::Resource;

/// A book record.
/// - `author` is optional; an absent author is omitted from JSON and is not
///   the same as an empty string.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Create payload. `title` is optional at the type level so a missing title
/// surfaces as a validation error rather than a deserialization failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), author: None }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Partial update: only supplied fields are written, including empty strings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Resource for Book {
    type Draft = BookDraft;
    type Patch = BookPatch;
    const NAME: &'static str = "Book";

    fn id(&self) -> u64 {
        self.id
    }

    fn validate(draft: &BookDraft) -> Result<(), ServiceError> {
        match draft.title.as_deref() {
            Some(title) if !title.is_empty() => Ok(()),
            _ => Err(ServiceError::required("Title")),
        }
    }

    fn from_draft(id: u64, draft: BookDraft) -> Self {
        Book {
            id,
            title: draft.title.unwrap_or_default(),
            author: draft.author,
        }
    }

    // Unlike create, update lets the title become empty.
    fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = Some(author);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::BookStore;

    fn patch(title: Option<&str>, author: Option<&str>) -> BookPatch {
        BookPatch {
            title: title.map(str::to_string),
            author: author.map(str::to_string),
        }
    }

    #[test]
    fn catalog_lifecycle_scenario() {
        let store = BookStore::new();

        let created = store
            .create(BookDraft::new("Book1").with_author("Author1"))
            .expect("create ok");
        assert_eq!(
            created,
            Book { id: 1, title: "Book1".into(), author: Some("Author1".into()) }
        );

        assert_eq!(store.list(), vec![created.clone()]);
        assert_eq!(store.get(1).expect("found"), created);

        let updated = store
            .update(1, patch(Some("Updated"), Some("Author2")))
            .expect("update ok");
        assert_eq!(
            updated,
            Book { id: 1, title: "Updated".into(), author: Some("Author2".into()) }
        );

        store.delete(1).expect("delete ok");
        assert!(matches!(store.get(1), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn ids_increase_by_one_regardless_of_deletes_and_updates() {
        let store = BookStore::new();
        let mut ids = Vec::new();
        for i in 0..6 {
            let book = store.create(BookDraft::new(format!("t{i}"))).expect("create");
            ids.push(book.id);
            if i % 2 == 0 {
                store.delete(book.id).expect("delete");
            } else {
                store.update(book.id, patch(Some("renamed"), None)).expect("update");
            }
        }
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn ids_are_never_reused_after_deleting_the_newest() {
        let store = BookStore::new();
        let a = store.create(BookDraft::new("a")).expect("create");
        store.delete(a.id).expect("delete");
        let b = store.create(BookDraft::new("b")).expect("create");
        assert_eq!(b.id, 2);
    }

    #[test]
    fn list_returns_creation_order() {
        let store = BookStore::new();
        let titles = ["one", "two", "three", "four"];
        for t in titles {
            store.create(BookDraft::new(t)).expect("create");
        }
        let listed: Vec<_> = store.list().into_iter().map(|b| b.title).collect();
        assert_eq!(listed, titles);
    }

    #[test]
    fn list_is_a_snapshot() {
        let store = BookStore::new();
        store.create(BookDraft::new("first")).expect("create");
        let snapshot = store.list();

        store.create(BookDraft::new("second")).expect("create");
        store.update(1, patch(Some("changed"), None)).expect("update");
        store.delete(2).expect("delete");

        assert_eq!(snapshot, vec![Book { id: 1, title: "first".into(), author: None }]);
    }

    #[test]
    fn returned_records_do_not_alias_the_store() {
        let store = BookStore::new();
        let mut created = store.create(BookDraft::new("kept")).expect("create");
        created.title = "mutated by caller".into();
        assert_eq!(store.get(1).expect("found").title, "kept");
    }

    #[test]
    fn title_only_update_keeps_author() {
        let store = BookStore::new();
        store.create(BookDraft::new("T").with_author("A")).expect("create");
        let updated = store.update(1, patch(Some("X"), None)).expect("update");
        assert_eq!(updated.title, "X");
        assert_eq!(updated.author.as_deref(), Some("A"));
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let store = BookStore::new();
        let created = store.create(BookDraft::new("T").with_author("A")).expect("create");
        let updated = store.update(1, BookPatch::default()).expect("update");
        assert_eq!(updated, created);
        assert_eq!(store.list(), vec![created]);
    }

    #[test]
    fn update_accepts_explicit_empty_strings() {
        let store = BookStore::new();
        store.create(BookDraft::new("T").with_author("A")).expect("create");
        let updated = store.update(1, patch(Some(""), Some(""))).expect("update");
        assert_eq!(updated.title, "");
        assert_eq!(updated.author.as_deref(), Some(""));
    }

    #[test]
    fn update_and_delete_unknown_ids_are_not_found() {
        let store = BookStore::new();
        store.create(BookDraft::new("T")).expect("create");
        assert_eq!(
            store.update(42, patch(Some("X"), None)),
            Err(ServiceError::NotFound("Book not found".into()))
        );
        assert_eq!(store.delete(42), Err(ServiceError::NotFound("Book not found".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let store = BookStore::new();
        for t in ["a", "b", "c", "d"] {
            store.create(BookDraft::new(t)).expect("create");
        }
        store.delete(2).expect("delete");
        let ids: Vec<_> = store.list().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(matches!(store.get(2), Err(ServiceError::NotFound(_))));
        assert!(matches!(store.delete(2), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn create_without_title_leaves_state_untouched() {
        let store = BookStore::new();
        store.create(BookDraft::new("existing")).expect("create");

        assert_eq!(
            store.create(BookDraft::default()),
            Err(ServiceError::Validation("Title is required".into()))
        );
        let empty = BookDraft { title: Some(String::new()), author: Some("A".into()) };
        assert!(matches!(store.create(empty), Err(ServiceError::Validation(_))));

        assert_eq!(store.len(), 1);
        // next id was not consumed by the failed calls
        assert_eq!(store.create(BookDraft::new("next")).expect("create").id, 2);
    }

    #[test]
    fn create_without_author_keeps_it_absent() {
        let store = BookStore::new();
        let book = store.create(BookDraft::new("Solo")).expect("create");
        assert_eq!(book.author, None);

        let json = serde_json::to_value(&book).expect("serialize");
        assert_eq!(json, serde_json::json!({"id": 1, "title": "Solo"}));
    }

    #[test]
    fn drafts_deserialize_from_partial_json() {
        let draft: BookDraft = serde_json::from_str(r#"{"author":"A"}"#).expect("parse");
        assert_eq!(draft.title, None);
        let patch: BookPatch = serde_json::from_str("{}").expect("parse");
        assert_eq!(patch, BookPatch::default());
    }

    #[test]
    fn concurrent_creates_get_distinct_contiguous_ids() {
        let store = BookStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(BookDraft::new(format!("{t}-{i}"))).expect("create").id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread"))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=400).collect::<Vec<_>>());
        assert_eq!(store.len(), 400);
    }
}
