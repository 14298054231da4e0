//! In-memory student store.
//!
//! The map and the id counter sit behind one mutex so that allocating an id and inserting the
//! record happen as a single step. Ids start at 1 and are never reused, even after deletion.

use super::types::{Student, StudentId, StudentInput};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors returned by store lookups and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record exists with the requested identifier.
    #[error("student {0} not found")]
    NotFound(StudentId),
}

struct Inner {
    students: HashMap<StudentId, Student>,
    next_id: StudentId,
}

/// Process-wide collection of student records, shared across handlers through an `Arc`.
pub struct StudentStore {
    inner: Mutex<Inner>,
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentStore {
    /// Create an empty store whose first assigned id is 1.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                students: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    // Every mutation completes before the guard drops, so a poisoned lock still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Assign the next id to `candidate`, store it, and return the stored record.
    pub fn create(&self, candidate: StudentInput) -> Student {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let student = candidate.with_id(id);
        inner.students.insert(id, student.clone());
        student
    }

    /// Return every stored record. Order is unspecified.
    pub fn get_all(&self) -> Vec<Student> {
        self.lock().students.values().cloned().collect()
    }

    /// Look up a single record.
    pub fn get_by_id(&self, id: StudentId) -> Result<Student, StoreError> {
        self.lock()
            .students
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Overwrite the mutable fields of an existing record, keeping its id.
    pub fn update(&self, id: StudentId, fields: StudentInput) -> Result<Student, StoreError> {
        let mut inner = self.lock();
        let existing = inner
            .students
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        existing.name = fields.name;
        existing.age = fields.age;
        existing.email = fields.email;
        Ok(existing.clone())
    }

    /// Remove a record.
    pub fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        self.lock()
            .students
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.lock().students.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn input(name: &str) -> StudentInput {
        StudentInput {
            name: name.into(),
            age: 20,
            email: format!("{}@x.com", name.to_lowercase()),
        }
    }

    #[test]
    fn ids_increase_and_are_not_reused_after_delete() {
        let store = StudentStore::new();
        let first = store.create(input("Ana"));
        let second = store.create(input("Ben"));
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        store.delete(second.id).expect("delete");
        let third = store.create(input("Cy"));
        assert_eq!(third.id, 3);
    }

    #[test]
    fn get_by_id_returns_created_record() {
        let store = StudentStore::new();
        let created = store.create(input("Ana"));
        assert_eq!(store.get_by_id(created.id), Ok(created));
    }

    #[test]
    fn get_all_contains_every_record() {
        let store = StudentStore::new();
        assert!(store.get_all().is_empty());
        store.create(input("Ana"));
        store.create(input("Ben"));

        let names: HashSet<String> = store.get_all().into_iter().map(|s| s.name).collect();
        assert_eq!(names, HashSet::from(["Ana".to_string(), "Ben".to_string()]));
    }

    #[test]
    fn update_preserves_id_and_overwrites_fields() {
        let store = StudentStore::new();
        let created = store.create(input("Ana"));
        let fields = StudentInput {
            name: "Ana Maria".into(),
            age: 30,
            email: "anamaria@x.com".into(),
        };

        let updated = store.update(created.id, fields.clone()).expect("update");
        assert_eq!(updated, fields.with_id(created.id));
        assert_eq!(store.get_by_id(created.id), Ok(updated));
    }

    #[test]
    fn update_missing_id_leaves_store_unchanged() {
        let store = StudentStore::new();
        let created = store.create(input("Ana"));

        assert_eq!(
            store.update(42, input("Ben")),
            Err(StoreError::NotFound(42))
        );
        assert_eq!(store.get_all(), vec![created]);
    }

    #[test]
    fn delete_removes_record_and_missing_delete_is_noop() {
        let store = StudentStore::new();
        let created = store.create(input("Ana"));
        store.create(input("Ben"));

        store.delete(created.id).expect("delete");
        assert_eq!(
            store.get_by_id(created.id),
            Err(StoreError::NotFound(created.id))
        );
        assert_eq!(
            store.delete(created.id),
            Err(StoreError::NotFound(created.id))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_creates_assign_unique_ids() {
        let store = Arc::new(StudentStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| store.create(input("Ana")).id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread") {
                assert!(ids.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(ids.len(), 400);
        assert_eq!(ids.iter().max(), Some(&400));
    }
}
