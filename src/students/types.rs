//! Core data types for student records.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a student by the store.
pub type StudentId = i64;

/// A stored student record as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier, immutable after creation.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Age in whole years.
    pub age: i64,
    /// Contact email address.
    pub email: String,
}

/// Mutable fields accepted on create and update.
///
/// Missing fields decode to their zero value so validation, not decoding, rejects them. Any
/// `id` in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentInput {
    /// Display name; must be non-empty.
    pub name: String,
    /// Age in whole years; must fall within `18..=100`.
    pub age: i64,
    /// Contact email address; must be syntactically valid.
    pub email: String,
}

impl StudentInput {
    /// Attach an identifier, producing the stored form of this record.
    pub fn with_id(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
        }
    }
}
