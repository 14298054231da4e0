//! Student records: the wire/domain type, field validation, and the in-memory store.

pub mod store;
pub mod types;
pub mod validate;

pub use store::{StoreError, StudentStore};
pub use types::{Student, StudentInput};
pub use validate::{ValidationError, validate};
