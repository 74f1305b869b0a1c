pub mod domain;
pub mod error;
pub mod store;

pub use domain::{Complaint, ComplaintId, Gender};
pub use error::{ComplaintError, StorageError, StorageErrorKind, ValidationError};
pub use store::ComplaintStore;
