use async_trait::async_trait;

use crate::{
    domain::{Complaint, ComplaintId, Gender},
    error::StorageError,
};

/// Persistence seam the controller is written against.
///
/// Implementations do no validation of their own; callers are expected to
/// hand over input that has already passed the controller's checks.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn add(
        &self,
        name: &str,
        gender: Gender,
        comment: &str,
    ) -> Result<ComplaintId, StorageError>;

    /// Rows in ascending id order, optionally narrowed to those whose name or
    /// comment contains `search` (case-insensitive).
    async fn list(&self, search: Option<&str>) -> Result<Vec<Complaint>, StorageError>;

    /// Removing an id that does not exist is not an error.
    async fn delete(&self, id: ComplaintId) -> Result<(), StorageError>;
}
