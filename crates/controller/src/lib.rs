//! Gatekeeper between a presentation layer and the complaint store.
//!
//! Every write is validated first; reads and deletes pass straight through.

use shared::{
    domain::{Complaint, ComplaintId},
    error::{ComplaintError, StorageError},
    store::ComplaintStore,
};
use tracing::{debug, info};

pub mod validation;

pub use validation::{validate, Submission, MIN_COMMENT_CHARS};

pub struct ComplaintController<S: ComplaintStore> {
    store: S,
}

impl<S: ComplaintStore> ComplaintController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the form fields and, when they pass, stores the complaint
    /// with its comment trimmed.
    pub async fn save(
        &self,
        name: &str,
        gender: &str,
        comment: &str,
    ) -> Result<ComplaintId, ComplaintError> {
        let submission = validate(name, gender, comment).map_err(|error| {
            debug!(code = error.code(), "complaint rejected by validation");
            error
        })?;
        let id = self
            .store
            .add(submission.name, submission.gender, submission.comment)
            .await?;
        info!(complaint_id = id.0, "complaint saved");
        Ok(id)
    }

    pub async fn get(&self, search: Option<&str>) -> Result<Vec<Complaint>, StorageError> {
        self.store.list(search).await
    }

    pub async fn delete(&self, id: ComplaintId) -> Result<(), StorageError> {
        self.store.delete(id).await?;
        info!(complaint_id = id.0, "complaint deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
