use super::*;
use async_trait::async_trait;
use shared::{
    domain::Gender,
    error::{StorageErrorKind, ValidationError},
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct RecordingStore {
    added: Arc<Mutex<Vec<(String, Gender, String)>>>,
    deleted: Arc<Mutex<Vec<ComplaintId>>>,
    searches: Arc<Mutex<Vec<Option<String>>>>,
    fail_with: Option<StorageErrorKind>,
}

impl RecordingStore {
    fn failing(kind: StorageErrorKind) -> Self {
        Self {
            fail_with: Some(kind),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        match self.fail_with {
            Some(kind) => Err(StorageError::new(kind, "simulated failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ComplaintStore for RecordingStore {
    async fn add(
        &self,
        name: &str,
        gender: Gender,
        comment: &str,
    ) -> Result<ComplaintId, StorageError> {
        self.check()?;
        let mut added = self.added.lock().await;
        added.push((name.to_string(), gender, comment.to_string()));
        Ok(ComplaintId(added.len() as i64))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Complaint>, StorageError> {
        self.check()?;
        self.searches.lock().await.push(search.map(str::to_string));
        Ok(Vec::new())
    }

    async fn delete(&self, id: ComplaintId) -> Result<(), StorageError> {
        self.check()?;
        self.deleted.lock().await.push(id);
        Ok(())
    }
}

#[tokio::test]
async fn save_trims_comment_and_keeps_name() {
    let store = RecordingStore::default();
    let controller = ComplaintController::new(store.clone());

    let id = controller
        .save(" Jane Doe", "Female", "   The stairwell light is out   ")
        .await
        .expect("save");
    assert_eq!(id, ComplaintId(1));

    let added = store.added.lock().await;
    assert_eq!(
        added.as_slice(),
        &[(
            " Jane Doe".to_string(),
            Gender::Female,
            "The stairwell light is out".to_string()
        )]
    );
}

#[tokio::test]
async fn rejected_input_never_reaches_the_store() {
    let store = RecordingStore::default();
    let controller = ComplaintController::new(store.clone());

    let cases = [
        ("   ", "Male", "Long enough comment", ValidationError::EmptyName),
        ("Jane 2", "Male", "Long enough comment", ValidationError::InvalidNameChars),
        ("Jane", "Robot", "Long enough comment", ValidationError::InvalidGender),
        ("Jane", "Other", "  short  ", ValidationError::CommentTooShort),
    ];
    for (name, gender, comment, expected) in cases {
        let err = controller
            .save(name, gender, comment)
            .await
            .expect_err("should be rejected");
        assert_eq!(err.as_validation(), Some(expected));
    }

    assert!(store.added.lock().await.is_empty());
}

#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
    let controller = ComplaintController::new(RecordingStore::failing(
        StorageErrorKind::Unavailable,
    ));

    let err = controller
        .save("Jane", "Male", "The boiler is making noise")
        .await
        .expect_err("store is down");
    assert!(matches!(
        err,
        ComplaintError::Storage(StorageError {
            kind: StorageErrorKind::Unavailable,
            ..
        })
    ));

    let err = controller.get(None).await.expect_err("store is down");
    assert_eq!(err.kind, StorageErrorKind::Unavailable);
}

#[tokio::test]
async fn get_and_delete_delegate_to_the_store() {
    let store = RecordingStore::default();
    let controller = ComplaintController::new(store.clone());

    controller.get(None).await.expect("get all");
    controller.get(Some("Ali")).await.expect("search");
    controller.delete(ComplaintId(3)).await.expect("delete");

    assert_eq!(
        store.searches.lock().await.as_slice(),
        &[None, Some("Ali".to_string())]
    );
    assert_eq!(store.deleted.lock().await.as_slice(), &[ComplaintId(3)]);
}
