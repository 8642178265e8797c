use async_trait::async_trait;
use bson::oid::ObjectId;
use thiserror::Error;

use super::models::{Patient, PatientFilter, PatientUpdate, Veterinarian};

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Patient persistence: find-by-filter, find-by-id, insert, partial update, delete.
#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn find_patients(&self, filter: &PatientFilter) -> Result<Vec<Patient>, StoreError>;

    async fn find_patient(&self, id: &ObjectId) -> Result<Option<Patient>, StoreError>;

    async fn insert_patient(&self, patient: Patient) -> Result<ObjectId, StoreError>;

    /// Returns `false` when no document has the id.
    async fn update_patient(&self, id: &ObjectId, update: &PatientUpdate) -> Result<bool, StoreError>;

    /// Hard delete. Returns `false` when nothing was removed.
    async fn delete_patient(&self, id: &ObjectId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait VeterinarianStore: Send + Sync {
    async fn find_veterinarian(&self, id: &ObjectId) -> Result<Option<Veterinarian>, StoreError>;

    async fn find_veterinarian_by_email(&self, email: &str) -> Result<Option<Veterinarian>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert_veterinarian(&self, veterinarian: Veterinarian) -> Result<ObjectId, StoreError>;
}

/// Everything the HTTP layer needs from a backend
#[async_trait]
pub trait Store: PatientStore + VeterinarianStore {
    async fn ping(&self) -> Result<(), StoreError>;
}
