use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use tracing::info;

use super::models::{Patient, PatientFilter, PatientUpdate, Veterinarian};
use super::store::{PatientStore, Store, StoreError, VeterinarianStore};
use crate::config::DatabaseConfig;

const PATIENTS: &str = "pacientes";
const VETERINARIANS: &str = "veterinarios";
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed store
#[derive(Clone, Debug)]
pub struct MongoStore {
    db: Database,
    patients: Collection<Patient>,
    veterinarians: Collection<Veterinarian>,
}

impl MongoStore {
    /// Connects, verifies the server answers a ping and ensures indexes.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Self::validate_mongo_uri(&config.uri)?;

        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.connect_timeout = Some(Duration::from_secs(config.connection_timeout));
        client_options.server_selection_timeout = Some(Duration::from_secs(config.connection_timeout));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.name);

        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        let store = Self {
            patients: db.collection(PATIENTS),
            veterinarians: db.collection(VETERINARIANS),
            db,
        };
        store.ensure_indexes().await?;

        info!("Connected to MongoDB database: {}", config.name);
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.veterinarians.create_index(unique_email).await?;

        let owner_status = IndexModel::builder()
            .keys(doc! { "veterinario": 1, "estado": 1 })
            .build();
        self.patients.create_index(owner_status).await?;
        Ok(())
    }

    fn validate_mongo_uri(uri: &str) -> Result<(), StoreError> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidConfig(
                "MongoDB URI cannot be empty or whitespace".to_string(),
            ));
        }

        let host_part = trimmed
            .strip_prefix("mongodb://")
            .or_else(|| trimmed.strip_prefix("mongodb+srv://"))
            .ok_or_else(|| {
                StoreError::InvalidConfig(
                    "MongoDB URI must start with 'mongodb://' or 'mongodb+srv://'".to_string(),
                )
            })?;

        if host_part.trim().is_empty() || host_part.starts_with('/') {
            return Err(StoreError::InvalidConfig(
                "MongoDB URI is missing a host after the scheme".to_string(),
            ));
        }
        Ok(())
    }

    fn is_duplicate_key(err: &MongoError) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
        )
    }
}

#[async_trait]
impl PatientStore for MongoStore {
    async fn find_patients(&self, filter: &PatientFilter) -> Result<Vec<Patient>, StoreError> {
        let cursor = self.patients.find(filter.to_document()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_patient(&self, id: &ObjectId) -> Result<Option<Patient>, StoreError> {
        Ok(self.patients.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert_patient(&self, patient: Patient) -> Result<ObjectId, StoreError> {
        self.patients.insert_one(&patient).await?;
        Ok(patient.id)
    }

    async fn update_patient(&self, id: &ObjectId, update: &PatientUpdate) -> Result<bool, StoreError> {
        let set = update.to_set_document(bson::DateTime::now());
        let result = self
            .patients
            .update_one(doc! { "_id": *id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_patient(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.patients.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl VeterinarianStore for MongoStore {
    async fn find_veterinarian(&self, id: &ObjectId) -> Result<Option<Veterinarian>, StoreError> {
        Ok(self.veterinarians.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_veterinarian_by_email(&self, email: &str) -> Result<Option<Veterinarian>, StoreError> {
        Ok(self.veterinarians.find_one(doc! { "email": email }).await?)
    }

    async fn insert_veterinarian(&self, veterinarian: Veterinarian) -> Result<ObjectId, StoreError> {
        match self.veterinarians.insert_one(&veterinarian).await {
            Ok(_) => Ok(veterinarian.id),
            Err(e) if Self::is_duplicate_key(&e) => Err(StoreError::Duplicate(veterinarian.email)),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Ok(())
    }
}
