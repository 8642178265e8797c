use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::models::{Patient, PatientFilter, PatientUpdate, Veterinarian};
use super::store::{PatientStore, Store, StoreError, VeterinarianStore};

/// In-process store for tests and database-less local runs.
///
/// Documents keep insertion order, which stands in for the natural order of
/// a real collection. Every trait call is counted so callers can assert that
/// a request never reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: RwLock<Vec<Patient>>,
    veterinarians: RwLock<Vec<Veterinarian>>,
    operations: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served so far
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    pub async fn patient_count(&self) -> usize {
        self.patients.read().await.len()
    }

    /// Removes a veterinarian without touching its patients.
    pub async fn remove_veterinarian(&self, id: &ObjectId) -> bool {
        let mut vets = self.veterinarians.write().await;
        let before = vets.len();
        vets.retain(|v| v.id != *id);
        vets.len() != before
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn find_patients(&self, filter: &PatientFilter) -> Result<Vec<Patient>, StoreError> {
        self.record();
        let patients = self.patients.read().await;
        Ok(patients.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn find_patient(&self, id: &ObjectId) -> Result<Option<Patient>, StoreError> {
        self.record();
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| p.id == *id).cloned())
    }

    async fn insert_patient(&self, patient: Patient) -> Result<ObjectId, StoreError> {
        self.record();
        let mut patients = self.patients.write().await;
        if patients.iter().any(|p| p.id == patient.id) {
            return Err(StoreError::Duplicate(patient.id.to_hex()));
        }
        let id = patient.id;
        patients.push(patient);
        Ok(id)
    }

    async fn update_patient(&self, id: &ObjectId, update: &PatientUpdate) -> Result<bool, StoreError> {
        self.record();
        let mut patients = self.patients.write().await;
        match patients.iter_mut().find(|p| p.id == *id) {
            Some(patient) => {
                update.apply(patient, bson::DateTime::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_patient(&self, id: &ObjectId) -> Result<bool, StoreError> {
        self.record();
        let mut patients = self.patients.write().await;
        let before = patients.len();
        patients.retain(|p| p.id != *id);
        Ok(patients.len() != before)
    }
}

#[async_trait]
impl VeterinarianStore for MemoryStore {
    async fn find_veterinarian(&self, id: &ObjectId) -> Result<Option<Veterinarian>, StoreError> {
        self.record();
        let vets = self.veterinarians.read().await;
        Ok(vets.iter().find(|v| v.id == *id).cloned())
    }

    async fn find_veterinarian_by_email(&self, email: &str) -> Result<Option<Veterinarian>, StoreError> {
        self.record();
        let vets = self.veterinarians.read().await;
        Ok(vets.iter().find(|v| v.email == email).cloned())
    }

    async fn insert_veterinarian(&self, veterinarian: Veterinarian) -> Result<ObjectId, StoreError> {
        self.record();
        let mut vets = self.veterinarians.write().await;
        if vets.iter().any(|v| v.email == veterinarian.email) {
            return Err(StoreError::Duplicate(veterinarian.email));
        }
        let id = veterinarian.id;
        vets.push(veterinarian);
        Ok(id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
