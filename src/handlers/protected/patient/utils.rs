use std::collections::{HashMap, HashSet};

use bson::oid::ObjectId;

use crate::database::models::{parse_object_id, Patient, Veterinarian};
use crate::database::Store;
use crate::error::ApiError;

pub fn patient_not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Lo sentimos, no existe el paciente {}", id))
}

/// Malformed ids are answered as not found, before any store lookup.
pub fn parse_patient_id(id: &str) -> Result<ObjectId, ApiError> {
    parse_object_id(id).ok_or_else(|| patient_not_found(id))
}

/// Fetches the distinct veterinarians referenced by `patients`.
/// Veterinarians that no longer exist are simply absent from the map.
pub async fn load_owners(
    store: &dyn Store,
    patients: &[Patient],
) -> Result<HashMap<ObjectId, Veterinarian>, ApiError> {
    let mut owners = HashMap::new();
    let mut seen = HashSet::new();
    for patient in patients {
        if !seen.insert(patient.veterinario) {
            continue;
        }
        if let Some(vet) = store.find_veterinarian(&patient.veterinario).await? {
            owners.insert(vet.id, vet);
        }
    }
    Ok(owners)
}
