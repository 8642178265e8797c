use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::models::{Patient, Veterinarian};

/// Veterinarian reference as expanded inside patient responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VeterinarianSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub apellido: String,
}

impl From<&Veterinarian> for VeterinarianSummary {
    fn from(vet: &Veterinarian) -> Self {
        Self {
            id: vet.id.to_hex(),
            nombre: vet.nombre.clone(),
            apellido: vet.apellido.clone(),
        }
    }
}

/// List projection: no `salida`, no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub propietario: String,
    pub email: String,
    pub celular: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convencional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especie: Option<String>,
    pub sintomas: String,
    pub ingreso: DateTime<Utc>,
    pub estado: bool,
    /// `null` when the owning veterinarian no longer exists
    pub veterinario: Option<VeterinarianSummary>,
}

/// Detail projection: the summary plus `salida`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub propietario: String,
    pub email: String,
    pub celular: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convencional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especie: Option<String>,
    pub sintomas: String,
    pub ingreso: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salida: Option<DateTime<Utc>>,
    pub estado: bool,
    pub veterinario: Option<VeterinarianSummary>,
}

/// Veterinarian without credential material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VeterinarianProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub email: String,
    pub status: bool,
}

impl From<&Veterinarian> for VeterinarianProfile {
    fn from(vet: &Veterinarian) -> Self {
        Self {
            id: vet.id.to_hex(),
            nombre: vet.nombre.clone(),
            apellido: vet.apellido.clone(),
            direccion: vet.direccion.clone(),
            telefono: vet.telefono.clone(),
            email: vet.email.clone(),
            status: vet.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub email: String,
}

impl LoginResponse {
    pub fn new(token: String, vet: &Veterinarian) -> Self {
        Self {
            token,
            id: vet.id.to_hex(),
            nombre: vet.nombre.clone(),
            apellido: vet.apellido.clone(),
            direccion: vet.direccion.clone(),
            telefono: vet.telefono.clone(),
            email: vet.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Actualización exitosa del paciente")]
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "Registro exitoso del paciente")]
    pub msg: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Looks up the veterinarian a patient points at in a pre-fetched map.
fn owner_of(patient: &Patient, owners: &HashMap<ObjectId, Veterinarian>) -> Option<VeterinarianSummary> {
    owners.get(&patient.veterinario).map(VeterinarianSummary::from)
}

pub fn patient_summary(patient: &Patient, owners: &HashMap<ObjectId, Veterinarian>) -> PatientSummary {
    PatientSummary {
        id: patient.id.to_hex(),
        nombre: patient.nombre.clone(),
        propietario: patient.propietario.clone(),
        email: patient.email.clone(),
        celular: patient.celular.clone(),
        convencional: patient.convencional.clone(),
        especie: patient.especie.clone(),
        sintomas: patient.sintomas.clone(),
        ingreso: patient.ingreso.to_chrono(),
        estado: patient.estado,
        veterinario: owner_of(patient, owners),
    }
}

pub fn patient_detail(patient: &Patient, owners: &HashMap<ObjectId, Veterinarian>) -> PatientDetail {
    PatientDetail {
        id: patient.id.to_hex(),
        nombre: patient.nombre.clone(),
        propietario: patient.propietario.clone(),
        email: patient.email.clone(),
        celular: patient.celular.clone(),
        convencional: patient.convencional.clone(),
        especie: patient.especie.clone(),
        sintomas: patient.sintomas.clone(),
        ingreso: patient.ingreso.to_chrono(),
        salida: patient.salida.map(|d| d.to_chrono()),
        estado: patient.estado,
        veterinario: owner_of(patient, owners),
    }
}
