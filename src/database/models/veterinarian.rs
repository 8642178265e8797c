use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::ModelError;

/// Veterinarian document as persisted in the `veterinarios` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Veterinarian {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nombre: String,
    pub apellido: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub email: String,
    /// Salted password digest, see `auth::hash_password`
    pub password: String,
    pub status: bool,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: bson::DateTime,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VeterinarianRegister {
    #[schema(example = "Ana")]
    pub nombre: String,
    #[schema(example = "Torres")]
    pub apellido: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[schema(example = "ana@clinica.com")]
    pub email: String,
    pub password: String,
}

impl VeterinarianRegister {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        serde_json::from_value(body).map_err(|e| ModelError::InvalidJson(e.to_string()))
    }

    /// `password_hash` must already be digested.
    pub fn into_veterinarian(self, password_hash: String, now: bson::DateTime) -> Veterinarian {
        Veterinarian {
            id: ObjectId::new(),
            nombre: self.nombre,
            apellido: self.apellido,
            direccion: self.direccion,
            telefono: self.telefono,
            email: normalize_email(&self.email),
            password: password_hash,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ana@clinica.com")]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        serde_json::from_value(body).map_err(|e| ModelError::InvalidJson(e.to_string()))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
