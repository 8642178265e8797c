use bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{parse_date, ModelError};

/// Patient document as persisted in the `pacientes` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nombre: String,
    pub propietario: String,
    pub email: String,
    pub celular: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convencional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub especie: Option<String>,
    pub sintomas: String,
    pub ingreso: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salida: Option<bson::DateTime>,
    pub estado: bool,
    pub veterinario: ObjectId,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: bson::DateTime,
}

/// Request body for `POST /api/paciente/registro`.
///
/// Unknown keys are ignored, so owner and timestamp fields can never be
/// written through this payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PatientCreate {
    #[schema(example = "Max")]
    pub nombre: String,
    #[schema(example = "Juan")]
    pub propietario: String,
    #[schema(example = "nuevo@gmail.com")]
    pub email: String,
    #[schema(example = "0987654321")]
    pub celular: String,
    #[serde(default)]
    #[schema(example = "02312456")]
    pub convencional: Option<String>,
    #[serde(default)]
    #[schema(example = "perro")]
    pub especie: Option<String>,
    #[schema(example = "vomito, etc")]
    pub sintomas: String,
    /// Admission date (`YYYY-MM-DD` or RFC 3339); defaults to now
    #[serde(default)]
    pub ingreso: Option<String>,
    /// Discharge date (`YYYY-MM-DD` or RFC 3339)
    #[serde(default)]
    pub salida: Option<String>,
    #[serde(default)]
    pub estado: Option<bool>,
    /// Owner id, only read in legacy owner-assignment mode
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
}

impl PatientCreate {
    pub fn from_json(body: Value) -> Result<Self, ModelError> {
        serde_json::from_value(body).map_err(|e| ModelError::InvalidJson(e.to_string()))
    }

    pub fn into_patient(self, veterinario: ObjectId, now: bson::DateTime) -> Result<Patient, ModelError> {
        let ingreso = match self.ingreso.as_deref() {
            Some(value) => parse_date("ingreso", value)?,
            None => now,
        };
        let salida = self
            .salida
            .as_deref()
            .map(|value| parse_date("salida", value))
            .transpose()?;

        Ok(Patient {
            id: ObjectId::new(),
            nombre: self.nombre,
            propietario: self.propietario,
            email: self.email,
            celular: self.celular,
            convencional: self.convencional,
            especie: self.especie,
            sintomas: self.sintomas,
            ingreso,
            salida,
            estado: self.estado.unwrap_or(true),
            veterinario,
            created_at: now,
            updated_at: now,
        })
    }
}

/// One whitelisted change to a patient document
#[derive(Debug, Clone, PartialEq)]
pub enum PatientField {
    Nombre(String),
    Propietario(String),
    Email(String),
    Celular(String),
    Convencional(String),
    Especie(String),
    Sintomas(String),
    Ingreso(bson::DateTime),
    Salida(bson::DateTime),
    Estado(bool),
}

impl PatientField {
    fn from_entry(key: &str, value: &Value) -> Result<Self, ModelError> {
        let text = || {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ModelError::InvalidType {
                    field: key.to_string(),
                    expected: "a string",
                })
        };

        let field = match key {
            "nombre" => PatientField::Nombre(text()?),
            "propietario" => PatientField::Propietario(text()?),
            "email" => PatientField::Email(text()?),
            "celular" => PatientField::Celular(text()?),
            "convencional" => PatientField::Convencional(text()?),
            "especie" => PatientField::Especie(text()?),
            "sintomas" => PatientField::Sintomas(text()?),
            "ingreso" => PatientField::Ingreso(parse_date(key, &text()?)?),
            "salida" => PatientField::Salida(parse_date(key, &text()?)?),
            "estado" => PatientField::Estado(value.as_bool().ok_or_else(|| ModelError::InvalidType {
                field: key.to_string(),
                expected: "a boolean",
            })?),
            _ => return Err(ModelError::FieldsNotUpdatable(vec![key.to_string()])),
        };
        Ok(field)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PatientField::Nombre(_) => "nombre",
            PatientField::Propietario(_) => "propietario",
            PatientField::Email(_) => "email",
            PatientField::Celular(_) => "celular",
            PatientField::Convencional(_) => "convencional",
            PatientField::Especie(_) => "especie",
            PatientField::Sintomas(_) => "sintomas",
            PatientField::Ingreso(_) => "ingreso",
            PatientField::Salida(_) => "salida",
            PatientField::Estado(_) => "estado",
        }
    }

    fn to_bson(&self) -> Bson {
        match self {
            PatientField::Nombre(v)
            | PatientField::Propietario(v)
            | PatientField::Email(v)
            | PatientField::Celular(v)
            | PatientField::Convencional(v)
            | PatientField::Especie(v)
            | PatientField::Sintomas(v) => Bson::String(v.clone()),
            PatientField::Ingreso(v) | PatientField::Salida(v) => Bson::DateTime(*v),
            PatientField::Estado(v) => Bson::Boolean(*v),
        }
    }

    fn apply(&self, patient: &mut Patient) {
        match self {
            PatientField::Nombre(v) => patient.nombre = v.clone(),
            PatientField::Propietario(v) => patient.propietario = v.clone(),
            PatientField::Email(v) => patient.email = v.clone(),
            PatientField::Celular(v) => patient.celular = v.clone(),
            PatientField::Convencional(v) => patient.convencional = Some(v.clone()),
            PatientField::Especie(v) => patient.especie = Some(v.clone()),
            PatientField::Sintomas(v) => patient.sintomas = v.clone(),
            PatientField::Ingreso(v) => patient.ingreso = *v,
            PatientField::Salida(v) => patient.salida = Some(*v),
            PatientField::Estado(v) => patient.estado = *v,
        }
    }
}

/// Documented shape of an update body; parsing goes through [`PatientUpdate`].
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatientChanges {
    pub nombre: Option<String>,
    pub propietario: Option<String>,
    pub email: Option<String>,
    pub celular: Option<String>,
    pub convencional: Option<String>,
    pub especie: Option<String>,
    #[schema(example = "tos, fiebre")]
    pub sintomas: Option<String>,
    pub ingreso: Option<String>,
    pub salida: Option<String>,
    pub estado: Option<bool>,
}

/// Partial update restricted to the updatable patient fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientUpdate {
    changes: Vec<PatientField>,
}

impl PatientUpdate {
    pub const UPDATABLE_FIELDS: &'static [&'static str] = &[
        "nombre",
        "propietario",
        "email",
        "celular",
        "convencional",
        "especie",
        "sintomas",
        "ingreso",
        "salida",
        "estado",
    ];

    /// Builds an update from a JSON object. Every key outside
    /// [`Self::UPDATABLE_FIELDS`] is reported at once.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, ModelError> {
        let mut rejected: Vec<String> = body
            .keys()
            .filter(|key| !Self::UPDATABLE_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !rejected.is_empty() {
            rejected.sort();
            return Err(ModelError::FieldsNotUpdatable(rejected));
        }

        let changes = body
            .iter()
            .map(|(key, value)| PatientField::from_entry(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        if changes.is_empty() {
            return Err(ModelError::NoChanges);
        }
        Ok(Self { changes })
    }

    pub fn changes(&self) -> &[PatientField] {
        &self.changes
    }

    pub fn apply(&self, patient: &mut Patient, now: bson::DateTime) {
        for change in &self.changes {
            change.apply(patient);
        }
        patient.updated_at = now;
    }

    /// `$set` body for the document store
    pub fn to_set_document(&self, now: bson::DateTime) -> Document {
        let mut set = Document::new();
        for change in &self.changes {
            set.insert(change.name(), change.to_bson());
        }
        set.insert("updatedAt", now);
        set
    }
}

/// Query over patients; unset members match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFilter {
    pub estado: Option<bool>,
    pub veterinario: Option<ObjectId>,
}

impl PatientFilter {
    /// Active patients owned by one veterinarian
    pub fn active_for(veterinario: ObjectId) -> Self {
        Self {
            estado: Some(true),
            veterinario: Some(veterinario),
        }
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        self.estado.map_or(true, |estado| patient.estado == estado)
            && self
                .veterinario
                .map_or(true, |vet| patient.veterinario == vet)
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(estado) = self.estado {
            filter.insert("estado", estado);
        }
        if let Some(vet) = self.veterinario {
            filter.insert("veterinario", vet);
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(vet: ObjectId) -> Patient {
        let body = json!({
            "nombre": "Max",
            "propietario": "Juan",
            "email": "juan@example.com",
            "celular": "0987654321",
            "sintomas": "vomito",
        });
        PatientCreate::from_json(body)
            .unwrap()
            .into_patient(vet, bson::DateTime::now())
            .unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn create_defaults_status_and_admission() {
        let vet = ObjectId::new();
        let patient = sample(vet);
        assert!(patient.estado);
        assert_eq!(patient.veterinario, vet);
        assert_eq!(patient.ingreso, patient.created_at);
        assert!(patient.salida.is_none());
    }

    #[test]
    fn create_requires_core_fields() {
        let err = PatientCreate::from_json(json!({ "nombre": "Max" })).unwrap_err();
        assert!(matches!(err, ModelError::InvalidJson(_)));
    }

    #[test]
    fn create_ignores_owner_and_timestamps_in_body() {
        let body = json!({
            "nombre": "Max",
            "propietario": "Juan",
            "email": "juan@example.com",
            "celular": "0987654321",
            "sintomas": "vomito",
            "veterinario": "65a1f0c2e4b0a1b2c3d4e5f6",
            "createdAt": "2020-01-01",
        });
        let vet = ObjectId::new();
        let patient = PatientCreate::from_json(body)
            .unwrap()
            .into_patient(vet, bson::DateTime::now())
            .unwrap();
        assert_eq!(patient.veterinario, vet);
    }

    #[test]
    fn create_ignores_non_string_owner_id() {
        let body = json!({
            "nombre": "Max",
            "propietario": "Juan",
            "email": "juan@example.com",
            "celular": "0987654321",
            "sintomas": "vomito",
            "id": 7,
        });
        let create = PatientCreate::from_json(body).unwrap();
        assert_eq!(create.id, Some(json!(7)));
    }

    #[test]
    fn every_updatable_field_parses() {
        let body = object(json!({
            "nombre": "Rex",
            "propietario": "Ana",
            "email": "ana@example.com",
            "celular": "0999999999",
            "convencional": "022222222",
            "especie": "gato",
            "sintomas": "tos",
            "ingreso": "2024-05-01",
            "salida": "2024-05-03T10:00:00Z",
            "estado": false,
        }));
        let update = PatientUpdate::from_json(&body).unwrap();
        let mut names: Vec<_> = update.changes().iter().map(PatientField::name).collect();
        names.sort();
        let mut expected = PatientUpdate::UPDATABLE_FIELDS.to_vec();
        expected.sort();
        assert_eq!(names, expected);

        let err = PatientField::from_entry("veterinario", &json!("x")).unwrap_err();
        assert!(matches!(err, ModelError::FieldsNotUpdatable(fields) if fields == vec!["veterinario".to_string()]));
    }

    #[test]
    fn update_rejects_fields_outside_whitelist() {
        let err = PatientUpdate::from_json(&object(json!({
            "nombre": "Rex",
            "veterinario": "65a1f0c2e4b0a1b2c3d4e5f6",
            "createdAt": "2020-01-01",
        })))
        .unwrap_err();
        match err {
            ModelError::FieldsNotUpdatable(fields) => {
                assert_eq!(fields, vec!["createdAt".to_string(), "veterinario".to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_rejects_wrong_types_and_empty_bodies() {
        let err = PatientUpdate::from_json(&object(json!({ "estado": "false" }))).unwrap_err();
        assert!(matches!(err, ModelError::InvalidType { .. }));

        let err = PatientUpdate::from_json(&Map::new()).unwrap_err();
        assert!(matches!(err, ModelError::NoChanges));
    }

    #[test]
    fn update_applies_changes_and_touches_timestamp() {
        let mut patient = sample(ObjectId::new());
        let update = PatientUpdate::from_json(&object(json!({
            "sintomas": "tos",
            "estado": false,
            "salida": "2024-05-01",
        })))
        .unwrap();

        let later = bson::DateTime::from_millis(patient.updated_at.timestamp_millis() + 1_000);
        update.apply(&mut patient, later);

        assert_eq!(patient.sintomas, "tos");
        assert!(!patient.estado);
        assert!(patient.salida.is_some());
        assert_eq!(patient.updated_at, later);
    }

    #[test]
    fn update_set_document_lists_changed_fields() {
        let update = PatientUpdate::from_json(&object(json!({ "nombre": "Rex", "estado": true }))).unwrap();
        let now = bson::DateTime::now();
        let set = update.to_set_document(now);
        assert_eq!(set.get_str("nombre").unwrap(), "Rex");
        assert!(set.get_bool("estado").unwrap());
        assert_eq!(set.get_datetime("updatedAt").unwrap(), &now);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn filter_matches_status_and_owner() {
        let vet = ObjectId::new();
        let mut patient = sample(vet);
        let filter = PatientFilter::active_for(vet);
        assert!(filter.matches(&patient));
        assert!(!PatientFilter::active_for(ObjectId::new()).matches(&patient));

        patient.estado = false;
        assert!(!filter.matches(&patient));
        assert!(PatientFilter::default().matches(&patient));
    }

    #[test]
    fn filter_document_only_contains_set_members() {
        let vet = ObjectId::new();
        assert_eq!(
            PatientFilter::active_for(vet).to_document(),
            doc! { "estado": true, "veterinario": vet }
        );
        assert_eq!(PatientFilter::default().to_document(), doc! {});
    }
}
