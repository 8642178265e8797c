// handlers/protected/patient/record.rs - Single patient operations
//
// GET    /api/paciente/:id
// PUT    /api/paciente/actualizar/:id
// DELETE /api/paciente/eliminar/:id

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use crate::api::format::{patient_detail, MessageResponse, PatientDetail};
use crate::database::models::{PatientChanges, PatientUpdate};
use crate::error::ApiError;
use crate::handlers::utils::{json_object, require_filled};
use crate::middleware::AuthVeterinarian;
use crate::state::AppState;

use super::utils::{load_owners, parse_patient_id, patient_not_found};

/// GET /api/paciente/:id - Patient detail with its veterinarian expanded
#[utoipa::path(
    get,
    path = "/api/paciente/{id}",
    params(("id" = String, Path, description = "Patient object id (24 hex characters)")),
    responses(
        (status = 200, description = "Patient detail", body = PatientDetail),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Malformed or unknown id", body = crate::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "Pacientes"
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientDetail>, ApiError> {
    let oid = parse_patient_id(&id)?;

    let patient = state
        .store
        .find_patient(&oid)
        .await?
        .ok_or_else(|| patient_not_found(&id))?;
    let owners = load_owners(state.store.as_ref(), std::slice::from_ref(&patient)).await?;

    Ok(Json(patient_detail(&patient, &owners)))
}

/// PUT /api/paciente/actualizar/:id - Partial update over the updatable fields
#[utoipa::path(
    put,
    path = "/api/paciente/actualizar/{id}",
    params(("id" = String, Path, description = "Patient object id (24 hex characters)")),
    request_body(content = PatientChanges, description = "Any non-empty subset of the updatable fields"),
    responses(
        (status = 200, description = "Patient updated", body = MessageResponse),
        (status = 400, description = "Empty, unknown or mistyped fields", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Malformed or unknown id", body = crate::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "Pacientes"
)]
pub async fn update_patient(
    State(state): State<AppState>,
    Extension(vet): Extension<AuthVeterinarian>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = json_object(body)?;
    require_filled(&body)?;
    let oid = parse_patient_id(&id)?;
    let update = PatientUpdate::from_json(&body)?;

    if !state.store.update_patient(&oid, &update).await? {
        return Err(patient_not_found(&id));
    }
    tracing::info!(
        "Veterinarian {} updated patient {} ({} fields)",
        vet.id,
        oid,
        update.changes().len()
    );

    Ok(Json(MessageResponse::new("Actualización exitosa del paciente")))
}

/// DELETE /api/paciente/eliminar/:id - Hard delete
#[utoipa::path(
    delete,
    path = "/api/paciente/eliminar/{id}",
    params(("id" = String, Path, description = "Patient object id (24 hex characters)")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Malformed or unknown id", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "Pacientes"
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(vet): Extension<AuthVeterinarian>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let oid = parse_patient_id(&id)?;

    if !state.store.delete_patient(&oid).await? {
        return Err(patient_not_found(&id));
    }
    tracing::info!("Veterinarian {} deleted patient {}", vet.id, oid);

    Ok(StatusCode::NO_CONTENT)
}
