// handlers/protected/patient/register.rs - POST /api/paciente/registro

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use bson::oid::ObjectId;
use serde_json::Value;

use crate::api::format::CreatedResponse;
use crate::database::models::{parse_object_id, PatientCreate};
use crate::error::ApiError;
use crate::handlers::utils::{json_object, require_filled};
use crate::middleware::AuthVeterinarian;
use crate::state::AppState;

/// POST /api/paciente/registro - Register a patient for the authenticated veterinarian
#[utoipa::path(
    post,
    path = "/api/paciente/registro",
    request_body = PatientCreate,
    responses(
        (status = 200, description = "Patient registered", body = CreatedResponse),
        (status = 400, description = "Empty or missing fields, or unknown veterinarian", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "Pacientes"
)]
pub async fn register_patient(
    State(state): State<AppState>,
    Extension(vet): Extension<AuthVeterinarian>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let body = json_object(body)?;
    require_filled(&body)?;
    let create = PatientCreate::from_json(Value::Object(body))?;

    // The token may have outlived the account
    ensure_veterinarian(&state, &vet.id).await?;
    let owner = resolve_owner(&state, &vet, create.id.as_ref()).await?;

    let patient = create.into_patient(owner, bson::DateTime::now())?;
    let id = state.store.insert_patient(patient).await?;
    tracing::info!("Veterinarian {} registered patient {}", vet.id, id);

    Ok(Json(CreatedResponse {
        msg: "Registro exitoso del paciente".to_string(),
        id: id.to_hex(),
    }))
}

async fn ensure_veterinarian(state: &AppState, id: &ObjectId) -> Result<(), ApiError> {
    match state.store.find_veterinarian(id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::bad_request("El veterinario no existe")),
    }
}

/// Owner of a new patient: the caller, or the body's `id` in legacy mode.
async fn resolve_owner(
    state: &AppState,
    vet: &AuthVeterinarian,
    body_id: Option<&Value>,
) -> Result<ObjectId, ApiError> {
    if !state.config.compat.owner_from_body {
        return Ok(vet.id);
    }

    let owner = body_id
        .and_then(Value::as_str)
        .and_then(parse_object_id)
        .ok_or_else(|| ApiError::bad_request("Lo sentimos, el id del veterinario no es válido"))?;
    if owner != vet.id {
        ensure_veterinarian(state, &owner).await?;
    }
    Ok(owner)
}
