// handlers/protected/patient/list.rs - GET /api/pacientes

use axum::{extract::State, Extension, Json};

use crate::api::format::{patient_summary, PatientSummary};
use crate::database::models::PatientFilter;
use crate::error::ApiError;
use crate::middleware::AuthVeterinarian;
use crate::state::AppState;

use super::utils::load_owners;

/// GET /api/pacientes - Active patients of the authenticated veterinarian
#[utoipa::path(
    get,
    path = "/api/pacientes",
    responses(
        (status = 200, description = "Active patients owned by the caller", body = [PatientSummary]),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "Pacientes"
)]
pub async fn list_patients(
    State(state): State<AppState>,
    Extension(vet): Extension<AuthVeterinarian>,
) -> Result<Json<Vec<PatientSummary>>, ApiError> {
    let patients = state
        .store
        .find_patients(&PatientFilter::active_for(vet.id))
        .await?;
    let owners = load_owners(state.store.as_ref(), &patients).await?;

    tracing::debug!("Listing {} patients for {}", patients.len(), vet.id);
    Ok(Json(
        patients.iter().map(|p| patient_summary(p, &owners)).collect(),
    ))
}
