// handlers/protected/veterinarian.rs - GET /api/perfil

use axum::{extract::State, Extension, Json};

use crate::api::format::VeterinarianProfile;
use crate::error::ApiError;
use crate::middleware::AuthVeterinarian;
use crate::state::AppState;

/// GET /api/perfil - Profile of the authenticated veterinarian
#[utoipa::path(
    get,
    path = "/api/perfil",
    responses(
        (status = 200, description = "Authenticated veterinarian", body = VeterinarianProfile),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "Veterinarios"
)]
pub async fn profile(
    State(state): State<AppState>,
    Extension(vet): Extension<AuthVeterinarian>,
) -> Result<Json<VeterinarianProfile>, ApiError> {
    let stored = state
        .store
        .find_veterinarian(&vet.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Token no válido: el veterinario no existe"))?;

    Ok(Json(VeterinarianProfile::from(&stored)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::testing::{send, TestContext};

    #[tokio::test]
    async fn profile_has_no_credentials() {
        let ctx = TestContext::new();
        let vet = ctx.create_veterinarian("ana@clinica.com").await;

        let (status, body) = send(&ctx.app(), "GET", "/api/perfil", Some(&ctx.token_for(&vet.id)), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_id"], vet.id.to_hex());
        assert_eq!(body["status"], true);
        assert!(body.get("password").is_none());
    }
}
