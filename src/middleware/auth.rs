use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use bson::oid::ObjectId;

use crate::auth::validate_jwt;
use crate::database::models::{parse_object_id, Veterinarian};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated veterinarian resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthVeterinarian {
    pub id: ObjectId,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

impl From<&Veterinarian> for AuthVeterinarian {
    fn from(vet: &Veterinarian) -> Self {
        Self {
            id: vet.id,
            nombre: vet.nombre.clone(),
            apellido: vet.apellido.clone(),
            email: vet.email.clone(),
        }
    }
}

/// JWT authentication middleware that validates tokens and resolves the veterinarian
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    // Validate and decode JWT
    let claims = validate_jwt(&state.config.security, &token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::from(e)
    })?;

    let vet_id = parse_object_id(&claims.sub)
        .ok_or_else(|| ApiError::unauthorized("Token no válido: identificador mal formado"))?;

    // Token may outlive the account it was issued for
    let vet = state
        .store
        .find_veterinarian(&vet_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token subject {} no longer exists", vet_id);
            ApiError::unauthorized("Token no válido: el veterinario no existe")
        })?;

    request.extensions_mut().insert(AuthVeterinarian::from(&vet));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Lo sentimos, debes proporcionar un token".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Formato de cabecera Authorization inválido".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Token vacío".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("La cabecera Authorization debe usar el formato Bearer".to_string())
    }
}
