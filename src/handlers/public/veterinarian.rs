// handlers/public/veterinarian.rs - POST /api/registro and POST /api/login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::api::format::{LoginResponse, MessageResponse};
use crate::auth::{generate_jwt, hash_password, verify_password};
use crate::database::models::veterinarian::normalize_email;
use crate::database::models::{LoginRequest, VeterinarianRegister};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::handlers::utils::{json_object, require_filled};
use crate::state::AppState;

const EMAIL_TAKEN_MESSAGE: &str = "Lo sentimos, el email ya se encuentra registrado";

/// POST /api/registro - Create a veterinarian account
#[utoipa::path(
    post,
    path = "/api/registro",
    request_body = VeterinarianRegister,
    responses(
        (status = 200, description = "Veterinarian registered", body = MessageResponse),
        (status = 400, description = "Empty or missing fields, or email already registered", body = crate::error::ErrorBody),
    ),
    tag = "Veterinarios"
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = json_object(body)?;
    require_filled(&body)?;
    let register = VeterinarianRegister::from_json(Value::Object(body))?;

    let email = normalize_email(&register.email);
    if state.store.find_veterinarian_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request(EMAIL_TAKEN_MESSAGE));
    }

    let password_hash = hash_password(&register.password);
    let vet = register.into_veterinarian(password_hash, bson::DateTime::now());

    // The unique index settles concurrent registrations of the same email
    match state.store.insert_veterinarian(vet).await {
        Ok(id) => {
            tracing::info!("Registered veterinarian {} ({})", id, email);
            Ok(Json(MessageResponse::new("Registro exitoso del veterinario")))
        }
        Err(StoreError::Duplicate(_)) => Err(ApiError::bad_request(EMAIL_TAKEN_MESSAGE)),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/login - Exchange credentials for a JWT
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Empty or missing fields", body = crate::error::ErrorBody),
        (status = 401, description = "Wrong password", body = crate::error::ErrorBody),
        (status = 403, description = "Inactive account", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown email", body = crate::error::ErrorBody),
    ),
    tag = "Veterinarios"
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let body = json_object(body)?;
    require_filled(&body)?;
    let request = LoginRequest::from_json(Value::Object(body))?;

    let vet = state
        .store
        .find_veterinarian_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(|| ApiError::not_found("Lo sentimos, el usuario no se encuentra registrado"))?;

    if !vet.status {
        return Err(ApiError::forbidden("Lo sentimos, debe verificar su cuenta"));
    }

    if !verify_password(&request.password, &vet.password) {
        tracing::warn!("Failed login for {}", vet.email);
        return Err(ApiError::unauthorized("Lo sentimos, el password no es el correcto"));
    }

    let token = generate_jwt(&state.config.security, vet.id.to_hex())?;
    tracing::info!("Veterinarian {} logged in", vet.id);

    Ok(Json(LoginResponse::new(token, &vet)))
}
