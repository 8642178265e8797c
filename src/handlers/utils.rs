// handlers/utils.rs - Request body helpers shared by every handler tier

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const EMPTY_FIELDS_MESSAGE: &str = "Lo sentimos, debes llenar todos los campos";

/// Unwraps an extracted JSON body into an object, mapping axum's rejection
/// (bad content type, syntax error) to a 400.
pub fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::invalid_json("El cuerpo de la petición debe ser un objeto JSON")),
    }
}

/// True when any top-level value is the empty string.
pub fn has_empty_field(body: &Map<String, Value>) -> bool {
    body.values().any(|value| matches!(value, Value::String(s) if s.is_empty()))
}

/// Rejects bodies carrying an empty-string field.
pub fn require_filled(body: &Map<String, Value>) -> Result<(), ApiError> {
    if has_empty_field(body) {
        return Err(ApiError::bad_request(EMPTY_FIELDS_MESSAGE));
    }
    Ok(())
}
