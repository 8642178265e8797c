//! Router test helpers backed by the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use bson::oid::ObjectId;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::api::openapi;
use crate::auth::{generate_jwt, hash_password};
use crate::config::AppConfig;
use crate::database::models::{PatientCreate, Veterinarian, VeterinarianRegister};
use crate::database::{MemoryStore, PatientStore, VeterinarianStore};
use crate::routes;
use crate::state::AppState;

/// Password of every veterinarian created through [`TestContext`]
pub const TEST_PASSWORD: &str = "secret123";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            config,
        }
    }

    pub fn state(&self) -> AppState {
        let docs = openapi::build(&self.config.docs).expect("valid docs server url");
        AppState::new(self.store.clone(), self.config.clone(), docs)
    }

    pub fn app(&self) -> Router {
        routes::app(self.state())
    }

    pub fn token_for(&self, id: &ObjectId) -> String {
        generate_jwt(&self.config.security, id.to_hex()).expect("token")
    }

    pub async fn create_veterinarian(&self, email: &str) -> Veterinarian {
        self.insert_veterinarian(email, true).await
    }

    pub async fn create_inactive_veterinarian(&self, email: &str) -> Veterinarian {
        self.insert_veterinarian(email, false).await
    }

    async fn insert_veterinarian(&self, email: &str, status: bool) -> Veterinarian {
        let mut vet = VeterinarianRegister::from_json(json!({
            "nombre": "Ana",
            "apellido": "Torres",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .expect("valid registration")
        .into_veterinarian(hash_password(TEST_PASSWORD), bson::DateTime::now());
        vet.status = status;

        self.store
            .insert_veterinarian(vet.clone())
            .await
            .expect("insert veterinarian");
        vet
    }

    pub async fn create_patient(&self, owner: ObjectId, nombre: &str, estado: bool) -> ObjectId {
        let mut patient = PatientCreate::from_json(patient_body(nombre))
            .expect("valid patient")
            .into_patient(owner, bson::DateTime::now())
            .expect("valid dates");
        patient.estado = estado;

        self.store.insert_patient(patient).await.expect("insert patient")
    }

    /// Sends a request with an arbitrary, possibly malformed, JSON body.
    pub async fn raw_request(&self, method: &str, uri: &str, token: Option<&str>, body: &str) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        self.app()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    pub async fn raw_request_with_origin(&self, method: &str, uri: &str, origin: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();

        self.app().oneshot(request).await.unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete patient registration body
pub fn patient_body(nombre: &str) -> Value {
    json!({
        "nombre": nombre,
        "propietario": "Juan Pérez",
        "email": "juan@example.com",
        "celular": "0987654321",
        "convencional": "022345678",
        "sintomas": "vomito",
    })
}

/// Drives `app` with one request. Non-JSON bodies come back as a JSON
/// string, empty bodies as `null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
