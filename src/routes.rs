use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", public_routes().merge(protected_routes(state.clone())))
        .fallback(not_found)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{docs_json, docs_ui, login, register};

    Router::new()
        .route("/registro", post(register))
        .route("/login", post(login))
        .route("/docs", get(docs_ui))
        .route("/docs.json", get(docs_json))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::patient;

    Router::new()
        .route("/perfil", get(protected::profile))
        .route("/pacientes", get(patient::list_patients))
        .route("/paciente/registro", post(patient::register_patient))
        .route("/paciente/:id", get(patient::get_patient))
        .route("/paciente/actualizar/:id", put(patient::update_patient))
        .route("/paciente/eliminar/:id", delete(patient::delete_patient))
        // Only matched routes go through auth, unknown paths still reach the fallback
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn root() -> &'static str {
    "Server on"
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded" })),
            )
        }
    }
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Endpoint no encontrado - 404")
}
