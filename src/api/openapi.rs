//! OpenAPI document assembled from the `#[utoipa::path]` annotations on the
//! handlers. Built once at startup and served at `/api/docs.json`.

use url::Url;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};

use crate::config::DocsConfig;

/// Name the handlers reference in `security(...)`
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Adds the JWT bearer security scheme to the document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtenido en POST /api/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Veterinaria API",
        description = "Gestión de veterinarios y pacientes de una clínica veterinaria.\n\nAuthentication: `Authorization: Bearer <token>`; obtain the token from `POST /api/login`."
    ),
    paths(
        // ── Veterinarios ─────────────────────────────────────────────
        crate::handlers::public::veterinarian::register,
        crate::handlers::public::veterinarian::login,
        crate::handlers::protected::veterinarian::profile,
        // ── Pacientes ────────────────────────────────────────────────
        crate::handlers::protected::patient::list::list_patients,
        crate::handlers::protected::patient::register::register_patient,
        crate::handlers::protected::patient::record::get_patient,
        crate::handlers::protected::patient::record::update_patient,
        crate::handlers::protected::patient::record::delete_patient,
    ),
    components(
        schemas(
            crate::database::models::VeterinarianRegister,
            crate::database::models::LoginRequest,
            crate::database::models::PatientCreate,
            crate::database::models::PatientChanges,
            crate::api::format::VeterinarianSummary,
            crate::api::format::VeterinarianProfile,
            crate::api::format::LoginResponse,
            crate::api::format::PatientSummary,
            crate::api::format::PatientDetail,
            crate::api::format::MessageResponse,
            crate::api::format::CreatedResponse,
            crate::error::ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Veterinarios", description = "Registro, login y perfil de veterinarios"),
        (name = "Pacientes", description = "CRUD de pacientes del veterinario autenticado"),
    )
)]
pub struct ApiDoc;

/// Generates the document and advertises `docs.server_url` as its server.
pub fn build(docs: &DocsConfig) -> Result<utoipa::openapi::OpenApi, url::ParseError> {
    let server = Url::parse(&docs.server_url)?;

    let mut openapi = ApiDoc::openapi();
    openapi.servers = Some(vec![Server::new(server.as_str().trim_end_matches('/'))]);
    Ok(openapi)
}
