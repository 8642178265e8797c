// handlers/protected/mod.rs - Handlers behind `jwt_auth_middleware`
//
// Every handler here can rely on an `AuthVeterinarian` request extension.

pub mod patient;
pub mod veterinarian; // GET /api/perfil

pub use veterinarian::profile;
