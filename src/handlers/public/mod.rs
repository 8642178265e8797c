// handlers/public/mod.rs - Handlers reachable without a token
//
// Account creation, token acquisition and API documentation.

pub mod docs; // GET /api/docs, GET /api/docs.json
pub mod veterinarian; // POST /api/registro, POST /api/login

pub use docs::{docs_json, docs_ui};
pub use veterinarian::{login, register};
