// handlers/protected/patient/mod.rs - Patient CRUD
//
// The list is scoped to the authenticated veterinarian; single-record
// operations address patients by id.

pub mod list; // GET /api/pacientes
pub mod record; // GET|PUT|DELETE /api/paciente/...
pub mod register; // POST /api/paciente/registro
pub mod utils;

pub use list::list_patients;
pub use record::{delete_patient, get_patient, update_patient};
pub use register::register_patient;
