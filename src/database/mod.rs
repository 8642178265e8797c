pub mod memory;
pub mod models;
pub mod mongo;
pub mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{PatientStore, Store, StoreError, VeterinarianStore};
