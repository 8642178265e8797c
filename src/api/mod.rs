pub mod format;
pub mod openapi;
