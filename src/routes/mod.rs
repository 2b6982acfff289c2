pub mod admin;
pub mod documents;
pub mod health;
pub mod submit;
pub mod validation;

pub use admin::{admin_stats, document_link, list_applications, update_status};
pub use documents::download_document;
pub use health::health_check;
pub use submit::submit_application;
