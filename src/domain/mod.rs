pub mod error;
pub mod external_apis;
pub mod models;
