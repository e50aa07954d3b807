pub mod errors;
pub mod models;
pub mod protocols;
pub mod services;
