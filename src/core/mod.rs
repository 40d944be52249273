pub mod config;
pub mod error_codes;
pub mod errors;
pub mod kernel;
pub mod types;
