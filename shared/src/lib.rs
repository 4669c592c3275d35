//! Shared types and models for the Gas Certificate Manager
//!
//! This crate contains the domain models, date/status rules and form
//! validation shared between the backend and the browser (via WASM).

pub mod dates;
pub mod models;
pub mod types;
pub mod validation;

pub use dates::*;
pub use models::*;
pub use types::*;
pub use validation::*;
