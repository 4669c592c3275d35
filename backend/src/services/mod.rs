//! Business logic services for the Gas Certificate Manager

pub mod document;
pub mod registry;
pub mod reporting;
pub mod sample;
pub mod session;

pub use registry::{CertificateListing, CertificateRegistry, RegistryOptions};
pub use session::{ActiveSession, SessionGuard};
