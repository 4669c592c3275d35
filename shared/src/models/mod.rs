//! Domain models for the Gas Certificate Manager

mod certificate;
mod client;
mod settings;
mod stats;

pub use certificate::*;
pub use client::*;
pub use settings::*;
pub use stats::*;
