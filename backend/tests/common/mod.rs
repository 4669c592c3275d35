//! Fixtures shared by the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gascert::{CertificateRegistry, ManualClock, MemoryStorage, RegistryOptions, SharedClock};
use shared::{CertificateInput, ClientInput};
use uuid::Uuid;

pub const PASSWORD: &str = "gestion123";

/// Noon on 20 May 2024
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn options(seed: bool) -> RegistryOptions {
    RegistryOptions {
        bootstrap_password: PASSWORD.to_string(),
        bcrypt_cost: 4,
        seed_sample_data: seed,
    }
}

pub struct Fixture {
    pub storage: Arc<MemoryStorage>,
    pub clock: ManualClock,
    pub registry: CertificateRegistry,
}

impl Fixture {
    pub fn shared_clock(&self) -> SharedClock {
        Arc::new(self.clock.clone())
    }

    /// Reload a registry from the same storage, as after a restart
    pub fn reload(&self) -> CertificateRegistry {
        CertificateRegistry::load(self.storage.clone(), self.shared_clock(), options(false))
            .unwrap()
    }
}

/// Empty registry on in-memory storage with a manual clock
pub fn fixture() -> Fixture {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(start_time());
    let registry =
        CertificateRegistry::load(storage.clone(), Arc::new(clock.clone()), options(false))
            .unwrap();
    Fixture {
        storage,
        clock,
        registry,
    }
}

pub fn client_input(name: &str) -> ClientInput {
    ClientInput {
        name: name.to_string(),
        phone: "600123456".to_string(),
        email: "cliente@ejemplo.com".to_string(),
        address: "Calle Mayor 1, Madrid".to_string(),
        ..Default::default()
    }
}

pub fn certificate_input(client_id: Uuid, issue_date: NaiveDate) -> CertificateInput {
    CertificateInput {
        client_id,
        issue_date,
        expiry_date: None,
        technical_notes: None,
    }
}
