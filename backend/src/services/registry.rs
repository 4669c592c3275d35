//! Client and certificate registry
//!
//! Holds every client and certificate in memory and mirrors each collection
//! to [`Storage`] after every change. Certificate status is a cache: it is
//! only ever written by [`CertificateRegistry::recompute_statuses`] and
//! [`CertificateRegistry::status_for`], and dashboard statistics are
//! recomputed after every mutation.
//!
//! A mutation whose persistence fails is rolled back in memory, so callers
//! always observe the last state that was written successfully.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::{
    classify_status, expiry_date, format_serial, last_months, month_label, parse_serial,
    validate_input, Certificate, CertificateFilter, CertificateInput, CertificateStatus, Client,
    ClientInput, DashboardStats, MonthlyCount, Settings, SettingsInput, FIRST_SERIAL,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::error::{AppError, AppResult};
use crate::services::{sample, session};
use crate::storage::{self, Loaded, StateKey, Storage};

/// How a registry is bootstrapped when no state exists yet
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Password hashed into freshly created settings
    pub bootstrap_password: String,
    pub bcrypt_cost: u32,
    /// Write one sample client and certificate when no clients are stored
    pub seed_sample_data: bool,
}

impl From<&crate::config::Config> for RegistryOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            bootstrap_password: config.auth.bootstrap_password.clone(),
            bcrypt_cost: config.auth.bcrypt_cost,
            seed_sample_data: config.storage.seed_sample_data,
        }
    }
}

/// Certificate joined with its client's display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateListing {
    #[serde(flatten)]
    pub certificate: Certificate,
    pub client_name: Option<String>,
    pub days_remaining: i64,
}

struct Snapshot {
    clients: Vec<Client>,
    certificates: Vec<Certificate>,
    settings: Settings,
    next_serial: u64,
}

/// The domain store
pub struct CertificateRegistry {
    storage: Arc<dyn Storage>,
    clock: SharedClock,
    bcrypt_cost: u32,
    clients: Vec<Client>,
    certificates: Vec<Certificate>,
    settings: Settings,
    next_serial: u64,
    stats: DashboardStats,
}

impl CertificateRegistry {
    /// Load every collection from storage, falling back to defaults (and
    /// optionally sample data) for documents that are missing or malformed.
    pub fn load(
        storage: Arc<dyn Storage>,
        clock: SharedClock,
        options: RegistryOptions,
    ) -> AppResult<Self> {
        let now = clock.now();

        let (settings, settings_found) = match storage::load::<Settings>(storage.as_ref(), StateKey::Settings)? {
            Loaded::Found(settings) => (settings, true),
            _ => {
                let hash = session::hash_password(&options.bootstrap_password, options.bcrypt_cost)?;
                (Settings::with_password_hash(hash), false)
            }
        };

        let mut seeded = false;
        let clients = match storage::load::<Vec<Client>>(storage.as_ref(), StateKey::Clients)? {
            Loaded::Found(clients) => clients,
            Loaded::Missing if options.seed_sample_data => {
                seeded = true;
                vec![sample::sample_client(now)]
            }
            _ => Vec::new(),
        };

        let mut certificates =
            match storage::load::<Vec<Certificate>>(storage.as_ref(), StateKey::Certificates)? {
                Loaded::Found(certificates) => certificates,
                _ => Vec::new(),
            };
        // a certificate never outlives its client
        let before = certificates.len();
        certificates.retain(|cert| clients.iter().any(|c| c.id == cert.client_id));
        let orphaned = before - certificates.len();
        if orphaned > 0 {
            warn!(orphaned, "Dropped certificates whose client no longer exists");
        }

        if seeded && certificates.is_empty() {
            if let Some(client) = clients.first() {
                certificates.push(sample::sample_certificate(
                    client,
                    FIRST_SERIAL,
                    settings.certificates.validity_years,
                    now,
                ));
            }
        }

        // never hand out a serial that is already in use
        let highest_used = certificates
            .iter()
            .filter_map(|c| parse_serial(&c.serial_number))
            .max();
        let stored_counter = storage::load::<u64>(storage.as_ref(), StateKey::CertCounter)?.found();
        let next_serial = [
            Some(FIRST_SERIAL),
            stored_counter,
            highest_used.map(|n| n + 1),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(FIRST_SERIAL);

        let mut registry = Self {
            storage,
            clock,
            bcrypt_cost: options.bcrypt_cost,
            clients,
            certificates,
            settings,
            next_serial,
            stats: DashboardStats::default(),
        };

        registry.recompute_statuses();
        registry.refresh_stats();

        if !settings_found {
            registry.persist(&[StateKey::Settings])?;
        }
        registry.persist(&[StateKey::Clients, StateKey::Certificates, StateKey::CertCounter])?;

        info!(
            clients = registry.clients.len(),
            certificates = registry.certificates.len(),
            next_serial = registry.next_serial,
            "Registry loaded"
        );

        Ok(registry)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Aggregate statistics; always reflect the current collections
    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn next_serial(&self) -> u64 {
        self.next_serial
    }

    pub fn get_client(&self, id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn get_certificate(&self, id: Uuid) -> Option<&Certificate> {
        self.certificates.iter().find(|c| c.id == id)
    }

    /// Clients matching `search`, sorted by name
    pub fn list_clients(&self, search: Option<&str>) -> Vec<Client> {
        let mut clients: Vec<Client> = self
            .clients
            .iter()
            .filter(|c| search.map_or(true, |term| c.matches(term)))
            .cloned()
            .collect();
        clients.sort_by_key(|c| c.name.to_lowercase());
        clients
    }

    /// Certificates matching the filter, newest issue date first
    pub fn list_certificates(&self, filter: &CertificateFilter) -> Vec<CertificateListing> {
        let by_id: HashMap<Uuid, &Client> = self.clients.iter().map(|c| (c.id, c)).collect();
        let today = self.clock.today();
        let term = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut listings: Vec<CertificateListing> = self
            .certificates
            .iter()
            .filter(|cert| filter.status.map_or(true, |s| cert.status == s))
            .filter(|cert| {
                let Some(term) = term.as_deref() else {
                    return true;
                };
                let client = by_id.get(&cert.client_id);
                cert.serial_number.to_lowercase().contains(term)
                    || client.is_some_and(|c| {
                        c.name.to_lowercase().contains(term)
                            || c.phone.contains(term)
                            || c.dni
                                .as_deref()
                                .is_some_and(|dni| dni.to_lowercase().contains(term))
                    })
            })
            .map(|cert| CertificateListing {
                certificate: cert.clone(),
                client_name: by_id.get(&cert.client_id).map(|c| c.name.clone()),
                days_remaining: shared::days_remaining(cert.expiry_date, today),
            })
            .collect();

        listings.sort_by(|a, b| {
            b.certificate
                .issue_date
                .cmp(&a.certificate.issue_date)
                .then_with(|| b.certificate.created_at.cmp(&a.certificate.created_at))
        });
        listings
    }

    /// Every certificate issued to one client, newest first
    pub fn certificates_for_client(&self, client_id: Uuid) -> Vec<Certificate> {
        let mut certs: Vec<Certificate> = self
            .certificates
            .iter()
            .filter(|c| c.client_id == client_id)
            .cloned()
            .collect();
        certs.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        certs
    }

    /// Near-expiry certificates, soonest expiry first
    pub fn upcoming_renewals(&self, limit: usize) -> Vec<Certificate> {
        let mut certs: Vec<Certificate> = self
            .certificates
            .iter()
            .filter(|c| c.status == CertificateStatus::NearExpiry)
            .cloned()
            .collect();
        certs.sort_by_key(|c| c.expiry_date);
        certs.truncate(limit);
        certs
    }

    /// Certificates issued in each of the last `months` months, oldest first
    pub fn monthly_issuance(&self, months: u32) -> Vec<MonthlyCount> {
        let counts = shared::group_by_month(self.certificates.iter().map(|c| c.issue_date));
        last_months(self.clock.today(), months)
            .into_iter()
            .map(|first| MonthlyCount {
                year: first.year(),
                month: first.month(),
                label: month_label(first).to_string(),
                count: counts.get(&(first.year(), first.month())).copied().unwrap_or(0),
            })
            .collect()
    }

    // ========================================================================
    // Client mutations
    // ========================================================================

    /// Register a new client
    pub fn add_client(&mut self, input: ClientInput) -> AppResult<Client> {
        let input = input.normalized();
        validate_input(&input).map_err(AppError::Validation)?;

        let client = Client::from_input(Uuid::new_v4(), input, self.clock.now());
        self.transact(&[StateKey::Clients], |reg| {
            reg.clients.push(client.clone());
            Ok(())
        })?;

        info!(client_id = %client.id, "Client added");
        Ok(client)
    }

    /// Replace a client's fields; `None` when no client has this id
    pub fn update_client(&mut self, id: Uuid, input: ClientInput) -> AppResult<Option<Client>> {
        let input = input.normalized();
        validate_input(&input).map_err(AppError::Validation)?;

        let Some(index) = self.clients.iter().position(|c| c.id == id) else {
            debug!(client_id = %id, "Update skipped: client not found");
            return Ok(None);
        };

        let now = self.clock.now();
        let updated = self.transact(&[StateKey::Clients], |reg| {
            reg.clients[index].apply(input, now);
            Ok(reg.clients[index].clone())
        })?;

        info!(client_id = %id, "Client updated");
        Ok(Some(updated))
    }

    /// Delete a client and every certificate issued to it.
    ///
    /// Returns the number of certificates removed, `None` when no client has
    /// this id.
    pub fn delete_client(&mut self, id: Uuid) -> AppResult<Option<usize>> {
        if self.get_client(id).is_none() {
            return Ok(None);
        }

        let removed = self.transact(&[StateKey::Clients, StateKey::Certificates], |reg| {
            reg.clients.retain(|c| c.id != id);
            let before = reg.certificates.len();
            reg.certificates.retain(|c| c.client_id != id);
            Ok(before - reg.certificates.len())
        })?;

        info!(client_id = %id, certificates_removed = removed, "Client deleted");
        Ok(Some(removed))
    }

    // ========================================================================
    // Certificate mutations
    // ========================================================================

    /// Issue a certificate with the next serial number
    pub fn add_certificate(&mut self, input: CertificateInput) -> AppResult<Certificate> {
        validate_input(&input).map_err(AppError::Validation)?;
        self.ensure_client_exists(input.client_id)?;

        let expiry = input.expiry_date.unwrap_or_else(|| {
            expiry_date(input.issue_date, self.settings.certificates.validity_years)
        });
        self.issue(input.client_id, input.issue_date, expiry, input.technical_notes)
    }

    /// Replace a certificate's fields. The status is recomputed straight away
    /// from the new expiry date. `None` when no certificate has this id.
    pub fn update_certificate(
        &mut self,
        id: Uuid,
        input: CertificateInput,
    ) -> AppResult<Option<Certificate>> {
        validate_input(&input).map_err(AppError::Validation)?;

        let Some(index) = self.certificates.iter().position(|c| c.id == id) else {
            debug!(certificate_id = %id, "Update skipped: certificate not found");
            return Ok(None);
        };
        self.ensure_client_exists(input.client_id)?;

        let expiry = input.expiry_date.unwrap_or_else(|| {
            expiry_date(input.issue_date, self.settings.certificates.validity_years)
        });
        let now = self.clock.now();
        let status = self.status_for(expiry);

        let updated = self.transact(&[StateKey::Certificates], |reg| {
            let cert = &mut reg.certificates[index];
            cert.client_id = input.client_id;
            cert.issue_date = input.issue_date;
            cert.expiry_date = expiry;
            cert.technical_notes = non_blank(input.technical_notes);
            cert.status = status;
            cert.updated_at = now;
            Ok(cert.clone())
        })?;

        info!(certificate_id = %id, "Certificate updated");
        Ok(Some(updated))
    }

    /// Delete one certificate; `false` when no certificate has this id
    pub fn delete_certificate(&mut self, id: Uuid) -> AppResult<bool> {
        if self.get_certificate(id).is_none() {
            return Ok(false);
        }

        self.transact(&[StateKey::Certificates], |reg| {
            reg.certificates.retain(|c| c.id != id);
            Ok(())
        })?;

        info!(certificate_id = %id, "Certificate deleted");
        Ok(true)
    }

    /// Issue a fresh certificate for the same client, valid from today.
    ///
    /// The original certificate is left untouched. `None` when no certificate
    /// has this id; a validation error when its client is gone.
    pub fn renew_certificate(&mut self, id: Uuid) -> AppResult<Option<Certificate>> {
        let Some(original) = self.get_certificate(id).cloned() else {
            return Ok(None);
        };
        self.ensure_client_exists(original.client_id)?;

        let today = self.clock.today();
        let expiry = expiry_date(today, self.settings.certificates.validity_years);
        let renewed = self.issue(original.client_id, today, expiry, original.technical_notes)?;

        info!(
            original = %original.serial_number,
            renewed = %renewed.serial_number,
            "Certificate renewed"
        );
        Ok(Some(renewed))
    }

    fn issue(
        &mut self,
        client_id: Uuid,
        issue_date: NaiveDate,
        expiry: NaiveDate,
        technical_notes: Option<String>,
    ) -> AppResult<Certificate> {
        let now = self.clock.now();
        let certificate = Certificate {
            id: Uuid::new_v4(),
            serial_number: format_serial(self.next_serial),
            client_id,
            issue_date,
            expiry_date: expiry,
            technical_notes: non_blank(technical_notes),
            status: self.status_for(expiry),
            created_at: now,
            updated_at: now,
        };

        self.transact(&[StateKey::Certificates, StateKey::CertCounter], |reg| {
            reg.certificates.push(certificate.clone());
            reg.next_serial += 1;
            Ok(())
        })?;

        info!(
            certificate_id = %certificate.id,
            serial = %certificate.serial_number,
            "Certificate issued"
        );
        Ok(certificate)
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Apply the settings page. A new password is hashed before storing;
    /// changed alert thresholds reclassify every certificate.
    pub fn update_settings(&mut self, input: SettingsInput) -> AppResult<Settings> {
        validate_input(&input).map_err(AppError::Validation)?;

        let password_hash = match input.new_password.as_deref() {
            Some(password) => session::hash_password(password, self.bcrypt_cost)?,
            None => self.settings.auth.password_hash.clone(),
        };

        let mut alert_days = input.alert_days;
        alert_days.sort_unstable();
        alert_days.dedup();

        let settings = Settings {
            company: input.company,
            auth: shared::AuthSettings {
                username: input.username.trim().to_string(),
                password_hash,
                session_timeout_secs: input.session_timeout_secs,
            },
            certificates: shared::CertificatePolicy {
                validity_years: input.validity_years,
                alert_days,
            },
        };

        self.transact(&[StateKey::Settings], |reg| {
            reg.settings = settings;
            Ok(())
        })?;

        info!("Settings updated");
        Ok(self.settings.clone())
    }

    // ========================================================================
    // Status and statistics
    // ========================================================================

    /// Status of a certificate expiring on `expiry`, as of today
    pub fn status_for(&self, expiry: NaiveDate) -> CertificateStatus {
        classify_status(expiry, &self.settings.certificates.alert_days, self.clock.today())
    }

    /// Reclassify every certificate; returns how many changed
    fn recompute_statuses(&mut self) -> usize {
        let today = self.clock.today();
        let alert_days = self.settings.certificates.alert_days.clone();
        let mut changed = 0;
        for cert in &mut self.certificates {
            let status = classify_status(cert.expiry_date, &alert_days, today);
            if cert.status != status {
                cert.status = status;
                changed += 1;
            }
        }
        changed
    }

    /// Periodic pass: reclassify and persist if anything changed
    pub fn refresh_statuses(&mut self) -> AppResult<usize> {
        let snapshot = self.snapshot();
        let changed = self.recompute_statuses();
        if changed > 0 {
            if let Err(e) = self.persist(&[StateKey::Certificates]) {
                self.restore(snapshot);
                return Err(e);
            }
            info!(changed, "Certificate statuses refreshed");
        }
        self.refresh_stats();
        Ok(changed)
    }

    fn refresh_stats(&mut self) {
        self.stats = DashboardStats::compute(self.clients.len(), &self.certificates, self.clock.today());
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn ensure_client_exists(&self, client_id: Uuid) -> AppResult<()> {
        if self.get_client(client_id).is_none() {
            return Err(AppError::invalid(
                "client_id",
                "not_found",
                "El cliente seleccionado no existe",
            ));
        }
        Ok(())
    }

    /// Run `op`, reclassify, persist `keys`; undo everything if any step fails
    fn transact<R>(
        &mut self,
        keys: &[StateKey],
        op: impl FnOnce(&mut Self) -> AppResult<R>,
    ) -> AppResult<R> {
        let snapshot = self.snapshot();

        let outcome = op(self).and_then(|value| {
            let mut keys = keys.to_vec();
            if self.recompute_statuses() > 0 && !keys.contains(&StateKey::Certificates) {
                keys.push(StateKey::Certificates);
            }
            self.persist(&keys)?;
            Ok(value)
        });

        match outcome {
            Ok(value) => {
                self.refresh_stats();
                Ok(value)
            }
            Err(e) => {
                self.restore(snapshot);
                // documents written before the failure now disagree with memory
                if let Err(rewrite) = self.persist(keys) {
                    warn!(error = %rewrite, "Could not rewrite state after a failed mutation");
                }
                Err(e)
            }
        }
    }

    fn persist(&self, keys: &[StateKey]) -> AppResult<()> {
        let storage = self.storage.as_ref();
        for key in keys {
            match key {
                StateKey::Clients => storage::save(storage, *key, &self.clients)?,
                StateKey::Certificates => storage::save(storage, *key, &self.certificates)?,
                StateKey::Settings => storage::save(storage, *key, &self.settings)?,
                StateKey::CertCounter => storage::save(storage, *key, &self.next_serial)?,
                StateKey::Session => {}
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            clients: self.clients.clone(),
            certificates: self.certificates.clone(),
            settings: self.settings.clone(),
            next_serial: self.next_serial,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.clients = snapshot.clients;
        self.certificates = snapshot.certificates;
        self.settings = snapshot.settings;
        self.next_serial = snapshot.next_serial;
        self.refresh_stats();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
