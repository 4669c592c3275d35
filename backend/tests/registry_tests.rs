//! Certificate registry tests
//!
//! Covers client and certificate lifecycle, renewal, status classification,
//! statistics freshness, and persistence recovery.

mod common;

use std::sync::Arc;

use chrono::{Days, Duration};
use gascert::services::session::verify_password;
use gascert::{AppError, CertificateRegistry, MemoryStorage, StateKey, Storage};
use proptest::prelude::*;
use shared::{
    expiry_date, parse_serial, CertificateFilter, CertificateInput, CertificateStatus,
    CompanyInfo, DashboardStats, SettingsInput,
};

use common::*;

fn fresh_stats(registry: &CertificateRegistry) -> DashboardStats {
    let today = start_time().date_naive();
    DashboardStats::compute(registry.clients().len(), registry.certificates(), today)
}

fn settings_input(alert_days: Vec<u32>, new_password: Option<&str>) -> SettingsInput {
    SettingsInput {
        company: CompanyInfo::default(),
        username: "gestion".to_string(),
        new_password: new_password.map(str::to_string),
        session_timeout_secs: 1800,
        validity_years: 5,
        alert_days,
    }
}

// ============================================================================
// Client Lifecycle
// ============================================================================

#[cfg(test)]
mod client_tests {
    use super::*;

    #[test]
    fn test_add_client_assigns_id_and_persists() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("  Ana López  ")).unwrap();

        assert_eq!(client.name, "Ana López");
        assert_eq!(client.created_at, start_time());
        assert_eq!(fx.registry.clients().len(), 1);

        let reloaded = fx.reload();
        assert_eq!(reloaded.get_client(client.id), Some(&client));
    }

    #[test]
    fn test_add_client_rejects_invalid_fields() {
        let mut fx = fixture();
        let mut input = client_input("");
        input.phone = "12345".to_string();
        input.email = "no-at-sign".to_string();

        let fields = match fx.registry.add_client(input).unwrap_err() {
            AppError::Validation(fields) => fields,
            other => panic!("expected validation error, got {:?}", other),
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["email", "name", "phone"]);
        assert!(fx.registry.clients().is_empty());
    }

    #[test]
    fn test_update_client_keeps_identity() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        fx.clock.advance(Duration::hours(1));

        let mut input = client_input("Ana María");
        input.dni = Some("12345678Z".to_string());
        let updated = fx.registry.update_client(client.id, input).unwrap().unwrap();

        assert_eq!(updated.id, client.id);
        assert_eq!(updated.created_at, client.created_at);
        assert_eq!(updated.updated_at, start_time() + Duration::hours(1));
        assert_eq!(updated.dni.as_deref(), Some("12345678Z"));
    }

    #[test]
    fn test_update_missing_client_returns_none() {
        let mut fx = fixture();
        let result = fx
            .registry
            .update_client(uuid::Uuid::new_v4(), client_input("Nadie"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_client_cascades_to_its_certificates_only() {
        let mut fx = fixture();
        let ana = fx.registry.add_client(client_input("Ana")).unwrap();
        let luis = fx.registry.add_client(client_input("Luis")).unwrap();
        let today = start_time().date_naive();

        fx.registry.add_certificate(certificate_input(ana.id, today)).unwrap();
        fx.registry.add_certificate(certificate_input(ana.id, today)).unwrap();
        let kept = fx.registry.add_certificate(certificate_input(luis.id, today)).unwrap();

        let removed = fx.registry.delete_client(ana.id).unwrap();
        assert_eq!(removed, Some(2));
        assert_eq!(fx.registry.certificates().len(), 1);
        assert_eq!(fx.registry.certificates()[0].id, kept.id);

        assert_eq!(fx.registry.delete_client(ana.id).unwrap(), None);
    }

    #[test]
    fn test_list_clients_search_and_order() {
        let mut fx = fixture();
        fx.registry.add_client(client_input("zoe")).unwrap();
        fx.registry.add_client(client_input("Ana")).unwrap();
        let mut other = client_input("Bea");
        other.phone = "911222333".to_string();
        fx.registry.add_client(other).unwrap();

        let all: Vec<String> = fx
            .registry
            .list_clients(None)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(all, vec!["Ana", "Bea", "zoe"]);

        let by_phone = fx.registry.list_clients(Some("9112"));
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].name, "Bea");
    }
}

// ============================================================================
// Certificate Lifecycle
// ============================================================================

#[cfg(test)]
mod certificate_tests {
    use super::*;

    #[test]
    fn test_first_certificate_gets_first_serial_and_default_validity() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let issue = date(2024, 5, 1);

        let cert = fx.registry.add_certificate(certificate_input(client.id, issue)).unwrap();

        assert_eq!(cert.serial_number, "CERT-1001");
        assert_eq!(cert.expiry_date, date(2029, 5, 1));
        assert_eq!(cert.status, CertificateStatus::Current);
        assert_eq!(fx.registry.next_serial(), 1002);
    }

    #[test]
    fn test_serials_are_sequential() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();

        let serials: Vec<String> = (0..3)
            .map(|_| {
                fx.registry
                    .add_certificate(certificate_input(client.id, today))
                    .unwrap()
                    .serial_number
            })
            .collect();
        assert_eq!(serials, vec!["CERT-1001", "CERT-1002", "CERT-1003"]);
    }

    #[test]
    fn test_certificate_for_unknown_client_is_rejected() {
        let mut fx = fixture();
        let err = fx
            .registry
            .add_certificate(certificate_input(uuid::Uuid::new_v4(), date(2024, 5, 1)))
            .unwrap_err();

        match err {
            AppError::Validation(fields) => assert_eq!(fields[0].field, "client_id"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(fx.registry.next_serial(), 1001);
    }

    #[test]
    fn test_expiry_before_issue_is_rejected() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let mut input = certificate_input(client.id, date(2024, 5, 1));
        input.expiry_date = Some(date(2024, 4, 1));

        match fx.registry.add_certificate(input).unwrap_err() {
            AppError::Validation(fields) => {
                assert_eq!(fields[0].field, "expiry_date");
                assert_eq!(fields[0].code, "expiry_before_issue");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_classification_with_default_thresholds() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();

        let mut issue = |expiry: chrono::NaiveDate| {
            let input = CertificateInput {
                client_id: client.id,
                issue_date: date(2019, 1, 1),
                expiry_date: Some(expiry),
                technical_notes: None,
            };
            fx.registry.add_certificate(input).unwrap().status
        };

        assert_eq!(issue(today + Days::new(45)), CertificateStatus::NearExpiry);
        assert_eq!(issue(today + Days::new(200)), CertificateStatus::Current);
        assert_eq!(issue(today - Days::new(5)), CertificateStatus::Expired);
        assert_eq!(issue(today), CertificateStatus::Expired);
        assert_eq!(issue(today + Days::new(90)), CertificateStatus::NearExpiry);
        assert_eq!(issue(today + Days::new(91)), CertificateStatus::Current);
    }

    #[test]
    fn test_update_certificate_recomputes_status_immediately() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();
        let cert = fx
            .registry
            .add_certificate(certificate_input(client.id, today))
            .unwrap();
        assert_eq!(cert.status, CertificateStatus::Current);

        let input = CertificateInput {
            client_id: client.id,
            issue_date: date(2019, 6, 1),
            expiry_date: Some(today + Days::new(10)),
            technical_notes: Some("  Revisar llave de paso  ".to_string()),
        };
        let updated = fx.registry.update_certificate(cert.id, input).unwrap().unwrap();

        assert_eq!(updated.status, CertificateStatus::NearExpiry);
        assert_eq!(updated.serial_number, cert.serial_number);
        assert_eq!(updated.technical_notes.as_deref(), Some("Revisar llave de paso"));
        assert_eq!(fx.registry.stats().near_expiry, 1);
    }

    #[test]
    fn test_delete_certificate() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let cert = fx
            .registry
            .add_certificate(certificate_input(client.id, date(2024, 5, 1)))
            .unwrap();

        assert!(fx.registry.delete_certificate(cert.id).unwrap());
        assert!(!fx.registry.delete_certificate(cert.id).unwrap());
        assert!(fx.registry.certificates().is_empty());
        // serials are never reused
        assert_eq!(fx.registry.next_serial(), 1002);
    }

    #[test]
    fn test_renew_creates_new_certificate_and_keeps_original() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let mut input = certificate_input(client.id, date(2019, 6, 1));
        input.technical_notes = Some("Caldera revisada".to_string());
        let original = fx.registry.add_certificate(input).unwrap();
        assert_eq!(original.status, CertificateStatus::NearExpiry);

        let renewed = fx.registry.renew_certificate(original.id).unwrap().unwrap();
        let today = start_time().date_naive();

        assert_ne!(renewed.id, original.id);
        assert!(parse_serial(&renewed.serial_number) > parse_serial(&original.serial_number));
        assert_eq!(renewed.client_id, original.client_id);
        assert_eq!(renewed.issue_date, today);
        assert_eq!(renewed.expiry_date, expiry_date(today, 5));
        assert_eq!(renewed.status, CertificateStatus::Current);
        assert_eq!(fx.registry.get_certificate(original.id), Some(&original));
        assert_eq!(fx.registry.certificates().len(), 2);
    }

    #[test]
    fn test_renew_missing_certificate_issues_nothing() {
        let mut fx = fixture();
        let result = fx.registry.renew_certificate(uuid::Uuid::new_v4()).unwrap();
        assert!(result.is_none());
        assert!(fx.registry.certificates().is_empty());
        assert_eq!(fx.registry.next_serial(), 1001);
    }

    #[test]
    fn test_list_certificates_filters_and_sorts() {
        let mut fx = fixture();
        let ana = fx.registry.add_client(client_input("Ana")).unwrap();
        let luis = fx.registry.add_client(client_input("Luis")).unwrap();

        fx.registry.add_certificate(certificate_input(ana.id, date(2019, 7, 1))).unwrap();
        fx.registry.add_certificate(certificate_input(luis.id, date(2024, 3, 1))).unwrap();
        fx.registry.add_certificate(certificate_input(ana.id, date(2022, 7, 1))).unwrap();

        let all = fx.registry.list_certificates(&CertificateFilter::default());
        let issued: Vec<_> = all.iter().map(|l| l.certificate.issue_date).collect();
        assert_eq!(issued, vec![date(2024, 3, 1), date(2022, 7, 1), date(2019, 7, 1)]);
        assert_eq!(all[0].client_name.as_deref(), Some("Luis"));

        let by_name = fx.registry.list_certificates(&CertificateFilter {
            status: None,
            search: Some("ana".to_string()),
        });
        assert_eq!(by_name.len(), 2);

        let by_serial = fx.registry.list_certificates(&CertificateFilter {
            status: None,
            search: Some("cert-1002".to_string()),
        });
        assert_eq!(by_serial.len(), 1);

        let near = fx.registry.list_certificates(&CertificateFilter {
            status: Some(CertificateStatus::NearExpiry),
            search: None,
        });
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].certificate.issue_date, date(2019, 7, 1));
        assert!(near[0].days_remaining > 0 && near[0].days_remaining <= 90);
    }

    #[test]
    fn test_upcoming_renewals_soonest_first() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();

        for days in [80, 20, 50] {
            let input = CertificateInput {
                client_id: client.id,
                issue_date: date(2019, 1, 1),
                expiry_date: Some(today + Days::new(days)),
                technical_notes: None,
            };
            fx.registry.add_certificate(input).unwrap();
        }
        fx.registry.add_certificate(certificate_input(client.id, today)).unwrap();

        let upcoming = fx.registry.upcoming_renewals(2);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].expiry_date, today + Days::new(20));
        assert_eq!(upcoming[1].expiry_date, today + Days::new(50));
    }

    #[test]
    fn test_monthly_issuance_covers_recent_months() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        for issue in [date(2024, 5, 2), date(2024, 5, 15), date(2024, 3, 9), date(2023, 1, 1)] {
            fx.registry.add_certificate(certificate_input(client.id, issue)).unwrap();
        }

        let months = fx.registry.monthly_issuance(3);
        let summary: Vec<(u32, usize)> = months.iter().map(|m| (m.month, m.count)).collect();
        assert_eq!(summary, vec![(3, 1), (4, 0), (5, 2)]);
        assert_eq!(months[2].label, "mayo");
    }
}

// ============================================================================
// Status Refresh and Statistics
// ============================================================================

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_refresh_statuses_follows_the_calendar() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();
        let input = CertificateInput {
            client_id: client.id,
            issue_date: date(2019, 1, 1),
            expiry_date: Some(today + Days::new(100)),
            technical_notes: None,
        };
        let cert = fx.registry.add_certificate(input).unwrap();
        assert_eq!(cert.status, CertificateStatus::Current);

        assert_eq!(fx.registry.refresh_statuses().unwrap(), 0);

        fx.clock.advance(Duration::days(15));
        assert_eq!(fx.registry.refresh_statuses().unwrap(), 1);
        assert_eq!(
            fx.registry.get_certificate(cert.id).unwrap().status,
            CertificateStatus::NearExpiry
        );

        fx.clock.advance(Duration::days(85));
        assert_eq!(fx.registry.refresh_statuses().unwrap(), 1);
        assert_eq!(fx.registry.stats().expired, 1);

        // the change was written, not only kept in memory
        let stored = fx.storage.read(StateKey::Certificates).unwrap().unwrap();
        assert!(stored.contains("\"expired\""));
    }

    #[test]
    fn test_alert_threshold_change_reclassifies() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();
        let input = CertificateInput {
            client_id: client.id,
            issue_date: date(2019, 1, 1),
            expiry_date: Some(today + Days::new(45)),
            technical_notes: None,
        };
        let cert = fx.registry.add_certificate(input).unwrap();
        assert_eq!(cert.status, CertificateStatus::NearExpiry);

        fx.registry.update_settings(settings_input(vec![15, 30], None)).unwrap();

        assert_eq!(
            fx.registry.get_certificate(cert.id).unwrap().status,
            CertificateStatus::Current
        );
        assert_eq!(fx.registry.stats().near_expiry, 0);
    }

    #[test]
    fn test_stats_track_every_mutation() {
        let mut fx = fixture();
        let today = start_time().date_naive();

        let ana = fx.registry.add_client(client_input("Ana")).unwrap();
        assert_eq!(fx.registry.stats(), fresh_stats(&fx.registry));

        let cert = fx.registry.add_certificate(certificate_input(ana.id, today)).unwrap();
        fx.registry.add_certificate(certificate_input(ana.id, date(2019, 6, 1))).unwrap();
        assert_eq!(fx.registry.stats(), fresh_stats(&fx.registry));
        assert_eq!(fx.registry.stats().issued_this_month, 1);

        fx.registry.renew_certificate(cert.id).unwrap();
        assert_eq!(fx.registry.stats(), fresh_stats(&fx.registry));

        fx.registry.delete_certificate(cert.id).unwrap();
        assert_eq!(fx.registry.stats(), fresh_stats(&fx.registry));

        fx.registry.delete_client(ana.id).unwrap();
        assert_eq!(fx.registry.stats(), DashboardStats::default());
    }
}

// ============================================================================
// Settings
// ============================================================================

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn test_default_settings_are_created_with_hashed_password() {
        let fx = fixture();
        let settings = fx.registry.settings();

        assert_eq!(settings.company.name, "Revisiones Gas Pro");
        assert_eq!(settings.auth.username, "gestion");
        assert_eq!(settings.certificates.alert_days, vec![30, 60, 90]);
        assert_ne!(settings.auth.password_hash, PASSWORD);
        assert!(verify_password(PASSWORD, &settings.auth.password_hash).unwrap());
        assert!(fx.storage.read(StateKey::Settings).unwrap().is_some());
    }

    #[test]
    fn test_update_settings_changes_password_only_when_given() {
        let mut fx = fixture();
        let before = fx.registry.settings().auth.password_hash.clone();

        fx.registry
            .update_settings(settings_input(vec![90, 30, 30], None))
            .unwrap();
        assert_eq!(fx.registry.settings().auth.password_hash, before);
        assert_eq!(fx.registry.settings().certificates.alert_days, vec![30, 90]);

        fx.registry
            .update_settings(settings_input(vec![30], Some("nueva-clave")))
            .unwrap();
        let hash = &fx.registry.settings().auth.password_hash;
        assert!(verify_password("nueva-clave", hash).unwrap());
        assert!(!verify_password(PASSWORD, hash).unwrap());
    }

    #[test]
    fn test_update_settings_validation() {
        let mut fx = fixture();
        let mut input = settings_input(vec![], Some("corta"));
        input.company.name = " ".to_string();

        match fx.registry.update_settings(input).unwrap_err() {
            AppError::Validation(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["alert_days", "company.name", "new_password"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

// ============================================================================
// Persistence
// ============================================================================

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        fx.registry
            .add_certificate(certificate_input(client.id, date(2024, 5, 1)))
            .unwrap();
        let clients_before = fx.registry.clients().to_vec();
        let certs_before = fx.registry.certificates().to_vec();
        let stats_before = fx.registry.stats();

        fx.storage.set_fail_writes(true);

        let err = fx.registry.add_client(client_input("Luis")).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        let err = fx
            .registry
            .add_certificate(certificate_input(client.id, date(2024, 5, 2)))
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(fx.registry.delete_client(client.id).is_err());

        assert_eq!(fx.registry.clients(), clients_before.as_slice());
        assert_eq!(fx.registry.certificates(), certs_before.as_slice());
        assert_eq!(fx.registry.stats(), stats_before);
        assert_eq!(fx.registry.next_serial(), 1002);

        fx.storage.set_fail_writes(false);
        let cert = fx
            .registry
            .add_certificate(certificate_input(client.id, date(2024, 5, 2)))
            .unwrap();
        assert_eq!(cert.serial_number, "CERT-1002");
    }

    #[test]
    fn test_reload_restores_everything() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let cert = fx
            .registry
            .add_certificate(certificate_input(client.id, date(2024, 5, 1)))
            .unwrap();

        let reloaded = fx.reload();
        assert_eq!(reloaded.clients(), fx.registry.clients());
        assert_eq!(reloaded.get_certificate(cert.id), Some(&cert));
        assert_eq!(reloaded.next_serial(), 1002);
        assert_eq!(reloaded.settings(), fx.registry.settings());
    }

    #[test]
    fn test_counter_never_behind_existing_serials() {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        for _ in 0..3 {
            fx.registry
                .add_certificate(certificate_input(client.id, date(2024, 5, 1)))
                .unwrap();
        }

        // a stale counter file must not cause serials to repeat
        fx.storage.write(StateKey::CertCounter, "1001").unwrap();
        let reloaded = fx.reload();
        assert_eq!(reloaded.next_serial(), 1004);
    }

    #[test]
    fn test_malformed_documents_fall_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(StateKey::Clients, "[{\"broken\": ").unwrap();
        storage.write(StateKey::Settings, "not json").unwrap();

        let clock = Arc::new(gascert::ManualClock::new(start_time()));
        let registry = CertificateRegistry::load(storage.clone(), clock, options(true)).unwrap();

        assert!(registry.clients().is_empty());
        assert_eq!(registry.settings().auth.username, "gestion");
        assert_eq!(
            storage.quarantined(StateKey::Clients).as_deref(),
            Some("[{\"broken\": ")
        );
        assert_eq!(storage.quarantined(StateKey::Settings).as_deref(), Some("not json"));
        // fresh documents were written in place of the broken ones
        assert_eq!(storage.read(StateKey::Clients).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_certificates_without_client_are_dropped_on_load() {
        let mut fx = fixture();
        let ana = fx.registry.add_client(client_input("Ana")).unwrap();
        let lost = fx
            .registry
            .add_certificate(certificate_input(ana.id, date(2024, 5, 1)))
            .unwrap();

        fx.storage.write(StateKey::Clients, "{broken").unwrap();
        let mut reloaded = fx.reload();

        assert!(reloaded.clients().is_empty());
        assert!(reloaded.certificates().is_empty());
        assert_eq!(reloaded.stats(), DashboardStats::default());
        assert_eq!(fx.storage.read(StateKey::Certificates).unwrap().as_deref(), Some("[]"));
        // the serial stays burned even though its certificate is gone
        assert_eq!(reloaded.next_serial(), 1002);
        assert!(reloaded.renew_certificate(lost.id).unwrap().is_none());
    }

    #[test]
    fn test_sample_data_seeded_on_first_start() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(gascert::ManualClock::new(start_time()));
        let registry =
            CertificateRegistry::load(storage.clone(), clock.clone(), options(true)).unwrap();

        assert_eq!(registry.clients().len(), 1);
        assert_eq!(registry.certificates().len(), 1);
        assert_eq!(registry.certificates()[0].serial_number, "CERT-1001");
        assert_eq!(registry.certificates()[0].client_id, registry.clients()[0].id);
        assert_eq!(registry.next_serial(), 1002);

        // second start reads the stored data instead of seeding again
        let again = CertificateRegistry::load(storage, clock, options(true)).unwrap();
        assert_eq!(again.clients(), registry.clients());
        assert_eq!(again.next_serial(), 1002);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Deleting a client removes exactly the certificates that reference it
    #[test]
    fn prop_delete_client_removes_only_its_certificates(
        owners in prop::collection::vec(0usize..4, 0..20),
        victim in 0usize..4,
    ) {
        let mut fx = fixture();
        let clients: Vec<_> = (0..4)
            .map(|i| fx.registry.add_client(client_input(&format!("Cliente {}", i))).unwrap())
            .collect();
        for owner in &owners {
            fx.registry
                .add_certificate(certificate_input(clients[*owner].id, date(2023, 1, 1)))
                .unwrap();
        }

        let victim_id = clients[victim].id;
        let expected_removed = owners.iter().filter(|o| **o == victim).count();
        let survivors: Vec<_> = fx
            .registry
            .certificates()
            .iter()
            .filter(|c| c.client_id != victim_id)
            .map(|c| c.id)
            .collect();

        let removed = fx.registry.delete_client(victim_id).unwrap();

        prop_assert_eq!(removed, Some(expected_removed));
        let remaining: Vec<_> = fx.registry.certificates().iter().map(|c| c.id).collect();
        prop_assert_eq!(remaining, survivors);
        prop_assert_eq!(fx.registry.stats(), fresh_stats(&fx.registry));
    }

    /// Status always matches a fresh classification of the expiry date
    #[test]
    fn prop_issued_status_matches_days_remaining(offset in -400i64..400) {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let today = start_time().date_naive();
        let expiry = today + Duration::days(offset);
        let input = CertificateInput {
            client_id: client.id,
            issue_date: expiry - Duration::days(2000),
            expiry_date: Some(expiry),
            technical_notes: None,
        };

        let cert = fx.registry.add_certificate(input).unwrap();

        let expected = if offset <= 0 {
            CertificateStatus::Expired
        } else if offset <= 90 {
            CertificateStatus::NearExpiry
        } else {
            CertificateStatus::Current
        };
        prop_assert_eq!(cert.status, expected);
    }

    /// Renewal always yields a strictly larger serial
    #[test]
    fn prop_renewal_serial_increases(renewals in 1usize..6) {
        let mut fx = fixture();
        let client = fx.registry.add_client(client_input("Ana")).unwrap();
        let mut current = fx
            .registry
            .add_certificate(certificate_input(client.id, date(2020, 1, 1)))
            .unwrap();

        for _ in 0..renewals {
            let renewed = fx.registry.renew_certificate(current.id).unwrap().unwrap();
            prop_assert!(parse_serial(&renewed.serial_number) > parse_serial(&current.serial_number));
            current = renewed;
        }
        prop_assert_eq!(fx.registry.certificates().len(), renewals + 1);
    }
}
