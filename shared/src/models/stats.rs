//! Dashboard aggregate statistics

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::is_same_month;
use crate::models::{Certificate, CertificateStatus};

/// Aggregate counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub issued_this_month: usize,
    pub issued_this_year: usize,
    /// Same as `near_expiry`
    pub upcoming_renewals: usize,
    pub current: usize,
    pub near_expiry: usize,
    pub expired: usize,
}

impl DashboardStats {
    /// Recompute from scratch. Status counts read each certificate's cached
    /// status, so callers refresh statuses first.
    pub fn compute(total_clients: usize, certificates: &[Certificate], today: NaiveDate) -> Self {
        let mut stats = Self {
            total_clients,
            ..Default::default()
        };

        for cert in certificates {
            if cert.issue_date.year() == today.year() {
                stats.issued_this_year += 1;
                if is_same_month(cert.issue_date, today) {
                    stats.issued_this_month += 1;
                }
            }
            match cert.status {
                CertificateStatus::Current => stats.current += 1,
                CertificateStatus::NearExpiry => stats.near_expiry += 1,
                CertificateStatus::Expired => stats.expired += 1,
            }
        }

        stats.upcoming_renewals = stats.near_expiry;
        stats
    }

    pub fn count_for(&self, status: CertificateStatus) -> usize {
        match status {
            CertificateStatus::Current => self.current,
            CertificateStatus::NearExpiry => self.near_expiry,
            CertificateStatus::Expired => self.expired,
        }
    }
}
