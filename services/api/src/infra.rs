use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use casework::workflows::allocation::{
    AllocationRecord, AllocationRepository, Crn, Qualification, RepositoryError, StaffRole,
    StaffUser, StaffUserId,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAllocationRepository {
    records: Arc<Mutex<Vec<AllocationRecord>>>,
}

impl AllocationRepository for InMemoryAllocationRepository {
    fn insert(&self, record: AllocationRecord) -> Result<AllocationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn for_case(&self, crn: &Crn) -> Result<Vec<AllocationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.crn == crn)
            .cloned()
            .collect())
    }
}

/// Small built-in roster so the service and demo run without a CSV export.
pub(crate) fn sample_roster() -> Vec<StaffUser> {
    vec![
        roster_member(1, "aharte", "Aisha Harte", &[StaffRole::Assessor], &[]),
        roster_member(
            2,
            "bvine",
            "Billie Vine",
            &[StaffRole::Assessor],
            &[Qualification::Pipe],
        ),
        roster_member(3, "cmoss", "Casey Moss", &[StaffRole::Matcher], &[]),
        roster_member(
            4,
            "dlowe",
            "Dana Lowe",
            &[StaffRole::CaseManager],
            &[Qualification::Esap],
        ),
        roster_member(
            5,
            "fpatel",
            "Farah Patel",
            &[StaffRole::Assessor, StaffRole::Matcher],
            &[Qualification::Emergency],
        ),
    ]
}

fn roster_member(
    id: u64,
    username: &str,
    name: &str,
    roles: &[StaffRole],
    qualifications: &[Qualification],
) -> StaffUser {
    StaffUser {
        id: StaffUserId(id),
        username: username.to_string(),
        name: name.to_string(),
        active: true,
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        qualifications: qualifications.iter().copied().collect::<BTreeSet<_>>(),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
