use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::allocation::directory::{
    DirectoryError, InMemoryStaffDirectory, UserDirectory, WorkloadLedger,
};
use crate::workflows::allocation::domain::{
    AccommodationService, Assessment, Crn, PlacementApplication, PlacementRequest, Qualification,
    RiskTier, StaffRole, StaffUser, StaffUserId, WorkItemKind,
};
use crate::workflows::allocation::engine::AllocationEngine;
use crate::workflows::allocation::repository::{
    AllocationRecord, AllocationRepository, RepositoryError,
};
use crate::workflows::allocation::rules::{AllocationRule, RuleOutcome};
use crate::workflows::allocation::service::CaseAllocationService;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 4).expect("valid date")
}

pub(super) fn staff(id: u64, username: &str) -> StaffUser {
    StaffUser {
        id: StaffUserId(id),
        username: username.to_string(),
        name: format!("Staff Member {id}"),
        active: true,
        roles: BTreeSet::new(),
        qualifications: BTreeSet::new(),
    }
}

pub(super) fn with_role(mut user: StaffUser, role: StaffRole) -> StaffUser {
    user.roles.insert(role);
    user
}

pub(super) fn with_qualification(mut user: StaffUser, qualification: Qualification) -> StaffUser {
    user.qualifications.insert(qualification);
    user
}

pub(super) fn deactivated(mut user: StaffUser) -> StaffUser {
    user.active = false;
    user
}

pub(super) fn directory() -> Arc<InMemoryStaffDirectory> {
    Arc::new(InMemoryStaffDirectory::with_today(today()))
}

pub(super) fn assessment(crn: &str) -> Assessment {
    Assessment {
        crn: Crn(crn.to_string()),
        service: AccommodationService::ApprovedPremises,
        required_qualifications: BTreeSet::new(),
        emergency: false,
        received_on: today(),
    }
}

pub(super) fn placement_request(crn: &str) -> PlacementRequest {
    PlacementRequest {
        crn: Crn(crn.to_string()),
        tier: RiskTier::B,
        required_qualifications: BTreeSet::new(),
        expected_arrival: today() + chrono::Duration::days(14),
    }
}

pub(super) fn placement_application(crn: &str) -> PlacementApplication {
    PlacementApplication {
        crn: Crn(crn.to_string()),
        service: AccommodationService::ApprovedPremises,
        required_qualifications: BTreeSet::new(),
        submitted_on: today(),
    }
}

/// Rule that always answers with a canned outcome and counts how often it
/// was consulted, optionally appending its name to a shared order log.
pub(super) struct ScriptedRule {
    name: &'static str,
    priority: u16,
    outcome: RuleOutcome,
    invocations: AtomicUsize,
    order_log: Option<Arc<Mutex<Vec<&'static str>>>>,
}

impl ScriptedRule {
    pub(super) fn new(name: &'static str, priority: u16, outcome: RuleOutcome) -> Arc<Self> {
        Arc::new(Self {
            name,
            priority,
            outcome,
            invocations: AtomicUsize::new(0),
            order_log: None,
        })
    }

    pub(super) fn logged(
        name: &'static str,
        priority: u16,
        outcome: RuleOutcome,
        order_log: Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            priority,
            outcome,
            invocations: AtomicUsize::new(0),
            order_log: Some(order_log),
        })
    }

    pub(super) fn invocations(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }

    fn fire(&self) -> RuleOutcome {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        if let Some(log) = &self.order_log {
            log.lock().expect("order log mutex poisoned").push(self.name);
        }
        self.outcome.clone()
    }
}

impl AllocationRule for ScriptedRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn evaluate_assessment(&self, _assessment: &Assessment) -> RuleOutcome {
        self.fire()
    }

    fn evaluate_placement_request(&self, _request: &PlacementRequest) -> RuleOutcome {
        self.fire()
    }

    fn evaluate_placement_application(&self, _application: &PlacementApplication) -> RuleOutcome {
        self.fire()
    }
}

pub(super) fn rules(scripted: Vec<Arc<ScriptedRule>>) -> Vec<Arc<dyn AllocationRule>> {
    scripted
        .into_iter()
        .map(|rule| rule as Arc<dyn AllocationRule>)
        .collect()
}

pub(super) fn engine(
    directory: Arc<InMemoryStaffDirectory>,
    rules: Vec<Arc<dyn AllocationRule>>,
) -> AllocationEngine<InMemoryStaffDirectory> {
    AllocationEngine::new(directory, rules)
}

pub(super) fn build_service(
    directory: Arc<InMemoryStaffDirectory>,
    rules: Vec<Arc<dyn AllocationRule>>,
) -> (
    CaseAllocationService<InMemoryStaffDirectory, MemoryAllocationRepository>,
    Arc<MemoryAllocationRepository>,
) {
    let repository = Arc::new(MemoryAllocationRepository::default());
    let service = CaseAllocationService::new(directory, repository.clone(), rules);
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryAllocationRepository {
    records: Arc<Mutex<Vec<AllocationRecord>>>,
}

impl MemoryAllocationRepository {
    pub(super) fn records(&self) -> Vec<AllocationRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl AllocationRepository for MemoryAllocationRepository {
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

pub(super) struct UnavailableRepository;

impl AllocationRepository for UnavailableRepository {
    fn insert(&self, _record: AllocationRecord) -> Result<AllocationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_case(&self, _crn: &Crn) -> Result<Vec<AllocationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineDirectory;

fn offline<T>() -> Result<T, DirectoryError> {
    Err(DirectoryError::Unavailable("directory offline".to_string()))
}

impl UserDirectory for OfflineDirectory {
    fn find_by_username(&self, _username: &str) -> Result<Option<StaffUser>, DirectoryError> {
        offline()
    }

    fn active_users_with_qualification(
        &self,
        _qualification: Qualification,
    ) -> Result<Vec<StaffUserId>, DirectoryError> {
        offline()
    }

    fn active_users_with_role(
        &self,
        _role: StaffRole,
    ) -> Result<Vec<StaffUserId>, DirectoryError> {
        offline()
    }

    fn least_loaded_for_assessments(
        &self,
        _candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        offline()
    }

    fn least_loaded_for_placement_requests(
        &self,
        _candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        offline()
    }

    fn least_loaded_for_placement_applications(
        &self,
        _candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        offline()
    }
}

impl WorkloadLedger for OfflineDirectory {
    fn record_assignment(
        &self,
        _user: StaffUserId,
        _kind: WorkItemKind,
    ) -> Result<(), DirectoryError> {
        offline()
    }

    fn complete_assignment(
        &self,
        _user: StaffUserId,
        _kind: WorkItemKind,
        _completed_on: NaiveDate,
    ) -> Result<(), DirectoryError> {
        offline()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
