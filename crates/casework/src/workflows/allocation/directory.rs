use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDate};

use super::domain::{Qualification, StaffRole, StaffUser, StaffUserId, WorkItemKind};

/// Days a completed item keeps counting toward a staff member's workload.
const WORKLOAD_WINDOW_DAYS: i64 = 7;

/// Error enumeration for staff directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("staff directory unavailable: {0}")]
    Unavailable(String),
}

/// Lookup abstraction over whatever system holds the staff register.
pub trait UserDirectory: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<StaffUser>, DirectoryError>;

    fn active_users_with_qualification(
        &self,
        qualification: Qualification,
    ) -> Result<Vec<StaffUserId>, DirectoryError>;

    fn active_users_with_role(&self, role: StaffRole)
        -> Result<Vec<StaffUserId>, DirectoryError>;

    fn least_loaded_for_assessments(
        &self,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError>;

    fn least_loaded_for_placement_requests(
        &self,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError>;

    fn least_loaded_for_placement_applications(
        &self,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError>;
}

/// Write side of workload tracking, fed by the service layer as decisions land.
pub trait WorkloadLedger: Send + Sync {
    fn record_assignment(
        &self,
        user: StaffUserId,
        kind: WorkItemKind,
    ) -> Result<(), DirectoryError>;

    fn complete_assignment(
        &self,
        user: StaffUserId,
        kind: WorkItemKind,
        completed_on: NaiveDate,
    ) -> Result<(), DirectoryError>;
}

#[derive(Debug)]
struct LedgerEntry {
    user: StaffUserId,
    kind: WorkItemKind,
    completed_on: Option<NaiveDate>,
}

#[derive(Default)]
struct DirectoryState {
    staff: BTreeMap<StaffUserId, StaffUser>,
    by_username: HashMap<String, StaffUserId>,
    ledger: Vec<LedgerEntry>,
}

/// Reference directory backed by process memory.
///
/// Workload for a staff member and kind is the number of their pending
/// entries plus entries completed within the trailing window. Ties between
/// equally loaded candidates resolve to the lowest staff id.
#[derive(Default, Clone)]
pub struct InMemoryStaffDirectory {
    state: Arc<Mutex<DirectoryState>>,
    today: Arc<Mutex<Option<NaiveDate>>>,
}

impl InMemoryStaffDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the reference date instead of reading the wall clock.
    pub fn with_today(today: NaiveDate) -> Self {
        let directory = Self::default();
        directory.set_today(today);
        directory
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().expect("directory clock mutex poisoned") = Some(today);
    }

    pub fn register(&self, user: StaffUser) {
        let mut state = self.state.lock().expect("staff directory mutex poisoned");
        state.by_username.insert(user.username.clone(), user.id);
        state.staff.insert(user.id, user);
    }

    pub fn roster(&self) -> Vec<StaffUser> {
        let state = self.state.lock().expect("staff directory mutex poisoned");
        state.staff.values().cloned().collect()
    }

    /// Current workload count for one staff member and work-item kind.
    pub fn workload(&self, user: StaffUserId, kind: WorkItemKind) -> usize {
        let state = self.state.lock().expect("staff directory mutex poisoned");
        count_workload(&state.ledger, user, kind, self.today())
    }

    fn today(&self) -> NaiveDate {
        self.today
            .lock()
            .expect("directory clock mutex poisoned")
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn least_loaded(
        &self,
        kind: WorkItemKind,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        let state = self.state.lock().expect("staff directory mutex poisoned");
        let today = self.today();

        let chosen = candidates
            .iter()
            .filter_map(|id| state.staff.get(id))
            .filter(|user| user.active)
            .map(|user| (count_workload(&state.ledger, user.id, kind, today), user))
            .min_by_key(|(workload, user)| (*workload, user.id))
            .map(|(_, user)| user.clone());

        Ok(chosen)
    }
}

fn count_workload(
    ledger: &[LedgerEntry],
    user: StaffUserId,
    kind: WorkItemKind,
    today: NaiveDate,
) -> usize {
    let cutoff = today - Duration::days(WORKLOAD_WINDOW_DAYS);
    ledger
        .iter()
        .filter(|entry| entry.user == user && entry.kind == kind)
        .filter(|entry| match entry.completed_on {
            None => true,
            Some(completed_on) => completed_on >= cutoff,
        })
        .count()
}

impl UserDirectory for InMemoryStaffDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<StaffUser>, DirectoryError> {
        let state = self.state.lock().expect("staff directory mutex poisoned");
        let found = state
            .by_username
            .get(username)
            .and_then(|id| state.staff.get(id))
            .cloned();
        Ok(found)
    }

    fn active_users_with_qualification(
        &self,
        qualification: Qualification,
    ) -> Result<Vec<StaffUserId>, DirectoryError> {
        let state = self.state.lock().expect("staff directory mutex poisoned");
        Ok(state
            .staff
            .values()
            .filter(|user| user.active && user.qualifications.contains(&qualification))
            .map(|user| user.id)
            .collect())
    }

    fn active_users_with_role(
        &self,
        role: StaffRole,
    ) -> Result<Vec<StaffUserId>, DirectoryError> {
        let state = self.state.lock().expect("staff directory mutex poisoned");
        Ok(state
            .staff
            .values()
            .filter(|user| user.active && user.roles.contains(&role))
            .map(|user| user.id)
            .collect())
    }

    fn least_loaded_for_assessments(
        &self,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        self.least_loaded(WorkItemKind::Assessment, candidates)
    }

    fn least_loaded_for_placement_requests(
        &self,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        self.least_loaded(WorkItemKind::PlacementRequest, candidates)
    }

    fn least_loaded_for_placement_applications(
        &self,
        candidates: &[StaffUserId],
    ) -> Result<Option<StaffUser>, DirectoryError> {
        self.least_loaded(WorkItemKind::PlacementApplication, candidates)
    }
}

impl WorkloadLedger for InMemoryStaffDirectory {
    fn record_assignment(
        &self,
        user: StaffUserId,
        kind: WorkItemKind,
    ) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().expect("staff directory mutex poisoned");
        state.ledger.push(LedgerEntry {
            user,
            kind,
            completed_on: None,
        });
        Ok(())
    }

    fn complete_assignment(
        &self,
        user: StaffUserId,
        kind: WorkItemKind,
        completed_on: NaiveDate,
    ) -> Result<(), DirectoryError> {
        let mut state = self.state.lock().expect("staff directory mutex poisoned");
        if let Some(entry) = state
            .ledger
            .iter_mut()
            .find(|entry| entry.user == user && entry.kind == kind && entry.completed_on.is_none())
        {
            entry.completed_on = Some(completed_on);
        }
        Ok(())
    }
}
