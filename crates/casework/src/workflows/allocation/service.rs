use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;

use super::directory::{DirectoryError, UserDirectory, WorkloadLedger};
use super::domain::{
    Assessment, Crn, PlacementApplication, PlacementRequest, StaffUser, WorkItemKind,
};
use super::engine::AllocationEngine;
use super::repository::{
    AllocationId, AllocationOutcome, AllocationRecord, AllocationRepository, RepositoryError,
};
use super::rules::AllocationRule;

/// Service composing the rule engine, staff directory, and decision log.
pub struct CaseAllocationService<D, R> {
    engine: Arc<AllocationEngine<D>>,
    directory: Arc<D>,
    repository: Arc<R>,
}

static ALLOCATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_allocation_id() -> AllocationId {
    let id = ALLOCATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AllocationId(format!("alloc-{id:06}"))
}

impl<D, R> CaseAllocationService<D, R>
where
    D: UserDirectory + WorkloadLedger + 'static,
    R: AllocationRepository + 'static,
{
    pub fn new(
        directory: Arc<D>,
        repository: Arc<R>,
        rules: Vec<Arc<dyn AllocationRule>>,
    ) -> Self {
        let engine = Arc::new(AllocationEngine::new(directory.clone(), rules));
        Self {
            engine,
            directory,
            repository,
        }
    }

    pub fn engine(&self) -> &AllocationEngine<D> {
        &self.engine
    }

    /// Run the rules over an assessment and persist the decision.
    pub fn allocate_assessment(
        &self,
        assessment: Assessment,
    ) -> Result<AllocationRecord, AllocationServiceError> {
        let allocated = self.engine.allocate_assessment(&assessment)?;
        self.finish(assessment.crn, WorkItemKind::Assessment, allocated)
    }

    /// Run the rules over a placement request and persist the decision.
    pub fn allocate_placement_request(
        &self,
        request: PlacementRequest,
    ) -> Result<AllocationRecord, AllocationServiceError> {
        let allocated = self.engine.allocate_placement_request(&request)?;
        self.finish(request.crn, WorkItemKind::PlacementRequest, allocated)
    }

    /// Run the rules over a placement application and persist the decision.
    pub fn allocate_placement_application(
        &self,
        application: PlacementApplication,
    ) -> Result<AllocationRecord, AllocationServiceError> {
        let allocated = self.engine.allocate_placement_application(&application)?;
        self.finish(application.crn, WorkItemKind::PlacementApplication, allocated)
    }

    /// Decision history for a case, newest last.
    pub fn decisions_for(
        &self,
        crn: &Crn,
    ) -> Result<Vec<AllocationRecord>, AllocationServiceError> {
        Ok(self.repository.for_case(crn)?)
    }

    fn finish(
        &self,
        crn: Crn,
        kind: WorkItemKind,
        allocated: Option<StaffUser>,
    ) -> Result<AllocationRecord, AllocationServiceError> {
        let outcome = match allocated {
            Some(staff) => AllocationOutcome::Allocated { staff },
            None => AllocationOutcome::Unallocated,
        };

        let record = AllocationRecord {
            id: next_allocation_id(),
            crn,
            kind,
            outcome,
            decided_on: Local::now().date_naive(),
        };

        let stored = self.repository.insert(record)?;

        if let AllocationOutcome::Allocated { staff } = &stored.outcome {
            self.directory.record_assignment(staff.id, kind)?;
        }

        Ok(stored)
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
