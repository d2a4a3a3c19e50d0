use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Crn, StaffUser, StaffUserId, WorkItemKind};

/// Identifier wrapper for recorded allocation decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationId(pub String);

/// The resolved end of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationOutcome {
    Allocated { staff: StaffUser },
    Unallocated,
}

/// Repository record capturing one allocation decision for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub id: AllocationId,
    pub crn: Crn,
    pub kind: WorkItemKind,
    pub outcome: AllocationOutcome,
    pub decided_on: NaiveDate,
}

impl AllocationRecord {
    pub fn summary(&self) -> String {
        match &self.outcome {
            AllocationOutcome::Allocated { staff } => {
                format!("allocated to {}", staff.username)
            }
            AllocationOutcome::Unallocated => "left unallocated".to_string(),
        }
    }

    pub fn view(&self) -> AllocationView {
        let (outcome, staff) = match &self.outcome {
            AllocationOutcome::Allocated { staff } => (
                "allocated",
                Some(StaffSummary {
                    id: staff.id,
                    username: staff.username.clone(),
                    name: staff.name.clone(),
                }),
            ),
            AllocationOutcome::Unallocated => ("unallocated", None),
        };

        AllocationView {
            allocation_id: self.id.clone(),
            crn: self.crn.clone(),
            kind: self.kind,
            kind_label: self.kind.label(),
            outcome,
            staff,
            decided_on: self.decided_on,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AllocationRepository: Send + Sync {
    fn insert(&self, record: AllocationRecord) -> Result<AllocationRecord, RepositoryError>;
    fn for_case(&self, crn: &Crn) -> Result<Vec<AllocationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a decision for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationView {
    pub allocation_id: AllocationId,
    pub crn: Crn,
    pub kind: WorkItemKind,
    pub kind_label: &'static str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffSummary>,
    pub decided_on: NaiveDate,
}

/// Minimal staff projection exposed over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct StaffSummary {
    pub id: StaffUserId,
    pub username: String,
    pub name: String,
}
