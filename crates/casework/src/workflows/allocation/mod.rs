//! Case allocation: rule engine, staff directory seams, and HTTP surface.
//!
//! An incoming piece of casework (assessment, placement request, or
//! placement application) is run through a priority-ordered rule set; the
//! first rule whose outcome resolves against the staff directory decides
//! who takes it. Decisions are persisted through [`AllocationRepository`]
//! and feed the directory's workload ledger so later selections stay
//! balanced.

pub mod directory;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{
    DirectoryError, InMemoryStaffDirectory, UserDirectory, WorkloadLedger,
};
pub use domain::{
    AccommodationService, Assessment, Crn, PlacementApplication, PlacementRequest, Qualification,
    RiskTier, StaffRole, StaffUser, StaffUserId, WorkItemKind,
};
pub use engine::AllocationEngine;
pub use repository::{
    AllocationId, AllocationOutcome, AllocationRecord, AllocationRepository, AllocationView,
    RepositoryError, StaffSummary,
};
pub use router::allocation_router;
pub use rules::{standard_rules, AllocationPolicyConfig, AllocationRule, RuleOutcome};
pub use service::{AllocationServiceError, CaseAllocationService};
