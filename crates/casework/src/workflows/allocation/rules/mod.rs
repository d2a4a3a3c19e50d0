mod catalog;
mod config;

pub use catalog::{
    standard_rules, DutyRoleRule, EmergencyCoordinatorRule, ManualTriageRule,
    QualificationMatchRule,
};
pub use config::AllocationPolicyConfig;

use super::domain::{Assessment, PlacementApplication, PlacementRequest, Qualification, StaffRole};

/// What a rule proposes for the work item in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Hand the item to a specific staff member, identified by username.
    AllocateToUser { username: String },
    /// Hand the item to the least-loaded active holder of a qualification.
    AllocateByQualification(Qualification),
    /// Hand the item to the least-loaded active holder of a role.
    AllocateByRole(StaffRole),
    /// This rule has no opinion; ask the next one.
    Skip,
    /// The item must stay unallocated; stop consulting rules.
    DoNotAllocate,
}

/// A priority-ordered allocation policy. Lower priority numbers run first.
///
/// Each kind-specific method defaults to `Skip` so a rule only implements
/// the kinds it cares about.
pub trait AllocationRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> u16;

    fn evaluate_assessment(&self, _assessment: &Assessment) -> RuleOutcome {
        RuleOutcome::Skip
    }

    fn evaluate_placement_request(&self, _request: &PlacementRequest) -> RuleOutcome {
        RuleOutcome::Skip
    }

    fn evaluate_placement_application(&self, _application: &PlacementApplication) -> RuleOutcome {
        RuleOutcome::Skip
    }
}
