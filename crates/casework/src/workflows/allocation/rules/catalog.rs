use std::sync::Arc;

use super::config::AllocationPolicyConfig;
use super::{AllocationRule, RuleOutcome};
use crate::workflows::allocation::domain::{
    AccommodationService, Assessment, PlacementApplication, PlacementRequest, Qualification,
    StaffRole,
};

const MANUAL_TRIAGE_PRIORITY: u16 = 10;
const EMERGENCY_COORDINATOR_PRIORITY: u16 = 20;
const QUALIFICATION_MATCH_PRIORITY: u16 = 30;
const DUTY_ROLE_PRIORITY: u16 = 40;

/// Casework for hand-triaged services is never auto-allocated.
pub struct ManualTriageRule {
    services: Vec<AccommodationService>,
}

impl ManualTriageRule {
    pub fn new(services: Vec<AccommodationService>) -> Self {
        Self { services }
    }

    fn triage(&self, service: AccommodationService) -> RuleOutcome {
        if self.services.contains(&service) {
            RuleOutcome::DoNotAllocate
        } else {
            RuleOutcome::Skip
        }
    }
}

impl AllocationRule for ManualTriageRule {
    fn name(&self) -> &'static str {
        "manual-triage"
    }

    fn priority(&self) -> u16 {
        MANUAL_TRIAGE_PRIORITY
    }

    fn evaluate_assessment(&self, assessment: &Assessment) -> RuleOutcome {
        self.triage(assessment.service)
    }

    // Placement requests only exist for approved premises, so the default
    // skip applies there.

    fn evaluate_placement_application(&self, application: &PlacementApplication) -> RuleOutcome {
        self.triage(application.service)
    }
}

/// Emergency assessments go straight to the configured coordinator.
pub struct EmergencyCoordinatorRule {
    username: String,
}

impl EmergencyCoordinatorRule {
    pub fn new(username: String) -> Self {
        Self { username }
    }
}

impl AllocationRule for EmergencyCoordinatorRule {
    fn name(&self) -> &'static str {
        "emergency-coordinator"
    }

    fn priority(&self) -> u16 {
        EMERGENCY_COORDINATOR_PRIORITY
    }

    fn evaluate_assessment(&self, assessment: &Assessment) -> RuleOutcome {
        if assessment.emergency {
            RuleOutcome::AllocateToUser {
                username: self.username.clone(),
            }
        } else {
            RuleOutcome::Skip
        }
    }
}

/// Items carrying required qualifications allocate by the most specific one.
pub struct QualificationMatchRule;

impl AllocationRule for QualificationMatchRule {
    fn name(&self) -> &'static str {
        "qualification-match"
    }

    fn priority(&self) -> u16 {
        QUALIFICATION_MATCH_PRIORITY
    }

    fn evaluate_assessment(&self, assessment: &Assessment) -> RuleOutcome {
        match Qualification::most_specific(&assessment.required_qualifications) {
            Some(qualification) => RuleOutcome::AllocateByQualification(qualification),
            None => RuleOutcome::Skip,
        }
    }

    fn evaluate_placement_request(&self, request: &PlacementRequest) -> RuleOutcome {
        match Qualification::most_specific(&request.required_qualifications) {
            Some(qualification) => RuleOutcome::AllocateByQualification(qualification),
            None => RuleOutcome::Skip,
        }
    }

    fn evaluate_placement_application(&self, application: &PlacementApplication) -> RuleOutcome {
        match Qualification::most_specific(&application.required_qualifications) {
            Some(qualification) => RuleOutcome::AllocateByQualification(qualification),
            None => RuleOutcome::Skip,
        }
    }
}

/// Fallback: every kind has a duty role that absorbs whatever is left.
pub struct DutyRoleRule;

impl AllocationRule for DutyRoleRule {
    fn name(&self) -> &'static str {
        "duty-role"
    }

    fn priority(&self) -> u16 {
        DUTY_ROLE_PRIORITY
    }

    fn evaluate_assessment(&self, _assessment: &Assessment) -> RuleOutcome {
        RuleOutcome::AllocateByRole(StaffRole::Assessor)
    }

    fn evaluate_placement_request(&self, _request: &PlacementRequest) -> RuleOutcome {
        RuleOutcome::AllocateByRole(StaffRole::Matcher)
    }

    fn evaluate_placement_application(&self, _application: &PlacementApplication) -> RuleOutcome {
        RuleOutcome::AllocateByRole(StaffRole::CaseManager)
    }
}

/// The rule set every deployment starts from. Order here is irrelevant; the
/// engine sorts by priority.
pub fn standard_rules(config: &AllocationPolicyConfig) -> Vec<Arc<dyn AllocationRule>> {
    let mut rules: Vec<Arc<dyn AllocationRule>> = vec![
        Arc::new(ManualTriageRule::new(config.manually_triaged_services.clone())),
        Arc::new(QualificationMatchRule),
        Arc::new(DutyRoleRule),
    ];

    if let Some(username) = &config.emergency_coordinator {
        rules.push(Arc::new(EmergencyCoordinatorRule::new(username.clone())));
    }

    rules
}
