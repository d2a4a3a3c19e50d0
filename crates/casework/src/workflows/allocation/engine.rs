use std::sync::Arc;

use tracing::{debug, warn};

use super::directory::{DirectoryError, UserDirectory};
use super::domain::{
    Assessment, PlacementApplication, PlacementRequest, StaffUser, StaffUserId,
};
use super::rules::{AllocationRule, RuleOutcome};

/// Decides which staff member, if any, a piece of casework should go to.
///
/// Rules are consulted in ascending priority order; the first rule whose
/// outcome resolves against the directory wins. A rule whose target cannot
/// be resolved (unknown username, nobody eligible) is logged and treated as
/// if it had skipped. A `DoNotAllocate` outcome ends evaluation with no
/// allocation.
///
/// The only error the public operations return is a directory failure.
/// Everything rule-shaped degrades to "try the next rule" or "unallocated".
pub struct AllocationEngine<D> {
    directory: Arc<D>,
    rules: Vec<Arc<dyn AllocationRule>>,
}

impl<D: UserDirectory> AllocationEngine<D> {
    /// Sorts the rule list by priority once. The sort is stable, so rules
    /// sharing a priority keep their registration order.
    pub fn new(directory: Arc<D>, mut rules: Vec<Arc<dyn AllocationRule>>) -> Self {
        rules.sort_by_key(|rule| rule.priority());
        Self { directory, rules }
    }

    /// Rule names in evaluation order, for diagnostics.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn allocate_assessment(
        &self,
        assessment: &Assessment,
    ) -> Result<Option<StaffUser>, DirectoryError> {
        self.resolve(
            |rule| rule.evaluate_assessment(assessment),
            |directory, candidates| directory.least_loaded_for_assessments(candidates),
        )
    }

    pub fn allocate_placement_request(
        &self,
        request: &PlacementRequest,
    ) -> Result<Option<StaffUser>, DirectoryError> {
        self.resolve(
            |rule| rule.evaluate_placement_request(request),
            |directory, candidates| directory.least_loaded_for_placement_requests(candidates),
        )
    }

    pub fn allocate_placement_application(
        &self,
        application: &PlacementApplication,
    ) -> Result<Option<StaffUser>, DirectoryError> {
        self.resolve(
            |rule| rule.evaluate_placement_application(application),
            |directory, candidates| directory.least_loaded_for_placement_applications(candidates),
        )
    }

    fn resolve(
        &self,
        evaluate: impl Fn(&dyn AllocationRule) -> RuleOutcome,
        select: impl Fn(&D, &[StaffUserId]) -> Result<Option<StaffUser>, DirectoryError>,
    ) -> Result<Option<StaffUser>, DirectoryError> {
        for rule in &self.rules {
            match evaluate(rule.as_ref()) {
                RuleOutcome::Skip => {}
                RuleOutcome::DoNotAllocate => {
                    debug!(rule = rule.name(), "rule halted allocation");
                    return Ok(None);
                }
                RuleOutcome::AllocateToUser { username } => {
                    if let Some(user) = self.directory.find_by_username(&username)? {
                        return Ok(Some(user));
                    }
                    warn!(
                        rule = rule.name(),
                        %username,
                        "allocation target not found; trying next rule"
                    );
                }
                RuleOutcome::AllocateByQualification(qualification) => {
                    let candidates = self
                        .directory
                        .active_users_with_qualification(qualification)?;
                    match self.pick(&candidates, &select)? {
                        Some(user) => return Ok(Some(user)),
                        None => warn!(
                            rule = rule.name(),
                            qualification = qualification.label(),
                            "no eligible staff for qualification; trying next rule"
                        ),
                    }
                }
                RuleOutcome::AllocateByRole(role) => {
                    let candidates = self.directory.active_users_with_role(role)?;
                    match self.pick(&candidates, &select)? {
                        Some(user) => return Ok(Some(user)),
                        None => warn!(
                            rule = rule.name(),
                            role = role.label(),
                            "no eligible staff for role; trying next rule"
                        ),
                    }
                }
            }
        }

        Ok(None)
    }

    fn pick(
        &self,
        candidates: &[StaffUserId],
        select: &impl Fn(&D, &[StaffUserId]) -> Result<Option<StaffUser>, DirectoryError>,
    ) -> Result<Option<StaffUser>, DirectoryError> {
        if candidates.is_empty() {
            return Ok(None);
        }
        select(self.directory.as_ref(), candidates)
    }
}
