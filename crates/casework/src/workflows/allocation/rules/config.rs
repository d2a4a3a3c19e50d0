use crate::config::AllocationSettings;
use crate::workflows::allocation::domain::AccommodationService;

/// Knobs the standard rule set is built from at process start.
#[derive(Debug, Clone)]
pub struct AllocationPolicyConfig {
    /// Username receiving emergency assessments, when that desk is staffed.
    pub emergency_coordinator: Option<String>,
    /// Services whose casework is triaged by hand rather than auto-allocated.
    pub manually_triaged_services: Vec<AccommodationService>,
}

impl Default for AllocationPolicyConfig {
    fn default() -> Self {
        Self {
            emergency_coordinator: None,
            manually_triaged_services: vec![
                AccommodationService::TemporaryAccommodation,
                AccommodationService::ShortTermAccommodation,
            ],
        }
    }
}

impl AllocationPolicyConfig {
    pub fn from_settings(settings: &AllocationSettings) -> Self {
        Self {
            emergency_coordinator: settings.emergency_coordinator.clone(),
            ..Self::default()
        }
    }
}
