use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Case reference number identifying the person the work relates to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crn(pub String);

/// The accommodation service a piece of casework belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationService {
    ApprovedPremises,
    TemporaryAccommodation,
    ShortTermAccommodation,
}

impl AccommodationService {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApprovedPremises => "Approved Premises",
            Self::TemporaryAccommodation => "Temporary Accommodation",
            Self::ShortTermAccommodation => "Short-Term Accommodation",
        }
    }
}

/// Credential a staff member may hold, restricting which casework they can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    Emergency,
    Esap,
    Pipe,
    WomensEstate,
}

impl Qualification {
    /// Precedence order used when a work item carries several requirements.
    pub const fn ordered() -> [Self; 4] {
        [Self::Emergency, Self::Esap, Self::Pipe, Self::WomensEstate]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Esap => "ESAP",
            Self::Pipe => "PIPE",
            Self::WomensEstate => "Women's Estate",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "emergency" => Some(Self::Emergency),
            "esap" => Some(Self::Esap),
            "pipe" => Some(Self::Pipe),
            "womens estate" | "women's estate" | "womens_estate" => Some(Self::WomensEstate),
            _ => None,
        }
    }

    /// Highest-precedence member of a requirement set, if any.
    pub fn most_specific(required: &BTreeSet<Qualification>) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|qualification| required.contains(qualification))
    }
}

/// Permission category a staff member may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Assessor,
    Matcher,
    CaseManager,
}

impl StaffRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assessor => "Assessor",
            Self::Matcher => "Matcher",
            Self::CaseManager => "Case Manager",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "assessor" => Some(Self::Assessor),
            "matcher" => Some(Self::Matcher),
            "case manager" | "case_manager" => Some(Self::CaseManager),
            _ => None,
        }
    }
}

/// Identifier wrapper for staff members in the directory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StaffUserId(pub u64);

/// Directory entry for a member of staff eligible to receive casework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: StaffUserId,
    pub username: String,
    pub name: String,
    pub active: bool,
    pub roles: BTreeSet<StaffRole>,
    pub qualifications: BTreeSet<Qualification>,
}

/// Risk tier attached to a placement request during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    A,
    B,
    C,
    D,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Tier A",
            Self::B => "Tier B",
            Self::C => "Tier C",
            Self::D => "Tier D",
        }
    }
}

/// An assessment awaiting a staff assessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub crn: Crn,
    pub service: AccommodationService,
    #[serde(default)]
    pub required_qualifications: BTreeSet<Qualification>,
    #[serde(default)]
    pub emergency: bool,
    pub received_on: NaiveDate,
}

/// A placement request awaiting a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub crn: Crn,
    pub tier: RiskTier,
    #[serde(default)]
    pub required_qualifications: BTreeSet<Qualification>,
    pub expected_arrival: NaiveDate,
}

/// A placement application awaiting a case manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementApplication {
    pub crn: Crn,
    pub service: AccommodationService,
    #[serde(default)]
    pub required_qualifications: BTreeSet<Qualification>,
    pub submitted_on: NaiveDate,
}

/// Discriminant for the three allocatable kinds of casework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    Assessment,
    PlacementRequest,
    PlacementApplication,
}

impl WorkItemKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assessment => "Assessment",
            Self::PlacementRequest => "Placement Request",
            Self::PlacementApplication => "Placement Application",
        }
    }
}
