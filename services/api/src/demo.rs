use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use casework::error::AppError;
use casework::workflows::allocation::{
    standard_rules, AccommodationService, AllocationPolicyConfig, AllocationRecord, Assessment,
    CaseAllocationService, Crn, InMemoryStaffDirectory, PlacementApplication, PlacementRequest,
    Qualification, RiskTier, WorkItemKind,
};
use casework::workflows::roster::StaffRosterImporter;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use crate::infra::{sample_roster, InMemoryAllocationRepository};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Optional staff roster CSV; defaults to the built-in sample roster.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Reference date for workload windows (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Username receiving emergency assessments during the demo.
    #[arg(long, default_value = "fpatel")]
    pub(crate) emergency_coordinator: String,
}

pub(crate) fn run_allocation_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster_csv,
        today,
        emergency_coordinator,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let directory = Arc::new(InMemoryStaffDirectory::with_today(today));
    let (staff, source) = match roster_csv {
        Some(path) => {
            let staff = StaffRosterImporter::from_path(&path)?;
            (staff, format!("CSV import ({})", path.display()))
        }
        None => (sample_roster(), "built-in sample roster".to_string()),
    };
    for user in &staff {
        directory.register(user.clone());
    }

    let policy = AllocationPolicyConfig {
        emergency_coordinator: Some(emergency_coordinator),
        ..AllocationPolicyConfig::default()
    };
    let repository = Arc::new(InMemoryAllocationRepository::default());
    let service =
        CaseAllocationService::new(directory.clone(), repository, standard_rules(&policy));

    println!("Case allocation demo");
    println!("Roster source: {source} ({} staff)", staff.len());
    println!("Evaluated {today}");
    println!(
        "Rule order: {}",
        service.engine().rule_names().join(" -> ")
    );

    println!("\nDecisions");

    let emergency = Assessment {
        crn: Crn("X770143".to_string()),
        service: AccommodationService::ApprovedPremises,
        required_qualifications: BTreeSet::new(),
        emergency: true,
        received_on: today,
    };
    render_decision(&service.allocate_assessment(emergency)?);

    let routine = Assessment {
        crn: Crn("X551208".to_string()),
        service: AccommodationService::ApprovedPremises,
        required_qualifications: BTreeSet::new(),
        emergency: false,
        received_on: today,
    };
    render_decision(&service.allocate_assessment(routine)?);

    let mut specialist_request = PlacementRequest {
        crn: Crn("X551208".to_string()),
        tier: RiskTier::A,
        required_qualifications: BTreeSet::new(),
        expected_arrival: today + Duration::days(7),
    };
    specialist_request
        .required_qualifications
        .insert(Qualification::Pipe);
    render_decision(&service.allocate_placement_request(specialist_request)?);

    let hand_triaged = PlacementApplication {
        crn: Crn("X662301".to_string()),
        service: AccommodationService::TemporaryAccommodation,
        required_qualifications: BTreeSet::new(),
        submitted_on: today,
    };
    render_decision(&service.allocate_placement_application(hand_triaged)?);

    println!("\nStaff workload");
    for user in directory.roster() {
        println!(
            "- {} ({}): {} assessment(s), {} placement request(s), {} placement application(s)",
            user.username,
            user.name,
            directory.workload(user.id, WorkItemKind::Assessment),
            directory.workload(user.id, WorkItemKind::PlacementRequest),
            directory.workload(user.id, WorkItemKind::PlacementApplication),
        );
    }

    Ok(())
}

fn render_decision(record: &AllocationRecord) {
    println!(
        "- {} | {} | {}",
        record.crn.0,
        record.kind.label(),
        record.summary()
    );
}
