use chrono::Duration;

use super::common::*;
use crate::workflows::allocation::directory::{UserDirectory, WorkloadLedger};
use crate::workflows::allocation::domain::{Qualification, StaffRole, StaffUserId, WorkItemKind};

#[test]
fn workload_counts_pending_and_recent_completions() {
    let directory = directory();
    directory.register(staff(1, "june"));

    for _ in 0..3 {
        directory
            .record_assignment(StaffUserId(1), WorkItemKind::Assessment)
            .expect("ledger writable");
    }
    directory
        .complete_assignment(StaffUserId(1), WorkItemKind::Assessment, today())
        .expect("ledger writable");
    directory
        .complete_assignment(
            StaffUserId(1),
            WorkItemKind::Assessment,
            today() - Duration::days(10),
        )
        .expect("ledger writable");

    // One pending, one completed today, one completed outside the window.
    assert_eq!(directory.workload(StaffUserId(1), WorkItemKind::Assessment), 2);
}

#[test]
fn completion_window_boundary_is_seven_days() {
    let directory = directory();
    directory.register(staff(1, "june"));

    directory
        .record_assignment(StaffUserId(1), WorkItemKind::PlacementRequest)
        .expect("ledger writable");
    directory
        .complete_assignment(
            StaffUserId(1),
            WorkItemKind::PlacementRequest,
            today() - Duration::days(7),
        )
        .expect("ledger writable");
    assert_eq!(
        directory.workload(StaffUserId(1), WorkItemKind::PlacementRequest),
        1
    );

    directory
        .record_assignment(StaffUserId(1), WorkItemKind::PlacementRequest)
        .expect("ledger writable");
    directory
        .complete_assignment(
            StaffUserId(1),
            WorkItemKind::PlacementRequest,
            today() - Duration::days(8),
        )
        .expect("ledger writable");
    assert_eq!(
        directory.workload(StaffUserId(1), WorkItemKind::PlacementRequest),
        1
    );
}

#[test]
fn equally_loaded_candidates_resolve_to_lowest_staff_id() {
    let directory = directory();
    directory.register(staff(9, "zoe"));
    directory.register(staff(4, "amir"));

    let chosen = directory
        .least_loaded_for_assessments(&[StaffUserId(9), StaffUserId(4)])
        .expect("directory reachable")
        .expect("candidate chosen");

    assert_eq!(chosen.id, StaffUserId(4));
}

#[test]
fn inactive_staff_are_not_candidates() {
    let directory = directory();
    directory.register(deactivated(with_qualification(
        staff(1, "gone"),
        Qualification::Pipe,
    )));
    directory.register(deactivated(with_role(staff(2, "away"), StaffRole::Matcher)));

    assert!(directory
        .active_users_with_qualification(Qualification::Pipe)
        .expect("directory reachable")
        .is_empty());
    assert!(directory
        .active_users_with_role(StaffRole::Matcher)
        .expect("directory reachable")
        .is_empty());
}

#[test]
fn inactive_staff_are_skipped_by_the_selector() {
    let directory = directory();
    directory.register(deactivated(staff(1, "gone")));
    directory.register(staff(2, "here"));

    let chosen = directory
        .least_loaded_for_placement_applications(&[StaffUserId(1), StaffUserId(2)])
        .expect("directory reachable")
        .expect("candidate chosen");

    assert_eq!(chosen.username, "here");
}

#[test]
fn find_by_username_round_trips() {
    let directory = directory();
    directory.register(staff(1, "june"));

    let found = directory
        .find_by_username("june")
        .expect("directory reachable");
    assert_eq!(found.expect("registered").id, StaffUserId(1));

    assert!(directory
        .find_by_username("nobody")
        .expect("directory reachable")
        .is_none());
}

#[test]
fn selector_returns_nothing_for_unknown_candidates() {
    let directory = directory();

    assert!(directory
        .least_loaded_for_assessments(&[StaffUserId(42)])
        .expect("directory reachable")
        .is_none());
}
