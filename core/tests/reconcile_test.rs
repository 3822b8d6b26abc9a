// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for reconciliation and whole-series planning.

mod common;

use chrono::NaiveDate;
use praxis_core::{
    Appointment, BookingChannel, Occurrence, ScheduleSnapshot, SeriesDraft, TimeInterval,
    VerdictReason, plan_series,
};

use common::{availability, hour_slot, limit, reconciler, utc};

fn proposed(interval: TimeInterval) -> Occurrence {
    Occurrence {
        series_anchor: interval,
        interval,
        sequence_index: 0,
    }
}

#[test]
fn limit_of_one_with_one_booked_rejects() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let snapshot = ScheduleSnapshot {
        availability: vec![availability(
            "c1",
            TimeInterval::new(utc(2025, 3, 3, 8, 0), utc(2025, 3, 3, 18, 0)).unwrap(),
        )],
        limits: vec![limit("c1", day, Some(1))],
        appointments: vec![Appointment {
            clinician_id: "c1".into(),
            interval: hour_slot(2025, 3, 3, 9),
        }],
    };

    let verdict = reconciler().reconcile(
        &snapshot,
        "c1",
        &proposed(hour_slot(2025, 3, 3, 11)),
        BookingChannel::Staff,
    );
    assert_eq!(verdict.reason, VerdictReason::LimitReached);
}

#[test]
fn no_limit_record_admits_any_count() {
    let snapshot = ScheduleSnapshot {
        availability: vec![availability(
            "c1",
            TimeInterval::new(utc(2025, 3, 3, 8, 0), utc(2025, 3, 3, 18, 0)).unwrap(),
        )],
        appointments: (8..17)
            .map(|h| Appointment {
                clinician_id: "c1".into(),
                interval: hour_slot(2025, 3, 3, h),
            })
            .collect(),
        ..Default::default()
    };

    let verdict = reconciler().reconcile(
        &snapshot,
        "c1",
        &proposed(hour_slot(2025, 3, 3, 17)),
        BookingChannel::Staff,
    );
    assert_eq!(verdict.reason, VerdictReason::Ok);
}

#[test]
fn appointments_on_other_days_do_not_count_against_the_limit() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
    let snapshot = ScheduleSnapshot {
        availability: vec![availability(
            "c1",
            TimeInterval::new(utc(2025, 3, 1, 0, 0), utc(2025, 3, 31, 23, 0)).unwrap(),
        )],
        limits: vec![limit("c1", day, Some(1))],
        // Booked solid the day before.
        appointments: (8..17)
            .map(|h| Appointment {
                clinician_id: "c1".into(),
                interval: hour_slot(2025, 3, 3, h),
            })
            .collect(),
    };

    let verdict = reconciler().reconcile(
        &snapshot,
        "c1",
        &proposed(hour_slot(2025, 3, 4, 9)),
        BookingChannel::Staff,
    );
    assert_eq!(verdict.reason, VerdictReason::Ok);
}

#[test]
fn recurring_availability_covers_later_weeks() {
    let mut block = availability(
        "c1",
        TimeInterval::new(utc(2025, 3, 3, 9, 0), utc(2025, 3, 3, 17, 0)).unwrap(),
    );
    block.recurrence = Some("FREQ=WEEKLY".parse().unwrap());
    let snapshot = ScheduleSnapshot {
        availability: vec![block],
        ..Default::default()
    };

    // Six weeks out, still a Monday.
    let verdict = reconciler().reconcile(
        &snapshot,
        "c1",
        &proposed(hour_slot(2025, 4, 14, 10)),
        BookingChannel::Staff,
    );
    assert_eq!(verdict.reason, VerdictReason::Ok);
}

#[test]
fn plan_series_reports_per_occurrence_verdicts() {
    // Weekly Mondays for 4 weeks; a limit of zero blocks week three.
    let blocked = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
    let snapshot = ScheduleSnapshot {
        availability: vec![availability(
            "c1",
            TimeInterval::new(utc(2025, 3, 1, 0, 0), utc(2025, 4, 30, 23, 0)).unwrap(),
        )],
        limits: vec![limit("c1", blocked, Some(0))],
        ..Default::default()
    };

    let draft = SeriesDraft {
        start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        start_time: Some("9:00 AM".into()),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        end_time: Some("10:00 AM".into()),
        is_all_day: false,
        recurring_rule: Some("FREQ=WEEKLY;COUNT=4".into()),
        clinician_id: "c1".into(),
        location_id: None,
        service_id: None,
    };

    let plan = plan_series(
        &draft,
        &snapshot,
        &reconciler(),
        BookingChannel::Staff,
        &mut (),
    )
    .unwrap();

    assert_eq!(plan.admitted.len(), 3);
    assert_eq!(plan.rejected.len(), 1);
    let (occurrence, reason) = &plan.rejected[0];
    assert_eq!(occurrence.interval.start.date_naive(), blocked);
    assert_eq!(*reason, VerdictReason::LimitReached);

    let indices: Vec<_> = plan.admitted.iter().map(|r| r.sequence_index).collect();
    assert_eq!(indices, vec![0, 1, 3]);
    assert!(plan.admitted.iter().all(|r| r.series_id == plan.series_id));
}

#[test]
fn snapshot_round_trips_through_toml() {
    let toml_src = r#"
        [[availability]]
        clinician_id = "c1"
        allow_online_requests = true
        recurrence = "FREQ=WEEKLY;BYDAY=MO"

        [availability.interval]
        start = "2025-03-03T09:00:00Z"
        end = "2025-03-03T17:00:00Z"

        [[limits]]
        clinician_id = "c1"
        date = "2025-03-03"
        max_appointments = 6

        [[appointments]]
        clinician_id = "c1"

        [appointments.interval]
        start = "2025-03-03T09:00:00Z"
        end = "2025-03-03T09:50:00Z"
    "#;

    let snapshot: ScheduleSnapshot = toml::from_str(toml_src).unwrap();
    assert_eq!(snapshot.availability.len(), 1);
    assert!(snapshot.availability[0].allow_online_requests);
    assert_eq!(
        snapshot.availability[0].recurrence.as_ref().unwrap().to_string(),
        "FREQ=WEEKLY;BYDAY=MO"
    );
    assert_eq!(snapshot.limits[0].max_appointments, Some(6));

    let verdict = reconciler().reconcile(
        &snapshot,
        "c1",
        &proposed(hour_slot(2025, 3, 3, 10)),
        BookingChannel::Online,
    );
    assert_eq!(verdict.reason, VerdictReason::Ok);
}
