// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Planning a whole series from a raw draft payload.
//!
//! This is the persistence-facing surface: it normalizes the draft's
//! wall-clock fields, expands the recurrence, reconciles each occurrence,
//! and returns one record per admitted occurrence for the caller to
//! persist. "This/future/all" edit selection stays on the caller's side
//! as a filter over `series_id` + `sequence_index`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::expand::expand;
use crate::reconcile::{AdmissionObserver, BookingChannel, Reconciler, VerdictReason};
use crate::types::{Occurrence, ScheduleSnapshot, TimeInterval};
use crate::wallclock::DayEdge;

/// The raw fields of a series creation payload, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDraft {
    /// First day of the series.
    pub start_date: chrono::NaiveDate,
    /// Wall-clock start time (`"9:00 AM"` or `"09:00"`); ignored when
    /// all-day.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Last day of the anchor occurrence.
    pub end_date: chrono::NaiveDate,
    /// Wall-clock end time; ignored when all-day.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Whether the series is all-day.
    #[serde(default)]
    pub is_all_day: bool,
    /// Recurrence rule string, absent for one-off events.
    #[serde(default)]
    pub recurring_rule: Option<String>,
    /// Clinician the series belongs to.
    pub clinician_id: String,
    /// Opaque pass-through to the persisted rows.
    #[serde(default)]
    pub location_id: Option<String>,
    /// Opaque pass-through to the persisted rows.
    #[serde(default)]
    pub service_id: Option<String>,
}

/// One admitted occurrence, ready to persist as a row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    /// Series the row belongs to.
    pub series_id: Uuid,
    /// Zero-based position within the series.
    pub sequence_index: u32,
    /// The occurrence's interval.
    pub interval: TimeInterval,
    /// Owning clinician, copied from the draft.
    pub clinician_id: String,
    /// Pass-through from the draft.
    #[serde(default)]
    pub location_id: Option<String>,
    /// Pass-through from the draft.
    #[serde(default)]
    pub service_id: Option<String>,
}

/// The outcome of planning a series: what to persist, and what was turned
/// away with the reason.
#[derive(Debug, Clone)]
pub struct SeriesPlan {
    /// Freshly minted identifier shared by all of the series' rows.
    pub series_id: Uuid,
    /// Occurrences that passed reconciliation, in series order.
    pub admitted: Vec<OccurrenceRecord>,
    /// Occurrences that were rejected, with the first failing check.
    pub rejected: Vec<(Occurrence, VerdictReason)>,
}

/// Plans a series from a raw draft.
///
/// A malformed `recurring_rule` is logged and degraded to a non-recurring
/// series rather than failing the whole draft; genuinely invalid drafts
/// (bad time strings, end not after start, degenerate rules) fail with
/// the corresponding [`Error`].
pub fn plan_series(
    draft: &SeriesDraft,
    snapshot: &ScheduleSnapshot,
    reconciler: &Reconciler,
    channel: BookingChannel,
    observer: &mut dyn AdmissionObserver,
) -> Result<SeriesPlan, Error> {
    let clock = reconciler.clock();
    let start = clock.to_instant(
        draft.start_date,
        draft.start_time.as_deref(),
        draft.is_all_day,
        DayEdge::Start,
    )?;
    let end = clock.to_instant(
        draft.end_date,
        draft.end_time.as_deref(),
        draft.is_all_day,
        DayEdge::End,
    )?;
    let anchor = TimeInterval::new(start, end)?;

    let rule = match draft.recurring_rule.as_deref() {
        None => None,
        Some(s) => match s.parse() {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::warn!(rule = s, error = %e, "treating series as non-recurring");
                None
            }
        },
    };

    let series_id = Uuid::new_v4();
    let mut admitted = Vec::new();
    let mut rejected = Vec::new();
    for occurrence in expand(anchor, rule.as_ref(), reconciler.scan(), clock)? {
        let verdict = reconciler.reconcile(snapshot, &draft.clinician_id, &occurrence, channel);
        if verdict.admitted {
            observer.on_admitted(&draft.clinician_id, &occurrence);
            admitted.push(OccurrenceRecord {
                series_id,
                sequence_index: occurrence.sequence_index,
                interval: occurrence.interval,
                clinician_id: draft.clinician_id.clone(),
                location_id: draft.location_id.clone(),
                service_id: draft.service_id.clone(),
            });
        } else {
            rejected.push((occurrence, verdict.reason));
        }
    }

    Ok(SeriesPlan {
        series_id,
        admitted,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::expand::ScanLimit;
    use crate::types::AvailabilityBlock;
    use crate::wallclock::WallClock;

    fn draft(rule: Option<&str>) -> SeriesDraft {
        SeriesDraft {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            start_time: Some("9:00 AM".into()),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end_time: Some("10:00 AM".into()),
            is_all_day: false,
            recurring_rule: rule.map(str::to_string),
            clinician_id: "c1".into(),
            location_id: Some("loc-1".into()),
            service_id: None,
        }
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(
            WallClock::new(chrono_tz::UTC),
            ScanLimit::until(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        )
    }

    fn all_day_availability(from_day: u32, to_day: u32) -> ScheduleSnapshot {
        ScheduleSnapshot {
            availability: vec![AvailabilityBlock {
                clinician_id: "c1".into(),
                interval: TimeInterval::new(
                    Utc.with_ymd_and_hms(2025, 3, from_day, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2025, 3, to_day, 23, 59, 59).unwrap(),
                )
                .unwrap(),
                allow_online_requests: false,
                recurrence: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_splits_admitted_and_rejected() {
        // Availability covers the first two Mondays only.
        let snapshot = all_day_availability(1, 14);
        let mut observed = Vec::new();
        struct Collect<'a>(&'a mut Vec<u32>);
        impl AdmissionObserver for Collect<'_> {
            fn on_admitted(&mut self, _clinician_id: &str, occurrence: &Occurrence) {
                self.0.push(occurrence.sequence_index);
            }
        }

        let plan = plan_series(
            &draft(Some("FREQ=WEEKLY;COUNT=4")),
            &snapshot,
            &reconciler(),
            BookingChannel::Staff,
            &mut Collect(&mut observed),
        )
        .unwrap();

        assert_eq!(plan.admitted.len(), 2);
        assert_eq!(plan.rejected.len(), 2);
        assert_eq!(observed, vec![0, 1]);
        assert!(
            plan.rejected
                .iter()
                .all(|(_, reason)| *reason == VerdictReason::NoAvailability)
        );
        for record in &plan.admitted {
            assert_eq!(record.series_id, plan.series_id);
            assert_eq!(record.clinician_id, "c1");
            assert_eq!(record.location_id.as_deref(), Some("loc-1"));
        }
    }

    #[test]
    fn test_malformed_rule_degrades_to_single() {
        let snapshot = all_day_availability(1, 31);
        let plan = plan_series(
            &draft(Some("FREQ=FORTNIGHTLY")),
            &snapshot,
            &reconciler(),
            BookingChannel::Staff,
            &mut (),
        )
        .unwrap();
        assert_eq!(plan.admitted.len(), 1);
        assert_eq!(plan.admitted[0].sequence_index, 0);
    }

    #[test]
    fn test_bad_time_string_fails_plan() {
        let mut bad = draft(None);
        bad.start_time = Some("morning".into());
        let err = plan_series(
            &bad,
            &ScheduleSnapshot::default(),
            &reconciler(),
            BookingChannel::Staff,
            &mut (),
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidTimeFormat("morning".into()));
    }

    #[test]
    fn test_end_before_start_fails_plan() {
        let mut bad = draft(None);
        bad.start_time = Some("10:00".into());
        bad.end_time = Some("09:00".into());
        let err = plan_series(
            &bad,
            &ScheduleSnapshot::default(),
            &reconciler(),
            BookingChannel::Staff,
            &mut (),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { .. }));
    }
}
