// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::Args;
use praxis_core::{
    BookingChannel, Config, DayEdge, Occurrence, Reconciler, ScheduleSnapshot, TimeInterval,
    VerdictReason,
};

/// Check a proposed occurrence against a schedule snapshot.
#[derive(Debug, Args)]
pub struct CmdCheck {
    /// Path to a TOML schedule snapshot (availability, limits,
    /// appointments)
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Clinician to book with
    #[arg(long)]
    pub clinician: String,

    /// Day of the proposed occurrence (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Proposed start time
    #[arg(long)]
    pub start_time: String,

    /// Proposed end time
    #[arg(long)]
    pub end_time: String,

    /// Check as an online client request instead of a staff booking
    #[arg(long)]
    pub online: bool,
}

impl CmdCheck {
    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        let content = std::fs::read_to_string(&self.snapshot).map_err(|e| {
            format!("Failed to read snapshot at {}: {e}", self.snapshot.display())
        })?;
        let snapshot: ScheduleSnapshot = toml::from_str(&content)?;

        let clock = config.wall_clock();
        let start = clock.to_instant(self.date, Some(&self.start_time), false, DayEdge::Start)?;
        let end = clock.to_instant(self.date, Some(&self.end_time), false, DayEdge::End)?;
        let interval = TimeInterval::new(start, end)?;
        let proposed = Occurrence {
            series_anchor: interval,
            interval,
            sequence_index: 0,
        };

        let channel = if self.online {
            BookingChannel::Online
        } else {
            BookingChannel::Staff
        };
        let reconciler = Reconciler::new(clock, config.scan_limit(Utc::now()));
        let verdict = reconciler.reconcile(&snapshot, &self.clinician, &proposed, channel);

        match verdict.reason {
            VerdictReason::Ok => println!("OK: the occurrence can be booked"),
            VerdictReason::NoAvailability => {
                println!("REJECTED: no availability window contains the occurrence")
            }
            VerdictReason::LimitReached => {
                println!("REJECTED: the clinician's daily appointment limit is reached")
            }
            VerdictReason::OutsideWindow => {
                println!("REJECTED: the occurrence lies beyond the scan horizon")
            }
        }
        if !verdict.admitted {
            std::process::exit(1);
        }
        Ok(())
    }
}
