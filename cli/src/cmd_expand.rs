// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use chrono::{NaiveDate, Utc};
use clap::Args;
use praxis_core::{Config, DayEdge, RecurrenceRule, TimeInterval, expand, format_duration};

/// Expand a draft series and print one line per occurrence.
#[derive(Debug, Args)]
pub struct CmdExpand {
    /// First day of the series (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: NaiveDate,

    /// Start time, e.g. "9:00 AM" or "09:00"
    #[arg(long)]
    pub start_time: Option<String>,

    /// Last day of the anchor occurrence; defaults to the start date
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// End time
    #[arg(long)]
    pub end_time: Option<String>,

    /// Treat the series as all-day
    #[arg(long)]
    pub all_day: bool,

    /// Recurrence rule, e.g. "FREQ=WEEKLY;BYDAY=MO,WE;COUNT=10"
    #[arg(long)]
    pub rule: Option<String>,

    /// Maximum occurrences to print
    #[arg(long, default_value_t = 50)]
    pub max_count: usize,
}

impl CmdExpand {
    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        let clock = config.wall_clock();
        let start = clock.to_instant(
            self.start_date,
            self.start_time.as_deref(),
            self.all_day,
            DayEdge::Start,
        )?;
        let end = clock.to_instant(
            self.end_date.unwrap_or(self.start_date),
            self.end_time.as_deref(),
            self.all_day,
            DayEdge::End,
        )?;
        let anchor = TimeInterval::new(start, end)?;

        let rule = self
            .rule
            .as_deref()
            .map(str::parse::<RecurrenceRule>)
            .transpose()?;

        let mut scan = config.scan_limit(Utc::now());
        scan.max_count = scan.max_count.min(self.max_count);

        let tz = clock.timezone();
        for occurrence in expand(anchor, rule.as_ref(), scan, &clock)? {
            let start = occurrence.interval.start.with_timezone(&tz);
            let end = occurrence.interval.end.with_timezone(&tz);
            let label = format_duration(Some(&start), Some(&end), self.all_day);
            println!(
                "#{:<3} {} {}-{} ({label})",
                occurrence.sequence_index,
                start.format("%Y-%m-%d"),
                start.format("%H:%M"),
                end.format("%H:%M"),
            );
        }
        Ok(())
    }
}
