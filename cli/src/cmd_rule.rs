// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::Args;
use praxis_core::RecurrenceRule;

/// Parse a recurrence rule and print its canonical form.
#[derive(Debug, Args)]
pub struct CmdRule {
    /// Rule string, e.g. "FREQ=WEEKLY;BYDAY=WE,MO;COUNT=10"
    pub rule: String,
}

impl CmdRule {
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        let rule: RecurrenceRule = self.rule.parse()?;
        println!("{rule}");
        Ok(())
    }
}
