// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{ReleaseChannel, RetentionPolicy, SweepOutcome};
use console::style;
use std::path::Path;
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new(turnoff_colors: bool) -> Self {
        if turnoff_colors {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Self
    }

    pub fn report_cleanup_scheduled(
        &self,
        current_cache_path: &Path,
        channel: &ReleaseChannel,
        policy: RetentionPolicy,
        delay: Duration,
    ) {
        println!();
        println!("Code cache in use : {}", style(current_cache_path.display()).cyan());
        println!(
            "Release channel : {} (keeping folders up to {} days)",
            channel,
            policy.max_age().as_secs() / SECONDS_PER_DAY
        );
        println!("Cleanup starts in {} seconds ...", delay.as_secs());
    }

    pub fn report_interrupted(&self) {
        println!();
        println!("{}", style("Interrupted, pending cleanup cancelled").yellow());
    }

    pub fn report_waiting_for_running_cleanup(&self) {
        println!();
        println!("{}", style("Interrupted, waiting for the running cleanup to finish").yellow());
    }

    pub fn report_sweep_outcome(&self, outcome: &SweepOutcome) {
        println!();
        println!("Stale code cache folders removed : {}", outcome.removed.len());

        outcome
            .removed
            .iter()
            .for_each(|name| println!("• {}", style(name).cyan()));

        println!();
    }
}
