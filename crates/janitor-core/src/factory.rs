// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::infra::cli::reporter::ConsoleReporter;
use crate::infra::errors::ErrorRecorder;
use crate::janitor::Janitor;

pub fn create_janitor(turnoff_colors: bool) -> Janitor {
    let console_reporter = ConsoleReporter::new(turnoff_colors);
    Janitor::new(ErrorRecorder::default(), console_reporter)
}
