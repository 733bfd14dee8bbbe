// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod cleaner;
pub mod scheduler;
pub mod sweeper;

use crate::domain::models::{ReleaseChannel, RetentionPolicy};
use crate::infra::cli::reporter::ConsoleReporter;
use crate::infra::errors::ErrorRecorder;
use crate::infra::filesystem::{CacheFileSystemAccess, LocalFileSystem};
use anyhow::bail;
use cleaner::CodeCacheCleaner;
use std::path::PathBuf;
use std::time::Duration;
use sweeper::RetentionSweeper;

pub enum JanitorTask {
    ScheduleCleanup {
        current_cache_path: PathBuf,
        channel: ReleaseChannel,
        delay: Duration,
    },
    SweepNow {
        current_cache_path: PathBuf,
        channel: ReleaseChannel,
    },
}

pub struct Janitor {
    error_recorder: ErrorRecorder,
    console_reporter: ConsoleReporter,
}

impl Janitor {
    pub(crate) fn new(error_recorder: ErrorRecorder, console_reporter: ConsoleReporter) -> Self {
        Self {
            error_recorder,
            console_reporter,
        }
    }

    pub async fn execute(self, task: JanitorTask) -> anyhow::Result<()> {
        match task {
            JanitorTask::ScheduleCleanup {
                current_cache_path,
                channel,
                delay,
            } => {
                let policy = RetentionPolicy::for_channel(&channel);
                self.console_reporter
                    .report_cleanup_scheduled(&current_cache_path, &channel, policy, delay);

                let cleaner = CodeCacheCleaner::with_delay(
                    Some(current_cache_path),
                    &channel,
                    self.file_system(),
                    self.error_sink(),
                    delay,
                );

                self.wait_for_cleanup(&cleaner, tokio::signal::ctrl_c()).await;
                cleaner.shutdown().await;
            },
            JanitorTask::SweepNow {
                current_cache_path,
                channel,
            } => {
                let policy = RetentionPolicy::for_channel(&channel);
                let sweeper = RetentionSweeper::new(self.file_system(), self.error_sink(), policy);
                let outcome = sweeper.sweep(&current_cache_path).await;
                self.console_reporter.report_sweep_outcome(&outcome);
            },
        }

        let unexpected = self.error_recorder.reported();
        if !unexpected.is_empty() {
            bail!("janitor : cleanup finished with {} unexpected error(s)", unexpected.len())
        }

        Ok(())
    }

    /// Waits for the scheduled sweep, unless interrupted first.
    ///
    /// Returns whether the interruption cancelled a sweep that had not started yet.
    async fn wait_for_cleanup<I>(&self, cleaner: &CodeCacheCleaner, interruption: I) -> bool
    where
        I: Future<Output = std::io::Result<()>>,
    {
        let signal = tokio::select! {
            _ = cleaner.wait_for_sweep() => None,
            signal = interruption => Some(signal),
        };

        match signal {
            None => false,
            Some(Ok(())) if cleaner.dispose() => {
                self.console_reporter.report_interrupted();
                true
            },
            Some(Ok(())) => {
                self.console_reporter.report_waiting_for_running_cleanup();
                false
            },
            Some(Err(error)) => {
                log::warn!("[janitor] cannot listen for interruptions : {}", error);
                cleaner.wait_for_sweep().await;
                false
            },
        }
    }

    fn file_system(&self) -> CacheFileSystemAccess {
        CacheFileSystemAccess::Local(LocalFileSystem)
    }

    fn error_sink(&self) -> ErrorRecorder {
        self.error_recorder.clone()
    }
}
