// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::{ReleaseChannel, RetentionPolicy};
use crate::infra::errors::ErrorRecorder;
use crate::infra::filesystem::CacheFileSystemAccess;
use crate::janitor::scheduler::{DEFAULT_CLEANUP_DELAY, RunOnceScheduler};
use crate::janitor::sweeper::RetentionSweeper;
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Sweeps stale code cache folders once, shortly after startup.
///
/// Without a current code cache path, or with an empty one, the cleaner stays inert and never touches the filesystem.
/// Must be created from within a tokio runtime.
pub struct CodeCacheCleaner {
    scheduler: Option<RunOnceScheduler>,
}

impl CodeCacheCleaner {
    pub fn new(
        current_cache_path: Option<PathBuf>,
        channel: &ReleaseChannel,
        file_system: CacheFileSystemAccess,
        error_sink: ErrorRecorder,
    ) -> Self {
        Self::with_delay(current_cache_path, channel, file_system, error_sink, DEFAULT_CLEANUP_DELAY)
    }

    pub fn with_delay(
        current_cache_path: Option<PathBuf>,
        channel: &ReleaseChannel,
        file_system: CacheFileSystemAccess,
        error_sink: ErrorRecorder,
        delay: Duration,
    ) -> Self {
        let Some(current_cache_path) = current_cache_path.filter(|path| !path.as_os_str().is_empty()) else {
            log::debug!("[janitor.cleaner] no code cache in use, nothing to clean up");
            return Self { scheduler: None };
        };

        let policy = RetentionPolicy::for_channel(channel);
        let sweeper = Arc::new(RetentionSweeper::new(file_system, error_sink, policy));

        let scheduler = RunOnceScheduler::new(
            move || {
                let sweeper = sweeper.clone();
                let current_cache_path = current_cache_path.clone();
                async move {
                    sweeper.sweep(&current_cache_path).await;
                }
                .boxed()
            },
            delay,
        );

        log::info!(
            "[janitor.cleaner] cleanup scheduled in {:?} for {} channel (max age {:?})",
            delay,
            channel,
            policy.max_age()
        );
        scheduler.schedule();

        Self {
            scheduler: Some(scheduler),
        }
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.as_ref().is_some_and(RunOnceScheduler::is_scheduled)
    }

    /// Cancels the cleanup if it has not started yet; a running sweep is left to complete.
    ///
    /// Returns whether a pending cleanup was cancelled.
    pub fn dispose(&self) -> bool {
        self.scheduler.as_ref().is_some_and(RunOnceScheduler::cancel)
    }

    pub async fn wait_for_sweep(&self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.join().await;
        }
    }

    pub async fn shutdown(self) {
        let _ = self.dispose();
        self.wait_for_sweep().await;
    }
}
