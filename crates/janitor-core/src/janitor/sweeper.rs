// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::{CacheFileSystem, UnexpectedErrorReporting};
use crate::domain::models::{CacheEntryStat, CodeCachePath, EntryVerdict, RetentionPolicy, SweepOutcome};
use crate::infra::errors::ErrorRecorder;
use crate::infra::filesystem::CacheFileSystemAccess;
use futures::future::join_all;
use std::path::Path;
use std::time::SystemTime;

pub struct RetentionSweeper {
    file_system: CacheFileSystemAccess,
    error_sink: ErrorRecorder,
    policy: RetentionPolicy,
}

impl RetentionSweeper {
    pub fn new(file_system: CacheFileSystemAccess, error_sink: ErrorRecorder, policy: RetentionPolicy) -> Self {
        Self {
            file_system,
            error_sink,
            policy,
        }
    }

    /// Removes every sibling of the current code cache folder older than the retention policy allows.
    ///
    /// Never fails: a broken listing goes to the unexpected error sink, while failures on a
    /// single entry are logged and do not affect its siblings.
    pub async fn sweep(&self, current_cache_path: &Path) -> SweepOutcome {
        log::info!("[janitor.sweeper] starting to clean up old code cache folders");

        match self.sweep_siblings(current_cache_path).await {
            Ok(outcome) => {
                log::debug!("[janitor.sweeper] removed {} folder(s)", outcome.removed.len());
                outcome
            },
            Err(error) => {
                self.error_sink.report(error);
                SweepOutcome::default()
            },
        }
    }

    async fn sweep_siblings(&self, current_cache_path: &Path) -> anyhow::Result<SweepOutcome> {
        let now = SystemTime::now();
        let cache_path = CodeCachePath::try_from(current_cache_path)?;
        let siblings = self.file_system.list_directory(cache_path.root()).await?;

        let evictions = siblings
            .iter()
            .map(|name| self.evict_if_stale(&cache_path, name, now));

        let settled = join_all(evictions).await;

        let removed = siblings
            .into_iter()
            .zip(settled)
            .filter_map(|(name, verdict)| match verdict {
                Ok(EntryVerdict::Expired) => Some(name),
                Ok(_) => None,
                Err(error) => {
                    log::warn!("[janitor.sweeper] skipping {} : {:#}", name, error);
                    None
                },
            })
            .collect();

        Ok(SweepOutcome::new(removed))
    }

    async fn evict_if_stale(
        &self,
        cache_path: &CodeCachePath,
        name: &str,
        now: SystemTime,
    ) -> anyhow::Result<EntryVerdict> {
        if name == cache_path.leaf() {
            return Ok(EntryVerdict::Current);
        }

        let entry_path = cache_path.sibling(name);
        let Some(stat) = self.file_system.stat(&entry_path).await? else {
            log::debug!("[janitor.sweeper] {} vanished before cleanup", name);
            return Ok(EntryVerdict::Vanished);
        };

        let verdict = self.judge(&stat, now);

        if verdict.should_remove() {
            log::info!("[janitor.sweeper] removing code cache folder {}", name);
            self.file_system.remove_dir_all(&entry_path).await?;
        }

        Ok(verdict)
    }

    fn judge(&self, stat: &CacheEntryStat, now: SystemTime) -> EntryVerdict {
        if !stat.is_directory {
            return EntryVerdict::NotADirectory;
        }

        let age = self.policy.age_at(now, stat.modified);
        if self.policy.is_expired(age) {
            EntryVerdict::Expired
        } else {
            EntryVerdict::Fresh
        }
    }
}
