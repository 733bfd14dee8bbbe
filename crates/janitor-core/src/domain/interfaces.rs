// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::models::CacheEntryStat;
use std::path::Path;

pub trait CacheFileSystem {
    async fn list_directory(&self, path: &Path) -> anyhow::Result<Vec<String>>;
    /// Yields `None` when nothing exists at the given path
    async fn stat(&self, path: &Path) -> anyhow::Result<Option<CacheEntryStat>>;
    /// Removes a folder and everything below it; a missing target is not an error
    async fn remove_dir_all(&self, path: &Path) -> anyhow::Result<()>;
}

pub trait UnexpectedErrorReporting {
    fn report(&self, error: anyhow::Error);
}
