// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use anyhow::{Context, bail};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

static STABLE_CHANNEL_NAME: &str = "stable";

const SECONDS_PER_DAY: u64 = 60 * 60 * 24;
const PRERELEASE_MAX_AGE: Duration = Duration::from_secs(SECONDS_PER_DAY * 7);
const STABLE_MAX_AGE: Duration = Duration::from_secs(SECONDS_PER_DAY * 30 * 3);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseChannel {
    Stable,
    Prerelease(String),
}

impl From<&str> for ReleaseChannel {
    fn from(value: &str) -> Self {
        if value == STABLE_CHANNEL_NAME {
            ReleaseChannel::Stable
        } else {
            ReleaseChannel::Prerelease(value.to_string())
        }
    }
}

impl Display for ReleaseChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseChannel::Stable => f.write_str(STABLE_CHANNEL_NAME),
            ReleaseChannel::Prerelease(name) => f.write_str(name),
        }
    }
}

/// Maximum age a code cache folder may reach before being swept away
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_age: Duration,
}

impl RetentionPolicy {
    pub fn for_channel(channel: &ReleaseChannel) -> Self {
        let max_age = match channel {
            ReleaseChannel::Stable => STABLE_MAX_AGE,
            ReleaseChannel::Prerelease(_) => PRERELEASE_MAX_AGE,
        };

        Self { max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn is_expired(&self, age: Duration) -> bool {
        age > self.max_age
    }

    pub fn age_at(&self, now: SystemTime, modified: SystemTime) -> Duration {
        // Clock skew or a touch from another process may leave mtime in the future
        now.duration_since(modified).unwrap_or(Duration::ZERO)
    }
}

/// The code cache folder in use by the running process, split as (root, leaf)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeCachePath {
    root: PathBuf,
    leaf: String,
}

impl TryFrom<&Path> for CodeCachePath {
    type Error = anyhow::Error;

    fn try_from(value: &Path) -> anyhow::Result<Self> {
        let Some(leaf) = value.file_name() else {
            bail!("janitor.models : no folder name in {:?}", value)
        };

        let leaf = leaf
            .to_str()
            .with_context(|| format!("janitor.models : non UTF-8 folder name in {:?}", value))?
            .to_string();

        let root = match value.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => bail!("janitor.models : no parent folder for {:?}", value),
        };

        Ok(Self { root, leaf })
    }
}

impl CodeCachePath {
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub fn leaf(&self) -> &str {
        self.leaf.as_str()
    }

    pub fn sibling(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheEntryStat {
    pub is_directory: bool,
    pub modified: SystemTime,
}

impl CacheEntryStat {
    pub fn new(is_directory: bool, modified: SystemTime) -> Self {
        Self { is_directory, modified }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryVerdict {
    Current,
    NotADirectory,
    Fresh,
    Expired,
    Vanished,
}

impl EntryVerdict {
    pub fn should_remove(&self) -> bool {
        matches!(self, EntryVerdict::Expired)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub removed: Vec<String>,
}

impl SweepOutcome {
    pub fn new(mut removed: Vec<String>) -> Self {
        removed.sort();
        Self { removed }
    }
}
