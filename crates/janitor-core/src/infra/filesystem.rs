// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::domain::interfaces::CacheFileSystem;
use crate::domain::models::CacheEntryStat;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::Path;

#[cfg(test)]
pub use fakes::{FakeCall, FakeFileSystem};

pub enum CacheFileSystemAccess {
    Local(LocalFileSystem),
    #[cfg(test)]
    Fake(FakeFileSystem),
}

impl CacheFileSystem for CacheFileSystemAccess {
    async fn list_directory(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        match self {
            CacheFileSystemAccess::Local(delegate) => delegate.list_directory(path).await,
            #[cfg(test)]
            CacheFileSystemAccess::Fake(fake) => fake.list_directory(path).await,
        }
    }

    async fn stat(&self, path: &Path) -> anyhow::Result<Option<CacheEntryStat>> {
        match self {
            CacheFileSystemAccess::Local(delegate) => delegate.stat(path).await,
            #[cfg(test)]
            CacheFileSystemAccess::Fake(fake) => fake.stat(path).await,
        }
    }

    async fn remove_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        match self {
            CacheFileSystemAccess::Local(delegate) => delegate.remove_dir_all(path).await,
            #[cfg(test)]
            CacheFileSystemAccess::Fake(fake) => fake.remove_dir_all(path).await,
        }
    }
}

#[derive(Default)]
pub struct LocalFileSystem;

impl CacheFileSystem for LocalFileSystem {
    async fn list_directory(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("janitor.fs : cannot list {:?}", path))?;

        let mut names = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("janitor.fs : cannot read entries of {:?}", path))?
        {
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("[janitor.fs] skipping non UTF-8 entry {:?}", raw),
            }
        }

        Ok(names)
    }

    async fn stat(&self, path: &Path) -> anyhow::Result<Option<CacheEntryStat>> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error).with_context(|| format!("janitor.fs : cannot stat {:?}", path)),
        };

        let modified = metadata
            .modified()
            .with_context(|| format!("janitor.fs : no modification time for {:?}", path))?;

        Ok(Some(CacheEntryStat::new(metadata.is_dir(), modified)))
    }

    async fn remove_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(_) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                log::info!("[janitor.fs] {:?} already removed", path);
                Ok(())
            },
            Err(error) => Err(error).with_context(|| format!("janitor.fs : cannot remove {:?}", path)),
        }
    }
}

#[cfg(test)]
mod fakes {
    use crate::domain::interfaces::CacheFileSystem;
    use crate::domain::models::CacheEntryStat;
    use anyhow::bail;
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex, MutexGuard};
    use std::time::SystemTime;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum FakeCall {
        List(PathBuf),
        Stat(PathBuf),
        Remove(PathBuf),
    }

    #[derive(Default)]
    struct FakeTree {
        entries: HashMap<PathBuf, CacheEntryStat>,
        unreadable: HashSet<PathBuf>,
        vanished: HashSet<PathBuf>,
        undeletable: HashSet<PathBuf>,
        calls: Vec<FakeCall>,
    }

    /// In-memory tree shared between clones, so tests keep a handle while the sweeper owns another
    #[derive(Clone, Default)]
    pub struct FakeFileSystem {
        tree: Arc<Mutex<FakeTree>>,
    }

    impl FakeFileSystem {
        fn tree(&self) -> MutexGuard<'_, FakeTree> {
            self.tree.lock().expect("fake filesystem lock poisoned")
        }

        pub fn with_directory(self, path: impl AsRef<Path>, modified: SystemTime) -> Self {
            let stat = CacheEntryStat::new(true, modified);
            self.tree().entries.insert(path.as_ref().to_path_buf(), stat);
            self
        }

        pub fn with_file(self, path: impl AsRef<Path>, modified: SystemTime) -> Self {
            let stat = CacheEntryStat::new(false, modified);
            self.tree().entries.insert(path.as_ref().to_path_buf(), stat);
            self
        }

        pub fn with_unreadable(self, path: impl AsRef<Path>) -> Self {
            self.tree().unreadable.insert(path.as_ref().to_path_buf());
            self
        }

        /// Keeps the entry in listings but makes it disappear before anyone can stat it
        pub fn with_vanished(self, path: impl AsRef<Path>) -> Self {
            self.tree().vanished.insert(path.as_ref().to_path_buf());
            self
        }

        pub fn with_undeletable(self, path: impl AsRef<Path>) -> Self {
            self.tree().undeletable.insert(path.as_ref().to_path_buf());
            self
        }

        pub fn exists(&self, path: impl AsRef<Path>) -> bool {
            self.tree().entries.contains_key(path.as_ref())
        }

        pub fn calls(&self) -> Vec<FakeCall> {
            self.tree().calls.clone()
        }

        pub fn removals(&self) -> Vec<PathBuf> {
            let mut removed = self
                .calls()
                .into_iter()
                .filter_map(|call| match call {
                    FakeCall::Remove(path) => Some(path),
                    _ => None,
                })
                .collect::<Vec<_>>();
            removed.sort();
            removed
        }
    }

    impl CacheFileSystem for FakeFileSystem {
        async fn list_directory(&self, path: &Path) -> anyhow::Result<Vec<String>> {
            let mut tree = self.tree();
            tree.calls.push(FakeCall::List(path.to_path_buf()));

            match tree.entries.get(path) {
                Some(stat) if stat.is_directory => {},
                _ => bail!("fake.fs : no such directory {:?}", path),
            }

            let names = tree
                .entries
                .keys()
                .filter(|entry| entry.parent() == Some(path))
                .filter_map(|entry| entry.file_name())
                .filter_map(|name| name.to_str())
                .map(|name| name.to_string())
                .collect();

            Ok(names)
        }

        async fn stat(&self, path: &Path) -> anyhow::Result<Option<CacheEntryStat>> {
            let mut tree = self.tree();
            tree.calls.push(FakeCall::Stat(path.to_path_buf()));

            if tree.unreadable.contains(path) {
                bail!("fake.fs : permission denied for {:?}", path)
            }

            if tree.vanished.contains(path) {
                return Ok(None);
            }

            Ok(tree.entries.get(path).copied())
        }

        async fn remove_dir_all(&self, path: &Path) -> anyhow::Result<()> {
            let mut tree = self.tree();
            tree.calls.push(FakeCall::Remove(path.to_path_buf()));

            if tree.undeletable.contains(path) {
                bail!("fake.fs : cannot remove {:?}", path)
            }

            tree.entries.retain(|entry, _| !entry.starts_with(path));
            Ok(())
        }
    }
}
