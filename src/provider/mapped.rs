//! Mount-mapped provider
//!
//! Resolves logical paths through a mount table before delegating to
//! physical storage. The same mapping runs before every existence check and
//! every write; skipping it on one of the two is the inconsistency this
//! variant exists to rule out.

use std::path::{Path, PathBuf};

use crate::error::ProviderError;
use crate::provider::FilesystemProvider;
use crate::provider::path::{map_to_physical, normalize_logical};

/// One logical-prefix-to-physical-directory mapping.
#[derive(Debug, Clone)]
pub struct Mount {
    logical_prefix: String,
    physical_root: PathBuf,
}

impl Mount {
    pub fn new(logical_prefix: impl Into<String>, physical_root: impl Into<PathBuf>) -> Self {
        let mut prefix = logical_prefix.into();
        if !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self {
            logical_prefix: prefix,
            physical_root: physical_root.into(),
        }
    }

    pub fn logical_prefix(&self) -> &str {
        &self.logical_prefix
    }

    pub fn physical_root(&self) -> &Path {
        &self.physical_root
    }

    /// Remainder of `normalized` under this mount, if the mount covers it.
    fn strip<'a>(&self, normalized: &'a str) -> Option<&'a str> {
        let rest = normalized.strip_prefix(self.logical_prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

pub struct MappedProvider {
    root: PathBuf,
    mounts: Vec<Mount>,
}

impl MappedProvider {
    /// `root` backs every logical path no mount covers. With an empty mount
    /// table the mapping is the identity and the provider must behave
    /// exactly like a direct provider over the same root.
    pub fn new(root: impl Into<PathBuf>, mut mounts: Vec<Mount>) -> Self {
        // Longest prefix wins; order the table once.
        mounts.sort_by(|a, b| b.logical_prefix.len().cmp(&a.logical_prefix.len()));
        Self {
            root: root.into(),
            mounts,
        }
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    fn lookup<'a>(&'a self, normalized: &'a str) -> (&'a Path, &'a str) {
        for mount in &self.mounts {
            if let Some(rest) = mount.strip(normalized) {
                return (mount.physical_root.as_path(), rest);
            }
        }
        (self.root.as_path(), normalized)
    }
}

impl FilesystemProvider for MappedProvider {
    fn label(&self) -> &'static str {
        "mapped"
    }

    fn resolve(&self, logical: &str) -> Result<PathBuf, ProviderError> {
        let normalized = normalize_logical(logical)?;
        let (physical_root, rest) = self.lookup(&normalized);
        Ok(map_to_physical(physical_root, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MappedProvider {
        MappedProvider::new(
            "/srv/default",
            vec![
                Mount::new("/archive", "/mnt/cold"),
                Mount::new("/archive/hot", "/mnt/warm"),
            ],
        )
    }

    #[test]
    fn falls_back_to_root_without_matching_mount() {
        assert_eq!(
            provider().resolve("/notes/a.txt").unwrap(),
            PathBuf::from("/srv/default/notes/a.txt")
        );
    }

    #[test]
    fn longest_prefix_wins() {
        let p = provider();
        assert_eq!(
            p.resolve("/archive/2024.txt").unwrap(),
            PathBuf::from("/mnt/cold/2024.txt")
        );
        assert_eq!(
            p.resolve("/archive/hot/now.txt").unwrap(),
            PathBuf::from("/mnt/warm/now.txt")
        );
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        // "/archived" is not under the "/archive" mount
        assert_eq!(
            provider().resolve("/archived/x.txt").unwrap(),
            PathBuf::from("/srv/default/archived/x.txt")
        );
    }

    #[test]
    fn empty_mount_table_is_identity_mapping() {
        let p = MappedProvider::new("/srv/data", Vec::new());
        assert_eq!(
            p.resolve("reports/q1.txt").unwrap(),
            PathBuf::from("/srv/data/reports/q1.txt")
        );
    }

    #[test]
    fn mount_prefix_is_normalized() {
        let mount = Mount::new("archive/", "/mnt/cold");
        assert_eq!(mount.logical_prefix(), "/archive");
    }
}
