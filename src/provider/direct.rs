//! Direct-path provider
//!
//! Resolves logical paths by concatenation against a single physical root;
//! existence checks delegate straight to the native stat call.

use std::path::{Path, PathBuf};

use crate::error::ProviderError;
use crate::provider::FilesystemProvider;
use crate::provider::path::{map_to_physical, normalize_logical};

pub struct DirectPathProvider {
    root: PathBuf,
}

impl DirectPathProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FilesystemProvider for DirectPathProvider {
    fn label(&self) -> &'static str {
        "direct"
    }

    fn resolve(&self, logical: &str) -> Result<PathBuf, ProviderError> {
        let normalized = normalize_logical(logical)?;
        Ok(map_to_physical(&self.root, &normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_root() {
        let provider = DirectPathProvider::new("/srv/data");
        assert_eq!(
            provider.resolve("reports/q1.txt").unwrap(),
            PathBuf::from("/srv/data/reports/q1.txt")
        );
    }

    #[test]
    fn traversal_is_an_error_not_a_miss() {
        let provider = DirectPathProvider::new("/srv/data");
        assert!(matches!(
            provider.resolve("../q1.txt"),
            Err(ProviderError::PathTraversal(_))
        ));
        assert!(provider.exists("../q1.txt").is_err());
    }
}
