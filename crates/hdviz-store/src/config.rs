// SPDX-License-Identifier: Apache-2.0

use crate::error::{StoreError, StoreErrorCode};
use hdviz_model::{DatasetFiles, LayoutMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT: &str = "./";
pub const DEFAULT_SAMPLE_COUNT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub root: PathBuf,
    pub files: DatasetFiles,
    /// Layout mode active when the dataset is opened.
    pub layout: LayoutMode,
    /// Samples per cell reported until a level's layout has been read.
    pub default_sample_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            files: DatasetFiles::default(),
            layout: LayoutMode::default(),
            default_sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl CacheConfig {
    /// An empty root falls back to the working directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            root: if root.as_os_str().is_empty() {
                PathBuf::from(DEFAULT_ROOT)
            } else {
                root
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Io,
                format!("failed to read config {}: {e}", path.display()),
            )
        })?;
        let cfg: Self = serde_json::from_str(&raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::InvalidArgument,
                format!("invalid config {}: {e}", path.display()),
            )
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.default_sample_count == 0 {
            return Err(StoreError::new(
                StoreErrorCode::InvalidArgument,
                "default_sample_count must be > 0",
            ));
        }
        for (field, name) in [
            ("persistence", &self.files.persistence),
            ("persistence_start", &self.files.persistence_start),
            ("geometry", &self.files.geometry),
            ("names", &self.files.names),
        ] {
            if name.trim().is_empty() {
                return Err(StoreError::new(
                    StoreErrorCode::InvalidArgument,
                    format!("files.{field} must not be empty"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_root_falls_back_to_working_directory() {
        assert_eq!(CacheConfig::new("").root, PathBuf::from("./"));
        assert_eq!(CacheConfig::new("/data/x").root, PathBuf::from("/data/x"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CacheConfig =
            serde_json::from_str(r#"{"root":"/d","layout":"pca"}"#).expect("config");
        assert_eq!(cfg.layout, LayoutMode::Pca);
        assert_eq!(cfg.default_sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(cfg.files, DatasetFiles::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_sample_count_is_rejected() {
        let cfg = CacheConfig {
            default_sample_count: 0,
            ..CacheConfig::default()
        };
        let err = cfg.validate().expect_err("invalid");
        assert_eq!(err.code, StoreErrorCode::InvalidArgument);
    }
}
