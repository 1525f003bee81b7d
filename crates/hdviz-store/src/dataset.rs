// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::loader::ArrayLoader;
use hdviz_model::{DatasetFiles, LevelRange};
use std::fs;
use std::io::ErrorKind;
use tracing::warn;

/// Dataset-wide constants read once when a dataset root is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    persistence: Vec<f64>,
    levels: LevelRange,
    r_min: Vec<f64>,
    r_max: Vec<f64>,
    names: Vec<String>,
}

impl DatasetInfo {
    pub(crate) fn load(loader: &ArrayLoader<'_>, files: &DatasetFiles) -> Result<Self, StoreError> {
        loader.preflight(&[
            files.persistence.as_str(),
            files.persistence_start.as_str(),
            files.geometry.as_str(),
        ])?;

        let persistence = loader.vector::<f64>(&files.persistence)?;
        if persistence.is_empty() {
            return Err(StoreError::data_load(format!(
                "{} holds no persistence values",
                files.persistence
            )));
        }
        let max_level = i32::try_from(persistence.len() - 1).map_err(|_| {
            StoreError::data_load(format!("{} holds too many levels", files.persistence))
        })?;

        let start = loader.vector::<f64>(&files.persistence_start)?;
        let min_level = match start.first() {
            Some(v) if v.is_finite() => *v as i32,
            _ => {
                return Err(StoreError::data_load(format!(
                    "{} must hold a finite start level",
                    files.persistence_start
                )))
            }
        };
        let levels = LevelRange::new(min_level, max_level)
            .map_err(|e| StoreError::data_load(e.to_string()))?;

        let geometry = loader.matrix::<f64>(&files.geometry)?;
        let r_min = geometry.row_min().unwrap_or_default();
        let r_max = geometry.row_max().unwrap_or_default();

        let mut names = vec![String::new(); geometry.rows()];
        let names_path = loader.path(&files.names);
        match fs::read_to_string(&names_path) {
            Ok(text) => {
                for (slot, line) in names.iter_mut().zip(text.lines()) {
                    *slot = line.to_string();
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    path = %names_path.display(),
                    "dimension names file absent; names left blank"
                );
            }
            Err(e) => {
                warn!(
                    path = %names_path.display(),
                    error = %e,
                    "dimension names unreadable; names left blank"
                );
            }
        }

        Ok(Self {
            persistence,
            levels,
            r_min,
            r_max,
            names,
        })
    }

    /// Sorted persistence values, one per level index.
    #[must_use]
    pub fn persistence(&self) -> &[f64] {
        &self.persistence
    }

    #[must_use]
    pub fn levels(&self) -> LevelRange {
        self.levels
    }

    #[must_use]
    pub fn min_level(&self) -> i32 {
        self.levels.min
    }

    #[must_use]
    pub fn max_level(&self) -> i32 {
        self.levels.max
    }

    /// Row-wise minimum of the ambient geometry.
    #[must_use]
    pub fn r_min(&self) -> &[f64] {
        &self.r_min
    }

    #[must_use]
    pub fn r_max(&self) -> &[f64] {
        &self.r_max
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.names.len()
    }
}
