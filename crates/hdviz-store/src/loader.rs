// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::instrumentation::LoadInstrumentation;
use hdviz_codec::{read_matrix, read_vector, DenseMatrix, Element};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Reads named array files below a dataset root and reports each read.
pub(crate) struct ArrayLoader<'a> {
    root: &'a Path,
    instrumentation: &'a dyn LoadInstrumentation,
}

impl<'a> ArrayLoader<'a> {
    pub(crate) fn new(root: &'a Path, instrumentation: &'a dyn LoadInstrumentation) -> Self {
        Self {
            root,
            instrumentation,
        }
    }

    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Fails with one error naming the first missing file when any of
    /// `names` does not exist.
    pub(crate) fn preflight<S: AsRef<str>>(&self, names: &[S]) -> Result<(), StoreError> {
        let missing: Vec<PathBuf> = names
            .iter()
            .map(|n| self.path(n.as_ref()))
            .filter(|p| !p.is_file())
            .collect();
        match missing.split_first() {
            None => Ok(()),
            Some((first, [])) => Err(StoreError::data_load(format!(
                "missing array file {}",
                first.display()
            ))),
            Some((first, rest)) => Err(StoreError::data_load(format!(
                "missing array file {} ({} more missing)",
                first.display(),
                rest.len()
            ))),
        }
    }

    pub(crate) fn vector<T: Element>(&self, name: &str) -> Result<Vec<T>, StoreError> {
        let path = self.path(name);
        let started = Instant::now();
        let values = read_vector::<T>(&path)?;
        self.observe(&path, started, values.len());
        Ok(values)
    }

    pub(crate) fn matrix<T: Element>(&self, name: &str) -> Result<DenseMatrix<T>, StoreError> {
        let path = self.path(name);
        let started = Instant::now();
        let matrix = read_matrix::<T>(&path)?;
        self.observe(&path, started, matrix.as_slice().len());
        Ok(matrix)
    }

    fn observe(&self, path: &Path, started: Instant, elements: usize) {
        let latency = started.elapsed();
        debug!(path = %path.display(), elements, "array file read");
        self.instrumentation.observe_file_read(path, latency);
    }
}
