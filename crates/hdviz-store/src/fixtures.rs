// SPDX-License-Identifier: Apache-2.0

//! Synthetic dataset directories for tests and benches.

use hdviz_codec::{write_matrix, write_vector, CodecError, CodecErrorCode, DenseMatrix};
use hdviz_model::{
    crystals_file, extrema_values_file, extrema_widths_file, CellArray, DatasetFiles, LayoutMode,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Bounding vectors written for every layout mode: center (1, 2), extent 4.
pub const LAYOUT_MIN: [f64; 2] = [0.0, 0.0];
pub const LAYOUT_MAX: [f64; 2] = [2.0, 4.0];

/// Describes a small but complete dataset and writes it to disk.
///
/// Every value is a closed-form function of level, cell, sample and
/// dimension, so tests can predict what a reload must return. Cell color
/// values stay inside the extrema range of their level.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub min_level: i32,
    pub max_level: i32,
    pub default_cells: usize,
    pub cells: BTreeMap<i32, usize>,
    pub dimension: usize,
    pub samples: usize,
    pub with_names: bool,
}

impl SyntheticDataset {
    #[must_use]
    pub fn new(min_level: i32, max_level: i32) -> Self {
        Self {
            min_level,
            max_level,
            default_cells: 2,
            cells: BTreeMap::new(),
            dimension: 3,
            samples: 4,
            with_names: true,
        }
    }

    #[must_use]
    pub fn with_cells(mut self, level: i32, cells: usize) -> Self {
        self.cells.insert(level, cells);
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn without_names(mut self) -> Self {
        self.with_names = false;
        self
    }

    #[must_use]
    pub fn cells_at(&self, level: i32) -> usize {
        self.cells.get(&level).copied().unwrap_or(self.default_cells)
    }

    /// Mean reconstruction entry.
    #[must_use]
    pub fn mean(level: i32, cell: usize, sample: usize, dim: usize) -> f64 {
        f64::from(level) * 100.0 + cell as f64 * 10.0 + sample as f64 + dim as f64 * 0.25
    }

    /// Raw embedding entry before normalization; `mode` indexes `LayoutMode::ALL`.
    #[must_use]
    pub fn embedding(mode: usize, cell: usize, sample: usize, row: usize) -> f64 {
        (mode * 100 + cell * 10 + sample + row) as f64
    }

    #[must_use]
    pub fn variance(dim: usize) -> f64 {
        0.5 + dim as f64 * 0.25
    }

    #[must_use]
    pub fn gradient(sample: usize, dim: usize) -> f64 {
        sample as f64 - dim as f64
    }

    /// Extrema values `level, level + 2, ...`, one more than the cell count.
    #[must_use]
    pub fn extrema_values(&self, level: i32) -> Vec<f64> {
        (0..=self.cells_at(level))
            .map(|k| f64::from(level) + k as f64 * 2.0)
            .collect()
    }

    #[must_use]
    pub fn widths(cell: usize, samples: usize) -> Vec<f64> {
        (0..samples).map(|s| s as f64 * (cell as f64 + 1.0)).collect()
    }

    pub fn write(&self, root: &Path) -> Result<(), CodecError> {
        let files = DatasetFiles::default();
        fs::create_dir_all(root)
            .map_err(|e| CodecError::new(CodecErrorCode::Io, root, e.to_string()))?;

        let persistence: Vec<f64> = (0..=self.max_level).map(|l| f64::from(l) * 0.1).collect();
        write_vector(&files.persistence_path(root), &persistence)?;
        write_vector(
            &files.persistence_start_path(root),
            &[f64::from(self.min_level)],
        )?;

        let geometry = Self::matrix(self.dimension, 5, |d, c| (d + c) as f64);
        write_matrix(&files.geometry_path(root), &geometry)?;
        if self.with_names {
            let names: Vec<String> = (0..self.dimension).map(|d| format!("x{d}")).collect();
            let path = files.names_path(root);
            fs::write(&path, names.join("\n"))
                .map_err(|e| CodecError::new(CodecErrorCode::Io, &path, e.to_string()))?;
        }

        for mode in LayoutMode::ALL {
            let layout = mode.files();
            write_vector(&root.join(layout.min_file), &LAYOUT_MIN)?;
            write_vector(&root.join(layout.max_file), &LAYOUT_MAX)?;
        }

        for level in self.min_level..=self.max_level {
            self.write_level(root, level)?;
        }
        Ok(())
    }

    fn write_level(&self, root: &Path, level: i32) -> Result<(), CodecError> {
        let cells = self.cells_at(level);
        let edges = DenseMatrix::from_column_major(
            2,
            cells,
            (0..cells).flat_map(|c| [c as i32, c as i32 + 1]).collect(),
        )
        .unwrap_or_else(|| DenseMatrix::zeros(2, cells));
        write_matrix(&root.join(crystals_file(level)), &edges)?;

        let ef = self.extrema_values(level);
        let efmin = ef.first().copied().unwrap_or_default();
        let efmax = ef.last().copied().unwrap_or_default();
        write_vector(&root.join(extrema_values_file(level)), &ef)?;
        let ew: Vec<f64> = (0..ef.len()).map(|k| k as f64 + 1.0).collect();
        write_vector(&root.join(extrema_widths_file(level)), &ew)?;

        for (m, mode) in LayoutMode::ALL.into_iter().enumerate() {
            let layout = mode.files();
            let extrema = Self::matrix(2, ef.len(), |r, k| (m + r + k) as f64);
            write_matrix(&root.join(layout.extrema_file(level)), &extrema)?;
            for c in 0..cells {
                let embedding =
                    Self::matrix(2, self.samples, |r, s| Self::embedding(m, c, s, r));
                write_matrix(&root.join(layout.cell_file(level, c)), &embedding)?;
            }
        }

        let last_sample = self.samples.saturating_sub(1).max(1) as f64;
        for c in 0..cells {
            let mean =
                Self::matrix(self.dimension, self.samples, |d, s| Self::mean(level, c, s, d));
            let variance = Self::matrix(self.dimension, self.samples, |d, _| Self::variance(d));
            let gradient = Self::matrix(self.dimension, self.samples, |d, s| Self::gradient(s, d));
            write_matrix(&root.join(CellArray::Mean.file(level, c)), &mean)?;
            write_matrix(&root.join(CellArray::Variance.file(level, c)), &variance)?;
            write_matrix(&root.join(CellArray::Gradient.file(level, c)), &gradient)?;

            let colors: Vec<f64> = (0..self.samples)
                .map(|s| efmin + (efmax - efmin) * s as f64 / last_sample)
                .collect();
            let densities: Vec<f64> = (0..self.samples).map(|s| 0.1 * (s as f64 + 1.0)).collect();
            write_vector(&root.join(CellArray::Color.file(level, c)), &colors)?;
            write_vector(
                &root.join(CellArray::Width.file(level, c)),
                &Self::widths(c, self.samples),
            )?;
            write_vector(&root.join(CellArray::Density.file(level, c)), &densities)?;
        }
        Ok(())
    }

    fn matrix(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> DenseMatrix<f64> {
        let data = (0..cols)
            .flat_map(|c| (0..rows).map(move |r| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        DenseMatrix::from_column_major(rows, cols, data)
            .unwrap_or_else(|| DenseMatrix::zeros(rows, cols))
    }
}
