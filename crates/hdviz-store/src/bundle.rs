// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::layout::{self, Layout};
use crate::loader::ArrayLoader;
use crate::reconstruction::{self, Reconstruction};
use crate::statistics::{self, Statistics};
use hdviz_codec::DenseMatrix;
use hdviz_model::{crystals_file, LayoutMode};

/// Every array of one resident level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBundle {
    pub level: i32,
    /// Cell adjacency; one column per cell.
    pub edges: DenseMatrix<i32>,
    pub reconstruction: Reconstruction,
    pub layout: Layout,
    pub statistics: Statistics,
    pub sample_count: usize,
}

impl LevelBundle {
    /// Builds a complete bundle without touching any resident state.
    ///
    /// `fallback_sample_count` is kept when the level has no cells.
    pub(crate) fn load(
        loader: &ArrayLoader<'_>,
        level: i32,
        mode: LayoutMode,
        fallback_sample_count: usize,
    ) -> Result<Self, StoreError> {
        let edges_file = crystals_file(level);
        loader.preflight(&[edges_file.as_str()])?;
        let edges = loader.matrix::<i32>(&edges_file)?;
        let cell_count = edges.cols();

        loader.preflight(&required_files(mode, level, cell_count))?;
        let layout = layout::apply_layout(loader, mode, level, cell_count)?;
        let reconstruction = reconstruction::load_reconstructions(loader, level, cell_count)?;
        let statistics = statistics::load_statistics(loader, level, cell_count)?;

        Ok(Self {
            level,
            sample_count: layout.sample_count().unwrap_or(fallback_sample_count),
            edges,
            reconstruction,
            layout,
            statistics,
        })
    }

    /// Loads the layout arrays of `mode` for this bundle's level.
    pub(crate) fn load_layout(
        &self,
        loader: &ArrayLoader<'_>,
        mode: LayoutMode,
    ) -> Result<Layout, StoreError> {
        let cell_count = self.cell_count();
        loader.preflight(&layout::required_files(mode, self.level, cell_count))?;
        layout::apply_layout(loader, mode, self.level, cell_count)
    }

    /// Swaps in a layout produced by [`LevelBundle::load_layout`].
    pub(crate) fn replace_layout(&mut self, layout: Layout) {
        if let Some(samples) = layout.sample_count() {
            self.sample_count = samples;
        }
        self.layout = layout;
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.edges.cols()
    }

    #[must_use]
    pub fn layout_mode(&self) -> LayoutMode {
        self.layout.mode
    }
}

/// Every file a full reload of `level` reads once the cell count is known.
pub(crate) fn required_files(mode: LayoutMode, level: i32, cell_count: usize) -> Vec<String> {
    let mut names = layout::required_files(mode, level, cell_count);
    names.extend(reconstruction::required_files(level, cell_count));
    names.extend(statistics::required_files(level, cell_count));
    names
}
