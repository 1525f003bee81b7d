// SPDX-License-Identifier: Apache-2.0

use crate::bundle::LevelBundle;
use crate::config::CacheConfig;
use crate::dataset::DatasetInfo;
use crate::error::StoreError;
use crate::instrumentation::{LoadInstrumentation, NoopInstrumentation, ReloadKind};
use crate::layout::Layout;
use crate::loader::ArrayLoader;
use crate::reconstruction::ReconstructionBounds;
use hdviz_codec::DenseMatrix;
use hdviz_model::{ColorMapper, LayoutMode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn};

/// Observable cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// The given level is resident and no reload is running.
    Idle(i32),
    /// A replacement bundle is being built.
    Reloading,
}

/// A reload built outside the resident slot, ready to be swapped in.
pub(crate) enum StagedReload {
    Level(Box<LevelBundle>),
    Layout(Layout),
}

/// Single-slot cache holding every array of exactly one persistence level.
///
/// Level-parameterized getters take `&mut self` because they may swap the
/// resident level; the views they return stay valid until the next call
/// that can mutate. [`LevelCache::current`] reads without any I/O.
pub struct LevelCache {
    config: CacheConfig,
    dataset: DatasetInfo,
    resident: LevelBundle,
    instrumentation: Arc<dyn LoadInstrumentation>,
}

impl LevelCache {
    /// Opens a dataset root and loads its coarsest level.
    pub fn open(config: CacheConfig) -> Result<Self, StoreError> {
        Self::open_instrumented(config, Arc::new(NoopInstrumentation))
    }

    pub fn open_instrumented(
        config: CacheConfig,
        instrumentation: Arc<dyn LoadInstrumentation>,
    ) -> Result<Self, StoreError> {
        config.validate()?;
        let span = info_span!("dataset_open", root = %config.root.display());
        let _guard = span.enter();
        let started = Instant::now();

        let loader = ArrayLoader::new(&config.root, instrumentation.as_ref());
        let opened = DatasetInfo::load(&loader, &config.files).and_then(|dataset| {
            let level = dataset.max_level();
            LevelBundle::load(&loader, level, config.layout, config.default_sample_count)
                .map(|bundle| (dataset, bundle))
        });
        let (dataset, resident) = match opened {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "failed to open dataset");
                instrumentation.observe_error(e.code);
                return Err(e);
            }
        };

        let elapsed = started.elapsed();
        instrumentation.observe_reload(resident.level, ReloadKind::Level, elapsed);
        info!(
            min_level = dataset.min_level(),
            max_level = dataset.max_level(),
            dimension = dataset.dimension(),
            cells = resident.cell_count(),
            mode = %resident.layout_mode(),
            elapsed_ms = elapsed.as_millis() as u64,
            "dataset opened"
        );
        Ok(Self {
            config,
            dataset,
            resident,
            instrumentation,
        })
    }

    /// Makes `level` resident. A resident level is a no-op without I/O.
    pub fn select_level(&mut self, level: i32) -> Result<(), StoreError> {
        if let Some(staged) = self.stage_level(level)? {
            self.commit(staged);
        }
        Ok(())
    }

    /// Activates `mode` and reloads its layout arrays for `level`. A level
    /// that is not resident is fully reloaded under the new mode.
    pub fn set_layout(&mut self, mode: LayoutMode, level: i32) -> Result<(), StoreError> {
        let staged = self.stage_layout(mode, level)?;
        self.commit(staged);
        Ok(())
    }

    /// [`LevelCache::set_layout`] with a mode name such as `"pca2"`.
    pub fn set_layout_named(&mut self, mode: &str, level: i32) -> Result<(), StoreError> {
        let mode = LayoutMode::parse(mode).map_err(|e| self.fail(e.into()))?;
        self.set_layout(mode, level)
    }

    pub(crate) fn check_level(&self, level: i32) -> Result<(), StoreError> {
        self.dataset
            .levels()
            .check(level)
            .map(|_| ())
            .map_err(|e| self.fail(StoreError::out_of_range(e.0)))
    }

    /// Builds the bundle for `level`, or `None` when it is already resident.
    pub(crate) fn stage_level(&self, level: i32) -> Result<Option<StagedReload>, StoreError> {
        self.check_level(level)?;
        if self.resident.level == level {
            return Ok(None);
        }
        let mode = self.resident.layout_mode();
        self.reload(level, mode, ReloadKind::Level, || {
            let loader = self.loader();
            LevelBundle::load(&loader, level, mode, self.resident.sample_count)
                .map(|bundle| StagedReload::Level(Box::new(bundle)))
        })
        .map(Some)
    }

    pub(crate) fn stage_layout(
        &self,
        mode: LayoutMode,
        level: i32,
    ) -> Result<StagedReload, StoreError> {
        self.check_level(level)?;
        if self.resident.level != level {
            return self.reload(level, mode, ReloadKind::Level, || {
                let loader = self.loader();
                LevelBundle::load(&loader, level, mode, self.resident.sample_count)
                    .map(|bundle| StagedReload::Level(Box::new(bundle)))
            });
        }
        self.reload(level, mode, ReloadKind::Layout, || {
            let loader = self.loader();
            self.resident
                .load_layout(&loader, mode)
                .map(StagedReload::Layout)
        })
    }

    pub(crate) fn commit(&mut self, staged: StagedReload) {
        match staged {
            StagedReload::Level(bundle) => self.resident = *bundle,
            StagedReload::Layout(layout) => self.resident.replace_layout(layout),
        }
    }

    fn reload(
        &self,
        level: i32,
        mode: LayoutMode,
        kind: ReloadKind,
        build: impl FnOnce() -> Result<StagedReload, StoreError>,
    ) -> Result<StagedReload, StoreError> {
        let span = info_span!("level_reload", level, mode = %mode, kind = ?kind);
        let _guard = span.enter();
        let started = Instant::now();
        match build() {
            Ok(staged) => {
                let elapsed = started.elapsed();
                self.instrumentation.observe_reload(level, kind, elapsed);
                let cells = match &staged {
                    StagedReload::Level(bundle) => bundle.cell_count(),
                    StagedReload::Layout(layout) => layout.cells.len(),
                };
                info!(
                    from = self.resident.level,
                    cells,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "level reloaded"
                );
                Ok(staged)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    resident = self.resident.level,
                    "reload failed; resident level kept"
                );
                Err(self.fail(e))
            }
        }
    }

    fn fail(&self, error: StoreError) -> StoreError {
        self.instrumentation.observe_error(error.code);
        error
    }

    fn loader(&self) -> ArrayLoader<'_> {
        ArrayLoader::new(&self.config.root, self.instrumentation.as_ref())
    }

    fn ensure(&mut self, level: i32) -> Result<&LevelBundle, StoreError> {
        self.select_level(level)?;
        Ok(&self.resident)
    }

    fn ensure_layout(&mut self, mode: LayoutMode, level: i32) -> Result<&Layout, StoreError> {
        if self.resident.level != level || self.resident.layout_mode() != mode {
            self.set_layout(mode, level)?;
        }
        Ok(&self.resident.layout)
    }

    /// The resident bundle; never performs I/O.
    #[must_use]
    pub fn current(&self) -> &LevelBundle {
        &self.resident
    }

    #[must_use]
    pub fn resident_level(&self) -> i32 {
        self.resident.level
    }

    #[must_use]
    pub fn layout_mode(&self) -> LayoutMode {
        self.resident.layout_mode()
    }

    #[must_use]
    pub fn state(&self) -> CacheState {
        CacheState::Idle(self.resident.level)
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &DatasetInfo {
        &self.dataset
    }

    #[must_use]
    pub fn min_level(&self) -> i32 {
        self.dataset.min_level()
    }

    #[must_use]
    pub fn max_level(&self) -> i32 {
        self.dataset.max_level()
    }

    /// Samples per cell of the resident layout.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.resident.sample_count
    }

    #[must_use]
    pub fn persistence(&self) -> &[f64] {
        self.dataset.persistence()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        self.dataset.names()
    }

    #[must_use]
    pub fn r_min(&self) -> &[f64] {
        self.dataset.r_min()
    }

    #[must_use]
    pub fn r_max(&self) -> &[f64] {
        self.dataset.r_max()
    }

    pub fn edges(&mut self, level: i32) -> Result<&DenseMatrix<i32>, StoreError> {
        Ok(&self.ensure(level)?.edges)
    }

    pub fn cell_count(&mut self, level: i32) -> Result<usize, StoreError> {
        Ok(self.ensure(level)?.cell_count())
    }

    /// Mean reconstruction of every cell.
    pub fn reconstruction(&mut self, level: i32) -> Result<&[DenseMatrix<f64>], StoreError> {
        Ok(&self.ensure(level)?.reconstruction.mean)
    }

    pub fn variance(&mut self, level: i32) -> Result<&[DenseMatrix<f64>], StoreError> {
        Ok(&self.ensure(level)?.reconstruction.variance)
    }

    pub fn gradient(&mut self, level: i32) -> Result<&[DenseMatrix<f64>], StoreError> {
        Ok(&self.ensure(level)?.reconstruction.gradient)
    }

    pub fn bounds(&mut self, level: i32) -> Result<&ReconstructionBounds, StoreError> {
        Ok(&self.ensure(level)?.reconstruction.bounds)
    }

    pub fn rs_min(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.bounds(level)?.rs_min)
    }

    pub fn rs_max(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.bounds(level)?.rs_max)
    }

    pub fn rv_min(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.bounds(level)?.rv_min)
    }

    pub fn rv_max(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.bounds(level)?.rv_max)
    }

    pub fn gradient_min(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.bounds(level)?.grad_min)
    }

    pub fn gradient_max(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.bounds(level)?.grad_max)
    }

    pub fn variance_max(&mut self, level: i32) -> Result<f64, StoreError> {
        Ok(self.bounds(level)?.vmax)
    }

    pub fn extrema_values(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.ensure(level)?.statistics.extrema_values)
    }

    pub fn extrema_normalized(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.ensure(level)?.statistics.extrema_normalized)
    }

    /// Extrema widths on the cell width scale.
    pub fn extrema_widths(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.ensure(level)?.statistics.extrema_widths)
    }

    pub fn extrema_widths_raw(&mut self, level: i32) -> Result<&[f64], StoreError> {
        Ok(&self.ensure(level)?.statistics.extrema_widths_raw)
    }

    pub fn extrema_min(&mut self, level: i32) -> Result<f64, StoreError> {
        Ok(self.ensure(level)?.statistics.efmin)
    }

    pub fn extrema_max(&mut self, level: i32) -> Result<f64, StoreError> {
        Ok(self.ensure(level)?.statistics.efmax)
    }

    pub fn colors(&mut self, level: i32) -> Result<&[Vec<f64>], StoreError> {
        Ok(&self.ensure(level)?.statistics.colors)
    }

    pub fn colors_normalized(&mut self, level: i32) -> Result<&[Vec<f64>], StoreError> {
        Ok(&self.ensure(level)?.statistics.colors_normalized)
    }

    pub fn widths(&mut self, level: i32) -> Result<&[Vec<f64>], StoreError> {
        Ok(&self.ensure(level)?.statistics.widths)
    }

    pub fn widths_raw(&mut self, level: i32) -> Result<&[Vec<f64>], StoreError> {
        Ok(&self.ensure(level)?.statistics.widths_raw)
    }

    /// Smallest raw cell width.
    pub fn width_min(&mut self, level: i32) -> Result<f64, StoreError> {
        Ok(self.ensure(level)?.statistics.width_min)
    }

    pub fn width_max(&mut self, level: i32) -> Result<f64, StoreError> {
        Ok(self.ensure(level)?.statistics.width_max)
    }

    pub fn densities(&mut self, level: i32) -> Result<&[Vec<f64>], StoreError> {
        Ok(&self.ensure(level)?.statistics.densities)
    }

    pub fn colormap(&mut self, level: i32) -> Result<&ColorMapper, StoreError> {
        Ok(&self.ensure(level)?.statistics.colormap)
    }

    pub fn density_colormap(&mut self, level: i32) -> Result<&ColorMapper, StoreError> {
        Ok(&self.ensure(level)?.statistics.dcolormap)
    }

    /// Per-cell embeddings of `level` under `mode`.
    pub fn layout(
        &mut self,
        mode: LayoutMode,
        level: i32,
    ) -> Result<&[DenseMatrix<f64>], StoreError> {
        Ok(&self.ensure_layout(mode, level)?.cells)
    }

    pub fn extrema_layout(
        &mut self,
        mode: LayoutMode,
        level: i32,
    ) -> Result<&DenseMatrix<f64>, StoreError> {
        Ok(&self.ensure_layout(mode, level)?.extrema)
    }

    /// Mean reconstruction of one sample along one dimension.
    pub fn selected_coordinate(
        &mut self,
        level: i32,
        cell: usize,
        sample: usize,
        dim: usize,
    ) -> Result<f64, StoreError> {
        let bundle = self.ensure(level)?;
        lookup(&bundle.reconstruction.mean, cell, sample, dim)
    }

    pub fn selected_variance(
        &mut self,
        level: i32,
        cell: usize,
        sample: usize,
        dim: usize,
    ) -> Result<f64, StoreError> {
        let bundle = self.ensure(level)?;
        lookup(&bundle.reconstruction.variance, cell, sample, dim)
    }
}

fn lookup(
    cells: &[DenseMatrix<f64>],
    cell: usize,
    sample: usize,
    dim: usize,
) -> Result<f64, StoreError> {
    let matrix = cells.get(cell).ok_or_else(|| {
        StoreError::out_of_range(format!("cell {cell} outside [0, {})", cells.len()))
    })?;
    matrix.try_get(dim, sample).ok_or_else(|| {
        StoreError::out_of_range(format!(
            "sample {sample} / dimension {dim} outside {} x {}",
            matrix.cols(),
            matrix.rows()
        ))
    })
}
