// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::loader::ArrayLoader;
use hdviz_codec::DenseMatrix;
use hdviz_model::LayoutMode;

/// Normalized 2D embeddings of one level under one layout mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub cells: Vec<DenseMatrix<f64>>,
    pub extrema: DenseMatrix<f64>,
    /// Bounding vectors as read from disk, before normalization.
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl Layout {
    /// Columns of the first cell's embedding, if the level has any cells.
    #[must_use]
    pub fn sample_count(&self) -> Option<usize> {
        self.cells.first().map(DenseMatrix::cols)
    }
}

pub(crate) fn required_files(mode: LayoutMode, level: i32, cell_count: usize) -> Vec<String> {
    let files = mode.files();
    let mut names = vec![files.min_file.to_string(), files.max_file.to_string()];
    names.extend((0..cell_count).map(|i| files.cell_file(level, i)));
    names.push(files.extrema_file(level));
    names
}

pub(crate) fn apply_layout(
    loader: &ArrayLoader<'_>,
    mode: LayoutMode,
    level: i32,
    cell_count: usize,
) -> Result<Layout, StoreError> {
    let files = mode.files();
    let min = loader.vector::<f64>(files.min_file)?;
    let max = loader.vector::<f64>(files.max_file)?;
    let transform = LayoutTransform::new(&min, &max).map_err(|e| {
        StoreError::data_load(format!("{} / {}: {e}", files.min_file, files.max_file))
    })?;

    let mut cells = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        let name = files.cell_file(level, i);
        let mut embedding = loader.matrix::<f64>(&name)?;
        transform
            .apply(&mut embedding)
            .map_err(|e| StoreError::data_load(format!("{name}: {e}")))?;
        cells.push(embedding);
    }

    let name = files.extrema_file(level);
    let mut extrema = loader.matrix::<f64>(&name)?;
    transform
        .apply(&mut extrema)
        .map_err(|e| StoreError::data_load(format!("{name}: {e}")))?;

    Ok(Layout {
        mode,
        cells,
        extrema,
        min,
        max,
    })
}

/// Recentring and scaling shared by every embedding of a mode.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTransform {
    center: Vec<f64>,
    factor: f64,
}

impl LayoutTransform {
    pub fn new(min: &[f64], max: &[f64]) -> Result<Self, String> {
        if min.len() < 2 || min.len() != max.len() {
            return Err(format!(
                "bounding vectors need at least 2 matching entries, got {} and {}",
                min.len(),
                max.len()
            ));
        }
        let diff: Vec<f64> = max.iter().zip(min).map(|(hi, lo)| hi - lo).collect();
        let r = if diff[0] < diff[1] { diff[1] } else { diff[0] };
        if !(r.is_finite() && r > 0.0) {
            return Err(format!("layout extent must be positive, got {r}"));
        }
        // The center is added, not subtracted.
        let center = diff.iter().zip(min).map(|(d, lo)| d * 0.5 + lo).collect();
        Ok(Self {
            center,
            factor: 2.0 / r,
        })
    }

    pub fn apply(&self, embedding: &mut DenseMatrix<f64>) -> Result<(), String> {
        if embedding.rows() != self.center.len() {
            return Err(format!(
                "embedding has {} rows, bounds have {}",
                embedding.rows(),
                self.center.len()
            ));
        }
        embedding.add_columnwise(&self.center);
        embedding.scale(self.factor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_adds_center_then_scales_by_two_over_extent() {
        let t = LayoutTransform::new(&[0.0, 0.0], &[4.0, 2.0]).expect("transform");
        let mut m = DenseMatrix::from_rows(&[vec![0.0, 4.0], vec![0.0, 2.0]]).expect("m");
        t.apply(&mut m).expect("apply");
        // center = (2, 1), r = 4, factor = 0.5
        assert_eq!(m.column(0), &[1.0, 0.5]);
        assert_eq!(m.column(1), &[3.0, 1.5]);
    }

    #[test]
    fn extent_uses_the_wider_of_the_first_two_axes() {
        let t = LayoutTransform::new(&[-1.0, 0.0, 0.0], &[1.0, 8.0, 100.0]).expect("t");
        assert_eq!(t.factor, 0.25);
    }

    #[test]
    fn short_or_mismatched_bounds_are_rejected() {
        assert!(LayoutTransform::new(&[0.0], &[1.0]).is_err());
        assert!(LayoutTransform::new(&[0.0, 0.0], &[1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn degenerate_extent_is_rejected() {
        assert!(LayoutTransform::new(&[1.0, 1.0], &[1.0, 1.0]).is_err());
        assert!(LayoutTransform::new(&[0.0, 0.0], &[f64::NAN, f64::NAN]).is_err());
    }

    #[test]
    fn embedding_rows_must_match_bounds() {
        let t = LayoutTransform::new(&[0.0, 0.0], &[1.0, 1.0]).expect("t");
        let mut m = DenseMatrix::<f64>::zeros(3, 2);
        assert!(t.apply(&mut m).is_err());
    }

    #[test]
    fn required_files_name_bounds_cells_and_extrema() {
        let files = required_files(LayoutMode::Pca2, 3, 2);
        assert_eq!(
            files,
            vec![
                "PCA2Min.data.hdr",
                "PCA2Max.data.hdr",
                "ps_3_crystal_0_pca2layout.data.hdr",
                "ps_3_crystal_1_pca2layout.data.hdr",
                "PCA2ExtremaLayout_3.data.hdr",
            ]
        );
    }
}
