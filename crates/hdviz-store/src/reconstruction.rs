// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::loader::ArrayLoader;
use hdviz_codec::DenseMatrix;
use hdviz_model::CellArray;

/// Per-dimension bounds aggregated over every cell and sample of a level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconstructionBounds {
    /// Minimum of `mean - variance`.
    pub rs_min: Vec<f64>,
    /// Maximum of `mean + variance`.
    pub rs_max: Vec<f64>,
    pub rv_min: Vec<f64>,
    pub rv_max: Vec<f64>,
    pub grad_min: Vec<f64>,
    pub grad_max: Vec<f64>,
    /// Largest entry of `rv_max`, never below zero.
    pub vmax: f64,
}

/// Regression reconstruction of every cell at one level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconstruction {
    pub mean: Vec<DenseMatrix<f64>>,
    pub variance: Vec<DenseMatrix<f64>>,
    pub gradient: Vec<DenseMatrix<f64>>,
    pub bounds: ReconstructionBounds,
}

pub(crate) fn required_files(level: i32, cell_count: usize) -> Vec<String> {
    (0..cell_count)
        .flat_map(|i| {
            [CellArray::Mean, CellArray::Gradient, CellArray::Variance]
                .into_iter()
                .map(move |a| a.file(level, i))
        })
        .collect()
}

pub(crate) fn load_reconstructions(
    loader: &ArrayLoader<'_>,
    level: i32,
    cell_count: usize,
) -> Result<Reconstruction, StoreError> {
    let mut mean: Vec<DenseMatrix<f64>> = Vec::with_capacity(cell_count);
    let mut gradient = Vec::with_capacity(cell_count);
    let mut variance = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        let r = loader.matrix::<f64>(&CellArray::Mean.file(level, i))?;
        let g = loader.matrix::<f64>(&CellArray::Gradient.file(level, i))?;
        let v = loader.matrix::<f64>(&CellArray::Variance.file(level, i))?;
        if !r.same_shape(&g) {
            return Err(shape_error(CellArray::Gradient.file(level, i), &r, &g));
        }
        if !r.same_shape(&v) {
            return Err(shape_error(CellArray::Variance.file(level, i), &r, &v));
        }
        if let Some(first) = mean.first() {
            if first.rows() != r.rows() {
                return Err(StoreError::data_load(format!(
                    "{} has {} dimensions, cell 0 has {}",
                    CellArray::Mean.file(level, i),
                    r.rows(),
                    first.rows()
                )));
            }
        }
        mean.push(r);
        gradient.push(g);
        variance.push(v);
    }
    let bounds = derive_bounds(&mean, &variance, &gradient);
    Ok(Reconstruction {
        mean,
        variance,
        gradient,
        bounds,
    })
}

fn shape_error(file: String, mean: &DenseMatrix<f64>, other: &DenseMatrix<f64>) -> StoreError {
    StoreError::data_load(format!(
        "{file} is {}x{}, mean reconstruction is {}x{}",
        other.rows(),
        other.cols(),
        mean.rows(),
        mean.cols()
    ))
}

/// Scans all cells and samples. The running bounds start from the first
/// sample of the first cell rather than from a sentinel. Cells whose three
/// matrices disagree in shape are skipped.
#[must_use]
pub fn derive_bounds(
    mean: &[DenseMatrix<f64>],
    variance: &[DenseMatrix<f64>],
    gradient: &[DenseMatrix<f64>],
) -> ReconstructionBounds {
    let mut bounds = ReconstructionBounds::default();
    let mut seeded = false;

    for ((r, v), g) in mean.iter().zip(variance).zip(gradient) {
        if !r.same_shape(v) || !r.same_shape(g) {
            continue;
        }
        for s in 0..r.cols() {
            let (rc, vc, gc) = (r.column(s), v.column(s), g.column(s));
            if !seeded {
                bounds.rs_min = rc.to_vec();
                bounds.rs_max = rc.to_vec();
                bounds.rv_min = vc.to_vec();
                bounds.rv_max = vc.to_vec();
                bounds.grad_min = gc.to_vec();
                bounds.grad_max = gc.to_vec();
                seeded = true;
            }
            for d in 0..rc.len().min(bounds.rs_min.len()) {
                let low = rc[d] - vc[d];
                let high = rc[d] + vc[d];
                if bounds.rs_min[d] > low {
                    bounds.rs_min[d] = low;
                }
                if bounds.rs_max[d] < high {
                    bounds.rs_max[d] = high;
                }
                if bounds.rv_min[d] > vc[d] {
                    bounds.rv_min[d] = vc[d];
                }
                if bounds.rv_max[d] < vc[d] {
                    bounds.rv_max[d] = vc[d];
                }
                if bounds.grad_min[d] > gc[d] {
                    bounds.grad_min[d] = gc[d];
                }
                if bounds.grad_max[d] < gc[d] {
                    bounds.grad_max[d] = gc[d];
                }
            }
        }
    }

    bounds.vmax = bounds
        .rv_max
        .iter()
        .fold(0.0, |acc, v| if acc < *v { *v } else { acc });
    bounds
}
