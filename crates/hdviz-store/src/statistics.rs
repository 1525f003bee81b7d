// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::loader::ArrayLoader;
use hdviz_model::{extrema_values_file, extrema_widths_file, CellArray, ColorMapper};

/// Offset added to every rescaled width.
pub const WIDTH_OFFSET: f64 = 0.03;
/// Span of rescaled widths above [`WIDTH_OFFSET`].
pub const WIDTH_SPAN: f64 = 0.3;

/// Scalar per-sample arrays of one level and the values derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Extrema function values as stored.
    pub extrema_values: Vec<f64>,
    /// `extrema_values` mapped onto `[0, 1]` by the extrema range.
    pub extrema_normalized: Vec<f64>,
    pub efmin: f64,
    pub efmax: f64,
    pub extrema_widths: Vec<f64>,
    pub extrema_widths_raw: Vec<f64>,
    /// Per-cell color values as stored.
    pub colors: Vec<Vec<f64>>,
    /// Per-cell color values normalized by the extrema range.
    pub colors_normalized: Vec<Vec<f64>>,
    pub widths: Vec<Vec<f64>>,
    pub widths_raw: Vec<Vec<f64>>,
    /// Bounds of the raw cell widths.
    pub width_min: f64,
    pub width_max: f64,
    pub densities: Vec<Vec<f64>>,
    pub density_min: f64,
    pub density_max: f64,
    pub colormap: ColorMapper,
    pub dcolormap: ColorMapper,
}

pub(crate) fn required_files(level: i32, cell_count: usize) -> Vec<String> {
    let mut names = vec![extrema_values_file(level), extrema_widths_file(level)];
    for i in 0..cell_count {
        for array in [CellArray::Color, CellArray::Width, CellArray::Density] {
            names.push(array.file(level, i));
        }
    }
    names
}

pub(crate) fn load_statistics(
    loader: &ArrayLoader<'_>,
    level: i32,
    cell_count: usize,
) -> Result<Statistics, StoreError> {
    let extrema_values = loader.vector::<f64>(&extrema_values_file(level))?;
    let extrema_widths = loader.vector::<f64>(&extrema_widths_file(level))?;
    let mut colors = Vec::with_capacity(cell_count);
    let mut widths = Vec::with_capacity(cell_count);
    let mut densities = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        colors.push(loader.vector::<f64>(&CellArray::Color.file(level, i))?);
        widths.push(loader.vector::<f64>(&CellArray::Width.file(level, i))?);
        densities.push(loader.vector::<f64>(&CellArray::Density.file(level, i))?);
    }
    Ok(derive_statistics(
        extrema_values,
        extrema_widths,
        colors,
        widths,
        densities,
    ))
}

/// Computes every derived quantity from the raw arrays of a level.
#[must_use]
pub fn derive_statistics(
    extrema_values: Vec<f64>,
    extrema_widths: Vec<f64>,
    colors: Vec<Vec<f64>>,
    widths: Vec<Vec<f64>>,
    densities: Vec<Vec<f64>>,
) -> Statistics {
    let (efmin, efmax) = min_max(extrema_values.iter().copied()).unwrap_or((0.0, 0.0));
    let extrema_normalized = normalize(&extrema_values, efmin, efmax);
    let colors_normalized = colors
        .iter()
        .map(|c| normalize(c, efmin, efmax))
        .collect();

    let (width_min, width_max) =
        min_max(widths.iter().flatten().copied()).unwrap_or((0.0, 0.0));
    let scaled_widths = widths
        .iter()
        .map(|w| rescale_widths(w, width_max))
        .collect();
    let scaled_extrema_widths = rescale_widths(&extrema_widths, width_max);

    let (density_min, density_max) =
        min_max(densities.iter().flatten().copied()).unwrap_or((0.0, 0.0));

    Statistics {
        extrema_normalized,
        efmin,
        efmax,
        extrema_widths: scaled_extrema_widths,
        extrema_widths_raw: extrema_widths,
        extrema_values,
        colors_normalized,
        colors,
        widths: scaled_widths,
        widths_raw: widths,
        width_min,
        width_max,
        densities,
        density_min,
        density_max,
        colormap: ColorMapper::value_palette(efmin, efmax),
        dcolormap: ColorMapper::density_palette(density_max),
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((if v < lo { v } else { lo }, if v > hi { v } else { hi })),
    })
}

/// `(v - min) / (max - min)` per entry; an empty range maps everything to 0.
#[must_use]
pub fn normalize(values: &[f64], min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    if span > 0.0 {
        let factor = 1.0 / span;
        values.iter().map(|v| (v - min) * factor).collect()
    } else {
        vec![0.0; values.len()]
    }
}

/// `w * (0.3 / max) + 0.03` per entry; a non-positive `max` leaves only the offset.
#[must_use]
pub fn rescale_widths(values: &[f64], max: f64) -> Vec<f64> {
    let factor = if max > 0.0 { WIDTH_SPAN / max } else { 0.0 };
    values.iter().map(|w| w * factor + WIDTH_OFFSET).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn extrema_values_normalize_onto_unit_range() {
        let stats = derive_statistics(vec![2.0, 4.0, 6.0], vec![], vec![], vec![], vec![]);
        assert_eq!(stats.efmin, 2.0);
        assert_eq!(stats.efmax, 6.0);
        assert!(close(&stats.extrema_normalized, &[0.0, 0.5, 1.0]));
    }

    #[test]
    fn cell_colors_use_the_extrema_range() {
        let stats = derive_statistics(
            vec![0.0, 10.0],
            vec![],
            vec![vec![5.0, 2.5], vec![10.0]],
            vec![vec![1.0], vec![1.0]],
            vec![vec![0.0], vec![0.0]],
        );
        assert!(close(&stats.colors_normalized[0], &[0.5, 0.25]));
        assert!(close(&stats.colors_normalized[1], &[1.0]));
        assert_eq!(stats.colormap.min(), 0.0);
        assert_eq!(stats.colormap.max(), 10.0);
    }

    #[test]
    fn widths_rescale_between_offset_and_offset_plus_span() {
        let stats = derive_statistics(
            vec![1.0, 2.0],
            vec![1.0, 4.0],
            vec![vec![], vec![]],
            vec![vec![0.0, 1.0], vec![2.0]],
            vec![vec![], vec![]],
        );
        assert_eq!(stats.width_min, 0.0);
        assert_eq!(stats.width_max, 2.0);
        assert!(close(&stats.widths[0], &[0.03, 0.18]));
        assert!(close(&stats.widths[1], &[0.33]));
        // Extrema widths share the cell width scale and may exceed it.
        assert!(close(&stats.extrema_widths, &[0.18, 0.63]));
        assert_eq!(stats.extrema_widths_raw, vec![1.0, 4.0]);
        assert_eq!(stats.widths_raw[1], vec![2.0]);
    }

    #[test]
    fn flat_extrema_range_maps_to_zero() {
        let stats = derive_statistics(
            vec![3.0, 3.0],
            vec![],
            vec![vec![3.0]],
            vec![vec![1.0]],
            vec![vec![1.0]],
        );
        assert_eq!(stats.extrema_normalized, vec![0.0, 0.0]);
        assert_eq!(stats.colors_normalized[0], vec![0.0]);
    }

    #[test]
    fn zero_width_maximum_collapses_to_offset() {
        assert_eq!(rescale_widths(&[0.0, 0.0], 0.0), vec![0.03, 0.03]);
    }

    #[test]
    fn density_colormap_spans_zero_to_local_maximum() {
        let stats = derive_statistics(
            vec![0.0, 1.0],
            vec![],
            vec![vec![], vec![]],
            vec![vec![], vec![]],
            vec![vec![0.2, 0.4], vec![0.8]],
        );
        assert_eq!(stats.density_min, 0.2);
        assert_eq!(stats.density_max, 0.8);
        assert_eq!(stats.dcolormap.min(), 0.0);
        assert_eq!(stats.dcolormap.max(), 0.8);
    }

    #[test]
    fn empty_level_has_zeroed_ranges() {
        let stats = derive_statistics(vec![], vec![], vec![], vec![], vec![]);
        assert_eq!((stats.efmin, stats.efmax), (0.0, 0.0));
        assert_eq!((stats.width_min, stats.width_max), (0.0, 0.0));
        assert_eq!(stats.density_max, 0.0);
    }
}
