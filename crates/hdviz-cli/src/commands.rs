// SPDX-License-Identifier: Apache-2.0

use crate::errors::CliError;
use crate::{emit_json, OutputMode};
use hdviz_model::LayoutMode;
use hdviz_store::{CacheConfig, LevelCache};
use serde_json::json;
use tracing::info;

pub(crate) fn inspect(
    mut config: CacheConfig,
    level: Option<i32>,
    layout: Option<LayoutMode>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    if let Some(mode) = layout {
        config.layout = mode;
    }
    let mut cache = LevelCache::open(config)?;
    if let Some(level) = level {
        cache.select_level(level)?;
    }

    let bundle = cache.current();
    let stats = &bundle.statistics;
    let cells: Vec<_> = (0..bundle.cell_count())
        .map(|i| {
            json!({
                "index": i,
                "edge": bundle.edges.column(i),
                "samples": bundle.layout.cells.get(i).map(|m| m.cols()),
                "dimension": bundle.reconstruction.mean.get(i).map(|m| m.rows()),
            })
        })
        .collect();
    let payload = json!({
        "root": cache.config().root,
        "level": bundle.level,
        "min_level": cache.min_level(),
        "max_level": cache.max_level(),
        "layout": bundle.layout_mode(),
        "cell_count": bundle.cell_count(),
        "sample_count": bundle.sample_count,
        "names": cache.names(),
        "persistence": cache.persistence(),
        "extrema": {
            "count": stats.extrema_values.len(),
            "min": stats.efmin,
            "max": stats.efmax,
        },
        "width": { "min": stats.width_min, "max": stats.width_max },
        "density_max": stats.density_max,
        "variance_max": bundle.reconstruction.bounds.vmax,
        "cells": cells,
    });
    emit_json(&payload, output_mode)
}

pub(crate) fn validate(config: CacheConfig, output_mode: OutputMode) -> Result<(), CliError> {
    let mut cache = LevelCache::open(config)?;
    let levels = cache.dataset().levels();
    let mut bundles = 0_usize;
    for mode in LayoutMode::ALL {
        for level in levels.iter() {
            cache.set_layout(mode, level).map_err(|e| {
                CliError::from(e)
                    .with_detail("level", &level.to_string())
                    .with_detail("layout", mode.as_str())
            })?;
            bundles += 1;
        }
        info!(mode = %mode, levels = levels.len(), "layout validated");
    }
    emit_json(
        &json!({
            "status": "ok",
            "levels": levels.len(),
            "modes": LayoutMode::ALL.len(),
            "bundles": bundles,
        }),
        output_mode,
    )
}

pub(crate) fn print_config(config: &CacheConfig, output_mode: OutputMode) -> Result<(), CliError> {
    let payload = serde_json::to_value(config).map_err(|e| CliError::internal(e.to_string()))?;
    emit_json(&payload, output_mode)
}
