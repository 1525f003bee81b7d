// SPDX-License-Identifier: Apache-2.0

use hdviz_model::LayoutMode;
use hdviz_store::fixtures::{SyntheticDataset, LAYOUT_MAX, LAYOUT_MIN};
use hdviz_store::{CacheConfig, LevelCache, LoadMetricsCollector, StoreErrorCode};
use std::fs;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn open(mode: LayoutMode) -> (TempDir, LevelCache, Arc<LoadMetricsCollector>) {
    let root = tempdir().expect("tmp");
    SyntheticDataset::new(1, 3)
        .with_cells(1, 4)
        .write(root.path())
        .expect("write fixture");
    let metrics = Arc::new(LoadMetricsCollector::default());
    let config = CacheConfig::new(root.path()).with_layout(mode);
    let cache = LevelCache::open_instrumented(config, metrics.clone()).expect("open");
    (root, cache, metrics)
}

fn normalized(mode: usize, cell: usize, sample: usize, row: usize) -> f64 {
    let center = (LAYOUT_MAX[row] - LAYOUT_MIN[row]) * 0.5 + LAYOUT_MIN[row];
    let extent = LAYOUT_MAX[1] - LAYOUT_MIN[1];
    (SyntheticDataset::embedding(mode, cell, sample, row) + center) * (2.0 / extent)
}

#[test]
fn embeddings_are_recentred_and_scaled() {
    let (_root, mut cache, _metrics) = open(LayoutMode::Isomap);
    let cells = cache.layout(LayoutMode::Isomap, 3).expect("layout");
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[1].get(0, 2), normalized(0, 1, 2, 0));
    assert_eq!(cells[1].get(1, 3), normalized(0, 1, 3, 1));
    let extrema = cache.extrema_layout(LayoutMode::Isomap, 3).expect("extrema");
    assert_eq!((extrema.rows(), extrema.cols()), (2, 3));
    assert_eq!(cache.current().layout.min, LAYOUT_MIN);
    assert_eq!(cache.current().layout.max, LAYOUT_MAX);
}

#[test]
fn configured_mode_is_active_after_open() {
    let (_root, cache, _metrics) = open(LayoutMode::Pca2);
    assert_eq!(cache.layout_mode(), LayoutMode::Pca2);
    assert_eq!(cache.current().layout.cells[0].get(0, 0), normalized(2, 0, 0, 0));
}

#[test]
fn layout_change_reloads_only_layout_arrays() {
    let (_root, mut cache, metrics) = open(LayoutMode::Isomap);
    let before = cache.current().clone();
    let reloads = metrics.snapshot();

    cache.set_layout(LayoutMode::Pca, 3).expect("pca");

    let after = cache.current();
    assert_eq!(after.level, 3);
    assert_eq!(after.layout_mode(), LayoutMode::Pca);
    assert_eq!(after.reconstruction, before.reconstruction);
    assert_eq!(after.statistics, before.statistics);
    assert_eq!(after.edges, before.edges);
    assert_ne!(after.layout, before.layout);
    assert_eq!(after.layout.cells[0].get(0, 0), normalized(1, 0, 0, 0));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.level_reloads, reloads.level_reloads);
    assert_eq!(snapshot.layout_reloads, reloads.layout_reloads + 1);
    // Min, Max, two cell embeddings and the extrema embedding.
    assert_eq!(snapshot.files_read, reloads.files_read + 5);
}

#[test]
fn layout_change_on_another_level_is_a_full_reload() {
    let (_root, mut cache, metrics) = open(LayoutMode::Isomap);
    cache.set_layout(LayoutMode::Pca2, 1).expect("pca2 at level 1");
    assert_eq!(cache.resident_level(), 1);
    assert_eq!(cache.layout_mode(), LayoutMode::Pca2);
    assert_eq!(cache.current().layout.cells.len(), 4);
    assert_eq!(metrics.snapshot().level_reloads, 2);

    // The new mode carries over to later level changes.
    cache.select_level(2).expect("level 2");
    assert_eq!(cache.layout_mode(), LayoutMode::Pca2);
}

#[test]
fn layout_getters_make_mode_and_level_resident() {
    let (_root, mut cache, _metrics) = open(LayoutMode::Isomap);
    let cells = cache.layout(LayoutMode::Pca, 1).expect("layout").len();
    assert_eq!(cells, 4);
    assert_eq!(cache.resident_level(), 1);
    assert_eq!(cache.layout_mode(), LayoutMode::Pca);
}

#[test]
fn unrecognized_mode_names_are_rejected_before_mutation() {
    let (_root, mut cache, metrics) = open(LayoutMode::Isomap);
    let before = metrics.snapshot();
    let err = cache.set_layout_named("hexagon", 3).expect_err("bad mode");
    assert_eq!(err.code, StoreErrorCode::InvalidArgument);
    assert_eq!(cache.layout_mode(), LayoutMode::Isomap);
    assert_eq!(metrics.snapshot().files_read, before.files_read);

    cache.set_layout_named(" PCA2 ", 3).expect("named");
    assert_eq!(cache.layout_mode(), LayoutMode::Pca2);
    assert!(LayoutMode::try_from(7_u8).is_err());
}

#[test]
fn layout_change_outside_the_level_range_is_rejected() {
    let (_root, mut cache, _metrics) = open(LayoutMode::Isomap);
    let err = cache.set_layout(LayoutMode::Pca, 7).expect_err("range");
    assert_eq!(err.code, StoreErrorCode::OutOfRange);
    assert_eq!(cache.layout_mode(), LayoutMode::Isomap);
}

#[test]
fn failed_layout_reload_keeps_the_previous_mode() {
    let (root, mut cache, _metrics) = open(LayoutMode::Isomap);
    fs::remove_file(root.path().join("PCA2ExtremaLayout_3.data.hdr")).expect("rm");
    let before = cache.current().clone();

    let err = cache.set_layout(LayoutMode::Pca2, 3).expect_err("missing");
    assert_eq!(err.code, StoreErrorCode::DataLoad);
    assert!(err.message.contains("PCA2ExtremaLayout_3.data.hdr"), "{err}");
    assert_eq!(cache.current(), &before);
}

#[test]
fn degenerate_bounds_fail_the_reload() {
    let (root, mut cache, _metrics) = open(LayoutMode::Isomap);
    hdviz_codec::write_vector(&root.path().join("PCAMax.data.hdr"), &LAYOUT_MIN)
        .expect("flatten");
    let err = cache.set_layout(LayoutMode::Pca, 3).expect_err("zero extent");
    assert_eq!(err.code, StoreErrorCode::DataLoad);
    assert!(err.message.contains("PCAMin.data.hdr"), "{err}");
    assert_eq!(cache.layout_mode(), LayoutMode::Isomap);
}
