// SPDX-License-Identifier: Apache-2.0

use hdviz_model::LayoutMode;
use hdviz_store::fixtures::SyntheticDataset;
use hdviz_store::{CacheConfig, CacheState, SharedLevelCache, StoreErrorCode};
use std::fs;
use std::thread;
use tempfile::tempdir;

fn dataset() -> SyntheticDataset {
    SyntheticDataset::new(0, 3)
        .with_cells(0, 6)
        .with_cells(1, 4)
        .with_cells(2, 3)
}

#[test]
fn concurrent_readers_always_see_a_complete_bundle() {
    let root = tempdir().expect("tmp");
    let ds = dataset();
    ds.write(root.path()).expect("write fixture");
    let cache = SharedLevelCache::open(CacheConfig::new(root.path())).expect("open");

    thread::scope(|scope| {
        for worker in 0..4_i32 {
            let cache = &cache;
            let ds = &ds;
            scope.spawn(move || {
                for round in 0..6_i32 {
                    let level = (worker + round) % 4;
                    let (seen, cells, means) = cache
                        .with_level(level, |bundle| {
                            (
                                bundle.level,
                                bundle.cell_count(),
                                bundle.reconstruction.mean.len(),
                            )
                        })
                        .expect("with_level");
                    assert_eq!(seen, level);
                    assert_eq!(cells, ds.cells_at(level));
                    assert_eq!(means, cells);
                    cache
                        .with_current(|bundle| {
                            assert_eq!(bundle.statistics.widths.len(), bundle.cell_count());
                        })
                        .expect("with_current");
                }
            });
        }
    });

    assert!(matches!(cache.state(), CacheState::Idle(_)));
}

#[test]
fn shared_layout_and_level_changes_are_visible_to_readers() {
    let root = tempdir().expect("tmp");
    dataset().write(root.path()).expect("write fixture");
    let cache = SharedLevelCache::open(CacheConfig::new(root.path())).expect("open");
    assert_eq!(cache.state(), CacheState::Idle(3));

    cache.select_level(1).expect("level 1");
    assert_eq!(cache.resident_level().expect("level"), 1);
    cache.set_layout(LayoutMode::Pca, 1).expect("pca");
    let mode = cache.with_current(|b| b.layout_mode()).expect("mode");
    assert_eq!(mode, LayoutMode::Pca);

    let err = cache.select_level(4).expect_err("range");
    assert_eq!(err.code, StoreErrorCode::OutOfRange);
    assert_eq!(cache.state(), CacheState::Idle(1));
}

#[test]
fn failed_shared_reload_keeps_serving_the_previous_level() {
    let root = tempdir().expect("tmp");
    dataset().write(root.path()).expect("write fixture");
    fs::remove_file(root.path().join("ps_0_crystal_5_Rs.data.hdr")).expect("rm");
    let cache = SharedLevelCache::open(CacheConfig::new(root.path())).expect("open");

    let err = cache.with_level(0, |b| b.level).expect_err("missing");
    assert_eq!(err.code, StoreErrorCode::DataLoad);
    assert_eq!(cache.state(), CacheState::Idle(3));
    assert_eq!(cache.with_current(|b| b.cell_count()).expect("read"), 2);

    let inner = cache.into_inner().expect("unpoisoned");
    assert_eq!(inner.resident_level(), 3);
}
