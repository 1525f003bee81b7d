// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hdviz_model::LayoutMode;
use hdviz_store::fixtures::SyntheticDataset;
use hdviz_store::{CacheConfig, LevelCache};
use tempfile::tempdir;

fn bench_level_swap(c: &mut Criterion) {
    let root = tempdir().expect("tmp");
    SyntheticDataset::new(0, 1)
        .with_cells(0, 24)
        .with_cells(1, 12)
        .with_dimension(8)
        .with_samples(50)
        .write(root.path())
        .expect("fixture");
    let mut cache = LevelCache::open(CacheConfig::new(root.path())).expect("open");

    c.bench_function("level_swap_0_1", |b| {
        b.iter(|| {
            cache.select_level(black_box(0)).expect("level 0");
            cache.select_level(black_box(1)).expect("level 1");
        })
    });

    c.bench_function("layout_swap_isomap_pca", |b| {
        b.iter(|| {
            cache.set_layout(LayoutMode::Pca, 1).expect("pca");
            cache.set_layout(LayoutMode::Isomap, 1).expect("isomap");
        })
    });

    c.bench_function("resident_getter", |b| {
        b.iter(|| black_box(cache.reconstruction(1).expect("resident").len()))
    });
}

criterion_group!(benches, bench_level_swap);
criterion_main!(benches);
