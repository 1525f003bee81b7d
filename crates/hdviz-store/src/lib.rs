// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Single-slot cache over a Morse-Smale level dataset directory.
//!
//! [`LevelCache`] keeps every array of exactly one persistence level in
//! memory. Switching levels, or layout modes, builds a complete replacement
//! bundle first and swaps it in only when every file was read; a failed
//! reload leaves the resident level untouched.

mod bundle;
mod cache;
mod config;
mod dataset;
mod error;
#[cfg(feature = "fixtures")]
pub mod fixtures;
mod instrumentation;
mod layout;
mod loader;
mod reconstruction;
mod shared;
mod statistics;

pub use bundle::LevelBundle;
pub use cache::{CacheState, LevelCache};
pub use config::{CacheConfig, DEFAULT_ROOT, DEFAULT_SAMPLE_COUNT};
pub use dataset::DatasetInfo;
pub use error::{StoreError, StoreErrorCode};
pub use instrumentation::{
    LoadInstrumentation, LoadMetrics, LoadMetricsCollector, NoopInstrumentation, ReloadKind,
};
pub use layout::{Layout, LayoutTransform};
pub use reconstruction::{derive_bounds, Reconstruction, ReconstructionBounds};
pub use shared::SharedLevelCache;
pub use statistics::{
    derive_statistics, normalize, rescale_widths, Statistics, WIDTH_OFFSET, WIDTH_SPAN,
};

pub const CRATE_NAME: &str = "hdviz-store";
