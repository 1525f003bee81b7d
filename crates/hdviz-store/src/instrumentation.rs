// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreErrorCode;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    /// Every array of the level was replaced.
    Level,
    /// Only the layout-dependent arrays were replaced.
    Layout,
}

pub trait LoadInstrumentation: Send + Sync + 'static {
    fn observe_file_read(&self, _path: &Path, _latency: Duration) {}
    fn observe_reload(&self, _level: i32, _kind: ReloadKind, _latency: Duration) {}
    fn observe_error(&self, _code: StoreErrorCode) {}
}

#[derive(Default)]
pub struct NoopInstrumentation;

impl LoadInstrumentation for NoopInstrumentation {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadMetrics {
    pub files_read: u64,
    pub level_reloads: u64,
    pub layout_reloads: u64,
    pub errors: u64,
    pub latency_ms_total: u128,
}

#[derive(Default)]
pub struct LoadMetricsCollector {
    inner: Mutex<LoadMetrics>,
}

impl LoadMetricsCollector {
    #[must_use]
    pub fn snapshot(&self) -> LoadMetrics {
        self.inner.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl LoadInstrumentation for LoadMetricsCollector {
    fn observe_file_read(&self, _path: &Path, latency: Duration) {
        if let Ok(mut m) = self.inner.lock() {
            m.files_read = m.files_read.saturating_add(1);
            m.latency_ms_total = m.latency_ms_total.saturating_add(latency.as_millis());
        }
    }

    fn observe_reload(&self, _level: i32, kind: ReloadKind, _latency: Duration) {
        if let Ok(mut m) = self.inner.lock() {
            match kind {
                ReloadKind::Level => m.level_reloads = m.level_reloads.saturating_add(1),
                ReloadKind::Layout => m.layout_reloads = m.layout_reloads.saturating_add(1),
            }
        }
    }

    fn observe_error(&self, _code: StoreErrorCode) {
        if let Ok(mut m) = self.inner.lock() {
            m.errors = m.errors.saturating_add(1);
        }
    }
}
