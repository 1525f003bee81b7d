// SPDX-License-Identifier: Apache-2.0

use crate::bundle::LevelBundle;
use crate::cache::{CacheState, LevelCache, StagedReload};
use crate::config::CacheConfig;
use crate::error::{StoreError, StoreErrorCode};
use hdviz_model::LayoutMode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// [`LevelCache`] for concurrent callers.
///
/// Reads of the resident level share a read lock. A reload is built while
/// readers keep running, then swapped in under the write lock; one reload
/// is built at a time.
pub struct SharedLevelCache {
    inner: RwLock<LevelCache>,
    reload_gate: Mutex<()>,
    reloading: AtomicBool,
}

impl SharedLevelCache {
    #[must_use]
    pub fn new(cache: LevelCache) -> Self {
        Self {
            inner: RwLock::new(cache),
            reload_gate: Mutex::new(()),
            reloading: AtomicBool::new(false),
        }
    }

    pub fn open(config: CacheConfig) -> Result<Self, StoreError> {
        LevelCache::open(config).map(Self::new)
    }

    pub fn into_inner(self) -> Result<LevelCache, StoreError> {
        self.inner.into_inner().map_err(|_| poisoned("level cache"))
    }

    #[must_use]
    pub fn state(&self) -> CacheState {
        if self.reloading.load(Ordering::Acquire) {
            return CacheState::Reloading;
        }
        match self.inner.read() {
            Ok(cache) => cache.state(),
            Err(_) => CacheState::Reloading,
        }
    }

    pub fn resident_level(&self) -> Result<i32, StoreError> {
        Ok(self.read()?.resident_level())
    }

    /// Runs `f` on the resident bundle without any I/O.
    pub fn with_current<R>(&self, f: impl FnOnce(&LevelBundle) -> R) -> Result<R, StoreError> {
        Ok(f(self.read()?.current()))
    }

    /// Makes `level` resident if needed and runs `f` on it.
    pub fn with_level<R>(
        &self,
        level: i32,
        f: impl FnOnce(&LevelBundle) -> R,
    ) -> Result<R, StoreError> {
        {
            let cache = self.read()?;
            cache.check_level(level)?;
            if cache.resident_level() == level {
                return Ok(f(cache.current()));
            }
        }
        let _gate = self.gate()?;
        self.swap(|cache| cache.stage_level(level))?;
        let cache = self.read()?;
        Ok(f(cache.current()))
    }

    pub fn select_level(&self, level: i32) -> Result<(), StoreError> {
        {
            let cache = self.read()?;
            cache.check_level(level)?;
            if cache.resident_level() == level {
                return Ok(());
            }
        }
        let _gate = self.gate()?;
        self.swap(|cache| cache.stage_level(level))
    }

    pub fn set_layout(&self, mode: LayoutMode, level: i32) -> Result<(), StoreError> {
        self.read()?.check_level(level)?;
        let _gate = self.gate()?;
        self.swap(|cache| cache.stage_layout(mode, level).map(Some))
    }

    /// Builds under the read lock, then commits under the write lock.
    /// Callers hold the reload gate, so residency is re-checked by `stage`.
    fn swap(
        &self,
        stage: impl FnOnce(&LevelCache) -> Result<Option<StagedReload>, StoreError>,
    ) -> Result<(), StoreError> {
        self.reloading.store(true, Ordering::Release);
        let staged = self.read().and_then(|cache| stage(&*cache));
        let result = match staged {
            Ok(Some(staged)) => self.write().map(|mut cache| cache.commit(staged)),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        self.reloading.store(false, Ordering::Release);
        result
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LevelCache>, StoreError> {
        self.inner.read().map_err(|_| poisoned("level cache"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LevelCache>, StoreError> {
        self.inner.write().map_err(|_| poisoned("level cache"))
    }

    fn gate(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.reload_gate.lock().map_err(|_| poisoned("reload gate"))
    }
}

fn poisoned(what: &str) -> StoreError {
    StoreError::new(StoreErrorCode::Internal, format!("{what} lock poisoned"))
}
