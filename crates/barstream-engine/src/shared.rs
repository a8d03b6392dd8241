//! Thread-safe handle to an indicator manager.

use std::sync::Arc;

use barstream_core::error::EngineError;
use barstream_core::types::{IndicatorValue, Observation, Snapshot};
use parking_lot::RwLock;

use crate::manager::IndicatorManager;

/// Cloneable handle sharing one [`IndicatorManager`] between a feed task and
/// strategy readers.
///
/// An update cycle holds the write lock from start to finish, so readers
/// never see a snapshot with only some indicators updated.
#[derive(Debug, Clone)]
pub struct SharedIndicatorManager {
    inner: Arc<RwLock<IndicatorManager>>,
}

impl SharedIndicatorManager {
    pub fn new(manager: IndicatorManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    /// Run one update cycle under the write lock.
    pub fn on_new_observation(
        &self,
        observation: impl Into<Observation>,
    ) -> Result<(), EngineError> {
        self.inner.write().on_new_observation(observation)
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().get_latest_bar_data().clone()
    }

    pub fn get_indicator_value(&self, name: &str) -> Result<IndicatorValue, EngineError> {
        self.inner.read().get_indicator_value(name)
    }

    pub fn enable_indicator(&self, name: &str) -> Result<(), EngineError> {
        self.inner.write().enable_indicator(name)
    }

    pub fn disable_indicator(&self, name: &str) -> Result<(), EngineError> {
        self.inner.write().disable_indicator(name)
    }

    /// Run `f` with shared access to the manager.
    pub fn read<R>(&self, f: impl FnOnce(&IndicatorManager) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the manager.
    pub fn write<R>(&self, f: impl FnOnce(&mut IndicatorManager) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl From<IndicatorManager> for SharedIndicatorManager {
    fn from(manager: IndicatorManager) -> Self {
        Self::new(manager)
    }
}
