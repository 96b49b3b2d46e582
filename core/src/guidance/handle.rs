use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;

use crate::route::ManeuverSource;

use super::GuidanceEngine;

/// Shared engine handle.
///
/// Position ticks and repeat requests may come from different threads; all
/// of them serialize on one lock so tier transitions never interleave.
#[derive(Debug, Clone, Default)]
pub struct GuidanceHandle {
    inner: Arc<Mutex<GuidanceEngine>>,
}

impl GuidanceHandle {
    pub fn new(engine: GuidanceEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the engine. A panic on another thread does not leave the engine
    /// unusable; its state is taken as-is.
    pub fn lock(&self) -> MutexGuard<'_, GuidanceEngine> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut GuidanceEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn tick(&self, source: &dyn ManeuverSource, speed: Option<f32>, now: NaiveDateTime) {
        self.lock().tick(source, speed, now);
    }

    pub fn announce_current_direction(
        &self,
        source: &dyn ManeuverSource,
        speed: Option<f32>,
        now: NaiveDateTime,
    ) {
        self.lock().announce_current_direction(source, speed, now);
    }
}
