//! Shared fixture for behavioural suites driving a single pursuer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stalker::PursuerConfig;
use test_utils::{pursuer_with, ScriptedWorld, TestPursuer};

/// Thread-safe handle to the pursuer under test.
///
/// rspec clones the environment between blocks; the `Arc` keeps every clone
/// pointing at the same pursuer.
#[derive(Debug, Clone, Default)]
pub struct PursuitFixture {
    pursuer: Arc<Mutex<Option<TestPursuer>>>,
}

impl PursuitFixture {
    /// Replaces the pursuer with a fresh one in `world`.
    pub fn reset(&self, config: PursuerConfig, world: ScriptedWorld) {
        *self.guard() = Some(pursuer_with(config, world, 0));
    }

    /// Runs `f` against the pursuer.
    ///
    /// # Panics
    /// Panics if [`PursuitFixture::reset`] has not been called.
    pub fn with<R>(&self, f: impl FnOnce(&mut TestPursuer) -> R) -> R {
        let mut guard = self.guard();
        let pursuer = guard
            .as_mut()
            .unwrap_or_else(|| panic!("pursuer not initialised; call reset first"));
        f(pursuer)
    }

    fn guard(&self) -> MutexGuard<'_, Option<TestPursuer>> {
        self.pursuer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
