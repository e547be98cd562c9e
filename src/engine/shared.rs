//! Thread-safe handle around an `Engine`.
//!
//! The engine has no internal synchronisation. Hosts that drive it from more
//! than one thread (a timer thread calling `tick`, an input thread calling
//! `select`) share a `SharedEngine`: every operation takes the same lock, so
//! a cascade always runs to its fixpoint before the next operation starts.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::board::Position;
use crate::core::{EngineError, GameRng, GameStats, GameStatus, KindSource};

use super::game::{Engine, SelectOutcome};

/// Cloneable, lock-protected engine handle.
pub struct SharedEngine<R: KindSource = GameRng> {
    inner: Arc<Mutex<Engine<R>>>,
}

impl<R: KindSource> Clone for SharedEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: KindSource> std::fmt::Debug for SharedEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl<R: KindSource> SharedEngine<R> {
    /// Wrap an engine.
    pub fn new(engine: Engine<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<T>(&self, f: impl FnOnce(&mut Engine<R>) -> T) -> Result<T, EngineError> {
        let mut engine = self.lock()?;
        Ok(f(&mut engine))
    }

    /// Forward to `Engine::select`.
    pub fn select(&self, pos: Position) -> Result<SelectOutcome, EngineError> {
        self.with(|engine| engine.select(pos))
    }

    /// Forward to `Engine::attempt_swap`.
    pub fn attempt_swap(&self, a: Position, b: Position) -> Result<bool, EngineError> {
        self.with(|engine| engine.attempt_swap(a, b))
    }

    /// Forward to `Engine::tick`.
    pub fn tick(&self, elapsed: Duration) -> Result<GameStatus, EngineError> {
        self.with(|engine| engine.tick(elapsed))
    }

    /// Forward to `Engine::stats`.
    pub fn stats(&self) -> Result<GameStats, EngineError> {
        self.with(|engine| engine.stats())
    }

    /// Take the engine back if this is the last handle.
    pub fn try_unwrap(self) -> Result<Engine<R>, Self> {
        Arc::try_unwrap(self.inner)
            .map_err(|inner| Self { inner })?
            .into_inner()
            .map_err(|poisoned| Self::new(poisoned.into_inner()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Engine<R>>, EngineError> {
        self.inner.lock().map_err(|_| EngineError::LockPoisoned)
    }
}
