//! Mount surface - the single drawing target shared by renderer instances
//!
//! Exactly one instance owns the surface at a time. Ownership is tracked by
//! [`Generation`]: the controller claims the surface for the instance it
//! activates and releases it when that instance is suspended. A [`SurfacePen`]
//! whose generation is not the current owner draws into nothing, so late
//! completions from a suspended or destroyed renderer cannot overwrite the
//! active view.

use ratatui::text::Line;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Monotonic token identifying one renderer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The token handed out after this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    owner: Option<Generation>,
    lines: Vec<Line<'static>>,
    /// Bumped on every mutation so the host can tell a repaint is due
    revision: u64,
}

impl SurfaceState {
    fn wipe(&mut self) {
        self.lines.clear();
        self.revision += 1;
    }
}

/// The shared drawing target
///
/// Cloning yields another handle to the same surface.
#[derive(Debug, Clone, Default)]
pub struct MountSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl MountSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wipe the content, keeping the current owner
    pub fn clear(&self) {
        self.lock().wipe();
    }

    /// Hand the surface to `generation`, wiping whatever the previous owner drew
    pub(crate) fn claim(&self, generation: Generation) {
        let mut state = self.lock();
        state.owner = Some(generation);
        state.wipe();
    }

    /// Detach the owner and wipe the content
    pub(crate) fn release(&self) {
        let mut state = self.lock();
        state.owner = None;
        state.wipe();
    }

    #[cfg(test)]
    pub fn owner(&self) -> Option<Generation> {
        self.lock().owner
    }

    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    /// Snapshot of the current content for painting
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.lock().lines.clone()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Create a pen bound to `generation`
    pub fn pen(&self, generation: Generation) -> SurfacePen {
        SurfacePen {
            state: Arc::clone(&self.state),
            generation,
        }
    }
}

/// Drawing handle held by one renderer instance
///
/// Safe to move into asynchronous tasks. Every draw re-checks ownership.
#[derive(Debug, Clone)]
pub struct SurfacePen {
    state: Arc<Mutex<SurfaceState>>,
    generation: Generation,
}

impl SurfacePen {
    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether this pen's instance currently owns the surface
    pub fn is_current(&self) -> bool {
        self.lock().owner == Some(self.generation)
    }

    /// Replace the surface content. Returns false if the pen no longer owns it.
    pub fn draw(&self, lines: Vec<Line<'static>>) -> bool {
        let mut state = self.lock();
        if state.owner != Some(self.generation) {
            tracing::trace!(generation = %self.generation, "draw ignored, surface owned elsewhere");
            return false;
        }
        state.lines = lines;
        state.revision += 1;
        true
    }
}
