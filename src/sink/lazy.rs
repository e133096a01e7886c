//! Initialize-once slot for a sink.
//!
//! The fast path is a lock-free `OnceLock::get`. Construction runs under a
//! dedicated mutex so exactly one thread builds the sink; a failed
//! construction caches nothing and the error goes to the caller that
//! triggered it.

use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::core::errors::Result;

/// Lazily constructed, then shared for the owner's lifetime.
#[derive(Debug)]
pub struct LazySink<S> {
    cell: OnceLock<S>,
    init: Mutex<()>,
}

impl<S> LazySink<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The sink if it has already been built.
    pub fn get(&self) -> Option<&S> {
        self.cell.get()
    }

    /// Return the sink, building it with `build` on first use.
    pub fn get_or_try_init<F>(&self, build: F) -> Result<&S>
    where
        F: FnOnce() -> Result<S>,
    {
        if let Some(sink) = self.cell.get() {
            return Ok(sink);
        }
        let _guard = self.init.lock();
        if let Some(sink) = self.cell.get() {
            return Ok(sink);
        }
        let sink = build()?;
        Ok(self.cell.get_or_init(|| sink))
    }
}

impl<S> Default for LazySink<S> {
    fn default() -> Self {
        Self::new()
    }
}
