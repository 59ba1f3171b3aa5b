//! Timed spans for generator phases

use std::time::Instant;

/// Enters a debug span on creation and logs the phase duration on drop.
///
/// ```
/// use gldispatch_tracing::PhaseSpan;
///
/// {
///     let _phase = PhaseSpan::new("layout");
///     // ... work ...
/// }
/// ```
pub struct PhaseSpan {
    name: &'static str,
    start: Instant,
    _entered: tracing::span::EnteredSpan,
}

impl PhaseSpan {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            _entered: tracing::debug_span!("phase", name).entered(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Drop for PhaseSpan {
    fn drop(&mut self) {
        tracing::debug!(phase = self.name, duration_us = self.elapsed_us(), "phase finished");
    }
}
