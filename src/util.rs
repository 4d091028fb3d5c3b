//! Stage timing for the mesh pipeline

use std::time::{Duration, Instant};

use log::Level;

/// Logs how long a pipeline stage took when it goes out of scope
///
/// ```ignore
/// let _stage = Timed::debug("patch triangulation");
/// // ... work ...
/// // logs "patch triangulation took 1.234ms"
/// ```
pub struct Timed {
    label: &'static str,
    level: Level,
    started: Instant,
}

impl Timed {
    /// Timer for a whole build, reported at `info`
    pub fn info(label: &'static str) -> Self {
        Self::start(label, Level::Info)
    }

    /// Timer for a single stage, reported at `debug`
    pub fn debug(label: &'static str) -> Self {
        Self::start(label, Level::Debug)
    }

    fn start(label: &'static str, level: Level) -> Self {
        log::trace!("{} started", label);
        Self {
            label,
            level,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        log::log!(self.level, "{} took {:.3?}", self.label, self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let timer = Timed::debug("test stage");
        let first = timer.elapsed();
        let second = timer.elapsed();
        assert!(second >= first);
    }
}
