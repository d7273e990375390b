//! Phase observation hooks for the profiler.
//!
//! Callers that want tracing around the expensive sub-phases (pattern
//! scanning, gazetteer lookups, date parsing) inject an [`Observer`]. The
//! default is a no-op; profiling output never depends on which observer is
//! installed.

use log::debug;

/// Sub-phases of a single column profile that an observer can scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Single pass counting shape-pattern matches over raw values.
    PatternScan,
    /// Gazetteer resolution and disambiguation of distinct values.
    AdminAreas,
    /// Latitude/longitude range counting over float values.
    LatLongScan,
    /// Full-column strict date parsing.
    DateScan,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::PatternScan => "pattern_scan",
            Phase::AdminAreas => "admin_areas",
            Phase::LatLongScan => "latlong_scan",
            Phase::DateScan => "date_scan",
        }
    }
}

/// Span-scoping hook around profiler sub-phases.
///
/// Both methods default to doing nothing, so implementors only override what
/// they need.
pub trait Observer {
    fn phase_started(&self, _phase: Phase) {}
    fn phase_finished(&self, _phase: Phase) {}
}

/// Observer that ignores every phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer that emits a debug log line per phase boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn phase_started(&self, phase: Phase) {
        debug!("phase started: {}", phase.name());
    }

    fn phase_finished(&self, phase: Phase) {
        debug!("phase finished: {}", phase.name());
    }
}

/// Runs `body` between `phase_started` and `phase_finished` notifications.
pub(crate) fn scoped<T>(observer: &dyn Observer, phase: Phase, body: impl FnOnce() -> T) -> T {
    observer.phase_started(phase);
    let out = body();
    observer.phase_finished(phase);
    out
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl Observer for Recorder {
        fn phase_started(&self, phase: Phase) {
            self.events.borrow_mut().push(format!("+{}", phase.name()));
        }

        fn phase_finished(&self, phase: Phase) {
            self.events.borrow_mut().push(format!("-{}", phase.name()));
        }
    }

    #[test]
    fn scoped_brackets_the_body() {
        let recorder = Recorder {
            events: RefCell::new(Vec::new()),
        };
        let value = scoped(&recorder, Phase::DateScan, || 7);
        assert_eq!(value, 7);
        assert_eq!(
            recorder.events.into_inner(),
            vec!["+date_scan".to_string(), "-date_scan".to_string()]
        );
    }
}
