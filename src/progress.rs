//! Progress-observer trait for per-page translation events.
//!
//! Inject an `Arc<dyn ProgressObserver>` via
//! [`crate::config::TranslationConfigBuilder::progress`] to receive events as
//! pages reach terminal results. Callbacks are the least-invasive integration
//! point: the CLI forwards them to an indicatif bar, embedders can forward to
//! channels or logs, and the library stays ignorant of either.
//!
//! Pages are translated concurrently, so `on_page_done` may be called from
//! several tasks at once and out of page order; implementations must be
//! `Send + Sync` and guard any shared state.

use std::sync::Arc;

/// Receives pipeline events. All methods default to no-ops so implementors
/// only override what they care about.
pub trait ProgressObserver: Send + Sync {
    /// Called once, after extraction, with the number of pages to translate.
    fn on_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a page reaches a terminal result.
    ///
    /// `page_num` is 1-indexed; `ok` is false when the page failed after
    /// retries.
    fn on_page_done(&self, page_num: usize, total_pages: usize, ok: bool) {
        let _ = (page_num, total_pages, ok);
    }

    /// Called once after every page has a terminal result.
    fn on_finish(&self, total_pages: usize, translated: usize) {
        let _ = (total_pages, translated);
    }
}

/// No-op observer for callers that don't need progress events.
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

/// Convenience alias matching the type stored in the config.
pub type Progress = Arc<dyn ProgressObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        done: AtomicUsize,
        failed: AtomicUsize,
    }

    impl ProgressObserver for Counting {
        fn on_page_done(&self, _page_num: usize, _total: usize, ok: bool) {
            self.done.fetch_add(1, Ordering::SeqCst);
            if !ok {
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopProgress;
        obs.on_start(3);
        obs.on_page_done(1, 3, true);
        obs.on_page_done(2, 3, false);
        obs.on_finish(3, 2);
    }

    #[test]
    fn counting_observer_receives_events() {
        let obs = Counting {
            done: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        };
        obs.on_page_done(1, 2, true);
        obs.on_page_done(2, 2, false);
        assert_eq!(obs.done.load(Ordering::SeqCst), 2);
        assert_eq!(obs.failed.load(Ordering::SeqCst), 1);
    }
}
