// Tue Jan 13 2026 - Alex

use crate::engine::error::TaskError;
use crate::engine::latch::CountDownLatch;
use crate::engine::task::{Runnable, SharedTask};
use std::sync::Arc;

/// Counts the latch down when dropped, so unwinding out of a task still signals.
struct CountDownGuard(Arc<CountDownLatch>);

impl Drop for CountDownGuard {
    fn drop(&mut self) {
        self.0.count_down();
    }
}

/// Wraps a dependent task so that the shared latch is decremented exactly once
/// when it finishes running, whatever the outcome.
pub struct CompletionSignal {
    task: SharedTask,
    latch: Option<Arc<CountDownLatch>>,
}

impl CompletionSignal {
    pub fn new(task: SharedTask, latch: Arc<CountDownLatch>) -> Self {
        Self {
            task,
            latch: Some(latch),
        }
    }

    pub fn has_signalled(&self) -> bool {
        self.latch.is_none()
    }
}

impl Runnable for CompletionSignal {
    fn execute(&mut self) -> Result<(), TaskError> {
        let guard = self.latch.take().map(CountDownGuard);
        // task lock must be released before the latch is counted down
        let outcome = self.task.lock().execute();
        drop(guard);
        outcome
    }

    fn is_done(&self) -> bool {
        self.task.lock().is_done()
    }

    fn name(&self) -> String {
        self.task.lock().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::task::{shared, FnTask};
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn test_success_counts_down_once() {
        let latch = Arc::new(CountDownLatch::new(2));
        let mut signal = CompletionSignal::new(shared(FnTask::new("ok", || Ok(()))), latch.clone());

        signal.execute().unwrap();
        assert_eq!(latch.count(), 1);
        assert!(signal.has_signalled());
        assert!(signal.is_done());

        // a second run never counts down again
        signal.execute().unwrap();
        assert_eq!(latch.count(), 1);
    }

    #[test]
    fn test_failure_still_counts_down() {
        let latch = Arc::new(CountDownLatch::new(1));
        let task = shared(FnTask::<(), _>::new("fails", || Err(TaskError::failed("nope"))));
        let mut signal = CompletionSignal::new(task, latch.clone());

        assert!(signal.execute().is_err());
        assert_eq!(latch.count(), 0);
        assert!(!signal.is_done());
        assert_eq!(signal.name(), "fails");
    }

    #[test]
    fn test_panic_still_counts_down() {
        let latch = Arc::new(CountDownLatch::new(1));
        let task = shared(FnTask::<(), _>::new("panics", || panic!("dependent blew up")));
        let mut signal = CompletionSignal::new(task, latch.clone());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| signal.execute()));

        assert!(outcome.is_err());
        assert_eq!(latch.count(), 0);
    }
}
