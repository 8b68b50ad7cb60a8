// Tue Jan 13 2026 - Alex

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Released,
    TimedOut,
    Interrupted,
}

struct LatchState {
    count: usize,
    interrupted: bool,
}

/// Countdown barrier: decremented once per finished dependent, awaited with a deadline.
pub struct CountDownLatch {
    state: Mutex<LatchState>,
    released: Condvar,
}

impl CountDownLatch {
    pub fn new(count: usize) -> Self {
        Self {
            state: Mutex::new(LatchState { count, interrupted: false }),
            released: Condvar::new(),
        }
    }

    /// Saturates at zero.
    pub fn count_down(&self) {
        let mut state = self.state.lock();
        if state.count == 0 {
            return;
        }
        state.count -= 1;
        if state.count == 0 {
            self.released.notify_all();
        }
    }

    pub fn count(&self) -> usize {
        self.state.lock().count
    }

    /// Wakes any waiter with `WaitOutcome::Interrupted`. The flag is consumed by
    /// the next wait that observes it.
    pub fn interrupt(&self) {
        let mut state = self.state.lock();
        state.interrupted = true;
        self.released.notify_all();
    }

    /// A timeout too large to express as an `Instant` waits without a deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> WaitOutcome {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();

        loop {
            if state.interrupted {
                state.interrupted = false;
                return WaitOutcome::Interrupted;
            }
            if state.count == 0 {
                return WaitOutcome::Released;
            }
            let Some(deadline) = deadline else {
                self.released.wait(&mut state);
                continue;
            };
            if self.released.wait_until(&mut state, deadline).timed_out() {
                // last check, a count_down may have raced the deadline
                if state.interrupted {
                    state.interrupted = false;
                    return WaitOutcome::Interrupted;
                }
                return if state.count == 0 {
                    WaitOutcome::Released
                } else {
                    WaitOutcome::TimedOut
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_count_releases_immediately() {
        let latch = CountDownLatch::new(0);
        let start = Instant::now();
        assert_eq!(latch.wait_timeout(Duration::from_secs(5)), WaitOutcome::Released);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_concurrent_count_down_releases() {
        let latch = Arc::new(CountDownLatch::new(8));

        for _ in 0..8 {
            let latch = latch.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                latch.count_down();
            });
        }

        assert_eq!(latch.wait_timeout(Duration::from_secs(5)), WaitOutcome::Released);
        assert_eq!(latch.count(), 0);
    }

    #[test]
    fn test_wait_times_out() {
        let latch = CountDownLatch::new(1);
        let start = Instant::now();

        assert_eq!(latch.wait_timeout(Duration::from_millis(100)), WaitOutcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(latch.count(), 1);
    }

    #[test]
    fn test_unrepresentable_deadline_waits_until_released() {
        let latch = Arc::new(CountDownLatch::new(1));
        let other = latch.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            other.count_down();
        });

        assert_eq!(latch.wait_timeout(Duration::MAX), WaitOutcome::Released);
        handle.join().unwrap();
    }

    #[test]
    fn test_unrepresentable_deadline_can_be_interrupted() {
        let latch = Arc::new(CountDownLatch::new(1));
        let other = latch.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            other.interrupt();
        });

        assert_eq!(latch.wait_timeout(Duration::from_secs(u64::MAX)), WaitOutcome::Interrupted);
        handle.join().unwrap();
    }

    #[test]
    fn test_count_down_saturates() {
        let latch = CountDownLatch::new(1);
        latch.count_down();
        latch.count_down();
        assert_eq!(latch.count(), 0);
    }

    #[test]
    fn test_interrupt_wakes_waiter() {
        let latch = Arc::new(CountDownLatch::new(1));
        let other = latch.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            other.interrupt();
        });

        let start = Instant::now();
        assert_eq!(latch.wait_timeout(Duration::from_secs(5)), WaitOutcome::Interrupted);
        assert!(start.elapsed() < Duration::from_secs(4));
        handle.join().unwrap();

        // flag is consumed
        assert_eq!(latch.wait_timeout(Duration::from_millis(10)), WaitOutcome::TimedOut);
    }
}
