//! One-shot resettable timer for hold detection and sound looping.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A one-shot timer that starts stopped.
///
/// `reset` (re)arms the timer; `stop` disarms it. The callback fires on the
/// timer's worker thread once the armed deadline elapses. Dropping the timer
/// shuts the worker down; a callback already past the deadline check may
/// still complete.
pub struct HoldTimer {
    shared: Arc<TimerShared>,
}

struct TimerShared {
    state: Mutex<TimerState>,
    signal: Condvar,
    callback: Box<dyn Fn() + Send + Sync>,
}

#[derive(Default)]
struct TimerState {
    deadline: Option<Instant>,
    shutdown: bool,
}

impl HoldTimer {
    /// Create a stopped timer with the given callback.
    pub fn stopped(callback: impl Fn() + Send + Sync + 'static) -> Self {
        let shared = Arc::new(TimerShared {
            state: Mutex::new(TimerState::default()),
            signal: Condvar::new(),
            callback: Box::new(callback),
        });
        let worker = Arc::clone(&shared);
        thread::spawn(move || worker.run());
        Self { shared }
    }

    /// Arm (or re-arm) the timer to fire after `delay`.
    pub fn reset(&self, delay: Duration) {
        let mut state = self.shared.state.lock().unwrap();
        state.deadline = Some(Instant::now() + delay);
        self.shared.signal.notify_all();
    }

    /// Disarm the timer without firing.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.deadline = None;
        self.shared.signal.notify_all();
    }
}

impl Drop for HoldTimer {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock().unwrap();
        state.shutdown = true;
        state.deadline = None;
        self.shared.signal.notify_all();
    }
}

impl TimerShared {
    fn run(&self) {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.shutdown {
                return;
            }
            match state.deadline {
                None => {
                    state = self.signal.wait(state).unwrap();
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        state.deadline = None;
                        drop(state);
                        (self.callback)();
                        state = self.state.lock().unwrap();
                    } else {
                        let (guard, _) = self.signal.wait_timeout(state, deadline - now).unwrap();
                        state = guard;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fires_once_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_callback = Arc::clone(&fired);
        let timer = HoldTimer::stopped(move || {
            fired_in_callback.fetch_add(1, Ordering::SeqCst);
        });

        timer.reset(Duration::from_millis(20));
        thread::sleep(Duration::from_millis(200));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_prevents_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_callback = Arc::clone(&fired);
        let timer = HoldTimer::stopped(move || {
            fired_in_callback.fetch_add(1, Ordering::SeqCst);
        });

        timer.reset(Duration::from_millis(100));
        timer.stop();
        thread::sleep(Duration::from_millis(250));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reset_pushes_the_deadline_back() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_callback = Arc::clone(&fired);
        let timer = HoldTimer::stopped(move || {
            fired_in_callback.fetch_add(1, Ordering::SeqCst);
        });

        timer.reset(Duration::from_millis(150));
        thread::sleep(Duration::from_millis(50));
        timer.reset(Duration::from_millis(150));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        thread::sleep(Duration::from_millis(300));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
