//! Coordination primitives shared by the background loops.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Lock a mutex, recovering the data if a panicking thread poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct GateState {
    /// Number of outstanding pauses.
    paused: usize,
    flushing: bool,
}

/// Pause/idle handshake between the flush loop and interactive input.
///
/// The flush loop brackets each frame with [`FlushGate::begin_flush`]; input
/// calls [`FlushGate::pause`], which blocks until no frame is in flight and
/// keeps new frames from starting until the returned guard is dropped.
#[derive(Debug, Default)]
pub struct FlushGate {
    state: Mutex<GateState>,
    idle: Condvar,
}

impl FlushGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a frame, unless the gate is paused.
    pub fn begin_flush(&self) -> Option<FlushToken<'_>> {
        let mut state = lock(&self.state);
        if state.paused > 0 {
            return None;
        }
        state.flushing = true;
        Some(FlushToken { gate: self })
    }

    /// Stop new frames and wait for the one in flight, if any, to finish.
    pub fn pause(&self) -> PauseGuard<'_> {
        let mut state = lock(&self.state);
        state.paused += 1;
        while state.flushing {
            state = self
                .idle
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        PauseGuard { gate: self }
    }

    pub fn is_paused(&self) -> bool {
        lock(&self.state).paused > 0
    }

    pub fn is_flushing(&self) -> bool {
        lock(&self.state).flushing
    }
}

/// Marks a frame in flight; dropping it wakes any waiting pause.
#[must_use]
pub struct FlushToken<'a> {
    gate: &'a FlushGate,
}

impl Drop for FlushToken<'_> {
    fn drop(&mut self) {
        lock(&self.gate.state).flushing = false;
        self.gate.idle.notify_all();
    }
}

/// Keeps the flush loop paused until dropped.
#[must_use]
pub struct PauseGuard<'a> {
    gate: &'a FlushGate,
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(&self.gate.state);
        state.paused = state.paused.saturating_sub(1);
    }
}

/// Interruptible sleep used to pace a background loop.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        *lock(&self.stopped) = true;
        self.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *lock(&self.stopped)
    }

    /// Re-arm after a stop so the owning loop can be started again.
    pub fn reset(&self) {
        *lock(&self.stopped) = false;
    }

    /// Sleep for `interval` or until stopped. Returns `true` once stopped.
    ///
    /// An interval too long to represent as a deadline waits for the stop alone.
    pub fn wait(&self, interval: Duration) -> bool {
        let deadline = Instant::now().checked_add(interval);
        let mut stopped = lock(&self.stopped);
        while !*stopped {
            stopped = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.wake
                        .wait_timeout(stopped, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .wake
                    .wait(stopped)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn paused_gate_refuses_new_frames() {
        let gate = FlushGate::new();
        {
            let _pause = gate.pause();
            assert!(gate.is_paused());
            assert!(gate.begin_flush().is_none());
        }
        assert!(!gate.is_paused());
        let token = gate.begin_flush();
        assert!(token.is_some());
        assert!(gate.is_flushing());
        drop(token);
        assert!(!gate.is_flushing());
    }

    #[test]
    fn pause_waits_for_frame_in_flight() {
        let gate = Arc::new(FlushGate::new());
        let token_gate = Arc::clone(&gate);
        let (started_tx, started_rx) = std::sync::mpsc::channel();

        let flusher = thread::spawn(move || {
            let _token = token_gate.begin_flush().unwrap();
            started_tx.send(()).unwrap();
            thread::sleep(Duration::from_millis(50));
        });

        started_rx.recv().unwrap();
        let _pause = gate.pause();
        // The flusher must have dropped its token before pause returned.
        assert!(!gate.is_flushing());
        flusher.join().unwrap();
    }

    #[test]
    fn stop_signal_wakes_sleeper_early() {
        let signal = Arc::new(StopSignal::new());
        let sleeper = Arc::clone(&signal);
        let start = Instant::now();
        let handle = thread::spawn(move || sleeper.wait(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(20));
        signal.stop();
        assert!(handle.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn unbounded_wait_still_stops() {
        let signal = Arc::new(StopSignal::new());
        let sleeper = Arc::clone(&signal);
        let handle = thread::spawn(move || sleeper.wait(Duration::MAX));
        thread::sleep(Duration::from_millis(20));
        signal.stop();
        assert!(handle.join().unwrap());
    }

    #[test]
    fn stop_signal_times_out_when_running() {
        let signal = StopSignal::new();
        assert!(!signal.wait(Duration::from_millis(5)));
        signal.stop();
        assert!(signal.wait(Duration::from_millis(5)));
        signal.reset();
        assert!(!signal.is_stopped());
    }
}
