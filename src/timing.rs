//! Rate limiting and cancellable timers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Wall clock in milliseconds.
pub fn now_ms() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    RunNow,
    Defer,
}

/// Decides whether a throttled call may run immediately.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    delay_ms: f64,
    last_run: Option<f64>,
}

impl ThrottleGate {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms: f64::from(delay_ms),
            last_run: None,
        }
    }

    pub fn admit(&mut self, now: f64) -> Admission {
        match self.last_run {
            Some(last) if now - last <= self.delay_ms => Admission::Defer,
            _ => {
                self.last_run = Some(now);
                Admission::RunNow
            }
        }
    }

    /// Called when a deferred call finally runs.
    pub fn record(&mut self, now: f64) {
        self.last_run = Some(now);
    }
}

/// Runs `f` at most once per delay window. Calls inside the window collapse
/// into one trailing call fired `delay` after the most recent of them.
pub struct Throttle {
    delay_ms: u32,
    gate: Rc<RefCell<ThrottleGate>>,
    trailing: RefCell<Option<Timeout>>,
    f: Rc<dyn Fn()>,
}

impl Throttle {
    pub fn new<F: Fn() + 'static>(delay_ms: u32, f: F) -> Self {
        Self {
            delay_ms,
            gate: Rc::new(RefCell::new(ThrottleGate::new(delay_ms))),
            trailing: RefCell::new(None),
            f: Rc::new(f),
        }
    }

    pub fn call(&self) {
        let admission = self.gate.borrow_mut().admit(now_ms());
        match admission {
            Admission::RunNow => (self.f)(),
            Admission::Defer => {
                let gate = self.gate.clone();
                let f = self.f.clone();
                // Replacing the handle cancels the previous trailing call.
                *self.trailing.borrow_mut() = Some(Timeout::new(self.delay_ms, move || {
                    f();
                    gate.borrow_mut().record(now_ms());
                }));
            }
        }
    }
}

/// Runs `f` once calls have stopped for `delay` milliseconds.
pub struct Debounce {
    delay_ms: u32,
    pending: RefCell<Option<Timeout>>,
    f: Rc<dyn Fn()>,
}

impl Debounce {
    pub fn new<F: Fn() + 'static>(delay_ms: u32, f: F) -> Self {
        Self {
            delay_ms,
            pending: RefCell::new(None),
            f: Rc::new(f),
        }
    }

    pub fn call(&self) {
        let f = self.f.clone();
        *self.pending.borrow_mut() = Some(Timeout::new(self.delay_ms, move || f()));
    }
}

#[derive(Default)]
struct TimerTable {
    next_id: u64,
    pending: HashMap<u64, Timeout>,
    fired: Vec<u64>,
}

impl TimerTable {
    fn prune(&mut self) {
        for id in self.fired.drain(..) {
            self.pending.remove(&id);
        }
    }
}

/// Shared set of one-shot timers. Clearing or dropping the last handle
/// cancels whatever has not fired yet.
#[derive(Clone, Default)]
pub struct Timers {
    table: Rc<RefCell<TimerTable>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F: FnOnce() + 'static>(&self, millis: u32, f: F) {
        let mut table = self.table.borrow_mut();
        table.prune();
        table.next_id += 1;
        let id = table.next_id;

        let weak = Rc::downgrade(&self.table);
        let timeout = Timeout::new(millis, move || {
            f();
            // Finished handles are dropped on the next schedule, never inside their own callback.
            if let Some(table) = weak.upgrade() {
                table.borrow_mut().fired.push(id);
            }
        });
        table.pending.insert(id, timeout);
    }

    pub fn clear(&self) {
        let mut table = self.table.borrow_mut();
        table.pending.clear();
        table.fired.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_always_runs() {
        let mut gate = ThrottleGate::new(100);
        assert_eq!(gate.admit(5.0), Admission::RunNow);
    }

    #[test]
    fn calls_inside_window_are_deferred() {
        let mut gate = ThrottleGate::new(100);
        assert_eq!(gate.admit(1_000.0), Admission::RunNow);
        assert_eq!(gate.admit(1_050.0), Admission::Defer);
        assert_eq!(gate.admit(1_100.0), Admission::Defer);
        assert_eq!(gate.admit(1_101.0), Admission::RunNow);
    }

    #[test]
    fn trailing_run_restarts_window() {
        let mut gate = ThrottleGate::new(100);
        gate.admit(0.0);
        assert_eq!(gate.admit(50.0), Admission::Defer);
        gate.record(150.0);
        assert_eq!(gate.admit(200.0), Admission::Defer);
        assert_eq!(gate.admit(251.0), Admission::RunNow);
    }
}
