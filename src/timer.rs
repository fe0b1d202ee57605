//! Single-shot delayed callbacks with cancel-on-drop handles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// Schedules a callback to run once after a delay.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// Keeps a scheduled callback alive. Dropping the handle cancels the callback
/// if it has not fired yet.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), Task>,
}

/// Virtual clock. Callbacks only run when the clock is advanced.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Moves time forward, running every callback that falls due in order.
    /// Callbacks may schedule further callbacks; those run too if they fall
    /// inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.state.borrow().now + by;
        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let due = match state.pending.keys().next() {
                    Some(&key) if key.0 <= target => key,
                    _ => break,
                };
                state.now = due.0;
                state.pending.remove(&due)
            };
            // Run outside the borrow so the task can schedule again.
            if let Some(task) = task {
                task();
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let key = {
            let mut state = self.state.borrow_mut();
            let key = (state.now + delay, state.next_id);
            state.next_id += 1;
            state.pending.insert(key, task);
            key
        };
        let state = Rc::downgrade(&self.state);
        TimerHandle::new(move || {
            if let Some(state) = state.upgrade() {
                // try_borrow_mut: a handle may be dropped from inside a running task
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.pending.remove(&key);
                }
            }
        })
    }
}

/// Browser timers backed by `setTimeout`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct BrowserTimers;

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserTimers {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = gloo_timers::callback::Timeout::new(millis, task);
        TimerHandle::new(move || drop(timeout))
    }
}
