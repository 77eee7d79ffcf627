use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// One-shot work fired after a delay.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Identifies an armed timer. Cancelling a fired or cancelled timer is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Runs one-shot tasks after a delay.
///
/// Cancellation is best-effort: a task may already be running when `cancel`
/// is called, so tasks must tolerate firing late.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;

    fn cancel(&self, handle: &TaskHandle);
}

// ── Tokio timers ─────────────────────────────────────────────

/// One spawned tokio task per timer.
pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    armed: Arc<DashMap<u64, AbortHandle>>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            armed: Arc::new(DashMap::new()),
        }
    }

    /// Bind to the runtime of the calling context.
    pub fn current() -> Result<Self, tokio::runtime::TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Timers spawned and not yet fired or cancelled.
    pub fn armed(&self) -> usize {
        self.armed.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let armed = self.armed.clone();
        let deadline = Instant::now() + delay;
        let (registered_tx, registered) = oneshot::channel::<()>();
        let join = self.runtime.spawn(async move {
            // The entry must exist before the task may remove it.
            let _ = registered.await;
            tokio::time::sleep_until(deadline).await;
            armed.remove(&id);
            task();
        });
        self.armed.insert(id, join.abort_handle());
        let _ = registered_tx.send(());
        TaskHandle(id)
    }

    fn cancel(&self, handle: &TaskHandle) {
        if let Some((_, abort)) = self.armed.remove(&handle.0) {
            abort.abort();
        }
    }
}

// ── Virtual clock ────────────────────────────────────────────

struct Pending {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

/// Timers driven by an explicit clock. Nothing fires until [`advance`] is
/// called, which makes promotion timing deterministic in tests and replays.
///
/// [`advance`]: ManualScheduler::advance
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Move the clock forward and run every task that came due, earliest
    /// first. Tasks run without the scheduler lock held, so they may arm new
    /// timers. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut st = self.state.lock();
            st.now += by;
            let now = st.now;
            let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
                st.pending.drain(..).partition(|p| p.due <= now);
            st.pending = rest;
            due.sort_by_key(|p| (p.due, p.id));
            due
        };
        let fired = due.len();
        for p in due {
            (p.task)();
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut st = self.state.lock();
        st.next_id += 1;
        let id = st.next_id;
        let due = st.now + delay;
        st.pending.push(Pending { id, due, task });
        TaskHandle(id)
    }

    fn cancel(&self, handle: &TaskHandle) {
        self.state.lock().pending.retain(|p| p.id != handle.0);
    }
}
