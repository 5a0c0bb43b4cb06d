//! L4/L8: TimerService — delayed, cancellable component callbacks.
//!
//! Grounded in the relay's own switching-delay timer
//! (`dpdt_relay.py`'s `_timer_lock`/`_timer_thread` pair): one daemon
//! thread per engine instance services a min-heap of scheduled actions,
//! woken early whenever a new, sooner deadline is scheduled or an entry is
//! cancelled.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

type Action = Box<dyn FnOnce() + Send>;

struct Entry {
    fire_at: Instant,
    seq: u64,
    action: Option<Action>,
    cancelled: Arc<AtomicBool>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}
impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // BinaryHeap is a max-heap; reverse so the soonest deadline sorts
        // highest (and tie-break on insertion order, earliest first).
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A handle to a scheduled action. Dropping it does *not* cancel the
/// action (matching the teacher's relay, which owns its own timer handle
/// independently of any caller) — call [`TimerHandle::cancel`] explicitly.
#[derive(Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct Shared {
    heap: Mutex<BinaryHeap<Entry>>,
    wake: Condvar,
    shutdown: AtomicBool,
    next_seq: AtomicU64,
}

/// One background thread per engine instance, servicing every component's
/// delayed transitions (relay switching delay, and any future component
/// needing one).
pub struct TimerService {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TimerService {
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            heap: Mutex::new(BinaryHeap::new()),
            wake: Condvar::new(),
            shutdown: AtomicBool::new(false),
            next_seq: AtomicU64::new(0),
        });
        let worker_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("relay-sim-timer".to_string())
            .spawn(move || Self::run(worker_shared))
            .expect("failed to spawn timer thread");
        Self {
            shared,
            worker: Mutex::new(Some(handle)),
        }
    }

    fn run(shared: Arc<Shared>) {
        let mut heap = shared.heap.lock();
        loop {
            if shared.shutdown.load(Ordering::SeqCst) {
                return;
            }
            match heap.peek() {
                None => {
                    shared.wake.wait(&mut heap);
                }
                Some(top) => {
                    let now = Instant::now();
                    if top.fire_at <= now {
                        let mut entry = heap.pop().expect("peeked entry must pop");
                        if !entry.cancelled.load(Ordering::SeqCst) {
                            if let Some(action) = entry.action.take() {
                                parking_lot::MutexGuard::unlocked(&mut heap, move || action());
                            }
                        }
                    } else {
                        let timeout = top.fire_at - now;
                        shared.wake.wait_for(&mut heap, timeout);
                    }
                }
            }
        }
    }

    /// Schedule `action` to run on the timer thread after `delay`. The
    /// returned handle can cancel it any time before it fires; a cancelled
    /// action never runs, matching `dpdt_relay.py`'s guard of checking a
    /// generation counter before mutating state from the timer callback.
    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + Send + 'static) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let seq = self.shared.next_seq.fetch_add(1, Ordering::SeqCst);
        let entry = Entry {
            fire_at: Instant::now() + delay,
            seq,
            action: Some(Box::new(action)),
            cancelled: Arc::clone(&cancelled),
        };
        self.shared.heap.lock().push(entry);
        self.shared.wake.notify_one();
        TimerHandle { cancelled }
    }

    /// Drop every pending action without running it (used by
    /// `Engine::shutdown`).
    pub fn drain(&self) {
        self.shared.heap.lock().clear();
    }

    pub fn pending_count(&self) -> usize {
        self.shared.heap.lock().len()
    }

    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.heap.lock().clear();
        self.shared.wake.notify_all();
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn scheduled_action_fires_after_delay() {
        let timer = TimerService::new();
        let (tx, rx) = mpsc::channel();
        timer.schedule(Duration::from_millis(10), move || {
            tx.send(()).unwrap();
        });
        rx.recv_timeout(Duration::from_secs(1)).expect("action should fire");
    }

    #[test]
    fn cancelled_action_never_runs() {
        let timer = TimerService::new();
        let (tx, rx) = mpsc::channel();
        let handle = timer.schedule(Duration::from_millis(20), move || {
            tx.send(()).unwrap();
        });
        handle.cancel();
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn later_schedule_does_not_block_earlier_one() {
        let timer = TimerService::new();
        let (tx, rx) = mpsc::channel();
        timer.schedule(Duration::from_millis(200), {
            let tx = tx.clone();
            move || tx.send("late").unwrap()
        });
        timer.schedule(Duration::from_millis(10), move || tx.send("early").unwrap());
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), "early");
    }
}
