//! Priority lanes: one bounded FIFO queue per tier.
//!
//! Workers always drain the highest non-empty lane, so an eligible
//! `critical` request is the next job any free worker takes; FIFO within a
//! lane keeps same-tier requests from starving each other.

use plane0::{Priority, Request, Response};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{Notify, oneshot};

/// One queued request plus the channel its response resolves through.
pub(crate) struct Job {
    pub(crate) request: Request,
    pub(crate) reply: oneshot::Sender<Response>,
}

/// Four FIFO queues, scanned highest tier first.
///
/// The queues use short `std::sync::Mutex` critical sections — push and pop
/// only, never held across an await. The `Notify` wakes one parked worker
/// per push and cascades shutdown wakeups.
pub(crate) struct PriorityLanes {
    queues: [Mutex<VecDeque<Job>>; 4],
    capacity: usize,
    notify: Notify,
}

impl PriorityLanes {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            queues: std::array::from_fn(|_| Mutex::new(VecDeque::new())),
            capacity,
            notify: Notify::new(),
        }
    }

    /// Append to the request's lane. `Err` hands the job back when the lane
    /// is at capacity; submission never blocks.
    pub(crate) fn push(&self, job: Job) -> Result<(), Job> {
        let lane = job.request.priority.lane();
        let mut queue = self.queues[lane].lock().expect("lane lock poisoned");
        if queue.len() >= self.capacity {
            return Err(job);
        }
        queue.push_back(job);
        drop(queue);
        self.notify.notify_one();
        Ok(())
    }

    /// Pop the front of the highest non-empty lane.
    pub(crate) fn pop(&self) -> Option<Job> {
        for priority in Priority::ALL {
            let mut queue = self.queues[priority.lane()]
                .lock()
                .expect("lane lock poisoned");
            if let Some(job) = queue.pop_front() {
                return Some(job);
            }
        }
        None
    }

    /// Total queued jobs across all lanes.
    pub(crate) fn len(&self) -> usize {
        self.queues
            .iter()
            .map(|q| q.lock().expect("lane lock poisoned").len())
            .sum()
    }

    /// A future that resolves on the next push (or shutdown wakeup).
    /// Create it before checking the lanes so a concurrent push between the
    /// check and the await is never lost.
    pub(crate) fn notified(&self) -> tokio::sync::futures::Notified<'_> {
        self.notify.notified()
    }

    /// Wake one parked worker. Used to cascade shutdown.
    pub(crate) fn wake_one(&self) {
        self.notify.notify_one();
    }
}
