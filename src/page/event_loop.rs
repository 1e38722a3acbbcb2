//! Single-threaded task queue driven by a virtual clock.
//!
//! Nothing here sleeps: time only moves when the page drains due tasks.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use super::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// A reveal transition on `node` has finished.
    TransitionEnd { node: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    task: Task,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct EventLoop {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, task: Task) {
        let due = self.now + delay;
        self.seq += 1;
        self.queue.push(Reverse(Scheduled { due, seq: self.seq, task }));
    }

    /// Pop the earliest task due no later than `deadline` (any task when
    /// `None`), moving the clock to its due time.
    pub fn next_due(&mut self, deadline: Option<Duration>) -> Option<Task> {
        let Reverse(head) = self.queue.peek()?;
        if deadline.is_some_and(|d| head.due > d) {
            return None;
        }
        let Reverse(head) = self.queue.pop()?;
        self.now = self.now.max(head.due);
        Some(head.task)
    }

    /// Move the clock forward without running anything.
    pub fn advance_clock_to(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }
}
