// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred task queue.
//!
//! ## Overview
//!
//! A [`TaskQueue`] holds callbacks that must not run on the caller's stack.
//! Producers [`schedule`](TaskQueue::schedule) work while they mutate their own state,
//! and the host drains the queue once that mutation has returned, typically once per
//! turn of its event loop.
//!
//! ## Re-entrancy
//!
//! Each task is popped before it runs, so the queue is never borrowed while user code
//! executes. A task may schedule more tasks; [`TaskQueue::run_pending`] keeps draining
//! until the queue is empty, while [`TaskQueue::run_scheduled`] only runs the tasks that
//! were queued when it was called.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;

type Task = Box<dyn FnOnce()>;

/// A FIFO queue of deferred tasks, shared by handle.
///
/// Cloning a `TaskQueue` yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl core::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the back of the queue.
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns true if nothing is waiting to run.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Returns true if both handles refer to the same queue.
    pub fn same_queue(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tasks, &other.tasks)
    }

    /// Run the task at the front of the queue, if any.
    ///
    /// Returns false when the queue was empty.
    pub fn run_next(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, including tasks scheduled by tasks.
    ///
    /// Returns the number of tasks run. A task that panics leaves the remaining
    /// tasks queued.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(ran, "drained task queue");
        }
        ran
    }

    /// Run only the tasks that were queued when this was called.
    ///
    /// Tasks they schedule stay queued for the next drain.
    pub fn run_scheduled(&self) -> usize {
        let budget = self.len();
        let mut ran = 0;
        while ran < budget && self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Drop every pending task without running it.
    pub fn discard(&self) -> usize {
        let dropped: VecDeque<Task> = core::mem::take(&mut *self.tasks.borrow_mut());
        dropped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    #[test]
    fn tasks_run_in_fifo_order() {
        let q = TaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            q.schedule(move || log.borrow_mut().push(i));
        }
        assert_eq!(q.len(), 3);
        assert!(log.borrow().is_empty(), "nothing runs until drained");
        assert_eq!(q.run_pending(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(q.is_empty());
    }

    #[test]
    fn nested_schedule_is_drained_by_run_pending() {
        let q = TaskQueue::new();
        let hits = Rc::new(Cell::new(0));
        let inner_q = q.clone();
        let inner_hits = hits.clone();
        q.schedule(move || {
            inner_hits.set(inner_hits.get() + 1);
            let h = inner_hits.clone();
            inner_q.schedule(move || h.set(h.get() + 10));
        });
        assert_eq!(q.run_pending(), 2);
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn run_scheduled_leaves_follow_up_tasks() {
        let q = TaskQueue::new();
        let hits = Rc::new(Cell::new(0));
        let inner_q = q.clone();
        let h = hits.clone();
        q.schedule(move || {
            let h2 = h.clone();
            inner_q.schedule(move || h2.set(h2.get() + 1));
        });
        assert_eq!(q.run_scheduled(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(q.len(), 1);
        assert_eq!(q.run_scheduled(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn discard_drops_without_running() {
        let q = TaskQueue::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        q.schedule(move || h.set(1));
        assert_eq!(q.discard(), 1);
        assert_eq!(q.run_pending(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn clones_share_the_same_queue() {
        let a = TaskQueue::new();
        let b = a.clone();
        b.schedule(|| {});
        assert_eq!(a.len(), 1);
        assert!(a.same_queue(&b));
        assert!(!a.same_queue(&TaskQueue::new()));
    }
}
