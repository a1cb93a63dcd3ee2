// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topic-keyed publish/subscribe with deferred delivery.
//!
//! ## Overview
//!
//! A [`Channel`] maps topics to handler lists. [`Channel::publish`] never calls a
//! handler directly: it schedules one delivery task on the channel's [`TaskQueue`],
//! and that task walks the handlers registered for the topic *when it runs*.
//!
//! ## Handler identity
//!
//! Handlers are [`Handler`] values (`Rc<dyn Fn>`), compared by pointer.
//! Subscribing the same handler to the same topic twice is a no-op, which keeps the
//! first registration's options (including an already spent `once` flag).
//!
//! ## Once
//!
//! A handler subscribed with [`SubscribeOptions::once`] runs at most one time. It is
//! not removed afterwards; it stays registered and inert until unsubscribed.

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::queue::TaskQueue;

/// A subscribed callback. Receives the published detail, if any.
pub type Handler<D> = Rc<dyn Fn(Option<&D>)>;

/// Wrap a closure as a [`Handler`].
///
/// Keep the returned value if you want to unsubscribe or deduplicate by identity later.
pub fn handler<D>(f: impl Fn(Option<&D>) + 'static) -> Handler<D> {
    Rc::new(f)
}

/// Options accepted by [`Channel::subscribe`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Fire at most once, then stay registered but inert.
    pub once: bool,
}

impl SubscribeOptions {
    /// Options for a handler that fires at most once.
    pub const ONCE: Self = Self { once: true };
}

struct Registration<D> {
    handler: Handler<D>,
    once: bool,
    called: Cell<bool>,
    // Cleared on unsubscribe so an in-flight delivery skips it.
    live: Cell<bool>,
}

impl<D> Registration<D> {
    fn try_claim(&self) -> bool {
        if !self.live.get() {
            return false;
        }
        if self.once {
            return !self.called.replace(true);
        }
        true
    }
}

struct Topics<K, D> {
    map: BTreeMap<K, Vec<Rc<Registration<D>>>>,
}

impl<K: Ord, D> Topics<K, D> {
    fn remove(&mut self, topic: &K, handler: &Handler<D>) -> bool {
        let Some(list) = self.map.get_mut(topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|reg| {
            let keep = !same_handler(&reg.handler, handler);
            if !keep {
                reg.live.set(false);
            }
            keep
        });
        let removed = list.len() != before;
        if list.is_empty() {
            self.map.remove(topic);
        }
        removed
    }
}

fn same_handler<D>(a: &Handler<D>, b: &Handler<D>) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// A deferred publish/subscribe channel keyed by topic `K`, carrying details of type `D`.
///
/// Cloning a `Channel` yields another handle to the same subscriptions and queue.
pub struct Channel<K, D> {
    topics: Rc<RefCell<Topics<K, D>>>,
    queue: TaskQueue,
}

impl<K, D> Clone for Channel<K, D> {
    fn clone(&self) -> Self {
        Self {
            topics: self.topics.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<K, D> core::fmt::Debug for Channel<K, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Channel")
            .field("topics", &self.topics.borrow().map.len())
            .field("queue", &self.queue)
            .finish()
    }
}

impl<K: Ord + Clone + 'static, D: 'static> Default for Channel<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + 'static, D: 'static> Channel<K, D> {
    /// Create a channel with its own task queue.
    pub fn new() -> Self {
        Self::with_queue(TaskQueue::new())
    }

    /// Create a channel that schedules deliveries on an existing queue.
    pub fn with_queue(queue: TaskQueue) -> Self {
        Self {
            topics: Rc::new(RefCell::new(Topics {
                map: BTreeMap::new(),
            })),
            queue,
        }
    }

    /// The queue deliveries are scheduled on.
    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    /// Register `handler` for `topic` and return a handle that removes it.
    ///
    /// A handler already registered for `topic` is left untouched.
    pub fn subscribe(
        &self,
        topic: K,
        handler: Handler<D>,
        options: SubscribeOptions,
    ) -> Subscription<K, D> {
        {
            let mut topics = self.topics.borrow_mut();
            let list = topics.map.entry(topic.clone()).or_default();
            if list.iter().any(|reg| same_handler(&reg.handler, &handler)) {
                tracing::trace!("handler already subscribed");
            } else {
                list.push(Rc::new(Registration {
                    handler: handler.clone(),
                    once: options.once,
                    called: Cell::new(false),
                    live: Cell::new(true),
                }));
                tracing::trace!(once = options.once, "subscribed handler");
            }
        }
        Subscription {
            topics: Rc::downgrade(&self.topics),
            topic,
            handler,
        }
    }

    /// Remove `handler` from `topic`. Returns false if it was not registered.
    pub fn unsubscribe(&self, topic: &K, handler: &Handler<D>) -> bool {
        self.topics.borrow_mut().remove(topic, handler)
    }

    /// Schedule delivery of `detail` to the handlers of `topic`.
    ///
    /// Returns immediately; handlers run when the queue is drained.
    pub fn publish(&self, topic: K, detail: Option<D>) {
        let topics = Rc::downgrade(&self.topics);
        self.queue.schedule(move || {
            // The channel may have been dropped while the task waited.
            if let Some(topics) = topics.upgrade() {
                deliver(&topics, &topic, detail.as_ref());
            }
        });
    }

    /// Number of handlers registered for `topic`, spent `once` handlers included.
    pub fn handler_count(&self, topic: &K) -> usize {
        self.topics.borrow().map.get(topic).map_or(0, Vec::len)
    }

    /// Returns true if any handler is registered for `topic`.
    pub fn has_subscribers(&self, topic: &K) -> bool {
        self.handler_count(topic) > 0
    }

    /// Remove every handler for `topic`.
    pub fn clear_topic(&self, topic: &K) -> usize {
        let removed = self.topics.borrow_mut().map.remove(topic);
        removed.map_or(0, |list| {
            for reg in &list {
                reg.live.set(false);
            }
            list.len()
        })
    }

    /// Remove every handler whose topic matches `pred`.
    pub fn clear_matching(&self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let mut topics = self.topics.borrow_mut();
        let mut removed = 0;
        topics.map.retain(|topic, list| {
            if !pred(topic) {
                return true;
            }
            for reg in list.iter() {
                reg.live.set(false);
            }
            removed += list.len();
            false
        });
        removed
    }
}

fn deliver<K: Ord, D>(topics: &RefCell<Topics<K, D>>, topic: &K, detail: Option<&D>) {
    // Snapshot, then release the borrow so handlers may subscribe or unsubscribe.
    let regs: Vec<Rc<Registration<D>>> = match topics.borrow().map.get(topic) {
        Some(list) => list.clone(),
        None => return,
    };
    let mut delivered = 0_usize;
    for reg in regs {
        if reg.try_claim() {
            (reg.handler)(detail);
            delivered += 1;
        }
    }
    tracing::trace!(delivered, "delivered event");
}

/// Handle returned by [`Channel::subscribe`].
///
/// Calling [`unsubscribe`](Subscription::unsubscribe) more than once is harmless.
/// Dropping the handle does not unsubscribe.
pub struct Subscription<K, D> {
    topics: Weak<RefCell<Topics<K, D>>>,
    topic: K,
    handler: Handler<D>,
}

impl<K: core::fmt::Debug, D> core::fmt::Debug for Subscription<K, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

impl<K: Ord, D> Subscription<K, D> {
    /// The topic this handle was created for.
    pub fn topic(&self) -> &K {
        &self.topic
    }

    /// The subscribed handler.
    pub fn handler(&self) -> &Handler<D> {
        &self.handler
    }

    /// Remove the handler from its topic.
    pub fn unsubscribe(&self) {
        if let Some(topics) = self.topics.upgrade() {
            topics.borrow_mut().remove(&self.topic, &self.handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn recorder(log: &Rc<RefCell<Vec<u32>>>, tag: u32) -> Handler<u32> {
        let log = log.clone();
        handler(move |d: Option<&u32>| log.borrow_mut().push(tag * 100 + d.copied().unwrap_or(0)))
    }

    #[test]
    fn publish_is_deferred_until_drained() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _sub = ch.subscribe("a", recorder(&log, 1), SubscribeOptions::default());
        ch.publish("a", Some(7));
        assert!(log.borrow().is_empty());
        assert_eq!(ch.queue().len(), 1);
        ch.queue().run_pending();
        assert_eq!(*log.borrow(), vec![107]);
    }

    #[test]
    fn topics_are_isolated() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _a = ch.subscribe("a", recorder(&log, 1), SubscribeOptions::default());
        let _b = ch.subscribe("b", recorder(&log, 2), SubscribeOptions::default());
        ch.publish("b", None);
        ch.publish("c", Some(3));
        ch.queue().run_pending();
        assert_eq!(*log.borrow(), vec![200]);
    }

    #[test]
    fn duplicate_subscribe_is_a_no_op() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = recorder(&log, 1);
        let _s1 = ch.subscribe("a", h.clone(), SubscribeOptions::default());
        let _s2 = ch.subscribe("a", h.clone(), SubscribeOptions::ONCE);
        assert_eq!(ch.handler_count(&"a"), 1);
        ch.publish("a", Some(1));
        ch.publish("a", Some(2));
        ch.queue().run_pending();
        // The first registration (not once) wins.
        assert_eq!(*log.borrow(), vec![101, 102]);
    }

    #[test]
    fn once_handler_fires_once_and_stays_registered() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = recorder(&log, 1);
        let _s = ch.subscribe("a", h.clone(), SubscribeOptions::ONCE);
        ch.publish("a", Some(1));
        ch.publish("a", Some(2));
        ch.queue().run_pending();
        assert_eq!(*log.borrow(), vec![101]);
        assert_eq!(ch.handler_count(&"a"), 1);
        // Re-subscribing the spent handler does not revive it.
        let _again = ch.subscribe("a", h, SubscribeOptions::ONCE);
        ch.publish("a", Some(3));
        ch.queue().run_pending();
        assert_eq!(*log.borrow(), vec![101]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sub = ch.subscribe("a", recorder(&log, 1), SubscribeOptions::default());
        assert_eq!(sub.topic(), &"a");
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!ch.has_subscribers(&"a"));
        assert!(!ch.unsubscribe(&"a", sub.handler()));
        ch.publish("a", Some(1));
        ch.queue().run_pending();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn handlers_are_read_at_delivery_time() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        ch.publish("a", Some(5));
        let _s = ch.subscribe("a", recorder(&log, 1), SubscribeOptions::default());
        ch.queue().run_pending();
        assert_eq!(*log.borrow(), vec![105]);
    }

    #[test]
    fn handler_removed_mid_delivery_is_skipped() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let second = recorder(&log, 2);
        let remover = {
            let ch = ch.clone();
            let second = second.clone();
            let log = log.clone();
            handler(move |_: Option<&u32>| {
                log.borrow_mut().push(100);
                ch.unsubscribe(&"a", &second);
            })
        };
        let _s1 = ch.subscribe("a", remover, SubscribeOptions::default());
        let _s2 = ch.subscribe("a", second, SubscribeOptions::default());
        ch.publish("a", None);
        ch.queue().run_pending();
        assert_eq!(*log.borrow(), vec![100]);
    }

    #[test]
    fn handlers_may_publish_while_delivering() {
        let ch: Channel<&'static str, u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let relay = {
            let ch = ch.clone();
            handler(move |d: Option<&u32>| ch.publish("b", d.map(|v| v + 1)))
        };
        let _r = ch.subscribe("a", relay, SubscribeOptions::default());
        let _b = ch.subscribe("b", recorder(&log, 2), SubscribeOptions::default());
        ch.publish("a", Some(1));
        assert_eq!(ch.queue().run_pending(), 2);
        assert_eq!(*log.borrow(), vec![202]);
    }

    #[test]
    fn dropped_channel_makes_pending_delivery_inert() {
        let queue = TaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let ch: Channel<&'static str, u32> = Channel::with_queue(queue.clone());
            let _s = ch.subscribe("a", recorder(&log, 1), SubscribeOptions::default());
            ch.publish("a", Some(1));
        }
        assert_eq!(queue.run_pending(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn clear_matching_removes_selected_topics() {
        let ch: Channel<(u32, u32), u32> = Channel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _a = ch.subscribe((1, 0), recorder(&log, 1), SubscribeOptions::default());
        let _b = ch.subscribe((1, 1), recorder(&log, 1), SubscribeOptions::default());
        let _c = ch.subscribe((2, 0), recorder(&log, 2), SubscribeOptions::default());
        assert_eq!(ch.clear_matching(|(id, _)| *id == 1), 2);
        assert!(ch.has_subscribers(&(2, 0)));
        assert_eq!(ch.clear_topic(&(2, 0)), 1);
        assert!(!ch.has_subscribers(&(2, 0)));
    }
}
