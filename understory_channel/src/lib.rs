// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_channel --heading-base-level=0

//! Understory Channel: deferred, topic-keyed publish/subscribe for UI lifecycle events.
//!
//! ## Overview
//!
//! UI state owners (a menu registry, a focus manager, a popup stack) often need to tell
//! interested parties that something happened to *one* of the things they own, without
//! calling back into user code while their own state is half-updated.
//! This crate provides the two pieces for that:
//!
//! - [`TaskQueue`]: an explicit FIFO of deferred callbacks, drained by the host after the
//!   current synchronous work has returned.
//! - [`Channel`]: subscriptions keyed by a topic `K`, where [`Channel::publish`] only
//!   schedules delivery on the queue.
//!
//! Topics are any `Ord + Clone` key. Prefer structured keys such as `(OwnerId, EventKind)`;
//! the [`topic`] module handles the `"<owner> <event>"` text form when one is needed.
//!
//! ## Delivery rules
//!
//! - Publishing never runs a handler on the caller's stack.
//! - Deliveries run in the order they were published.
//! - The handler list is read when a delivery runs, not when it was published.
//! - Handlers may publish, subscribe, or unsubscribe while being delivered to.
//! - A [`SubscribeOptions::once`] handler runs at most one time, then stays registered but inert.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_channel::{Channel, SubscribeOptions, handler};
//!
//! let channel: Channel<&'static str, u32> = Channel::new();
//! let total = Rc::new(Cell::new(0));
//! let t = total.clone();
//! let sub = channel.subscribe(
//!     "ticks",
//!     handler(move |d: Option<&u32>| t.set(t.get() + d.copied().unwrap_or(0))),
//!     SubscribeOptions::default(),
//! );
//!
//! channel.publish("ticks", Some(2));
//! assert_eq!(total.get(), 0); // not delivered yet
//! channel.queue().run_pending();
//! assert_eq!(total.get(), 2);
//!
//! sub.unsubscribe();
//! channel.publish("ticks", Some(5));
//! channel.queue().run_pending();
//! assert_eq!(total.get(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod channel;
pub mod queue;
pub mod topic;

pub use channel::{Channel, Handler, SubscribeOptions, Subscription, handler};
pub use queue::TaskQueue;
pub use topic::TopicError;
