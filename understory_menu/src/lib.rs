// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_menu --heading-base-level=0

//! Understory Menu: one shared, single-active menu per scope.
//!
//! ## Overview
//!
//! Dropdowns, context menus, and tooltip panels rendered by many independent components
//! usually share one rule: at most one of them is open. This crate keeps that rule in one
//! place. Each menu is identified by a caller-chosen [`MenuId`]; the [`Registry`] stores
//! every menu's [`MenuConfig`] (custom data, position, lifecycle callbacks) and the single
//! active id.
//!
//! It does not render, position, or animate anything. Renderers read
//! [`Menu::is_active`] and [`Menu::config`] and draw accordingly.
//!
//! ## API overview
//!
//! - [`Registry`]: the state machine. `show`, `show_with`, `hide`, `toggle`, `clear`,
//!   `clear_all`, `set_config`, `update_config`, `hide_active`, `dismiss`.
//! - [`MenuProvider`]: clonable scope handle owning one registry. Hand it to components.
//! - [`Menu`]: the provider narrowed to one id; reads always reflect current state.
//! - [`MenuData`]: the custom data contract, with a partial `Patch` form for merges.
//! - [`MenuEvent`] / [`MenuTopic`]: per-menu lifecycle events on an
//!   [`understory_channel::Channel`].
//! - [`DismissTriggers`]: external signals (scroll, escape, ...) that may hide the active menu.
//! - [`anchor`]: origin helpers for menus opened next to an element.
//!
//! ## Event ordering
//!
//! Callbacks and events are never run inside a registry call. They are scheduled on a
//! [`TaskQueue`](understory_channel::TaskQueue) and run when the host calls
//! [`MenuProvider::run_pending`]. Within one call, ordering is strict: switching from
//! `a` to `b` schedules `a`'s hide before `b`'s show. Deferred work may observe state
//! from later synchronous calls.
//!
//! ## Minimal usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_menu::{Lifecycle, MenuConfig, MenuPatch, MenuProvider};
//!
//! let provider: MenuProvider<()> = MenuProvider::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//! for id in ["m1", "m2"] {
//!     let (shown, hidden) = (log.clone(), log.clone());
//!     provider.set_config(
//!         id,
//!         MenuConfig::default().with_lifecycle(
//!             Lifecycle::new()
//!                 .on_show(move |_| shown.borrow_mut().push(format!("{id}.onShow")))
//!                 .on_hide(move |_| hidden.borrow_mut().push(format!("{id}.onHide"))),
//!         ),
//!     );
//! }
//!
//! let m1 = provider.menu("m1");
//! m1.show_with(MenuPatch::new().position((10.0, 20.0)));
//! provider.menu("m2").show();
//! assert!(!m1.is_active());
//!
//! provider.run_pending();
//! assert_eq!(*log.borrow(), ["m1.onShow", "m1.onHide", "m2.onShow"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod accessor;
pub mod anchor;
pub mod config;
pub mod registry;
pub mod types;

pub use accessor::{Menu, MenuProvider};
pub use config::{Callback, Lifecycle, MenuConfig, MenuPatch};
pub use registry::{DEFAULT_Z_INDEX, Registry, RegistryOptions};
pub use types::{DismissTriggers, MenuData, MenuEvent, MenuId, MenuTopic, MenuTopicError};
