// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared provider handle and per-menu accessors.
//!
//! ## Overview
//!
//! A [`MenuProvider`] is the scope that owns one [`Registry`]. Components receive a
//! clone of the provider (or a [`Menu`] derived from it), never a global.
//! Dropping the last handle discards every entry.
//!
//! [`Menu`] narrows the provider to one id. It stores nothing but the id: every read
//! goes to the registry at call time, so two accessors for the same id always agree.
//!
//! ## Re-entrancy
//!
//! Each method borrows the registry for the duration of the call only. Lifecycle
//! callbacks and channel handlers run from [`MenuProvider::run_pending`], outside any
//! borrow, so they may hold a provider or accessor and call it.
//! [`MenuData::merge`] runs inside the borrow and must not call back into the provider.

use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Point;
use understory_channel::{Channel, Handler, SubscribeOptions, Subscription, TaskQueue};

use crate::config::{MenuConfig, MenuPatch};
use crate::registry::{Registry, RegistryOptions};
use crate::types::{DismissTriggers, MenuData, MenuEvent, MenuId, MenuTopic, MenuTopicError};

/// Clonable handle to a scope's [`Registry`].
pub struct MenuProvider<T: MenuData> {
    registry: Rc<RefCell<Registry<T>>>,
    // Cloned out of the registry so draining never borrows it.
    events: Channel<MenuTopic, T>,
}

impl<T: MenuData> Clone for MenuProvider<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            events: self.events.clone(),
        }
    }
}

impl<T: MenuData> core::fmt::Debug for MenuProvider<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.registry.try_borrow() {
            Ok(registry) => f.debug_tuple("MenuProvider").field(&*registry).finish(),
            Err(_) => f.debug_tuple("MenuProvider").field(&"<borrowed>").finish(),
        }
    }
}

impl<T: MenuData> Default for MenuProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MenuData> MenuProvider<T> {
    /// Mount a provider with default options.
    pub fn new() -> Self {
        Self::from_registry(Registry::new())
    }

    /// Mount a provider with `options`.
    pub fn with_options(options: RegistryOptions) -> Self {
        Self::from_registry(Registry::with_options(options))
    }

    /// Wrap an existing registry.
    pub fn from_registry(registry: Registry<T>) -> Self {
        let events = registry.events().clone();
        Self {
            registry: Rc::new(RefCell::new(registry)),
            events,
        }
    }

    /// Accessor for one menu.
    pub fn menu(&self, id: impl Into<MenuId>) -> Menu<T> {
        Menu {
            provider: self.clone(),
            id: id.into(),
        }
    }

    /// Run deferred callbacks and events until none are left. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        self.events.queue().run_pending()
    }

    /// The queue callbacks and events are scheduled on.
    pub fn queue(&self) -> &TaskQueue {
        self.events.queue()
    }

    /// The channel menu events are published on.
    pub fn events(&self) -> &Channel<MenuTopic, T> {
        &self.events
    }

    /// Run `f` with shared access to the registry.
    pub fn read<R>(&self, f: impl FnOnce(&Registry<T>) -> R) -> R {
        f(&self.registry.borrow())
    }

    fn write<R>(&self, f: impl FnOnce(&mut Registry<T>) -> R) -> R {
        f(&mut self.registry.borrow_mut())
    }

    /// The active menu, if any.
    pub fn active_id(&self) -> Option<MenuId> {
        self.read(|r| r.active_id().cloned())
    }

    /// Returns true if `id` is the active menu.
    pub fn is_active(&self, id: &str) -> bool {
        self.read(|r| r.is_active(id))
    }

    /// A copy of `id`'s configuration.
    pub fn config(&self, id: &str) -> Option<MenuConfig<T>> {
        self.read(|r| r.config(id).cloned())
    }

    /// Z-index for renderers.
    pub fn z_index(&self) -> i32 {
        self.read(Registry::z_index)
    }

    /// See [`Registry::show`].
    pub fn show(&self, id: impl Into<MenuId>) {
        self.write(|r| r.show(id));
    }

    /// See [`Registry::show_with`].
    pub fn show_with(&self, id: impl Into<MenuId>, patch: MenuPatch<T>) {
        self.write(|r| r.show_with(id, patch));
    }

    /// See [`Registry::hide`].
    pub fn hide(&self, id: &str) -> bool {
        self.write(|r| r.hide(id))
    }

    /// See [`Registry::hide_active`].
    pub fn hide_active(&self) -> bool {
        self.write(Registry::hide_active)
    }

    /// See [`Registry::toggle`].
    pub fn toggle(&self, id: impl Into<MenuId>) {
        self.write(|r| r.toggle(id));
    }

    /// See [`Registry::clear`].
    pub fn clear(&self, id: &str) -> bool {
        self.write(|r| r.clear(id))
    }

    /// See [`Registry::clear_all`].
    pub fn clear_all(&self) {
        self.write(Registry::clear_all);
    }

    /// See [`Registry::set_config`].
    pub fn set_config(&self, id: impl Into<MenuId>, config: MenuConfig<T>) {
        self.write(|r| r.set_config(id, config));
    }

    /// See [`Registry::update_config`].
    pub fn update_config(&self, id: impl Into<MenuId>, patch: MenuPatch<T>) {
        self.write(|r| r.update_config(id, patch));
    }

    /// See [`Registry::dismiss`].
    pub fn dismiss(&self, trigger: DismissTriggers) -> bool {
        self.write(|r| r.dismiss(trigger))
    }

    /// See [`Registry::set_enabled`].
    pub fn set_enabled(&self, enabled: bool) {
        self.write(|r| r.set_enabled(enabled));
    }

    /// Subscribe to one event of one menu.
    pub fn subscribe(
        &self,
        id: impl Into<MenuId>,
        event: MenuEvent,
        handler: Handler<T>,
        options: SubscribeOptions,
    ) -> Subscription<MenuTopic, T> {
        self.events
            .subscribe(MenuTopic::new(id, event), handler, options)
    }

    /// See [`Registry::subscribe_named`].
    pub fn subscribe_named(
        &self,
        id: impl Into<MenuId>,
        event: &str,
        handler: Handler<T>,
        options: SubscribeOptions,
    ) -> Result<Subscription<MenuTopic, T>, MenuTopicError> {
        let event: MenuEvent = event.parse()?;
        Ok(self.subscribe(id, event, handler, options))
    }
}

/// Operations of a [`MenuProvider`] bound to one menu id.
pub struct Menu<T: MenuData> {
    provider: MenuProvider<T>,
    id: MenuId,
}

impl<T: MenuData> Clone for Menu<T> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            id: self.id.clone(),
        }
    }
}

impl<T: MenuData> core::fmt::Debug for Menu<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<T: MenuData> Menu<T> {
    /// The bound id.
    pub fn id(&self) -> &MenuId {
        &self.id
    }

    /// The provider this accessor was derived from.
    pub fn provider(&self) -> &MenuProvider<T> {
        &self.provider
    }

    /// Returns true if this menu is the active one.
    pub fn is_active(&self) -> bool {
        self.provider.is_active(self.id.as_str())
    }

    /// A copy of this menu's configuration, or `None` if unconfigured.
    pub fn config(&self) -> Option<MenuConfig<T>> {
        self.provider.config(self.id.as_str())
    }

    /// A copy of this menu's custom data, or `None` if unconfigured.
    pub fn data(&self) -> Option<T> {
        self.provider
            .read(|r| r.config(self.id.as_str()).map(|c| c.data.clone()))
    }

    /// This menu's position, or `None` if unconfigured.
    pub fn position(&self) -> Option<Point> {
        self.provider
            .read(|r| r.config(self.id.as_str()).map(|c| c.position))
    }

    /// Activate this menu.
    pub fn show(&self) {
        self.provider.show(&self.id);
    }

    /// Merge `patch`, then activate this menu.
    pub fn show_with(&self, patch: MenuPatch<T>) {
        self.provider.show_with(&self.id, patch);
    }

    /// Deactivate this menu if it is active.
    pub fn hide(&self) -> bool {
        self.provider.hide(self.id.as_str())
    }

    /// Hide if active, otherwise show.
    pub fn toggle(&self) {
        self.provider.toggle(&self.id);
    }

    /// Remove this menu's entry.
    pub fn clear(&self) -> bool {
        self.provider.clear(self.id.as_str())
    }

    /// Replace this menu's configuration.
    pub fn set_config(&self, config: MenuConfig<T>) {
        self.provider.set_config(&self.id, config);
    }

    /// Merge into this menu's configuration.
    pub fn update_config(&self, patch: MenuPatch<T>) {
        self.provider.update_config(&self.id, patch);
    }

    /// Subscribe to one of this menu's events.
    pub fn subscribe(
        &self,
        event: MenuEvent,
        handler: Handler<T>,
        options: SubscribeOptions,
    ) -> Subscription<MenuTopic, T> {
        self.provider.subscribe(&self.id, event, handler, options)
    }
}
