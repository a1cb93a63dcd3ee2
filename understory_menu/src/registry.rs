// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry: owns every menu's configuration and the single active id.
//!
//! ## Transitions
//!
//! - [`Registry::show`] activates a menu. If another menu is active it is hidden first,
//!   so its `Hide` is always scheduled before the new menu's `Show`.
//! - [`Registry::hide`] only acts on the active menu.
//! - [`Registry::clear`] removes an entry. Clearing the active menu deactivates it
//!   without a separate `Hide`; `Clear` is the only event.
//! - [`Registry::clear_all`] hides the active menu (with `Hide`), then clears every entry.
//!
//! Every operation is total: unknown ids are synthesized with default configuration
//! or ignored, never reported as errors.
//!
//! ## Events
//!
//! Nothing user-supplied runs inside these methods (apart from [`MenuData::merge`]).
//! For each transition the registry schedules, in order, the entry's lifecycle callback
//! and then a publish on its [`Channel`] under a [`MenuTopic`]. Drain the
//! [`TaskQueue`] after the call returns to observe them.

use alloc::collections::BTreeMap;

use understory_channel::{Channel, Handler, SubscribeOptions, Subscription, TaskQueue};

use crate::config::{Callback, MenuConfig, MenuPatch};
use crate::types::{DismissTriggers, MenuData, MenuEvent, MenuId, MenuTopic, MenuTopicError};

/// Z-index handed to renderers when none is configured.
pub const DEFAULT_Z_INDEX: i32 = 100;

/// Scope-wide settings of a [`Registry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Signals that hide the active menu when passed to [`Registry::dismiss`].
    pub dismiss: DismissTriggers,
    /// Stacking order for renderers. The registry itself does not interpret it.
    pub z_index: i32,
    /// While false, [`Registry::show`] updates configuration but activates nothing.
    pub enabled: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            dismiss: DismissTriggers::default(),
            z_index: DEFAULT_Z_INDEX,
            enabled: true,
        }
    }
}

impl RegistryOptions {
    /// Set the dismiss triggers.
    pub fn with_dismiss(mut self, dismiss: DismissTriggers) -> Self {
        self.dismiss = dismiss;
        self
    }

    /// Set the z-index.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set whether menus may be activated.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Single-active menu registry over custom data `T`.
///
/// Instantiate one registry per family of menus sharing a data type.
pub struct Registry<T: MenuData> {
    menus: BTreeMap<MenuId, MenuConfig<T>>,
    active: Option<MenuId>,
    options: RegistryOptions,
    events: Channel<MenuTopic, T>,
}

impl<T: MenuData> core::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("menus", &self.menus.len())
            .field("active", &self.active)
            .field("options", &self.options)
            .field("events", &self.events)
            .finish()
    }
}

impl<T: MenuData> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MenuData> Registry<T> {
    /// Create an empty registry with default options and its own task queue.
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    /// Create an empty registry with `options` and its own task queue.
    pub fn with_options(options: RegistryOptions) -> Self {
        Self::with_queue(TaskQueue::new(), options)
    }

    /// Create an empty registry scheduling its events on `queue`.
    pub fn with_queue(queue: TaskQueue, options: RegistryOptions) -> Self {
        Self {
            menus: BTreeMap::new(),
            active: None,
            options,
            events: Channel::with_queue(queue),
        }
    }

    /// The queue lifecycle callbacks and events are scheduled on.
    pub fn queue(&self) -> &TaskQueue {
        self.events.queue()
    }

    /// The channel menu events are published on.
    pub fn events(&self) -> &Channel<MenuTopic, T> {
        &self.events
    }

    /// Current options.
    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    /// Z-index for renderers.
    pub fn z_index(&self) -> i32 {
        self.options.z_index
    }

    /// Replace the dismiss triggers.
    pub fn set_dismiss(&mut self, dismiss: DismissTriggers) {
        self.options.dismiss = dismiss;
    }

    /// Returns true if menus may be activated.
    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Enable or disable activation. Disabling hides the active menu.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.hide_active();
        }
        self.options.enabled = enabled;
    }

    /// The active menu, if any.
    pub fn active_id(&self) -> Option<&MenuId> {
        self.active.as_ref()
    }

    /// Returns true if `id` is the active menu.
    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|active| active.as_str() == id)
    }

    /// Stored configuration of `id`, or `None` if it was never configured or was cleared.
    pub fn config(&self, id: &str) -> Option<&MenuConfig<T>> {
        self.menus.get(id)
    }

    /// Returns true if `id` has an entry.
    pub fn contains(&self, id: &str) -> bool {
        self.menus.contains_key(id)
    }

    /// Number of configured menus.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Returns true if no menu is configured.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Configured ids, in key order.
    pub fn ids(&self) -> impl Iterator<Item = &MenuId> {
        self.menus.keys()
    }

    /// Activate `id`, creating a default entry if needed.
    pub fn show(&mut self, id: impl Into<MenuId>) {
        self.show_inner(id.into(), None);
    }

    /// Merge `patch` into `id`'s configuration, then activate it.
    ///
    /// The merge (and its `Update` event) happens even if `id` is already active.
    pub fn show_with(&mut self, id: impl Into<MenuId>, patch: MenuPatch<T>) {
        self.show_inner(id.into(), Some(patch));
    }

    fn show_inner(&mut self, id: MenuId, patch: Option<MenuPatch<T>>) {
        let entry = self.menus.entry(id.clone()).or_default();
        if let Some(patch) = patch {
            entry.apply(patch);
            let data = entry.data.clone();
            self.publish(&id, MenuEvent::Update, Some(data));
        }

        if !self.options.enabled {
            tracing::debug!(menu = %id, "registry disabled; not activating");
            return;
        }
        if self.is_active(id.as_str()) {
            return;
        }
        if let Some(previous) = self.active.take() {
            tracing::debug!(menu = %previous, "hiding for new active menu");
            self.emit_hide(&previous);
        }
        tracing::debug!(menu = %id, "show");
        self.active = Some(id.clone());
        let (on_show, data) = match self.menus.get(id.as_str()) {
            Some(entry) => (entry.lifecycle.on_show.clone(), entry.data.clone()),
            None => (None, T::default()),
        };
        self.emit(&id, MenuEvent::Show, on_show, Some(data));
    }

    /// Deactivate `id` if it is the active menu. Returns whether it was hidden.
    pub fn hide(&mut self, id: &str) -> bool {
        if !self.is_active(id) {
            return false;
        }
        let Some(id) = self.active.take() else {
            return false;
        };
        tracing::debug!(menu = %id, "hide");
        self.emit_hide(&id);
        true
    }

    /// Hide the active menu, if any. Returns whether a menu was hidden.
    pub fn hide_active(&mut self) -> bool {
        let Some(id) = self.active.take() else {
            return false;
        };
        tracing::debug!(menu = %id, "hide active");
        self.emit_hide(&id);
        true
    }

    /// Hide `id` if active, otherwise show it.
    pub fn toggle(&mut self, id: impl Into<MenuId>) {
        let id = id.into();
        if self.is_active(id.as_str()) {
            self.hide(id.as_str());
        } else {
            self.show_inner(id, None);
        }
    }

    /// Remove `id`'s entry, deactivating it if active. Returns whether an entry existed.
    pub fn clear(&mut self, id: &str) -> bool {
        let Some((id, entry)) = self.menus.remove_entry(id) else {
            return false;
        };
        if self.active.as_ref() == Some(&id) {
            self.active = None;
        }
        tracing::debug!(menu = %id, "clear");
        self.emit(&id, MenuEvent::Clear, entry.lifecycle.on_clear, None);
        true
    }

    /// Hide the active menu, then remove every entry.
    pub fn clear_all(&mut self) {
        self.hide_active();
        let menus = core::mem::take(&mut self.menus);
        tracing::debug!(count = menus.len(), "clear all");
        for (id, entry) in menus {
            self.emit(&id, MenuEvent::Clear, entry.lifecycle.on_clear, None);
        }
    }

    /// Replace `id`'s configuration. Does not change which menu is active.
    pub fn set_config(&mut self, id: impl Into<MenuId>, config: MenuConfig<T>) {
        let id = id.into();
        let data = config.data.clone();
        self.menus.insert(id.clone(), config);
        self.publish(&id, MenuEvent::Update, Some(data));
    }

    /// Merge `patch` into `id`'s configuration, starting from defaults if absent.
    pub fn update_config(&mut self, id: impl Into<MenuId>, patch: MenuPatch<T>) {
        let id = id.into();
        let entry = self.menus.entry(id.clone()).or_default();
        entry.apply(patch);
        let data = entry.data.clone();
        self.publish(&id, MenuEvent::Update, Some(data));
    }

    /// Forward an external dismiss signal. Hides the active menu if `trigger`
    /// intersects the configured triggers. Returns whether a menu was hidden.
    pub fn dismiss(&mut self, trigger: DismissTriggers) -> bool {
        if !self.options.dismiss.intersects(trigger) {
            return false;
        }
        self.hide_active()
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

    /// Subscribe by event name (`onShow`, `onHide`, `onClear`, `onUpdate`).
    ///
    /// Fails with [`TopicError::InvalidTopic`](understory_channel::TopicError::InvalidTopic)
    /// if the name contains the topic separator.
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

    fn emit_hide(&self, id: &MenuId) {
        let on_hide = self
            .menus
            .get(id.as_str())
            .and_then(|entry| entry.lifecycle.on_hide.clone());
        self.emit(id, MenuEvent::Hide, on_hide, None);
    }

    fn emit(&self, id: &MenuId, event: MenuEvent, callback: Option<Callback<T>>, detail: Option<T>) {
        if let Some(callback) = callback {
            let detail = detail.clone();
            self.queue().schedule(move || callback(detail.as_ref()));
        }
        self.publish(id, event, detail);
    }

    fn publish(&self, id: &MenuId, event: MenuEvent, detail: Option<T>) {
        self.events.publish(MenuTopic::new(id, event), detail);
    }
}
