// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-menu configuration: custom data, position, and lifecycle callbacks.

use alloc::rc::Rc;

use kurbo::Point;
use understory_channel::Handler;

use crate::types::MenuData;

/// A lifecycle callback.
///
/// `on_show` receives the menu's custom data; `on_hide` and `on_clear` receive `None`.
/// Callbacks are always run from the task queue, never from inside a registry call.
pub type Callback<T> = Handler<T>;

/// Optional callbacks run on a menu's transitions.
pub struct Lifecycle<T> {
    /// Run after the menu becomes active.
    pub on_show: Option<Callback<T>>,
    /// Run after the menu stops being active.
    pub on_hide: Option<Callback<T>>,
    /// Run after the menu's entry is removed.
    pub on_clear: Option<Callback<T>>,
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self {
            on_show: None,
            on_hide: None,
            on_clear: None,
        }
    }
}

impl<T> Clone for Lifecycle<T> {
    fn clone(&self) -> Self {
        Self {
            on_show: self.on_show.clone(),
            on_hide: self.on_hide.clone(),
            on_clear: self.on_clear.clone(),
        }
    }
}

impl<T> core::fmt::Debug for Lifecycle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("on_show", &self.on_show.is_some())
            .field("on_hide", &self.on_hide.is_some())
            .field("on_clear", &self.on_clear.is_some())
            .finish()
    }
}

impl<T> Lifecycle<T> {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the show callback.
    pub fn on_show(mut self, f: impl Fn(Option<&T>) + 'static) -> Self {
        self.on_show = Some(Rc::new(f));
        self
    }

    /// Set the hide callback.
    pub fn on_hide(mut self, f: impl Fn(Option<&T>) + 'static) -> Self {
        self.on_hide = Some(Rc::new(f));
        self
    }

    /// Set the clear callback.
    pub fn on_clear(mut self, f: impl Fn(Option<&T>) + 'static) -> Self {
        self.on_clear = Some(Rc::new(f));
        self
    }

    /// Overwrite the callbacks that `other` sets; keep the rest.
    pub fn merge(&mut self, other: Self) {
        if other.on_show.is_some() {
            self.on_show = other.on_show;
        }
        if other.on_hide.is_some() {
            self.on_hide = other.on_hide;
        }
        if other.on_clear.is_some() {
            self.on_clear = other.on_clear;
        }
    }
}

/// Stored state of one menu.
#[derive(Clone, Debug)]
pub struct MenuConfig<T> {
    /// Caller-defined payload.
    pub data: T,
    /// Screen position of the menu's origin. Stored as given; never clamped.
    pub position: Point,
    /// Transition callbacks.
    pub lifecycle: Lifecycle<T>,
}

impl<T: Default> Default for MenuConfig<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            position: Point::ZERO,
            lifecycle: Lifecycle::default(),
        }
    }
}

impl<T> MenuConfig<T> {
    /// A config with `data`, positioned at the origin, without callbacks.
    pub fn new(data: T) -> Self {
        Self {
            data,
            position: Point::ZERO,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Set the position.
    pub fn at(mut self, position: impl Into<Point>) -> Self {
        self.position = position.into();
        self
    }

    /// Set the callbacks.
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle<T>) -> Self {
        self.lifecycle = lifecycle;
        self
    }
}

impl<T: MenuData> MenuConfig<T> {
    /// Merge a patch: present fields overwrite, data is merged through [`MenuData::merge`].
    pub fn apply(&mut self, patch: MenuPatch<T>) {
        if let Some(data) = patch.data {
            self.data.merge(data);
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        self.lifecycle.merge(patch.lifecycle);
    }
}

/// Partial configuration merged into a menu's stored [`MenuConfig`].
pub struct MenuPatch<T: MenuData> {
    /// Data fields to merge.
    pub data: Option<T::Patch>,
    /// New position.
    pub position: Option<Point>,
    /// Callbacks to set; unset callbacks are kept.
    pub lifecycle: Lifecycle<T>,
}

impl<T: MenuData> Default for MenuPatch<T> {
    fn default() -> Self {
        Self {
            data: None,
            position: None,
            lifecycle: Lifecycle::default(),
        }
    }
}

impl<T: MenuData> Clone for MenuPatch<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            position: self.position,
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<T: MenuData> core::fmt::Debug for MenuPatch<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MenuPatch")
            .field("data", &self.data.is_some())
            .field("position", &self.position)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl<T: MenuData> MenuPatch<T> {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge these data fields.
    pub fn data(mut self, data: T::Patch) -> Self {
        self.data = Some(data);
        self
    }

    /// Move the menu.
    pub fn position(mut self, position: impl Into<Point>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Set callbacks.
    pub fn lifecycle(mut self, lifecycle: Lifecycle<T>) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Returns true if applying the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
            && self.position.is_none()
            && self.lifecycle.on_show.is_none()
            && self.lifecycle.on_hide.is_none()
            && self.lifecycle.on_clear.is_none()
    }
}
