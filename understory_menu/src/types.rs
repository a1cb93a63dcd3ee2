// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: menu identifiers, events, topics, dismiss triggers, and custom data.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::borrow::Borrow;
use core::str::FromStr;

use understory_channel::TopicError;
use understory_channel::topic;

/// Caller-supplied key of a logical menu.
///
/// Cheap to clone. Compares and orders like the underlying string, and borrows as
/// `str` so lookups accept plain string slices.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(Rc<str>);

impl MenuId {
    /// Create an id from a string slice.
    pub fn new(id: &str) -> Self {
        Self(Rc::from(id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MenuId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MenuId {
    fn from(id: String) -> Self {
        Self(Rc::from(id))
    }
}

impl From<&Self> for MenuId {
    fn from(id: &Self) -> Self {
        id.clone()
    }
}

impl Borrow<str> for MenuId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MenuId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle events published for each menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MenuEvent {
    /// The menu became the active menu.
    Show,
    /// The menu stopped being the active menu.
    Hide,
    /// The menu's entry was removed.
    Clear,
    /// The menu's configuration was replaced or merged.
    Update,
}

impl MenuEvent {
    /// All events, in declaration order.
    pub const ALL: [Self; 4] = [Self::Show, Self::Hide, Self::Clear, Self::Update];

    /// Canonical event name (`onShow`, `onHide`, `onClear`, `onUpdate`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Show => "onShow",
            Self::Hide => "onHide",
            Self::Clear => "onClear",
            Self::Update => "onUpdate",
        }
    }
}

impl core::fmt::Display for MenuEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from parsing menu events or topics from text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MenuTopicError {
    /// The text violates the topic separator rules.
    #[error(transparent)]
    Topic(#[from] TopicError),
    /// The event name is not one of [`MenuEvent::name`].
    #[error("unknown menu event {0:?}")]
    UnknownEvent(String),
}

impl FromStr for MenuEvent {
    type Err = MenuTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        topic::validate_part(s)?;
        Self::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| MenuTopicError::UnknownEvent(s.to_string()))
    }
}

/// Channel key for one event of one menu.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuTopic {
    /// The menu the event concerns.
    pub id: MenuId,
    /// The event kind.
    pub event: MenuEvent,
}

impl MenuTopic {
    /// Create a topic.
    pub fn new(id: impl Into<MenuId>, event: MenuEvent) -> Self {
        Self {
            id: id.into(),
            event,
        }
    }

    /// Text form, `"<id> <eventName>"`.
    ///
    /// Fails if the id contains [`topic::SEPARATOR`].
    pub fn to_text(&self) -> Result<String, MenuTopicError> {
        Ok(topic::compose(self.id.as_str(), self.event.name())?)
    }
}

impl FromStr for MenuTopic {
    type Err = MenuTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, event) = topic::split(s)?;
        Ok(Self::new(id, event.parse()?))
    }
}

bitflags::bitflags! {
    /// External signals that may dismiss the active menu.
    ///
    /// Configure the set on [`RegistryOptions`](crate::RegistryOptions) and forward
    /// signals with [`Registry::dismiss`](crate::Registry::dismiss).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DismissTriggers: u8 {
        /// The page or a scroll container scrolled.
        const SCROLL               = 0b0000_0001;
        /// A pointer was pressed outside any menu.
        const POINTER_DOWN_OUTSIDE = 0b0000_0010;
        /// The escape key was pressed.
        const ESCAPE               = 0b0000_0100;
        /// The host window lost focus.
        const FOCUS_LOST           = 0b0000_1000;
        /// The host window was resized.
        const RESIZE               = 0b0001_0000;
    }
}

impl Default for DismissTriggers {
    fn default() -> Self {
        Self::SCROLL
    }
}

/// Caller-defined payload stored with each menu.
///
/// `Patch` is the partial form merged in by [`Registry::update_config`](crate::Registry::update_config)
/// and [`Registry::show_with`](crate::Registry::show_with). Merging is shallow: fields
/// present in the patch overwrite, everything else is kept.
pub trait MenuData: Clone + Default + 'static {
    /// Partial update of `Self`.
    type Patch: Clone + 'static;

    /// Merge `patch` into `self`.
    fn merge(&mut self, patch: Self::Patch);
}

impl MenuData for () {
    type Patch = ();

    fn merge(&mut self, _patch: ()) {}
}

impl<K, V> MenuData for BTreeMap<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    type Patch = Self;

    fn merge(&mut self, patch: Self) {
        self.extend(patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_id_borrows_as_str() {
        let mut map = BTreeMap::new();
        map.insert(MenuId::from("m1"), 1);
        assert_eq!(map.get("m1"), Some(&1));
        assert_eq!(MenuId::from(String::from("m1")), MenuId::new("m1"));
    }

    #[test]
    fn event_names_parse() {
        for event in MenuEvent::ALL {
            assert_eq!(event.name().parse::<MenuEvent>(), Ok(event));
        }
        assert_eq!(
            "onOpen".parse::<MenuEvent>(),
            Err(MenuTopicError::UnknownEvent("onOpen".to_string()))
        );
    }

    #[test]
    fn event_name_with_separator_is_invalid_topic() {
        assert!(matches!(
            "on Show".parse::<MenuEvent>(),
            Err(MenuTopicError::Topic(TopicError::InvalidTopic { .. }))
        ));
    }

    #[test]
    fn topic_text_form() {
        let t = MenuTopic::new("row-1", MenuEvent::Hide);
        assert_eq!(t.to_text().as_deref(), Ok("row-1 onHide"));
        assert_eq!("row-1 onHide".parse::<MenuTopic>(), Ok(t));
        assert!(MenuTopic::new("row 1", MenuEvent::Hide).to_text().is_err());
    }

    #[test]
    fn map_data_merges_shallowly() {
        let mut data: BTreeMap<&str, i32> = BTreeMap::new();
        MenuData::merge(&mut data, BTreeMap::from([("a", 1)]));
        MenuData::merge(&mut data, BTreeMap::from([("b", 2), ("a", 3)]));
        assert_eq!(data, BTreeMap::from([("a", 3), ("b", 2)]));
    }

    #[test]
    fn dismiss_defaults_to_scroll() {
        assert_eq!(DismissTriggers::default(), DismissTriggers::SCROLL);
    }
}
