// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! String topics of the form `"<owner> <event>"`.
//!
//! Structured keys (for example a tuple of owner and event enum) are the preferred
//! [`Channel`](crate::Channel) topic, since they cannot collide. This module covers the
//! places where a topic has to travel as text, such as logs, scripting bridges, or
//! configuration, and enforces that neither half contains [`SEPARATOR`].

use alloc::string::{String, ToString};

/// Separator between the owner and the event name of a string topic.
pub const SEPARATOR: char = ' ';

/// Errors from building or parsing a string topic.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    /// A topic part contains the separator.
    #[error("invalid topic part {part:?}: cannot contain {sep:?}", sep = SEPARATOR)]
    InvalidTopic {
        /// The offending owner or event name.
        part: String,
    },
    /// The topic text has no separator.
    #[error("malformed topic {0:?}: expected \"<owner> <event>\"")]
    Malformed(String),
}

/// Check that a topic part is usable on either side of the separator.
pub fn validate_part(part: &str) -> Result<(), TopicError> {
    if part.contains(SEPARATOR) {
        return Err(TopicError::InvalidTopic {
            part: part.to_string(),
        });
    }
    Ok(())
}

/// Join `owner` and `event` into a topic string.
pub fn compose(owner: &str, event: &str) -> Result<String, TopicError> {
    validate_part(owner)?;
    validate_part(event)?;
    let mut out = String::with_capacity(owner.len() + event.len() + 1);
    out.push_str(owner);
    out.push(SEPARATOR);
    out.push_str(event);
    Ok(out)
}

/// Split a topic string into `(owner, event)`.
pub fn split(topic: &str) -> Result<(&str, &str), TopicError> {
    let Some((owner, event)) = topic.rsplit_once(SEPARATOR) else {
        return Err(TopicError::Malformed(topic.to_string()));
    };
    validate_part(owner)?;
    Ok((owner, event))
}
