// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers for computing a menu origin from the element that opened it.
//!
//! The registry never calls these; it stores whatever position it is given.
//! No viewport clamping or flipping is done here either.

use kurbo::{Point, Rect};

/// Which edge of the target the menu opens against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Directly to the right of the target, top-aligned.
    Right,
    /// Directly below the target, left-aligned.
    Bottom,
}

/// Menu origin for a target rectangle (in the same space as the menu position).
pub fn anchor_point(target: Rect, anchor: Anchor) -> Point {
    let target = target.abs();
    match anchor {
        Anchor::Right => Point::new(target.x1, target.y0),
        Anchor::Bottom => Point::new(target.x0, target.y1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_is_top_right_corner() {
        let r = Rect::new(10.0, 20.0, 40.0, 30.0);
        assert_eq!(anchor_point(r, Anchor::Right), Point::new(40.0, 20.0));
    }

    #[test]
    fn bottom_is_bottom_left_corner() {
        let r = Rect::new(10.0, 20.0, 40.0, 30.0);
        assert_eq!(anchor_point(r, Anchor::Bottom), Point::new(10.0, 30.0));
    }

    #[test]
    fn flipped_rect_is_normalized() {
        let r = Rect::new(40.0, 30.0, 10.0, 20.0);
        assert_eq!(anchor_point(r, Anchor::Bottom), Point::new(10.0, 30.0));
    }
}
