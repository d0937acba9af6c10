//! Geometry snapshots and the settle-aware bounds comparator.
//!
//! A [`Bounds`] value is captured fresh from a native window whenever the
//! tracker needs it and is never mutated afterwards. The [`BoundsComparator`]
//! diffs two snapshots and, as a side effect, remembers whether any size or
//! position change has been observed since the last settle. That memory is
//! what lets a drag that ends where it started still report the axis that
//! moved along the way.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::native::NativeWindow;

/// Integer rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal origin.
    pub x: i32,
    /// Vertical origin.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Rect {
    /// Construct a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same rectangle shifted by `delta`, size untouched.
    #[must_use]
    pub const fn translated(self, delta: PositionDelta) -> Self {
        Self {
            x: self.x.saturating_add(delta.dx),
            y: self.y.saturating_add(delta.dy),
            width: self.width,
            height: self.height,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Display state of a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowState {
    /// Neither maximized nor minimized.
    #[default]
    Normal,
    /// Maximized.
    Maximized,
    /// Minimized.
    Minimized,
}

/// Immutable geometry snapshot of one window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    /// Window rectangle.
    pub rect: Rect,
    /// Display state at capture time.
    pub state: WindowState,
}

impl Bounds {
    /// Construct a snapshot.
    #[must_use]
    pub const fn new(rect: Rect, state: WindowState) -> Self {
        Self { rect, state }
    }

    /// Capture the current geometry of `window`.
    ///
    /// Minimized wins over maximized when a host reports both.
    #[must_use]
    pub fn capture(window: &dyn NativeWindow) -> Self {
        let state = if window.is_minimized() {
            WindowState::Minimized
        } else if window.is_maximized() {
            WindowState::Maximized
        } else {
            WindowState::Normal
        };
        Self {
            rect: window.bounds(),
            state,
        }
    }
}

/// Per-axis differences between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundsComparison {
    /// Horizontal origin differs.
    pub x: bool,
    /// Vertical origin differs.
    pub y: bool,
    /// Width differs.
    pub width: bool,
    /// Height differs.
    pub height: bool,
    /// Display state differs. Never contributes to [`Self::changed`].
    pub state: bool,
    /// Any of the four geometric axes differs.
    pub changed: bool,
}

impl BoundsComparison {
    /// Width or height differs.
    #[must_use]
    pub const fn size(&self) -> bool {
        self.width || self.height
    }

    /// Horizontal or vertical origin differs.
    #[must_use]
    pub const fn position(&self) -> bool {
        self.x || self.y
    }
}

/// Origin offset between two snapshots (`current - cached`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionDelta {
    /// Change in the horizontal origin.
    pub dx: i32,
    /// Change in the vertical origin.
    pub dy: i32,
}

impl PositionDelta {
    /// Offset that moves `cached` onto `current`.
    #[must_use]
    pub const fn between(current: &Bounds, cached: &Bounds) -> Self {
        Self {
            dx: current.rect.x.saturating_sub(cached.rect.x),
            dy: current.rect.y.saturating_sub(cached.rect.y),
        }
    }
}

impl fmt::Display for PositionDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dx={} dy={}", self.dx, self.dy)
    }
}

/// Snapshot comparator owned by a single tracker.
///
/// Every comparison ORs its size and position differences into accumulators
/// that survive until [`Self::reset`], which the tracker calls after each
/// settling event.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundsComparator {
    /// A width or height change was seen since the last settle.
    size_changed: bool,
    /// An x or y change was seen since the last settle.
    position_changed: bool,
}

impl BoundsComparator {
    /// Diff `current` against `cached` and fold the result into the accumulators.
    pub fn compare(&mut self, current: &Bounds, cached: &Bounds) -> BoundsComparison {
        let x = current.rect.x != cached.rect.x;
        let y = current.rect.y != cached.rect.y;
        let width = current.rect.width != cached.rect.width;
        let height = current.rect.height != cached.rect.height;
        let state = current.state != cached.state;

        self.size_changed |= width || height;
        self.position_changed |= x || y;

        BoundsComparison {
            x,
            y,
            width,
            height,
            state,
            changed: x || y || width || height,
        }
    }

    /// Whether any size change was observed since the last settle.
    #[must_use]
    pub const fn size_changed_since_settle(&self) -> bool {
        self.size_changed
    }

    /// Whether any position change was observed since the last settle.
    #[must_use]
    pub const fn position_changed_since_settle(&self) -> bool {
        self.position_changed
    }

    /// Forget accumulated changes.
    pub fn reset(&mut self) {
        self.size_changed = false;
        self.position_changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(x: i32, y: i32, w: i32, h: i32) -> Bounds {
        Bounds::new(Rect::new(x, y, w, h), WindowState::Normal)
    }

    #[test]
    fn state_alone_is_not_a_change() {
        let mut cmp = BoundsComparator::default();
        let cached = normal(0, 0, 100, 100);
        let current = Bounds::new(cached.rect, WindowState::Maximized);
        let diff = cmp.compare(&current, &cached);
        assert!(diff.state);
        assert!(!diff.changed);
        assert!(!cmp.size_changed_since_settle());
        assert!(!cmp.position_changed_since_settle());
    }

    #[test]
    fn accumulators_survive_round_trip() {
        let mut cmp = BoundsComparator::default();
        let start = normal(0, 0, 100, 100);
        let moved = normal(30, 0, 100, 100);
        assert!(cmp.compare(&moved, &start).position());
        let back = cmp.compare(&start, &moved);
        assert!(back.x && !back.size());
        let settled = cmp.compare(&start, &start);
        assert!(!settled.changed);
        assert!(cmp.position_changed_since_settle());
        assert!(!cmp.size_changed_since_settle());
        cmp.reset();
        assert!(!cmp.position_changed_since_settle());
    }

    #[test]
    fn delta_and_translate() {
        let cached = normal(10, 20, 100, 100);
        let current = normal(15, 5, 300, 300);
        let delta = PositionDelta::between(&current, &cached);
        assert_eq!(delta, PositionDelta { dx: 5, dy: -15 });
        assert_eq!(
            Rect::new(200, 0, 50, 60).translated(delta),
            Rect::new(205, -15, 50, 60)
        );
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let follower = Rect::new(i32::MAX - 5, i32::MIN + 5, 10, 10);
        let moved = follower.translated(PositionDelta { dx: 100, dy: -100 });
        assert_eq!(moved, Rect::new(i32::MAX, i32::MIN, 10, 10));

        let delta = PositionDelta::between(&normal(i32::MAX, i32::MIN, 1, 1), &normal(-1, 1, 1, 1));
        assert_eq!(
            delta,
            PositionDelta {
                dx: i32::MAX,
                dy: i32::MIN
            }
        );
    }
}
