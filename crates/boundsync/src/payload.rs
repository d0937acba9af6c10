//! Synthetic bounds-change notifications.
use std::fmt;

use boundsync_ids::WindowIdentity;
use serde::{Deserialize, Serialize};

use crate::bounds::Rect;

/// Which geometric aspect a notification reports.
///
/// Serialized as the integers `0`, `1` and `2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ChangeType {
    /// Only the position changed, or nothing changed but a settle was forced.
    Position,
    /// Only the size changed.
    Size,
    /// Both size and position changed.
    PositionAndSize,
}

impl ChangeType {
    /// Combine size/position flags into a change type.
    #[must_use]
    pub const fn from_flags(size: bool, position: bool) -> Self {
        match (size, position) {
            (true, true) => Self::PositionAndSize,
            (true, false) => Self::Size,
            _ => Self::Position,
        }
    }

    /// True for [`Self::Size`] and [`Self::PositionAndSize`].
    #[must_use]
    pub const fn has_size(self) -> bool {
        matches!(self, Self::Size | Self::PositionAndSize)
    }

    /// True for [`Self::Position`] and [`Self::PositionAndSize`].
    #[must_use]
    pub const fn has_position(self) -> bool {
        matches!(self, Self::Position | Self::PositionAndSize)
    }
}

impl From<ChangeType> for u8 {
    fn from(value: ChangeType) -> Self {
        match value {
            ChangeType::Position => 0,
            ChangeType::Size => 1,
            ChangeType::PositionAndSize => 2,
        }
    }
}

impl TryFrom<u8> for ChangeType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Position),
            1 => Ok(Self::Size),
            2 => Ok(Self::PositionAndSize),
            other => Err(format!("invalid change type {other}")),
        }
    }
}

/// Causal classification of a bounds change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    /// The window moved itself (user drag or direct call).
    #[serde(rename = "self")]
    Own,
    /// The window is running its own animation.
    Animation,
    /// Another window in the group led the move.
    Group,
    /// Another window in the group led the move with an animation.
    GroupAnimation,
    /// An external API call caused the move.
    Api,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Own => "self",
            Self::Animation => "animation",
            Self::Group => "group",
            Self::GroupAnimation => "group-animation",
            Self::Api => "api",
        })
    }
}

/// Phase of a change gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsEventType {
    /// More changes are expected in this gesture.
    #[serde(rename = "bounds-changing")]
    Changing,
    /// The settling event of a gesture.
    #[serde(rename = "bounds-changed")]
    Changed,
}

/// Payload of the synthetic bounds-change notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsChange {
    /// Aspect that changed.
    pub change_type: ChangeType,
    /// Why it changed.
    pub reason: Reason,
    /// Window name.
    pub name: String,
    /// Owning application uuid.
    pub uuid: String,
    /// Gesture phase.
    #[serde(rename = "type")]
    pub event_type: BoundsEventType,
    /// Whether the window was deferring notifications when this was produced.
    pub deferred: bool,
    /// Vertical origin.
    pub top: i32,
    /// Horizontal origin.
    pub left: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl BoundsChange {
    /// Build a payload for `window` at `rect`.
    #[must_use]
    pub fn new(
        window: &WindowIdentity,
        rect: Rect,
        change_type: ChangeType,
        reason: Reason,
        event_type: BoundsEventType,
        deferred: bool,
    ) -> Self {
        Self {
            change_type,
            reason,
            name: window.name().to_string(),
            uuid: window.uuid().to_string(),
            event_type,
            deferred,
            top: rect.y,
            left: rect.x,
            width: rect.width,
            height: rect.height,
        }
    }

    /// Rectangle reported by this payload.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// True for settling notifications.
    #[must_use]
    pub fn is_settle(&self) -> bool {
        self.event_type == BoundsEventType::Changed
    }
}
