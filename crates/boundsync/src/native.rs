//! Seams to the host: native windows, animations, groups and the deferred-move relay.
//!
//! Each collaborator is a `Send + Sync` trait object injected into trackers
//! through [`crate::TrackerServices`]. The [`crate::memory`] module provides
//! in-process implementations of all of them.
use std::sync::{Arc, Weak};

use boundsync_ids::{GroupId, NativeHandle, WindowId, WindowIdentity};
use serde::{Deserialize, Serialize};

use crate::{
    bounds::Rect, error::Result, listeners::ListenerId, payload::BoundsChange,
    reposition::WindowPos,
};

/// Lifecycle and geometry signals a native window delivers to its listeners.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowEvent {
    /// The user started an interactive move or resize.
    BeginUserBoundsChange,
    /// The user finished an interactive move or resize.
    EndUserBoundsChange,
    /// Geometry changed; more changes may follow.
    BoundsChanged,
    /// An animation on this window finished.
    AnimateEnd {
        /// The animation touched the window bounds.
        bounds: bool,
    },
    /// Visibility flipped.
    VisibilityChanged {
        /// The window is now visible.
        visible: bool,
    },
    /// The window was minimized.
    Minimize,
    /// The window was maximized.
    Maximize,
    /// The window was restored from minimized.
    Restore,
    /// The window left the maximized state.
    Unmaximize,
    /// A batched position change for this window completed asynchronously.
    DeferredSetBounds(WindowPos),
}

impl WindowEvent {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BeginUserBoundsChange => "begin-user-bounds-change",
            Self::EndUserBoundsChange => "end-user-bounds-change",
            Self::BoundsChanged => "bounds-changed",
            Self::AnimateEnd { .. } => "synth-animate-end",
            Self::VisibilityChanged { .. } => "visibility-changed",
            Self::Minimize => "minimize",
            Self::Maximize => "maximize",
            Self::Restore => "restore",
            Self::Unmaximize => "unmaximize",
            Self::DeferredSetBounds(_) => "deferred-set-bounds",
        }
    }
}

/// Receiver of [`WindowEvent`]s.
pub trait WindowListener: Send + Sync {
    /// Handle one event. Events for a given window are delivered serially.
    fn on_window_event(&self, event: &WindowEvent);
}

/// The host's native window object.
pub trait NativeWindow: Send + Sync {
    /// Host-assigned id.
    fn id(&self) -> WindowId;
    /// Platform handle.
    fn native_handle(&self) -> NativeHandle;
    /// Current window rectangle.
    fn bounds(&self) -> Rect;
    /// Whether the window is maximized.
    fn is_maximized(&self) -> bool;
    /// Whether the window is minimized.
    fn is_minimized(&self) -> bool;
    /// Move and resize the window.
    fn set_bounds(&self, bounds: Rect) -> Result<()>;
    /// Raise the window above its siblings.
    fn bring_to_front(&self) -> Result<()>;
    /// Register for lifecycle and geometry events.
    fn subscribe(&self, listener: Weak<dyn WindowListener>) -> ListenerId;
    /// Undo a [`Self::subscribe`].
    fn unsubscribe(&self, id: ListenerId);
    /// Publish a synthetic bounds-change notification.
    fn emit_bounds_change(&self, change: &BoundsChange);
}

/// Animation subsystem query.
pub trait AnimationState: Send + Sync {
    /// True while `window` is mid-animation.
    fn is_animating(&self, window: WindowId) -> bool;
}

/// One member of a window group.
#[derive(Clone)]
pub struct GroupMember {
    /// Member identity.
    pub identity: WindowIdentity,
    /// Member native window.
    pub window: Arc<dyn NativeWindow>,
}

/// Group membership and window lookup by identity.
pub trait GroupRegistry: Send + Sync {
    /// Group `window` belongs to, if any.
    fn group_of(&self, window: &WindowIdentity) -> Option<GroupId>;
    /// Members of `group`, in group order. Unknown groups are empty.
    fn members(&self, group: &GroupId) -> Vec<GroupMember>;
    /// Native window registered under `identity`.
    fn window(&self, identity: &WindowIdentity) -> Option<Arc<dyn NativeWindow>>;
}

/// Applies position updates that a batched transaction reported asynchronously.
pub trait DeferredMoveRelay: Send + Sync {
    /// Record that `window` was moved to `pos`.
    fn handle_move(&self, window: WindowId, pos: WindowPos);
}
