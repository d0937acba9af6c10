//! Applying a leader's delta to the other members of its group.
//!
//! Two strategies exist. [`SequentialRepositioner`] moves each member with
//! its own `set_bounds` call. [`BatchedRepositioner`] queues every member in
//! one platform position transaction (Win32 `DeferWindowPos` style) and
//! commits it at once. The batched transaction confirms the applied
//! positions later through a callback, which is relayed to the
//! [`DeferredMoveRelay`] by window id.
use std::{collections::HashMap, fmt, ops::BitOr, sync::Arc};

use boundsync_ids::{NativeHandle, WindowId, WindowIdentity};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    bounds::Rect,
    error::{Error, Result},
    native::{DeferredMoveRelay, NativeWindow},
};

/// Flags for a queued window position, mirroring Win32 `SWP_*` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwpFlags(u32);

impl SwpFlags {
    /// Keep the current size.
    pub const NO_SIZE: Self = Self(0x0001);
    /// Keep the current z-order.
    pub const NO_ZORDER: Self = Self(0x0004);
    /// Do not activate the window.
    pub const NO_ACTIVATE: Self = Self(0x0010);
    /// Flags used for follower moves: reposition only.
    pub const GROUP_MOVE: Self = Self(Self::NO_SIZE.0 | Self::NO_ZORDER.0 | Self::NO_ACTIVATE.0);

    /// Raw bit value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SwpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Position queued for (or reported by) a position transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPos {
    /// Horizontal origin.
    pub x: i32,
    /// Vertical origin.
    pub y: i32,
    /// Side-effect suppression flags.
    #[serde(default)]
    pub flags: SwpFlags,
}

impl fmt::Display for WindowPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) flags={:#06x}", self.x, self.y, self.flags.bits())
    }
}

/// A position a committed transaction actually applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedPos {
    /// Platform handle of the moved window.
    pub handle: NativeHandle,
    /// Applied position.
    pub pos: WindowPos,
}

/// Receives the positions a committed transaction applied. May run long
/// after `commit` returned, and more than once.
pub type DeferredCallback = Box<dyn Fn(&[CompletedPos]) + Send + Sync>;

/// One open platform position transaction.
pub trait PositionTransaction: Send {
    /// Queue a position for `handle`.
    fn set_window_pos(&mut self, handle: NativeHandle, pos: WindowPos);
    /// Apply every queued position together.
    fn commit(self: Box<Self>, on_deferred: DeferredCallback) -> Result<()>;
}

/// Opens platform position transactions.
pub trait TransactionFactory: Send + Sync {
    /// Start an empty transaction.
    fn begin(&self) -> Box<dyn PositionTransaction>;
}

/// A follower's new rectangle.
#[derive(Clone)]
pub struct MemberMove {
    /// Follower identity.
    pub identity: WindowIdentity,
    /// Follower window.
    pub window: Arc<dyn NativeWindow>,
    /// Target rectangle (previous origin plus the leader delta, same size).
    pub target: Rect,
}

/// Strategy for applying follower moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositionMode {
    /// One `set_bounds` per follower.
    Sequential,
    /// One atomic position transaction per group move.
    Batched,
}

impl RepositionMode {
    /// Batched on Windows targets, sequential elsewhere.
    #[must_use]
    pub const fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self::Batched
        } else {
            Self::Sequential
        }
    }
}

impl Default for RepositionMode {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Display for RepositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::Batched => "batched",
        })
    }
}

/// Applies follower moves.
pub trait Repositioner: Send + Sync {
    /// Which strategy this is.
    fn mode(&self) -> RepositionMode;
    /// Move every follower in `moves`. Failures are logged, never returned.
    fn apply(&self, moves: &[MemberMove]);
}

/// Moves followers one `set_bounds` call at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialRepositioner;

impl Repositioner for SequentialRepositioner {
    fn mode(&self) -> RepositionMode {
        RepositionMode::Sequential
    }

    fn apply(&self, moves: &[MemberMove]) {
        for m in moves {
            if let Err(err) = m.window.set_bounds(m.target) {
                warn!(window = %m.identity, target = %m.target, %err, "group follower move failed");
            }
        }
    }
}

/// Moves followers in one atomic platform transaction.
pub struct BatchedRepositioner {
    /// Source of position transactions.
    transactions: Arc<dyn TransactionFactory>,
    /// Destination for asynchronously confirmed positions.
    relay: Arc<dyn DeferredMoveRelay>,
}

impl BatchedRepositioner {
    /// Construct from a transaction factory and the relay that receives confirmations.
    pub fn new(
        transactions: Arc<dyn TransactionFactory>,
        relay: Arc<dyn DeferredMoveRelay>,
    ) -> Self {
        Self {
            transactions,
            relay,
        }
    }
}

impl Repositioner for BatchedRepositioner {
    fn mode(&self) -> RepositionMode {
        RepositionMode::Batched
    }

    fn apply(&self, moves: &[MemberMove]) {
        if moves.is_empty() {
            return;
        }
        let mut tx = self.transactions.begin();
        let mut handle_to_id: HashMap<NativeHandle, WindowId> = HashMap::new();
        for m in moves {
            let handle = m.window.native_handle();
            handle_to_id.insert(handle, m.window.id());
            tx.set_window_pos(
                handle,
                WindowPos {
                    x: m.target.x,
                    y: m.target.y,
                    flags: SwpFlags::GROUP_MOVE,
                },
            );
        }

        let relay = self.relay.clone();
        let on_deferred: DeferredCallback = Box::new(move |completed| {
            for c in completed {
                match handle_to_id.get(&c.handle) {
                    Some(id) => relay.handle_move(*id, c.pos),
                    None => warn!(err = %Error::UnknownHandle(c.handle), "dropping deferred move"),
                }
            }
        });

        debug!(members = moves.len(), "committing group position transaction");
        if let Err(err) = tx.commit(on_deferred) {
            warn!(%err, "group position transaction failed");
        }
    }
}
