//! boundsync: window bounds-change tracking and grouped window moves.
//!
//! A [`BoundsTracker`] attached to a native window reconciles bursts of raw
//! geometry events into a minimal stream of `bounds-changing` /
//! `bounds-changed` notifications, defers them while the window is not
//! interactive, and keeps grouped windows moving together.
//!
//! Host collaborators are injected as trait objects through
//! [`TrackerServices`]; [`memory`] provides in-process implementations.

pub mod bounds;
pub mod config;
pub mod deferred;
mod error;
pub mod listeners;
pub mod memory;
pub mod native;
pub mod payload;
pub mod reason;
pub mod reposition;
pub mod tracker;
pub mod transaction;

pub use boundsync_ids::{GroupId, NativeHandle, WindowId, WindowIdentity};
pub use bounds::{Bounds, BoundsComparator, BoundsComparison, PositionDelta, Rect, WindowState};
pub use config::TrackerCfg;
pub use deferred::DeferredQueue;
pub use error::{Error, Result};
pub use listeners::ListenerId;
pub use native::{
    AnimationState, DeferredMoveRelay, GroupMember, GroupRegistry, NativeWindow, WindowEvent,
    WindowListener,
};
pub use payload::{BoundsChange, BoundsEventType, ChangeType, Reason};
pub use reason::ReasonClassifier;
pub use reposition::{
    BatchedRepositioner, CompletedPos, DeferredCallback, MemberMove, PositionTransaction,
    RepositionMode, Repositioner, SequentialRepositioner, SwpFlags, TransactionFactory, WindowPos,
};
pub use tracker::{BoundsTracker, TrackerServices};
pub use transaction::{
    GroupLeader, GroupTransactions, LeaderCause, LeaderTracker, TransactionListener,
};
