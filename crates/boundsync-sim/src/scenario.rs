//! Scenario file format.
//!
//! A scenario declares windows and then a list of steps that drive them:
//!
//! ```ron
//! Scenario(
//!     reposition: batched,
//!     windows: [
//!         (name: "a", id: 1, handle: 0x10, bounds: (x: 0, y: 0, width: 100, height: 100), group: "g"),
//!     ],
//!     steps: [
//!         Event(window: "a", event: BeginUserBoundsChange),
//!         Move(window: "a", x: 50, y: 0),
//!         Event(window: "a", event: EndUserBoundsChange),
//!     ],
//! )
//! ```

use boundsync::{Rect, RepositionMode, WindowEvent, WindowState};
use ron::{Options, extensions::Extensions};
use serde::Deserialize;

use crate::error::Result;

/// A complete scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// How followers are moved.
    #[serde(default)]
    pub reposition: RepositionMode,
    /// Windows to create before the first step.
    pub windows: Vec<WindowSpec>,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One declared window.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSpec {
    /// Owning application id; defaults to `"sim"`.
    #[serde(default = "default_uuid")]
    pub uuid: String,
    /// Window name, unique within the scenario.
    pub name: String,
    /// Host-assigned window id.
    pub id: u32,
    /// Platform handle.
    pub handle: isize,
    /// Initial rectangle.
    pub bounds: Rect,
    /// Group to join after creation.
    #[serde(default)]
    pub group: Option<String>,
    /// Raise `BoundsChanged` after programmatic moves.
    #[serde(default)]
    pub notify_on_move: bool,
}

/// Default application id for declared windows.
fn default_uuid() -> String {
    "sim".to_string()
}

/// One scenario step.
#[derive(Debug, Clone, Deserialize)]
pub enum Step {
    /// Deliver a native event.
    Event {
        /// Target window.
        window: String,
        /// Event to deliver.
        event: WindowEvent,
    },
    /// Set the position, then deliver `BoundsChanged`.
    Move {
        /// Target window.
        window: String,
        /// New x.
        x: i32,
        /// New y.
        y: i32,
    },
    /// Set the size, then deliver `BoundsChanged`.
    Resize {
        /// Target window.
        window: String,
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
    /// Programmatic move through the native `set_bounds`.
    SetBounds {
        /// Target window.
        window: String,
        /// New rectangle.
        bounds: Rect,
    },
    /// Change the display state without raising events.
    SetState {
        /// Target window.
        window: String,
        /// New state.
        state: WindowState,
    },
    /// Start or finish an animation.
    Animate {
        /// Target window.
        window: String,
        /// True to start, false to finish.
        running: bool,
    },
    /// Put a window into a group.
    Join {
        /// Target window.
        window: String,
        /// Group id.
        group: String,
    },
    /// Take a window out of its group.
    Leave {
        /// Target window.
        window: String,
    },
    /// Deliver held position-transaction confirmations.
    Flush,
    /// Detach a window's tracker.
    Teardown {
        /// Target window.
        window: String,
    },
}

impl Scenario {
    /// Parse a scenario from RON text.
    pub fn parse(text: &str) -> Result<Self> {
        let options = Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
        Ok(options.from_str(text)?)
    }
}
