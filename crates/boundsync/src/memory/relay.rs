use boundsync_ids::WindowId;
use parking_lot::Mutex;

use crate::{native::DeferredMoveRelay, reposition::WindowPos};

/// Deferred-move relay that records every move it receives.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    /// Received moves in arrival order.
    moves: Mutex<Vec<(WindowId, WindowPos)>>,
}

impl RecordingRelay {
    /// An empty relay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves received so far.
    #[must_use]
    pub fn moves(&self) -> Vec<(WindowId, WindowPos)> {
        self.moves.lock().clone()
    }
}

impl DeferredMoveRelay for RecordingRelay {
    fn handle_move(&self, window: WindowId, pos: WindowPos) {
        self.moves.lock().push((window, pos));
    }
}
