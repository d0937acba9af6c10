use std::collections::HashSet;

use boundsync_ids::WindowId;
use parking_lot::Mutex;

use crate::native::AnimationState;

/// Set of windows currently animating.
#[derive(Debug, Default)]
pub struct AnimationSet {
    /// Animating windows.
    active: Mutex<HashSet<WindowId>>,
}

impl AnimationSet {
    /// No window animating.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `window` as animating.
    pub fn start(&self, window: WindowId) {
        self.active.lock().insert(window);
    }

    /// Mark `window`'s animation as finished.
    pub fn finish(&self, window: WindowId) {
        self.active.lock().remove(&window);
    }
}

impl AnimationState for AnimationSet {
    fn is_animating(&self, window: WindowId) -> bool {
        self.active.lock().contains(&window)
    }
}
