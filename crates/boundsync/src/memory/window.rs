use std::sync::{
    Weak,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use boundsync_ids::{NativeHandle, WindowId};
use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::{
    bounds::Rect,
    error::{Error, Result},
    listeners::{ListenerId, Listeners},
    native::{NativeWindow, WindowEvent, WindowListener},
    payload::BoundsChange,
};

/// Geometry and display state of a [`MemoryWindow`].
#[derive(Clone, Copy, Debug, Default)]
struct Geometry {
    /// Window rectangle.
    rect: Rect,
    /// Maximized flag.
    maximized: bool,
    /// Minimized flag.
    minimized: bool,
}

/// A window that lives entirely in memory.
///
/// Geometry changes made through [`Self::set_rect`] never raise events;
/// hosts deliver events with [`Self::dispatch`]. `set_bounds` raises
/// [`WindowEvent::BoundsChanged`] only when enabled with
/// [`Self::set_notify_on_set_bounds`], as a platform window would for a
/// programmatic move.
pub struct MemoryWindow {
    /// Host id.
    id: WindowId,
    /// Platform handle.
    handle: NativeHandle,
    /// Current geometry.
    geometry: Mutex<Geometry>,
    /// Event subscribers.
    listeners: Listeners<dyn WindowListener>,
    /// Every notification emitted through this window.
    emitted: Mutex<Vec<BoundsChange>>,
    /// Optional shared channel that sees notifications from many windows in order.
    sink: Option<Sender<BoundsChange>>,
    /// Number of `bring_to_front` calls.
    raises: AtomicUsize,
    /// Number of `set_bounds` calls.
    set_bounds_calls: AtomicUsize,
    /// Make `set_bounds` fail.
    fail_set_bounds: AtomicBool,
    /// Dispatch `BoundsChanged` after a successful `set_bounds`.
    notify_on_set_bounds: AtomicBool,
}

impl MemoryWindow {
    /// A normal-state window at `rect`.
    #[must_use]
    pub fn new(id: u32, handle: isize, rect: Rect) -> Self {
        Self {
            id: WindowId::new(id),
            handle: NativeHandle::new(handle),
            geometry: Mutex::new(Geometry {
                rect,
                ..Geometry::default()
            }),
            listeners: Listeners::new(),
            emitted: Mutex::new(Vec::new()),
            sink: None,
            raises: AtomicUsize::new(0),
            set_bounds_calls: AtomicUsize::new(0),
            fail_set_bounds: AtomicBool::new(false),
            notify_on_set_bounds: AtomicBool::new(false),
        }
    }

    /// Also forward every emitted notification to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Sender<BoundsChange>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Change the rectangle without raising events.
    pub fn set_rect(&self, rect: Rect) {
        self.geometry.lock().rect = rect;
    }

    /// Change the maximized flag without raising events.
    pub fn set_maximized(&self, maximized: bool) {
        self.geometry.lock().maximized = maximized;
    }

    /// Change the minimized flag without raising events.
    pub fn set_minimized(&self, minimized: bool) {
        self.geometry.lock().minimized = minimized;
    }

    /// Deliver `event` to every subscriber.
    pub fn dispatch(&self, event: &WindowEvent) {
        for listener in self.listeners.snapshot() {
            listener.on_window_event(event);
        }
    }

    /// Notifications emitted so far.
    #[must_use]
    pub fn emitted(&self) -> Vec<BoundsChange> {
        self.emitted.lock().clone()
    }

    /// Drain the emitted notifications.
    pub fn take_emitted(&self) -> Vec<BoundsChange> {
        std::mem::take(&mut *self.emitted.lock())
    }

    /// Number of `bring_to_front` calls.
    #[must_use]
    pub fn raise_count(&self) -> usize {
        self.raises.load(Ordering::SeqCst)
    }

    /// Number of `set_bounds` calls.
    #[must_use]
    pub fn set_bounds_count(&self) -> usize {
        self.set_bounds_calls.load(Ordering::SeqCst)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Make subsequent `set_bounds` calls fail.
    pub fn set_fail_set_bounds(&self, fail: bool) {
        self.fail_set_bounds.store(fail, Ordering::SeqCst);
    }

    /// Dispatch `BoundsChanged` after each successful `set_bounds`.
    pub fn set_notify_on_set_bounds(&self, notify: bool) {
        self.notify_on_set_bounds.store(notify, Ordering::SeqCst);
    }
}

impl NativeWindow for MemoryWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    fn bounds(&self) -> Rect {
        self.geometry.lock().rect
    }

    fn is_maximized(&self) -> bool {
        self.geometry.lock().maximized
    }

    fn is_minimized(&self) -> bool {
        self.geometry.lock().minimized
    }

    fn set_bounds(&self, bounds: Rect) -> Result<()> {
        self.set_bounds_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_set_bounds.load(Ordering::SeqCst) {
            return Err(Error::native("set_bounds", format!("window {} refused", self.id)));
        }
        self.set_rect(bounds);
        if self.notify_on_set_bounds.load(Ordering::SeqCst) {
            self.dispatch(&WindowEvent::BoundsChanged);
        }
        Ok(())
    }

    fn bring_to_front(&self) -> Result<()> {
        self.raises.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self, listener: Weak<dyn WindowListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.unsubscribe(id);
    }

    fn emit_bounds_change(&self, change: &BoundsChange) {
        self.emitted.lock().push(change.clone());
        if let Some(sink) = &self.sink {
            // A dropped receiver only means nobody is watching.
            sink.send(change.clone()).ok();
        }
    }
}
