use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use boundsync_ids::NativeHandle;
use parking_lot::Mutex;
use tracing::trace;

use crate::{
    bounds::Rect,
    error::{Error, Result},
    native::NativeWindow,
    reposition::{
        CompletedPos, DeferredCallback, PositionTransaction, TransactionFactory, WindowPos,
    },
};

/// Shared state behind [`MemoryTransactions`].
#[derive(Default)]
struct Shared {
    /// Windows addressable by handle.
    windows: Mutex<HashMap<NativeHandle, Arc<dyn NativeWindow>>>,
    /// Committed transactions whose confirmations have not been delivered.
    pending: Mutex<Vec<(DeferredCallback, Vec<CompletedPos>)>>,
    /// Number of successful commits.
    commits: AtomicUsize,
}

/// Position transactions over registered in-memory windows.
///
/// A commit applies every queued position at once, then holds the
/// confirmation until [`Self::flush`], mimicking the asynchronous
/// completion of a platform transaction.
#[derive(Clone, Default)]
pub struct MemoryTransactions {
    /// Shared state.
    shared: Arc<Shared>,
}

impl MemoryTransactions {
    /// A factory with no windows registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `window` addressable by its native handle.
    pub fn register(&self, window: Arc<dyn NativeWindow>) {
        self.shared
            .windows
            .lock()
            .insert(window.native_handle(), window);
    }

    /// Forget the window registered under `handle`.
    pub fn unregister(&self, handle: NativeHandle) {
        self.shared.windows.lock().remove(&handle);
    }

    /// Number of windows addressable by handle.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.shared.windows.lock().len()
    }

    /// Deliver every held confirmation. Returns the number delivered.
    pub fn flush(&self) -> usize {
        let pending = std::mem::take(&mut *self.shared.pending.lock());
        let delivered = pending.len();
        for (callback, completed) in pending {
            callback(completed.as_slice());
        }
        delivered
    }

    /// Number of successful commits.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }

    /// Number of confirmations awaiting [`Self::flush`].
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().len()
    }
}

impl TransactionFactory for MemoryTransactions {
    fn begin(&self) -> Box<dyn PositionTransaction> {
        Box::new(MemoryTransaction {
            shared: self.shared.clone(),
            queued: Vec::new(),
        })
    }
}

/// One open in-memory transaction.
struct MemoryTransaction {
    /// Shared factory state.
    shared: Arc<Shared>,
    /// Queued positions in call order.
    queued: Vec<(NativeHandle, WindowPos)>,
}

impl PositionTransaction for MemoryTransaction {
    fn set_window_pos(&mut self, handle: NativeHandle, pos: WindowPos) {
        self.queued.push((handle, pos));
    }

    fn commit(self: Box<Self>, on_deferred: DeferredCallback) -> Result<()> {
        let targets: Vec<(Arc<dyn NativeWindow>, NativeHandle, WindowPos)> = {
            let windows = self.shared.windows.lock();
            self.queued
                .iter()
                .map(|(handle, pos)| {
                    windows
                        .get(handle)
                        .map(|w| (w.clone(), *handle, *pos))
                        .ok_or(Error::UnknownHandle(*handle))
                })
                .collect::<Result<_>>()?
        };

        let mut completed = Vec::with_capacity(targets.len());
        for (window, handle, pos) in targets {
            // Queued positions carry no size; the window keeps its own.
            let current = window.bounds();
            window
                .set_bounds(Rect::new(pos.x, pos.y, current.width, current.height))
                .map_err(|err| Error::Transaction(err.to_string()))?;
            trace!(handle = %handle, pos = %pos, "transaction applied position");
            completed.push(CompletedPos { handle, pos });
        }

        self.shared.commits.fetch_add(1, Ordering::SeqCst);
        self.shared.pending.lock().push((on_deferred, completed));
        Ok(())
    }
}
