use std::{collections::HashMap, sync::Arc};

use boundsync_ids::{GroupId, WindowIdentity};
use parking_lot::Mutex;
use tracing::debug;

use crate::native::{GroupMember, GroupRegistry, NativeWindow};

/// Registry contents.
#[derive(Default)]
struct Inner {
    /// Known windows.
    windows: HashMap<WindowIdentity, Arc<dyn NativeWindow>>,
    /// Members per group, in join order.
    groups: HashMap<GroupId, Vec<WindowIdentity>>,
}

impl Inner {
    /// Group containing `window`, if any.
    fn group_of(&self, window: &WindowIdentity) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(window))
            .map(|(group, _)| group.clone())
    }

    /// Remove `window` from its group; empty groups disappear.
    fn leave(&mut self, window: &WindowIdentity) -> Option<GroupId> {
        let group = self.group_of(window)?;
        if let Some(members) = self.groups.get_mut(&group) {
            members.retain(|m| m != window);
            if members.is_empty() {
                self.groups.remove(&group);
            }
        }
        Some(group)
    }
}

/// In-memory window and group registry.
///
/// A window belongs to at most one group; joining another group leaves the
/// previous one.
#[derive(Default)]
pub struct WindowGroups {
    /// Registry contents.
    inner: Mutex<Inner>,
}

impl WindowGroups {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `window` known under `identity`.
    pub fn register(&self, identity: WindowIdentity, window: Arc<dyn NativeWindow>) {
        self.inner.lock().windows.insert(identity, window);
    }

    /// Forget `identity`, removing it from its group.
    pub fn unregister(&self, identity: &WindowIdentity) {
        let mut inner = self.inner.lock();
        inner.leave(identity);
        inner.windows.remove(identity);
    }

    /// Put `window` into `group`, leaving any previous group.
    pub fn join(&self, group: &GroupId, window: &WindowIdentity) {
        let mut inner = self.inner.lock();
        if inner.group_of(window).as_ref() == Some(group) {
            return;
        }
        inner.leave(window);
        inner
            .groups
            .entry(group.clone())
            .or_default()
            .push(window.clone());
        debug!(group = %group, window = %window, "joined window group");
    }

    /// Take `window` out of its group.
    pub fn leave(&self, window: &WindowIdentity) {
        if let Some(group) = self.inner.lock().leave(window) {
            debug!(group = %group, window = %window, "left window group");
        }
    }
}

impl GroupRegistry for WindowGroups {
    fn group_of(&self, window: &WindowIdentity) -> Option<GroupId> {
        self.inner.lock().group_of(window)
    }

    fn members(&self, group: &GroupId) -> Vec<GroupMember> {
        let inner = self.inner.lock();
        inner
            .groups
            .get(group)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|identity| {
                        inner.windows.get(identity).map(|window| GroupMember {
                            identity: identity.clone(),
                            window: window.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn window(&self, identity: &WindowIdentity) -> Option<Arc<dyn NativeWindow>> {
        self.inner.lock().windows.get(identity).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bounds::Rect, memory::MemoryWindow};

    #[test]
    fn join_moves_between_groups() {
        let groups = WindowGroups::new();
        let a = WindowIdentity::new("app", "a");
        let b = WindowIdentity::new("app", "b");
        let rect = Rect::new(0, 0, 10, 10);
        groups.register(a.clone(), Arc::new(MemoryWindow::new(1, 1, rect)));
        groups.register(b.clone(), Arc::new(MemoryWindow::new(2, 2, rect)));

        let g1 = GroupId::new("g1");
        let g2 = GroupId::new("g2");
        groups.join(&g1, &a);
        groups.join(&g1, &b);
        let names: Vec<String> = groups
            .members(&g1)
            .iter()
            .map(|m| m.identity.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        groups.join(&g2, &a);
        assert_eq!(groups.group_of(&a), Some(g2.clone()));
        assert_eq!(groups.members(&g1).len(), 1);

        groups.leave(&b);
        assert!(groups.members(&g1).is_empty());
        assert_eq!(groups.group_of(&b), None);

        groups.unregister(&a);
        assert!(groups.window(&a).is_none());
        assert!(groups.members(&g2).is_empty());
    }
}
