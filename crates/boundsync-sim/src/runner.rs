//! Scenario execution against in-memory windows.

use std::{collections::HashMap, sync::Arc};

use boundsync::{
    BoundsChange, GroupId, NativeWindow, Rect, RepositionMode, TrackerCfg, WindowEvent,
    WindowIdentity, WindowState,
    memory::{MemoryHost, MemoryWindow},
};
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    scenario::{Scenario, Step},
};

/// Drives one scenario.
struct Runner {
    /// Windows, trackers and collaborators.
    host: MemoryHost,
    /// Declared names to identities.
    names: HashMap<String, WindowIdentity>,
}

impl Runner {
    /// Identity for a declared window name.
    fn identity(&self, name: &str) -> Result<&WindowIdentity> {
        self.names
            .get(name)
            .ok_or_else(|| Error::UnknownWindow(name.to_string()))
    }

    /// Native stand-in for a declared window name.
    fn window(&self, name: &str) -> Result<Arc<MemoryWindow>> {
        let identity = self.identity(name)?;
        self.host
            .window(identity)
            .cloned()
            .ok_or_else(|| Error::UnknownWindow(name.to_string()))
    }

    /// Deliver `event` to `name`.
    fn dispatch(&self, name: &str, event: &WindowEvent) -> Result<()> {
        let identity = self.identity(name)?;
        if self.host.dispatch(identity, event) {
            Ok(())
        } else {
            Err(Error::UnknownWindow(name.to_string()))
        }
    }

    /// Execute one step.
    fn step(&self, step: &Step) -> Result<()> {
        match step {
            Step::Event { window, event } => self.dispatch(window, event)?,
            Step::Move { window, x, y } => {
                let win = self.window(window)?;
                let r = win.bounds();
                win.set_rect(Rect::new(*x, *y, r.width, r.height));
                self.dispatch(window, &WindowEvent::BoundsChanged)?;
            }
            Step::Resize {
                window,
                width,
                height,
            } => {
                let win = self.window(window)?;
                let r = win.bounds();
                win.set_rect(Rect::new(r.x, r.y, *width, *height));
                self.dispatch(window, &WindowEvent::BoundsChanged)?;
            }
            Step::SetBounds { window, bounds } => self.window(window)?.set_bounds(*bounds)?,
            Step::SetState { window, state } => {
                let win = self.window(window)?;
                win.set_maximized(*state == WindowState::Maximized);
                win.set_minimized(*state == WindowState::Minimized);
            }
            Step::Animate { window, running } => {
                let id = self.window(window)?.id();
                if *running {
                    self.host.animations().start(id);
                } else {
                    self.host.animations().finish(id);
                }
            }
            Step::Join { window, group } => {
                self.host.join(&GroupId::new(group.as_str()), self.identity(window)?);
            }
            Step::Leave { window } => self.host.leave(self.identity(window)?),
            Step::Flush => {
                let delivered = self.host.transactions().flush();
                debug!(delivered, "flushed position transactions");
            }
            Step::Teardown { window } => {
                let identity = self.identity(window)?;
                if let Some(tracker) = self.host.tracker(identity) {
                    tracker.teardown();
                }
            }
        }
        Ok(())
    }
}

/// Run `scenario` and return every notification in emission order.
///
/// `mode` overrides the scenario's repositioning mode.
pub fn run(scenario: &Scenario, mode: Option<RepositionMode>) -> Result<Vec<BoundsChange>> {
    let cfg = TrackerCfg {
        reposition: mode.unwrap_or(scenario.reposition),
    };
    info!(
        mode = %cfg.reposition,
        windows = scenario.windows.len(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let mut runner = Runner {
        host: MemoryHost::new(cfg),
        names: HashMap::new(),
    };
    for spec in &scenario.windows {
        if runner.names.contains_key(&spec.name) {
            return Err(Error::DuplicateWindow(spec.name.clone()));
        }
        let identity = WindowIdentity::new(spec.uuid.as_str(), spec.name.as_str());
        runner
            .host
            .add_window(identity.clone(), spec.id, spec.handle, spec.bounds);
        if spec.notify_on_move
            && let Some(win) = runner.host.window(&identity)
        {
            win.set_notify_on_set_bounds(true);
        }
        if let Some(group) = &spec.group {
            runner.host.join(&GroupId::new(group.as_str()), &identity);
        }
        runner.names.insert(spec.name.clone(), identity);
    }

    let mut out = Vec::new();
    for (i, step) in scenario.steps.iter().enumerate() {
        runner.step(step)?;
        let emitted = runner.host.drain_notifications();
        debug!(step = i, notifications = emitted.len(), "step complete");
        out.extend(emitted);
    }
    Ok(out)
}
