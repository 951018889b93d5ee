//! Tab coordination: keeps the visible tabs in step with the running
//! processes and applies the panel's close policy.
//!
//! All methods run on the thread that owns the coordinator (the UI thread).
//! Launcher threads only talk to it through the event channel, which is
//! drained by [`TabCoordinator::pump_events`].

mod confirm;
mod options;

pub use confirm::{AlwaysConfirm, Confirm, ConfirmRequest};
pub use options::CoordinatorOptions;

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::domain::{OutputLog, ProcessDefinition, ProcessEvent, ProcessId};
use crate::error::ProcRunError;
use crate::process::{ProcessHandle, ProcessLauncher, ProcessRegistry, Tab};
use crate::store::NodePath;

/// Called once when a process launched with a hook finishes
pub type FinishHook = Box<dyn FnMut(&ProcessHandle)>;

/// Mirror of the current tab's output, written only by the coordinator
#[derive(Debug, Clone, Default)]
pub struct DisplaySurface {
    bound: Option<ProcessId>,
    seen: u64,
    log: OutputLog,
}

impl DisplaySurface {
    /// Id of the handle currently mirrored
    pub fn bound(&self) -> Option<ProcessId> {
        self.bound
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn html(&self) -> String {
        self.log.to_html()
    }
}

pub struct TabCoordinator {
    registry: ProcessRegistry,
    launcher: Box<dyn ProcessLauncher>,
    confirmer: Box<dyn Confirm>,
    options: CoordinatorOptions,
    events_tx: Sender<ProcessEvent>,
    events_rx: Receiver<ProcessEvent>,
    current: Option<usize>,
    display: DisplaySurface,
    hooks: HashMap<ProcessId, FinishHook>,
    /// Saved entry the form was loaded from (`None` = new unsaved run)
    edited_entry: Option<NodePath>,
    close_panel_requested: bool,
}

impl TabCoordinator {
    pub fn new(
        launcher: Box<dyn ProcessLauncher>,
        confirmer: Box<dyn Confirm>,
        options: CoordinatorOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            registry: ProcessRegistry::new(),
            launcher,
            confirmer,
            options,
            events_tx,
            events_rx,
            current: None,
            display: DisplaySurface::default(),
            hooks: HashMap::new(),
            edited_entry: None,
            close_panel_requested: false,
        }
    }

    /// Start a process and open a tab for it.
    pub fn launch(&mut self, definition: ProcessDefinition) -> Result<ProcessId, ProcRunError> {
        self.launch_with_hook(definition, None)
    }

    /// Like [`launch`](Self::launch), calling `hook` once the process finishes.
    pub fn launch_with_hook(
        &mut self,
        definition: ProcessDefinition,
        hook: Option<FinishHook>,
    ) -> Result<ProcessId, ProcRunError> {
        let id = self.registry.allocate_id();
        let command_line = definition.command_line();

        let mut handle = ProcessHandle::new(id, definition);
        if let Some(limit) = self.options.output_limit {
            handle = handle.with_output_limit(limit);
        }
        let mut handle = handle.start(self.launcher.as_ref(), self.events_tx.clone())?;

        let label = handle.definition().display_name();
        let input = handle.definition().stdin_lines.clone();
        if let Err(e) = handle.feed_input(&input) {
            warn!("Could not feed input to process #{}: {}", id, e);
        }

        let id = self.registry.register(handle, label)?;
        info!("Launched process #{}: {}", id, command_line);

        if let Some(hook) = hook {
            self.hooks.insert(id, hook);
        }
        self.current = self.registry.index_of(id);
        self.refresh_display();
        Ok(id)
    }

    /// Close the tab at `index`.
    ///
    /// A running process is killed after confirmation and its tab goes away
    /// when the finish event arrives. A process already being stopped is
    /// killed without asking again. Returns `false` when the user declined
    /// or the index is out of range.
    pub fn request_close(&mut self, index: usize) -> bool {
        let Some(handle) = self.registry.at(index) else {
            return false;
        };
        let id = handle.id();

        if !handle.is_running() {
            self.remove(id);
            return true;
        }

        if handle.close_on_exit() {
            // Stop already in flight: force it, no second prompt
            if let Some(handle) = self.registry.at_mut(index) {
                handle.kill();
            }
            debug!("Process #{} already closing", id);
            return true;
        }

        let label = self
            .registry
            .tab(index)
            .map(|t| t.label.clone())
            .unwrap_or_default();
        if !self
            .confirmer
            .confirm(&ConfirmRequest::KillRunning { label: &label })
        {
            info!("Close of process #{} declined", id);
            return false;
        }

        if let Some(handle) = self.registry.at_mut(index) {
            handle.kill();
        }
        debug!("Process #{} killed, tab closes on finish", id);
        true
    }

    /// Ask the process at `index` to stop gracefully.
    pub fn terminate_at(&mut self, index: usize) -> bool {
        match self.registry.at_mut(index) {
            Some(handle) => handle.terminate(),
            None => false,
        }
    }

    /// Force-kill the process at `index` after confirmation.
    pub fn kill_at(&mut self, index: usize) -> bool {
        let Some(handle) = self.registry.at(index) else {
            return false;
        };
        if !handle.is_running() {
            return false;
        }
        // A stop already in flight was agreed to; escalate without asking
        let pending = handle.close_on_exit();
        let label = handle.definition().display_name();
        if !pending
            && !self
                .confirmer
                .confirm(&ConfirmRequest::KillRunning { label: &label })
        {
            return false;
        }
        self.registry
            .at_mut(index)
            .map(|handle| handle.kill())
            .unwrap_or(false)
    }

    /// Apply every queued process event. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(ProcessEvent { id, kind }) = self.events_rx.try_recv() {
            count += 1;
            let Some(handle) = self.registry.lookup_mut(id) else {
                debug!("Dropping event for closed process #{}", id);
                continue;
            };
            if handle.apply(kind) {
                self.on_finished(id);
            }
        }
        if count > 0 {
            self.refresh_display();
        }
        count
    }

    /// A process reached a terminal state: run its hook and apply the close policy.
    pub fn on_finished(&mut self, id: ProcessId) {
        let Some(index) = self.registry.index_of(id) else {
            return;
        };

        if let Some(mut hook) = self.hooks.remove(&id) {
            if let Some(handle) = self.registry.lookup(id) {
                hook(handle);
            }
        }
        if let Some(tab) = self.registry.tab_mut(index) {
            tab.running = false;
        }

        let Some(handle) = self.registry.lookup(id) else {
            return;
        };
        info!(
            "Process #{} {} (exit code {:?})",
            id,
            handle.state(),
            handle.exit_code()
        );

        if self.options.auto_close_finished || handle.close_on_exit() {
            self.remove(id);
            if self.registry.is_empty() && self.options.close_on_last {
                info!("Last tab closed, requesting panel close");
                self.close_panel_requested = true;
            }
        }
    }

    /// Try to close every tab before the window goes away.
    ///
    /// Tabs are visited last to first. The first veto stops the sequence and
    /// returns `false`; tabs closed before it stay closed.
    pub fn on_window_close(&mut self) -> bool {
        for index in (0..self.registry.len()).rev() {
            if !self.request_close(index) {
                warn!("Window close vetoed at tab {}", index);
                return false;
            }
        }

        if !self.registry.is_empty() {
            // Give killed processes a moment to report back
            std::thread::sleep(self.options.close_grace);
            self.pump_events();
        }

        for mut handle in self.registry.drain() {
            debug!("Force closing process #{}", handle.id());
            handle.shutdown();
        }
        self.hooks.clear();
        // close_on_last does not apply to window teardown
        self.close_panel_requested = false;
        self.current = None;
        self.refresh_display();
        true
    }

    /// Periodic cosmetic refresh of running indicators and the display mirror.
    pub fn tick(&mut self) {
        self.registry.refresh_indicators();
        self.refresh_display();
    }

    fn remove(&mut self, id: ProcessId) -> bool {
        let Some(index) = self.registry.index_of(id) else {
            return false;
        };
        let Some(mut handle) = self.registry.unregister(id) else {
            return false;
        };
        handle.shutdown();
        self.hooks.remove(&id);
        debug!("Removed tab for process #{}", id);

        let len = self.registry.len();
        self.current = match self.current {
            _ if len == 0 => None,
            Some(cur) if cur > index => Some(cur - 1),
            Some(cur) if cur == index => Some(index.min(len - 1)),
            other => other,
        };
        self.refresh_display();
        true
    }

    fn refresh_display(&mut self) {
        let Some(handle) = self.current.and_then(|i| self.registry.at(i)) else {
            if self.display.bound.is_some() {
                self.display = DisplaySurface::default();
            }
            return;
        };

        let output = handle.output();
        if self.display.bound != Some(handle.id()) {
            self.display = DisplaySurface {
                bound: Some(handle.id()),
                seen: output.next_seq(),
                log: output.clone(),
            };
            return;
        }

        if self.display.seen != output.next_seq() {
            for segment in output.since(self.display.seen) {
                self.display
                    .log
                    .push(segment.channel, segment.text.clone());
            }
            self.display.seen = output.next_seq();
        }
    }

    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.registry.len() {
            return false;
        }
        self.current = Some(index);
        self.refresh_display();
        true
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_handle(&self) -> Option<&ProcessHandle> {
        self.current.and_then(|i| self.registry.at(i))
    }

    pub fn display(&self) -> &DisplaySurface {
        &self.display
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    pub fn handle(&self, id: ProcessId) -> Option<&ProcessHandle> {
        self.registry.lookup(id)
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.registry.tabs()
    }

    pub fn tab_count(&self) -> usize {
        self.registry.len()
    }

    /// Sender for process events; launchers get clones of it.
    pub fn event_sender(&self) -> Sender<ProcessEvent> {
        self.events_tx.clone()
    }

    pub fn close_panel_requested(&self) -> bool {
        self.close_panel_requested
    }

    /// Returns `true` once after the last tab closed under `close_on_last`.
    pub fn take_close_panel_request(&mut self) -> bool {
        std::mem::take(&mut self.close_panel_requested)
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    pub fn set_auto_close_finished(&mut self, enabled: bool) {
        self.options.auto_close_finished = enabled;
    }

    pub fn set_close_on_last(&mut self, enabled: bool) {
        self.options.close_on_last = enabled;
    }

    pub fn set_confirmer(&mut self, confirmer: Box<dyn Confirm>) {
        self.confirmer = confirmer;
    }

    /// Ask the panel's confirmer directly (catalogue edits use this too).
    pub fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        self.confirmer.confirm(request)
    }

    pub fn edited_entry(&self) -> Option<&NodePath> {
        self.edited_entry.as_ref()
    }

    pub fn set_edited_entry(&mut self, entry: Option<NodePath>) {
        self.edited_entry = entry;
    }
}
