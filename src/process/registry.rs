//! Ordered registry of live process handles and their tabs

use std::sync::atomic::{AtomicU64, Ordering};

use super::handle::ProcessHandle;
use crate::domain::ProcessId;
use crate::error::ProcRunError;

/// Display surface bound to one handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Id of the handle this tab shows
    pub id: ProcessId,
    pub label: String,
    /// Cosmetic "still running" indicator, refreshed on tick
    pub running: bool,
}

struct Entry {
    handle: ProcessHandle,
    tab: Tab,
}

/// Owns the handles in tab order.
///
/// Each entry pairs a handle with its tab, so there is never a tab without
/// a handle or a handle without a tab.
pub struct ProcessRegistry {
    entries: Vec<Entry>,
    next_id: AtomicU64,
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate the next process id. Ids are never reused.
    pub fn allocate_id(&self) -> ProcessId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Append a handle (and a tab labelled `label`) at the end.
    pub fn register(
        &mut self,
        handle: ProcessHandle,
        label: impl Into<String>,
    ) -> Result<ProcessId, ProcRunError> {
        let id = handle.id();
        if self.index_of(id).is_some() {
            return Err(ProcRunError::DuplicateId(id));
        }
        let tab = Tab {
            id,
            label: label.into(),
            running: handle.is_running(),
        };
        self.entries.push(Entry { handle, tab });
        Ok(id)
    }

    /// Remove a handle and hand it back to the caller for destruction.
    pub fn unregister(&mut self, id: ProcessId) -> Option<ProcessHandle> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index).handle)
    }

    pub fn lookup(&self, id: ProcessId) -> Option<&ProcessHandle> {
        self.entries
            .iter()
            .find(|e| e.tab.id == id)
            .map(|e| &e.handle)
    }

    pub fn lookup_mut(&mut self, id: ProcessId) -> Option<&mut ProcessHandle> {
        self.entries
            .iter_mut()
            .find(|e| e.tab.id == id)
            .map(|e| &mut e.handle)
    }

    pub fn index_of(&self, id: ProcessId) -> Option<usize> {
        self.entries.iter().position(|e| e.tab.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&ProcessHandle> {
        self.entries.get(index).map(|e| &e.handle)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut ProcessHandle> {
        self.entries.get_mut(index).map(|e| &mut e.handle)
    }

    pub fn tab(&self, index: usize) -> Option<&Tab> {
        self.entries.get(index).map(|e| &e.tab)
    }

    pub fn tab_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.entries.get_mut(index).map(|e| &mut e.tab)
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.entries.iter().map(|e| &e.tab)
    }

    pub fn handles(&self) -> impl Iterator<Item = &ProcessHandle> {
        self.entries.iter().map(|e| &e.handle)
    }

    /// Refresh every tab's running indicator from its handle.
    pub fn refresh_indicators(&mut self) {
        for entry in &mut self.entries {
            entry.tab.running = entry.handle.is_running();
        }
    }

    /// Remove all handles, in tab order.
    pub fn drain(&mut self) -> Vec<ProcessHandle> {
        self.entries.drain(..).map(|e| e.handle).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.entries.iter().filter(|e| e.handle.is_running()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProcessDefinition;

    fn handle(registry: &ProcessRegistry, program: &str) -> ProcessHandle {
        ProcessHandle::new(registry.allocate_id(), ProcessDefinition::new(program))
    }

    #[test]
    fn test_ids_are_monotonic() {
        let registry = ProcessRegistry::new();
        assert_eq!(registry.allocate_id(), 1);
        assert_eq!(registry.allocate_id(), 2);
        assert_eq!(registry.allocate_id(), 3);
    }

    #[test]
    fn test_register_lookup_unregister() {
        let mut registry = ProcessRegistry::new();
        let a = registry.register(handle(&registry, "a"), "a").unwrap();
        let b = registry.register(handle(&registry, "b"), "b").unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.index_of(b), Some(1));
        assert_eq!(registry.at(0).map(|h| h.id()), Some(a));
        assert_eq!(registry.tab(1).map(|t| t.label.as_str()), Some("b"));

        let removed = registry.unregister(a).unwrap();
        assert_eq!(removed.id(), a);
        assert_eq!(registry.index_of(b), Some(0));
        assert!(registry.lookup(a).is_none());
        assert!(registry.unregister(a).is_none());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut registry = ProcessRegistry::new();
        registry
            .register(ProcessHandle::new(7, ProcessDefinition::new("x")), "x")
            .unwrap();
        let err = registry
            .register(ProcessHandle::new(7, ProcessDefinition::new("y")), "y")
            .unwrap_err();
        assert!(matches!(err, ProcRunError::DuplicateId(7)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut registry = ProcessRegistry::new();
        let a = registry.register(handle(&registry, "a"), "a").unwrap();
        registry.unregister(a);
        let b = registry.register(handle(&registry, "b"), "b").unwrap();
        assert_ne!(a, b);
    }
}
