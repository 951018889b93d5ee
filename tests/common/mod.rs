//! Shared test utilities: a scripted launcher and confirmer

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use procrun::coordinator::{Confirm, ConfirmRequest, CoordinatorOptions, TabCoordinator};
use procrun::process::{ProcessControl, ProcessLauncher};
use procrun::{ProcRunError, ProcessDefinition, ProcessEvent, ProcessId, SpawnError};

/// Program name the fake launcher refuses to start
pub const MISSING_PROGRAM: &str = "does-not-exist";

/// Everything the fake launcher and its controls were asked to do
#[derive(Debug, Default)]
pub struct Calls {
    pub spawned: Vec<(ProcessId, ProcessDefinition)>,
    pub inputs: Vec<(ProcessId, Vec<String>)>,
    pub terminated: Vec<ProcessId>,
    pub killed: Vec<ProcessId>,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Calls>>);

impl Recorder {
    pub fn with<R>(&self, f: impl FnOnce(&Calls) -> R) -> R {
        f(&self.0.lock().unwrap())
    }

    pub fn killed(&self) -> Vec<ProcessId> {
        self.with(|c| c.killed.clone())
    }

    pub fn spawn_count(&self) -> usize {
        self.with(|c| c.spawned.len())
    }
}

/// Launcher that never starts anything; tests drive events by hand
pub struct FakeLauncher {
    recorder: Recorder,
}

impl ProcessLauncher for FakeLauncher {
    fn spawn(
        &self,
        id: ProcessId,
        definition: &ProcessDefinition,
        _events: Sender<ProcessEvent>,
    ) -> Result<Box<dyn ProcessControl>, SpawnError> {
        if definition.program == MISSING_PROGRAM {
            return Err(SpawnError::NotFound {
                program: definition.program.clone(),
            });
        }
        self.recorder
            .0
            .lock()
            .unwrap()
            .spawned
            .push((id, definition.clone()));
        Ok(Box::new(FakeControl {
            id,
            recorder: self.recorder.clone(),
            input_closed: false,
        }))
    }
}

struct FakeControl {
    id: ProcessId,
    recorder: Recorder,
    input_closed: bool,
}

impl ProcessControl for FakeControl {
    fn pid(&self) -> Option<u32> {
        Some(1000 + self.id as u32)
    }

    fn write_input(&mut self, lines: &[String]) -> Result<(), ProcRunError> {
        if self.input_closed {
            return Err(ProcRunError::InputClosed(self.id));
        }
        self.input_closed = true;
        self.recorder
            .0
            .lock()
            .unwrap()
            .inputs
            .push((self.id, lines.to_vec()));
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), ProcRunError> {
        self.recorder.0.lock().unwrap().terminated.push(self.id);
        Ok(())
    }

    fn kill(&mut self) -> Result<(), ProcRunError> {
        self.recorder.0.lock().unwrap().killed.push(self.id);
        Ok(())
    }
}

/// Answers confirmations from a script, then with `fallback`
#[derive(Clone)]
pub struct ScriptedConfirm {
    answers: Arc<Mutex<VecDeque<bool>>>,
    asked: Arc<Mutex<Vec<String>>>,
    fallback: bool,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            asked: Arc::new(Mutex::new(Vec::new())),
            fallback,
        }
    }

    pub fn always(answer: bool) -> Self {
        Self::new([], answer)
    }

    /// Messages of every prompt shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        self.asked.lock().unwrap().push(request.message());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

pub fn test_options() -> CoordinatorOptions {
    CoordinatorOptions {
        close_grace: Duration::ZERO,
        ..CoordinatorOptions::default()
    }
}

/// Coordinator over a fake launcher, plus the handles to inspect it
pub fn coordinator_with(
    options: CoordinatorOptions,
    confirm: ScriptedConfirm,
) -> (TabCoordinator, Recorder) {
    let recorder = Recorder::default();
    let launcher = FakeLauncher {
        recorder: recorder.clone(),
    };
    let coordinator = TabCoordinator::new(Box::new(launcher), Box::new(confirm), options);
    (coordinator, recorder)
}

pub fn coordinator() -> (TabCoordinator, Recorder) {
    coordinator_with(test_options(), ScriptedConfirm::always(true))
}

pub fn send(coordinator: &mut TabCoordinator, event: ProcessEvent) -> usize {
    coordinator.event_sender().send(event).unwrap();
    coordinator.pump_events()
}

pub fn assert_tabs_match(coordinator: &TabCoordinator) {
    assert_eq!(coordinator.registry().len(), coordinator.tabs().count());
    assert_eq!(coordinator.registry().len(), coordinator.tab_count());
}
