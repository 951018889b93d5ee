//! End-to-end runs of real programs through the tokio launcher

#![cfg(unix)]

use std::sync::mpsc;
use std::time::{Duration, Instant};

use procrun::coordinator::{AlwaysConfirm, CoordinatorOptions, TabCoordinator};
use procrun::process::{ProcessLauncher, TokioLauncher};
use procrun::{
    ProcRunError, ProcessDefinition, ProcessEventKind, ProcessId, ProcessState, SpawnError,
};

const DEADLINE: Duration = Duration::from_secs(10);

fn coordinator(auto_close_finished: bool) -> TabCoordinator {
    let launcher = TokioLauncher::new(Duration::from_secs(5)).unwrap();
    let options = CoordinatorOptions {
        auto_close_finished,
        close_grace: Duration::ZERO,
        ..CoordinatorOptions::default()
    };
    TabCoordinator::new(Box::new(launcher), Box::new(AlwaysConfirm), options)
}

/// Pump events until `done` holds or the deadline passes.
fn pump_until(coord: &mut TabCoordinator, mut done: impl FnMut(&TabCoordinator) -> bool) {
    let start = Instant::now();
    while !done(coord) {
        assert!(start.elapsed() < DEADLINE, "timed out waiting for process");
        coord.pump_events();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn finished(coord: &TabCoordinator, id: ProcessId) -> bool {
    coord
        .handle(id)
        .is_none_or(|handle| handle.state().is_terminal())
}

#[test]
fn test_echo_runs_to_completion() {
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("echo").with_args(["hello"]))
        .unwrap();
    pump_until(&mut coord, |c| finished(c, id));

    let handle = coord.handle(id).unwrap();
    assert_eq!(
        handle.state_history(),
        &[
            ProcessState::NotStarted,
            ProcessState::Starting,
            ProcessState::Running,
            ProcessState::Finished,
        ]
    );
    assert_eq!(handle.exit_code(), Some(0));
    assert!(handle.output().to_html().contains("hello<br>"));
    assert!(coord.display().html().contains("hello<br>"));
    assert_eq!(coord.tab_count(), 1);
    assert!(!coord.tabs().next().unwrap().running);
}

#[test]
fn test_echo_is_auto_closed() {
    let mut coord = coordinator(true);
    let id = coord
        .launch(ProcessDefinition::new("echo").with_args(["bye"]))
        .unwrap();
    pump_until(&mut coord, |c| c.handle(id).is_none());
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_cat_echoes_stdin_lines() {
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("cat").with_stdin_lines(["first", "second"]))
        .unwrap();
    pump_until(&mut coord, |c| finished(c, id));

    let handle = coord.handle(id).unwrap();
    assert_eq!(handle.state(), ProcessState::Finished);
    assert!(handle.output().to_plain().starts_with("first\nsecond\n"));
}

#[test]
fn test_working_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let expected = dir.path().canonicalize().unwrap();
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("pwd").with_working_directory(dir.path().to_string_lossy()))
        .unwrap();
    pump_until(&mut coord, |c| finished(c, id));

    let output = coord.handle(id).unwrap().output().to_plain();
    let first_line = output.lines().next().unwrap_or_default();
    assert_eq!(
        std::path::Path::new(first_line).canonicalize().unwrap(),
        expected
    );
}

#[test]
fn test_missing_program_opens_no_tab() {
    let mut coord = coordinator(false);
    let err = coord
        .launch(ProcessDefinition::new("procrun-surely-missing-binary"))
        .unwrap_err();

    assert!(matches!(
        err,
        ProcRunError::Spawn(SpawnError::NotFound { .. })
    ));
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_missing_working_directory_is_rejected() {
    let mut coord = coordinator(false);
    let err = coord
        .launch(ProcessDefinition::new("true").with_working_directory("/procrun/no/such/dir"))
        .unwrap_err();
    assert!(matches!(
        err,
        ProcRunError::Spawn(SpawnError::MissingWorkingDirectory { .. })
    ));
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_nonzero_exit_code_is_recorded() {
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("sh").with_args(["-c", "echo oops >&2; exit 3"]))
        .unwrap();
    pump_until(&mut coord, |c| finished(c, id));

    let handle = coord.handle(id).unwrap();
    assert_eq!(handle.state(), ProcessState::Finished);
    assert_eq!(handle.exit_code(), Some(3));
    assert!(handle.output().to_html().contains("<span style=\"color:red\">oops<br></span>"));
}

#[test]
fn test_closing_long_runner_kills_it() {
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("sleep").with_args(["30"]))
        .unwrap();
    assert!(coord.handle(id).unwrap().is_running());

    let start = Instant::now();
    assert!(coord.request_close(0));
    pump_until(&mut coord, |c| c.handle(id).is_none());

    assert_eq!(coord.tab_count(), 0);
    assert!(start.elapsed() < DEADLINE);
}

#[test]
fn test_terminate_stops_long_runner() {
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("sleep").with_args(["30"]))
        .unwrap();

    assert!(coord.terminate_at(0));
    pump_until(&mut coord, |c| c.handle(id).is_none());
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_partial_line_is_shown_while_running() {
    let mut coord = coordinator(false);
    let id = coord
        .launch(ProcessDefinition::new("sh").with_args([
            "-c",
            "printf 'Progress 50%%'; sleep 3; echo done",
        ]))
        .unwrap();

    pump_until(&mut coord, |c| {
        c.handle(id)
            .is_some_and(|h| h.output().to_plain().contains("Progress 50%"))
    });
    let handle = coord.handle(id).unwrap();
    assert!(handle.is_running());
    assert_eq!(handle.output().to_plain(), "Progress 50%");

    assert!(coord.request_close(0));
    pump_until(&mut coord, |c| c.handle(id).is_none());
}

#[test]
fn test_multibyte_output_split_across_writes() {
    let mut coord = coordinator(false);
    // "é" written one byte at a time
    let id = coord
        .launch(ProcessDefinition::new("sh").with_args([
            "-c",
            "printf 'caf\\303'; sleep 0.2; printf '\\251\\n'",
        ]))
        .unwrap();
    pump_until(&mut coord, |c| finished(c, id));

    let output = coord.handle(id).unwrap().output().to_plain();
    assert!(output.starts_with("café\n"), "unexpected output {:?}", output);
}

#[test]
fn test_terminate_after_exit_is_harmless() {
    let launcher = TokioLauncher::new(Duration::from_secs(5)).unwrap();
    let (tx, rx) = mpsc::channel();
    let mut control = launcher
        .spawn(1, &ProcessDefinition::new("true"), tx)
        .unwrap();

    let deadline = Instant::now() + DEADLINE;
    loop {
        let event = rx
            .recv_timeout(deadline.saturating_duration_since(Instant::now()))
            .unwrap();
        if matches!(event.kind, ProcessEventKind::Finished { .. }) {
            break;
        }
    }

    // The child is reaped; stop requests must not reach a recycled pid
    control.terminate().unwrap();
    control.kill().unwrap();
    std::thread::sleep(Duration::from_millis(100));
    assert!(rx.try_iter().all(|event| !matches!(event.kind, ProcessEventKind::Error { .. })));
}
