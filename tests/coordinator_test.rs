//! Tab coordination against a scripted launcher

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use procrun::coordinator::CoordinatorOptions;
use procrun::process::ProcessHandle;
use procrun::{ProcRunError, ProcessDefinition, ProcessEvent, ProcessState, SpawnError};

fn def(program: &str) -> ProcessDefinition {
    ProcessDefinition::new(program)
}

#[test]
fn test_registry_and_tabs_stay_in_step() {
    let (mut coord, _calls) = coordinator();
    assert_tabs_match(&coord);

    let a = coord.launch(def("a")).unwrap();
    let b = coord.launch(def("b")).unwrap();
    let c = coord.launch(def("c")).unwrap();
    assert_tabs_match(&coord);
    assert_eq!(coord.tab_count(), 3);

    send(&mut coord, ProcessEvent::finished(b, Some(0)));
    assert_tabs_match(&coord);

    assert!(coord.request_close(1));
    assert_tabs_match(&coord);
    assert_eq!(coord.tab_count(), 2);

    assert!(coord.request_close(1));
    send(&mut coord, ProcessEvent::finished(c, None));
    assert_tabs_match(&coord);
    assert_eq!(coord.tab_count(), 1);
    assert!(coord.handle(a).is_some());

    assert!(coord.on_window_close());
    assert_tabs_match(&coord);
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_launch_selects_new_tab_and_labels_it() {
    let (mut coord, calls) = coordinator();
    coord.launch(def("/usr/bin/first")).unwrap();
    let second = coord.launch(def("/bin/second").with_args(["x"])).unwrap();

    assert_eq!(coord.current_index(), Some(1));
    assert_eq!(coord.current_handle().map(|h| h.id()), Some(second));
    let labels: Vec<String> = coord.tabs().map(|t| t.label.clone()).collect();
    assert_eq!(labels, vec!["first", "second"]);
    assert!(coord.tabs().all(|t| t.running));
    assert_eq!(calls.spawn_count(), 2);
}

#[test]
fn test_stdin_is_fed_and_closed_even_when_empty() {
    let (mut coord, calls) = coordinator();
    let with_input = coord
        .launch(def("cat").with_stdin_lines(["one", "two"]))
        .unwrap();
    let without_input = coord.launch(def("true")).unwrap();

    let inputs = calls.with(|c| c.inputs.clone());
    assert_eq!(
        inputs,
        vec![
            (with_input, vec!["one".to_string(), "two".to_string()]),
            (without_input, vec![]),
        ]
    );
}

#[test]
fn test_spawn_failure_opens_no_tab() {
    let (mut coord, calls) = coordinator();
    let err = coord.launch(def(MISSING_PROGRAM)).unwrap_err();

    assert!(matches!(
        err,
        ProcRunError::Spawn(SpawnError::NotFound { .. })
    ));
    assert_eq!(coord.tab_count(), 0);
    assert_eq!(calls.spawn_count(), 0);
    assert!(coord.current_index().is_none());
}

#[test]
fn test_confirmed_close_of_running_process_defers_removal() {
    let (mut coord, calls) = coordinator();
    let id = coord.launch(def("sleep")).unwrap();

    assert!(coord.request_close(0));
    assert_eq!(calls.killed(), vec![id]);
    // Still there until the process reports back
    assert_eq!(coord.tab_count(), 1);
    assert_eq!(coord.handle(id).map(|h| h.state()), Some(ProcessState::Running));

    send(&mut coord, ProcessEvent::finished(id, None));
    assert_eq!(coord.tab_count(), 0);
    assert!(coord.handle(id).is_none());
}

#[test]
fn test_declined_close_leaves_process_running() {
    let confirm = ScriptedConfirm::always(false);
    let (mut coord, calls) = coordinator_with(test_options(), confirm.clone());
    let id = coord.launch(def("sleep")).unwrap();

    assert!(!coord.request_close(0));
    assert!(calls.killed().is_empty());
    assert_eq!(coord.tab_count(), 1);
    assert_eq!(coord.handle(id).map(|h| h.state()), Some(ProcessState::Running));
    assert!(coord.tabs().next().is_some_and(|t| t.running));
    assert_eq!(confirm.asked().len(), 1);
}

#[test]
fn test_close_of_finished_tab_needs_no_confirmation() {
    let confirm = ScriptedConfirm::always(false);
    let (mut coord, _calls) = coordinator_with(test_options(), confirm.clone());
    let id = coord.launch(def("true")).unwrap();
    send(&mut coord, ProcessEvent::finished(id, Some(0)));

    assert!(coord.request_close(0));
    assert_eq!(coord.tab_count(), 0);
    assert!(confirm.asked().is_empty());
}

#[test]
fn test_request_close_out_of_range() {
    let (mut coord, _calls) = coordinator();
    assert!(!coord.request_close(0));
    coord.launch(def("a")).unwrap();
    assert!(!coord.request_close(5));
}

#[test]
fn test_finished_tab_stays_without_auto_close() {
    let (mut coord, _calls) = coordinator();
    let id = coord.launch(def("echo")).unwrap();
    send(&mut coord, ProcessEvent::stdout(id, "hello\n"));
    send(&mut coord, ProcessEvent::finished(id, Some(0)));

    assert_eq!(coord.tab_count(), 1);
    let handle = coord.handle(id).unwrap();
    assert_eq!(handle.state(), ProcessState::Finished);
    assert_eq!(handle.exit_code(), Some(0));
    assert!(!coord.tabs().next().unwrap().running);
    assert!(!coord.take_close_panel_request());
}

#[test]
fn test_auto_close_and_close_on_last() {
    let options = CoordinatorOptions {
        auto_close_finished: true,
        close_on_last: true,
        ..test_options()
    };
    let (mut coord, _calls) = coordinator_with(options, ScriptedConfirm::always(true));
    let a = coord.launch(def("a")).unwrap();
    let b = coord.launch(def("b")).unwrap();

    send(&mut coord, ProcessEvent::finished(a, Some(0)));
    assert_eq!(coord.tab_count(), 1);
    assert!(!coord.take_close_panel_request());

    send(&mut coord, ProcessEvent::finished(b, Some(3)));
    assert_eq!(coord.tab_count(), 0);
    assert!(coord.close_panel_requested());
    assert!(coord.take_close_panel_request());
    // Reported once
    assert!(!coord.take_close_panel_request());
}

#[test]
fn test_terminate_closes_tab_on_exit() {
    let (mut coord, calls) = coordinator();
    let id = coord.launch(def("server")).unwrap();

    assert!(coord.terminate_at(0));
    assert_eq!(calls.with(|c| c.terminated.clone()), vec![id]);
    assert!(coord.handle(id).unwrap().close_on_exit());

    send(&mut coord, ProcessEvent::finished(id, Some(143)));
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_kill_requires_confirmation() {
    let confirm = ScriptedConfirm::new([false, true], true);
    let (mut coord, calls) = coordinator_with(test_options(), confirm);
    let id = coord.launch(def("server")).unwrap();

    assert!(!coord.kill_at(0));
    assert!(calls.killed().is_empty());
    assert!(coord.kill_at(0));
    assert_eq!(calls.killed(), vec![id]);
}

#[test]
fn test_window_close_stops_at_first_veto() {
    // Checked last to first: tab 2 agrees, tab 1 vetoes, tab 0 is never asked
    let confirm = ScriptedConfirm::new([true, false], true);
    let (mut coord, calls) = coordinator_with(test_options(), confirm.clone());
    let _a = coord.launch(def("a")).unwrap();
    let b = coord.launch(def("b")).unwrap();
    let c = coord.launch(def("c")).unwrap();

    assert!(!coord.on_window_close());
    assert_eq!(calls.killed(), vec![c]);
    assert_eq!(confirm.asked().len(), 2);
    assert_eq!(coord.handle(b).map(|h| h.state()), Some(ProcessState::Running));

    // The killed process still goes away once it reports back
    send(&mut coord, ProcessEvent::finished(c, None));
    assert_eq!(coord.tab_count(), 2);
    assert!(coord.handle(c).is_none());
}

#[test]
fn test_window_close_veto_on_first_tab_closes_nothing() {
    let (mut coord, calls) = coordinator_with(test_options(), ScriptedConfirm::always(false));
    coord.launch(def("a")).unwrap();
    coord.launch(def("b")).unwrap();

    assert!(!coord.on_window_close());
    assert!(calls.killed().is_empty());
    assert_eq!(coord.tab_count(), 2);
}

#[test]
fn test_window_close_tears_everything_down() {
    let (mut coord, calls) = coordinator();
    let a = coord.launch(def("a")).unwrap();
    let b = coord.launch(def("b")).unwrap();
    send(&mut coord, ProcessEvent::finished(a, Some(0)));

    assert!(coord.on_window_close());
    assert_eq!(coord.tab_count(), 0);
    assert!(coord.current_index().is_none());
    assert!(coord.display().bound().is_none());
    assert!(calls.killed().contains(&b));
    assert!(!calls.killed().contains(&a));
}

#[test]
fn test_finish_hook_runs_once_with_final_state() {
    let (mut coord, _calls) = coordinator();
    let seen: Rc<RefCell<Vec<(ProcessState, Option<i32>)>>> = Rc::default();
    let slot = Rc::clone(&seen);

    let id = coord
        .launch_with_hook(
            def("make"),
            Some(Box::new(move |handle: &ProcessHandle| {
                slot.borrow_mut().push((handle.state(), handle.exit_code()));
            })),
        )
        .unwrap();

    send(&mut coord, ProcessEvent::finished(id, Some(2)));
    send(&mut coord, ProcessEvent::finished(id, Some(2)));
    assert_eq!(*seen.borrow(), vec![(ProcessState::Finished, Some(2))]);
}

#[test]
fn test_events_for_closed_tabs_are_dropped() {
    let (mut coord, _calls) = coordinator();
    let id = coord.launch(def("a")).unwrap();
    send(&mut coord, ProcessEvent::finished(id, Some(0)));
    assert!(coord.request_close(0));

    assert_eq!(send(&mut coord, ProcessEvent::stdout(id, "late\n")), 1);
    assert_eq!(coord.tab_count(), 0);
}

#[test]
fn test_display_follows_current_tab() {
    let (mut coord, _calls) = coordinator();
    let a = coord.launch(def("a")).unwrap();
    let b = coord.launch(def("b")).unwrap();

    send(&mut coord, ProcessEvent::stdout(a, "from a\n"));
    send(&mut coord, ProcessEvent::stderr(b, "from b\n"));
    assert_eq!(coord.display().bound(), Some(b));
    assert_eq!(coord.display().log().to_plain(), "from b\n");
    assert!(coord.display().html().contains("color:red"));

    assert!(coord.set_current(0));
    assert_eq!(coord.display().bound(), Some(a));
    assert_eq!(coord.display().log().to_plain(), "from a\n");

    send(&mut coord, ProcessEvent::stdout(a, "more\n"));
    assert_eq!(coord.display().log().to_plain(), "from a\nmore\n");
    assert!(!coord.set_current(9));
}

#[test]
fn test_removing_tabs_keeps_a_valid_current_index() {
    let (mut coord, _calls) = coordinator();
    let ids: Vec<_> = (0..3)
        .map(|i| coord.launch(def(&format!("p{}", i))).unwrap())
        .collect();
    for id in &ids {
        send(&mut coord, ProcessEvent::finished(*id, Some(0)));
    }

    coord.set_current(2);
    assert!(coord.request_close(2));
    assert_eq!(coord.current_index(), Some(1));

    coord.set_current(1);
    assert!(coord.request_close(0));
    assert_eq!(coord.current_index(), Some(0));
    assert_eq!(coord.current_handle().map(|h| h.id()), Some(ids[1]));

    assert!(coord.request_close(0));
    assert_eq!(coord.current_index(), None);
}

#[test]
fn test_pending_close_is_not_confirmed_twice() {
    // One yes, then every further prompt would veto
    let confirm = ScriptedConfirm::new([true], false);
    let (mut coord, calls) = coordinator_with(test_options(), confirm.clone());
    let id = coord.launch(def("sleep")).unwrap();

    assert!(coord.request_close(0));
    assert!(coord.on_window_close());
    assert_eq!(confirm.asked().len(), 1);
    assert_eq!(coord.tab_count(), 0);
    assert!(calls.killed().iter().all(|killed| *killed == id));
}

#[test]
fn test_kill_after_terminate_needs_no_confirmation() {
    let confirm = ScriptedConfirm::always(false);
    let (mut coord, calls) = coordinator_with(test_options(), confirm.clone());
    let id = coord.launch(def("server")).unwrap();

    assert!(coord.terminate_at(0));
    assert!(coord.kill_at(0));
    assert_eq!(calls.killed(), vec![id]);
    assert!(confirm.asked().is_empty());

    // Closing the tab while the stop is pending does not ask either
    assert!(coord.request_close(0));
    assert!(confirm.asked().is_empty());
    assert_eq!(coord.tab_count(), 1);
}

#[test]
fn test_window_close_does_not_request_panel_close() {
    let options = CoordinatorOptions {
        close_on_last: true,
        ..test_options()
    };
    let (mut coord, _calls) = coordinator_with(options, ScriptedConfirm::always(true));
    let id = coord.launch(def("sleep")).unwrap();

    assert!(coord.request_close(0));
    // Finish arrives while the window is closing
    coord
        .event_sender()
        .send(ProcessEvent::finished(id, None))
        .unwrap();
    assert!(coord.on_window_close());

    assert_eq!(coord.tab_count(), 0);
    assert!(!coord.close_panel_requested());
    assert!(!coord.take_close_panel_request());
}
