//! Run command implementation

use anyhow::{Context, Result, bail};
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

use procrun::config::Config;
use procrun::coordinator::{AlwaysConfirm, CoordinatorOptions, TabCoordinator};
use procrun::process::{ProcessHandle, TokioLauncher};
use procrun::store::CommandStore;
use procrun::{OutputChannel, ProcessDefinition, ProcessState};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Build the definition to run from a saved command and/or the command line.
///
/// With `--saved`, extra command-line words are appended as arguments.
fn resolve_definition(
    config: &Config,
    saved: Option<String>,
    cwd: Option<String>,
    inputs: Vec<String>,
    command: Vec<String>,
) -> Result<ProcessDefinition> {
    let mut definition = match saved {
        Some(name) => {
            let path = config.commands_path();
            let store = CommandStore::load(&path, &config.settings.panel_name)?;
            let Some((_, definition)) = store.find_command(&name) else {
                bail!("No saved command named '{}' in {}", name, path.display());
            };
            let mut definition = definition.clone();
            definition.arguments.extend(command);
            definition
        }
        None => {
            let mut words = command.into_iter();
            let Some(program) = words.next() else {
                bail!("Nothing to run: give a PROGRAM or --saved NAME");
            };
            ProcessDefinition::new(program).with_args(words)
        }
    };

    if let Some(cwd) = cwd {
        definition.working_directory = cwd;
    }
    if !inputs.is_empty() {
        definition.stdin_lines = inputs;
    }
    Ok(definition)
}

/// Launch one program through the coordinator and stream its output.
///
/// Returns the exit code to report: the child's own code, or 1 when it
/// crashed or was killed.
pub fn run_command(
    config: &Config,
    saved: Option<String>,
    cwd: Option<String>,
    inputs: Vec<String>,
    command: Vec<String>,
) -> Result<i32> {
    let definition = resolve_definition(config, saved, cwd, inputs, command)?;

    let launcher = TokioLauncher::new(config.start_timeout())
        .context("Failed to start process runtime")?;
    let options = CoordinatorOptions {
        auto_close_finished: false,
        close_on_last: false,
        ..CoordinatorOptions::from(&config.settings)
    };
    let mut coordinator =
        TabCoordinator::new(Box::new(launcher), Box::new(AlwaysConfirm), options);

    let finished: Rc<Cell<Option<ProcessState>>> = Rc::new(Cell::new(None));
    let hook_slot = Rc::clone(&finished);
    let id = coordinator.launch_with_hook(
        definition,
        Some(Box::new(move |handle: &ProcessHandle| {
            hook_slot.set(Some(handle.state()))
        })),
    )?;

    let mut seen = 0;
    loop {
        coordinator.pump_events();

        let Some(handle) = coordinator.handle(id) else {
            bail!("Process #{} disappeared before finishing", id);
        };
        seen = print_new_output(handle.output(), seen)?;

        if let Some(state) = finished.get() {
            let code = match (state, handle.exit_code()) {
                (ProcessState::Finished, Some(code)) => code,
                _ => 1,
            };
            debug!("Process #{} ended {} with exit code {}", id, state, code);
            if state == ProcessState::Errored {
                warn!("{} did not exit normally", handle.definition().display_name());
            }
            return Ok(code);
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

fn print_new_output(output: &procrun::OutputLog, seen: u64) -> Result<u64> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    for segment in output.since(seen) {
        match segment.channel {
            OutputChannel::Stdout => out.write_all(segment.text.as_bytes())?,
            OutputChannel::Stderr => err.write_all(segment.text.as_bytes())?,
            OutputChannel::System => debug!("{}", segment.text.trim_end()),
        }
    }
    out.flush()?;
    err.flush()?;
    Ok(output.next_seq())
}
