//! OS process launcher backed by a small tokio runtime.
//!
//! Each child gets three tasks: a stdout reader, a stderr reader and a
//! waiter. The waiter owns the child: stop requests reach it over a channel,
//! so signals are never sent to a pid that was already reaped. It sends
//! `Finished` only after both readers drained (or a short grace period
//! passed), so output always precedes the exit event.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::mpsc::Sender;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::launcher::{ProcessControl, ProcessLauncher};
use crate::domain::{OutputChannel, ProcessDefinition, ProcessErrorKind, ProcessEvent, ProcessId};
use crate::error::{ProcRunError, SpawnError};

/// How long the waiter lets readers drain after exit (grandchildren may keep pipes open)
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Size of one pipe read
const READ_CHUNK: usize = 8 * 1024;

/// Stop request handled by the waiter task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopSignal {
    Terminate,
    Kill,
}

pub struct TokioLauncher {
    /// Owned runtime, if this launcher created its own
    runtime: Option<Runtime>,
    handle: Handle,
    start_timeout: Duration,
}

impl TokioLauncher {
    /// Create a launcher with its own two-worker runtime.
    pub fn new(start_timeout: Duration) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("procrun-io")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        Ok(Self {
            runtime: Some(runtime),
            handle,
            start_timeout,
        })
    }

    /// Use an existing runtime. `spawn` must not be called from inside it.
    pub fn with_handle(handle: Handle, start_timeout: Duration) -> Self {
        Self {
            runtime: None,
            handle,
            start_timeout,
        }
    }

    pub fn start_timeout(&self) -> Duration {
        self.start_timeout
    }
}

impl Drop for TokioLauncher {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl ProcessLauncher for TokioLauncher {
    fn spawn(
        &self,
        id: ProcessId,
        definition: &ProcessDefinition,
        events: Sender<ProcessEvent>,
    ) -> Result<Box<dyn ProcessControl>, SpawnError> {
        let program = definition.program.trim().to_string();
        if program.is_empty() {
            return Err(SpawnError::EmptyProgram);
        }

        let mut command = Command::new(&program);
        command
            .args(&definition.arguments)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if definition.has_working_directory() {
            let dir = PathBuf::from(definition.working_directory.trim());
            if !dir.is_dir() {
                return Err(SpawnError::MissingWorkingDirectory { path: dir });
            }
            command.current_dir(dir);
        }

        // Bounded wait for the OS to report the process as started
        let timeout = self.start_timeout;
        let spawned = self.handle.block_on(async move {
            let task = tokio::task::spawn_blocking(move || command.spawn());
            tokio::time::timeout(timeout, task).await
        });

        let mut child = match spawned {
            Err(_) => {
                return Err(SpawnError::Timeout {
                    program,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            Ok(Err(join_error)) => {
                return Err(SpawnError::Io {
                    program,
                    source: std::io::Error::other(join_error.to_string()),
                });
            }
            Ok(Ok(Err(e))) => return Err(SpawnError::from_io(&program, e)),
            Ok(Ok(Ok(child))) => child,
        };

        let pid = child.id();
        debug!("Process #{} started ({}) pid={:?}", id, program, pid);

        let stdin = child.stdin.take();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(self.handle.spawn(read_channel(
                id,
                OutputChannel::Stdout,
                stdout,
                events.clone(),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(self.handle.spawn(read_channel(
                id,
                OutputChannel::Stderr,
                stderr,
                events.clone(),
            )));
        }

        let (stop_tx, stop_rx) = mpsc::unbounded_channel();
        self.handle
            .spawn(wait_for_exit(id, child, stop_rx, readers, events.clone()));

        Ok(Box::new(TokioControl {
            id,
            pid,
            stdin,
            stop_tx,
            events,
            handle: self.handle.clone(),
        }))
    }
}

/// Forward one output pipe as events, chunk by chunk.
///
/// Whatever the pipe yields is sent right away, so prompts and progress
/// text without a trailing newline show up while the process runs. An
/// incomplete UTF-8 sequence at the end of a chunk is held back until the
/// next read; at EOF any leftover bytes are sent lossily.
async fn read_channel<R>(
    id: ProcessId,
    channel: OutputChannel,
    mut reader: R,
    events: Sender<ProcessEvent>,
) where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut pending: Vec<u8> = Vec::new();
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                pending.extend_from_slice(&chunk[..n]);
                let text = take_decodable(&mut pending);
                if text.is_empty() {
                    continue;
                }
                if events.send(ProcessEvent::output(id, channel, text)).is_err() {
                    return;
                }
            }
            Err(e) => {
                let _ = events.send(ProcessEvent::error(
                    id,
                    ProcessErrorKind::ReadError,
                    format!("{} read failed: {}", channel_name(channel), e),
                ));
                break;
            }
        }
    }

    if !pending.is_empty() {
        let text = String::from_utf8_lossy(&pending).into_owned();
        let _ = events.send(ProcessEvent::output(id, channel, text));
    }
}

/// Decode the longest prefix of `pending` that does not end inside a UTF-8
/// sequence, leaving the incomplete tail in place. Invalid bytes are
/// replaced.
fn take_decodable(pending: &mut Vec<u8>) -> String {
    let keep = match std::str::from_utf8(pending) {
        Ok(_) => 0,
        // `error_len() == None` means the input ended mid-sequence
        Err(e) if e.error_len().is_none() => pending.len() - e.valid_up_to(),
        Err(_) => incomplete_tail(pending),
    };
    let tail = pending.split_off(pending.len() - keep);
    let text = String::from_utf8_lossy(pending).into_owned();
    *pending = tail;
    text
}

/// Length of a truncated multi-byte sequence at the end of `bytes` (0..=3).
fn incomplete_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let needed = match byte {
            b if b & 0b1110_0000 == 0b1100_0000 => 2,
            b if b & 0b1111_0000 == 0b1110_0000 => 3,
            b if b & 0b1111_1000 == 0b1111_0000 => 4,
            _ => return 0,
        };
        return if needed > back { back } else { 0 };
    }
    0
}

async fn wait_for_exit(
    id: ProcessId,
    mut child: Child,
    mut stop_rx: UnboundedReceiver<StopSignal>,
    readers: Vec<JoinHandle<()>>,
    events: Sender<ProcessEvent>,
) {
    // A closed channel (control destroyed) counts as a kill request
    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            signal = stop_rx.recv() => match signal {
                Some(StopSignal::Terminate) => terminate_child(id, &mut child),
                Some(StopSignal::Kill) | None => {
                    if let Err(e) = child.start_kill() {
                        debug!("Process #{} kill failed: {}", id, e);
                    }
                    break child.wait().await;
                }
            },
        }
    };

    for reader in readers {
        if tokio::time::timeout(READER_DRAIN_TIMEOUT, reader).await.is_err() {
            debug!("Process #{} output pipe still open after exit", id);
        }
    }

    match status {
        Ok(status) => {
            let _ = events.send(ProcessEvent::finished(id, status.code()));
        }
        Err(e) => {
            let _ = events.send(ProcessEvent::error(
                id,
                ProcessErrorKind::Unknown,
                format!("wait failed: {}", e),
            ));
            let _ = events.send(ProcessEvent::finished(id, None));
        }
    }
}

fn channel_name(channel: OutputChannel) -> &'static str {
    match channel {
        OutputChannel::Stdout => "stdout",
        OutputChannel::Stderr => "stderr",
        OutputChannel::System => "system",
    }
}

struct TokioControl {
    id: ProcessId,
    pid: Option<u32>,
    stdin: Option<ChildStdin>,
    stop_tx: UnboundedSender<StopSignal>,
    events: Sender<ProcessEvent>,
    handle: Handle,
}

impl TokioControl {
    fn request_stop(&self, signal: StopSignal) {
        if self.stop_tx.send(signal).is_err() {
            debug!("Process #{} already exited before {:?}", self.id, signal);
        }
    }
}

impl ProcessControl for TokioControl {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn write_input(&mut self, lines: &[String]) -> Result<(), ProcRunError> {
        let Some(mut stdin) = self.stdin.take() else {
            return Err(ProcRunError::InputClosed(self.id));
        };

        let payload: String = lines.iter().map(|line| format!("{}\n", line)).collect();
        let id = self.id;
        let events = self.events.clone();
        self.handle.spawn(async move {
            let result: std::io::Result<()> = async {
                stdin.write_all(payload.as_bytes()).await?;
                stdin.shutdown().await
            }
            .await;
            if let Err(e) = result {
                let _ = events.send(ProcessEvent::error(
                    id,
                    ProcessErrorKind::WriteError,
                    format!("stdin write failed: {}", e),
                ));
            }
            // stdin closes here
        });
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), ProcRunError> {
        self.request_stop(StopSignal::Terminate);
        Ok(())
    }

    fn kill(&mut self) -> Result<(), ProcRunError> {
        self.request_stop(StopSignal::Kill);
        Ok(())
    }
}

/// Send SIGTERM to a child that has not been reaped yet.
#[cfg(unix)]
fn terminate_child(id: ProcessId, child: &mut Child) {
    // `id()` is None once the child was waited on, so a reused pid is never hit
    let Some(pid) = child.id() else {
        debug!("Process #{} already reaped, not signalling", id);
        return;
    };
    let rc = unsafe { libc::kill(pid as i32, libc::SIGTERM) };
    if rc != 0 {
        warn!(
            "SIGTERM to process #{} (pid {}) failed: {}",
            id,
            pid,
            std::io::Error::last_os_error()
        );
    }
}

/// No graceful stop outside unix: kill right away.
#[cfg(not(unix))]
fn terminate_child(id: ProcessId, child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!("Process #{} kill failed: {}", id, e);
    }
}
