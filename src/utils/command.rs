//! Command execution utilities

use crate::data::ProbeResult;
use crate::error::{ControlCenterError, Result};
use log::{debug, info, warn};
use std::io::Read;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How long a timed-out command gets between SIGTERM and SIGKILL
const KILL_GRACE: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The invocation boundary every probe goes through.
///
/// `run` executes a command string through a shell and returns its standard
/// output with trailing whitespace removed. A non-zero exit, a spawn failure or
/// an expired time budget is an error. Tests substitute a canned implementation.
pub trait Shell: Send + Sync {
    fn run(&self, cmd: &str) -> Result<String>;

    /// Start `cmd` without waiting for it.
    fn spawn_detached(&self, cmd: &str) -> Result<()>;
}

/// Runs commands with `sh -c`, optionally bounded by a timeout.
#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    timeout: Option<Duration>,
}

impl SystemShell {
    pub fn new(timeout: Option<Duration>) -> Self {
        SystemShell { timeout }
    }

    /// `0` disables the time budget.
    pub fn with_timeout_millis(millis: u64) -> Self {
        Self::new((millis > 0).then(|| Duration::from_millis(millis)))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Shell for SystemShell {
    fn run(&self, cmd: &str) -> Result<String> {
        debug!("Running '{}'", cmd);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            // own process group, so a timeout takes down the whole pipeline
            .process_group(0)
            .spawn()
            .map_err(|source| ControlCenterError::Spawn {
                cmd: cmd.to_string(),
                source,
            })?;

        // Drain stdout off-thread so a chatty command can't fill the pipe while we wait
        let mut stdout = child.stdout.take();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(out) = stdout.as_mut() {
                let _ = out.read_to_end(&mut buf);
            }
            let _ = tx.send(buf);
        });

        let start = Instant::now();
        let status = match self.timeout {
            Some(limit) => wait_with_timeout(&mut child, cmd, limit)?,
            None => child.wait()?,
        };

        if !status.success() {
            return Err(ControlCenterError::Exit {
                cmd: cmd.to_string(),
                code: status.code(),
            });
        }

        // A background job left behind by `sh` may still hold stdout open
        let bytes = match self.timeout {
            Some(limit) => match rx.recv_timeout(limit.saturating_sub(start.elapsed())) {
                Ok(bytes) => bytes,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("'{}' output still open after {:?}, killing leftovers", cmd, limit);
                    signal_group(&child, libc::SIGKILL);
                    return Err(ControlCenterError::Timeout {
                        cmd: cmd.to_string(),
                        after: limit,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => Vec::new(),
            },
            None => rx.recv().unwrap_or_default(),
        };
        Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
    }

    fn spawn_detached(&self, cmd: &str) -> Result<()> {
        info!("Executing '{}'", cmd);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(format!("exec {}", cmd))
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| ControlCenterError::Spawn {
                cmd: cmd.to_string(),
                source,
            })?;
        // reap it whenever it exits
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

fn wait_with_timeout(child: &mut Child, cmd: &str, limit: Duration) -> Result<ExitStatus> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= limit {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    warn!("'{}' still running after {:?}, terminating", cmd, limit);
    terminate_group(child);
    Err(ControlCenterError::Timeout {
        cmd: cmd.to_string(),
        after: limit,
    })
}

fn signal_group(child: &Child, signal: libc::c_int) {
    let pgid = child.id() as libc::pid_t;
    unsafe {
        libc::kill(-pgid, signal);
    }
}

fn terminate_group(child: &mut Child) {
    signal_group(child, libc::SIGTERM);

    let start = Instant::now();
    while start.elapsed() < KILL_GRACE {
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }

    signal_group(child, libc::SIGKILL);
    let _ = child.wait();
}

/// Run a side-effecting command, logging instead of returning failures.
pub fn run_ignored(shell: &dyn Shell, cmd: &str) {
    if let Err(err) = shell.run(cmd) {
        debug!("Ignoring failure of '{}': {}", cmd, err);
    }
}

/// First whitespace token of a command line, i.e. the program name.
pub fn base_command(cmd: &str) -> Option<&str> {
    cmd.split_whitespace().next()
}

/// Check whether the program of `cmd` can be found on the search path.
///
/// Arguments after the first token are ignored, so full command lines may be
/// passed. Lookup failures of any kind count as "not available".
pub fn is_available(shell: &dyn Shell, cmd: &str, verbose: bool) -> bool {
    let Some(base) = base_command(cmd) else {
        return false;
    };

    let found = shell
        .run(&format!("command -v {}", base))
        .map(|out| !out.trim().is_empty())
        .unwrap_or(false);

    if verbose {
        println!("  '{}' {}", base, if found { "found" } else { "not found!" });
    }
    debug!("'{}' available: {}", base, found);
    found
}

/// Availability report over a set of named commands.
///
/// Commands sharing a program (same binary, other arguments) are probed once;
/// results come back in first-seen order.
pub fn check_all_commands<'a, I>(shell: &dyn Shell, commands: I, verbose: bool) -> Vec<(String, ProbeResult)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<&str> = Vec::new();
    for cmd in commands {
        if let Some(base) = base_command(cmd) {
            if !seen.contains(&base) {
                seen.push(base);
            }
        }
    }

    if verbose {
        println!("Checking commands availability:");
    }
    seen.into_iter()
        .map(|base| {
            let available = is_available(shell, base, verbose);
            (base.to_string(), ProbeResult { available })
        })
        .collect()
}
