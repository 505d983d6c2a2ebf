//! Run a command with its stdout attached to a pseudo-terminal.
//!
//! Programs such as `ls`, `grep`, `rg` and `fd` change their output when
//! stdout is not a terminal. `PtyWrapper` gives the child a terminal slave as
//! stdout and copies whatever arrives on the master side to a writer of our
//! choosing, usually the real stdout feeding a pipeline.
//!
//! Only stdout is replaced. stdin and stderr are inherited, so the wrapped
//! command still reads from the pipeline in front of it.
//!
//! `forkpty` is deliberately not used: it would put the child in a new
//! session and ^C typed at the terminal would no longer reach it.

use crate::config::toml_config::DEFAULT_BUFFER_SIZE;
use crate::domain::model::WrapOutcome;
use crate::utils::error::{Result, ToolError};
use nix::libc;
use nix::pty::openpty;
use nix::sys::signal::{kill, signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{dup2, fork, ForkResult, Pid};
use std::ffi::{CString, OsString};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;

/// Exit status used when the command could not be executed.
pub const EXEC_FAILURE_EXIT_CODE: i32 = 127;

#[derive(Debug, Clone)]
pub struct PtyWrapper {
    program: CString,
    argv: Vec<CString>,
    buffer_size: usize,
    ignore_interrupt: bool,
}

impl PtyWrapper {
    /// `command[0]` is the program, looked up on `PATH`; the rest are its arguments.
    pub fn new(command: &[OsString]) -> Result<Self> {
        let argv = command
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes()).map_err(|_| ToolError::UsageError {
                    message: format!("argument contains a null byte: {:?}", arg),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let program = argv.first().cloned().ok_or_else(|| ToolError::UsageError {
            message: "no command given".to_string(),
        })?;

        Ok(Self {
            program,
            argv,
            buffer_size: DEFAULT_BUFFER_SIZE,
            ignore_interrupt: false,
        })
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Ignore SIGINT in this process while the child runs.
    ///
    /// ^C is delivered to the whole foreground process group, so the child
    /// sees it either way; we simply wait to see what the child does.
    pub fn ignore_interrupt(mut self, ignore: bool) -> Self {
        self.ignore_interrupt = ignore;
        self
    }

    /// Spawn the command and copy its terminal output to `out` until it ends.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<WrapOutcome> {
        let pty = openpty(None, None).map_err(|e| ToolError::pty("openpty", e))?;

        // 錯誤訊息必須在 fork 之前準備好
        let exec_failure = format!(
            "pty: failed to execute {}\n",
            self.program.to_string_lossy()
        );

        // NULL-terminated argv for execvp(3); borrows `self.argv`.
        let argv_ptrs: Vec<*const libc::c_char> = self
            .argv
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();

        // SAFETY: between fork and exec the child only calls dup2, signal,
        // close, execvp, write and _exit, and allocates nothing.
        match unsafe { fork() }.map_err(|e| ToolError::pty("fork", e))? {
            ForkResult::Child => {
                // SAFETY: restoring the default disposition; Rust ignores
                // SIGPIPE at startup and that would leak into the command.
                unsafe {
                    let _ = signal(Signal::SIGPIPE, SigHandler::SigDfl);
                }
                if dup2(pty.slave.as_raw_fd(), libc::STDOUT_FILENO).is_err() {
                    child_exit(exec_failure.as_bytes());
                }
                drop(pty.master);
                drop(pty.slave);

                // SAFETY: `program` and every `argv_ptrs` entry point into
                // CStrings owned by `self`, and the array ends with NULL.
                unsafe {
                    libc::execvp(self.program.as_ptr(), argv_ptrs.as_ptr());
                }
                child_exit(exec_failure.as_bytes())
            }
            ForkResult::Parent { child } => {
                tracing::debug!(pid = %child, program = ?self.program, "spawned command on pty");

                // While we hold the slave, reads on the master never hit
                // end of stream after the child exits.
                drop(pty.slave);

                if self.ignore_interrupt {
                    // SAFETY: installing SIG_IGN does not run any handler code.
                    if let Err(e) = unsafe { signal(Signal::SIGINT, SigHandler::SigIgn) } {
                        tracing::warn!("failed to ignore SIGINT: {}", e);
                    }
                }

                let copied = self.copy_output(pty.master, child, out);
                let status = waitpid(child, None).map_err(|e| ToolError::pty("waitpid", e))?;
                let downstream_closed = copied?;

                let exit_code = exit_code_for(status, downstream_closed);
                tracing::debug!(pid = %child, ?status, exit_code, "command finished");
                Ok(WrapOutcome {
                    exit_code,
                    downstream_closed,
                })
            }
        }
    }

    /// Returns whether the downstream reader went away.
    fn copy_output<W: Write>(&self, master: OwnedFd, child: Pid, out: &mut W) -> Result<bool> {
        let mut master = File::from(master);
        let mut buf = vec![0u8; self.buffer_size];

        loop {
            let n = match master.read(&mut buf) {
                Ok(0) => return Ok(false),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // Linux reports EIO once the last slave descriptor closes.
                Err(e) => {
                    tracing::trace!("pty read ended: {}", e);
                    return Ok(false);
                }
            };

            if let Err(e) = out.write_all(&buf[..n]).and_then(|_| out.flush()) {
                // Stop the child, then close the master in case it is blocked
                // writing to the terminal and cannot act on the signal.
                if let Err(kill_err) = kill(child, Signal::SIGTERM) {
                    tracing::warn!(pid = %child, "failed to terminate command: {}", kill_err);
                }
                drop(master);

                if e.kind() == ErrorKind::BrokenPipe {
                    tracing::debug!("downstream pipe closed, terminated pid {}", child);
                    return Ok(true);
                }
                return Err(ToolError::IoError(e));
            }
        }
    }
}

fn exit_code_for(status: WaitStatus, downstream_closed: bool) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, _, _) if downstream_closed => 0,
        WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
        _ => 0,
    }
}

fn child_exit(message: &[u8]) -> ! {
    // SAFETY: write(2) and _exit(2) are async-signal-safe and `message`
    // outlives the call.
    unsafe {
        libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
        libc::_exit(EXEC_FAILURE_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn test_stdout_is_a_terminal() {
        let mut out = Vec::new();
        let outcome = PtyWrapper::new(&sh("if [ -t 1 ]; then echo tty; else echo pipe; fi"))
            .unwrap()
            .run(&mut out)
            .unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("tty"), "unexpected output: {text:?}");
        assert!(!text.contains("pipe"));
        assert_eq!(outcome.exit_code, 0);
        assert!(!outcome.downstream_closed);
    }

    #[test]
    fn test_exit_status_is_propagated() {
        let mut out = Vec::new();
        let outcome = PtyWrapper::new(&sh("printf done; exit 7"))
            .unwrap()
            .run(&mut out)
            .unwrap();

        assert_eq!(outcome.exit_code, 7);
        assert_eq!(String::from_utf8_lossy(&out), "done");
    }

    #[test]
    fn test_small_buffer_copies_everything() {
        let mut out = Vec::new();
        PtyWrapper::new(&sh("printf abcdefghijklmnopqrstuvwxyz"))
            .unwrap()
            .buffer_size(3)
            .run(&mut out)
            .unwrap();

        assert_eq!(out, b"abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn test_every_argument_reaches_the_command() {
        let command: Vec<OsString> = vec![
            "sh".into(),
            "-c".into(),
            "printf '[%s]' \"$0\" \"$@\"".into(),
            "first".into(),
            "with space".into(),
            "".into(),
        ];
        let mut out = Vec::new();
        PtyWrapper::new(&command).unwrap().run(&mut out).unwrap();

        assert_eq!(String::from_utf8_lossy(&out), "[first][with space][]");
    }

    #[test]
    fn test_missing_program_exits_127() {
        let mut out = Vec::new();
        let outcome = PtyWrapper::new(&["contrib-kit-no-such-program".into()])
            .unwrap()
            .run(&mut out)
            .unwrap();

        assert_eq!(outcome.exit_code, EXEC_FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_signal_exit_codes() {
        let pid = Pid::from_raw(1);
        assert_eq!(exit_code_for(WaitStatus::Exited(pid, 3), false), 3);
        assert_eq!(exit_code_for(WaitStatus::Signaled(pid, Signal::SIGKILL, false), false), 137);
        assert_eq!(exit_code_for(WaitStatus::Signaled(pid, Signal::SIGTERM, false), true), 0);
    }

    #[test]
    fn test_empty_command_is_usage_error() {
        assert!(matches!(
            PtyWrapper::new(&[]),
            Err(ToolError::UsageError { .. })
        ));
    }
}
