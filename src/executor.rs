//! Run [CommandDescriptor]s as child processes

use crate::{
    command::{CommandDescriptor, Sink},
    error::*,
};
use std::process::{Command, Output, Stdio};

/// Runs external commands described by [CommandDescriptor]
pub trait Executor {
    /// Run the command, streaming its output to the terminal unless the
    /// descriptor asks for other sinks
    fn run(&self, cmd: &CommandDescriptor) -> Result<()>;

    /// Run the command and return its captured standard output
    fn run_output(&self, cmd: &CommandDescriptor) -> Result<Vec<u8>>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn run(&self, cmd: &CommandDescriptor) -> Result<()> {
        (**self).run(cmd)
    }

    fn run_output(&self, cmd: &CommandDescriptor) -> Result<Vec<u8>> {
        (**self).run_output(cmd)
    }
}

/// [Executor] spawning a real process with [std::process::Command]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    fn command(cmd: &CommandDescriptor) -> Command {
        let mut command = Command::new(&cmd.program);
        append_args(&mut command, cmd);
        command.envs(&cmd.env);
        command
    }

    fn wait(cmd: &CommandDescriptor, mut command: Command) -> Result<Output> {
        log::info!("Run `{}`", cmd);
        let output = command.output().map_err(|source| Error::Spawn {
            program: cmd.program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(Error::Execution {
                command: cmd.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// `cmd.exe` parses its own command line, so its quoting must reach it verbatim
#[cfg(windows)]
fn append_args(command: &mut Command, cmd: &CommandDescriptor) {
    use std::os::windows::process::CommandExt;
    if cmd.program.eq_ignore_ascii_case("cmd") {
        for arg in &cmd.args {
            command.raw_arg(arg);
        }
    } else {
        command.args(&cmd.args);
    }
}

#[cfg(not(windows))]
fn append_args(command: &mut Command, cmd: &CommandDescriptor) {
    command.args(&cmd.args);
}

fn stdio(sink: Option<Sink>, default: Sink) -> Stdio {
    match sink.unwrap_or(default) {
        Sink::Null => Stdio::null(),
        Sink::Inherit => Stdio::inherit(),
        Sink::Capture => Stdio::piped(),
    }
}

impl Executor for ProcessExecutor {
    fn run(&self, cmd: &CommandDescriptor) -> Result<()> {
        let mut command = Self::command(cmd);
        command
            .stdout(stdio(cmd.stdout, Sink::Inherit))
            .stderr(stdio(cmd.stderr, Sink::Inherit));
        Self::wait(cmd, command)?;
        Ok(())
    }

    fn run_output(&self, cmd: &CommandDescriptor) -> Result<Vec<u8>> {
        let mut command = Self::command(cmd);
        command
            .stdout(stdio(cmd.stdout, Sink::Capture))
            .stderr(stdio(cmd.stderr, Sink::Capture));
        let output = Self::wait(cmd, command)?;
        Ok(output.stdout)
    }
}
