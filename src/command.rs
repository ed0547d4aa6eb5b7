//! Descriptors of docker CLI invocations
//!
//! Nothing here spawns a process. A [DockerCommand] is turned into a
//! [CommandDescriptor] which an [Executor](crate::executor::Executor) runs.

use crate::Image;
use std::{collections::BTreeMap, fmt};

/// Environment variable carrying the registry password to `docker login`
pub const PASSWORD_ENV: &str = "DOCKER_PASS";

/// Destination of a standard stream of the child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Discard the stream
    Null,
    /// Pass through to the terminal of the caller
    Inherit,
    /// Capture into memory
    Capture,
}

/// External process invocation: program, arguments, environment and sinks
///
/// `stdout` and `stderr` are `None` unless a command asks for something
/// specific, and then the executor decides.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub stdout: Option<Sink>,
    pub stderr: Option<Sink>,
}

impl CommandDescriptor {
    pub fn new(program: impl Into<String>) -> Self {
        CommandDescriptor {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            stdout: None,
            stderr: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Program and arguments only, values of `env` never appear
impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .finish()
    }
}

/// Shell flavor used to feed the password into `docker login`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `cmd /C`
    Windows,
    /// `sh -c`
    Unix,
}

impl Platform {
    /// Platform of the host this crate is compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Credentials for `docker login`
#[derive(Clone, PartialEq, Eq)]
pub struct Login {
    pub registry: String,
    pub username: String,
    pub password: String,
}

impl Login {
    pub fn new(
        registry: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Login {
            registry: registry.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Describe the login for the given shell
    ///
    /// The password is read by the shell from [PASSWORD_ENV] and piped into
    /// `--password-stdin`, so that it never shows up in the process list.
    ///
    /// ```
    /// use docker_cmd::command::{Login, Platform, PASSWORD_ENV};
    ///
    /// let login = Login::new("registry.io", "admin", "s3cret");
    /// let cmd = login.describe_for("docker", Platform::Unix);
    /// assert_eq!(cmd.program, "sh");
    /// assert!(cmd.args.iter().all(|arg| !arg.contains("s3cret")));
    /// assert_eq!(cmd.env[PASSWORD_ENV], "s3cret");
    /// ```
    pub fn describe_for(&self, program: &str, platform: Platform) -> CommandDescriptor {
        let (shell, flag, script) = match platform {
            // `!var!` is expanded by the inner `cmd` after the line is parsed,
            // so `&|<>^` in the password stay data. The left side of a pipe
            // runs in a child `cmd` without delayed expansion, hence `/V:ON`
            // there. `echo(` prints an empty line for an empty password.
            Platform::Windows => (
                "cmd",
                "/C",
                format!(
                    "cmd /V:ON /C \"echo(!{}!\"| {} login {} --username={} --password-stdin",
                    PASSWORD_ENV,
                    cmd_quote(program),
                    cmd_quote(&self.registry),
                    cmd_quote(&self.username),
                ),
            ),
            // `echo` of dash interprets backslashes, `printf '%s'` does not
            Platform::Unix => (
                "sh",
                "-c",
                format!(
                    "printf '%s\\n' \"${}\" | {} login {} --username={} --password-stdin",
                    PASSWORD_ENV,
                    sh_quote(program),
                    sh_quote(&self.registry),
                    sh_quote(&self.username),
                ),
            ),
        };
        CommandDescriptor::new(shell)
            .args([flag.to_string(), script])
            .env(PASSWORD_ENV, self.password.as_str())
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("registry", &self.registry)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Quote a word for POSIX `sh`, plain words are left as-is
fn sh_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.:/@=+,%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Quote a word for `cmd.exe`, plain words are left as-is
fn cmd_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.:/\\@=+,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("\"{}\"", word.replace('"', "\"\""))
    }
}

/// Commands of the docker CLI used for pushing images
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerCommand {
    /// `docker push <tag>`
    Push(Image),
    /// `docker images --format {{.ID}} --no-trunc <tag>`
    ImageId(Image),
    /// `docker inspect --format {{.Parent}} <tag>`
    ParentId(Image),
    /// `docker login <registry> --username=<user> --password-stdin`
    Login(Login),
}

impl DockerCommand {
    /// Describe the command for the host platform
    pub fn describe(&self, program: &str) -> CommandDescriptor {
        self.describe_for(program, Platform::current())
    }

    /// Describe the command, `platform` only matters for [DockerCommand::Login]
    pub fn describe_for(&self, program: &str, platform: Platform) -> CommandDescriptor {
        match self {
            DockerCommand::Push(image) => CommandDescriptor::new(program)
                .arg("push")
                .arg(image.tag()),
            DockerCommand::ImageId(image) => CommandDescriptor::new(program)
                .args(["images", "--format", "{{.ID}}", "--no-trunc"])
                .arg(image.tag()),
            DockerCommand::ParentId(image) => CommandDescriptor::new(program)
                .args(["inspect", "--format", "{{.Parent}}"])
                .arg(image.tag()),
            DockerCommand::Login(login) => login.describe_for(program, platform),
        }
    }
}
