use std::{path::PathBuf, string::FromUtf8Error};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    //
    // Invalid user input
    //
    #[error("Invalid image tag received for pushing to Artifactory - tag does not include a slash: {0}")]
    InvalidReference(String),

    //
    // Error from the external container runtime
    //
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", describe_status(.status))]
    Execution {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("Non UTF-8 output from container runtime: {0}")]
    InvalidOutput(#[from] FromUtf8Error),

    //
    // Configuration
    //
    #[error(transparent)]
    InvalidToml(#[from] toml::de::Error),
    #[error("Config file is not a file, or not exist: {0}")]
    NotAFile(PathBuf),
    #[error("No valid config directory could be retrieved from the operating system.")]
    NoValidConfigDirectory,

    //
    // System error
    //
    #[error(transparent)]
    UnknownIo(#[from] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Exit status reported by the container runtime, if it ran and failed
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Error::Execution { status, .. } => *status,
            _ => None,
        }
    }
}
