use crate::error::*;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{env, fs, path::*};

pub const PROJECT_NAME: &str = "docker-cmd";

/// Environment variable overriding [Config::program]
pub const PROGRAM_ENV: &str = "DOCKER_CMD_PROGRAM";

const DEFAULT_PROGRAM: &str = "docker";

/// Settings of the container runtime CLI
///
/// ```toml
/// # $XDG_CONFIG_HOME/docker-cmd/config.toml
/// program = "podman"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Executable of the container runtime, `docker` by default
    pub program: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the project config directory if it exists,
    /// then apply [PROGRAM_ENV]
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Ok(path) if path.is_file() => Self::from_path(&path)?,
            Ok(_) => Self::default(),
            Err(e) => {
                log::debug!("{}", e);
                Self::default()
            }
        };
        if let Ok(program) = env::var(PROGRAM_ENV) {
            config.apply_program(&program);
        }
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_owned()));
        }
        log::debug!("Load config: {}", path.display());
        let input = fs::read_to_string(path)?;
        Self::from_toml(&input)
    }

    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Replace the program unless `program` is blank
    pub fn apply_program(&mut self, program: &str) {
        let program = program.trim();
        if !program.is_empty() {
            self.program = program.to_string();
        }
    }
}

/// Path of `config.toml` in the project config directory
pub fn config_path() -> Result<PathBuf> {
    let p = ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME).ok_or(Error::NoValidConfigDirectory)?;
    Ok(p.config_dir().join("config.toml"))
}
