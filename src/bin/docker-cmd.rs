use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use docker_cmd::{
    command::{Login, PASSWORD_ENV},
    config::Config,
    executor::ProcessExecutor,
    Image, Runtime,
};
use std::{env, io};

#[derive(Debug, Parser)]
#[clap(version, about = "Image tag parsing and docker CLI helper for Artifactory")]
struct Opt {
    /// Container runtime executable, overrides config file and $DOCKER_CMD_PROGRAM
    #[clap(long, global = true)]
    program: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print image name with tag, e.g. `app:1.2`
    Name { tag: String },

    /// Print relative path of the image in Artifactory, e.g. `group/app/1.2`
    Path { tag: String },

    /// Print registry resolved from the tag
    Registry { tag: String },

    /// Print tag, name, path and registry as JSON
    Inspect { tag: String },

    /// Push image with the container runtime
    Push { tag: String },

    /// Print full ID of a local image
    Id { tag: String },

    /// Print ID of the parent image, empty for a base image
    ParentId { tag: String },

    /// Log in to a registry, the password is never passed as an argument
    Login {
        #[clap(short = 'r', long = "registry")]
        registry: String,

        #[clap(short = 'u', long = "username")]
        username: String,

        /// Read password from stdin instead of $DOCKER_PASS
        #[clap(long = "password-stdin")]
        password_stdin: bool,
    },
}

fn read_password(from_stdin: bool) -> anyhow::Result<String> {
    if from_stdin {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let password = line.trim_end_matches(|c| c == '\n' || c == '\r');
        if password.is_empty() {
            bail!("Empty password on stdin");
        }
        return Ok(password.to_string());
    }
    env::var(PASSWORD_ENV)
        .with_context(|| format!("Password is not given: use --password-stdin or set ${}", PASSWORD_ENV))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let Opt { program, command } = Opt::parse();
    let mut config = Config::load()?;
    if let Some(program) = program {
        config.apply_program(&program);
    }
    let runtime = Runtime::new(config, ProcessExecutor);

    match command {
        Command::Name { tag } => {
            println!("{}", Image::new(tag).name());
        }

        Command::Path { tag } => {
            println!("{}", Image::new(tag).path());
        }

        Command::Registry { tag } => {
            println!("{}", Image::new(tag).registry()?);
        }

        Command::Inspect { tag } => {
            let image = Image::new(tag);
            let info = serde_json::json!({
                "tag": image.tag(),
                "name": image.name(),
                "path": image.path(),
                "registry": image.registry().ok(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Command::Push { tag } => {
            Image::new(tag).push(&runtime)?;
        }

        Command::Id { tag } => {
            println!("{}", Image::new(tag).id(&runtime)?);
        }

        Command::ParentId { tag } => {
            println!("{}", Image::new(tag).parent_id(&runtime)?);
        }

        Command::Login {
            registry,
            username,
            password_stdin,
        } => {
            let password = read_password(password_stdin)?;
            runtime.login(&Login::new(registry, username, password))?;
            println!("Login succeed");
        }
    }
    Ok(())
}
