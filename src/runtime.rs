use crate::{
    command::{DockerCommand, Login},
    config::Config,
    error::*,
    executor::{Executor, ProcessExecutor},
    Image,
};

/// Container runtime CLI bound to an [Executor]
///
/// ```no_run
/// use docker_cmd::{Image, Runtime};
///
/// let runtime = Runtime::load()?;
/// let image = Image::new("registry.io/docker-local/app:1.2");
/// image.push(&runtime)?;
/// println!("{}", image.id(&runtime)?);
/// # Ok::<(), docker_cmd::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Runtime<E = ProcessExecutor> {
    config: Config,
    executor: E,
}

impl Runtime<ProcessExecutor> {
    /// Spawn real processes, with the program taken from [Config::load]
    pub fn load() -> Result<Self> {
        Ok(Self::new(Config::load()?, ProcessExecutor))
    }
}

impl<E: Executor> Runtime<E> {
    pub fn new(config: Config, executor: E) -> Self {
        Runtime { config, executor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run a command, passing its output through
    pub fn run(&self, command: &DockerCommand) -> Result<()> {
        self.executor
            .run(&command.describe(&self.config.program))
    }

    /// Run a command and return its standard output without surrounding newlines
    pub fn output(&self, command: &DockerCommand) -> Result<String> {
        let out = self
            .executor
            .run_output(&command.describe(&self.config.program))?;
        let out = String::from_utf8(out)?;
        Ok(out.trim_matches(|c| c == '\n' || c == '\r').to_string())
    }

    pub fn push(&self, image: &Image) -> Result<()> {
        self.run(&DockerCommand::Push(image.clone()))
    }

    pub fn image_id(&self, image: &Image) -> Result<String> {
        self.output(&DockerCommand::ImageId(image.clone()))
    }

    pub fn parent_id(&self, image: &Image) -> Result<String> {
        self.output(&DockerCommand::ParentId(image.clone()))
    }

    pub fn login(&self, login: &Login) -> Result<()> {
        self.run(&DockerCommand::Login(login.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::PASSWORD_ENV, executor::testing::FakeExecutor};

    fn runtime(executor: FakeExecutor) -> Runtime<FakeExecutor> {
        Runtime::new(Config::default(), executor)
    }

    #[test]
    fn push() -> Result<()> {
        let rt = runtime(FakeExecutor::default());
        Image::new("registry.io/group/app:1.2").push(&rt)?;
        let calls = rt.executor().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "docker push registry.io/group/app:1.2");
        Ok(())
    }

    #[test]
    fn image_id_is_trimmed() -> Result<()> {
        let rt = runtime(FakeExecutor::default().reply("sha256:0123abcd\n"));
        let id = Image::new("registry.io/app:1.2").id(&rt)?;
        assert_eq!(id, "sha256:0123abcd");
        assert_eq!(
            rt.executor().calls.borrow()[0].args,
            vec!["images", "--format", "{{.ID}}", "--no-trunc", "registry.io/app:1.2"]
        );
        Ok(())
    }

    #[test]
    fn unknown_image_has_empty_id() -> Result<()> {
        let rt = runtime(FakeExecutor::default().reply(""));
        assert_eq!(Image::new("registry.io/app").id(&rt)?, "");
        Ok(())
    }

    #[test]
    fn parent_id() -> Result<()> {
        let rt = runtime(
            FakeExecutor::default()
                .reply("sha256:beef\r\n")
                .reply("\n"),
        );
        let image = Image::new("registry.io/app:1.2");
        assert_eq!(image.parent_id(&rt)?, "sha256:beef");
        // Base image has no parent
        assert_eq!(image.parent_id(&rt)?, "");
        Ok(())
    }

    #[test]
    fn execution_error_is_propagated() {
        let rt = runtime(FakeExecutor::default().fail(1, "No such image"));
        match Image::new("registry.io/app").parent_id(&rt) {
            Err(e @ Error::Execution { .. }) => {
                assert_eq!(e.exit_status(), Some(1));
                assert!(e.to_string().contains("No such image"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_utf8_output() {
        let rt = runtime(FakeExecutor::default());
        rt.executor()
            .replies
            .borrow_mut()
            .push_back(Ok(vec![0xff, 0xfe]));
        assert!(matches!(
            rt.image_id(&Image::new("registry.io/app")),
            Err(Error::InvalidOutput(_))
        ));
    }

    #[test]
    fn login_uses_configured_program() -> Result<()> {
        let rt = Runtime::new(
            Config {
                program: "podman".to_string(),
            },
            FakeExecutor::default(),
        );
        rt.login(&Login::new("registry.io", "admin", "secret"))?;
        let calls = rt.executor().calls.borrow();
        assert!(calls[0].args[1].contains("podman login registry.io --username=admin"));
        assert_eq!(calls[0].env[PASSWORD_ENV], "secret");
        Ok(())
    }

    #[test]
    fn borrowed_executor() -> Result<()> {
        let fake = FakeExecutor::default().reply("sha256:cafe\n");
        let rt = Runtime::new(Config::default(), &fake);
        assert_eq!(Image::new("registry.io/app").id(&rt)?, "sha256:cafe");
        rt.push(&Image::new("registry.io/app"))?;
        // Calls are visible through the original executor after the runtime is gone
        drop(rt);
        let calls = fake.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].args, vec!["push", "registry.io/app"]);
        Ok(())
    }
}
