//! docker-cmd
//! ==========
//!
//! Parse container image tags into the pieces an Artifactory docker
//! repository needs, and drive the `docker` CLI to push and inspect them.
//!
//! - [Image] splits a tag such as `registry.io/group/app:1.2` into
//!   [Image::name], [Image::path] and [Image::registry].
//! - [command::DockerCommand] describes `push`, `images`, `inspect` and
//!   `login` invocations without running anything.
//! - [executor::Executor] runs those descriptions, [Runtime] ties it to a
//!   [config::Config].

pub mod command;
pub mod config;
pub mod error;
pub mod executor;

mod image_name;
mod registry;
mod runtime;

pub use image_name::Image;
pub use registry::resolve_registry;
pub use runtime::Runtime;
