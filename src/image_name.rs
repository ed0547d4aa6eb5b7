use crate::{error::*, executor::Executor, registry::resolve_registry, runtime::Runtime};
use std::{convert::Infallible, fmt, str::FromStr};

const DEFAULT_TAG: &str = "latest";

/// Container image reference, e.g. `registry.io/group/app:1.2`
///
/// Only the raw tag is stored. [Image::name], [Image::path] and
/// [Image::registry] are derived from it on every call.
///
/// ```
/// use docker_cmd::Image;
///
/// let image = Image::new("registry.io/group/app:1.2");
/// assert_eq!(image.name(), "app:1.2");
/// assert_eq!(image.path(), "group/app/1.2");
/// assert_eq!(image.registry().unwrap(), "registry.io/group");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    tag: String,
}

impl Image {
    pub fn new(tag: impl Into<String>) -> Self {
        Image { tag: tag.into() }
    }

    /// Raw tag as given, never normalized
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Image name with its tag, `:latest` is appended if no tag is given
    pub fn name(&self) -> String {
        let tag = self.tag.as_str();
        let last_slash = tag.rfind('/');
        let start = last_slash.map_or(0, |i| i + 1);
        match (tag.rfind(':'), last_slash) {
            (None, _) => format!("{}:{}", &tag[start..], DEFAULT_TAG),
            // Colon belongs to `host:port`, not to the tag
            (Some(colon), Some(slash)) if colon < slash => {
                format!("{}:{}", &tag[start..], DEFAULT_TAG)
            }
            _ => tag[start..].to_string(),
        }
    }

    /// Relative path of the image in Artifactory, e.g. `group/app/1.2`
    pub fn path(&self) -> String {
        let tag = self.tag.as_str();
        let first_slash = tag.find('/');
        let start = first_slash.map_or(0, |i| i + 1);
        match (tag.rfind(':'), first_slash) {
            (None, _) => join(&tag[start..], DEFAULT_TAG),
            (Some(colon), Some(slash)) if colon < slash => join(&tag[start..], DEFAULT_TAG),
            (Some(colon), _) => join(&tag[start..colon], &tag[colon + 1..]),
        }
    }

    /// Registry host resolved by [resolve_registry]
    pub fn registry(&self) -> Result<&str> {
        resolve_registry(&self.tag)
    }

    /// Push the image with `docker push`
    pub fn push<E: Executor>(&self, runtime: &Runtime<E>) -> Result<()> {
        runtime.push(self)
    }

    /// Full image ID in the local runtime, empty if the image is unknown
    pub fn id<E: Executor>(&self, runtime: &Runtime<E>) -> Result<String> {
        runtime.image_id(self)
    }

    /// Parent image ID, empty for a base image
    pub fn parent_id<E: Executor>(&self, runtime: &Runtime<E>) -> Result<String> {
        runtime.parent_id(self)
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

impl From<&str> for Image {
    fn from(tag: &str) -> Self {
        Image::new(tag)
    }
}

impl From<String> for Image {
    fn from(tag: String) -> Self {
        Image::new(tag)
    }
}

impl FromStr for Image {
    type Err = Infallible;
    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Image::new(tag))
    }
}

/// Join two path fragments with exactly one `/` between non-empty segments
fn join(head: &str, tail: &str) -> String {
    head.split('/')
        .chain(tail.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name() {
        assert_eq!(Image::new("registry.io/group/app:1.2").name(), "app:1.2");
        assert_eq!(Image::new("registry.io/group/app").name(), "app:latest");
        assert_eq!(Image::new("localhost:5000/app").name(), "app:latest");
        assert_eq!(Image::new("localhost:5000/app:2").name(), "app:2");
    }

    #[test]
    fn name_without_slash() {
        assert_eq!(Image::new("alpine").name(), "alpine:latest");
        assert_eq!(Image::new("ubuntu:20.04").name(), "ubuntu:20.04");
        assert_eq!(Image::new("").name(), ":latest");
    }

    #[test]
    fn path() {
        assert_eq!(Image::new("registry.io/group/app:1.2").path(), "group/app/1.2");
        assert_eq!(Image::new("registry.io/group/app").path(), "group/app/latest");
        assert_eq!(Image::new("registry.io/app:1.2").path(), "app/1.2");
        assert_eq!(Image::new("localhost:5000/app").path(), "app/latest");
        assert_eq!(Image::new("localhost:5000/group/app:3").path(), "group/app/3");
    }

    #[test]
    fn path_without_slash() {
        assert_eq!(Image::new("alpine").path(), "alpine/latest");
        assert_eq!(Image::new("ubuntu:20.04").path(), "ubuntu/20.04");
    }

    #[test]
    fn path_collapses_separators() {
        assert_eq!(Image::new("registry.io//group/app/:1.2").path(), "group/app/1.2");
        assert_eq!(Image::new("registry.io/app:").path(), "app");
    }

    #[test]
    fn registry() -> Result<()> {
        assert_eq!(Image::new("registry.io/app:1.2").registry()?, "registry.io");
        assert_eq!(
            Image::new("registry.io/group/app:1.2").registry()?,
            "registry.io/group"
        );
        assert!(matches!(
            Image::new("no-slash-here").registry(),
            Err(Error::InvalidReference(_))
        ));
        Ok(())
    }

    #[test]
    fn tag_is_kept_verbatim() {
        let raw = " registry.io/Group/App:1.2 ";
        let image: Image = raw.parse().unwrap();
        assert_eq!(image.tag(), raw);
        assert_eq!(image.to_string(), raw);
        assert_eq!(Image::from(raw.to_string()), Image::from(raw));
    }
}
