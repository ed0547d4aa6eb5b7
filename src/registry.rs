use crate::error::*;

/// Resolve the registry part of a qualified image tag
///
/// The registry cannot be told apart from the repository path by the string
/// alone, so this counts slashes:
///
/// - One slash, e.g. `registry.io/app:1.2`, is a reverse proxy where the host
///   owns the routing, and the registry is `registry.io`.
/// - Two or more, e.g. `registry.io/group/app:1.2`, is either a proxy-less
///   setup or a reverse proxy with a namespace, and the registry is
///   everything before the second slash, `registry.io/group`.
///
/// ```
/// use docker_cmd::resolve_registry;
///
/// assert_eq!(resolve_registry("registry.io/app:1.2").unwrap(), "registry.io");
/// assert_eq!(resolve_registry("registry.io/group/app:1.2").unwrap(), "registry.io/group");
/// assert!(resolve_registry("app:1.2").is_err());
/// ```
pub fn resolve_registry(tag: &str) -> Result<&str> {
    let first = tag
        .find('/')
        .ok_or_else(|| Error::InvalidReference(tag.to_string()))?;
    match tag[first + 1..].find('/') {
        Some(second) => Ok(&tag[..first + 1 + second]),
        None => Ok(&tag[..first]),
    }
}
