use crate::error::{ReleaseError, Result};
use git2::Repository;
use std::path::Path;

/// Name of the remote the pipeline publishes from.
pub const ORIGIN: &str = "origin";

/// Name of the repository behind the `origin` remote of the repository
/// containing `path`.
///
/// Works for both URL and scp-like remotes:
/// `https://host/org/service.git` and `git@host:org/service` both give
/// `service`.
pub fn origin_repo_name<P: AsRef<Path>>(path: P) -> Result<String> {
    let repo = Repository::discover(path)?;
    let remote = repo
        .find_remote(ORIGIN)
        .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", ORIGIN, e)))?;

    let url = remote
        .url()
        .ok_or_else(|| ReleaseError::remote(format!("Remote '{}' has no UTF-8 url", ORIGIN)))?;

    tracing::debug!(url, "resolved origin url");

    repo_name_from_url(url)
        .ok_or_else(|| ReleaseError::remote(format!("Cannot find repository name in '{}'", url)))
}

/// Last path segment of a remote url with any `.git` suffix removed
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() || name.contains('@') {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name_from_https_url() {
        assert_eq!(
            repo_name_from_url("https://github.com/acme/billing-service.git").as_deref(),
            Some("billing-service")
        );
        assert_eq!(
            repo_name_from_url("https://dev.azure.com/acme/project/_git/api_gateway").as_deref(),
            Some("api_gateway")
        );
    }

    #[test]
    fn test_repo_name_from_scp_url() {
        assert_eq!(
            repo_name_from_url("git@github.com:acme/billing-service.git").as_deref(),
            Some("billing-service")
        );
        assert_eq!(repo_name_from_url("git@host:service").as_deref(), Some("service"));
    }

    #[test]
    fn test_repo_name_trailing_slash() {
        assert_eq!(
            repo_name_from_url("https://example.com/acme/tools/").as_deref(),
            Some("tools")
        );
    }

    #[test]
    fn test_repo_name_rejects_empty() {
        assert_eq!(repo_name_from_url(""), None);
        assert_eq!(repo_name_from_url(".git"), None);
        assert_eq!(repo_name_from_url("git@host:"), None);
    }

    #[test]
    fn test_origin_repo_name_from_initialised_repo() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote(ORIGIN, "https://example.com/acme/widget.git")
            .unwrap();

        assert_eq!(origin_repo_name(dir.path()).unwrap(), "widget");
    }

    #[test]
    fn test_origin_repo_name_without_origin() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        let err = origin_repo_name(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::Remote(_)));
    }
}
