use url::Url;

use super::{AcquireError, REMOTE_PLACEHOLDER_NAME};

const BLOB_HOST: &str = "github.com";
const RAW_HOST: &str = "raw.githubusercontent.com";

/// Fetches a URL body as text.
pub trait Fetcher: Send + Sync {
    /// # Errors
    /// Returns [`AcquireError::HttpFailure`] for non-success statuses and
    /// [`AcquireError::TransportFailure`] when no response arrives.
    fn fetch(&self, url: &str) -> Result<String, AcquireError>;
}

/// Blocking HTTP fetcher. No timeout beyond the transport's own, no retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("inkview/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, AcquireError> {
        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::Status(status, _) => AcquireError::HttpFailure {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => AcquireError::TransportFailure {
                url: url.to_string(),
                reason: transport.to_string(),
            },
        })?;
        response
            .into_string()
            .map_err(|err| AcquireError::TransportFailure {
                url: url.to_string(),
                reason: err.to_string(),
            })
    }
}

/// Rewrite a GitHub "blob" viewer URL to its raw-content equivalent.
///
/// Only the first occurrence of the host and of `/blob/` is replaced. Any
/// other URL comes back unchanged.
pub fn to_raw_url(url: &str) -> String {
    let is_blob_view = Url::parse(url)
        .ok()
        .is_some_and(|parsed| parsed.host_str() == Some(BLOB_HOST))
        && url.contains("/blob/");
    if !is_blob_view {
        return url.to_string();
    }
    url.replacen(BLOB_HOST, RAW_HOST, 1).replacen("/blob/", "/", 1)
}

/// Document name for a fetched URL: its last path segment.
pub fn filename_from_url(url: &str) -> String {
    let from_parsed = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
    });
    let segment = from_parsed.unwrap_or_else(|| {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().unwrap_or_default().to_string()
    });
    if segment.is_empty() {
        REMOTE_PLACEHOLDER_NAME.to_string()
    } else {
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_blob_url_is_rewritten() {
        assert_eq!(
            to_raw_url("https://github.com/user/repo/blob/main/README.md"),
            "https://raw.githubusercontent.com/user/repo/main/README.md"
        );
    }

    #[test]
    fn test_other_hosts_pass_through() {
        for url in [
            "https://example.com/user/repo/blob/main/README.md",
            "https://raw.githubusercontent.com/user/repo/main/README.md",
            "https://gist.github.com/user/blob/abc",
        ] {
            assert_eq!(to_raw_url(url), url);
        }
    }

    #[test]
    fn test_github_non_blob_url_passes_through() {
        let url = "https://github.com/user/repo/tree/main/docs";
        assert_eq!(to_raw_url(url), url);
    }

    #[test]
    fn test_only_first_blob_segment_is_rewritten() {
        assert_eq!(
            to_raw_url("https://github.com/u/r/blob/main/blob/notes.md"),
            "https://raw.githubusercontent.com/u/r/main/blob/notes.md"
        );
    }

    #[test]
    fn test_filename_strips_query_and_fragment() {
        assert_eq!(
            filename_from_url("https://example.com/docs/guide.md?token=abc#setup"),
            "guide.md"
        );
    }

    #[test]
    fn test_filename_defaults_without_segment() {
        assert_eq!(filename_from_url("https://example.com/"), REMOTE_PLACEHOLDER_NAME);
        assert_eq!(filename_from_url("https://example.com"), REMOTE_PLACEHOLDER_NAME);
        assert_eq!(filename_from_url("https://example.com/docs/"), REMOTE_PLACEHOLDER_NAME);
    }

    #[test]
    fn test_filename_from_unparseable_url() {
        assert_eq!(filename_from_url("not a url/notes.md?x=1"), "notes.md");
    }
}
