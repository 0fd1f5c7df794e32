//! Getting a document into the viewer.
//!
//! Three sources feed the same pipeline: a local file, files dropped onto the
//! terminal, and a remote URL. Each request goes through [`validate`]
//! synchronously (extension/media-type check, URL rewriting) and produces a
//! [`Job`]; the job's blocking part (file read or HTTP fetch) runs on a worker
//! owned by [`Acquirer`].
//!
//! ```text
//! Idle --request--> Validating --ok--> Loaded(Document)
//!                        |
//!                        +----err--> Rejected(AcquireError) --> Idle
//! ```

mod remote;
mod worker;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::document::Document;

pub use remote::{Fetcher, HttpFetcher, filename_from_url, to_raw_url};
pub use worker::{AcquireState, Acquirer, Outcome};

/// Placeholder name for URLs without a final path segment.
pub const REMOTE_PLACEHOLDER_NAME: &str = "remote-file.md";

const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown"];
const MARKDOWN_MEDIA_TYPES: &[&str] = &["text/markdown", "text/x-markdown"];

/// Why an acquisition failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("{name} is not a valid Markdown (.md) file")]
    InvalidFileType { name: String },
    #[error("could not reach {url}: {reason}")]
    TransportFailure { url: String, reason: String },
    #[error("{url} answered with HTTP status {status}")]
    HttpFailure { url: String, status: u16 },
    #[error("failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

impl AcquireError {
    /// Text for the blocking notice shown to the user.
    pub fn notice(&self) -> String {
        match self {
            Self::InvalidFileType { .. } => {
                format!("{self}.\n\nPlease choose a .md or .markdown file.")
            }
            Self::TransportFailure { .. } | Self::HttpFailure { .. } => format!(
                "Failed to load Markdown from URL.\n\n{self}\n\nNote: the server may restrict \
                 cross-origin or non-browser access to this file. Try a raw GitHub URL or a \
                 server that allows it."
            ),
            Self::Io { .. } => format!("Failed to open the file.\n\n{self}"),
        }
    }

    /// HTTP status for [`AcquireError::HttpFailure`].
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpFailure { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A file offered by the user, before anything is read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub path: PathBuf,
    pub name: String,
    /// Declared media type, when the host knows one.
    pub media_type: Option<String>,
}

impl FileSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        Self {
            path,
            name,
            media_type: None,
        }
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// One user action that should produce a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionRequest {
    LocalFile(FileSource),
    DroppedFiles(Vec<FileSource>),
    RemoteUrl(String),
}

impl AcquisitionRequest {
    /// Interpret typed or pasted input: http(s) URLs are fetched, anything
    /// else is treated as a local path.
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if looks_like_url(input) {
            Some(Self::RemoteUrl(input.to_string()))
        } else {
            Some(Self::LocalFile(FileSource::from_path(input)))
        }
    }
}

pub fn looks_like_url(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The blocking half of an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    ReadFile(FileSource),
    Fetch {
        /// URL as the user gave it; the document name comes from here.
        requested: String,
        /// URL actually fetched, after raw-host rewriting.
        fetch_url: String,
    },
}

impl Job {
    /// Short description for loading text and logs.
    pub fn label(&self) -> &str {
        match self {
            Self::ReadFile(source) => &source.name,
            Self::Fetch { fetch_url, .. } => fetch_url,
        }
    }

    /// Perform the read or fetch.
    ///
    /// # Errors
    /// Returns [`AcquireError::Io`] when the file cannot be read, and
    /// [`AcquireError::HttpFailure`]/[`AcquireError::TransportFailure`] when
    /// the fetch fails.
    pub fn run(self, fetcher: &dyn Fetcher) -> Result<Document, AcquireError> {
        match self {
            Self::ReadFile(source) => read_file(&source),
            Self::Fetch {
                requested,
                fetch_url,
            } => {
                let content = fetcher.fetch(&fetch_url)?;
                Ok(Document::new(filename_from_url(&requested), content))
            }
        }
    }
}

/// Check a request and turn it into a job.
///
/// Returns `Ok(None)` for requests that carry nothing to load (an empty drop,
/// a blank URL).
///
/// # Errors
/// Returns [`AcquireError::InvalidFileType`] for files that are not markdown;
/// nothing is read from them.
pub fn validate(request: AcquisitionRequest) -> Result<Option<Job>, AcquireError> {
    match request {
        AcquisitionRequest::LocalFile(source) => accept_file(source).map(Some),
        AcquisitionRequest::DroppedFiles(files) => match files.into_iter().next() {
            Some(source) => accept_file(source).map(Some),
            None => Ok(None),
        },
        AcquisitionRequest::RemoteUrl(url) => {
            let requested = url.trim();
            if requested.is_empty() {
                return Ok(None);
            }
            Ok(Some(Job::Fetch {
                requested: requested.to_string(),
                fetch_url: to_raw_url(requested),
            }))
        }
    }
}

fn accept_file(source: FileSource) -> Result<Job, AcquireError> {
    if is_markdown_file(&source) {
        Ok(Job::ReadFile(source))
    } else {
        Err(AcquireError::InvalidFileType { name: source.name })
    }
}

/// Markdown by name suffix or by declared media type.
pub fn is_markdown_file(source: &FileSource) -> bool {
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|ext| source.name.ends_with(ext))
        || source.media_type.as_deref().is_some_and(|media_type| {
            let essence = media_type.split(';').next().unwrap_or_default().trim();
            MARKDOWN_MEDIA_TYPES
                .iter()
                .any(|known| essence.eq_ignore_ascii_case(known))
        })
}

fn read_file(source: &FileSource) -> Result<Document, AcquireError> {
    let bytes = std::fs::read(&source.path).map_err(|err| io_error(&source.path, &err))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(Document::new(source.name.clone(), content))
}

fn io_error(path: &Path, err: &std::io::Error) -> AcquireError {
    AcquireError::Io {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
