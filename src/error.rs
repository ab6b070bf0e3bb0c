//! Error types for loading RDF graphs.
//!
//! The canonical encoder and digest computer are total over a loaded graph,
//! so every failure mode lives at the loading boundary.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while turning a source descriptor into an `RdfGraph`.
#[derive(Debug)]
pub enum LoadError {
    /// The file does not exist, is a directory, or cannot be read.
    SourceNotFound(PathBuf),
    /// Reading a local file failed after it was found.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The source descriptor looked like a URL but could not be parsed.
    InvalidUrl(url::ParseError),
    /// Remote loading is switched off in the loader configuration.
    RemoteDisabled(String),
    /// The HTTP request could not be sent or the body could not be read.
    FetchFailed { url: String, reason: String },
    /// The server refused the request (401 or 403).
    Unauthorized { url: String, status: u16 },
    /// The server answered with another non-success status.
    Http { url: String, status: u16 },
    /// The response media type does not map to a supported RDF syntax.
    UnsupportedContentType(String),
    /// A format name could not be resolved to a supported RDF syntax.
    UnknownFormat(String),
    /// Only one of username and password was supplied.
    IncompleteCredentials,
    /// The base IRI is not a valid IRI.
    InvalidBaseIri(String),
    /// The RDF content could not be parsed.
    ParseError(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::SourceNotFound(path) => {
                write!(f, "Source not found or not readable: {}", path.display())
            }
            LoadError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            LoadError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            LoadError::RemoteDisabled(url) => {
                write!(f, "Remote loading is disabled, refusing {}", url)
            }
            LoadError::FetchFailed { url, reason } => {
                write!(f, "Failed to fetch {}: {}", url, reason)
            }
            LoadError::Unauthorized { url, status } => {
                write!(f, "Not authorized to fetch {} (HTTP {})", url, status)
            }
            LoadError::Http { url, status } => {
                write!(f, "Fetching {} returned HTTP {}", url, status)
            }
            LoadError::UnsupportedContentType(media_type) => {
                write!(f, "Unsupported content type: {}", media_type)
            }
            LoadError::UnknownFormat(name) => write!(f, "Unknown RDF format: {}", name),
            LoadError::IncompleteCredentials => write!(
                f,
                "You must provide both --username and --password, or neither"
            ),
            LoadError::InvalidBaseIri(msg) => write!(f, "Invalid base IRI: {}", msg),
            LoadError::ParseError(msg) => write!(f, "Failed to parse RDF: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::InvalidUrl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<url::ParseError> for LoadError {
    fn from(e: url::ParseError) -> Self {
        LoadError::InvalidUrl(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::SourceNotFound(PathBuf::from("/no/such/file.ttl"));
        assert!(err.to_string().contains("/no/such/file.ttl"));

        let err = LoadError::Unauthorized {
            url: "http://example.org/graph".to_string(),
            status: 401,
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("http://example.org/graph"));
    }

    #[test]
    fn test_incomplete_credentials_message() {
        assert_eq!(
            LoadError::IncompleteCredentials.to_string(),
            "You must provide both --username and --password, or neither"
        );
    }

    #[test]
    fn test_url_error_to_load_error() {
        let url_err = url::Url::parse("http://[::1").unwrap_err();
        let err: LoadError = url_err.into();
        assert!(matches!(err, LoadError::InvalidUrl(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_has_source() {
        let err = LoadError::Io {
            path: PathBuf::from("graph.ttl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
