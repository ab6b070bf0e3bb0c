//! Resolving a source descriptor into a loaded `RdfGraph`.
//!
//! # Example
//!
//! ```ignore
//! let source: Source = "https://example.org/data.ttl".parse()?;
//! let graph = SourceLoader::new()
//!     .with_credentials(Credentials::new("user", "secret"))
//!     .load(&source)?;
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use crate::error::LoadError;
use crate::graph::RdfGraph;
use crate::rdf_io::{parse_graph, RdfFormat};

/// Default timeout for remote requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where an RDF document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(Url),
}

impl Source {
    /// Classifies a descriptor: `http://` and `https://` prefixes denote a
    /// URL, anything else a local path.
    pub fn parse(descriptor: &str) -> Result<Self, LoadError> {
        if is_url(descriptor) {
            Ok(Source::Url(Url::parse(descriptor)?))
        } else {
            Ok(Source::File(PathBuf::from(descriptor)))
        }
    }
}

impl FromStr for Source {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::parse(s)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

fn is_url(descriptor: &str) -> bool {
    let lower = descriptor.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// HTTP basic credentials for remote sources.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials from optional parts. Both or neither must be given.
    pub fn from_parts(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Option<Self>, LoadError> {
        match (username, password) {
            (Some(username), Some(password)) => Ok(Some(Self::new(username, password))),
            (None, None) => Ok(None),
            _ => Err(LoadError::IncompleteCredentials),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Settings that apply to every load.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Timeout for the whole HTTP exchange.
    pub timeout: Duration,
    pub user_agent: String,
    /// Whether URL sources may be fetched at all.
    pub allow_remote: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("rdf-hash/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_remote: true,
        }
    }
}

/// Builder for loading RDF graphs from files and URLs.
///
/// Files need a format, given explicitly or inferred from the extension.
/// Remote documents pick their format from the `Content-Type` header, with
/// the explicit format as a fallback.
///
/// # Example
///
/// ```ignore
/// let graph = SourceLoader::new()
///     .with_base_iri("http://example.org/test1")
///     .with_format(RdfFormat::Turtle)
///     .load(&Source::File("supersimple.ttl".into()))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    config: LoaderConfig,
    base_iri: Option<String>,
    format: Option<RdfFormat>,
    credentials: Option<Credentials>,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the base IRI used to resolve relative IRIs.
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Sets the syntax of the source, overriding extension inference.
    pub fn with_format(mut self, format: RdfFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets whether URL sources may be fetched.
    pub fn allow_remote(mut self, allow: bool) -> Self {
        self.config.allow_remote = allow;
        self
    }

    /// Loads the source into a graph.
    ///
    /// Either the whole document is parsed or an error is returned; a
    /// partially read graph is never handed out.
    pub fn load(&self, source: &Source) -> Result<RdfGraph, LoadError> {
        log::info!("Loading graph from {}", source);
        match source {
            Source::File(path) => self.load_file(path),
            Source::Url(url) => self.load_url(url),
        }
    }

    fn load_file(&self, path: &Path) -> Result<RdfGraph, LoadError> {
        let metadata =
            std::fs::metadata(path).map_err(|_| LoadError::SourceNotFound(path.to_path_buf()))?;
        if !metadata.is_file() {
            return Err(LoadError::SourceNotFound(path.to_path_buf()));
        }

        let format = match self.format {
            Some(format) => format,
            None => RdfFormat::from_path(path).ok_or_else(|| {
                LoadError::UnknownFormat(format!(
                    "cannot infer a format from {}",
                    path.display()
                ))
            })?,
        };

        let base = match &self.base_iri {
            Some(base) => base.clone(),
            None => file_base_iri(path)?,
        };

        let file = File::open(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                LoadError::SourceNotFound(path.to_path_buf())
            }
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        log::debug!("Parsing {} as {} with base {}", path.display(), format, base);
        parse_graph(BufReader::new(file), format, Some(&base))
    }

    fn load_url(&self, url: &Url) -> Result<RdfGraph, LoadError> {
        if !self.config.allow_remote {
            return Err(LoadError::RemoteDisabled(url.to_string()));
        }

        let fetch_failed = |e: reqwest::Error| LoadError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let client = reqwest::blocking::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(self.config.timeout)
            .build()
            .map_err(fetch_failed)?;

        let mut request = client
            .get(url.clone())
            .header(ACCEPT, RdfFormat::accept_header());
        if let Some(credentials) = &self.credentials {
            log::debug!("Authenticating as {}", credentials.username());
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().map_err(fetch_failed)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LoadError::Unauthorized {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(LoadError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let format = match content_type.as_deref().and_then(RdfFormat::from_media_type) {
            Some(format) => format,
            None => match self.format {
                Some(format) => {
                    log::warn!(
                        "Content type {:?} from {} is not RDF, falling back to {}",
                        content_type,
                        url,
                        format
                    );
                    format
                }
                None => {
                    return Err(LoadError::UnsupportedContentType(
                        content_type.unwrap_or_else(|| "<missing>".to_string()),
                    ))
                }
            },
        };

        let base = match &self.base_iri {
            Some(base) => base.clone(),
            None => response.url().to_string(),
        };

        let body = response.bytes().map_err(fetch_failed)?;
        log::debug!("Fetched {} bytes from {} as {}", body.len(), url, format);
        parse_graph(&body[..], format, Some(&base))
    }
}

fn file_base_iri(path: &Path) -> Result<String, LoadError> {
    let absolute = std::fs::canonicalize(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| LoadError::InvalidBaseIri(absolute.display().to_string()))
}
