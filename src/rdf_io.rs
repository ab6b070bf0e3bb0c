//! RDF parsing into `RdfGraph`.
//!
//! This module maps format names, file extensions and HTTP media types onto
//! the syntaxes supported by the oxrdfio library and parses documents into
//! an `RdfGraph`.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use oxrdf::{Quad, Triple};
use oxrdfio::{RdfFormat as OxRdfFormat, RdfParser};

use crate::error::LoadError;
use crate::graph::RdfGraph;

/// Supported RDF serialization formats.
///
/// This enum wraps oxrdfio's format types. Named graphs in the quad formats
/// are flattened into a single graph when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfFormat {
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// N-Quads format (.nq)
    NQuads,
    /// TriG format (.trig)
    TriG,
    /// Notation3 format (.n3)
    N3,
    /// RDF/XML format (.rdf, .owl, .xml)
    RdfXml,
}

impl RdfFormat {
    /// Every supported format, in `Accept` header preference order.
    pub const ALL: [RdfFormat; 6] = [
        RdfFormat::Turtle,
        RdfFormat::NTriples,
        RdfFormat::NQuads,
        RdfFormat::TriG,
        RdfFormat::RdfXml,
        RdfFormat::N3,
    ];

    /// Converts this RdfFormat to the corresponding oxrdfio format.
    fn to_oxrdf_format(self) -> OxRdfFormat {
        match self {
            RdfFormat::Turtle => OxRdfFormat::Turtle,
            RdfFormat::NTriples => OxRdfFormat::NTriples,
            RdfFormat::NQuads => OxRdfFormat::NQuads,
            RdfFormat::TriG => OxRdfFormat::TriG,
            RdfFormat::N3 => OxRdfFormat::N3,
            RdfFormat::RdfXml => OxRdfFormat::RdfXml,
        }
    }

    fn from_oxrdf_format(format: OxRdfFormat) -> Option<Self> {
        match format {
            OxRdfFormat::Turtle => Some(RdfFormat::Turtle),
            OxRdfFormat::NTriples => Some(RdfFormat::NTriples),
            OxRdfFormat::NQuads => Some(RdfFormat::NQuads),
            OxRdfFormat::TriG => Some(RdfFormat::TriG),
            OxRdfFormat::N3 => Some(RdfFormat::N3),
            OxRdfFormat::RdfXml => Some(RdfFormat::RdfXml),
            _ => None,
        }
    }

    /// The canonical media type of the format.
    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::NQuads => "application/n-quads",
            RdfFormat::TriG => "application/trig",
            RdfFormat::N3 => "text/n3",
            RdfFormat::RdfXml => "application/rdf+xml",
        }
    }

    /// Looks up a format by name.
    ///
    /// Accepts the usual syntax names (`TURTLE`, `N-TRIPLES`, `RDF/XML`, ...),
    /// their common abbreviations, file extensions and media types. Matching
    /// is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TURTLE" | "TTL" => Some(RdfFormat::Turtle),
            "N-TRIPLES" | "N-TRIPLE" | "NTRIPLES" | "NTRIPLE" | "NT" => Some(RdfFormat::NTriples),
            "N-QUADS" | "NQUADS" | "NQ" => Some(RdfFormat::NQuads),
            "TRIG" => Some(RdfFormat::TriG),
            "N3" | "NOTATION3" => Some(RdfFormat::N3),
            "RDF/XML" | "RDFXML" | "RDF" | "XML" | "OWL" => Some(RdfFormat::RdfXml),
            _ if normalized.contains('/') => Self::from_media_type(name),
            _ => None,
        }
    }

    /// Looks up a format from an HTTP `Content-Type` value.
    ///
    /// Parameters such as `charset` are ignored.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/turtle" | "application/x-turtle" | "application/turtle" => Some(RdfFormat::Turtle),
            "application/n-triples" | "text/plain" => Some(RdfFormat::NTriples),
            "application/n-quads" | "text/x-nquads" => Some(RdfFormat::NQuads),
            "application/trig" => Some(RdfFormat::TriG),
            "text/n3" => Some(RdfFormat::N3),
            "application/rdf+xml" | "application/xml" | "text/xml" => Some(RdfFormat::RdfXml),
            _ => OxRdfFormat::from_media_type(&essence).and_then(Self::from_oxrdf_format),
        }
    }

    /// Looks up a format from a file extension, without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "nq" => Some(RdfFormat::NQuads),
            "trig" => Some(RdfFormat::TriG),
            "n3" => Some(RdfFormat::N3),
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            other => OxRdfFormat::from_extension(other).and_then(Self::from_oxrdf_format),
        }
    }

    /// Infers the format from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }

    /// Builds an `Accept` header value listing every supported media type.
    pub fn accept_header() -> String {
        Self::ALL
            .iter()
            .map(|format| format.media_type())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RdfFormat::Turtle => "Turtle",
            RdfFormat::NTriples => "N-Triples",
            RdfFormat::NQuads => "N-Quads",
            RdfFormat::TriG => "TriG",
            RdfFormat::N3 => "N3",
            RdfFormat::RdfXml => "RDF/XML",
        };
        f.write_str(name)
    }
}

impl FromStr for RdfFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LoadError::UnknownFormat(s.to_string()))
    }
}

/// Parses RDF from a reader into an `RdfGraph`.
///
/// # Arguments
///
/// * `reader` - The RDF document
/// * `format` - The syntax of the document
/// * `base` - Optional base IRI for resolving relative IRIs
///
/// # Errors
///
/// Returns `LoadError::InvalidBaseIri` if the base is not an IRI and
/// `LoadError::ParseError` if the document is malformed.
pub fn parse_graph<R: Read>(
    reader: R,
    format: RdfFormat,
    base: Option<&str>,
) -> Result<RdfGraph, LoadError> {
    let mut parser = RdfParser::from_format(format.to_oxrdf_format());

    if let Some(base_iri) = base {
        parser = parser
            .with_base_iri(base_iri)
            .map_err(|e| LoadError::InvalidBaseIri(format!("{}: {}", base_iri, e)))?;
    }

    let mut graph = RdfGraph::new();
    for quad in parser.for_reader(reader) {
        let quad: Quad = quad.map_err(|e| LoadError::ParseError(e.to_string()))?;
        // Graph names are dropped; all triples land in one graph.
        graph.insert(Triple {
            subject: quad.subject,
            predicate: quad.predicate,
            object: quad.object,
        });
    }

    log::debug!("Parsed {} distinct triples as {}", graph.len(), format);
    Ok(graph)
}

/// Parses RDF from a string into an `RdfGraph`.
pub fn parse_str(input: &str, format: RdfFormat, base: Option<&str>) -> Result<RdfGraph, LoadError> {
    parse_graph(input.as_bytes(), format, base)
}
