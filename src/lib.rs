//! Content digests for RDF graphs.
//!
//! Two graphs that differ only in triple order, serialization syntax or blank
//! node labels hash to the same value. The graph is first turned into a
//! canonical string (see [`canonical`]) which is then hashed with SHA-256
//! (see [`digest`]).
//!
//! # Example: hash a Turtle document
//!
//! ```ignore
//! use rdfhash::{digest, parse_str, RdfFormat};
//!
//! let graph = parse_str(
//!     "<http://ex#s> <http://ex#p> [ <http://ex#p> <http://ex#C> ] .",
//!     RdfFormat::Turtle,
//!     None,
//! )?;
//! println!("{}", digest(&graph));
//! ```
//!
//! # Example: hash a remote document
//!
//! ```ignore
//! use rdfhash::{GraphDigest, Source, SourceLoader};
//!
//! let source: Source = "https://example.org/data.ttl".parse()?;
//! let graph = SourceLoader::new().load(&source)?;
//! let computed = GraphDigest::compute(&graph);
//! println!("{}\n{}", computed.canonical, computed.digest);
//! ```

pub mod canonical;
pub mod digest;
pub mod error;
pub mod graph;
pub mod loader;
pub mod rdf_io;

// Re-exports
pub use canonical::{canonical_string, CanonicalEncoder};
pub use digest::{digest, digest_canonical, GraphDigest, MessageDigest};
pub use error::LoadError;
pub use graph::RdfGraph;
pub use loader::{Credentials, LoaderConfig, Source, SourceLoader};
pub use rdf_io::{parse_graph, parse_str, RdfFormat};
