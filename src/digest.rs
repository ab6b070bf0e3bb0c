//! SHA-256 digests over the canonical encoding.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical::{join_blocks, CanonicalEncoder};
use crate::graph::RdfGraph;

/// Incremental SHA-256 hasher producing lowercase hex output.
#[derive(Clone, Default)]
pub struct MessageDigest {
    hasher: Sha256,
}

impl MessageDigest {
    pub fn new() -> MessageDigest {
        MessageDigest {
            hasher: Sha256::new(),
        }
    }

    /// Feeds the UTF-8 bytes of `msg` into the hash.
    pub fn update(&mut self, msg: &str) {
        self.hasher.update(msg.as_bytes());
    }

    /// Returns the hex-encoded digest of everything fed so far.
    ///
    /// The output is always 64 characters, zero-padded.
    pub fn digest(&self) -> String {
        hex::encode(self.hasher.clone().finalize())
    }
}

/// Hashes an already computed canonical string.
pub fn digest_canonical(canonical: &str) -> String {
    let mut md = MessageDigest::new();
    md.update(canonical);
    md.digest()
}

/// Computes the hex digest of a graph.
pub fn digest(graph: &RdfGraph) -> String {
    GraphDigest::compute(graph).digest
}

/// The canonical string of a graph together with its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDigest {
    /// Lowercase hex SHA-256 of `canonical`.
    pub digest: String,
    /// Number of distinct triples in the source graph.
    pub triples: usize,
    /// Number of distinct subject blocks in the canonical string.
    pub subject_blocks: usize,
    /// The canonical string the digest was computed from.
    pub canonical: String,
}

impl GraphDigest {
    pub fn compute(graph: &RdfGraph) -> Self {
        let blocks = CanonicalEncoder::new(graph).subject_blocks();
        let subject_blocks = blocks.len();
        let canonical = join_blocks(&blocks);

        let digest = digest_canonical(&canonical);
        log::debug!(
            "Hashed {} triples into {} subject blocks: {}",
            graph.len(),
            subject_blocks,
            digest
        );

        GraphDigest {
            digest,
            triples: graph.len(),
            subject_blocks,
            canonical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonical_string;
    use oxrdf::{BlankNode, NamedNode, Triple};

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://ex#{}", local))
    }

    fn nested_graph() -> RdfGraph {
        let blank = BlankNode::new_unchecked("b0");
        vec![
            Triple::new(ex("s"), ex("p"), blank.clone()),
            Triple::new(blank, ex("p"), ex("C")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_graph_digest() {
        assert_eq!(digest(&RdfGraph::new()), EMPTY_SHA256);
    }

    #[test]
    fn test_digest_is_64_lowercase_hex() {
        let d = digest(&nested_graph());
        assert_eq!(d.len(), 64);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_nested_blank_node_digest() {
        assert_eq!(
            digest(&nested_graph()),
            "f585cfad2281bd15002c170814f971591eb3472c4df3f08df7374b316be47bda"
        );
    }

    #[test]
    fn test_named_subject_block_digest() {
        assert_eq!(
            digest_canonical("{http://ex#s(http://ex#p[*(http://ex#p[http://ex#C])])}"),
            "8ed535774824ac7bfc8aa11c92b04594e384c6bea1ed58e9ae3bd683936b61ab"
        );
    }

    #[test]
    fn test_incremental_update_matches_single_update() {
        let mut md = MessageDigest::new();
        md.update("{*(http://ex#p");
        md.update("[http://ex#C])}");
        assert_eq!(md.digest(), digest_canonical("{*(http://ex#p[http://ex#C])}"));
    }

    #[test]
    fn test_graph_digest_matches_canonical_string() {
        let graph = nested_graph();
        let computed = GraphDigest::compute(&graph);
        assert_eq!(computed.canonical, canonical_string(&graph));
        assert_eq!(computed.digest, digest(&graph));
        assert_eq!(computed.triples, 2);
        assert_eq!(computed.subject_blocks, 2);
    }

    #[test]
    fn test_graph_digest_serializes() {
        let computed = GraphDigest::compute(&nested_graph());
        let json = serde_json::to_value(&computed).unwrap();
        assert_eq!(json["digest"], computed.digest.as_str());
        assert_eq!(json["triples"], 2);
    }
}
