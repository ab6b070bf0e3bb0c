//! Canonical string encoding of an RDF graph.
//!
//! Every subject is encoded as a tree: its label (the IRI, or `*` for a blank
//! node) followed by one `(predicate[object][object]...)` block per predicate.
//! Blank-node objects are expanded in place, so blank node identifiers never
//! reach the output. The subject encodings are deduplicated, sorted and
//! wrapped in `{...}` to form the canonical string.
//!
//! A blank node is expanded at most once per top-level subject. Any later
//! occurrence within the same subject tree, including cycles back to an
//! ancestor, encodes as the empty string.
//!
//! # Example
//!
//! ```ignore
//! use rdfhash::{canonical_string, parse_str, RdfFormat};
//!
//! let graph = parse_str(
//!     "<http://ex#s> <http://ex#p> [ <http://ex#p> <http://ex#C> ] .",
//!     RdfFormat::Turtle,
//!     None,
//! )?;
//! assert_eq!(
//!     canonical_string(&graph),
//!     "{*(http://ex#p[http://ex#C])}{http://ex#s(http://ex#p[*(http://ex#p[http://ex#C])])}"
//! );
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term};

use crate::graph::RdfGraph;

/// Opens a top-level subject block.
pub const SUBJECT_START: char = '{';
/// Closes a top-level subject block.
pub const SUBJECT_END: char = '}';
/// Opens a property block; the predicate IRI follows immediately.
pub const PROPERTY_START: char = '(';
/// Closes a property block.
pub const PROPERTY_END: char = ')';
/// Opens an object block.
pub const OBJECT_START: char = '[';
/// Closes an object block.
pub const OBJECT_END: char = ']';
/// Label used in place of a blank node identifier.
pub const BLANK_NODE: char = '*';

/// Encodes the whole graph into its canonical string.
pub fn canonical_string(graph: &RdfGraph) -> String {
    CanonicalEncoder::new(graph).encode()
}

/// Produces canonical encodings of an `RdfGraph`.
///
/// The encoder holds no mutable state. Each top-level subject gets its own
/// visitation set, so one encoder may be shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalEncoder<'g> {
    graph: &'g RdfGraph,
}

impl<'g> CanonicalEncoder<'g> {
    pub fn new(graph: &'g RdfGraph) -> Self {
        Self { graph }
    }

    /// Returns the canonical string for the graph.
    pub fn encode(&self) -> String {
        join_blocks(&self.subject_blocks())
    }

    /// Returns the distinct subject encodings in lexicographic order.
    ///
    /// Subjects that encode to the same string collapse into one entry.
    pub fn subject_blocks(&self) -> BTreeSet<String> {
        let mut blocks = BTreeSet::new();
        for subject in self.graph.subjects() {
            let encoded = self.encode_subject(subject);
            if !blocks.insert(encoded) {
                log::trace!("Subject {} collapsed into an identical block", subject);
            }
        }
        blocks
    }

    /// Encodes one subject tree with a fresh visitation set.
    pub fn encode_subject(&self, subject: &NamedOrBlankNode) -> String {
        let mut walk = SubjectWalk::new(self.graph);
        let encoded = walk.encode_subject(subject);
        log::trace!("Encoded {} with {} blank node expansions", subject, walk.expansions);
        encoded
    }
}

/// Traversal state for a single top-level subject.
struct SubjectWalk<'g> {
    graph: &'g RdfGraph,
    visited: HashSet<BlankNode>,
    /// Set while a sibling preview runs; previews do not order their own
    /// siblings by preview.
    previewing: bool,
    /// Blank nodes claimed by the running preview, released when it ends.
    claimed: Vec<BlankNode>,
    expansions: usize,
}

impl<'g> SubjectWalk<'g> {
    fn new(graph: &'g RdfGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            previewing: false,
            claimed: Vec::new(),
            expansions: 0,
        }
    }

    fn encode_subject(&mut self, subject: &NamedOrBlankNode) -> String {
        match subject {
            NamedOrBlankNode::NamedNode(node) => {
                let mut encoded = node.as_str().to_owned();
                encoded.push_str(&self.encode_properties(subject));
                encoded
            }
            NamedOrBlankNode::BlankNode(node) => self.encode_blank(node),
        }
    }

    fn encode_blank(&mut self, node: &BlankNode) -> String {
        if !self.visited.insert(node.clone()) {
            return String::new();
        }
        if self.previewing {
            self.claimed.push(node.clone());
        }
        self.expansions += 1;

        let mut encoded = String::from(BLANK_NODE);
        encoded.push_str(&self.encode_properties(&NamedOrBlankNode::from(node.clone())));
        encoded
    }

    /// Encodes `node` as if it were expanded next, then forgets every blank
    /// node the preview visited.
    fn preview_blank(&mut self, node: &BlankNode) -> String {
        self.previewing = true;
        let encoded = self.encode_blank(node);
        self.previewing = false;
        for released in self.claimed.drain(..) {
            self.visited.remove(&released);
        }
        encoded
    }

    fn encode_properties(&mut self, subject: &NamedOrBlankNode) -> String {
        let graph = self.graph;
        let mut predicates: Vec<&'g NamedNode> = graph.predicates(subject).collect();
        predicates.sort_by(|a, b| compare_predicates(a.as_str(), b.as_str()));

        let mut encoded = String::new();
        for predicate in predicates {
            encoded.push(PROPERTY_START);
            encoded.push_str(predicate.as_str());
            for object in self.encode_objects(subject, predicate) {
                encoded.push(OBJECT_START);
                encoded.push_str(&object);
                encoded.push(OBJECT_END);
            }
            encoded.push(PROPERTY_END);
        }
        encoded
    }

    /// Encodes the objects of `(subject, predicate)`, deduplicated and sorted.
    fn encode_objects(&mut self, subject: &NamedOrBlankNode, predicate: &NamedNode) -> BTreeSet<String> {
        let graph = self.graph;
        let mut encoded = BTreeSet::new();
        let mut blanks: Vec<&'g BlankNode> = Vec::new();

        for object in graph.objects(subject, predicate) {
            match object {
                Term::NamedNode(node) => {
                    encoded.insert(node.as_str().to_owned());
                }
                Term::Literal(literal) => {
                    encoded.insert(encode_literal(literal));
                }
                Term::BlankNode(node) => blanks.push(node),
            }
        }

        for node in self.expansion_order(blanks) {
            encoded.insert(self.encode_blank(node));
        }
        encoded
    }

    /// Orders sibling blank nodes by the encoding each would get if expanded
    /// first, so that which sibling claims a shared descendant does not
    /// depend on identifiers or hash order.
    ///
    /// Inside a preview, siblings fall back to local identifier order. This
    /// keeps the cost of a walk at O(depth * size).
    fn expansion_order(&mut self, mut blanks: Vec<&'g BlankNode>) -> Vec<&'g BlankNode> {
        if blanks.len() < 2 {
            return blanks;
        }
        if self.previewing {
            blanks.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            return blanks;
        }

        let mut previews: Vec<(String, &'g BlankNode)> = blanks
            .into_iter()
            .map(|node| (self.preview_blank(node), node))
            .collect();
        previews.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));

        if previews.windows(2).any(|pair| pair[0].0 == pair[1].0) {
            log::debug!(
                "Sibling blank nodes with identical structure; expansion order falls back to local identifiers"
            );
        }

        previews.into_iter().map(|(_, node)| node).collect()
    }
}

/// Wraps each subject encoding in `{...}` and concatenates them in order.
pub(crate) fn join_blocks(blocks: &BTreeSet<String>) -> String {
    let capacity = blocks.iter().map(|block| block.len() + 2).sum();
    let mut canonical = String::with_capacity(capacity);
    for block in blocks {
        canonical.push(SUBJECT_START);
        canonical.push_str(block);
        canonical.push(SUBJECT_END);
    }
    canonical
}

fn encode_literal(literal: &Literal) -> String {
    let mut encoded = String::with_capacity(literal.value().len() + 2);
    encoded.push('"');
    encoded.push_str(literal.value());
    encoded.push('"');
    if let Some(language) = literal.language().filter(|language| !language.is_empty()) {
        encoded.push('@');
        encoded.push_str(language);
    }
    encoded
}

/// Case-insensitive order with a case-sensitive tie-break.
fn compare_predicates(a: &str, b: &str) -> Ordering {
    compare_ignore_case(a, b).then_with(|| a.cmp(b))
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars().map(fold_case).cmp(b.chars().map(fold_case))
}

/// Maps a character through upper- then lower-case, keeping characters whose
/// mapping is not a single character unchanged.
fn fold_case(c: char) -> char {
    let upper = single_char(c.to_uppercase()).unwrap_or(c);
    single_char(upper.to_lowercase()).unwrap_or(upper)
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    match chars.next() {
        None => Some(first),
        Some(_) => None,
    }
}
