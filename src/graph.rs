//! In-memory triple store consumed by the canonical encoder.

use std::collections::{HashMap, HashSet};

use oxrdf::{NamedNode, NamedOrBlankNode, Term, Triple};

/// A set of RDF triples indexed by subject and predicate.
///
/// Duplicate triples collapse on insertion. Iteration order is unspecified;
/// consumers that need a stable order must sort.
#[derive(Debug, Default, Clone)]
pub struct RdfGraph {
    index: HashMap<NamedOrBlankNode, HashMap<NamedNode, HashSet<Term>>>,
    len: usize,
}

impl RdfGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple to the graph. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let inserted = self
            .index
            .entry(triple.subject)
            .or_default()
            .entry(triple.predicate)
            .or_default()
            .insert(triple.object);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Returns the number of distinct triples in the graph.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the graph contains no triples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns every distinct node used as a subject, named or blank.
    pub fn subjects(&self) -> impl Iterator<Item = &NamedOrBlankNode> {
        self.index.keys()
    }

    /// Returns the distinct predicates used with `subject`.
    pub fn predicates<'a>(
        &'a self,
        subject: &NamedOrBlankNode,
    ) -> impl Iterator<Item = &'a NamedNode> + 'a {
        self.index
            .get(subject)
            .into_iter()
            .flat_map(|properties| properties.keys())
    }

    /// Returns the objects of every triple `(subject, predicate, o)`.
    pub fn objects<'a>(
        &'a self,
        subject: &NamedOrBlankNode,
        predicate: &NamedNode,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.index
            .get(subject)
            .and_then(|properties| properties.get(predicate))
            .into_iter()
            .flatten()
    }

    /// Returns true if `node` is the subject of at least one triple.
    pub fn has_subject(&self, node: &NamedOrBlankNode) -> bool {
        self.index.contains_key(node)
    }

    /// Returns an iterator over all triples as borrowed components.
    pub fn iter(&self) -> impl Iterator<Item = (&NamedOrBlankNode, &NamedNode, &Term)> {
        self.index.iter().flat_map(|(subject, properties)| {
            properties.iter().flat_map(move |(predicate, objects)| {
                objects.iter().map(move |object| (subject, predicate, object))
            })
        })
    }
}

impl FromIterator<Triple> for RdfGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = RdfGraph::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Triple> for RdfGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal};

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://ex#{}", local))
    }

    #[test]
    fn test_rdf_graph_new() {
        let graph = RdfGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.subjects().count(), 0);
    }

    #[test]
    fn test_rdf_graph_insert_deduplicates() {
        let mut graph = RdfGraph::new();
        let triple = Triple::new(ex("s"), ex("p"), Literal::new_simple_literal("value"));

        assert!(graph.insert(triple.clone()));
        assert!(!graph.insert(triple));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_subjects_include_blank_nodes() {
        let blank = BlankNode::new_unchecked("b0");
        let graph: RdfGraph = vec![
            Triple::new(ex("s"), ex("p"), blank.clone()),
            Triple::new(blank.clone(), ex("p"), ex("C")),
        ]
        .into_iter()
        .collect();

        let subjects: Vec<_> = graph.subjects().collect();
        assert_eq!(subjects.len(), 2);
        assert!(graph.has_subject(&NamedOrBlankNode::from(blank.clone())));
        assert_eq!(
            graph
                .predicates(&NamedOrBlankNode::from(blank.clone()))
                .count(),
            1
        );
    }

    #[test]
    fn test_predicates_and_objects() {
        let graph: RdfGraph = vec![
            Triple::new(ex("s"), ex("p"), ex("A")),
            Triple::new(ex("s"), ex("p"), ex("B")),
            Triple::new(ex("s"), ex("q"), Literal::new_simple_literal("x")),
        ]
        .into_iter()
        .collect();

        let subject = NamedOrBlankNode::from(ex("s"));
        assert_eq!(graph.predicates(&subject).count(), 2);
        assert_eq!(graph.objects(&subject, &ex("p")).count(), 2);
        assert_eq!(graph.objects(&subject, &ex("q")).count(), 1);
        assert_eq!(graph.objects(&subject, &ex("missing")).count(), 0);
        assert_eq!(graph.iter().count(), 3);
    }

    #[test]
    fn test_unknown_subject_has_no_predicates() {
        let graph = RdfGraph::new();
        let subject = NamedOrBlankNode::from(ex("nobody"));
        assert_eq!(graph.predicates(&subject).count(), 0);
        assert!(!graph.has_subject(&subject));
    }
}
