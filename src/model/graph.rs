//! In-memory citation graph.

use hashbrown::HashMap;

use super::{PublicationId, ReferenceIds, Year};

/// Per-node data retained from an accepted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEntry {
    /// Normalized title.
    pub title: String,
    pub year: Year,
    /// Raw reference token run, resolved lazily against the node set.
    pub(crate) references: String,
}

impl GraphEntry {
    /// All referenced ids, including dangling ones.
    pub fn references(&self) -> ReferenceIds<'_> {
        ReferenceIds::new(&self.references)
    }
}

/// Directed citation graph keyed by publication id.
///
/// Nodes iterate in first-insertion order. Edges are not stored: a
/// reference `a → b` is realized only when `b` is itself a node, and
/// dangling references are skipped wherever edges are read.
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    order: Vec<PublicationId>,
    entries: HashMap<PublicationId, GraphEntry>,
}

impl CitationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a node. Returns true if the id is new.
    ///
    /// Overwriting keeps the node's original position in iteration order.
    pub fn insert(
        &mut self,
        id: PublicationId,
        title: String,
        year: Year,
        references: impl Into<String>,
    ) -> bool {
        let entry = GraphEntry { title, year, references: references.into() };
        match self.entries.insert(id, entry) {
            Some(_) => false,
            None => {
                self.order.push(id);
                true
            }
        }
    }

    pub fn contains(&self, id: PublicationId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: PublicationId) -> Option<&GraphEntry> {
        self.entries.get(&id)
    }

    pub fn title(&self, id: PublicationId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in insertion order.
    pub fn ids(&self) -> &[PublicationId] {
        &self.order
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PublicationId, &GraphEntry)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|e| (*id, e)))
    }

    /// Realized references of `id`, in original reference order.
    pub fn realized_references(&self, id: PublicationId) -> impl Iterator<Item = PublicationId> + '_ {
        self.entries
            .get(&id)
            .into_iter()
            .flat_map(|e| e.references())
            .filter(move |target| self.contains(*target))
    }

    /// Every realized edge as `(source, target)`: sources in insertion
    /// order, targets in reference order.
    pub fn edges(&self) -> impl Iterator<Item = (PublicationId, PublicationId)> + '_ {
        self.order
            .iter()
            .flat_map(move |src| self.realized_references(*src).map(move |dst| (*src, dst)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Number of references that point outside the node set.
    pub fn dangling_count(&self) -> usize {
        self.iter()
            .flat_map(|(_, e)| e.references())
            .filter(|target| !self.contains(*target))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> PublicationId {
        PublicationId(n)
    }

    fn sample() -> CitationGraph {
        let mut g = CitationGraph::new();
        g.insert(id(3), "third".into(), Year(2003), "000000001000000009000000002");
        g.insert(id(1), "first".into(), Year(2001), "");
        g.insert(id(2), "second".into(), Year(2002), "000000001");
        g
    }

    #[test]
    fn test_insertion_order_preserved() {
        let g = sample();
        assert_eq!(g.ids(), &[id(3), id(1), id(2)]);
        let titles: Vec<_> = g.iter().map(|(_, e)| e.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut g = sample();
        assert!(!g.insert(id(1), "first again".into(), Year(1999), ""));
        assert_eq!(g.len(), 3);
        assert_eq!(g.ids(), &[id(3), id(1), id(2)]);
        assert_eq!(g.title(id(1)), Some("first again"));
    }

    #[test]
    fn test_dangling_references_are_not_realized() {
        let g = sample();
        let refs: Vec<_> = g.realized_references(id(3)).collect();
        assert_eq!(refs, vec![id(1), id(2)]);
        assert_eq!(g.dangling_count(), 1);
    }

    #[test]
    fn test_edges() {
        let g = sample();
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(id(3), id(1)), (id(3), id(2)), (id(2), id(1))]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_unknown_node_has_no_references() {
        let g = sample();
        assert_eq!(g.realized_references(id(77)).count(), 0);
    }
}
