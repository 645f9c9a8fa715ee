//! Graph export — flat table and GML.
//!
//! Both writers walk nodes in insertion order, so output is deterministic
//! for a given input order.
//!
//! ```text
//! CitationGraph → write_table()  → id  year  title  cited-title ...
//!               → write_markup() → graph [ directed 1 node [...] edge [...] ]
//! ```

use std::io::Write;

use smallvec::SmallVec;

use crate::model::CitationGraph;
use crate::Result;

/// Separator between table columns. Normalized titles never contain it.
pub const FIELD_SEPARATOR: &str = "  ";

// ============================================================================
// Tag vocabulary
// ============================================================================

/// Table of `(label, needle)` pairs flagged on GML nodes.
///
/// A node gets `label "y"` when the needle occurs in its normalized title
/// with a single space added at both ends, so needles padded with spaces
/// match whole words only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: Vec<(String, String)>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::empty()
            .with_tag("memeQuantum", " quantum ")
            .with_tag("memeTraffic", " traffic ")
            .with_tag("memeBlackHole", " black hole ")
            .with_tag("memeGraphene", " graphene ")
    }
}

impl TagVocabulary {
    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    pub fn with_tag(mut self, label: impl Into<String>, needle: impl Into<String>) -> Self {
        self.tags.push((label.into(), needle.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Labels whose needle occurs in the padded title, in vocabulary order.
    pub fn matches(&self, title: &str) -> SmallVec<[&str; 4]> {
        let padded = format!(" {title} ");
        self.tags
            .iter()
            .filter(|(_, needle)| padded.contains(needle.as_str()))
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

// ============================================================================
// Writers
// ============================================================================

/// Write one line per node: id, year, title, then the titles of its
/// realized references in reference order.
pub fn write_table(graph: &CitationGraph, writer: &mut dyn Write) -> Result<()> {
    for (id, entry) in graph.iter() {
        write!(writer, "{id}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}", entry.year, entry.title)?;
        for target in graph.realized_references(id) {
            if let Some(title) = graph.title(target) {
                write!(writer, "{FIELD_SEPARATOR}{title}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the graph as directed GML with tag flags on every node.
pub fn write_markup(
    graph: &CitationGraph,
    vocabulary: &TagVocabulary,
    writer: &mut dyn Write,
) -> Result<()> {
    writeln!(writer, "graph [")?;
    writeln!(writer, "directed 1")?;

    for (id, entry) in graph.iter() {
        writeln!(writer, "node [")?;
        writeln!(writer, "id \"{id}\"")?;
        writeln!(writer, "year \"{}\"", entry.year)?;
        for label in vocabulary.matches(&entry.title) {
            writeln!(writer, "{label} \"y\"")?;
        }
        writeln!(writer, "]")?;
    }

    for (src, dst) in graph.edges() {
        writeln!(writer, "edge [")?;
        writeln!(writer, "source \"{src}\"")?;
        writeln!(writer, "target \"{dst}\"")?;
        writeln!(writer, "]")?;
    }

    writeln!(writer, "]")?;
    Ok(())
}

// ============================================================================
// Output naming
// ============================================================================

/// `-c{cth}` / `-r{rth}` suffix for non-zero thresholds.
fn threshold_suffix(ref_threshold: usize, cit_threshold: usize) -> String {
    let mut s = String::new();
    if cit_threshold > 0 {
        s.push_str(&format!("-c{cit_threshold}"));
    }
    if ref_threshold > 0 {
        s.push_str(&format!("-r{ref_threshold}"));
    }
    s
}

/// File name of the flat table, e.g. `wos-T-c5-r3.txt`.
pub fn table_file_name(ref_threshold: usize, cit_threshold: usize) -> String {
    format!("wos-T{}.txt", threshold_suffix(ref_threshold, cit_threshold))
}

/// File name of the GML file, e.g. `wos-c5-r3.gml`.
pub fn markup_file_name(ref_threshold: usize, cit_threshold: usize) -> String {
    format!("wos{}.gml", threshold_suffix(ref_threshold, cit_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PublicationId, Year};
    use pretty_assertions::assert_eq;

    fn graph() -> CitationGraph {
        let mut g = CitationGraph::new();
        g.insert(PublicationId(2), "graphene sheets".into(), Year(2010), "000000001000000099");
        g.insert(PublicationId(1), "quantumness of traffic".into(), Year(2001), "");
        g
    }

    #[test]
    fn test_vocabulary_whole_words() {
        let v = TagVocabulary::default();
        assert_eq!(v.matches("quantum black hole").as_slice(), &["memeQuantum", "memeBlackHole"]);
        assert!(v.matches("quantumness").is_empty());
        assert_eq!(v.matches("graphene").as_slice(), &["memeGraphene"]);
    }

    #[test]
    fn test_vocabulary_extension() {
        let v = TagVocabulary::empty().with_tag("memeLaser", " laser ");
        assert_eq!(v.len(), 1);
        assert_eq!(v.matches("a laser cavity").as_slice(), &["memeLaser"]);
    }

    #[test]
    fn test_table() {
        let mut buf = Vec::new();
        write_table(&graph(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "000000002  2010  graphene sheets  quantumness of traffic\n\
             000000001  2001  quantumness of traffic\n"
        );
    }

    #[test]
    fn test_markup() {
        let mut buf = Vec::new();
        write_markup(&graph(), &TagVocabulary::default(), &mut buf).unwrap();
        let expected = "graph [\n\
                        directed 1\n\
                        node [\n\
                        id \"000000002\"\n\
                        year \"2010\"\n\
                        memeGraphene \"y\"\n\
                        ]\n\
                        node [\n\
                        id \"000000001\"\n\
                        year \"2001\"\n\
                        ]\n\
                        edge [\n\
                        source \"000000002\"\n\
                        target \"000000001\"\n\
                        ]\n\
                        ]\n";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(table_file_name(0, 0), "wos-T.txt");
        assert_eq!(table_file_name(3, 5), "wos-T-c5-r3.txt");
        assert_eq!(markup_file_name(3, 0), "wos-r3.gml");
        assert_eq!(markup_file_name(0, 5), "wos-c5.gml");
    }
}
