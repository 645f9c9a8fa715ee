//! Graph assembly from record lines.
//!
//! `GraphBuilder` owns the graph while it is being filled and hands it out
//! by value from [`GraphBuilder::finish`]. Rejected lines are counted and
//! never abort the run; I/O failures do. Bytes that are not valid UTF-8 are
//! replaced with U+FFFD before parsing, so an undecodable line is judged by
//! the record grammar like any other.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::model::{CitationGraph, PublicationRecord};
use crate::normalize::normalize;
use crate::source::RecordFiles;
use crate::wos::parse_record;
use crate::Result;

const READ_BUFFER: usize = 64 * 1024;

/// Counters for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub files: usize,
    pub lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Valid records dropped by the reference/citation thresholds.
    pub filtered: usize,
}

/// Folds accepted records into a [`CitationGraph`].
#[derive(Debug)]
pub struct GraphBuilder {
    graph: CitationGraph,
    ref_threshold: usize,
    cit_threshold: usize,
    stats: BuildStats,
}

impl GraphBuilder {
    /// Records with fewer references than `ref_threshold` or fewer
    /// citations than `cit_threshold` are dropped.
    pub fn new(ref_threshold: usize, cit_threshold: usize) -> Self {
        Self {
            graph: CitationGraph::new(),
            ref_threshold,
            cit_threshold,
            stats: BuildStats::default(),
        }
    }

    /// Insert a record if it meets both thresholds. Returns true if inserted.
    pub fn accept(&mut self, record: &PublicationRecord<'_>) -> bool {
        if record.reference_count() < self.ref_threshold
            || record.citation_count() < self.cit_threshold
        {
            self.stats.filtered += 1;
            return false;
        }
        self.graph.insert(
            record.id,
            normalize(record.title),
            record.year,
            record.reference_tokens(),
        );
        self.stats.accepted += 1;
        true
    }

    /// Parse and fold one line. Returns true if the line became a node.
    pub fn accept_line(&mut self, line: &str) -> bool {
        self.fold_line(line).is_some()
    }

    /// Parse one line and fold it. The record is handed back only when it
    /// was inserted into the graph.
    fn fold_line<'l>(&mut self, line: &'l str) -> Option<PublicationRecord<'l>> {
        self.stats.lines += 1;
        match parse_record(line) {
            Ok(record) => self.accept(&record).then_some(record),
            Err(reason) => {
                self.stats.rejected += 1;
                debug!(%reason, "Rejected line");
                None
            }
        }
    }

    /// Fold every line of a reader. Returns the number of rejected lines.
    pub fn read_lines<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        self.read_lines_with(reader, |_| Ok(()))
    }

    /// Like [`GraphBuilder::read_lines`], calling `visit` with every record
    /// that made it into the graph. An error from `visit` stops the read.
    pub fn read_lines_with<R, F>(&mut self, mut reader: R, mut visit: F) -> Result<usize>
    where
        R: BufRead,
        F: FnMut(&PublicationRecord<'_>) -> Result<()>,
    {
        let before = self.stats.rejected;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(trim_newline(&buf));
            if let Some(record) = self.fold_line(&line) {
                visit(&record)?;
            }
        }
        Ok(self.stats.rejected - before)
    }

    /// Fold one record file.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.read_file_with(path, |_| Ok(()))
    }

    pub fn read_file_with<F>(&mut self, path: impl AsRef<Path>, visit: F) -> Result<usize>
    where
        F: FnMut(&PublicationRecord<'_>) -> Result<()>,
    {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading file to collect ids");
        let reader = BufReader::with_capacity(READ_BUFFER, File::open(path)?);
        let errors = self.read_lines_with(reader, visit)?;
        self.stats.files += 1;
        info!(errors, "Number of errors");
        Ok(errors)
    }

    /// Fold every file of a record source, in walk order.
    pub fn read_files(&mut self, files: &RecordFiles) -> Result<()> {
        self.read_files_with(files, |_| Ok(()))
    }

    pub fn read_files_with<F>(&mut self, files: &RecordFiles, mut visit: F) -> Result<()>
    where
        F: FnMut(&PublicationRecord<'_>) -> Result<()>,
    {
        info!(root = %files.root().display(), "Reading files");
        for path in files.iter() {
            self.read_file_with(path?, &mut visit)?;
        }
        info!(documents = self.graph.len(), "Number of documents");
        Ok(())
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn graph(&self) -> &CitationGraph {
        &self.graph
    }

    pub fn finish(self) -> CitationGraph {
        self.graph
    }
}

/// Strip a trailing `\n` or `\r\n`.
fn trim_newline(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PublicationId, Year};

    /// Build a 15-column line with the given reference and citation counts.
    fn line(id: u32, refs: &[u32], cits: usize) -> String {
        let refs: String = refs.iter().map(|r| format!("{r:09}")).collect();
        let cits: String = (0..cits).map(|i| format!("{:09}", 900_000_000 + i)).collect();
        format!("{id:09};2001;J;;;;;;;Paper {id};0;;0;{refs};{cits}")
    }

    #[test]
    fn test_fields_preserved() {
        let mut b = GraphBuilder::new(0, 0);
        assert!(b.accept_line(&line(5, &[1, 2], 3)));
        let g = b.finish();
        let entry = g.get(PublicationId(5)).unwrap();
        assert_eq!(entry.year, Year(2001));
        assert_eq!(entry.title, "paper 5");
        assert_eq!(entry.references().collect::<Vec<_>>(), vec![PublicationId(1), PublicationId(2)]);
    }

    #[test]
    fn test_reference_threshold_inclusive() {
        let mut b = GraphBuilder::new(2, 0);
        assert!(b.accept_line(&line(1, &[7, 8], 0)));
        assert!(!b.accept_line(&line(2, &[7], 0)));
        assert_eq!(b.graph().len(), 1);
        assert_eq!(b.stats().filtered, 1);
    }

    #[test]
    fn test_citation_threshold_inclusive() {
        let mut b = GraphBuilder::new(0, 3);
        assert!(b.accept_line(&line(1, &[], 3)));
        assert!(!b.accept_line(&line(2, &[], 2)));
        assert!(b.graph().contains(PublicationId(1)));
        assert!(!b.graph().contains(PublicationId(2)));
    }

    #[test]
    fn test_rejections_counted() {
        let mut b = GraphBuilder::new(0, 0);
        let input = format!("{}\nnot a record\n\n{}\n", line(1, &[], 0), line(2, &[1], 0));
        let errors = b.read_lines(input.as_bytes()).unwrap();
        assert_eq!(errors, 2);
        let stats = b.stats();
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 2);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut b = GraphBuilder::new(0, 0);
        assert!(matches!(b.read_file("/no/such/file.txt"), Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_invalid_utf8_line_does_not_abort() {
        let mut input = line(1, &[], 0).into_bytes();
        input.extend_from_slice(b"\n123456789;2001;J;;;;;;;Caf\xe9;0;;0;;\r\n");
        input.extend_from_slice(line(2, &[1], 0).as_bytes());

        let mut b = GraphBuilder::new(0, 0);
        assert_eq!(b.read_lines(input.as_slice()).unwrap(), 0);
        assert_eq!(b.stats().lines, 3);
        let g = b.finish();
        assert_eq!(g.len(), 3);
        assert_eq!(g.title(PublicationId(123_456_789)), Some("caf"));
    }

    #[test]
    fn test_visit_sees_inserted_records_only() {
        let input = format!("{}\nnot a record\n{}\n", line(1, &[], 0), line(2, &[1, 3], 0));
        let mut b = GraphBuilder::new(1, 0);
        let mut seen = Vec::new();
        b.read_lines_with(input.as_bytes(), |rec| {
            seen.push((rec.id, rec.references().collect::<Vec<_>>()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![(PublicationId(2), vec![PublicationId(1), PublicationId(3)])]);
    }

    #[test]
    fn test_visit_error_stops_read() {
        let input = format!("{}\n{}\n", line(1, &[], 0), line(2, &[], 0));
        let mut b = GraphBuilder::new(0, 0);
        let res = b.read_lines_with(input.as_bytes(), |_| Err(crate::Error::Configuration("stop".into())));
        assert!(matches!(res, Err(crate::Error::Configuration(_))));
        assert_eq!(b.stats().lines, 1);
    }

    #[test]
    fn test_rejection_logged_at_debug() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Sink(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Sink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = Sink::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut b = GraphBuilder::new(0, 0);
            assert!(!b.accept_line("not a record"));
        });
        let out = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("Rejected line"), "{out}");
        assert!(out.contains("expected at least 15 fields, found 1"), "{out}");
    }
}
