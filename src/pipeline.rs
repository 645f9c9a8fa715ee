//! End-to-end runs.
//!
//! | Run | Reads | Writes |
//! |-----|-------|--------|
//! | `prepare` | record files | `wos-T*.txt`, `wos*.gml` |
//! | `render` | layout file + record files | `im-*.png` |
//!
//! Any error returned here is fatal for the run. Malformed record lines
//! are not errors; they are counted in [`BuildStats`].

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::builder::{BuildStats, GraphBuilder};
use crate::config::{PrepareConfig, RenderConfig};
use crate::export::{self, TagVocabulary};
use crate::layout::{PointStore, PROGRESS_INTERVAL};
use crate::model::CitationGraph;
use crate::render::{EdgeRasterizer, ImageComposer, NodeRasterizer, Viewport};
use crate::source::RecordFiles;
use crate::Result;

/// Outcome of a `prepare` run.
#[derive(Debug, Clone, Serialize)]
pub struct PrepareReport {
    pub stats: BuildStats,
    pub nodes: usize,
    pub edges: usize,
    pub table_path: PathBuf,
    pub markup_path: PathBuf,
}

/// Outcome of a `render` run.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub stats: BuildStats,
    pub points: usize,
    pub edges_drawn: usize,
    pub nodes_drawn: usize,
    pub touched_pixels: usize,
    pub image_path: PathBuf,
}

fn read_graph(
    files: &RecordFiles,
    ref_threshold: usize,
    cit_threshold: usize,
) -> Result<(CitationGraph, BuildStats)> {
    let mut builder = GraphBuilder::new(ref_threshold, cit_threshold);
    builder.read_files(files)?;
    let stats = builder.stats();
    Ok((builder.finish(), stats))
}

/// Build the graph from record files and write the table and GML files.
pub fn prepare(config: &PrepareConfig) -> Result<PrepareReport> {
    config.validate()?;
    info!("Starting...");

    let files = RecordFiles::new(&config.data_dir).with_suffix(config.suffix.as_str());
    let (graph, stats) = read_graph(&files, config.ref_threshold, config.cit_threshold)?;

    fs::create_dir_all(&config.output_dir)?;
    let table_path = config
        .output_dir
        .join(export::table_file_name(config.ref_threshold, config.cit_threshold));
    let markup_path = config
        .output_dir
        .join(export::markup_file_name(config.ref_threshold, config.cit_threshold));

    info!(path = %table_path.display(), "Writing data file...");
    let mut w = BufWriter::new(File::create(&table_path)?);
    export::write_table(&graph, &mut w)?;
    w.flush()?;

    info!(path = %markup_path.display(), "Writing GML file...");
    let mut w = BufWriter::new(File::create(&markup_path)?);
    export::write_markup(&graph, &TagVocabulary::default(), &mut w)?;
    w.flush()?;

    let report = PrepareReport {
        stats,
        nodes: graph.len(),
        edges: graph.edge_count(),
        table_path,
        markup_path,
    };
    info!(nodes = report.nodes, edges = report.edges, rejected = stats.rejected, "Finished");
    Ok(report)
}

/// Load node positions, draw edges and nodes, and write the PNG.
pub fn render(config: &RenderConfig) -> Result<RenderReport> {
    config.validate()?;
    info!("Starting...");

    let points = PointStore::open(&config.layout_file, config.capacity)?;
    let files = RecordFiles::new(&config.data_dir).with_suffix(config.suffix.as_str());
    let viewport = Viewport::new(config.size, config.scale);

    // Every reference of an accepted record is a candidate edge, whether or
    // not the referenced record was itself accepted.
    info!("Drawing edges...");
    let mut edges = EdgeRasterizer::new(viewport, config.edge_alpha);
    let mut skipped = 0usize;
    let mut builder = GraphBuilder::new(0, 0);
    builder.read_files_with(&files, |record| {
        let from = points.get(record.id);
        for target in record.references() {
            if !edges.draw_edge(from, points.get(target))? {
                skipped += 1;
            }
        }
        Ok(())
    })?;
    let stats = builder.stats();
    if skipped > 0 {
        warn!(skipped, "Edges without layout coordinates");
    }
    let edges_drawn = edges.drawn();
    let buffer = edges.into_buffer();

    info!("Drawing nodes...");
    let mut nodes = NodeRasterizer::new(viewport, config.dot_size);
    for (progress, (_, point)) in points.iter().enumerate() {
        if progress % PROGRESS_INTERVAL == 0 {
            info!(progress, "Drawing nodes...");
        }
        nodes.draw_node(Some(point));
    }
    let nodes_drawn = nodes.drawn();

    let composer = ImageComposer;
    let touched_pixels = buffer.touched();
    let image = composer.compose(&buffer, nodes.layer());
    drop(buffer);

    let image_path = config.output_path();
    if let Some(parent) = image_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    composer.save(&image, &image_path)?;

    info!(edges = edges_drawn, nodes = nodes_drawn, "Finished");
    Ok(RenderReport {
        stats,
        points: points.len(),
        edges_drawn,
        nodes_drawn,
        touched_pixels,
        image_path,
    })
}
