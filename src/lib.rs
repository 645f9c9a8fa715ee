//! # citegraph — Citation Graph Preparation and Rendering
//!
//! Turns Web-of-Science style record dumps into a directed citation graph,
//! then either serializes it or renders it as a density map.
//!
//! ## Design Principles
//!
//! 1. **Parser owns nothing**: a record line → `PublicationRecord` is a pure function
//! 2. **Explicit graph value**: `CitationGraph` is passed around, never global
//! 3. **Owned buffers**: every raster surface is an owned, bounds-checked type
//! 4. **Layout is external**: node coordinates are read, never computed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use citegraph::{GraphBuilder, TagVocabulary};
//!
//! # fn example() -> citegraph::Result<()> {
//! let mut builder = GraphBuilder::new(0, 0);
//! builder.read_file("data/wos/part-0001.txt")?;
//! let graph = builder.finish();
//!
//! let mut out = Vec::new();
//! citegraph::export::write_markup(&graph, &TagVocabulary::default(), &mut out)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipelines
//!
//! | Pipeline | Entry point | Output |
//! |----------|-------------|--------|
//! | Prepare | `pipeline::prepare` | flat table (`.txt`) + GML (`.gml`) |
//! | Render | `pipeline::render` | density map (`.png`) |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod normalize;
pub mod wos;
pub mod source;
pub mod builder;
pub mod export;
pub mod layout;
pub mod render;
pub mod config;
pub mod pipeline;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    CitationGraph, Coordinate, GraphEntry, PublicationId, PublicationRecord,
    ReferenceIds, Year,
};

// ============================================================================
// Re-exports: Parsing and assembly
// ============================================================================

pub use wos::{parse_record, Rejection};
pub use builder::{BuildStats, GraphBuilder};
pub use source::RecordFiles;

// ============================================================================
// Re-exports: Output
// ============================================================================

pub use export::TagVocabulary;
pub use layout::PointStore;
pub use render::{AccumulationBuffer, EdgeRasterizer, ImageComposer, NodeLayer, NodeRasterizer, Viewport};
pub use config::{PrepareConfig, RenderConfig};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Record rejected: {reason}")]
    RecordRejected { reason: Rejection },

    #[error("Layout parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Id {id} exceeds point store capacity {capacity}")]
    CapacityExceeded { id: u64, capacity: usize },

    #[error("Pixel ({x}, {y}) outside {width}x{height} raster")]
    OutOfBounds { x: i64, y: i64, width: u32, height: u32 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Rejection> for Error {
    fn from(reason: Rejection) -> Self {
        Error::RecordRejected { reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
