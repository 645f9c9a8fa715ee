//! # Citation Graph Model
//!
//! Plain data types shared by the parser, the builder, both serializers
//! and the renderer.
//!
//! Design rule: no I/O here. Everything in this module is pure data.

pub mod record;
pub mod graph;
pub mod point;

pub use record::{PublicationId, PublicationRecord, ReferenceIds, Year, ID_WIDTH};
pub use graph::{CitationGraph, GraphEntry};
pub use point::Coordinate;
