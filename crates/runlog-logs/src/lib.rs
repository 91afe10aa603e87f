//! Log processing for runlog
//!
//! This crate turns an execution response into a classified, chunked log and
//! tracks which chunks are expanded and where navigation should land.

mod chunker;
mod classifier;
mod config;
mod expansion;
mod highlight;
mod indexer;
mod navigation;
mod payload;
mod render;
mod session;

pub use chunker::LogChunker;
pub use classifier::LineClassifier;
pub use config::{
    ConfigError, DEFAULT_CHUNK_SIZE, DEFAULT_ERROR_MARKER, DEFAULT_HIGHLIGHT_MS, DEFAULT_MAX_OPEN,
    DEFAULT_SENTINEL, DEFAULT_WARNING_MARKER, MarkerConfig, ViewerConfig,
};
pub use expansion::{Expansion, ExpansionCache};
pub use highlight::{HighlightExpired, HighlightTimer};
pub use indexer::{
    DiagnosticGroup, DiagnosticIndex, DiagnosticIndexer, DiagnosticTree, TreeRow,
};
pub use navigation::{NavigationController, Viewport};
pub use payload::parse_response;
pub use render::{ChunkView, RenderModel};
pub use session::{LoadedLog, ViewerSession};

// Re-export types used in our public API
pub use runlog_types::{
    Chunk, ClassifiedLine, Diagnostic, DiagnosticKind, ExecutionResponse, LineClass, LineKind,
    LogRecord, NavigationTarget, PayloadFormat, Segment, SegmentStyle,
};
