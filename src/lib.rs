//! Split one JSON file (top-level array or object) into N smaller ones.

pub mod splitter;

pub use splitter::{
    plan_chunks, split_file, write_chunk, Chunk, ChunkSummary, Shape, SplitError, SplitPlan,
    DEFAULT_NUM_SPLITS,
};
