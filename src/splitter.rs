use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default number of output files per input.
pub const DEFAULT_NUM_SPLITS: usize = 10;

/// Failures detected before any output file is written.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("cannot read {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: top-level JSON must be an array or an object, found {found}", path.display())]
    UnsupportedShape { path: PathBuf, found: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sequence,
    Mapping,
}

impl Shape {
    // "items" for arrays, "keys" for objects - used in progress lines
    pub fn unit(self) -> &'static str {
        match self {
            Shape::Sequence => "items",
            Shape::Mapping => "keys",
        }
    }
}

/// One planned output file: payload plus where it goes.
#[derive(Debug)]
pub struct Chunk {
    pub path: PathBuf,
    pub payload: Value,
    pub items: usize,
    /// Covered index range `[start, end)` - sequences only.
    pub range: Option<(usize, usize)>,
}

/// Everything `plan_chunks` worked out about one input file.
#[derive(Debug)]
pub struct SplitPlan {
    pub shape: Shape,
    pub total: usize,
    pub chunk_size: usize,
    pub chunks: Vec<Chunk>,
}

/// What `split_file` reports back per written file.
#[derive(Debug, Clone)]
pub struct ChunkSummary {
    pub path: PathBuf,
    pub items: usize,
    pub range: Option<(usize, usize)>,
}

/// Read and parse `input`, then partition it into at most `num_splits`
/// contiguous chunks. Nothing is written yet; a failure here leaves no
/// partial output behind.
pub fn plan_chunks(input: &Path, num_splits: usize) -> Result<SplitPlan, SplitError> {
    let raw = fs::read_to_string(input).map_err(|source| SplitError::NotFound {
        path: input.to_path_buf(),
        source,
    })?;
    let data: Value = serde_json::from_str(&raw).map_err(|source| SplitError::Parse {
        path: input.to_path_buf(),
        source,
    })?;

    match data {
        Value::Array(items) => Ok(plan_sequence(input, items, num_splits)),
        Value::Object(map) => Ok(plan_mapping(input, map, num_splits)),
        other => Err(SplitError::UnsupportedShape {
            path: input.to_path_buf(),
            found: type_name(&other),
        }),
    }
}

fn plan_sequence(input: &Path, items: Vec<Value>, num_splits: usize) -> SplitPlan {
    let total = items.len();
    let chunk_size = ceil_div(total, num_splits);

    let mut chunks = Vec::new();
    let mut iter = items.into_iter();
    for i in 0..num_splits {
        let start = i * chunk_size;
        if start >= total {
            break;
        }
        let end = ((i + 1) * chunk_size).min(total);
        let part: Vec<Value> = iter.by_ref().take(end - start).collect();
        chunks.push(Chunk {
            path: chunk_path(input, i + 1),
            items: end - start,
            range: Some((start, end)),
            payload: Value::Array(part),
        });
    }

    SplitPlan {
        shape: Shape::Sequence,
        total,
        chunk_size,
        chunks,
    }
}

// Same arithmetic as the sequence case, sliced over the key list in
// insertion order (serde_json is built with preserve_order).
fn plan_mapping(input: &Path, map: Map<String, Value>, num_splits: usize) -> SplitPlan {
    let total = map.len();
    let chunk_size = ceil_div(total, num_splits);

    let mut chunks = Vec::new();
    let mut entries = map.into_iter();
    for i in 0..num_splits {
        let start = i * chunk_size;
        if start >= total {
            break;
        }
        let end = ((i + 1) * chunk_size).min(total);
        let part: Map<String, Value> = entries.by_ref().take(end - start).collect();
        chunks.push(Chunk {
            path: chunk_path(input, i + 1),
            items: end - start,
            range: None,
            payload: Value::Object(part),
        });
    }

    SplitPlan {
        shape: Shape::Mapping,
        total,
        chunk_size,
        chunks,
    }
}

/// Serialize one chunk pretty-printed (2-space indent, non-ASCII left as-is)
/// to its planned path, overwriting whatever is there.
pub fn write_chunk(chunk: &Chunk) -> Result<()> {
    fs::write(&chunk.path, serde_json::to_string_pretty(&chunk.payload)?)
        .with_context(|| format!("writing {}", chunk.path.display()))?;
    Ok(())
}

/// Plan and write in one call; returns a summary per file written.
pub fn split_file(input: &Path, num_splits: usize) -> Result<Vec<ChunkSummary>> {
    let plan = plan_chunks(input, num_splits)?;
    let mut written = Vec::with_capacity(plan.chunks.len());
    for chunk in &plan.chunks {
        write_chunk(chunk)?;
        written.push(ChunkSummary {
            path: chunk.path.clone(),
            items: chunk.items,
            range: chunk.range,
        });
    }
    Ok(written)
}

// riot-output.json -> riot-output_split_3.json (extension dropped, 1-based)
fn chunk_path(input: &Path, part: usize) -> PathBuf {
    let base = input.with_extension("");
    PathBuf::from(format!("{}_split_{part}.json", base.display()))
}

fn ceil_div(total: usize, parts: usize) -> usize {
    total.div_ceil(parts.max(1))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
