//! Tunable knobs for the pipeline, following the `WccConfig` pattern of
//! grouping algorithm constants into a single `Default`-able struct.

/// Number of frontier edges a single truss-peeling worker claims per atomic
/// fetch-add, mirroring `triangle_count`'s `CHUNK_SIZE` worker-loop constant.
pub const DEFAULT_TRUSS_CHUNK_SIZE: usize = 64;

/// Number of DAG nodes a single clique-counting worker claims per atomic
/// fetch-add.
pub const DEFAULT_CLIQUE_CHUNK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub truss_chunk_size: usize,
    pub clique_chunk_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            truss_chunk_size: DEFAULT_TRUSS_CHUNK_SIZE,
            clique_chunk_size: DEFAULT_CLIQUE_CHUNK_SIZE,
        }
    }
}
