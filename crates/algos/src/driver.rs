//! S6 — Driver: composes the pipeline stages end to end (§5, §6).
//!
//! Wires `EdgeListLoader -> CoreOrder -> DAGBuilder -> (optional
//! TrussFilter) -> CliqueEngine`, handling the degenerate-input
//! short-circuits spelled out in §4.7 before any of the heavier stages run.

use std::path::Path;

use clique_builder::prelude::*;
use log::info;

use crate::config::PipelineConfig;
use crate::core_order::core_order;
use crate::dag::build_dag;
use crate::edgelist::EdgeList;
use crate::error::Error;
use crate::{clique, truss};

/// Counts `k`-cliques in the graph stored at `path`.
///
/// Per §4.7: a graph with zero vertices has zero cliques of any size;
/// `k == 2` is answered directly from the edge count, without building a
/// DAG or running the clique engine at all, since every edge is itself a
/// 2-clique.
pub fn count_k_cliques<NI: Idx>(
    path: impl AsRef<Path>,
    k: u8,
    use_truss_filter: bool,
    config: &PipelineConfig,
) -> Result<u64, Error> {
    if k < 2 {
        return Err(Error::ConfigError(format!(
            "k must be at least 2, got {k}"
        )));
    }

    let edges = EdgeList::<NI>::load(path)?;

    if edges.node_count() == NI::zero() {
        return Ok(0);
    }

    if k == 2 {
        return Ok(edges.edge_count() as u64);
    }

    let core = core_order(edges.node_count(), edges.as_slice());
    if (k as usize) > core.degeneracy.index() + 1 {
        info!(
            "k = {} exceeds degeneracy + 1 = {}; no {}-clique can exist",
            k,
            core.degeneracy.index() + 1,
            k
        );
        return Ok(0);
    }

    let dag = build_dag(edges.node_count(), edges.as_slice(), &core.rank)?;

    // Per §6.1 / §9 Open Question 2: the driver always requests the single,
    // unsharded extraction (`start = 0, stride = 1`); the sharding
    // parameters stay part of `extract_filtered`'s signature for embedders.
    let dag = if use_truss_filter {
        truss::extract_filtered(&dag, k, 0, 1, config)?
    } else {
        dag
    };

    Ok(clique::count_cliques(&dag, k, config))
}
