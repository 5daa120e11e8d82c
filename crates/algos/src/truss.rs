//! S4 — TrussFilter: parallel k-truss edge pruning (§4.3).
//!
//! Edge ids are the slot indices into the DAG's flat adjacency array: since
//! the DAG already lists every undirected edge exactly once (as a forward
//! arc), the forward slot index is already a bijection onto `[0, m)` and
//! doubles as the edge id used throughout peeling — no separate id
//! assignment pass is needed.
//!
//! Triangle counting enumerates ordered triples `(i, j, k)` with `j ∈
//! out(i)`, `k ∈ out(j) ∩ out(i)` directly over the DAG's forward rows,
//! using a per-thread `ahash` map from neighbor to edge id (§4.3, §9 "Per-
//! thread hash map for triangle joining"), mirroring the reference crate's
//! `triangle_count.rs` parallel chunked worker-pool shape.
//!
//! Peeling needs neighbors in *either* direction (a common neighbor of the
//! two endpoints of an edge may rank above both, below both, or between
//! them), so a second, undirected CSR is built with both forward and
//! backward adjacency, each slot annotated with the edge id it belongs to,
//! and each row sorted by neighbor id for the two-pointer merge intersection
//! described in §4.3.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use ahash::AHashMap;
use clique_builder::prelude::*;
use log::info;
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::dag::Dag;
use crate::error::Error;

/// A vertex's neighbors in both directions, flattened into one CSR with a
/// parallel `eid` array so a slot can be mapped back to the edge it came
/// from regardless of which endpoint's row it was found in.
struct UndirectedCsr<NI: Idx> {
    cd: Vec<NI>,
    adj: Vec<NI>,
    eid: Vec<NI>,
}

impl<NI: Idx> UndirectedCsr<NI> {
    fn row(&self, v: NI) -> (&[NI], &[NI]) {
        let (start, end) = (self.cd[v.index()].index(), self.cd[v.index() + 1].index());
        (&self.adj[start..end], &self.eid[start..end])
    }
}

/// `edge_of[e] = (s, t)`, the DAG-oriented endpoints of edge `e`, recovered
/// directly from the DAG's CSR row boundaries.
fn edge_endpoints<NI: Idx>(dag: &Dag<NI>) -> Vec<(NI, NI)> {
    let cd = dag.cumulative_degrees();
    let adj = dag.adjacency();
    let n = dag.node_count().index();
    let mut edge_of = vec![(NI::zero(), NI::zero()); adj.len()];
    for v in 0..n {
        let (start, end) = (cd[v].index(), cd[v + 1].index());
        for slot in start..end {
            edge_of[slot] = (NI::new(v), adj[slot]);
        }
    }
    edge_of
}

fn build_undirected_csr<NI: Idx>(dag: &Dag<NI>, edge_of: &[(NI, NI)]) -> UndirectedCsr<NI> {
    let n = dag.node_count().index();
    let m = edge_of.len();

    let degree = vec![AtomicUsize::new(0); n];
    edge_of.par_iter().for_each(|&(s, t)| {
        degree[s.index()].fetch_add(1, Ordering::Relaxed);
        degree[t.index()].fetch_add(1, Ordering::Relaxed);
    });

    let mut cd = vec![NI::zero(); n + 1];
    for v in 0..n {
        cd[v + 1] = cd[v] + NI::new(degree[v].load(Ordering::Relaxed));
    }

    let mut adj = vec![NI::zero(); cd[n].index()];
    let mut eid = vec![NI::zero(); cd[n].index()];
    let cursor: Vec<AtomicUsize> = cd.iter().map(|c| AtomicUsize::new(c.index())).collect();

    (0..m).into_par_iter().for_each(|e| {
        let (s, t) = edge_of[e];
        let s_slot = cursor[s.index()].fetch_add(1, Ordering::AcqRel);
        let t_slot = cursor[t.index()].fetch_add(1, Ordering::AcqRel);
        unsafe {
            let adj_ptr = adj.as_ptr() as *mut NI;
            let eid_ptr = eid.as_ptr() as *mut NI;
            *adj_ptr.add(s_slot) = t;
            *eid_ptr.add(s_slot) = NI::new(e);
            *adj_ptr.add(t_slot) = s;
            *eid_ptr.add(t_slot) = NI::new(e);
        }
    });

    (0..n).into_par_iter().for_each(|v| {
        let (start, end) = (cd[v].index(), cd[v + 1].index());
        let row = unsafe {
            std::slice::from_raw_parts_mut(adj.as_ptr().add(start) as *mut NI, end - start)
        };
        let row_eid = unsafe {
            std::slice::from_raw_parts_mut(eid.as_ptr().add(start) as *mut NI, end - start)
        };
        let mut pairs: Vec<(NI, NI)> = row.iter().copied().zip(row_eid.iter().copied()).collect();
        pairs.sort_unstable();
        for (slot, (neighbor, e)) in pairs.into_iter().enumerate() {
            row[slot] = neighbor;
            row_eid[slot] = e;
        }
    });

    UndirectedCsr { cd, adj, eid }
}

/// Triangle counting over the DAG's forward rows only, per §4.3: each
/// triangle `{i, j, k}` (with `j ∈ out(i)`, `k ∈ out(j) ∩ out(i)`) is
/// discovered exactly once and each of its three edges gets `+1` support.
fn count_triangle_support<NI: Idx>(dag: &Dag<NI>, m: usize) -> Vec<AtomicI64> {
    let start = std::time::Instant::now();
    let supp: Vec<AtomicI64> = (0..m).map(|_| AtomicI64::new(0)).collect();
    let n = dag.node_count().index();
    let max_out_degree = dag.max_out_degree().index();

    (0..n).into_par_iter().for_each(|i| {
        let i = NI::new(i);
        let row = dag.out_neighbors(i);
        let row_start = dag.cumulative_degrees()[i.index()].index();

        let mut neigh_set: AHashMap<NI, usize> = AHashMap::with_capacity(2 * max_out_degree + 1);
        for (offset, &v) in row.iter().enumerate() {
            neigh_set.insert(v, row_start + offset);
        }

        for (offset, &v) in row.iter().enumerate() {
            let e1 = row_start + offset;
            for (v_offset, &w) in dag.out_neighbors(v).iter().enumerate() {
                if let Some(&e3) = neigh_set.get(&w) {
                    let v_row_start = dag.cumulative_degrees()[v.index()].index();
                    let e2 = v_row_start + v_offset;
                    supp[e1].fetch_add(1, Ordering::Relaxed);
                    supp[e2].fetch_add(1, Ordering::Relaxed);
                    supp[e3].fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    });

    info!(
        "TrussFilter: computed triangle support for {m} edges in {:?}",
        start.elapsed()
    );

    supp
}

/// Peels every edge whose triangle support is `< thresh` (i.e. `< k - 2`),
/// repeating the scan/process super-steps of §4.3 until a fixpoint. Returns
/// the final support array; surviving edges (`supp[e] >= thresh`) may
/// participate in a k-clique.
fn peel<NI: Idx>(
    undirected: &UndirectedCsr<NI>,
    edge_of: &[(NI, NI)],
    supp: &[AtomicI64],
    thresh: i64,
    config: &PipelineConfig,
) -> Vec<bool> {
    let start = std::time::Instant::now();
    let m = supp.len();

    if thresh <= 0 {
        return vec![true; m];
    }

    let processed: Vec<AtomicBool> = (0..m).map(|_| AtomicBool::new(false)).collect();
    let in_curr: Vec<AtomicBool> = (0..m).map(|_| AtomicBool::new(false)).collect();

    let mut curr: Vec<usize> = Vec::new();
    let mut level: i64 = 0;

    while level < thresh {
        // --- scan: gather every not-yet-processed edge at or below `level` ---
        let scanned: Vec<Vec<usize>> = (0..m)
            .into_par_iter()
            .chunks(config.truss_chunk_size)
            .map(|chunk| {
                let mut local = Vec::new();
                for e in chunk {
                    if !processed[e].load(Ordering::Relaxed)
                        && supp[e].load(Ordering::Relaxed) <= level
                    {
                        in_curr[e].store(true, Ordering::Relaxed);
                        local.push(e);
                    }
                }
                local
            })
            .collect();
        curr = scanned.into_iter().flatten().collect();

        // --- process super-steps until this level's frontier is empty ---
        while !curr.is_empty() {
            let next_buf: std::sync::Mutex<Vec<usize>> = std::sync::Mutex::new(Vec::new());

            curr.par_iter().for_each(|&e1| {
                let (u, v) = edge_of[e1];

                let mut local_next = Vec::new();
                process_edge::<NI>(
                    undirected, supp, &processed, &in_curr, e1, u, v, level, &mut local_next,
                );

                if !local_next.is_empty() {
                    let mut buf = next_buf.lock().unwrap();
                    buf.extend(local_next);
                }
            });

            let next_frontier = next_buf.into_inner().unwrap();
            for &e in &next_frontier {
                in_curr[e].store(true, Ordering::Relaxed);
            }

            for &e in &curr {
                processed[e].store(true, Ordering::Relaxed);
                in_curr[e].store(false, Ordering::Relaxed);
            }

            curr = next_frontier;
        }

        level += 1;
    }

    info!(
        "TrussFilter: peeling to threshold {thresh} took {:?}",
        start.elapsed()
    );

    (0..m)
        .map(|e| supp[e].load(Ordering::Relaxed) >= thresh)
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn process_edge<NI: Idx>(
    undirected: &UndirectedCsr<NI>,
    supp: &[AtomicI64],
    processed: &[AtomicBool],
    in_curr: &[AtomicBool],
    e1: usize,
    u: NI,
    v: NI,
    level: i64,
    local_next: &mut Vec<usize>,
) {
    let (u_adj, u_eid) = undirected.row(u);
    let (v_adj, v_eid) = undirected.row(v);

    let (mut i, mut j) = (0usize, 0usize);
    while i < u_adj.len() && j < v_adj.len() {
        match u_adj[i].cmp(&v_adj[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                let e2 = v_eid[j].index(); // edge (v, w)
                let e3 = u_eid[i].index(); // edge (u, w)

                if !processed[e2].load(Ordering::Relaxed) && !processed[e3].load(Ordering::Relaxed)
                {
                    let e2_above = supp[e2].load(Ordering::Relaxed) > level;
                    let e3_above = supp[e3].load(Ordering::Relaxed) > level;

                    if e2_above && e3_above {
                        try_decrement(supp, e2, level, local_next);
                        try_decrement(supp, e3, level, local_next);
                    } else if e2_above && (e1 < e3 || !in_curr[e3].load(Ordering::Relaxed)) {
                        try_decrement(supp, e2, level, local_next);
                    } else if e3_above && (e1 < e2 || !in_curr[e2].load(Ordering::Relaxed)) {
                        try_decrement(supp, e3, level, local_next);
                    }
                }
                i += 1;
                j += 1;
            }
        }
    }
}

/// Speculative atomic subtract with a compensating rollback add, per §4.3 /
/// §9 "Atomic rollback pattern": an edge transitions `above -> frontier ->
/// below` at most once per level.
fn try_decrement(supp: &[AtomicI64], e: usize, level: i64, local_next: &mut Vec<usize>) {
    let pre = supp[e].fetch_sub(1, Ordering::AcqRel);
    if pre == level + 1 {
        local_next.push(e);
    } else if pre <= level {
        supp[e].fetch_add(1, Ordering::AcqRel);
    }
}

/// Runs the full S4 pipeline: counts triangle support on the DAG, builds the
/// undirected CSR needed for peeling, peels to `k - 2`, and returns which
/// DAG edges survive.
pub fn truss_filter<NI: Idx>(dag: &Dag<NI>, k: u8, config: &PipelineConfig) -> Vec<bool> {
    let edge_of = edge_endpoints(dag);
    let m = edge_of.len();

    let undirected = build_undirected_csr(dag, &edge_of);
    let supp = count_triangle_support(dag, m);
    let thresh = (k as i64) - 2;
    peel(&undirected, &edge_of, &supp, thresh, config)
}

/// Rebuilds a forward-only DAG keeping only edges that survived the filter
/// (§4.3 "Rebuild").
pub fn rebuild_filtered<NI: Idx>(dag: &Dag<NI>, survives: &[bool]) -> Result<Dag<NI>, Error> {
    Dag::from_surviving_edges(dag, survives)
}

/// The `extractFiltered` entry of the §6 core API: truss-filters `dag` down
/// to edges with support `>= threshold`, restricted to the induced subgraph
/// of a shard of pivot vertices plus their out-neighbors.
///
/// Grounded in `original_source/DDegColNodeParallel.c`'s `extractSub(dag,
/// startV, stride, thresh)`: that function first marks `vExist[v]` for every
/// `v` in `startV, startV+stride, ...` and each of their out-neighbors, then
/// runs triangle counting and peeling only over the induced subgraph on
/// `vExist`. Per §9 Open Question 2, `startV`/`stride` are preserved in the
/// signature so a caller could shard the filter across independent
/// processes, but the driver (§6.1) always calls `(start: 0, stride: 1)`,
/// for which every vertex is in its own shard and the mask is a no-op —
/// `extract_filtered(dag, k, 0, 1, config)` filters the whole graph exactly
/// like `truss_filter` + `rebuild_filtered` composed directly.
pub fn extract_filtered<NI: Idx>(
    dag: &Dag<NI>,
    k: u8,
    start: usize,
    stride: usize,
    config: &PipelineConfig,
) -> Result<Dag<NI>, Error> {
    assert!(stride > 0, "stride must be positive");

    let n = dag.node_count().index();
    let sharded = shard_induced_subgraph(dag, start, stride, n)?;

    let survives = truss_filter(&sharded, k, config);
    rebuild_filtered(&sharded, &survives)
}

/// Builds the induced subgraph on `{v : v in startV, startV+stride, ...} ∪
/// out-neighbors of those vertices`, dropping every out-edge with an
/// endpoint outside that vertex set. Vertex ids and the `n` dimension are
/// left unchanged so the result composes with the rest of the pipeline.
fn shard_induced_subgraph<NI: Idx>(
    dag: &Dag<NI>,
    start: usize,
    stride: usize,
    n: usize,
) -> Result<Dag<NI>, Error> {
    let mut exists = vec![false; n];
    let mut v = start;
    while v < n {
        exists[v] = true;
        for &w in dag.out_neighbors(NI::new(v)) {
            exists[w.index()] = true;
        }
        v += stride;
    }

    let survives: Vec<bool> = (0..n)
        .flat_map(|v| {
            dag.out_neighbors(NI::new(v))
                .iter()
                .map(move |&w| exists[v] && exists[w.index()])
        })
        .collect();

    Dag::from_surviving_edges(dag, &survives)
}
