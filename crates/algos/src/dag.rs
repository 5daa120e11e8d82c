//! S3 — DAGBuilder: orient every edge from higher rank to lower rank and
//! bucket the result into a forward-only CSR (§4.2).
//!
//! The bucketing itself follows the reference crate's parallel CSR
//! construction idiom used throughout `clique_builder::graph::csr` and
//! `graph_ops.rs`: compute per-vertex out-degree with atomic counters,
//! prefix-scan into cumulative offsets, then scatter into a flat `adj`
//! array using a second pass of atomic write-cursors (`SharedMut`-style
//! unsafe parallel writes guarded by disjoint, pre-reserved index ranges —
//! see `graph_ops.rs`'s use of `Arc<SharedMut<_>>` inside `for_each_node_par`).

use std::sync::atomic::{AtomicUsize, Ordering};

use clique_builder::prelude::*;
use log::info;
use rayon::prelude::*;

use crate::error::Error;

/// The degeneracy-oriented DAG: `cd[0..n]` cumulative out-degree,
/// `adj[0..cd[n])` out-neighbor ids. Every vertex's out-neighbors have
/// strictly lower rank, and the maximum out-degree equals the degeneracy.
#[derive(Debug, Clone)]
pub struct Dag<NI: Idx> {
    cd: Vec<NI>,
    adj: Vec<NI>,
}

impl<NI: Idx> Dag<NI> {
    pub fn node_count(&self) -> NI {
        NI::new(self.cd.len() - 1)
    }

    pub fn edge_count(&self) -> usize {
        self.cd.last().copied().unwrap_or(NI::zero()).index()
    }

    pub fn out_degree(&self, v: NI) -> NI {
        self.cd[v.index() + 1] - self.cd[v.index()]
    }

    pub fn out_neighbors(&self, v: NI) -> &[NI] {
        &self.adj[self.cd[v.index()].index()..self.cd[v.index() + 1].index()]
    }

    pub fn cumulative_degrees(&self) -> &[NI] {
        &self.cd
    }

    pub fn adjacency(&self) -> &[NI] {
        &self.adj
    }

    /// The maximum out-degree over all vertices: the degeneracy `D` used to
    /// size per-thread clique-engine scratch (§4.2).
    pub fn max_out_degree(&self) -> NI {
        (0..self.cd.len() - 1)
            .map(|v| self.cd[v + 1] - self.cd[v])
            .max()
            .unwrap_or(NI::zero())
    }

    /// Rebuilds a DAG keeping only the out-edges whose slot in `adjacency()`
    /// is marked `true` in `survives`, used by the truss filter to drop
    /// edges below the support threshold (§4.3 "Rebuild") while preserving
    /// the forward-only CSR shape the clique engine expects.
    pub(crate) fn from_surviving_edges(dag: &Dag<NI>, survives: &[bool]) -> Result<Self, Error> {
        let n = dag.node_count().index();
        let oriented: Vec<(NI, NI)> = (0..n)
            .flat_map(|v| {
                let (start, end) = (dag.cd[v].index(), dag.cd[v + 1].index());
                (start..end)
                    .filter(move |&slot| survives[slot])
                    .map(move |slot| (NI::new(v), dag.adj[slot]))
            })
            .collect();

        // Already oriented (higher rank first); `from_oriented`'s invariant
        // checks still hold since pruning only removes edges.
        Self::from_oriented(n, &oriented)
    }

    fn from_oriented(n: usize, oriented: &[(NI, NI)]) -> Result<Self, Error> {
        let degree = AtomicCounters::new(n);
        oriented.par_iter().for_each(|&(s, _)| {
            degree.increment(s.index());
        });

        let mut cd = vec![NI::zero(); n + 1];
        for v in 0..n {
            cd[v + 1] = cd[v] + NI::new(degree.get(v));
        }

        let mut adj = vec![NI::zero(); cd[n].index()];
        let cursor = AtomicCounters::from_vec(cd.iter().map(|c| c.index()).collect());
        oriented.par_iter().for_each(|&(s, t)| unsafe {
            let slot = cursor.take(s.index());
            let ptr = adj.as_ptr() as *mut NI;
            *ptr.add(slot) = t;
        });

        if cfg!(debug_assertions) {
            for v in 0..n {
                let row = &adj[cd[v].index()..cd[v + 1].index()];
                let mut sorted = row.to_vec();
                sorted.sort_unstable();
                for w in &sorted {
                    if *w == NI::new(v) {
                        return Err(Error::InvariantViolation(format!(
                            "self-edge survived relabeling at vertex {v}"
                        )));
                    }
                }
                for pair in sorted.windows(2) {
                    if pair[0] == pair[1] {
                        return Err(Error::InvariantViolation(format!(
                            "duplicate out-neighbor for vertex {v}"
                        )));
                    }
                }
            }
        }

        Ok(Self { cd, adj })
    }
}

/// Thin wrapper over `Vec<AtomicUsize>` used both for degree accumulation
/// (read via `get`) and for write-cursor reservation (mutated via `take`,
/// an atomic fetch-and-add), mirroring the reference's pattern of a single
/// atomic counters array serving both roles across a stage's two passes.
struct AtomicCounters(Vec<AtomicUsize>);

impl AtomicCounters {
    fn new(n: usize) -> Self {
        Self((0..n).map(|_| AtomicUsize::new(0)).collect())
    }

    fn from_vec(v: Vec<usize>) -> Self {
        Self(v.into_iter().map(AtomicUsize::new).collect())
    }

    fn increment(&self, i: usize) {
        self.0[i].fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self, i: usize) -> usize {
        self.0[i].load(Ordering::Relaxed)
    }

    fn take(&self, i: usize) -> usize {
        self.0[i].fetch_add(1, Ordering::AcqRel)
    }
}

/// Builds the DAG from a rank array and the raw (unoriented) edges: every
/// edge is oriented so its source has the higher rank (§4.2), i.e. `s` is
/// later in the degeneracy pop order than `t`.
pub fn build_dag<NI: Idx>(n: NI, edges: &[(NI, NI)], rank: &[NI]) -> Result<Dag<NI>, Error> {
    let start = std::time::Instant::now();
    let n_usize = n.index();

    let oriented: Vec<(NI, NI)> = edges
        .par_iter()
        .map(|&(u, v)| {
            let (ru, rv) = (rank[u.index()], rank[v.index()]);
            if ru > rv {
                (u, v)
            } else {
                (v, u)
            }
        })
        .collect();

    let dag = Dag::from_oriented(n_usize, &oriented)?;

    info!(
        "DAGBuilder: {} vertices, {} edges, max out-degree {} in {:?}",
        n_usize,
        dag.edge_count(),
        dag.max_out_degree().index(),
        start.elapsed()
    );

    Ok(dag)
}
