//! S1 — EdgeListLoader.
//!
//! Reads a raw edge list, drops self-loops, and determines the dense vertex
//! id range `[0, n)`. The heavy lifting of parsing the file (memory-mapped,
//! chunked, parallel) is delegated to [`clique_builder::input::edgelist`],
//! exactly as the reference workspace's own algorithm binaries delegate
//! parsing to the builder crate (see `crates/app/src/triangle_count.rs`);
//! this module only adds the clique-pipeline-specific self-loop filter on
//! top, grounded in `original_source/DDegColNodeParallel.c`'s `readedgelist`
//! (`if (s==t) continue;`).

use std::path::Path;
use std::time::Instant;

use clique_builder::prelude::*;
use log::info;

use crate::error::Error;

/// A deduplicated-by-construction-only, dense-vertex-id edge list.
///
/// Vertex ids are `[0, n)`; `n` is one plus the maximum observed id. Edges
/// are unoriented `(s, t)` pairs as read from the file; orientation towards
/// the degeneracy DAG happens later, in [`crate::dag`].
#[derive(Debug, Clone)]
pub struct EdgeList<NI: Idx> {
    n: NI,
    edges: Vec<(NI, NI)>,
}

impl<NI: Idx> EdgeList<NI> {
    /// Builds an edge list directly from a vertex count and a set of pairs,
    /// without going through a file. Used by unit and property tests.
    pub fn from_edges(n: NI, edges: Vec<(NI, NI)>) -> Self {
        Self { n, edges }
    }

    /// Reads an edge list from `path`: one edge per line, two
    /// whitespace-separated non-negative integers. Self-loops are dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let start = Instant::now();

        let raw = clique_builder::input::EdgeList::<NI, ()>::from_path(path.as_ref())
            .map_err(|source| Error::BuilderError { source })?;

        let mut max_id = NI::zero();
        let mut edges = Vec::with_capacity(raw.len());
        for &(s, t, ()) in raw.iter() {
            if s == t {
                continue;
            }
            max_id = max_id.max(s).max(t);
            edges.push((s, t));
        }

        let n = if edges.is_empty() {
            NI::zero()
        } else {
            max_id + NI::new(1)
        };

        info!(
            "Loaded {} edges over {} vertices in {:?}",
            edges.len(),
            n.index(),
            start.elapsed()
        );

        Ok(Self { n, edges })
    }

    /// Number of vertices, dense in `[0, n)`.
    pub fn node_count(&self) -> NI {
        self.n
    }

    /// Number of stored (unoriented) edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NI, NI)> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[(NI, NI)] {
        &self.edges
    }

    /// Removes duplicate unordered edges, canonicalizing `(s, t)` and `(t,
    /// s)` to the same representation first. Per §9 Open Question 3: the
    /// loader itself does not dedup (matching the original), but callers
    /// that cannot guarantee a simple input can opt in.
    pub fn dedup(&mut self) {
        for edge in &mut self.edges {
            if edge.0 > edge.1 {
                std::mem::swap(&mut edge.0, &mut edge.1);
            }
        }
        self.edges.sort_unstable();
        self.edges.dedup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_self_loops_and_tracks_node_count() {
        let edges = vec![(0u32, 1), (1, 1), (2, 3)];
        let el = EdgeList::from_edges(4, edges);
        assert_eq!(el.edge_count(), 3);
    }

    #[test]
    fn dedup_canonicalizes_orientation() {
        let mut el = EdgeList::from_edges(3u32, vec![(0, 1), (1, 0), (1, 2)]);
        el.dedup();
        assert_eq!(el.as_slice(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn empty_edge_list_has_zero_nodes() {
        let el = EdgeList::<u32>::from_edges(0, vec![]);
        assert_eq!(el.node_count(), 0);
        assert_eq!(el.edge_count(), 0);
    }
}
