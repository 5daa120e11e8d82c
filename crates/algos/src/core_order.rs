//! S2 — CoreOrder: degeneracy ordering via a min-degree bucket heap (§4.1).
//!
//! Builds a temporary undirected CSR purely to drive the heap (discarded
//! once the ranking is computed), then repeatedly pops the minimum-degree
//! vertex, assigning it the next-lowest rank and decrementing its
//! still-resident neighbors. This stage is serial, grounded directly in
//! `original_source/DDegColNodeParallel.c`'s `bheap`/`ord_core` (array-backed
//! binary heap plus a key-to-position index, `pt[key] == -1` meaning
//! absent — represented here with `Option<usize>` rather than a sentinel
//! value, following the reference crate's preference for `Option` over
//! magic constants elsewhere, e.g. `dss.rs`'s use of `compare_exchange`
//! results rather than sentinel parents).

use clique_builder::prelude::*;
use log::info;
use std::time::Instant;

/// Result of degeneracy ordering: a permutation plus the observed core
/// value (the degeneracy `D`, the maximum value popped from the heap).
pub struct CoreOrder<NI: Idx> {
    /// `rank[v]` is the position of vertex `v` in the degeneracy ordering;
    /// `rank[v] == n - 1` for the vertex popped first.
    pub rank: Vec<NI>,
    /// The degeneracy of the graph: the maximum residual degree seen at
    /// pop time.
    pub degeneracy: NI,
}

/// A key-indexed binary min-heap keyed by residual degree, with an
/// array-backed position index enabling `O(log n)` `decrement`.
struct DegreeHeap<NI: Idx> {
    /// `heap[i] = (key, value)`.
    heap: Vec<(NI, NI)>,
    /// `pos[key] = Some(i)` if `key` is at `heap[i]`, `None` if popped.
    pos: Vec<Option<usize>>,
}

impl<NI: Idx> DegreeHeap<NI> {
    fn new(degrees: &[NI]) -> Self {
        let heap: Vec<(NI, NI)> = degrees
            .iter()
            .enumerate()
            .map(|(i, &d)| (NI::new(i), d))
            .collect();
        let pos = (0..heap.len()).map(Some).collect();
        let mut this = Self { heap, pos };
        // Build the heap bottom-up: this is equivalent to repeated
        // `bubble_up` from the reference's incremental `insert`, but linear
        // instead of `O(n log n)`.
        for i in (0..this.heap.len() / 2).rev() {
            this.bubble_down(i);
        }
        this
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.pos[self.heap[i].0.index()] = Some(j);
        self.pos[self.heap[j].0.index()] = Some(i);
        self.heap.swap(i, j);
    }

    fn bubble_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[parent].1 > self.heap[i].1 {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn bubble_down(&mut self, mut i: usize) {
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            let mut smallest = i;
            if left < self.len() && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < self.len() && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    /// Decrements the value for `key` by one, if it is still present.
    fn decrement(&mut self, key: NI) {
        if let Some(i) = self.pos[key.index()] {
            self.heap[i].1 = self.heap[i].1 - NI::new(1);
            self.bubble_up(i);
        }
    }

    /// Removes and returns the `(key, value)` with the smallest value.
    fn pop_min(&mut self) -> (NI, NI) {
        let min = self.heap[0];
        self.pos[min.0.index()] = None;
        let last = self.heap.pop().unwrap();
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last.0.index()] = Some(0);
            self.bubble_down(0);
        }
        min
    }
}

/// Builds a temporary undirected degree/adjacency CSR used only to drive
/// the heap; mirrors `mkgraph`'s undirected-degree pass in the reference C
/// source, but kept private to this module since nothing downstream needs
/// it once ranking is done.
fn build_undirected_csr<NI: Idx>(n: usize, edges: &[(NI, NI)]) -> (Vec<usize>, Vec<NI>) {
    let mut degree = vec![0usize; n];
    for &(s, t) in edges {
        degree[s.index()] += 1;
        degree[t.index()] += 1;
    }

    let mut cd = vec![0usize; n + 1];
    for i in 0..n {
        cd[i + 1] = cd[i] + degree[i];
    }

    let mut cursor = cd.clone();
    let mut adj = vec![NI::zero(); cd[n]];
    for &(s, t) in edges {
        adj[cursor[s.index()]] = t;
        cursor[s.index()] += 1;
        adj[cursor[t.index()]] = s;
        cursor[t.index()] += 1;
    }

    (cd, adj)
}

/// Computes the degeneracy ordering of the graph described by `n` vertices
/// and `edges`. Returns `rank[v] = n - 1 - i` where `i` is the pop index of
/// `v`, and the degeneracy `D` (the maximum popped residual degree).
pub fn core_order<NI: Idx>(n: NI, edges: &[(NI, NI)]) -> CoreOrder<NI> {
    let start = Instant::now();
    let n_usize = n.index();

    if n_usize == 0 {
        return CoreOrder {
            rank: Vec::new(),
            degeneracy: NI::zero(),
        };
    }

    let (cd, adj) = build_undirected_csr(n_usize, edges);

    let degree: Vec<NI> = (0..n_usize).map(|v| NI::new(cd[v + 1] - cd[v])).collect();
    let mut heap = DegreeHeap::new(&degree);

    let mut rank = vec![NI::zero(); n_usize];
    let mut degeneracy = NI::zero();

    for i in 0..n_usize {
        let (v, value) = heap.pop_min();
        degeneracy = degeneracy.max(value);
        rank[v.index()] = NI::new(n_usize - 1 - i);

        for j in cd[v.index()]..cd[v.index() + 1] {
            heap.decrement(adj[j]);
        }
    }

    info!(
        "CoreOrder: degeneracy = {}, {:?}",
        degeneracy.index(),
        start.elapsed()
    );

    CoreOrder { rank, degeneracy }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_has_degeneracy_two() {
        let n = 3u32;
        let edges = vec![(0u32, 1), (1, 2), (0, 2)];
        let result = core_order(n, &edges);
        assert_eq!(result.degeneracy, 2);
        // Every vertex has degree 2 in a triangle, so any rank order is a
        // valid degeneracy order; just check it's a permutation.
        let mut sorted = result.rank.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn path_has_degeneracy_one() {
        // 0 - 1 - 2 - 3 - 4
        let edges = vec![(0u32, 1), (1, 2), (2, 3), (3, 4)];
        let result = core_order(5, &edges);
        assert_eq!(result.degeneracy, 1);
    }

    #[test]
    fn k5_has_degeneracy_four() {
        let mut edges = vec![];
        for i in 0u32..5 {
            for j in (i + 1)..5 {
                edges.push((i, j));
            }
        }
        let result = core_order(5, &edges);
        assert_eq!(result.degeneracy, 4);
    }

    #[test]
    fn empty_graph_has_degeneracy_zero() {
        let result = core_order::<u32>(0, &[]);
        assert_eq!(result.degeneracy, 0);
        assert!(result.rank.is_empty());
    }
}
