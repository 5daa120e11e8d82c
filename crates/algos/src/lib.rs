//! Degeneracy-ordered, color-pruned, node-parallel k-clique counting, with
//! an optional k-truss pre-filter.
//!
//! The pipeline is a straight line through this crate's modules:
//!
//! 1. [`edgelist`] reads the raw graph and drops self-loops.
//! 2. [`core_order`] computes a degeneracy ordering.
//! 3. [`dag`] orients every edge towards the lower-ranked endpoint.
//! 4. [`truss`] optionally prunes edges that cannot belong to a `k`-clique.
//! 5. [`clique`] counts `k`-cliques over the (possibly pruned) DAG.
//!
//! [`driver`] composes all of the above; most callers only need
//! [`driver::count_k_cliques`].

pub mod clique;
pub mod config;
pub mod core_order;
pub mod dag;
pub mod driver;
pub mod edgelist;
pub mod error;
pub mod truss;

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::core_order::{core_order, CoreOrder};
    pub use crate::dag::{build_dag, Dag};
    pub use crate::driver::count_k_cliques;
    pub use crate::edgelist::EdgeList;
    pub use crate::error::Error;
}
