use thiserror::Error;

/// Errors produced while loading edges, ordering, or counting k-cliques.
#[derive(Error, Debug)]
pub enum Error {
    #[error("error while loading graph")]
    IoError {
        #[from]
        source: std::io::Error,
    },
    #[error("error while loading graph")]
    BuilderError {
        #[from]
        source: clique_builder::Error,
    },
    #[error("incompatible index type")]
    IdxError {
        #[from]
        source: std::num::TryFromIntError,
    },
    #[error("invalid argument: {0}")]
    ConfigError(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
