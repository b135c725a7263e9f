//! Error taxonomy (spec.md §7): invalid configuration, concurrency-primitive
//! failure, and graphics-backend failure are all fatal; a benign-transient
//! failure (palette grow) is handled inline by its own caller and never
//! reaches this type.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("concurrency primitive failure: {0}")]
    Concurrency(String),

    #[error("graphics backend failure: {0}")]
    Graphics(String),
}
