//! Error types.
//!
//! Only document-level precondition failures are errors. Placement
//! problems found while typesetting (measure over-run, dangling slur, …)
//! are collected as [`Log`](crate::renderer::Log) entries instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No key annotation anchored at notation 0
    #[error("sheet has no key at the first notation")]
    MissingMode,

    /// No time signature anchored at notation 0
    #[error("sheet has no time signature at the first notation")]
    MissingBeat,

    #[error("time signature at notation {index} is invalid: {numerator}/{denominator}")]
    InvalidBeat {
        index: usize,
        numerator: u32,
        denominator: u32,
    },

    #[error("notation {index} is invalid: {reason}")]
    InvalidNotation { index: usize, reason: String },

    #[error("notation index {index} is out of range (sheet has {len} notations)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
