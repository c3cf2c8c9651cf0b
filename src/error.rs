// ⚠️ Resolver Errors - Everything the core can reject
// Configuration is validated before any record is touched, unknown ids are
// reported instead of silently growing the forest.

use thiserror::Error;

use crate::record::RecordId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Match threshold must lie inside the scorer range [0, 100]
    #[error("match threshold out of range [0, 100]: {0}")]
    InvalidThreshold(u32),

    /// Block prefix length must be positive
    #[error("block prefix length must be positive, got {0}")]
    InvalidPrefixLength(usize),

    /// Record id was never registered with the disjoint-set forest
    #[error("record id {id} is outside the initialized range 0..{len}")]
    UnknownRecord { id: RecordId, len: usize },

    /// Normalized record whose id does not match its position in the input
    #[error("record at position {position} carries id {id}")]
    MisalignedRecord { position: usize, id: RecordId },
}

pub type ResolveResult<T> = Result<T, ResolveError>;
