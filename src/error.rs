use core::fmt;

use crate::mirror::{EntityId, LineId};

/// Fixed-point arithmetic failure. Scores and masses are never negative in
/// this domain, so an underflow means the caller combined values that the
/// authoritative stream never produces; the operation is rejected and the
/// prior value retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WadError {
    Underflow,
}

impl fmt::Display for WadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow => write!(f, "fixed-point subtraction would go negative"),
        }
    }
}

impl std::error::Error for WadError {}

/// A state delta that references entities or lines in an inconsistent way.
///
/// None of these are fatal: the delta is logged and dropped, the mirror is
/// left untouched, and the view self-corrects on the next valid delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaError {
    /// Update or removal of an id that was never created (or already removed).
    UnknownEntity(EntityId),
    /// Creation of an id that is already alive.
    DuplicateEntity(EntityId),
    /// Placement named a neighbor that is not on the target line.
    UnknownNeighbor { id: EntityId, neighbor: EntityId },
    /// Delta named a line outside the configured world.
    LineOutOfRange { id: EntityId, line: LineId },
    /// Placement named the entity itself as its neighbor.
    SelfNeighbor(EntityId),
}

impl fmt::Display for DeltaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntity(id) => write!(f, "unknown entity {id}"),
            Self::DuplicateEntity(id) => write!(f, "entity {id} already exists"),
            Self::UnknownNeighbor { id, neighbor } => {
                write!(f, "entity {id} placed next to {neighbor}, which is not on the target line")
            }
            Self::LineOutOfRange { id, line } => {
                write!(f, "entity {id} references out-of-range line {line}")
            }
            Self::SelfNeighbor(id) => write!(f, "entity {id} named itself as its neighbor"),
        }
    }
}

impl std::error::Error for DeltaError {}
