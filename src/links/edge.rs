//! Edge state definitions for the link graph
//!
//! One hyperlink is stored as two cells in two different rows. Each cell is
//! written on its own, so an edge can be observed with only one half present.

use std::fmt;

/// Represents how much of one link edge is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeState {
    /// Neither half is stored
    Unwritten,

    /// The source row has the outlink, the target row lacks the inlink
    ForwardOnly,

    /// The target row has the inlink, the source row lacks the outlink
    BackwardOnly,

    /// Both halves are stored
    Complete,
}

impl EdgeState {
    /// Builds the state from which halves are present
    pub fn from_halves(forward: bool, backward: bool) -> Self {
        match (forward, backward) {
            (false, false) => Self::Unwritten,
            (true, false) => Self::ForwardOnly,
            (false, true) => Self::BackwardOnly,
            (true, true) => Self::Complete,
        }
    }

    /// Returns true if the outlink cell on the source row is present
    pub fn has_forward(&self) -> bool {
        matches!(self, Self::ForwardOnly | Self::Complete)
    }

    /// Returns true if the inlink cell on the target row is present
    pub fn has_backward(&self) -> bool {
        matches!(self, Self::BackwardOnly | Self::Complete)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns true if exactly one half is present
    ///
    /// Half-edges are stable and repairable; they are not errors.
    pub fn is_half_edge(&self) -> bool {
        matches!(self, Self::ForwardOnly | Self::BackwardOnly)
    }

    /// The state after the missing halves in `other` are added
    pub fn merge(self, other: EdgeState) -> Self {
        Self::from_halves(
            self.has_forward() || other.has_forward(),
            self.has_backward() || other.has_backward(),
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unwritten => "unwritten",
            Self::ForwardOnly => "forward_only",
            Self::BackwardOnly => "backward_only",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for EdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
