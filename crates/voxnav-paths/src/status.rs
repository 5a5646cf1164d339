use std::fmt;

use voxnav_core::BlockPos;

/// Where a search stands.
///
/// `Calculating` moves to exactly one of the other two and stays there.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStatus {
    #[default]
    Calculating,
    PathFound,
    PathNotFound,
}

impl PathStatus {
    /// Whether the search has finished, successfully or not.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Calculating)
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Calculating => "calculating",
            Self::PathFound => "path found",
            Self::PathNotFound => "path not found",
        })
    }
}

/// One block of a found path with the cost recorded for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub pos: BlockPos,
    /// Cumulative cost from the source.
    pub g: i32,
}
