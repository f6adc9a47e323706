use std::fmt;

use tickpath_core::Vec3;

use crate::node::{Adjacency, NodeId, PathNode};

/// Concrete search space to build.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchSpaceType {
    #[default]
    OctileGrid,
}

/// Grid-space configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpaceData {
    pub search_space_type: SearchSpaceType,
    /// World-space corner with the smallest X and Z.
    pub anchor_position: Vec3,
    pub world_size: Vec3,
    pub cell_size: f32,
}

impl Default for SearchSpaceData {
    fn default() -> Self {
        Self {
            search_space_type: SearchSpaceType::OctileGrid,
            anchor_position: Vec3::new(-50.0, 0.0, -50.0),
            world_size: Vec3::new(100.0, 100.0, 100.0),
            cell_size: 10.0,
        }
    }
}

impl SearchSpaceData {
    /// Number of whole cells along X and Z.
    pub fn cell_counts(&self) -> (i32, i32) {
        (
            (self.world_size.x / self.cell_size).floor() as i32,
            (self.world_size.z / self.cell_size).floor() as i32,
        )
    }

    /// Check that the configuration describes at least one cell.
    pub fn validate(&self) -> Result<(), SearchSpaceError> {
        let size = self.world_size;
        if !(size.x.is_finite() && size.z.is_finite() && size.x > 0.0 && size.z > 0.0) {
            return Err(SearchSpaceError::InvalidWorldSize(size));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SearchSpaceError::InvalidCellSize(self.cell_size));
        }
        let (cells_x, cells_z) = self.cell_counts();
        if cells_x < 1 || cells_z < 1 {
            return Err(SearchSpaceError::EmptyGrid { cells_x, cells_z });
        }
        Ok(())
    }
}

/// Errors raised while configuring a search space.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchSpaceError {
    /// World extent on X or Z is not strictly positive.
    InvalidWorldSize(Vec3),
    /// Cell size is not strictly positive.
    InvalidCellSize(f32),
    /// The world is smaller than a single cell.
    EmptyGrid { cells_x: i32, cells_z: i32 },
}

impl fmt::Display for SearchSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWorldSize(size) => {
                write!(f, "search space: world size {size} must be positive on X and Z")
            }
            Self::InvalidCellSize(cell) => {
                write!(f, "search space: cell size {cell} must be positive")
            }
            Self::EmptyGrid { cells_x, cells_z } => {
                write!(f, "search space: grid of {cells_x}x{cells_z} cells is empty")
            }
        }
    }
}

impl std::error::Error for SearchSpaceError {}

/// A discretised navigable world that owns its [`PathNode`]s.
///
/// Planners address nodes by [`NodeId`] and mutate only their search
/// bookkeeping (costs and parent).
pub trait SearchSpace {
    /// Allocate nodes, decide occupancy and link neighbours.
    fn build(&mut self);

    /// The node whose cell contains `position`, if any.
    fn localise(&self, position: Vec3) -> Option<NodeId>;

    fn nodes(&self) -> &[PathNode];

    fn nodes_mut(&mut self) -> &mut [PathNode];

    #[inline]
    fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes()[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes_mut()[id.index()]
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    /// The node reached from `from` by a valid edge in direction `dir`.
    #[inline]
    fn neighbour(&self, from: NodeId, dir: Adjacency) -> Option<NodeId> {
        self.node(from).neighbour(dir)
    }
}
