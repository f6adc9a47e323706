//! Navigation grid and time-sliced planners for the tickpath engine.
//!
//! - [`NavGrid`]: an octile grid over the X/Z plane implementing
//!   [`SearchSpace`]; diagonal moves never cut past a blocked cell.
//! - [`PathPlanner`]: a best-first open/closed-list search expanding with
//!   either **A\*** or **Jump Point Search**, at most
//!   [`PathPlannerData::max_revolutions`] nodes per call.
//!
//! Nodes live in the search space and are addressed by [`NodeId`]; the
//! planner only writes their costs and parent links.

mod astar;
mod distance;
mod jps;
mod navgrid;
mod node;
mod planner;
mod search_space;

pub use distance::{edge_cost, heuristic};
pub use navgrid::{GridLayout, NavGrid};
pub use node::{Adjacency, NodeId, NodeType, PathNode};
pub use planner::{
    DEFAULT_MAX_REVOLUTIONS, Path, PathPlanner, PathPlannerData, PathPlannerType, SearchState,
};
pub use search_space::{SearchSpace, SearchSpaceData, SearchSpaceError, SearchSpaceType};
