//! The engine facade: one search space, one scheduler.

use std::fmt;

use log::debug;
use tickpath_paths::{
    GridLayout, NavGrid, PathPlannerData, SearchSpace, SearchSpaceData, SearchSpaceError,
    SearchSpaceType,
};

use crate::request::{PathRequestData, PathRequestId};
use crate::scheduler::PathRequestScheduler;

/// Everything needed to bring up a [`Pathfinder`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderData {
    pub search_space_data: SearchSpaceData,
    pub path_planner_data: PathPlannerData,
    /// Which cells of the grid are blocked.
    pub layout: GridLayout,
}

/// Errors raised by [`Pathfinder::init`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathfinderError {
    SearchSpace(SearchSpaceError),
}

impl fmt::Display for PathfinderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchSpace(e) => write!(f, "pathfinder: {e}"),
        }
    }
}

impl std::error::Error for PathfinderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SearchSpace(e) => Some(e),
        }
    }
}

impl From<SearchSpaceError> for PathfinderError {
    fn from(e: SearchSpaceError) -> Self {
        Self::SearchSpace(e)
    }
}

/// Owns the navigation grid and serves path requests against it.
///
/// Call [`update`](Self::update) once per simulation tick.
#[derive(Debug)]
pub struct Pathfinder {
    search_space: NavGrid,
    scheduler: PathRequestScheduler,
}

impl Pathfinder {
    /// Build the search space and the planner.
    pub fn init(data: PathfinderData) -> Result<Self, PathfinderError> {
        let mut search_space = match data.search_space_data.search_space_type {
            SearchSpaceType::OctileGrid => NavGrid::new(data.search_space_data, data.layout)?,
        };
        search_space.build();
        debug!(
            "pathfinder ready: {:?} planner, {} revolutions per tick",
            data.path_planner_data.planner_type, data.path_planner_data.max_revolutions
        );
        Ok(Self {
            search_space,
            scheduler: PathRequestScheduler::new(data.path_planner_data),
        })
    }

    /// Queue a request; see [`PathRequestScheduler::request_path`].
    pub fn request_path(&mut self, data: PathRequestData) -> PathRequestId {
        self.scheduler.request_path(data)
    }

    pub fn cancel_request(&mut self, id: PathRequestId) -> bool {
        self.scheduler.cancel_request(id)
    }

    /// Run one tick of path planning.
    pub fn update(&mut self) {
        self.scheduler.update(&mut self.search_space);
    }

    /// Switch planner strategy or budget without rebuilding the grid.
    pub fn set_path_planner(&mut self, data: PathPlannerData) {
        self.scheduler.set_path_planner(&mut self.search_space, data);
    }

    pub fn search_space(&self) -> &NavGrid {
        &self.search_space
    }

    pub fn scheduler(&self) -> &PathRequestScheduler {
        &self.scheduler
    }
}
