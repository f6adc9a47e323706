//! Path requests and the results delivered for them.

use std::fmt;

use tickpath_core::Vec3;
use tickpath_paths::Path;

/// Identity of a submitted request. Ids start at 1 and are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRequestId(pub u64);

impl fmt::Display for PathRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Queue tier of a request.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathRequestPriority {
    #[default]
    Normal,
}

impl PathRequestPriority {
    pub const COUNT: usize = 1;

    /// All tiers, most urgent first.
    pub const ALL: [PathRequestPriority; Self::COUNT] = [PathRequestPriority::Normal];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Outcome reported to a request's callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathRequestResultStatus {
    PathFound,
    /// The search exhausted every reachable node without meeting the goal.
    PathNotFound,
    StartNotLocalised,
    GoalNotLocalised,
    StartBlocked,
    GoalBlocked,
}

impl PathRequestResultStatus {
    #[inline]
    pub fn is_found(self) -> bool {
        self == Self::PathFound
    }
}

impl fmt::Display for PathRequestResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PathFound => "path found",
            Self::PathNotFound => "path not found",
            Self::StartNotLocalised => "path not found: start not localised",
            Self::GoalNotLocalised => "path not found: goal not localised",
            Self::StartBlocked => "path not found: start blocked",
            Self::GoalBlocked => "path not found: goal blocked",
        };
        f.write_str(s)
    }
}

/// Result callback. The path is empty for every status but
/// [`PathFound`](PathRequestResultStatus::PathFound).
pub type PathRequestCallback = Box<dyn FnMut(PathRequestId, PathRequestResultStatus, Path)>;

/// What a caller asks for.
pub struct PathRequestData {
    pub start: Vec3,
    pub goal: Vec3,
    pub priority: PathRequestPriority,
    pub on_path_request_result: PathRequestCallback,
}

impl PathRequestData {
    /// A normal-priority request reporting to `on_result`.
    pub fn new<F>(start: Vec3, goal: Vec3, on_result: F) -> Self
    where
        F: FnMut(PathRequestId, PathRequestResultStatus, Path) + 'static,
    {
        Self {
            start,
            goal,
            priority: PathRequestPriority::Normal,
            on_path_request_result: Box::new(on_result),
        }
    }

    pub fn with_priority(mut self, priority: PathRequestPriority) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Debug for PathRequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequestData")
            .field("start", &self.start)
            .field("goal", &self.goal)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a request inside the scheduler.
///
/// `Queued -> Running -> Completed`, with `Running -> Interrupted -> Running`
/// when its search is abandoned and must start over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PathRequestState {
    #[default]
    Invalid,
    Queued,
    Running,
    Interrupted,
    Completed,
}

/// A registered request.
#[derive(Debug)]
pub struct PathRequest {
    pub(crate) id: PathRequestId,
    pub(crate) state: PathRequestState,
    pub(crate) data: PathRequestData,
}

impl PathRequest {
    pub(crate) fn new(id: PathRequestId, data: PathRequestData) -> Self {
        Self {
            id,
            state: PathRequestState::Queued,
            data,
        }
    }

    #[inline]
    pub fn id(&self) -> PathRequestId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> PathRequestState {
        self.state
    }

    #[inline]
    pub fn data(&self) -> &PathRequestData {
        &self.data
    }

    /// Hand the result to the callback and mark the request completed.
    pub(crate) fn complete(&mut self, status: PathRequestResultStatus, path: Path) {
        self.state = PathRequestState::Completed;
        (self.data.on_path_request_result)(self.id, status, path);
    }
}
