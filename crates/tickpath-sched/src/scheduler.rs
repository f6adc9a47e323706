//! Head-of-line request processing, one bounded search pass per tick.

use std::collections::BTreeMap;

use log::{debug, warn};
use tickpath_paths::{NodeId, Path, PathPlanner, PathPlannerData, SearchSpace};

use crate::queue::PathRequestQueue;
use crate::request::{
    PathRequest, PathRequestData, PathRequestId, PathRequestResultStatus, PathRequestState,
};

/// Owns every pending request and the single planner that serves them.
///
/// Each [`update`](Self::update) advances only the request at the head of
/// the queue. Results are collected while the tick runs and handed to the
/// callbacks once it is over, so a callback never runs from inside
/// [`request_path`](Self::request_path) or
/// [`cancel_request`](Self::cancel_request).
#[derive(Debug)]
pub struct PathRequestScheduler {
    planner: PathPlanner,
    requests: BTreeMap<PathRequestId, PathRequest>,
    queue: PathRequestQueue,
    request_count: u64,
    active: Option<PathRequestId>,
    completed: Vec<(PathRequest, PathRequestResultStatus, Path)>,
}

impl PathRequestScheduler {
    pub fn new(planner_data: PathPlannerData) -> Self {
        Self {
            planner: PathPlanner::new(planner_data),
            requests: BTreeMap::new(),
            queue: PathRequestQueue::new(),
            request_count: 0,
            active: None,
            completed: Vec::new(),
        }
    }

    /// Register a request and queue it. The result arrives through its
    /// callback during some later [`update`](Self::update).
    pub fn request_path(&mut self, data: PathRequestData) -> PathRequestId {
        self.request_count += 1;
        let id = PathRequestId(self.request_count);
        let priority = data.priority;
        debug!("path request {id}: {} -> {}", data.start, data.goal);
        self.requests.insert(id, PathRequest::new(id, data));
        self.queue.enqueue(id, priority);
        id
    }

    /// Forget a request. Its callback will not be called. Returns `false`
    /// if `id` was not pending.
    pub fn cancel_request(&mut self, id: PathRequestId) -> bool {
        self.queue.remove(id);
        let Some(request) = self.requests.remove(&id) else {
            return false;
        };
        if self.active == Some(id) {
            // the planner is reset when the next request starts
            self.active = None;
        }
        debug!("path request {id} cancelled while {:?}", request.state);
        true
    }

    /// Advance the head-of-queue request by one search pass and deliver any
    /// results produced.
    ///
    /// # Panics
    ///
    /// Panics if the head request is completed or invalid; completed requests
    /// leave the queue as soon as they conclude.
    pub fn update<S: SearchSpace + ?Sized>(&mut self, space: &mut S) {
        if let Some(id) = self.queue.get_request() {
            let state = self.requests.get(&id).map(PathRequest::state);
            match state {
                Some(PathRequestState::Queued | PathRequestState::Interrupted) => {
                    self.start_request(space, id);
                }
                Some(PathRequestState::Running) => {
                    if self.planner.resume_search(space) {
                        self.conclude(&*space, id);
                    }
                }
                Some(PathRequestState::Completed | PathRequestState::Invalid) | None => {
                    unreachable!("path request {id} at queue head in state {state:?}")
                }
            }
        }

        for (mut request, status, path) in self.completed.drain(..) {
            request.complete(status, path);
        }
    }

    /// Replace the planner. The search space is untouched.
    ///
    /// A request whose search is in flight is parked as interrupted and
    /// starts over on the new planner at the next update.
    pub fn set_path_planner<S: SearchSpace + ?Sized>(
        &mut self,
        space: &mut S,
        planner_data: PathPlannerData,
    ) {
        if let Some(id) = self.active.take() {
            if let Some(request) = self.requests.get_mut(&id) {
                if request.state == PathRequestState::Running {
                    warn!(
                        "planner replaced by {:?} during path request {id}; restarting it",
                        planner_data.planner_type
                    );
                    request.state = PathRequestState::Interrupted;
                }
            }
        }
        self.planner.reset(space);
        self.planner = PathPlanner::new(planner_data);
    }

    /// State of a pending request; `None` once it completed or was cancelled.
    pub fn request_state(&self, id: PathRequestId) -> Option<PathRequestState> {
        self.requests.get(&id).map(PathRequest::state)
    }

    pub fn is_request_pending(&self, id: PathRequestId) -> bool {
        self.queue.contains(id)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// The request whose search is currently running, if any.
    pub fn active_request(&self) -> Option<PathRequestId> {
        self.active
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn queue(&self) -> &PathRequestQueue {
        &self.queue
    }

    fn start_request<S: SearchSpace + ?Sized>(&mut self, space: &mut S, id: PathRequestId) {
        // Drop whatever search was left behind, even if this request is rejected.
        self.planner.reset(space);
        let Some(request) = self.requests.get_mut(&id) else {
            return;
        };
        let (start, goal) = match validate(&*space, &request.data) {
            Ok(nodes) => nodes,
            Err(status) => {
                debug!("path request {id} rejected: {status}");
                self.finish(id, status, Path::new());
                return;
            }
        };

        debug!("path request {id} running ({:?})", self.planner.planner_type());
        request.state = PathRequestState::Running;
        self.active = Some(id);
        if self.planner.start_search(space, start, goal) {
            self.conclude(&*space, id);
        }
    }

    fn conclude<S: SearchSpace + ?Sized>(&mut self, space: &S, id: PathRequestId) {
        let path = self.planner.get_path(space);
        let status = if path.is_empty() {
            PathRequestResultStatus::PathNotFound
        } else {
            PathRequestResultStatus::PathFound
        };
        debug!(
            "path request {id}: {status} after {} expansions, {} points",
            self.planner.expansions(),
            path.len()
        );
        self.active = None;
        self.finish(id, status, path);
    }

    fn finish(&mut self, id: PathRequestId, status: PathRequestResultStatus, path: Path) {
        self.queue.remove(id);
        if let Some(request) = self.requests.remove(&id) {
            self.completed.push((request, status, path));
        }
    }
}

/// Localise and check both endpoints; the first failure wins.
fn validate<S: SearchSpace + ?Sized>(
    space: &S,
    data: &PathRequestData,
) -> Result<(NodeId, NodeId), PathRequestResultStatus> {
    let start = space
        .localise(data.start)
        .ok_or(PathRequestResultStatus::StartNotLocalised)?;
    let goal = space
        .localise(data.goal)
        .ok_or(PathRequestResultStatus::GoalNotLocalised)?;
    if space.node(start).is_blocked() {
        return Err(PathRequestResultStatus::StartBlocked);
    }
    if space.node(goal).is_blocked() {
        return Err(PathRequestResultStatus::GoalBlocked);
    }
    Ok((start, goal))
}
