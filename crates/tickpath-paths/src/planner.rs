//! Best-first open/closed-list search, sliced into bounded passes.
//!
//! A search is started with [`PathPlanner::start_search`] and continued with
//! [`PathPlanner::resume_search`]; each call expands at most
//! `max_revolutions` nodes. All search state (open list, membership and the
//! node costs) survives between calls, so splitting a search across many
//! calls yields the same path as running it in one go.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;
use tickpath_core::Vec3;

use crate::distance::{edge_cost, heuristic};
use crate::node::NodeId;
use crate::search_space::SearchSpace;

/// Expansions allowed per pass unless configured otherwise.
pub const DEFAULT_MAX_REVOLUTIONS: usize = 200;

/// Ordered world positions from start to goal.
pub type Path = Vec<Vec3>;

/// Expansion strategy of a planner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathPlannerType {
    #[default]
    AStar,
    JumpPointSearch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPlannerData {
    pub planner_type: PathPlannerType,
    /// Node expansions per pass. Zero is treated as one.
    pub max_revolutions: usize,
}

impl Default for PathPlannerData {
    fn default() -> Self {
        Self {
            planner_type: PathPlannerType::AStar,
            max_revolutions: DEFAULT_MAX_REVOLUTIONS,
        }
    }
}

/// Lifecycle of one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
    PathFound,
    Exhausted,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum Membership {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Open-list entry. A node whose cost improves is pushed again with the same
/// `seq`; the older entry goes stale and is skipped when popped.
#[derive(Copy, Clone, Debug)]
struct OpenEntry {
    id: NodeId,
    f: f32,
    h: f32,
    // order in which the node was first opened
    seq: u64,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the lowest f, then h, then seq.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Time-sliced best-first planner over a [`SearchSpace`].
///
/// The strategy (A* or Jump Point Search) is fixed at construction.
#[derive(Clone, Debug)]
pub struct PathPlanner {
    data: PathPlannerData,
    state: SearchState,
    start: Option<NodeId>,
    goal: Option<NodeId>,
    open: BinaryHeap<OpenEntry>,
    open_count: usize,
    next_seq: u64,
    membership: Vec<Membership>,
    opened_at: Vec<u64>,
    // every node whose bookkeeping this search wrote
    touched: Vec<NodeId>,
    expansions: usize,
    pub(crate) successors: Vec<NodeId>,
}

impl PathPlanner {
    pub fn new(data: PathPlannerData) -> Self {
        Self {
            data,
            state: SearchState::Idle,
            start: None,
            goal: None,
            open: BinaryHeap::new(),
            open_count: 0,
            next_seq: 0,
            membership: Vec::new(),
            opened_at: Vec::new(),
            touched: Vec::new(),
            expansions: 0,
            successors: Vec::with_capacity(8),
        }
    }

    #[inline]
    pub fn data(&self) -> &PathPlannerData {
        &self.data
    }

    #[inline]
    pub fn planner_type(&self) -> PathPlannerType {
        self.data.planner_type
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Whether the current search has found the goal or run out of nodes.
    #[inline]
    pub fn is_concluded(&self) -> bool {
        matches!(self.state, SearchState::PathFound | SearchState::Exhausted)
    }

    /// Node expansions performed by the current search so far.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    #[inline]
    pub fn open_len(&self) -> usize {
        self.open_count
    }

    #[inline]
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    /// Begin a new search and run the first pass.
    ///
    /// Returns `true` if the search concluded within this pass.
    pub fn start_search<S: SearchSpace + ?Sized>(
        &mut self,
        space: &mut S,
        start: NodeId,
        goal: NodeId,
    ) -> bool {
        self.reset(space);
        if self.membership.len() != space.len() {
            self.membership.clear();
            self.membership.resize(space.len(), Membership::Unvisited);
            self.opened_at.clear();
            self.opened_at.resize(space.len(), 0);
        }

        self.start = Some(start);
        self.goal = Some(goal);
        self.state = SearchState::Searching;

        // The start node may carry stale bookkeeping from another planner.
        let goal_pos = space.node(goal).position;
        let node = space.node_mut(start);
        node.reset_search();
        node.h_cost = heuristic(node.position, goal_pos);
        node.f_cost = node.h_cost;
        let (f, h) = (node.f_cost, node.h_cost);
        self.push_open(start, f, h);

        self.search(space)
    }

    /// Continue the current search for one more pass.
    ///
    /// Returns `true` once the search has concluded.
    ///
    /// # Panics
    ///
    /// Panics if no search was started since the last [`reset`](Self::reset).
    pub fn resume_search<S: SearchSpace + ?Sized>(&mut self, space: &mut S) -> bool {
        assert_ne!(
            self.state,
            SearchState::Idle,
            "resume_search called without start_search"
        );
        if self.is_concluded() {
            return true;
        }
        self.search(space)
    }

    /// The found path as node ids, start to goal; empty unless the search
    /// found the goal.
    pub fn path_nodes<S: SearchSpace + ?Sized>(&self, space: &S) -> Vec<NodeId> {
        let (SearchState::PathFound, Some(goal)) = (self.state, self.goal) else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        let mut cur = Some(goal);
        while let Some(id) = cur {
            nodes.push(id);
            cur = space.node(id).parent;
        }
        nodes.reverse();
        nodes
    }

    /// The found path as world positions, start to goal; empty unless the
    /// search found the goal.
    pub fn get_path<S: SearchSpace + ?Sized>(&self, space: &S) -> Path {
        self.path_nodes(space)
            .into_iter()
            .map(|id| space.node(id).position)
            .collect()
    }

    /// Clear all per-search bookkeeping. Calling it twice is harmless.
    pub fn reset<S: SearchSpace + ?Sized>(&mut self, space: &mut S) {
        let len = space.len();
        for id in self.touched.drain(..) {
            if id.index() < len {
                space.node_mut(id).reset_search();
            }
            if let Some(m) = self.membership.get_mut(id.index()) {
                *m = Membership::Unvisited;
            }
        }
        self.open.clear();
        self.open_count = 0;
        self.next_seq = 0;
        self.start = None;
        self.goal = None;
        self.state = SearchState::Idle;
        self.expansions = 0;
    }

    // -----------------------------------------------------------------------
    // Search loop
    // -----------------------------------------------------------------------

    fn search<S: SearchSpace + ?Sized>(&mut self, space: &mut S) -> bool {
        let budget = self.data.max_revolutions.max(1);
        let mut revolutions = 0;

        while let Some(current) = self.pop_cheapest(space) {
            self.membership[current.index()] = Membership::Closed;
            if Some(current) == self.goal {
                self.state = SearchState::PathFound;
                break;
            }

            match self.data.planner_type {
                PathPlannerType::AStar => self.expand_astar(space, current),
                PathPlannerType::JumpPointSearch => self.expand_jps(space, current),
            }
            self.expansions += 1;

            revolutions += 1;
            if revolutions >= budget {
                break;
            }
        }

        if self.state == SearchState::Searching && self.open_count == 0 {
            self.state = SearchState::Exhausted;
        }
        trace!(
            "{:?} pass: {revolutions} expansions, {} open, state {:?}",
            self.data.planner_type,
            self.open_count,
            self.state
        );
        self.is_concluded()
    }

    /// Remove the open node with the lowest `f_cost`, breaking ties on the
    /// lowest `h_cost` and then on the order nodes were opened.
    fn pop_cheapest<S: SearchSpace + ?Sized>(&mut self, space: &S) -> Option<NodeId> {
        while let Some(entry) = self.open.pop() {
            let live = self.membership[entry.id.index()] == Membership::Open
                && space.node(entry.id).f_cost == entry.f;
            if live {
                self.open_count -= 1;
                return Some(entry.id);
            }
        }
        None
    }

    fn push_open(&mut self, id: NodeId, f: f32, h: f32) {
        let i = id.index();
        if self.membership[i] != Membership::Open {
            if self.membership[i] == Membership::Unvisited {
                self.touched.push(id);
            }
            self.opened_at[i] = self.next_seq;
            self.next_seq += 1;
            self.open_count += 1;
        }
        self.membership[i] = Membership::Open;
        self.open.push(OpenEntry {
            id,
            f,
            h,
            seq: self.opened_at[i],
        });
    }

    /// Relax the edge `current -> successor`.
    pub(crate) fn update_cost<S: SearchSpace + ?Sized>(
        &mut self,
        space: &mut S,
        current: NodeId,
        successor: NodeId,
    ) {
        let Some(goal) = self.goal else {
            return;
        };
        let (current_pos, current_g) = {
            let n = space.node(current);
            (n.position, n.g_cost)
        };
        let goal_pos = space.node(goal).position;

        match self.membership[successor.index()] {
            Membership::Closed => {}
            Membership::Open => {
                let node = space.node_mut(successor);
                let g = current_g + edge_cost(current_pos, node.position);
                if g < node.g_cost {
                    node.parent = Some(current);
                    node.g_cost = g;
                    node.f_cost = g + node.h_cost;
                    let (f, h) = (node.f_cost, node.h_cost);
                    self.push_open(successor, f, h);
                }
            }
            Membership::Unvisited => {
                let node = space.node_mut(successor);
                node.parent = Some(current);
                node.g_cost = current_g + edge_cost(current_pos, node.position);
                node.h_cost = heuristic(node.position, goal_pos);
                node.f_cost = node.g_cost + node.h_cost;
                let (f, h) = (node.f_cost, node.h_cost);
                self.push_open(successor, f, h);
            }
        }
    }
}
