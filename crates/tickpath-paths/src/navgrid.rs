//! Octile navigation grid on the world X/Z plane.

use log::debug;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tickpath_core::{Point, Range, Vec3};

use crate::node::{Adjacency, NodeId, NodeType, PathNode};
use crate::search_space::{SearchSpace, SearchSpaceData, SearchSpaceError};

/// How cells are marked blocked when the grid is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridLayout {
    /// Every cell is walkable.
    #[default]
    Open,
    /// 2×2 pillars every third cell starting at (1, 1), plus `random_blocks`
    /// extra cells picked by a generator seeded with `seed`.
    Pillars { random_blocks: usize, seed: u64 },
    /// Exactly these cells are blocked; cells outside the grid are ignored.
    Blocked(Vec<Point>),
}

/// A uniform grid of square cells with 8-way adjacency.
///
/// Diagonal edges exist only when both straight cells flanking the diagonal
/// are walkable, so paths never cut a blocked corner.
#[derive(Clone, Debug)]
pub struct NavGrid {
    data: SearchSpaceData,
    layout: GridLayout,
    cells: Range,
    nodes: Vec<PathNode>,
}

impl NavGrid {
    /// Validate `data` and prepare an unbuilt grid. Call
    /// [`build`](SearchSpace::build) before searching.
    pub fn new(data: SearchSpaceData, layout: GridLayout) -> Result<Self, SearchSpaceError> {
        data.validate()?;
        let (cells_x, cells_z) = data.cell_counts();
        Ok(Self {
            data,
            layout,
            cells: Range::with_size(cells_x, cells_z),
            nodes: Vec::new(),
        })
    }

    #[inline]
    pub fn data(&self) -> &SearchSpaceData {
        &self.data
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The cell rectangle, `[0, cells_x) × [0, cells_z)`.
    #[inline]
    pub fn cells(&self) -> Range {
        self.cells
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Node for cell `p`, if `p` is on the grid and the grid is built.
    #[inline]
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.cells
            .index_of(p)
            .filter(|&i| i < self.nodes.len())
            .map(NodeId)
    }

    /// Cell coordinate of a node.
    #[inline]
    pub fn cell_of(&self, id: NodeId) -> Point {
        self.cells.point_at(id.index())
    }

    /// Whether cell `p` exists and is blocked.
    pub fn is_blocked(&self, p: Point) -> bool {
        self.node_at(p)
            .is_some_and(|id| self.nodes[id.index()].is_blocked())
    }

    pub fn blocked_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_blocked()).count()
    }

    /// World position of the centre of cell `p`.
    pub fn cell_center(&self, p: Point) -> Vec3 {
        let local = Vec3::new(p.x as f32 + 0.5, 0.0, p.y as f32 + 0.5);
        self.data.anchor_position + local * self.data.cell_size
    }

    // -----------------------------------------------------------------------
    // Build steps
    // -----------------------------------------------------------------------

    fn create_grid(&mut self) {
        self.nodes.clear();
        self.nodes.reserve(self.cells.len());
        for p in self.cells {
            let node = PathNode::new(self.cell_center(p));
            self.nodes.push(node);
        }
    }

    fn apply_layout(&mut self) {
        match self.layout.clone() {
            GridLayout::Open => {}
            GridLayout::Pillars {
                random_blocks,
                seed,
            } => {
                self.block_pillars();
                self.block_random(random_blocks, seed);
            }
            GridLayout::Blocked(cells) => {
                for p in cells {
                    self.block(p);
                }
            }
        }
    }

    fn block(&mut self, p: Point) {
        if let Some(id) = self.node_at(p) {
            self.nodes[id.index()].node_type = NodeType::Blocked;
        }
    }

    fn block_pillars(&mut self) {
        let (w, h) = (self.cells.width(), self.cells.height());
        for x in (1..w).step_by(3) {
            for y in (1..h).step_by(3) {
                for p in Range::new(x, y, x + 2, y + 2) {
                    self.block(p);
                }
            }
        }
    }

    fn block_random(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut remaining = count;
        while remaining > 0 {
            let free: Vec<usize> = (0..self.nodes.len())
                .filter(|&i| !self.nodes[i].is_blocked())
                .collect();
            if free.is_empty() {
                break;
            }
            let pick = free[rng.random_range(0..free.len())];
            self.nodes[pick].node_type = NodeType::Blocked;
            remaining -= 1;
        }
    }

    /// Straight links first, so the diagonal pass can test both flanks.
    fn compute_adjacency(&mut self) {
        for node in &mut self.nodes {
            node.neighbours = [None; Adjacency::COUNT];
        }
        for dirs in [Adjacency::STRAIGHT, Adjacency::DIAGONAL] {
            for i in 0..self.nodes.len() {
                for dir in dirs {
                    self.link(NodeId(i), dir);
                }
            }
        }
    }

    fn link(&mut self, from: NodeId, dir: Adjacency) {
        if self.nodes[from.index()].is_blocked() {
            return;
        }
        let Some(to) = self.node_at(self.cell_of(from) + dir.offset()) else {
            return;
        };
        if self.nodes[to.index()].is_blocked() {
            return;
        }
        if dir.is_diagonal() {
            let [h, v] = dir.straight_components();
            let node = &self.nodes[from.index()];
            if node.neighbour(h).is_none() || node.neighbour(v).is_none() {
                return;
            }
        }
        self.nodes[from.index()].neighbours[dir.index()] = Some(to);
        self.nodes[to.index()].neighbours[dir.opposite().index()] = Some(from);
    }
}

impl SearchSpace for NavGrid {
    fn build(&mut self) {
        self.create_grid();
        self.apply_layout();
        self.compute_adjacency();
        debug!(
            "nav grid built: {}x{} cells, {} blocked",
            self.cells.width(),
            self.cells.height(),
            self.blocked_count()
        );
    }

    fn localise(&self, position: Vec3) -> Option<NodeId> {
        let rel = position - self.data.anchor_position;
        let size = self.data.world_size;
        if !(rel.x >= 0.0 && rel.x < size.x && rel.z >= 0.0 && rel.z < size.z) {
            return None;
        }
        let cell = rel / self.data.cell_size;
        self.node_at(Point::new(cell.x.floor() as i32, cell.z.floor() as i32))
    }

    #[inline]
    fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    #[inline]
    fn nodes_mut(&mut self) -> &mut [PathNode] {
        &mut self.nodes
    }
}
