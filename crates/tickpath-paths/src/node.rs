use tickpath_core::{Point, Vec3};

/// Stable index of a [`PathNode`] inside its search space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Occupancy of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeType {
    Blocked,
    #[default]
    Unblocked,
}

/// The eight octile directions, in clockwise order starting top-left.
///
/// `Top` points towards decreasing Z (grid `y - 1`), `Right` towards
/// increasing X.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Adjacency {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Adjacency {
    pub const COUNT: usize = 8;

    pub const ALL: [Adjacency; Self::COUNT] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    pub const STRAIGHT: [Adjacency; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub const DIAGONAL: [Adjacency; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Cell offset of a one-step move in this direction.
    pub const fn offset(self) -> Point {
        match self {
            Self::TopLeft => Point::new(-1, -1),
            Self::Top => Point::new(0, -1),
            Self::TopRight => Point::new(1, -1),
            Self::Right => Point::new(1, 0),
            Self::BottomRight => Point::new(1, 1),
            Self::Bottom => Point::new(0, 1),
            Self::BottomLeft => Point::new(-1, 1),
            Self::Left => Point::new(-1, 0),
        }
    }

    /// Direction of a unit offset; `None` for `(0, 0)` or non-unit offsets.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.offset() == Point::new(dx, dy))
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self.index() + 4) % Self::COUNT]
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 == 0
    }

    /// Horizontal then vertical component of a diagonal. A straight
    /// direction is its own component twice.
    pub fn straight_components(self) -> [Self; 2] {
        if !self.is_diagonal() {
            return [self, self];
        }
        let o = self.offset();
        [
            Self::ALL[Self::Right.index() + if o.x < 0 { 4 } else { 0 }],
            Self::ALL[Self::Bottom.index() - if o.y < 0 { 4 } else { 0 }],
        ]
    }

    /// The two straight directions at right angles to a straight direction.
    #[inline]
    pub const fn perpendiculars(self) -> [Self; 2] {
        let i = self.index();
        [Self::ALL[(i + 2) % Self::COUNT], Self::ALL[(i + 6) % Self::COUNT]]
    }

    /// Diagonal formed by two perpendicular straight directions.
    pub fn combine(self, other: Self) -> Option<Self> {
        let o = self.offset() + other.offset();
        Self::from_offset(o.x, o.y).filter(|d| d.is_diagonal())
    }
}

/// One cell of a search space.
///
/// Costs and `parent` are per-search bookkeeping owned by whichever planner
/// is currently searching; they are meaningless outside an active search.
#[derive(Clone, Debug)]
pub struct PathNode {
    pub position: Vec3,
    pub neighbours: [Option<NodeId>; Adjacency::COUNT],
    pub node_type: NodeType,
    pub g_cost: f32,
    pub h_cost: f32,
    pub f_cost: f32,
    pub parent: Option<NodeId>,
}

impl PathNode {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            neighbours: [None; Adjacency::COUNT],
            node_type: NodeType::Unblocked,
            g_cost: 0.0,
            h_cost: 0.0,
            f_cost: 0.0,
            parent: None,
        }
    }

    #[inline]
    pub fn neighbour(&self, dir: Adjacency) -> Option<NodeId> {
        self.neighbours[dir.index()]
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.node_type == NodeType::Blocked
    }

    /// Clear costs and parent.
    pub fn reset_search(&mut self) {
        self.g_cost = 0.0;
        self.h_cost = 0.0;
        self.f_cost = 0.0;
        self.parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        for d in Adjacency::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d.opposite().opposite(), d);
            let (a, b) = (d.offset(), d.opposite().offset());
            assert_eq!(a + b, Point::ZERO);
        }
    }

    #[test]
    fn diagonal_flags() {
        for d in Adjacency::DIAGONAL {
            assert!(d.is_diagonal());
        }
        for d in Adjacency::STRAIGHT {
            assert!(!d.is_diagonal());
        }
    }

    #[test]
    fn straight_components_of_diagonals() {
        use Adjacency::*;
        assert_eq!(TopLeft.straight_components(), [Left, Top]);
        assert_eq!(TopRight.straight_components(), [Right, Top]);
        assert_eq!(BottomRight.straight_components(), [Right, Bottom]);
        assert_eq!(BottomLeft.straight_components(), [Left, Bottom]);
        assert_eq!(Top.straight_components(), [Top, Top]);
    }

    #[test]
    fn perpendiculars_and_combine() {
        use Adjacency::*;
        assert_eq!(Right.perpendiculars(), [Bottom, Top]);
        assert_eq!(Top.perpendiculars(), [Right, Left]);
        assert_eq!(Right.combine(Top), Some(TopRight));
        assert_eq!(Left.combine(Bottom), Some(BottomLeft));
        assert_eq!(Left.combine(Right), None);
    }

    #[test]
    fn from_offset_inverts_offset() {
        for d in Adjacency::ALL {
            let o = d.offset();
            assert_eq!(Adjacency::from_offset(o.x, o.y), Some(d));
        }
        assert_eq!(Adjacency::from_offset(0, 0), None);
        assert_eq!(Adjacency::from_offset(2, 0), None);
    }

    #[test]
    fn new_node_is_unlinked_and_clean() {
        let n = PathNode::new(Vec3::new(1.0, 0.0, 2.0));
        assert!(n.neighbours.iter().all(Option::is_none));
        assert!(!n.is_blocked());
        assert_eq!(n.parent, None);
        assert_eq!(n.f_cost, 0.0);
    }
}
