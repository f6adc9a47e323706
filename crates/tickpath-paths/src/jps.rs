//! Jump Point Search expansion for octile grids without corner cutting.
//!
//! Instead of relaxing every neighbour, a node is expanded by walking
//! ("jumping") in each direction that survives pruning until a node is found
//! that could start a different optimal route: the goal, a node with a
//! forced neighbour, or (on diagonals) a node from which a straight jump
//! succeeds. Only those jump points enter the open list.
//!
//! Since diagonal moves may not clip a blocked cell, a diagonal arrival has
//! no forced neighbours; a straight move forces a perpendicular side when
//! that side is open but was blocked one cell back.

use crate::node::{Adjacency, NodeId};
use crate::planner::PathPlanner;
use crate::search_space::SearchSpace;

impl PathPlanner {
    pub(crate) fn expand_jps<S: SearchSpace + ?Sized>(&mut self, space: &mut S, current: NodeId) {
        let Some(goal) = self.goal() else {
            return;
        };

        let mut successors = std::mem::take(&mut self.successors);
        successors.clear();
        for dir in prune(&*space, current) {
            if let Some(jump_point) = jump(&*space, current, dir, goal) {
                successors.push(jump_point);
            }
        }

        for &successor in &successors {
            self.update_cost(space, current, successor);
        }
        self.successors = successors;
    }
}

/// Directions worth jumping in from `current`, given how it was reached.
/// The start node (no parent) keeps every linked direction.
fn prune<S: SearchSpace + ?Sized>(space: &S, current: NodeId) -> Vec<Adjacency> {
    let node = space.node(current);
    let arrival = node
        .parent
        .and_then(|parent| travel_direction(space, parent, current));
    let Some(dir) = arrival else {
        return Adjacency::ALL
            .into_iter()
            .filter(|&d| node.neighbour(d).is_some())
            .collect();
    };

    let mut dirs = Vec::with_capacity(5);
    if dir.is_diagonal() {
        for component in dir.straight_components() {
            if node.neighbour(component).is_some() {
                dirs.push(component);
            }
        }
        if node.neighbour(dir).is_some() {
            dirs.push(dir);
        }
    } else {
        if node.neighbour(dir).is_some() {
            dirs.push(dir);
        }
        for side in dir.perpendiculars() {
            if !is_forced(space, current, dir, side) {
                continue;
            }
            dirs.push(side);
            if let Some(diagonal) = dir.combine(side) {
                if node.neighbour(diagonal).is_some() {
                    dirs.push(diagonal);
                }
            }
        }
    }
    dirs
}

/// Whether `side` is a forced neighbour of `id` when travelling straight
/// along `dir`.
fn is_forced<S: SearchSpace + ?Sized>(
    space: &S,
    id: NodeId,
    dir: Adjacency,
    side: Adjacency,
) -> bool {
    if space.neighbour(id, side).is_none() {
        return false;
    }
    match space.neighbour(id, dir.opposite()) {
        Some(back) => space.neighbour(back, side).is_none(),
        None => true,
    }
}

/// Walk from `from` along `dir` and return the first jump point, or `None`
/// on hitting a blocked cell or the grid edge.
fn jump<S: SearchSpace + ?Sized>(
    space: &S,
    from: NodeId,
    dir: Adjacency,
    goal: NodeId,
) -> Option<NodeId> {
    let mut cur = from;
    loop {
        let next = space.neighbour(cur, dir)?;
        if next == goal {
            return Some(next);
        }
        if dir.is_diagonal() {
            let [h, v] = dir.straight_components();
            if jump(space, next, h, goal).is_some() || jump(space, next, v, goal).is_some() {
                return Some(next);
            }
        } else if dir
            .perpendiculars()
            .into_iter()
            .any(|side| is_forced(space, next, dir, side))
        {
            return Some(next);
        }
        cur = next;
    }
}

/// Normalised direction of travel between two nodes, from their positions.
fn travel_direction<S: SearchSpace + ?Sized>(
    space: &S,
    from: NodeId,
    to: NodeId,
) -> Option<Adjacency> {
    let (a, b) = (space.node(from).position, space.node(to).position);
    Adjacency::from_offset(signum(b.x - a.x), signum(b.z - a.z))
}

#[inline]
fn signum(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navgrid::{GridLayout, NavGrid};
    use crate::planner::{PathPlannerData, PathPlannerType, SearchState};
    use crate::search_space::SearchSpaceData;
    use tickpath_core::{Point, Vec3};

    fn unit_grid(w: f32, h: f32, blocked: Vec<Point>) -> NavGrid {
        let mut g = NavGrid::new(
            SearchSpaceData {
                anchor_position: Vec3::ZERO,
                world_size: Vec3::new(w, 0.0, h),
                cell_size: 1.0,
                ..SearchSpaceData::default()
            },
            GridLayout::Blocked(blocked),
        )
        .unwrap();
        g.build();
        g
    }

    fn jps(max_revolutions: usize) -> PathPlanner {
        PathPlanner::new(PathPlannerData {
            planner_type: PathPlannerType::JumpPointSearch,
            max_revolutions,
        })
    }

    fn cells(g: &NavGrid, p: &PathPlanner) -> Vec<Point> {
        p.path_nodes(g).into_iter().map(|id| g.cell_of(id)).collect()
    }

    #[test]
    fn open_diagonal_is_a_single_jump() {
        let mut g = unit_grid(10.0, 10.0, vec![]);
        let (s, t) = (
            g.node_at(Point::new(0, 0)).unwrap(),
            g.node_at(Point::new(9, 9)).unwrap(),
        );
        let mut p = jps(200);
        assert!(p.start_search(&mut g, s, t));
        assert_eq!(p.expansions(), 1);
        assert_eq!(cells(&g, &p), vec![Point::new(0, 0), Point::new(9, 9)]);
    }

    #[test]
    fn straight_jump_stops_at_forced_neighbour() {
        // Moving right along row 1, (2, 0) opens up after the blocked (1, 0).
        let g = unit_grid(6.0, 3.0, vec![Point::new(1, 0)]);
        let from = g.node_at(Point::new(0, 1)).unwrap();
        let goal = g.node_at(Point::new(5, 2)).unwrap();
        let jp = jump(&g, from, Adjacency::Right, goal).unwrap();
        assert_eq!(g.cell_of(jp), Point::new(2, 1));
        assert!(is_forced(&g, jp, Adjacency::Right, Adjacency::Top));
        assert!(!is_forced(&g, jp, Adjacency::Right, Adjacency::Bottom));
    }

    #[test]
    fn straight_jump_runs_off_open_row() {
        let g = unit_grid(6.0, 3.0, vec![]);
        let from = g.node_at(Point::new(0, 1)).unwrap();
        let goal = g.node_at(Point::new(5, 2)).unwrap();
        assert_eq!(jump(&g, from, Adjacency::Right, goal), None);
        assert_eq!(jump(&g, from, Adjacency::Left, goal), None);
    }

    #[test]
    fn diagonal_jump_stops_where_a_straight_jump_reaches_goal() {
        let g = unit_grid(6.0, 6.0, vec![]);
        let from = g.node_at(Point::new(0, 0)).unwrap();
        let goal = g.node_at(Point::new(5, 2)).unwrap();
        let jp = jump(&g, from, Adjacency::BottomRight, goal).unwrap();
        assert_eq!(g.cell_of(jp), Point::new(2, 2));
    }

    #[test]
    fn prune_follows_arrival_direction() {
        let mut g = unit_grid(5.0, 5.0, vec![Point::new(1, 1)]);
        let parent = g.node_at(Point::new(0, 2)).unwrap();
        let current = g.node_at(Point::new(2, 2)).unwrap();
        g.node_mut(current).parent = Some(parent);
        // right is natural, top is forced by the blocked (1, 1)
        assert_eq!(
            prune(&g, current),
            vec![Adjacency::Right, Adjacency::Top, Adjacency::TopRight]
        );

        let diag_parent = g.node_at(Point::new(0, 4)).unwrap();
        g.node_mut(current).parent = Some(diag_parent);
        assert_eq!(
            prune(&g, current),
            vec![Adjacency::Right, Adjacency::Top, Adjacency::TopRight]
        );

        g.node_mut(current).parent = None;
        assert_eq!(prune(&g, current).len(), 7);
    }

    #[test]
    fn serpentine_corridor_keeps_only_turning_points() {
        let blocked = vec![
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(1, 2),
            Point::new(1, 3),
            Point::new(3, 1),
            Point::new(3, 2),
            Point::new(3, 3),
            Point::new(3, 4),
        ];
        let mut g = unit_grid(5.0, 5.0, blocked);
        let (s, t) = (
            g.node_at(Point::new(0, 0)).unwrap(),
            g.node_at(Point::new(4, 0)).unwrap(),
        );
        let mut p = jps(200);
        assert!(p.start_search(&mut g, s, t));
        assert_eq!(
            cells(&g, &p),
            vec![
                Point::new(0, 0),
                Point::new(0, 4),
                Point::new(2, 4),
                Point::new(2, 0),
                Point::new(4, 0),
            ]
        );
    }

    #[test]
    fn manhattan_heuristic_can_lead_jps_off_the_optimum() {
        // A* happens to find the 4 + 2√2 route; JPS commits to the left
        // column first and settles for 6 + √2.
        let mut g = unit_grid(5.0, 5.0, vec![Point::new(1, 1), Point::new(1, 2)]);
        let (s, t) = (
            g.node_at(Point::new(0, 0)).unwrap(),
            g.node_at(Point::new(4, 4)).unwrap(),
        );
        fn length(path: &[Vec3]) -> f32 {
            path.windows(2).map(|w| w[0].distance(w[1])).sum()
        }

        let mut astar = PathPlanner::new(PathPlannerData {
            planner_type: PathPlannerType::AStar,
            max_revolutions: 200,
        });
        assert!(astar.start_search(&mut g, s, t));
        let astar_path = astar.get_path(&g);
        assert!((length(&astar_path) - (4.0 + 2.0 * 2f32.sqrt())).abs() < 1e-4);
        assert_eq!(
            astar.path_nodes(&g).into_iter().map(|id| g.cell_of(id)).collect::<Vec<_>>(),
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(3, 1),
                Point::new(4, 2),
                Point::new(4, 3),
                Point::new(4, 4),
            ]
        );

        let mut p = jps(200);
        assert!(p.start_search(&mut g, s, t));
        let jps_path = p.get_path(&g);
        assert!((length(&jps_path) - (6.0 + 2f32.sqrt())).abs() < 1e-4);
        assert_eq!(
            cells(&g, &p),
            vec![
                Point::new(0, 0),
                Point::new(0, 3),
                Point::new(1, 4),
                Point::new(4, 4),
            ]
        );
    }

    #[test]
    fn walled_in_goal_exhausts() {
        let walls = vec![Point::new(8, 8), Point::new(8, 9), Point::new(9, 8)];
        let mut g = unit_grid(10.0, 10.0, walls);
        let (s, t) = (
            g.node_at(Point::new(0, 0)).unwrap(),
            g.node_at(Point::new(9, 9)).unwrap(),
        );
        let mut p = jps(200);
        assert!(p.start_search(&mut g, s, t));
        assert_eq!(p.state(), SearchState::Exhausted);
        assert!(p.get_path(&g).is_empty());
    }

    #[test]
    fn split_budget_matches_single_pass() {
        let layout = GridLayout::Pillars {
            random_blocks: 0,
            seed: 0,
        };
        let mut g = NavGrid::new(SearchSpaceData::default(), layout).unwrap();
        g.build();
        let s = g.node_at(Point::new(9, 0)).unwrap();
        let t = g.node_at(Point::new(0, 8)).unwrap();

        let mut one = jps(10_000);
        assert!(one.start_search(&mut g, s, t));
        let expected = one.get_path(&g);
        assert!(!expected.is_empty());

        for budget in [1, 2, 3] {
            let mut p = jps(budget);
            let mut done = p.start_search(&mut g, s, t);
            while !done {
                done = p.resume_search(&mut g);
            }
            assert_eq!(p.get_path(&g), expected, "budget {budget}");
        }
    }
}
