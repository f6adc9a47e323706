use crate::node::{Adjacency, NodeId};
use crate::planner::PathPlanner;
use crate::search_space::SearchSpace;

impl PathPlanner {
    /// A* expansion: relax every linked neighbour of `current`.
    pub(crate) fn expand_astar<S: SearchSpace + ?Sized>(&mut self, space: &mut S, current: NodeId) {
        for dir in Adjacency::ALL {
            if let Some(neighbour) = space.neighbour(current, dir) {
                self.update_cost(space, current, neighbour);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tickpath_core::{Point, Vec3};

    use crate::navgrid::{GridLayout, NavGrid};
    use crate::planner::{PathPlanner, PathPlannerData, PathPlannerType, SearchState};
    use crate::search_space::{SearchSpace, SearchSpaceData};

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

    fn solve(g: &mut NavGrid, from: Point, to: Point) -> Vec<Point> {
        let mut p = PathPlanner::new(PathPlannerData {
            planner_type: PathPlannerType::AStar,
            max_revolutions: 1000,
        });
        let (s, t) = (g.node_at(from).unwrap(), g.node_at(to).unwrap());
        assert!(p.start_search(&mut *g, s, t));
        p.path_nodes(&*g).into_iter().map(|id| g.cell_of(id)).collect()
    }

    #[test]
    fn straight_corridor_is_exact() {
        let mut g = unit_grid(6.0, 1.0, vec![]);
        let path = solve(&mut g, Point::new(0, 0), Point::new(5, 0));
        let expected: Vec<Point> = (0..6).map(|x| Point::new(x, 0)).collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn every_step_follows_an_edge() {
        let blocked = vec![
            Point::new(2, 0),
            Point::new(2, 1),
            Point::new(2, 2),
            Point::new(2, 3),
        ];
        let mut g = unit_grid(5.0, 5.0, blocked);
        let path = solve(&mut g, Point::new(0, 0), Point::new(4, 0));
        assert!(path.contains(&Point::new(2, 4)));
        for w in path.windows(2) {
            let (a, b) = (g.node_at(w[0]).unwrap(), g.node_at(w[1]).unwrap());
            assert!(g.node(a).neighbours.contains(&Some(b)));
        }
    }

    #[test]
    fn serpentine_corridor() {
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
        let path = solve(&mut g, Point::new(0, 0), Point::new(4, 0));
        assert_eq!(path.len(), 13);
        assert_eq!(path[4], Point::new(0, 4));
        assert_eq!(path[10], Point::new(2, 0));
    }

    #[test]
    fn unreachable_goal_exhausts() {
        let mut g = unit_grid(3.0, 3.0, vec![Point::new(1, 0), Point::new(1, 1), Point::new(1, 2)]);
        let mut p = PathPlanner::new(PathPlannerData::default());
        let (s, t) = (
            g.node_at(Point::new(0, 0)).unwrap(),
            g.node_at(Point::new(2, 2)).unwrap(),
        );
        assert!(p.start_search(&mut g, s, t));
        assert_eq!(p.state(), SearchState::Exhausted);
        assert_eq!(p.expansions(), 3);
    }
}
