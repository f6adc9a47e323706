//! Shared pieces of the tickpath demos: request generation, logging setup
//! and an ASCII view of the grid.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use rand::{Rng, RngExt};
use tickpath_core::{Point, Vec3};
use tickpath_paths::{NavGrid, Path, SearchSpace};
use tickpath_sched::{PathRequestData, PathRequestId, PathRequestResultStatus};
use tracing_subscriber::EnvFilter;

/// One delivered result, with the tick it arrived on.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub id: PathRequestId,
    pub status: PathRequestResultStatus,
    pub path: Path,
    pub tick: u64,
}

/// Collects results from request callbacks.
#[derive(Clone, Debug, Default)]
pub struct Mailbox {
    tick: Rc<RefCell<u64>>,
    outcomes: Rc<RefCell<Vec<Outcome>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request whose result lands in this mailbox.
    pub fn request(&self, start: Vec3, goal: Vec3) -> PathRequestData {
        let tick = Rc::clone(&self.tick);
        let outcomes = Rc::clone(&self.outcomes);
        PathRequestData::new(start, goal, move |id, status, path| {
            outcomes.borrow_mut().push(Outcome {
                id,
                status,
                path,
                tick: *tick.borrow(),
            });
        })
    }

    pub fn set_tick(&self, tick: u64) {
        *self.tick.borrow_mut() = tick;
    }

    pub fn take(&self) -> Vec<Outcome> {
        std::mem::take(&mut *self.outcomes.borrow_mut())
    }
}

/// World position of a random cell. Blocked cells may be picked; the
/// scheduler reports those.
pub fn random_position(rng: &mut impl Rng, grid: &NavGrid) -> Vec3 {
    let cells = grid.cells();
    let p = Point::new(
        rng.random_range(cells.min.x..cells.max.x),
        rng.random_range(cells.min.y..cells.max.y),
    );
    grid.cell_center(p)
}

/// The grid as text, one row per line: `#` blocked, `.` open, `*` path,
/// `S` and `G` for its ends.
pub fn render(grid: &NavGrid, path: &Path) -> String {
    let cells = grid.cells();
    let on_path: Vec<Point> = path
        .iter()
        .filter_map(|&pos| grid.localise(pos))
        .map(|id| grid.cell_of(id))
        .collect();

    let mut out = String::with_capacity(cells.len() + cells.height() as usize);
    for y in cells.min.y..cells.max.y {
        for x in cells.min.x..cells.max.x {
            let p = Point::new(x, y);
            let ch = if on_path.first() == Some(&p) {
                'S'
            } else if on_path.last() == Some(&p) {
                'G'
            } else if on_path.contains(&p) {
                '*'
            } else if grid.is_blocked(p) {
                '#'
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

/// Total Euclidean length of a path.
pub fn path_length(path: &Path) -> f32 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// One-line summary of an outcome.
pub fn describe(outcome: &Outcome) -> String {
    let mut s = format!("{} at tick {}: {}", outcome.id, outcome.tick, outcome.status);
    if outcome.status.is_found() {
        let _ = write!(
            s,
            " ({} points, length {:.1})",
            outcome.path.len(),
            path_length(&outcome.path)
        );
    }
    s
}

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TICKPATH_LOG";

/// Directives used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Parse `directives`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a `tracing` fmt subscriber filtered by [`LOG_ENV`]. Records from
/// the `log` facade used by the tickpath crates are forwarded to it.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| log_filter(None));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tickpath_paths::{GridLayout, SearchSpaceData};

    fn unit_grid(blocked: Vec<Point>) -> NavGrid {
        let mut g = NavGrid::new(
            SearchSpaceData {
                anchor_position: Vec3::ZERO,
                world_size: Vec3::new(4.0, 0.0, 3.0),
                cell_size: 1.0,
                ..SearchSpaceData::default()
            },
            GridLayout::Blocked(blocked),
        )
        .unwrap();
        g.build();
        g
    }

    #[test]
    fn render_marks_path_and_walls() {
        let g = unit_grid(vec![Point::new(1, 1)]);
        let path = vec![
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(1.5, 0.0, 0.5),
            Vec3::new(2.5, 0.0, 1.5),
        ];
        assert_eq!(render(&g, &path), "S*..\n.#G.\n....\n");
        assert_eq!(render(&g, &Vec::new()), "....\n.#..\n....\n");
    }

    #[test]
    fn random_positions_stay_in_world() {
        let g = unit_grid(vec![]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let pos = random_position(&mut rng, &g);
            assert!(g.localise(pos).is_some());
        }
    }

    #[test]
    fn log_filter_uses_given_directives() {
        assert_eq!(log_filter(None).to_string(), DEFAULT_LOG_FILTER);
        assert_eq!(
            log_filter(Some("tickpath_sched=debug")).to_string(),
            "tickpath_sched=debug"
        );
    }

    #[test]
    fn mailbox_records_tick() {
        let mailbox = Mailbox::new();
        let mut data = mailbox.request(Vec3::ZERO, Vec3::ZERO);
        mailbox.set_tick(4);
        (data.on_path_request_result)(
            PathRequestId(1),
            PathRequestResultStatus::PathNotFound,
            Vec::new(),
        );
        let got = mailbox.take();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].tick, 4);
        assert!(mailbox.take().is_empty());
        assert_eq!(describe(&got[0]), "#1 at tick 4: path not found");
    }
}
