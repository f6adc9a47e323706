//! Drives a pathfinder tick by tick over a pillared grid.
//!
//! Run: cargo run --bin grid_walk -- [seed] [requests]
//!
//! Set `TICKPATH_LOG=debug` (or `trace`) to see scheduler logging.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tickpath_demos::{Mailbox, describe, init_logging, random_position, render};
use tickpath_paths::{GridLayout, PathPlannerData, PathPlannerType, SearchSpaceData};
use tickpath_sched::{Pathfinder, PathfinderData};

const MAX_TICKS: u64 = 100_000;

fn main() {
    init_logging();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let requests: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(6);

    let data = PathfinderData {
        search_space_data: SearchSpaceData::default(),
        path_planner_data: PathPlannerData {
            planner_type: PathPlannerType::AStar,
            max_revolutions: 8,
        },
        layout: GridLayout::Pillars {
            random_blocks: 10,
            seed,
        },
    };
    let mut pathfinder = match Pathfinder::init(data) {
        Ok(pf) => pf,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mailbox = Mailbox::new();
    for _ in 0..requests {
        let start = random_position(&mut rng, pathfinder.search_space());
        let goal = random_position(&mut rng, pathfinder.search_space());
        let id = pathfinder.request_path(mailbox.request(start, goal));
        println!("{id}: {start} -> {goal}");
    }

    let mut tick = 0;
    let mut switched = false;
    while pathfinder.scheduler().pending_count() > 0 && tick < MAX_TICKS {
        tick += 1;
        mailbox.set_tick(tick);
        pathfinder.update();

        for outcome in mailbox.take() {
            println!("{}", describe(&outcome));
            if outcome.status.is_found() {
                print!("{}", render(pathfinder.search_space(), &outcome.path));
            }
        }

        // Halfway through, finish the remaining requests with JPS.
        let remaining = pathfinder.scheduler().pending_count();
        if !switched && remaining > 0 && remaining <= requests / 2 {
            println!("switching to jump point search at tick {tick}");
            pathfinder.set_path_planner(PathPlannerData {
                planner_type: PathPlannerType::JumpPointSearch,
                max_revolutions: 8,
            });
            switched = true;
        }
    }
    println!("done after {tick} ticks");
}
