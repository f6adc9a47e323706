//! Tick-driven path request scheduling.
//!
//! Callers submit [`PathRequestData`] to a [`Pathfinder`] and get a
//! [`PathRequestId`] back at once. Each [`Pathfinder::update`] advances the
//! oldest pending request by one bounded planner pass; when its search
//! concludes, the request's callback receives a [`PathRequestResultStatus`]
//! and the path.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tickpath_core::Vec3;
//! use tickpath_sched::{Pathfinder, PathfinderData, PathRequestData, PathRequestResultStatus};
//!
//! let mut pf = Pathfinder::init(PathfinderData::default()).unwrap();
//! let found = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&found);
//! pf.request_path(PathRequestData::new(
//!     Vec3::new(-45.0, 0.0, -45.0),
//!     Vec3::new(45.0, 0.0, 45.0),
//!     move |_, status, path| *sink.borrow_mut() = Some((status, path.len())),
//! ));
//! pf.update();
//! assert_eq!(*found.borrow(), Some((PathRequestResultStatus::PathFound, 10)));
//! ```

mod pathfinder;
mod queue;
mod request;
mod scheduler;

pub use pathfinder::{Pathfinder, PathfinderData, PathfinderError};
pub use queue::PathRequestQueue;
pub use request::{
    PathRequest, PathRequestCallback, PathRequestData, PathRequestId, PathRequestPriority,
    PathRequestResultStatus, PathRequestState,
};
pub use scheduler::PathRequestScheduler;
