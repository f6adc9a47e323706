//! **tickpath-core**: geometry primitives for the tickpath pathfinding engine.
//!
//! World space is continuous ([`Vec3`]); the navigation grid is discrete
//! ([`Point`] cells inside a half-open [`Range`]). Grid `x` follows world X and
//! grid `y` follows world Z, so the grid lies on the X/Z plane.

pub mod geom;
pub mod vec3;

pub use geom::{Point, Range, RangeIter};
pub use vec3::Vec3;
