use tickpath_core::Vec3;

/// Cost of moving between two node positions (Euclidean).
#[inline]
pub fn edge_cost(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Estimate of the remaining cost from `a` to `goal` (Manhattan).
///
/// Not admissible once diagonal steps are involved: a diagonal step costs
/// `√2·cell` but reduces this estimate by `2·cell`.
#[inline]
pub fn heuristic(a: Vec3, goal: Vec3) -> f32 {
    a.manhattan(goal)
}
