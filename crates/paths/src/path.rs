use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tolerance when comparing unit step directions during simplification.
const DIRECTION_EPSILON: f32 = 1e-4;

/// A route found by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Foot positions from start to goal with collinear runs collapsed.
    pub waypoints: Vec<Vec3>,
    /// Sum of edge costs along the route.
    pub cost: f32,
    /// Number of grid nodes the route passes through, endpoints included.
    pub node_count: usize,
    /// Grid revision the search ran against.
    pub revision: u64,
}

impl Path {
    pub fn start(&self) -> Option<Vec3> {
        self.waypoints.first().copied()
    }

    pub fn goal(&self) -> Option<Vec3> {
        self.waypoints.last().copied()
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathOutcome {
    /// The goal was reached. A start equal to the goal yields a one-waypoint path.
    Found(Path),
    /// The open set was exhausted without reaching the goal.
    NoPath,
}

impl PathOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NoPath => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NoPath => None,
        }
    }

    /// Waypoints of a found path; `None` when no path exists.
    pub fn waypoints(&self) -> Option<&[Vec3]> {
        self.path().map(|p| p.waypoints.as_slice())
    }
}

/// Keep the endpoints and every point where the step direction changes.
pub fn simplify(points: &[Vec3]) -> Vec<Vec3> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for w in points.windows(3) {
        let incoming = (w[1] - w[0]).normalize_or_zero();
        let outgoing = (w[2] - w[1]).normalize_or_zero();
        if !incoming.abs_diff_eq(outgoing, DIRECTION_EPSILON) {
            out.push(w[1]);
        }
    }
    out.push(points[points.len() - 1]);
    out
}
