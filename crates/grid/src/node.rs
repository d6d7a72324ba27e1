use glam::Vec3;
use navgrid_common::Coordinate;
use serde::{Deserialize, Serialize};

/// One navigable cell of a grid.
///
/// A node's identity is its coordinate; it never changes after creation.
/// Edges are not stored here but in the owning grid's adjacency table, so
/// nodes never reference each other directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    coordinate: Coordinate,
    position: Vec3,
    foot_position: Vec3,
}

impl Node {
    /// Create a node at `coordinate` whose cell centre is derived from `cell_size`.
    pub fn new(coordinate: Coordinate, cell_size: Vec3, foot_position: Vec3) -> Self {
        Self {
            coordinate,
            position: coordinate.to_world(cell_size),
            foot_position,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Cell-centre world position (`coordinate * cell_size`).
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Reference point used for edge costs and the search heuristic.
    pub fn foot_position(&self) -> Vec3 {
        self.foot_position
    }

    /// Euclidean distance between the two nodes' foot positions.
    pub fn distance_to(&self, other: &Node) -> f32 {
        self.foot_position.distance(other.foot_position)
    }
}
