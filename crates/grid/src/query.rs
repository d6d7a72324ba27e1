//! Spatial queries over a grid: sphere scans, bounded flood fills, and cover search.

use glam::{Vec2, Vec3};
use navgrid_common::Coordinate;
use std::collections::{BTreeSet, VecDeque};

use crate::grid::Grid;
use crate::node::Node;

/// How many cells away from a visited node the cover search probes.
pub const HIDE_DEPTH: i32 = 2;

/// Vertical cell offsets probed at each depth, in order.
const HIDE_VERTICAL_OFFSETS: [i32; 3] = [0, 1, -1];

impl Grid {
    /// Every node whose foot position lies within `radius` of `center` (inclusive).
    pub fn nodes_in_sphere(&self, center: Vec3, radius: f32) -> Vec<&Node> {
        let radius_sq = radius * radius;
        self.nodes()
            .filter(|n| n.foot_position().distance_squared(center) <= radius_sq)
            .collect()
    }

    /// Node for `position`: the one occupying its cell, otherwise the one whose
    /// foot position is closest.
    pub fn nearest_node(&self, position: Vec3) -> Option<&Node> {
        if let Some(node) = self.get_node(self.quantize(position)) {
            return Some(node);
        }
        self.nodes().min_by(|a, b| {
            a.foot_position()
                .distance_squared(position)
                .total_cmp(&b.foot_position().distance_squared(position))
        })
    }

    /// Nodes reachable from the node nearest `center` without leaving `radius`.
    ///
    /// Distance is measured from the start node's foot position, not from the
    /// node being expanded, so a node inside the radius that is only reachable
    /// through a node outside it is not returned. Locked nodes are skipped
    /// unless `use_locked` is set.
    pub fn connected_nodes_in_radius(
        &self,
        center: Vec3,
        radius: f32,
        use_locked: bool,
    ) -> Vec<&Node> {
        self.flood(center, radius, use_locked)
            .iter()
            .filter_map(|c| self.get_node(*c))
            .collect()
    }

    /// Cover candidates near `center` facing away from a threat at `origin`.
    ///
    /// Runs the same flood as [`Grid::connected_nodes_in_radius`] (never
    /// through locked nodes). For each visited node the horizontal direction
    /// away from `origin` is snapped to a cell step and probed up to
    /// [`HIDE_DEPTH`] cells out, at vertical offsets 0, +1 and -1; the first
    /// existing unlocked node found is collected.
    pub fn hiding_spots_in_radius(&self, center: Vec3, origin: Vec3, radius: f32) -> Vec<&Node> {
        let mut spots = BTreeSet::new();
        for visited in self.flood(center, radius, false) {
            let Some(node) = self.get_node(visited) else {
                continue;
            };
            if let Some(spot) = self.cover_behind(node, origin) {
                spots.insert(spot);
            }
        }
        tracing::trace!(grid = %self.name(), spots = spots.len(), "hiding spot search");
        spots.iter().filter_map(|c| self.get_node(*c)).collect()
    }

    fn cover_behind(&self, node: &Node, origin: Vec3) -> Option<Coordinate> {
        let away = node.foot_position() - origin;
        let heading = Vec2::new(away.x, away.y).try_normalize()?;
        let step_x = heading.x.round() as i32;
        let step_y = heading.y.round() as i32;
        let base = node.coordinate();
        for depth in 1..=HIDE_DEPTH {
            for dz in HIDE_VERTICAL_OFFSETS {
                let Some(candidate) = base.offset(step_x * depth, step_y * depth, dz) else {
                    continue;
                };
                if candidate != base && self.has_node(candidate) && !self.is_locked(candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Breadth-first flood from the node nearest `center`, bounded by distance
    /// from that start node.
    fn flood(&self, center: Vec3, radius: f32, use_locked: bool) -> BTreeSet<Coordinate> {
        let mut visited = BTreeSet::new();
        let Some(start) = self.nearest_node(center) else {
            return visited;
        };
        if !use_locked && self.is_locked(start.coordinate()) {
            return visited;
        }
        let origin = start.foot_position();
        let radius_sq = radius * radius;

        let mut frontier = VecDeque::new();
        visited.insert(start.coordinate());
        frontier.push_back(start.coordinate());

        while let Some(current) = frontier.pop_front() {
            let Some(sides) = self.sides(current) else {
                continue;
            };
            for neighbor in sides.neighbors() {
                if visited.contains(&neighbor) {
                    continue;
                }
                if !use_locked && self.is_locked(neighbor) {
                    continue;
                }
                let Some(node) = self.get_node(neighbor) else {
                    continue;
                };
                if node.foot_position().distance_squared(origin) > radius_sq {
                    continue;
                }
                visited.insert(neighbor);
                frontier.push_back(neighbor);
            }
        }
        visited
    }
}
