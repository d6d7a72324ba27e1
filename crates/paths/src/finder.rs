use navgrid_common::Coordinate;
use navgrid_grid::{Grid, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::path::{Path, PathOutcome, simplify};
use crate::queue::PriorityQueue;

/// How a search treats locked nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockPolicy {
    /// Locked nodes are never used as intermediates. The goal is always allowed.
    #[default]
    Avoid,
    /// Locks are ignored and locked nodes are expanded like any other.
    Traverse,
}

/// One A* search over a borrowed grid.
///
/// The heuristic is the straight-line distance between foot positions. Every
/// edge cost is itself such a distance, so the heuristic never overestimates
/// and the first time the goal is extracted its cost is optimal.
///
/// Search state (scores, predecessors, open set) lives only for the duration
/// of [`PathFinder::find`].
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'g> {
    grid: &'g Grid,
    start: &'g Node,
    goal: &'g Node,
    policy: LockPolicy,
}

impl<'g> PathFinder<'g> {
    /// Bind a search to `grid`. Returns `None` if either endpoint is unknown.
    pub fn new(grid: &'g Grid, start: Coordinate, goal: Coordinate) -> Option<Self> {
        Some(Self {
            grid,
            start: grid.get_node(start)?,
            goal: grid.get_node(goal)?,
            policy: LockPolicy::default(),
        })
    }

    pub fn with_lock_policy(mut self, policy: LockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn lock_policy(&self) -> LockPolicy {
        self.policy
    }

    fn heuristic(&self, node: &Node) -> f32 {
        node.distance_to(self.goal)
    }

    fn is_excluded(&self, c: Coordinate) -> bool {
        self.policy == LockPolicy::Avoid && c != self.goal.coordinate() && self.grid.is_locked(c)
    }

    /// Run the search to completion.
    pub fn find(&self) -> PathOutcome {
        let start = self.start.coordinate();
        let goal = self.goal.coordinate();
        let _span = tracing::info_span!(
            "find_path",
            grid = %self.grid.name(),
            start = %start,
            goal = %goal
        )
        .entered();

        let mut g_score: HashMap<Coordinate, f32> = HashMap::new();
        let mut came_from: HashMap<Coordinate, Coordinate> = HashMap::new();
        let mut open = PriorityQueue::new();
        let mut expanded = 0usize;

        g_score.insert(start, 0.0);
        open.enqueue(start, self.heuristic(self.start));

        while let Some(current) = open.dequeue() {
            if current == goal {
                let path = self.reconstruct(&came_from, g_score[&goal]);
                tracing::trace!(
                    expanded,
                    cost = path.cost,
                    waypoints = path.waypoints.len(),
                    "path found"
                );
                return PathOutcome::Found(path);
            }
            expanded += 1;

            let Some(&base) = g_score.get(&current) else {
                continue;
            };
            let Some(sides) = self.grid.sides(current) else {
                continue;
            };
            for (neighbor, edge_cost) in sides.iter() {
                if self.is_excluded(neighbor) {
                    continue;
                }
                let Some(node) = self.grid.get_node(neighbor) else {
                    continue;
                };
                let candidate = base + edge_cost;
                if g_score
                    .get(&neighbor)
                    .is_some_and(|&known| known <= candidate)
                {
                    continue;
                }
                g_score.insert(neighbor, candidate);
                came_from.insert(neighbor, current);
                open.enqueue(neighbor, candidate + self.heuristic(node));
            }
        }

        tracing::trace!(expanded, "open set exhausted");
        PathOutcome::NoPath
    }

    fn reconstruct(&self, came_from: &HashMap<Coordinate, Coordinate>, cost: f32) -> Path {
        let mut chain = vec![self.goal.coordinate()];
        let mut cursor = self.goal.coordinate();
        while let Some(&previous) = came_from.get(&cursor) {
            chain.push(previous);
            cursor = previous;
        }
        chain.reverse();

        let feet: Vec<_> = chain
            .iter()
            .filter_map(|c| self.grid.get_node(*c))
            .map(Node::foot_position)
            .collect();

        Path {
            waypoints: simplify(&feet),
            cost,
            node_count: chain.len(),
            revision: self.grid.revision(),
        }
    }
}

/// Search `grid` from `start` to `goal`. `None` if either endpoint is unknown.
pub fn find_path(
    grid: &Grid,
    start: Coordinate,
    goal: Coordinate,
    policy: LockPolicy,
) -> Option<PathOutcome> {
    PathFinder::new(grid, start, goal).map(|finder| finder.with_lock_policy(policy).find())
}
