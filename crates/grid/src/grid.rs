use glam::Vec3;
use navgrid_common::{Coordinate, is_valid_cell_size};
use std::collections::{BTreeMap, BTreeSet};

use crate::node::Node;
use crate::sides::Sides;

/// A named, quantized navigation graph.
///
/// The grid is the sole owner of its nodes and adjacency. Every edge is stored
/// on both endpoints with the same cost (the Euclidean distance between their
/// foot positions). Two derived indexes are kept in step with every mutation:
/// `unused` holds exactly the nodes with no edges, `locked` holds nodes that
/// searches must not route through.
///
/// Uses BTreeMap/BTreeSet for deterministic iteration order across platforms.
#[derive(Debug, Clone)]
pub struct Grid {
    name: String,
    cell_size: Vec3,
    nodes: BTreeMap<Coordinate, Node>,
    adjacency: BTreeMap<Coordinate, Sides>,
    unused: BTreeSet<Coordinate>,
    locked: BTreeSet<Coordinate>,
    /// Bumped by every successful structural mutation.
    revision: u64,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// # Panics
    /// If `cell_size` is not finite and positive. Use [`Grid::try_new`] for
    /// sizes that come from outside the program.
    pub fn new(name: impl Into<String>, cell_size: Vec3) -> Self {
        match Self::try_new(name, cell_size) {
            Some(grid) => grid,
            None => panic!("cell_size must be finite and positive, got {cell_size:?}"),
        }
    }

    /// Create an empty grid, or `None` if `cell_size` is not finite and positive.
    pub fn try_new(name: impl Into<String>, cell_size: Vec3) -> Option<Self> {
        if !is_valid_cell_size(cell_size) {
            return None;
        }
        Some(Self {
            name: name.into(),
            cell_size,
            nodes: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            unused: BTreeSet::new(),
            locked: BTreeSet::new(),
            revision: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// Mutation counter. Equal revisions of the same grid mean identical structure.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn unused_count(&self) -> usize {
        self.unused.len()
    }

    pub fn locked_count(&self) -> usize {
        self.locked.len()
    }

    /// All nodes in coordinate order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Coordinates of nodes that currently have no edges.
    pub fn unused(&self) -> &BTreeSet<Coordinate> {
        &self.unused
    }

    /// Coordinates of nodes currently locked.
    pub fn locked(&self) -> &BTreeSet<Coordinate> {
        &self.locked
    }

    /// Quantize a world position into this grid's coordinate space.
    pub fn quantize(&self, position: Vec3) -> Coordinate {
        Coordinate::quantize(position, self.cell_size)
    }

    /// Snap a world position to the centre of its cell.
    pub fn rounded_position(&self, position: Vec3) -> Vec3 {
        self.quantize(position).to_world(self.cell_size)
    }

    pub fn has_node(&self, c: Coordinate) -> bool {
        self.nodes.contains_key(&c)
    }

    pub fn get_node(&self, c: Coordinate) -> Option<&Node> {
        self.nodes.get(&c)
    }

    /// Adjacency of `c`, if the node exists.
    pub fn sides(&self, c: Coordinate) -> Option<&Sides> {
        self.adjacency.get(&c)
    }

    pub fn is_locked(&self, c: Coordinate) -> bool {
        self.locked.contains(&c)
    }

    /// Add a node at `c`. Fails without mutating if `c` is already occupied.
    pub fn add_node(&mut self, c: Coordinate, foot_position: Vec3) -> bool {
        if self.nodes.contains_key(&c) {
            return false;
        }
        self.nodes
            .insert(c, Node::new(c, self.cell_size, foot_position));
        self.adjacency.insert(c, Sides::new());
        self.unused.insert(c);
        self.revision += 1;
        tracing::debug!(grid = %self.name, coordinate = %c, "node added");
        true
    }

    /// Remove the node at `c`, cascading to its edges and both indexes.
    ///
    /// Neighbors left without edges become unused.
    pub fn remove_node(&mut self, c: Coordinate) -> bool {
        if self.nodes.remove(&c).is_none() {
            return false;
        }
        if let Some(sides) = self.adjacency.remove(&c) {
            for neighbor in sides.neighbors() {
                self.detach(neighbor, c);
            }
        }
        self.unused.remove(&c);
        self.locked.remove(&c);
        self.revision += 1;
        tracing::debug!(grid = %self.name, coordinate = %c, "node removed");
        true
    }

    /// Whether `b` appears in `a`'s adjacency.
    pub fn is_connected_to(&self, a: Coordinate, b: Coordinate) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|sides| sides.contains(&b))
    }

    /// Stored cost of the edge `a -> b`.
    pub fn edge_cost(&self, a: Coordinate, b: Coordinate) -> Option<f32> {
        self.adjacency.get(&a).and_then(|sides| sides.cost(&b))
    }

    /// Connect `a` and `b` in both directions.
    ///
    /// Cost is the distance between foot positions and overwrites any existing
    /// cost for the pair. Fails if either node is unknown or `a == b`.
    pub fn connect_to(&mut self, a: Coordinate, b: Coordinate) -> bool {
        if a == b {
            return false;
        }
        let cost = match (self.nodes.get(&a), self.nodes.get(&b)) {
            (Some(na), Some(nb)) => na.distance_to(nb),
            _ => return false,
        };
        self.adjacency.entry(a).or_default().insert(b, cost);
        self.adjacency.entry(b).or_default().insert(a, cost);
        self.unused.remove(&a);
        self.unused.remove(&b);
        self.revision += 1;
        tracing::debug!(grid = %self.name, from = %a, to = %b, cost, "nodes connected");
        true
    }

    /// Remove the edge between `a` and `b` in both directions.
    ///
    /// Fails if either node is unknown or they are not connected. Endpoints
    /// left without edges become unused.
    pub fn disconnect_from(&mut self, a: Coordinate, b: Coordinate) -> bool {
        if !self.has_node(a) || !self.has_node(b) || !self.is_connected_to(a, b) {
            return false;
        }
        self.detach(a, b);
        self.detach(b, a);
        self.revision += 1;
        tracing::debug!(grid = %self.name, from = %a, to = %b, "nodes disconnected");
        true
    }

    /// Mark `c` as temporarily excluded from search intermediates.
    ///
    /// Edges are untouched. Fails if `c` is unknown or already locked.
    pub fn lock_node(&mut self, c: Coordinate) -> bool {
        if !self.has_node(c) || !self.locked.insert(c) {
            return false;
        }
        self.revision += 1;
        tracing::debug!(grid = %self.name, coordinate = %c, "node locked");
        true
    }

    /// Clear the lock on `c`. Fails if `c` is not locked.
    pub fn unlock_node(&mut self, c: Coordinate) -> bool {
        if !self.locked.remove(&c) {
            return false;
        }
        self.revision += 1;
        tracing::debug!(grid = %self.name, coordinate = %c, "node unlocked");
        true
    }

    /// Remove every node. Returns the number of nodes before clearing.
    pub fn clear_nodes(&mut self) -> usize {
        let count = self.nodes.len();
        self.nodes.clear();
        self.adjacency.clear();
        self.unused.clear();
        self.locked.clear();
        if count > 0 {
            self.revision += 1;
        }
        tracing::debug!(grid = %self.name, count, "nodes cleared");
        count
    }

    /// Remove every node that has no edges. Returns how many were removed.
    pub fn purge_unused(&mut self) -> usize {
        let unused = std::mem::take(&mut self.unused);
        for c in &unused {
            self.nodes.remove(c);
            self.adjacency.remove(c);
            self.locked.remove(c);
        }
        if !unused.is_empty() {
            self.revision += 1;
        }
        tracing::debug!(grid = %self.name, count = unused.len(), "unused nodes purged");
        unused.len()
    }

    /// Drop the one-way edge `from -> to`, marking `from` unused if it empties.
    fn detach(&mut self, from: Coordinate, to: Coordinate) {
        if let Some(sides) = self.adjacency.get_mut(&from) {
            sides.remove(&to);
            if sides.is_empty() {
                self.unused.insert(from);
            }
        }
    }
}
