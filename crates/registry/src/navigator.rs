use glam::Vec3;
use navgrid_common::Coordinate;
use navgrid_grid::{Grid, Node};
use navgrid_jobs::{JobConfig, JobStatus, PathJobManager};
use navgrid_paths::{LockPolicy, PathOutcome};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::registry::GridRegistry;

/// Summary counters for one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInfo {
    pub name: String,
    pub cell_size: Vec3,
    pub nodes: usize,
    pub unused: usize,
    pub locked: usize,
    pub revision: u64,
}

impl From<&Grid> for GridInfo {
    fn from(grid: &Grid) -> Self {
        Self {
            name: grid.name().to_string(),
            cell_size: grid.cell_size(),
            nodes: grid.node_count(),
            unused: grid.unused_count(),
            locked: grid.locked_count(),
            revision: grid.revision(),
        }
    }
}

/// By-name navigation surface for a host.
///
/// Every position argument is a world-space point, quantized against the
/// named grid. Unknown grids, unknown nodes and rejected mutations all come
/// back as `false` or `None`.
pub struct Navigator {
    registry: GridRegistry,
    jobs: PathJobManager,
}

impl Navigator {
    pub fn new(config: JobConfig) -> std::io::Result<Self> {
        Ok(Self::with_registry(GridRegistry::new(), PathJobManager::new(config)?))
    }

    pub fn with_registry(registry: GridRegistry, jobs: PathJobManager) -> Self {
        Self { registry, jobs }
    }

    pub fn registry(&self) -> &GridRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut GridRegistry {
        &mut self.registry
    }

    pub fn jobs(&self) -> &PathJobManager {
        &self.jobs
    }

    fn grid(&self, name: &str) -> Option<&Grid> {
        let grid = self.registry.grid(name);
        if grid.is_none() {
            tracing::warn!(grid = name, "unknown grid");
        }
        grid
    }

    fn grid_mut(&mut self, name: &str) -> Option<&mut Grid> {
        if !self.registry.has_grid(name) {
            tracing::warn!(grid = name, "unknown grid");
        }
        self.registry.grid_mut(name)
    }

    /// Apply a mutation to the named grid; `false` if the grid is unknown.
    fn mutate(&mut self, name: &str, op: impl FnOnce(&mut Grid) -> bool) -> bool {
        self.grid_mut(name).is_some_and(op)
    }

    // Registry

    pub fn add_grid(&mut self, name: &str, cell_size: Vec3) -> bool {
        self.registry.add_grid(name, cell_size)
    }

    pub fn has_grid(&self, name: &str) -> bool {
        self.registry.has_grid(name)
    }

    pub fn get_grid(&self, name: &str) -> Option<Arc<Grid>> {
        self.registry.get_grid(name)
    }

    pub fn remove_grid(&mut self, name: &str) -> bool {
        self.registry.remove_grid(name)
    }

    pub fn serialize_grid(&self, name: &str) -> Option<String> {
        self.registry.serialize_grid(name)
    }

    pub fn deserialize_grid(&mut self, json: &str) -> Option<String> {
        self.registry.deserialize_grid(json)
    }

    pub fn grid_info(&self, name: &str) -> Option<GridInfo> {
        self.grid(name).map(GridInfo::from)
    }

    // Quantization

    pub fn cell_size(&self, grid: &str) -> Option<Vec3> {
        self.grid(grid).map(Grid::cell_size)
    }

    pub fn quantize(&self, grid: &str, position: Vec3) -> Option<Coordinate> {
        self.grid(grid).map(|g| g.quantize(position))
    }

    pub fn rounded_position(&self, grid: &str, position: Vec3) -> Option<Vec3> {
        self.grid(grid).map(|g| g.rounded_position(position))
    }

    // Nodes and edges

    pub fn has_node(&self, grid: &str, position: Vec3) -> bool {
        self.grid(grid)
            .is_some_and(|g| g.has_node(g.quantize(position)))
    }

    pub fn get_node(&self, grid: &str, position: Vec3) -> Option<Node> {
        let g = self.grid(grid)?;
        g.get_node(g.quantize(position)).copied()
    }

    pub fn node_list(&self, grid: &str) -> Option<Vec<Node>> {
        self.grid(grid).map(|g| g.nodes().copied().collect())
    }

    /// Add a node in the cell containing `position` with the given foot point.
    ///
    /// Positions outside the representable cell range (or NaN) are rejected
    /// rather than saturated onto an edge cell.
    pub fn add_node(&mut self, grid: &str, position: Vec3, foot_position: Vec3) -> bool {
        self.mutate(grid, |g| {
            if !Coordinate::is_representable(position, g.cell_size()) {
                tracing::warn!(grid = g.name(), ?position, "position outside cell range");
                return false;
            }
            g.add_node(g.quantize(position), foot_position)
        })
    }

    pub fn remove_node(&mut self, grid: &str, position: Vec3) -> bool {
        self.mutate(grid, |g| g.remove_node(g.quantize(position)))
    }

    pub fn is_connected_to(&self, grid: &str, from: Vec3, to: Vec3) -> bool {
        self.grid(grid)
            .is_some_and(|g| g.is_connected_to(g.quantize(from), g.quantize(to)))
    }

    pub fn connect_to(&mut self, grid: &str, from: Vec3, to: Vec3) -> bool {
        self.mutate(grid, |g| g.connect_to(g.quantize(from), g.quantize(to)))
    }

    pub fn disconnect_from(&mut self, grid: &str, from: Vec3, to: Vec3) -> bool {
        self.mutate(grid, |g| {
            g.disconnect_from(g.quantize(from), g.quantize(to))
        })
    }

    pub fn lock_node(&mut self, grid: &str, position: Vec3) -> bool {
        self.mutate(grid, |g| g.lock_node(g.quantize(position)))
    }

    pub fn unlock_node(&mut self, grid: &str, position: Vec3) -> bool {
        self.mutate(grid, |g| g.unlock_node(g.quantize(position)))
    }

    pub fn is_locked(&self, grid: &str, position: Vec3) -> bool {
        self.grid(grid)
            .is_some_and(|g| g.is_locked(g.quantize(position)))
    }

    pub fn clear_nodes(&mut self, grid: &str) -> Option<usize> {
        self.grid_mut(grid).map(Grid::clear_nodes)
    }

    pub fn purge_unused(&mut self, grid: &str) -> Option<usize> {
        self.grid_mut(grid).map(Grid::purge_unused)
    }

    // Spatial queries

    pub fn nodes_in_sphere(&self, grid: &str, center: Vec3, radius: f32) -> Option<Vec<Node>> {
        self.grid(grid)
            .map(|g| g.nodes_in_sphere(center, radius).into_iter().copied().collect())
    }

    pub fn connected_nodes_in_radius(
        &self,
        grid: &str,
        center: Vec3,
        radius: f32,
        use_locked: bool,
    ) -> Option<Vec<Node>> {
        self.grid(grid).map(|g| {
            g.connected_nodes_in_radius(center, radius, use_locked)
                .into_iter()
                .copied()
                .collect()
        })
    }

    pub fn hiding_spots_in_radius(
        &self,
        grid: &str,
        center: Vec3,
        origin: Vec3,
        radius: f32,
    ) -> Option<Vec<Node>> {
        self.grid(grid).map(|g| {
            g.hiding_spots_in_radius(center, origin, radius)
                .into_iter()
                .copied()
                .collect()
        })
    }

    // Paths

    /// Queue a lock-avoiding search on the current snapshot of `grid`.
    pub fn queue_path(&self, grid: &str, id: &str, from: Vec3, to: Vec3) -> bool {
        self.queue_path_with(grid, id, from, to, LockPolicy::Avoid)
    }

    pub fn queue_path_with(
        &self,
        grid: &str,
        id: &str,
        from: Vec3,
        to: Vec3,
        policy: LockPolicy,
    ) -> bool {
        let Some(snapshot) = self.registry.get_grid(grid) else {
            tracing::warn!(grid, %id, "path requested on unknown grid");
            return false;
        };
        self.jobs.submit_with(&snapshot, id, from, to, policy)
    }

    pub fn drain_paths(&self) -> HashMap<String, PathOutcome> {
        self.jobs.drain()
    }

    pub fn take_path(&self, id: &str) -> Option<PathOutcome> {
        self.jobs.take(id)
    }

    pub fn discard_path(&self, id: &str) -> bool {
        self.jobs.discard(id)
    }

    pub fn path_status(&self, id: &str) -> Option<JobStatus> {
        self.jobs.status(id)
    }
}
