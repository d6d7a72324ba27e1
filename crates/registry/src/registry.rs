use glam::Vec3;
use navgrid_grid::Grid;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named navigation grids.
///
/// Each grid is held behind an `Arc`. Readers get cheap snapshots through
/// [`GridRegistry::get_grid`]; [`GridRegistry::grid_mut`] clones the grid
/// first if any snapshot is still alive.
#[derive(Debug, Default, Clone)]
pub struct GridRegistry {
    grids: BTreeMap<String, Arc<Grid>>,
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.grids.keys().map(String::as_str)
    }

    /// Create an empty grid. Fails if the name is taken or the cell size is
    /// not finite and positive.
    pub fn add_grid(&mut self, name: &str, cell_size: Vec3) -> bool {
        if self.grids.contains_key(name) {
            tracing::warn!(grid = name, "grid already exists");
            return false;
        }
        let Some(grid) = Grid::try_new(name, cell_size) else {
            tracing::warn!(grid = name, ?cell_size, "invalid cell size");
            return false;
        };
        self.grids.insert(name.to_string(), Arc::new(grid));
        tracing::debug!(grid = name, "grid added");
        true
    }

    /// Register `grid` under its own name, returning the grid it replaced.
    pub fn insert_grid(&mut self, grid: Grid) -> Option<Arc<Grid>> {
        let name = grid.name().to_string();
        let previous = self.grids.insert(name.clone(), Arc::new(grid));
        if previous.is_some() {
            tracing::debug!(grid = %name, "grid replaced");
        }
        previous
    }

    pub fn has_grid(&self, name: &str) -> bool {
        self.grids.contains_key(name)
    }

    /// Snapshot of the named grid.
    pub fn get_grid(&self, name: &str) -> Option<Arc<Grid>> {
        self.grids.get(name).cloned()
    }

    pub fn grid(&self, name: &str) -> Option<&Grid> {
        self.grids.get(name).map(Arc::as_ref)
    }

    /// Mutable access, copying the grid if a snapshot of it is still shared.
    pub fn grid_mut(&mut self, name: &str) -> Option<&mut Grid> {
        self.grids.get_mut(name).map(Arc::make_mut)
    }

    pub fn remove_grid(&mut self, name: &str) -> bool {
        let removed = self.grids.remove(name).is_some();
        if removed {
            tracing::debug!(grid = name, "grid removed");
        }
        removed
    }

    /// The named grid as a JSON document.
    pub fn serialize_grid(&self, name: &str) -> Option<String> {
        let grid = self.grid(name)?;
        match navgrid_persist::to_json(grid) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::warn!(grid = name, %err, "grid serialization failed");
                None
            }
        }
    }

    /// Parse a JSON document and register it, replacing any grid of the same
    /// name. Returns the registered name.
    pub fn deserialize_grid(&mut self, json: &str) -> Option<String> {
        match navgrid_persist::from_json(json) {
            Ok(grid) => {
                let name = grid.name().to_string();
                self.insert_grid(grid);
                Some(name)
            }
            Err(err) => {
                tracing::warn!(%err, "grid document rejected");
                None
            }
        }
    }
}
