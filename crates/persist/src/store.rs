//! File-backed grid documents.

use navgrid_grid::Grid;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::PersistError;
use crate::format::GridDocument;

/// Write `grid` to `path` as pretty-printed JSON, replacing any existing file.
pub fn save(path: impl AsRef<Path>, grid: &Grid) -> Result<(), PersistError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &GridDocument::from(grid))?;
    writer.flush()?;
    tracing::info!(grid = grid.name(), nodes = grid.node_count(), path = %path.display(), "grid saved");
    Ok(())
}

/// Read and validate a grid document from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Grid, PersistError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let document: GridDocument = serde_json::from_reader(reader)?;
    let grid = document.into_grid()?;
    tracing::info!(grid = grid.name(), nodes = grid.node_count(), path = %path.display(), "grid loaded");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgrid_common::{Coordinate, DEFAULT_CELL_SIZE};

    fn ladder() -> Grid {
        let mut grid = Grid::new("ladder", DEFAULT_CELL_SIZE);
        for z in 0..4 {
            let c = Coordinate::new(0, 0, z);
            grid.add_node(c, c.to_world(DEFAULT_CELL_SIZE));
        }
        for z in 0..3 {
            grid.connect_to(Coordinate::new(0, 0, z), Coordinate::new(0, 0, z + 1));
        }
        grid
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ladder.json");
        let grid = ladder();

        save(&path, &grid).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.name(), "ladder");
        assert_eq!(loaded.node_count(), 4);
        assert_eq!(
            loaded.edge_cost(Coordinate::new(0, 0, 1), Coordinate::new(0, 0, 2)),
            Some(75.0)
        );
        assert!(loaded.unused().is_empty());
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        save(&path, &ladder()).unwrap();

        let mut smaller = ladder();
        smaller.purge_unused();
        smaller.remove_node(Coordinate::new(0, 0, 3));
        save(&path, &smaller).unwrap();

        assert_eq!(load(&path).unwrap().node_count(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(PersistError::Io(_))));
    }

    #[test]
    fn invalid_contents_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"name":"x","cellSize":[0,0,0],"nodes":{}}"#).unwrap();
        assert!(matches!(load(&path), Err(PersistError::InvalidCellSize(_))));
    }
}
