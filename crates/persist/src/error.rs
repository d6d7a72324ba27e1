use glam::Vec3;
use navgrid_common::{Coordinate, ParseCoordinateError};

/// Errors from encoding, decoding or storing grid documents.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cell size {0:?} must be finite and positive")]
    InvalidCellSize(Vec3),
    #[error(transparent)]
    InvalidCoordinate(#[from] ParseCoordinateError),
    #[error("node {0} appears more than once")]
    DuplicateNode(Coordinate),
    #[error("node {from} lists side {to}, which is not a node of the grid")]
    UnknownSide { from: Coordinate, to: Coordinate },
    #[error("node {0} lists itself as a side")]
    SelfLoop(Coordinate),
}
