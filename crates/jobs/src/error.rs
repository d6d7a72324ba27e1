use navgrid_common::Coordinate;

/// Reasons a path request is not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("job {0:?} already has a pending or undrained result")]
    DuplicateId(String),
    #[error("no node at start cell {0}")]
    UnknownStart(Coordinate),
    #[error("no node at goal cell {0}")]
    UnknownGoal(Coordinate),
    #[error("job manager is shut down")]
    ShutDown,
}
