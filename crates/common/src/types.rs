use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default cell size, roughly the footprint and height of a standing player.
pub const DEFAULT_CELL_SIZE: Vec3 = Vec3::new(35.0, 35.0, 75.0);

/// Quantized integer cell identifying a node within a grid.
///
/// Produced by dividing a world position by the grid's cell size and rounding
/// each component. Two positions share a coordinate iff they round to the
/// same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Quantize a world position against a cell size.
    ///
    /// Ties round to even, so `0.5` maps to cell 0 and `1.5` to cell 2.
    /// Components outside the `i32` cell range saturate to `i32::MIN`/`i32::MAX`
    /// and NaN maps to cell 0; check [`Coordinate::is_representable`] first
    /// when positions are untrusted.
    pub fn quantize(position: Vec3, cell_size: Vec3) -> Self {
        let scaled = position / cell_size;
        Self {
            x: scaled.x.round_ties_even() as i32,
            y: scaled.y.round_ties_even() as i32,
            z: scaled.z.round_ties_even() as i32,
        }
    }

    /// World-space centre of this cell.
    pub fn to_world(self, cell_size: Vec3) -> Vec3 {
        self.as_vec3() * cell_size
    }

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// Whether `position` quantizes without saturating or hitting NaN.
    pub fn is_representable(position: Vec3, cell_size: Vec3) -> bool {
        let scaled = (position / cell_size).round();
        scaled.is_finite()
            && scaled.cmpge(Vec3::splat(i32::MIN as f32)).all()
            && scaled.cmplt(Vec3::splat(i32::MAX as f32)).all()
    }

    /// Coordinate shifted by the given number of cells on each axis.
    /// `None` if any component would overflow.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }
}

impl From<IVec3> for Coordinate {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Coordinate> for IVec3 {
    fn from(c: Coordinate) -> Self {
        c.as_ivec3()
    }
}

/// Renders as `"x y z"`, the key format used by serialized grids.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Error parsing a `"x y z"` coordinate key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate key: {0:?}")]
pub struct ParseCoordinateError(pub String);

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let mut parts = s.split_whitespace();
        let mut next = || -> Result<i32, ParseCoordinateError> {
            parts.next().ok_or_else(err)?.parse().map_err(|_| err())
        };
        let coord = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(coord)
    }
}

/// Whether a cell size can be used for quantization: every component finite and positive.
pub fn is_valid_cell_size(cell_size: Vec3) -> bool {
    cell_size.is_finite() && cell_size.cmpgt(Vec3::ZERO).all()
}
