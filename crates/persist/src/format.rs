use glam::Vec3;
use navgrid_common::Coordinate;
use navgrid_grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PersistError;

/// Serialized form of a [`Grid`].
///
/// ```json
/// {
///   "name": "level",
///   "cellSize": [35.0, 35.0, 75.0],
///   "nodes": {
///     "0 0 0": { "footPos": [0.0, 0.0, 0.0], "sides": { "1 0 0": 35.0 } },
///     "1 0 0": { "footPos": [35.0, 0.0, 0.0], "sides": { "0 0 0": 35.0 } }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDocument {
    pub name: String,
    pub cell_size: Vec3,
    /// Keyed by `"x y z"` coordinate.
    pub nodes: BTreeMap<String, NodeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub foot_pos: Vec3,
    /// Neighbour `"x y z"` key to edge cost.
    #[serde(default)]
    pub sides: BTreeMap<String, f32>,
}

impl From<&Grid> for GridDocument {
    fn from(grid: &Grid) -> Self {
        let nodes = grid
            .nodes()
            .map(|node| {
                let c = node.coordinate();
                let sides = grid
                    .sides(c)
                    .map(|s| s.iter().map(|(to, cost)| (to.to_string(), cost)).collect())
                    .unwrap_or_default();
                let record = NodeRecord {
                    foot_pos: node.foot_position(),
                    sides,
                };
                (c.to_string(), record)
            })
            .collect();
        Self {
            name: grid.name().to_string(),
            cell_size: grid.cell_size(),
            nodes,
        }
    }
}

impl GridDocument {
    /// Rebuild a grid, validating every key and side.
    ///
    /// Nodes are inserted first, then every listed side is connected, which
    /// recomputes its cost and mirrors it onto the other endpoint. A side
    /// listed on only one node therefore still yields a symmetric edge.
    pub fn into_grid(self) -> Result<Grid, PersistError> {
        let mut grid = Grid::try_new(self.name, self.cell_size)
            .ok_or(PersistError::InvalidCellSize(self.cell_size))?;

        let mut records = Vec::with_capacity(self.nodes.len());
        for (key, record) in self.nodes {
            let c: Coordinate = key.parse()?;
            if !grid.add_node(c, record.foot_pos) {
                return Err(PersistError::DuplicateNode(c));
            }
            records.push((c, record.sides));
        }

        for (from, sides) in records {
            for key in sides.keys() {
                let to: Coordinate = key.parse()?;
                if to == from {
                    return Err(PersistError::SelfLoop(from));
                }
                if !grid.has_node(to) {
                    return Err(PersistError::UnknownSide { from, to });
                }
                grid.connect_to(from, to);
            }
        }

        tracing::debug!(
            grid = grid.name(),
            nodes = grid.node_count(),
            unused = grid.unused_count(),
            "grid document loaded"
        );
        Ok(grid)
    }
}

pub fn to_json(grid: &Grid) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&GridDocument::from(grid))?)
}

pub fn to_json_pretty(grid: &Grid) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&GridDocument::from(grid))?)
}

pub fn from_json(json: &str) -> Result<Grid, PersistError> {
    let document: GridDocument = serde_json::from_str(json)?;
    document.into_grid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgrid_common::DEFAULT_CELL_SIZE;

    fn c(x: i32, y: i32, z: i32) -> Coordinate {
        Coordinate::new(x, y, z)
    }

    fn sample() -> Grid {
        let mut grid = Grid::new("sample", DEFAULT_CELL_SIZE);
        for cell in [c(0, 0, 0), c(1, 0, 0), c(1, 1, 0), c(5, 5, 1)] {
            grid.add_node(cell, cell.to_world(DEFAULT_CELL_SIZE) + Vec3::new(0.0, 0.0, -2.5));
        }
        grid.connect_to(c(0, 0, 0), c(1, 0, 0));
        grid.connect_to(c(1, 0, 0), c(1, 1, 0));
        grid
    }

    #[test]
    fn document_round_trip_preserves_structure() {
        let original = sample();
        let json = to_json(&original).unwrap();
        let loaded = from_json(&json).unwrap();

        assert_eq!(loaded.name(), "sample");
        assert_eq!(loaded.cell_size(), original.cell_size());
        assert_eq!(loaded.node_count(), original.node_count());
        for node in original.nodes() {
            let other = loaded.get_node(node.coordinate()).expect("node survives");
            assert_eq!(other.foot_position(), node.foot_position());
            assert_eq!(other.position(), node.position());
            let (a, b) = (original.sides(node.coordinate()), loaded.sides(node.coordinate()));
            assert_eq!(a, b);
        }
        assert_eq!(loaded.unused(), original.unused());
    }

    #[test]
    fn json_uses_documented_field_names() {
        let value: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(value["name"], "sample");
        assert_eq!(value["cellSize"], serde_json::json!([35.0, 35.0, 75.0]));
        let origin = &value["nodes"]["0 0 0"];
        assert_eq!(origin["footPos"], serde_json::json!([0.0, 0.0, -2.5]));
        assert_eq!(origin["sides"]["1 0 0"], 35.0);
        assert_eq!(value["nodes"]["5 5 1"]["sides"], serde_json::json!({}));
    }

    #[test]
    fn stored_costs_are_recomputed() {
        let json = r#"{
            "name": "g",
            "cellSize": [35.0, 35.0, 75.0],
            "nodes": {
                "0 0 0": { "footPos": [0.0, 0.0, 0.0], "sides": { "1 0 0": 999.0 } },
                "1 0 0": { "footPos": [3.0, 4.0, 0.0], "sides": {} }
            }
        }"#;
        let grid = from_json(json).unwrap();
        assert_eq!(grid.edge_cost(c(0, 0, 0), c(1, 0, 0)), Some(5.0));
        assert_eq!(grid.edge_cost(c(1, 0, 0), c(0, 0, 0)), Some(5.0));
        assert!(grid.unused().is_empty());
    }

    #[test]
    fn missing_sides_field_means_unused() {
        let json = r#"{"name":"g","cellSize":[1,1,1],"nodes":{"2 3 4":{"footPos":[2,3,4]}}}"#;
        let grid = from_json(json).unwrap();
        assert!(grid.unused().contains(&c(2, 3, 4)));
    }

    #[test]
    fn locks_are_not_persisted() {
        let mut grid = sample();
        grid.lock_node(c(1, 0, 0));
        let loaded = from_json(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(loaded.locked_count(), 0);
    }

    #[test]
    fn unknown_side_is_rejected() {
        let json = r#"{"name":"g","cellSize":[1,1,1],"nodes":{
            "0 0 0":{"footPos":[0,0,0],"sides":{"7 7 7":1.0}}}}"#;
        assert!(matches!(
            from_json(json),
            Err(PersistError::UnknownSide { from, to }) if from == c(0, 0, 0) && to == c(7, 7, 7)
        ));
    }

    #[test]
    fn self_loop_is_rejected() {
        let json = r#"{"name":"g","cellSize":[1,1,1],"nodes":{
            "0 0 0":{"footPos":[0,0,0],"sides":{"0 0 0":0.0}}}}"#;
        assert!(matches!(from_json(json), Err(PersistError::SelfLoop(_))));
    }

    #[test]
    fn malformed_key_is_rejected() {
        let json = r#"{"name":"g","cellSize":[1,1,1],"nodes":{"0,0,0":{"footPos":[0,0,0]}}}"#;
        assert!(matches!(from_json(json), Err(PersistError::InvalidCoordinate(_))));
    }

    #[test]
    fn equivalent_keys_are_duplicates() {
        let json = r#"{"name":"g","cellSize":[1,1,1],"nodes":{
            "0 0 0":{"footPos":[0,0,0]},
            "0  0 0":{"footPos":[0,0,0]}}}"#;
        assert!(matches!(from_json(json), Err(PersistError::DuplicateNode(_))));
    }

    #[test]
    fn invalid_cell_size_is_rejected() {
        for size in ["[0,1,1]", "[1,-1,1]"] {
            let json = format!(r#"{{"name":"g","cellSize":{size},"nodes":{{}}}}"#);
            assert!(matches!(from_json(&json), Err(PersistError::InvalidCellSize(_))));
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(from_json("{not json"), Err(PersistError::Json(_))));
        assert!(matches!(from_json(r#"{"name":"g"}"#), Err(PersistError::Json(_))));
    }
}
