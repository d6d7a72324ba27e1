use navgrid_common::Coordinate;
use std::collections::BTreeMap;

/// Adjacency of a single node: neighbor coordinate to traversal cost.
///
/// BTreeMap keeps neighbor iteration order deterministic, which in turn keeps
/// search expansion order reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sides {
    connections: BTreeMap<Coordinate, f32>,
}

impl Sides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the edge to `to`. Returns the previous cost, if any.
    pub fn insert(&mut self, to: Coordinate, cost: f32) -> Option<f32> {
        self.connections.insert(to, cost)
    }

    /// Remove the edge to `to`. Returns its cost if it existed.
    pub fn remove(&mut self, to: &Coordinate) -> Option<f32> {
        self.connections.remove(to)
    }

    pub fn contains(&self, to: &Coordinate) -> bool {
        self.connections.contains_key(to)
    }

    pub fn cost(&self, to: &Coordinate) -> Option<f32> {
        self.connections.get(to).copied()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Neighbor coordinates in canonical order.
    pub fn neighbors(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.connections.keys().copied()
    }

    /// `(neighbor, cost)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, f32)> + '_ {
        self.connections.iter().map(|(c, cost)| (*c, *cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_cost() {
        let mut sides = Sides::new();
        let n = Coordinate::new(1, 0, 0);
        assert_eq!(sides.insert(n, 2.0), None);
        assert_eq!(sides.insert(n, 3.0), Some(2.0));
        assert_eq!(sides.cost(&n), Some(3.0));
        assert_eq!(sides.len(), 1);
    }

    #[test]
    fn remove_reports_missing_edge() {
        let mut sides = Sides::new();
        let n = Coordinate::new(0, 1, 0);
        assert_eq!(sides.remove(&n), None);
        sides.insert(n, 1.0);
        assert_eq!(sides.remove(&n), Some(1.0));
        assert!(sides.is_empty());
    }

    #[test]
    fn neighbors_iterate_in_coordinate_order() {
        let mut sides = Sides::new();
        sides.insert(Coordinate::new(2, 0, 0), 1.0);
        sides.insert(Coordinate::new(-1, 0, 0), 1.0);
        sides.insert(Coordinate::new(0, 5, 0), 1.0);
        let order: Vec<Coordinate> = sides.neighbors().collect();
        assert_eq!(
            order,
            vec![
                Coordinate::new(-1, 0, 0),
                Coordinate::new(0, 5, 0),
                Coordinate::new(2, 0, 0)
            ]
        );
    }
}
