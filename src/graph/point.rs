use serde::{Deserialize, Serialize};

use super::{VertexId, Weight};

#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance; overflows to infinity only if the coordinate difference does
    pub fn distance_to(&self, other: &Point) -> Weight {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Point::new(value.0, value.1)
    }
}

/// A city as read from an instance: the external id and its position
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Point,
}

impl From<(VertexId, f64, f64)> for Vertex {
    fn from(value: (VertexId, f64, f64)) -> Self {
        Vertex {
            id: value.0,
            position: Point::new(value.1, value.2),
        }
    }
}

impl From<&(VertexId, f64, f64)> for Vertex {
    fn from(value: &(VertexId, f64, f64)) -> Self {
        (*value).into()
    }
}
