//! Stationary food entities.

use crate::grid::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of food that can grow on the food layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Carrot,
}

impl FoodKind {
    /// Code used in occupancy maps
    pub fn code(self) -> u32 {
        match self {
            FoodKind::Carrot => 3,
        }
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodKind::Carrot => write!(f, "carrot"),
        }
    }
}

/// A piece of food sitting on one cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    pub position: Position,
    /// Hunger removed from whoever eats it
    pub nutritional_value: f64,
}

impl Food {
    pub fn new(kind: FoodKind, position: Position, nutritional_value: f64) -> Self {
        Self {
            kind,
            position,
            nutritional_value,
        }
    }
}
