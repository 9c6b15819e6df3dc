//! Graph edges - walkable connections between two nodes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Meters;

/// Vertical movement carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transition {
    pub stairs: bool,
    pub elevator: bool,
    /// Floors gained walking the edge in its travel direction
    pub floor_change: i32,
}

/// How a floor change is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Stairs,
    Elevator,
    FloorChange,
}

impl Transition {
    pub fn of_kind(kind: TransitionKind, floor_change: i32) -> Self {
        Self {
            stairs: kind == TransitionKind::Stairs,
            elevator: kind == TransitionKind::Elevator,
            floor_change,
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.stairs || self.elevator || self.floor_change != 0
    }

    pub fn kind(&self) -> Option<TransitionKind> {
        if self.elevator {
            Some(TransitionKind::Elevator)
        } else if self.stairs {
            Some(TransitionKind::Stairs)
        } else if self.floor_change != 0 {
            Some(TransitionKind::FloorChange)
        } else {
            None
        }
    }

    /// The same transition walked the other way
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            floor_change: -self.floor_change,
            ..self
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let how = match self.kind() {
            Some(TransitionKind::Elevator) => "Take the elevator",
            Some(TransitionKind::Stairs) => "Take the stairs",
            Some(TransitionKind::FloorChange) => "Change floors",
            None => return f.write_str("Continue on this floor"),
        };
        let floors = self.floor_change.unsigned_abs();
        let plural = if floors == 1 { "" } else { "s" };
        match self.floor_change {
            0 => f.write_str(how),
            n if n > 0 => write!(f, "{how} up {floors} floor{plural}"),
            _ => write!(f, "{how} down {floors} floor{plural}"),
        }
    }
}

/// Edge weight of the campus graph
#[derive(Debug, Clone, PartialEq)]
pub struct PathEdge {
    /// Walking distance in meters
    pub distance: Meters,
    /// Transition as stored, in the direction of the source record
    pub transition: Transition,
    /// Explicit accessibility flag; stairs are inaccessible by default
    pub accessible: Option<bool>,
}

impl PathEdge {
    pub fn is_accessible(&self) -> bool {
        self.accessible.unwrap_or(!self.transition.stairs)
    }
}
