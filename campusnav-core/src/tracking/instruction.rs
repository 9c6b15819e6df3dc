use std::fmt;

use serde::Serialize;

use crate::{
    Meters,
    geodesy::{Cardinal, format_distance},
    model::{Transition, TransitionKind},
};

/// Guidance shown for the current position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Instruction {
    /// Walk toward the next waypoint
    Head {
        direction: Option<Cardinal>,
        distance_m: Meters,
    },
    /// Take the stairs or elevator on the current leg
    Transition {
        kind: TransitionKind,
        floor_change: i32,
    },
    /// Inside the final-approach radius
    FinalApproach {
        direction: Option<Cardinal>,
        distance_m: Meters,
    },
    Arrived,
}

impl Instruction {
    /// Category name reported to the presentation layer
    pub fn category(&self) -> &'static str {
        match self {
            Instruction::Head { .. } => "head",
            Instruction::Transition { .. } => "transition",
            Instruction::FinalApproach { .. } => "final_approach",
            Instruction::Arrived => "arrived",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Head {
                direction: Some(direction),
                distance_m,
            } => write!(
                f,
                "Head {} for {}",
                direction.long(),
                format_distance(distance_m)
            ),
            Instruction::Head {
                direction: None,
                distance_m,
            } => write!(f, "Follow the route for {}", format_distance(distance_m)),
            Instruction::Transition { kind, floor_change } => {
                fmt::Display::fmt(&Transition::of_kind(kind, floor_change), f)
            }
            Instruction::FinalApproach {
                direction: Some(direction),
                ..
            } => write!(f, "Almost there! Head {}", direction.long()),
            Instruction::FinalApproach {
                direction: None,
                distance_m,
            } => write!(f, "Almost there! {} to go", format_distance(distance_m)),
            Instruction::Arrived => f.write_str("You have arrived"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_range_and_final_approach_read_differently() {
        let head = Instruction::Head {
            direction: Some(Cardinal::NE),
            distance_m: 222.4,
        };
        let near = Instruction::FinalApproach {
            direction: Some(Cardinal::NE),
            distance_m: 30.0,
        };
        assert_eq!(head.to_string(), "Head North-East for 222 m");
        assert_eq!(near.to_string(), "Almost there! Head North-East");
        assert_ne!(head.category(), near.category());
    }

    #[test]
    fn serialises_with_category_tag() {
        let json = serde_json::to_value(Instruction::Transition {
            kind: TransitionKind::Elevator,
            floor_change: -2,
        })
        .unwrap();
        assert_eq!(json["category"], "transition");
        assert_eq!(json["kind"], "elevator");
        assert_eq!(
            Instruction::Transition {
                kind: TransitionKind::Elevator,
                floor_change: -2
            }
            .to_string(),
            "Take the elevator down 2 floors"
        );
    }
}
