//! Graph nodes and the two coordinate systems they live in

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{
    Degrees, Meters,
    geodesy::{bearing_degrees, distance_meters, planar_bearing, planar_distance},
};

/// WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<Point<f64>> for LatLng {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// Floor-plan coordinate inside a building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    pub floor: i32,
    pub x: f64,
    pub y: f64,
}

impl FloorPoint {
    pub fn new(floor: i32, x: f64, y: f64) -> Self {
        Self {
            building: None,
            floor,
            x,
            y,
        }
    }

    #[must_use]
    pub fn in_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    /// Same floor and, when both name one, the same building
    pub fn shares_floor_with(&self, other: &FloorPoint) -> bool {
        self.floor == other.floor
            && match (&self.building, &other.building) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

/// Location of a node or a position sample
///
/// Outdoor and indoor coordinates are never compared with each other;
/// crossings between the two are ordinary weighted edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Outdoor(LatLng),
    Indoor(FloorPoint),
}

impl Position {
    pub fn outdoor(lat: f64, lng: f64) -> Self {
        Position::Outdoor(LatLng::new(lat, lng))
    }

    pub fn indoor(floor: i32, x: f64, y: f64) -> Self {
        Position::Indoor(FloorPoint::new(floor, x, y))
    }

    pub fn is_indoor(&self) -> bool {
        matches!(self, Position::Indoor(_))
    }

    pub fn floor(&self) -> Option<i32> {
        match self {
            Position::Outdoor(_) => None,
            Position::Indoor(p) => Some(p.floor),
        }
    }

    /// Straight-line distance, `None` when the two positions are not comparable
    pub fn distance_to(&self, other: &Position) -> Option<Meters> {
        match (self, other) {
            (Position::Outdoor(a), Position::Outdoor(b)) => {
                Some(distance_meters(&a.point(), &b.point()))
            }
            (Position::Indoor(a), Position::Indoor(b)) if a.shares_floor_with(b) => {
                Some(planar_distance(a.x, a.y, b.x, b.y))
            }
            _ => None,
        }
    }

    /// Bearing toward `other`, `None` when the two positions are not comparable
    pub fn bearing_to(&self, other: &Position) -> Option<Degrees> {
        match (self, other) {
            (Position::Outdoor(a), Position::Outdoor(b)) => {
                Some(bearing_degrees(&a.point(), &b.point()))
            }
            (Position::Indoor(a), Position::Indoor(b)) if a.shares_floor_with(b) => {
                Some(planar_bearing(a.x, a.y, b.x, b.y))
            }
            _ => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Position::Outdoor(p) => format!("outdoor area near ({}, {})", p.lat, p.lng),
            Position::Indoor(p) => match &p.building {
                Some(building) => format!("floor {} of {building}", p.floor),
                None => format!("floor {}", p.floor),
            },
        }
    }
}

/// Kind of place a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Building,
    Entrance,
    Parking,
    Landmark,
    Facility,
    Emergency,
    Library,
    Cafeteria,
    Gym,
    Auditorium,
    MainGate,
    Classroom,
    Office,
    Lab,
    Toilet,
    Garden,
    Room,
    Stair,
    Elevator,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Building => "building",
            Category::Entrance => "entrance",
            Category::Parking => "parking",
            Category::Landmark => "landmark",
            Category::Facility => "facility",
            Category::Emergency => "emergency",
            Category::Library => "library",
            Category::Cafeteria => "cafeteria",
            Category::Gym => "gym",
            Category::Auditorium => "auditorium",
            Category::MainGate => "main_gate",
            Category::Classroom => "classroom",
            Category::Office => "office",
            Category::Lab => "lab",
            Category::Toilet => "toilet",
            Category::Garden => "garden",
            Category::Room => "room",
            Category::Stair => "stair",
            Category::Elevator => "elevator",
            Category::Other => "other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Building | Category::Office => "🏢",
            Category::Entrance | Category::MainGate => "🚪",
            Category::Parking => "🅿️",
            Category::Facility => "⚙️",
            Category::Emergency => "🆘",
            Category::Library => "📚",
            Category::Cafeteria => "🍔",
            Category::Gym => "🏋️",
            Category::Auditorium => "🎭",
            Category::Classroom => "🎓",
            Category::Lab => "🔬",
            Category::Toilet => "🚻",
            Category::Garden => "🌳",
            Category::Stair => "🪜",
            Category::Elevator => "🛗",
            Category::Landmark | Category::Room | Category::Other => "📍",
        }
    }

    /// Categories offered as destinations unless a node says otherwise
    pub fn is_default_destination(self) -> bool {
        matches!(
            self,
            Category::Building
                | Category::Landmark
                | Category::Library
                | Category::Cafeteria
                | Category::Gym
                | Category::Auditorium
                | Category::MainGate
        )
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "building" => Category::Building,
            "entrance" => Category::Entrance,
            "parking" => Category::Parking,
            "landmark" => Category::Landmark,
            "facility" => Category::Facility,
            "emergency" => Category::Emergency,
            "library" => Category::Library,
            "cafeteria" => Category::Cafeteria,
            "gym" => Category::Gym,
            "auditorium" => Category::Auditorium,
            "main_gate" => Category::MainGate,
            "classroom" => Category::Classroom,
            "office" => Category::Office,
            "lab" => Category::Lab,
            "toilet" => Category::Toilet,
            "garden" => Category::Garden,
            "room" => Category::Room,
            "stair" => Category::Stair,
            "elevator" => Category::Elevator,
            _ => Category::Other,
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// Routable point of the campus graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub category: Category,
    /// Explicit destination flag, category default when absent
    pub destination_flag: Option<bool>,
    /// Explicit icon, category icon when absent
    pub icon_override: Option<String>,
}

impl Node {
    pub fn is_destination(&self) -> bool {
        self.destination_flag
            .unwrap_or_else(|| self.category.is_default_destination())
    }

    pub fn icon(&self) -> &str {
        self.icon_override
            .as_deref()
            .unwrap_or_else(|| self.category.icon())
    }
}
