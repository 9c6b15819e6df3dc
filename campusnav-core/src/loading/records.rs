//! Node and edge records as delivered by the locations/paths feeds

use serde::{Deserialize, Serialize};

use crate::model::Category;

/// Location feed entry
///
/// Outdoor nodes carry `lat`/`lng`, indoor nodes carry `floor`/`x`/`y`
/// and usually a `building`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_destination: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NodeRecord {
    pub fn outdoor(id: &str, name: &str, lat: f64, lng: f64, category: Category) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat: Some(lat),
            lng: Some(lng),
            floor: None,
            x: None,
            y: None,
            building: None,
            category,
            is_destination: None,
            icon: None,
        }
    }

    pub fn indoor(id: &str, name: &str, floor: i32, x: f64, y: f64, category: Category) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat: None,
            lng: None,
            floor: Some(floor),
            x: Some(x),
            y: Some(y),
            building: None,
            category,
            is_destination: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn in_building(mut self, building: &str) -> Self {
        self.building = Some(building.to_string());
        self
    }

    #[must_use]
    pub fn as_destination(mut self, icon: Option<&str>) -> Self {
        self.is_destination = Some(true);
        self.icon = icon.map(str::to_string);
        self
    }
}

/// Path feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub distance: f64,
    #[serde(default)]
    pub is_stair: bool,
    #[serde(default)]
    pub is_elevator: bool,
    /// 0 = same floor, +1 = one floor up walking `from` → `to`
    #[serde(default)]
    pub floor_change: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
}

impl EdgeRecord {
    pub fn new(from: &str, to: &str, distance: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            distance,
            is_stair: false,
            is_elevator: false,
            floor_change: 0,
            accessible: None,
        }
    }

    pub fn stairs(from: &str, to: &str, distance: f64, floor_change: i32) -> Self {
        Self {
            is_stair: true,
            floor_change,
            ..Self::new(from, to, distance)
        }
    }

    pub fn elevator(from: &str, to: &str, distance: f64, floor_change: i32) -> Self {
        Self {
            is_elevator: true,
            floor_change,
            ..Self::new(from, to, distance)
        }
    }
}
